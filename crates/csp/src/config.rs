use serde::{Deserialize, Serialize};

/// Options controlling how a policy is compiled
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CompileOptions {
    /// Sort directives by name instead of emitting them in the order they
    /// were first declared. Needed for golden-output comparisons.
    pub deterministic_order: bool,
}

impl CompileOptions {
    /// Options that emit directives sorted by name
    pub fn deterministic() -> Self {
        Self {
            deterministic_order: true,
        }
    }
}
