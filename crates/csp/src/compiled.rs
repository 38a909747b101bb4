use std::fmt;

use serde::Serialize;

use crate::directive::Directive;

/// A validated policy serialized into its header value.
///
/// Only produced by a successful [`Policy::compile`](crate::Policy::compile).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct CompiledPolicy(String);

impl CompiledPolicy {
    /// Render `"<name> <values..>"` per directive, joined with `"; "`.
    /// Directives that render to no value are skipped.
    pub(crate) fn from_directives(directives: &[Directive]) -> Self {
        let rendered: Vec<String> = directives
            .iter()
            .filter_map(|directive| {
                let values = directive.render_values();
                (!values.is_empty()).then(|| format!("{} {}", directive.name, values))
            })
            .collect();
        Self(rendered.join("; "))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl fmt::Display for CompiledPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for CompiledPolicy {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl From<CompiledPolicy> for String {
    fn from(compiled: CompiledPolicy) -> Self {
        compiled.0
    }
}
