//! Violation reports as browsers send them.

use serde::{Deserialize, Serialize};

/// A description of a security policy violation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct CspReport {
    pub document_uri: String,
    pub referrer: String,
    pub blocked_uri: String,
    pub violated_directive: String,
    pub original_policy: String,
}

/// A policy violation reported by a browser: `{"csp-report": {...}}`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Violation {
    #[serde(rename = "csp-report", default)]
    pub report: Option<CspReport>,
}

impl Violation {
    /// Decode a report body. A JSON `null` decodes to an empty violation.
    pub fn from_slice(body: &[u8]) -> Result<Self, serde_json::Error> {
        let violation: Option<Self> = serde_json::from_slice(body)?;
        Ok(violation.unwrap_or_default())
    }
}
