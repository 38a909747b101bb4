//! Applying compiled policies to response headers.

use hyper::header::{HeaderMap, HeaderName, HeaderValue};

use citadel_csp::{CompiledPolicy, Policy};

use crate::error::HttpCspError;

/// Enforcing policy header
pub const CONTENT_SECURITY_POLICY: HeaderName = hyper::header::CONTENT_SECURITY_POLICY;

/// Report-only policy header
pub const CONTENT_SECURITY_POLICY_REPORT_ONLY: HeaderName =
    hyper::header::CONTENT_SECURITY_POLICY_REPORT_ONLY;

/// Whether the browser enforces the policy or only reports violations.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum PolicyMode {
    #[default]
    Enforce,
    ReportOnly,
}

impl PolicyMode {
    pub fn header_name(&self) -> HeaderName {
        match self {
            PolicyMode::Enforce => CONTENT_SECURITY_POLICY,
            PolicyMode::ReportOnly => CONTENT_SECURITY_POLICY_REPORT_ONLY,
        }
    }
}

/// Puts a [`CompiledPolicy`] on a response.
///
/// Applying replaces any value already present for the header. An empty
/// policy removes it.
pub trait ApplyPolicy {
    fn header_value(&self) -> Result<HeaderValue, HttpCspError>;

    fn apply_mode(&self, headers: &mut HeaderMap, mode: PolicyMode) -> Result<(), HttpCspError>;

    fn apply(&self, headers: &mut HeaderMap) -> Result<(), HttpCspError> {
        self.apply_mode(headers, PolicyMode::Enforce)
    }

    fn apply_report_only(&self, headers: &mut HeaderMap) -> Result<(), HttpCspError> {
        self.apply_mode(headers, PolicyMode::ReportOnly)
    }
}

impl ApplyPolicy for CompiledPolicy {
    fn header_value(&self) -> Result<HeaderValue, HttpCspError> {
        // from_bytes keeps non-ASCII sandbox tokens as obs-text.
        Ok(HeaderValue::from_bytes(self.as_str().as_bytes())?)
    }

    fn apply_mode(&self, headers: &mut HeaderMap, mode: PolicyMode) -> Result<(), HttpCspError> {
        if self.is_empty() {
            log::debug!("clearing {} header for empty policy", mode.header_name());
            headers.remove(mode.header_name());
            return Ok(());
        }
        headers.insert(mode.header_name(), self.header_value()?);
        Ok(())
    }
}

/// Compile `policy` and apply it in one step.
///
/// Nothing is written to `headers` when the policy fails validation.
pub fn apply_policy(
    policy: &Policy,
    headers: &mut HeaderMap,
    mode: PolicyMode,
) -> Result<CompiledPolicy, HttpCspError> {
    let compiled = policy.compile()?;
    compiled.apply_mode(headers, mode)?;
    Ok(compiled)
}
