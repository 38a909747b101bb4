//! Errors produced while checking or compiling a policy.

/// A malformed policy. Every variant carries the token that failed.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum CspError {
    #[error("unexpected source: {token:?}")]
    InvalidSource { token: String },

    #[error("invalid sandbox token: {token:?}")]
    InvalidSandboxToken { token: String },

    #[error("invalid report uri: {token:?}")]
    InvalidReportUri { token: String },

    #[error("empty source list")]
    EmptySourceList,
}

impl CspError {
    /// The offending token, if the error names one.
    pub fn token(&self) -> Option<&str> {
        match self {
            CspError::InvalidSource { token }
            | CspError::InvalidSandboxToken { token }
            | CspError::InvalidReportUri { token } => Some(token),
            CspError::EmptySourceList => None,
        }
    }
}

/// Result type for policy operations
pub type CspResult<T> = Result<T, CspError>;
