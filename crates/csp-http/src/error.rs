use thiserror::Error;

use citadel_csp::CspError;

/// Errors raised while putting a policy on the wire
#[derive(Error, Debug)]
pub enum HttpCspError {
    /// The policy failed validation
    #[error("invalid policy: {0}")]
    Policy(#[from] CspError),

    /// The compiled policy is not a legal header value
    #[error("invalid header value: {0}")]
    InvalidHeaderValue(#[from] hyper::header::InvalidHeaderValue),
}
