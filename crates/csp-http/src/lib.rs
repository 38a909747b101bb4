//! Citadel CSP HTTP glue
//!
//! Puts compiled Content Security Policies on hyper responses and accepts
//! the violation reports browsers post back to a policy's `report-uri`.

pub mod config;
pub mod error;
pub mod header;
pub mod intake;
pub mod report;

/// Re-export common types for easier usage
pub use config::IntakeConfig;
pub use error::HttpCspError;
pub use header::{
    apply_policy, ApplyPolicy, PolicyMode, CONTENT_SECURITY_POLICY, CONTENT_SECURITY_POLICY_REPORT_ONLY,
};
pub use intake::{decode_request, IntakeOutcome, Rejection, ViolationHandler, ACCEPTED_MEDIA_TYPES};
pub use report::{CspReport, Violation};
