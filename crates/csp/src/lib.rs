//! Citadel CSP Crate
//!
//! Builds Content Security Policy (CSP 1.0) headers from a persistent,
//! forkable [`Policy`], validates every directive against the CSP grammar and
//! compiles the result into the exact header value browsers parse.

pub mod compact;
pub mod compiled;
pub mod config;
pub mod directive;
pub mod error;
pub mod policy;
pub mod source;
pub mod validate;

pub use compiled::CompiledPolicy;
pub use config::CompileOptions;
pub use directive::{Directive, DirectiveName, UnknownDirective};
pub use error::{CspError, CspResult};
pub use policy::{Fragment, Policy};
pub use source::{HTTPS, NONE, SELF, UNSAFE_EVAL, UNSAFE_INLINE};
