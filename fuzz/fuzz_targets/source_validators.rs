#![no_main]
//! Grammar validator fuzzing
//!
//! The scanners must never panic, and anything accepted as a host source
//! must not carry a path.

use libfuzzer_sys::fuzz_target;

use citadel_csp::validate::{
    is_host_source, is_scheme_source, is_uri_reference, validate_sandbox, validate_source,
};

fuzz_target!(|data: &[u8]| {
    let Ok(token) = std::str::from_utf8(data) else {
        return;
    };

    let accepted = validate_source(token).is_ok();
    if is_host_source(token) {
        assert!(accepted);
        let after_scheme = token.split_once("://").map_or(token, |(_, rest)| rest);
        assert!(!after_scheme.contains('/'));
    }
    if is_scheme_source(token) {
        assert!(accepted);
        assert!(token.ends_with(':'));
    }

    let _ = validate_sandbox(&[token.to_string()]);
    if is_uri_reference(token) {
        assert!(!token.chars().any(char::is_whitespace));
    }
});
