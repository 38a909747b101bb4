#![no_main]
//! Violation report decoding fuzzing

use libfuzzer_sys::fuzz_target;

use citadel_csp_http::Violation;

fuzz_target!(|data: &[u8]| {
    if let Ok(violation) = Violation::from_slice(data) {
        // Whatever decodes must survive a round trip unchanged.
        let encoded = serde_json::to_vec(&violation).expect("violation serializes");
        assert_eq!(Violation::from_slice(&encoded).ok(), Some(violation));
    }
});
