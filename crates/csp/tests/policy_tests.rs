//! Policy building, forking and compilation.

use citadel_csp::{
    CompileOptions, CspError, DirectiveName, Policy, HTTPS, NONE, SELF, UNSAFE_INLINE,
};
use pretty_assertions::assert_eq;

fn base() -> Policy {
    Policy::with_options(CompileOptions::deterministic())
        .default_src([NONE])
        .img_src(["*"])
        .sandbox(["allow-forms"])
}

#[test]
fn test_chaining() {
    assert_eq!(
        base().must_compile().as_str(),
        "default-src 'none'; img-src *; sandbox allow-forms"
    );
}

#[test]
fn test_derived_policy_does_not_touch_base() {
    let base = base();
    let derived = base.script_src([SELF]);

    assert_eq!(
        base.must_compile().as_str(),
        "default-src 'none'; img-src *; sandbox allow-forms"
    );
    assert_eq!(
        derived.must_compile().as_str(),
        "default-src 'none'; img-src *; sandbox allow-forms; script-src 'self'"
    );
}

#[test]
fn test_none_overrides_only_prior_values() {
    let csp1 = base();
    let csp2 = csp1.default_src([SELF]).img_src([NONE]);
    let csp3 = csp1.sandbox([NONE]);
    let csp4 = csp3.sandbox(["allow-popups"]);

    assert_eq!(
        csp1.must_compile().as_str(),
        "default-src 'none'; img-src *; sandbox allow-forms"
    );
    assert_eq!(
        csp2.must_compile().as_str(),
        "default-src 'self'; img-src 'none'; sandbox allow-forms"
    );
    assert_eq!(csp3.must_compile().as_str(), "default-src 'none'; img-src *");
    assert_eq!(
        csp4.must_compile().as_str(),
        "default-src 'none'; img-src *; sandbox allow-popups"
    );
}

#[test]
fn test_sibling_forks_are_isolated() {
    // Both forks append at the same position of the shared parent.
    let parent = Policy::with_options(CompileOptions::deterministic())
        .default_src([SELF])
        .script_src([SELF]);
    let a = parent.img_src(["a.example.com"]);
    let b = parent.font_src(["b.example.com"]);
    let a2 = a.style_src([UNSAFE_INLINE]);
    let b2 = b.style_src([HTTPS]);

    assert_eq!(
        a2.must_compile().as_str(),
        "default-src 'self'; img-src a.example.com; script-src 'self'; style-src 'unsafe-inline'"
    );
    assert_eq!(
        b2.must_compile().as_str(),
        "default-src 'self'; font-src b.example.com; script-src 'self'; style-src https:"
    );
    assert_eq!(
        parent.must_compile().as_str(),
        "default-src 'self'; script-src 'self'"
    );
}

#[test]
fn test_report_uri_none_drops_directive() {
    let policy = base().report_uri(["/csp"]).report_uri([NONE]);
    assert_eq!(
        policy.must_compile().as_str(),
        "default-src 'none'; img-src *; sandbox allow-forms"
    );
}

#[test]
fn test_check_groups_fragments() {
    let directives = Policy::new()
        .script_src([SELF])
        .img_src(["*"])
        .script_src(["cdn.example.com"])
        .check()
        .unwrap();

    assert_eq!(directives.len(), 2);
    assert_eq!(directives[0].name, DirectiveName::ScriptSrc);
    assert_eq!(directives[0].values, vec![SELF, "cdn.example.com"]);
    assert_eq!(directives[1].name, DirectiveName::ImgSrc);
}

#[test]
fn test_source_compacted_before_validation() {
    // 'none' followed by a scheme compacts to just the scheme.
    let compiled = Policy::new().img_src([NONE, "http:"]).compile().unwrap();
    assert_eq!(compiled.as_str(), "img-src http:");
}

#[test]
fn test_invalid_policies_yield_no_output() {
    let cases = [
        (
            Policy::new().frame_src(["*://example.com"]),
            CspError::InvalidSource {
                token: "*://example.com".to_string(),
            },
        ),
        (
            Policy::new().sandbox(["allow-forms", "allow;scripts"]),
            CspError::InvalidSandboxToken {
                token: "allow;scripts".to_string(),
            },
        ),
        (
            Policy::new().report_uri(["http://[::1"]),
            CspError::InvalidReportUri {
                token: "http://[::1".to_string(),
            },
        ),
    ];

    for (policy, expected) in cases {
        assert_eq!(policy.compile(), Err(expected));
    }
}

#[test]
fn test_empty_sandbox_is_skipped() {
    let compiled = Policy::new().default_src([SELF]).sandbox([""]).compile().unwrap();
    assert_eq!(compiled.as_str(), "default-src 'self'");
}

#[test]
fn test_report_uri_accepts_any_well_formed_reference() {
    let compiled = Policy::new()
        .report_uri(["http:", "http://example.com:99999/r", "urn:isbn:0451450523"])
        .compile()
        .unwrap();
    assert_eq!(
        compiled.as_str(),
        "report-uri http: http://example.com:99999/r urn:isbn:0451450523"
    );
}
