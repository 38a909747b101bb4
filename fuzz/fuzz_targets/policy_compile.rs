#![no_main]
//! Policy compilation fuzzing
//!
//! Drives arbitrary directive/token sequences through the builder, forks the
//! result and checks the compiled header stays well formed.

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;

use citadel_csp::validate::validate_source_list;
use citadel_csp::{CompileOptions, DirectiveName, Policy, NONE};

#[derive(Debug, Arbitrary)]
struct Step {
    directive: u8,
    tokens: Vec<String>,
}

#[derive(Debug, Arbitrary)]
struct PolicyFuzzInput {
    shared: Vec<Step>,
    left: Vec<Step>,
    right: Vec<Step>,
    deterministic: bool,
}

fn apply(policy: Policy, steps: &[Step]) -> Policy {
    steps.iter().fold(policy, |policy, step| {
        let name = DirectiveName::ALL[step.directive as usize % DirectiveName::ALL.len()];
        policy.directive(name, step.tokens.iter().map(String::as_str))
    })
}

fuzz_target!(|input: PolicyFuzzInput| {
    let options = CompileOptions {
        deterministic_order: input.deterministic,
    };
    let parent = apply(Policy::with_options(options), &input.shared);
    let before = parent.compile();

    let left = apply(parent.clone(), &input.left);
    let right = apply(parent.clone(), &input.right);

    // Forking must never leak into the parent.
    assert_eq!(parent.compile(), before);
    assert_eq!(left.len(), parent.len() + input.left.iter().map(|s| s.tokens.len()).sum::<usize>());
    assert_eq!(right.len(), parent.len() + input.right.iter().map(|s| s.tokens.len()).sum::<usize>());

    for policy in [&parent, &left, &right] {
        let Ok(directives) = policy.check() else {
            assert!(policy.compile().is_err());
            continue;
        };
        for directive in &directives {
            if directive.name.is_source_list() {
                assert!(validate_source_list(&directive.values).is_ok());
                if directive.values.iter().any(|value| value == NONE) {
                    assert_eq!(directive.values.len(), 1);
                }
            } else {
                assert_ne!(directive.values, vec![NONE.to_string()]);
            }
        }

        let compiled = policy.compile().expect("checked policy must compile");
        let header = compiled.as_str();
        assert!(!header.contains(";;"));
        assert!(!header.starts_with(';'));
        assert!(!header.ends_with(';'));
    }
});
