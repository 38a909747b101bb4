//! Property tests for forking and compaction.

use citadel_csp::compact::compact_values;
use citadel_csp::{CompileOptions, DirectiveName, Policy, NONE, SELF, UNSAFE_EVAL};
use proptest::prelude::*;

fn token() -> impl Strategy<Value = String> {
    prop_oneof![
        Just(NONE.to_string()),
        Just(SELF.to_string()),
        Just(UNSAFE_EVAL.to_string()),
        Just("https:".to_string()),
        "[a-z]{1,8}(\\.[a-z]{2,3})?(:[0-9]{1,4})?",
    ]
}

fn directive() -> impl Strategy<Value = DirectiveName> {
    (0..9usize).prop_map(|i| DirectiveName::ALL[i])
}

fn build(steps: &[(DirectiveName, String)]) -> Policy {
    steps.iter().fold(
        Policy::with_options(CompileOptions::deterministic()),
        |policy, (name, value)| policy.directive(*name, [value.as_str()]),
    )
}

proptest! {
    #[test]
    fn forks_never_observe_each_other(
        shared in prop::collection::vec((directive(), token()), 0..12),
        left in prop::collection::vec((directive(), token()), 1..6),
        right in prop::collection::vec((directive(), token()), 1..6),
    ) {
        let parent = build(&shared);
        let expected_parent = parent.compile().unwrap();

        // Interleave the two forks step by step.
        let mut a = parent.clone();
        let mut b = parent.clone();
        for i in 0..left.len().max(right.len()) {
            if let Some((name, value)) = left.get(i) {
                a = a.directive(*name, [value.as_str()]);
            }
            if let Some((name, value)) = right.get(i) {
                b = b.directive(*name, [value.as_str()]);
            }
        }

        let full_left: Vec<_> = shared.iter().chain(&left).cloned().collect();
        let full_right: Vec<_> = shared.iter().chain(&right).cloned().collect();
        prop_assert_eq!(a.compile().unwrap(), build(&full_left).compile().unwrap());
        prop_assert_eq!(b.compile().unwrap(), build(&full_right).compile().unwrap());
        prop_assert_eq!(parent.compile().unwrap(), expected_parent);
    }

    #[test]
    fn compaction_is_idempotent(values in prop::collection::vec(token(), 0..16)) {
        let once = compact_values(&values);
        prop_assert_eq!(compact_values(&once), once.clone());
    }

    #[test]
    fn none_never_shares_a_list(values in prop::collection::vec(token(), 1..16)) {
        let compacted = compact_values(&values);
        if compacted.iter().any(|v| v == NONE) {
            prop_assert_eq!(compacted, vec![NONE.to_string()]);
        }
    }
}
