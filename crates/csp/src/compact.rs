//! Directive compaction.
//!
//! Repeated declarations of one directive are merged into a single value
//! list. `'none'` discards everything declared before it for that directive;
//! the first token declared after a lone `'none'` starts a fresh list.

use crate::config::CompileOptions;
use crate::directive::{Directive, DirectiveName};
use crate::policy::Fragment;
use crate::source::NONE;

/// Merge the values declared for one directive, in declaration order.
pub fn compact_values<I, S>(values: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut compacted: Vec<String> = Vec::new();
    for value in values {
        let value = value.as_ref();
        if value == NONE {
            compacted = vec![NONE.to_string()];
        } else if is_lone_none(&compacted) {
            compacted = vec![value.to_string()];
        } else {
            compacted.push(value.to_string());
        }
    }
    compacted
}

fn is_lone_none(values: &[String]) -> bool {
    matches!(values, [only] if only == NONE)
}

/// Group fragments by directive and compact each group.
///
/// `sandbox` and `report-uri` groups that compact to a lone `'none'` are
/// dropped. Directives come out in first-declared order, or sorted by name
/// when `options.deterministic_order` is set.
pub fn compact(fragments: &[Fragment], options: &CompileOptions) -> Vec<Directive> {
    let mut groups: Vec<(DirectiveName, Vec<&str>)> = Vec::new();
    for fragment in fragments {
        match groups.iter_mut().find(|(name, _)| *name == fragment.name()) {
            Some((_, values)) => values.push(fragment.value()),
            None => groups.push((fragment.name(), vec![fragment.value()])),
        }
    }

    let mut directives: Vec<Directive> = groups
        .into_iter()
        .filter_map(|(name, values)| {
            let values = compact_values(values);
            if name.rejects_bare_none() && is_lone_none(&values) {
                log::debug!("dropping {} directive reduced to {}", name, NONE);
                return None;
            }
            Some(Directive::new(name, values))
        })
        .collect();

    if options.deterministic_order {
        directives.sort_by_key(|directive| directive.name.as_str());
    }
    directives
}
