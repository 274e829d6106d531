//! Reachability rule: reports declared keys by the usage the marker left on them.

use crate::core::tree::{KeyTree, Usage};
use crate::issues::{Finding, ReachedOnlyOpaquelyFinding, Severity, UnusedKeyFinding};

/// Report unreached and opaquely reached leaves of a marked tree.
///
/// Leaves under a computed key are never reported: any computed access may
/// reach them. `opaque_severity` of `None` silences opaque reach findings.
/// Findings follow declaration order.
pub fn check_reachability(tree: &KeyTree, opaque_severity: Option<Severity>) -> Vec<Finding> {
    tree.leaves()
        .into_iter()
        .filter(|entry| !entry.under_computed)
        .filter_map(|entry| {
            let key_path = tree.display_path(&entry.key_path);
            let context = entry.context.clone();
            let translation_id = entry.leaf.id.clone();

            match entry.leaf.usage {
                Usage::Unreached => Some(Finding::UnusedKey(UnusedKeyFinding {
                    context,
                    key_path,
                    translation_id,
                })),
                Usage::UsedAsSubtree => opaque_severity.map(|severity| {
                    Finding::ReachedOnlyOpaquely(ReachedOnlyOpaquelyFinding {
                        context,
                        key_path,
                        translation_id,
                        severity,
                    })
                }),
                Usage::Used => None,
            }
        })
        .collect()
}
