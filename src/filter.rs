//! Post-scan pruning of the entry tree against filter patterns.

use tracing::trace;

use crate::pattern::{self, Pattern};
use crate::tree::Entry;

/// Remove every entry whose relative path matches `patterns`.
///
/// Children are pruned before their parent is tested, so a surviving
/// directory never carries stale children. A matching directory is dropped
/// with everything beneath it. The result may be empty.
pub fn prune(entries: Vec<Entry>, patterns: &[Pattern]) -> Vec<Entry> {
    if patterns.is_empty() {
        return entries;
    }

    entries
        .into_iter()
        .filter_map(|mut entry| {
            entry.children = entry.children.map(|children| prune(children, patterns));
            if pattern::matches(patterns, &entry.relative_path) {
                trace!(path = %entry.relative_path, "filtered out");
                None
            } else {
                Some(entry)
            }
        })
        .collect()
}
