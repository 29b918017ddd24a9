use std::path::PathBuf;

use super::Entry;
use crate::pattern::normalize;

/// Every file in the tree, in traversal order.
pub fn collect_files(entries: &[Entry]) -> Vec<&Entry> {
    let mut files = Vec::new();
    push_files(entries, &mut files);
    files
}

fn push_files<'a>(entries: &'a [Entry], out: &mut Vec<&'a Entry>) {
    for entry in entries {
        if entry.is_dir {
            push_files(entry.children(), out);
        } else {
            out.push(entry);
        }
    }
}

/// Paths of every file at or beneath any of `targets`, in traversal order.
///
/// A target matches an entry whose relative path equals it or continues it
/// at a `/` boundary, so `src` never matches `src-old/file.js`. Targets may
/// carry a leading `./` or trailing slashes.
pub fn collect_dir_files<S: AsRef<str>>(entries: &[Entry], targets: &[S]) -> Vec<PathBuf> {
    let targets: Vec<String> = targets
        .iter()
        .map(|t| normalize_target(t.as_ref()))
        .filter(|t| !t.is_empty())
        .collect();

    let mut files = Vec::new();
    walk_targets(entries, &targets, &mut files);
    files
}

fn walk_targets(entries: &[Entry], targets: &[String], out: &mut Vec<PathBuf>) {
    for entry in entries {
        let relative = normalize(&entry.relative_path);
        let inside = targets.iter().any(|t| {
            relative == *t
                || relative
                    .strip_prefix(t.as_str())
                    .is_some_and(|rest| rest.starts_with('/'))
        });

        if inside {
            // Everything beneath a matched entry is inside too.
            out.extend(
                collect_files(std::slice::from_ref(entry))
                    .into_iter()
                    .map(|f| f.path.clone()),
            );
        } else if entry.is_dir {
            walk_targets(entry.children(), targets, out);
        }
    }
}

fn normalize_target(target: &str) -> String {
    let target = normalize(target);
    let target = target.strip_prefix("./").unwrap_or(&target);
    target.trim_end_matches('/').to_string()
}
