use std::path::Path;
use tracing::{debug, trace};

use super::{Entry, TreeConfig};
use crate::error::Result;
use crate::events::EventSink;
use crate::probe;

/// Scan `root` recursively.
///
/// Siblings are ordered directories first, otherwise in listing order.
/// Only a hard failure listing a directory (anything but permission denied)
/// is returned as an error; everything else is a warning and a skip.
pub fn scan(root: &Path, config: &TreeConfig, sink: &dyn EventSink) -> Result<Vec<Entry>> {
    let entries = scan_dir(root, "", 0, config, sink)?;
    debug!(
        root = %root.display(),
        entries = super::count_entries(&entries),
        "scan complete"
    );
    Ok(entries)
}

fn scan_dir(
    dir: &Path,
    relative: &str,
    depth: usize,
    config: &TreeConfig,
    sink: &dyn EventSink,
) -> Result<Vec<Entry>> {
    // Checked before listing, so directories at the limit are never read.
    if config.max_depth.is_some_and(|max| depth > max) {
        return Ok(Vec::new());
    }

    let mut entries = Vec::new();
    for child in probe::list_directory(dir, sink)? {
        if config.ignore_hidden && child.name.starts_with('.') {
            continue;
        }

        let relative_path = if relative.is_empty() {
            child.name.clone()
        } else {
            format!("{relative}/{}", child.name)
        };

        if config.ignore_rules.ignores(&relative_path, child.is_dir) {
            trace!(path = %relative_path, "ignored by rule");
            continue;
        }

        let path = dir.join(&child.name);
        let Some(stat) = probe::stat(&path, sink) else {
            continue;
        };

        let entry = if stat.is_dir {
            let children = scan_dir(&path, &relative_path, depth + 1, config, sink)?;
            Entry::dir(child.name, path, relative_path, depth, children)
        } else {
            Entry::file(child.name, path, relative_path, stat.size, depth)
        };
        entries.push(entry);
    }

    // Stable: listing order survives within each group.
    entries.sort_by_key(|e| !e.is_dir);
    Ok(entries)
}
