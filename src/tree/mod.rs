//! Tree scanning, layout rendering, and file collection.

mod collect;
mod layout;
pub(crate) mod walk;

use std::path::PathBuf;

use crate::ignore_rules::IgnoreRuleSet;

pub use collect::{collect_dir_files, collect_files};
pub use layout::render_tree;
pub use walk::scan;

/// A single node of the scanned tree.
#[derive(Debug, Clone, PartialEq)]
pub struct Entry {
    /// Base name.
    pub name: String,
    /// Filesystem path (root joined with the relative path).
    pub path: PathBuf,
    /// Path from the scan root, `/`-separated, no leading `./`.
    pub relative_path: String,
    /// Whether this entry is a directory.
    pub is_dir: bool,
    /// Byte length; 0 for directories.
    pub size: u64,
    /// Distance from the scan root (0 = direct child of root).
    pub depth: usize,
    /// `Some` iff `is_dir`; directories may have no children.
    pub children: Option<Vec<Entry>>,
}

impl Entry {
    pub fn file(
        name: impl Into<String>,
        path: impl Into<PathBuf>,
        relative_path: impl Into<String>,
        size: u64,
        depth: usize,
    ) -> Self {
        Self {
            name: name.into(),
            path: path.into(),
            relative_path: relative_path.into(),
            is_dir: false,
            size,
            depth,
            children: None,
        }
    }

    pub fn dir(
        name: impl Into<String>,
        path: impl Into<PathBuf>,
        relative_path: impl Into<String>,
        depth: usize,
        children: Vec<Entry>,
    ) -> Self {
        Self {
            name: name.into(),
            path: path.into(),
            relative_path: relative_path.into(),
            is_dir: true,
            size: 0,
            depth,
            children: Some(children),
        }
    }

    /// Children of a directory; empty for files.
    pub fn children(&self) -> &[Entry] {
        self.children.as_deref().unwrap_or(&[])
    }
}

/// Configuration for a scan.
#[derive(Debug, Clone, Default)]
pub struct TreeConfig {
    /// Deepest entry depth to list (`None` for unlimited). Entries at exactly
    /// this depth are listed but never expanded.
    pub max_depth: Option<usize>,
    /// Skip names beginning with `.`.
    pub ignore_hidden: bool,
    /// Gitignore rules checked before each entry is stat'ed.
    pub ignore_rules: IgnoreRuleSet,
}

/// Count every entry in a tree (files and directories).
pub fn count_entries(entries: &[Entry]) -> usize {
    entries
        .iter()
        .map(|e| 1 + count_entries(e.children()))
        .sum()
}
