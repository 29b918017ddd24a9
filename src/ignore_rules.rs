//! Gitignore-style rules consulted by the walker before descending.

use ignore::gitignore::{Gitignore, GitignoreBuilder};
use std::path::Path;

use crate::events::EventSink;

/// A compiled set of gitignore rules.
///
/// Supports `**`, negation (`!`), anchoring (leading `/`), and directory-only
/// rules (trailing `/`). An empty set ignores nothing.
#[derive(Debug, Clone)]
pub struct IgnoreRuleSet {
    rules: Option<Gitignore>,
}

impl IgnoreRuleSet {
    /// A set that ignores nothing.
    pub fn empty() -> Self {
        Self { rules: None }
    }

    /// Build from raw rule lines (comments and blank lines already removed).
    /// Lines that fail to parse are skipped with a warning.
    pub fn new<S: AsRef<str>>(lines: &[S], sink: &dyn EventSink) -> Self {
        if lines.is_empty() {
            return Self::empty();
        }

        // Rules are matched against relative paths, so the root is irrelevant.
        let mut builder = GitignoreBuilder::new(".");
        let mut invalid = Vec::new();
        for line in lines {
            let line = line.as_ref();
            if builder.add_line(None, line).is_err() {
                invalid.push(line.to_string());
            }
        }
        if !invalid.is_empty() {
            sink.warning(&format!("invalid ignore rule(s), skipped: {:?}", invalid));
        }

        match builder.build() {
            Ok(rules) if !rules.is_empty() => Self { rules: Some(rules) },
            Ok(_) => Self::empty(),
            Err(e) => {
                sink.warning(&format!("failed to build ignore rules: {e}"));
                Self::empty()
            }
        }
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_none()
    }

    /// Whether `relative_path` (forward-slash separated, relative to the scan
    /// root) is ignored. Ancestors are considered too, so a rule ignoring a
    /// directory also ignores everything beneath it.
    pub fn ignores(&self, relative_path: &str, is_dir: bool) -> bool {
        match &self.rules {
            Some(rules) => rules
                .matched_path_or_any_parents(Path::new(relative_path), is_dir)
                .is_ignore(),
            None => false,
        }
    }
}

impl Default for IgnoreRuleSet {
    fn default() -> Self {
        Self::empty()
    }
}
