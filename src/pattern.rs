//! User filter patterns: classification and path matching.
//!
//! A raw pattern is classified as
//! - `regex` when wrapped in slashes (`/expr/`),
//! - `glob` when it contains `*` or `?`,
//! - `exact` otherwise.
//!
//! Exact and glob patterns are tested against the whole path, against each
//! segment, and against each leading sub-path, so a bare directory name such
//! as `node_modules` excludes that directory wherever it occurs. That
//! breadth is intentional and can match more than a reader expects.
//!
//! A glob wildcard never matches a leading `.` in a segment unless the
//! pattern itself spells the dot: `*` keeps `.env`, `.*` removes it.

use globset::{GlobBuilder, GlobMatcher};
use regex::Regex;

use crate::events::EventSink;

/// A compiled filter pattern.
#[derive(Debug, Clone)]
pub enum Pattern {
    Exact(String),
    Glob {
        text: String,
        matcher: GlobMatcher,
        /// Some pattern segment starts with `.`, so dot-segments may match.
        dot: bool,
    },
    Regex(Regex),
}

impl Pattern {
    /// Classify and compile one raw pattern.
    ///
    /// Invalid regex or glob syntax degrades to an exact pattern on the
    /// literal text and emits a warning.
    pub fn compile(raw: &str, sink: &dyn EventSink) -> Pattern {
        if raw.len() >= 2 && raw.starts_with('/') && raw.ends_with('/') {
            let inner = &raw[1..raw.len() - 1];
            return match Regex::new(inner) {
                Ok(re) => Pattern::Regex(re),
                Err(e) => {
                    sink.warning(&format!(
                        "invalid regular expression {raw}, using exact match: {e}"
                    ));
                    Pattern::Exact(strip_dot_slash(raw).to_string())
                }
            };
        }

        let text = strip_dot_slash(raw);
        if text.contains('*') || text.contains('?') {
            let built = GlobBuilder::new(text).literal_separator(true).build();
            return match built {
                Ok(glob) => Pattern::Glob {
                    text: text.to_string(),
                    matcher: glob.compile_matcher(),
                    dot: text.split('/').any(|seg| seg.starts_with('.')),
                },
                Err(e) => {
                    sink.warning(&format!(
                        "invalid glob pattern {raw}, using exact match: {e}"
                    ));
                    Pattern::Exact(text.to_string())
                }
            };
        }

        Pattern::Exact(text.to_string())
    }

    /// Test one normalized path against this pattern.
    fn is_match(&self, path: &str, segments: &[&str]) -> bool {
        match self {
            Pattern::Exact(text) => {
                path == text.as_str()
                    || segments.iter().any(|seg| *seg == text.as_str())
                    || path
                        .strip_prefix(text.as_str())
                        .is_some_and(|rest| rest.starts_with('/'))
            }
            Pattern::Glob { matcher, dot, .. } => {
                let glob_match = |candidate: &str| {
                    (*dot || !candidate.split('/').any(|seg| seg.starts_with('.')))
                        && matcher.is_match(candidate)
                };
                glob_match(path)
                    || segments.iter().any(|&seg| glob_match(seg))
                    || (1..=segments.len()).any(|n| glob_match(segments[..n].join("/").as_str()))
            }
            Pattern::Regex(re) => re.is_match(path),
        }
    }

    /// The literal text this pattern was compiled from (after `./` stripping).
    pub fn text(&self) -> &str {
        match self {
            Pattern::Exact(text) | Pattern::Glob { text, .. } => text,
            Pattern::Regex(re) => re.as_str(),
        }
    }
}

/// Compile a list of raw patterns, preserving order.
pub fn compile<S: AsRef<str>>(raw: &[S], sink: &dyn EventSink) -> Vec<Pattern> {
    raw.iter()
        .map(|p| Pattern::compile(p.as_ref(), sink))
        .collect()
}

/// Whether `relative_path` matches any of `patterns`.
pub fn matches(patterns: &[Pattern], relative_path: &str) -> bool {
    if patterns.is_empty() {
        return false;
    }
    let normalized = normalize(relative_path);
    let segments: Vec<&str> = normalized.split('/').collect();
    patterns.iter().any(|p| p.is_match(&normalized, &segments))
}

/// Convert backslashes to forward slashes.
pub fn normalize(path: &str) -> String {
    path.replace('\\', "/")
}

fn strip_dot_slash(raw: &str) -> &str {
    raw.strip_prefix("./").unwrap_or(raw)
}
