//! End-to-end run: gitignore adoption, scan, filter, render, merges, and
//! tree output.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use tracing::{debug, info_span};

use crate::config::{Options, DEFAULT_DIR_MERGE_OUTPUT, DEFAULT_JOIN_OUTPUT, DEFAULT_TREE_OUTPUT};
use crate::error::{Error, Result};
use crate::events::EventSink;
use crate::filter;
use crate::ignore_rules::IgnoreRuleSet;
use crate::merge::MergeJob;
use crate::pattern;
use crate::prompt::{self, Prompter, Resolution};
use crate::tree::{self, Entry, TreeConfig};

/// How many `.gitignore` rules to preview before asking.
const GITIGNORE_PREVIEW: usize = 5;

/// Where a run stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunStatus {
    Completed,
    /// The scan found nothing (empty directory or everything ignored).
    EmptyScan,
    /// Filtering removed every entry.
    NothingMatched,
}

/// Result of a run that did not fail fatally.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunReport {
    pub status: RunStatus,
    /// Rendered tree; empty when the run stopped early.
    pub tree: String,
    /// The tree should be printed to the console.
    pub print_tree: bool,
    /// Files written, in order.
    pub written: Vec<PathBuf>,
    /// Sub-operations that failed without aborting the run.
    pub failures: usize,
}

impl RunReport {
    fn stopped(status: RunStatus) -> Self {
        Self {
            status,
            tree: String::new(),
            print_tree: false,
            written: Vec::new(),
            failures: 0,
        }
    }
}

/// Run the whole pipeline for `options`.
///
/// Fatal failures (missing root, unexpected I/O, a broken prompt) are
/// returned. An over-budget merge or an uncreatable output directory only
/// fails that output: it is reported, counted in
/// [`RunReport::failures`], and the run continues.
pub fn run(options: &Options, prompter: &dyn Prompter, sink: &dyn EventSink) -> Result<RunReport> {
    let _span = info_span!("run", root = %options.cwd.display()).entered();
    Pipeline {
        options,
        prompter,
        sink,
    }
    .run()
}

struct Pipeline<'a> {
    options: &'a Options,
    prompter: &'a dyn Prompter,
    sink: &'a dyn EventSink,
}

impl Pipeline<'_> {
    fn run(&self) -> Result<RunReport> {
        let options = self.options;
        let root = options.cwd.as_path();
        self.sink.success(&format!("scanning {}", root.display()));

        let mut ignore_lines = self.gitignore_rules(root)?;
        ignore_lines.extend(options.ignore_patterns.iter().cloned());
        let config = TreeConfig {
            max_depth: options.max_depth,
            ignore_hidden: options.ignore_hidden,
            ignore_rules: IgnoreRuleSet::new(&ignore_lines, self.sink),
        };

        let entries = tree::scan(root, &config, self.sink)?;
        if entries.is_empty() {
            self.sink.error("directory is empty or every entry was ignored");
            return Ok(RunReport::stopped(RunStatus::EmptyScan));
        }

        let entries = if options.filter.is_empty() {
            entries
        } else {
            let patterns = pattern::compile(&options.filter, self.sink);
            let pruned = filter::prune(entries, &patterns);
            if pruned.is_empty() {
                self.sink.error("no files or directories left after filtering");
                return Ok(RunReport::stopped(RunStatus::NothingMatched));
            }
            pruned
        };
        debug!(entries = tree::count_entries(&entries), "tree ready");

        let mut report = RunReport {
            status: RunStatus::Completed,
            tree: tree::render_tree(&entries, &root_label(root)),
            print_tree: false,
            written: Vec::new(),
            failures: 0,
        };

        let tree_output = match &options.output {
            Some(requested) => {
                self.resolve_output(DEFAULT_TREE_OUTPUT, Some(requested.as_path()))?
            }
            None => None,
        };
        let dir_merge_output = if options.merge_dirs.is_empty() {
            None
        } else {
            self.resolve_output(DEFAULT_DIR_MERGE_OUTPUT, options.output_dir_merge.as_deref())?
        };

        if options.join {
            self.join_selected(&entries, &mut report)?;
        }

        if let Some(dest) = dir_merge_output {
            self.merge_directories(&entries, &dest, &mut report)?;
        }

        if let Some(dest) = tree_output {
            self.sink.info("writing directory tree...");
            match write_output(&dest, report.tree.as_bytes()) {
                Ok(()) => {
                    let saved = format!("directory tree saved: {}", dest.display());
                    self.sink.success(&saved);
                    report.written.push(dest);
                }
                Err(e) => self.fail_or_propagate(e, &mut report)?,
            }
        } else if options.output.is_none() && !options.join && options.merge_dirs.is_empty() {
            report.print_tree = true;
        }

        Ok(report)
    }

    /// Read `<root>/.gitignore` and ask whether to apply it.
    fn gitignore_rules(&self, root: &Path) -> Result<Vec<String>> {
        let path = root.join(".gitignore");
        let text = match fs::read_to_string(&path) {
            Ok(text) => text,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => {
                self.sink.warning(&format!("cannot read {}: {e}", path.display()));
                return Ok(Vec::new());
            }
        };

        let rules = parse_gitignore(&text);
        if rules.is_empty() {
            return Ok(Vec::new());
        }

        self.sink.success("found .gitignore");
        self.sink.warning("applying it will ignore:");
        for rule in rules.iter().take(GITIGNORE_PREVIEW) {
            self.sink.warning(&format!("  - {rule}"));
        }
        if rules.len() > GITIGNORE_PREVIEW {
            self.sink.warning(&format!(
                "  ... and {} more rule(s)",
                rules.len() - GITIGNORE_PREVIEW
            ));
        }

        if self.prompter.confirm_apply(&rules).map_err(Error::Prompt)? {
            Ok(rules)
        } else {
            Ok(Vec::new())
        }
    }

    /// Resolve an output path; `None` means the user cancelled it.
    fn resolve_output(&self, default: &str, requested: Option<&Path>) -> Result<Option<PathBuf>> {
        match prompt::resolve_conflict(self.prompter, Path::new(default), requested, self.sink)? {
            Resolution::Path(path) => Ok(Some(path)),
            Resolution::Cancelled => {
                self.sink.info("operation cancelled");
                Ok(None)
            }
        }
    }

    fn join_selected(&self, entries: &[Entry], report: &mut RunReport) -> Result<()> {
        let candidates = tree::collect_files(entries);
        if candidates.is_empty() {
            self.sink.error("no files available to select");
            return Ok(());
        }

        let selected = self
            .prompter
            .select_subset(&candidates)
            .map_err(Error::Prompt)?;
        if selected.is_empty() {
            return Ok(());
        }

        let requested = self.options.output_merged.as_deref();
        let Some(dest) = self.resolve_output(DEFAULT_JOIN_OUTPUT, requested)? else {
            return Ok(());
        };
        self.merge(selected, &dest, "merge complete", report)
    }

    fn merge_directories(
        &self,
        entries: &[Entry],
        dest: &Path,
        report: &mut RunReport,
    ) -> Result<()> {
        self.sink.info("collecting directory files...");
        let files = tree::collect_dir_files(entries, &self.options.merge_dirs);
        if files.is_empty() {
            self.sink.warning(&format!(
                "no files found in {}",
                self.options.merge_dirs.join(", ")
            ));
            return Ok(());
        }
        self.merge(files, dest, "directory merge complete", report)
    }

    fn merge(
        &self,
        sources: Vec<PathBuf>,
        dest: &Path,
        done: &str,
        report: &mut RunReport,
    ) -> Result<()> {
        self.sink.info(&format!("merging {} file(s)...", sources.len()));
        let result = ensure_parent_dir(dest).and_then(|()| MergeJob::new(sources, dest).run());
        match result {
            Ok(stats) => {
                debug!(files = stats.files, bytes = stats.bytes_written, "merge written");
                self.sink.success(&format!("{done}: {}", dest.display()));
                report.written.push(dest.to_path_buf());
                Ok(())
            }
            Err(e) => self.fail_or_propagate(e, report),
        }
    }

    /// Validation-class failures fail only the current output.
    fn fail_or_propagate(&self, err: Error, report: &mut RunReport) -> Result<()> {
        match err {
            Error::SizeLimit { .. } | Error::CreateDir { .. } => {
                self.sink.error(&error_chain(&err));
                report.failures += 1;
                Ok(())
            }
            other => Err(other),
        }
    }
}

/// Rule lines of a `.gitignore`: trimmed, without blanks and comments.
pub fn parse_gitignore(text: &str) -> Vec<String> {
    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .map(str::to_string)
        .collect()
}

/// First line of the rendered tree: the root directory's base name.
fn root_label(root: &Path) -> String {
    root.canonicalize()
        .ok()
        .and_then(|p| p.file_name().map(|n| n.to_string_lossy().into_owned()))
        .unwrap_or_else(|| root.display().to_string())
}

fn ensure_parent_dir(path: &Path) -> Result<()> {
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => {
            fs::create_dir_all(parent).map_err(|source| Error::CreateDir {
                path: parent.to_path_buf(),
                source,
            })
        }
        _ => Ok(()),
    }
}

fn write_output(path: &Path, contents: &[u8]) -> Result<()> {
    ensure_parent_dir(path)?;
    fs::write(path, contents).map_err(|e| Error::io(path, e))
}

fn error_chain(err: &Error) -> String {
    match std::error::Error::source(err) {
        Some(source) => format!("{err}: {source}"),
        None => err.to_string(),
    }
}
