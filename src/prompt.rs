//! Decisions the pipeline needs from the user: whether to adopt
//! `.gitignore` rules, which files to merge, and what to do when an output
//! path already exists.

use dialoguer::{Confirm, MultiSelect, Select};
use std::io::{self, IsTerminal};
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};
use crate::events::EventSink;
use crate::tree::Entry;

/// What to do with an output path that already exists.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConflictAction {
    Overwrite,
    Rename,
    Cancel,
}

/// Outcome of resolving an output path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    /// Write here.
    Path(PathBuf),
    /// The user declined; skip this output.
    Cancelled,
}

/// Source of user decisions.
pub trait Prompter {
    /// Whether to apply the given `.gitignore` rules to the scan.
    fn confirm_apply(&self, rules: &[String]) -> io::Result<bool>;

    /// Choose which candidate files to merge. An empty result means "none".
    fn select_subset(&self, candidates: &[&Entry]) -> io::Result<Vec<PathBuf>>;

    /// Decide what to do about an existing output file.
    fn on_conflict(&self, existing: &Path) -> io::Result<ConflictAction>;
}

/// Pick the final path for an output file.
///
/// Uses `requested` when given, else `default`. When that path exists the
/// prompter decides: overwrite keeps it, rename picks the first free
/// `<stem>.<n><.ext>` beside it, cancel yields [`Resolution::Cancelled`].
pub fn resolve_conflict(
    prompter: &dyn Prompter,
    default: &Path,
    requested: Option<&Path>,
    sink: &dyn EventSink,
) -> Result<Resolution> {
    let path = requested.unwrap_or(default);
    if !path.exists() {
        return Ok(Resolution::Path(path.to_path_buf()));
    }

    match prompter.on_conflict(path).map_err(Error::Prompt)? {
        ConflictAction::Overwrite => Ok(Resolution::Path(path.to_path_buf())),
        ConflictAction::Cancel => Ok(Resolution::Cancelled),
        ConflictAction::Rename => {
            let renamed = next_available_path(path);
            let shown = renamed
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_else(|| renamed.display().to_string());
            sink.info(&format!("file will be saved as {shown}"));
            Ok(Resolution::Path(renamed))
        }
    }
}

/// First `<stem>.<n><.ext>` (n = 1, 2, ...) beside `path` that does not exist.
pub fn next_available_path(path: &Path) -> PathBuf {
    let dir = path.parent().unwrap_or_else(|| Path::new(""));
    let stem = path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    let ext = path
        .extension()
        .map(|e| format!(".{}", e.to_string_lossy()))
        .unwrap_or_default();

    (1u64..)
        .map(|n| dir.join(format!("{stem}.{n}{ext}")))
        .find(|candidate| !candidate.exists())
        .unwrap_or_else(|| path.to_path_buf())
}

/// Human-readable size: `0 B`, `512.0 B`, `1.5 KB`, ... up to `TB`.
pub fn format_file_size(bytes: u64) -> String {
    const UNITS: [&str; 5] = ["B", "KB", "MB", "GB", "TB"];
    if bytes == 0 {
        return "0 B".to_string();
    }
    let mut size = bytes as f64;
    let mut unit = 0;
    while size >= 1024.0 && unit < UNITS.len() - 1 {
        size /= 1024.0;
        unit += 1;
    }
    format!("{size:.1} {}", UNITS[unit])
}

/// Which files a [`ScriptedPrompter`] selects.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Selection {
    Nothing,
    All,
    Paths(Vec<PathBuf>),
}

/// Answers every decision from fixed values without prompting.
#[derive(Debug, Clone)]
pub struct ScriptedPrompter {
    pub apply_gitignore: bool,
    pub selection: Selection,
    pub conflict: ConflictAction,
}

impl ScriptedPrompter {
    /// The answers an interactive user gets by pressing enter everywhere:
    /// keep `.gitignore` off, select nothing, rename on conflict.
    pub fn defaults() -> Self {
        Self {
            apply_gitignore: false,
            selection: Selection::Nothing,
            conflict: ConflictAction::Rename,
        }
    }
}

impl Prompter for ScriptedPrompter {
    fn confirm_apply(&self, _rules: &[String]) -> io::Result<bool> {
        Ok(self.apply_gitignore)
    }

    fn select_subset(&self, candidates: &[&Entry]) -> io::Result<Vec<PathBuf>> {
        Ok(match &self.selection {
            Selection::Nothing => Vec::new(),
            Selection::All => candidates.iter().map(|e| e.path.clone()).collect(),
            Selection::Paths(paths) => paths.clone(),
        })
    }

    fn on_conflict(&self, _existing: &Path) -> io::Result<ConflictAction> {
        Ok(self.conflict)
    }
}

/// Prompts on the terminal with dialoguer. Without a terminal on stdin it
/// answers with [`ScriptedPrompter::defaults`].
pub struct TerminalPrompter {
    interactive: bool,
}

impl TerminalPrompter {
    pub fn new() -> Self {
        Self {
            interactive: io::stdin().is_terminal(),
        }
    }
}

impl Default for TerminalPrompter {
    fn default() -> Self {
        Self::new()
    }
}

fn prompt_error(e: dialoguer::Error) -> io::Error {
    io::Error::other(e.to_string())
}

impl Prompter for TerminalPrompter {
    fn confirm_apply(&self, rules: &[String]) -> io::Result<bool> {
        if !self.interactive {
            return ScriptedPrompter::defaults().confirm_apply(rules);
        }
        Confirm::new()
            .with_prompt("Apply .gitignore rules?")
            .default(false)
            .interact()
            .map_err(prompt_error)
    }

    fn select_subset(&self, candidates: &[&Entry]) -> io::Result<Vec<PathBuf>> {
        if !self.interactive || candidates.is_empty() {
            return ScriptedPrompter::defaults().select_subset(candidates);
        }
        let labels: Vec<String> = candidates
            .iter()
            .map(|e| format!("{} ({})", e.relative_path, format_file_size(e.size)))
            .collect();
        let chosen = MultiSelect::new()
            .with_prompt("Select files to merge (space to toggle, enter to confirm)")
            .items(&labels[..])
            .interact()
            .map_err(prompt_error)?;
        Ok(chosen
            .into_iter()
            .map(|i| candidates[i].path.clone())
            .collect())
    }

    fn on_conflict(&self, existing: &Path) -> io::Result<ConflictAction> {
        if !self.interactive {
            return ScriptedPrompter::defaults().on_conflict(existing);
        }
        let name = existing
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| existing.display().to_string());
        let choice = Select::new()
            .with_prompt(format!("File \"{name}\" already exists, what now?"))
            .items(&["Overwrite", "Rename (e.g. ls-tree.1.txt)", "Cancel"])
            .default(1)
            .interact()
            .map_err(prompt_error)?;
        Ok(match choice {
            0 => ConflictAction::Overwrite,
            1 => ConflictAction::Rename,
            _ => ConflictAction::Cancel,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::{Level, MemorySink, NullSink};
    use std::fs;
    use tempfile::TempDir;

    fn answering(conflict: ConflictAction) -> ScriptedPrompter {
        ScriptedPrompter {
            conflict,
            ..ScriptedPrompter::defaults()
        }
    }

    #[test]
    fn file_sizes() {
        assert_eq!(format_file_size(0), "0 B");
        assert_eq!(format_file_size(512), "512.0 B");
        assert_eq!(format_file_size(1536), "1.5 KB");
        assert_eq!(format_file_size(5 * 1024 * 1024), "5.0 MB");
        assert_eq!(format_file_size(u64::MAX), "16777216.0 TB");
    }

    #[test]
    fn free_path_is_used_as_is() {
        let tmp = TempDir::new().unwrap();
        let wanted = tmp.path().join("tree.txt");
        let res = resolve_conflict(
            &answering(ConflictAction::Cancel),
            Path::new("ls-tree.txt"),
            Some(&wanted),
            &NullSink,
        )
        .unwrap();
        assert_eq!(res, Resolution::Path(wanted));
    }

    #[test]
    fn default_used_when_nothing_requested() {
        let tmp = TempDir::new().unwrap();
        let default = tmp.path().join("ls-tree.txt");
        let res = resolve_conflict(&ScriptedPrompter::defaults(), &default, None, &NullSink)
            .unwrap();
        assert_eq!(res, Resolution::Path(default));
    }

    #[test]
    fn existing_path_overwrite_and_cancel() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("out.txt");
        fs::write(&path, "old").unwrap();

        let res = resolve_conflict(&answering(ConflictAction::Overwrite), &path, None, &NullSink)
            .unwrap();
        assert_eq!(res, Resolution::Path(path.clone()));

        let res = resolve_conflict(&answering(ConflictAction::Cancel), &path, None, &NullSink)
            .unwrap();
        assert_eq!(res, Resolution::Cancelled);
    }

    #[test]
    fn rename_skips_taken_numbers() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("ls-tree.txt");
        fs::write(&path, "").unwrap();
        fs::write(tmp.path().join("ls-tree.1.txt"), "").unwrap();

        let sink = MemorySink::new();
        let res = resolve_conflict(&answering(ConflictAction::Rename), &path, None, &sink)
            .unwrap();
        assert_eq!(res, Resolution::Path(tmp.path().join("ls-tree.2.txt")));
        assert_eq!(
            sink.messages(Level::Info),
            vec!["file will be saved as ls-tree.2.txt"]
        );
    }

    #[test]
    fn rename_without_extension() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("notes");
        fs::write(&path, "").unwrap();
        assert_eq!(next_available_path(&path), tmp.path().join("notes.1"));
    }
}
