use clap::{ArgAction, Parser};
use std::ffi::OsString;
use std::path::PathBuf;

use crate::config::{OptionLayer, DEFAULT_DIR_MERGE_OUTPUT, DEFAULT_TREE_OUTPUT};

const EXAMPLES: &str = "\
Examples:
  ls-tree                              Print the current directory tree
  ls-tree -o tree.txt                  Save the tree to a file
  ls-tree -f \"node_modules|.git\"       Filter out matching paths
  ls-tree -f '/\\.test\\.ts$/'           Filter with a regular expression
  ls-tree -j                           Pick files interactively and merge them
  ls-tree -m src -o src.txt            Merge every file under src/
  ls-tree -d 2                         Limit the depth to 2 levels
  ls-tree /path/to/dir                 Scan another directory";

#[derive(Parser, Debug, Clone)]
#[command(
    name = "ls-tree",
    version,
    disable_version_flag = true,
    about = "Directory tree snapshots with filtering and file merging",
    after_help = EXAMPLES
)]
pub struct Args {
    /// Directory to scan (default: current directory)
    pub path: Option<PathBuf>,

    /// Filter patterns: name, glob (*.log) or regex (/re/); `|`-separated, repeatable
    #[arg(
        short = 'f',
        long = "filter",
        num_args = 1..,
        value_delimiter = '|',
        action = ArgAction::Append
    )]
    pub filter: Vec<String>,

    /// Write the tree to a file (default name: ls-tree.txt)
    #[arg(short = 'o', long = "output", value_name = "PATH")]
    pub output: Option<Option<PathBuf>>,

    /// Pick files interactively and merge them (default output: ls-tree-merged.txt)
    #[arg(short = 'j', long = "join", value_name = "PATH")]
    pub join: Option<Option<PathBuf>>,

    /// Merge every file under these directories; `|`-separated, follow with -o to name the output
    #[arg(
        short = 'm',
        long = "merge",
        value_name = "DIR",
        num_args = 1..,
        value_delimiter = '|',
        action = ArgAction::Append
    )]
    pub merge: Vec<String>,

    /// Max depth (-1 for unlimited)
    #[arg(short = 'd', long = "depth", value_name = "N", allow_hyphen_values = true)]
    pub depth: Option<String>,

    /// Skip hidden files and directories (default)
    #[arg(long = "no-hidden", overrides_with = "show_hidden")]
    pub no_hidden: bool,

    /// Include hidden files and directories
    #[arg(long = "show-hidden", overrides_with = "no_hidden")]
    pub show_hidden: bool,

    /// Disable colored output
    #[arg(long = "no-color")]
    pub no_color: bool,

    /// Print version
    #[arg(short = 'v', long = "version", action = ArgAction::Version)]
    version: Option<bool>,

    /// `-o` appeared after `-m` on the command line.
    #[arg(skip)]
    pub output_follows_merge: bool,
}

impl Args {
    /// Parse the process arguments.
    pub fn parse_args() -> Self {
        Self::parse_from_args(std::env::args_os())
    }

    /// Parse `argv` (including the program name), recording whether `-o`
    /// targets the directory merge.
    pub fn parse_from_args<I, T>(argv: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<OsString>,
    {
        let argv: Vec<OsString> = argv.into_iter().map(Into::into).collect();
        let mut args = Self::parse_from(argv.clone());
        args.output_follows_merge = output_follows_merge(&argv);
        args
    }

    /// Enforce invariants after parsing.
    pub fn validated(mut self) -> Self {
        self.filter = clean_list(self.filter);
        self.merge = clean_list(self.merge);
        // Respect NO_COLOR env var
        if std::env::var_os("NO_COLOR").is_some() {
            self.no_color = true;
        }
        self
    }

    /// The CLI's contribution to option resolution.
    pub fn into_layer(self) -> OptionLayer {
        let mut layer = OptionLayer {
            cwd: self.path,
            filter: self.filter,
            merge_dir: self.merge,
            depth: self.depth.map(|d| parse_depth(&d)),
            ignore_hidden: if self.show_hidden {
                Some(false)
            } else if self.no_hidden {
                Some(true)
            } else {
                None
            },
            join: self.join.as_ref().map(|_| true),
            output_merged: self.join.flatten(),
            ..OptionLayer::default()
        };

        match self.output {
            Some(path) if self.output_follows_merge => {
                layer.output_dir_merge =
                    Some(path.unwrap_or_else(|| PathBuf::from(DEFAULT_DIR_MERGE_OUTPUT)));
            }
            Some(path) => {
                layer.output = Some(path.unwrap_or_else(|| PathBuf::from(DEFAULT_TREE_OUTPUT)));
            }
            None => {}
        }
        layer
    }
}

/// Read the leading integer (`3.5` is 3, `2abc` is 2). Anything without
/// leading digits silently means unbounded.
fn parse_depth(raw: &str) -> i64 {
    let raw = raw.trim();
    let (negative, rest) = match raw.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, raw.strip_prefix('+').unwrap_or(raw)),
    };
    let digits_end = rest
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(rest.len());
    match rest[..digits_end].parse::<i64>() {
        Ok(n) if negative => -n,
        Ok(n) => n,
        Err(_) => -1,
    }
}

fn clean_list(items: Vec<String>) -> Vec<String> {
    items
        .into_iter()
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}

fn output_follows_merge(argv: &[OsString]) -> bool {
    let mut merge_at = None;
    let mut output_at = None;
    for (i, arg) in argv.iter().enumerate().skip(1) {
        let arg = arg.to_string_lossy();
        if arg == "--" {
            break;
        }
        if is_flag(&arg, "-m", "--merge") && merge_at.is_none() {
            merge_at = Some(i);
        }
        if is_flag(&arg, "-o", "--output") {
            output_at = Some(i);
        }
    }
    matches!((merge_at, output_at), (Some(m), Some(o)) if o > m)
}

fn is_flag(arg: &str, short: &str, long: &str) -> bool {
    arg == long
        || arg.starts_with(&format!("{long}="))
        || (arg.starts_with(short) && !arg.starts_with("--"))
}
