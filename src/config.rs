//! Run options: the `.tbrc.json` config layer, CLI layer, and their
//! resolution into one immutable [`Options`].
//!
//! | field            | policy                                  | default                 |
//! |------------------|-----------------------------------------|-------------------------|
//! | `cwd`            | last writer wins (defaults < file < CLI) | `.`                     |
//! | `depth`          | last writer wins; negative = unbounded  | unbounded               |
//! | `ignore_hidden`  | last writer wins                        | `true`                  |
//! | `output`         | last writer wins                        | none (print to console) |
//! | `join`           | last writer wins                        | `false`                 |
//! | `output_merged`  | last writer wins                        | `ls-tree-merged.txt`    |
//! | `output_dir_merge` | last writer wins; `.tb` suffix if taken | `ls-tree-merge-dir.txt` |
//! | `filter`         | concatenated, file entries first        | empty                   |
//! | `merge_dir`      | concatenated, file entries first        | empty                   |
//! | `ignore_patterns`| concatenated, file entries first        | empty                   |

use serde::Deserialize;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use crate::events::EventSink;

/// Name of the per-directory config file.
pub const CONFIG_FILE_NAME: &str = ".tbrc.json";

/// Default tree output when `-o` is given without a path.
pub const DEFAULT_TREE_OUTPUT: &str = "ls-tree.txt";

/// Default output of the interactive file merge.
pub const DEFAULT_JOIN_OUTPUT: &str = "ls-tree-merged.txt";

/// Default output of the directory merge.
pub const DEFAULT_DIR_MERGE_OUTPUT: &str = "ls-tree-merge-dir.txt";

/// Suffix appended to the directory-merge output when it already exists.
pub const COLLISION_SUFFIX: &str = ".tb";

/// One source of option values. Absent scalars defer to lower layers.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct OptionLayer {
    pub cwd: Option<PathBuf>,
    pub filter: Vec<String>,
    pub output: Option<PathBuf>,
    pub output_merged: Option<PathBuf>,
    pub join: Option<bool>,
    pub output_dir_merge: Option<PathBuf>,
    pub merge_dir: Vec<String>,
    pub depth: Option<i64>,
    pub ignore_hidden: Option<bool>,
    pub ignore_patterns: Vec<String>,
}

/// Fully resolved options for one run.
#[derive(Debug, Clone, PartialEq)]
pub struct Options {
    pub cwd: PathBuf,
    /// Deepest listed depth; `None` is unbounded.
    pub max_depth: Option<usize>,
    pub ignore_hidden: bool,
    pub filter: Vec<String>,
    pub ignore_patterns: Vec<String>,
    /// Tree output file; `None` prints to the console.
    pub output: Option<PathBuf>,
    pub join: bool,
    pub output_merged: Option<PathBuf>,
    pub merge_dirs: Vec<String>,
    pub output_dir_merge: Option<PathBuf>,
}

impl Default for Options {
    fn default() -> Self {
        Options::resolve(OptionLayer::default(), OptionLayer::default())
    }
}

impl Options {
    /// Layer `cli` over `config` over the defaults.
    ///
    /// When merge directories are requested the directory-merge output is
    /// always set; if that path already exists it gets [`COLLISION_SUFFIX`].
    pub fn resolve(config: OptionLayer, cli: OptionLayer) -> Options {
        let merge_dirs = concat(config.merge_dir, cli.merge_dir);
        let output_dir_merge = if merge_dirs.is_empty() {
            None
        } else {
            let chosen = cli
                .output_dir_merge
                .or(config.output_dir_merge)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_DIR_MERGE_OUTPUT));
            Some(with_collision_suffix(chosen))
        };

        Options {
            cwd: cli
                .cwd
                .or(config.cwd)
                .unwrap_or_else(|| PathBuf::from(".")),
            max_depth: depth_limit(cli.depth.or(config.depth).unwrap_or(-1)),
            ignore_hidden: cli.ignore_hidden.or(config.ignore_hidden).unwrap_or(true),
            filter: concat(config.filter, cli.filter),
            ignore_patterns: concat(config.ignore_patterns, cli.ignore_patterns),
            output: cli.output.or(config.output),
            join: cli.join.or(config.join).unwrap_or(false),
            output_merged: cli.output_merged.or(config.output_merged),
            merge_dirs,
            output_dir_merge,
        }
    }
}

/// Convert the `-1 = unbounded` depth convention.
pub fn depth_limit(depth: i64) -> Option<usize> {
    usize::try_from(depth).ok()
}

fn concat(mut first: Vec<String>, second: Vec<String>) -> Vec<String> {
    first.extend(second);
    first
}

fn with_collision_suffix(path: PathBuf) -> PathBuf {
    if path.exists() {
        let mut taken = path.into_os_string();
        taken.push(COLLISION_SUFFIX);
        PathBuf::from(taken)
    } else {
        path
    }
}

/// Load `.tbrc.json` from `dir`.
///
/// A missing file is an empty layer. An unreadable or malformed file is
/// also an empty layer, with a warning.
pub fn load_config_file(dir: &Path, sink: &dyn EventSink) -> OptionLayer {
    let path = dir.join(CONFIG_FILE_NAME);
    let text = match fs::read_to_string(&path) {
        Ok(text) => text,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return OptionLayer::default(),
        Err(e) => {
            sink.warning(&format!("cannot read {}: {e}", path.display()));
            return OptionLayer::default();
        }
    };
    match serde_json::from_str(&text) {
        Ok(layer) => layer,
        Err(e) => {
            sink.warning(&format!("ignoring invalid {}: {e}", path.display()));
            OptionLayer::default()
        }
    }
}
