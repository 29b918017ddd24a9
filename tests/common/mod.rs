#![allow(dead_code)]

use ls_tree::config::Options;
use ls_tree::ignore_rules::IgnoreRuleSet;
use ls_tree::tree::TreeConfig;
use std::fs;
use std::path::Path;
use tempfile::TempDir;
use tracing_subscriber::EnvFilter;

/// Route library tracing to the test output.
///
/// Run with `RUST_LOG=ls_tree=trace cargo test -- --nocapture` to see it.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_test_writer()
        .with_target(false)
        .try_init();
}

/// Scan config with the CLI defaults: unbounded, hidden entries skipped.
pub fn default_tree_config() -> TreeConfig {
    TreeConfig {
        max_depth: None,
        ignore_hidden: true,
        ignore_rules: IgnoreRuleSet::empty(),
    }
}

/// Options rooted at `root` with every output off.
pub fn options_for(root: &Path) -> Options {
    Options {
        cwd: root.to_path_buf(),
        ..Options::default()
    }
}

/// Create a directory structure from a list of relative paths.
/// Paths ending with '/' create directories; others create empty files.
pub fn create_fixture(paths: &[&str]) -> TempDir {
    let tmp = TempDir::new().unwrap();
    for p in paths {
        let full = tmp.path().join(p);
        if p.ends_with('/') {
            fs::create_dir_all(&full).unwrap();
        } else {
            write_file(tmp.path(), p, "");
        }
    }
    tmp
}

/// Write `contents` to `root/relative`, creating parent directories.
pub fn write_file(root: &Path, relative: &str, contents: &str) {
    let full = root.join(relative);
    if let Some(parent) = full.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    fs::write(&full, contents).unwrap();
}

/// A small project: `src/` with two files, a README, and a hidden `.git/`.
pub fn create_project() -> TempDir {
    let tmp = TempDir::new().unwrap();
    write_file(tmp.path(), "src/index.ts", "export {};\n");
    write_file(tmp.path(), "src/util.ts", "export const x = 1;\n");
    write_file(tmp.path(), "README.md", "# demo\n");
    write_file(tmp.path(), ".git/HEAD", "ref: refs/heads/main\n");
    tmp
}

/// Whether the current process can read files regardless of permissions.
#[cfg(unix)]
pub fn running_privileged() -> bool {
    let probe = TempDir::new().unwrap();
    let locked = probe.path().join("locked");
    fs::create_dir(&locked).unwrap();
    set_mode(&locked, 0o000);
    let readable = fs::read_dir(&locked).is_ok();
    set_mode(&locked, 0o755);
    readable
}

#[cfg(unix)]
pub fn set_mode(path: &Path, mode: u32) {
    use std::os::unix::fs::PermissionsExt;
    fs::set_permissions(path, fs::Permissions::from_mode(mode)).unwrap();
}
