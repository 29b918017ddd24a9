#![forbid(unsafe_code)]

//! Writes ls-tree shell completions and its man page.
//!
//! Usage: `generate-assets [OUT_DIR]` (default `dist`).

use clap::CommandFactory;
use clap_complete::{generate_to, Shell};
use clap_mangen::Man;
use ls_tree::cli::Args;
use std::fs;
use std::path::{Path, PathBuf};

const BIN_NAME: &str = "ls-tree";
const SHELLS: [Shell; 4] = [Shell::Bash, Shell::Zsh, Shell::Fish, Shell::PowerShell];

fn main() -> anyhow::Result<()> {
    let out_dir = std::env::args_os()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("dist"));

    let completions = write_completions(&out_dir.join("completions"))?;
    let man_page = write_man_page(&out_dir.join("man"))?;

    for path in &completions {
        eprintln!("ls-tree: wrote completion {}", path.display());
    }
    eprintln!("ls-tree: wrote man page {}", man_page.display());
    Ok(())
}

fn write_completions(dir: &Path) -> anyhow::Result<Vec<PathBuf>> {
    fs::create_dir_all(dir)?;
    let mut written = Vec::with_capacity(SHELLS.len());
    for shell in SHELLS {
        let mut cmd = Args::command();
        written.push(generate_to(shell, &mut cmd, BIN_NAME, dir)?);
    }
    Ok(written)
}

fn write_man_page(dir: &Path) -> anyhow::Result<PathBuf> {
    fs::create_dir_all(dir)?;
    let mut buffer = Vec::new();
    Man::new(Args::command()).render(&mut buffer)?;
    let path = dir.join(format!("{BIN_NAME}.1"));
    fs::write(&path, buffer)?;
    Ok(path)
}
