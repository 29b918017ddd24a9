#![forbid(unsafe_code)]

use anyhow::{Context, Result};
use ls_tree::app;
use ls_tree::cli::Args;
use ls_tree::config::{self, Options};
use ls_tree::events::ConsoleSink;
use ls_tree::prompt::TerminalPrompter;
use ls_tree::terminal;
use std::io;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

fn main() {
    match run_app() {
        Ok(code) => std::process::exit(code),
        Err(e) => {
            report_error(&e);
            std::process::exit(1);
        }
    }
}

fn run_app() -> Result<i32> {
    let args = Args::parse_args().validated();
    init_tracing();
    terminal::install_panic_hook();
    if let Err(e) = terminal::install_interrupt_handler() {
        tracing::warn!(error = %e, "failed to install Ctrl-C handler");
    }

    let sink = ConsoleSink::new(!args.no_color);

    // The config file lives in the directory being scanned.
    let config_dir = args.path.clone().unwrap_or_else(|| PathBuf::from("."));
    let file_layer = config::load_config_file(&config_dir, &sink);
    let options = Options::resolve(file_layer, args.into_layer());

    let root = options
        .cwd
        .canonicalize()
        .with_context(|| format!("{}: failed to resolve path", options.cwd.display()))?;
    anyhow::ensure!(root.is_dir(), "{}: Not a directory", root.display());
    let options = Options {
        cwd: root,
        ..options
    };
    tracing::debug!(?options, "resolved options");

    let report = app::run(&options, &TerminalPrompter::new(), &sink)?;
    if report.print_tree {
        println!("{}", report.tree);
    }

    Ok(if report.failures > 0 { 1 } else { 0 })
}

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(io::stderr)
        .with_target(false)
        .try_init();
}

/// Print the error chain, plus a hint for the two common filesystem causes.
fn report_error(err: &anyhow::Error) {
    eprintln!("ls-tree: {err:#}");
    if let Some(hint) = error_hint(err) {
        eprintln!("ls-tree: {hint}");
    }
}

fn error_hint(err: &anyhow::Error) -> Option<&'static str> {
    let kind = err
        .chain()
        .find_map(|cause| cause.downcast_ref::<io::Error>())
        .map(io::Error::kind)?;
    match kind {
        io::ErrorKind::NotFound => Some("path does not exist"),
        io::ErrorKind::PermissionDenied => Some("permission denied"),
        _ => None,
    }
}
