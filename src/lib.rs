#![forbid(unsafe_code)]
//! ls-tree: directory tree snapshots with pattern filtering and
//! multi-file merging.

pub mod app;
pub mod cli;
pub mod config;
pub mod error;
pub mod events;
pub mod filter;
pub mod ignore_rules;
pub mod merge;
pub mod pattern;
pub mod probe;
pub mod prompt;
pub mod terminal;
pub mod tree;

pub use error::{Error, Result};
