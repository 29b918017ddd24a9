//! Fault-tolerant wrappers around directory listing and stat.

use std::fs;
use std::io;
use std::path::Path;
use walkdir::WalkDir;

use crate::error::{Error, Result};
use crate::events::EventSink;

/// One immediate child of a listed directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Listed {
    pub name: String,
    /// File type as reported by the listing itself (symlinks not followed).
    pub is_dir: bool,
}

/// Metadata needed to build an entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FileStat {
    pub is_dir: bool,
    pub is_file: bool,
    pub size: u64,
}

/// List the immediate children of `dir` in the order the OS returns them.
///
/// Permission-denied yields an empty listing and a warning event; any other
/// failure is returned.
pub fn list_directory(dir: &Path, sink: &dyn EventSink) -> Result<Vec<Listed>> {
    let mut listed = Vec::new();
    let walker = WalkDir::new(dir)
        .min_depth(1)
        .max_depth(1)
        .follow_links(false);

    for item in walker {
        match item {
            Ok(entry) => listed.push(Listed {
                name: entry.file_name().to_string_lossy().into_owned(),
                is_dir: entry.file_type().is_dir(),
            }),
            Err(err) => {
                let denied = err
                    .io_error()
                    .is_some_and(|e| e.kind() == io::ErrorKind::PermissionDenied);
                if denied {
                    sink.warning(&format!("no permission to read directory {}", dir.display()));
                    return Ok(Vec::new());
                }
                let path = err.path().unwrap_or(dir).to_path_buf();
                let source = err
                    .into_io_error()
                    .unwrap_or_else(|| io::Error::other("filesystem loop detected"));
                return Err(Error::io(path, source));
            }
        }
    }

    Ok(listed)
}

/// Stat `path`, following symlinks.
///
/// Returns `None` when the path has disappeared, and `None` plus a warning
/// on any other failure, so one unreadable file never aborts a scan.
pub fn stat(path: &Path, sink: &dyn EventSink) -> Option<FileStat> {
    match fs::metadata(path) {
        Ok(meta) => Some(FileStat {
            is_dir: meta.is_dir(),
            is_file: meta.is_file(),
            size: if meta.is_dir() { 0 } else { meta.len() },
        }),
        Err(e) if e.kind() == io::ErrorKind::NotFound => None,
        Err(e) => {
            sink.warning(&format!("cannot stat {}: {}", path.display(), e));
            None
        }
    }
}
