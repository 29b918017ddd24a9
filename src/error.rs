//! Error taxonomy shared by the scan, filter, and merge stages.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Failures that abort an operation.
///
/// Tolerable conditions (an unreadable directory, a file that vanished
/// mid-walk) never surface here; they are reported as warning events and
/// the affected entry is omitted. User cancellation is not an error either,
/// see [`crate::prompt::Resolution`].
#[derive(Debug, Error)]
pub enum Error {
    /// A filesystem call failed for `path`.
    #[error("{}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The merge pre-flight found more bytes than the budget allows.
    #[error("merged files total {total} bytes, exceeding the limit of {limit} bytes")]
    SizeLimit { total: u64, limit: u64 },

    /// The parent directory of an output file could not be created.
    #[error("failed to create directory {}", .path.display())]
    CreateDir {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// An interactive collaborator failed to produce a decision.
    #[error("interactive prompt failed")]
    Prompt(#[source] io::Error),
}

impl Error {
    pub(crate) fn io(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Error::Io {
            path: path.into(),
            source,
        }
    }

    /// The underlying I/O error kind, if this error wraps one.
    pub fn io_kind(&self) -> Option<io::ErrorKind> {
        match self {
            Error::Io { source, .. } | Error::CreateDir { source, .. } | Error::Prompt(source) => {
                Some(source.kind())
            }
            Error::SizeLimit { .. } => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
