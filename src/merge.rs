//! Streaming concatenation of many files into one, with header separators
//! and a total-size budget.

use std::fs::{self, File};
use std::io::{self, BufWriter, Read, Write};
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

use crate::error::{Error, Result};
use crate::events::NullSink;
use crate::probe;

/// Default separator written between file blocks.
pub const DEFAULT_SEPARATOR: &str = "\n\n";

/// Default total-size budget: 100 MiB.
pub const DEFAULT_MAX_TOTAL_BYTES: u64 = 100 * 1024 * 1024;

/// Read/write chunk size; no source is ever held in memory whole.
const CHUNK_SIZE: usize = 64 * 1024;

/// One merge: ordered sources into a single destination.
#[derive(Debug, Clone)]
pub struct MergeJob {
    pub sources: Vec<PathBuf>,
    pub destination: PathBuf,
    pub separator: String,
    pub max_total_bytes: u64,
}

/// What a completed merge wrote.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MergeStats {
    pub files: usize,
    pub bytes_written: u64,
}

impl MergeJob {
    pub fn new(sources: Vec<PathBuf>, destination: impl Into<PathBuf>) -> Self {
        Self {
            sources,
            destination: destination.into(),
            separator: DEFAULT_SEPARATOR.to_string(),
            max_total_bytes: DEFAULT_MAX_TOTAL_BYTES,
        }
    }

    pub fn with_separator(mut self, separator: impl Into<String>) -> Self {
        self.separator = separator.into();
        self
    }

    pub fn with_max_total_bytes(mut self, max_total_bytes: u64) -> Self {
        self.max_total_bytes = max_total_bytes;
        self
    }

    /// Run the merge.
    ///
    /// The size budget is checked before the destination is touched. If the
    /// destination cannot be opened it is left as it was. Any failure after
    /// it has been opened removes the partial output.
    pub fn run(&self) -> Result<MergeStats> {
        let total = self.source_bytes();
        if total > self.max_total_bytes {
            return Err(Error::SizeLimit {
                total,
                limit: self.max_total_bytes,
            });
        }

        debug!(
            files = self.sources.len(),
            total,
            destination = %self.destination.display(),
            "merging"
        );

        let dest = &self.destination;
        let file = File::create(dest).map_err(|e| Error::io(dest, e))?;

        match self.stream_to(file) {
            Ok(stats) => Ok(stats),
            Err(err) => {
                if let Err(e) = fs::remove_file(&self.destination) {
                    if e.kind() != io::ErrorKind::NotFound {
                        warn!(
                            destination = %self.destination.display(),
                            error = %e,
                            "failed to remove partial merge output"
                        );
                    }
                }
                Err(err)
            }
        }
    }

    /// Sum of the sizes of sources that are regular files.
    fn source_bytes(&self) -> u64 {
        self.sources
            .iter()
            .filter_map(|p| probe::stat(p, &NullSink))
            .filter(|s| s.is_file)
            .map(|s| s.size)
            .sum()
    }

    fn stream_to(&self, file: File) -> Result<MergeStats> {
        let dest = &self.destination;
        let mut out = BufWriter::with_capacity(CHUNK_SIZE, file);
        let mut bytes_written = 0u64;

        for (i, source) in self.sources.iter().enumerate() {
            let mut block = String::new();
            if i > 0 {
                block.push_str(&self.separator);
            }
            block.push_str(&header(source));
            out.write_all(block.as_bytes()).map_err(|e| Error::io(dest, e))?;

            bytes_written += block.len() as u64 + copy_source(source, &mut out, dest)?;

            out.write_all(b"\n").map_err(|e| Error::io(dest, e))?;
            bytes_written += 1;
        }

        out.flush().map_err(|e| Error::io(dest, e))?;
        let file = out
            .into_inner()
            .map_err(|e| Error::io(dest, e.into_error()))?;
        file.sync_all().map_err(|e| Error::io(dest, e))?;

        Ok(MergeStats {
            files: self.sources.len(),
            bytes_written,
        })
    }
}

/// Merge `sources` into `destination` with the default separator and budget.
pub fn merge(sources: Vec<PathBuf>, destination: impl Into<PathBuf>) -> Result<MergeStats> {
    MergeJob::new(sources, destination).run()
}

/// Header line for a source, using the path exactly as supplied.
fn header(source: &Path) -> String {
    format!("/* === {} === */\n", source.display())
}

/// Stream one source into `out`; read errors are attributed to the source,
/// write errors to the destination.
fn copy_source<W: Write>(source: &Path, out: &mut W, dest: &Path) -> Result<u64> {
    let mut file = File::open(source).map_err(|e| Error::io(source, e))?;
    let mut buf = vec![0u8; CHUNK_SIZE];
    let mut copied = 0u64;
    loop {
        let n = match file.read(&mut buf) {
            Ok(0) => break,
            Ok(n) => n,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(Error::io(source, e)),
        };
        out.write_all(&buf[..n]).map_err(|e| Error::io(dest, e))?;
        copied += n as u64;
    }
    Ok(copied)
}
