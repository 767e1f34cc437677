//! Error types for workflow discovery.

use std::path::PathBuf;

use thiserror::Error;

/// A fatal failure while locating or reading workflow files.
///
/// Check failures are not errors: they are reported as
/// [`CheckOutcome::Failed`](crate::CheckOutcome::Failed). A `ScanError` means the
/// run could not establish which file to check at all.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ScanError {
    /// An I/O error occurred while opening or reading a file.
    #[error("{}: failed to read file: {source}", .path.display())]
    Io {
        /// The file that could not be read.
        path: PathBuf,
        /// The underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// The file exceeded the configured maximum size limit.
    #[error("{}: file exceeds maximum size of {limit} bytes", .path.display())]
    FileTooLarge {
        /// The oversized file.
        path: PathBuf,
        /// The configured limit in bytes.
        limit: u64,
    },

    /// A directory traversal error (permission denied, loop detected, etc.).
    #[error("{}: directory traversal error: {source}", .path.display())]
    Walk {
        /// The entry (or walk root) that failed.
        path: PathBuf,
        /// The underlying walk error.
        #[source]
        source: walkdir::Error,
    },

    /// An exclude glob pattern could not be parsed.
    #[error("invalid exclude glob pattern '{pattern}': {source}")]
    InvalidExcludePattern {
        /// The pattern as given.
        pattern: String,
        /// The parse error.
        #[source]
        source: glob::PatternError,
    },
}

impl ScanError {
    /// The path the error refers to, if any.
    #[must_use]
    pub fn path(&self) -> Option<&std::path::Path> {
        match self {
            Self::Io { path, .. } | Self::FileTooLarge { path, .. } | Self::Walk { path, .. } => {
                Some(path)
            }
            Self::InvalidExcludePattern { .. } => None,
        }
    }
}
