//! Error types module
//!
//! `AppError` covers failures of the shared building blocks (file access and
//! content hashing). Component crates define their own error enums and map
//! them onto a [`LogLevel`] for reporting.

use std::io;
use std::path::PathBuf;

/// Log level for error reporting
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogLevel {
    /// Warning level - for recoverable, per-event drops
    Warn,
    /// Error level - for permanent failures
    Error,
}

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Failed to open {path}: {source}")]
    Open {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Read failed after {bytes_read} bytes of {path}: {source}")]
    Read {
        path: PathBuf,
        bytes_read: u64,
        #[source]
        source: io::Error,
    },
}

impl AppError {
    /// Whether the file that caused this error is simply gone.
    pub fn is_not_found(&self) -> bool {
        match self {
            AppError::Open { source: e, .. } | AppError::Read { source: e, .. } => {
                e.kind() == io::ErrorKind::NotFound
            }
        }
    }
}
