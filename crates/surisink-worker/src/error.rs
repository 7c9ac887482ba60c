use std::path::PathBuf;

use surisink_core::{AppError, LogLevel};
use surisink_storage::StorageError;
use thiserror::Error;

/// Reasons a file occurrence is dropped by the pipeline.
///
/// None of these cross a worker boundary: the worker logs them and takes the
/// next event.
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("No local path resolved for file_id {file_id} ({original_name})")]
    Unresolved { file_id: i64, original_name: String },

    #[error("File not found: {path}: {source}")]
    NotFound {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Hashing failed: {0}")]
    Hash(#[from] AppError),

    #[error("Upload of {content_hash} from {path} failed after {attempts} attempts: {source}")]
    UploadExhausted {
        content_hash: String,
        path: PathBuf,
        attempts: u32,
        #[source]
        source: StorageError,
    },
}

impl PipelineError {
    /// Value of the `event` field this error is logged under.
    pub fn error_code(&self) -> &'static str {
        match self {
            PipelineError::Unresolved { .. } => "no_path",
            PipelineError::NotFound { .. } => "file_not_found",
            PipelineError::Hash(_) => "hash_failed",
            PipelineError::UploadExhausted { .. } => "upload_failed",
        }
    }

    pub fn log_level(&self) -> LogLevel {
        match self {
            PipelineError::UploadExhausted { .. } => LogLevel::Error,
            _ => LogLevel::Warn,
        }
    }
}
