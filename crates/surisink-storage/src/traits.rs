//! Object sink abstraction trait

use async_trait::async_trait;
use surisink_core::FileRecord;
use thiserror::Error;

/// Object sink operation errors
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Upload failed: {0}")]
    UploadFailed(String),

    #[error("Tagging failed: {0}")]
    TaggingFailed(String),

    #[error("Bucket check failed: {0}")]
    BucketFailed(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),
}

/// Result type for object sink operations
pub type StorageResult<T> = Result<T, StorageError>;

/// Object sink trait
///
/// Implementations hold no per-upload state; one handle is shared by every
/// worker and each call is self-contained given a [`FileRecord`].
#[async_trait]
pub trait ObjectSink: Send + Sync {
    /// Upload the file and apply its tags. Returns the object key.
    async fn upload(&self, record: &FileRecord) -> StorageResult<String>;

    /// Make sure the destination bucket exists, creating it if missing.
    async fn ensure_bucket(&self) -> StorageResult<()>;

    fn bucket(&self) -> &str;
}
