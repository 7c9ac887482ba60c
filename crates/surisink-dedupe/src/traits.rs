//! Dedup store abstraction trait

use std::fmt::{Display, Formatter, Result as FmtResult};

use async_trait::async_trait;
use thiserror::Error;

/// Dedup store operation errors
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Dedup set lock poisoned")]
    LockPoisoned,

    #[error("Retention of {0} days is out of range")]
    RetentionOutOfRange(u32),

    #[error("Invalid stored timestamp '{value}': {source}")]
    InvalidTimestamp {
        value: String,
        #[source]
        source: chrono::ParseError,
    },
}

/// Result type for dedup store operations
pub type StoreResult<T> = Result<T, StoreError>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DedupBackend {
    Memory,
    Sqlite,
}

impl Display for DedupBackend {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            DedupBackend::Memory => write!(f, "memory"),
            DedupBackend::Sqlite => write!(f, "sqlite"),
        }
    }
}

/// Dedup store trait
///
/// Implementations serialize concurrent calls internally; callers share one
/// handle across all workers. `check` and `mark` are deliberately two calls,
/// see the crate documentation for the resulting race.
#[async_trait]
pub trait DedupStore: Send + Sync {
    /// Whether content with this hash has been uploaded before.
    async fn check(&self, content_hash: &str) -> StoreResult<bool>;

    /// Record a successful upload of this content.
    async fn mark(
        &self,
        content_hash: &str,
        object_key: &str,
        size_bytes: u64,
        mime_type: &str,
    ) -> StoreResult<()>;

    fn backend_type(&self) -> DedupBackend;
}
