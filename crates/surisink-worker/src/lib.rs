//! Surisink Worker Library
//!
//! Takes [`FileEvent`](surisink_core::FileEvent)s off the bounded queue and
//! runs each through the per-file pipeline on a fixed pool of workers:
//!
//! 1. drop events without an existing local file
//! 2. hash the content
//! 3. skip content the dedup store has seen
//! 4. upload with linear-backoff retry
//! 5. mark the content as seen

pub mod error;
pub mod pipeline;
pub mod pool;
pub mod retry;

// Re-export commonly used types
pub use error::PipelineError;
pub use pipeline::{FilePipeline, Outcome};
pub use pool::WorkerPool;
pub use retry::{upload_with_retry, RetryExhausted, RetryPolicy, UploadOutcome};
