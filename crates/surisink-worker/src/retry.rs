//! Upload retry with linear backoff.

use std::time::Duration;

use surisink_core::constants::MIN_BACKOFF_UNIT_MS;
use surisink_core::{FileRecord, UploaderConfig};
use surisink_storage::{ObjectSink, StorageError};

/// Attempt budget and backoff unit for uploads.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub backoff_unit: Duration,
}

impl RetryPolicy {
    /// A non-positive unit falls back to [`MIN_BACKOFF_UNIT_MS`]; at least one
    /// attempt is always made.
    pub fn new(max_attempts: u32, backoff_ms: i64) -> Self {
        let unit_ms = u64::try_from(backoff_ms)
            .ok()
            .filter(|ms| *ms > 0)
            .unwrap_or(MIN_BACKOFF_UNIT_MS);
        Self {
            max_attempts: max_attempts.max(1),
            backoff_unit: Duration::from_millis(unit_ms),
        }
    }

    pub fn from_config(config: &UploaderConfig) -> Self {
        Self::new(config.max_retries, config.backoff_ms)
    }

    /// Delay after failed attempt `attempt` (1-based): `unit × attempt`.
    #[inline]
    pub fn backoff_for(&self, attempt: u32) -> Duration {
        self.backoff_unit
            .checked_mul(attempt)
            .unwrap_or(Duration::MAX)
    }
}

/// Successful upload: object key and the attempt that succeeded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadOutcome {
    pub key: String,
    pub attempts: u32,
}

/// Upload failure after the attempt budget is spent.
#[derive(Debug)]
pub struct RetryExhausted {
    pub attempts: u32,
    pub last_error: StorageError,
}

/// Upload `record`, sleeping `unit × k` after failed attempt `k` unless it
/// was the last one.
pub async fn upload_with_retry(
    sink: &dyn ObjectSink,
    record: &FileRecord,
    policy: &RetryPolicy,
) -> Result<UploadOutcome, RetryExhausted> {
    let mut attempt = 1;
    loop {
        match sink.upload(record).await {
            Ok(key) => {
                return Ok(UploadOutcome {
                    key,
                    attempts: attempt,
                })
            }
            Err(e) if attempt >= policy.max_attempts => {
                return Err(RetryExhausted {
                    attempts: attempt,
                    last_error: e,
                });
            }
            Err(e) => {
                let delay = policy.backoff_for(attempt);
                tracing::warn!(
                    event = "upload_retry",
                    sha256 = %record.content_hash,
                    attempt,
                    delay_ms = delay.as_millis() as u64,
                    error = %e,
                    "Upload attempt failed, retrying"
                );
                tokio::time::sleep(delay).await;
                attempt += 1;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn backoff_is_linear_in_attempt() {
        let policy = RetryPolicy::new(5, 500);
        assert_eq!(policy.backoff_for(1), Duration::from_millis(500));
        assert_eq!(policy.backoff_for(2), Duration::from_millis(1000));
        assert_eq!(policy.backoff_for(4), Duration::from_millis(2000));
    }

    #[test]
    fn non_positive_unit_falls_back() {
        assert_eq!(
            RetryPolicy::new(3, 0).backoff_unit,
            Duration::from_millis(MIN_BACKOFF_UNIT_MS)
        );
        assert_eq!(
            RetryPolicy::new(3, -10).backoff_unit,
            Duration::from_millis(MIN_BACKOFF_UNIT_MS)
        );
    }

    #[test]
    fn at_least_one_attempt() {
        assert_eq!(RetryPolicy::new(0, 100).max_attempts, 1);
    }

    #[test]
    fn huge_attempt_saturates() {
        let policy = RetryPolicy::new(5, i64::MAX);
        assert_eq!(policy.backoff_for(u32::MAX), Duration::MAX);
    }
}
