//! Retention sweeps for the persistent dedup store.

use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use crate::SqliteDedupStore;

/// Run one retention sweep and log the outcome.
pub async fn sweep(store: &SqliteDedupStore, retention_days: u32) -> Option<u64> {
    match store.purge_older_than(retention_days).await {
        Ok(removed) => {
            tracing::info!(
                event = "dedupe_gc",
                removed,
                retention_days,
                "Dedupe retention sweep finished"
            );
            Some(removed)
        }
        Err(e) => {
            tracing::error!(error = %e, retention_days, "Dedupe retention sweep failed");
            None
        }
    }
}

/// Spawn a background task that sweeps every `interval` until cancelled.
///
/// The first sweep runs immediately. Sweeps never run on the upload path.
pub fn spawn_retention_reaper(
    store: Arc<SqliteDedupStore>,
    retention_days: u32,
    interval: Duration,
    cancel: CancellationToken,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(interval.max(Duration::from_secs(1)));
        ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);
        loop {
            tokio::select! {
                _ = cancel.cancelled() => break,
                _ = ticker.tick() => {
                    sweep(&store, retention_days).await;
                }
            }
        }
        tracing::debug!("Dedupe retention reaper stopped");
    })
}
