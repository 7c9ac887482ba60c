//! Component startup and the two entry points behind the CLI subcommands.

use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use surisink_core::Config;
use surisink_dedupe::{create_dedup_store, spawn_retention_reaper, SqliteDedupStore};
use surisink_eve::EveTailer;
use surisink_storage::create_sink;
use surisink_worker::{FilePipeline, WorkerPool};
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

use crate::shutdown::shutdown_signal;

/// Run the upload daemon until SIGINT/SIGTERM.
///
/// Every startup failure is returned before any event is read.
pub async fn run_daemon(config: Config) -> Result<(), anyhow::Error> {
    let cancel = CancellationToken::new();

    let stores = create_dedup_store(&config.dedupe)
        .await
        .with_context(|| {
            format!(
                "Failed to open dedupe store at {}",
                config.dedupe.sqlite_path.display()
            )
        })?;

    let sink = create_sink(&config.s3, &config.uploader.prefix)
        .await
        .context("Failed to initialize S3 sink")?;
    sink.ensure_bucket()
        .await
        .with_context(|| format!("Failed to ensure bucket {}", sink.bucket()))?;

    let tailer = EveTailer::open(&config.suricata)
        .await
        .context("Failed to open eve.json")?;

    let (tx, rx) = mpsc::channel(config.suricata.queue_capacity);
    let tailer_handle = tokio::spawn(tailer.run(tx, cancel.clone()));

    let reaper_handle = match &stores.persistent {
        Some(db) if config.dedupe.retention_days > 0 => Some(spawn_retention_reaper(
            db.clone(),
            config.dedupe.retention_days,
            Duration::from_secs(config.dedupe.gc_interval_secs),
            cancel.clone(),
        )),
        _ => None,
    };

    tokio::spawn({
        let cancel = cancel.clone();
        async move {
            shutdown_signal().await;
            cancel.cancel();
        }
    });

    let pipeline = Arc::new(FilePipeline::from_config(
        stores.store.clone(),
        sink,
        &config.uploader,
    ));
    tracing::info!(
        workers = config.uploader.workers,
        queue_capacity = config.suricata.queue_capacity,
        dedupe = %stores.store.backend_type(),
        "Starting workers"
    );
    WorkerPool::new(pipeline, config.uploader.workers)
        .run(rx, cancel.clone())
        .await;

    // The pool also returns when the tailer exits on its own.
    cancel.cancel();
    if let Err(e) = tailer_handle.await {
        tracing::error!(error = %e, "eve tailer task failed");
    }
    if let Some(handle) = reaper_handle {
        if let Err(e) = handle.await {
            tracing::error!(error = %e, "Dedupe reaper task failed");
        }
    }
    if let Some(db) = stores.persistent {
        db.close().await;
    }

    tracing::info!("Shutting down");
    Ok(())
}

/// One-shot retention sweep of the persistent dedupe store.
///
/// Returns the number of rows removed.
pub async fn run_gc(config: &Config, retention_days: Option<u32>) -> Result<u64, anyhow::Error> {
    let retention_days = retention_days.unwrap_or(config.dedupe.retention_days);
    if retention_days == 0 {
        anyhow::bail!(
            "Retention is disabled; set SURISINK_DEDUPE_RETENTION_DAYS or pass --retention-days"
        );
    }

    let store = SqliteDedupStore::open(&config.dedupe.sqlite_path)
        .await
        .with_context(|| {
            format!(
                "Failed to open dedupe store at {}",
                config.dedupe.sqlite_path.display()
            )
        })?;
    let removed = store
        .purge_older_than(retention_days)
        .await
        .context("Dedupe retention sweep failed")?;
    store.close().await;

    tracing::info!(
        event = "dedupe_gc",
        removed,
        retention_days,
        path = %config.dedupe.sqlite_path.display(),
        "Dedupe retention sweep finished"
    );
    Ok(removed)
}
