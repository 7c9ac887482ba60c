//! Fixed-size worker pool fed by the bounded event queue.

use std::sync::Arc;

use surisink_core::FileEvent;
use tokio::sync::{mpsc, Semaphore};
use tokio::task::JoinSet;
use tokio_util::sync::CancellationToken;

use crate::pipeline::FilePipeline;

/// Runs up to `workers` pipelines at once.
///
/// Each event is taken off the queue only once a worker slot is free, so the
/// bounded queue stays the single buffer between the tailer and the workers.
pub struct WorkerPool {
    pipeline: Arc<FilePipeline>,
    workers: usize,
}

impl WorkerPool {
    pub fn new(pipeline: Arc<FilePipeline>, workers: usize) -> Self {
        Self {
            pipeline,
            workers: workers.max(1),
        }
    }

    /// Consume `rx` until it closes or `cancel` fires, then wait for in-flight
    /// pipelines. Events still queued at cancellation are abandoned.
    pub async fn run(self, mut rx: mpsc::Receiver<FileEvent>, cancel: CancellationToken) {
        tracing::info!(workers = self.workers, "Worker pool started");

        let semaphore = Arc::new(Semaphore::new(self.workers));
        let mut tasks = JoinSet::new();

        loop {
            let permit = tokio::select! {
                _ = cancel.cancelled() => break,
                permit = semaphore.clone().acquire_owned() => match permit {
                    Ok(permit) => permit,
                    Err(_) => break,
                },
            };

            let event = tokio::select! {
                _ = cancel.cancelled() => break,
                event = rx.recv() => match event {
                    Some(event) => event,
                    None => break,
                },
            };

            tracing::debug!(
                event = "eve_received",
                flow_id = %event.flow_id,
                file_id = event.file_id,
                filename = %event.original_name,
                "File event received"
            );

            let pipeline = self.pipeline.clone();
            tasks.spawn(async move {
                let _permit = permit;
                pipeline.handle(event).await;
            });

            while let Some(result) = tasks.try_join_next() {
                log_join(result);
            }
        }

        tracing::info!(in_flight = tasks.len(), "Worker pool draining");
        while let Some(result) = tasks.join_next().await {
            log_join(result);
        }
        tracing::info!("Worker pool stopped");
    }
}

fn log_join(result: Result<(), tokio::task::JoinError>) {
    if let Err(e) = result {
        tracing::error!(error = %e, "Worker task panicked");
    }
}
