//! Per-file pipeline: hash, dedup check, upload with retry, dedup mark.

use std::sync::Arc;

use surisink_core::{guess_mime, hash_file, FileEvent, FileRecord, LogLevel, UploaderConfig};
use surisink_dedupe::DedupStore;
use surisink_storage::ObjectSink;

use crate::error::PipelineError;
use crate::retry::{upload_with_retry, RetryExhausted, RetryPolicy};

/// What happened to one file occurrence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Uploaded { key: String, attempts: u32 },
    Duplicate { content_hash: String },
}

pub struct FilePipeline {
    dedup: Arc<dyn DedupStore>,
    sink: Arc<dyn ObjectSink>,
    policy: RetryPolicy,
    sensor: Option<String>,
}

impl FilePipeline {
    pub fn new(
        dedup: Arc<dyn DedupStore>,
        sink: Arc<dyn ObjectSink>,
        policy: RetryPolicy,
        sensor: Option<String>,
    ) -> Self {
        Self {
            dedup,
            sink,
            policy,
            sensor,
        }
    }

    pub fn from_config(
        dedup: Arc<dyn DedupStore>,
        sink: Arc<dyn ObjectSink>,
        config: &UploaderConfig,
    ) -> Self {
        Self::new(
            dedup,
            sink,
            RetryPolicy::from_config(config),
            config.sensor.clone(),
        )
    }

    /// Run the pipeline for one event and log the result. Never fails.
    pub async fn handle(&self, event: FileEvent) {
        if let Err(err) = self.process(event).await {
            report(&err);
        }
    }

    /// Run the pipeline for one event.
    #[tracing::instrument(skip(self, event), fields(flow_id = %event.flow_id, file_id = event.file_id))]
    pub async fn process(&self, event: FileEvent) -> Result<Outcome, PipelineError> {
        let path = event
            .resolved_path
            .clone()
            .ok_or_else(|| PipelineError::Unresolved {
                file_id: event.file_id,
                original_name: event.original_name.clone(),
            })?;

        if let Err(source) = tokio::fs::metadata(&path).await {
            return Err(PipelineError::NotFound { path, source });
        }

        let digest = hash_file(&path).await?;

        match self.dedup.check(&digest.sha256).await {
            Ok(true) => {
                tracing::info!(
                    event = "skip_duplicate",
                    sha256 = %digest.sha256,
                    path = %path.display(),
                    "Content already uploaded, skipping"
                );
                return Ok(Outcome::Duplicate {
                    content_hash: digest.sha256,
                });
            }
            Ok(false) => {}
            Err(e) => {
                tracing::warn!(
                    sha256 = %digest.sha256,
                    backend = %self.dedup.backend_type(),
                    error = %e,
                    "Dedupe check failed, treating content as unseen"
                );
            }
        }

        let mime_type = guess_mime(&event.original_name);
        let record = FileRecord::new(&event, path, digest, mime_type, self.sensor.clone());

        let uploaded = upload_with_retry(self.sink.as_ref(), &record, &self.policy)
            .await
            .map_err(
                |RetryExhausted {
                     attempts,
                     last_error,
                 }| PipelineError::UploadExhausted {
                    content_hash: record.content_hash.clone(),
                    path: record.path.clone(),
                    attempts,
                    source: last_error,
                },
            )?;

        tracing::info!(
            event = "upload_success",
            key = %uploaded.key,
            bucket = %self.sink.bucket(),
            sha256 = %record.content_hash,
            size = record.size_bytes,
            mime = %record.mime_type,
            src = %record.src_addr,
            dst = %record.dest_addr,
            flow_id = %record.flow_id,
            ts_event = %record.observed_at_wire(),
            attempt = uploaded.attempts,
            "File uploaded"
        );

        // Not retried; the upload stands either way.
        if let Err(e) = self
            .dedup
            .mark(
                &record.content_hash,
                &uploaded.key,
                record.size_bytes,
                &record.mime_type,
            )
            .await
        {
            tracing::warn!(
                event = "dedupe_mark_failed",
                sha256 = %record.content_hash,
                key = %uploaded.key,
                error = %e,
                "Failed to record uploaded content"
            );
        }

        Ok(Outcome::Uploaded {
            key: uploaded.key,
            attempts: uploaded.attempts,
        })
    }
}

fn report(err: &PipelineError) {
    match err.log_level() {
        LogLevel::Error => tracing::error!(event = err.error_code(), error = %err, "File dropped"),
        LogLevel::Warn => tracing::warn!(event = err.error_code(), error = %err, "File dropped"),
    }
}
