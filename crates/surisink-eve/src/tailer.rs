//! Polling tailer over a growing eve.json file.

use std::io::SeekFrom;
use std::path::PathBuf;
use std::time::Duration;

use surisink_core::{FileEvent, SuricataConfig};
use thiserror::Error;
use tokio::fs::File;
use tokio::io::{AsyncBufReadExt, AsyncSeekExt, BufReader};
use tokio::sync::mpsc::{self, error::TrySendError};
use tokio_util::sync::CancellationToken;

use crate::decode::EventDecoder;

const READ_BUFFER_SIZE: usize = 64 * 1024;

#[derive(Debug, Error)]
pub enum TailError {
    #[error("Failed to open {path}: {source}")]
    Open {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to seek to end of {path}: {source}")]
    Seek {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Outcome of feeding one buffered chunk to the line assembler.
enum Chunk {
    /// A full line is ready in the pending buffer.
    Line,
    /// A line ended but exceeded the size limit and was dropped.
    Oversize,
    /// No newline yet.
    Partial,
}

/// Tails eve.json from its end, one line at a time.
///
/// Incomplete trailing data stays in an in-memory buffer until its newline
/// arrives. A line longer than `max_line_bytes` is discarded; the buffer never
/// grows past that limit while the rest of the line is skipped.
pub struct EveTailer {
    path: PathBuf,
    reader: BufReader<File>,
    decoder: EventDecoder,
    poll_interval: Duration,
    max_line_bytes: usize,
    pending: Vec<u8>,
    discarding: bool,
}

impl EveTailer {
    /// Open the log and position the cursor at its current end.
    pub async fn open(config: &SuricataConfig) -> Result<Self, TailError> {
        let path = config.eve_json_path.clone();
        let mut file = File::open(&path).await.map_err(|source| TailError::Open {
            path: path.clone(),
            source,
        })?;
        let offset = file
            .seek(SeekFrom::End(0))
            .await
            .map_err(|source| TailError::Seek {
                path: path.clone(),
                source,
            })?;

        tracing::info!(path = %path.display(), offset, "Tailing eve.json from end");

        Ok(Self {
            path,
            reader: BufReader::with_capacity(READ_BUFFER_SIZE, file),
            decoder: EventDecoder::new(config),
            poll_interval: Duration::from_millis(config.poll_interval_ms.max(1)),
            max_line_bytes: config.max_line_bytes,
            pending: Vec::new(),
            discarding: false,
        })
    }

    /// Read until cancelled or until every receiver is gone.
    ///
    /// Events are offered with `try_send`; when the queue is full the event
    /// is dropped with a warning and tailing continues.
    pub async fn run(mut self, tx: mpsc::Sender<FileEvent>, cancel: CancellationToken) {
        loop {
            if cancel.is_cancelled() {
                break;
            }

            match self.next_chunk().await {
                Ok(Some(Chunk::Line)) => {
                    let line = std::mem::take(&mut self.pending);
                    if let Some(event) = self.decode_line(&line) {
                        if !self.emit(&tx, event) {
                            break;
                        }
                    }
                }
                Ok(Some(Chunk::Oversize)) => {
                    tracing::warn!(
                        path = %self.path.display(),
                        max_line_bytes = self.max_line_bytes,
                        "Discarded eve line longer than the limit"
                    );
                }
                Ok(Some(Chunk::Partial)) => {}
                Ok(None) => {
                    if !self.sleep(&cancel).await {
                        break;
                    }
                }
                Err(e) => {
                    tracing::warn!(path = %self.path.display(), error = %e, "eve read failed");
                    if !self.sleep(&cancel).await {
                        break;
                    }
                }
            }
        }

        tracing::info!(path = %self.path.display(), "eve tailer stopped");
    }

    /// Consume the next slice of buffered input. `Ok(None)` means end of file.
    async fn next_chunk(&mut self) -> std::io::Result<Option<Chunk>> {
        let available = self.reader.fill_buf().await?;
        if available.is_empty() {
            return Ok(None);
        }

        let (taken, chunk) = match available.iter().position(|b| *b == b'\n') {
            Some(newline) => {
                let fits = self.pending.len() + newline <= self.max_line_bytes;
                let chunk = if self.discarding || !fits {
                    self.pending.clear();
                    self.discarding = false;
                    Chunk::Oversize
                } else {
                    self.pending.extend_from_slice(&available[..newline]);
                    Chunk::Line
                };
                (newline + 1, chunk)
            }
            None => {
                if !self.discarding {
                    if self.pending.len() + available.len() <= self.max_line_bytes {
                        self.pending.extend_from_slice(available);
                    } else {
                        self.pending.clear();
                        self.discarding = true;
                    }
                }
                (available.len(), Chunk::Partial)
            }
        };

        self.reader.consume(taken);
        Ok(Some(chunk))
    }

    fn decode_line(&self, line: &[u8]) -> Option<FileEvent> {
        match std::str::from_utf8(line) {
            Ok(text) => self.decoder.decode(text),
            Err(e) => {
                tracing::debug!(error = %e, "Skipping non-UTF-8 eve line");
                None
            }
        }
    }

    /// Returns `false` once the queue is closed.
    fn emit(&self, tx: &mpsc::Sender<FileEvent>, event: FileEvent) -> bool {
        match tx.try_send(event) {
            Ok(()) => true,
            Err(TrySendError::Full(event)) => {
                tracing::warn!(
                    flow_id = %event.flow_id,
                    file_id = event.file_id,
                    "eve events queue full; dropping"
                );
                true
            }
            Err(TrySendError::Closed(_)) => {
                tracing::debug!("eve events queue closed");
                false
            }
        }
    }

    /// Returns `false` when cancelled during the wait.
    async fn sleep(&self, cancel: &CancellationToken) -> bool {
        tokio::select! {
            _ = cancel.cancelled() => false,
            _ = tokio::time::sleep(self.poll_interval) => true,
        }
    }
}
