//! Shared constants.

/// Event type of the only eve.json envelope the pipeline consumes.
pub const FILEINFO_EVENT_TYPE: &str = "fileinfo";

/// Placeholder in the filestore naming pattern replaced by the numeric file id.
pub const FILE_ID_PLACEHOLDER: &str = "%d";

/// Suricata's own timestamp layout (`2024-01-01T00:00:00.123456+0000`).
pub const SURICATA_TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.f%z";

/// Capacity of the queue between the tailer and the worker pool.
pub const DEFAULT_QUEUE_CAPACITY: usize = 1024;

/// Sleep between polls when the tailer has reached end of file.
pub const DEFAULT_POLL_INTERVAL_MS: u64 = 200;

/// Longest eve.json line accepted before it is discarded.
pub const DEFAULT_MAX_LINE_BYTES: usize = 10 * 1024 * 1024;

/// Backoff unit used when the configured unit is not positive.
pub const MIN_BACKOFF_UNIT_MS: u64 = 250;

/// Read buffer size for content hashing.
pub const HASH_BUFFER_SIZE: usize = 64 * 1024;
