use std::path::PathBuf;

use chrono::{DateTime, FixedOffset};
use serde::Serialize;

/// One observed file-extraction occurrence decoded from eve.json.
///
/// Built once per matching log line and never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FileEvent {
    /// Event timestamp, or decode time when the log entry had none.
    pub observed_at: DateTime<FixedOffset>,
    pub file_id: i64,
    /// Filename as reported by the sensor; may be empty.
    pub original_name: String,
    pub stored: bool,
    pub src_addr: String,
    pub dest_addr: String,
    pub flow_id: String,
    /// Local path of the stored file, `None` when it could not be resolved.
    pub resolved_path: Option<PathBuf>,
}
