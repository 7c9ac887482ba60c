use std::path::PathBuf;

use chrono::{DateTime, FixedOffset, SecondsFormat, Utc};
use serde::Serialize;

use crate::content::ContentDigest;
use crate::models::FileEvent;

/// Upload metadata for one file, derived after hashing.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FileRecord {
    pub path: PathBuf,
    pub original_name: String,
    /// Hex SHA-256 of the content; always paired with `size_bytes`.
    pub content_hash: String,
    pub mime_type: String,
    pub flow_id: String,
    pub src_addr: String,
    pub dest_addr: String,
    pub observed_at: DateTime<FixedOffset>,
    pub size_bytes: u64,
    pub sensor: Option<String>,
}

impl FileRecord {
    pub fn new(
        event: &FileEvent,
        path: PathBuf,
        digest: ContentDigest,
        mime_type: &str,
        sensor: Option<String>,
    ) -> Self {
        Self {
            path,
            original_name: event.original_name.clone(),
            content_hash: digest.sha256,
            mime_type: mime_type.to_string(),
            flow_id: event.flow_id.clone(),
            src_addr: event.src_addr.clone(),
            dest_addr: event.dest_addr.clone(),
            observed_at: event.observed_at,
            size_bytes: digest.size_bytes,
            sensor,
        }
    }

    /// Observation time on the wire: RFC 3339, UTC, second precision.
    pub fn observed_at_wire(&self) -> String {
        self.observed_at
            .with_timezone(&Utc)
            .to_rfc3339_opts(SecondsFormat::Secs, true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wire_timestamp_is_utc_seconds() {
        let event = FileEvent {
            observed_at: DateTime::parse_from_rfc3339("2024-03-05T10:20:30.987+02:00").unwrap(),
            file_id: 1,
            original_name: "x.bin".to_string(),
            stored: true,
            src_addr: String::new(),
            dest_addr: String::new(),
            flow_id: "9".to_string(),
            resolved_path: None,
        };
        let digest = ContentDigest {
            sha256: "ab".to_string(),
            size_bytes: 2,
        };
        let record = FileRecord::new(&event, PathBuf::from("/tmp/x"), digest, "text/plain", None);

        assert_eq!(record.observed_at_wire(), "2024-03-05T08:20:30Z");
        assert_eq!(record.size_bytes, 2);
        assert_eq!(record.content_hash, "ab");
    }
}
