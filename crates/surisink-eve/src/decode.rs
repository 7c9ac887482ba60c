//! Line decoder: one eve.json line in, at most one [`FileEvent`] out.

use chrono::{DateTime, FixedOffset, Local};
use surisink_core::constants::{FILEINFO_EVENT_TYPE, SURICATA_TIMESTAMP_FORMAT};
use surisink_core::{FileEvent, SuricataConfig};

use crate::record::RawEvent;
use crate::resolve::PathResolver;

#[derive(Debug, Clone)]
pub struct EventDecoder {
    resolver: PathResolver,
}

impl EventDecoder {
    pub fn new(config: &SuricataConfig) -> Self {
        Self {
            resolver: PathResolver::new(config),
        }
    }

    /// Decode a line. Blank, malformed, non-`fileinfo` and unstored entries
    /// yield `None`.
    pub fn decode(&self, line: &str) -> Option<FileEvent> {
        self.decode_at(line, Local::now().fixed_offset())
    }

    /// Decode with an explicit fallback time for entries without a usable timestamp.
    pub fn decode_at(&self, line: &str, now: DateTime<FixedOffset>) -> Option<FileEvent> {
        let line = line.trim();
        if line.is_empty() {
            return None;
        }

        let raw: RawEvent = match serde_json::from_str(line) {
            Ok(raw) => raw,
            Err(e) => {
                tracing::debug!(error = %e, "Skipping undecodable eve line");
                return None;
            }
        };

        if raw.event_type != FILEINFO_EVENT_TYPE || !raw.fileinfo.stored {
            return None;
        }

        let observed_at = parse_timestamp(&raw.timestamp).unwrap_or(now);
        let file_id = raw.file_id();
        let original_name = raw.filename().to_string();
        let resolved_path = self
            .resolver
            .resolve(&observed_at, file_id, &original_name);

        Some(FileEvent {
            observed_at,
            file_id,
            original_name,
            stored: true,
            src_addr: raw.src_ip,
            dest_addr: raw.dest_ip,
            flow_id: raw.flow_id.to_string(),
            resolved_path,
        })
    }
}

/// Parse RFC 3339 or Suricata's `+0000`-offset layout.
pub fn parse_timestamp(value: &str) -> Option<DateTime<FixedOffset>> {
    if value.is_empty() {
        return None;
    }
    DateTime::parse_from_rfc3339(value)
        .or_else(|_| DateTime::parse_from_str(value, SURICATA_TIMESTAMP_FORMAT))
        .ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;
    use surisink_core::PathStrategy;

    const REFERENCE_LINE: &str = r#"{"event_type":"fileinfo","timestamp":"2024-01-01T00:00:00Z","flow_id":42,"src_ip":"10.0.0.1","dest_ip":"10.0.0.2","fileinfo":{"filename":"a.pcap","stored":true,"file_id":7,"sha256":"abc","size":100}}"#;

    fn decoder() -> EventDecoder {
        EventDecoder::new(&SuricataConfig {
            eve_json_path: PathBuf::from("/var/log/suricata/eve.json"),
            filestore_dir: PathBuf::from("/data/filestore"),
            path_strategy: PathStrategy::FileId,
            file_naming_pattern: "file.%d".to_string(),
            use_date_subdirs: false,
            date_layout: "%Y/%m/%d".to_string(),
            poll_interval_ms: 200,
            max_line_bytes: 1024,
            queue_capacity: 8,
        })
    }

    fn fallback() -> DateTime<FixedOffset> {
        DateTime::parse_from_rfc3339("2030-06-15T12:00:00+00:00").unwrap()
    }

    #[test]
    fn reference_line_decodes() {
        let event = decoder().decode(REFERENCE_LINE).unwrap();

        assert_eq!(event.file_id, 7);
        assert_eq!(event.original_name, "a.pcap");
        assert_eq!(event.flow_id, "42");
        assert_eq!(event.src_addr, "10.0.0.1");
        assert_eq!(event.dest_addr, "10.0.0.2");
        assert!(event.stored);
        assert_eq!(
            event.observed_at,
            DateTime::parse_from_rfc3339("2024-01-01T00:00:00Z").unwrap()
        );
        assert_eq!(
            event.resolved_path,
            Some(PathBuf::from("/data/filestore/file.7"))
        );
    }

    #[test]
    fn surrounding_whitespace_is_trimmed() {
        let line = format!("  {}\r\n", REFERENCE_LINE);
        assert!(decoder().decode(&line).is_some());
    }

    #[test]
    fn irrelevant_lines_ignored() {
        let d = decoder();
        assert!(d.decode("").is_none());
        assert!(d.decode("   ").is_none());
        assert!(d.decode("not json").is_none());
        assert!(d.decode(r#"{"event_type":"alert","flow_id":1}"#).is_none());
        assert!(d
            .decode(r#"{"event_type":"fileinfo","fileinfo":{"stored":false,"file_id":3}}"#)
            .is_none());
    }

    #[test]
    fn suricata_timestamp_layout_accepted() {
        let line = r#"{"event_type":"fileinfo","timestamp":"2024-05-06T07:08:09.123456+0200","flow_id":1,"fileinfo":{"stored":true,"file_id":1}}"#;
        let event = decoder().decode_at(line, fallback()).unwrap();
        assert_eq!(
            event.observed_at,
            DateTime::parse_from_rfc3339("2024-05-06T07:08:09.123456+02:00").unwrap()
        );
    }

    #[test]
    fn bad_or_missing_timestamp_falls_back() {
        let d = decoder();
        let bad = r#"{"event_type":"fileinfo","timestamp":"yesterday","fileinfo":{"stored":true,"file_id":1}}"#;
        let missing = r#"{"event_type":"fileinfo","fileinfo":{"stored":true,"file_id":1}}"#;

        assert_eq!(d.decode_at(bad, fallback()).unwrap().observed_at, fallback());
        assert_eq!(
            d.decode_at(missing, fallback()).unwrap().observed_at,
            fallback()
        );
    }

    #[test]
    fn top_level_fallbacks_and_dst_alias() {
        let line = r#"{"event_type":"fileinfo","flow_id":5,"dst_ip":"192.0.2.1","filename":"b.txt","file_id":11,"fileinfo":{"stored":true}}"#;
        let event = decoder().decode_at(line, fallback()).unwrap();
        assert_eq!(event.original_name, "b.txt");
        assert_eq!(event.file_id, 11);
        assert_eq!(event.dest_addr, "192.0.2.1");
        assert_eq!(
            event.resolved_path,
            Some(PathBuf::from("/data/filestore/file.11"))
        );
    }
}
