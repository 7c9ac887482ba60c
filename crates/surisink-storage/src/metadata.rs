//! User metadata and tags attached to uploaded objects.

use std::collections::BTreeMap;

use surisink_core::FileRecord;

/// User metadata sent with the PUT. Empty values are omitted.
pub fn object_metadata(record: &FileRecord) -> BTreeMap<String, String> {
    let mut meta = BTreeMap::new();
    meta.insert("sha256".to_string(), record.content_hash.clone());
    meta.insert("ts".to_string(), record.observed_at_wire());
    insert_non_empty(&mut meta, "flow_id", &record.flow_id);
    insert_non_empty(&mut meta, "src", &record.src_addr);
    insert_non_empty(&mut meta, "dst", &record.dest_addr);
    if let Some(sensor) = record.sensor.as_deref() {
        insert_non_empty(&mut meta, "sensor", sensor);
    }
    meta
}

/// Object tags applied after the PUT.
pub fn object_tags(record: &FileRecord) -> BTreeMap<String, String> {
    let mut tags = BTreeMap::new();
    tags.insert("sha256".to_string(), record.content_hash.clone());
    tags.insert("mime".to_string(), record.mime_type.clone());
    tags.insert("ts".to_string(), record.observed_at_wire());
    insert_non_empty(&mut tags, "flow_id", &record.flow_id);
    insert_non_empty(&mut tags, "src", &record.src_addr);
    insert_non_empty(&mut tags, "dst", &record.dest_addr);
    if let Some(sensor) = record.sensor.as_deref() {
        insert_non_empty(&mut tags, "sensor", sensor);
    }
    tags
}

fn insert_non_empty(map: &mut BTreeMap<String, String>, key: &str, value: &str) {
    if !value.is_empty() {
        map.insert(key.to_string(), value.to_string());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::DateTime;
    use std::path::PathBuf;

    fn record(src: &str, dst: &str, sensor: Option<&str>) -> FileRecord {
        FileRecord {
            path: PathBuf::from("/tmp/file.7"),
            original_name: "a.pcap".to_string(),
            content_hash: "abc123".to_string(),
            mime_type: "application/vnd.tcpdump.pcap".to_string(),
            flow_id: "42".to_string(),
            src_addr: src.to_string(),
            dest_addr: dst.to_string(),
            observed_at: DateTime::parse_from_rfc3339("2024-01-01T00:00:00Z").unwrap(),
            size_bytes: 100,
            sensor: sensor.map(str::to_string),
        }
    }

    #[test]
    fn tags_carry_all_fields() {
        let tags = object_tags(&record("10.0.0.1", "10.0.0.2", Some("s1")));
        assert_eq!(tags["sha256"], "abc123");
        assert_eq!(tags["mime"], "application/vnd.tcpdump.pcap");
        assert_eq!(tags["ts"], "2024-01-01T00:00:00Z");
        assert_eq!(tags["flow_id"], "42");
        assert_eq!(tags["src"], "10.0.0.1");
        assert_eq!(tags["dst"], "10.0.0.2");
        assert_eq!(tags["sensor"], "s1");
    }

    #[test]
    fn empty_addresses_are_omitted() {
        let rec = record("", "", None);
        let tags = object_tags(&rec);
        let meta = object_metadata(&rec);

        assert!(!tags.contains_key("src"));
        assert!(!tags.contains_key("dst"));
        assert!(!tags.contains_key("sensor"));
        assert!(!meta.contains_key("src"));
        assert!(!meta.contains_key("dst"));
        assert_eq!(meta["sha256"], "abc123");
        assert_eq!(meta["flow_id"], "42");
    }
}
