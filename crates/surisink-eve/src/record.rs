//! Wire shape of an eve.json envelope, restricted to the fields we read.

use serde::Deserialize;

#[derive(Debug, Default, Deserialize)]
pub struct RawEvent {
    #[serde(default)]
    pub timestamp: String,
    #[serde(default)]
    pub event_type: String,
    #[serde(default)]
    pub src_ip: String,
    #[serde(default, alias = "dst_ip")]
    pub dest_ip: String,
    #[serde(default)]
    pub flow_id: u64,
    /// Top-level fallbacks for older sensors.
    #[serde(default)]
    pub filename: String,
    #[serde(default)]
    pub file_id: i64,
    #[serde(default)]
    pub fileinfo: RawFileInfo,
}

#[derive(Debug, Default, Deserialize)]
pub struct RawFileInfo {
    #[serde(default)]
    pub filename: String,
    #[serde(default)]
    pub stored: bool,
    #[serde(default)]
    pub file_id: i64,
    #[serde(default)]
    pub sha256: String,
    #[serde(default)]
    pub size: u64,
}

impl RawEvent {
    pub fn file_id(&self) -> i64 {
        if self.fileinfo.file_id != 0 {
            self.fileinfo.file_id
        } else {
            self.file_id
        }
    }

    pub fn filename(&self) -> &str {
        if self.fileinfo.filename.is_empty() {
            &self.filename
        } else {
            &self.fileinfo.filename
        }
    }
}
