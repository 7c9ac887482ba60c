//! MIME type guessing by file extension.

use std::path::Path;

const DEFAULT_MIME: &str = "application/octet-stream";

/// Guess a content type from the extension of `filename`.
///
/// Matching is case-insensitive; unknown or missing extensions map to
/// `application/octet-stream`.
pub fn guess_mime(filename: &str) -> &'static str {
    let ext = match Path::new(filename).extension().and_then(|e| e.to_str()) {
        Some(ext) => ext.to_ascii_lowercase(),
        None => return DEFAULT_MIME,
    };

    match ext.as_str() {
        "txt" => "text/plain",
        "htm" | "html" => "text/html",
        "json" => "application/json",
        "xml" => "application/xml",
        "pcap" => "application/vnd.tcpdump.pcap",
        "pdf" => "application/pdf",
        "zip" => "application/zip",
        "gz" => "application/gzip",
        "jpg" | "jpeg" => "image/jpeg",
        "png" => "image/png",
        "gif" => "image/gif",
        "exe" | "dll" => "application/vnd.microsoft.portable-executable",
        _ => DEFAULT_MIME,
    }
}
