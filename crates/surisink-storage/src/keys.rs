//! Shared object key generation.

use chrono::{DateTime, Datelike, FixedOffset};

/// Build the object key for a file.
///
/// Pure function of its inputs. Date components are read in the offset the
/// observation time carries.
pub fn object_key(
    prefix: &str,
    observed_at: &DateTime<FixedOffset>,
    flow_id: &str,
    content_hash: &str,
    original_name: &str,
) -> String {
    format!(
        "{}/{:04}/{:02}/{:02}/{}/{}_{}",
        prefix,
        observed_at.year(),
        observed_at.month(),
        observed_at.day(),
        flow_id,
        content_hash,
        base_name(original_name)
    )
}

/// Last element of a slash-separated path.
///
/// Trailing slashes are ignored; an empty name yields `.` and a name made only
/// of slashes yields `/`.
pub fn base_name(name: &str) -> &str {
    if name.is_empty() {
        return ".";
    }
    let trimmed = name.trim_end_matches('/');
    if trimmed.is_empty() {
        return "/";
    }
    match trimmed.rfind('/') {
        Some(idx) => &trimmed[idx + 1..],
        None => trimmed,
    }
}
