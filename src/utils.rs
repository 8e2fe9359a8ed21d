//! Small helpers shared across the pipeline.

use chrono::{Local, TimeZone};

/// Format a Unix timestamp as `YYYY-MM-DD HH:MM:SS` in the local time
/// zone.
///
/// Listing entries carry publish times as Unix seconds; the output
/// dataset stores them as calendar strings. Out-of-range timestamps
/// format to the empty string instead of aborting the entry.
pub fn format_unix_timestamp(unix_seconds: i64) -> String {
    Local
        .timestamp_opt(unix_seconds, 0)
        .single()
        .map(|dt| dt.format("%Y-%m-%d %H:%M:%S").to_string())
        .unwrap_or_default()
}

/// Truncate a string for logging purposes.
///
/// Long strings are cut to at most `max` bytes (backing off to the
/// nearest character boundary, since article bodies are mostly
/// Cyrillic) with an ellipsis and byte count appended.
pub fn truncate_for_log(s: &str, max: usize) -> String {
    if s.len() <= max {
        return s.to_string();
    }
    let mut cut = max;
    while !s.is_char_boundary(cut) {
        cut -= 1;
    }
    format!("{}…(+{} bytes)", &s[..cut], s.len() - cut)
}
