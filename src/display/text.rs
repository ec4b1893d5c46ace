//! Small text helpers shared by the display formatters

use crate::models::parse_timestamp;

/// Shorten an identifier to its first 8 characters followed by `...`
pub fn short_id(id: &str) -> String {
    truncate(id, 8)
}

/// Truncate `value` to `max` characters, appending `...` when cut
pub fn truncate(value: &str, max: usize) -> String {
    match value.char_indices().nth(max) {
        Some((cut, _)) => format!("{}...", &value[..cut]),
        None => value.to_string(),
    }
}

/// Format an API timestamp as a date, or `Unknown`
pub fn format_date(timestamp: Option<&str>) -> String {
    parse_timestamp(timestamp)
        .map(|dt| dt.format("%Y-%m-%d").to_string())
        .unwrap_or_else(|| "Unknown".to_string())
}

/// Format an API timestamp with time of day, or `Unknown`
pub fn format_datetime(timestamp: Option<&str>) -> String {
    parse_timestamp(timestamp)
        .map(|dt| dt.format("%Y-%m-%d %H:%M:%S UTC").to_string())
        .unwrap_or_else(|| "Unknown".to_string())
}
