use chrono::{DateTime, Utc};
use serde_json::Value;
use std::cmp::Ordering;

/// Parse an ISO8601 / RFC 3339 timestamp as returned by the Data API
pub fn parse_iso8601_to_datetime(date_str: &str) -> Option<DateTime<Utc>> {
    if date_str.is_empty() {
        return None;
    }

    date_str.parse::<DateTime<Utc>>().ok()
}

/// Counters come back as JSON strings ("1234"); anything missing or unparseable is 0.
pub fn parse_count(value: &Value) -> u64 {
    match value {
        Value::String(s) => s.trim().parse().unwrap_or(0),
        Value::Number(n) => n.as_u64().unwrap_or(0),
        _ => 0,
    }
}

pub fn round_to_hundredths(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Descending order; NaN compares equal so stable sorts keep such entries in place.
pub fn compare_desc_float(a: f64, b: f64) -> Ordering {
    b.partial_cmp(&a).unwrap_or(Ordering::Equal)
}

pub fn compare_desc_int(a: u64, b: u64) -> Ordering {
    b.cmp(&a)
}
