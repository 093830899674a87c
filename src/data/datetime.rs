use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};

/// Patterns tried when inferring a temporal column.
pub const DATE_PATTERNS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%d %H:%M:%S%.f",
    "%m/%d/%Y %H:%M:%S",
    "%d/%m/%Y %H:%M:%S",
    "%Y/%m/%d %H:%M:%S",
    "%d-%m-%Y %H:%M:%S",
    "%Y-%m-%d %H:%M",
    "%d/%m/%Y %H:%M",
    "%Y-%m-%d",
    "%m/%d/%Y",
    "%d/%m/%Y",
    "%Y/%m/%d",
    "%m-%d-%Y",
    "%d-%m-%Y",
    "%d.%m.%Y",
];

/// A detected date layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DateFormat {
    /// RFC 3339 / ISO 8601 with offset, e.g. `2026-02-10T22:26:28.987Z`.
    Rfc3339,
    Pattern(&'static str),
}

/// Detect the date format with the highest parse success rate over a sample
/// of up to 100 non-empty values.
pub fn detect_date_format(values: &[&str]) -> Option<DateFormat> {
    let sample: Vec<&str> = values
        .iter()
        .map(|s| s.trim())
        .filter(|s| !s.is_empty())
        .take(100)
        .collect();

    if sample.is_empty() {
        return None;
    }

    let score = |format: DateFormat| {
        let valid = sample.iter().filter(|s| parse_to_timestamp(s, format).is_some()).count();
        valid as f64 / sample.len() as f64
    };

    let mut best_format = None;
    let mut best_score = 0.0;
    let candidates = std::iter::once(DateFormat::Rfc3339)
        .chain(DATE_PATTERNS.iter().map(|&p| DateFormat::Pattern(p)));
    for format in candidates {
        let s = score(format);
        if s > best_score {
            best_score = s;
            best_format = Some(format);
        }
    }

    best_format
}

/// Parse a value to a Unix timestamp in seconds, keeping millisecond precision.
pub fn parse_to_timestamp(value: &str, format: DateFormat) -> Option<f64> {
    match format {
        DateFormat::Rfc3339 => DateTime::parse_from_rfc3339(value)
            .ok()
            .map(|dt| dt.timestamp_millis() as f64 / 1000.0),
        DateFormat::Pattern(pattern) => {
            if let Ok(dt) = NaiveDateTime::parse_from_str(value, pattern) {
                Some(dt.and_utc().timestamp_millis() as f64 / 1000.0)
            } else if let Ok(d) = NaiveDate::parse_from_str(value, pattern) {
                Some(d.and_hms_opt(0, 0, 0)?.and_utc().timestamp() as f64)
            } else {
                None
            }
        }
    }
}

/// Cheap pre-check used by header detection.
pub fn is_date_like(s: &str) -> bool {
    let has_separators = s.contains('/') || s.contains(':') || s.matches('-').count() == 2;
    if !has_separators {
        return false;
    }
    detect_date_format(&[s]).is_some()
}

/// Format a Unix timestamp as a human-readable datetime string.
/// Shows milliseconds when the timestamp has a fractional component.
pub fn format_timestamp(ts: f64) -> String {
    let secs = ts.floor() as i64;
    let nanos = ((ts - ts.floor()) * 1_000_000_000.0) as u32;
    match DateTime::<Utc>::from_timestamp(secs, nanos) {
        Some(dt) => {
            if nanos == 0 {
                dt.format("%Y-%m-%d %H:%M:%S").to_string()
            } else {
                dt.format("%Y-%m-%d %H:%M:%S%.3f").to_string()
            }
        }
        None => format!("{ts:.3}"),
    }
}
