//! Timestamp normalization.
//!
//! Records carry their report time as text. Current releases write the
//! 12-hour canonical form; older snapshots hold ISO-8601 date-times. Both
//! are rendered into the canonical form for display, and anything that
//! parses as neither is passed through untouched.

use chrono::{DateTime, NaiveDate, NaiveDateTime, Timelike};

/// `YYYY-MM-DD hh:mm:ss AM/PM`
pub const CANONICAL_FORMAT: &str = "%Y-%m-%d %I:%M:%S %p";

// `%.f` consumes an optional fractional part when parsing.
const LEGACY_NAIVE_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M",
    "%Y%m%dT%H%M%S%.f",
    "%Y%m%dT%H%M",
];

const LEGACY_OFFSET_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f%:z",
    "%Y-%m-%d %H:%M:%S%.f%:z",
    "%Y-%m-%dT%H:%M%:z",
    "%Y-%m-%d %H:%M%:z",
];

/// Render a date-time in the canonical display format.
pub fn format_canonical(dt: &NaiveDateTime) -> String {
    dt.format(CANONICAL_FORMAT).to_string()
}

/// Parse either encoding. Offsets are dropped and the wall clock kept.
pub fn parse(raw: &str) -> Option<NaiveDateTime> {
    NaiveDateTime::parse_from_str(raw, CANONICAL_FORMAT)
        .ok()
        .or_else(|| parse_legacy(raw))
}

fn parse_legacy(raw: &str) -> Option<NaiveDateTime> {
    let raw = raw.trim();

    if let Some(dt) = LEGACY_NAIVE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
    {
        return Some(dt);
    }

    if let Some(dt) = LEGACY_OFFSET_FORMATS
        .iter()
        .find_map(|fmt| DateTime::parse_from_str(raw, fmt).ok())
        .or_else(|| DateTime::parse_from_rfc3339(raw).ok())
    {
        return Some(dt.naive_local());
    }

    if let Some(dt) = parse_date_and_hour(raw) {
        return Some(dt);
    }

    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
}

/// `YYYY-MM-DDTHH`: chrono will not build a time without minutes.
fn parse_date_and_hour(raw: &str) -> Option<NaiveDateTime> {
    let (date, rest) = NaiveDate::parse_and_remainder(raw, "%Y-%m-%d").ok()?;
    let hour = rest.strip_prefix('T').or_else(|| rest.strip_prefix(' '))?;
    if hour.len() != 2 || !hour.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    date.and_hms_opt(hour.parse().ok()?, 0, 0)
}

/// Parse and truncate to whole seconds, the granularity of the display form.
pub fn parse_whole_seconds(raw: &str) -> Option<NaiveDateTime> {
    parse(raw).and_then(|dt| dt.with_nanosecond(0))
}

/// Canonical rendering of `raw`, or `raw` itself when it cannot be parsed.
///
/// The output is not guaranteed to be re-parseable.
pub fn normalize(raw: &str) -> String {
    match parse(raw) {
        Some(dt) => format_canonical(&dt),
        None => raw.to_string(),
    }
}
