//! Field normalizers for raw sheet cells.
//!
//! Each normalizer is a pure function from cell text to a typed value. Dates come back
//! as `None` when no accepted format matches; completion and status always produce a
//! value.

use std::sync::OnceLock;

use chrono::{DateTime, Duration, NaiveDate, NaiveDateTime, Utc};
use regex::Regex;

use crate::fields::Status;

const ISO_DATE_FORMATS: [&str; 2] = ["%Y-%m-%d", "%Y/%m/%d"];
const ISO_DATETIME_FORMATS: [&str; 4] = [
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%d %H:%M",
];
const TEXT_DATE_FORMATS: [&str; 6] = [
    "%B %d, %Y",
    "%b %d, %Y",
    "%B %d %Y",
    "%b %d %Y",
    "%d %B %Y",
    "%d %b %Y",
];

fn serial_re() -> &'static Regex {
    static SERIAL_RE: OnceLock<Regex> = OnceLock::new();
    SERIAL_RE.get_or_init(|| Regex::new(r"^\d+(\.\d+)?$").expect("valid serial date regex"))
}

fn month_day_year_re() -> &'static Regex {
    static MDY_RE: OnceLock<Regex> = OnceLock::new();
    MDY_RE.get_or_init(|| {
        Regex::new(r"^(\d{1,2})[/-](\d{1,2})[/-](\d{4}|\d{2})$").expect("valid m/d/y regex")
    })
}

fn iso_prefix_re() -> &'static Regex {
    static ISO_RE: OnceLock<Regex> = OnceLock::new();
    ISO_RE.get_or_init(|| Regex::new(r"^\d{4}[-/]").expect("valid iso prefix regex"))
}

/// Day zero of spreadsheet serial dates.
pub fn serial_epoch() -> NaiveDate {
    NaiveDate::from_ymd_opt(1899, 12, 30).unwrap_or_default()
}

/// Normalize a date cell.
///
/// Accepts spreadsheet serial numbers, ISO-style text (optionally with a time or
/// offset, converted to UTC), spelled-out month names, and `M/D/YYYY` or `M-D-YYYY`
/// with two- or four-digit years.
pub fn normalize_date(value: &str) -> Option<NaiveDate> {
    let value = value.trim();
    if value.is_empty() {
        return None;
    }

    if serial_re().is_match(value) {
        return parse_serial(value);
    }

    if iso_prefix_re().is_match(value) {
        if let Some(date) = parse_iso(value) {
            return Some(date);
        }
    }

    if let Some(date) = TEXT_DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(value, fmt).ok())
    {
        return Some(date);
    }

    parse_month_day_year(value)
}

fn parse_serial(value: &str) -> Option<NaiveDate> {
    let days: f64 = value.parse().ok()?;
    if !days.is_finite() || days > i32::MAX as f64 {
        return None;
    }
    // Fractional part is the time of day
    serial_epoch().checked_add_signed(Duration::days(days.floor() as i64))
}

fn parse_iso(value: &str) -> Option<NaiveDate> {
    if let Some(date) = ISO_DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(value, fmt).ok())
    {
        return Some(date);
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Some(dt.with_timezone(&Utc).date_naive());
    }
    ISO_DATETIME_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(value, fmt).ok())
        .map(|dt| dt.date())
}

fn parse_month_day_year(value: &str) -> Option<NaiveDate> {
    let caps = month_day_year_re().captures(value)?;
    let first: u32 = caps[1].parse().ok()?;
    let second: u32 = caps[2].parse().ok()?;
    let year_text = &caps[3];
    let mut year: i32 = year_text.parse().ok()?;
    if year_text.len() == 2 {
        year += 2000;
    }

    // Whichever field exceeds 12 must be the day; otherwise month comes first.
    let (month, day) = if first > 12 {
        (second, first)
    } else {
        (first, second)
    };
    NaiveDate::from_ymd_opt(year, month, day)
}

/// Normalize a completion cell to a whole percentage in `0..=100`.
pub fn normalize_completion(value: &str) -> u8 {
    let value = value.trim();
    let value = value.strip_suffix('%').unwrap_or(value).trim();
    match value.parse::<f64>() {
        Ok(n) if n.is_finite() => n.round().clamp(0.0, 100.0) as u8,
        _ => 0,
    }
}

/// Normalize a status cell, falling back to a completion-derived default.
///
/// The fallback is `Completed` at 100, `On Track` at 0, and `At Risk` in between.
pub fn normalize_status(value: &str, completion: u8) -> Status {
    Status::from_label(value).unwrap_or_else(|| default_status(completion))
}

/// Status implied by completion alone.
pub fn default_status(completion: u8) -> Status {
    if completion >= 100 {
        Status::Completed
    } else if completion == 0 {
        Status::OnTrack
    } else {
        Status::AtRisk
    }
}

/// Whole days between two dates; a reversed window counts its absolute length.
pub fn duration_days(start: NaiveDate, end: NaiveDate) -> i64 {
    (end - start).num_days().abs()
}
