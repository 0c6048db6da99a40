//! Date normalization.
//!
//! Turns the calendar representations that show up in application data into
//! the canonical UTC timestamp string the index stores
//! (`2012-11-06T00:00:00Z`). Blank input means "no value".

use std::sync::LazyLock;

use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, Utc};
use regex::Regex;

use crate::error::ConversionError;
use crate::value::FieldValue;

/// Output format for normalized timestamps.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%SZ";

const DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
];

const TIME_FORMATS: &[&str] = &["%H:%M:%S", "%H:%M"];

const DATE_FORMATS: &[&str] = &[
    "%Y-%m-%d",
    "%Y/%m/%d",
    "%m/%d/%Y",
    "%B %d %Y",
    "%b %d %Y",
    "%d %B %Y",
    "%d %b %Y",
    "%Y %B %d",
    "%Y %b %d",
];

static ORDINAL_SUFFIX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\b(\d{1,2})(st|nd|rd|th)\b").expect("valid ordinal pattern"));

static LEADING_WEEKDAY: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^(?:mon|tue|wed|thu|fri|sat|sun)[a-z]*\.?,?\s+").expect("valid weekday pattern")
});

/// Normalizes a value to a canonical timestamp string.
///
/// Returns `Ok(None)` for blank text. Text that matches none of the
/// supported representations is an error, as is any non-calendar value.
pub fn normalize(value: &FieldValue, field_name: &str) -> Result<Option<String>, ConversionError> {
    match value {
        FieldValue::Date(date) => Ok(Some(format_date(*date))),
        FieldValue::DateTime(dt) => Ok(Some(dt.format(TIMESTAMP_FORMAT).to_string())),
        FieldValue::Text(s) if s.trim().is_empty() => Ok(None),
        FieldValue::Text(s) => parse_text(s)
            .map(|dt| Some(dt.format(TIMESTAMP_FORMAT).to_string()))
            .ok_or_else(|| ConversionError::UnparseableDate {
                field_name: field_name.to_string(),
                value: s.clone(),
            }),
        other => Err(ConversionError::UnparseableDate {
            field_name: field_name.to_string(),
            value: other.to_string(),
        }),
    }
}

fn format_date(date: NaiveDate) -> String {
    date.and_time(NaiveTime::MIN)
        .and_utc()
        .format(TIMESTAMP_FORMAT)
        .to_string()
}

/// Parses free-form date text into a UTC instant.
fn parse_text(input: &str) -> Option<DateTime<Utc>> {
    let input = input.trim();

    if let Ok(dt) = DateTime::parse_from_rfc3339(input) {
        return Some(dt.with_timezone(&Utc));
    }
    if let Ok(dt) = DateTime::parse_from_rfc2822(input) {
        return Some(dt.with_timezone(&Utc));
    }

    for format in DATETIME_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(input, format) {
            return Some(dt.and_utc());
        }
    }

    let cleaned = clean_natural_date(input);
    for format in DATE_FORMATS {
        if let Ok(date) = NaiveDate::parse_from_str(&cleaned, format) {
            return Some(date.and_time(NaiveTime::MIN).and_utc());
        }
    }

    // Natural date followed by a wall-clock time, taken as UTC.
    DATE_FORMATS.iter().find_map(|date_format| {
        TIME_FORMATS.iter().find_map(|time_format| {
            NaiveDateTime::parse_from_str(&cleaned, &format!("{} {}", date_format, time_format))
                .ok()
                .map(|dt| dt.and_utc())
        })
    })
}

/// Strips a leading weekday, ordinal suffixes and punctuation:
/// "Tue, 06 Nov 2012" becomes "06 Nov 2012", "November 6th, 2012" becomes
/// "November 6 2012", "6 Nov. 2012" becomes "6 Nov 2012".
fn clean_natural_date(input: &str) -> String {
    let without_weekday = LEADING_WEEKDAY.replace(input, "");
    let without_ordinals = ORDINAL_SUFFIX.replace_all(&without_weekday, "$1");
    without_ordinals
        .replace([',', '.'], " ")
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}
