//! Date normalization for extras
//!
//! Catalog records carry dates in many notations. Every date is rewritten to
//! [`NORMALIZED_DATE_FORMAT`] using the wall-clock value as written: offsets
//! and zone names are dropped, never applied.
//!
//! Known notations are tried first, most specific first. Anything else goes
//! through a permissive fallback before the value is rejected.

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use thiserror::Error;

/// Canonical output format
pub const NORMALIZED_DATE_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Value matched neither a known notation nor the fallback parser
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid date format: '{0}'")]
pub struct DateParseError(pub String);

/// How a notation ends
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Zone {
    /// No zone marker
    None,
    /// Numeric offset parsed by chrono (`%z`)
    Offset,
    /// Alphabetic zone name directly after the time
    Name,
    /// Alphabetic zone name after a single space
    SpacedName,
}

#[derive(Debug, Clone, Copy)]
struct Notation {
    pattern: &'static str,
    zone: Zone,
    date_only: bool,
}

const fn notation(pattern: &'static str, zone: Zone) -> Notation {
    Notation {
        pattern,
        zone,
        date_only: false,
    }
}

const fn date_notation(pattern: &'static str) -> Notation {
    Notation {
        pattern,
        zone: Zone::None,
        date_only: true,
    }
}

/// Known notations in priority order
const NOTATIONS: [Notation; 14] = [
    notation("%Y-%m-%dT%H:%M:%S%z", Zone::Offset),
    notation("%Y-%m-%dT%H:%M:%S", Zone::Name),
    notation("%Y-%m-%dT%H:%M:%S", Zone::None),
    notation("%Y-%m-%d %H:%M:%S%z", Zone::Offset),
    notation("%Y-%m-%d %H:%M:%S", Zone::Name),
    notation("%Y-%m-%d %H:%M:%S %z", Zone::Offset),
    notation("%Y-%m-%d %H:%M:%S", Zone::SpacedName),
    notation("%Y-%m-%d %H:%M:%S", Zone::None),
    date_notation("%Y-%m-%d"),
    notation("%d.%m.%YT%H:%M:%S%z", Zone::Offset),
    notation("%d.%m.%YT%H:%M:%S", Zone::Name),
    notation("%d.%m.%YT%H:%M:%S", Zone::None),
    notation("%d.%m.%Y %H:%M:%S", Zone::None),
    date_notation("%d.%m.%Y"),
];

/// Fallback notations carrying an offset
const FALLBACK_OFFSET_PATTERNS: [&str; 4] = [
    "%Y-%m-%dT%H:%M:%S%.f%:z",
    "%Y-%m-%dT%H:%M:%S%.f%z",
    "%Y-%m-%d %H:%M:%S%.f%:z",
    "%Y-%m-%dT%H:%M%:z",
];

/// Fallback notations without zone
const FALLBACK_DATETIME_PATTERNS: [&str; 12] = [
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M",
    "%Y%m%dT%H%M%S",
    "%Y/%m/%d %H:%M:%S",
    "%d.%m.%Y %H:%M",
    "%d.%m.%Y %H:%M:%S%.f",
    "%d %B %Y %H:%M:%S",
    "%d %B %Y %H:%M",
    "%B %d, %Y %H:%M:%S",
    "%B %d %Y %H:%M:%S",
];

/// Fallback date-only notations; `%B` also accepts abbreviated month names
const FALLBACK_DATE_PATTERNS: [&str; 7] = [
    "%Y%m%d",
    "%Y/%m/%d",
    "%m/%d/%Y",
    "%d %B %Y",
    "%d. %B %Y",
    "%B %d, %Y",
    "%B %d %Y",
];

/// Notations without a day; the first of the month is assumed
const FALLBACK_MONTH_PATTERNS: [&str; 4] = ["%Y-%m", "%m/%Y", "%B %Y", "%m.%Y"];

/// Normalize a date string to `YYYY-MM-DD HH:MM:SS`
pub fn normalize_date(value: &str) -> Result<String, DateParseError> {
    parse_date(value).map(|parsed| parsed.format(NORMALIZED_DATE_FORMAT).to_string())
}

/// Parse a date string into its wall-clock value
pub fn parse_date(value: &str) -> Result<NaiveDateTime, DateParseError> {
    NOTATIONS
        .iter()
        .find_map(|notation| parse_notation(value, notation))
        .or_else(|| parse_permissive(value))
        .ok_or_else(|| DateParseError(value.to_string()))
}

fn parse_notation(value: &str, notation: &Notation) -> Option<NaiveDateTime> {
    if notation.date_only {
        return NaiveDate::parse_from_str(value, notation.pattern)
            .ok()
            .and_then(|date| date.and_hms_opt(0, 0, 0));
    }

    match notation.zone {
        Zone::None => NaiveDateTime::parse_from_str(value, notation.pattern).ok(),
        Zone::Offset => DateTime::parse_from_str(value, notation.pattern)
            .ok()
            .map(|parsed| parsed.naive_local()),
        Zone::Name => strip_zone_name(value)
            .and_then(|rest| NaiveDateTime::parse_from_str(rest, notation.pattern).ok()),
        Zone::SpacedName => strip_zone_name(value)
            .and_then(|rest| rest.strip_suffix(' '))
            .and_then(|rest| NaiveDateTime::parse_from_str(rest, notation.pattern).ok()),
    }
}

/// Remove a trailing alphabetic zone name; `None` if there is none
fn strip_zone_name(value: &str) -> Option<&str> {
    let rest = value.trim_end_matches(|c: char| c.is_ascii_alphabetic());
    (rest.len() < value.len()).then_some(rest)
}

fn parse_permissive(value: &str) -> Option<NaiveDateTime> {
    let value = value.trim();
    if value.is_empty() {
        return None;
    }

    parse_fallback(value)
        .or_else(|| {
            strip_zone_name(value)
                .map(str::trim_end)
                .filter(|rest| !rest.is_empty())
                .and_then(parse_fallback)
        })
        .or_else(|| parse_partial_date(value).and_then(|date| date.and_hms_opt(0, 0, 0)))
}

fn parse_fallback(value: &str) -> Option<NaiveDateTime> {
    if let Ok(parsed) = DateTime::parse_from_rfc3339(value) {
        return Some(parsed.naive_local());
    }
    if let Ok(parsed) = DateTime::parse_from_rfc2822(value) {
        return Some(parsed.naive_local());
    }

    FALLBACK_OFFSET_PATTERNS
        .iter()
        .find_map(|pattern| DateTime::parse_from_str(value, pattern).ok())
        .map(|parsed| parsed.naive_local())
        .or_else(|| {
            FALLBACK_DATETIME_PATTERNS
                .iter()
                .find_map(|pattern| NaiveDateTime::parse_from_str(value, pattern).ok())
        })
        .or_else(|| {
            FALLBACK_DATE_PATTERNS
                .iter()
                .find_map(|pattern| NaiveDate::parse_from_str(value, pattern).ok())
                .and_then(|date| date.and_hms_opt(0, 0, 0))
        })
}

/// Bare year or year and month, completed to the first day
fn parse_partial_date(value: &str) -> Option<NaiveDate> {
    if value.len() == 4 && value.bytes().all(|b| b.is_ascii_digit()) {
        return value
            .parse()
            .ok()
            .and_then(|year| NaiveDate::from_ymd_opt(year, 1, 1));
    }

    let with_day = format!("{} 1", value);
    FALLBACK_MONTH_PATTERNS.iter().find_map(|pattern| {
        NaiveDate::parse_from_str(&with_day, &format!("{} %d", pattern)).ok()
    })
}
