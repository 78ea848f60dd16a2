//! Survey date normalization
//!
//! Free-form client dates become a calendar date stored as `YYYY-MM-DD`.
//! Two strategies are tried in order:
//! 1. Flexible: keywords, RFC 3339 / RFC 2822, ISO forms, named months
//!    (ordinal days allowed), month-year, browser `Date` strings
//! 2. Structured numeric: `m/d/y`, `d-m-y`, `d.m.y`, `Y/m/d`, `Ymd`, `d/m/Y`
//!
//! A parse only counts when its year is four digits wide; chrono reads `24`
//! as year 24, which is never what a client meant. Unparseable input falls
//! back to today's date. The fallback is reported on the result and logged,
//! never raised as an error.

use chrono::{DateTime, Datelike, Days, Local, NaiveDate, NaiveDateTime};
use tracing::warn;

/// Years outside this range are treated as misreads
const PLAUSIBLE_YEARS: std::ops::RangeInclusive<i32> = 1000..=9999;

/// Timestamps with a trailing UTC offset
const FLEXIBLE_OFFSET_FORMATS: &[&str] = &["%Y-%m-%d %H:%M:%S %z", "%Y-%m-%d %H:%M:%S%.f%z"];

/// Date-time forms accepted by the flexible strategy
const FLEXIBLE_DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M",
    "%a %b %d %Y %H:%M:%S",
    // toLocaleString() in en-US
    "%m/%d/%Y, %I:%M:%S %p",
    "%m/%d/%Y %I:%M:%S %p",
    "%m/%d/%Y %H:%M:%S",
    "%m/%d/%Y %H:%M",
];

/// Date forms accepted by the flexible strategy
///
/// `%B` also matches abbreviated month names, case-insensitively. Two-digit
/// years come first; `%y` refuses four digits, so the order is safe.
const FLEXIBLE_DATE_FORMATS: &[&str] = &[
    "%Y-%m-%d",
    "%d %B %y",
    "%d %B %Y",
    "%d %B, %Y",
    "%B %d, %y",
    "%B %d %Y",
    "%B %d, %Y",
    "%d-%B-%y",
    "%d-%B-%Y",
    "%Y-%B-%d",
    "%a %b %d %Y",
    "%A, %d %B %Y",
    "%A, %B %d, %Y",
];

/// Numeric forms accepted by the structured strategy, in priority order
///
/// Slashes read month first; dashes and dots read day first. Day-first
/// slashes are tried last so `15/01/2024` still resolves.
const STRUCTURED_DATE_FORMATS: &[&str] = &[
    "%m/%d/%y",
    "%m/%d/%Y",
    "%d-%m-%y",
    "%d-%m-%Y",
    "%d.%m.%y",
    "%d.%m.%Y",
    "%Y/%m/%d",
    "%d/%m/%Y",
];

/// How a normalized date was obtained
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DateSource {
    /// Parsed from the submitted text
    Parsed,
    /// Submitted text was unusable, today's date was substituted
    Fallback,
}

/// Result of date normalization
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NormalizedDate {
    pub date: NaiveDate,
    pub source: DateSource,
}

impl NormalizedDate {
    /// Canonical `YYYY-MM-DD` text
    pub fn canonical(&self) -> String {
        self.date.format("%Y-%m-%d").to_string()
    }

    pub fn is_fallback(&self) -> bool {
        self.source == DateSource::Fallback
    }
}

/// Normalize a raw date against the local calendar
pub fn normalize_date(raw: &str) -> NormalizedDate {
    normalize_date_at(raw, Local::now().date_naive())
}

/// Normalize a raw date with an explicit "today"
///
/// `today` anchors relative keywords and the fallback.
pub fn normalize_date_at(raw: &str, today: NaiveDate) -> NormalizedDate {
    let input = raw.trim();

    if let Some(date) = parse_flexible(input, today).or_else(|| parse_structured(input)) {
        return NormalizedDate {
            date,
            source: DateSource::Parsed,
        };
    }

    warn!(raw_date = %input, fallback = %today, "Unparseable survey date, using today's date");
    NormalizedDate {
        date: today,
        source: DateSource::Fallback,
    }
}

fn plausible(date: NaiveDate) -> Option<NaiveDate> {
    PLAUSIBLE_YEARS.contains(&date.year()).then_some(date)
}

fn parse_date_formats(input: &str, formats: &[&str]) -> Option<NaiveDate> {
    formats
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(input, fmt).ok().and_then(plausible))
}

fn parse_flexible(input: &str, today: NaiveDate) -> Option<NaiveDate> {
    match input.to_ascii_lowercase().as_str() {
        "today" | "now" => return Some(today),
        "yesterday" => return today.checked_sub_days(Days::new(1)),
        "tomorrow" => return today.checked_add_days(Days::new(1)),
        _ => {}
    }

    if let Some(date) = DateTime::parse_from_rfc3339(input)
        .ok()
        .and_then(|dt| plausible(dt.date_naive()))
    {
        return Some(date);
    }
    if let Some(date) = DateTime::parse_from_rfc2822(input)
        .ok()
        .and_then(|dt| plausible(dt.date_naive()))
    {
        return Some(date);
    }

    let input = strip_ordinal_suffixes(input);
    let input = input.as_str();

    FLEXIBLE_OFFSET_FORMATS
        .iter()
        .find_map(|fmt| {
            DateTime::parse_from_str(input, fmt)
                .ok()
                .and_then(|dt| plausible(dt.date_naive()))
        })
        .or_else(|| {
            FLEXIBLE_DATETIME_FORMATS.iter().find_map(|fmt| {
                NaiveDateTime::parse_from_str(input, fmt)
                    .ok()
                    .and_then(|dt| plausible(dt.date()))
            })
        })
        .or_else(|| parse_date_formats(input, FLEXIBLE_DATE_FORMATS))
        .or_else(|| parse_month_year(input))
}

/// `March 2024` is the first of that month
fn parse_month_year(input: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(&format!("{} 1", input), "%B %Y %d")
        .ok()
        .and_then(plausible)
}

/// Drop `st`/`nd`/`rd`/`th` directly after a digit (`1st` -> `1`)
fn strip_ordinal_suffixes(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    let mut rest = input;
    let mut after_digit = false;

    while let Some(c) = rest.chars().next() {
        if after_digit {
            let is_suffix = rest.get(..2).is_some_and(|head| {
                ["st", "nd", "rd", "th"]
                    .iter()
                    .any(|s| head.eq_ignore_ascii_case(s))
            });
            if is_suffix && !rest[2..].chars().next().is_some_and(char::is_alphanumeric) {
                rest = &rest[2..];
                after_digit = false;
                continue;
            }
        }
        out.push(c);
        after_digit = c.is_ascii_digit();
        rest = &rest[c.len_utf8()..];
    }
    out
}

fn parse_structured(input: &str) -> Option<NaiveDate> {
    // Compact Ymd: chrono's %Y would swallow every digit
    if input.len() == 8 && input.bytes().all(|b| b.is_ascii_digit()) {
        let year = input[0..4].parse().ok()?;
        let month = input[4..6].parse().ok()?;
        let day = input[6..8].parse().ok()?;
        return NaiveDate::from_ymd_opt(year, month, day).and_then(plausible);
    }

    parse_date_formats(input, STRUCTURED_DATE_FORMATS)
}
