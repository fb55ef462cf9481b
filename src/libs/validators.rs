//! Input rules applied before anything reaches the store.
//!
//! Each validator either returns the normalised value (trimmed text, parsed
//! number or timestamp) or the [`ValidationError`] describing the broken rule.

use crate::db::error::ValidationError;
use chrono::{Datelike, Local, NaiveDate, NaiveDateTime};

pub const DATE_FORMAT: &str = "%Y-%m-%d";
pub const DATETIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

const NAME_MIN: usize = 3;
const NAME_MAX: usize = 255;
const TITLE_MIN: usize = 2;
const TITLE_MAX: usize = 255;
const YEAR_MIN: i32 = 1000;
/// Plays may be registered up to this many years ahead.
const YEAR_AHEAD: i32 = 10;
const CALENDAR_MIN_YEAR: i32 = 1900;
const CALENDAR_MAX_YEAR: i32 = 2100;
pub const CAPACITY_MIN: i64 = 1;
pub const CAPACITY_MAX: i64 = 100_000;

type Result<T> = std::result::Result<T, ValidationError>;

fn is_name_char(ch: char) -> bool {
    ch.is_ascii_alphabetic()
        || ('А'..='я').contains(&ch)
        || ch == 'Ё'
        || ch == 'ё'
        || ch.is_whitespace()
        || matches!(ch, '-' | '.' | ',')
}

fn bounded_text(field: &'static str, value: &str, min: usize, max: usize) -> Result<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(ValidationError::Empty { field });
    }
    let length = trimmed.chars().count();
    if length < min || length > max {
        return Err(ValidationError::Length { field, min, max });
    }
    Ok(trimmed.to_string())
}

/// A person's full name: 3 to 255 Latin or Cyrillic letters, spaces,
/// hyphens, dots and commas.
pub fn full_name(field: &'static str, value: &str) -> Result<String> {
    let name = bounded_text(field, value, NAME_MIN, NAME_MAX)?;
    if !name.chars().all(is_name_char) {
        return Err(ValidationError::Characters { field });
    }
    Ok(name)
}

/// A title or name of a thing: 2 to 255 characters.
pub fn title(field: &'static str, value: &str) -> Result<String> {
    bounded_text(field, value, TITLE_MIN, TITLE_MAX)
}

/// Latest accepted year, relative to today.
pub fn max_year() -> i32 {
    Local::now().year() + YEAR_AHEAD
}

pub fn year(value: Option<i32>) -> Result<Option<i32>> {
    match value {
        Some(year) if year < YEAR_MIN || year > max_year() => Err(ValidationError::YearRange {
            min: YEAR_MIN,
            max: max_year(),
        }),
        other => Ok(other),
    }
}

/// Parses an optional year from user input; blank means "not set".
pub fn parse_year(value: &str) -> Result<Option<i32>> {
    let value = value.trim();
    if value.is_empty() {
        return Ok(None);
    }
    let parsed = value.parse().map_err(|_| ValidationError::NotANumber { field: "year" })?;
    year(Some(parsed))
}

/// Optional `YYYY-MM-DD` date between 1900-01-01 and 2100-12-31.
pub fn date(value: &str) -> Result<Option<NaiveDate>> {
    let value = value.trim();
    if value.is_empty() {
        return Ok(None);
    }
    let parsed = NaiveDate::parse_from_str(value, DATE_FORMAT).map_err(|_| ValidationError::DateFormat {
        value: value.to_string(),
    })?;
    check_date(parsed).map(Some)
}

pub fn check_date(value: NaiveDate) -> Result<NaiveDate> {
    if !(CALENDAR_MIN_YEAR..=CALENDAR_MAX_YEAR).contains(&value.year()) {
        return Err(ValidationError::DateRange);
    }
    Ok(value)
}

/// Required `YYYY-MM-DD HH:MM:SS` timestamp between 1900 and 2100.
pub fn datetime(value: &str) -> Result<NaiveDateTime> {
    let value = value.trim();
    if value.is_empty() {
        return Err(ValidationError::Required { field: "datetime" });
    }
    let parsed = NaiveDateTime::parse_from_str(value, DATETIME_FORMAT).map_err(|_| ValidationError::DateTimeFormat {
        value: value.to_string(),
    })?;
    check_datetime(parsed)
}

pub fn check_datetime(value: NaiveDateTime) -> Result<NaiveDateTime> {
    if !(CALENDAR_MIN_YEAR..=CALENDAR_MAX_YEAR).contains(&value.year()) {
        return Err(ValidationError::DateTimeRange);
    }
    Ok(value)
}

pub fn capacity(value: Option<i64>) -> Result<Option<i64>> {
    match value {
        Some(capacity) if !(CAPACITY_MIN..=CAPACITY_MAX).contains(&capacity) => Err(ValidationError::Capacity {
            min: CAPACITY_MIN,
            max: CAPACITY_MAX,
        }),
        other => Ok(other),
    }
}

pub fn parse_capacity(value: &str) -> Result<Option<i64>> {
    let value = value.trim();
    if value.is_empty() {
        return Ok(None);
    }
    let parsed = value.parse().map_err(|_| ValidationError::NotANumber { field: "capacity" })?;
    capacity(Some(parsed))
}

/// A reference to another record. Zero and negative ids count as missing.
pub fn reference(field: &'static str, value: Option<i64>) -> Result<i64> {
    value.filter(|id| *id > 0).ok_or(ValidationError::Required { field })
}

pub fn parse_reference(field: &'static str, value: &str) -> Result<i64> {
    let value = value.trim();
    if value.is_empty() {
        return Err(ValidationError::Required { field });
    }
    let parsed = value.parse().map_err(|_| ValidationError::NotANumber { field })?;
    reference(field, Some(parsed))
}

/// Trimmed free text, `None` when blank.
pub fn optional_text(value: Option<&str>) -> Option<String> {
    value.map(str::trim).filter(|text| !text.is_empty()).map(String::from)
}
