//! Display formatting for stored values.
//!
//! Dates and timestamps are stored as `YYYY-MM-DD` and `YYYY-MM-DD HH:MM:SS`
//! text. Tables show them day-first as `DD.MM.YYYY` and `DD.MM.YYYY HH:MM`.
//! Anything else passes through unchanged.

use crate::libs::validators::{DATETIME_FORMAT, DATE_FORMAT};
use chrono::{NaiveDate, NaiveDateTime};

pub const DISPLAY_DATE_FORMAT: &str = "%d.%m.%Y";
pub const DISPLAY_DATETIME_FORMAT: &str = "%d.%m.%Y %H:%M";

pub fn format_date(date: &NaiveDate) -> String {
    date.format(DISPLAY_DATE_FORMAT).to_string()
}

pub fn format_datetime(datetime: &NaiveDateTime) -> String {
    datetime.format(DISPLAY_DATETIME_FORMAT).to_string()
}

/// Formats one table cell, recognising stored dates and timestamps.
pub fn format_cell(value: &str) -> String {
    if let Ok(datetime) = NaiveDateTime::parse_from_str(value, DATETIME_FORMAT) {
        return format_datetime(&datetime);
    }
    // Only exact ten-character dates; "2024" or "12-1" must not be touched.
    if value.len() == 10 {
        if let Ok(date) = NaiveDate::parse_from_str(value, DATE_FORMAT) {
            return format_date(&date);
        }
    }
    value.to_string()
}

/// Column headers as shown to users: `full_name` becomes `FULL NAME`.
pub fn format_header(column: &str) -> String {
    column.replace('_', " ").to_uppercase()
}
