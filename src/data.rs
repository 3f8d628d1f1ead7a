//! Cell-level parsing: numeric casts, calendar dates, and month names.
//!
//! Every parser here is an explicit ordered list of attempts with defined
//! failure behavior. A failed parse yields `None`, which callers treat as
//! a missing value, never as zero and never as a hard error.

use chrono::{NaiveDate, NaiveDateTime};

pub const MONTH_ABBREVIATIONS: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
];

const MONTH_NAMES: [&str; 12] = [
    "January",
    "February",
    "March",
    "April",
    "May",
    "June",
    "July",
    "August",
    "September",
    "October",
    "November",
    "December",
];

const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%d/%m/%Y", "%m/%d/%Y", "%Y/%m/%d", "%d-%m-%Y"];

const DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%d %H:%M",
    "%d/%m/%Y %H:%M:%S",
    "%m/%d/%Y %H:%M:%S",
];

/// Numeric cast of a raw cell. Blank cells and unparseable text are
/// missing, not zero.
pub fn parse_number(raw: &str) -> Option<f64> {
    let cleaned = raw.trim();
    if cleaned.is_empty() {
        return None;
    }
    cleaned.parse::<f64>().ok().filter(|v| v.is_finite())
}

/// Integer cast used for year cells. Accepts integral floats such as
/// "2024.0" but rejects fractional values.
pub fn parse_integer(raw: &str) -> Option<i32> {
    let value = parse_number(raw)?;
    if value.fract() != 0.0 {
        return None;
    }
    let truncated = value as i64;
    i32::try_from(truncated).ok()
}

/// Month cast: integer 1-12, then three-letter abbreviation, then full
/// month name, all case-insensitive. Out-of-range numbers are missing.
pub fn parse_month_number(raw: &str) -> Option<u32> {
    let cleaned = raw.trim();
    if cleaned.is_empty() {
        return None;
    }
    if let Some(numeric) = parse_integer(cleaned) {
        return u32::try_from(numeric).ok().filter(|m| (1..=12).contains(m));
    }
    for (idx, abbr) in MONTH_ABBREVIATIONS.iter().enumerate() {
        if cleaned.eq_ignore_ascii_case(abbr) {
            return Some(idx as u32 + 1);
        }
    }
    for (idx, name) in MONTH_NAMES.iter().enumerate() {
        if cleaned.eq_ignore_ascii_case(name) {
            return Some(idx as u32 + 1);
        }
    }
    None
}

///// Calendar-date cast over an explicit format list: date formats first,
/// then datetime formats truncated to their date part.
pub fn parse_flexible_date(raw: &str) -> Option<NaiveDate> {
    let cleaned = raw.trim();
    if cleaned.is_empty() {
        return None;
    }
    for fmt in DATE_FORMATS {
        if let Ok(parsed) = NaiveDate::parse_from_str(cleaned, fmt) {
            return Some(parsed);
        }
    }
    for fmt in DATETIME_FORMATS {
        if let Ok(parsed) = NaiveDateTime::parse_from_str(cleaned, fmt) {
            return Some(parsed.date());
        }
    }
    None
}

/// Renders totals the way they entered the file: integral values without a
/// trailing ".0".
pub fn format_number(value: f64) -> String {
    if value.fract() == 0.0 && value.abs() < i64::MAX as f64 {
        (value as i64).to_string()
    } else {
        value.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn parse_number_treats_blank_and_garbage_as_missing() {
        assert_eq!(parse_number("10.5"), Some(10.5));
        assert_eq!(parse_number("  42 "), Some(42.0));
        assert_eq!(parse_number(""), None);
        assert_eq!(parse_number("n/a"), None);
        assert_eq!(parse_number("inf"), None);
    }

    #[test]
    fn parse_integer_accepts_integral_floats_only() {
        assert_eq!(parse_integer("2024"), Some(2024));
        assert_eq!(parse_integer("2024.0"), Some(2024));
        assert_eq!(parse_integer("2024.5"), None);
        assert_eq!(parse_integer("year"), None);
    }

    #[test]
    fn parse_month_number_tries_integer_then_names() {
        assert_eq!(parse_month_number("3"), Some(3));
        assert_eq!(parse_month_number("3.0"), Some(3));
        assert_eq!(parse_month_number("Jan"), Some(1));
        assert_eq!(parse_month_number("jAN"), Some(1));
        assert_eq!(parse_month_number("February"), Some(2));
        assert_eq!(parse_month_number("december"), Some(12));
    }

    #[test]
    fn parse_month_number_rejects_out_of_range_and_bogus() {
        assert_eq!(parse_month_number("0"), None);
        assert_eq!(parse_month_number("13"), None);
        assert_eq!(parse_month_number("bogus"), None);
        assert_eq!(parse_month_number(""), None);
    }

    #[test]
    fn parse_flexible_date_supports_multiple_formats() {
        let expected = NaiveDate::from_ymd_opt(2024, 5, 6).unwrap();
        assert_eq!(parse_flexible_date("2024-05-06"), Some(expected));
        assert_eq!(parse_flexible_date("06/05/2024"), Some(expected));
        assert_eq!(parse_flexible_date("2024/05/06"), Some(expected));
        assert_eq!(parse_flexible_date("2024-05-06 14:30:00"), Some(expected));
        assert_eq!(parse_flexible_date("not a date"), None);
    }

    #[test]
    fn ambiguous_slashed_dates_resolve_day_first() {
        // Both readings are valid calendar dates here; the day-first
        // format wins because it is listed first.
        assert_eq!(
            parse_flexible_date("01/02/2024"),
            NaiveDate::from_ymd_opt(2024, 2, 1)
        );
        // Day 25 rules out month-first, so the same list still accepts it.
        assert_eq!(
            parse_flexible_date("25/12/2024"),
            NaiveDate::from_ymd_opt(2024, 12, 25)
        );
    }

    #[test]
    fn format_number_drops_trailing_zero_fraction() {
        assert_eq!(format_number(15.0), "15");
        assert_eq!(format_number(7.25), "7.25");
    }
}
