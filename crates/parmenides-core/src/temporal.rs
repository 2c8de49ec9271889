//! Permissive, locale-agnostic date and time parsing.
//!
//! Inputs are tried against a fixed list of formats, most specific first:
//! RFC 3339, RFC 2822, ISO-like date-times with or without an offset, then
//! plain calendar dates. Inputs without an offset are read as UTC when an
//! instant is needed.

use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime, Offset, TimeZone, Utc};

const OFFSET_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S %z",
    "%Y-%m-%d %H:%M:%S%.f %z",
    "%Y-%m-%d %H:%M %z",
    "%Y-%m-%dT%H:%M:%S%z",
    "%Y-%m-%dT%H:%M:%S%.f%z",
    "%Y-%m-%d %H:%M:%S%:z",
    "%Y/%m/%d %H:%M:%S %z",
];

const NAIVE_DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
    "%Y-%m-%dT%H:%M",
    "%Y/%m/%d %H:%M:%S",
    "%Y/%m/%d %H:%M",
    "%d %b %Y %H:%M:%S",
    "%b %d %Y %H:%M:%S",
];

const DATE_FORMATS: &[&str] = &[
    "%Y-%m-%d",
    "%Y/%m/%d",
    "%d %b %Y",
    "%d %B %Y",
    "%b %d %Y",
    "%B %d %Y",
    "%b %d, %Y",
    "%B %d, %Y",
    "%a, %d %b %Y",
    "%A, %d %B %Y",
];

enum Parsed {
    Aware(DateTime<FixedOffset>),
    Naive(NaiveDateTime),
    Date(NaiveDate),
}

fn parse_any(input: &str) -> Option<Parsed> {
    let input = input.trim();
    if input.is_empty() {
        return None;
    }

    if let Ok(time) = DateTime::parse_from_rfc3339(input) {
        return Some(Parsed::Aware(time));
    }
    if let Ok(time) = DateTime::parse_from_rfc2822(input) {
        return Some(Parsed::Aware(time));
    }
    for format in OFFSET_FORMATS {
        if let Ok(time) = DateTime::parse_from_str(input, format) {
            return Some(Parsed::Aware(time));
        }
    }
    for format in NAIVE_DATETIME_FORMATS {
        if let Ok(datetime) = NaiveDateTime::parse_from_str(input, format) {
            return Some(Parsed::Naive(datetime));
        }
    }
    for format in DATE_FORMATS {
        if let Ok(date) = NaiveDate::parse_from_str(input, format) {
            return Some(Parsed::Date(date));
        }
    }
    parse_compact_date(input).map(Parsed::Date)
}

// YYYYMMDD
fn parse_compact_date(input: &str) -> Option<NaiveDate> {
    if input.len() != 8 || !input.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    let year = input[..4].parse().ok()?;
    let month = input[4..6].parse().ok()?;
    let day = input[6..].parse().ok()?;
    NaiveDate::from_ymd_opt(year, month, day)
}

fn utc() -> FixedOffset {
    Utc.fix()
}

/// Parses an instant. Inputs without an offset are taken as UTC.
///
/// ```rust
/// use parmenides_core::temporal::parse_time;
///
/// let time = parse_time("2014-01-20T10:30:00+01:00").unwrap();
/// assert_eq!(time.to_rfc3339(), "2014-01-20T10:30:00+01:00");
/// assert!(parse_time("not a time").is_none());
/// ```
#[must_use]
pub fn parse_time(input: &str) -> Option<DateTime<FixedOffset>> {
    match parse_any(input)? {
        Parsed::Aware(time) => Some(time),
        Parsed::Naive(datetime) => Some(utc().from_utc_datetime(&datetime)),
        Parsed::Date(date) => Some(utc().from_utc_datetime(&date.and_hms_opt(0, 0, 0)?)),
    }
}

/// Parses a calendar date. Date-time inputs keep their calendar date as
/// written.
#[must_use]
pub fn parse_date(input: &str) -> Option<NaiveDate> {
    match parse_any(input)? {
        Parsed::Aware(time) => Some(time.date_naive()),
        Parsed::Naive(datetime) => Some(datetime.date()),
        Parsed::Date(date) => Some(date),
    }
}

/// Parses a calendar date-time. Offsets are dropped and the wall-clock time
/// is kept as written; plain dates start at midnight.
#[must_use]
pub fn parse_datetime(input: &str) -> Option<NaiveDateTime> {
    match parse_any(input)? {
        Parsed::Aware(time) => Some(time.naive_local()),
        Parsed::Naive(datetime) => Some(datetime),
        Parsed::Date(date) => date.and_hms_opt(0, 0, 0),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Datelike, Timelike};

    #[test]
    fn test_parse_date_formats() {
        let expected = NaiveDate::from_ymd_opt(2014, 1, 20).unwrap();
        for input in [
            "2014-01-20",
            "2014/01/20",
            "20 Jan 2014",
            "Jan 20 2014",
            "January 20, 2014",
            "20140120",
            "2014-01-20T08:00:00Z",
            " 2014-01-20 ",
        ] {
            assert_eq!(parse_date(input), Some(expected), "input: {input}");
        }
    }

    #[test]
    fn test_parse_time_with_offset() {
        let time = parse_time("2014-01-20 10:00:00 +0200").unwrap();
        assert_eq!(time.offset().local_minus_utc(), 7200);
        assert_eq!(time.hour(), 10);
    }

    #[test]
    fn test_parse_time_naive_is_utc() {
        let time = parse_time("2014-01-20 10:00").unwrap();
        assert_eq!(time.offset().local_minus_utc(), 0);
        assert_eq!(time.minute(), 0);
    }

    #[test]
    fn test_parse_rfc2822() {
        let time = parse_time("Mon, 20 Jan 2014 10:00:00 +0000").unwrap();
        assert_eq!(time.day(), 20);
    }

    #[test]
    fn test_parse_datetime_keeps_wall_clock() {
        let datetime = parse_datetime("2014-01-20T23:30:00-05:00").unwrap();
        assert_eq!(datetime.day(), 20);
        assert_eq!(datetime.hour(), 23);

        let midnight = parse_datetime("2014-01-20").unwrap();
        assert_eq!(midnight.hour(), 0);
    }

    #[test]
    fn test_rejects_garbage() {
        assert!(parse_time("").is_none());
        assert!(parse_date("yesterday-ish").is_none());
        assert!(parse_date("2014-13-45").is_none());
        assert!(parse_datetime("12345678").is_none());
    }
}
