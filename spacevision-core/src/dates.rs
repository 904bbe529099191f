//! Calendar helpers for request parameters and display

use anyhow::{Context, Result};
use chrono::{DateTime, Days, Local, NaiveDate, NaiveDateTime};

/// Format used in request parameters and stored records
pub const ISO_DATE: &str = "%Y-%m-%d";
/// Human-facing format, e.g. "May 01, 2023"
pub const DISPLAY_DATE: &str = "%b %d, %Y";

pub fn today() -> String {
    format_iso(local_today())
}

/// Today plus `days_ahead` (negative values go back)
pub fn future(days_ahead: i64) -> String {
    future_from(local_today(), days_ahead)
}

/// Today minus `days_ago` (negative values go forward)
pub fn past(days_ago: i64) -> String {
    past_from(local_today(), days_ago)
}

pub fn future_from(base: NaiveDate, days_ahead: i64) -> String {
    format_iso(shift(base, days_ahead))
}

pub fn past_from(base: NaiveDate, days_ago: i64) -> String {
    let shifted = match days_ago.checked_neg() {
        Some(days_ahead) => shift(base, days_ahead),
        None => NaiveDate::MAX,
    };
    format_iso(shifted)
}

/// Render a stored date (`YYYY-MM-DD` or a timestamp) as "MMM dd, yyyy"
pub fn display_format(date: &str) -> Result<String> {
    Ok(parse_date(date)?.format(DISPLAY_DATE).to_string())
}

/// Parse the date formats found in upstream records
pub fn parse_date(value: &str) -> Result<NaiveDate> {
    let value = value.trim();
    if let Ok(date) = NaiveDate::parse_from_str(value, ISO_DATE) {
        return Ok(date);
    }
    if let Ok(timestamp) = DateTime::parse_from_rfc3339(value) {
        return Ok(timestamp.date_naive());
    }
    NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M:%S")
        .map(|dt| dt.date())
        .with_context(|| format!("Unrecognized date '{}'", value))
}

fn local_today() -> NaiveDate {
    Local::now().date_naive()
}

/// Shifts past the calendar range clamp to the earliest or latest representable date
fn shift(base: NaiveDate, days: i64) -> NaiveDate {
    let magnitude = Days::new(days.unsigned_abs());
    if days >= 0 {
        base.checked_add_days(magnitude).unwrap_or(NaiveDate::MAX)
    } else {
        base.checked_sub_days(magnitude).unwrap_or(NaiveDate::MIN)
    }
}

fn format_iso(date: NaiveDate) -> String {
    date.format(ISO_DATE).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base() -> NaiveDate {
        NaiveDate::from_ymd_opt(2023, 12, 28).unwrap()
    }

    #[test]
    fn test_future_and_past_cross_year() {
        assert_eq!(future_from(base(), 7), "2024-01-04");
        assert_eq!(past_from(base(), 28), "2023-11-30");
        assert_eq!(future_from(base(), 0), "2023-12-28");
        assert_eq!(future_from(base(), -1), "2023-12-27");
    }

    #[test]
    fn test_out_of_range_shift_clamps() {
        let latest = format_iso(NaiveDate::MAX);
        let earliest = format_iso(NaiveDate::MIN);
        assert_eq!(future_from(base(), i64::MAX), latest);
        assert_eq!(future_from(base(), i64::MIN), earliest);
        assert_eq!(past_from(base(), i64::MAX), earliest);
        assert_eq!(past_from(base(), i64::MIN), latest);
    }

    #[test]
    fn test_today_is_iso() {
        let today = today();
        assert_eq!(today.len(), 10);
        assert!(NaiveDate::parse_from_str(&today, ISO_DATE).is_ok());
        assert_eq!(past(0), today);
    }

    #[test]
    fn test_display_format() {
        assert_eq!(display_format("2023-05-01").unwrap(), "May 01, 2023");
        assert_eq!(display_format("1969-07-20T00:00:00Z").unwrap(), "Jul 20, 1969");
        assert_eq!(display_format("2015-05-30T12:00:00").unwrap(), "May 30, 2015");
        assert!(display_format("yesterday").is_err());
    }
}
