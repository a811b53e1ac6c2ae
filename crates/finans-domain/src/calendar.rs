//! Calendar-date arithmetic used by installment and recurrence generation.
//!
//! Everything works on [`NaiveDate`], which carries no time-of-day and no
//! timezone, so shifting a date can never slip by a day. Month and year
//! shifts clamp to the last day of the target month.

use chrono::{Datelike, Days, NaiveDate};

const DATE_FORMAT: &str = "%Y-%m-%d";

/// Shifts `date` by `days` calendar days (negative moves backwards).
pub fn add_days(date: NaiveDate, days: i64) -> Option<NaiveDate> {
    if days >= 0 {
        date.checked_add_days(Days::new(days.unsigned_abs()))
    } else {
        date.checked_sub_days(Days::new(days.unsigned_abs()))
    }
}

/// Shifts `date` by `months`, carrying into the year and clamping the day.
///
/// `2024-01-31 + 1` is `2024-02-29`; `2023-01-31 + 1` is `2023-02-28`.
pub fn add_months(date: NaiveDate, months: i32) -> Option<NaiveDate> {
    let index = i64::from(date.year()) * 12 + i64::from(date.month0()) + i64::from(months);
    let year = i32::try_from(index.div_euclid(12)).ok()?;
    let month = u32::try_from(index.rem_euclid(12)).ok()? + 1;
    let day = date.day().min(days_in_month(year, month)?);
    NaiveDate::from_ymd_opt(year, month, day)
}

/// Shifts `date` by `years`; Feb 29 lands on Feb 28 in non-leap years.
pub fn add_years(date: NaiveDate, years: i32) -> Option<NaiveDate> {
    let year = date.year().checked_add(years)?;
    let day = date.day().min(days_in_month(year, date.month())?);
    NaiveDate::from_ymd_opt(year, date.month(), day)
}

/// Number of days in `month` of `year`.
pub fn days_in_month(year: i32, month: u32) -> Option<u32> {
    let (next_year, next_month) = if month == 12 {
        (year.checked_add(1)?, 1)
    } else {
        (year, month + 1)
    };
    let first_next = NaiveDate::from_ymd_opt(next_year, next_month, 1)?;
    first_next.pred_opt().map(|last| last.day())
}

/// Parses a boundary date string into a calendar date.
///
/// Accepts `YYYY-MM-DD` and ISO date-times such as `2024-01-31T23:00:00-03:00`;
/// for the latter the written calendar date is kept as-is, never converted
/// through a timezone.
pub fn parse_date(raw: &str) -> Option<NaiveDate> {
    let trimmed = raw.trim();
    let date_part = trimmed.get(..10).unwrap_or(trimmed);
    if trimmed.len() > 10 && !matches!(trimmed.as_bytes()[10], b'T' | b't' | b' ') {
        return None;
    }
    NaiveDate::parse_from_str(date_part, DATE_FORMAT).ok()
}

pub fn format_date(date: NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}

/// `(year, month)` key used for monthly grouping.
pub fn month_key(date: NaiveDate) -> (i32, u32) {
    (date.year(), date.month())
}
