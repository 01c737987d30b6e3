// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Wall-clock and calendar helpers.
//!
//! All timestamps cross the system as ISO 8601 strings; these helpers
//! produce "now" in that form and do the calendar-month arithmetic the
//! dashboard and recent-visit queries need.

use aidcase_domain::{DomainError, format_date, format_datetime};
use time::{Date, Month, OffsetDateTime};

use crate::error::ApiError;

/// Returns the current UTC date.
#[must_use]
pub fn today() -> Date {
    OffsetDateTime::now_utc().date()
}

/// Returns the current UTC timestamp as an ISO 8601 string.
///
/// # Errors
///
/// Returns an error if the timestamp cannot be formatted.
pub fn now_iso() -> Result<String, ApiError> {
    format_datetime(OffsetDateTime::now_utc()).map_err(internal)
}

/// Returns the current time in milliseconds since the Unix epoch.
#[must_use]
pub fn now_millis() -> u128 {
    let now: OffsetDateTime = OffsetDateTime::now_utc();
    let nanos: i128 = now.unix_timestamp_nanos();
    u128::try_from(nanos / 1_000_000).unwrap_or(0)
}

/// Formats a date as ISO 8601, mapping failures to internal errors.
///
/// # Errors
///
/// Returns an error if the date cannot be formatted.
pub fn date_iso(date: Date) -> Result<String, ApiError> {
    format_date(date).map_err(internal)
}

/// Returns the first day of the month containing `date`.
///
/// # Errors
///
/// Returns an error if the date cannot be constructed.
pub fn month_start(date: Date) -> Result<Date, ApiError> {
    Date::from_calendar_date(date.year(), date.month(), 1).map_err(|e| ApiError::Internal {
        message: format!("Failed to compute month start: {e}"),
    })
}

/// Returns the last day of the month containing `date`.
///
/// # Errors
///
/// Returns an error if the date cannot be constructed.
pub fn month_end(date: Date) -> Result<Date, ApiError> {
    let last_day: u8 = time::util::days_in_year_month(date.year(), date.month());
    Date::from_calendar_date(date.year(), date.month(), last_day).map_err(|e| {
        ApiError::Internal {
            message: format!("Failed to compute month end: {e}"),
        }
    })
}

/// Returns the date `months` calendar months before `date`, clamping the
/// day to the shorter target month when necessary (e.g. March 31 minus one
/// month is February 28/29).
///
/// # Errors
///
/// Returns an error if the date cannot be constructed.
pub fn months_before(date: Date, months: u8) -> Result<Date, ApiError> {
    let mut year: i32 = date.year();
    let mut month: Month = date.month();
    for _ in 0..months {
        if month == Month::January {
            year -= 1;
        }
        month = month.previous();
    }

    let day: u8 = date.day().min(time::util::days_in_year_month(year, month));
    Date::from_calendar_date(year, month, day).map_err(|e| ApiError::Internal {
        message: format!("Failed to compute month arithmetic: {e}"),
    })
}

/// Returns the date `days` days after `date`.
///
/// # Errors
///
/// Returns an error on calendar overflow.
pub fn days_after(date: Date, days: i64) -> Result<Date, ApiError> {
    date.checked_add(time::Duration::days(days))
        .ok_or_else(|| ApiError::Internal {
            message: String::from("Date arithmetic overflow"),
        })
}

/// Short month label for dashboard series, e.g. "Mar 2026".
#[must_use]
pub fn month_label(date: Date) -> String {
    let short: &str = match date.month() {
        Month::January => "Jan",
        Month::February => "Feb",
        Month::March => "Mar",
        Month::April => "Apr",
        Month::May => "May",
        Month::June => "Jun",
        Month::July => "Jul",
        Month::August => "Aug",
        Month::September => "Sep",
        Month::October => "Oct",
        Month::November => "Nov",
        Month::December => "Dec",
    };
    format!("{short} {}", date.year())
}

fn internal(err: DomainError) -> ApiError {
    ApiError::Internal {
        message: err.to_string(),
    }
}
