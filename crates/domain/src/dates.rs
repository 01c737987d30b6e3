// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Date parsing and formatting helpers.
//!
//! Dates and timestamps cross the API and the database as ISO 8601 strings;
//! these helpers convert to and from `time` types where arithmetic is
//! needed.

use time::format_description::well_known::Iso8601;
use time::{Date, OffsetDateTime};

use crate::error::DomainError;

/// Parses an ISO 8601 calendar date (`YYYY-MM-DD`).
///
/// # Errors
///
/// Returns an error if the string is not a valid ISO 8601 date.
pub fn parse_date(value: &str) -> Result<Date, DomainError> {
    Date::parse(value, &Iso8601::DATE).map_err(|e| DomainError::DateParseError {
        date_string: value.to_string(),
        error: e.to_string(),
    })
}

/// Formats a calendar date as `YYYY-MM-DD`.
///
/// # Errors
///
/// Returns an error if the date cannot be formatted.
pub fn format_date(date: Date) -> Result<String, DomainError> {
    date.format(&Iso8601::DATE)
        .map_err(|e| DomainError::DateParseError {
            date_string: date.to_string(),
            error: e.to_string(),
        })
}

/// Parses an ISO 8601 timestamp with offset.
///
/// # Errors
///
/// Returns an error if the string is not a valid ISO 8601 timestamp.
pub fn parse_datetime(value: &str) -> Result<OffsetDateTime, DomainError> {
    OffsetDateTime::parse(value, &Iso8601::DEFAULT).map_err(|e| DomainError::DateParseError {
        date_string: value.to_string(),
        error: e.to_string(),
    })
}

/// Formats a timestamp as ISO 8601 with offset.
///
/// # Errors
///
/// Returns an error if the timestamp cannot be formatted.
pub fn format_datetime(datetime: OffsetDateTime) -> Result<String, DomainError> {
    datetime
        .format(&Iso8601::DEFAULT)
        .map_err(|e| DomainError::DateParseError {
            date_string: datetime.to_string(),
            error: e.to_string(),
        })
}
