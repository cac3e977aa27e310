//! Error types for date construction and parsing.

use thiserror::Error;

/// Errors raised by [`Date`](super::Date) construction and parsing.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DateError {
    /// The year/month/day combination does not name a calendar date.
    #[error("Invalid date: {year}-{month:02}-{day:02}")]
    InvalidDate {
        /// The year component.
        year: i32,
        /// The month component.
        month: u32,
        /// The day component.
        day: u32,
    },

    /// The input string could not be parsed as an ISO 8601 date.
    #[error("Date parse error: {0}")]
    ParseError(String),
}
