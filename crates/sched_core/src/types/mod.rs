//! Core types for calendar computations.
//!
//! This module provides:
//! - `Date`: Type-safe date wrapper around chrono::NaiveDate
//! - `DateWindow`: Half-open `[start, end)` calendar date range
//! - `DateError`: Errors from date construction and parsing

mod error;
mod time;

pub use error::DateError;
pub use time::{Date, DateWindow};
