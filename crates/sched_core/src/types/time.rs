//! Time types for recurrence computations.
//!
//! This module provides:
//! - `Date`: Type-safe date wrapper around chrono::NaiveDate
//! - `DateWindow`: Half-open `[start, end)` calendar date range
//!
//! All arithmetic is exact calendar arithmetic; there is no floating
//! point involved anywhere in this module.

use chrono::{Datelike, Days, Months, NaiveDate, Weekday};
use std::fmt;
use std::ops::Sub;
use std::str::FromStr;

use super::error::DateError;

/// Type-safe date wrapper around chrono::NaiveDate.
///
/// Provides ISO 8601 serialisation and the calendar arithmetic the
/// recurrence engine needs. A `Date` is timezone-free: it names a plain
/// calendar day, never an instant.
///
/// # Examples
///
/// ```
/// use sched_core::types::Date;
///
/// // Create from year, month, day
/// let date = Date::from_ymd(2024, 6, 15).unwrap();
/// assert_eq!(date.year(), 2024);
/// assert_eq!(date.month(), 6);
/// assert_eq!(date.day(), 15);
///
/// // Parse from ISO 8601 string
/// let parsed: Date = "2024-06-15".parse().unwrap();
/// assert_eq!(date, parsed);
///
/// // Calculate days between dates
/// let start = Date::from_ymd(2024, 1, 1).unwrap();
/// let end = Date::from_ymd(2024, 1, 11).unwrap();
/// assert_eq!(end - start, 10);
/// ```
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct Date(NaiveDate);

impl Date {
    /// Creates a Date from year, month, and day components.
    ///
    /// # Arguments
    /// * `year` - Year (e.g., 2024)
    /// * `month` - Month (1-12)
    /// * `day` - Day (1-31, depending on month)
    ///
    /// # Returns
    /// `Ok(Date)` if the date is valid, `Err(DateError::InvalidDate)` otherwise.
    ///
    /// # Examples
    ///
    /// ```
    /// use sched_core::types::Date;
    ///
    /// // Leap year February 29th
    /// let leap = Date::from_ymd(2024, 2, 29).unwrap();
    /// assert_eq!(leap.day(), 29);
    ///
    /// // Invalid date returns error
    /// let invalid = Date::from_ymd(2023, 2, 29);
    /// assert!(invalid.is_err());
    /// ```
    pub fn from_ymd(year: i32, month: u32, day: u32) -> Result<Self, DateError> {
        NaiveDate::from_ymd_opt(year, month, day)
            .map(Date)
            .ok_or(DateError::InvalidDate { year, month, day })
    }

    /// Parses a date from ISO 8601 format string (YYYY-MM-DD).
    pub fn parse(s: &str) -> Result<Self, DateError> {
        NaiveDate::parse_from_str(s, "%Y-%m-%d")
            .map(Date)
            .map_err(|e| DateError::ParseError(e.to_string()))
    }

    /// Returns the underlying NaiveDate.
    ///
    /// Use this method when you need access to chrono's full API.
    pub fn into_inner(self) -> NaiveDate {
        self.0
    }

    /// Returns the year component.
    pub fn year(&self) -> i32 {
        self.0.year()
    }

    /// Returns the month component (1-12).
    pub fn month(&self) -> u32 {
        self.0.month()
    }

    /// Returns the day component (1-31).
    pub fn day(&self) -> u32 {
        self.0.day()
    }

    /// Returns the day of the week.
    ///
    /// # Examples
    ///
    /// ```
    /// use sched_core::types::Date;
    /// use chrono::Weekday;
    ///
    /// let date = Date::from_ymd(2024, 1, 1).unwrap();
    /// assert_eq!(date.weekday(), Weekday::Mon);
    /// ```
    pub fn weekday(&self) -> Weekday {
        self.0.weekday()
    }

    /// Returns the number of days in this date's month (28-31).
    ///
    /// # Examples
    ///
    /// ```
    /// use sched_core::types::Date;
    ///
    /// assert_eq!(Date::from_ymd(2024, 2, 1).unwrap().days_in_month(), 29);
    /// assert_eq!(Date::from_ymd(2023, 2, 1).unwrap().days_in_month(), 28);
    /// assert_eq!(Date::from_ymd(2024, 4, 10).unwrap().days_in_month(), 30);
    /// ```
    pub fn days_in_month(&self) -> u32 {
        match self.month() {
            1 | 3 | 5 | 7 | 8 | 10 | 12 => 31,
            4 | 6 | 9 | 11 => 30,
            _ => {
                if self.0.leap_year() {
                    29
                } else {
                    28
                }
            }
        }
    }

    /// Returns a copy of this date with the day-of-month replaced.
    ///
    /// # Errors
    ///
    /// Returns `DateError::InvalidDate` when `day` does not exist in this
    /// date's month.
    pub fn with_day(&self, day: u32) -> Result<Self, DateError> {
        self.0.with_day(day).map(Date).ok_or(DateError::InvalidDate {
            year: self.year(),
            month: self.month(),
            day,
        })
    }

    /// Returns this date shifted by a number of days (negative moves
    /// backwards). Saturates at the supported calendar range.
    ///
    /// # Examples
    ///
    /// ```
    /// use sched_core::types::Date;
    ///
    /// let date = Date::from_ymd(2024, 2, 28).unwrap();
    /// assert_eq!(date.plus_days(1), Date::from_ymd(2024, 2, 29).unwrap());
    /// assert_eq!(date.plus_days(-28), Date::from_ymd(2024, 1, 31).unwrap());
    /// ```
    pub fn plus_days(&self, days: i64) -> Self {
        let shifted = if days >= 0 {
            self.0.checked_add_days(Days::new(days as u64))
        } else {
            self.0.checked_sub_days(Days::new(days.unsigned_abs()))
        };
        Date(shifted.unwrap_or(if days >= 0 { NaiveDate::MAX } else { NaiveDate::MIN }))
    }

    /// Returns this date shifted forward by a number of weeks.
    pub fn plus_weeks(&self, weeks: u32) -> Self {
        self.plus_days(i64::from(weeks) * 7)
    }

    /// Returns this date shifted forward by a number of months, with the
    /// day-of-month clamped to the target month's length.
    ///
    /// # Examples
    ///
    /// ```
    /// use sched_core::types::Date;
    ///
    /// let eom = Date::from_ymd(2024, 1, 31).unwrap();
    /// assert_eq!(eom.plus_months(1), Date::from_ymd(2024, 2, 29).unwrap());
    /// assert_eq!(eom.plus_months(3), Date::from_ymd(2024, 4, 30).unwrap());
    /// ```
    pub fn plus_months(&self, months: u32) -> Self {
        Date(self.0.checked_add_months(Months::new(months)).unwrap_or(NaiveDate::MAX))
    }

    /// Returns this date shifted forward by a number of years (Feb 29
    /// clamps to Feb 28 in non-leap years).
    pub fn plus_years(&self, years: u32) -> Self {
        self.plus_months(years.saturating_mul(12))
    }
}

impl Sub for Date {
    type Output = i64;

    /// Returns the number of days between two dates.
    ///
    /// The result is positive if `self` is after `other`, negative otherwise.
    fn sub(self, other: Self) -> i64 {
        (self.0 - other.0).num_days()
    }
}

impl From<NaiveDate> for Date {
    fn from(inner: NaiveDate) -> Self {
        Date(inner)
    }
}

impl FromStr for Date {
    type Err = DateError;

    /// Parses a date from ISO 8601 format string (YYYY-MM-DD).
    fn from_str(s: &str) -> Result<Self, DateError> {
        Date::parse(s)
    }
}

impl fmt::Display for Date {
    /// Formats the date as ISO 8601 (YYYY-MM-DD).
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.format("%Y-%m-%d"))
    }
}

/// Half-open calendar date range `[start, end)`.
///
/// The `end` date is exclusive: a window covering exactly one candidate
/// date `d` is `DateWindow::new(d, d.plus_days(1))`. A window whose end
/// precedes its start contains nothing.
///
/// # Examples
///
/// ```
/// use sched_core::types::{Date, DateWindow};
///
/// let start = Date::from_ymd(2024, 3, 1).unwrap();
/// let end = Date::from_ymd(2024, 4, 1).unwrap();
/// let window = DateWindow::new(start, end);
///
/// assert!(window.contains(start));
/// assert!(!window.contains(end));
/// ```
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DateWindow {
    /// Inclusive start of the window.
    pub start: Date,
    /// Exclusive end of the window.
    pub end: Date,
}

impl DateWindow {
    /// Creates a window from an inclusive start and exclusive end.
    pub fn new(start: Date, end: Date) -> Self {
        Self { start, end }
    }

    /// Creates the single-date window `[date, date + 1 day)`.
    pub fn single(date: Date) -> Self {
        Self::new(date, date.plus_days(1))
    }

    /// Creates the unbounded-above window `[start, calendar max)`.
    pub fn from_start(start: Date) -> Self {
        Self::new(start, Date(NaiveDate::MAX))
    }

    /// Returns whether the window contains the date.
    pub fn contains(&self, date: Date) -> bool {
        self.start <= date && date < self.end
    }

    /// Returns whether the window contains no dates.
    pub fn is_empty(&self) -> bool {
        self.end <= self.start
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(y: i32, m: u32, day: u32) -> Date {
        Date::from_ymd(y, m, day).unwrap()
    }

    #[test]
    fn test_from_ymd_valid() {
        let date = d(2024, 6, 15);
        assert_eq!(date.year(), 2024);
        assert_eq!(date.month(), 6);
        assert_eq!(date.day(), 15);
    }

    #[test]
    fn test_from_ymd_invalid() {
        assert_eq!(
            Date::from_ymd(2023, 2, 29),
            Err(DateError::InvalidDate { year: 2023, month: 2, day: 29 })
        );
        assert!(Date::from_ymd(2024, 13, 1).is_err());
        assert!(Date::from_ymd(2024, 4, 31).is_err());
    }

    #[test]
    fn test_parse_and_display_round_trip() {
        let date = d(2024, 6, 5);
        assert_eq!(date.to_string(), "2024-06-05");
        assert_eq!("2024-06-05".parse::<Date>().unwrap(), date);
        assert!("not-a-date".parse::<Date>().is_err());
    }

    #[test]
    fn test_day_difference() {
        assert_eq!(d(2024, 1, 11) - d(2024, 1, 1), 10);
        assert_eq!(d(2024, 1, 1) - d(2024, 1, 11), -10);
        // Leap day counted
        assert_eq!(d(2024, 3, 1) - d(2024, 2, 1), 29);
    }

    #[test]
    fn test_plus_days() {
        assert_eq!(d(2024, 12, 31).plus_days(1), d(2025, 1, 1));
        assert_eq!(d(2024, 3, 1).plus_days(-1), d(2024, 2, 29));
    }

    #[test]
    fn test_plus_weeks() {
        assert_eq!(d(2024, 1, 1).plus_weeks(4), d(2024, 1, 29));
    }

    #[test]
    fn test_plus_months_clamps_to_month_end() {
        assert_eq!(d(2024, 1, 31).plus_months(1), d(2024, 2, 29));
        assert_eq!(d(2023, 1, 31).plus_months(1), d(2023, 2, 28));
        assert_eq!(d(2024, 1, 31).plus_months(3), d(2024, 4, 30));
        assert_eq!(d(2024, 1, 15).plus_months(1), d(2024, 2, 15));
    }

    #[test]
    fn test_plus_years_leap_clamp() {
        assert_eq!(d(2024, 2, 29).plus_years(1), d(2025, 2, 28));
        assert_eq!(d(2024, 2, 29).plus_years(4), d(2028, 2, 29));
    }

    #[test]
    fn test_days_in_month() {
        assert_eq!(d(2024, 2, 1).days_in_month(), 29);
        assert_eq!(d(2023, 2, 1).days_in_month(), 28);
        assert_eq!(d(2024, 1, 1).days_in_month(), 31);
        assert_eq!(d(2024, 11, 1).days_in_month(), 30);
        assert_eq!(d(1900, 2, 1).days_in_month(), 28); // century, not leap
        assert_eq!(d(2000, 2, 1).days_in_month(), 29); // quadricentennial, leap
    }

    #[test]
    fn test_with_day() {
        assert_eq!(d(2024, 2, 1).with_day(29).unwrap(), d(2024, 2, 29));
        assert!(d(2023, 2, 1).with_day(29).is_err());
    }

    #[test]
    fn test_window_contains() {
        let w = DateWindow::new(d(2024, 3, 1), d(2024, 3, 5));
        assert!(w.contains(d(2024, 3, 1)));
        assert!(w.contains(d(2024, 3, 4)));
        assert!(!w.contains(d(2024, 3, 5)));
        assert!(!w.contains(d(2024, 2, 29)));
    }

    #[test]
    fn test_window_single() {
        let w = DateWindow::single(d(2024, 3, 4));
        assert!(w.contains(d(2024, 3, 4)));
        assert!(!w.contains(d(2024, 3, 5)));
        assert!(!w.is_empty());
    }

    #[test]
    fn test_window_inverted_is_empty() {
        let w = DateWindow::new(d(2024, 3, 5), d(2024, 3, 1));
        assert!(w.is_empty());
        assert!(!w.contains(d(2024, 3, 3)));
    }

    #[cfg(feature = "serde")]
    #[test]
    fn test_date_serde_transparent() {
        let date = d(2024, 6, 15);
        let json = serde_json::to_string(&date).unwrap();
        assert_eq!(json, "\"2024-06-15\"");
        let parsed: Date = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, date);
    }

    #[cfg(test)]
    mod property_tests {
        use super::*;
        use proptest::prelude::*;

        fn date_strategy() -> impl Strategy<Value = Date> {
            (2000i32..2100i32, 1u32..13u32, 1u32..29u32)
                .prop_filter_map("valid date", |(year, month, day)| {
                    Date::from_ymd(year, month, day).ok()
                })
        }

        proptest! {
            #[test]
            fn test_plus_days_round_trips(date in date_strategy(), days in 0i64..10_000) {
                prop_assert_eq!(date.plus_days(days).plus_days(-days), date);
            }

            #[test]
            fn test_plus_days_difference(date in date_strategy(), days in 0i64..10_000) {
                prop_assert_eq!(date.plus_days(days) - date, days);
            }

            #[test]
            fn test_plus_months_day_never_exceeds_month_length(
                date in date_strategy(),
                months in 0u32..120,
            ) {
                let shifted = date.plus_months(months);
                prop_assert!(shifted.day() <= shifted.days_in_month());
                prop_assert!(shifted.day() <= date.day());
            }

            #[test]
            fn test_display_parse_round_trip(date in date_strategy()) {
                prop_assert_eq!(date.to_string().parse::<Date>().unwrap(), date);
            }
        }
    }
}
