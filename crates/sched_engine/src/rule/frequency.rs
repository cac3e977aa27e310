//! Recurrence frequency enumeration.

use std::fmt;
use std::str::FromStr;

use sched_core::types::Date;

use crate::error::RuleError;

/// Recurrence frequency of a meeting or repayment rule.
///
/// The engine supports the four calendar-day frequencies of the rule
/// grammar; sub-daily frequencies are rejected at parse time.
///
/// # Examples
///
/// ```
/// use sched_engine::rule::Frequency;
///
/// let freq: Frequency = "WEEKLY".parse().unwrap();
/// assert_eq!(freq, Frequency::Weekly);
/// assert_eq!(freq.token(), "WEEKLY");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Frequency {
    /// Every day.
    Daily,
    /// Every week.
    Weekly,
    /// Every month.
    Monthly,
    /// Every year.
    Yearly,
}

impl Frequency {
    /// Returns the rule-grammar token for this frequency.
    ///
    /// # Examples
    ///
    /// ```
    /// use sched_engine::rule::Frequency;
    ///
    /// assert_eq!(Frequency::Monthly.token(), "MONTHLY");
    /// ```
    #[inline]
    pub fn token(&self) -> &'static str {
        match self {
            Frequency::Daily => "DAILY",
            Frequency::Weekly => "WEEKLY",
            Frequency::Monthly => "MONTHLY",
            Frequency::Yearly => "YEARLY",
        }
    }

    /// Returns whether this is the daily frequency.
    #[inline]
    pub fn is_daily(&self) -> bool {
        matches!(self, Frequency::Daily)
    }

    /// Returns whether this is the weekly frequency.
    #[inline]
    pub fn is_weekly(&self) -> bool {
        matches!(self, Frequency::Weekly)
    }

    /// Returns whether this is the monthly frequency.
    #[inline]
    pub fn is_monthly(&self) -> bool {
        matches!(self, Frequency::Monthly)
    }

    /// Returns whether this is the yearly frequency.
    #[inline]
    pub fn is_yearly(&self) -> bool {
        matches!(self, Frequency::Yearly)
    }

    /// Advances a date by `count` units of this frequency.
    ///
    /// Month and year advances clamp the day-of-month to the target
    /// month's length.
    ///
    /// # Examples
    ///
    /// ```
    /// use sched_core::types::Date;
    /// use sched_engine::rule::Frequency;
    ///
    /// let date = Date::from_ymd(2024, 1, 31).unwrap();
    /// assert_eq!(Frequency::Weekly.advance(date, 2), Date::from_ymd(2024, 2, 14).unwrap());
    /// assert_eq!(Frequency::Monthly.advance(date, 1), Date::from_ymd(2024, 2, 29).unwrap());
    /// ```
    pub fn advance(&self, date: Date, count: u32) -> Date {
        match self {
            Frequency::Daily => date.plus_days(i64::from(count)),
            Frequency::Weekly => date.plus_weeks(count),
            Frequency::Monthly => date.plus_months(count),
            Frequency::Yearly => date.plus_years(count),
        }
    }
}

impl fmt::Display for Frequency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.token())
    }
}

impl FromStr for Frequency {
    type Err = RuleError;

    /// Parses a frequency token (case-insensitive).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "DAILY" => Ok(Frequency::Daily),
            "WEEKLY" => Ok(Frequency::Weekly),
            "MONTHLY" => Ok(Frequency::Monthly),
            "YEARLY" => Ok(Frequency::Yearly),
            other => Err(RuleError::Unsupported { part: other.to_string() }),
        }
    }
}
