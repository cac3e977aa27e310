//! Working-day policies.
//!
//! This module provides:
//! - `RescheduleType`: How a date falling on a non-working day is moved
//! - `WorkingDayPolicy`: The capability trait the alignment engine
//!   consumes
//! - `WorkingWeek`: A concrete policy built from non-working weekdays and
//!   explicit holiday dates
//!
//! The engine never inspects calendars directly; it only asks a policy
//! whether a date is non-working and how to reschedule it. This keeps the
//! alignment algorithm testable against deterministic fakes.

use chrono::Weekday;
use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use crate::types::Date;

/// Upper bound on the reschedule walk. A policy that marks every day
/// non-working would otherwise never terminate.
const MAX_RESCHEDULE_WALK: u32 = 366;

/// How a repayment date falling on a non-working day is rescheduled.
///
/// # Examples
///
/// ```
/// use sched_core::policy::RescheduleType;
///
/// let t = RescheduleType::MoveToNextWorkingDay;
/// assert_eq!(t.name(), "Move To Next Working Day");
/// assert_eq!(t.code(), "next");
/// ```
#[non_exhaustive]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RescheduleType {
    /// Keep the date as-is, even if it is a non-working day.
    SameDay,

    /// Move forward to the next working day.
    MoveToNextWorkingDay,

    /// Move forward to the next repayment meeting day.
    ///
    /// Unlike [`RescheduleType::MoveToNextWorkingDay`] this does not walk
    /// day by day: the date jumps to the next scheduled occurrence, which
    /// can change which meeting the repayment lands on. The alignment
    /// engine treats this type specially (it restarts the whole
    /// computation).
    MoveToNextRepaymentDay,

    /// Move backward to the previous working day.
    MoveToPreviousWorkingDay,
}

impl RescheduleType {
    /// Returns the standard name for this reschedule type.
    #[inline]
    pub fn name(&self) -> &'static str {
        match self {
            RescheduleType::SameDay => "Same Day",
            RescheduleType::MoveToNextWorkingDay => "Move To Next Working Day",
            RescheduleType::MoveToNextRepaymentDay => "Move To Next Repayment Day",
            RescheduleType::MoveToPreviousWorkingDay => "Move To Previous Working Day",
        }
    }

    /// Returns a short code for this reschedule type.
    #[inline]
    pub fn code(&self) -> &'static str {
        match self {
            RescheduleType::SameDay => "same",
            RescheduleType::MoveToNextWorkingDay => "next",
            RescheduleType::MoveToNextRepaymentDay => "next-meeting",
            RescheduleType::MoveToPreviousWorkingDay => "previous",
        }
    }

    /// Returns whether this is the move-to-next-repayment-day type.
    #[inline]
    pub fn is_move_to_next_repayment_day(&self) -> bool {
        matches!(self, RescheduleType::MoveToNextRepaymentDay)
    }
}

impl fmt::Display for RescheduleType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl FromStr for RescheduleType {
    type Err = String;

    /// Parses a reschedule type from string (case-insensitive).
    ///
    /// Supports full names and short codes:
    /// - SameDay: "same day", "same"
    /// - MoveToNextWorkingDay: "move to next working day", "next"
    /// - MoveToNextRepaymentDay: "move to next repayment day", "next-meeting"
    /// - MoveToPreviousWorkingDay: "move to previous working day", "previous"
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().replace([' ', '_', '-'], "").as_str() {
            "sameday" | "same" => Ok(RescheduleType::SameDay),
            "movetonextworkingday" | "next" => Ok(RescheduleType::MoveToNextWorkingDay),
            "movetonextrepaymentday" | "nextmeeting" => Ok(RescheduleType::MoveToNextRepaymentDay),
            "movetopreviousworkingday" | "previous" | "prev" => {
                Ok(RescheduleType::MoveToPreviousWorkingDay)
            }
            _ => Err(format!("Unknown reschedule type: {}", s)),
        }
    }
}

#[cfg(feature = "serde")]
mod serde_reschedule_impl {
    use super::RescheduleType;
    use serde::{de, Deserialize, Deserializer, Serialize, Serializer};
    use std::str::FromStr;

    impl Serialize for RescheduleType {
        fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
        where
            S: Serializer,
        {
            serializer.serialize_str(self.name())
        }
    }

    impl<'de> Deserialize<'de> for RescheduleType {
        fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
        where
            D: Deserializer<'de>,
        {
            let s = String::deserialize(deserializer)?;
            RescheduleType::from_str(&s).map_err(de::Error::custom)
        }
    }
}

/// Capability trait for working-day decisions.
///
/// Implementations answer whether a date is a non-working day and how a
/// non-working date should be rescheduled. The provided
/// [`offset_if_non_working`](WorkingDayPolicy::offset_if_non_working)
/// walk covers every reschedule type; implementers normally supply only
/// the two required methods.
pub trait WorkingDayPolicy {
    /// Returns whether the date is a non-working day.
    fn is_non_working_day(&self, date: Date) -> bool;

    /// Returns how non-working dates are rescheduled.
    fn reschedule_type(&self) -> RescheduleType;

    /// Returns whether the date is a working day.
    fn is_working_day(&self, date: Date) -> bool {
        !self.is_non_working_day(date)
    }

    /// Returns `candidate` if it is a working day; otherwise the
    /// rescheduled date per [`reschedule_type`](WorkingDayPolicy::reschedule_type).
    ///
    /// `bound` is an upper clamp (typically the next meeting occurrence):
    /// a forward walk never moves past it, and the
    /// move-to-next-repayment-day type jumps straight to it. The walk is
    /// capped defensively so a policy marking every day non-working still
    /// terminates.
    fn offset_if_non_working(&self, candidate: Date, bound: Option<Date>) -> Date {
        if self.is_working_day(candidate) {
            return candidate;
        }
        match self.reschedule_type() {
            RescheduleType::SameDay => candidate,
            RescheduleType::MoveToNextRepaymentDay => bound.unwrap_or(candidate),
            RescheduleType::MoveToNextWorkingDay => {
                let mut date = candidate;
                for _ in 0..MAX_RESCHEDULE_WALK {
                    date = date.plus_days(1);
                    if let Some(b) = bound {
                        if date >= b {
                            return b;
                        }
                    }
                    if self.is_working_day(date) {
                        return date;
                    }
                }
                candidate
            }
            RescheduleType::MoveToPreviousWorkingDay => {
                let mut date = candidate;
                for _ in 0..MAX_RESCHEDULE_WALK {
                    date = date.plus_days(-1);
                    if self.is_working_day(date) {
                        return date;
                    }
                }
                candidate
            }
        }
    }
}

impl<P: WorkingDayPolicy + ?Sized> WorkingDayPolicy for &P {
    fn is_non_working_day(&self, date: Date) -> bool {
        (**self).is_non_working_day(date)
    }

    fn reschedule_type(&self) -> RescheduleType {
        (**self).reschedule_type()
    }
}

/// Working-day policy built from non-working weekdays plus explicit
/// holiday dates.
///
/// # Examples
///
/// ```
/// use sched_core::policy::{RescheduleType, WorkingDayPolicy, WorkingWeek};
/// use sched_core::types::Date;
/// use chrono::Weekday;
///
/// let policy = WorkingWeek::new(RescheduleType::MoveToNextWorkingDay)
///     .non_working_weekday(Weekday::Sun)
///     .holiday(Date::from_ymd(2024, 12, 25).unwrap());
///
/// let sunday = Date::from_ymd(2024, 3, 3).unwrap();
/// assert!(policy.is_non_working_day(sunday));
/// assert_eq!(policy.offset_if_non_working(sunday, None).to_string(), "2024-03-04");
/// ```
#[derive(Debug, Clone)]
pub struct WorkingWeek {
    non_working_weekdays: Vec<Weekday>,
    holidays: BTreeSet<Date>,
    reschedule: RescheduleType,
}

impl WorkingWeek {
    /// Creates a policy with every day working and no holidays.
    pub fn new(reschedule: RescheduleType) -> Self {
        Self {
            non_working_weekdays: Vec::new(),
            holidays: BTreeSet::new(),
            reschedule,
        }
    }

    /// Marks a weekday as non-working.
    pub fn non_working_weekday(mut self, weekday: Weekday) -> Self {
        if !self.non_working_weekdays.contains(&weekday) {
            self.non_working_weekdays.push(weekday);
        }
        self
    }

    /// Adds a specific holiday date.
    pub fn holiday(mut self, date: Date) -> Self {
        self.holidays.insert(date);
        self
    }
}

impl WorkingDayPolicy for WorkingWeek {
    fn is_non_working_day(&self, date: Date) -> bool {
        self.non_working_weekdays.contains(&date.weekday()) || self.holidays.contains(&date)
    }

    fn reschedule_type(&self) -> RescheduleType {
        self.reschedule
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(y: i32, m: u32, day: u32) -> Date {
        Date::from_ymd(y, m, day).unwrap()
    }

    fn sundays_off(reschedule: RescheduleType) -> WorkingWeek {
        WorkingWeek::new(reschedule).non_working_weekday(Weekday::Sun)
    }

    #[test]
    fn test_working_day_on_weekday() {
        let policy = sundays_off(RescheduleType::MoveToNextWorkingDay);
        assert!(policy.is_working_day(d(2024, 3, 4))); // Monday
        assert!(policy.is_non_working_day(d(2024, 3, 3))); // Sunday
    }

    #[test]
    fn test_holiday_is_non_working() {
        let policy = WorkingWeek::new(RescheduleType::SameDay).holiday(d(2024, 12, 25));
        assert!(policy.is_non_working_day(d(2024, 12, 25)));
        assert!(policy.is_working_day(d(2024, 12, 26)));
    }

    #[test]
    fn test_offset_same_day_keeps_date() {
        let policy = sundays_off(RescheduleType::SameDay);
        assert_eq!(policy.offset_if_non_working(d(2024, 3, 3), None), d(2024, 3, 3));
    }

    #[test]
    fn test_offset_moves_to_next_working_day() {
        let policy = sundays_off(RescheduleType::MoveToNextWorkingDay);
        assert_eq!(policy.offset_if_non_working(d(2024, 3, 3), None), d(2024, 3, 4));
        // Working days pass through untouched
        assert_eq!(policy.offset_if_non_working(d(2024, 3, 4), None), d(2024, 3, 4));
    }

    #[test]
    fn test_offset_walks_over_holiday_run() {
        let policy = sundays_off(RescheduleType::MoveToNextWorkingDay)
            .holiday(d(2024, 3, 4))
            .holiday(d(2024, 3, 5));
        assert_eq!(policy.offset_if_non_working(d(2024, 3, 3), None), d(2024, 3, 6));
    }

    #[test]
    fn test_offset_clamped_at_bound() {
        let policy = sundays_off(RescheduleType::MoveToNextWorkingDay).holiday(d(2024, 3, 4));
        let bound = d(2024, 3, 4);
        assert_eq!(policy.offset_if_non_working(d(2024, 3, 3), Some(bound)), bound);
    }

    #[test]
    fn test_offset_next_repayment_day_jumps_to_bound() {
        let policy = sundays_off(RescheduleType::MoveToNextRepaymentDay);
        let bound = d(2024, 3, 10);
        assert_eq!(policy.offset_if_non_working(d(2024, 3, 3), Some(bound)), bound);
        // Without a bound there is nowhere to jump
        assert_eq!(policy.offset_if_non_working(d(2024, 3, 3), None), d(2024, 3, 3));
    }

    #[test]
    fn test_offset_moves_to_previous_working_day() {
        let policy = sundays_off(RescheduleType::MoveToPreviousWorkingDay);
        assert_eq!(policy.offset_if_non_working(d(2024, 3, 3), None), d(2024, 3, 2));
    }

    #[test]
    fn test_offset_all_days_non_working_terminates() {
        let mut policy = WorkingWeek::new(RescheduleType::MoveToNextWorkingDay);
        for weekday in [
            Weekday::Mon,
            Weekday::Tue,
            Weekday::Wed,
            Weekday::Thu,
            Weekday::Fri,
            Weekday::Sat,
            Weekday::Sun,
        ] {
            policy = policy.non_working_weekday(weekday);
        }
        // The capped walk gives the candidate back
        assert_eq!(policy.offset_if_non_working(d(2024, 3, 3), None), d(2024, 3, 3));
    }

    #[test]
    fn test_reschedule_type_from_str() {
        assert_eq!("next".parse::<RescheduleType>().unwrap(), RescheduleType::MoveToNextWorkingDay);
        assert_eq!(
            "Move To Next Repayment Day".parse::<RescheduleType>().unwrap(),
            RescheduleType::MoveToNextRepaymentDay
        );
        assert_eq!("same".parse::<RescheduleType>().unwrap(), RescheduleType::SameDay);
        assert!("sideways".parse::<RescheduleType>().is_err());
    }

    #[cfg(feature = "serde")]
    #[test]
    fn test_reschedule_type_serde_round_trip() {
        for t in [
            RescheduleType::SameDay,
            RescheduleType::MoveToNextWorkingDay,
            RescheduleType::MoveToNextRepaymentDay,
            RescheduleType::MoveToPreviousWorkingDay,
        ] {
            let json = serde_json::to_string(&t).unwrap();
            let parsed: RescheduleType = serde_json::from_str(&json).unwrap();
            assert_eq!(parsed, t);
        }
    }

    #[cfg(feature = "serde")]
    #[test]
    fn test_reschedule_type_serde_deserialize_code() {
        let parsed: RescheduleType = serde_json::from_str("\"next-meeting\"").unwrap();
        assert_eq!(parsed, RescheduleType::MoveToNextRepaymentDay);
    }
}
