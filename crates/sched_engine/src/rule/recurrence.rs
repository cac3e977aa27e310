//! Recurrence descriptor: parsing, validation and rebuilding.

use chrono::Weekday;
use std::fmt;
use std::str::FromStr;

use sched_core::types::Date;

use super::frequency::Frequency;
use crate::error::RuleError;

/// One weekday entry of a BYDAY list, with an optional ordinal prefix
/// ("MO" = every Monday of the period, "2MO" = the second Monday,
/// "-1SU" = the last Sunday).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ByDay {
    ordinal: Option<i8>,
    weekday: Weekday,
}

impl ByDay {
    /// Creates an entry selecting every occurrence of `weekday` in the
    /// period.
    pub fn every(weekday: Weekday) -> Self {
        Self { ordinal: None, weekday }
    }

    /// Creates an entry selecting the nth occurrence of `weekday` in the
    /// period (negative counts from the end).
    ///
    /// # Errors
    ///
    /// Returns `RuleError::InvalidValue` when `ordinal` is zero or
    /// outside ±1..=5.
    pub fn nth(ordinal: i8, weekday: Weekday) -> Result<Self, RuleError> {
        if ordinal == 0 || !(-5..=5).contains(&ordinal) {
            return Err(RuleError::InvalidValue { field: "BYDAY", value: ordinal.to_string() });
        }
        Ok(Self { ordinal: Some(ordinal), weekday })
    }

    /// Returns the ordinal prefix, if any.
    pub fn ordinal(&self) -> Option<i8> {
        self.ordinal
    }

    /// Returns the weekday.
    pub fn weekday(&self) -> Weekday {
        self.weekday
    }
}

impl fmt::Display for ByDay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(ord) = self.ordinal {
            write!(f, "{}", ord)?;
        }
        write!(f, "{}", weekday_token(self.weekday))
    }
}

impl FromStr for ByDay {
    type Err = RuleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if !s.is_ascii() {
            return Err(RuleError::InvalidValue { field: "BYDAY", value: s.to_string() });
        }
        let split = s.len().saturating_sub(2);
        let (prefix, token) = s.split_at(split);
        let weekday = token_weekday(token)
            .ok_or_else(|| RuleError::InvalidValue { field: "BYDAY", value: s.to_string() })?;
        if prefix.is_empty() {
            Ok(ByDay::every(weekday))
        } else {
            let ordinal: i8 = prefix
                .parse()
                .map_err(|_| RuleError::InvalidValue { field: "BYDAY", value: s.to_string() })?;
            ByDay::nth(ordinal, weekday)
        }
    }
}

/// The "nth weekday of month" selector kind a monthly rule repeats on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NthDay {
    /// First weekday of the month.
    First,
    /// Second weekday of the month.
    Second,
    /// Third weekday of the month.
    Third,
    /// Fourth weekday of the month.
    Fourth,
    /// Fifth weekday of the month.
    Fifth,
    /// Last weekday of the month.
    Last,
    /// The rule names a day of month directly (BYMONTHDAY).
    OnDay,
}

impl NthDay {
    /// Returns the selector for an ordinal value (1..=5, or -1 for last).
    pub fn from_ordinal(ordinal: i32) -> Option<Self> {
        match ordinal {
            1 => Some(NthDay::First),
            2 => Some(NthDay::Second),
            3 => Some(NthDay::Third),
            4 => Some(NthDay::Fourth),
            5 => Some(NthDay::Fifth),
            -1 => Some(NthDay::Last),
            _ => None,
        }
    }

    /// Returns the lowercase English name used in rule descriptions.
    pub fn name(&self) -> &'static str {
        match self {
            NthDay::First => "first",
            NthDay::Second => "second",
            NthDay::Third => "third",
            NthDay::Fourth => "fourth",
            NthDay::Fifth => "fifth",
            NthDay::Last => "last",
            NthDay::OnDay => "on day",
        }
    }
}

/// Canonical descriptor of an RFC 5545 style recurrence rule.
///
/// Parsed from rule text via [`FromStr`]; rendered back via [`Display`]
/// (round-trippable). A descriptor is immutable: to change a field, use
/// [`Recurrence::rebuild`], which copies every field into a builder.
///
/// # Examples
///
/// ```
/// use sched_engine::rule::{Frequency, Recurrence};
///
/// let rule: Recurrence = "FREQ=MONTHLY;INTERVAL=1;BYMONTHDAY=15".parse().unwrap();
/// assert_eq!(rule.frequency(), Frequency::Monthly);
/// assert_eq!(rule.month_on_day(), Some(15));
///
/// // Display renders canonical rule text
/// assert_eq!(rule.to_string(), "FREQ=MONTHLY;INTERVAL=1;BYMONTHDAY=15");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Recurrence {
    frequency: Frequency,
    interval: u32,
    count: Option<u32>,
    until: Option<Date>,
    by_day: Vec<ByDay>,
    by_month_day: Vec<i8>,
    by_set_pos: Vec<i16>,
    week_start: Weekday,
}

impl Recurrence {
    /// Returns the frequency.
    pub fn frequency(&self) -> Frequency {
        self.frequency
    }

    /// Returns the interval (always ≥ 1).
    pub fn interval(&self) -> u32 {
        self.interval
    }

    /// Returns the occurrence count bound, if any.
    pub fn count(&self) -> Option<u32> {
        self.count
    }

    /// Returns the inclusive until-date bound, if any.
    pub fn until(&self) -> Option<Date> {
        self.until
    }

    /// Returns the BYDAY entries.
    pub fn by_day(&self) -> &[ByDay] {
        &self.by_day
    }

    /// Returns the BYMONTHDAY values (negative counts from month end).
    pub fn by_month_day(&self) -> &[i8] {
        &self.by_month_day
    }

    /// Returns the BYSETPOS values.
    pub fn by_set_pos(&self) -> &[i16] {
        &self.by_set_pos
    }

    /// Returns the week-start day (default Monday).
    pub fn week_start(&self) -> Weekday {
        self.week_start
    }

    /// Returns the weekday the rule repeats on, when a BYDAY list is
    /// present (only the first entry is considered).
    pub fn repeats_on_day(&self) -> Option<Weekday> {
        self.by_day.first().map(ByDay::weekday)
    }

    /// Returns the day of month a monthly rule repeats on, when a
    /// BYMONTHDAY list is present (only the first entry is considered).
    pub fn month_on_day(&self) -> Option<i8> {
        if self.frequency.is_monthly() {
            self.by_month_day.first().copied()
        } else {
            None
        }
    }

    /// Returns the "nth weekday of month" selector kind for monthly
    /// rules: `OnDay` when the rule names a day of month, otherwise the
    /// ordinal from BYSETPOS or from the BYDAY entry itself.
    pub fn nth_day_of_month(&self) -> Option<NthDay> {
        if self.by_day.is_empty() {
            if self.by_month_day.is_empty() {
                None
            } else {
                Some(NthDay::OnDay)
            }
        } else {
            let ordinal = self
                .by_set_pos
                .first()
                .map(|&p| i32::from(p))
                .or_else(|| self.by_day.first().and_then(|bd| bd.ordinal().map(i32::from)))?;
            NthDay::from_ordinal(ordinal)
        }
    }

    /// Returns a builder pre-loaded with every field of this descriptor.
    ///
    /// Overriding a field and calling `build()` yields a new descriptor;
    /// the source is never mutated.
    pub fn rebuild(&self) -> RecurrenceBuilder {
        RecurrenceBuilder {
            frequency: Some(self.frequency),
            interval: self.interval,
            count: self.count,
            until: self.until,
            by_day: self.by_day.clone(),
            by_month_day: self.by_month_day.clone(),
            by_set_pos: self.by_set_pos.clone(),
            week_start: self.week_start,
        }
    }
}

impl fmt::Display for Recurrence {
    /// Renders the canonical rule text.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "FREQ={};INTERVAL={}", self.frequency, self.interval)?;
        if let Some(count) = self.count {
            write!(f, ";COUNT={}", count)?;
        }
        if let Some(until) = self.until {
            write!(
                f,
                ";UNTIL={:04}{:02}{:02}",
                until.year(),
                until.month(),
                until.day()
            )?;
        }
        if !self.by_day.is_empty() {
            write!(f, ";BYDAY=")?;
            for (i, bd) in self.by_day.iter().enumerate() {
                if i > 0 {
                    write!(f, ",")?;
                }
                write!(f, "{}", bd)?;
            }
        }
        if !self.by_month_day.is_empty() {
            write!(f, ";BYMONTHDAY=")?;
            for (i, md) in self.by_month_day.iter().enumerate() {
                if i > 0 {
                    write!(f, ",")?;
                }
                write!(f, "{}", md)?;
            }
        }
        if !self.by_set_pos.is_empty() {
            write!(f, ";BYSETPOS=")?;
            for (i, sp) in self.by_set_pos.iter().enumerate() {
                if i > 0 {
                    write!(f, ",")?;
                }
                write!(f, "{}", sp)?;
            }
        }
        if self.week_start != Weekday::Mon {
            write!(f, ";WKST={}", weekday_token(self.week_start))?;
        }
        Ok(())
    }
}

impl FromStr for Recurrence {
    type Err = RuleError;

    /// Parses rule text such as `FREQ=WEEKLY;INTERVAL=2;BYDAY=MO,TU`.
    ///
    /// An optional leading `RRULE:` tag is accepted. `UNTIL` accepts
    /// `YYYYMMDD`, `YYYYMMDDTHHMMSS[Z]` (the time-of-day is ignored;
    /// dates are timezone-free by construction) and ISO `YYYY-MM-DD`.
    /// Unsupported rule parts are rejected rather than silently ignored.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let body = s.trim();
        let body = body.strip_prefix("RRULE:").unwrap_or(body);

        let mut builder = RecurrenceBuilder::new();
        for part in body.split(';').map(str::trim).filter(|p| !p.is_empty()) {
            let (key, value) = part
                .split_once('=')
                .ok_or_else(|| RuleError::Malformed { part: part.to_string() })?;
            let value = value.trim();
            match key.trim().to_ascii_uppercase().as_str() {
                "FREQ" => builder = builder.frequency(value.parse()?),
                "INTERVAL" => {
                    let interval: u32 = value.parse().map_err(|_| RuleError::InvalidValue {
                        field: "INTERVAL",
                        value: value.to_string(),
                    })?;
                    builder = builder.interval(interval);
                }
                "COUNT" => {
                    let count: u32 = value.parse().map_err(|_| RuleError::InvalidValue {
                        field: "COUNT",
                        value: value.to_string(),
                    })?;
                    builder = builder.count(count);
                }
                "UNTIL" => builder = builder.until(parse_until(value)?),
                "BYDAY" => {
                    let entries = value
                        .split(',')
                        .map(str::parse)
                        .collect::<Result<Vec<ByDay>, _>>()?;
                    builder = builder.by_day(entries);
                }
                "BYMONTHDAY" => {
                    let days = value
                        .split(',')
                        .map(|v| {
                            v.trim().parse::<i8>().map_err(|_| RuleError::InvalidValue {
                                field: "BYMONTHDAY",
                                value: v.to_string(),
                            })
                        })
                        .collect::<Result<Vec<i8>, _>>()?;
                    builder = builder.by_month_day(days);
                }
                "BYSETPOS" => {
                    let positions = value
                        .split(',')
                        .map(|v| {
                            v.trim().parse::<i16>().map_err(|_| RuleError::InvalidValue {
                                field: "BYSETPOS",
                                value: v.to_string(),
                            })
                        })
                        .collect::<Result<Vec<i16>, _>>()?;
                    builder = builder.by_set_pos(positions);
                }
                "WKST" => {
                    let weekday = token_weekday(value).ok_or_else(|| RuleError::InvalidValue {
                        field: "WKST",
                        value: value.to_string(),
                    })?;
                    builder = builder.week_start(weekday);
                }
                other => return Err(RuleError::Unsupported { part: other.to_string() }),
            }
        }
        builder.build()
    }
}

/// Builder for constructing recurrence descriptors.
///
/// # Examples
///
/// ```
/// use chrono::Weekday;
/// use sched_engine::rule::{ByDay, Frequency, RecurrenceBuilder};
///
/// let rule = RecurrenceBuilder::new()
///     .frequency(Frequency::Weekly)
///     .interval(2)
///     .by_day(vec![ByDay::every(Weekday::Mon)])
///     .build()
///     .unwrap();
///
/// assert_eq!(rule.to_string(), "FREQ=WEEKLY;INTERVAL=2;BYDAY=MO");
/// ```
#[derive(Debug, Clone)]
pub struct RecurrenceBuilder {
    frequency: Option<Frequency>,
    interval: u32,
    count: Option<u32>,
    until: Option<Date>,
    by_day: Vec<ByDay>,
    by_month_day: Vec<i8>,
    by_set_pos: Vec<i16>,
    week_start: Weekday,
}

impl Default for RecurrenceBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl RecurrenceBuilder {
    /// Creates a builder with interval 1 and week start Monday.
    pub fn new() -> Self {
        Self {
            frequency: None,
            interval: 1,
            count: None,
            until: None,
            by_day: Vec::new(),
            by_month_day: Vec::new(),
            by_set_pos: Vec::new(),
            week_start: Weekday::Mon,
        }
    }

    /// Sets the frequency.
    pub fn frequency(mut self, frequency: Frequency) -> Self {
        self.frequency = Some(frequency);
        self
    }

    /// Sets the interval (values below 1 normalise to 1 at build time).
    pub fn interval(mut self, interval: u32) -> Self {
        self.interval = interval;
        self
    }

    /// Sets the occurrence count bound.
    pub fn count(mut self, count: u32) -> Self {
        self.count = Some(count);
        self
    }

    /// Sets the inclusive until-date bound.
    pub fn until(mut self, until: Date) -> Self {
        self.until = Some(until);
        self
    }

    /// Sets the BYDAY entries.
    pub fn by_day(mut self, by_day: Vec<ByDay>) -> Self {
        self.by_day = by_day;
        self
    }

    /// Sets the BYMONTHDAY values.
    pub fn by_month_day(mut self, by_month_day: Vec<i8>) -> Self {
        self.by_month_day = by_month_day;
        self
    }

    /// Sets the BYSETPOS values.
    pub fn by_set_pos(mut self, by_set_pos: Vec<i16>) -> Self {
        self.by_set_pos = by_set_pos;
        self
    }

    /// Sets the week-start day.
    pub fn week_start(mut self, week_start: Weekday) -> Self {
        self.week_start = week_start;
        self
    }

    /// Builds the descriptor.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - No frequency was set
    /// - Both COUNT and UNTIL are present
    /// - A BYMONTHDAY value is 0 or outside ±31
    /// - A BYSETPOS value is 0 or outside ±366
    pub fn build(self) -> Result<Recurrence, RuleError> {
        let frequency = self.frequency.ok_or(RuleError::MissingFrequency)?;

        if self.count.is_some() && self.until.is_some() {
            return Err(RuleError::CountAndUntil);
        }
        for &md in &self.by_month_day {
            if md == 0 || !(-31..=31).contains(&md) {
                return Err(RuleError::InvalidValue { field: "BYMONTHDAY", value: md.to_string() });
            }
        }
        for &sp in &self.by_set_pos {
            if sp == 0 || !(-366..=366).contains(&sp) {
                return Err(RuleError::InvalidValue { field: "BYSETPOS", value: sp.to_string() });
            }
        }

        Ok(Recurrence {
            frequency,
            interval: self.interval.max(1),
            count: self.count,
            until: self.until,
            by_day: self.by_day,
            by_month_day: self.by_month_day,
            by_set_pos: self.by_set_pos,
            week_start: self.week_start,
        })
    }
}

/// Returns whether two rule texts share the same frequency.
///
/// Returns false (not an error) when either rule fails to parse.
///
/// # Examples
///
/// ```
/// use sched_engine::rule::same_frequency;
///
/// assert!(same_frequency("FREQ=WEEKLY;INTERVAL=1", "FREQ=WEEKLY;INTERVAL=3"));
/// assert!(!same_frequency("FREQ=WEEKLY", "FREQ=MONTHLY"));
/// assert!(!same_frequency("FREQ=WEEKLY", "not a rule"));
/// ```
pub fn same_frequency(rule_a: &str, rule_b: &str) -> bool {
    match (rule_a.parse::<Recurrence>(), rule_b.parse::<Recurrence>()) {
        (Ok(a), Ok(b)) => a.frequency() == b.frequency(),
        _ => false,
    }
}

/// Returns whether two rule texts share the same interval.
///
/// Returns false (not an error) when either rule fails to parse.
pub fn same_interval(rule_a: &str, rule_b: &str) -> bool {
    match (rule_a.parse::<Recurrence>(), rule_b.parse::<Recurrence>()) {
        (Ok(a), Ok(b)) => a.interval() == b.interval(),
        _ => false,
    }
}

fn parse_until(value: &str) -> Result<Date, RuleError> {
    let invalid = || RuleError::InvalidValue { field: "UNTIL", value: value.to_string() };
    // Time-of-day (and a trailing Z) carry no information for whole-day
    // recurrences; only the date part is read.
    let date_part = value.split('T').next().unwrap_or(value);
    if date_part.contains('-') {
        Date::parse(date_part).map_err(|_| invalid())
    } else {
        if date_part.len() != 8 || !date_part.bytes().all(|b| b.is_ascii_digit()) {
            return Err(invalid());
        }
        let year: i32 = date_part[..4].parse().map_err(|_| invalid())?;
        let month: u32 = date_part[4..6].parse().map_err(|_| invalid())?;
        let day: u32 = date_part[6..8].parse().map_err(|_| invalid())?;
        Date::from_ymd(year, month, day).map_err(|_| invalid())
    }
}

pub(crate) fn weekday_token(weekday: Weekday) -> &'static str {
    match weekday {
        Weekday::Mon => "MO",
        Weekday::Tue => "TU",
        Weekday::Wed => "WE",
        Weekday::Thu => "TH",
        Weekday::Fri => "FR",
        Weekday::Sat => "SA",
        Weekday::Sun => "SU",
    }
}

pub(crate) fn token_weekday(token: &str) -> Option<Weekday> {
    match token.trim().to_ascii_uppercase().as_str() {
        "MO" => Some(Weekday::Mon),
        "TU" => Some(Weekday::Tue),
        "WE" => Some(Weekday::Wed),
        "TH" => Some(Weekday::Thu),
        "FR" => Some(Weekday::Fri),
        "SA" => Some(Weekday::Sat),
        "SU" => Some(Weekday::Sun),
        _ => None,
    }
}
