//! Raw occurrence evaluation.
//!
//! This module provides:
//! - [`RecurrenceEvaluator`]: the narrow capability trait the engine
//!   consumes, so alignment logic can be unit-tested against
//!   deterministic fakes
//! - [`RuleEvaluator`]: the built-in implementation, expanding
//!   candidates period by period from the seed date
//!
//! The evaluator produces *raw* occurrences. Month-end correction and
//! the skip-first-day-of-month policy are layered on top by
//! [`RecurrenceEngine`](crate::schedule::RecurrenceEngine); they are not
//! the evaluator's concern.

use chrono::Weekday;

use sched_core::types::{Date, DateWindow};

use crate::rule::{Frequency, Recurrence};

/// Upper bound on the period expansion loop. A rule that produces no
/// candidate for this many consecutive periods is abandoned rather than
/// searched forever.
const MAX_PERIODS: u32 = 100_000;

/// Capability trait for raw occurrence enumeration.
///
/// Implementations must be deterministic: identical inputs yield
/// identical outputs, with no hidden clock dependence.
pub trait RecurrenceEvaluator {
    /// Returns the ordered occurrences of `rule` anchored at `seed` that
    /// fall inside `window` (`[start, end)`), at most `max_count` of
    /// them.
    ///
    /// An occurrence-count bound on the rule (COUNT) is consumed from
    /// the seed date onward, not from the window start.
    fn dates_in_range(
        &self,
        rule: &Recurrence,
        seed: Date,
        window: DateWindow,
        max_count: usize,
    ) -> Vec<Date>;

    /// Returns the first occurrence strictly after `after`, if any.
    ///
    /// Strictly-after semantics are what let a caller walk occurrence to
    /// occurrence by feeding each result back in as the next anchor.
    fn next_date(&self, rule: &Recurrence, seed: Date, after: Date) -> Option<Date> {
        self.dates_in_range(rule, seed, DateWindow::from_start(after.plus_days(1)), 1)
            .first()
            .copied()
    }
}

impl<E: RecurrenceEvaluator + ?Sized> RecurrenceEvaluator for &E {
    fn dates_in_range(
        &self,
        rule: &Recurrence,
        seed: Date,
        window: DateWindow,
        max_count: usize,
    ) -> Vec<Date> {
        (**self).dates_in_range(rule, seed, window, max_count)
    }

    fn next_date(&self, rule: &Recurrence, seed: Date, after: Date) -> Option<Date> {
        (**self).next_date(rule, seed, after)
    }
}

/// The built-in rule evaluator.
///
/// Expansion is period by period: period `k` is the seed advanced by
/// `k * interval` frequency units, and each period contributes the
/// candidate dates its BY-rules select. Candidates before the seed are
/// discarded, COUNT is consumed from the seed, UNTIL is inclusive, and
/// the emitted sequence is strictly increasing.
///
/// # Examples
///
/// ```
/// use sched_core::types::{Date, DateWindow};
/// use sched_engine::eval::{RecurrenceEvaluator, RuleEvaluator};
/// use sched_engine::rule::Recurrence;
///
/// let rule: Recurrence = "FREQ=WEEKLY;INTERVAL=1;BYDAY=MO".parse().unwrap();
/// let seed = Date::from_ymd(2024, 1, 1).unwrap(); // a Monday
///
/// let next = RuleEvaluator.next_date(&rule, seed, seed).unwrap();
/// assert_eq!(next, Date::from_ymd(2024, 1, 8).unwrap());
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct RuleEvaluator;

impl RecurrenceEvaluator for RuleEvaluator {
    fn dates_in_range(
        &self,
        rule: &Recurrence,
        seed: Date,
        window: DateWindow,
        max_count: usize,
    ) -> Vec<Date> {
        let mut out = Vec::new();
        if window.is_empty() || max_count == 0 {
            return out;
        }

        let mut remaining = rule.count();
        let mut last: Option<Date> = None;
        for k in 0..MAX_PERIODS {
            let floor = period_floor(rule, seed, k);
            if floor >= window.end {
                break;
            }
            if let Some(until) = rule.until() {
                if floor > until {
                    break;
                }
            }
            for candidate in period_candidates(rule, seed, k) {
                if candidate < seed {
                    continue;
                }
                if matches!(last, Some(prev) if candidate <= prev) {
                    continue;
                }
                if let Some(until) = rule.until() {
                    if candidate > until {
                        return out;
                    }
                }
                if let Some(rc) = remaining.as_mut() {
                    if *rc == 0 {
                        return out;
                    }
                    *rc -= 1;
                }
                last = Some(candidate);
                if candidate >= window.end {
                    return out;
                }
                if candidate >= window.start {
                    out.push(candidate);
                    if out.len() == max_count {
                        return out;
                    }
                }
            }
        }
        out
    }
}

/// A lower bound on any candidate period `k` can contribute. Monotonic
/// in `k`, which is what terminates the expansion loop.
fn period_floor(rule: &Recurrence, seed: Date, k: u32) -> Date {
    let interval = rule.interval().max(1);
    match rule.frequency() {
        Frequency::Daily => seed.plus_days(i64::from(k) * i64::from(interval)),
        Frequency::Weekly => {
            let anchor = seed.plus_days(i64::from(k) * i64::from(interval) * 7);
            week_start_of(anchor, rule.week_start())
        }
        Frequency::Monthly => first_of_month(seed.plus_months(mul_saturating(k, interval))),
        Frequency::Yearly => seed.plus_years(mul_saturating(k, interval)),
    }
}

/// The sorted candidate dates of period `k`.
fn period_candidates(rule: &Recurrence, seed: Date, k: u32) -> Vec<Date> {
    let interval = rule.interval().max(1);
    match rule.frequency() {
        Frequency::Daily => {
            let candidate = seed.plus_days(i64::from(k) * i64::from(interval));
            by_rule_filtered(rule, candidate)
        }
        Frequency::Weekly => {
            let anchor = seed.plus_days(i64::from(k) * i64::from(interval) * 7);
            if rule.by_day().is_empty() {
                return vec![anchor];
            }
            let start = week_start_of(anchor, rule.week_start());
            let mut days: Vec<Date> = rule
                .by_day()
                .iter()
                .map(|bd| start.plus_days(days_between_weekdays(rule.week_start(), bd.weekday())))
                .collect();
            days.sort();
            days.dedup();
            days
        }
        Frequency::Monthly => {
            let month_anchor = seed.plus_months(mul_saturating(k, interval));
            monthly_candidates(rule, month_anchor)
        }
        Frequency::Yearly => {
            let candidate = seed.plus_years(mul_saturating(k, interval));
            by_rule_filtered(rule, candidate)
        }
    }
}

/// Applies BYDAY/BYMONTHDAY as filters to a single candidate (daily and
/// yearly frequencies select one date per period).
fn by_rule_filtered(rule: &Recurrence, candidate: Date) -> Vec<Date> {
    if !rule.by_day().is_empty()
        && !rule.by_day().iter().any(|bd| bd.weekday() == candidate.weekday())
    {
        return Vec::new();
    }
    if !rule.by_month_day().is_empty() && !matches_month_day(candidate, rule.by_month_day()) {
        return Vec::new();
    }
    vec![candidate]
}

/// The candidates a monthly period contributes: BYMONTHDAY days, else the
/// BYDAY expansion (with BYSETPOS selection), else the seed's
/// day-of-month clamped to the month length (which `plus_months` already
/// produced in `month_anchor`).
fn monthly_candidates(rule: &Recurrence, month_anchor: Date) -> Vec<Date> {
    let len = month_anchor.days_in_month();
    if !rule.by_month_day().is_empty() {
        let mut days: Vec<Date> = rule
            .by_month_day()
            .iter()
            .filter_map(|&md| {
                let day = resolve_month_day(md, len)?;
                month_anchor.with_day(day).ok()
            })
            .collect();
        days.sort();
        days.dedup();
        apply_set_pos(days, rule.by_set_pos())
    } else if !rule.by_day().is_empty() {
        let mut days = Vec::new();
        for bd in rule.by_day() {
            match bd.ordinal() {
                Some(ordinal) => {
                    if let Some(date) = nth_weekday_of_month(month_anchor, bd.weekday(), ordinal) {
                        days.push(date);
                    }
                }
                None => days.extend(weekdays_of_month(month_anchor, bd.weekday())),
            }
        }
        days.sort();
        days.dedup();
        apply_set_pos(days, rule.by_set_pos())
    } else {
        vec![month_anchor]
    }
}

/// Resolves a BYMONTHDAY value against a month length (negative values
/// count from the end; -1 is the last day).
fn resolve_month_day(month_day: i8, len: u32) -> Option<u32> {
    if month_day > 0 {
        let day = month_day as u32;
        (day <= len).then_some(day)
    } else {
        let back = u32::from(month_day.unsigned_abs());
        (back <= len).then(|| len + 1 - back)
    }
}

fn matches_month_day(date: Date, by_month_day: &[i8]) -> bool {
    let len = date.days_in_month();
    by_month_day
        .iter()
        .any(|&md| resolve_month_day(md, len) == Some(date.day()))
}

/// Selects BYSETPOS positions from a period's expanded candidate set
/// (1-based; negative positions count from the end).
fn apply_set_pos(days: Vec<Date>, set_pos: &[i16]) -> Vec<Date> {
    if set_pos.is_empty() {
        return days;
    }
    let mut selected: Vec<Date> = set_pos
        .iter()
        .filter_map(|&sp| {
            let index = if sp > 0 {
                (sp as usize).checked_sub(1)
            } else {
                days.len().checked_sub(sp.unsigned_abs() as usize)
            }?;
            days.get(index).copied()
        })
        .collect();
    selected.sort();
    selected.dedup();
    selected
}

/// The nth `weekday` of the month containing `month_anchor` (negative
/// ordinals count from the month end), if the month has one.
fn nth_weekday_of_month(month_anchor: Date, weekday: Weekday, ordinal: i8) -> Option<Date> {
    let len = month_anchor.days_in_month();
    let first = first_of_month(month_anchor);
    if ordinal > 0 {
        let offset = days_between_weekdays(first.weekday(), weekday) as u32;
        let day = 1 + offset + 7 * (ordinal as u32 - 1);
        (day <= len).then(|| first.plus_days(i64::from(day) - 1))
    } else {
        let last = first.plus_days(i64::from(len) - 1);
        let back = days_between_weekdays(weekday, last.weekday());
        let day = i64::from(len) - back - 7 * (i64::from(ordinal.unsigned_abs()) - 1);
        (day >= 1).then(|| first.plus_days(day - 1))
    }
}

/// Every `weekday` of the month containing `month_anchor`, ascending.
fn weekdays_of_month(month_anchor: Date, weekday: Weekday) -> Vec<Date> {
    let len = month_anchor.days_in_month();
    let first = first_of_month(month_anchor);
    let mut day = 1 + days_between_weekdays(first.weekday(), weekday) as u32;
    let mut dates = Vec::with_capacity(5);
    while day <= len {
        dates.push(first.plus_days(i64::from(day) - 1));
        day += 7;
    }
    dates
}

fn first_of_month(date: Date) -> Date {
    date.plus_days(1 - i64::from(date.day()))
}

/// Days to move forward from weekday `from` to reach weekday `to`
/// (0..=6).
fn days_between_weekdays(from: Weekday, to: Weekday) -> i64 {
    i64::from((to.num_days_from_monday() + 7 - from.num_days_from_monday()) % 7)
}

fn week_start_of(date: Date, week_start: Weekday) -> Date {
    date.plus_days(-days_between_weekdays(week_start, date.weekday()))
}

fn mul_saturating(k: u32, interval: u32) -> u32 {
    k.saturating_mul(interval)
}
