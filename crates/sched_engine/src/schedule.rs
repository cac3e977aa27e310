//! Occurrence generation, month-end correction and membership checks.
//!
//! This module provides:
//! - [`clamp_month_end`]: the month-end date corrector
//! - [`FirstOfMonthSkip`]: the skip-first-day-of-month business policy
//! - [`RecurrenceEngine`]: the engine facade (generation, membership,
//!   and — in the `align` module — repayment alignment)

use sched_core::types::{Date, DateWindow};

use crate::eval::{RecurrenceEvaluator, RuleEvaluator};
use crate::rule::{Frequency, Recurrence};

/// Default bound on alignment restarts (roughly a year of one-day
/// advances); see
/// [`RecurrenceEngine::restart_cap`].
pub(crate) const DEFAULT_RESTART_CAP: u32 = 366;

/// Clamps a raw occurrence near month end back to the seed's intent.
///
/// When the frequency is monthly and the seed's day-of-month is 29 or
/// later, a raw occurrence landing on or after day 28 is moved to
/// `min(days_in_month, seed_day)`. This guarantees a seed of the 31st
/// keeps recurring through February and the 30-day months instead of
/// silently drifting or skipping. For non-monthly frequencies this is a
/// no-op.
///
/// Applied to every generated occurrence, not only the first.
///
/// # Examples
///
/// ```
/// use sched_core::types::Date;
/// use sched_engine::rule::Frequency;
/// use sched_engine::schedule::clamp_month_end;
///
/// let seed = Date::from_ymd(2024, 1, 31).unwrap();
/// let raw = Date::from_ymd(2024, 4, 28).unwrap();
/// assert_eq!(
///     clamp_month_end(raw, seed, Frequency::Monthly),
///     Date::from_ymd(2024, 4, 30).unwrap()
/// );
/// ```
pub fn clamp_month_end(candidate: Date, seed: Date, frequency: Frequency) -> Date {
    if frequency.is_monthly() && seed.day() > 28 && candidate.day() >= 28 {
        let day = candidate.days_in_month().min(seed.day());
        candidate.with_day(day).unwrap_or(candidate)
    } else {
        candidate
    }
}

/// The skip-first-day-of-month policy: any occurrence landing on day 1
/// of a month is shifted forward by a configured number of days.
///
/// # Examples
///
/// ```
/// use sched_core::types::Date;
/// use sched_engine::FirstOfMonthSkip;
///
/// let skip = FirstOfMonthSkip::by_days(3);
/// let first = Date::from_ymd(2024, 3, 1).unwrap();
/// assert_eq!(skip.apply(first), Date::from_ymd(2024, 3, 4).unwrap());
///
/// // Only day-1 occurrences move
/// let mid = Date::from_ymd(2024, 3, 15).unwrap();
/// assert_eq!(skip.apply(mid), mid);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FirstOfMonthSkip {
    enabled: bool,
    offset_days: u32,
}

impl FirstOfMonthSkip {
    /// The policy that leaves every occurrence untouched.
    pub const fn disabled() -> Self {
        Self { enabled: false, offset_days: 0 }
    }

    /// The policy that shifts day-1 occurrences forward by `offset_days`.
    pub const fn by_days(offset_days: u32) -> Self {
        Self { enabled: true, offset_days }
    }

    /// Returns whether the policy is enabled.
    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Returns the configured shift in days.
    pub fn offset_days(&self) -> u32 {
        self.offset_days
    }

    /// Applies the policy to one occurrence.
    pub fn apply(&self, date: Date) -> Date {
        if self.enabled && date.day() == 1 {
            date.plus_days(i64::from(self.offset_days))
        } else {
            date
        }
    }

    /// The window start that lets a skip-shifted candidate be traced back
    /// to its true underlying occurrence: a candidate on day
    /// `offset_days + 1` may really be a shifted day-1 occurrence, so the
    /// search window opens `offset_days` earlier.
    pub(crate) fn trace_back_start(&self, candidate: Date) -> Date {
        if self.enabled && candidate.day() == self.offset_days + 1 {
            candidate.plus_days(-i64::from(self.offset_days))
        } else {
            candidate
        }
    }
}

impl Default for FirstOfMonthSkip {
    fn default() -> Self {
        Self::disabled()
    }
}

/// The recurrence engine facade.
///
/// Stateless across calls: every operation is a pure function of its
/// explicit inputs plus the evaluator the engine was built with. Rule
/// text that fails to parse yields "no date" (`None`) or `false`; it is
/// never an error.
///
/// # Examples
///
/// ```
/// use sched_core::types::Date;
/// use sched_engine::RecurrenceEngine;
///
/// let engine = RecurrenceEngine::new();
/// let seed = Date::from_ymd(2024, 1, 31).unwrap();
///
/// // Scenario: monthly meeting seeded on the 31st recurs on Feb 29
/// let next = engine
///     .next_occurrence("FREQ=MONTHLY;INTERVAL=1", seed, Date::from_ymd(2024, 2, 1).unwrap())
///     .unwrap();
/// assert_eq!(next, Date::from_ymd(2024, 2, 29).unwrap());
/// ```
#[derive(Debug, Clone)]
pub struct RecurrenceEngine<E = RuleEvaluator> {
    evaluator: E,
    restart_cap: u32,
}

impl RecurrenceEngine<RuleEvaluator> {
    /// Creates an engine backed by the built-in evaluator.
    pub fn new() -> Self {
        Self::with_evaluator(RuleEvaluator)
    }
}

impl Default for RecurrenceEngine<RuleEvaluator> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E: RecurrenceEvaluator> RecurrenceEngine<E> {
    /// Creates an engine backed by a caller-supplied evaluator
    /// (typically a deterministic fake in tests).
    pub fn with_evaluator(evaluator: E) -> Self {
        Self { evaluator, restart_cap: DEFAULT_RESTART_CAP }
    }

    /// Sets the bound on alignment restarts. Exceeding it yields
    /// [`AlignmentError::RestartCapExceeded`](crate::AlignmentError::RestartCapExceeded).
    pub fn restart_cap(mut self, cap: u32) -> Self {
        self.restart_cap = cap;
        self
    }

    pub(crate) fn cap(&self) -> u32 {
        self.restart_cap
    }

    /// Generates the occurrences of `rule_text` anchored at `seed` inside
    /// `window`, at most `max_count` of them, month-end corrected, with
    /// the skip policy applied last.
    ///
    /// Returns `None` when the rule text does not parse.
    pub fn occurrences(
        &self,
        rule_text: &str,
        seed: Date,
        window: DateWindow,
        max_count: usize,
        skip: FirstOfMonthSkip,
    ) -> Option<Vec<Date>> {
        let rule: Recurrence = rule_text.parse().ok()?;
        Some(self.occurrences_of(&rule, seed, window, max_count, skip))
    }

    pub(crate) fn occurrences_of(
        &self,
        rule: &Recurrence,
        seed: Date,
        window: DateWindow,
        max_count: usize,
        skip: FirstOfMonthSkip,
    ) -> Vec<Date> {
        let mut dates: Vec<Date> = self
            .evaluator
            .dates_in_range(rule, seed, window, max_count)
            .into_iter()
            .map(|raw| skip.apply(clamp_month_end(raw, seed, rule.frequency())))
            .collect();
        // The skip shift can land a day-1 occurrence on a later
        // occurrence's date; the reported sequence stays strictly
        // increasing.
        if skip.is_enabled() {
            dates.sort();
            dates.dedup();
        }
        dates
    }

    /// Returns the first occurrence strictly after `after`, month-end
    /// corrected. `None` when the rule does not parse or is exhausted.
    pub fn next_occurrence(&self, rule_text: &str, seed: Date, after: Date) -> Option<Date> {
        let rule: Recurrence = rule_text.parse().ok()?;
        self.next_occurrence_of(&rule, seed, after)
    }

    pub(crate) fn next_occurrence_of(
        &self,
        rule: &Recurrence,
        seed: Date,
        after: Date,
    ) -> Option<Date> {
        self.evaluator
            .next_date(rule, seed, after)
            .map(|raw| clamp_month_end(raw, seed, rule.frequency()))
    }

    /// Returns whether `candidate` is a valid occurrence of the rule,
    /// honouring the skip policy: a skip-shifted candidate is traced back
    /// to its underlying day-1 occurrence.
    ///
    /// Returns `false`, never an error, when the rule does not parse.
    pub fn is_occurrence(
        &self,
        rule_text: &str,
        seed: Date,
        candidate: Date,
        skip: FirstOfMonthSkip,
    ) -> bool {
        match rule_text.parse::<Recurrence>() {
            Ok(rule) => self.is_occurrence_of(&rule, seed, candidate, skip),
            Err(_) => false,
        }
    }

    pub(crate) fn is_occurrence_of(
        &self,
        rule: &Recurrence,
        seed: Date,
        candidate: Date,
        skip: FirstOfMonthSkip,
    ) -> bool {
        let window = DateWindow::new(skip.trace_back_start(candidate), candidate.plus_days(1));
        self.occurrences_of(rule, seed, window, 1, skip).contains(&candidate)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(y: i32, m: u32, day: u32) -> Date {
        Date::from_ymd(y, m, day).unwrap()
    }

    mod clamp {
        use super::*;

        #[test]
        fn test_no_op_below_day_29_seed() {
            let seed = d(2024, 1, 28);
            let raw = d(2024, 2, 28);
            assert_eq!(clamp_month_end(raw, seed, Frequency::Monthly), raw);
        }

        #[test]
        fn test_no_op_for_non_monthly() {
            let seed = d(2024, 1, 31);
            let raw = d(2024, 2, 28);
            assert_eq!(clamp_month_end(raw, seed, Frequency::Weekly), raw);
        }

        #[test]
        fn test_raises_drifted_candidate() {
            let seed = d(2024, 1, 31);
            assert_eq!(clamp_month_end(d(2024, 3, 28), seed, Frequency::Monthly), d(2024, 3, 31));
            assert_eq!(clamp_month_end(d(2024, 4, 28), seed, Frequency::Monthly), d(2024, 4, 30));
        }

        #[test]
        fn test_february_leap_year() {
            let seed = d(2024, 1, 31);
            assert_eq!(clamp_month_end(d(2024, 2, 28), seed, Frequency::Monthly), d(2024, 2, 29));
            let seed = d(2023, 1, 31);
            assert_eq!(clamp_month_end(d(2023, 2, 28), seed, Frequency::Monthly), d(2023, 2, 28));
        }

        #[test]
        fn test_seed_day_29() {
            let seed = d(2024, 1, 29);
            assert_eq!(clamp_month_end(d(2024, 3, 31), seed, Frequency::Monthly), d(2024, 3, 29));
            // Non-leap February caps at 28
            assert_eq!(clamp_month_end(d(2023, 2, 28), seed, Frequency::Monthly), d(2023, 2, 28));
        }

        #[test]
        fn test_untouched_mid_month() {
            let seed = d(2024, 1, 31);
            assert_eq!(clamp_month_end(d(2024, 3, 15), seed, Frequency::Monthly), d(2024, 3, 15));
        }
    }

    mod skip {
        use super::*;

        #[test]
        fn test_disabled_is_identity() {
            let skip = FirstOfMonthSkip::disabled();
            assert_eq!(skip.apply(d(2024, 3, 1)), d(2024, 3, 1));
            assert!(!skip.is_enabled());
        }

        #[test]
        fn test_shifts_day_one_only() {
            let skip = FirstOfMonthSkip::by_days(3);
            assert_eq!(skip.apply(d(2024, 3, 1)), d(2024, 3, 4));
            assert_eq!(skip.apply(d(2024, 3, 2)), d(2024, 3, 2));
            assert_eq!(skip.apply(d(2024, 3, 31)), d(2024, 3, 31));
        }

        #[test]
        fn test_trace_back_start() {
            let skip = FirstOfMonthSkip::by_days(3);
            // Day 4 could be a shifted day-1 occurrence
            assert_eq!(skip.trace_back_start(d(2024, 3, 4)), d(2024, 3, 1));
            // Other days are their own window start
            assert_eq!(skip.trace_back_start(d(2024, 3, 5)), d(2024, 3, 5));
            assert_eq!(FirstOfMonthSkip::disabled().trace_back_start(d(2024, 3, 4)), d(2024, 3, 4));
        }
    }

    mod engine {
        use super::*;

        #[test]
        fn test_invalid_rule_yields_no_date() {
            let engine = RecurrenceEngine::new();
            let seed = d(2024, 1, 1);
            assert_eq!(
                engine.occurrences("junk", seed, DateWindow::single(seed), 1, FirstOfMonthSkip::disabled()),
                None
            );
            assert_eq!(engine.next_occurrence("junk", seed, seed), None);
            assert!(!engine.is_occurrence("junk", seed, seed, FirstOfMonthSkip::disabled()));
        }

        #[test]
        fn test_occurrences_apply_month_end_correction() {
            let engine = RecurrenceEngine::new();
            let seed = d(2024, 1, 31);
            let got = engine
                .occurrences(
                    "FREQ=MONTHLY;INTERVAL=1",
                    seed,
                    DateWindow::new(seed, d(2024, 7, 1)),
                    10,
                    FirstOfMonthSkip::disabled(),
                )
                .unwrap();
            assert_eq!(
                got,
                vec![
                    d(2024, 1, 31),
                    d(2024, 2, 29),
                    d(2024, 3, 31),
                    d(2024, 4, 30),
                    d(2024, 5, 31),
                    d(2024, 6, 30)
                ]
            );
            // Every day-of-month equals min(days_in_month, seed day)
            for date in got {
                assert_eq!(date.day(), date.days_in_month().min(seed.day()));
            }
        }

        #[test]
        fn test_occurrences_apply_skip_after_correction() {
            let engine = RecurrenceEngine::new();
            let seed = d(2024, 3, 1);
            let got = engine
                .occurrences(
                    "FREQ=MONTHLY;BYMONTHDAY=1",
                    seed,
                    DateWindow::new(seed, d(2024, 6, 1)),
                    10,
                    FirstOfMonthSkip::by_days(3),
                )
                .unwrap();
            assert_eq!(got, vec![d(2024, 3, 4), d(2024, 4, 4), d(2024, 5, 4)]);
        }

        #[test]
        fn test_next_occurrence_month_end() {
            let engine = RecurrenceEngine::new();
            let seed = d(2024, 1, 31);
            // 2024 is a leap year: Feb 29, not Mar 2
            assert_eq!(
                engine.next_occurrence("FREQ=MONTHLY;INTERVAL=1", seed, d(2024, 2, 1)),
                Some(d(2024, 2, 29))
            );
        }

        #[test]
        fn test_next_occurrence_idempotent() {
            let engine = RecurrenceEngine::new();
            let seed = d(2024, 1, 1);
            let a = engine.next_occurrence("FREQ=WEEKLY;BYDAY=MO", seed, d(2024, 1, 3));
            let b = engine.next_occurrence("FREQ=WEEKLY;BYDAY=MO", seed, d(2024, 1, 3));
            assert_eq!(a, b);
            assert_eq!(a, Some(d(2024, 1, 8)));
        }

        #[test]
        fn test_is_occurrence_plain() {
            let engine = RecurrenceEngine::new();
            let seed = d(2024, 1, 1);
            let skip = FirstOfMonthSkip::disabled();
            assert!(engine.is_occurrence("FREQ=WEEKLY;BYDAY=MO", seed, d(2024, 1, 8), skip));
            assert!(!engine.is_occurrence("FREQ=WEEKLY;BYDAY=MO", seed, d(2024, 1, 9), skip));
        }

        #[test]
        fn test_is_occurrence_traces_skip_back() {
            let engine = RecurrenceEngine::new();
            let seed = d(2024, 1, 1);
            let skip = FirstOfMonthSkip::by_days(3);
            // Mar 1 is a raw day-1 occurrence; the skip policy reports Mar 4
            assert!(engine.is_occurrence("FREQ=MONTHLY;BYMONTHDAY=1", seed, d(2024, 3, 4), skip));
            // The unshifted day-1 date is no longer a reported occurrence
            assert!(!engine.is_occurrence("FREQ=MONTHLY;BYMONTHDAY=1", seed, d(2024, 3, 1), skip));
        }

        #[test]
        fn test_is_occurrence_matches_single_window_generation() {
            let engine = RecurrenceEngine::new();
            let seed = d(2024, 1, 1);
            let skip = FirstOfMonthSkip::disabled();
            for offset in 0..32 {
                let candidate = seed.plus_days(offset);
                let generated = engine
                    .occurrences(
                        "FREQ=WEEKLY;INTERVAL=2;BYDAY=MO",
                        seed,
                        DateWindow::single(candidate),
                        1,
                        skip,
                    )
                    .unwrap();
                assert_eq!(
                    engine.is_occurrence("FREQ=WEEKLY;INTERVAL=2;BYDAY=MO", seed, candidate, skip),
                    generated.contains(&candidate),
                );
            }
        }
    }
}
