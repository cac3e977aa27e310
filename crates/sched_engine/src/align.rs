//! Meeting–repayment alignment.
//!
//! Aligns a loan's repayment schedule to the occurrences of its group's
//! meeting calendar when the loan's repayment cadence differs from the
//! meeting cadence (e.g. weekly meetings funding monthly loans). The two
//! core operations are
//! [`RecurrenceEngine::first_repayment_date`] and
//! [`RecurrenceEngine::next_repayment_meeting_date`]; both recover an
//! unparsable rule as "no date".
//!
//! Re-entry is bounded: the non-advancement retry is a one-shot flag,
//! and working-day restarts strictly increase the anchor date while a
//! depth counter enforces the engine's restart cap.

use tracing::{debug, warn};

use sched_core::policy::WorkingDayPolicy;
use sched_core::types::Date;

use crate::error::AlignmentError;
use crate::eval::RecurrenceEvaluator;
use crate::rule::{Frequency, Recurrence};
use crate::schedule::{FirstOfMonthSkip, RecurrenceEngine};

/// Fixed four-weeks-per-month conversion used when monthly loans ride on
/// weekly meetings. Not calendar-exact; downstream schedules depend on
/// this exact constant.
const WEEKS_PER_MONTH: u32 = 4;

impl<E: RecurrenceEvaluator> RecurrenceEngine<E> {
    /// Computes the first repayment date of a loan disbursed on
    /// `disbursement`, aligned to the meeting calendar `rule_text`
    /// anchored at `seed`.
    ///
    /// A loan is never scheduled to repay on its own disbursement date:
    /// when the disbursement coincides with a (non-daily) meeting
    /// occurrence, the search starts the day after. The meeting
    /// descriptor is rebuilt with the loan's interval, and with the
    /// loan's frequency when the meeting is daily (daily meetings are a
    /// cadence-agnostic superset that yields to the loan's real
    /// frequency).
    ///
    /// Returns `None` when the rule does not parse or is exhausted.
    ///
    /// # Examples
    ///
    /// ```
    /// use sched_core::types::Date;
    /// use sched_engine::rule::Frequency;
    /// use sched_engine::{FirstOfMonthSkip, RecurrenceEngine};
    ///
    /// let engine = RecurrenceEngine::new();
    /// let seed = Date::from_ymd(2024, 1, 1).unwrap(); // Monday
    ///
    /// // Fortnightly loan on a weekly Monday meeting, disbursed at the
    /// // seed meeting: first repayment is two meetings later.
    /// let first = engine
    ///     .first_repayment_date(
    ///         "FREQ=WEEKLY;INTERVAL=1;BYDAY=MO",
    ///         seed,
    ///         seed,
    ///         2,
    ///         Frequency::Weekly,
    ///         FirstOfMonthSkip::disabled(),
    ///     )
    ///     .unwrap();
    /// assert_eq!(first, Date::from_ymd(2024, 1, 15).unwrap());
    /// ```
    pub fn first_repayment_date(
        &self,
        rule_text: &str,
        seed: Date,
        disbursement: Date,
        loan_interval: u32,
        loan_frequency: Frequency,
        skip: FirstOfMonthSkip,
    ) -> Option<Date> {
        let rule: Recurrence = rule_text.parse().ok()?;
        let mut start = disbursement;
        if self.is_occurrence_of(&rule, seed, start, skip) && !rule.frequency().is_daily() {
            start = start.plus_days(1);
        }
        let working = working_descriptor(&rule, Some(loan_interval), loan_frequency);
        let first = self.next_occurrence_of(&working, seed, start)?;
        Some(skip.apply(first))
    }

    /// Computes the repayment date following `repayment_date`, walking
    /// forward whole meeting occurrences.
    ///
    /// The number of occurrences walked is the loan cadence expressed in
    /// meeting periods: a monthly loan on a weekly meeting walks
    /// `interval × 4` weeks (a fixed conversion), divided by the
    /// meeting's own interval. Working-day handling and the
    /// skip-first-day-of-month policy are applied to the walked result;
    /// a non-working result under a move-to-next-repayment-day policy
    /// restarts the whole computation from the next day, since moving
    /// past a non-working day can change which meeting occurrence is
    /// reached.
    ///
    /// Returns `Ok(None)` when the rule does not parse or is exhausted,
    /// and [`AlignmentError::RestartCapExceeded`] when re-entry exceeds
    /// the engine's restart cap.
    pub fn next_repayment_meeting_date(
        &self,
        rule_text: &str,
        seed: Date,
        repayment_date: Date,
        loan_interval: u32,
        loan_frequency: Frequency,
        working_days: Option<&dyn WorkingDayPolicy>,
        skip: FirstOfMonthSkip,
    ) -> Result<Option<Date>, AlignmentError> {
        let Ok(rule) = rule_text.parse::<Recurrence>() else {
            return Ok(None);
        };
        self.next_repayment_inner(
            &rule,
            rule_text,
            seed,
            repayment_date,
            loan_interval,
            loan_frequency,
            working_days,
            skip,
            true,
            0,
        )
    }

    /// Returns `old_repayment_date` unchanged when it is still a valid
    /// occurrence of the meeting calendar; otherwise computes the next
    /// aligned repayment date.
    pub fn new_repayment_meeting_date(
        &self,
        rule_text: &str,
        seed: Date,
        old_repayment_date: Date,
        loan_interval: u32,
        loan_frequency: Frequency,
        working_days: Option<&dyn WorkingDayPolicy>,
        skip: FirstOfMonthSkip,
    ) -> Result<Option<Date>, AlignmentError> {
        let Ok(rule) = rule_text.parse::<Recurrence>() else {
            return Ok(None);
        };
        if self.is_occurrence_of(&rule, seed, old_repayment_date, skip) {
            return Ok(Some(old_repayment_date));
        }
        self.next_repayment_inner(
            &rule,
            rule_text,
            seed,
            old_repayment_date,
            loan_interval,
            loan_frequency,
            working_days,
            skip,
            true,
            0,
        )
    }

    /// Returns `today` when it is a meeting occurrence; otherwise
    /// advances one meeting period past `today` and returns the next
    /// occurrence from there. `today` is caller-supplied (the engine
    /// never reads a clock).
    pub fn recent_eligible_meeting_date(
        &self,
        rule_text: &str,
        seed: Date,
        today: Date,
        skip: FirstOfMonthSkip,
    ) -> Option<Date> {
        let rule: Recurrence = rule_text.parse().ok()?;
        if self.is_occurrence_of(&rule, seed, today, skip) {
            return Some(today);
        }
        let bumped = rule.frequency().advance(today, rule.interval());
        self.next_occurrence_of(&rule, seed, bumped)
    }

    #[allow(clippy::too_many_arguments)]
    fn next_repayment_inner(
        &self,
        rule: &Recurrence,
        rule_text: &str,
        seed: Date,
        repayment_date: Date,
        loan_interval: u32,
        loan_frequency: Frequency,
        working_days: Option<&dyn WorkingDayPolicy>,
        skip: FirstOfMonthSkip,
        first_attempt: bool,
        depth: u32,
    ) -> Result<Option<Date>, AlignmentError> {
        if depth > self.cap() {
            warn!(rule = rule_text, cap = self.cap(), "alignment restart cap exceeded");
            return Err(AlignmentError::RestartCapExceeded {
                rule: rule_text.to_string(),
                cap: self.cap(),
            });
        }

        let scaled = scaled_loan_interval(loan_interval, loan_frequency, rule.frequency());
        let meeting_interval = rule.interval().max(1);
        let steps = if scaled < meeting_interval { 1 } else { scaled / meeting_interval };

        // The step count, not the descriptor, encodes the loan cadence:
        // the interval stays the meeting's own.
        let working = working_descriptor(rule, None, loan_frequency);

        let mut tmp = repayment_date;
        if self.is_occurrence_of(rule, seed, tmp, skip) {
            tmp = tmp.plus_days(1);
        }

        let mut result = tmp;
        for _ in 0..steps {
            result = match self.next_occurrence_of(&working, seed, result) {
                Some(next) => next,
                None => return Ok(None),
            };
        }

        if let Some(policy) = working_days {
            if policy.is_non_working_day(result)
                && policy.reschedule_type().is_move_to_next_repayment_day()
            {
                debug!(%result, "result is non-working; restarting from the following day");
                return self.next_repayment_inner(
                    rule,
                    rule_text,
                    seed,
                    result.plus_days(1),
                    loan_interval,
                    loan_frequency,
                    working_days,
                    skip,
                    first_attempt,
                    depth + 1,
                );
            }
            let bound = self.next_occurrence_of(&working, seed, result);
            result = policy.offset_if_non_working(result, bound);
        }

        if first_attempt && result == repayment_date {
            debug!(%result, "walk did not advance; retrying once from the following day");
            return self.next_repayment_inner(
                rule,
                rule_text,
                seed,
                repayment_date.plus_days(1),
                loan_interval,
                loan_frequency,
                working_days,
                skip,
                false,
                depth + 1,
            );
        }

        if skip.is_enabled() {
            let shifted = skip.apply(result);
            if let Some(policy) = working_days {
                if policy.is_non_working_day(shifted)
                    && policy.reschedule_type().is_move_to_next_repayment_day()
                {
                    debug!(%shifted, "skip-shifted result is non-working; restarting");
                    return self.next_repayment_inner(
                        rule,
                        rule_text,
                        seed,
                        result.plus_days(1),
                        loan_interval,
                        loan_frequency,
                        working_days,
                        skip,
                        first_attempt,
                        depth + 1,
                    );
                }
                let bound = self.next_occurrence_of(&working, seed, shifted);
                result = policy.offset_if_non_working(shifted, bound);
            } else {
                result = shifted;
            }
        }

        Ok(Some(result))
    }
}

/// Rebuilds the meeting descriptor for loan-cadence walking: the
/// interval override is applied when given, and a daily meeting
/// frequency yields to the loan's frequency. The source descriptor is
/// never mutated.
fn working_descriptor(
    rule: &Recurrence,
    loan_interval: Option<u32>,
    loan_frequency: Frequency,
) -> Recurrence {
    let mut builder = rule.rebuild();
    if let Some(interval) = loan_interval {
        builder = builder.interval(interval);
    }
    if rule.frequency().is_daily() {
        builder = builder.frequency(loan_frequency);
    }
    builder.build().unwrap_or_else(|_| rule.clone())
}

/// The loan interval expressed in the meeting's frequency unit.
fn scaled_loan_interval(
    loan_interval: u32,
    loan_frequency: Frequency,
    meeting_frequency: Frequency,
) -> u32 {
    if loan_frequency.is_monthly() && meeting_frequency.is_weekly() {
        loan_interval.saturating_mul(WEEKS_PER_MONTH)
    } else {
        loan_interval
    }
}
