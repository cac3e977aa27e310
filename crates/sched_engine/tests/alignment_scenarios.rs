//! End-to-end alignment scenarios.

use chrono::Weekday;

use sched_core::policy::{RescheduleType, WorkingDayPolicy, WorkingWeek};
use sched_core::types::{Date, DateWindow};
use sched_engine::rule::{Frequency, Recurrence};
use sched_engine::{FirstOfMonthSkip, RecurrenceEngine};

fn d(y: i32, m: u32, day: u32) -> Date {
    Date::from_ymd(y, m, day).unwrap()
}

const NO_POLICY: Option<&dyn WorkingDayPolicy> = None;
const NO_SKIP: FirstOfMonthSkip = FirstOfMonthSkip::disabled();

/// Weekly meeting funding a monthly loan: the repayment walks four
/// weekly occurrences forward, after the same-day rule advances the
/// start by one day.
#[test]
fn monthly_loan_on_weekly_meeting() {
    let engine = RecurrenceEngine::new();
    let rule = "FREQ=WEEKLY;INTERVAL=1;BYDAY=MO";
    let seed = d(2024, 1, 1); // Monday

    let repayment = engine
        .next_repayment_meeting_date(rule, seed, d(2024, 1, 1), 1, Frequency::Monthly, NO_POLICY, NO_SKIP)
        .unwrap()
        .unwrap();
    assert_eq!(repayment, d(2024, 1, 29)); // the 4th Monday after Jan 2

    // The chain continues another four meetings per period
    let following = engine
        .next_repayment_meeting_date(rule, seed, repayment, 1, Frequency::Monthly, NO_POLICY, NO_SKIP)
        .unwrap()
        .unwrap();
    assert_eq!(following, d(2024, 2, 26));
}

/// Month-end correction: a monthly meeting seeded on Jan 31 recurs on
/// Feb 29 in a leap year, not Mar 2.
#[test]
fn month_end_seed_recurs_in_february() {
    let engine = RecurrenceEngine::new();
    let seed = d(2024, 1, 31);

    assert_eq!(
        engine.next_occurrence("FREQ=MONTHLY;INTERVAL=1", seed, d(2024, 2, 1)),
        Some(d(2024, 2, 29))
    );

    // And in a non-leap year, Feb 28
    let seed = d(2023, 1, 31);
    assert_eq!(
        engine.next_occurrence("FREQ=MONTHLY;INTERVAL=1", seed, d(2023, 2, 1)),
        Some(d(2023, 2, 28))
    );
}

/// Skip-first-day-of-month with offset 3: a raw Mar 1 occurrence is
/// reported as Mar 4, and the shifted date still validates by tracing
/// back to its underlying occurrence.
#[test]
fn skip_first_day_shifts_and_traces_back() {
    let engine = RecurrenceEngine::new();
    let rule = "FREQ=MONTHLY;BYMONTHDAY=1";
    let seed = d(2024, 1, 1);
    let skip = FirstOfMonthSkip::by_days(3);

    let dates = engine
        .occurrences(rule, seed, DateWindow::new(d(2024, 3, 1), d(2024, 4, 1)), 5, skip)
        .unwrap();
    assert_eq!(dates, vec![d(2024, 3, 4)]);

    assert!(engine.is_occurrence(rule, seed, d(2024, 3, 4), skip));
    assert!(!engine.is_occurrence(rule, seed, d(2024, 3, 1), skip));
    // Without the skip policy the raw date is the occurrence
    assert!(engine.is_occurrence(rule, seed, d(2024, 3, 1), NO_SKIP));
}

/// A repayment landing on a non-working Sunday under a
/// move-to-next-working-day policy moves to Monday and is never itself
/// a non-working day.
#[test]
fn non_working_sunday_moves_to_monday() {
    let engine = RecurrenceEngine::new();
    let policy =
        WorkingWeek::new(RescheduleType::MoveToNextWorkingDay).non_working_weekday(Weekday::Sun);
    let rule = "FREQ=WEEKLY;INTERVAL=1;BYDAY=SU";
    let seed = d(2024, 1, 7); // Sunday

    let repayment = engine
        .next_repayment_meeting_date(rule, seed, seed, 1, Frequency::Weekly, Some(&policy), NO_SKIP)
        .unwrap()
        .unwrap();
    assert_eq!(repayment, d(2024, 1, 15));
    assert_eq!(repayment.weekday(), Weekday::Mon);
    assert!(policy.is_working_day(repayment));
}

/// A non-working result under a move-to-next-repayment-day policy
/// restarts the whole computation anchored the following day, because
/// moving past the non-working day changes which meeting is reached.
#[test]
fn non_working_day_restarts_full_computation() {
    let engine = RecurrenceEngine::new();
    let policy =
        WorkingWeek::new(RescheduleType::MoveToNextRepaymentDay).non_working_weekday(Weekday::Sun);
    // 2024-03-03 is a Sunday
    let rule = "FREQ=MONTHLY;BYMONTHDAY=3";
    let seed = d(2024, 1, 3);

    let repayment = engine
        .next_repayment_meeting_date(rule, seed, d(2024, 2, 3), 1, Frequency::Monthly, Some(&policy), NO_SKIP)
        .unwrap()
        .unwrap();
    assert_eq!(repayment, d(2024, 4, 3));
    assert!(policy.is_working_day(repayment));
}

/// Rebuilding a parsed descriptor with no overrides generates the same
/// occurrence sequence as the original.
#[test]
fn rebuild_round_trip_generates_identical_sequence() {
    let engine = RecurrenceEngine::new();
    let seed = d(2024, 1, 31);
    let window = DateWindow::new(seed, d(2026, 1, 1));

    for text in [
        "FREQ=WEEKLY;INTERVAL=2;BYDAY=MO,TH",
        "FREQ=MONTHLY;INTERVAL=1",
        "FREQ=MONTHLY;INTERVAL=1;BYDAY=MO;BYSETPOS=2",
        "FREQ=DAILY;INTERVAL=10;COUNT=12",
    ] {
        let original: Recurrence = text.parse().unwrap();
        let rebuilt = original.rebuild().build().unwrap();
        assert_eq!(rebuilt, original);

        let from_original = engine
            .occurrences(text, seed, window, 50, NO_SKIP)
            .unwrap();
        let from_rebuilt = engine
            .occurrences(&rebuilt.to_string(), seed, window, 50, NO_SKIP)
            .unwrap();
        assert_eq!(from_original, from_rebuilt, "sequences diverged for {}", text);
    }
}

/// Fortnightly loans on weekly meetings land every second meeting.
#[test]
fn fortnightly_loan_on_weekly_meeting() {
    let engine = RecurrenceEngine::new();
    let rule = "FREQ=WEEKLY;INTERVAL=1;BYDAY=WE";
    let seed = d(2024, 1, 3); // Wednesday

    let first = engine
        .first_repayment_date(rule, seed, d(2024, 1, 3), 2, Frequency::Weekly, NO_SKIP)
        .unwrap();
    assert_eq!(first, d(2024, 1, 17));

    let second = engine
        .next_repayment_meeting_date(rule, seed, first, 2, Frequency::Weekly, NO_POLICY, NO_SKIP)
        .unwrap()
        .unwrap();
    assert_eq!(second, d(2024, 1, 31));
}

/// The engine's whole surface recovers unparsable rules as "no date".
#[test]
fn unparsable_rules_yield_no_date_everywhere() {
    let engine = RecurrenceEngine::new();
    let seed = d(2024, 1, 1);

    assert_eq!(engine.occurrences("nope", seed, DateWindow::single(seed), 1, NO_SKIP), None);
    assert_eq!(engine.next_occurrence("nope", seed, seed), None);
    assert!(!engine.is_occurrence("nope", seed, seed, NO_SKIP));
    assert_eq!(
        engine.first_repayment_date("nope", seed, seed, 1, Frequency::Weekly, NO_SKIP),
        None
    );
    assert_eq!(
        engine
            .next_repayment_meeting_date("nope", seed, seed, 1, Frequency::Weekly, NO_POLICY, NO_SKIP)
            .unwrap(),
        None
    );
    assert_eq!(engine.recent_eligible_meeting_date("nope", seed, seed, NO_SKIP), None);
}
