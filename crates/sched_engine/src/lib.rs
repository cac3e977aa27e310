//! # sched_engine: Meeting/Repayment Recurrence Alignment Engine
//!
//! Computes recurring calendar dates for group/center meetings from an
//! RFC 5545 style recurrence rule, and aligns a loan's repayment schedule
//! to those meeting occurrences when the loan's own repayment cadence
//! differs from the meeting's cadence.
//!
//! This crate provides:
//! - Recurrence descriptors: parse, rebuild and format rule text (`rule`)
//! - Occurrence evaluation behind a capability trait (`eval`)
//! - Occurrence generation with month-end correction and the
//!   skip-first-day-of-month policy (`schedule`)
//! - The meeting–repayment alignment algorithm
//!   ([`RecurrenceEngine::first_repayment_date`],
//!   [`RecurrenceEngine::next_repayment_meeting_date`])
//!
//! ## Design Principles
//!
//! - **Pure functions of explicit inputs**: no clock reads, no shared
//!   state; "today" is always a caller-supplied parameter
//! - **Capability traits at the seams**: the RFC 5545 evaluator and the
//!   working-day policy are narrow traits, so the alignment algorithm is
//!   unit-tested against deterministic fakes
//! - **Recoverable parse failures**: an unparsable rule yields "no date"
//!   (`None`/`false`), never a panic; only the defensive restart cap
//!   surfaces as an error
//!
//! ## Usage Examples
//!
//! ```
//! use sched_core::types::{Date, DateWindow};
//! use sched_engine::{FirstOfMonthSkip, RecurrenceEngine};
//!
//! let engine = RecurrenceEngine::new();
//! let seed = Date::from_ymd(2024, 1, 1).unwrap(); // a Monday
//!
//! let dates = engine
//!     .occurrences(
//!         "FREQ=WEEKLY;INTERVAL=1;BYDAY=MO",
//!         seed,
//!         DateWindow::new(seed, Date::from_ymd(2024, 2, 1).unwrap()),
//!         10,
//!         FirstOfMonthSkip::disabled(),
//!     )
//!     .unwrap();
//! assert_eq!(dates.len(), 5); // five Mondays in January 2024
//! ```

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![deny(rustdoc::private_intra_doc_links)]

mod align;
mod error;
pub mod eval;
pub mod rule;
pub mod schedule;

pub use error::{AlignmentError, RuleError};
pub use eval::{RecurrenceEvaluator, RuleEvaluator};
pub use rule::{same_frequency, same_interval, ByDay, Frequency, NthDay, Recurrence, RecurrenceBuilder};
pub use schedule::{clamp_month_end, FirstOfMonthSkip, RecurrenceEngine};

#[cfg(test)]
mod tests {
    #[test]
    fn it_works() {
        assert_eq!(2 + 2, 4);
    }
}
