//! CLI command implementations
//!
//! Each submodule implements a specific CLI command.

pub mod check;
pub mod describe;
pub mod first_repayment;
pub mod next;
pub mod next_repayment;
pub mod occurrences;

use sched_engine::FirstOfMonthSkip;

/// Maps the optional `--skip-days` flag to the engine policy.
pub(crate) fn skip_from(skip_days: Option<u32>) -> FirstOfMonthSkip {
    match skip_days {
        Some(days) => FirstOfMonthSkip::by_days(days),
        None => FirstOfMonthSkip::disabled(),
    }
}
