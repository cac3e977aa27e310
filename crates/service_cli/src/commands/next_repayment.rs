//! Next-repayment command implementation.

use chrono::Weekday;
use tracing::info;

use sched_core::policy::{RescheduleType, WorkingDayPolicy, WorkingWeek};
use sched_core::types::Date;
use sched_engine::rule::Frequency;
use sched_engine::RecurrenceEngine;

use crate::commands::skip_from;
use crate::{CliError, Result};

/// Run the next-repayment command
#[allow(clippy::too_many_arguments)]
pub fn run(
    rule: &str,
    seed: Date,
    repayment: Date,
    interval: u32,
    frequency: Frequency,
    reschedule: Option<RescheduleType>,
    non_working_days: &[String],
    holidays: &[Date],
    skip_days: Option<u32>,
) -> Result<()> {
    info!("Next repayment after {} for a {} x{} loan", repayment, frequency, interval);

    let policy = reschedule
        .map(|reschedule| {
            let mut policy = WorkingWeek::new(reschedule);
            for name in non_working_days {
                let weekday: Weekday = name
                    .parse()
                    .map_err(|_| CliError::InvalidArgument(format!("unknown weekday: {}", name)))?;
                policy = policy.non_working_weekday(weekday);
            }
            for &holiday in holidays {
                policy = policy.holiday(holiday);
            }
            Ok::<_, CliError>(policy)
        })
        .transpose()?;

    let next = RecurrenceEngine::new().next_repayment_meeting_date(
        rule,
        seed,
        repayment,
        interval,
        frequency,
        policy.as_ref().map(|p| p as &dyn WorkingDayPolicy),
        skip_from(skip_days),
    )?;
    match next {
        Some(date) => println!("{}", date),
        None => println!("(no occurrence)"),
    }
    Ok(())
}
