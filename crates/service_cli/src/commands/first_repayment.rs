//! First-repayment command implementation.

use tracing::info;

use sched_core::types::Date;
use sched_engine::rule::Frequency;
use sched_engine::RecurrenceEngine;

use crate::commands::skip_from;
use crate::Result;

/// Run the first-repayment command
pub fn run(
    rule: &str,
    seed: Date,
    disbursement: Date,
    interval: u32,
    frequency: Frequency,
    skip_days: Option<u32>,
) -> Result<()> {
    info!("First repayment for a {} x{} loan disbursed {}", frequency, interval, disbursement);

    let first = RecurrenceEngine::new().first_repayment_date(
        rule,
        seed,
        disbursement,
        interval,
        frequency,
        skip_from(skip_days),
    );
    match first {
        Some(date) => println!("{}", date),
        None => println!("(no occurrence)"),
    }
    Ok(())
}
