//! Check command implementation.

use tracing::info;

use sched_core::types::Date;
use sched_engine::RecurrenceEngine;

use crate::commands::skip_from;
use crate::Result;

/// Run the check command
pub fn run(rule: &str, seed: Date, date: Date, skip_days: Option<u32>) -> Result<()> {
    info!("Checking {} against `{}`", date, rule);

    let valid = RecurrenceEngine::new().is_occurrence(rule, seed, date, skip_from(skip_days));
    println!("{}", if valid { "valid occurrence" } else { "not an occurrence" });
    Ok(())
}
