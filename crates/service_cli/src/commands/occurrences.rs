//! Occurrences command implementation.
//!
//! Lists the occurrences of a recurrence rule in a date window.

use tracing::info;

use sched_core::types::{Date, DateWindow};
use sched_engine::RecurrenceEngine;

use crate::commands::skip_from;
use crate::{CliError, Result};

/// Run the occurrences command
pub fn run(
    rule: &str,
    seed: Date,
    from: Option<Date>,
    to: Option<Date>,
    count: usize,
    skip_days: Option<u32>,
) -> Result<()> {
    let start = from.unwrap_or(seed);
    let end = to.unwrap_or_else(|| start.plus_years(5));
    info!("Listing up to {} occurrences in [{}, {})", count, start, end);

    let engine = RecurrenceEngine::new();
    let dates = engine
        .occurrences(rule, seed, DateWindow::new(start, end), count, skip_from(skip_days))
        .ok_or_else(|| CliError::InvalidArgument(format!("unparsable rule: {}", rule)))?;

    if dates.is_empty() {
        println!("(no occurrences)");
    }
    for date in dates {
        println!("{}", date);
    }
    Ok(())
}
