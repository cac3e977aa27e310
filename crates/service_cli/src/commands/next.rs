//! Next command implementation.

use tracing::info;

use sched_core::types::Date;
use sched_engine::RecurrenceEngine;

use crate::Result;

/// Run the next command
pub fn run(rule: &str, seed: Date, after: Date) -> Result<()> {
    info!("Next occurrence of `{}` after {}", rule, after);

    match RecurrenceEngine::new().next_occurrence(rule, seed, after) {
        Some(date) => println!("{}", date),
        None => println!("(no occurrence)"),
    }
    Ok(())
}
