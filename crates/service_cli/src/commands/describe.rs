//! Describe command implementation.

use sched_core::types::Date;
use sched_engine::rule::Recurrence;

use crate::Result;

/// Run the describe command
pub fn run(rule: &str, start: Date) -> Result<()> {
    let parsed: Recurrence = rule.parse().map_err(crate::CliError::Rule)?;
    println!("{}", parsed.describe(start));
    Ok(())
}
