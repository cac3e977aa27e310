//! schedctl - Command Line Operations for the Meeting Schedule Engine
//!
//! This is the operational entry point for the recurrence alignment
//! engine.
//!
//! # Commands
//!
//! - `schedctl occurrences` - List the occurrences of a recurrence rule
//! - `schedctl next` - Next occurrence after a date
//! - `schedctl check` - Is a date a valid occurrence?
//! - `schedctl first-repayment` - First repayment date for a disbursed loan
//! - `schedctl next-repayment` - Next aligned repayment date
//! - `schedctl describe` - Render a rule as a human sentence
//!
//! # Architecture
//!
//! As the service layer of the workspace, this crate wires the engine
//! crates to a command-line interface; it contains no scheduling logic
//! of its own.

use clap::{Parser, Subcommand};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use sched_core::policy::RescheduleType;
use sched_core::types::Date;
use sched_engine::rule::Frequency;

mod commands;
mod error;

pub use error::{CliError, Result};

/// Meeting schedule engine CLI
#[derive(Parser)]
#[command(name = "schedctl")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List the occurrences of a recurrence rule in a window
    Occurrences {
        /// Recurrence rule text (e.g. "FREQ=WEEKLY;INTERVAL=1;BYDAY=MO")
        #[arg(short, long)]
        rule: String,

        /// Seed date anchoring the recurrence (YYYY-MM-DD)
        #[arg(short, long)]
        seed: Date,

        /// Window start (YYYY-MM-DD); defaults to the seed date
        #[arg(short, long)]
        from: Option<Date>,

        /// Window end, exclusive (YYYY-MM-DD); defaults to five years
        /// after the window start
        #[arg(short, long)]
        to: Option<Date>,

        /// Maximum number of occurrences to list
        #[arg(short, long, default_value = "10")]
        count: usize,

        /// Shift occurrences on day 1 of a month forward by this many days
        #[arg(long)]
        skip_days: Option<u32>,
    },

    /// Print the next occurrence strictly after a date
    Next {
        /// Recurrence rule text
        #[arg(short, long)]
        rule: String,

        /// Seed date anchoring the recurrence (YYYY-MM-DD)
        #[arg(short, long)]
        seed: Date,

        /// Anchor date (YYYY-MM-DD)
        #[arg(short, long)]
        after: Date,
    },

    /// Check whether a date is a valid occurrence
    Check {
        /// Recurrence rule text
        #[arg(short, long)]
        rule: String,

        /// Seed date anchoring the recurrence (YYYY-MM-DD)
        #[arg(short, long)]
        seed: Date,

        /// Candidate date (YYYY-MM-DD)
        #[arg(short, long)]
        date: Date,

        /// Shift occurrences on day 1 of a month forward by this many days
        #[arg(long)]
        skip_days: Option<u32>,
    },

    /// Compute the first repayment date for a disbursed loan
    FirstRepayment {
        /// Meeting recurrence rule text
        #[arg(short, long)]
        rule: String,

        /// Meeting seed date (YYYY-MM-DD)
        #[arg(short, long)]
        seed: Date,

        /// Loan disbursement date (YYYY-MM-DD)
        #[arg(short, long)]
        disbursement: Date,

        /// Loan repayment interval
        #[arg(short, long, default_value = "1")]
        interval: u32,

        /// Loan repayment frequency (DAILY, WEEKLY, MONTHLY, YEARLY)
        #[arg(short = 'q', long)]
        frequency: Frequency,

        /// Shift occurrences on day 1 of a month forward by this many days
        #[arg(long)]
        skip_days: Option<u32>,
    },

    /// Compute the next aligned repayment date
    NextRepayment {
        /// Meeting recurrence rule text
        #[arg(short, long)]
        rule: String,

        /// Meeting seed date (YYYY-MM-DD)
        #[arg(short, long)]
        seed: Date,

        /// Current repayment date (YYYY-MM-DD)
        #[arg(short = 'p', long)]
        repayment: Date,

        /// Loan repayment interval
        #[arg(short, long, default_value = "1")]
        interval: u32,

        /// Loan repayment frequency (DAILY, WEEKLY, MONTHLY, YEARLY)
        #[arg(short = 'q', long)]
        frequency: Frequency,

        /// Reschedule type for non-working days (same, next,
        /// next-meeting, previous); omit to skip working-day handling
        #[arg(long)]
        reschedule: Option<RescheduleType>,

        /// Non-working weekday (repeatable, e.g. --non-working-day sun)
        #[arg(long = "non-working-day")]
        non_working_days: Vec<String>,

        /// Holiday date (repeatable, YYYY-MM-DD)
        #[arg(long = "holiday")]
        holidays: Vec<Date>,

        /// Shift occurrences on day 1 of a month forward by this many days
        #[arg(long)]
        skip_days: Option<u32>,
    },

    /// Render a recurrence rule as a human sentence
    Describe {
        /// Recurrence rule text
        #[arg(short, long)]
        rule: String,

        /// Start date anchoring the wording (YYYY-MM-DD)
        #[arg(short, long)]
        start: Date,
    },
}

fn main() -> Result<()> {
    // Initialise tracing
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();

    if cli.verbose {
        info!("Verbose mode enabled");
    }

    match cli.command {
        Commands::Occurrences { rule, seed, from, to, count, skip_days } => {
            commands::occurrences::run(&rule, seed, from, to, count, skip_days)
        }
        Commands::Next { rule, seed, after } => commands::next::run(&rule, seed, after),
        Commands::Check { rule, seed, date, skip_days } => {
            commands::check::run(&rule, seed, date, skip_days)
        }
        Commands::FirstRepayment { rule, seed, disbursement, interval, frequency, skip_days } => {
            commands::first_repayment::run(&rule, seed, disbursement, interval, frequency, skip_days)
        }
        Commands::NextRepayment {
            rule,
            seed,
            repayment,
            interval,
            frequency,
            reschedule,
            non_working_days,
            holidays,
            skip_days,
        } => commands::next_repayment::run(
            &rule,
            seed,
            repayment,
            interval,
            frequency,
            reschedule,
            &non_working_days,
            &holidays,
            skip_days,
        ),
        Commands::Describe { rule, start } => commands::describe::run(&rule, start),
    }
}
