//! CLI error type.

use thiserror::Error;

use sched_engine::{AlignmentError, RuleError};

/// Errors surfaced by CLI commands.
#[derive(Debug, Error)]
pub enum CliError {
    /// An argument was syntactically valid for clap but semantically
    /// unusable (e.g. an unknown weekday name).
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// The recurrence rule text was rejected.
    #[error("Invalid recurrence rule: {0}")]
    Rule(#[from] RuleError),

    /// The alignment engine reported a fatal configuration error.
    #[error(transparent)]
    Alignment(#[from] AlignmentError),
}

/// Result alias for CLI commands.
pub type Result<T> = std::result::Result<T, CliError>;
