//! Engine error types.

use thiserror::Error;

/// Errors raised while parsing or validating recurrence rule text.
///
/// Inside the engine these are always recovered: an invalid rule means
/// "no recurrence", so generation yields `None` and membership checks
/// yield `false`. The variants exist for boundary callers (CLI,
/// validation layers) that want to report *why* a rule was rejected.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RuleError {
    /// A rule part was not a `KEY=VALUE` pair.
    #[error("Malformed recurrence rule part: {part}")]
    Malformed {
        /// The offending rule part.
        part: String,
    },

    /// The rule has no FREQ part.
    #[error("Recurrence rule has no FREQ part")]
    MissingFrequency,

    /// The rule uses a part the descriptor model does not support
    /// (e.g. BYMONTH, BYWEEKNO, or a sub-daily frequency).
    #[error("Unsupported recurrence rule part: {part}")]
    Unsupported {
        /// The unsupported key or frequency.
        part: String,
    },

    /// A rule part had a value outside its documented range.
    #[error("Invalid {field} value: {value}")]
    InvalidValue {
        /// The rule part the value belongs to.
        field: &'static str,
        /// The rejected value.
        value: String,
    },

    /// COUNT and UNTIL may not both be present.
    #[error("COUNT and UNTIL are mutually exclusive")]
    CountAndUntil,
}

/// Errors raised by the meeting–repayment alignment algorithm.
///
/// Parse failures and non-advancing computations are recovered inside the
/// algorithm; exceeding the defensive restart cap is the only condition
/// that propagates, since it indicates a malformed recurrence/interval
/// combination the retries cannot fix.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AlignmentError {
    /// The bounded restart budget was exhausted.
    #[error("Restart cap {cap} exceeded while aligning repayments to `{rule}`")]
    RestartCapExceeded {
        /// The recurrence rule being aligned against.
        rule: String,
        /// The configured cap.
        cap: u32,
    },
}
