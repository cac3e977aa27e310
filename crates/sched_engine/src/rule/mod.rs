//! Recurrence rule descriptors.
//!
//! This module provides:
//! - [`Frequency`]: The four supported recurrence frequencies
//! - [`Recurrence`]: The parsed, canonical form of an RFC 5545 style rule
//! - [`RecurrenceBuilder`]: Builder for constructing and rebuilding
//!   descriptors without mutating the source
//! - [`ByDay`] / [`NthDay`]: Weekday entries and "nth weekday of month"
//!   selector kinds
//! - [`same_frequency`] / [`same_interval`]: Rule-text comparators
//! - A human-readable sentence formatter ([`Recurrence::describe`])
//!
//! # Examples
//!
//! ```
//! use sched_engine::rule::{Frequency, Recurrence};
//!
//! let rule: Recurrence = "FREQ=WEEKLY;INTERVAL=2;BYDAY=MO".parse().unwrap();
//! assert_eq!(rule.frequency(), Frequency::Weekly);
//! assert_eq!(rule.interval(), 2);
//!
//! // Rebuild with a different interval; the source is untouched.
//! let four_weekly = rule.rebuild().interval(4).build().unwrap();
//! assert_eq!(four_weekly.interval(), 4);
//! assert_eq!(rule.interval(), 2);
//! ```

mod describe;
mod frequency;
mod recurrence;

pub use frequency::Frequency;
pub use recurrence::{same_frequency, same_interval, ByDay, NthDay, Recurrence, RecurrenceBuilder};
