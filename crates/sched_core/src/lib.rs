//! # sched_core: Foundation for the Meeting Schedule Engine
//!
//! ## Layer Role
//!
//! sched_core is the bottom layer of the workspace, providing:
//! - Time types: `Date`, `DateWindow` (`types::time`)
//! - Error types: `DateError` (`types::error`)
//! - Working-day policies: `WorkingDayPolicy`, `RescheduleType`,
//!   `WorkingWeek` (`policy`)
//!
//! ## Zero Dependency Principle
//!
//! This layer has no dependencies on other sched_* crates, with minimal
//! external dependencies:
//! - chrono: Date arithmetic
//! - thiserror: Error derivation
//! - serde: Serialisation support (optional)
//!
//! ## Usage Examples
//!
//! ```rust
//! use sched_core::types::{Date, DateWindow};
//! use sched_core::policy::{RescheduleType, WorkingDayPolicy, WorkingWeek};
//! use chrono::Weekday;
//!
//! // Date operations
//! let seed = Date::from_ymd(2024, 1, 31).unwrap();
//! assert_eq!(seed.plus_months(1).day(), 29); // 2024 is a leap year
//!
//! // Half-open windows
//! let window = DateWindow::new(seed, seed.plus_days(1));
//! assert!(window.contains(seed));
//!
//! // Working-day policy
//! let sundays_off = WorkingWeek::new(RescheduleType::MoveToNextWorkingDay)
//!     .non_working_weekday(Weekday::Sun);
//! let sunday = Date::from_ymd(2024, 1, 7).unwrap();
//! assert_eq!(sundays_off.offset_if_non_working(sunday, None), sunday.plus_days(1));
//! ```
//!
//! ## Feature Flags
//!
//! - `serde` (default): Enable serialisation for `Date`, `DateWindow`,
//!   `RescheduleType`

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![deny(rustdoc::private_intra_doc_links)]

pub mod policy;
pub mod types;

pub use policy::{RescheduleType, WorkingDayPolicy, WorkingWeek};
pub use types::{Date, DateError, DateWindow};

#[cfg(test)]
mod tests {
    #[test]
    fn it_works() {
        assert_eq!(2 + 2, 4);
    }
}
