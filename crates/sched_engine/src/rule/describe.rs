//! Human-readable rendering of recurrence descriptors.

use chrono::Weekday;

use sched_core::types::Date;

use super::frequency::Frequency;
use super::recurrence::{NthDay, Recurrence};

impl Recurrence {
    /// Renders the rule as a human sentence, e.g.
    /// `"Every 2 weeks on Monday, 10 times"` or
    /// `"Monthly on third Monday, until 12 Dec 24"`.
    ///
    /// `start` anchors the wording for rules that repeat on their start
    /// date's day ("Monthly on day 15", "Annually on Mar 15").
    ///
    /// # Examples
    ///
    /// ```
    /// use sched_core::types::Date;
    /// use sched_engine::rule::Recurrence;
    ///
    /// let rule: Recurrence = "FREQ=WEEKLY;INTERVAL=2;BYDAY=MO;COUNT=10".parse().unwrap();
    /// let start = Date::from_ymd(2024, 1, 1).unwrap();
    /// assert_eq!(rule.describe(start), "Every 2 weeks on Monday, 10 times");
    /// ```
    pub fn describe(&self, start: Date) -> String {
        let mut sentence = match self.frequency() {
            Frequency::Daily => {
                if self.interval() == 1 {
                    "Daily".to_string()
                } else {
                    format!("Every {} days", self.interval())
                }
            }
            Frequency::Weekly => {
                let mut s = if self.interval() == 1 {
                    "Weekly".to_string()
                } else {
                    format!("Every {} weeks", self.interval())
                };
                if !self.by_day().is_empty() {
                    let days: Vec<&str> =
                        self.by_day().iter().map(|bd| weekday_name(bd.weekday())).collect();
                    s.push_str(" on ");
                    s.push_str(&days.join(", "));
                }
                s
            }
            Frequency::Monthly => {
                let lead = if self.interval() == 1 {
                    "Monthly".to_string()
                } else {
                    format!("Every {} months", self.interval())
                };
                match (self.nth_day_of_month(), self.repeats_on_day()) {
                    (Some(nth), Some(weekday)) if nth != NthDay::OnDay => {
                        format!("{} on {} {}", lead, nth.name(), weekday_name(weekday))
                    }
                    _ => match self.month_on_day() {
                        Some(-1) => format!("{} on last day", lead),
                        Some(day) => format!("{} on day {}", lead, day),
                        None => format!("{} on day {}", lead, start.day()),
                    },
                }
            }
            Frequency::Yearly => {
                let anchor = format!("{} {}", start.into_inner().format("%b"), start.day());
                if self.interval() == 1 {
                    format!("Annually on {}", anchor)
                } else {
                    format!("Every {} years on {}", self.interval(), anchor)
                }
            }
        };

        if let Some(count) = self.count() {
            if count == 1 {
                sentence = "Once".to_string();
            } else {
                sentence.push_str(&format!(", {} times", count));
            }
        }
        if let Some(until) = self.until() {
            sentence.push_str(&format!(", until {}", until.into_inner().format("%-d %b %y")));
        }
        sentence
    }
}

pub(crate) fn weekday_name(weekday: Weekday) -> &'static str {
    match weekday {
        Weekday::Mon => "Monday",
        Weekday::Tue => "Tuesday",
        Weekday::Wed => "Wednesday",
        Weekday::Thu => "Thursday",
        Weekday::Fri => "Friday",
        Weekday::Sat => "Saturday",
        Weekday::Sun => "Sunday",
    }
}
