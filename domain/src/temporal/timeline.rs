//! Case timeline partitioning.

use super::dates::parse_flexible_date;
use super::deadline::{DeadlineInfo, DeadlineStatus};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// A named event with its date still in string form, as supplied by the
/// caller (typically the model).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TimelineEvent {
    pub name: String,
    pub date: String,
}

impl TimelineEvent {
    pub fn new(name: impl Into<String>, date: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            date: date.into(),
        }
    }
}

/// Events partitioned by their position relative to the reference date.
///
/// Unparsable date strings land in `errors`: they are reported, never
/// silently dropped.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Timeline {
    pub passed: Vec<DeadlineInfo>,
    pub today: Vec<DeadlineInfo>,
    /// Sorted ascending by day-delta: the nearest event first.
    pub upcoming: Vec<DeadlineInfo>,
    pub errors: Vec<String>,
}

impl Timeline {
    /// Partition events into passed / today / upcoming against `now`.
    pub fn build(events: &[TimelineEvent], now: NaiveDate) -> Self {
        let mut timeline = Timeline::default();

        for event in events {
            match parse_flexible_date(&event.date) {
                Some(date) => {
                    let info = DeadlineInfo::classify(&event.name, date, now);
                    match info.status {
                        DeadlineStatus::Passed => timeline.passed.push(info),
                        DeadlineStatus::Today => timeline.today.push(info),
                        DeadlineStatus::Upcoming => timeline.upcoming.push(info),
                    }
                }
                None => timeline.errors.push(format!(
                    "Unparsable date '{}' for event '{}'",
                    event.date, event.name
                )),
            }
        }

        timeline.upcoming.sort_by_key(|e| e.days_until);
        timeline
    }

    pub fn event_count(&self) -> usize {
        self.passed.len() + self.today.len() + self.upcoming.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    #[test]
    fn test_partition() {
        let events = vec![
            TimelineEvent::new("Motion Hearing", "2025-07-01"),
            TimelineEvent::new("Filing Deadline", "2025-05-01"),
        ];
        let timeline = Timeline::build(&events, d(2025, 6, 1));

        assert_eq!(timeline.upcoming.len(), 1);
        assert_eq!(timeline.upcoming[0].event, "Motion Hearing");
        assert_eq!(timeline.passed.len(), 1);
        assert_eq!(timeline.passed[0].event, "Filing Deadline");
        assert!(timeline.today.is_empty());
        assert!(timeline.errors.is_empty());
    }

    #[test]
    fn test_upcoming_sorted_by_delta() {
        let events = vec![
            TimelineEvent::new("Far", "2025-09-01"),
            TimelineEvent::new("Near", "2025-06-10"),
            TimelineEvent::new("Mid", "2025-07-15"),
        ];
        let timeline = Timeline::build(&events, d(2025, 6, 1));
        let order: Vec<_> = timeline.upcoming.iter().map(|e| e.event.as_str()).collect();
        assert_eq!(order, vec!["Near", "Mid", "Far"]);
    }

    #[test]
    fn test_unparsable_dates_become_errors() {
        let events = vec![
            TimelineEvent::new("Hearing", "sometime soon"),
            TimelineEvent::new("Deadline", "2025-07-01"),
        ];
        let timeline = Timeline::build(&events, d(2025, 6, 1));

        assert_eq!(timeline.event_count(), 1);
        assert_eq!(timeline.errors.len(), 1);
        assert!(timeline.errors[0].contains("sometime soon"));
        assert!(timeline.errors[0].contains("Hearing"));
    }

    #[test]
    fn test_mixed_date_spellings() {
        let events = vec![
            TimelineEvent::new("A", "June 3, 2025"),
            TimelineEvent::new("B", "6/1/2025"),
        ];
        let timeline = Timeline::build(&events, d(2025, 6, 1));
        assert_eq!(timeline.upcoming.len(), 1);
        assert_eq!(timeline.today.len(), 1);
    }
}
