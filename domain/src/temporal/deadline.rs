//! Deadline classification against a reference date.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Where an event sits relative to "now".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum DeadlineStatus {
    /// The date is strictly before the reference date.
    Passed,
    /// The date equals the reference date.
    Today,
    /// The date is strictly after the reference date.
    Upcoming,
}

impl DeadlineStatus {
    pub fn as_str(&self) -> &str {
        match self {
            DeadlineStatus::Passed => "PASSED",
            DeadlineStatus::Today => "TODAY",
            DeadlineStatus::Upcoming => "UPCOMING",
        }
    }
}

impl std::fmt::Display for DeadlineStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// How soon an upcoming event needs attention.
///
/// Only meaningful for [`DeadlineStatus::Upcoming`] events.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Urgency {
    /// Under 48 hours away.
    Critical,
    /// Under one week away.
    High,
    /// Under one month away.
    Medium,
    /// A month or more away.
    Low,
}

impl Urgency {
    fn from_days_until(days: i64) -> Self {
        if days < 2 {
            Urgency::Critical
        } else if days < 7 {
            Urgency::High
        } else if days < 30 {
            Urgency::Medium
        } else {
            Urgency::Low
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Urgency::Critical => "CRITICAL",
            Urgency::High => "HIGH",
            Urgency::Medium => "MEDIUM",
            Urgency::Low => "LOW",
        }
    }
}

/// A classified deadline: event, date, status, urgency and signed day-delta.
///
/// The delta is `date - now` in days: negative for passed events, zero for
/// today, positive for upcoming ones.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeadlineInfo {
    pub event: String,
    pub date: NaiveDate,
    pub status: DeadlineStatus,
    /// Set only for upcoming events.
    pub urgency: Option<Urgency>,
    pub days_until: i64,
}

impl DeadlineInfo {
    /// Classify an event date against the reference date.
    pub fn classify(event: impl Into<String>, date: NaiveDate, now: NaiveDate) -> Self {
        let days_until = (date - now).num_days();
        let status = match days_until {
            d if d < 0 => DeadlineStatus::Passed,
            0 => DeadlineStatus::Today,
            _ => DeadlineStatus::Upcoming,
        };
        let urgency = match status {
            DeadlineStatus::Upcoming => Some(Urgency::from_days_until(days_until)),
            _ => None,
        };

        Self {
            event: event.into(),
            date,
            status,
            urgency,
            days_until,
        }
    }

    /// Advisory text for the model that requested the classification.
    ///
    /// For passed events the text must steer the model away from
    /// preparation advice: only post-event remedies or a request for the
    /// actual outcome are appropriate.
    pub fn advisory(&self) -> String {
        match self.status {
            DeadlineStatus::Passed => format!(
                "{} ({}) is PASSED: it occurred {} days ago. Do NOT give preparation advice \
                 for this event. Advise only on post-event remedies (motions for relief, \
                 appeals, extensions nunc pro tunc) or ask what the actual outcome was.",
                self.event,
                self.date,
                self.days_until.abs()
            ),
            DeadlineStatus::Today => format!(
                "{} ({}) is TODAY. Any required action must happen immediately.",
                self.event, self.date
            ),
            DeadlineStatus::Upcoming => format!(
                "{} ({}) is UPCOMING in {} days (urgency: {}).",
                self.event,
                self.date,
                self.days_until,
                self.urgency.as_ref().map(|u| u.as_str()).unwrap_or("LOW")
            ),
        }
    }
}
