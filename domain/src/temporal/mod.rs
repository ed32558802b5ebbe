//! Temporal reasoning: date extraction, deadline classification, timeline
//! partitioning and temporal-consistency validation.
//!
//! Everything here is pure computation over caller-supplied dates. The
//! "current date" is always an explicit parameter so callers decide whether
//! it comes from the system clock or a request-scoped reference date; it is
//! never taken from model output.

mod dates;
mod deadline;
mod timeline;
mod validator;

pub use dates::{extract_dates, parse_flexible_date, ExtractedDate};
pub use deadline::{DeadlineInfo, DeadlineStatus, Urgency};
pub use timeline::{Timeline, TimelineEvent};
pub use validator::{validate_temporal_consistency, ValidationResult};
