//! Temporal-consistency validation of model-produced answer text.
//!
//! The validator never rewrites the answer. It reports hard errors
//! (contradictions that must flag the response) and soft warnings
//! (concerns worth annotating) for the orchestrator to act on.

use super::dates::{extract_dates, parse_flexible_date};
use chrono::NaiveDate;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::OnceLock;

/// Characters of context inspected on each side of a mentioned date.
const CONTEXT_WINDOW: usize = 200;

/// Allowed drift, in days, between a stated "N days until" count and the
/// recomputed delta before a warning is raised.
const DAYS_UNTIL_TOLERANCE: i64 = 7;

/// Outcome of a validation pass.
///
/// `valid` is false exactly when `errors` is non-empty. An answer with any
/// error is never returned to the user unannotated.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValidationResult {
    pub valid: bool,
    pub errors: Vec<String>,
    pub warnings: Vec<String>,
}

impl Default for ValidationResult {
    fn default() -> Self {
        Self::ok()
    }
}

impl ValidationResult {
    pub fn ok() -> Self {
        Self {
            valid: true,
            errors: Vec::new(),
            warnings: Vec::new(),
        }
    }

    pub fn add_error(&mut self, message: impl Into<String>) {
        let message = message.into();
        if !self.errors.contains(&message) {
            self.errors.push(message);
        }
        self.valid = false;
    }

    pub fn add_warning(&mut self, message: impl Into<String>) {
        let message = message.into();
        if !self.warnings.contains(&message) {
            self.warnings.push(message);
        }
    }

    pub fn merge(&mut self, other: ValidationResult) {
        for e in other.errors {
            self.add_error(e);
        }
        for w in other.warnings {
            self.add_warning(w);
        }
    }

    pub fn has_issues(&self) -> bool {
        !self.errors.is_empty() || !self.warnings.is_empty()
    }
}

fn future_phrasing_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(
            r"(?i)prepare\s+for|days?\s+until|days?\s+remain|must\s+file.{0,60}\bby\b|upcoming|don't\s+forget|be\s+ready\s+for|remember\s+to\s+file|deadline\s+is\s+approaching",
        )
        .unwrap()
    })
}

fn days_until_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        // Captures the stated count and the date phrase that follows.
        Regex::new(r"(?i)\b(\d+)\s+days?\s+until\s+(?:the\s+)?([^.;\n]{1,80})").unwrap()
    })
}

/// Validate the temporal claims in `text` against `current_date`.
///
/// Checks performed:
///
/// 1. Every mentioned date earlier than `current_date` is scanned for
///    future-oriented phrasing within ±200 characters. A match is a hard
///    error: the model gave forward-looking advice about an event that has
///    already occurred.
/// 2. Every "N days until <date>" claim is recomputed. A past date with a
///    positive stated count is a hard error; a count off by more than
///    7 days is a warning.
pub fn validate_temporal_consistency(text: &str, current_date: NaiveDate) -> ValidationResult {
    let mut result = ValidationResult::ok();

    for mention in extract_dates(text) {
        if mention.date >= current_date {
            continue;
        }

        let window = context_window(text, mention.offset, mention.literal.len());
        if future_phrasing_re().is_match(window) {
            result.add_error(format!(
                "Forward-looking advice about '{}', which is in the past \
                 ({} days before {})",
                mention.literal,
                (current_date - mention.date).num_days(),
                current_date
            ));
        }
    }

    for caps in days_until_re().captures_iter(text) {
        let stated: i64 = match caps[1].parse() {
            Ok(n) => n,
            Err(_) => continue,
        };
        let tail = caps[2].trim();
        let Some(target) = date_in_phrase(tail) else {
            continue;
        };

        let actual = (target - current_date).num_days();
        if actual < 0 && stated > 0 {
            // The strongest possible temporal contradiction.
            result.add_error(format!(
                "Claims {} days until '{}', but that date passed {} days ago \
                 as of {}",
                stated,
                tail,
                -actual,
                current_date
            ));
        } else if (stated - actual).abs() > DAYS_UNTIL_TOLERANCE {
            result.add_warning(format!(
                "Claims {} days until '{}', but the actual delta from {} is {} days",
                stated, tail, current_date, actual
            ));
        }
    }

    result
}

/// The ±CONTEXT_WINDOW slice of `text` around a match, clamped to char
/// boundaries.
fn context_window(text: &str, offset: usize, match_len: usize) -> &str {
    let mut start = offset.saturating_sub(CONTEXT_WINDOW);
    let mut end = (offset + match_len + CONTEXT_WINDOW).min(text.len());
    while start > 0 && !text.is_char_boundary(start) {
        start -= 1;
    }
    while end < text.len() && !text.is_char_boundary(end) {
        end += 1;
    }
    &text[start..end]
}

/// First parsable date inside a short phrase captured after "days until".
fn date_in_phrase(phrase: &str) -> Option<NaiveDate> {
    if let Some(date) = parse_flexible_date(phrase) {
        return Some(date);
    }
    extract_dates(phrase).first().map(|d| d.date)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    #[test]
    fn test_clean_text_passes() {
        let result = validate_temporal_consistency(
            "The hearing on June 1, 2026 requires a brief filed 14 days in advance.",
            d(2025, 10, 1),
        );
        assert!(result.valid);
        assert!(!result.has_issues());
    }

    #[test]
    fn test_positive_days_until_past_date_is_hard_error() {
        let result =
            validate_temporal_consistency("129 days until February 2025", d(2025, 10, 1));
        assert!(!result.valid);
        // Both the window scan and the recomputation fire on this text.
        assert!(result.errors.iter().any(|e| e.contains("passed")));
    }

    #[test]
    fn test_preparation_advice_for_past_hearing_is_hard_error() {
        let result = validate_temporal_consistency(
            "You should prepare for the hearing scheduled on March 3, 2025 by \
             gathering exhibits.",
            d(2025, 10, 1),
        );
        assert!(!result.valid);
        assert!(result.errors[0].contains("March 3, 2025"));
    }

    #[test]
    fn test_past_date_without_future_phrasing_is_fine() {
        let result = validate_temporal_consistency(
            "The court decided the issue on March 3, 2025, rejecting the claim.",
            d(2025, 10, 1),
        );
        assert!(result.valid);
    }

    #[test]
    fn test_days_until_drift_is_warning() {
        // 2025-12-01 is 61 days out from 2025-10-01; claiming 100 is a drift.
        let result =
            validate_temporal_consistency("100 days until 2025-12-01.", d(2025, 10, 1));
        assert!(result.valid);
        assert_eq!(result.warnings.len(), 1);
        assert!(result.warnings[0].contains("61"));
    }

    #[test]
    fn test_days_until_within_tolerance() {
        // Actual delta 61; stated 58 is within the 7-day tolerance.
        let result =
            validate_temporal_consistency("58 days until 2025-12-01.", d(2025, 10, 1));
        assert!(result.valid);
        assert!(result.warnings.is_empty());
    }

    #[test]
    fn test_result_merge() {
        let mut a = ValidationResult::ok();
        a.add_warning("w1");
        let mut b = ValidationResult::ok();
        b.add_error("e1");
        a.merge(b);
        assert!(!a.valid);
        assert_eq!(a.errors, vec!["e1"]);
        assert_eq!(a.warnings, vec!["w1"]);
    }
}
