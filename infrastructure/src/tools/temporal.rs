//! Temporal tool handlers: current date, deadline status, timeline
//! validation and rendering.
//!
//! All handlers are pure computation over the supplied reference date.
//! The dispatcher passes the real system clock (or the request's
//! effective date); a model-supplied "today" is never trusted.

use chrono::{Datelike, NaiveDate};
use lexora_domain::tool::names;
use lexora_domain::{
    parse_flexible_date, DeadlineInfo, Timeline, TimelineEvent, ToolCall, ToolError, ToolResult,
};

/// `get_current_date`: the reference date plus its weekday.
pub fn execute_get_current_date(now: NaiveDate) -> ToolResult {
    let output = serde_json::json!({
        "date": now.to_string(),
        "day_of_week": now.weekday().to_string(),
        "year": now.year(),
    });
    ToolResult::success(names::GET_CURRENT_DATE, output.to_string())
}

/// `check_deadline_status`: classify one deadline against the reference
/// date. The advisory text steers the model away from preparation advice
/// for passed events.
pub fn execute_check_deadline_status(call: &ToolCall, now: NaiveDate) -> ToolResult {
    let date_str = match call.require_string("date") {
        Ok(d) => d,
        Err(e) => {
            return ToolResult::failure(
                names::CHECK_DEADLINE_STATUS,
                ToolError::invalid_argument(e),
            )
        }
    };
    let event = call.get_string("event").unwrap_or("Deadline");

    let Some(date) = parse_flexible_date(date_str) else {
        return ToolResult::failure(
            names::CHECK_DEADLINE_STATUS,
            ToolError::invalid_argument(format!("Unparsable date: '{}'", date_str)),
        );
    };

    let info = DeadlineInfo::classify(event, date, now);
    let output = serde_json::json!({
        "event": info.event,
        "date": info.date.to_string(),
        "status": info.status.as_str(),
        "urgency": info.urgency.map(|u| u.as_str().to_string()),
        "days_until": info.days_until,
        "advisory": info.advisory(),
    });

    ToolResult::success(names::CHECK_DEADLINE_STATUS, output.to_string())
}

fn parse_events(call: &ToolCall) -> Result<Vec<TimelineEvent>, ToolError> {
    let raw = call
        .get_array("events")
        .ok_or_else(|| ToolError::invalid_argument("Missing required argument: events"))?;

    let mut events = Vec::with_capacity(raw.len());
    for item in raw {
        let name = item.get("name").and_then(|v| v.as_str());
        let date = item.get("date").and_then(|v| v.as_str());
        match (name, date) {
            (Some(name), Some(date)) => events.push(TimelineEvent::new(name, date)),
            _ => {
                return Err(ToolError::invalid_argument(format!(
                    "Each event needs 'name' and 'date' string fields, got: {}",
                    item
                )))
            }
        }
    }
    Ok(events)
}

/// `validate_case_timeline`: partition events against the reference date.
/// Unparsable dates come back as explicit errors in the output, never
/// silently dropped.
pub fn execute_validate_case_timeline(call: &ToolCall, now: NaiveDate) -> ToolResult {
    let events = match parse_events(call) {
        Ok(events) => events,
        Err(e) => return ToolResult::failure(names::VALIDATE_CASE_TIMELINE, e),
    };

    let timeline = Timeline::build(&events, now);
    match serde_json::to_string(&timeline) {
        Ok(output) => ToolResult::success(names::VALIDATE_CASE_TIMELINE, output),
        Err(e) => ToolResult::failure(
            names::VALIDATE_CASE_TIMELINE,
            ToolError::execution_failed(e.to_string()),
        ),
    }
}

/// `generate_case_timeline`: render the partitioned timeline as markdown.
pub fn execute_generate_case_timeline(call: &ToolCall, now: NaiveDate) -> ToolResult {
    let events = match parse_events(call) {
        Ok(events) => events,
        Err(e) => return ToolResult::failure(names::GENERATE_CASE_TIMELINE, e),
    };

    let timeline = Timeline::build(&events, now);
    let mut out = format!("# Case Timeline (as of {})\n\n", now);

    if !timeline.passed.is_empty() {
        out.push_str("## Passed\n\n");
        for info in &timeline.passed {
            out.push_str(&format!(
                "- {}: {} ({} days ago)\n",
                info.date,
                info.event,
                info.days_until.abs()
            ));
        }
        out.push('\n');
    }

    if !timeline.today.is_empty() {
        out.push_str("## Today\n\n");
        for info in &timeline.today {
            out.push_str(&format!("- {}: {} (TODAY)\n", info.date, info.event));
        }
        out.push('\n');
    }

    if !timeline.upcoming.is_empty() {
        out.push_str("## Upcoming\n\n");
        for info in &timeline.upcoming {
            let urgency = info.urgency.as_ref().map(|u| u.as_str()).unwrap_or("LOW");
            out.push_str(&format!(
                "- {}: {} (in {} days, {})\n",
                info.date, info.event, info.days_until, urgency
            ));
        }
        out.push('\n');
    }

    if !timeline.errors.is_empty() {
        out.push_str("## Errors\n\n");
        for error in &timeline.errors {
            out.push_str(&format!("- {}\n", error));
        }
    }

    ToolResult::success(names::GENERATE_CASE_TIMELINE, out)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    #[test]
    fn test_get_current_date() {
        let result = execute_get_current_date(d(2025, 6, 1));
        let value: serde_json::Value = serde_json::from_str(result.output().unwrap()).unwrap();
        assert_eq!(value["date"], "2025-06-01");
        assert_eq!(value["day_of_week"], "Sun");
    }

    #[test]
    fn test_check_deadline_passed() {
        let call = ToolCall::new(names::CHECK_DEADLINE_STATUS)
            .with_arg("date", "2024-01-01")
            .with_arg("event", "Discovery Cutoff");
        let result = execute_check_deadline_status(&call, d(2025, 6, 1));

        let value: serde_json::Value = serde_json::from_str(result.output().unwrap()).unwrap();
        assert_eq!(value["status"], "PASSED");
        assert_eq!(value["days_until"], -517);
        assert!(value["urgency"].is_null());
        assert!(value["advisory"]
            .as_str()
            .unwrap()
            .contains("Do NOT give preparation advice"));
    }

    #[test]
    fn test_check_deadline_unparsable_date() {
        let call = ToolCall::new(names::CHECK_DEADLINE_STATUS).with_arg("date", "whenever");
        let result = execute_check_deadline_status(&call, d(2025, 6, 1));
        assert!(!result.is_success());
        assert_eq!(result.error().unwrap().code, "INVALID_ARGUMENT");
    }

    #[test]
    fn test_validate_timeline_partitions() {
        let call = ToolCall::new(names::VALIDATE_CASE_TIMELINE).with_arg(
            "events",
            serde_json::json!([
                { "name": "Motion Hearing", "date": "2025-07-01" },
                { "name": "Filing Deadline", "date": "2025-05-01" }
            ]),
        );
        let result = execute_validate_case_timeline(&call, d(2025, 6, 1));

        let value: serde_json::Value = serde_json::from_str(result.output().unwrap()).unwrap();
        assert_eq!(value["upcoming"].as_array().unwrap().len(), 1);
        assert_eq!(value["upcoming"][0]["event"], "Motion Hearing");
        assert_eq!(value["passed"].as_array().unwrap().len(), 1);
        assert!(value["errors"].as_array().unwrap().is_empty());
    }

    #[test]
    fn test_validate_timeline_reports_bad_dates() {
        let call = ToolCall::new(names::VALIDATE_CASE_TIMELINE).with_arg(
            "events",
            serde_json::json!([{ "name": "Hearing", "date": "sometime" }]),
        );
        let result = execute_validate_case_timeline(&call, d(2025, 6, 1));

        let value: serde_json::Value = serde_json::from_str(result.output().unwrap()).unwrap();
        assert_eq!(value["errors"].as_array().unwrap().len(), 1);
        assert!(value["errors"][0].as_str().unwrap().contains("sometime"));
    }

    #[test]
    fn test_generate_timeline_markdown() {
        let call = ToolCall::new(names::GENERATE_CASE_TIMELINE).with_arg(
            "events",
            serde_json::json!([
                { "name": "Filing Deadline", "date": "2025-05-01" },
                { "name": "Motion Hearing", "date": "2025-07-01" }
            ]),
        );
        let result = execute_generate_case_timeline(&call, d(2025, 6, 1));
        let text = result.output().unwrap();

        assert!(text.contains("## Passed"));
        assert!(text.contains("## Upcoming"));
        assert!(text.contains("Motion Hearing"));
        assert!(text.contains("in 30 days"));
    }

    #[test]
    fn test_events_missing_fields() {
        let call = ToolCall::new(names::VALIDATE_CASE_TIMELINE)
            .with_arg("events", serde_json::json!([{ "name": "no date" }]));
        let result = execute_validate_case_timeline(&call, d(2025, 6, 1));
        assert!(!result.is_success());
    }
}
