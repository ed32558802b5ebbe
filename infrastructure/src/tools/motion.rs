//! Motion template tool handler.

use lexora_domain::tool::names;
use lexora_domain::{render_motion, CaseFacts, MotionType, ToolCall, ToolError, ToolResult};

/// `generate_motion_template`: deterministic markdown skeleton from motion
/// type and case facts.
pub fn execute_generate_motion_template(call: &ToolCall) -> ToolResult {
    let motion_type = match call.require_string("motion_type") {
        Ok(t) => MotionType::parse(t),
        Err(e) => {
            return ToolResult::failure(
                names::GENERATE_MOTION_TEMPLATE,
                ToolError::invalid_argument(e),
            )
        }
    };

    let facts = CaseFacts {
        court: call.get_string("court").unwrap_or_default().to_string(),
        case_number: call.get_string("case_number").unwrap_or_default().to_string(),
        plaintiff: call.get_string("plaintiff").unwrap_or_default().to_string(),
        defendant: call.get_string("defendant").unwrap_or_default().to_string(),
        movant: call.get_string("movant").unwrap_or_default().to_string(),
        facts: call
            .get_array("facts")
            .map(|items| {
                items
                    .iter()
                    .filter_map(|v| v.as_str().map(String::from))
                    .collect()
            })
            .unwrap_or_default(),
        hearing_date: call.get_string("hearing_date").map(String::from),
    };

    ToolResult::success(
        names::GENERATE_MOTION_TEMPLATE,
        render_motion(motion_type, &facts),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generate_motion_template() {
        let call = ToolCall::new(names::GENERATE_MOTION_TEMPLATE)
            .with_arg("motion_type", "continuance")
            .with_arg("court", "Superior Court of California")
            .with_arg("case_number", "23-CV-00123")
            .with_arg("plaintiff", "Acme Corp.")
            .with_arg("defendant", "Jane Smith")
            .with_arg("movant", "Defendant")
            .with_arg("facts", serde_json::json!(["Trial is set for June 2026."]));

        let result = execute_generate_motion_template(&call);
        let text = result.output().unwrap();
        assert!(text.contains("MOTION FOR CONTINUANCE"));
        assert!(text.contains("23-CV-00123"));
        assert!(text.contains("Trial is set for June 2026."));
    }

    #[test]
    fn test_missing_motion_type() {
        let call = ToolCall::new(names::GENERATE_MOTION_TEMPLATE);
        let result = execute_generate_motion_template(&call);
        assert!(!result.is_success());
        assert_eq!(result.error().unwrap().code, "INVALID_ARGUMENT");
    }

    #[test]
    fn test_unknown_type_falls_back_to_generic() {
        let call = ToolCall::new(names::GENERATE_MOTION_TEMPLATE)
            .with_arg("motion_type", "motion for sanctions");
        let result = execute_generate_motion_template(&call);
        assert!(result.is_success());
        assert!(result.output().unwrap().starts_with("# MOTION"));
    }
}
