//! Canonical names of the fixed tool surface exposed to the model.

pub const SEARCH_CASE_LAW: &str = "search_case_law";
pub const GET_CFR_TEXT: &str = "get_cfr_text";
pub const VERIFY_CITATION: &str = "verify_citation";
pub const GET_CURRENT_DATE: &str = "get_current_date";
pub const CHECK_DEADLINE_STATUS: &str = "check_deadline_status";
pub const VALIDATE_CASE_TIMELINE: &str = "validate_case_timeline";
pub const GENERATE_CASE_TIMELINE: &str = "generate_case_timeline";
pub const GENERATE_MOTION_TEMPLATE: &str = "generate_motion_template";

/// All canonical tool names, in registration order.
pub const ALL: [&str; 8] = [
    SEARCH_CASE_LAW,
    GET_CFR_TEXT,
    VERIFY_CITATION,
    GET_CURRENT_DATE,
    CHECK_DEADLINE_STATUS,
    VALIDATE_CASE_TIMELINE,
    GENERATE_CASE_TIMELINE,
    GENERATE_MOTION_TEMPLATE,
];
