//! The fixed research tool surface: definitions, handlers and the cached
//! dispatcher that routes model-requested calls to them.

pub mod dispatcher;
pub mod law;
pub mod motion;
pub mod temporal;

pub use dispatcher::CachedToolDispatcher;

use lexora_domain::tool::names;
use lexora_domain::{CachePolicy, ToolDefinition, ToolParameter, ToolSpec};

/// Build the research tool registry.
///
/// Registered once at startup; read-only thereafter. Network-backed tools
/// carry their mandatory TTLs; pure-computation tools are uncached.
pub fn research_tool_spec() -> ToolSpec {
    ToolSpec::new()
        .register(
            ToolDefinition::new(
                names::SEARCH_CASE_LAW,
                "Search judicial opinions by query. Supports AND/OR/NOT and quoted \
                 phrases. Returns title, citation, court, date, summary and URL per \
                 opinion.",
                CachePolicy::days(30),
            )
            .with_parameter(ToolParameter::new("query", "Search query text", true))
            .with_parameter(ToolParameter::new(
                "jurisdiction",
                "Jurisdiction scope, e.g. 'federal' or a state name",
                false,
            ))
            .with_parameter(ToolParameter::new(
                "date_from",
                "Earliest decision date (YYYY-MM-DD)",
                false,
            ))
            .with_parameter(ToolParameter::new(
                "date_to",
                "Latest decision date (YYYY-MM-DD)",
                false,
            )),
        )
        .register(
            ToolDefinition::new(
                names::GET_CFR_TEXT,
                "Fetch the text of a Code of Federal Regulations section.",
                CachePolicy::days(90),
            )
            .with_parameter(ToolParameter::new("title", "CFR title number", true))
            .with_parameter(ToolParameter::new("part", "CFR part number", true))
            .with_parameter(ToolParameter::new("section", "Section number within the part", true)),
        )
        .register(
            ToolDefinition::new(
                names::VERIFY_CITATION,
                "Verify that a citation resolves to a real, specific opinion. Supply \
                 the case name when known; bare citations that match multiple cases \
                 report not-found.",
                CachePolicy::days(30),
            )
            .with_parameter(ToolParameter::new(
                "citation",
                "Reporter citation, e.g. '410 U.S. 113'",
                true,
            ))
            .with_parameter(ToolParameter::new("case_name", "Case name, e.g. 'Roe v. Wade'", false)),
        )
        .register(ToolDefinition::new(
            names::GET_CURRENT_DATE,
            "Get today's date. Always use this instead of assuming a date.",
            CachePolicy::Uncached,
        ))
        .register(
            ToolDefinition::new(
                names::CHECK_DEADLINE_STATUS,
                "Classify a deadline as PASSED, TODAY or UPCOMING against the real \
                 current date, with urgency and the exact day delta. Use this for all \
                 deadline arithmetic.",
                CachePolicy::Uncached,
            )
            .with_parameter(ToolParameter::new("date", "The deadline date", true))
            .with_parameter(ToolParameter::new("event", "What the deadline is for", false)),
        )
        .register(
            ToolDefinition::new(
                names::VALIDATE_CASE_TIMELINE,
                "Partition case events into passed/today/upcoming and flag unparsable \
                 dates. Input is a JSON array of {name, date} objects.",
                CachePolicy::Uncached,
            )
            .with_parameter(
                ToolParameter::new("events", "Array of {name, date} objects", true)
                    .with_type("array"),
            ),
        )
        .register(
            ToolDefinition::new(
                names::GENERATE_CASE_TIMELINE,
                "Render a chronological case timeline in markdown from a JSON array \
                 of {name, date} objects.",
                CachePolicy::Uncached,
            )
            .with_parameter(
                ToolParameter::new("events", "Array of {name, date} objects", true)
                    .with_type("array"),
            ),
        )
        .register(
            ToolDefinition::new(
                names::GENERATE_MOTION_TEMPLATE,
                "Generate a boilerplate motion skeleton in markdown. Deterministic, \
                 no AI involvement.",
                CachePolicy::Uncached,
            )
            .with_parameter(ToolParameter::new(
                "motion_type",
                "continuance | dismissal | summary_judgment | compel_discovery | in_limine",
                true,
            ))
            .with_parameter(ToolParameter::new("court", "Court caption", false))
            .with_parameter(ToolParameter::new("case_number", "Docket number", false))
            .with_parameter(ToolParameter::new("plaintiff", "Plaintiff name", false))
            .with_parameter(ToolParameter::new("defendant", "Defendant name", false))
            .with_parameter(ToolParameter::new("movant", "Moving party", false))
            .with_parameter(
                ToolParameter::new("facts", "Supporting facts, one string each", false)
                    .with_type("array"),
            )
            .with_parameter(ToolParameter::new("hearing_date", "Requested hearing date", false)),
        )
}
