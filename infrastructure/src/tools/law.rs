//! Law lookup tool handlers: case-law search, regulation text and
//! citation verification.
//!
//! These are the billed network tools. Handlers return the output string
//! plus an optional TTL override so the dispatcher can cache "not found"
//! results for the shorter window. Coverage improves over time, so absence
//! must be re-checked sooner than presence.

use chrono::NaiveDate;
use lexora_application::ports::law::{CaseLawSearchPort, DateRange, LawSourceError};
use lexora_domain::{resolve_citation, CitationVerification, ToolCall, ToolError};
use std::time::Duration;
use tracing::debug;

/// TTL for successful case-law search results. Legal holdings are static.
pub const CASE_LAW_TTL: Duration = Duration::from_secs(30 * 24 * 60 * 60);

/// TTL for empty search results, shorter since coverage may improve.
pub const NOT_FOUND_TTL: Duration = Duration::from_secs(7 * 24 * 60 * 60);

/// TTL for verified citations.
pub const CITATION_TTL: Duration = Duration::from_secs(30 * 24 * 60 * 60);

/// TTL for unverified citations.
pub const CITATION_UNVERIFIED_TTL: Duration = Duration::from_secs(7 * 24 * 60 * 60);

/// Handler output: the model-facing text plus an optional TTL override.
#[derive(Debug)]
pub(crate) struct LawToolOutput {
    pub output: String,
    pub ttl_override: Option<Duration>,
}

impl LawToolOutput {
    fn new(output: String) -> Self {
        Self {
            output,
            ttl_override: None,
        }
    }

    fn with_ttl(output: String, ttl: Duration) -> Self {
        Self {
            output,
            ttl_override: Some(ttl),
        }
    }
}

fn map_source_error(e: LawSourceError) -> ToolError {
    match e {
        LawSourceError::Timeout => ToolError::timeout("law source request"),
        LawSourceError::NotFound(what) => ToolError::not_found(what),
        LawSourceError::Http(msg) => ToolError::execution_failed(msg),
        LawSourceError::Decode(msg) => {
            ToolError::execution_failed(format!("malformed response: {msg}"))
        }
    }
}

fn parse_range(call: &ToolCall) -> DateRange {
    let parse = |key: &str| {
        call.get_string(key)
            .and_then(|s| NaiveDate::parse_from_str(s, "%Y-%m-%d").ok())
    };
    DateRange {
        from: parse("date_from"),
        to: parse("date_to"),
    }
}

/// `search_case_law`: query the opinion database.
pub(crate) async fn execute_search_case_law(
    port: &dyn CaseLawSearchPort,
    call: &ToolCall,
) -> Result<LawToolOutput, ToolError> {
    let query = call.require_string("query").map_err(ToolError::invalid_argument)?;
    let jurisdiction = call.get_string("jurisdiction").unwrap_or("");
    let range = parse_range(call);

    let opinions = port
        .search_opinions(query, jurisdiction, range)
        .await
        .map_err(map_source_error)?;

    debug!(query, count = opinions.len(), "Case-law search complete");

    let output =
        serde_json::to_string(&opinions).map_err(|e| ToolError::execution_failed(e.to_string()))?;

    if opinions.is_empty() {
        Ok(LawToolOutput::with_ttl(output, NOT_FOUND_TTL))
    } else {
        Ok(LawToolOutput::new(output))
    }
}

/// `get_cfr_text`: fetch one regulation section.
pub(crate) async fn execute_get_cfr_text(
    port: &dyn lexora_application::ports::law::RegulationPort,
    call: &ToolCall,
) -> Result<LawToolOutput, ToolError> {
    let title = call.require_string("title").map_err(ToolError::invalid_argument)?;
    let part = call.require_string("part").map_err(ToolError::invalid_argument)?;
    let section = call.require_string("section").map_err(ToolError::invalid_argument)?;

    let text = port
        .regulation_text(title, part, section)
        .await
        .map_err(map_source_error)?;

    Ok(LawToolOutput::new(text))
}

/// `verify_citation`: resolve a citation to a specific opinion, or report
/// not-found. Never fabricates a match: an ambiguous bare citation biases
/// to not-found, and an unverified result carries no case name or URL.
pub(crate) async fn execute_verify_citation(
    port: &dyn CaseLawSearchPort,
    call: &ToolCall,
) -> Result<LawToolOutput, ToolError> {
    let citation = call
        .require_string("citation")
        .map_err(ToolError::invalid_argument)?;
    let case_name = call.get_string("case_name");

    // A case name sharpens the lookup considerably; prefer it.
    let query = match case_name {
        Some(name) => format!("{} {}", name, citation),
        None => citation.to_string(),
    };

    let opinions = port
        .search_opinions(&query, "", DateRange::default())
        .await
        .map_err(map_source_error)?;

    let verification = match resolve_citation(&opinions, citation, case_name) {
        Some(opinion) => CitationVerification::verified(citation, opinion),
        None if opinions.is_empty() => {
            CitationVerification::not_found(citation, "No opinions matched the citation")
        }
        None => CitationVerification::not_found(
            citation,
            "Candidates found, but none could be confirmed as this citation",
        ),
    };

    debug!(citation, found = verification.found, "Citation verification complete");

    let ttl = if verification.found {
        CITATION_TTL
    } else {
        CITATION_UNVERIFIED_TTL
    };
    let output = serde_json::to_string(&verification)
        .map_err(|e| ToolError::execution_failed(e.to_string()))?;

    Ok(LawToolOutput::with_ttl(output, ttl))
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use lexora_domain::tool::names;
    use lexora_domain::CaseOpinion;

    struct FakeCaseLaw {
        opinions: Vec<CaseOpinion>,
    }

    #[async_trait]
    impl CaseLawSearchPort for FakeCaseLaw {
        async fn search_opinions(
            &self,
            _query: &str,
            _jurisdiction: &str,
            _range: DateRange,
        ) -> Result<Vec<CaseOpinion>, LawSourceError> {
            Ok(self.opinions.clone())
        }
    }

    fn opinion(title: &str, citation: &str) -> CaseOpinion {
        CaseOpinion {
            title: title.to_string(),
            citation: citation.to_string(),
            court: "SCOTUS".to_string(),
            date: None,
            summary: "summary".to_string(),
            url: "https://example.org/case".to_string(),
        }
    }

    #[tokio::test]
    async fn test_search_empty_results_get_short_ttl() {
        let port = FakeCaseLaw { opinions: vec![] };
        let call = ToolCall::new(names::SEARCH_CASE_LAW).with_arg("query", "nothing");

        let out = execute_search_case_law(&port, &call).await.unwrap();
        assert_eq!(out.ttl_override, Some(NOT_FOUND_TTL));
        assert_eq!(out.output, "[]");
    }

    #[tokio::test]
    async fn test_search_results_use_default_ttl() {
        let port = FakeCaseLaw {
            opinions: vec![opinion("Roe v. Wade", "410 U.S. 113")],
        };
        let call = ToolCall::new(names::SEARCH_CASE_LAW).with_arg("query", "roe");

        let out = execute_search_case_law(&port, &call).await.unwrap();
        assert!(out.ttl_override.is_none());
        assert!(out.output.contains("Roe v. Wade"));
    }

    #[tokio::test]
    async fn test_verify_citation_found() {
        let port = FakeCaseLaw {
            opinions: vec![opinion("Roe v. Wade", "410 U.S. 113")],
        };
        let call = ToolCall::new(names::VERIFY_CITATION)
            .with_arg("citation", "410 U.S. 113")
            .with_arg("case_name", "Roe v. Wade");

        let out = execute_verify_citation(&port, &call).await.unwrap();
        let v: CitationVerification = serde_json::from_str(&out.output).unwrap();
        assert!(v.found);
        assert_eq!(v.case_name.as_deref(), Some("Roe v. Wade"));
        assert_eq!(out.ttl_override, Some(CITATION_TTL));
    }

    #[tokio::test]
    async fn test_verify_citation_never_guesses() {
        // The search surface returns an unrelated case; the verifier must
        // report not-found rather than adopt it.
        let port = FakeCaseLaw {
            opinions: vec![opinion("Unrelated v. Case", "999 F.2d 1")],
        };
        let call = ToolCall::new(names::VERIFY_CITATION).with_arg("citation", "410 U.S. 113");

        let out = execute_verify_citation(&port, &call).await.unwrap();
        let v: CitationVerification = serde_json::from_str(&out.output).unwrap();
        assert!(!v.found);
        assert!(v.case_name.is_none());
        assert!(v.url.is_none());
        assert_eq!(out.ttl_override, Some(CITATION_UNVERIFIED_TTL));
    }

    #[tokio::test]
    async fn test_verify_ambiguous_bare_citation_not_found() {
        let port = FakeCaseLaw {
            opinions: vec![
                opinion("Roe v. Wade", "410 U.S. 113"),
                opinion("Different Case", "410 U.S. 113"),
            ],
        };
        let call = ToolCall::new(names::VERIFY_CITATION).with_arg("citation", "410 U.S. 113");

        let out = execute_verify_citation(&port, &call).await.unwrap();
        let v: CitationVerification = serde_json::from_str(&out.output).unwrap();
        assert!(!v.found);
    }

    #[tokio::test]
    async fn test_missing_query_argument() {
        let port = FakeCaseLaw { opinions: vec![] };
        let call = ToolCall::new(names::SEARCH_CASE_LAW);
        let err = execute_search_case_law(&port, &call).await.unwrap_err();
        assert_eq!(err.code, "INVALID_ARGUMENT");
    }
}
