//! Cached tool dispatcher.
//!
//! Implements [`ToolExecutorPort`]: routes model-requested calls to the
//! handler for each tool, with the result cache in front of the
//! network-backed ones. Dispatch goes through an enum built at startup;
//! there is no string-switch fallthrough; unknown names hit one explicit
//! error path.
//!
//! Failure containment: every handler error becomes an error result fed
//! back to the model. A bad tool call never aborts a research session.

use crate::tools::law::{
    execute_get_cfr_text, execute_search_case_law, execute_verify_citation, LawToolOutput,
};
use crate::tools::motion::execute_generate_motion_template;
use crate::tools::temporal::{
    execute_check_deadline_status, execute_generate_case_timeline, execute_get_current_date,
    execute_validate_case_timeline,
};
use async_trait::async_trait;
use chrono::{NaiveDate, Utc};
use lexora_application::ports::cache::ResultCache;
use lexora_application::ports::law::{CaseLawSearchPort, RegulationPort};
use lexora_application::ports::tool_executor::ToolExecutorPort;
use lexora_domain::tool::names;
use lexora_domain::{ToolCall, ToolError, ToolResult, ToolSpec};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};

/// The fixed set of dispatchable tools.
///
/// Adding a tool means adding a variant; the compiler then points at every
/// match that needs extending.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ToolKind {
    SearchCaseLaw,
    GetCfrText,
    VerifyCitation,
    GetCurrentDate,
    CheckDeadlineStatus,
    ValidateCaseTimeline,
    GenerateCaseTimeline,
    GenerateMotionTemplate,
}

impl ToolKind {
    fn from_name(name: &str) -> Option<Self> {
        match name {
            names::SEARCH_CASE_LAW => Some(ToolKind::SearchCaseLaw),
            names::GET_CFR_TEXT => Some(ToolKind::GetCfrText),
            names::VERIFY_CITATION => Some(ToolKind::VerifyCitation),
            names::GET_CURRENT_DATE => Some(ToolKind::GetCurrentDate),
            names::CHECK_DEADLINE_STATUS => Some(ToolKind::CheckDeadlineStatus),
            names::VALIDATE_CASE_TIMELINE => Some(ToolKind::ValidateCaseTimeline),
            names::GENERATE_CASE_TIMELINE => Some(ToolKind::GenerateCaseTimeline),
            names::GENERATE_MOTION_TEMPLATE => Some(ToolKind::GenerateMotionTemplate),
            _ => None,
        }
    }
}

/// Tool dispatcher with caching and failure containment.
pub struct CachedToolDispatcher {
    spec: ToolSpec,
    cache: Arc<dyn ResultCache>,
    case_law: Arc<dyn CaseLawSearchPort>,
    regulation: Arc<dyn RegulationPort>,
    /// Fixed reference date for temporal tools; the system clock when
    /// absent. Set from the request's effective date, never from the model.
    reference_date: Option<NaiveDate>,
}

impl CachedToolDispatcher {
    pub fn new(
        cache: Arc<dyn ResultCache>,
        case_law: Arc<dyn CaseLawSearchPort>,
        regulation: Arc<dyn RegulationPort>,
    ) -> Self {
        Self {
            spec: crate::tools::research_tool_spec(),
            cache,
            case_law,
            regulation,
            reference_date: None,
        }
    }

    /// Pin the reference date used by the temporal tools.
    pub fn with_reference_date(mut self, date: NaiveDate) -> Self {
        self.reference_date = Some(date);
        self
    }

    /// Swap the tool registry (e.g. a trimmed surface for restricted
    /// sessions).
    pub fn with_tool_spec(mut self, spec: ToolSpec) -> Self {
        self.spec = spec;
        self
    }

    fn now(&self) -> NaiveDate {
        self.reference_date
            .unwrap_or_else(|| Utc::now().date_naive())
    }

    /// Run one handler. Network handlers may override the cache TTL (e.g.
    /// the shorter not-found window).
    async fn run(&self, kind: ToolKind, call: &ToolCall) -> Result<LawToolOutput, ToolError> {
        let now = self.now();
        match kind {
            ToolKind::SearchCaseLaw => execute_search_case_law(self.case_law.as_ref(), call).await,
            ToolKind::GetCfrText => execute_get_cfr_text(self.regulation.as_ref(), call).await,
            ToolKind::VerifyCitation => {
                execute_verify_citation(self.case_law.as_ref(), call).await
            }
            ToolKind::GetCurrentDate => pure(execute_get_current_date(now)),
            ToolKind::CheckDeadlineStatus => pure(execute_check_deadline_status(call, now)),
            ToolKind::ValidateCaseTimeline => pure(execute_validate_case_timeline(call, now)),
            ToolKind::GenerateCaseTimeline => pure(execute_generate_case_timeline(call, now)),
            ToolKind::GenerateMotionTemplate => pure(execute_generate_motion_template(call)),
        }
    }

    fn required_params_present(&self, call: &ToolCall) -> Result<(), ToolError> {
        let Some(definition) = self.spec.get(&call.tool_name) else {
            return Ok(());
        };
        for param in &definition.parameters {
            if param.required && !call.arguments.contains_key(&param.name) {
                return Err(ToolError::invalid_argument(format!(
                    "Missing required parameter '{}' for tool '{}'",
                    param.name, definition.name
                )));
            }
        }
        Ok(())
    }

    fn canonical_params(call: &ToolCall) -> serde_json::Value {
        serde_json::to_value(&call.arguments).unwrap_or(serde_json::Value::Null)
    }
}

/// Adapt a pure handler's [`ToolResult`] to the dispatch result shape.
fn pure(result: ToolResult) -> Result<LawToolOutput, ToolError> {
    if result.is_success() {
        Ok(LawToolOutput {
            output: result.output.unwrap_or_default(),
            ttl_override: None,
        })
    } else {
        Err(result
            .error
            .unwrap_or_else(|| ToolError::execution_failed("handler failed without error")))
    }
}

#[async_trait]
impl ToolExecutorPort for CachedToolDispatcher {
    fn tool_spec(&self) -> &ToolSpec {
        &self.spec
    }

    async fn execute(&self, call: &ToolCall) -> ToolResult {
        // One explicit path for unknown names, checked at dispatch build
        // time by the enum.
        let Some(kind) = ToolKind::from_name(&call.tool_name) else {
            warn!(tool = %call.tool_name, "Unknown tool requested");
            return ToolResult::failure(
                &call.tool_name,
                ToolError::unknown_tool(&call.tool_name),
            );
        };

        if let Err(e) = self.required_params_present(call) {
            return ToolResult::failure(&call.tool_name, e);
        }

        let base_ttl: Option<Duration> = self
            .spec
            .get(&call.tool_name)
            .and_then(|d| d.cache_policy.ttl());
        let params = Self::canonical_params(call);

        // Cache check first; expired entries read as misses.
        if base_ttl.is_some()
            && let Some(cached) = self.cache.get(&call.tool_name, &params)
        {
            debug!(tool = %call.tool_name, "Serving tool result from cache");
            let output = cached.as_str().unwrap_or_default().to_string();
            return ToolResult::success(&call.tool_name, output).from_cache();
        }

        match self.run(kind, call).await {
            Ok(LawToolOutput {
                output,
                ttl_override,
            }) => {
                if let Some(base) = base_ttl {
                    let ttl = ttl_override.unwrap_or(base);
                    self.cache.put(
                        &call.tool_name,
                        &params,
                        serde_json::Value::String(output.clone()),
                        ttl,
                    );
                }
                ToolResult::success(&call.tool_name, output)
            }
            // Per-call containment: errors become results, never panics or
            // propagated failures.
            Err(e) => {
                debug!(tool = %call.tool_name, error = %e, "Tool execution failed");
                ToolResult::failure(&call.tool_name, e)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::TtlToolCache;
    use lexora_application::ports::law::{DateRange, LawSourceError};
    use lexora_domain::{CachePolicy, CaseOpinion, ToolDefinition, ToolParameter};
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct CountingCaseLaw {
        calls: AtomicUsize,
        opinions: Vec<CaseOpinion>,
    }

    impl CountingCaseLaw {
        fn new(opinions: Vec<CaseOpinion>) -> Self {
            Self {
                calls: AtomicUsize::new(0),
                opinions,
            }
        }
    }

    #[async_trait]
    impl CaseLawSearchPort for CountingCaseLaw {
        async fn search_opinions(
            &self,
            _query: &str,
            _jurisdiction: &str,
            _range: DateRange,
        ) -> Result<Vec<CaseOpinion>, LawSourceError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(self.opinions.clone())
        }
    }

    struct FailingRegulation;

    #[async_trait]
    impl RegulationPort for FailingRegulation {
        async fn regulation_text(
            &self,
            _title: &str,
            _part: &str,
            _section: &str,
        ) -> Result<String, LawSourceError> {
            Err(LawSourceError::Http("503 from upstream".to_string()))
        }
    }

    struct StaticRegulation;

    #[async_trait]
    impl RegulationPort for StaticRegulation {
        async fn regulation_text(
            &self,
            title: &str,
            part: &str,
            section: &str,
        ) -> Result<String, LawSourceError> {
            Ok(format!("{} CFR {}.{}: text of the regulation", title, part, section))
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

    fn dispatcher(
        case_law: Arc<CountingCaseLaw>,
        cache: Arc<TtlToolCache>,
    ) -> CachedToolDispatcher {
        CachedToolDispatcher::new(cache, case_law, Arc::new(StaticRegulation))
            .with_reference_date(NaiveDate::from_ymd_opt(2025, 6, 1).unwrap())
    }

    fn search_call() -> ToolCall {
        ToolCall::new(names::SEARCH_CASE_LAW)
            .with_arg("query", "breach of contract")
            .with_arg("jurisdiction", "federal")
    }

    #[tokio::test]
    async fn test_cache_determinism_second_call_hits_cache() {
        let case_law = Arc::new(CountingCaseLaw::new(vec![opinion("A v. B", "1 U.S. 1")]));
        let cache = Arc::new(TtlToolCache::new());
        let dispatcher = dispatcher(case_law.clone(), cache.clone());

        let first = dispatcher.execute(&search_call()).await;
        let second = dispatcher.execute(&search_call()).await;

        assert!(first.is_success());
        assert!(!first.cache_hit);
        assert!(second.cache_hit);
        // Byte-identical results within the TTL window.
        assert_eq!(first.output(), second.output());
        // The external capability ran exactly once.
        assert_eq!(case_law.calls.load(Ordering::SeqCst), 1);
        assert_eq!(cache.hit_count(), 1);
    }

    #[tokio::test]
    async fn test_cache_expiry_triggers_fresh_call() {
        let case_law = Arc::new(CountingCaseLaw::new(vec![opinion("A v. B", "1 U.S. 1")]));
        let cache = Arc::new(TtlToolCache::new());
        // Zero-TTL search definition: every entry is expired on next access.
        let spec = ToolSpec::new().register(
            ToolDefinition::new(
                names::SEARCH_CASE_LAW,
                "search",
                CachePolicy::Cached { ttl_secs: 0 },
            )
            .with_parameter(ToolParameter::new("query", "q", true)),
        );
        let dispatcher = CachedToolDispatcher::new(
            cache,
            case_law.clone(),
            Arc::new(StaticRegulation),
        )
        .with_tool_spec(spec);

        dispatcher.execute(&search_call()).await;
        let second = dispatcher.execute(&search_call()).await;

        assert!(!second.cache_hit);
        assert_eq!(case_law.calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_unknown_tool_returns_error_result() {
        let case_law = Arc::new(CountingCaseLaw::new(vec![]));
        let dispatcher = dispatcher(case_law, Arc::new(TtlToolCache::new()));

        let result = dispatcher.execute(&ToolCall::new("frobnicate")).await;
        assert!(!result.is_success());
        assert_eq!(result.error().unwrap().code, "UNKNOWN_TOOL");
    }

    #[tokio::test]
    async fn test_handler_failure_is_contained() {
        let case_law = Arc::new(CountingCaseLaw::new(vec![]));
        let dispatcher = CachedToolDispatcher::new(
            Arc::new(TtlToolCache::new()),
            case_law,
            Arc::new(FailingRegulation),
        );

        let call = ToolCall::new(names::GET_CFR_TEXT)
            .with_arg("title", "29")
            .with_arg("part", "1910")
            .with_arg("section", "132");
        let result = dispatcher.execute(&call).await;

        assert!(!result.is_success());
        assert!(result.feedback_text().contains("503"));
    }

    #[tokio::test]
    async fn test_failed_calls_are_not_cached() {
        let case_law = Arc::new(CountingCaseLaw::new(vec![]));
        let cache = Arc::new(TtlToolCache::new());
        let dispatcher = CachedToolDispatcher::new(
            cache.clone(),
            case_law,
            Arc::new(FailingRegulation),
        );

        let call = ToolCall::new(names::GET_CFR_TEXT)
            .with_arg("title", "29")
            .with_arg("part", "1910")
            .with_arg("section", "132");
        dispatcher.execute(&call).await;

        assert_eq!(cache.len(), 0);
    }

    #[tokio::test]
    async fn test_missing_required_parameter() {
        let case_law = Arc::new(CountingCaseLaw::new(vec![]));
        let dispatcher = dispatcher(case_law.clone(), Arc::new(TtlToolCache::new()));

        let result = dispatcher.execute(&ToolCall::new(names::SEARCH_CASE_LAW)).await;
        assert!(!result.is_success());
        assert_eq!(result.error().unwrap().code, "INVALID_ARGUMENT");
        // Rejected before reaching the external capability.
        assert_eq!(case_law.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_pure_tools_bypass_cache() {
        let case_law = Arc::new(CountingCaseLaw::new(vec![]));
        let cache = Arc::new(TtlToolCache::new());
        let dispatcher = dispatcher(case_law, cache.clone());

        let call = ToolCall::new(names::CHECK_DEADLINE_STATUS).with_arg("date", "2025-07-01");
        let result = dispatcher.execute(&call).await;

        assert!(result.is_success());
        assert_eq!(cache.len(), 0);
    }

    #[tokio::test]
    async fn test_deadline_tool_uses_reference_date() {
        let case_law = Arc::new(CountingCaseLaw::new(vec![]));
        let dispatcher = dispatcher(case_law, Arc::new(TtlToolCache::new()));

        let call = ToolCall::new(names::CHECK_DEADLINE_STATUS)
            .with_arg("date", "2024-01-01")
            .with_arg("event", "Discovery Cutoff");
        let result = dispatcher.execute(&call).await;

        let value: serde_json::Value =
            serde_json::from_str(result.output().unwrap()).unwrap();
        assert_eq!(value["status"], "PASSED");
        assert_eq!(value["days_until"], -517);
    }

    #[tokio::test]
    async fn test_not_found_search_cached_with_short_ttl() {
        // Empty results are cached (short TTL) and served as hits within
        // that window; absence is re-checked only after it lapses.
        let case_law = Arc::new(CountingCaseLaw::new(vec![]));
        let cache = Arc::new(TtlToolCache::new());
        let dispatcher = dispatcher(case_law.clone(), cache.clone());

        let first = dispatcher.execute(&search_call()).await;
        let second = dispatcher.execute(&search_call()).await;

        assert_eq!(first.output(), Some("[]"));
        assert!(second.cache_hit);
        assert_eq!(case_law.calls.load(Ordering::SeqCst), 1);
        assert_eq!(cache.len(), 1);
    }
}
