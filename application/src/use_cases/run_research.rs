//! Run Research use case.
//!
//! The top-level driver owning one research session end to end:
//!
//! | Phase | Work |
//! |-------|------|
//! | Init → Searching | parse the query, run the initial opinion search |
//! | Searching → ToolLoop | only when gap analysis finds the evidence thin |
//! | ToolLoop | model ↔ tools, hard round cap enforced |
//! | (gap pass) | deeper autonomous searches when evidence is still thin |
//! | Validating | temporal validation + citation accounting |
//! | Done / Failed | structured result or structured failure |
//!
//! Hard validation errors never suppress the answer: the finding is
//! returned flagged for manual review. Legal research must never vanish
//! silently.

use crate::ports::completion::{CompletionGateway, CompletionSession, ToolResultMessage};
use crate::ports::progress::{
    NoProgress, ProgressEvent, ResearchProgressNotifier, StepType,
};
use crate::ports::tool_executor::ToolExecutorPort;
use crate::use_cases::deepen::DeepenResearchUseCase;
use crate::use_cases::shared::{check_cancelled, gateway_call, opinions_to_evidence, truncate};
use chrono::Utc;
use lexora_domain::tool::names;
use lexora_domain::{
    citation_matches, extract_citations, identify_gaps, needs_deeper_research,
    validate_temporal_consistency, CitationVerification, CitedAuthority, Confidence, Evidence,
    EvidenceSource, ParsedQuery, ResearchFinding, ResearchPhase, ResearchPromptTemplate,
    ResearchQuery, ToolCall, ToolResult, VerificationStatus,
};
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

/// Tunable parameters of a research session.
#[derive(Debug, Clone)]
pub struct ResearchConfig {
    /// Hard cap on tool-calling rounds per session. Unbounded loops are a
    /// defect, not a feature.
    pub max_tool_rounds: usize,
    /// Per-call timeout on the completion capability. Agentic sessions can
    /// legitimately run for minutes.
    pub completion_timeout: Duration,
    /// Cap on follow-up searches in the deeper-research pass.
    pub max_follow_up_searches: usize,
}

impl Default for ResearchConfig {
    fn default() -> Self {
        Self {
            max_tool_rounds: 10,
            completion_timeout: Duration::from_secs(600),
            max_follow_up_searches: 3,
        }
    }
}

/// Errors surfaced to the caller.
///
/// Distinguishes "no results" from "service unavailable": the former means
/// the research ran and found nothing usable, the latter that the
/// completion capability failed.
#[derive(Error, Debug)]
pub enum ResearchError {
    #[error("Research service unavailable: {0}")]
    ServiceUnavailable(String),

    #[error("No results found for the query")]
    NoResults,

    #[error("Operation cancelled")]
    Cancelled,
}

/// Input to one research session.
#[derive(Debug, Clone)]
pub struct RunResearchInput {
    pub query: ResearchQuery,
}

impl RunResearchInput {
    pub fn new(query: ResearchQuery) -> Self {
        Self { query }
    }
}

/// Output of a completed session.
#[derive(Debug, Clone)]
pub struct RunResearchOutput {
    pub finding: ResearchFinding,
    /// Tool-calling rounds actually used.
    pub rounds_used: usize,
    /// The full evidence set the answer was synthesized from.
    pub evidence: Vec<Evidence>,
}

/// Use case for running one research session to completion.
pub struct RunResearchUseCase<G: CompletionGateway + 'static, T: ToolExecutorPort + 'static> {
    gateway: Arc<G>,
    tool_executor: Arc<T>,
    config: ResearchConfig,
    cancellation_token: Option<CancellationToken>,
}

impl<G: CompletionGateway + 'static, T: ToolExecutorPort + 'static> RunResearchUseCase<G, T> {
    pub fn new(gateway: Arc<G>, tool_executor: Arc<T>) -> Self {
        Self {
            gateway,
            tool_executor,
            config: ResearchConfig::default(),
            cancellation_token: None,
        }
    }

    pub fn with_config(mut self, config: ResearchConfig) -> Self {
        self.config = config;
        self
    }

    /// Set a cancellation token checked at every await point.
    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancellation_token = Some(token);
        self
    }

    /// Execute without progress reporting.
    pub async fn execute(&self, input: RunResearchInput) -> Result<RunResearchOutput, ResearchError> {
        self.execute_with_progress(input, &NoProgress).await
    }

    /// Execute with progress callbacks.
    pub async fn execute_with_progress(
        &self,
        input: RunResearchInput,
        progress: &dyn ResearchProgressNotifier,
    ) -> Result<RunResearchOutput, ResearchError> {
        match self.run(&input.query, progress).await {
            Ok(output) => Ok(output),
            Err(e) => {
                progress.on_event(&ProgressEvent::error(
                    StepType::ResponseGeneration,
                    e.to_string(),
                ));
                warn!(error = %e, "Research session failed");
                Err(e)
            }
        }
    }

    async fn run(
        &self,
        query: &ResearchQuery,
        progress: &dyn ResearchProgressNotifier,
    ) -> Result<RunResearchOutput, ResearchError> {
        check_cancelled(&self.cancellation_token)?;

        let current_date = query
            .effective_date
            .unwrap_or_else(|| Utc::now().date_naive());
        let mut phase = ResearchPhase::Init;

        info!(jurisdiction = %query.jurisdiction, "Starting research session");
        progress.on_event(&ProgressEvent::progress(
            StepType::QueryAnalysis,
            "Parsing query",
            5,
        ));
        let parsed = ParsedQuery::parse(&query.text);
        debug!(
            must = parsed.must_terms.len(),
            should = parsed.should_terms.len(),
            must_not = parsed.must_not_terms.len(),
            "Query parsed"
        );

        // ==================== Init → Searching ====================
        phase = self.advance(phase, ResearchPhase::Searching);
        progress.on_event(&ProgressEvent::progress(
            StepType::DatabaseSearch,
            "Searching case law",
            20,
        ));
        let mut evidence = self.initial_search(query, &parsed).await?;
        info!(count = evidence.len(), "Initial search complete");

        let system_prompt = ResearchPromptTemplate::system(current_date);
        let session = gateway_call(
            self.gateway.create_session(&system_prompt),
            self.config.completion_timeout,
            &self.cancellation_token,
        )
        .await?;

        let mut authorities: Vec<CitedAuthority> = Vec::new();
        let mut rounds_used = 0;

        let answer = if needs_deeper_research(&evidence, query) {
            // ==================== Searching → ToolLoop ====================
            phase = self.advance(phase, ResearchPhase::ToolLoop);
            progress.on_event(&ProgressEvent::progress(
                StepType::AiAnalysis,
                "Researching with tools",
                40,
            ));

            let (mut answer, rounds) = self
                .tool_loop(
                    session.as_ref(),
                    query,
                    &mut evidence,
                    &mut authorities,
                    progress,
                )
                .await?;
            rounds_used = rounds;

            // Gap-driven deepening: only when the evidence is still thin.
            if needs_deeper_research(&evidence, query) {
                let deepen = DeepenResearchUseCase::new(self.tool_executor.clone())
                    .with_max_searches(self.config.max_follow_up_searches);
                let deepen = match &self.cancellation_token {
                    Some(token) => deepen.with_cancellation(token.clone()),
                    None => deepen,
                };
                let deepened = deepen.execute(query, &evidence, progress).await?;

                if !deepened.evidence.is_empty() {
                    let note = Self::revision_prompt(&deepened.evidence);
                    evidence.extend(deepened.evidence);
                    progress.on_event(&ProgressEvent::progress(
                        StepType::AiAnalysis,
                        "Revising with deeper research",
                        75,
                    ));
                    answer = gateway_call(
                        session.send(&note),
                        self.config.completion_timeout,
                        &self.cancellation_token,
                    )
                    .await?;
                }
            }

            answer
        } else {
            // Evidence is already sufficient: skip the tool loop and go
            // straight toward synthesis.
            progress.on_event(&ProgressEvent::progress(
                StepType::AiAnalysis,
                "Synthesizing from existing authority",
                60,
            ));
            let prompt = ResearchPromptTemplate::research_request(query, &evidence);
            gateway_call(
                session.send(&prompt),
                self.config.completion_timeout,
                &self.cancellation_token,
            )
            .await?
        };

        // ==================== → Validating ====================
        phase = self.advance(phase, ResearchPhase::Validating);
        progress.on_event(&ProgressEvent::progress(
            StepType::ResponseGeneration,
            "Validating answer",
            90,
        ));

        if answer.trim().is_empty() && evidence.is_empty() {
            return Err(ResearchError::NoResults);
        }

        let mut validation = validate_temporal_consistency(&answer, current_date);

        // Citations mentioned in the answer but never run through
        // verify_citation are surfaced as unchecked, with a warning.
        for citation in extract_citations(&answer) {
            let already_tracked = authorities
                .iter()
                .any(|a| citation_matches(&a.citation, &citation));
            if !already_tracked {
                validation.add_warning(format!("Citation not verified: {}", citation));
                authorities.push(CitedAuthority {
                    citation,
                    case_name: None,
                    status: VerificationStatus::Unchecked,
                });
            }
        }

        let confidence = Self::assess_confidence(&authorities, &validation, &evidence);
        let needs_review = !validation.valid;
        if needs_review {
            warn!(
                errors = validation.errors.len(),
                "Answer flagged for manual review"
            );
        }

        let gaps = identify_gaps(query, &evidence);
        let finding = ResearchFinding {
            answer,
            authorities,
            confidence,
            validation,
            gaps,
            needs_review,
        };

        // ==================== Validating → Done ====================
        let _ = self.advance(phase, ResearchPhase::Done);
        progress.on_event(&ProgressEvent::complete(
            StepType::ResponseGeneration,
            "Research complete",
        ));

        Ok(RunResearchOutput {
            finding,
            rounds_used,
            evidence,
        })
    }

    /// Record a phase transition. Illegal transitions indicate a driver
    /// bug, so they are loud in debug builds.
    fn advance(&self, from: ResearchPhase, to: ResearchPhase) -> ResearchPhase {
        debug_assert!(from.can_transition_to(to), "illegal transition {from} → {to}");
        debug!(%from, %to, "Phase transition");
        to
    }

    /// Initial opinion search, filtered through the parsed boolean query.
    async fn initial_search(
        &self,
        query: &ResearchQuery,
        parsed: &ParsedQuery,
    ) -> Result<Vec<Evidence>, ResearchError> {
        check_cancelled(&self.cancellation_token)?;

        let call = ToolCall::new(names::SEARCH_CASE_LAW)
            .with_arg("query", query.text.as_str())
            .with_arg("jurisdiction", query.jurisdiction.as_str());
        let result = self.tool_executor.execute(&call).await;

        if !result.is_success() {
            warn!(
                error = %result.feedback_text(),
                "Initial search failed; continuing with empty evidence"
            );
            return Ok(Vec::new());
        }

        let all = opinions_to_evidence(
            result.output().unwrap_or_default(),
            EvidenceSource::CaseLaw,
            Confidence::High,
        );

        // Boolean queries get the literal-match filter over title and
        // excerpt; natural-language questions pass through unfiltered.
        if !ParsedQuery::has_boolean_syntax(&query.text) {
            return Ok(all);
        }
        let pred = parsed.to_predicate();
        Ok(all
            .into_iter()
            .filter(|e| pred(&[e.title.as_str(), e.excerpt.as_str()]))
            .collect())
    }

    /// The bounded tool-calling loop.
    ///
    /// Returns the final answer text and the number of rounds used. When
    /// the round cap fires while the model still wants tools, a final
    /// synthesis is forced without them.
    async fn tool_loop(
        &self,
        session: &dyn CompletionSession,
        query: &ResearchQuery,
        evidence: &mut Vec<Evidence>,
        authorities: &mut Vec<CitedAuthority>,
        progress: &dyn ResearchProgressNotifier,
    ) -> Result<(String, usize), ResearchError> {
        let prompt = ResearchPromptTemplate::research_request(query, evidence);
        let tools = self.tool_executor.tool_spec().to_api_tools();

        let mut response = gateway_call(
            session.send_with_tools(&prompt, &tools),
            self.config.completion_timeout,
            &self.cancellation_token,
        )
        .await?;

        let mut rounds = 0;
        let mut last_text = response.text_content();

        loop {
            let calls = response.tool_calls();
            if calls.is_empty() {
                break;
            }

            if rounds >= self.config.max_tool_rounds {
                warn!(
                    cap = self.config.max_tool_rounds,
                    "Round cap reached; forcing synthesis"
                );
                last_text = gateway_call(
                    session.send(&ResearchPromptTemplate::forced_synthesis()),
                    self.config.completion_timeout,
                    &self.cancellation_token,
                )
                .await?;
                break;
            }
            rounds += 1;
            check_cancelled(&self.cancellation_token)?;

            debug!(round = rounds, requests = calls.len(), "Executing tool round");

            // Sequential execution: each round's requests depend on the
            // model having seen the previous round's results.
            let mut messages = Vec::with_capacity(calls.len());
            for call in &calls {
                progress.on_tool_call(&call.tool_name);
                let result = self.tool_executor.execute(call).await;
                progress.on_tool_result(&call.tool_name, result.is_success(), result.cache_hit);

                Self::harvest(call, &result, evidence, authorities);

                match call.native_id.clone() {
                    Some(id) => messages.push(ToolResultMessage {
                        tool_use_id: id,
                        tool_name: call.tool_name.clone(),
                        output: truncate(&result.feedback_text(), 8_000),
                        is_error: !result.is_success(),
                    }),
                    None => warn!(
                        tool = %call.tool_name,
                        "Missing native id on tool call; result dropped"
                    ),
                }
            }

            response = gateway_call(
                session.send_tool_results(&messages),
                self.config.completion_timeout,
                &self.cancellation_token,
            )
            .await?;

            let text = response.text_content();
            if !text.is_empty() {
                last_text = text;
            }
        }

        Ok((last_text, rounds))
    }

    /// Fold a tool result into the session's evidence and authority sets.
    fn harvest(
        call: &ToolCall,
        result: &ToolResult,
        evidence: &mut Vec<Evidence>,
        authorities: &mut Vec<CitedAuthority>,
    ) {
        if !result.is_success() {
            return;
        }
        let output = result.output().unwrap_or_default();

        match call.tool_name.as_str() {
            names::SEARCH_CASE_LAW => {
                for item in
                    opinions_to_evidence(output, EvidenceSource::CaseLaw, Confidence::High)
                {
                    let known = evidence
                        .iter()
                        .any(|e| e.title.eq_ignore_ascii_case(&item.title));
                    if !known {
                        evidence.push(item);
                    }
                }
            }
            names::GET_CFR_TEXT => {
                let title = call.get_string("title").unwrap_or("?");
                let part = call.get_string("part").unwrap_or("?");
                let section = call.get_string("section").unwrap_or("?");
                let name = format!("{} CFR {}.{}", title, part, section);
                if !evidence.iter().any(|e| e.title == name) {
                    evidence.push(
                        Evidence::new(EvidenceSource::Regulation, name, truncate(output, 500))
                            .with_citation(format!("{} C.F.R. § {}.{}", title, part, section)),
                    );
                }
            }
            names::VERIFY_CITATION => {
                if let Ok(verification) = serde_json::from_str::<CitationVerification>(output) {
                    let known = authorities
                        .iter()
                        .any(|a| citation_matches(&a.citation, &verification.citation));
                    if !known {
                        authorities.push(CitedAuthority {
                            citation: verification.citation.clone(),
                            case_name: verification.case_name.clone(),
                            status: verification.status(),
                        });
                    }
                }
            }
            _ => {}
        }
    }

    /// Deterministic confidence label for the finding.
    ///
    /// High needs verified authority and a clean validation; hard errors
    /// always mean Low.
    fn assess_confidence(
        authorities: &[CitedAuthority],
        validation: &lexora_domain::ValidationResult,
        evidence: &[Evidence],
    ) -> Confidence {
        if !validation.valid {
            return Confidence::Low;
        }

        let verified = authorities
            .iter()
            .filter(|a| a.status == VerificationStatus::Verified)
            .count();
        let low_confidence_evidence = evidence
            .iter()
            .filter(|e| e.confidence < Confidence::High)
            .count();

        if verified >= 2 && low_confidence_evidence == 0 && validation.warnings.is_empty() {
            Confidence::High
        } else if verified >= 1 || !evidence.is_empty() {
            Confidence::Medium
        } else {
            Confidence::Low
        }
    }

    fn revision_prompt(deepened: &[Evidence]) -> String {
        let mut prompt = String::from(
            "Additional authority located by a broader automated search \
             (lower confidence; weigh accordingly):\n",
        );
        for item in deepened {
            let citation = item.citation.as_deref().unwrap_or("uncited");
            prompt.push_str(&format!(
                "- {} ({citation}, confidence {}): {}\n",
                item.title, item.confidence, item.excerpt
            ));
        }
        prompt.push_str("\nRevise your answer to incorporate anything relevant above.");
        prompt
    }
}
