//! Deepen Research use case.
//!
//! The autonomous broader pass triggered when the gathered evidence is
//! still thin after the tool loop. Deterministic: gap analysis names the
//! missing authority categories, follow-up queries target them, and the
//! merged findings are tagged with a reduced confidence level so the final
//! synthesis weights them appropriately.

use crate::ports::progress::{ProgressEvent, ResearchProgressNotifier, StepType};
use crate::ports::tool_executor::ToolExecutorPort;
use crate::use_cases::run_research::ResearchError;
use crate::use_cases::shared::{check_cancelled, opinions_to_evidence};
use lexora_domain::tool::names;
use lexora_domain::{
    follow_up_queries, identify_gaps, Confidence, Evidence, EvidenceSource, KnowledgeGap,
    ResearchQuery, ToolCall,
};
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

/// Cap on follow-up searches per deepening pass.
const DEFAULT_MAX_SEARCHES: usize = 3;

/// Outcome of one deepening pass.
pub struct DeepenOutput {
    /// New evidence items, deduplicated against the existing set.
    pub evidence: Vec<Evidence>,
    /// The gaps that drove the pass.
    pub gaps: Vec<KnowledgeGap>,
}

/// Use case for the autonomous deeper-research pass.
pub struct DeepenResearchUseCase<T: ToolExecutorPort> {
    tool_executor: Arc<T>,
    cancellation_token: Option<CancellationToken>,
    max_searches: usize,
}

impl<T: ToolExecutorPort + 'static> DeepenResearchUseCase<T> {
    pub fn new(tool_executor: Arc<T>) -> Self {
        Self {
            tool_executor,
            cancellation_token: None,
            max_searches: DEFAULT_MAX_SEARCHES,
        }
    }

    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancellation_token = Some(token);
        self
    }

    pub fn with_max_searches(mut self, max: usize) -> Self {
        self.max_searches = max;
        self
    }

    /// Run gap analysis and the follow-up searches it calls for.
    pub async fn execute(
        &self,
        query: &ResearchQuery,
        evidence: &[Evidence],
        progress: &dyn ResearchProgressNotifier,
    ) -> Result<DeepenOutput, ResearchError> {
        let gaps = identify_gaps(query, evidence);
        if gaps.is_empty() {
            debug!("No knowledge gaps identified; skipping deeper pass");
            return Ok(DeepenOutput {
                evidence: Vec::new(),
                gaps,
            });
        }

        info!(gaps = gaps.len(), "Running deeper research pass");

        let mut found: Vec<Evidence> = Vec::new();
        let known_title = |title: &str, found: &[Evidence]| {
            let title = title.to_lowercase();
            evidence.iter().any(|e| e.title.to_lowercase() == title)
                || found.iter().any(|e| e.title.to_lowercase() == title)
        };

        for follow_up in follow_up_queries(query, &gaps).iter().take(self.max_searches) {
            check_cancelled(&self.cancellation_token)?;
            progress.on_event(&ProgressEvent::progress(
                StepType::DatabaseSearch,
                format!("Follow-up search: {follow_up}"),
                70,
            ));

            let call = ToolCall::new(names::SEARCH_CASE_LAW)
                .with_arg("query", follow_up.as_str())
                .with_arg("jurisdiction", query.jurisdiction.as_str());

            let result = self.tool_executor.execute(&call).await;
            if !result.is_success() {
                warn!(query = %follow_up, "Follow-up search failed");
                continue;
            }

            for item in opinions_to_evidence(
                result.output().unwrap_or_default(),
                EvidenceSource::DeepResearch,
                Confidence::Medium,
            ) {
                if !known_title(&item.title, &found) {
                    found.push(item);
                }
            }
        }

        info!(merged = found.len(), "Deeper research pass complete");
        Ok(DeepenOutput {
            evidence: found,
            gaps,
        })
    }
}
