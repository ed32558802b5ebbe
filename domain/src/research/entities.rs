//! Research entities and value objects.

use crate::citation::VerificationStatus;
use crate::temporal::ValidationResult;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// One turn of prior conversation context supplied with a query.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConversationTurn {
    /// "user" or "assistant".
    pub role: String,
    pub content: String,
}

impl ConversationTurn {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: "user".to_string(),
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: "assistant".to_string(),
            content: content.into(),
        }
    }
}

/// Immutable input to one research session.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResearchQuery {
    /// The natural-language legal question.
    pub text: String,
    /// Governing jurisdiction scope, e.g. "federal" or "California".
    pub jurisdiction: String,
    /// Optional reference date for deadline arithmetic; defaults to the
    /// system clock when absent.
    pub effective_date: Option<NaiveDate>,
    /// Prior conversation turns, oldest first.
    pub prior_turns: Vec<ConversationTurn>,
}

impl ResearchQuery {
    pub fn new(text: impl Into<String>, jurisdiction: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            jurisdiction: jurisdiction.into(),
            effective_date: None,
            prior_turns: Vec::new(),
        }
    }

    pub fn with_effective_date(mut self, date: NaiveDate) -> Self {
        self.effective_date = Some(date);
        self
    }

    pub fn with_prior_turns(mut self, turns: Vec<ConversationTurn>) -> Self {
        self.prior_turns = turns;
        self
    }

    /// Reject queries that cannot drive a research session.
    pub fn validate(&self) -> Result<(), crate::DomainError> {
        if self.text.trim().is_empty() {
            return Err(crate::DomainError::InvalidQuery(
                "question text is empty".to_string(),
            ));
        }
        Ok(())
    }
}

/// Confidence label attached to evidence items and the final finding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Confidence {
    Low,
    Medium,
    High,
}

impl Confidence {
    pub fn as_str(&self) -> &str {
        match self {
            Confidence::High => "High",
            Confidence::Medium => "Medium",
            Confidence::Low => "Low",
        }
    }
}

impl std::fmt::Display for Confidence {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Where an evidence item came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EvidenceSource {
    CaseLaw,
    Regulation,
    /// Produced by the autonomous deeper-research pass.
    DeepResearch,
    /// Carried over from prior conversation turns.
    Conversation,
}

/// One item of legal authority gathered during a session.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Evidence {
    pub source: EvidenceSource,
    pub title: String,
    pub citation: Option<String>,
    pub excerpt: String,
    pub confidence: Confidence,
}

impl Evidence {
    pub fn new(
        source: EvidenceSource,
        title: impl Into<String>,
        excerpt: impl Into<String>,
    ) -> Self {
        Self {
            source,
            title: title.into(),
            citation: None,
            excerpt: excerpt.into(),
            confidence: Confidence::High,
        }
    }

    pub fn with_citation(mut self, citation: impl Into<String>) -> Self {
        self.citation = Some(citation.into());
        self
    }

    pub fn with_confidence(mut self, confidence: Confidence) -> Self {
        self.confidence = confidence;
        self
    }

    /// Text searched by the gap heuristics.
    pub fn haystack(&self) -> String {
        format!("{} {}", self.title, self.excerpt).to_lowercase()
    }
}

/// An authority cited in the synthesized answer, with its verification
/// outcome.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CitedAuthority {
    pub citation: String,
    pub case_name: Option<String>,
    pub status: VerificationStatus,
}

/// The orchestrator's phase machine.
///
/// `Done` and `Failed` are terminal; `Failed` is reachable from any state
/// on unrecoverable error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResearchPhase {
    Init,
    Searching,
    ToolLoop,
    Validating,
    Done,
    Failed,
}

impl ResearchPhase {
    pub fn as_str(&self) -> &str {
        match self {
            ResearchPhase::Init => "init",
            ResearchPhase::Searching => "searching",
            ResearchPhase::ToolLoop => "tool_loop",
            ResearchPhase::Validating => "validating",
            ResearchPhase::Done => "done",
            ResearchPhase::Failed => "failed",
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, ResearchPhase::Done | ResearchPhase::Failed)
    }

    /// Legal forward transitions; `Failed` is reachable from anywhere.
    pub fn can_transition_to(&self, next: ResearchPhase) -> bool {
        if next == ResearchPhase::Failed {
            return !self.is_terminal();
        }
        matches!(
            (self, next),
            (ResearchPhase::Init, ResearchPhase::Searching)
                | (ResearchPhase::Searching, ResearchPhase::ToolLoop)
                | (ResearchPhase::Searching, ResearchPhase::Validating)
                | (ResearchPhase::ToolLoop, ResearchPhase::Validating)
                | (ResearchPhase::Validating, ResearchPhase::Done)
        )
    }
}

impl std::fmt::Display for ResearchPhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// The terminal artifact returned to the caller.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResearchFinding {
    /// The synthesized answer text.
    pub answer: String,
    /// Authorities cited, with per-citation verification status.
    pub authorities: Vec<CitedAuthority>,
    pub confidence: Confidence,
    /// Temporal validation outcome attached as metadata.
    pub validation: ValidationResult,
    /// Authority categories still missing after research.
    pub gaps: Vec<super::gaps::KnowledgeGap>,
    /// Set when hard validation errors exist: the answer is returned but
    /// flagged for manual review instead of silently withheld.
    pub needs_review: bool,
}

impl ResearchFinding {
    pub fn new(answer: impl Into<String>, confidence: Confidence) -> Self {
        Self {
            answer: answer.into(),
            authorities: Vec::new(),
            confidence,
            validation: ValidationResult::ok(),
            gaps: Vec::new(),
            needs_review: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_phase_transitions() {
        use ResearchPhase::*;
        assert!(Init.can_transition_to(Searching));
        assert!(Searching.can_transition_to(ToolLoop));
        assert!(Searching.can_transition_to(Validating));
        assert!(ToolLoop.can_transition_to(Validating));
        assert!(Validating.can_transition_to(Done));
        assert!(!Init.can_transition_to(Done));
        assert!(!Done.can_transition_to(Searching));
    }

    #[test]
    fn test_failed_reachable_from_any_live_phase() {
        use ResearchPhase::*;
        for phase in [Init, Searching, ToolLoop, Validating] {
            assert!(phase.can_transition_to(Failed));
        }
        assert!(!Done.can_transition_to(Failed));
        assert!(!Failed.can_transition_to(Failed));
    }

    #[test]
    fn test_confidence_ordering() {
        assert!(Confidence::High > Confidence::Medium);
        assert!(Confidence::Medium > Confidence::Low);
    }

    #[test]
    fn test_query_builder() {
        let query = ResearchQuery::new("statute of limitations", "California")
            .with_effective_date(chrono::NaiveDate::from_ymd_opt(2025, 6, 1).unwrap());
        assert_eq!(query.jurisdiction, "California");
        assert!(query.effective_date.is_some());
        assert!(query.prior_turns.is_empty());
    }

    #[test]
    fn test_query_validation() {
        assert!(ResearchQuery::new("real question", "federal").validate().is_ok());
        assert!(ResearchQuery::new("   ", "federal").validate().is_err());
    }
}
