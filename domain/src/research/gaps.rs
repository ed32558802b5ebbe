//! Knowledge-gap identification and the deeper-research heuristic.
//!
//! All decisions here are deterministic keyword heuristics over the
//! gathered evidence, never model-driven. The model synthesizes; this
//! module decides whether the evidence it synthesizes from is thin.

use super::entities::{Evidence, ResearchQuery};
use serde::{Deserialize, Serialize};

/// Evidence sets smaller than this are insufficient on count alone.
pub const MIN_EVIDENCE_COUNT: usize = 3;

/// Vocabulary that marks an evidence item as procedural guidance.
const PROCEDURAL_VOCABULARY: [&str; 5] = ["deadline", "filing", "motion", "rule", "form"];

/// Query keywords that signal a state/procedural-law question, which needs
/// procedural guidance in its evidence set.
const PROCEDURAL_QUERY_KEYWORDS: [&str; 8] = [
    "procedure",
    "procedural",
    "deadline",
    "filing",
    "motion",
    "state law",
    "statute of limitations",
    "court rule",
];

/// A category of missing legal authority.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GapCategory {
    Statutory,
    CaseLaw,
    Procedural,
    Jurisdictional,
    Temporal,
    Practical,
}

impl GapCategory {
    pub fn as_str(&self) -> &str {
        match self {
            GapCategory::Statutory => "statutory",
            GapCategory::CaseLaw => "case_law",
            GapCategory::Procedural => "procedural",
            GapCategory::Jurisdictional => "jurisdictional",
            GapCategory::Temporal => "temporal",
            GapCategory::Practical => "practical",
        }
    }
}

/// A missing authority category, with a short description consumed by the
/// follow-up query generator.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KnowledgeGap {
    pub category: GapCategory,
    pub description: String,
}

impl KnowledgeGap {
    fn new(category: GapCategory, description: impl Into<String>) -> Self {
        Self {
            category,
            description: description.into(),
        }
    }
}

fn any_item_contains(evidence: &[Evidence], needles: &[&str]) -> bool {
    evidence
        .iter()
        .any(|e| needles.iter().any(|n| e.haystack().contains(n)))
}

fn query_mentions(query: &ResearchQuery, needles: &[&str]) -> bool {
    let text = query.text.to_lowercase();
    needles.iter().any(|n| text.contains(n))
}

/// Identify authority categories missing from the current evidence.
pub fn identify_gaps(query: &ResearchQuery, evidence: &[Evidence]) -> Vec<KnowledgeGap> {
    let mut gaps = Vec::new();

    if !any_item_contains(evidence, &["statute", "code", "§", "u.s.c.", "act"]) {
        gaps.push(KnowledgeGap::new(
            GapCategory::Statutory,
            "No statutory authority located for the question",
        ));
    }

    if !any_item_contains(evidence, &["v.", "court", "held", "opinion"]) {
        gaps.push(KnowledgeGap::new(
            GapCategory::CaseLaw,
            "No case-law authority located for the question",
        ));
    }

    if query_mentions(query, &PROCEDURAL_QUERY_KEYWORDS)
        && !any_item_contains(evidence, &PROCEDURAL_VOCABULARY)
    {
        gaps.push(KnowledgeGap::new(
            GapCategory::Procedural,
            "Procedural question, but no deadline/filing/rule guidance in evidence",
        ));
    }

    if !query.jurisdiction.is_empty() {
        let jurisdiction = query.jurisdiction.to_lowercase();
        if !evidence.iter().any(|e| e.haystack().contains(&jurisdiction)) {
            gaps.push(KnowledgeGap::new(
                GapCategory::Jurisdictional,
                format!("No authority specific to {}", query.jurisdiction),
            ));
        }
    }

    if query_mentions(query, &["deadline", "when", "how long", "time limit"])
        && !any_item_contains(evidence, &["days", "year", "month", "within"])
    {
        gaps.push(KnowledgeGap::new(
            GapCategory::Temporal,
            "Time-sensitive question, but no time-period authority in evidence",
        ));
    }

    if !any_item_contains(evidence, &["practice", "procedure", "how to", "checklist", "form"]) {
        gaps.push(KnowledgeGap::new(
            GapCategory::Practical,
            "No practical guidance located for the question",
        ));
    }

    gaps
}

/// Generate follow-up search queries that target the identified gaps.
pub fn follow_up_queries(query: &ResearchQuery, gaps: &[KnowledgeGap]) -> Vec<String> {
    let subject = query.text.trim();
    let jurisdiction = query.jurisdiction.trim();

    gaps.iter()
        .map(|gap| match gap.category {
            GapCategory::Statutory => format!("{} statute {}", subject, jurisdiction),
            GapCategory::CaseLaw => format!("{} case law {}", subject, jurisdiction),
            GapCategory::Procedural => {
                format!("{} filing deadline court rule {}", subject, jurisdiction)
            }
            GapCategory::Jurisdictional => format!("{} {}", subject, jurisdiction),
            GapCategory::Temporal => format!("{} time limit deadline {}", subject, jurisdiction),
            GapCategory::Practical => format!("{} practice guide forms {}", subject, jurisdiction),
        })
        .map(|q| q.trim().to_string())
        .collect()
}

/// Decide whether the evidence set needs the autonomous deeper pass.
///
/// Deterministic: insufficient when empty, below [`MIN_EVIDENCE_COUNT`],
/// or, for state/procedural-law questions, when no item carries
/// procedural-guidance vocabulary.
pub fn needs_deeper_research(evidence: &[Evidence], query: &ResearchQuery) -> bool {
    if evidence.is_empty() || evidence.len() < MIN_EVIDENCE_COUNT {
        return true;
    }

    if query_mentions(query, &PROCEDURAL_QUERY_KEYWORDS)
        && !any_item_contains(evidence, &PROCEDURAL_VOCABULARY)
    {
        return true;
    }

    false
}
