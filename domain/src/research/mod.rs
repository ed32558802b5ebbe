//! Research session entities: the immutable query, accumulated evidence,
//! the orchestrator phase machine and the terminal finding.

mod entities;
mod gaps;

pub use entities::{
    CitedAuthority, Confidence, ConversationTurn, Evidence, EvidenceSource, ResearchFinding,
    ResearchPhase, ResearchQuery,
};
pub use gaps::{
    follow_up_queries, identify_gaps, needs_deeper_research, GapCategory, KnowledgeGap,
    MIN_EVIDENCE_COUNT,
};
