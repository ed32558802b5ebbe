//! Prompt templates for the research session.
//!
//! Templates are plain functions over domain types. The temporal ground
//! rules are stated in the system prompt because the validator only
//! catches violations after the fact; cheaper to not produce them.

use crate::research::{Evidence, ResearchQuery};

/// Prompt templates used by the research orchestrator.
pub struct ResearchPromptTemplate;

impl ResearchPromptTemplate {
    /// System prompt for the tool-calling research session.
    pub fn system(current_date: chrono::NaiveDate) -> String {
        format!(
            "You are a legal research assistant for practicing attorneys. \
             Today's date is {current_date}. Use the provided tools to ground every \
             claim in real authority before answering.\n\n\
             Rules:\n\
             - Verify every citation you rely on with the verify_citation tool; \
             never cite an authority you could not verify.\n\
             - Check deadline arithmetic with check_deadline_status; never compute \
             day counts yourself.\n\
             - Never give preparation advice for events that have already passed; \
             advise on post-event remedies instead.\n\
             - When you have enough authority, answer without further tool calls. \
             State your confidence (High/Medium/Low) and list the authorities cited."
        )
    }

    /// The opening user message: question, jurisdiction and any evidence
    /// already gathered by the initial search.
    pub fn research_request(query: &ResearchQuery, evidence: &[Evidence]) -> String {
        let mut prompt = format!(
            "Legal question ({} jurisdiction): {}\n",
            query.jurisdiction, query.text
        );

        if let Some(date) = query.effective_date {
            prompt.push_str(&format!("Analyze as of {date}.\n"));
        }

        if !query.prior_turns.is_empty() {
            prompt.push_str("\nPrior conversation:\n");
            for turn in &query.prior_turns {
                prompt.push_str(&format!("[{}] {}\n", turn.role, turn.content));
            }
        }

        if evidence.is_empty() {
            prompt.push_str("\nNo authority has been gathered yet; use the search tools.\n");
        } else {
            prompt.push_str("\nAuthority gathered so far:\n");
            for item in evidence {
                let citation = item.citation.as_deref().unwrap_or("uncited");
                prompt.push_str(&format!(
                    "- {} ({citation}, confidence {}): {}\n",
                    item.title, item.confidence, item.excerpt
                ));
            }
        }

        prompt.push_str(
            "\nResearch the question with the tools as needed, then give an \
             attorney-usable answer with citations.",
        );
        prompt
    }

    /// Instruction appended when the round cap fires: synthesize from what
    /// exists, no further tool calls.
    pub fn forced_synthesis() -> String {
        "Tool budget exhausted. Synthesize the best possible answer from the \
         authority gathered above, flag what you could not verify, and state \
         your confidence."
            .to_string()
    }

    /// Broader query used by the deeper-research pass.
    pub fn deeper_search_note(follow_up: &str) -> String {
        format!("Broader follow-up search: {follow_up}")
    }
}
