//! Motion template engine.
//!
//! Deterministic, non-LLM generation of boilerplate motion skeletons in
//! markdown, parameterized by motion type and case facts. Exposed to the
//! model as the `generate_motion_template` tool, but usable directly.

use serde::{Deserialize, Serialize};

/// Supported motion types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MotionType {
    Continuance,
    Dismissal,
    SummaryJudgment,
    CompelDiscovery,
    InLimine,
    /// Fallback skeleton for motion types without a dedicated template.
    Generic,
}

impl MotionType {
    /// Parse a caller-supplied motion type string. Unknown types map to
    /// `Generic` rather than erroring; the skeleton still helps.
    pub fn parse(s: &str) -> Self {
        let normalized = s.trim().to_lowercase().replace([' ', '-'], "_");
        match normalized.as_str() {
            "continuance" => MotionType::Continuance,
            "dismissal" | "dismiss" | "motion_to_dismiss" => MotionType::Dismissal,
            "summary_judgment" | "msj" => MotionType::SummaryJudgment,
            "compel_discovery" | "compel" | "motion_to_compel" => MotionType::CompelDiscovery,
            "in_limine" | "limine" => MotionType::InLimine,
            _ => MotionType::Generic,
        }
    }

    pub fn title(&self) -> &str {
        match self {
            MotionType::Continuance => "MOTION FOR CONTINUANCE",
            MotionType::Dismissal => "MOTION TO DISMISS",
            MotionType::SummaryJudgment => "MOTION FOR SUMMARY JUDGMENT",
            MotionType::CompelDiscovery => "MOTION TO COMPEL DISCOVERY",
            MotionType::InLimine => "MOTION IN LIMINE",
            MotionType::Generic => "MOTION",
        }
    }

    fn relief_clause(&self) -> &str {
        match self {
            MotionType::Continuance => {
                "an order continuing the currently scheduled proceeding to a later date"
            }
            MotionType::Dismissal => {
                "an order dismissing the complaint for failure to state a claim upon which \
                 relief can be granted"
            }
            MotionType::SummaryJudgment => {
                "summary judgment on the ground that there is no genuine dispute as to any \
                 material fact and the movant is entitled to judgment as a matter of law"
            }
            MotionType::CompelDiscovery => {
                "an order compelling the responding party to provide complete responses to \
                 the outstanding discovery requests"
            }
            MotionType::InLimine => {
                "an order excluding the identified evidence from presentation at trial"
            }
            MotionType::Generic => "the relief described below",
        }
    }

    fn standard_section(&self) -> &str {
        match self {
            MotionType::Continuance => {
                "Good cause supports a continuance where the moving party shows diligence \
                 and the absence of prejudice to the opposing party."
            }
            MotionType::Dismissal => {
                "To survive a motion to dismiss, a complaint must contain sufficient factual \
                 matter, accepted as true, to state a claim to relief that is plausible on \
                 its face."
            }
            MotionType::SummaryJudgment => {
                "Summary judgment is proper when the pleadings, discovery, and affidavits \
                 show that there is no genuine dispute as to any material fact."
            }
            MotionType::CompelDiscovery => {
                "A party may move for an order compelling disclosure or discovery after \
                 conferring in good faith with the party failing to respond."
            }
            MotionType::InLimine => {
                "The court may exclude relevant evidence if its probative value is \
                 substantially outweighed by a danger of unfair prejudice."
            }
            MotionType::Generic => "[STATE THE GOVERNING LEGAL STANDARD]",
        }
    }
}

/// Caption and factual inputs for a motion skeleton.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CaseFacts {
    pub court: String,
    pub case_number: String,
    pub plaintiff: String,
    pub defendant: String,
    /// The party bringing the motion, e.g. "Defendant".
    pub movant: String,
    /// Supporting facts, one bullet each.
    pub facts: Vec<String>,
    pub hearing_date: Option<String>,
}

/// Render a motion skeleton as markdown.
///
/// Missing caption fields render as bracketed placeholders so the output
/// is always a complete, editable document.
pub fn render_motion(motion_type: MotionType, facts: &CaseFacts) -> String {
    let or_placeholder =
        |value: &str, placeholder: &str| -> String {
            if value.trim().is_empty() {
                format!("[{}]", placeholder)
            } else {
                value.trim().to_string()
            }
        };

    let court = or_placeholder(&facts.court, "COURT");
    let case_number = or_placeholder(&facts.case_number, "CASE NUMBER");
    let plaintiff = or_placeholder(&facts.plaintiff, "PLAINTIFF");
    let defendant = or_placeholder(&facts.defendant, "DEFENDANT");
    let movant = or_placeholder(&facts.movant, "MOVANT");

    let mut body = String::new();

    body.push_str(&format!("# {}\n\n", motion_type.title()));
    body.push_str(&format!("**{}**\n\n", court.to_uppercase()));
    body.push_str(&format!(
        "**{}**, Plaintiff,\n\nv.\n\n**{}**, Defendant.\n\n",
        plaintiff, defendant
    ));
    body.push_str(&format!("Case No. {}\n\n---\n\n", case_number));

    body.push_str(&format!(
        "{} respectfully moves this Court for {}.\n\n",
        movant,
        motion_type.relief_clause()
    ));

    body.push_str("## STATEMENT OF FACTS\n\n");
    if facts.facts.is_empty() {
        body.push_str("1. [STATE THE SUPPORTING FACTS]\n");
    } else {
        for (i, fact) in facts.facts.iter().enumerate() {
            body.push_str(&format!("{}. {}\n", i + 1, fact));
        }
    }
    body.push('\n');

    body.push_str("## LEGAL STANDARD\n\n");
    body.push_str(motion_type.standard_section());
    body.push_str("\n\n");

    body.push_str("## ARGUMENT\n\n[APPLY THE STANDARD TO THE FACTS ABOVE]\n\n");

    if let Some(hearing) = &facts.hearing_date {
        body.push_str(&format!("## NOTICE OF HEARING\n\nHearing requested: {}\n\n", hearing));
    }

    body.push_str(&format!(
        "## CONCLUSION\n\nFor the foregoing reasons, {} respectfully requests that the \
         Court grant this motion.\n\nRespectfully submitted,\n\n[ATTORNEY NAME]\n[BAR NUMBER]\n\
         Counsel for {}\n",
        movant, movant
    ));

    body
}
