//! Console and JSON rendering of research findings.

use colored::Colorize;
use lexora_application::RunResearchOutput;
use lexora_domain::VerificationStatus;

/// Render the finding for terminal reading.
pub fn format_text(output: &RunResearchOutput) -> String {
    let finding = &output.finding;
    let mut out = String::new();

    if finding.needs_review {
        out.push_str(&format!(
            "{}\n\n",
            "NEEDS MANUAL REVIEW: temporal contradictions detected"
                .red()
                .bold()
        ));
    }

    out.push_str(&finding.answer);
    out.push_str("\n\n");

    out.push_str(&format!(
        "{} {}\n",
        "Confidence:".bold(),
        finding.confidence.as_str()
    ));

    if !finding.authorities.is_empty() {
        out.push_str(&format!("\n{}\n", "Authorities:".bold()));
        for authority in &finding.authorities {
            let status = match authority.status {
                VerificationStatus::Verified => "verified".green(),
                VerificationStatus::NotFound => "NOT FOUND".red(),
                VerificationStatus::Unchecked => "unchecked".yellow(),
            };
            let name = authority.case_name.as_deref().unwrap_or("");
            out.push_str(&format!("  - {} {} [{}]\n", name, authority.citation, status));
        }
    }

    if !finding.validation.errors.is_empty() {
        out.push_str(&format!("\n{}\n", "Validation errors:".red().bold()));
        for error in &finding.validation.errors {
            out.push_str(&format!("  - {}\n", error));
        }
    }
    if !finding.validation.warnings.is_empty() {
        out.push_str(&format!("\n{}\n", "Warnings:".yellow().bold()));
        for warning in &finding.validation.warnings {
            out.push_str(&format!("  - {}\n", warning));
        }
    }

    if !finding.gaps.is_empty() {
        out.push_str(&format!("\n{}\n", "Remaining gaps:".bold()));
        for gap in &finding.gaps {
            out.push_str(&format!("  - [{}] {}\n", gap.category.as_str(), gap.description));
        }
    }

    out.push_str(&format!(
        "\n{} {} tool rounds, {} evidence items\n",
        "Session:".dimmed(),
        output.rounds_used,
        output.evidence.len()
    ));

    out
}

/// Render the finding as JSON for machine consumers.
pub fn format_json(output: &RunResearchOutput) -> String {
    serde_json::to_string_pretty(&serde_json::json!({
        "answer": output.finding.answer,
        "confidence": output.finding.confidence.as_str(),
        "needs_review": output.finding.needs_review,
        "authorities": output.finding.authorities,
        "validation": output.finding.validation,
        "gaps": output.finding.gaps,
        "rounds_used": output.rounds_used,
        "evidence_count": output.evidence.len(),
    }))
    .unwrap_or_else(|e| format!("{{\"error\":\"{}\"}}", e))
}
