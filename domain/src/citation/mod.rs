//! Citation model and matching rules.
//!
//! A citation string ("410 U.S. 113") resolves to at most one judicial
//! opinion. Matching is deliberately conservative: a lookup that cannot be
//! tied to a specific case reports not-found instead of guessing, because a wrong
//! match in legal research is worse than a miss.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// A judicial opinion as returned by the case-law search capability.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CaseOpinion {
    pub title: String,
    pub citation: String,
    pub court: String,
    pub date: Option<NaiveDate>,
    pub summary: String,
    pub url: String,
}

/// Verification status of a single cited authority.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VerificationStatus {
    /// Resolved to a specific real opinion.
    Verified,
    /// Lookup ran but produced no acceptable match.
    NotFound,
    /// No lookup was attempted for this authority.
    Unchecked,
}

impl VerificationStatus {
    pub fn as_str(&self) -> &str {
        match self {
            VerificationStatus::Verified => "verified",
            VerificationStatus::NotFound => "not_found",
            VerificationStatus::Unchecked => "unchecked",
        }
    }
}

/// Result of verifying one citation string.
///
/// When `found` is false every descriptive field is `None`: absence is
/// reported, never filled in with a guess.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CitationVerification {
    pub citation: String,
    pub found: bool,
    pub case_name: Option<String>,
    pub court: Option<String>,
    pub date: Option<NaiveDate>,
    pub url: Option<String>,
    /// Why the lookup concluded what it did.
    pub note: String,
}

impl CitationVerification {
    pub fn verified(citation: impl Into<String>, opinion: &CaseOpinion) -> Self {
        Self {
            citation: citation.into(),
            found: true,
            case_name: Some(opinion.title.clone()),
            court: Some(opinion.court.clone()),
            date: opinion.date,
            url: Some(opinion.url.clone()),
            note: "Citation resolved to a specific opinion".to_string(),
        }
    }

    pub fn not_found(citation: impl Into<String>, note: impl Into<String>) -> Self {
        Self {
            citation: citation.into(),
            found: false,
            case_name: None,
            court: None,
            date: None,
            url: None,
            note: note.into(),
        }
    }

    pub fn status(&self) -> VerificationStatus {
        if self.found {
            VerificationStatus::Verified
        } else {
            VerificationStatus::NotFound
        }
    }
}

/// Normalize a citation for comparison: lowercase, periods stripped,
/// whitespace collapsed. "410 U.S. 113" and "410 US 113" compare equal.
pub fn normalize_citation(citation: &str) -> String {
    citation
        .to_lowercase()
        .replace('.', "")
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

/// Whether a candidate opinion's citation field covers the requested
/// citation string.
pub fn citation_matches(candidate: &str, requested: &str) -> bool {
    let candidate = normalize_citation(candidate);
    let requested = normalize_citation(requested);
    !requested.is_empty() && candidate.contains(&requested)
}

/// Whether a candidate opinion's title corresponds to the requested case
/// name. Comparison ignores case and the "v." / "vs." spelling.
pub fn title_matches(candidate: &str, requested: &str) -> bool {
    let norm = |s: &str| {
        s.to_lowercase()
            .replace(" vs. ", " v. ")
            .replace(" vs ", " v. ")
            .split_whitespace()
            .collect::<Vec<_>>()
            .join(" ")
    };
    let candidate = norm(candidate);
    let requested = norm(requested);
    !requested.is_empty() && (candidate.contains(&requested) || requested.contains(&candidate))
}

/// Select the opinion a citation resolves to, if any.
///
/// With a case name supplied, both the citation and the title must agree.
/// A bare citation accepts only an unambiguous match: if several unrelated
/// opinions carry the same citation text, the lookup biases to not-found.
pub fn resolve_citation<'a>(
    opinions: &'a [CaseOpinion],
    citation: &str,
    case_name: Option<&str>,
) -> Option<&'a CaseOpinion> {
    let by_citation: Vec<&CaseOpinion> = opinions
        .iter()
        .filter(|o| citation_matches(&o.citation, citation))
        .collect();

    match case_name {
        Some(name) => by_citation.into_iter().find(|o| title_matches(&o.title, name)),
        None => {
            let mut titles: Vec<String> = by_citation.iter().map(|o| o.title.to_lowercase()).collect();
            titles.sort();
            titles.dedup();
            // Ambiguous bare citation: refuse to pick one.
            if titles.len() == 1 {
                by_citation.into_iter().next()
            } else {
                None
            }
        }
    }
}

/// Extract reporter-style citation strings ("410 U.S. 113",
/// "93 F.3d 1412") mentioned in free text.
///
/// Best-effort and deliberately narrow: volume + reporter abbreviation +
/// page. Used to surface authorities the model cited but never ran
/// through `verify_citation`.
pub fn extract_citations(text: &str) -> Vec<String> {
    use regex::Regex;
    use std::sync::OnceLock;

    static RE: OnceLock<Regex> = OnceLock::new();
    let re = RE.get_or_init(|| {
        Regex::new(r"\b(\d{1,4})\s+([A-Z][A-Za-z]*\.(?:\s?[A-Za-z0-9]{1,4}\.?)*|F\.(?:2d|3d|4th)|U\.S\.)\s+(\d{1,5})\b")
            .unwrap()
    });

    let mut seen = Vec::new();
    for caps in re.captures_iter(text) {
        let citation = caps.get(0).unwrap().as_str().trim().to_string();
        if !seen.contains(&citation) {
            seen.push(citation);
        }
    }
    seen
}

#[cfg(test)]
mod tests {
    use super::*;

    fn opinion(title: &str, citation: &str) -> CaseOpinion {
        CaseOpinion {
            title: title.to_string(),
            citation: citation.to_string(),
            court: "SCOTUS".to_string(),
            date: NaiveDate::from_ymd_opt(1973, 1, 22),
            summary: String::new(),
            url: format!("https://example.org/{}", citation.replace(' ', "-")),
        }
    }

    #[test]
    fn test_normalize_citation() {
        assert_eq!(normalize_citation("410 U.S.  113"), "410 us 113");
        assert_eq!(normalize_citation("410 US 113"), "410 us 113");
    }

    #[test]
    fn test_citation_matches_ignores_punctuation() {
        assert!(citation_matches("410 U.S. 113", "410 US 113"));
        assert!(!citation_matches("410 U.S. 113", "411 U.S. 113"));
        assert!(!citation_matches("410 U.S. 113", ""));
    }

    #[test]
    fn test_title_matches() {
        assert!(title_matches("Roe v. Wade", "roe v. wade"));
        assert!(title_matches("Roe vs. Wade", "Roe v. Wade"));
        assert!(!title_matches("Roe v. Wade", "Doe v. Bolton"));
    }

    #[test]
    fn test_resolve_with_case_name() {
        let opinions = vec![
            opinion("Roe v. Wade", "410 U.S. 113"),
            opinion("Doe v. Bolton", "410 U.S. 179"),
        ];
        let resolved = resolve_citation(&opinions, "410 U.S. 113", Some("Roe v. Wade"));
        assert_eq!(resolved.unwrap().title, "Roe v. Wade");
    }

    #[test]
    fn test_resolve_name_mismatch_is_none() {
        let opinions = vec![opinion("Roe v. Wade", "410 U.S. 113")];
        let resolved = resolve_citation(&opinions, "410 U.S. 113", Some("Doe v. Bolton"));
        assert!(resolved.is_none());
    }

    #[test]
    fn test_resolve_bare_citation_unambiguous() {
        let opinions = vec![opinion("Roe v. Wade", "410 U.S. 113")];
        let resolved = resolve_citation(&opinions, "410 U.S. 113", None);
        assert_eq!(resolved.unwrap().title, "Roe v. Wade");
    }

    #[test]
    fn test_resolve_bare_citation_ambiguous_is_none() {
        let opinions = vec![
            opinion("Roe v. Wade", "410 U.S. 113"),
            opinion("Totally Different Case", "410 U.S. 113"),
        ];
        assert!(resolve_citation(&opinions, "410 U.S. 113", None).is_none());
    }

    #[test]
    fn test_extract_citations() {
        let text = "See Roe v. Wade, 410 U.S. 113 (1973) and Smith, 93 F.3d 1412.";
        let citations = extract_citations(text);
        assert!(citations.contains(&"410 U.S. 113".to_string()));
        assert!(citations.contains(&"93 F.3d 1412".to_string()));
    }

    #[test]
    fn test_extract_citations_dedupes() {
        let text = "410 U.S. 113 ... again 410 U.S. 113.";
        assert_eq!(extract_citations(text).len(), 1);
    }

    #[test]
    fn test_not_found_carries_no_fabricated_fields() {
        let v = CitationVerification::not_found("999 U.S. 1", "no match");
        assert!(!v.found);
        assert!(v.case_name.is_none());
        assert!(v.url.is_none());
        assert_eq!(v.status(), VerificationStatus::NotFound);
    }
}
