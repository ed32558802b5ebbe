//! Shared utilities for use cases: cancellation checks and bounded,
//! cancellable gateway calls.

use crate::ports::completion::GatewayError;
use crate::use_cases::run_research::ResearchError;
use std::future::Future;
use std::time::Duration;
use tokio_util::sync::CancellationToken;

/// Check if cancellation has been requested.
pub(crate) fn check_cancelled(token: &Option<CancellationToken>) -> Result<(), ResearchError> {
    if let Some(token) = token
        && token.is_cancelled()
    {
        return Err(ResearchError::Cancelled);
    }
    Ok(())
}

/// Run a gateway call with a per-call timeout and cancellation support.
///
/// Cancellation wins over completion; an in-flight call is abandoned and
/// its result discarded. A timeout surfaces as
/// [`ResearchError::ServiceUnavailable`].
pub(crate) async fn gateway_call<T, F>(
    fut: F,
    timeout: Duration,
    token: &Option<CancellationToken>,
) -> Result<T, ResearchError>
where
    F: Future<Output = Result<T, GatewayError>>,
{
    check_cancelled(token)?;

    let bounded = tokio::time::timeout(timeout, fut);

    let outcome = if let Some(token) = token {
        tokio::select! {
            biased;
            _ = token.cancelled() => return Err(ResearchError::Cancelled),
            outcome = bounded => outcome,
        }
    } else {
        bounded.await
    };

    match outcome {
        Ok(Ok(value)) => Ok(value),
        Ok(Err(e)) => Err(ResearchError::ServiceUnavailable(e.to_string())),
        Err(_) => Err(ResearchError::ServiceUnavailable(
            GatewayError::Timeout.to_string(),
        )),
    }
}

/// Parse a `search_case_law` tool output (a JSON array of opinions) into
/// evidence items. Malformed output yields no evidence; the text was
/// meant for the model, not for us.
pub(crate) fn opinions_to_evidence(
    output: &str,
    source: lexora_domain::EvidenceSource,
    confidence: lexora_domain::Confidence,
) -> Vec<lexora_domain::Evidence> {
    use lexora_domain::{CaseOpinion, Evidence};

    let Ok(opinions) = serde_json::from_str::<Vec<CaseOpinion>>(output) else {
        return Vec::new();
    };

    opinions
        .into_iter()
        .map(|o| {
            let mut item = Evidence::new(source, o.title, truncate(&o.summary, 500))
                .with_confidence(confidence);
            if !o.citation.is_empty() {
                item = item.with_citation(o.citation);
            }
            item
        })
        .collect()
}

/// Truncate to at most `max` characters on a char boundary.
pub(crate) fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let cut: String = s.chars().take(max).collect();
        format!("{}…", cut)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lexora_domain::{Confidence, EvidenceSource};

    #[test]
    fn test_opinions_to_evidence_parses_json() {
        let output = serde_json::json!([{
            "title": "Smith v. Jones",
            "citation": "1 U.S. 1",
            "court": "SCOTUS",
            "date": null,
            "summary": "held something",
            "url": "https://example.org/1"
        }])
        .to_string();

        let evidence =
            opinions_to_evidence(&output, EvidenceSource::DeepResearch, Confidence::Medium);
        assert_eq!(evidence.len(), 1);
        assert_eq!(evidence[0].title, "Smith v. Jones");
        assert_eq!(evidence[0].citation.as_deref(), Some("1 U.S. 1"));
        assert_eq!(evidence[0].confidence, Confidence::Medium);
    }

    #[test]
    fn test_opinions_to_evidence_malformed() {
        assert!(opinions_to_evidence("not json", EvidenceSource::CaseLaw, Confidence::High)
            .is_empty());
    }

    #[test]
    fn test_truncate() {
        assert_eq!(truncate("short", 10), "short");
        assert_eq!(truncate("abcdefghij", 3), "abc…");
    }

    #[test]
    fn test_check_cancelled_none() {
        assert!(check_cancelled(&None).is_ok());
    }

    #[test]
    fn test_check_cancelled_live_token() {
        let token = CancellationToken::new();
        assert!(check_cancelled(&Some(token)).is_ok());
    }

    #[test]
    fn test_check_cancelled_fired_token() {
        let token = CancellationToken::new();
        token.cancel();
        assert!(matches!(
            check_cancelled(&Some(token)),
            Err(ResearchError::Cancelled)
        ));
    }

    #[tokio::test]
    async fn test_gateway_call_timeout() {
        let fut = async {
            tokio::time::sleep(Duration::from_secs(5)).await;
            Ok::<_, GatewayError>("late".to_string())
        };
        let result = gateway_call(fut, Duration::from_millis(10), &None).await;
        assert!(matches!(result, Err(ResearchError::ServiceUnavailable(_))));
    }

    #[tokio::test]
    async fn test_gateway_call_cancellation_wins() {
        let token = CancellationToken::new();
        token.cancel();
        let fut = async { Ok::<_, GatewayError>("value".to_string()) };
        let result = gateway_call(fut, Duration::from_secs(1), &Some(token)).await;
        assert!(matches!(result, Err(ResearchError::Cancelled)));
    }

    #[tokio::test]
    async fn test_gateway_call_passthrough() {
        let fut = async { Ok::<_, GatewayError>(42) };
        let result = gateway_call(fut, Duration::from_secs(1), &None).await;
        assert_eq!(result.unwrap(), 42);
    }
}
