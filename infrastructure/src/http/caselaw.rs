//! Case-law search adapter (CourtListener-style REST API).

use async_trait::async_trait;
use chrono::NaiveDate;
use lexora_application::ports::law::{CaseLawSearchPort, DateRange, LawSourceError};
use lexora_domain::CaseOpinion;
use serde::Deserialize;
use std::time::Duration;
use tracing::debug;

/// Search client for a CourtListener-compatible opinion database.
pub struct CourtListenerClient {
    http: reqwest::Client,
    base_url: String,
    api_token: Option<String>,
}

/// Wire shape of one search result.
#[derive(Debug, Deserialize)]
struct SearchResult {
    #[serde(default, alias = "caseName")]
    case_name: String,
    #[serde(default)]
    citation: Vec<String>,
    #[serde(default)]
    court: String,
    #[serde(default, alias = "dateFiled")]
    date_filed: Option<String>,
    #[serde(default)]
    snippet: String,
    #[serde(default)]
    absolute_url: String,
}

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    results: Vec<SearchResult>,
}

impl CourtListenerClient {
    pub fn new(
        base_url: impl Into<String>,
        api_token: Option<String>,
        timeout: Duration,
    ) -> Result<Self, LawSourceError> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| LawSourceError::Http(e.to_string()))?;

        Ok(Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_token,
        })
    }

    fn into_opinion(&self, result: SearchResult) -> CaseOpinion {
        let url = if result.absolute_url.starts_with("http") {
            result.absolute_url
        } else {
            format!("{}{}", self.base_url, result.absolute_url)
        };
        CaseOpinion {
            title: result.case_name,
            citation: result.citation.first().cloned().unwrap_or_default(),
            court: result.court,
            date: result
                .date_filed
                .as_deref()
                .and_then(|d| NaiveDate::parse_from_str(d, "%Y-%m-%d").ok()),
            summary: result.snippet,
            url,
        }
    }
}

fn map_reqwest_error(e: reqwest::Error) -> LawSourceError {
    if e.is_timeout() {
        LawSourceError::Timeout
    } else {
        LawSourceError::Http(e.to_string())
    }
}

#[async_trait]
impl CaseLawSearchPort for CourtListenerClient {
    async fn search_opinions(
        &self,
        query: &str,
        jurisdiction: &str,
        range: DateRange,
    ) -> Result<Vec<CaseOpinion>, LawSourceError> {
        let url = format!("{}/api/rest/v4/search/", self.base_url);

        let mut params: Vec<(&str, String)> =
            vec![("q", query.to_string()), ("type", "o".to_string())];
        if !jurisdiction.is_empty() {
            params.push(("court", jurisdiction.to_string()));
        }
        if let Some(from) = range.from {
            params.push(("filed_after", from.to_string()));
        }
        if let Some(to) = range.to {
            params.push(("filed_before", to.to_string()));
        }

        let mut request = self.http.get(&url).query(&params);
        if let Some(token) = &self.api_token {
            request = request.header("Authorization", format!("Token {}", token));
        }

        debug!(query, jurisdiction, "Case-law search request");

        let response = request.send().await.map_err(map_reqwest_error)?;
        let status = response.status();
        if !status.is_success() {
            return Err(LawSourceError::Http(format!(
                "search returned HTTP {}",
                status
            )));
        }

        let body: SearchResponse = response
            .json()
            .await
            .map_err(|e| LawSourceError::Decode(e.to_string()))?;

        Ok(body
            .results
            .into_iter()
            .map(|r| self.into_opinion(r))
            .collect())
    }
}
