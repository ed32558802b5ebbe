//! Regulation text adapter (eCFR-style REST API).

use async_trait::async_trait;
use lexora_application::ports::law::{LawSourceError, RegulationPort};
use serde::Deserialize;
use std::time::Duration;
use tracing::debug;

/// Client for an eCFR-compatible regulation text service.
pub struct EcfrClient {
    http: reqwest::Client,
    base_url: String,
}

#[derive(Debug, Deserialize)]
struct SectionResponse {
    #[serde(default)]
    heading: String,
    text: String,
}

impl EcfrClient {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self, LawSourceError> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| LawSourceError::Http(e.to_string()))?;

        Ok(Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }
}

#[async_trait]
impl RegulationPort for EcfrClient {
    async fn regulation_text(
        &self,
        title: &str,
        part: &str,
        section: &str,
    ) -> Result<String, LawSourceError> {
        let url = format!(
            "{}/api/current/title-{}/part-{}/section-{}.{}",
            self.base_url, title, part, part, section
        );

        debug!(title, part, section, "Regulation text request");

        let response = self.http.get(&url).send().await.map_err(|e| {
            if e.is_timeout() {
                LawSourceError::Timeout
            } else {
                LawSourceError::Http(e.to_string())
            }
        })?;

        let status = response.status();
        if status == reqwest::StatusCode::NOT_FOUND {
            return Err(LawSourceError::NotFound(format!(
                "{} CFR {}.{}",
                title, part, section
            )));
        }
        if !status.is_success() {
            return Err(LawSourceError::Http(format!(
                "regulation service returned HTTP {}",
                status
            )));
        }

        let body: SectionResponse = response
            .json()
            .await
            .map_err(|e| LawSourceError::Decode(e.to_string()))?;

        if body.heading.is_empty() {
            Ok(body.text)
        } else {
            Ok(format!("{}\n\n{}", body.heading, body.text))
        }
    }
}
