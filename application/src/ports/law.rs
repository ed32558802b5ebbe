//! Law source ports: case-law search and regulation text.
//!
//! These are the billed external databases. The tool dispatcher is their
//! only consumer; results flow through the tool-result cache.

use async_trait::async_trait;
use chrono::NaiveDate;
use lexora_domain::CaseOpinion;
use thiserror::Error;

/// Errors from the external law databases.
#[derive(Error, Debug)]
pub enum LawSourceError {
    #[error("HTTP error: {0}")]
    Http(String),

    #[error("Timeout")]
    Timeout,

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Malformed response: {0}")]
    Decode(String),
}

/// Optional date bounds for an opinion search.
#[derive(Debug, Clone, Copy, Default)]
pub struct DateRange {
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
}

/// Port for the case-law search capability.
#[async_trait]
pub trait CaseLawSearchPort: Send + Sync {
    async fn search_opinions(
        &self,
        query: &str,
        jurisdiction: &str,
        range: DateRange,
    ) -> Result<Vec<CaseOpinion>, LawSourceError>;
}

/// Port for the regulation text capability (CFR-style lookups).
#[async_trait]
pub trait RegulationPort: Send + Sync {
    async fn regulation_text(
        &self,
        title: &str,
        part: &str,
        section: &str,
    ) -> Result<String, LawSourceError>;
}
