//! Research progress notification port.
//!
//! Implementations live in the presentation layer (console, SSE stream).

use serde::{Deserialize, Serialize};

/// The step of the research pipeline an event refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StepType {
    QueryAnalysis,
    DatabaseSearch,
    AiAnalysis,
    ResponseGeneration,
}

impl StepType {
    pub fn as_str(&self) -> &str {
        match self {
            StepType::QueryAnalysis => "query_analysis",
            StepType::DatabaseSearch => "database_search",
            StepType::AiAnalysis => "ai_analysis",
            StepType::ResponseGeneration => "response_generation",
        }
    }
}

/// Kind of progress event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProgressEventType {
    Progress,
    Complete,
    Error,
}

/// One progress event emitted as the research loop advances.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProgressEvent {
    pub event_type: ProgressEventType,
    pub step_type: StepType,
    pub message: String,
    pub progress_percent: u8,
}

impl ProgressEvent {
    pub fn progress(step_type: StepType, message: impl Into<String>, percent: u8) -> Self {
        Self {
            event_type: ProgressEventType::Progress,
            step_type,
            message: message.into(),
            progress_percent: percent.min(100),
        }
    }

    pub fn complete(step_type: StepType, message: impl Into<String>) -> Self {
        Self {
            event_type: ProgressEventType::Complete,
            step_type,
            message: message.into(),
            progress_percent: 100,
        }
    }

    pub fn error(step_type: StepType, message: impl Into<String>) -> Self {
        Self {
            event_type: ProgressEventType::Error,
            step_type,
            message: message.into(),
            progress_percent: 100,
        }
    }
}

/// Callback for progress updates during a research session.
pub trait ResearchProgressNotifier: Send + Sync {
    fn on_event(&self, event: &ProgressEvent);

    /// Called when the model requests a tool.
    fn on_tool_call(&self, _tool_name: &str) {}

    /// Called when a tool result is ready.
    fn on_tool_result(&self, _tool_name: &str, _success: bool, _cache_hit: bool) {}
}

/// No-op notifier for when progress reporting is not needed.
pub struct NoProgress;

impl ResearchProgressNotifier for NoProgress {
    fn on_event(&self, _event: &ProgressEvent) {}
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_percent_is_clamped() {
        let event = ProgressEvent::progress(StepType::AiAnalysis, "working", 150);
        assert_eq!(event.progress_percent, 100);
    }

    #[test]
    fn test_event_serialization_shape() {
        let event = ProgressEvent::complete(StepType::DatabaseSearch, "done");
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["event_type"], "complete");
        assert_eq!(json["step_type"], "database_search");
        assert_eq!(json["progress_percent"], 100);
    }
}
