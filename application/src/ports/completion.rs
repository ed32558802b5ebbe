//! Completion gateway port.
//!
//! Defines how the application layer talks to the text-completion
//! capability. Adapters live in the infrastructure layer. The port is
//! deliberately narrow: the tool dispatcher never sees it, which keeps
//! the dependency graph acyclic.

use async_trait::async_trait;
use lexora_domain::CompletionResponse;
use thiserror::Error;

/// Errors from the completion capability.
///
/// All of these are fatal to the current research round: the orchestrator
/// transitions to its failed state and surfaces "research service
/// unavailable" to the caller.
#[derive(Error, Debug)]
pub enum GatewayError {
    #[error("Connection error: {0}")]
    ConnectionError(String),

    #[error("Request failed: {0}")]
    RequestFailed(String),

    #[error("Model not available: {0}")]
    ModelNotAvailable(String),

    #[error("Timeout")]
    Timeout,

    #[error("Other error: {0}")]
    Other(String),
}

/// Gateway for creating completion sessions.
#[async_trait]
pub trait CompletionGateway: Send + Sync {
    /// Create a new session seeded with a system prompt.
    async fn create_session(
        &self,
        system_prompt: &str,
    ) -> Result<Box<dyn CompletionSession>, GatewayError>;
}

/// A tool result sent back to the model, correlated by the API-assigned
/// tool-use ID.
#[derive(Debug, Clone)]
pub struct ToolResultMessage {
    pub tool_use_id: String,
    pub tool_name: String,
    pub output: String,
    pub is_error: bool,
}

/// An active completion session holding conversation history.
#[async_trait]
pub trait CompletionSession: Send + Sync {
    /// Send a plain message and get the text of the response.
    async fn send(&self, content: &str) -> Result<String, GatewayError>;

    /// Send a message with tool definitions; the response may contain
    /// tool-use requests.
    async fn send_with_tools(
        &self,
        content: &str,
        tools: &[serde_json::Value],
    ) -> Result<CompletionResponse, GatewayError>;

    /// Send executed tool results back for the next round.
    async fn send_tool_results(
        &self,
        results: &[ToolResultMessage],
    ) -> Result<CompletionResponse, GatewayError>;
}
