//! Tool executor port.
//!
//! Defines how the orchestrator executes the tools the model requests.
//! The dispatcher implementation (with caching and failure containment)
//! lives in the infrastructure layer.

use async_trait::async_trait;
use lexora_domain::tool::{
    entities::{ToolCall, ToolDefinition, ToolSpec},
    value_objects::ToolResult,
};

/// Port for tool execution.
///
/// `execute` never fails at the Rust level: every execution problem is
/// captured inside the returned [`ToolResult`] so the model can see the
/// failure and adapt instead of the session aborting.
#[async_trait]
pub trait ToolExecutorPort: Send + Sync {
    /// The fixed specification of all available tools.
    fn tool_spec(&self) -> &ToolSpec;

    fn has_tool(&self, name: &str) -> bool {
        self.tool_spec().get(name).is_some()
    }

    fn get_tool(&self, name: &str) -> Option<&ToolDefinition> {
        self.tool_spec().get(name)
    }

    /// Execute a tool call.
    async fn execute(&self, call: &ToolCall) -> ToolResult;
}
