//! Tool domain: definitions, calls, results and the registry container.

pub mod entities;
pub mod names;
pub mod value_objects;

pub use entities::{CachePolicy, ToolCall, ToolDefinition, ToolParameter, ToolSpec};
pub use value_objects::{ToolError, ToolResult};
