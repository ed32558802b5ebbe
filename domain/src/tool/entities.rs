//! Tool domain entities.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::time::Duration;

const DAY: u64 = 24 * 60 * 60;

/// Caching behavior of a tool's results.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CachePolicy {
    /// Results come from a billed network service and MUST be cached for
    /// the given TTL.
    Cached { ttl_secs: u64 },
    /// Pure computation over caller-supplied data; caching is optional.
    Uncached,
}

impl CachePolicy {
    pub fn days(days: u64) -> Self {
        CachePolicy::Cached {
            ttl_secs: days * DAY,
        }
    }

    pub fn ttl(&self) -> Option<Duration> {
        match self {
            CachePolicy::Cached { ttl_secs } => Some(Duration::from_secs(*ttl_secs)),
            CachePolicy::Uncached => None,
        }
    }

    pub fn must_cache(&self) -> bool {
        matches!(self, CachePolicy::Cached { .. })
    }
}

/// Definition of a tool callable by the model.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolDefinition {
    /// Unique name (e.g. "search_case_law").
    pub name: String,
    /// Human-readable description; the model reads this to decide when to
    /// call the tool.
    pub description: String,
    /// Caching behavior for results of this tool.
    pub cache_policy: CachePolicy,
    /// Parameter specifications.
    pub parameters: Vec<ToolParameter>,
}

/// Parameter specification for a tool.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolParameter {
    pub name: String,
    pub description: String,
    pub required: bool,
    /// JSON type hint: "string", "number", "boolean", "array", "object".
    pub param_type: String,
}

impl ToolDefinition {
    pub fn new(
        name: impl Into<String>,
        description: impl Into<String>,
        cache_policy: CachePolicy,
    ) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            cache_policy,
            parameters: Vec::new(),
        }
    }

    pub fn with_parameter(mut self, param: ToolParameter) -> Self {
        self.parameters.push(param);
        self
    }

    /// Render this definition as an API-shaped tool schema.
    pub fn to_api_schema(&self) -> serde_json::Value {
        let mut properties = serde_json::Map::new();
        let mut required = Vec::new();
        for param in &self.parameters {
            properties.insert(
                param.name.clone(),
                serde_json::json!({
                    "type": param.param_type,
                    "description": param.description,
                }),
            );
            if param.required {
                required.push(serde_json::Value::String(param.name.clone()));
            }
        }

        serde_json::json!({
            "name": self.name,
            "description": self.description,
            "input_schema": {
                "type": "object",
                "properties": properties,
                "required": required,
            },
        })
    }
}

impl ToolParameter {
    pub fn new(name: impl Into<String>, description: impl Into<String>, required: bool) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            required,
            param_type: "string".to_string(),
        }
    }

    pub fn with_type(mut self, param_type: impl Into<String>) -> Self {
        self.param_type = param_type.into();
        self
    }
}

/// The registry container: the fixed set of tools exposed to the model.
///
/// Registered once at startup, read-only thereafter.
#[derive(Debug, Clone, Default)]
pub struct ToolSpec {
    tools: Vec<ToolDefinition>,
}

impl ToolSpec {
    pub fn new() -> Self {
        Self { tools: Vec::new() }
    }

    pub fn register(mut self, tool: ToolDefinition) -> Self {
        if !self.tools.iter().any(|t| t.name == tool.name) {
            self.tools.push(tool);
        }
        self
    }

    pub fn get(&self, name: &str) -> Option<&ToolDefinition> {
        self.tools.iter().find(|t| t.name == name)
    }

    pub fn all(&self) -> impl Iterator<Item = &ToolDefinition> {
        self.tools.iter()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.tools.iter().map(|t| t.name.as_str())
    }

    pub fn len(&self) -> usize {
        self.tools.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }

    /// Render all definitions as API-shaped tool schemas, in registration
    /// order.
    pub fn to_api_tools(&self) -> Vec<serde_json::Value> {
        self.tools.iter().map(|t| t.to_api_schema()).collect()
    }
}

/// A call to a tool with arguments, as requested by the model.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolCall {
    pub tool_name: String,
    pub arguments: HashMap<String, serde_json::Value>,
    /// API-assigned ID for correlating the result with the request.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub native_id: Option<String>,
}

impl ToolCall {
    pub fn new(tool_name: impl Into<String>) -> Self {
        Self {
            tool_name: tool_name.into(),
            arguments: HashMap::new(),
            native_id: None,
        }
    }

    pub fn from_native(
        id: impl Into<String>,
        name: impl Into<String>,
        input: HashMap<String, serde_json::Value>,
    ) -> Self {
        Self {
            tool_name: name.into(),
            arguments: input,
            native_id: Some(id.into()),
        }
    }

    pub fn with_arg(mut self, key: impl Into<String>, value: impl Into<serde_json::Value>) -> Self {
        self.arguments.insert(key.into(), value.into());
        self
    }

    pub fn get_string(&self, key: &str) -> Option<&str> {
        self.arguments.get(key).and_then(|v| v.as_str())
    }

    pub fn require_string(&self, key: &str) -> Result<&str, String> {
        self.get_string(key)
            .ok_or_else(|| format!("Missing required argument: {}", key))
    }

    pub fn get_i64(&self, key: &str) -> Option<i64> {
        self.arguments.get(key).and_then(|v| v.as_i64())
    }

    pub fn get_array(&self, key: &str) -> Option<&Vec<serde_json::Value>> {
        self.arguments.get(key).and_then(|v| v.as_array())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cache_policy() {
        let policy = CachePolicy::days(30);
        assert!(policy.must_cache());
        assert_eq!(policy.ttl(), Some(Duration::from_secs(30 * 24 * 60 * 60)));
        assert!(!CachePolicy::Uncached.must_cache());
        assert!(CachePolicy::Uncached.ttl().is_none());
    }

    #[test]
    fn test_tool_definition_schema() {
        let tool = ToolDefinition::new(
            "search_case_law",
            "Search judicial opinions",
            CachePolicy::days(30),
        )
        .with_parameter(ToolParameter::new("query", "Search query", true))
        .with_parameter(ToolParameter::new("jurisdiction", "Scope", false));

        let schema = tool.to_api_schema();
        assert_eq!(schema["name"], "search_case_law");
        assert_eq!(schema["input_schema"]["required"][0], "query");
        assert!(schema["input_schema"]["properties"]["jurisdiction"].is_object());
    }

    #[test]
    fn test_tool_spec_registration() {
        let spec = ToolSpec::new()
            .register(ToolDefinition::new("a", "A", CachePolicy::Uncached))
            .register(ToolDefinition::new("b", "B", CachePolicy::days(7)))
            .register(ToolDefinition::new("a", "duplicate", CachePolicy::Uncached));

        assert_eq!(spec.len(), 2);
        assert!(spec.get("a").is_some());
        assert_eq!(spec.get("a").unwrap().description, "A");
        assert!(spec.get("unknown").is_none());
        assert_eq!(spec.to_api_tools().len(), 2);
    }

    #[test]
    fn test_tool_call_arguments() {
        let call = ToolCall::new("check_deadline_status")
            .with_arg("date", "2025-06-01")
            .with_arg("limit", 5);

        assert_eq!(call.get_string("date"), Some("2025-06-01"));
        assert_eq!(call.get_i64("limit"), Some(5));
        assert!(call.require_string("missing").is_err());
    }

    #[test]
    fn test_tool_call_from_native() {
        let input: HashMap<String, serde_json::Value> =
            [("query".to_string(), serde_json::json!("breach"))]
                .into_iter()
                .collect();
        let call = ToolCall::from_native("toolu_1", "search_case_law", input);
        assert_eq!(call.native_id.as_deref(), Some("toolu_1"));
        assert_eq!(call.get_string("query"), Some("breach"));
    }
}
