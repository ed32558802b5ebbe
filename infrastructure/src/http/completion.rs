//! Completion capability adapter: a messages-style HTTP API with native
//! tool use.
//!
//! The API is stateless, so each session manages its own conversation
//! history locally and replays it on every call. Tool definitions are
//! pinned to the session the first time `send_with_tools` runs.

use async_trait::async_trait;
use lexora_application::ports::completion::{
    CompletionGateway, CompletionSession, GatewayError, ToolResultMessage,
};
use lexora_domain::{CompletionResponse, ContentBlock, StopReason};
use serde_json::{json, Value};
use std::collections::HashMap;
use std::time::Duration;
use tokio::sync::Mutex;
use tracing::debug;

/// Gateway for a messages-API completion provider.
pub struct MessagesApiGateway {
    http: reqwest::Client,
    base_url: String,
    api_key: String,
    model: String,
    max_tokens: u32,
}

impl MessagesApiGateway {
    pub fn new(
        base_url: impl Into<String>,
        api_key: impl Into<String>,
        model: impl Into<String>,
        max_tokens: u32,
        timeout: Duration,
    ) -> Result<Self, GatewayError> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| GatewayError::ConnectionError(e.to_string()))?;

        Ok(Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key: api_key.into(),
            model: model.into(),
            max_tokens,
        })
    }
}

#[async_trait]
impl CompletionGateway for MessagesApiGateway {
    async fn create_session(
        &self,
        system_prompt: &str,
    ) -> Result<Box<dyn CompletionSession>, GatewayError> {
        Ok(Box::new(MessagesApiSession {
            http: self.http.clone(),
            url: format!("{}/v1/messages", self.base_url),
            api_key: self.api_key.clone(),
            model: self.model.clone(),
            max_tokens: self.max_tokens,
            system_prompt: system_prompt.to_string(),
            messages: Mutex::new(Vec::new()),
            tools: Mutex::new(None),
        }))
    }
}

/// One conversation against the stateless messages API.
struct MessagesApiSession {
    http: reqwest::Client,
    url: String,
    api_key: String,
    model: String,
    max_tokens: u32,
    system_prompt: String,
    /// Full history, replayed on every call.
    messages: Mutex<Vec<Value>>,
    /// Tool definitions, pinned on first `send_with_tools`.
    tools: Mutex<Option<Vec<Value>>>,
}

impl MessagesApiSession {
    /// Append a user message, call the API, append the assistant reply.
    async fn round_trip(&self, user_content: Value) -> Result<CompletionResponse, GatewayError> {
        let mut messages = self.messages.lock().await;
        messages.push(json!({ "role": "user", "content": user_content }));

        let mut body = json!({
            "model": self.model,
            "max_tokens": self.max_tokens,
            "system": self.system_prompt,
            "messages": *messages,
        });
        if let Some(tools) = self.tools.lock().await.as_ref() {
            body["tools"] = Value::Array(tools.clone());
        }

        debug!(model = %self.model, history = messages.len(), "Completion request");

        let response = self
            .http
            .post(&self.url)
            .header("x-api-key", &self.api_key)
            .header("content-type", "application/json")
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    GatewayError::Timeout
                } else {
                    GatewayError::ConnectionError(e.to_string())
                }
            })?;

        let status = response.status();
        let payload: Value = response
            .json()
            .await
            .map_err(|e| GatewayError::RequestFailed(e.to_string()))?;

        if !status.is_success() {
            let detail = payload["error"]["message"]
                .as_str()
                .unwrap_or("unknown provider error");
            return Err(GatewayError::RequestFailed(format!(
                "HTTP {}: {}",
                status, detail
            )));
        }

        // History needs the assistant turn verbatim so tool-use IDs stay
        // correlated on the next call.
        if let Some(content) = payload.get("content") {
            messages.push(json!({ "role": "assistant", "content": content.clone() }));
        }

        parse_response(&payload)
    }
}

/// Structured parsing of the provider payload. Always attempted first; a
/// payload without recognizable blocks falls back to an empty text
/// response rather than being half-merged with the structured path.
fn parse_response(payload: &Value) -> Result<CompletionResponse, GatewayError> {
    let Some(blocks) = payload["content"].as_array() else {
        // Text fallback: some providers return a bare string body.
        let text = payload["completion"].as_str().unwrap_or_default();
        return Ok(CompletionResponse::from_text(text));
    };

    let mut content = Vec::with_capacity(blocks.len());
    for block in blocks {
        match block["type"].as_str() {
            Some("text") => {
                content.push(ContentBlock::Text(
                    block["text"].as_str().unwrap_or_default().to_string(),
                ));
            }
            Some("tool_use") => {
                let input: HashMap<String, Value> = block["input"]
                    .as_object()
                    .map(|m| m.iter().map(|(k, v)| (k.clone(), v.clone())).collect())
                    .unwrap_or_default();
                content.push(ContentBlock::ToolUse {
                    id: block["id"].as_str().unwrap_or_default().to_string(),
                    name: block["name"].as_str().unwrap_or_default().to_string(),
                    input,
                });
            }
            _ => {}
        }
    }

    let stop_reason = payload["stop_reason"].as_str().map(|s| match s {
        "end_turn" => StopReason::EndTurn,
        "tool_use" => StopReason::ToolUse,
        "max_tokens" => StopReason::MaxTokens,
        other => StopReason::Other(other.to_string()),
    });

    Ok(CompletionResponse {
        content,
        stop_reason,
        model: payload["model"].as_str().map(String::from),
    })
}

#[async_trait]
impl CompletionSession for MessagesApiSession {
    async fn send(&self, content: &str) -> Result<String, GatewayError> {
        let response = self.round_trip(Value::String(content.to_string())).await?;
        Ok(response.text_content())
    }

    async fn send_with_tools(
        &self,
        content: &str,
        tools: &[Value],
    ) -> Result<CompletionResponse, GatewayError> {
        {
            let mut pinned = self.tools.lock().await;
            if pinned.is_none() {
                *pinned = Some(tools.to_vec());
            }
        }
        self.round_trip(Value::String(content.to_string())).await
    }

    async fn send_tool_results(
        &self,
        results: &[ToolResultMessage],
    ) -> Result<CompletionResponse, GatewayError> {
        let blocks: Vec<Value> = results
            .iter()
            .map(|r| {
                json!({
                    "type": "tool_result",
                    "tool_use_id": r.tool_use_id,
                    "content": r.output,
                    "is_error": r.is_error,
                })
            })
            .collect();
        self.round_trip(Value::Array(blocks)).await
    }
}
