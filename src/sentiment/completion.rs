//! Chat-completion backends
//! 聊天补全后端
//!
//! `ChatCompletionClient` speaks the OpenAI-compatible
//! `POST /chat/completions` protocol (Groq in the default configuration).

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};

use super::config::ApiKey;
use super::error::CompletionError;

/// One conversation turn / 一条对话消息
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: String,
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: "system".to_string(),
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: "user".to_string(),
            content: content.into(),
        }
    }
}

/// Outbound request body / 出站请求体
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChatCompletionRequest {
    pub model: String,
    pub messages: Vec<ChatMessage>,
    pub temperature: f32,
    pub max_tokens: u32,
}

/// A backend able to turn a chat request into completion text
/// 能将聊天请求转换为补全文本的后端
#[async_trait]
pub trait CompletionBackend: Send + Sync {
    fn name(&self) -> &str;

    /// Returns the content of the first choice / 返回第一个choice的内容
    async fn complete(&self, req: &ChatCompletionRequest) -> Result<String, CompletionError>;
}

/// OpenAI-compatible chat completion client / OpenAI兼容的聊天补全客户端
pub struct ChatCompletionClient {
    name: String,
    api_url: String,
    api_key: ApiKey,
    timeout: Duration,
}

impl ChatCompletionClient {
    pub fn new(
        name: impl Into<String>,
        api_url: impl Into<String>,
        api_key: ApiKey,
        timeout: Duration,
    ) -> Self {
        Self {
            name: name.into(),
            api_url: api_url.into(),
            api_key,
            timeout,
        }
    }

    pub fn api_url(&self) -> &str {
        &self.api_url
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    fn extract_openai_error_message(json: &Value) -> Option<String> {
        let e = json.get("error")?;
        let msg = e.get("message").and_then(|v| v.as_str()).unwrap_or("");
        let ty = e.get("type").and_then(|v| v.as_str()).unwrap_or("");
        let parts: Vec<&str> = [ty, msg].into_iter().filter(|s| !s.is_empty()).collect();
        if parts.is_empty() {
            None
        } else {
            Some(parts.join(": "))
        }
    }

    fn first_choice_content(envelope: &Value) -> Result<String, CompletionError> {
        let choice = envelope
            .get("choices")
            .ok_or_else(|| CompletionError::invalid_response("missing key 'choices'"))?
            .get(0)
            .ok_or_else(|| CompletionError::invalid_response("empty 'choices'"))?;
        let content = choice
            .get("message")
            .ok_or_else(|| CompletionError::invalid_response("missing key 'message'"))?
            .get("content")
            .ok_or_else(|| CompletionError::invalid_response("missing key 'content'"))?;
        match content {
            Value::String(s) => Ok(s.clone()),
            Value::Null => Err(CompletionError::invalid_response("null 'content'")),
            other => Ok(other.to_string()),
        }
    }
}

#[async_trait]
impl CompletionBackend for ChatCompletionClient {
    fn name(&self) -> &str {
        &self.name
    }

    async fn complete(&self, req: &ChatCompletionRequest) -> Result<String, CompletionError> {
        // Client scope is per call and dropped on every exit path.
        let client = reqwest::Client::builder()
            .timeout(self.timeout)
            .build()
            .map_err(|e| CompletionError::transport(e.to_string()))?;

        let started = Instant::now();
        let resp = client
            .post(&self.api_url)
            .header("content-type", "application/json")
            .header("authorization", format!("Bearer {}", self.api_key.expose()))
            .json(req)
            .send()
            .await?;

        let status = resp.status().as_u16();
        let body = resp.bytes().await?;
        info!(
            backend = %self.name,
            status,
            elapsed_ms = started.elapsed().as_millis() as u64,
            "completion response received"
        );

        if !(200..300).contains(&status) {
            let detail = serde_json::from_slice::<Value>(&body)
                .ok()
                .as_ref()
                .and_then(Self::extract_openai_error_message);
            warn!(backend = %self.name, status, "upstream returned non-success status");
            return Err(CompletionError::transport(match detail {
                Some(m) => format!("upstream status: {}: {}", status, m),
                None => format!("upstream status: {}", status),
            }));
        }

        let envelope = serde_json::from_slice::<Value>(&body).map_err(|e| {
            CompletionError::invalid_response(format!("invalid completion envelope: {}", e))
        })?;
        let content = Self::first_choice_content(&envelope)?;
        debug!(backend = %self.name, bytes = content.len(), "completion content extracted");
        Ok(content)
    }
}
