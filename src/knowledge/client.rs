use crate::error::ApiError;
use crate::knowledge::contract::KnowledgeService;
use async_trait::async_trait;
use reqwest::header::{ACCEPT, AUTHORIZATION, CONTENT_TYPE};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::time::Duration;

const NO_ANSWER_PREFIX: &str = "Sorry, no answer was returned. ";

fn default_base_url() -> String {
    "http://api-knowledgebase.mlp.cn-beijing.volces.com".to_string()
}

fn default_chat_path() -> String {
    "/api/knowledge/service/chat".to_string()
}

fn default_timeout_secs() -> u64 {
    30
}

/// Knowledge service connection settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KnowledgeConfig {
    /// Scheme and host, without a trailing path.
    #[serde(default = "default_base_url")]
    pub base_url: String,

    #[serde(default = "default_chat_path")]
    pub chat_path: String,

    /// Bearer token. Usually supplied as `AGENTBOOK_KNOWLEDGE__API_KEY`.
    #[serde(default, skip_serializing)]
    pub api_key: Option<String>,

    #[serde(default)]
    pub service_resource_id: String,

    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for KnowledgeConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            chat_path: default_chat_path(),
            api_key: None,
            service_resource_id: String::new(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl KnowledgeConfig {
    pub fn endpoint(&self) -> String {
        format!(
            "{}/{}",
            self.base_url.trim_end_matches('/'),
            self.chat_path.trim_start_matches('/')
        )
    }
}

/// Request body for one non-streaming user message.
pub fn build_request_body(service_resource_id: &str, query: &str) -> Value {
    json!({
        "service_resource_id": service_resource_id,
        "messages": [
            {
                "role": "user",
                "content": query
            }
        ],
        "stream": false
    })
}

/// Pull `data.message.content` out of a response body.
///
/// A body without that path yields the "no answer" text followed by the raw
/// body; a body that is not JSON yields an `Error:` line.
pub fn extract_reply(body: &str) -> String {
    let value: Value = match serde_json::from_str(body) {
        Ok(v) => v,
        Err(e) => return format!("Error: invalid response from knowledge service: {}", e),
    };
    match value
        .get("data")
        .and_then(|data| data.get("message"))
        .and_then(|message| message.get("content"))
    {
        Some(Value::String(content)) => content.clone(),
        Some(Value::Null) | None => format!("{}{}", NO_ANSWER_PREFIX, body),
        Some(other) => other.to_string(),
    }
}

/// reqwest-backed knowledge service client.
#[derive(Debug, Clone)]
pub struct HttpKnowledgeClient {
    client: reqwest::Client,
    config: KnowledgeConfig,
}

impl HttpKnowledgeClient {
    pub fn new(config: KnowledgeConfig) -> Result<Self, ApiError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| ApiError::ConfigError(format!("Failed to build HTTP client: {}", e)))?;
        Ok(Self { client, config })
    }

    async fn send(&self, query: &str) -> Result<String, String> {
        let api_key = self
            .config
            .api_key
            .as_deref()
            .filter(|key| !key.trim().is_empty())
            .ok_or_else(|| "knowledge.api_key is not configured".to_string())?;

        let body = build_request_body(&self.config.service_resource_id, query);
        let response = self
            .client
            .post(self.config.endpoint())
            .header(ACCEPT, "application/json")
            .header(CONTENT_TYPE, "application/json;charset=UTF-8")
            .header(AUTHORIZATION, format!("Bearer {}", api_key))
            .body(body.to_string())
            .send()
            .await
            .map_err(|e| e.to_string())?;

        let status = response.status();
        let bytes = response.bytes().await.map_err(|e| e.to_string())?;
        tracing::debug!("Knowledge service answered {} ({} bytes)", status, bytes.len());
        Ok(String::from_utf8_lossy(&bytes).into_owned())
    }
}

#[async_trait]
impl KnowledgeService for HttpKnowledgeClient {
    async fn chat(&self, query: &str) -> String {
        match self.send(query).await {
            Ok(body) => extract_reply(&body),
            Err(e) => {
                tracing::warn!("Knowledge service request failed: {}", e);
                format!("Error: {}", e)
            }
        }
    }
}
