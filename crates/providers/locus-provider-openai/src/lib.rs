//! OpenAI-compatible chat provider for Locus
//!
//! Sends the intent prompt to `{base_url}/chat/completions` as one system and
//! one user message and returns the first choice's content. Any server speaking
//! the OpenAI chat completions protocol works by pointing `base_url` at it.

#![warn(missing_docs)]
#![warn(clippy::all)]

use async_trait::async_trait;
use locus_core::config::ChatConfig;
use locus_core::{ChatModel, ChatPrompt, LocusError, Result};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::sync::OnceLock;
use std::time::Duration;
use tracing::debug;

/// Shared HTTP client for connection pooling
static HTTP_CLIENT: OnceLock<Client> = OnceLock::new();

/// Get or initialize the shared HTTP client
fn get_http_client() -> Client {
    HTTP_CLIENT
        .get_or_init(|| {
            Client::builder()
                .pool_max_idle_per_host(20)
                .pool_idle_timeout(Duration::from_secs(300))
                .tcp_keepalive(Duration::from_secs(60))
                .timeout(Duration::from_secs(60))
                .build()
                .unwrap_or_default()
        })
        .clone()
}

/// Default timeout for one completion request
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// OpenAI chat completions client
pub struct OpenAiChatModel {
    client: Client,
    api_key: String,
    config: ChatConfig,
    timeout: Duration,
}

impl OpenAiChatModel {
    /// Create a client with default model settings
    pub fn new(api_key: String) -> Self {
        Self::with_config(api_key, ChatConfig::default())
    }

    /// Create a client with explicit model settings
    pub fn with_config(api_key: String, config: ChatConfig) -> Self {
        Self {
            client: get_http_client(),
            api_key,
            config,
            timeout: DEFAULT_REQUEST_TIMEOUT,
        }
    }

    /// Create a client from configuration; fails when no API key is set
    pub fn from_config(config: &ChatConfig) -> Result<Self> {
        let api_key = config
            .api_key
            .clone()
            .ok_or_else(|| LocusError::config("OpenAI API key is not configured"))?;
        Ok(Self::with_config(api_key, config.clone()))
    }

    /// Override the per-request timeout
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Model name sent with each request
    pub fn model(&self) -> &str {
        &self.config.model
    }

    fn build_request(&self, prompt: ChatPrompt) -> ChatRequest {
        ChatRequest {
            model: self.config.model.clone(),
            messages: vec![
                ChatMessage {
                    role: "system".to_string(),
                    content: prompt.system,
                },
                ChatMessage {
                    role: "user".to_string(),
                    content: prompt.user,
                },
            ],
            temperature: Some(self.config.temperature),
            max_tokens: Some(self.config.max_tokens),
            response_format: self.config.json_mode.then(|| ResponseFormat {
                kind: "json_object".to_string(),
            }),
        }
    }
}

#[derive(Debug, Serialize)]
struct ChatRequest {
    model: String,
    messages: Vec<ChatMessage>,
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_tokens: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    response_format: Option<ResponseFormat>,
}

#[derive(Debug, Serialize)]
struct ResponseFormat {
    #[serde(rename = "type")]
    kind: String,
}

#[derive(Debug, Serialize)]
struct ChatMessage {
    role: String,
    content: String,
}

#[derive(Debug, Deserialize)]
struct ReplyMessage {
    /// Null for refusals and tool-only replies
    #[serde(default)]
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ReplyMessage,
}

#[async_trait]
impl ChatModel for OpenAiChatModel {
    async fn complete(&self, prompt: ChatPrompt) -> Result<String> {
        let request = self.build_request(prompt);
        debug!("Requesting completion from {}", request.model);

        let resp = self
            .client
            .post(format!(
                "{}/chat/completions",
                self.config.base_url.trim_end_matches('/')
            ))
            .header("Authorization", format!("Bearer {}", self.api_key))
            .header("Content-Type", "application/json")
            .timeout(self.timeout)
            .json(&request)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    LocusError::timeout("OpenAI request timed out")
                } else {
                    LocusError::provider(e.to_string())
                }
            })?;

        if !resp.status().is_success() {
            let status = resp.status();
            let error_text = resp.text().await.unwrap_or_default();
            return Err(LocusError::provider(format!(
                "OpenAI API error ({}): {}",
                status, error_text
            )));
        }

        let body: ChatResponse = resp
            .json()
            .await
            .map_err(|e| LocusError::provider(format!("OpenAI returned a malformed body: {e}")))?;

        body.choices
            .into_iter()
            .next()
            .map(|choice| choice.message.content.unwrap_or_default())
            .ok_or_else(|| LocusError::provider("OpenAI returned no choices"))
    }
}
