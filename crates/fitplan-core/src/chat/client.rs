//! OpenAI-compatible chat completion client.
//!
//! Sends `POST {base_url}/chat/completions` with a single user message and
//! returns the first choice. No streaming, no retries.

use std::time::Duration;

use anyhow::Result;
use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use super::ChatMessage;
use super::completer::ChatCompleter;

const CONNECT_TIMEOUT_SECS: u64 = 10;
const REQUEST_TIMEOUT_SECS: u64 = 120;

// ---------------------------------------------------------------------------
// Configuration
// ---------------------------------------------------------------------------

/// Upstream API settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatConfig {
    /// API root, e.g. `https://api.openai.com/v1`.
    pub base_url: String,
    /// Bearer token. `None` for servers that need no auth.
    pub api_key: Option<String>,
    pub model: String,
}

impl ChatConfig {
    pub const BASE_URL_ENV: &str = "FITPLAN_AI_BASE_URL";
    pub const API_KEY_ENV: &str = "FITPLAN_AI_API_KEY";
    pub const MODEL_ENV: &str = "FITPLAN_AI_MODEL";

    pub const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";
    pub const DEFAULT_MODEL: &str = "gpt-4o-mini";

    fn completions_url(&self) -> String {
        format!("{}/chat/completions", self.base_url.trim_end_matches('/'))
    }
}

impl Default for ChatConfig {
    fn default() -> Self {
        Self {
            base_url: Self::DEFAULT_BASE_URL.to_owned(),
            api_key: None,
            model: Self::DEFAULT_MODEL.to_owned(),
        }
    }
}

// ---------------------------------------------------------------------------
// Wire types
// ---------------------------------------------------------------------------

#[derive(Debug, Serialize)]
struct CompletionRequest<'a> {
    model: &'a str,
    messages: [ChatMessage; 1],
}

#[derive(Debug, Deserialize)]
struct CompletionResponse {
    #[serde(default)]
    choices: Vec<CompletionChoice>,
}

#[derive(Debug, Deserialize)]
struct CompletionChoice {
    message: ResponseMessage,
}

#[derive(Debug, Deserialize)]
struct ResponseMessage {
    #[serde(default)]
    role: Option<String>,
    #[serde(default)]
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ErrorResponse {
    error: ErrorDetail,
}

#[derive(Debug, Deserialize)]
struct ErrorDetail {
    message: String,
}

/// Failures talking to the upstream API.
#[derive(Debug, Error)]
pub enum UpstreamError {
    #[error("chat request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("chat API returned {status}: {message}")]
    Status { status: StatusCode, message: String },

    #[error("chat API returned no choices")]
    NoChoices,
}

impl UpstreamError {
    fn from_status(status: StatusCode, body: &str) -> Self {
        let message = serde_json::from_str::<ErrorResponse>(body)
            .map(|e| e.error.message)
            .unwrap_or_else(|_| body.chars().take(200).collect());
        Self::Status { status, message }
    }
}

// ---------------------------------------------------------------------------
// Client
// ---------------------------------------------------------------------------

/// [`ChatCompleter`] backed by an OpenAI-compatible HTTP endpoint.
#[derive(Debug, Clone)]
pub struct OpenAiChatClient {
    client: Client,
    config: ChatConfig,
}

impl OpenAiChatClient {
    pub fn new(config: ChatConfig) -> Result<Self, UpstreamError> {
        let client = Client::builder()
            .connect_timeout(Duration::from_secs(CONNECT_TIMEOUT_SECS))
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()?;
        Ok(Self { client, config })
    }

    pub fn config(&self) -> &ChatConfig {
        &self.config
    }

    async fn send(&self, query: &str) -> Result<ChatMessage, UpstreamError> {
        let body = CompletionRequest {
            model: &self.config.model,
            messages: [ChatMessage::user(query)],
        };

        let mut request = self.client.post(self.config.completions_url()).json(&body);
        if let Some(key) = &self.config.api_key {
            request = request.bearer_auth(key);
        }

        debug!(model = %self.config.model, query_len = query.len(), "sending chat completion");
        let response = request.send().await?;
        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            return Err(UpstreamError::from_status(status, &text));
        }

        let completion: CompletionResponse = response.json().await?;
        let choice = completion
            .choices
            .into_iter()
            .next()
            .ok_or(UpstreamError::NoChoices)?;

        Ok(ChatMessage {
            role: choice.message.role.unwrap_or_else(|| "assistant".to_owned()),
            content: choice.message.content.unwrap_or_default(),
        })
    }
}

#[async_trait]
impl ChatCompleter for OpenAiChatClient {
    fn model(&self) -> &str {
        &self.config.model
    }

    async fn complete(&self, query: &str) -> Result<ChatMessage> {
        Ok(self.send(query).await?)
    }
}
