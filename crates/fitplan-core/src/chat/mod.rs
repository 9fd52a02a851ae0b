//! Chat proxy: forward a query to an OpenAI-compatible completion API and
//! record the exchange.

pub mod client;
pub mod completer;
pub mod service;

use serde::{Deserialize, Serialize};

pub use client::{ChatConfig, OpenAiChatClient, UpstreamError};
pub use completer::ChatCompleter;
pub use service::{ChatError, ChatReply, chat_and_record};

/// One chat message as exchanged with the upstream API.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    /// `"user"` or `"assistant"`.
    pub role: String,
    pub content: String,
}

impl ChatMessage {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: "user".to_owned(),
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: "assistant".to_owned(),
            content: content.into(),
        }
    }
}
