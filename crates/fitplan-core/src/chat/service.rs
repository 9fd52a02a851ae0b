//! Chat service: ask the upstream model, then record the exchange.

use serde::Serialize;
use sqlx::PgPool;
use thiserror::Error;
use tracing::info;
use uuid::Uuid;

use fitplan_db::queries::chats::{self, NewChat};

use super::ChatMessage;
use super::completer::ChatCompleter;

/// Result of a recorded chat exchange.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatReply {
    /// The assistant message as returned upstream.
    pub data: ChatMessage,
    /// Id of the stored exchange.
    pub storage_id: Uuid,
}

/// Why a chat request failed.
#[derive(Debug, Error)]
pub enum ChatError {
    #[error("query required")]
    EmptyQuery,

    #[error("chat completion failed: {0:#}")]
    Upstream(anyhow::Error),

    #[error("failed to record chat: {0:#}")]
    Store(anyhow::Error),
}

/// Forward `query` to `completer`, persist `{query, response, model}`, and
/// return the reply with its storage id.
///
/// Steps run in sequence; any failure aborts the request and nothing is
/// retried. A failed upstream call stores nothing.
pub async fn chat_and_record(
    pool: &PgPool,
    completer: &dyn ChatCompleter,
    query: &str,
) -> Result<ChatReply, ChatError> {
    if query.trim().is_empty() {
        return Err(ChatError::EmptyQuery);
    }

    let data = completer
        .complete(query)
        .await
        .map_err(ChatError::Upstream)?;

    let record = chats::insert_chat(
        pool,
        &NewChat {
            query,
            response: &data.content,
            model: completer.model(),
        },
    )
    .await
    .map_err(ChatError::Store)?;

    info!(chat_id = %record.id, model = %record.model, "chat recorded");

    Ok(ChatReply {
        data,
        storage_id: record.id,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::anyhow;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct Failing {
        calls: AtomicUsize,
    }

    #[async_trait]
    impl ChatCompleter for Failing {
        fn model(&self) -> &str {
            "failing"
        }

        async fn complete(&self, _query: &str) -> anyhow::Result<ChatMessage> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Err(anyhow!("upstream exploded"))
        }
    }

    #[tokio::test]
    async fn blank_query_is_rejected_before_upstream() {
        let pool = fitplan_test_utils::unreachable_pool();
        let completer = Failing {
            calls: AtomicUsize::new(0),
        };
        let err = chat_and_record(&pool, &completer, "   ").await.unwrap_err();
        assert!(matches!(err, ChatError::EmptyQuery));
        assert_eq!(err.to_string(), "query required");
        assert_eq!(completer.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn upstream_failure_is_reported() {
        let pool = fitplan_test_utils::unreachable_pool();
        let completer = Failing {
            calls: AtomicUsize::new(0),
        };
        let err = chat_and_record(&pool, &completer, "hi").await.unwrap_err();
        assert!(matches!(err, ChatError::Upstream(_)));
        assert!(err.to_string().contains("upstream exploded"));
    }

    #[test]
    fn reply_serializes_storage_id_in_camel_case() {
        let reply = ChatReply {
            data: ChatMessage::assistant("Rest 48 hours."),
            storage_id: Uuid::nil(),
        };
        let json = serde_json::to_value(&reply).unwrap();
        assert_eq!(json["data"]["role"], "assistant");
        assert_eq!(json["data"]["content"], "Rest 48 hours.");
        assert_eq!(json["storageId"], Uuid::nil().to_string());
    }
}
