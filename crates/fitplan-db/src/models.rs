use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// One proxied chat exchange, as persisted in the `chats` table.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct ChatRecord {
    pub id: Uuid,
    /// The user query, forwarded verbatim upstream.
    pub query: String,
    /// The assistant reply content.
    pub response: String,
    /// Upstream model name that produced the reply.
    pub model: String,
    pub created_at: DateTime<Utc>,
}

impl ChatRecord {
    /// First line of the query, shortened to `max_chars` for listings.
    pub fn query_preview(&self, max_chars: usize) -> String {
        let first_line = self.query.lines().next().unwrap_or_default();
        if first_line.chars().count() <= max_chars {
            return first_line.to_owned();
        }
        let mut preview: String = first_line.chars().take(max_chars).collect();
        preview.push_str("...");
        preview
    }
}
