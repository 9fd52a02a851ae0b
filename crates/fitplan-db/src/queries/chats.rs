//! Database query functions for the `chats` table.

use anyhow::{Context, Result};
use sqlx::PgPool;
use uuid::Uuid;

use crate::models::ChatRecord;

/// Parameters for inserting a new chat row.
#[derive(Debug, Clone)]
pub struct NewChat<'a> {
    pub query: &'a str,
    pub response: &'a str,
    pub model: &'a str,
}

/// Insert a chat exchange. Returns the inserted row with server-generated
/// defaults (id, created_at).
pub async fn insert_chat(pool: &PgPool, new: &NewChat<'_>) -> Result<ChatRecord> {
    let chat = sqlx::query_as::<_, ChatRecord>(
        "INSERT INTO chats (query, response, model) \
         VALUES ($1, $2, $3) \
         RETURNING *",
    )
    .bind(new.query)
    .bind(new.response)
    .bind(new.model)
    .fetch_one(pool)
    .await
    .context("failed to insert chat")?;

    Ok(chat)
}

/// Fetch a chat exchange by its ID.
pub async fn get_chat(pool: &PgPool, id: Uuid) -> Result<Option<ChatRecord>> {
    let chat = sqlx::query_as::<_, ChatRecord>("SELECT * FROM chats WHERE id = $1")
        .bind(id)
        .fetch_optional(pool)
        .await
        .context("failed to fetch chat")?;

    Ok(chat)
}

/// List the most recent chat exchanges, newest first.
pub async fn list_recent_chats(pool: &PgPool, limit: i64) -> Result<Vec<ChatRecord>> {
    let chats = sqlx::query_as::<_, ChatRecord>(
        "SELECT * FROM chats ORDER BY created_at DESC, id LIMIT $1",
    )
    .bind(limit)
    .fetch_all(pool)
    .await
    .context("failed to list chats")?;

    Ok(chats)
}

/// Count all stored chat exchanges.
pub async fn count_chats(pool: &PgPool) -> Result<i64> {
    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM chats")
        .fetch_one(pool)
        .await
        .context("failed to count chats")?;

    Ok(count)
}
