//! `fitplan chat` and `fitplan history`: one-shot chat through the proxy
//! service and a listing of recorded exchanges.

use anyhow::{Result, bail};
use sqlx::PgPool;

use fitplan_core::chat::{ChatCompleter, chat_and_record};
use fitplan_db::models::ChatRecord;
use fitplan_db::queries::chats;

const PREVIEW_CHARS: usize = 48;

/// Send `query` upstream, record it, and print the reply.
pub async fn run_chat(pool: &PgPool, completer: &dyn ChatCompleter, query: &str) -> Result<()> {
    let reply = chat_and_record(pool, completer, query).await?;
    println!("{}", reply.data.content);
    println!();
    println!("(stored as {})", reply.storage_id);
    Ok(())
}

/// Print the most recent `limit` exchanges, newest first.
pub async fn run_history(pool: &PgPool, limit: i64) -> Result<()> {
    if limit < 1 {
        bail!("--limit must be at least 1");
    }
    let records = chats::list_recent_chats(pool, limit).await?;
    let total = chats::count_chats(pool).await?;

    if records.is_empty() {
        println!("No chats recorded. Use `fitplan chat <query>` to start one.");
        return Ok(());
    }

    print!("{}", render_history(&records));
    println!();
    println!("Showing {} of {total} chats.", records.len());
    Ok(())
}

fn render_history(records: &[ChatRecord]) -> String {
    let model_w = records
        .iter()
        .map(|r| r.model.len())
        .max()
        .unwrap_or(5)
        .max(5);

    let mut out = format!("{:<16}  {:<model_w$}  QUERY\n", "CREATED", "MODEL");
    for record in records {
        out.push_str(&format!(
            "{:<16}  {:<model_w$}  {}\n",
            record.created_at.format("%Y-%m-%d %H:%M"),
            record.model,
            record.query_preview(PREVIEW_CHARS),
        ));
    }
    out
}
