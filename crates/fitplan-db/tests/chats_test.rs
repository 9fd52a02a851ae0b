//! Integration tests for the `chats` query functions.

use fitplan_db::queries::chats::{self, NewChat};
use fitplan_test_utils::{create_test_db, drop_test_db};

#[tokio::test]
async fn insert_chat_assigns_id_and_timestamp() {
    let (pool, db_name) = create_test_db().await;

    let before = chrono::Utc::now() - chrono::Duration::seconds(5);
    let chat = chats::insert_chat(
        &pool,
        &NewChat {
            query: "How many rest days per week?",
            response: "Two is a good start.",
            model: "test-model",
        },
    )
    .await
    .expect("insert_chat should succeed");

    assert_eq!(chat.query, "How many rest days per week?");
    assert_eq!(chat.response, "Two is a good start.");
    assert_eq!(chat.model, "test-model");
    assert!(chat.created_at >= before);
    assert!(!chat.id.is_nil());

    pool.close().await;
    drop_test_db(&db_name).await;
}

#[tokio::test]
async fn get_chat_roundtrip_and_missing() {
    let (pool, db_name) = create_test_db().await;

    let chat = chats::insert_chat(
        &pool,
        &NewChat {
            query: "q",
            response: "r",
            model: "m",
        },
    )
    .await
    .unwrap();

    let fetched = chats::get_chat(&pool, chat.id)
        .await
        .unwrap()
        .expect("chat should exist");
    assert_eq!(fetched.id, chat.id);
    assert_eq!(fetched.response, "r");

    let missing = chats::get_chat(&pool, uuid::Uuid::new_v4()).await.unwrap();
    assert!(missing.is_none());

    pool.close().await;
    drop_test_db(&db_name).await;
}

#[tokio::test]
async fn list_recent_chats_is_newest_first_and_limited() {
    let (pool, db_name) = create_test_db().await;

    for i in 0..3 {
        let query = format!("question {i}");
        chats::insert_chat(
            &pool,
            &NewChat {
                query: &query,
                response: "answer",
                model: "m",
            },
        )
        .await
        .unwrap();
        // Distinct created_at values keep the ordering deterministic.
        tokio::time::sleep(std::time::Duration::from_millis(10)).await;
    }

    let recent = chats::list_recent_chats(&pool, 2).await.unwrap();
    assert_eq!(recent.len(), 2);
    assert_eq!(recent[0].query, "question 2");
    assert_eq!(recent[1].query, "question 1");

    assert_eq!(chats::count_chats(&pool).await.unwrap(), 3);

    pool.close().await;
    drop_test_db(&db_name).await;
}
