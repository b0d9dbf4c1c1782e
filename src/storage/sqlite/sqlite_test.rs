use serde_json::json;

use super::*;
use crate::models::{Feedback, Message, QueryResult};

fn sample_conversation(id: &str) -> Conversation {
    let mut answer = Message::new_pending("Top regions").with_id(format!("{id}-answer"));
    answer.complete(
        "Revenue by region",
        "SELECT region, revenue FROM sales",
        QueryResult::new(
            vec!["region".to_string(), "revenue".to_string()],
            vec![vec![json!("West"), json!(12.5)]],
        ),
    );
    answer.set_feedback(Feedback::No);

    Conversation::default()
        .with_id(id)
        .with_title("Top regions")
        .with_messages(vec![Message::new_user("Top regions"), answer])
}

#[tokio::test]
async fn test_load_empty() {
    let db = Sqlite::new(None).await.unwrap();
    let conversations = db.load_conversations().await.unwrap();
    assert!(conversations.is_empty());
}

#[tokio::test]
async fn test_save_and_load_conversations() {
    let db = Sqlite::new(None).await.unwrap();

    let expected = vec![sample_conversation("b"), sample_conversation("a")];
    db.save_conversations(&expected).await.unwrap();

    let actual = db.load_conversations().await.unwrap();
    assert_eq!(actual, expected);
    assert_eq!(actual[0].id(), "b");
    assert_eq!(actual[0].messages()[1].feedback(), Feedback::No);

    // The whole list is replaced on every save
    db.save_conversations(&expected[1..]).await.unwrap();
    let actual = db.load_conversations().await.unwrap();
    assert_eq!(actual.len(), 1);
    assert_eq!(actual[0].id(), "a");
}

#[tokio::test]
async fn test_load_corrupt_payload() {
    let db = Sqlite::new(None).await.unwrap();
    db.set_raw(STORAGE_KEY, "{not json".to_string())
        .await
        .unwrap();

    let conversations = db.load_conversations().await.unwrap();
    assert!(conversations.is_empty());
}

#[tokio::test]
async fn test_persist_across_connections() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("nested").join("history.db");
    let path = path.to_string_lossy().to_string();

    {
        let db = Sqlite::new(Some(&path)).await.unwrap();
        db.save_conversations(&[sample_conversation("a")])
            .await
            .unwrap();
    }

    let db = Sqlite::new(Some(&path)).await.unwrap();
    let conversations = db.load_conversations().await.unwrap();
    assert_eq!(conversations.len(), 1);
    assert_eq!(conversations[0].title(), "Top regions");
}
