use super::*;
use crate::models::Feedback;

#[test]
fn test_derive_title() {
    assert_eq!(derive_title("Top customers", 50), "Top customers");
    assert_eq!(derive_title("  padded question  ", 50), "padded question");

    let long = "a".repeat(60);
    let title = derive_title(&long, 50);
    assert_eq!(title, format!("{}...", "a".repeat(50)));

    // Multi-byte characters are counted, not bytes
    let title = derive_title("ééééé", 3);
    assert_eq!(title, "ééé...");
}

#[test]
fn test_conversation_from_question() {
    let convo = Conversation::from_question("How many orders were shipped last week?", 10);
    assert_eq!(convo.title(), "How many o...");
    assert!(!convo.id().is_empty());
    assert!(convo.is_empty());
}

#[test]
fn test_move_to_front() {
    let mut conversations = vec![
        Conversation::default().with_id("a"),
        Conversation::default().with_id("b"),
        Conversation::default().with_id("c"),
    ];

    assert!(move_to_front(&mut conversations, "c"));
    let ids = conversations.iter().map(|c| c.id()).collect::<Vec<_>>();
    assert_eq!(ids, vec!["c", "a", "b"]);

    assert!(move_to_front(&mut conversations, "c"));
    let ids = conversations.iter().map(|c| c.id()).collect::<Vec<_>>();
    assert_eq!(ids, vec!["c", "a", "b"]);

    assert!(!move_to_front(&mut conversations, "missing"));
    assert_eq!(conversations.len(), 3);
}

#[test]
fn test_conversation_message_lookup() {
    let mut convo = Conversation::default();
    convo.append_message(Message::new_user("q").with_id("user"));
    convo.append_message(Message::new_pending("q").with_id("assistant"));

    assert!(convo.message("user").is_some_and(|m| m.is_user()));
    assert!(convo.message("assistant").is_some_and(|m| m.is_loading()));
    assert!(convo.message("missing").is_none());

    convo
        .message_mut("assistant")
        .unwrap()
        .fail("boom");
    assert_eq!(convo.message("assistant").unwrap().error(), Some("boom"));
    assert_eq!(convo.last_message().unwrap().id(), "assistant");
}

#[test]
fn test_conversation_updated_at() {
    let created = chrono::Utc::now() - chrono::Duration::days(2);
    let later = chrono::Utc::now() - chrono::Duration::days(1);

    let mut convo = Conversation::default().with_created_at(created);
    assert_eq!(convo.updated_at(), created);

    convo.append_message(Message::new_user("q").with_timestamp(later));
    assert_eq!(convo.updated_at(), later);
}

#[test]
fn test_conversation_serde() {
    let raw = r#"[{
        "id": "c1",
        "title": "Revenue",
        "createdAt": "2024-05-01T10:00:00.000Z",
        "messages": [
            {"id": "m1", "type": "user", "content": "Revenue?", "userQuery": "Revenue?",
             "timestamp": "2024-05-01T10:00:00.000Z"},
            {"id": "m2", "type": "assistant", "content": "Here you go", "userQuery": "Revenue?",
             "sql": "SELECT 1", "result": {"columns": ["a"], "rows": [[1]]},
             "timestamp": "2024-05-01T10:00:01.000Z", "isLoading": false, "feedback": "no"}
        ]
    }]"#;

    let conversations: Vec<Conversation> = serde_json::from_str(raw).expect("parse");
    assert_eq!(conversations.len(), 1);

    let convo = &conversations[0];
    assert_eq!(convo.id(), "c1");
    assert_eq!(
        convo.created_at().to_rfc3339(),
        "2024-05-01T10:00:00+00:00"
    );
    assert_eq!(convo.len(), 2);
    assert_eq!(convo.messages()[0].feedback(), Feedback::None);
    assert_eq!(convo.messages()[1].feedback(), Feedback::No);
    assert_eq!(convo.messages()[1].sql(), Some("SELECT 1"));

    let encoded = serde_json::to_string(&conversations).expect("encode");
    assert!(encoded.contains("\"createdAt\""));
    assert!(encoded.contains("\"userQuery\""));
    assert!(encoded.contains("\"role\":\"assistant\""));
    let decoded: Vec<Conversation> = serde_json::from_str(&encoded).expect("decode");
    assert_eq!(decoded, conversations);
}
