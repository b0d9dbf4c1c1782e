use serde_json::json;

use super::*;

fn rows_result() -> QueryResult {
    QueryResult::new(vec!["name".to_string()], vec![vec![json!("West")]])
}

#[test]
fn test_new_messages() {
    let user = Message::new_user("How many users?");
    assert!(user.is_user());
    assert_eq!(user.content(), "How many users?");
    assert_eq!(user.user_query(), "How many users?");
    assert_eq!(user.status(), MessageStatus::Succeeded);
    assert!(!user.wants_feedback());

    let pending = Message::new_pending("How many users?");
    assert!(pending.is_assistant());
    assert!(pending.is_loading());
    assert_eq!(pending.status(), MessageStatus::Pending);
    assert_eq!(pending.content(), "");
    assert!(pending.sql().is_none());
    assert!(pending.result().is_none());
    assert_ne!(user.id(), pending.id());
}

#[test]
fn test_message_lifecycle() {
    let mut msg = Message::new_pending("q").with_id("m");

    msg.complete("Explained", "SELECT name FROM t", rows_result());
    assert_eq!(msg.status(), MessageStatus::Succeeded);
    assert_eq!(msg.sql(), Some("SELECT name FROM t"));
    assert!(msg.wants_feedback());

    msg.reset_pending(true);
    assert_eq!(msg.id(), "m");
    assert_eq!(msg.status(), MessageStatus::Pending);
    assert!(msg.sql().is_none());
    assert!(msg.result().is_none());

    msg.complete("", "SELECT broken", QueryResult::from_error("syntax error"));
    assert_eq!(msg.status(), MessageStatus::Failed);
    assert!(msg.error().is_none());
    assert_eq!(msg.result().unwrap().error(), Some("syntax error"));
    assert!(!msg.wants_feedback());

    msg.reset_pending(true);
    msg.fail("could not translate");
    assert_eq!(msg.status(), MessageStatus::Failed);
    assert_eq!(msg.error(), Some("could not translate"));
    assert!(msg.sql().is_none());
    assert!(msg.result().is_none());
}

#[test]
fn test_feedback_transitions() {
    let mut msg = Message::new_pending("q");
    msg.complete("", "SELECT 1", rows_result());

    assert!(msg.set_feedback(Feedback::No));
    assert_eq!(msg.feedback(), Feedback::No);
    assert!(!msg.wants_feedback());

    // `no` is only left through a new generation cycle
    assert!(!msg.set_feedback(Feedback::Yes));
    assert!(!msg.set_feedback(Feedback::None));
    assert!(msg.set_feedback(Feedback::No));

    msg.reset_pending(true);
    assert_eq!(msg.feedback(), Feedback::None);
    msg.complete("", "SELECT 1", rows_result());
    assert!(msg.set_feedback(Feedback::Yes));
    assert!(!msg.set_feedback(Feedback::No));
    assert_eq!(msg.feedback(), Feedback::Yes);
}

#[test]
fn test_feedback_prompt_suppressed_after_regeneration() {
    let mut msg = Message::new_pending("q");
    msg.reset_pending(false);
    msg.complete("", "SELECT 1", rows_result());
    assert_eq!(msg.feedback(), Feedback::None);
    assert!(!msg.wants_feedback());
}

#[test]
fn test_feedback_from_str() {
    assert_eq!("yes".parse::<Feedback>().unwrap(), Feedback::Yes);
    assert_eq!(" No ".parse::<Feedback>().unwrap(), Feedback::No);
    assert_eq!("none".parse::<Feedback>().unwrap(), Feedback::None);
    assert!("maybe".parse::<Feedback>().is_err());
    assert_eq!(Feedback::No.to_string(), "no");
}
