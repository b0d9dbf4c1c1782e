use chrono::{Duration, TimeZone};
use serde_json::json;

use super::*;
use crate::chart::{ChartKind, ChartPanel};
use crate::config::ChartConfig;

fn customers_result() -> QueryResult {
    QueryResult::new(
        vec!["name".to_string(), "total".to_string()],
        vec![
            vec![json!("Alice"), json!(120)],
            vec![json!("Bob"), json!(80)],
        ],
    )
}

#[test]
fn test_categorize_conversation() {
    let now = Local
        .with_ymd_and_hms(2025, 3, 15, 12, 0, 0)
        .unwrap()
        .with_timezone(&Utc);

    let tests = vec![
        (Duration::hours(1), ConversationGroup::Today),
        (Duration::days(1), ConversationGroup::Yesterday),
        (Duration::days(5), ConversationGroup::Last7Days),
        (Duration::days(20), ConversationGroup::Last30Days),
        (Duration::days(90), ConversationGroup::Older),
    ];

    for (age, expected) in tests {
        let conversation = Conversation::default().with_created_at(now - age);
        assert_eq!(categorize_conversation(now, &conversation), expected, "{age}");
    }
}

#[test]
fn test_render_history() {
    let now = Utc::now();
    assert_eq!(render_history(now, &[], None), "No conversations found");

    let conversations = vec![
        Conversation::default()
            .with_id("aaaaaaaa-1111")
            .with_title("Sales by region"),
        Conversation::default()
            .with_id("bbbbbbbb-2222")
            .with_title("Old question")
            .with_created_at(now - Duration::days(60)),
    ];

    let rendered = render_history(now, &conversations, Some("aaaaaaaa-1111"));
    assert_eq!(
        rendered,
        "Today\n  aaaaaaaa  Sales by region [*]\nOlder\n  bbbbbbbb  Old question"
    );
}

#[test]
fn test_render_table() {
    assert_eq!(
        render_table(&customers_result(), 10),
        "name  | total\n\
         ------+------\n\
         Alice | 120\n\
         Bob   | 80\n\
         (2 rows)"
    );

    let truncated = render_table(&customers_result(), 1);
    assert!(truncated.ends_with("Alice | 120\n... 1 more rows"));

    let empty = QueryResult::new(vec!["n".to_string()], vec![]);
    assert!(render_table(&empty, 10).ends_with("(no rows)"));

    assert_eq!(
        render_table(&QueryResult::from_error("boom"), 10),
        "Error: boom"
    );
}

#[test]
fn test_render_message() {
    let user = Message::new_user("top customers");
    assert!(render_message(&user, 10).starts_with("> top customers"));

    let mut answer = Message::new_pending("top customers").with_id("m1");
    assert!(render_message(&answer, 10).ends_with("Generating SQL..."));

    answer.complete("Here it is", "SELECT name, total\nFROM customers", customers_result());
    let rendered = render_message(&answer, 10);
    assert!(rendered.starts_with("[m1] "));
    assert!(rendered.contains("Here it is\n\n    SELECT name, total\n    FROM customers\n"));
    assert!(rendered.contains("Alice | 120"));
    assert!(rendered.ends_with("Was this helpful? (yes / no)"));

    answer.set_feedback(Feedback::No);
    assert!(render_message(&answer, 10).ends_with("Feedback: not helpful"));

    answer.fail("model offline");
    assert!(render_message(&answer, 10).ends_with("Error: model offline"));
}

#[test]
fn test_render_chart() {
    let panel = ChartPanel::new(&customers_result(), &ChartConfig::default());

    let bar = render_chart(
        &panel.render(ChartKind::Bar).unwrap(),
        panel.range(),
        panel.total_rows(),
    );
    let lines = bar.lines().collect::<Vec<_>>();
    assert_eq!(lines[0], "Rows 0 to 2 of 2");
    assert_eq!(lines[1], "bar chart of total");
    assert_eq!(lines[2], format!("Alice | {} 120", "#".repeat(30)));
    assert_eq!(lines[3], format!("Bob   | {:<30} 80", "#".repeat(20)));

    let pie = render_chart(&panel.render(ChartKind::Pie).unwrap(), None, 2);
    assert_eq!(pie, "pie chart of total\nAlice   60.0%  120\nBob   40.0%  80");

    assert_eq!(
        render_chart(&ChartView::unavailable("No chart available for this data"), None, 0),
        "No chart available for this data"
    );
}
