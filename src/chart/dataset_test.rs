use serde_json::json;

use super::*;

fn result(columns: &[&str], rows: Vec<Vec<serde_json::Value>>) -> QueryResult {
    QueryResult::new(columns.iter().map(|c| c.to_string()).collect(), rows)
}

#[test]
fn test_build_records() {
    let result = result(
        &["region", "product", "sales"],
        vec![
            vec![json!("West"), json!("Shoes"), json!("100")],
            vec![json!("East"), json!("Hats"), json!(42.5)],
        ],
    );

    let records = build_records(&result, LabelFallback::RowIndex);
    assert_eq!(records.len(), 2);
    assert_eq!(records[0].label(), "West - Shoes");
    assert_eq!(records[0].get("sales"), Some(&Cell::Number(100.0)));
    assert_eq!(records[1].label(), "East - Hats");
    assert_eq!(records[1].get("sales"), Some(&Cell::Number(42.5)));
    assert_eq!(records[1].get("missing"), None);
}

#[test]
fn test_label_fallback() {
    let result = result(
        &["a", "b"],
        vec![vec![json!(1), json!(2)], vec![json!(3), json!(true)]],
    );

    let records = build_records(&result, LabelFallback::RowIndex);
    assert_eq!(records[0].label(), "Row 1");
    assert_eq!(records[1].label(), "Row 2");

    let records = build_records(&result, LabelFallback::Random);
    for record in &records {
        assert!(record.label().starts_with("Row "));
        assert_eq!(record.label().len(), "Row ".len() + 4);
    }
}

#[test]
fn test_booleans_do_not_contribute_to_label() {
    let fields = vec![
        ("flag".to_string(), Cell::Bool(true)),
        ("name".to_string(), Cell::Text("x".to_string())),
    ];
    assert_eq!(synthesize_label(0, &fields, LabelFallback::RowIndex), "x");
}

#[test]
fn test_serialize_record() {
    let record = ChartRecord::new(
        "West",
        vec![
            ("region".to_string(), Cell::Text("West".to_string())),
            ("sales".to_string(), Cell::Number(10.0)),
            ("note".to_string(), Cell::Null),
        ],
    );

    let value = serde_json::to_value(&record).unwrap();
    assert_eq!(
        value,
        json!({"region": "West", "sales": 10.0, "note": null, "__label": "West"})
    );
}

#[test]
fn test_blank_text_label_falls_back() {
    let result = result(
        &["name", "total"],
        vec![vec![json!(""), json!(5)], vec![json!("   "), json!(7)]],
    );

    let records = build_records(&result, LabelFallback::RowIndex);
    assert_eq!(records[0].label(), "Row 1");
    assert_eq!(records[1].label(), "Row 2");
}
