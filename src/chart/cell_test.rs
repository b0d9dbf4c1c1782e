use serde_json::json;

use super::*;

#[test]
fn test_coerce() {
    assert_eq!(coerce(&json!(true)), Cell::Bool(true));
    assert_eq!(coerce(&json!(false)), Cell::Bool(false));
    assert_eq!(coerce(&Value::Null), Cell::Null);
    assert_eq!(coerce(&json!(42)), Cell::Number(42.0));
    assert_eq!(coerce(&json!(-1.5)), Cell::Number(-1.5));
    assert_eq!(coerce(&json!("42")), Cell::Number(42.0));
    assert_eq!(coerce(&json!(" 3.25 ")), Cell::Number(3.25));
    assert_eq!(coerce(&json!("1e3")), Cell::Number(1000.0));
    assert_eq!(coerce(&json!("")), Cell::Text("".to_string()));
    assert_eq!(coerce(&json!("   ")), Cell::Text("   ".to_string()));
    assert_eq!(coerce(&json!("12abc")), Cell::Text("12abc".to_string()));
    assert_eq!(coerce(&json!("West")), Cell::Text("West".to_string()));
    assert_eq!(coerce(&json!("NaN")), Cell::Text("NaN".to_string()));
    assert_eq!(coerce(&json!("inf")), Cell::Text("inf".to_string()));
    // Booleans spelled as strings are still strings
    assert_eq!(coerce(&json!("true")), Cell::Text("true".to_string()));
    assert_eq!(coerce(&json!([1, 2])), Cell::Text("[1,2]".to_string()));
}

#[test]
fn test_coerce_is_idempotent() {
    let raw = vec![
        json!(true),
        json!(null),
        json!(7),
        json!("7"),
        json!("0.5"),
        json!("West"),
        json!(""),
        json!({"nested": 1}),
    ];

    for value in raw {
        let once = coerce(&value);
        let twice = coerce(&Value::from(&once));
        assert_eq!(once, twice, "coercion of {value} is not idempotent");
    }
}

#[test]
fn test_cell_kind() {
    assert_eq!(Cell::Null.kind(), CellKind::Null);
    assert_eq!(Cell::Bool(true).kind(), CellKind::Boolean);
    assert_eq!(Cell::Number(1.0).kind(), CellKind::Number);
    assert_eq!(Cell::Text("a".into()).kind(), CellKind::Text);

    assert!(Cell::Bool(false).is_categorical());
    assert!(Cell::Text("a".into()).is_categorical());
    assert!(!Cell::Number(1.0).is_categorical());
    assert!(!Cell::Null.is_categorical());
    assert_eq!(Cell::Number(2.5).as_f64(), Some(2.5));
    assert_eq!(Cell::Text("x".into()).as_text(), Some("x"));
}
