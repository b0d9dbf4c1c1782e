use serde_json::json;

use super::*;

#[test]
fn test_to_csv() {
    let result = QueryResult::new(
        vec!["name".to_string(), "total".to_string(), "active".to_string()],
        vec![
            vec![json!("Alice"), json!(12.5), json!(true)],
            vec![json!("Smith, Bob"), json!(null), json!(false)],
            vec![json!("say \"hi\""), json!(3), json!(null)],
        ],
    );

    let csv = to_csv(&result).unwrap();
    assert_eq!(
        csv,
        "name,total,active\n\
         Alice,12.5,true\n\
         \"Smith, Bob\",,false\n\
         \"say \"\"hi\"\"\",3,\n"
    );
}

#[test]
fn test_to_csv_without_rows() {
    let result = QueryResult::new(vec!["a".to_string(), "b".to_string()], vec![]);
    assert_eq!(to_csv(&result).unwrap(), "a,b\n");
}

#[test]
fn test_write_csv() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join(EXPORT_FILE_NAME);
    let result = QueryResult::new(vec!["n".to_string()], vec![vec![json!(1)], vec![json!(2)]]);

    write_csv(&result, &path).unwrap();
    assert_eq!(std::fs::read_to_string(&path).unwrap(), "n\n1\n2\n");
}
