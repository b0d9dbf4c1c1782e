use super::*;
use crate::chart::cell::Cell;

fn record(fields: &[(&str, Cell)]) -> ChartRecord {
    ChartRecord::new(
        "label",
        fields
            .iter()
            .map(|(name, cell)| (name.to_string(), cell.clone()))
            .collect(),
    )
}

fn text(s: &str) -> Cell {
    Cell::Text(s.to_string())
}

#[test]
fn test_suggest() {
    struct TestCase {
        name: &'static str,
        record: ChartRecord,
        expected: Vec<ChartKind>,
    }

    let tests = vec![
        TestCase {
            name: "one category one measure",
            record: record(&[("region", text("West")), ("sales", Cell::Number(1.0))]),
            expected: vec![
                ChartKind::Bar,
                ChartKind::Line,
                ChartKind::Area,
                ChartKind::Pie,
            ],
        },
        TestCase {
            name: "one category two measures",
            record: record(&[
                ("month", text("Jan")),
                ("revenue", Cell::Number(1.0)),
                ("cost", Cell::Number(2.0)),
            ]),
            expected: vec![ChartKind::Bar, ChartKind::Line, ChartKind::Area],
        },
        TestCase {
            name: "measures only",
            record: record(&[("a", Cell::Number(1.0)), ("b", Cell::Number(2.0))]),
            expected: vec![ChartKind::Line, ChartKind::Area],
        },
        TestCase {
            name: "single measure",
            record: record(&[("count", Cell::Number(3.0))]),
            expected: vec![ChartKind::Bar],
        },
        TestCase {
            name: "categories only",
            record: record(&[("name", text("Alice")), ("city", text("Paris"))]),
            expected: vec![],
        },
        TestCase {
            name: "boolean is categorical",
            record: record(&[("active", Cell::Bool(true)), ("n", Cell::Number(1.0))]),
            expected: ChartKind::ALL.to_vec(),
        },
        TestCase {
            name: "two categories one measure",
            record: record(&[
                ("region", text("West")),
                ("product", text("Shoes")),
                ("sales", Cell::Number(1.0)),
            ]),
            expected: vec![],
        },
        TestCase {
            name: "null counts as neither",
            record: record(&[("x", Cell::Null), ("n", Cell::Number(1.0))]),
            expected: vec![ChartKind::Bar],
        },
    ];

    for tc in tests {
        assert_eq!(
            suggest_chart_kinds(&[tc.record]),
            tc.expected,
            "{}",
            tc.name
        );
    }
}

#[test]
fn test_suggest_uses_first_record() {
    let records = vec![
        record(&[("a", text("x")), ("b", text("y"))]),
        record(&[("a", text("x")), ("b", Cell::Number(1.0))]),
    ];
    assert!(suggest_chart_kinds(&records).is_empty());
    assert!(suggest_chart_kinds(&[]).is_empty());
}

#[test]
fn test_column_profile_keeps_order() {
    let profile = ColumnProfile::from_record(&record(&[
        ("z", Cell::Number(1.0)),
        ("label", text("a")),
        ("a", Cell::Number(2.0)),
    ]));
    assert_eq!(profile.numeric, vec!["z", "a"]);
    assert_eq!(profile.categorical, vec!["label"]);
}

#[test]
fn test_chart_kind_parse() {
    assert_eq!("bar".parse::<ChartKind>().unwrap(), ChartKind::Bar);
    assert_eq!(" Pie ".parse::<ChartKind>().unwrap(), ChartKind::Pie);
    assert!("scatter".parse::<ChartKind>().is_err());
    assert_eq!(ChartKind::default(), ChartKind::Bar);
    assert_eq!(ChartKind::Area.to_string(), "area");
}
