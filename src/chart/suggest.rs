#[cfg(test)]
#[path = "suggest_test.rs"]
mod tests;

use std::{fmt::Display, str::FromStr};

use serde::{Deserialize, Serialize};

use super::dataset::ChartRecord;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChartKind {
    #[default]
    Bar,
    Line,
    Area,
    Pie,
}

impl ChartKind {
    pub const ALL: [ChartKind; 4] = [
        ChartKind::Bar,
        ChartKind::Line,
        ChartKind::Area,
        ChartKind::Pie,
    ];
}

impl Display for ChartKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ChartKind::Bar => write!(f, "bar"),
            ChartKind::Line => write!(f, "line"),
            ChartKind::Area => write!(f, "area"),
            ChartKind::Pie => write!(f, "pie"),
        }
    }
}

impl FromStr for ChartKind {
    type Err = eyre::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "bar" => Ok(ChartKind::Bar),
            "line" => Ok(ChartKind::Line),
            "area" => Ok(ChartKind::Area),
            "pie" => Ok(ChartKind::Pie),
            other => Err(eyre::eyre!("unknown chart type: {}", other)),
        }
    }
}

/// Column names of a record split by what they can be plotted as, in column
/// order. Null cells belong to neither side.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ColumnProfile {
    pub numeric: Vec<String>,
    pub categorical: Vec<String>,
}

impl ColumnProfile {
    pub fn from_record(record: &ChartRecord) -> Self {
        let mut profile = Self::default();
        for (name, cell) in record.fields() {
            if cell.is_number() {
                profile.numeric.push(name.clone());
            } else if cell.is_categorical() {
                profile.categorical.push(name.clone());
            }
        }
        profile
    }

    pub fn suggest(&self) -> Vec<ChartKind> {
        let numeric = self.numeric.len();
        let categorical = self.categorical.len();

        // First match wins
        match (categorical, numeric) {
            (1, 1) => ChartKind::ALL.to_vec(),
            (c, n) if c >= 1 && n > 1 => vec![ChartKind::Bar, ChartKind::Line, ChartKind::Area],
            (0, 1) => vec![ChartKind::Bar],
            (_, 2) => vec![ChartKind::Line, ChartKind::Area],
            (0, n) if n > 1 => vec![ChartKind::Line, ChartKind::Area],
            _ => vec![],
        }
    }
}

/// Chart types that make sense for `records`. Only the first record is
/// inspected; an empty window has no suggestion.
pub fn suggest_chart_kinds(records: &[ChartRecord]) -> Vec<ChartKind> {
    records
        .first()
        .map(|record| ColumnProfile::from_record(record).suggest())
        .unwrap_or_default()
}
