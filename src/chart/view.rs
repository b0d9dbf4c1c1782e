#[cfg(test)]
#[path = "view_test.rs"]
mod tests;

use serde::Serialize;

use super::{
    dataset::{ChartRecord, LABEL_KEY},
    suggest::{ChartKind, ColumnProfile, suggest_chart_kinds},
};

pub const PALETTE: [&str; 5] = ["#3b82f6", "#8b5cf6", "#f59e0b", "#10b981", "#ef4444"];

pub const NO_CHART: &str = "No chart available for this data";
pub const NO_PIE_VALUE: &str = "No numeric data for Pie chart";

pub fn color_for(index: usize) -> &'static str {
    PALETTE[index % PALETTE.len()]
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Series {
    pub key: String,
    pub color: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stack_id: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PieSlice {
    pub name: String,
    pub value: f64,
    pub color: &'static str,
}

/// Everything a renderer needs to draw one chart.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ChartView {
    Cartesian {
        kind: ChartKind,
        category_key: String,
        series: Vec<Series>,
        data: Vec<ChartRecord>,
    },
    Pie {
        value_key: String,
        slices: Vec<PieSlice>,
    },
    Unavailable {
        message: String,
    },
}

impl ChartView {
    pub fn unavailable(message: impl Into<String>) -> Self {
        ChartView::Unavailable {
            message: message.into(),
        }
    }

    pub fn is_available(&self) -> bool {
        !matches!(self, ChartView::Unavailable { .. })
    }
}

/// Builds `kind` for `records` only when it is one of the suggested chart
/// types; otherwise the "no chart" placeholder is returned.
pub fn render(kind: ChartKind, records: &[ChartRecord]) -> ChartView {
    if !suggest_chart_kinds(records).contains(&kind) {
        return ChartView::unavailable(NO_CHART);
    }
    build_view(kind, records)
}

/// Builds `kind` for `records` without consulting the suggestions. Numeric
/// columns are taken from the first record.
pub fn build_view(kind: ChartKind, records: &[ChartRecord]) -> ChartView {
    let Some(sample) = records.first() else {
        return ChartView::unavailable(NO_CHART);
    };
    let numeric = ColumnProfile::from_record(sample).numeric;

    match kind {
        ChartKind::Bar | ChartKind::Line | ChartKind::Area => {
            let series = numeric
                .into_iter()
                .enumerate()
                .map(|(idx, key)| Series {
                    key,
                    color: color_for(idx),
                    stack_id: (kind == ChartKind::Area).then(|| "1".to_string()),
                })
                .collect();
            ChartView::Cartesian {
                kind,
                category_key: LABEL_KEY.to_string(),
                series,
                data: records.to_vec(),
            }
        }
        ChartKind::Pie => {
            let Some(value_key) = numeric.into_iter().next() else {
                return ChartView::unavailable(NO_PIE_VALUE);
            };
            let slices = records
                .iter()
                .enumerate()
                .map(|(idx, record)| PieSlice {
                    name: record.label().to_string(),
                    value: record
                        .get(&value_key)
                        .and_then(|cell| cell.as_f64())
                        .unwrap_or(0.0),
                    color: color_for(idx),
                })
                .collect();
            ChartView::Pie { value_key, slices }
        }
    }
}
