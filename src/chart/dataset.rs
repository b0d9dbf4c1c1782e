#[cfg(test)]
#[path = "dataset_test.rs"]
mod tests;

use serde::{Deserialize, Serialize, Serializer, ser::SerializeMap};

use crate::models::QueryResult;

use super::cell::{Cell, coerce};

/// Key of the synthetic category field in serialized records.
pub const LABEL_KEY: &str = "__label";

/// How a row without any text column gets its category label.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LabelFallback {
    /// `Row N`, N being the 1-based position in the result
    #[default]
    RowIndex,
    /// `Row xxxx` with a random suffix; differs between runs
    Random,
}

/// One coerced result row plus its synthetic label.
#[derive(Debug, Clone, PartialEq)]
pub struct ChartRecord {
    label: String,
    fields: Vec<(String, Cell)>,
}

impl ChartRecord {
    pub fn new(label: impl Into<String>, fields: Vec<(String, Cell)>) -> Self {
        Self {
            label: label.into(),
            fields,
        }
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn fields(&self) -> &[(String, Cell)] {
        &self.fields
    }

    pub fn get(&self, column: &str) -> Option<&Cell> {
        self.fields
            .iter()
            .find(|(name, _)| name == column)
            .map(|(_, cell)| cell)
    }
}

impl Serialize for ChartRecord {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.fields.len() + 1))?;
        for (name, cell) in &self.fields {
            map.serialize_entry(name, cell)?;
        }
        map.serialize_entry(LABEL_KEY, &self.label)?;
        map.end()
    }
}

/// Coerces every cell of `result` and attaches a category label to each row.
pub fn build_records(result: &QueryResult, fallback: LabelFallback) -> Vec<ChartRecord> {
    result
        .rows()
        .iter()
        .enumerate()
        .map(|(idx, row)| {
            let fields = result
                .columns()
                .iter()
                .zip(row.iter())
                .map(|(col, raw)| (col.clone(), coerce(raw)))
                .collect::<Vec<_>>();
            let label = synthesize_label(idx, &fields, fallback);
            ChartRecord::new(label, fields)
        })
        .collect()
}

/// Joins the text cells of a row with ` - `. A row without text cells gets a
/// placeholder, as does a row whose text cells are all blank, so every row has
/// a non-empty category.
pub fn synthesize_label(
    row_index: usize,
    fields: &[(String, Cell)],
    fallback: LabelFallback,
) -> String {
    let texts = fields
        .iter()
        .filter_map(|(_, cell)| cell.as_text())
        .collect::<Vec<_>>();

    let joined = texts.join(" - ");
    if !joined.trim().is_empty() {
        return joined;
    }

    match fallback {
        LabelFallback::RowIndex => format!("Row {}", row_index + 1),
        LabelFallback::Random => {
            let suffix = uuid::Uuid::new_v4().simple().to_string();
            format!("Row {}", &suffix[..4])
        }
    }
}
