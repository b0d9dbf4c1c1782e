#[cfg(test)]
#[path = "query_test.rs"]
mod tests;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::config::constants::{ERROR_COLUMN, FAILED_SQL_SENTINEL, UNKNOWN_ERROR};

/// Tabular output of an executed statement. Every row holds exactly
/// `columns.len()` cells in column order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct QueryResult {
    #[serde(default)]
    columns: Vec<String>,
    #[serde(default)]
    rows: Vec<Vec<Value>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

impl QueryResult {
    pub fn new(columns: Vec<String>, rows: Vec<Vec<Value>>) -> Self {
        let width = columns.len();
        let rows = rows
            .into_iter()
            .enumerate()
            .map(|(idx, mut row)| {
                if row.len() != width {
                    log::warn!(
                        "row {} has {} cells, expected {}; normalizing",
                        idx,
                        row.len(),
                        width
                    );
                    row.resize(width, Value::Null);
                }
                row
            })
            .collect();

        Self {
            columns,
            rows,
            error: None,
        }
    }

    /// Builds rows from column-keyed records. Keys missing from a record become
    /// `null`; keys not listed in `columns` are ignored.
    pub fn from_records(columns: Vec<String>, records: Vec<Map<String, Value>>) -> Self {
        let rows = records
            .into_iter()
            .map(|mut record| {
                columns
                    .iter()
                    .map(|col| record.remove(col).unwrap_or(Value::Null))
                    .collect()
            })
            .collect();
        Self::new(columns, rows)
    }

    /// The result shown when the statement could not be executed at all.
    pub fn from_error(message: impl Into<String>) -> Self {
        let message = message.into();
        Self {
            columns: vec![ERROR_COLUMN.to_string()],
            rows: vec![],
            error: Some(if message.trim().is_empty() {
                UNKNOWN_ERROR.to_string()
            } else {
                message
            }),
        }
    }

    pub fn with_error(mut self, error: impl Into<String>) -> Self {
        self.error = Some(error.into());
        self
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn rows(&self) -> &[Vec<Value>] {
        &self.rows
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn is_failed(&self) -> bool {
        self.error.is_some()
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// Answer of the translate endpoint.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Translation {
    #[serde(default)]
    pub sql: String,
    #[serde(default)]
    pub explanation: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl Translation {
    pub fn new(sql: impl Into<String>) -> Self {
        Self {
            sql: sql.into(),
            ..Default::default()
        }
    }

    pub fn with_explanation(mut self, explanation: impl Into<String>) -> Self {
        self.explanation = explanation.into();
        self
    }

    pub fn with_error(mut self, error: impl Into<String>) -> Self {
        self.error = Some(error.into());
        self
    }

    /// Returns the statement when it can be executed. Blank SQL and the
    /// backend's failure sentinel are not usable.
    pub fn usable_sql(&self) -> Option<&str> {
        if self.error.is_some() {
            return None;
        }
        let sql = self.sql.trim();
        if sql.is_empty() || sql == FAILED_SQL_SENTINEL {
            return None;
        }
        Some(&self.sql)
    }
}
