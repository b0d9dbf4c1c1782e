#[cfg(test)]
#[path = "cell_test.rs"]
mod tests;

use std::fmt::Display;

use serde::Serialize;
use serde_json::Value;

/// A result cell after its semantic type has been inferred.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Cell {
    Null,
    Bool(bool),
    Number(f64),
    Text(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CellKind {
    Null,
    Boolean,
    Number,
    Text,
}

/// Infers the type of a single raw cell. Booleans stay booleans, numbers and
/// strings that fully parse as a finite number become numbers, everything else
/// is kept as it is.
pub fn coerce(raw: &Value) -> Cell {
    match raw {
        Value::Null => Cell::Null,
        Value::Bool(b) => Cell::Bool(*b),
        Value::Number(n) => match n.as_f64() {
            Some(f) if f.is_finite() => Cell::Number(f),
            _ => Cell::Text(n.to_string()),
        },
        Value::String(s) => match parse_number(s) {
            Some(f) => Cell::Number(f),
            None => Cell::Text(s.clone()),
        },
        other => Cell::Text(other.to_string()),
    }
}

fn parse_number(raw: &str) -> Option<f64> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }
    trimmed.parse::<f64>().ok().filter(|f| f.is_finite())
}

impl Cell {
    pub fn kind(&self) -> CellKind {
        match self {
            Cell::Null => CellKind::Null,
            Cell::Bool(_) => CellKind::Boolean,
            Cell::Number(_) => CellKind::Number,
            Cell::Text(_) => CellKind::Text,
        }
    }

    pub fn is_number(&self) -> bool {
        matches!(self, Cell::Number(_))
    }

    pub fn is_text(&self) -> bool {
        matches!(self, Cell::Text(_))
    }

    /// Text and boolean cells can only be plotted as categories.
    pub fn is_categorical(&self) -> bool {
        matches!(self, Cell::Text(_) | Cell::Bool(_))
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Cell::Number(f) => Some(*f),
            _ => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Cell::Text(s) => Some(s),
            _ => None,
        }
    }
}

impl From<&Cell> for Value {
    fn from(value: &Cell) -> Self {
        match value {
            Cell::Null => Value::Null,
            Cell::Bool(b) => Value::Bool(*b),
            Cell::Number(f) => serde_json::Number::from_f64(*f)
                .map(Value::Number)
                .unwrap_or(Value::Null),
            Cell::Text(s) => Value::String(s.clone()),
        }
    }
}

impl Display for Cell {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Cell::Null => write!(f, ""),
            Cell::Bool(b) => write!(f, "{}", b),
            Cell::Number(n) => write!(f, "{}", n),
            Cell::Text(s) => write!(f, "{}", s),
        }
    }
}
