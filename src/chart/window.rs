#[cfg(test)]
#[path = "window_test.rs"]
mod tests;

use serde::Serialize;
use thiserror::Error;

use crate::config::constants::CHART_PAGE_SIZE;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ChartRangeError {
    #[error("Start and End must be numbers")]
    NotANumber,

    #[error("Range must be between 0 and {total}")]
    OutOfBounds { total: usize },

    #[error("Start must be less than End")]
    Empty,
}

/// Half-open `[start, end)` slice of the chart records. Bounds are signed so
/// that negative user input can be rejected instead of wrapping.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct RowRange {
    pub start: i64,
    pub end: i64,
}

impl RowRange {
    pub fn new(start: i64, end: i64) -> Self {
        Self { start, end }
    }

    /// Parses the two bounds as typed by the user. Whole-valued decimals such
    /// as `10.0` are accepted, anything else that is not an integer is not.
    pub fn parse(start: &str, end: &str) -> Result<Self, ChartRangeError> {
        Ok(Self::new(parse_bound(start)?, parse_bound(end)?))
    }

    /// The window shown when a result is first charted.
    pub fn first_page(total: usize, page_size: usize) -> Self {
        Self::page(0, total, page_size)
    }

    /// The `index`-th page of at most `page_size` rows, clamped to `total`.
    pub fn page(index: usize, total: usize, page_size: usize) -> Self {
        let page_size = effective_page_size(page_size);
        let start = index.saturating_mul(page_size).min(total);
        let end = start.saturating_add(page_size).min(total);
        Self::new(start as i64, end as i64)
    }

    /// Checks the range against a result of `total` rows. Bounds are checked
    /// before ordering.
    pub fn validate(&self, total: usize) -> Result<(usize, usize), ChartRangeError> {
        let in_bounds = |v: i64| v >= 0 && v as u64 <= total as u64;
        if !in_bounds(self.start) || !in_bounds(self.end) {
            return Err(ChartRangeError::OutOfBounds { total });
        }
        if self.start >= self.end {
            return Err(ChartRangeError::Empty);
        }
        Ok((self.start as usize, self.end as usize))
    }

    pub fn len(&self) -> usize {
        self.end.saturating_sub(self.start).max(0) as usize
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Returns the records inside `range`, or the reason the range is unusable.
pub fn paginate<T>(items: &[T], range: RowRange) -> Result<&[T], ChartRangeError> {
    let (start, end) = range.validate(items.len())?;
    Ok(&items[start..end])
}

pub fn total_pages(total: usize, page_size: usize) -> usize {
    total.div_ceil(effective_page_size(page_size))
}

fn effective_page_size(page_size: usize) -> usize {
    if page_size == 0 {
        CHART_PAGE_SIZE
    } else {
        page_size
    }
}

fn parse_bound(raw: &str) -> Result<i64, ChartRangeError> {
    let raw = raw.trim();
    if let Ok(v) = raw.parse::<i64>() {
        return Ok(v);
    }
    match raw.parse::<f64>() {
        Ok(v) if v.is_finite() && v.fract() == 0.0 => Ok(v as i64),
        _ => Err(ChartRangeError::NotANumber),
    }
}
