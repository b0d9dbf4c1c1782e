#[cfg(test)]
#[path = "panel_test.rs"]
mod tests;

use crate::{config::ChartConfig, models::QueryResult};

use super::{
    ChartKind, ChartRangeError, ChartRecord, ChartView, RowRange, build_records, paginate,
    suggest_chart_kinds, total_pages, view,
};

/// Chart state for one query result: the coerced records plus the row window
/// being looked at.
#[derive(Debug, Clone)]
pub struct ChartPanel {
    records: Vec<ChartRecord>,
    page_size: usize,
    // None while the typed bounds are not numbers
    range: Option<RowRange>,
}

impl ChartPanel {
    pub fn new(result: &QueryResult, config: &ChartConfig) -> Self {
        let records = build_records(result, config.label_fallback);
        let range = RowRange::first_page(records.len(), config.page_size);
        Self {
            records,
            page_size: config.page_size,
            range: Some(range),
        }
    }

    pub fn records(&self) -> &[ChartRecord] {
        &self.records
    }

    pub fn total_rows(&self) -> usize {
        self.records.len()
    }

    pub fn total_pages(&self) -> usize {
        total_pages(self.records.len(), self.page_size)
    }

    pub fn range(&self) -> Option<RowRange> {
        self.range
    }

    /// Replaces the window with the bounds typed by the user. The new bounds
    /// are kept even when invalid, so the error stays until corrected.
    pub fn set_range(&mut self, start: &str, end: &str) -> Result<(), ChartRangeError> {
        self.range = RowRange::parse(start, end).ok();
        self.window().map(|_| ())
    }

    pub fn set_row_range(&mut self, range: RowRange) -> Result<(), ChartRangeError> {
        self.range = Some(range);
        self.window().map(|_| ())
    }

    pub fn set_page(&mut self, index: usize) {
        self.range = Some(RowRange::page(index, self.records.len(), self.page_size));
    }

    pub fn window(&self) -> Result<&[ChartRecord], ChartRangeError> {
        let range = self.range.ok_or(ChartRangeError::NotANumber)?;
        paginate(&self.records, range)
    }

    /// Suggested chart types for the current window; none while the window is
    /// invalid.
    pub fn suggestions(&self) -> Vec<ChartKind> {
        self.window()
            .map(suggest_chart_kinds)
            .unwrap_or_default()
    }

    pub fn render(&self, kind: ChartKind) -> Result<ChartView, ChartRangeError> {
        Ok(view::render(kind, self.window()?))
    }
}
