pub mod cell;
pub mod dataset;
pub mod export;
pub mod panel;
pub mod suggest;
pub mod view;
pub mod window;

pub use cell::{Cell, CellKind, coerce};
pub use dataset::{ChartRecord, LABEL_KEY, LabelFallback, build_records, synthesize_label};
pub use export::{EXPORT_FILE_NAME, to_csv, write_csv};
pub use panel::ChartPanel;
pub use suggest::{ChartKind, ColumnProfile, suggest_chart_kinds};
pub use view::{ChartView, NO_CHART, NO_PIE_VALUE, PALETTE, PieSlice, Series, build_view, render};
pub use window::{ChartRangeError, RowRange, paginate, total_pages};
