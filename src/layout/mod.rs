//! Layout reconstruction from positioned elements.

mod analyzer;
mod classify;
mod columns;
mod confidence;
mod options;
mod reading_order;

pub use analyzer::{DocumentLayout, LayoutAnalyzer, PageLayout};
pub use classify::{classify_element, classify_page, median_text_height, Classification};
pub use columns::{assign_column_ids, column_for, detect_columns, Column};
pub use confidence::{filter_by_confidence, mark_uncertain, ConfidenceCounts, ConfidencePartition};
pub use options::LayoutOptions;
pub use reading_order::xy_cut_sort;
