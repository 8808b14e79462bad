//! Column detection by horizontal gap clustering.

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

use crate::model::Element;

/// A detected vertical reading column.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Column {
    /// Column index (0 = leftmost)
    pub index: usize,
    /// Left boundary X coordinate
    pub x_min: f32,
    /// Right boundary X coordinate
    pub x_max: f32,
    /// Number of elements that formed this column
    pub member_count: usize,
}

impl Column {
    /// Check if an X coordinate falls within this column.
    pub fn contains(&self, x: f32) -> bool {
        x >= self.x_min && x <= self.x_max
    }

    /// Horizontal distance from `x` to this column, `0.0` inside it.
    pub fn distance_to(&self, x: f32) -> f32 {
        if x < self.x_min {
            self.x_min - x
        } else if x > self.x_max {
            x - self.x_max
        } else {
            0.0
        }
    }
}

/// Cluster elements into columns sorted left to right.
///
/// Elements are walked in ascending `x0`; a gap between an element's `x0` and
/// the running column's right edge larger than `gap_threshold` opens a new
/// column. The resulting columns never overlap.
pub fn detect_columns<'a, I>(elements: I, gap_threshold: f32) -> Vec<Column>
where
    I: IntoIterator<Item = &'a Element>,
{
    let mut extents: Vec<(f32, f32)> = elements
        .into_iter()
        .map(|e| (e.bbox.x0, e.bbox.x1))
        .collect();
    if extents.is_empty() {
        return vec![];
    }

    extents.sort_by(|a, b| a.0.partial_cmp(&b.0).unwrap_or(Ordering::Equal));

    let mut columns: Vec<Column> = Vec::new();
    for (x0, x1) in extents {
        match columns.last_mut() {
            Some(current) if x0 - current.x_max <= gap_threshold => {
                current.x_max = current.x_max.max(x1);
                current.member_count += 1;
            }
            _ => columns.push(Column {
                index: columns.len(),
                x_min: x0,
                x_max: x1,
                member_count: 1,
            }),
        }
    }

    log::debug!(
        "Detected {} columns (gap threshold {:.1})",
        columns.len(),
        gap_threshold
    );
    for col in &columns {
        log::trace!(
            "  Column {}: x={:.1}..{:.1}, {} members",
            col.index,
            col.x_min,
            col.x_max,
            col.member_count
        );
    }

    columns
}

/// Index of the column an element at horizontal position `x0` belongs to.
///
/// Prefers the column containing `x0`; falls back to the nearest column for
/// elements that did not take part in detection.
pub fn column_for(columns: &[Column], x0: f32) -> Option<usize> {
    columns
        .iter()
        .find(|c| c.contains(x0))
        .or_else(|| {
            columns.iter().min_by(|a, b| {
                a.distance_to(x0)
                    .partial_cmp(&b.distance_to(x0))
                    .unwrap_or(Ordering::Equal)
            })
        })
        .map(|c| c.index)
}

/// Set `column_id` on every element. No-op when `columns` is empty.
pub fn assign_column_ids(elements: &mut [Element], columns: &[Column]) {
    for element in elements.iter_mut() {
        if let Some(index) = column_for(columns, element.bbox.x0) {
            element.column_id = Some(index);
        }
    }
}
