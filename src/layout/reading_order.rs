//! XY-cut reading order: columns left to right, each column top to bottom.

use std::cmp::Ordering;
use std::collections::BTreeMap;

use crate::model::Element;

/// Reorder `elements` into reading order and number them `1..=N`.
///
/// Elements are grouped by `column_id` (unset counts as column 0), groups are
/// ordered by the smallest `x0` of their members and each group is stably
/// sorted by `y0`.
pub fn xy_cut_sort(elements: &mut Vec<Element>) {
    if elements.is_empty() {
        return;
    }

    let mut groups: BTreeMap<usize, Vec<Element>> = BTreeMap::new();
    for element in elements.drain(..) {
        groups
            .entry(element.column_id.unwrap_or(0))
            .or_default()
            .push(element);
    }

    let mut ordered: Vec<(f32, Vec<Element>)> = groups
        .into_values()
        .map(|mut members| {
            members.sort_by(|a, b| a.bbox.y0.partial_cmp(&b.bbox.y0).unwrap_or(Ordering::Equal));
            let x_min = members
                .iter()
                .map(|e| e.bbox.x0)
                .fold(f32::INFINITY, f32::min);
            (x_min, members)
        })
        .collect();
    ordered.sort_by(|a, b| a.0.partial_cmp(&b.0).unwrap_or(Ordering::Equal));

    elements.extend(ordered.into_iter().flat_map(|(_, members)| members));
    for (idx, element) in elements.iter_mut().enumerate() {
        element.reading_order = Some(idx as u32 + 1);
    }
}
