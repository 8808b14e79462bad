//! Confidence filtering: partition by recognition confidence and flag
//! uncertain elements.

use serde::{Deserialize, Serialize};

use crate::model::Element;

/// Elements split by recognition confidence.
#[derive(Debug, Clone, Default)]
pub struct ConfidencePartition {
    /// Confidence at or above the threshold, or not measured
    pub high: Vec<Element>,
    /// Confidence below the threshold, each flagged `uncertain`
    pub low: Vec<Element>,
}

/// Counts produced by [`mark_uncertain`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfidenceCounts {
    pub high: usize,
    pub low: usize,
}

fn is_low(element: &Element, threshold: f32) -> bool {
    matches!(element.confidence, Some(c) if c < threshold)
}

/// Partition elements into high and low confidence.
///
/// Missing confidence is never low.
pub fn filter_by_confidence(elements: Vec<Element>, threshold: f32) -> ConfidencePartition {
    let mut partition = ConfidencePartition::default();
    for mut element in elements {
        if is_low(&element, threshold) {
            element.uncertain = true;
            partition.low.push(element);
        } else {
            partition.high.push(element);
        }
    }
    partition
}

/// Flag low-confidence elements in place without reordering them.
pub fn mark_uncertain(elements: &mut [Element], threshold: f32) -> ConfidenceCounts {
    let mut counts = ConfidenceCounts::default();
    for element in elements.iter_mut() {
        if is_low(element, threshold) {
            element.uncertain = true;
            counts.low += 1;
        } else {
            counts.high += 1;
        }
    }
    counts
}
