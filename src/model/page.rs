//! Page-level types.

use serde::{Deserialize, Serialize};

use super::{Element, RawElement};
use crate::error::Result;

/// A single logical page: positioned elements in engine order until the
/// layout analyzer assigns a reading order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Page {
    /// Page number (1-indexed)
    pub number: u32,

    /// Page width in page units, when the engine reports it
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub width: Option<f32>,

    /// Page height in page units, when the engine reports it
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub height: Option<f32>,

    /// Elements on the page
    #[serde(default)]
    pub elements: Vec<Element>,
}

impl Page {
    /// Create a new empty page of unknown size.
    pub fn new(number: u32) -> Self {
        Self {
            number,
            ..Default::default()
        }
    }

    /// Set the page dimensions.
    pub fn with_size(mut self, width: f32, height: f32) -> Self {
        self.width = Some(width);
        self.height = Some(height);
        self
    }

    /// Build a page from raw engine output, validating every element.
    pub fn from_raw(number: u32, raw: Vec<RawElement>) -> Result<Self> {
        let elements = raw
            .into_iter()
            .map(|r| r.into_element(number))
            .collect::<Result<Vec<_>>>()?;
        Ok(Self {
            number,
            elements,
            ..Default::default()
        })
    }

    /// Add an element to the page.
    pub fn add_element(&mut self, element: Element) {
        self.elements.push(element);
    }

    /// Check if the page has no elements.
    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    /// Get the number of elements on the page.
    pub fn element_count(&self) -> usize {
        self.elements.len()
    }

    /// Vertical span `(top, bottom)` used to position elements.
    ///
    /// The page height wins when known; otherwise the extent of the
    /// elements themselves.
    pub fn vertical_span(&self) -> Option<(f32, f32)> {
        if let Some(height) = self.height.filter(|h| *h > 0.0) {
            return Some((0.0, height));
        }
        let top = self
            .elements
            .iter()
            .map(|e| e.bbox.y0)
            .fold(f32::INFINITY, f32::min);
        let bottom = self
            .elements
            .iter()
            .map(|e| e.bbox.y1)
            .fold(f32::NEG_INFINITY, f32::max);
        (top < bottom).then_some((top, bottom))
    }

    /// Get plain text of the page in current element order.
    pub fn plain_text(&self) -> String {
        self.elements
            .iter()
            .map(|e| e.stripped_text())
            .filter(|t| !t.is_empty())
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// Total whitespace-separated tokens across all elements.
    pub fn word_count(&self) -> usize {
        self.elements.iter().map(|e| e.word_count()).sum()
    }
}
