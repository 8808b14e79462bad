//! Layout analysis options and configuration.

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Options for column detection, role classification and confidence filtering.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutOptions {
    /// Horizontal gap (page units) that separates two columns
    pub column_gap_threshold: f32,

    /// Minimum height relative to the page's median text height for a heading
    pub heading_height_ratio: f32,

    /// Maximum number of words a heading may contain
    pub max_heading_words: usize,

    /// Elements with confidence below this value are flagged uncertain
    pub confidence_threshold: f32,

    /// Whether to analyse pages in parallel
    pub parallel: bool,

    /// Whether noise-tagged elements are left out of column detection
    pub exclude_noise_from_columns: bool,
}

impl LayoutOptions {
    /// Create new layout options with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the column gap threshold.
    pub fn with_column_gap(mut self, gap: f32) -> Self {
        self.column_gap_threshold = gap;
        self
    }

    /// Set the heading height ratio.
    pub fn with_heading_ratio(mut self, ratio: f32) -> Self {
        self.heading_height_ratio = ratio;
        self
    }

    /// Set the maximum heading word count.
    pub fn with_max_heading_words(mut self, words: usize) -> Self {
        self.max_heading_words = words;
        self
    }

    /// Set the confidence threshold.
    pub fn with_confidence_threshold(mut self, threshold: f32) -> Self {
        self.confidence_threshold = threshold;
        self
    }

    /// Enable or disable parallel processing.
    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// Disable parallel processing.
    pub fn sequential(mut self) -> Self {
        self.parallel = false;
        self
    }

    /// Check that every threshold is inside its allowed range.
    pub fn validate(&self) -> Result<()> {
        if !self.column_gap_threshold.is_finite() || self.column_gap_threshold < 0.0 {
            return Err(Error::InvalidOption(format!(
                "column_gap_threshold must be a non-negative number, got {}",
                self.column_gap_threshold
            )));
        }
        if !self.heading_height_ratio.is_finite() || self.heading_height_ratio <= 1.0 {
            return Err(Error::InvalidOption(format!(
                "heading_height_ratio must be greater than 1, got {}",
                self.heading_height_ratio
            )));
        }
        if self.max_heading_words == 0 {
            return Err(Error::InvalidOption(
                "max_heading_words must be at least 1".to_string(),
            ));
        }
        if !(0.0..=1.0).contains(&self.confidence_threshold) {
            return Err(Error::InvalidOption(format!(
                "confidence_threshold must be in [0, 1], got {}",
                self.confidence_threshold
            )));
        }
        Ok(())
    }
}

impl Default for LayoutOptions {
    fn default() -> Self {
        Self {
            column_gap_threshold: 50.0,
            heading_height_ratio: 1.3,
            max_heading_words: 12,
            confidence_threshold: 0.7,
            parallel: true,
            exclude_noise_from_columns: true,
        }
    }
}
