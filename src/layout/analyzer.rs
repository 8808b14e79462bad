//! Page and document layout analysis.
//!
//! The analyzer runs the per-page stages in a fixed order: column detection,
//! XY-cut reading order, role classification and confidence marking. On a
//! whole document, noise tagging runs first because it needs every page.

use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use super::{
    assign_column_ids, classify_page, detect_columns, mark_uncertain, xy_cut_sort, Column,
    LayoutOptions,
};
use crate::error::Result;
use crate::model::{Document, Page};
use crate::noise::{NoiseDetector, NoiseOptions, NoiseReport};

/// Layout facts recorded for one page.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PageLayout {
    /// Page number (1-indexed)
    pub page_number: u32,
    /// Detected columns, left to right
    pub columns: Vec<Column>,
    /// Elements at or above the confidence threshold (or unmeasured)
    pub high_confidence: usize,
    /// Elements flagged uncertain
    pub low_confidence: usize,
}

impl PageLayout {
    pub fn column_count(&self) -> usize {
        self.columns.len()
    }
}

/// Layout facts for a whole document.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DocumentLayout {
    /// Per-page results in page order
    pub pages: Vec<PageLayout>,
    /// Noise detection summary
    pub noise: NoiseReport,
}

impl DocumentLayout {
    /// Largest column count seen on any page.
    pub fn max_columns(&self) -> usize {
        self.pages.iter().map(|p| p.column_count()).max().unwrap_or(0)
    }

    /// Total number of uncertain elements.
    pub fn low_confidence(&self) -> usize {
        self.pages.iter().map(|p| p.low_confidence).sum()
    }
}

/// Layout analyzer for reconstructing structure from positioned elements.
#[derive(Debug, Clone, Default)]
pub struct LayoutAnalyzer {
    options: LayoutOptions,
    noise: NoiseDetector,
}

impl LayoutAnalyzer {
    /// Create a new layout analyzer.
    pub fn new(options: LayoutOptions) -> Self {
        Self {
            options,
            noise: NoiseDetector::default(),
        }
    }

    /// Use the given noise detection options.
    pub fn with_noise_options(mut self, options: NoiseOptions) -> Self {
        self.noise = NoiseDetector::new(options);
        self
    }

    pub fn options(&self) -> &LayoutOptions {
        &self.options
    }

    /// Analyse one page in place.
    pub fn analyze_page(&self, page: &mut Page) -> PageLayout {
        let columns = if self.options.exclude_noise_from_columns {
            detect_columns(
                page.elements.iter().filter(|e| e.noise_type.is_none()),
                self.options.column_gap_threshold,
            )
        } else {
            detect_columns(&page.elements, self.options.column_gap_threshold)
        };
        let columns = if columns.is_empty() {
            // A page of nothing but noise still gets one column
            detect_columns(&page.elements, self.options.column_gap_threshold)
        } else {
            columns
        };

        assign_column_ids(&mut page.elements, &columns);
        xy_cut_sort(&mut page.elements);
        classify_page(&mut page.elements, &self.options);
        let counts = mark_uncertain(&mut page.elements, self.options.confidence_threshold);

        log::debug!(
            "Page {}: {} elements, {} columns, {} uncertain",
            page.number,
            page.elements.len(),
            columns.len(),
            counts.low
        );

        PageLayout {
            page_number: page.number,
            columns,
            high_confidence: counts.high,
            low_confidence: counts.low,
        }
    }

    /// Tag noise across the document, then analyse every page.
    pub fn analyze_document(&self, doc: &mut Document) -> Result<DocumentLayout> {
        self.options.validate()?;
        self.noise.options().validate()?;

        let noise = self.noise.tag(doc);

        let pages: Vec<PageLayout> = if self.options.parallel {
            doc.pages
                .par_iter_mut()
                .map(|page| self.analyze_page(page))
                .collect()
        } else {
            doc.pages
                .iter_mut()
                .map(|page| self.analyze_page(page))
                .collect()
        };

        log::debug!(
            "Analyzed {} pages ({} noise elements tagged)",
            pages.len(),
            noise.tagged()
        );
        Ok(DocumentLayout { pages, noise })
    }
}
