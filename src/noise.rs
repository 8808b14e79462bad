//! Cross-page noise detection.
//!
//! Running headers, footers and page numbers are found by how often a text
//! recurs across pages and where it sits vertically. Detection only ever
//! *tags* elements through [`Element::noise_type`]; nothing is removed and
//! neither text nor geometry is touched. Whether tagged noise shows up in the
//! output is a rendering decision.

use std::collections::{BTreeSet, HashMap, HashSet};

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::model::{Document, Element, NoiseType, Page};

/// Fraction of the page height treated as header/footer band.
const EDGE_BAND: f32 = 0.1;

/// Documents shorter than this are never tagged.
const MIN_PAGES: usize = 3;

/// Options for noise detection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NoiseOptions {
    /// Minimum fraction of pages a text must appear on, in `(0, 1]`
    pub threshold: f32,

    /// Only texts strictly longer than this (in characters) are counted
    pub min_text_len: usize,
}

impl NoiseOptions {
    /// Create new noise options with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the repetition threshold.
    pub fn with_threshold(mut self, threshold: f32) -> Self {
        self.threshold = threshold;
        self
    }

    /// Set the minimum counted text length.
    pub fn with_min_text_len(mut self, len: usize) -> Self {
        self.min_text_len = len;
        self
    }

    /// Check that the threshold is inside `(0, 1]`.
    pub fn validate(&self) -> Result<()> {
        if !(self.threshold > 0.0 && self.threshold <= 1.0) {
            return Err(Error::InvalidOption(format!(
                "noise threshold must be in (0, 1], got {}",
                self.threshold
            )));
        }
        Ok(())
    }
}

impl Default for NoiseOptions {
    fn default() -> Self {
        Self {
            threshold: 0.6,
            min_text_len: 3,
        }
    }
}

/// Summary of a noise detection run.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NoiseReport {
    /// False when the document had too few pages to compare
    pub active: bool,
    /// Pages inspected
    pub page_count: usize,
    /// Texts recurring on at least `threshold` of the pages, sorted
    pub repeaters: Vec<String>,
    /// Elements tagged `header`
    pub headers: usize,
    /// Elements tagged `footer`
    pub footers: usize,
    /// Elements tagged `page_number`
    pub page_numbers: usize,
    /// Repeaters found away from the page edges, left untagged
    pub repeated_body: Vec<String>,
}

impl NoiseReport {
    /// Total number of tagged elements.
    pub fn tagged(&self) -> usize {
        self.headers + self.footers + self.page_numbers
    }
}

/// Detects running headers, footers and page numbers across a document.
#[derive(Debug, Clone, Default)]
pub struct NoiseDetector {
    options: NoiseOptions,
}

impl NoiseDetector {
    /// Create a detector with the given options.
    pub fn new(options: NoiseOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &NoiseOptions {
        &self.options
    }

    /// Tag noise elements in place and report what was found.
    pub fn tag(&self, doc: &mut Document) -> NoiseReport {
        let page_count = doc.pages.len();
        if page_count < MIN_PAGES {
            log::debug!(
                "Noise detection skipped: {} pages (need {})",
                page_count,
                MIN_PAGES
            );
            return NoiseReport {
                page_count,
                ..Default::default()
            };
        }

        let repeaters = self.find_repeaters(&doc.pages);
        let page_number_slots = self.find_page_numbers(&doc.pages);

        let mut report = NoiseReport {
            active: true,
            page_count,
            repeaters: repeaters.iter().cloned().collect(),
            ..Default::default()
        };
        let mut repeated_body = BTreeSet::new();

        for (page_idx, page) in doc.pages.iter_mut().enumerate() {
            let span = page.vertical_span();
            for (elem_idx, element) in page.elements.iter_mut().enumerate() {
                if page_number_slots.contains(&(page_idx, elem_idx)) {
                    element.noise_type = Some(NoiseType::PageNumber);
                    report.page_numbers += 1;
                    continue;
                }
                if !element.is_text() || !repeaters.contains(element.stripped_text()) {
                    continue;
                }
                match span.and_then(|s| edge_position(element, s)) {
                    Some(NoiseType::Header) => {
                        element.noise_type = Some(NoiseType::Header);
                        report.headers += 1;
                    }
                    Some(NoiseType::Footer) => {
                        element.noise_type = Some(NoiseType::Footer);
                        report.footers += 1;
                    }
                    _ => {
                        repeated_body.insert(element.stripped_text().to_string());
                    }
                }
            }
        }

        report.repeated_body = repeated_body.into_iter().collect();
        log::debug!(
            "Noise: {} repeaters, tagged {} headers, {} footers, {} page numbers",
            report.repeaters.len(),
            report.headers,
            report.footers,
            report.page_numbers
        );
        report
    }

    /// Texts appearing on at least `threshold` of the pages (once per page).
    fn find_repeaters(&self, pages: &[Page]) -> BTreeSet<String> {
        let mut frequency: HashMap<&str, usize> = HashMap::new();
        for page in pages {
            let unique: HashSet<&str> = page
                .elements
                .iter()
                .filter(|e| e.is_text())
                .map(|e| e.stripped_text())
                .filter(|t| t.chars().count() > self.options.min_text_len)
                .collect();
            for text in unique {
                *frequency.entry(text).or_insert(0) += 1;
            }
        }

        let total = pages.len() as f32;
        frequency
            .into_iter()
            .filter(|(_, count)| *count as f32 / total >= self.options.threshold)
            .map(|(text, _)| text.to_string())
            .collect()
    }

    /// `(page index, element index)` of elements forming a page-number sequence.
    ///
    /// Candidates sit in the header or footer band and are grouped by the
    /// text around the number; within a group the numbers must advance by
    /// exactly one per page, i.e. share the same offset from the page index.
    fn find_page_numbers(&self, pages: &[Page]) -> HashSet<(usize, usize)> {
        let mut groups: HashMap<(&str, &str, i64), Vec<(usize, usize)>> = HashMap::new();
        for (page_idx, page) in pages.iter().enumerate() {
            let Some(span) = page.vertical_span() else {
                continue;
            };
            for (elem_idx, element) in page.elements.iter().enumerate() {
                if !element.is_text() || edge_position(element, span).is_none() {
                    continue;
                }
                if let Some((prefix, number, suffix)) = split_page_number(element.stripped_text())
                {
                    let offset = number - page_idx as i64;
                    groups
                        .entry((prefix, suffix, offset))
                        .or_default()
                        .push((page_idx, elem_idx));
                }
            }
        }

        let total = pages.len() as f32;
        let mut slots = HashSet::new();
        for ((prefix, suffix, offset), members) in groups {
            let distinct_pages: HashSet<usize> = members.iter().map(|(p, _)| *p).collect();
            if distinct_pages.len() as f32 / total >= self.options.threshold {
                log::trace!(
                    "Page number sequence {:?}N{:?} (offset {}) on {} pages",
                    prefix,
                    suffix,
                    offset,
                    distinct_pages.len()
                );
                slots.extend(members);
            }
        }
        slots
    }
}

/// Split `"Page 12"` into `("Page ", 12, "")`.
///
/// The non-digit characters before the first and after the last digit are
/// the affixes; everything between must be ASCII digits.
fn split_page_number(text: &str) -> Option<(&str, i64, &str)> {
    let start = text.find(|c: char| c.is_ascii_digit())?;
    let end = text.rfind(|c: char| c.is_ascii_digit())? + 1;
    let digits = &text[start..end];
    if digits.len() > 6 || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    let number = digits.parse().ok()?;
    Some((&text[..start], number, &text[end..]))
}

/// Header/footer band of an element, by the vertical position of its centre.
fn edge_position(element: &Element, (top, bottom): (f32, f32)) -> Option<NoiseType> {
    let extent = bottom - top;
    if extent <= 0.0 {
        return None;
    }
    let (_, cy) = element.bbox.center();
    let rel = (cy - top) / extent;
    if rel <= EDGE_BAND {
        Some(NoiseType::Header)
    } else if rel >= 1.0 - EDGE_BAND {
        Some(NoiseType::Footer)
    } else {
        None
    }
}

/// Tag a document with default options.
pub fn tag_noise(doc: &mut Document) -> NoiseReport {
    NoiseDetector::default().tag(doc)
}
