//! Semantic role classification from text patterns and relative size.

use once_cell::sync::Lazy;
use regex::Regex;

use super::LayoutOptions;
use crate::model::{Element, SemanticRole};

static RE_LIST_ITEM: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"^\s*(?:[•◦▪▫●○■□‣⁃∙·\-]\s+|(?:\d+|[a-zA-Z]|i{1,3}|iv|vi{0,3}|ix|x|I{1,3}|IV|VI{0,3}|IX|X)[.)]\s+)",
    )
    .unwrap()
});

static RE_CAPTION: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)^\s*(?:figure|fig\.|table|chart)\s+\d+(?:\.\d+)*(?::|\s)").unwrap());

/// Role assigned to a single element together with its heading level.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Classification {
    pub role: SemanticRole,
    pub heading_level: Option<u8>,
}

impl Classification {
    fn plain(role: SemanticRole) -> Self {
        Self {
            role,
            heading_level: None,
        }
    }
}

/// Median height of the page's non-empty text elements.
pub fn median_text_height(elements: &[Element]) -> Option<f32> {
    let mut heights: Vec<f32> = elements
        .iter()
        .filter(|e| e.is_text() && !e.stripped_text().is_empty())
        .map(|e| e.bbox.height())
        .collect();
    if heights.is_empty() {
        return None;
    }
    heights.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));
    let mid = heights.len() / 2;
    Some(if heights.len() % 2 == 0 {
        (heights[mid - 1] + heights[mid]) / 2.0
    } else {
        heights[mid]
    })
}

/// Classify one element. First matching rule wins: table, list item,
/// caption, heading, paragraph.
pub fn classify_element(
    element: &Element,
    median_height: Option<f32>,
    options: &LayoutOptions,
) -> Classification {
    if element.is_table() {
        return Classification::plain(SemanticRole::Table);
    }

    let text = element.stripped_text();
    if RE_LIST_ITEM.is_match(text) {
        return Classification::plain(SemanticRole::ListItem);
    }
    if RE_CAPTION.is_match(text) {
        return Classification::plain(SemanticRole::Caption);
    }

    if let Some(median) = median_height.filter(|m| *m > 0.0) {
        let ratio = element.bbox.height() / median;
        let words = element.word_count();
        if ratio >= options.heading_height_ratio && words > 0 && words <= options.max_heading_words
        {
            let level = if ratio >= 2.0 {
                1
            } else if ratio >= 1.6 {
                2
            } else {
                3
            };
            return Classification {
                role: SemanticRole::Heading,
                heading_level: Some(level),
            };
        }
    }

    Classification::plain(SemanticRole::Paragraph)
}

/// Assign `semantic_role` (and `heading_level`) to every element of a page.
///
/// Noise-tagged elements take the role matching their tag.
pub fn classify_page(elements: &mut [Element], options: &LayoutOptions) {
    let median = median_text_height(elements);
    for element in elements.iter_mut() {
        if let Some(noise) = element.noise_type {
            element.semantic_role = Some(noise.role());
            element.heading_level = None;
            continue;
        }
        let class = classify_element(element, median, options);
        element.semantic_role = Some(class.role);
        element.heading_level = class.heading_level;
    }
}
