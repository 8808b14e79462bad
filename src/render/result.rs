//! Rendering result with provenance and statistics.

use serde::{Deserialize, Serialize};

use crate::model::{DocumentInfo, SemanticRole};

/// Result of rendering a document, including content and statistics.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RenderResult {
    /// The rendered Markdown
    pub content: String,

    /// Document provenance (copied from the source document)
    pub info: DocumentInfo,

    /// Extraction statistics
    pub stats: ExtractionStats,
}

impl RenderResult {
    /// Create a new render result.
    pub fn new(content: String, info: DocumentInfo, stats: ExtractionStats) -> Self {
        Self {
            content,
            info,
            stats,
        }
    }

    /// Get the content length in bytes.
    pub fn content_len(&self) -> usize {
        self.content.len()
    }
}

/// Statistics collected while rendering.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractionStats {
    /// Total number of pages rendered
    pub page_count: u32,

    /// Number of headings
    pub heading_count: u32,

    /// Number of paragraphs
    pub paragraph_count: u32,

    /// Number of list items
    pub list_item_count: u32,

    /// Number of captions
    pub caption_count: u32,

    /// Number of tables
    pub table_count: u32,

    /// Elements tagged as headers, footers or page numbers
    pub noise_count: u32,

    /// Elements rendered as uncertain
    pub uncertain_count: u32,

    /// Approximate word count (whitespace-separated tokens)
    pub word_count: u32,

    /// Character count (excluding whitespace)
    pub char_count: u32,
}

impl ExtractionStats {
    /// Create new empty statistics.
    pub fn new() -> Self {
        Self::default()
    }

    /// Increment page count.
    pub fn add_page(&mut self) {
        self.page_count += 1;
    }

    /// Count one rendered element by its role.
    pub fn add_role(&mut self, role: SemanticRole) {
        match role {
            SemanticRole::Heading => self.heading_count += 1,
            SemanticRole::ListItem => self.list_item_count += 1,
            SemanticRole::Caption => self.caption_count += 1,
            SemanticRole::Table => self.table_count += 1,
            SemanticRole::Header | SemanticRole::Footer | SemanticRole::PageNumber => {
                self.noise_count += 1
            }
            _ => self.paragraph_count += 1,
        }
    }

    /// Increment uncertain count.
    pub fn add_uncertain(&mut self) {
        self.uncertain_count += 1;
    }

    /// Add word and character counts from text.
    pub fn count_text(&mut self, text: &str) {
        self.word_count += text.split_whitespace().count() as u32;
        self.char_count += text.chars().filter(|c| !c.is_whitespace()).count() as u32;
    }

    /// Merge another stats instance into this one.
    pub fn merge(&mut self, other: &ExtractionStats) {
        self.page_count += other.page_count;
        self.heading_count += other.heading_count;
        self.paragraph_count += other.paragraph_count;
        self.list_item_count += other.list_item_count;
        self.caption_count += other.caption_count;
        self.table_count += other.table_count;
        self.noise_count += other.noise_count;
        self.uncertain_count += other.uncertain_count;
        self.word_count += other.word_count;
        self.char_count += other.char_count;
    }
}
