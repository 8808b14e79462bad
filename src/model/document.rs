//! Document-level types.

use serde::{Deserialize, Serialize};

use super::{Page, RawElement};
use crate::error::{Error, Result};

/// A document: ordered pages plus provenance information.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Document {
    /// Provenance and descriptive metadata
    #[serde(default)]
    pub info: DocumentInfo,

    /// Pages in the document
    #[serde(default)]
    pub pages: Vec<Page>,
}

impl Document {
    /// Create a new empty document.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a document from pages.
    pub fn from_pages(pages: Vec<Page>) -> Self {
        Self {
            info: DocumentInfo::default(),
            pages,
        }
    }

    /// Parse engine output in the element input contract.
    ///
    /// Accepts either a bare array of pages, each an array of elements, or an
    /// object `{"info": {...}, "pages": [...]}`. Pages inside the object form
    /// may also be objects carrying `width`/`height` next to `elements`.
    pub fn from_json(json: &str) -> Result<Self> {
        let input: DocumentInput = serde_json::from_str(json)?;
        let (info, raw_pages) = match input {
            DocumentInput::Pages(pages) => (DocumentInfo::default(), pages),
            DocumentInput::Object { info, pages } => (info, pages),
        };

        let pages = raw_pages
            .into_iter()
            .enumerate()
            .map(|(idx, raw)| {
                let number = u32::try_from(idx + 1)
                    .map_err(|_| Error::Other("too many pages".to_string()))?;
                raw.into_page(number)
            })
            .collect::<Result<Vec<_>>>()?;

        log::debug!("Ingested {} pages from JSON", pages.len());
        Ok(Self { info, pages })
    }

    /// Get the number of pages in the document.
    pub fn page_count(&self) -> u32 {
        self.pages.len() as u32
    }

    /// Get a page by number (1-indexed).
    pub fn get_page(&self, page_num: u32) -> Option<&Page> {
        if page_num == 0 {
            return None;
        }
        self.pages.get((page_num - 1) as usize)
    }

    /// Add a page to the document.
    pub fn add_page(&mut self, page: Page) {
        self.pages.push(page);
    }

    /// Check if the document has any pages.
    pub fn is_empty(&self) -> bool {
        self.pages.is_empty()
    }

    /// Total whitespace-separated tokens across all pages.
    pub fn word_count(&self) -> usize {
        self.pages.iter().map(|p| p.word_count()).sum()
    }

    /// Get plain text content of the entire document.
    pub fn plain_text(&self) -> String {
        self.pages
            .iter()
            .map(|page| page.plain_text())
            .collect::<Vec<_>>()
            .join("\n\n")
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum DocumentInput {
    Pages(Vec<PageInput>),
    Object {
        #[serde(default)]
        info: DocumentInfo,
        pages: Vec<PageInput>,
    },
}

#[derive(Deserialize)]
#[serde(untagged)]
enum PageInput {
    Elements(Vec<RawElement>),
    Sized {
        #[serde(default)]
        width: Option<f32>,
        #[serde(default)]
        height: Option<f32>,
        #[serde(default)]
        elements: Vec<RawElement>,
    },
}

impl PageInput {
    fn into_page(self, number: u32) -> Result<Page> {
        match self {
            PageInput::Elements(raw) => Page::from_raw(number, raw),
            PageInput::Sized {
                width,
                height,
                elements,
            } => {
                let mut page = Page::from_raw(number, elements)?;
                page.width = width;
                page.height = height;
                Ok(page)
            }
        }
    }
}

/// Provenance written to the YAML frontmatter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DocumentInfo {
    /// File name of the source document
    pub source_file: Option<String>,

    /// Pixel dimensions and format, for single-image sources
    pub image: Option<ImageInfo>,

    /// Name of the engine that produced the content
    pub extraction_method: Option<String>,

    /// ISO 8601 timestamp of the extraction
    pub extraction_date: Option<String>,

    /// Overall confidence/quality in `[0, 1]`
    pub confidence_score: Option<f32>,

    /// Language code
    pub language: String,

    /// Deterministic identifier (first 16 hex chars of the SHA-256 of the source)
    pub document_id: Option<String>,

    /// Word count of the source's own text layer, used as completeness ground truth
    pub text_layer_word_count: Option<usize>,

    /// Descriptive metadata
    pub metadata: Metadata,
}

impl Default for DocumentInfo {
    fn default() -> Self {
        Self {
            source_file: None,
            image: None,
            extraction_method: None,
            extraction_date: None,
            confidence_score: None,
            language: "en".to_string(),
            document_id: None,
            text_layer_word_count: None,
            metadata: Metadata::default(),
        }
    }
}

impl DocumentInfo {
    /// Create info for a named source file.
    pub fn new(source_file: impl Into<String>) -> Self {
        Self {
            source_file: Some(source_file.into()),
            ..Default::default()
        }
    }

    /// Set the extraction method.
    pub fn with_method(mut self, method: impl Into<String>) -> Self {
        self.extraction_method = Some(method.into());
        self
    }

    /// Set the document identifier.
    pub fn with_document_id(mut self, id: impl Into<String>) -> Self {
        self.document_id = Some(id.into());
        self
    }

    /// Mark the source as a single image.
    pub fn with_image(mut self, width: u32, height: u32, format: impl Into<String>) -> Self {
        self.image = Some(ImageInfo {
            width,
            height,
            format: format.into(),
        });
        self
    }
}

/// Dimensions of an image source.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageInfo {
    /// Width in pixels
    pub width: u32,
    /// Height in pixels
    pub height: u32,
    /// Image format (PNG, JPEG, ...)
    pub format: String,
}

/// Descriptive document metadata.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Metadata {
    /// Document title
    pub title: Option<String>,

    /// Document author
    pub author: Option<String>,

    /// Document subject
    pub subject: Option<String>,

    /// Creator application
    pub creator: Option<String>,

    /// Creation date (ISO 8601)
    pub creation_date: Option<String>,
}

impl Metadata {
    /// Check if no field is set.
    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.author.is_none()
            && self.subject.is_none()
            && self.creator.is_none()
            && self.creation_date.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_document_new() {
        let doc = Document::new();
        assert!(doc.is_empty());
        assert_eq!(doc.page_count(), 0);
        assert_eq!(doc.info.language, "en");
    }

    #[test]
    fn test_get_page() {
        let mut doc = Document::new();
        doc.add_page(Page::new(1));
        doc.add_page(Page::new(2));

        assert!(doc.get_page(0).is_none());
        assert_eq!(doc.get_page(2).map(|p| p.number), Some(2));
        assert!(doc.get_page(3).is_none());
    }

    #[test]
    fn test_from_json_array_of_pages() {
        let json = r#"[
            [{"bbox": [50, 100, 250, 120], "text": "Left", "kind": "text"}],
            [{"bbox": [50, 100, 250, 120], "text": "Next", "kind": "text", "confidence": 0.4}]
        ]"#;
        let doc = Document::from_json(json).unwrap();
        assert_eq!(doc.page_count(), 2);
        assert_eq!(doc.pages[1].number, 2);
        assert_eq!(doc.pages[1].elements[0].confidence, Some(0.4));
    }

    #[test]
    fn test_from_json_object_form() {
        let json = r#"{
            "info": {"source_file": "report.pdf", "extraction_method": "RapidOCR"},
            "pages": [
                {"width": 612, "height": 792, "elements": [
                    {"bbox": [10, 10, 20, 20], "text": "x"}
                ]}
            ]
        }"#;
        let doc = Document::from_json(json).unwrap();
        assert_eq!(doc.info.source_file.as_deref(), Some("report.pdf"));
        assert_eq!(doc.info.language, "en");
        assert_eq!(doc.pages[0].height, Some(792.0));
    }

    #[test]
    fn test_from_json_rejects_invalid_elements() {
        let json = r#"[[{"bbox": [10, 10, 5, 20], "text": "bad"}]]"#;
        assert!(matches!(
            Document::from_json(json),
            Err(Error::InvalidGeometry { page: 1, .. })
        ));
        assert!(matches!(Document::from_json("{"), Err(Error::Json(_))));
    }

    #[test]
    fn test_metadata_is_empty() {
        let mut meta = Metadata::default();
        assert!(meta.is_empty());
        meta.title = Some("Annual Report".into());
        assert!(!meta.is_empty());
    }
}
