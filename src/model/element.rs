//! Positioned content fragments and their structural annotations.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::{BBox, Table};
use crate::error::{Error, Result};

/// What kind of fragment an engine produced.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ElementKind {
    /// Recognized text
    #[default]
    Text,
    /// A table region
    Table,
}

/// Coarse structural role of an element.
///
/// The first nine variants are produced by the layout pipeline; `Footnote`,
/// `Equation` and `Code` only appear in Markdown written by generative engines
/// and are accepted by the validators.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SemanticRole {
    Heading,
    Paragraph,
    ListItem,
    Caption,
    Table,
    Header,
    Footer,
    PageNumber,
    Artifact,
    Footnote,
    Equation,
    Code,
}

impl SemanticRole {
    /// Every role name accepted in `<!-- role:ROLE -->` markers.
    pub const ALL: [SemanticRole; 12] = [
        SemanticRole::Heading,
        SemanticRole::Paragraph,
        SemanticRole::ListItem,
        SemanticRole::Table,
        SemanticRole::Caption,
        SemanticRole::Footnote,
        SemanticRole::Header,
        SemanticRole::Footer,
        SemanticRole::PageNumber,
        SemanticRole::Artifact,
        SemanticRole::Equation,
        SemanticRole::Code,
    ];

    /// The marker name of this role.
    pub fn as_str(&self) -> &'static str {
        match self {
            SemanticRole::Heading => "heading",
            SemanticRole::Paragraph => "paragraph",
            SemanticRole::ListItem => "list_item",
            SemanticRole::Caption => "caption",
            SemanticRole::Table => "table",
            SemanticRole::Header => "header",
            SemanticRole::Footer => "footer",
            SemanticRole::PageNumber => "page_number",
            SemanticRole::Artifact => "artifact",
            SemanticRole::Footnote => "footnote",
            SemanticRole::Equation => "equation",
            SemanticRole::Code => "code",
        }
    }

    /// Whether the role marks page furniture rather than content.
    pub fn is_noise(&self) -> bool {
        matches!(
            self,
            SemanticRole::Header
                | SemanticRole::Footer
                | SemanticRole::PageNumber
                | SemanticRole::Artifact
        )
    }
}

impl fmt::Display for SemanticRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SemanticRole {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        SemanticRole::ALL
            .iter()
            .copied()
            .find(|role| role.as_str() == s)
            .ok_or_else(|| Error::InvalidElement(format!("unknown semantic role: {}", s)))
    }
}

/// Structural noise detected across pages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NoiseType {
    Header,
    Footer,
    PageNumber,
}

impl NoiseType {
    /// The semantic role an element with this tag is rendered with.
    pub fn role(&self) -> SemanticRole {
        match self {
            NoiseType::Header => SemanticRole::Header,
            NoiseType::Footer => SemanticRole::Footer,
            NoiseType::PageNumber => SemanticRole::PageNumber,
        }
    }
}

/// A positioned content fragment.
///
/// Geometry and text are fixed at ingestion; the remaining fields are filled
/// in additively by the pipeline stages.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Element {
    /// Bounding box in page coordinates
    pub bbox: BBox,

    /// Extracted text (may be empty for tables)
    pub text: String,

    /// Fragment kind
    pub kind: ElementKind,

    /// Recognition confidence in `[0, 1]`, `None` when not measured
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub confidence: Option<f32>,

    /// Column index assigned by the column detector
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub column_id: Option<usize>,

    /// 1-based position in the page's reading order
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reading_order: Option<u32>,

    /// Structural role
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub semantic_role: Option<SemanticRole>,

    /// Heading level (1-3) when the role is `heading`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub heading_level: Option<u8>,

    /// Cross-page noise tag
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub noise_type: Option<NoiseType>,

    /// Set when confidence fell below the filter threshold
    #[serde(default)]
    pub uncertain: bool,

    /// Cell text for table elements
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub table: Option<Table>,
}

impl Element {
    /// Create a text element.
    pub fn text(bbox: BBox, text: impl Into<String>) -> Self {
        Self {
            bbox,
            text: text.into(),
            kind: ElementKind::Text,
            confidence: None,
            column_id: None,
            reading_order: None,
            semantic_role: None,
            heading_level: None,
            noise_type: None,
            uncertain: false,
            table: None,
        }
    }

    /// Create a table element from recognized cells.
    pub fn table(bbox: BBox, table: Table) -> Self {
        Self {
            kind: ElementKind::Table,
            text: table.plain_text(),
            table: Some(table),
            ..Self::text(bbox, String::new())
        }
    }

    /// Set the recognition confidence.
    pub fn with_confidence(mut self, confidence: f32) -> Self {
        self.confidence = Some(confidence);
        self
    }

    /// Text with surrounding whitespace removed.
    pub fn stripped_text(&self) -> &str {
        self.text.trim()
    }

    /// Check if this element is a text fragment.
    pub fn is_text(&self) -> bool {
        self.kind == ElementKind::Text
    }

    /// Check if this element is a table.
    pub fn is_table(&self) -> bool {
        self.kind == ElementKind::Table
    }

    /// Number of whitespace-separated tokens.
    pub fn word_count(&self) -> usize {
        self.text.split_whitespace().count()
    }
}

/// An element exactly as delivered by an extraction engine.
///
/// This is the ingestion boundary: [`RawElement::into_element`] checks the
/// geometric and confidence invariants before anything downstream sees it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawElement {
    /// `[x0, y0, x1, y1]`
    pub bbox: [f32; 4],

    /// Extracted text
    #[serde(default)]
    pub text: String,

    /// Fragment kind
    #[serde(default)]
    pub kind: ElementKind,

    /// Optional recognition confidence
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub confidence: Option<f32>,

    /// Optional table cell text, row-major
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cells: Option<Vec<Vec<String>>>,
}

impl RawElement {
    /// Create a raw text fragment.
    pub fn new(bbox: [f32; 4], text: impl Into<String>) -> Self {
        Self {
            bbox,
            text: text.into(),
            kind: ElementKind::Text,
            confidence: None,
            cells: None,
        }
    }

    /// Validate and convert into a typed [`Element`] belonging to `page`.
    pub fn into_element(self, page: u32) -> Result<Element> {
        let [x0, y0, x1, y1] = self.bbox;
        let bbox = BBox::new(x0, y0, x1, y1);
        if !bbox.is_valid() {
            return Err(Error::InvalidGeometry {
                page,
                x0,
                y0,
                x1,
                y1,
            });
        }

        if let Some(value) = self.confidence {
            if !(0.0..=1.0).contains(&value) {
                return Err(Error::InvalidConfidence { page, value });
            }
        }

        if self.kind == ElementKind::Text && self.cells.is_some() {
            return Err(Error::InvalidElement(format!(
                "text element on page {} carries table cells",
                page
            )));
        }

        let mut element = match self.cells {
            Some(cells) => {
                let mut element = Element::table(bbox, Table::from_cells(cells));
                if !self.text.is_empty() {
                    element.text = self.text;
                }
                element
            }
            None => Element {
                kind: self.kind,
                ..Element::text(bbox, self.text)
            },
        };
        element.confidence = self.confidence;
        Ok(element)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_names_round_trip_through_from_str() {
        for role in SemanticRole::ALL {
            assert_eq!(role.as_str().parse::<SemanticRole>().unwrap(), role);
        }
        assert!("sidebar".parse::<SemanticRole>().is_err());
    }

    #[test]
    fn test_noise_type_roles() {
        assert_eq!(NoiseType::Header.role(), SemanticRole::Header);
        assert_eq!(NoiseType::PageNumber.role(), SemanticRole::PageNumber);
        assert!(SemanticRole::Footer.is_noise());
        assert!(!SemanticRole::Paragraph.is_noise());
    }

    #[test]
    fn test_raw_element_ingestion() {
        let raw = RawElement {
            confidence: Some(0.92),
            ..RawElement::new([50.0, 100.0, 250.0, 120.0], "Hello")
        };
        let element = raw.into_element(1).unwrap();
        assert_eq!(element.text, "Hello");
        assert_eq!(element.confidence, Some(0.92));
        assert!(element.is_text());
        assert_eq!(element.column_id, None);
    }

    #[test]
    fn test_raw_element_rejects_inverted_bbox() {
        let raw = RawElement::new([250.0, 100.0, 50.0, 120.0], "Backwards");
        let err = raw.into_element(3).unwrap_err();
        assert!(matches!(err, Error::InvalidGeometry { page: 3, .. }));
    }

    #[test]
    fn test_raw_element_rejects_out_of_range_confidence() {
        let raw = RawElement {
            confidence: Some(1.2),
            ..RawElement::new([0.0, 0.0, 10.0, 10.0], "x")
        };
        assert!(matches!(
            raw.into_element(1),
            Err(Error::InvalidConfidence { .. })
        ));
    }

    #[test]
    fn test_raw_table_element() {
        let raw = RawElement {
            kind: ElementKind::Table,
            cells: Some(vec![
                vec!["Q".into(), "Revenue".into()],
                vec!["Q1".into(), "10".into()],
            ]),
            ..RawElement::new([0.0, 0.0, 100.0, 50.0], "")
        };
        let element = raw.into_element(1).unwrap();
        assert!(element.is_table());
        assert_eq!(element.table.as_ref().map(|t| t.row_count()), Some(2));
        assert_eq!(element.text, "Q\tRevenue\nQ1\t10");
    }

    #[test]
    fn test_raw_element_deserializes_from_contract() {
        let json = r#"{"bbox": [50, 100, 250, 120], "text": "Col1", "kind": "text", "confidence": 0.8}"#;
        let raw: RawElement = serde_json::from_str(json).unwrap();
        assert_eq!(raw.kind, ElementKind::Text);
        assert_eq!(raw.confidence, Some(0.8));
    }
}
