//! The boundary to external recognition engines.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::model::RawElement;
use crate::validate::EngineProfile;

/// Why an engine attempt produced nothing usable.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ExtractionFailure {
    /// No engine with this name is registered, or it cannot run here.
    #[error("Engine {engine} is unavailable")]
    EngineUnavailable { engine: String },

    /// The engine did not answer in time.
    #[error("Engine {engine} timed out after {seconds}s")]
    Timeout { engine: String, seconds: u64 },

    /// The engine ran but returned no content.
    #[error("Engine {engine} produced no output")]
    EmptyOutput { engine: String },

    /// Any other engine-side failure.
    #[error("Engine {engine} failed: {message}")]
    Engine { engine: String, message: String },
}

impl ExtractionFailure {
    /// Name of the engine that failed.
    pub fn engine(&self) -> &str {
        match self {
            ExtractionFailure::EngineUnavailable { engine }
            | ExtractionFailure::Timeout { engine, .. }
            | ExtractionFailure::EmptyOutput { engine }
            | ExtractionFailure::Engine { engine, .. } => engine,
        }
    }
}

/// A page as seen by the engines: its text layer (possibly empty), its
/// rasterized image and its size.
pub trait PageSource {
    /// Positioned text-layer fragments. Empty for scans.
    fn positions_and_text(&self) -> Vec<RawElement>;

    /// Encoded page image, when the page has been rasterized.
    fn image(&self) -> Option<&[u8]>;

    /// `(width, height)` in the coordinate space of the fragments.
    fn dimensions(&self) -> (f32, f32);

    /// Concatenated text layer.
    fn text_layer(&self) -> String {
        self.positions_and_text()
            .iter()
            .map(|e| e.text.as_str())
            .collect::<Vec<_>>()
            .join("\n")
    }
}

/// What an engine returns for one page.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EngineOutput {
    /// Positioned fragments in the element input contract
    pub elements: Vec<RawElement>,

    /// Page-level confidence, when the engine reports one instead of (or in
    /// addition to) per-element values
    pub confidence: Option<f32>,
}

impl EngineOutput {
    /// Create output from fragments.
    pub fn new(elements: Vec<RawElement>) -> Self {
        Self {
            elements,
            confidence: None,
        }
    }

    /// Set the page-level confidence.
    pub fn with_confidence(mut self, confidence: f32) -> Self {
        self.confidence = Some(confidence);
        self
    }

    /// Check whether the output holds no fragment with content.
    pub fn is_empty(&self) -> bool {
        self.elements
            .iter()
            .all(|e| e.text.trim().is_empty() && e.cells.is_none())
    }

    /// Page-level confidence, or the mean of the element confidences.
    pub fn mean_confidence(&self) -> Option<f32> {
        if self.confidence.is_some() {
            return self.confidence;
        }
        let values: Vec<f32> = self.elements.iter().filter_map(|e| e.confidence).collect();
        if values.is_empty() {
            None
        } else {
            Some(values.iter().sum::<f32>() / values.len() as f32)
        }
    }
}

/// An external OCR, table or vision-language engine.
///
/// Implementations are owned by the caller; this crate never constructs a
/// network client or model handle itself.
pub trait RecognitionEngine: Send + Sync {
    /// Engine name. Also used as the extraction method in frontmatter and
    /// for the reputation part of the quality score.
    fn name(&self) -> &str;

    /// Validator profile for this engine's output.
    fn profile(&self) -> EngineProfile {
        EngineProfile::from_method(self.name())
    }

    /// Recognize one page.
    fn recognize(&self, page: &dyn PageSource) -> Result<EngineOutput, ExtractionFailure>;
}

/// Engine that passes a digital text layer through unchanged.
#[derive(Debug, Clone, Copy, Default)]
pub struct TextLayerEngine;

impl TextLayerEngine {
    /// Engine name.
    pub const NAME: &'static str = "TextLayer";
}

impl RecognitionEngine for TextLayerEngine {
    fn name(&self) -> &str {
        Self::NAME
    }

    fn profile(&self) -> EngineProfile {
        EngineProfile::TextLayer
    }

    fn recognize(&self, page: &dyn PageSource) -> Result<EngineOutput, ExtractionFailure> {
        Ok(EngineOutput::new(page.positions_and_text()))
    }
}

/// Whether a document carries a usable text layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceKind {
    /// Born-digital: text can be read from the text layer
    Digital,
    /// Scanned or image-only: text must be recognized
    Scanned,
}

impl SourceKind {
    /// Characters (after trimming) a text layer must exceed to count as digital.
    pub const TEXT_LAYER_THRESHOLD: usize = 50;

    /// Classify by the text layer of the first page.
    pub fn detect(text_layer: &str) -> Self {
        if text_layer.trim().chars().count() > Self::TEXT_LAYER_THRESHOLD {
            SourceKind::Digital
        } else {
            SourceKind::Scanned
        }
    }

    /// Classify a document by its first page.
    pub fn detect_pages(pages: &[&dyn PageSource]) -> Self {
        pages
            .first()
            .map(|p| Self::detect(&p.text_layer()))
            .unwrap_or(SourceKind::Scanned)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Scan;

    impl PageSource for Scan {
        fn positions_and_text(&self) -> Vec<RawElement> {
            Vec::new()
        }
        fn image(&self) -> Option<&[u8]> {
            Some(&b"\x89PNG"[..])
        }
        fn dimensions(&self) -> (f32, f32) {
            (612.0, 792.0)
        }
    }

    #[test]
    fn test_source_kind_detect() {
        assert_eq!(SourceKind::detect(""), SourceKind::Scanned);
        assert_eq!(SourceKind::detect(&"a".repeat(50)), SourceKind::Scanned);
        assert_eq!(SourceKind::detect(&"a".repeat(51)), SourceKind::Digital);
        assert_eq!(
            SourceKind::detect(&format!("   {}   ", "a".repeat(50))),
            SourceKind::Scanned
        );
    }

    #[test]
    fn test_detect_pages_uses_first_page() {
        let scan = Scan;
        let pages: Vec<&dyn PageSource> = vec![&scan];
        assert_eq!(SourceKind::detect_pages(&pages), SourceKind::Scanned);
        assert_eq!(SourceKind::detect_pages(&[]), SourceKind::Scanned);
    }

    #[test]
    fn test_engine_output() {
        let output = EngineOutput::new(vec![
            RawElement {
                confidence: Some(0.8),
                ..RawElement::new([0.0, 0.0, 1.0, 1.0], "a")
            },
            RawElement {
                confidence: Some(0.6),
                ..RawElement::new([0.0, 0.0, 1.0, 1.0], "  ")
            },
        ]);
        assert!(!output.is_empty());
        assert!((output.mean_confidence().unwrap() - 0.7).abs() < 1e-6);
        assert_eq!(output.clone().with_confidence(0.9).mean_confidence(), Some(0.9));
        assert!(EngineOutput::default().is_empty());
    }

    #[test]
    fn test_failure_display() {
        let failure = ExtractionFailure::Timeout {
            engine: "OpenRouter".into(),
            seconds: 30,
        };
        assert_eq!(failure.to_string(), "Engine OpenRouter timed out after 30s");
        assert_eq!(failure.engine(), "OpenRouter");
    }

    #[test]
    fn test_text_layer_engine_on_scan() {
        let output = TextLayerEngine.recognize(&Scan).unwrap();
        assert!(output.is_empty());
        assert_eq!(TextLayerEngine.profile(), EngineProfile::TextLayer);
    }
}
