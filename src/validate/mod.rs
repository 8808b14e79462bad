//! Quality validation of extracted Markdown.
//!
//! Validation never fails: every check accepts any input and reports what
//! it found in a [`ValidationReport`]. Whether a low score should trigger a
//! fallback engine is left to the caller (see [`crate::convert::FallbackPlan`]).

pub mod checks;
mod markdown;
mod ocr;
mod options;
mod report;
mod vlm;

use serde::{Deserialize, Serialize};

pub use markdown::{validate_markdown, MarkdownValidator};
pub use ocr::OcrValidator;
pub use options::{OcrOptions, ValidatorOptions, VlmOptions};
pub use report::{
    AnnotationSummary, CompletenessSummary, ConfidenceSummary, HallucinationKind,
    HallucinationMarker, Issue, IssueKind, LayoutSummary, Metrics, ReadingOrderSummary, Severity,
    ValidationReport, Warning, WarningKind,
};
pub use vlm::VlmValidator;

/// A validator turns Markdown into a report.
pub trait Validate {
    /// Validate `markdown`. Must not panic on any input.
    fn validate(&self, markdown: &str) -> ValidationReport;
}

/// The kind of engine that produced a piece of Markdown, which decides the
/// validator used for it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EngineProfile {
    /// Remote vision-language model
    Vlm,
    /// Local OCR with layout analysis
    LocalOcr,
    /// Text extracted from a digital text layer
    #[default]
    TextLayer,
}

impl EngineProfile {
    /// Guess the profile from an extraction method name.
    pub fn from_method(method: &str) -> Self {
        let lower = method.to_lowercase();
        if ["openrouter", "qwen", "gemini", "vlm"]
            .iter()
            .any(|name| lower.contains(name))
        {
            EngineProfile::Vlm
        } else if ["rapidocr", "ocr", "surya", "tesseract"]
            .iter()
            .any(|name| lower.contains(name))
        {
            EngineProfile::LocalOcr
        } else {
            EngineProfile::TextLayer
        }
    }

    /// Build the validator for this profile.
    ///
    /// `page_count` and `expected_words` feed the completeness estimate of
    /// the engine-specific validators; the text-layer validator ignores them.
    pub fn validator(
        self,
        base: ValidatorOptions,
        page_count: Option<usize>,
        expected_words: Option<usize>,
    ) -> Box<dyn Validate + Send + Sync> {
        match self {
            EngineProfile::Vlm => Box::new(VlmValidator::new(VlmOptions {
                base,
                page_count,
                expected_word_count: expected_words,
            })),
            EngineProfile::LocalOcr => Box::new(OcrValidator::new(OcrOptions {
                base,
                page_count,
                expected_word_count: expected_words,
                ..OcrOptions::default()
            })),
            EngineProfile::TextLayer => Box::new(MarkdownValidator::new(base)),
        }
    }
}
