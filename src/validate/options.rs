//! Validator configuration.

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Options for the base Markdown validator.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ValidatorOptions {
    /// Name of the engine that produced the Markdown, used for the
    /// reputation part of the score (matched by substring)
    pub extraction_method: String,

    /// Mean recognition confidence in `[0, 1]`, when the engine reports one
    pub ocr_confidence: Option<f32>,
}

impl ValidatorOptions {
    /// Create new options with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the extraction method.
    pub fn with_method(mut self, method: impl Into<String>) -> Self {
        self.extraction_method = method.into();
        self
    }

    /// Set the recognition confidence.
    pub fn with_confidence(mut self, confidence: f32) -> Self {
        self.ocr_confidence = Some(confidence);
        self
    }

    /// Validate option ranges.
    pub fn validate(&self) -> Result<()> {
        if let Some(c) = self.ocr_confidence {
            if !(0.0..=1.0).contains(&c) {
                return Err(Error::InvalidOption(format!(
                    "ocr_confidence must be in [0, 1], got {}",
                    c
                )));
            }
        }
        Ok(())
    }
}

/// Options for validating vision-language model output.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct VlmOptions {
    /// Base validator options
    pub base: ValidatorOptions,

    /// Page count of the source; defaults to the number of page markers
    pub page_count: Option<usize>,

    /// Known word count (e.g. from the text layer) to check completeness against
    pub expected_word_count: Option<usize>,
}

impl VlmOptions {
    /// Create new options with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the base options.
    pub fn with_base(mut self, base: ValidatorOptions) -> Self {
        self.base = base;
        self
    }

    /// Set the source page count.
    pub fn with_page_count(mut self, pages: usize) -> Self {
        self.page_count = Some(pages);
        self
    }

    /// Set the ground-truth word count.
    pub fn with_expected_words(mut self, words: usize) -> Self {
        self.expected_word_count = Some(words);
        self
    }

    /// Validate option ranges.
    pub fn validate(&self) -> Result<()> {
        self.base.validate()
    }
}

impl Default for VlmOptions {
    fn default() -> Self {
        Self {
            base: ValidatorOptions::new().with_method("OpenRouter"),
            page_count: None,
            expected_word_count: None,
        }
    }
}

/// Options for validating local OCR output.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OcrOptions {
    /// Base validator options
    pub base: ValidatorOptions,

    /// Page count of the source; defaults to the number of page markers
    pub page_count: Option<usize>,

    /// Column count the layout is expected to have
    pub expected_columns: Option<usize>,

    /// Known word count to check completeness against
    pub expected_word_count: Option<usize>,

    /// Uncertain spans per 100 lines above which the output is flagged
    pub max_uncertain_percentage: f32,

    /// Minimum marked confidence below which the output is flagged
    pub min_confidence: f32,
}

impl OcrOptions {
    /// Create new options with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the base options.
    pub fn with_base(mut self, base: ValidatorOptions) -> Self {
        self.base = base;
        self
    }

    /// Set the source page count.
    pub fn with_page_count(mut self, pages: usize) -> Self {
        self.page_count = Some(pages);
        self
    }

    /// Set the expected column count.
    pub fn with_expected_columns(mut self, columns: usize) -> Self {
        self.expected_columns = Some(columns);
        self
    }

    /// Set the ground-truth word count.
    pub fn with_expected_words(mut self, words: usize) -> Self {
        self.expected_word_count = Some(words);
        self
    }

    /// Validate option ranges.
    pub fn validate(&self) -> Result<()> {
        self.base.validate()?;
        if !(0.0..=100.0).contains(&self.max_uncertain_percentage) {
            return Err(Error::InvalidOption(format!(
                "max_uncertain_percentage must be in [0, 100], got {}",
                self.max_uncertain_percentage
            )));
        }
        if !(0.0..=1.0).contains(&self.min_confidence) {
            return Err(Error::InvalidOption(format!(
                "min_confidence must be in [0, 1], got {}",
                self.min_confidence
            )));
        }
        Ok(())
    }
}

impl Default for OcrOptions {
    fn default() -> Self {
        Self {
            base: ValidatorOptions::new().with_method("RapidOCR"),
            page_count: None,
            expected_columns: None,
            expected_word_count: None,
            max_uncertain_percentage: 20.0,
            min_confidence: 0.5,
        }
    }
}
