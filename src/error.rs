//! Error types for the docflow library.
//!
//! Validation never produces an [`Error`]: malformed Markdown is reported
//! through a [`ValidationReport`](crate::validate::ValidationReport). Errors are
//! reserved for the ingestion boundary, configuration and external engines.

use thiserror::Error;

use crate::convert::ExtractionFailure;

/// Result type alias for docflow operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error types that can occur while ingesting, analysing or rendering a document.
#[derive(Error, Debug)]
pub enum Error {
    /// A bounding box violates `x0 < x1, y0 < y1` or holds non-finite values.
    #[error("Invalid bounding box on page {page}: ({x0}, {y0}, {x1}, {y1})")]
    InvalidGeometry {
        /// Page number (1-indexed) the element belongs to
        page: u32,
        /// Left edge
        x0: f32,
        /// Top edge
        y0: f32,
        /// Right edge
        x1: f32,
        /// Bottom edge
        y1: f32,
    },

    /// A recognition confidence outside `[0, 1]`.
    #[error("Confidence {value} on page {page} is outside [0, 1]")]
    InvalidConfidence {
        /// Page number (1-indexed) the element belongs to
        page: u32,
        /// Offending value
        value: f32,
    },

    /// An element that cannot be accepted for another reason.
    #[error("Invalid element: {0}")]
    InvalidElement(String),

    /// A configuration value outside its allowed range.
    #[error("Invalid option: {0}")]
    InvalidOption(String),

    /// JSON (de)serialization failure.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Error during rendering.
    #[error("Rendering error: {0}")]
    Render(String),

    /// An external recognition engine failed.
    #[error("Extraction failed: {0}")]
    Extraction(#[from] ExtractionFailure),

    /// Generic error with message.
    #[error("{0}")]
    Other(String),
}
