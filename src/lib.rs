//! # docflow
//!
//! Layout reconstruction, cleanup and quality validation for RAG-ready
//! Markdown.
//!
//! OCR, table and vision-language engines deliver flat lists of positioned
//! fragments. This library rebuilds the document structure from them
//! (columns, reading order, semantic roles, running headers and footers),
//! renders annotated Markdown and scores how trustworthy the result is.
//!
//! ## Quick Start
//!
//! ```
//! use docflow::convert_json;
//!
//! let json = r#"[[
//!     {"bbox": [50, 40, 400, 70], "text": "Annual Report"},
//!     {"bbox": [50, 90, 250, 104], "text": "Sales rose in the first half."},
//!     {"bbox": [300, 90, 500, 104], "text": "Costs stayed flat.", "confidence": 0.4}
//! ]]"#;
//!
//! let result = convert_json(json)?;
//! assert!(result.markdown.contains("<!-- role:heading level:1 -->"));
//! assert!(result.markdown.contains("[uncertain: Costs stayed flat.]"));
//! println!("quality: {:.2}", result.report.quality_score);
//! # Ok::<(), docflow::Error>(())
//! ```
//!
//! ## Features
//!
//! - **Column detection and XY-cut reading order** from bounding boxes
//! - **Semantic roles**: headings with levels, list items, captions, tables
//! - **Non-destructive noise tagging** of running headers, footers and page numbers
//! - **Cleanup pipeline**: hyphenation repair, defragmentation, normalization
//! - **Validation**: syntax, schema, hallucination markers and a quality score,
//!   with specialisations for vision-language and local OCR output
//! - **Engine fallback**: pluggable recognition engines tried in order
//! - **Parallel processing**: Uses Rayon for multi-page documents

pub mod convert;
pub mod error;
pub mod layout;
pub mod model;
pub mod noise;
pub mod render;
pub mod validate;

// Re-export commonly used types
pub use convert::{
    ConvertResult, ExtractionFailure, FallbackPlan, PageSource, Pipeline, PipelineOptions,
    RecognitionEngine, SourceKind, TextLayerEngine,
};
pub use error::{Error, Result};
pub use layout::{Column, DocumentLayout, LayoutAnalyzer, LayoutOptions};
pub use model::{
    BBox, Document, DocumentInfo, Element, ElementKind, Metadata, NoiseType, Page, RawElement,
    SemanticRole, Table,
};
pub use noise::{NoiseDetector, NoiseOptions, NoiseReport};
pub use render::{
    CleanupOptions, CleanupPipeline, CleanupPreset, JsonFormat, NoiseHandling, RenderOptions,
};
pub use validate::{
    validate_markdown, EngineProfile, Validate, ValidationReport, ValidatorOptions,
};

/// Parse engine output in the element input contract.
///
/// # Example
///
/// ```
/// use docflow::parse_json;
///
/// let doc = parse_json(r#"[[{"bbox": [0, 0, 100, 12], "text": "Hello"}], []]"#).unwrap();
/// assert_eq!(doc.page_count(), 2);
/// ```
pub fn parse_json(json: &str) -> Result<Document> {
    Document::from_json(json)
}

/// Analyse, render and validate engine output with default options.
///
/// # Arguments
///
/// * `json` - Pages of positioned elements, see [`Document::from_json`]
pub fn convert_json(json: &str) -> Result<ConvertResult> {
    convert_json_with_options(json, PipelineOptions::default())
}

/// Analyse, render and validate engine output with custom options.
///
/// # Example
///
/// ```
/// use docflow::{convert_json_with_options, PipelineOptions, RenderOptions};
///
/// let options = PipelineOptions::new().with_render(RenderOptions::plain());
/// let result = convert_json_with_options(
///     r#"[[{"bbox": [0, 0, 300, 12], "text": "Plain output."}]]"#,
///     options,
/// )
/// .unwrap();
/// assert_eq!(result.markdown, "Plain output.\n");
/// ```
pub fn convert_json_with_options(json: &str, options: PipelineOptions) -> Result<ConvertResult> {
    let doc = Document::from_json(json)?;
    Pipeline::new(options).process(doc)
}

/// Convert engine output to annotated Markdown.
///
/// # Example
///
/// ```
/// use docflow::to_markdown;
///
/// let markdown = to_markdown(r#"[[{"bbox": [0, 0, 300, 12], "text": "Hello"}]]"#).unwrap();
/// assert!(markdown.contains("<!-- page:1 -->"));
/// ```
pub fn to_markdown(json: &str) -> Result<String> {
    Ok(convert_json(json)?.markdown)
}

/// Convert engine output to Markdown with custom render options.
pub fn to_markdown_with_options(json: &str, options: &RenderOptions) -> Result<String> {
    let pipeline_options = PipelineOptions::new().with_render(options.clone());
    Ok(convert_json_with_options(json, pipeline_options)?.markdown)
}

/// Convert engine output to the analysed document as JSON, with roles,
/// reading order and noise tags filled in.
pub fn to_json(json: &str, format: JsonFormat) -> Result<String> {
    let result = convert_json(json)?;
    render::to_json(&result.document, format)
}
