//! Document conversion with pluggable recognition engines.
//!
//! Engines implement [`RecognitionEngine`] and are registered on a
//! [`Pipeline`]. The pipeline detects whether a source carries a usable text
//! layer, walks the matching [`FallbackPlan`] steps, and returns the first
//! output whose quality score meets the step threshold.
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//! use docflow::convert::{
//!     FallbackPlan, PageSource, Pipeline, PipelineOptions, TextLayerEngine,
//! };
//! use docflow::model::{DocumentInfo, RawElement};
//!
//! struct DigitalPage(Vec<RawElement>);
//!
//! impl PageSource for DigitalPage {
//!     fn positions_and_text(&self) -> Vec<RawElement> {
//!         self.0.clone()
//!     }
//!     fn image(&self) -> Option<&[u8]> {
//!         None
//!     }
//!     fn dimensions(&self) -> (f32, f32) {
//!         (612.0, 792.0)
//!     }
//! }
//!
//! let page = DigitalPage(vec![RawElement::new(
//!     [72.0, 100.0, 540.0, 114.0],
//!     "The committee approved the budget after a short discussion of the figures.",
//! )]);
//!
//! let options = PipelineOptions::new()
//!     .with_fallback(FallbackPlan::new().then_digital(TextLayerEngine::NAME, 0.0));
//! let pipeline = Pipeline::new(options).with_engine(Arc::new(TextLayerEngine));
//!
//! let result = pipeline.convert(&[&page], DocumentInfo::new("minutes.pdf"))?;
//! assert_eq!(result.method(), Some("TextLayer"));
//! # Ok::<(), docflow::Error>(())
//! ```

mod engine;
mod fallback;
mod pipeline;

pub use engine::{
    EngineOutput, ExtractionFailure, PageSource, RecognitionEngine, SourceKind, TextLayerEngine,
};
pub use fallback::{Attempt, AttemptOutcome, FallbackPlan, FallbackStep};
pub use pipeline::{ConvertResult, Pipeline, PipelineOptions};
