//! End-to-end conversion: ingestion, layout analysis, rendering, cleanup
//! and validation, with engine fallback.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use super::{
    Attempt, AttemptOutcome, ExtractionFailure, FallbackPlan, PageSource, RecognitionEngine,
    SourceKind,
};
use crate::error::{Error, Result};
use crate::layout::{DocumentLayout, LayoutAnalyzer, LayoutOptions};
use crate::model::{Document, DocumentInfo, Page};
use crate::noise::{NoiseOptions, NoiseReport};
use crate::render::{
    extraction_timestamp, to_markdown_with_stats, ExtractionStats, RenderOptions,
};
use crate::validate::{EngineProfile, ValidationReport, ValidatorOptions};

/// Configuration for the whole pipeline.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineOptions {
    /// Column, classification and confidence settings
    pub layout: LayoutOptions,

    /// Cross-page noise detection settings
    pub noise: NoiseOptions,

    /// Markdown output settings
    pub render: RenderOptions,

    /// Validator to use; derived from the extraction method when unset
    pub profile: Option<EngineProfile>,

    /// Engine attempts per source kind
    pub fallback: FallbackPlan,
}

impl PipelineOptions {
    /// Create new pipeline options with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Load options from JSON; missing fields take their defaults.
    pub fn from_json(json: &str) -> Result<Self> {
        let options: Self = serde_json::from_str(json)?;
        options.validate()?;
        Ok(options)
    }

    /// Set layout options.
    pub fn with_layout(mut self, layout: LayoutOptions) -> Self {
        self.layout = layout;
        self
    }

    /// Set noise options.
    pub fn with_noise(mut self, noise: NoiseOptions) -> Self {
        self.noise = noise;
        self
    }

    /// Set render options.
    pub fn with_render(mut self, render: RenderOptions) -> Self {
        self.render = render;
        self
    }

    /// Force a validator profile.
    pub fn with_profile(mut self, profile: EngineProfile) -> Self {
        self.profile = Some(profile);
        self
    }

    /// Set the fallback plan.
    pub fn with_fallback(mut self, plan: FallbackPlan) -> Self {
        self.fallback = plan;
        self
    }

    /// Validate every nested option set.
    pub fn validate(&self) -> Result<()> {
        self.layout.validate()?;
        self.noise.validate()?;
        self.render.validate()?;
        self.fallback.validate()
    }
}

/// Result of converting one document.
#[derive(Debug, Clone)]
pub struct ConvertResult {
    /// Annotated Markdown
    pub markdown: String,

    /// The analysed document (roles, reading order and noise tags filled in)
    pub document: Document,

    /// Per-page layout facts and the noise report
    pub layout: DocumentLayout,

    /// Quality report for `markdown`
    pub report: ValidationReport,

    /// Rendering statistics
    pub stats: ExtractionStats,

    /// Engine attempts, in order; empty when the document was supplied directly
    pub attempts: Vec<Attempt>,
}

impl ConvertResult {
    /// Extraction method recorded in the document info.
    pub fn method(&self) -> Option<&str> {
        self.document.info.extraction_method.as_deref()
    }

    /// Noise detection summary.
    pub fn noise(&self) -> &NoiseReport {
        &self.layout.noise
    }

    /// Final quality score.
    pub fn quality_score(&self) -> f32 {
        self.report.quality_score
    }

    /// Get content length in bytes.
    pub fn content_len(&self) -> usize {
        self.markdown.len()
    }
}

/// Conversion pipeline with a set of registered engines.
///
/// # Example
///
/// ```
/// use docflow::convert::Pipeline;
/// use docflow::model::Document;
///
/// let json = r#"[[{"bbox": [50, 40, 300, 70], "text": "Quarterly Report"},
///                 {"bbox": [50, 90, 300, 104], "text": "Revenue grew in every region."}]]"#;
/// let doc = Document::from_json(json)?;
/// let result = Pipeline::default().process(doc)?;
/// assert!(result.markdown.contains("<!-- page:1 -->"));
/// # Ok::<(), docflow::Error>(())
/// ```
#[derive(Default)]
pub struct Pipeline {
    options: PipelineOptions,
    engines: Vec<Arc<dyn RecognitionEngine>>,
}

impl Pipeline {
    /// Create a pipeline without engines.
    pub fn new(options: PipelineOptions) -> Self {
        Self {
            options,
            engines: Vec::new(),
        }
    }

    /// Register an engine.
    pub fn with_engine(mut self, engine: Arc<dyn RecognitionEngine>) -> Self {
        self.register(engine);
        self
    }

    /// Register an engine. A later engine with the same name replaces the
    /// earlier one.
    pub fn register(&mut self, engine: Arc<dyn RecognitionEngine>) {
        self.engines
            .retain(|e| !e.name().eq_ignore_ascii_case(engine.name()));
        self.engines.push(engine);
    }

    /// Look up an engine by name (case-insensitive).
    pub fn engine(&self, name: &str) -> Option<&Arc<dyn RecognitionEngine>> {
        self.engines
            .iter()
            .find(|e| e.name().eq_ignore_ascii_case(name))
    }

    /// Names of the registered engines.
    pub fn engine_names(&self) -> Vec<&str> {
        self.engines.iter().map(|e| e.name()).collect()
    }

    /// Get the options.
    pub fn options(&self) -> &PipelineOptions {
        &self.options
    }

    /// Analyse, render and validate an already ingested document.
    ///
    /// The validator is chosen by [`PipelineOptions::profile`], falling back
    /// to the document's extraction method.
    pub fn process(&self, doc: Document) -> Result<ConvertResult> {
        self.options.validate()?;
        let profile = self.options.profile.unwrap_or_else(|| {
            EngineProfile::from_method(doc.info.extraction_method.as_deref().unwrap_or(""))
        });
        self.process_as(doc, profile)
    }

    /// Run the fallback plan over `pages` and return the first accepted
    /// output, or the best-scoring one when none is accepted.
    pub fn convert(&self, pages: &[&dyn PageSource], info: DocumentInfo) -> Result<ConvertResult> {
        self.options.validate()?;

        let kind = SourceKind::detect_pages(pages);
        let steps = self.options.fallback.steps_for(kind);
        if steps.is_empty() {
            return Err(Error::InvalidOption(format!(
                "fallback plan has no steps for {:?} sources",
                kind
            )));
        }
        log::debug!("Detected {:?} source, {} engine steps", kind, steps.len());

        let text_layer_words = match kind {
            SourceKind::Digital => Some(
                pages
                    .iter()
                    .map(|p| p.text_layer().split_whitespace().count())
                    .sum(),
            ),
            SourceKind::Scanned => None,
        };

        let mut attempts = Vec::with_capacity(steps.len());
        let mut best: Option<ConvertResult> = None;
        let mut last_failure: Option<ExtractionFailure> = None;

        for step in steps {
            let outcome = match self.engine(&step.engine) {
                Some(engine) => self.run_engine(engine.as_ref(), pages, &info, text_layer_words),
                None => Err(ExtractionFailure::EngineUnavailable {
                    engine: step.engine.clone(),
                }
                .into()),
            };

            match outcome {
                Ok(mut result) => {
                    let quality_score = result.report.quality_score;
                    if quality_score >= step.min_quality {
                        log::debug!(
                            "Engine {} accepted with score {:.2}",
                            step.engine,
                            quality_score
                        );
                        attempts.push(Attempt {
                            engine: step.engine.clone(),
                            outcome: AttemptOutcome::Accepted { quality_score },
                        });
                        result.attempts = attempts;
                        return Ok(result);
                    }

                    log::warn!(
                        "Engine {} scored {:.2}, below {:.2}; trying next engine",
                        step.engine,
                        quality_score,
                        step.min_quality
                    );
                    attempts.push(Attempt {
                        engine: step.engine.clone(),
                        outcome: AttemptOutcome::BelowThreshold { quality_score },
                    });
                    let better = best
                        .as_ref()
                        .map_or(true, |b| quality_score > b.report.quality_score);
                    if better {
                        best = Some(result);
                    }
                }
                Err(Error::Extraction(failure)) => {
                    log::warn!("{}", failure);
                    attempts.push(Attempt {
                        engine: step.engine.clone(),
                        outcome: AttemptOutcome::Failed(failure.clone()),
                    });
                    last_failure = Some(failure);
                }
                Err(other) => return Err(other),
            }
        }

        match (best, last_failure) {
            (Some(mut result), _) => {
                result.attempts = attempts;
                Ok(result)
            }
            (None, Some(failure)) => Err(failure.into()),
            (None, None) => Err(Error::Other("no engine produced output".to_string())),
        }
    }

    fn run_engine(
        &self,
        engine: &dyn RecognitionEngine,
        sources: &[&dyn PageSource],
        info: &DocumentInfo,
        text_layer_words: Option<usize>,
    ) -> Result<ConvertResult> {
        let name = engine.name();
        let mut pages = Vec::with_capacity(sources.len());
        let mut confidences = Vec::new();
        let mut has_content = false;

        for (idx, source) in sources.iter().enumerate() {
            let number = u32::try_from(idx + 1)
                .map_err(|_| Error::Other("too many pages".to_string()))?;
            let output = engine.recognize(*source)?;
            has_content |= !output.is_empty();
            if let Some(c) = output.mean_confidence() {
                confidences.push(c);
            }

            let page = Page::from_raw(number, output.elements).map_err(|e| {
                ExtractionFailure::Engine {
                    engine: name.to_string(),
                    message: e.to_string(),
                }
            })?;
            let (width, height) = source.dimensions();
            pages.push(if width > 0.0 && height > 0.0 {
                page.with_size(width, height)
            } else {
                page
            });
        }

        if !has_content {
            return Err(ExtractionFailure::EmptyOutput {
                engine: name.to_string(),
            }
            .into());
        }

        let mut doc = Document::from_pages(pages);
        doc.info = info.clone();
        doc.info.extraction_method = Some(name.to_string());
        if !confidences.is_empty() {
            doc.info.confidence_score =
                Some(confidences.iter().sum::<f32>() / confidences.len() as f32);
        }
        doc.info.text_layer_word_count = doc.info.text_layer_word_count.or(text_layer_words);

        let profile = self.options.profile.unwrap_or_else(|| engine.profile());
        self.process_as(doc, profile)
    }

    fn process_as(&self, mut doc: Document, profile: EngineProfile) -> Result<ConvertResult> {
        if doc.info.extraction_date.is_none() {
            doc.info.extraction_date = Some(extraction_timestamp());
        }
        if doc.info.confidence_score.is_none() {
            doc.info.confidence_score = mean_element_confidence(&doc);
        }

        let analyzer = LayoutAnalyzer::new(self.options.layout.clone())
            .with_noise_options(self.options.noise.clone());
        let layout = analyzer.analyze_document(&mut doc)?;

        let rendered = to_markdown_with_stats(&doc, &self.options.render)?;

        let base = ValidatorOptions {
            extraction_method: doc.info.extraction_method.clone().unwrap_or_default(),
            ocr_confidence: doc.info.confidence_score,
        };
        let report = profile
            .validator(base, Some(doc.pages.len()), doc.info.text_layer_word_count)
            .validate(&rendered.content);

        log::debug!(
            "Converted {} pages with {:?} profile: score {:.2}",
            doc.pages.len(),
            profile,
            report.quality_score
        );

        Ok(ConvertResult {
            markdown: rendered.content,
            document: doc,
            layout,
            report,
            stats: rendered.stats,
            attempts: Vec::new(),
        })
    }
}

fn mean_element_confidence(doc: &Document) -> Option<f32> {
    let values: Vec<f32> = doc
        .pages
        .iter()
        .flat_map(|p| p.elements.iter().filter_map(|e| e.confidence))
        .collect();
    if values.is_empty() {
        None
    } else {
        Some(values.iter().sum::<f32>() / values.len() as f32)
    }
}
