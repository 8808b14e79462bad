//! Engine fallback decision table.

use serde::{Deserialize, Serialize};

use super::{ExtractionFailure, SourceKind};
use crate::error::{Error, Result};

/// One row of the decision table: try `engine`, accept its output when the
/// quality score reaches `min_quality`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FallbackStep {
    /// Engine name, matched case-insensitively against registered engines
    pub engine: String,
    /// Minimum quality score in `[0, 1]` for the output to be accepted
    pub min_quality: f32,
}

impl FallbackStep {
    /// Create a step.
    pub fn new(engine: impl Into<String>, min_quality: f32) -> Self {
        Self {
            engine: engine.into(),
            min_quality,
        }
    }
}

/// Ordered engine attempts per source kind.
///
/// The pipeline walks the steps for the detected [`SourceKind`] in order and
/// stops at the first output that meets its step's threshold. When no output
/// does, the best-scoring one is returned.
///
/// # Example
///
/// ```
/// use docflow::convert::{FallbackPlan, SourceKind};
///
/// let plan = FallbackPlan::new()
///     .then_digital("TextLayer", 0.6)
///     .then_digital("RapidOCR", 0.0)
///     .then_scanned("RapidOCR", 0.5)
///     .then_scanned("OpenRouter", 0.0);
///
/// assert_eq!(plan.steps_for(SourceKind::Scanned)[1].engine, "OpenRouter");
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FallbackPlan {
    /// Steps for documents with a usable text layer
    pub digital: Vec<FallbackStep>,
    /// Steps for scans and images
    pub scanned: Vec<FallbackStep>,
}

impl FallbackPlan {
    /// Create an empty plan.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a step for digital documents.
    pub fn then_digital(mut self, engine: impl Into<String>, min_quality: f32) -> Self {
        self.digital.push(FallbackStep::new(engine, min_quality));
        self
    }

    /// Append a step for scanned documents.
    pub fn then_scanned(mut self, engine: impl Into<String>, min_quality: f32) -> Self {
        self.scanned.push(FallbackStep::new(engine, min_quality));
        self
    }

    /// Steps for a source kind, in order.
    pub fn steps_for(&self, kind: SourceKind) -> &[FallbackStep] {
        match kind {
            SourceKind::Digital => &self.digital,
            SourceKind::Scanned => &self.scanned,
        }
    }

    /// Check every threshold is within `[0, 1]`.
    pub fn validate(&self) -> Result<()> {
        for step in self.digital.iter().chain(&self.scanned) {
            if !(0.0..=1.0).contains(&step.min_quality) {
                return Err(Error::InvalidOption(format!(
                    "min_quality for engine {} must be in [0, 1], got {}",
                    step.engine, step.min_quality
                )));
            }
        }
        Ok(())
    }
}

/// What happened when one engine was tried.
#[derive(Debug, Clone, PartialEq)]
pub enum AttemptOutcome {
    /// Output met the step threshold
    Accepted { quality_score: f32 },
    /// Output scored below the step threshold
    BelowThreshold { quality_score: f32 },
    /// The engine produced nothing usable
    Failed(ExtractionFailure),
}

/// One engine attempt.
#[derive(Debug, Clone, PartialEq)]
pub struct Attempt {
    pub engine: String,
    pub outcome: AttemptOutcome,
}

impl Attempt {
    /// Quality score of the attempt, if it produced output.
    pub fn quality_score(&self) -> Option<f32> {
        match self.outcome {
            AttemptOutcome::Accepted { quality_score }
            | AttemptOutcome::BelowThreshold { quality_score } => Some(quality_score),
            AttemptOutcome::Failed(_) => None,
        }
    }
}
