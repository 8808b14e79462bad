//! Engine-agnostic Markdown validation.

use super::checks::{check_schema, check_syntax, detect_hallucinations, quality_score};
use super::{Metrics, Validate, ValidationReport, ValidatorOptions};

/// Syntax, schema and hallucination checks plus the five-factor quality score.
#[derive(Debug, Clone, Default)]
pub struct MarkdownValidator {
    options: ValidatorOptions,
}

impl MarkdownValidator {
    /// Create a validator with the given options.
    pub fn new(options: ValidatorOptions) -> Self {
        Self { options }
    }

    /// Get the options.
    pub fn options(&self) -> &ValidatorOptions {
        &self.options
    }
}

impl Validate for MarkdownValidator {
    fn validate(&self, markdown: &str) -> ValidationReport {
        let syntax = check_syntax(markdown);
        let schema = check_schema(markdown);
        let hallucination_markers = detect_hallucinations(markdown, false);

        let score = quality_score(
            markdown,
            &syntax,
            &schema,
            &self.options.extraction_method,
            self.options.ocr_confidence,
        );

        log::debug!(
            "Validated {} bytes: score {:.2}, {} issues, {} warnings",
            markdown.len(),
            score,
            syntax.issues.len() + schema.issues.len(),
            syntax.warnings.len() + schema.warnings.len()
        );

        let mut issues = syntax.issues;
        issues.extend(schema.issues);
        let mut warnings = syntax.warnings;
        warnings.extend(schema.warnings);

        ValidationReport {
            quality_score: score,
            base_quality_score: score,
            syntax_valid: syntax.summary,
            schema_compliant: schema.summary,
            issues,
            warnings,
            hallucination_markers,
            metrics: Metrics {
                word_count: markdown.split_whitespace().count(),
                line_count: markdown.split('\n').count(),
                avg_confidence: self.options.ocr_confidence,
                ..Default::default()
            },
            ..Default::default()
        }
    }
}

/// Validate Markdown with the base validator.
pub fn validate_markdown(
    markdown: &str,
    extraction_method: &str,
    ocr_confidence: Option<f32>,
) -> ValidationReport {
    let options = ValidatorOptions {
        extraction_method: extraction_method.to_string(),
        ocr_confidence,
    };
    MarkdownValidator::new(options).validate(markdown)
}
