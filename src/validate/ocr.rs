//! Validation of local OCR output.

use super::checks::{
    analyze_confidence, check_annotations, check_layout, check_reading_order,
    estimate_completeness,
};
use super::{MarkdownValidator, OcrOptions, Validate, ValidationReport};

const MISSING_PAGE_MARKERS_PENALTY: f32 = 0.15;
const MISSING_ANNOTATIONS_PENALTY: f32 = 0.10;
const HIGH_UNCERTAINTY_PENALTY: f32 = 0.15;
const COMPLETENESS_WEIGHT: f32 = 0.2;
const LAYOUT_ERROR_PENALTY: f32 = 0.1;

/// Validator for Markdown produced by a local OCR engine with layout
/// analysis: checks layout markers, column estimate, confidence markers
/// and completeness on top of the base checks.
#[derive(Debug, Clone, Default)]
pub struct OcrValidator {
    options: OcrOptions,
}

impl OcrValidator {
    /// Create a validator with the given options.
    pub fn new(options: OcrOptions) -> Self {
        Self { options }
    }

    /// Get the options.
    pub fn options(&self) -> &OcrOptions {
        &self.options
    }
}

impl Validate for OcrValidator {
    fn validate(&self, markdown: &str) -> ValidationReport {
        let options = &self.options;
        let mut report = MarkdownValidator::new(options.base.clone()).validate(markdown);

        let mut layout = check_layout(markdown, options.expected_columns);
        let reading_order = check_reading_order(markdown);
        let annotations = check_annotations(markdown);
        let confidence = analyze_confidence(
            markdown,
            options.max_uncertain_percentage,
            options.min_confidence,
        );

        let page_count = options
            .page_count
            .unwrap_or_else(|| layout.summary.page_count.max(1));
        let completeness = estimate_completeness(markdown, page_count, options.expected_word_count);

        layout.summary.errors = reading_order.issues.len();

        let mut penalty = 0.0;
        if !annotations.summary.has_page_markers {
            penalty += MISSING_PAGE_MARKERS_PENALTY;
        }
        if !annotations.summary.has_role_annotations {
            penalty += MISSING_ANNOTATIONS_PENALTY;
        }
        if confidence.summary.uncertain_percentage > options.max_uncertain_percentage {
            penalty += HIGH_UNCERTAINTY_PENALTY;
        }
        penalty += (1.0 - completeness.summary.score) * COMPLETENESS_WEIGHT;
        penalty += layout.summary.errors as f32 * LAYOUT_ERROR_PENALTY;

        report.quality_score = (report.base_quality_score - penalty).clamp(0.0, 1.0);
        log::debug!(
            "OCR validation: base {:.2}, penalty {:.2}, {} columns detected",
            report.base_quality_score,
            penalty,
            layout.summary.detected_columns
        );

        report.metrics.page_count = Some(layout.summary.page_count);
        report.metrics.detected_columns = Some(layout.summary.detected_columns);
        report.metrics.page_markers = Some(annotations.summary.page_marker_count);
        report.metrics.role_annotations = Some(annotations.summary.role_count);
        report.metrics.uncertain_percentage = Some(confidence.summary.uncertain_percentage);
        report.metrics.completeness_score = Some(completeness.summary.score);

        for issues in [
            layout.issues,
            reading_order.issues,
            annotations.issues,
            confidence.issues,
            completeness.issues,
        ] {
            report.issues.extend(issues);
        }
        for warnings in [
            layout.warnings,
            reading_order.warnings,
            annotations.warnings,
            confidence.warnings,
            completeness.warnings,
        ] {
            report.warnings.extend(warnings);
        }

        report.layout = Some(layout.summary);
        report.reading_order = Some(reading_order.summary);
        report.annotations = Some(annotations.summary);
        report.confidence = Some(confidence.summary);
        report.completeness = Some(completeness.summary);
        report
    }
}
