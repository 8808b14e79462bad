//! Validation of vision-language model output.
//!
//! Generative engines can describe a page instead of transcribing it, drop
//! content, or invent structure. On top of the base checks this validator
//! looks for hedging language, checks page, role and reading-order
//! annotations, and estimates completeness.

use super::checks::{
    check_annotations, check_reading_order, detect_hallucinations, estimate_completeness,
};
use super::{MarkdownValidator, Validate, ValidationReport, VlmOptions};

const HALLUCINATION_PENALTY: f32 = 0.1;
const MISSING_ANNOTATION_PENALTY: f32 = 0.15;
const COMPLETENESS_WEIGHT: f32 = 0.2;

/// Validator for Markdown produced by a vision-language model.
#[derive(Debug, Clone, Default)]
pub struct VlmValidator {
    options: VlmOptions,
}

impl VlmValidator {
    /// Create a validator with the given options.
    pub fn new(options: VlmOptions) -> Self {
        Self { options }
    }

    /// Get the options.
    pub fn options(&self) -> &VlmOptions {
        &self.options
    }
}

impl Validate for VlmValidator {
    fn validate(&self, markdown: &str) -> ValidationReport {
        let mut report = MarkdownValidator::new(self.options.base.clone()).validate(markdown);

        let hallucinations = detect_hallucinations(markdown, true);
        let annotations = check_annotations(markdown);
        let reading_order = check_reading_order(markdown);

        let page_count = self
            .options
            .page_count
            .unwrap_or_else(|| annotations.summary.page_marker_count.max(1));
        let completeness =
            estimate_completeness(markdown, page_count, self.options.expected_word_count);

        let mut penalty = hallucinations.len() as f32 * HALLUCINATION_PENALTY;
        if !annotations.summary.has_page_markers {
            penalty += MISSING_ANNOTATION_PENALTY;
        }
        if !annotations.summary.has_role_annotations {
            penalty += MISSING_ANNOTATION_PENALTY;
        }
        penalty += (1.0 - completeness.summary.score) * COMPLETENESS_WEIGHT;

        report.quality_score = (report.base_quality_score - penalty).clamp(0.0, 1.0);
        log::debug!(
            "VLM validation: base {:.2}, penalty {:.2}, {} hallucination markers",
            report.base_quality_score,
            penalty,
            hallucinations.len()
        );

        report.metrics.page_count = Some(page_count);
        report.metrics.page_markers = Some(annotations.summary.page_marker_count);
        report.metrics.role_annotations = Some(annotations.summary.role_count);
        report.metrics.completeness_score = Some(completeness.summary.score);

        report.hallucination_markers = hallucinations;
        for checked in [annotations.issues, reading_order.issues, completeness.issues] {
            report.issues.extend(checked);
        }
        for checked in [
            annotations.warnings,
            reading_order.warnings,
            completeness.warnings,
        ] {
            report.warnings.extend(checked);
        }

        report.annotations = Some(annotations.summary);
        report.reading_order = Some(reading_order.summary);
        report.completeness = Some(completeness.summary);
        report
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validate::{HallucinationKind, IssueKind, WarningKind};

    fn page_of_words(n: usize) -> String {
        format!(
            "<!-- page:1 -->\n\n<!-- role:paragraph -->\n{}\n",
            vec!["word"; n].join(" ")
        )
    }

    #[test]
    fn test_clean_output_keeps_base_score() {
        let report = VlmValidator::default().validate(&page_of_words(300));
        assert!(report.hallucination_markers.is_empty());
        assert_eq!(report.quality_score, report.base_quality_score);
        assert_eq!(report.metrics.completeness_score, Some(1.0));
        assert_eq!(report.metrics.page_markers, Some(1));
        assert_eq!(report.metrics.role_annotations, Some(1));
    }

    #[test]
    fn test_hallucinations_are_penalised() {
        let md = format!(
            "{}\nBased on the image, this is probably a memo.\n",
            page_of_words(300)
        );
        let report = VlmValidator::default().validate(&md);
        assert_eq!(report.hallucination_count(), 2);
        assert!(report
            .hallucination_markers
            .iter()
            .any(|m| m.subtype == HallucinationKind::Hedging));
        let expected = report.base_quality_score - 0.2;
        assert!((report.quality_score - expected).abs() < 1e-5);
    }

    #[test]
    fn test_missing_annotations_are_penalised() {
        let md = vec!["word"; 300].join(" ");
        let report = VlmValidator::default().validate(&md);
        assert!(report.has_warning(WarningKind::MissingPageMarkers));
        let expected = (report.base_quality_score - 0.3).max(0.0);
        assert!((report.quality_score - expected).abs() < 1e-5);
    }

    #[test]
    fn test_incomplete_output() {
        let options = VlmOptions::new().with_page_count(2);
        let report = VlmValidator::new(options).validate(&page_of_words(150));
        assert!(report.has_warning(WarningKind::PossiblyIncomplete));
        let completeness = report.completeness.unwrap();
        assert_eq!(completeness.expected_min, 300);
        assert!((completeness.score - 0.5).abs() < 1e-6);
        let expected = report.base_quality_score - 0.1;
        assert!((report.quality_score - expected).abs() < 1e-5);
    }

    #[test]
    fn test_non_sequential_markers() {
        let md = "<!-- page:2 -->\n<!-- reading-order:2 -->\n<!-- role:paragraph -->\ntext";
        let report = VlmValidator::default().validate(md);
        assert!(report.has_issue(IssueKind::NonSequentialPages));
        assert!(report.has_issue(IssueKind::NonSequentialOrder));
        assert_eq!(report.reading_order.map(|r| r.sequential), Some(false));
    }
}
