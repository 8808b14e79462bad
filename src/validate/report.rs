//! Validation report types.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// How much a finding matters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Low,
    Medium,
    High,
}

/// Blocking problems. Each one is always surfaced in the report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IssueKind {
    /// Odd number of ```` ``` ```` fence markers
    UnclosedCodeBlock,
    /// Table row with fewer than three pipe-delimited segments
    MalformedTable,
    /// Link with an empty target: `[text]()`
    EmptyLink,
    /// Frontmatter opened by `---` but never closed
    MalformedFrontmatter,
    /// `<!-- page:N -->` markers not numbered 1, 2, 3, ...
    NonSequentialPages,
    /// `<!-- reading-order:N -->` markers not numbered 1, 2, 3, ... within a page
    NonSequentialOrder,
    /// A `<!-- role:X -->` marker naming an unknown role
    InvalidRole,
}

impl IssueKind {
    /// Snake-case identifier used in reports.
    pub fn as_str(&self) -> &'static str {
        match self {
            IssueKind::UnclosedCodeBlock => "unclosed_code_block",
            IssueKind::MalformedTable => "malformed_table",
            IssueKind::EmptyLink => "empty_link",
            IssueKind::MalformedFrontmatter => "malformed_frontmatter",
            IssueKind::NonSequentialPages => "non_sequential_pages",
            IssueKind::NonSequentialOrder => "non_sequential_order",
            IssueKind::InvalidRole => "invalid_role",
        }
    }

    /// Whether the issue comes from the syntax check.
    pub fn is_syntax(&self) -> bool {
        matches!(
            self,
            IssueKind::UnclosedCodeBlock | IssueKind::MalformedTable | IssueKind::EmptyLink
        )
    }
}

impl fmt::Display for IssueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Non-blocking degradations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WarningKind {
    MissingFrontmatter,
    MissingMetadataField,
    MissingSemanticAnnotations,
    MissingPageMarkers,
    UnmatchedBrackets,
    PossiblyIncomplete,
    PossiblyExcessive,
    ColumnCountMismatch,
    HighUncertainty,
    VeryLowConfidence,
}

impl WarningKind {
    /// Snake-case identifier used in reports.
    pub fn as_str(&self) -> &'static str {
        match self {
            WarningKind::MissingFrontmatter => "missing_frontmatter",
            WarningKind::MissingMetadataField => "missing_metadata_field",
            WarningKind::MissingSemanticAnnotations => "missing_semantic_annotations",
            WarningKind::MissingPageMarkers => "missing_page_markers",
            WarningKind::UnmatchedBrackets => "unmatched_brackets",
            WarningKind::PossiblyIncomplete => "possibly_incomplete",
            WarningKind::PossiblyExcessive => "possibly_excessive",
            WarningKind::ColumnCountMismatch => "column_count_mismatch",
            WarningKind::HighUncertainty => "high_uncertainty",
            WarningKind::VeryLowConfidence => "very_low_confidence",
        }
    }

    /// Schema warnings about something missing; these reduce the schema score.
    pub fn is_missing_schema(&self) -> bool {
        matches!(
            self,
            WarningKind::MissingFrontmatter
                | WarningKind::MissingMetadataField
                | WarningKind::MissingSemanticAnnotations
        )
    }
}

impl fmt::Display for WarningKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A blocking finding.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Issue {
    pub kind: IssueKind,
    pub severity: Severity,
    pub message: String,
    /// 1-based line number, when the issue is tied to one line
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub line: Option<usize>,
}

impl Issue {
    /// Create a high-severity issue.
    pub fn new(kind: IssueKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            severity: Severity::High,
            message: message.into(),
            line: None,
        }
    }

    /// Attach a line number.
    pub fn at_line(mut self, line: usize) -> Self {
        self.line = Some(line);
        self
    }
}

/// A non-blocking finding.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Warning {
    pub kind: WarningKind,
    pub severity: Severity,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub line: Option<usize>,
}

impl Warning {
    /// Create a warning.
    pub fn new(kind: WarningKind, severity: Severity, message: impl Into<String>) -> Self {
        Self {
            kind,
            severity,
            message: message.into(),
            line: None,
        }
    }

    /// Attach a line number.
    pub fn at_line(mut self, line: usize) -> Self {
        self.line = Some(line);
        self
    }
}

/// Category of a hallucination phrase.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HallucinationKind {
    CommentaryPhrase,
    Speculation,
    FirstPerson,
    MetaReference,
    Uncertainty,
    Hedging,
}

/// A phrase suggesting the engine commented on the page instead of
/// transcribing it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HallucinationMarker {
    /// 1-based line number
    pub line: usize,
    /// The phrase that matched
    pub matched_phrase: String,
    pub subtype: HallucinationKind,
    pub severity: Severity,
    /// The whole (trimmed) line
    pub text: String,
}

/// Numbers measured during validation.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Metrics {
    /// Whitespace-separated tokens in the whole input
    pub word_count: usize,
    /// Number of `\n`-separated lines
    pub line_count: usize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub page_count: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub detected_columns: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avg_confidence: Option<f32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub page_markers: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role_annotations: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub completeness_score: Option<f32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub uncertain_percentage: Option<f32>,
}

/// Page-marker and role-annotation coverage.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AnnotationSummary {
    pub has_page_markers: bool,
    pub page_marker_count: usize,
    pub has_role_annotations: bool,
    pub role_count: usize,
    /// Occurrences per role name
    pub role_distribution: BTreeMap<String, usize>,
    /// Role names outside the known vocabulary, sorted
    pub invalid_roles: Vec<String>,
}

/// Reading-order marker coverage.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReadingOrderSummary {
    pub has_reading_order: bool,
    pub order_count: usize,
    /// True when every page numbers its markers 1..k
    pub sequential: bool,
}

/// Word count against the expected range.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CompletenessSummary {
    /// Words outside annotation comments
    pub word_count: usize,
    /// Non-blank lines outside annotation comments
    pub line_count: usize,
    pub expected_min: usize,
    pub expected_max: usize,
    /// `word_count / expected_min` when short, otherwise 1.0
    pub score: f32,
}

/// Confidence and `[uncertain: ...]` markers.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ConfidenceSummary {
    pub low_confidence_count: usize,
    pub uncertain_count: usize,
    /// Uncertain spans per 100 lines
    pub uncertain_percentage: f32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avg_low_confidence: Option<f32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_confidence: Option<f32>,
}

/// Layout consistency estimated from markers.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LayoutSummary {
    pub page_count: usize,
    pub reading_order_count: usize,
    pub detected_columns: usize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expected_columns: Option<usize>,
    /// Number of high-severity layout issues
    pub errors: usize,
}

/// Result of validating one Markdown string.
///
/// Built fresh per call; never mutated once returned.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ValidationReport {
    /// Final score in `[0, 1]`
    pub quality_score: f32,
    /// Score before engine-specific penalties
    pub base_quality_score: f32,
    pub syntax_valid: bool,
    pub schema_compliant: bool,
    pub issues: Vec<Issue>,
    pub warnings: Vec<Warning>,
    pub hallucination_markers: Vec<HallucinationMarker>,
    pub metrics: Metrics,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub annotations: Option<AnnotationSummary>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reading_order: Option<ReadingOrderSummary>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub completeness: Option<CompletenessSummary>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub confidence: Option<ConfidenceSummary>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub layout: Option<LayoutSummary>,
}

impl ValidationReport {
    /// Number of hallucination markers.
    pub fn hallucination_count(&self) -> usize {
        self.hallucination_markers.len()
    }

    /// Check whether an issue of the given kind was reported.
    pub fn has_issue(&self, kind: IssueKind) -> bool {
        self.issues.iter().any(|i| i.kind == kind)
    }

    /// Check whether a warning of the given kind was reported.
    pub fn has_warning(&self, kind: WarningKind) -> bool {
        self.warnings.iter().any(|w| w.kind == kind)
    }

    /// Check whether the score reaches `threshold`.
    pub fn passes(&self, threshold: f32) -> bool {
        self.quality_score >= threshold
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_names_match_serde() {
        let json = serde_json::to_string(&IssueKind::UnclosedCodeBlock).unwrap();
        assert_eq!(json, format!("\"{}\"", IssueKind::UnclosedCodeBlock));
        let json = serde_json::to_string(&WarningKind::MissingMetadataField).unwrap();
        assert_eq!(json, format!("\"{}\"", WarningKind::MissingMetadataField));
    }

    #[test]
    fn test_missing_schema_warnings() {
        assert!(WarningKind::MissingFrontmatter.is_missing_schema());
        assert!(WarningKind::MissingSemanticAnnotations.is_missing_schema());
        assert!(!WarningKind::UnmatchedBrackets.is_missing_schema());
        assert!(!WarningKind::MissingPageMarkers.is_missing_schema());
    }

    #[test]
    fn test_issue_builder() {
        let issue = Issue::new(IssueKind::EmptyLink, "Empty URL in link: [x]()").at_line(4);
        assert_eq!(issue.severity, Severity::High);
        assert_eq!(issue.line, Some(4));
        let json = serde_json::to_string(&issue).unwrap();
        assert!(json.contains(r#""kind":"empty_link""#));
        assert!(json.contains(r#""severity":"high""#));
    }

    #[test]
    fn test_report_helpers() {
        let report = ValidationReport {
            quality_score: 0.8,
            issues: vec![Issue::new(IssueKind::MalformedTable, "x")],
            ..Default::default()
        };
        assert!(report.has_issue(IssueKind::MalformedTable));
        assert!(!report.has_warning(WarningKind::MissingFrontmatter));
        assert!(report.passes(0.8));
        assert!(!report.passes(0.81));
    }
}
