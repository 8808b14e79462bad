//! Individual validation checks.
//!
//! Every check is total: it accepts any string, including empty or
//! malformed Markdown, and reports what it finds.

use std::collections::BTreeMap;

use once_cell::sync::Lazy;
use regex::Regex;

use crate::model::SemanticRole;

use super::report::{
    AnnotationSummary, CompletenessSummary, ConfidenceSummary, HallucinationKind,
    HallucinationMarker, Issue, IssueKind, LayoutSummary, ReadingOrderSummary, Severity, Warning,
    WarningKind,
};

static RE_EMPTY_LINK: Lazy<Regex> = Lazy::new(|| Regex::new(r"\[([^\]]+)\]\(\s*\)").unwrap());

static RE_PAGE: Lazy<Regex> = Lazy::new(|| Regex::new(r"<!-- page:(\d+) -->").unwrap());

static RE_ROLE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"<!-- role:(\w+)(?:\s+([^>]+))? -->").unwrap());

static RE_PAGE_OR_ORDER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"<!-- (page|reading-order):(\d+) -->").unwrap());

static RE_COMMENT: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?s)<!--.*?-->").unwrap());

static RE_CONFIDENCE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"<!-- confidence:([01]\.\d+) -->").unwrap());

static RE_UNCERTAIN: Lazy<Regex> = Lazy::new(|| Regex::new(r"\[uncertain: (.*?)\]").unwrap());

static RE_HEADING: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?m)^#{1,6}\s").unwrap());

static RE_TABLE_SEPARATOR: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?m)^\s*\|(?:\s*:?-{3,}:?\s*\|)+\s*$").unwrap());

static RE_LIST: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?m)^[-*+]\s").unwrap());

static RE_FORMATTING: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\*\*[^*\n]+\*\*|__[^_\n]+__|\*[^*\s][^*\n]*\*|`[^`\n]+`").unwrap()
});

static HALLUCINATION_PATTERNS: Lazy<Vec<(Regex, HallucinationKind)>> = Lazy::new(|| {
    [
        (
            r"(?i)\bbased on (the|this) (image|document|page)\b",
            HallucinationKind::CommentaryPhrase,
        ),
        (
            r"(?i)\bas (shown|seen|depicted) in (the|this)\b",
            HallucinationKind::CommentaryPhrase,
        ),
        (r"(?i)\bit appears (that|to be)\b", HallucinationKind::Speculation),
        (r"(?i)\bthis (seems|looks like)\b", HallucinationKind::Speculation),
        (
            r"(?i)\bI (can see|notice|observe|believe)\b",
            HallucinationKind::FirstPerson,
        ),
        (
            r"(?i)\bthe (image|document) (shows|contains|displays)\b",
            HallucinationKind::MetaReference,
        ),
        (
            r"(?i)\bfrom what I can (see|tell|determine)\b",
            HallucinationKind::Uncertainty,
        ),
    ]
    .into_iter()
    .map(|(pattern, kind)| (Regex::new(pattern).unwrap(), kind))
    .collect()
});

static RE_HEDGING: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)\b(probably|possibly|likely|perhaps)\b").unwrap());

/// Reputation points per engine, matched by substring in this order.
const METHOD_REPUTATION: [(&str, f32); 7] = [
    ("OpenRouter", 20.0),
    ("Qwen", 18.0),
    ("Gemini", 17.0),
    ("pymupdf4llm", 15.0),
    ("GMFT", 14.0),
    ("RapidOCR", 12.0),
    ("Fallback", 8.0),
];

const DEFAULT_REPUTATION: f32 = 10.0;

const REQUIRED_FIELDS: [&str; 3] = ["document:", "source_file:", "document_id:"];

/// Outcome of one check: a summary plus the findings it produced.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Checked<T> {
    pub summary: T,
    pub issues: Vec<Issue>,
    pub warnings: Vec<Warning>,
}

impl<T> Checked<T> {
    fn new(summary: T) -> Self {
        Self {
            summary,
            issues: Vec::new(),
            warnings: Vec::new(),
        }
    }
}

/// Line indices (0-based) of the frontmatter delimiters: the opening `---`
/// and, if present, the closing one.
fn frontmatter_span(lines: &[&str]) -> Option<(usize, Option<usize>)> {
    let open = lines.iter().position(|l| !l.trim().is_empty())?;
    if lines[open].trim() != "---" {
        return None;
    }
    let close = lines[open + 1..]
        .iter()
        .position(|l| l.trim() == "---")
        .map(|i| open + 1 + i);
    Some((open, close))
}

/// Syntax check. The summary is `true` when no issue was found.
///
/// Flags an odd number of code fences, table rows with fewer than three
/// pipe-delimited segments and links with an empty target. Unbalanced
/// square brackets on a line only produce a warning.
pub fn check_syntax(markdown: &str) -> Checked<bool> {
    let mut checked = Checked::new(true);
    let mut in_fence = false;

    for (idx, line) in markdown.split('\n').enumerate() {
        let line_no = idx + 1;
        let trimmed = line.trim();

        if trimmed.starts_with("```") {
            in_fence = !in_fence;
            continue;
        }
        if in_fence {
            continue;
        }

        if (trimmed.starts_with('|') || trimmed.ends_with('|')) && trimmed.split('|').count() < 3
        {
            checked.issues.push(
                Issue::new(IssueKind::MalformedTable, "Table row has insufficient columns")
                    .at_line(line_no),
            );
        }

        if line.matches('[').count() != line.matches(']').count() {
            checked.warnings.push(
                Warning::new(
                    WarningKind::UnmatchedBrackets,
                    Severity::Low,
                    "Unmatched square brackets (may be intentional)",
                )
                .at_line(line_no),
            );
        }

        for caps in RE_EMPTY_LINK.captures_iter(line) {
            checked.issues.push(
                Issue::new(
                    IssueKind::EmptyLink,
                    format!("Empty URL in link: [{}]()", &caps[1]),
                )
                .at_line(line_no),
            );
        }
    }

    if markdown.matches("```").count() % 2 != 0 {
        checked.issues.push(Issue::new(
            IssueKind::UnclosedCodeBlock,
            "Unclosed code block (odd number of ``` markers)",
        ));
    }

    checked.summary = checked.issues.is_empty();
    checked
}

/// Schema check. The summary is `true` when the document is compliant.
///
/// A missing frontmatter block is a warning and makes the document
/// non-compliant; an unterminated one is an issue. Missing metadata fields
/// and missing role annotations are warnings only.
pub fn check_schema(markdown: &str) -> Checked<bool> {
    let mut checked = Checked::new(true);
    let lines: Vec<&str> = markdown.split('\n').collect();

    match frontmatter_span(&lines) {
        None => {
            checked.warnings.push(Warning::new(
                WarningKind::MissingFrontmatter,
                Severity::Medium,
                "Document lacks YAML frontmatter (metadata not preserved)",
            ));
            checked.summary = false;
        }
        Some((_, None)) => {
            checked.issues.push(Issue::new(
                IssueKind::MalformedFrontmatter,
                "YAML frontmatter not properly closed",
            ));
            checked.summary = false;
        }
        Some((open, Some(close))) => {
            let frontmatter = lines[open + 1..close].join("\n");
            for field in REQUIRED_FIELDS {
                if !frontmatter.contains(field) {
                    checked.warnings.push(Warning::new(
                        WarningKind::MissingMetadataField,
                        Severity::Low,
                        format!("Missing required field: {}", field),
                    ));
                }
            }
        }
    }

    if !RE_ROLE.is_match(markdown) {
        checked.warnings.push(Warning::new(
            WarningKind::MissingSemanticAnnotations,
            Severity::Low,
            "No semantic role annotations found (reduces RAG effectiveness)",
        ));
    }

    checked
}

/// Find phrases where the engine commented on the page instead of
/// transcribing it. Annotation comment lines and frontmatter are skipped.
///
/// With `hedging` set, words such as "probably" are reported as well.
pub fn detect_hallucinations(markdown: &str, hedging: bool) -> Vec<HallucinationMarker> {
    let lines: Vec<&str> = markdown.split('\n').collect();
    let skip_until = match frontmatter_span(&lines) {
        Some((_, Some(close))) => close + 1,
        _ => 0,
    };

    let mut markers = Vec::new();
    for (idx, line) in lines.iter().enumerate().skip(skip_until) {
        let trimmed = line.trim();
        if trimmed.starts_with("<!--") {
            continue;
        }

        let base = HALLUCINATION_PATTERNS
            .iter()
            .map(|(re, kind)| (re, *kind, Severity::High));
        let hedge = hedging.then_some((&*RE_HEDGING, HallucinationKind::Hedging, Severity::Medium));

        for (re, subtype, severity) in base.chain(hedge) {
            for m in re.find_iter(line) {
                markers.push(HallucinationMarker {
                    line: idx + 1,
                    matched_phrase: m.as_str().to_string(),
                    subtype,
                    severity,
                    text: trimmed.to_string(),
                });
            }
        }
    }
    markers
}

/// Reputation points (out of 20) for an extraction method name.
pub fn method_reputation(method: &str) -> f32 {
    METHOD_REPUTATION
        .iter()
        .find(|(name, _)| method.contains(name))
        .map(|(_, score)| *score)
        .unwrap_or(DEFAULT_REPUTATION)
}

/// Content richness points (out of 20): headings 5, tables 7, lists 4,
/// inline formatting 4.
pub fn richness_score(markdown: &str) -> f32 {
    let mut score = 0.0;
    if RE_HEADING.is_match(markdown) {
        score += 5.0;
    }
    if RE_TABLE_SEPARATOR.is_match(markdown) {
        score += 7.0;
    }
    if RE_LIST.is_match(markdown) {
        score += 4.0;
    }
    if RE_FORMATTING.is_match(markdown) {
        score += 4.0;
    }
    score
}

/// Combine the five scoring factors into a value in `[0, 1]`.
pub fn quality_score(
    markdown: &str,
    syntax: &Checked<bool>,
    schema: &Checked<bool>,
    method: &str,
    confidence: Option<f32>,
) -> f32 {
    let syntax_points = if syntax.summary {
        30.0
    } else {
        (30.0 - 5.0 * syntax.issues.len() as f32).max(0.0)
    };

    let schema_points = if schema.summary {
        20.0
    } else {
        let missing = schema
            .warnings
            .iter()
            .filter(|w| w.kind.is_missing_schema())
            .count();
        (20.0 - 5.0 * missing as f32).max(0.0)
    };

    let confidence_points = match confidence {
        Some(c) => c.clamp(0.0, 1.0) * 10.0,
        None => 5.0,
    };

    let total = syntax_points
        + schema_points
        + richness_score(markdown)
        + method_reputation(method)
        + confidence_points;
    (total / 100.0).clamp(0.0, 1.0)
}

/// Page-marker presence and order, role-annotation presence and validity.
pub fn check_annotations(markdown: &str) -> Checked<AnnotationSummary> {
    let mut checked = Checked::new(AnnotationSummary::default());

    let pages: Vec<u64> = RE_PAGE
        .captures_iter(markdown)
        .filter_map(|c| c[1].parse().ok())
        .collect();
    checked.summary.has_page_markers = !pages.is_empty();
    checked.summary.page_marker_count = pages.len();

    if pages.is_empty() {
        checked.warnings.push(Warning::new(
            WarningKind::MissingPageMarkers,
            Severity::Medium,
            "No page boundary markers found",
        ));
    } else if !is_sequential(&pages) {
        checked.issues.push(Issue::new(
            IssueKind::NonSequentialPages,
            format!("Page numbers not sequential: {:?}", pages),
        ));
    }

    let mut distribution: BTreeMap<String, usize> = BTreeMap::new();
    for caps in RE_ROLE.captures_iter(markdown) {
        *distribution.entry(caps[1].to_string()).or_default() += 1;
    }
    checked.summary.role_count = distribution.values().sum();
    checked.summary.has_role_annotations = checked.summary.role_count > 0;

    let invalid: Vec<String> = distribution
        .keys()
        .filter(|role| role.parse::<SemanticRole>().is_err())
        .cloned()
        .collect();
    if !invalid.is_empty() {
        checked.issues.push(Issue::new(
            IssueKind::InvalidRole,
            format!("Invalid role types found: {}", invalid.join(", ")),
        ));
    }
    checked.summary.invalid_roles = invalid;
    checked.summary.role_distribution = distribution;

    checked
}

/// Reading-order markers must count 1, 2, 3, ... within each page.
pub fn check_reading_order(markdown: &str) -> Checked<ReadingOrderSummary> {
    let mut checked = Checked::new(ReadingOrderSummary::default());

    let mut groups: Vec<(Option<u64>, Vec<u64>)> = vec![(None, Vec::new())];
    for caps in RE_PAGE_OR_ORDER.captures_iter(markdown) {
        let Ok(value) = caps[2].parse::<u64>() else {
            continue;
        };
        match &caps[1] {
            "page" => groups.push((Some(value), Vec::new())),
            _ => {
                if let Some((_, orders)) = groups.last_mut() {
                    orders.push(value);
                }
            }
        }
    }

    checked.summary.order_count = groups.iter().map(|(_, o)| o.len()).sum();
    checked.summary.has_reading_order = checked.summary.order_count > 0;

    for (page, orders) in &groups {
        if orders.is_empty() || is_sequential(orders) {
            continue;
        }
        let location = page.map(|p| format!(" on page {}", p)).unwrap_or_default();
        checked.issues.push(Issue::new(
            IssueKind::NonSequentialOrder,
            format!("Reading order not sequential{}: {:?}", location, orders),
        ));
    }
    checked.summary.sequential = checked.issues.is_empty();

    checked
}

/// Word count outside annotation comments, compared with the expected range.
///
/// With a ground-truth word count `gt` the range is `[0.8·gt, 1.5·gt]`,
/// otherwise `[150, 600]` words per page.
pub fn estimate_completeness(
    markdown: &str,
    page_count: usize,
    expected_words: Option<usize>,
) -> Checked<CompletenessSummary> {
    let text = RE_COMMENT.replace_all(markdown, "");
    let word_count = text.split_whitespace().count();
    let line_count = text.split('\n').filter(|l| !l.trim().is_empty()).count();

    let (expected_min, expected_max) = match expected_words.filter(|&gt| gt > 0) {
        Some(gt) => ((gt as f64 * 0.8) as usize, (gt as f64 * 1.5) as usize),
        None => (page_count * 150, page_count * 600),
    };

    let mut checked = Checked::new(CompletenessSummary {
        word_count,
        line_count,
        expected_min,
        expected_max,
        score: 1.0,
    });

    if word_count < expected_min {
        checked.summary.score = word_count as f32 / expected_min as f32;
        checked.warnings.push(Warning::new(
            WarningKind::PossiblyIncomplete,
            Severity::Medium,
            format!(
                "Word count ({}) below expected minimum ({})",
                word_count, expected_min
            ),
        ));
    } else if word_count > expected_max {
        checked.warnings.push(Warning::new(
            WarningKind::PossiblyExcessive,
            Severity::Low,
            format!(
                "Word count ({}) above expected maximum ({})",
                word_count, expected_max
            ),
        ));
    }

    checked
}

/// Statistics over `<!-- confidence:0.NN -->` and `[uncertain: ...]` markers.
pub fn analyze_confidence(
    markdown: &str,
    max_uncertain_percentage: f32,
    min_confidence: f32,
) -> Checked<ConfidenceSummary> {
    let scores: Vec<f32> = RE_CONFIDENCE
        .captures_iter(markdown)
        .filter_map(|c| c[1].parse().ok())
        .collect();
    let uncertain_count = RE_UNCERTAIN.find_iter(markdown).count();
    let total_lines = markdown.split('\n').count();
    let uncertain_percentage = uncertain_count as f32 / total_lines as f32 * 100.0;

    let (avg, min) = if scores.is_empty() {
        (None, None)
    } else {
        let sum: f32 = scores.iter().sum();
        let min = scores.iter().copied().fold(f32::INFINITY, f32::min);
        (Some(sum / scores.len() as f32), Some(min))
    };

    let mut checked = Checked::new(ConfidenceSummary {
        low_confidence_count: scores.len(),
        uncertain_count,
        uncertain_percentage,
        avg_low_confidence: avg,
        min_confidence: min,
    });

    if uncertain_percentage > max_uncertain_percentage {
        checked.warnings.push(Warning::new(
            WarningKind::HighUncertainty,
            Severity::Medium,
            format!("{:.1}% of text marked as uncertain", uncertain_percentage),
        ));
    }
    if let Some(min) = min.filter(|&m| m < min_confidence) {
        checked.warnings.push(Warning::new(
            WarningKind::VeryLowConfidence,
            Severity::High,
            format!("Minimum confidence score: {:.2}", min),
        ));
    }

    checked
}

/// Estimate the column count from reading-order density: more than 20
/// markers per page suggests two columns, more than 40 three.
pub fn check_layout(markdown: &str, expected_columns: Option<usize>) -> Checked<LayoutSummary> {
    let page_count = RE_PAGE.find_iter(markdown).count();
    let reading_order_count = RE_PAGE_OR_ORDER
        .captures_iter(markdown)
        .filter(|c| &c[1] == "reading-order")
        .count();

    let mut detected_columns = 1;
    if reading_order_count > 0 && page_count > 0 {
        let per_page = reading_order_count as f32 / page_count as f32;
        if per_page > 40.0 {
            detected_columns = 3;
        } else if per_page > 20.0 {
            detected_columns = 2;
        }
    }

    let mut checked = Checked::new(LayoutSummary {
        page_count,
        reading_order_count,
        detected_columns,
        expected_columns,
        errors: 0,
    });

    if let Some(expected) = expected_columns.filter(|&e| e != detected_columns) {
        checked.warnings.push(Warning::new(
            WarningKind::ColumnCountMismatch,
            Severity::Low,
            format!(
                "Expected {} columns, detected {}",
                expected, detected_columns
            ),
        ));
    }

    checked
}

fn is_sequential(values: &[u64]) -> bool {
    values.iter().zip(1u64..).all(|(v, expected)| *v == expected)
}
