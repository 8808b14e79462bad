//! Integration tests for Markdown validation.

use docflow::validate::checks::estimate_completeness;
use docflow::validate::{
    validate_markdown, IssueKind, OcrOptions, OcrValidator, Validate, VlmOptions, VlmValidator,
    WarningKind,
};

fn annotated(words: usize, extra: &str) -> String {
    format!(
        "<!-- page:1 -->\n\n<!-- role:heading level:1 -->\n# Findings\n\n\
         <!-- role:paragraph -->\n{}\n{}",
        vec!["lorem"; words].join(" "),
        extra
    )
}

#[test]
fn test_odd_fence_count_is_invalid() {
    let md = "```rust\nfn main() {}\n```\n\n```\nunterminated";
    let report = validate_markdown(md, "pymupdf4llm", None);
    assert!(!report.syntax_valid);
    assert!(report.has_issue(IssueKind::UnclosedCodeBlock));
}

#[test]
fn test_even_fence_count_is_valid() {
    let md = "```\n| not | a table\n```\n";
    let report = validate_markdown(md, "pymupdf4llm", None);
    assert!(report.syntax_valid);
}

#[test]
fn test_malformed_table_and_empty_link() {
    let md = "| lonely\n\nSee [the docs]().";
    let report = validate_markdown(md, "pymupdf4llm", None);
    assert!(report.has_issue(IssueKind::MalformedTable));
    assert!(report.has_issue(IssueKind::EmptyLink));
    assert!(!report.syntax_valid);
}

#[test]
fn test_inline_pipe_in_prose_is_not_a_table_row() {
    let md = "Pipe the input | grep to filter it.\n\nUse a || b for fallbacks.";
    let report = validate_markdown(md, "pymupdf4llm", None);
    assert!(!report.has_issue(IssueKind::MalformedTable));
    assert!(report.syntax_valid);
}

#[test]
fn test_missing_frontmatter_is_not_compliant() {
    let report = validate_markdown(&annotated(200, ""), "Gemini", None);
    assert!(!report.schema_compliant);
    assert!(report.has_warning(WarningKind::MissingFrontmatter));
    assert!(!report.has_warning(WarningKind::MissingSemanticAnnotations));
}

#[test]
fn test_unterminated_frontmatter() {
    let md = "---\ndocument:\n  source_file: \"a.pdf\"\n\n# Title\n";
    let report = validate_markdown(md, "Gemini", None);
    assert!(report.has_issue(IssueKind::MalformedFrontmatter));
    assert!(!report.schema_compliant);
}

#[test]
fn test_quality_score_non_increasing_in_hallucinations() {
    let validator = VlmValidator::new(VlmOptions::new().with_page_count(1));
    let mut previous = f32::INFINITY;
    for count in 0..12 {
        let extra = "Based on the image, the layout continues.\n".repeat(count);
        let report = validator.validate(&annotated(300, &extra));
        assert_eq!(report.hallucination_count(), count);
        assert!(report.quality_score <= previous);
        assert!((0.0..=1.0).contains(&report.quality_score));
        previous = report.quality_score;
    }
    assert_eq!(previous, 0.0);
}

#[test]
fn test_annotation_lines_are_exempt() {
    let md = "<!-- note: based on the image -->\nPlain text.";
    let report = validate_markdown(md, "Gemini", None);
    assert!(report.hallucination_markers.is_empty());
}

#[test]
fn test_completeness_ranges() {
    let full = estimate_completeness(&annotated(298, ""), 1, None);
    assert_eq!(full.summary.score, 1.0);
    assert!(full.warnings.is_empty());

    let short = estimate_completeness(&vec!["w"; 50].join(" "), 1, None);
    assert!(short.summary.score < 1.0);
    assert_eq!(short.warnings[0].kind, WarningKind::PossiblyIncomplete);

    let long = estimate_completeness(&vec!["w"; 700].join(" "), 1, None);
    assert_eq!(long.summary.score, 1.0);
    assert_eq!(long.warnings[0].kind, WarningKind::PossiblyExcessive);
}

#[test]
fn test_completeness_against_ground_truth() {
    let text = vec!["w"; 300].join(" ");
    let checked = estimate_completeness(&text, 1, Some(1000));
    assert_eq!(checked.summary.expected_min, 800);
    assert_eq!(checked.summary.expected_max, 1500);
    assert!((checked.summary.score - 0.375).abs() < 1e-6);
}

#[test]
fn test_ocr_validator_flags_incomplete_output() {
    let validator = OcrValidator::new(OcrOptions::new().with_page_count(2));
    let report = validator.validate(&annotated(150, ""));
    assert!(report.has_warning(WarningKind::PossiblyIncomplete));
    assert!(report.quality_score < report.base_quality_score);
}

#[test]
fn test_validators_never_panic() {
    let inputs = [
        "",
        "---",
        "---\n---",
        "|",
        "||",
        "[",
        "]](",
        "<!-- page:x -->",
        "<!-- confidence:9.99 -->",
        "<!-- reading-order:0 -->\n<!-- role: -->",
        "\u{feff}# 제목\n\n- 항목",
        "```\n```\n```",
    ];
    let vlm = VlmValidator::default();
    let ocr = OcrValidator::default();
    for input in inputs {
        for report in [
            validate_markdown(input, "", None),
            vlm.validate(input),
            ocr.validate(input),
        ] {
            assert!((0.0..=1.0).contains(&report.quality_score));
        }
    }
}
