//! Integration tests for layout analysis and noise tagging.

use docflow::layout::{detect_columns, LayoutAnalyzer, LayoutOptions};
use docflow::model::{BBox, Document, Element, NoiseType, Page, SemanticRole};
use docflow::noise::{NoiseDetector, NoiseOptions};

fn text(x0: f32, y0: f32, x1: f32, y1: f32, s: &str) -> Element {
    Element::text(BBox::new(x0, y0, x1, y1), s)
}

/// A 612x792 page with a running header, two body columns and a footer
/// page number.
fn report_page(number: u32) -> Page {
    let mut page = Page::new(number).with_size(612.0, 792.0);
    page.elements = vec![
        text(350.0, 300.0, 550.0, 314.0, "Right column, second"),
        text(50.0, 20.0, 550.0, 34.0, "ACME Corp Annual Report"),
        text(50.0, 100.0, 250.0, 114.0, "Left column, first"),
        text(290.0, 760.0, 320.0, 772.0, &format!("- {} -", number)),
        text(350.0, 100.0, 550.0, 114.0, "Right column, first"),
        text(50.0, 300.0, 250.0, 314.0, "Left column, second"),
    ];
    page
}

#[test]
fn test_two_columns_from_gap() {
    let elements = vec![
        text(350.0, 100.0, 550.0, 114.0, "b"),
        text(50.0, 100.0, 250.0, 114.0, "a"),
    ];
    let columns = detect_columns(&elements, 50.0);
    assert_eq!(columns.len(), 2);
    assert_eq!(columns[0].x_min, 50.0);
    assert_eq!(columns[0].x_max, 250.0);
    assert_eq!(columns[1].x_min, 350.0);
}

#[test]
fn test_gap_equal_to_threshold_keeps_one_column() {
    let elements = vec![
        text(50.0, 100.0, 250.0, 114.0, "a"),
        text(300.0, 100.0, 500.0, 114.0, "b"),
    ];
    assert_eq!(detect_columns(&elements, 50.0).len(), 1);
}

#[test]
fn test_reading_order_column_by_column() {
    let mut doc = Document::from_pages((1..=3).map(report_page).collect());
    let layout = LayoutAnalyzer::default().analyze_document(&mut doc).unwrap();
    assert_eq!(layout.pages[0].column_count(), 2);

    let body: Vec<&str> = doc.pages[0]
        .elements
        .iter()
        .filter(|e| e.text.contains("column"))
        .map(|e| e.text.as_str())
        .collect();
    assert_eq!(
        body,
        vec![
            "Left column, first",
            "Left column, second",
            "Right column, first",
            "Right column, second"
        ]
    );
}

#[test]
fn test_reading_order_is_dense_and_unique() {
    let mut page = report_page(1);
    LayoutAnalyzer::default().analyze_page(&mut page);

    let mut orders: Vec<u32> = page.elements.iter().filter_map(|e| e.reading_order).collect();
    orders.sort_unstable();
    let expected: Vec<u32> = (1..=page.elements.len() as u32).collect();
    assert_eq!(orders, expected);
}

#[test]
fn test_untagged_running_header_merges_columns() {
    let mut page = report_page(1);
    let layout = LayoutAnalyzer::default().analyze_page(&mut page);
    assert_eq!(layout.column_count(), 1);
}

#[test]
fn test_noise_tagging_keeps_text_and_geometry() {
    let mut doc = Document::from_pages((1..=4).map(report_page).collect());
    let before = doc.clone();

    let report = NoiseDetector::default().tag(&mut doc);
    assert!(report.active);
    assert_eq!(report.headers, 4);
    assert_eq!(report.page_numbers, 4);

    for (tagged, original) in doc.pages.iter().zip(&before.pages) {
        assert_eq!(tagged.elements.len(), original.elements.len());
        for (a, b) in tagged.elements.iter().zip(&original.elements) {
            assert_eq!(a.text, b.text);
            assert_eq!(a.bbox, b.bbox);
        }
        let header = tagged
            .elements
            .iter()
            .find(|e| e.text == "ACME Corp Annual Report")
            .unwrap();
        assert_eq!(header.noise_type, Some(NoiseType::Header));
    }
}

#[test]
fn test_noise_needs_three_pages() {
    let mut doc = Document::from_pages((1..=2).map(report_page).collect());
    let report = NoiseDetector::default().tag(&mut doc);
    assert!(!report.active);
    assert!(doc
        .pages
        .iter()
        .flat_map(|p| &p.elements)
        .all(|e| e.noise_type.is_none()));
}

#[test]
fn test_noise_threshold_option() {
    let mut pages: Vec<Page> = (1..=4).map(report_page).collect();
    pages[3]
        .elements
        .retain(|e| e.text != "ACME Corp Annual Report");
    let mut strict = Document::from_pages(pages.clone());
    let mut loose = Document::from_pages(pages);

    let strict_report = NoiseDetector::new(NoiseOptions::new().with_threshold(1.0)).tag(&mut strict);
    let loose_report = NoiseDetector::new(NoiseOptions::new().with_threshold(0.75)).tag(&mut loose);

    assert_eq!(strict_report.headers, 0);
    assert_eq!(loose_report.headers, 3);
}

#[test]
fn test_analyze_document_assigns_noise_roles() {
    let mut doc = Document::from_pages((1..=3).map(report_page).collect());
    let layout = LayoutAnalyzer::default().analyze_document(&mut doc).unwrap();

    assert_eq!(layout.pages.len(), 3);
    assert_eq!(layout.max_columns(), 2);
    for page in &doc.pages {
        let footer = page.elements.iter().find(|e| e.text.starts_with("- ")).unwrap();
        assert_eq!(footer.semantic_role, Some(SemanticRole::PageNumber));
        let header = page
            .elements
            .iter()
            .find(|e| e.text == "ACME Corp Annual Report")
            .unwrap();
        assert_eq!(header.semantic_role, Some(SemanticRole::Header));
        assert_eq!(header.reading_order, Some(1));
    }
}

#[test]
fn test_sequential_matches_parallel() {
    let mut parallel = Document::from_pages((1..=5).map(report_page).collect());
    let mut sequential = parallel.clone();

    let a = LayoutAnalyzer::default()
        .analyze_document(&mut parallel)
        .unwrap();
    let b = LayoutAnalyzer::new(LayoutOptions::new().sequential())
        .analyze_document(&mut sequential)
        .unwrap();

    assert_eq!(a, b);
    assert_eq!(parallel, sequential);
}

#[test]
fn test_invalid_options_rejected() {
    let mut doc = Document::from_pages(vec![report_page(1)]);
    let analyzer = LayoutAnalyzer::new(LayoutOptions::new().with_column_gap(-1.0));
    assert!(analyzer.analyze_document(&mut doc).is_err());
}
