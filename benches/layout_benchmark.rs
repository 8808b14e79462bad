//! Benchmarks for layout analysis, rendering and validation.
//!
//! Run with: cargo bench
//!
//! These benchmarks use synthetic two-column pages with a running header
//! and a page number.

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use docflow::layout::{LayoutAnalyzer, LayoutOptions};
use docflow::model::{BBox, Document, Element, Page};
use docflow::render::{to_markdown, CleanupPipeline, CleanupPreset, RenderOptions};
use docflow::validate::{EngineProfile, ValidatorOptions};

/// Creates a synthetic document with the given number of pages.
fn create_test_document(page_count: usize) -> Document {
    let pages = (1..=page_count as u32)
        .map(|number| {
            let mut page = Page::new(number).with_size(612.0, 792.0);
            page.elements.push(Element::text(
                BBox::new(50.0, 20.0, 550.0, 34.0),
                "Benchmark Quarterly Review",
            ));
            for row in 0..30 {
                let y = 80.0 + row as f32 * 22.0;
                for x in [50.0, 330.0] {
                    page.elements.push(
                        Element::text(
                            BBox::new(x, y, x + 230.0, y + 12.0),
                            format!("Line {} of the column text, with words to count.", row),
                        )
                        .with_confidence(if row % 7 == 0 { 0.55 } else { 0.95 }),
                    );
                }
            }
            page.elements.push(Element::text(
                BBox::new(290.0, 760.0, 320.0, 772.0),
                number.to_string(),
            ));
            page
        })
        .collect();
    Document::from_pages(pages)
}

/// Benchmark layout analysis at various sizes.
fn bench_layout_analysis(c: &mut Criterion) {
    let mut group = c.benchmark_group("layout_analysis");

    for page_count in [1, 10, 50].iter() {
        let doc = create_test_document(*page_count);

        group.bench_function(format!("{}_pages_parallel", page_count), |b| {
            let analyzer = LayoutAnalyzer::default();
            b.iter(|| {
                let mut doc = doc.clone();
                analyzer.analyze_document(black_box(&mut doc)).unwrap()
            });
        });

        group.bench_function(format!("{}_pages_sequential", page_count), |b| {
            let analyzer = LayoutAnalyzer::new(LayoutOptions::new().sequential());
            b.iter(|| {
                let mut doc = doc.clone();
                analyzer.analyze_document(black_box(&mut doc)).unwrap()
            });
        });
    }

    group.finish();
}

/// Benchmark rendering and cleanup of an analysed document.
fn bench_render(c: &mut Criterion) {
    let mut doc = create_test_document(10);
    LayoutAnalyzer::default().analyze_document(&mut doc).unwrap();
    let options = RenderOptions::default();

    c.bench_function("render_markdown_10_pages", |b| {
        b.iter(|| to_markdown(black_box(&doc), &options).unwrap());
    });

    let markdown = to_markdown(&doc, &options).unwrap();
    let cleanup = CleanupPipeline::from_preset(CleanupPreset::Aggressive);
    c.bench_function("cleanup_aggressive_10_pages", |b| {
        b.iter(|| cleanup.process(black_box(&markdown)));
    });
}

/// Benchmark the three validator profiles on the same output.
fn bench_validation(c: &mut Criterion) {
    let mut doc = create_test_document(10);
    LayoutAnalyzer::default().analyze_document(&mut doc).unwrap();
    let markdown = to_markdown(&doc, &RenderOptions::default()).unwrap();

    let mut group = c.benchmark_group("validation");
    for profile in [
        EngineProfile::TextLayer,
        EngineProfile::Vlm,
        EngineProfile::LocalOcr,
    ] {
        let base = ValidatorOptions::new().with_method("RapidOCR");
        let validator = profile.validator(base, Some(10), None);
        group.bench_function(format!("{:?}", profile), |b| {
            b.iter(|| validator.validate(black_box(&markdown)));
        });
    }
    group.finish();
}

criterion_group!(benches, bench_layout_analysis, bench_render, bench_validation);
criterion_main!(benches);
