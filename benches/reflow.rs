//! Benchmarks for measurement and reflow
//!
//! Run with: cargo bench reflow

use folio::markup::parse_fragment;
use folio::measure::{BoxMetrics, Measure, PageGeometry};
use folio::model::{Document, EditingContext, Node};
use folio::reflow::{reflow_all, reflow_page};

#[global_allocator]
static ALLOC: divan::AllocProfiler = divan::AllocProfiler::system();

fn main() {
    divan::main();
}

fn paragraphs(count: usize) -> Vec<Node> {
    let markup: String = (0..count)
        .map(|i| {
            format!(
                "<p>Paragraph {} with <b>some</b> words that wrap across a couple of lines \
                 on a normal page width, plus <a href=\"https://example.com\">a link</a>.</p>",
                i
            )
        })
        .collect();
    parse_fragment(&markup)
}

// ============================================================================
// Measurement
// ============================================================================

#[divan::bench(args = [10, 100, 1_000])]
fn measure_paragraphs(bencher: divan::Bencher, count: usize) {
    let nodes = paragraphs(count);
    let metrics = BoxMetrics::default();
    let width = PageGeometry::default().content_width();
    bencher.bench(|| metrics.extent(divan::black_box(&nodes), width));
}

#[divan::bench]
fn measure_table(bencher: divan::Bencher) {
    let nodes = vec![folio::insert::table_fragment(50, 8)];
    let metrics = BoxMetrics::default();
    bencher.bench(|| metrics.extent(divan::black_box(&nodes), 650.0));
}

// ============================================================================
// Reflow
// ============================================================================

/// The common case: a page that still fits
#[divan::bench]
fn reflow_fitting_page(bencher: divan::Bencher) {
    let metrics = BoxMetrics::default();
    let geometry = PageGeometry::default();
    bencher
        .with_inputs(|| Document::from_pages(vec![paragraphs(5)]))
        .bench_local_values(|mut doc| {
            let page = doc.first_page_id();
            let mut ctx = EditingContext::new(page);
            reflow_page(&mut doc, &mut ctx, page, &metrics, &geometry)
        });
}

/// A large paste landing on one page and cascading
#[divan::bench(args = [50, 200, 1_000])]
fn reflow_cascade(bencher: divan::Bencher, count: usize) {
    let metrics = BoxMetrics::default();
    let geometry = PageGeometry::default();
    bencher
        .with_inputs(|| Document::from_pages(vec![paragraphs(count)]))
        .bench_local_values(|mut doc| {
            let page = doc.first_page_id();
            let mut ctx = EditingContext::new(page);
            reflow_page(&mut doc, &mut ctx, page, &metrics, &geometry)
        });
}

#[divan::bench(args = [10, 50])]
fn reflow_all_pages(bencher: divan::Bencher, pages: usize) {
    let metrics = BoxMetrics::default();
    let geometry = PageGeometry::default();
    bencher
        .with_inputs(|| Document::from_pages((0..pages).map(|_| paragraphs(12)).collect()))
        .bench_local_values(|mut doc| {
            let mut ctx = EditingContext::new(doc.first_page_id());
            reflow_all(&mut doc, &mut ctx, &metrics, &geometry)
        });
}
