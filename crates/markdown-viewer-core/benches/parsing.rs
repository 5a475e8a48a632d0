use criterion::{Criterion, criterion_group, criterion_main};
use markdown_viewer_core::render::OutlineBackend;
use markdown_viewer_core::{MarkdownParser, Renderer};
use pulldown_cmark::{Options, Parser};
use std::hint::black_box;
mod common;

fn bench_parsing(c: &mut Criterion) {
    let mut group = c.benchmark_group("parsing");
    group.sample_size(10);

    let notes = common::notes_document(100);
    group.bench_function("pulldown_cmark_baseline", |b| {
        b.iter(|| {
            let parser = Parser::new_ext(black_box(&notes), Options::ENABLE_TABLES);
            black_box(parser.collect::<Vec<_>>());
        });
    });

    let parser = MarkdownParser::default();
    let inputs = [
        ("notes", notes.clone()),
        ("wide_table", common::wide_table(500, 8)),
        ("fenced_code", common::fenced_code(50, 40)),
        ("nested_tasks", common::nested_tasks(4, 5)),
    ];
    for (name, text) in &inputs {
        group.bench_function(*name, |b| {
            b.iter(|| black_box(parser.parse_str(black_box(text))));
        });
    }

    group.finish();
}

fn bench_rendering(c: &mut Criterion) {
    let mut group = c.benchmark_group("rendering");
    group.sample_size(10);

    let notes = common::notes_document(100);
    group.bench_function("outline_document", |b| {
        b.iter(|| {
            let mut renderer = Renderer::new(OutlineBackend::new());
            black_box(renderer.render_document(black_box(&notes)).is_ok());
        });
    });

    let edited = notes.replace("write summary", "send summary");
    group.bench_function("refresh_in_place", |b| {
        let mut renderer = Renderer::new(OutlineBackend::new());
        let Ok(mut doc) = renderer.render_document(&notes) else {
            return;
        };
        let mut flip = false;
        b.iter(|| {
            flip = !flip;
            let text = if flip { &edited } else { &notes };
            black_box(renderer.refresh(&mut doc, text).is_ok());
        });
    });

    group.finish();
}

criterion_group!(benches, bench_parsing, bench_rendering);
criterion_main!(benches);
