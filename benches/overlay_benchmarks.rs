//! Benchmarks for overlay switching and highlighting.
//!
//! Run with: cargo bench

use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};
use recede_core::{Config, Editor};
use recede_syntax::LanguageId;

/// Generates a TypeScript source with `classes` small classes.
fn generate_source(classes: usize) -> String {
    (0..classes)
        .map(|i| {
            format!(
                "import {{ dep{i} }} from \"./dep{i}\";\n\
                 export class Item{i} {{\n  private value = {i};\n  get(): number {{ return this.value; }}\n}}\n"
            )
        })
        .collect()
}

fn editor_with(text: &str) -> (Editor, recede_core::DocumentId) {
    let mut editor = Editor::with_config(Config::default()).unwrap();
    let id = editor.open_text(text, Some(LanguageId::TypeScript)).unwrap();
    (editor, id)
}

/// Benchmarks compiling the overlay registry from configuration.
fn bench_registry(c: &mut Criterion) {
    let config = Config::default();
    c.bench_function("build_registry", |b| {
        b.iter(|| black_box(config.overlay.build_registry().unwrap()))
    });
}

/// Benchmarks enable followed by disable on one document.
fn bench_toggle(c: &mut Criterion) {
    let (mut editor, id) = editor_with(&generate_source(10));

    c.bench_function("toggle_on_off", |b| {
        b.iter(|| {
            editor.toggle_overlay(black_box(id)).unwrap();
            editor.toggle_overlay(black_box(id)).unwrap();
        })
    });
}

/// Benchmarks highlighting with and without the overlay.
fn bench_highlight(c: &mut Criterion) {
    let mut group = c.benchmark_group("highlight");

    for size in [10, 100, 1000].iter() {
        let (mut editor, id) = editor_with(&generate_source(*size));

        group.bench_with_input(BenchmarkId::new("base", size), &id, |b, &id| {
            b.iter(|| black_box(editor.highlight_spans(id).unwrap()))
        });

        editor.set_overlay(id, true).unwrap();
        group.bench_with_input(BenchmarkId::new("overlay", size), &id, |b, &id| {
            b.iter(|| black_box(editor.highlight_spans(id).unwrap()))
        });
    }

    group.finish();
}

criterion_group!(benches, bench_registry, bench_toggle, bench_highlight);
criterion_main!(benches);
