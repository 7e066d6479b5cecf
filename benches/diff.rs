//! This bench test measures line diffing and side-by-side rendering over
//! prompt contents of varying sizes, including the identical-input fast path.

#![allow(missing_docs)]

use criterion::{criterion_group, criterion_main, BatchSize, Criterion};
use promptlib::domain::diff::{diff, format_for_display};

/// Generates `lines` numbered lines of prose-like content.
fn content(lines: usize, seed: &str) -> String {
    (0..lines)
        .map(|i| format!("{seed} line {i}: respond concisely and cite your sources"))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Rewrites every `stride`-th line so the diff contains scattered changes.
fn edited(original: &str, stride: usize) -> String {
    original
        .lines()
        .enumerate()
        .map(|(i, line)| {
            if i % stride == 0 {
                format!("{line} (revised)")
            } else {
                line.to_string()
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}

fn diff_small(c: &mut Criterion) {
    let old = content(20, "instruction");
    let new = edited(&old, 4);
    c.bench_function("diff 20 lines", |b| {
        b.iter(|| diff(&old, &new));
    });
}

fn diff_large(c: &mut Criterion) {
    let old = content(2_000, "instruction");
    let new = edited(&old, 7);
    c.bench_function("diff 2000 lines", |b| {
        b.iter(|| diff(&old, &new));
    });
}

fn diff_identical(c: &mut Criterion) {
    let old = content(2_000, "instruction");
    let new = old.clone();
    c.bench_function("diff identical content", |b| {
        b.iter(|| diff(&old, &new));
    });
}

fn render_side_by_side(c: &mut Criterion) {
    let old = content(500, "instruction");
    let new = edited(&old, 3);
    c.bench_function("render side-by-side view", |b| {
        b.iter_batched(
            || diff(&old, &new),
            |segments| format_for_display(&segments),
            BatchSize::SmallInput,
        );
    });
}

criterion_group!(
    benches,
    diff_small,
    diff_large,
    diff_identical,
    render_side_by_side
);
criterion_main!(benches);
