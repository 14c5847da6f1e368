//! Parser and folding benchmarks
//!
//! Run with: `cargo bench --package tailor-bench parser_benchmark`

use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use std::hint::black_box;
use tailor_core::{fold, selector_parser, value_parser};

const VALUES: &[(&str, &str)] = &[
    ("simple", "1rem"),
    ("calc", "calc(var(--spacing) * 4)"),
    ("nested", "calc(calc(1rem + 2rem) * -1)"),
    ("shadow", "0 0 2px var(--tw-shadow-color, rgb(0 0 0 / 0.1)), inset 0 1px 0 red"),
];

const SELECTORS: &[(&str, &str)] = &[
    ("class", ".x:hover"),
    ("group", ".x:is(:where(.group):hover *)"),
    ("attribute", ".x[data-state = 'open' i] > *"),
];

fn bench_value_parser(c: &mut Criterion) {
    let mut group = c.benchmark_group("value_parser");
    for (name, value) in VALUES {
        group.bench_with_input(BenchmarkId::from_parameter(name), value, |b, value| {
            b.iter(|| value_parser::to_css(&value_parser::parse(black_box(value))));
        });
    }
    group.finish();
}

fn bench_selector_parser(c: &mut Criterion) {
    let mut group = c.benchmark_group("selector_parser");
    for (name, selector) in SELECTORS {
        group.bench_with_input(BenchmarkId::from_parameter(name), selector, |b, selector| {
            b.iter(|| selector_parser::to_css(&selector_parser::parse(black_box(selector))));
        });
    }
    group.finish();
}

fn bench_fold(c: &mut Criterion) {
    let mut group = c.benchmark_group("fold");
    group.bench_function("rem", |b| {
        b.iter(|| fold::fold(black_box("calc(0.25rem * 4)"), None));
    });
    group.bench_function("rem_px", |b| {
        b.iter(|| fold::fold(black_box("calc(0.25rem * 4)"), Some(16.0)));
    });
    group.bench_function("unfoldable", |b| {
        b.iter(|| fold::fold(black_box("calc(100% - 2rem)"), None));
    });
    group.finish();
}

criterion_group!(benches, bench_value_parser, bench_selector_parser, bench_fold);
criterion_main!(benches);
