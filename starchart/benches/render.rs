//! Benchmarks for series building and SVG rendering.
//!
//! Run with: `cargo bench -p starchart -- render`

#![allow(missing_docs)]

use chrono::{TimeZone, Utc};
use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};
use starchart::{ChartSpec, StarEvent, build_series, render_svg};

/// One star per hour, starting in September 2020.
fn events(count: i64) -> Vec<StarEvent> {
    (0..count)
        .map(|i| StarEvent::new(Utc.timestamp_opt(1_600_000_000 + i * 3_600, 0).unwrap()))
        .collect()
}

fn bench_build_series(c: &mut Criterion) {
    let mut group = c.benchmark_group("build_series");
    for count in [10, 1_000, 40_000] {
        let input = events(count);
        group.bench_with_input(BenchmarkId::from_parameter(count), &input, |b, input| {
            b.iter(|| build_series(black_box(input)));
        });
    }
    group.finish();
}

fn bench_render_svg(c: &mut Criterion) {
    let spec = ChartSpec::default();
    let mut group = c.benchmark_group("render_svg");
    for count in [10, 1_000, 40_000] {
        let series = build_series(&events(count));
        group.bench_with_input(BenchmarkId::from_parameter(count), &series, |b, series| {
            b.iter(|| render_svg(black_box(series), &spec).unwrap());
        });
    }
    group.finish();
}

criterion_group!(benches, bench_build_series, bench_render_svg);
criterion_main!(benches);
