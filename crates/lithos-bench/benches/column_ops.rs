//! Criterion micro-benchmarks for allowed-column enumeration and the
//! nearest-column search.

use std::hint::black_box;

use criterion::{criterion_group, criterion_main, Criterion};
use lithos::columns::{compute_allowed_indices, nearest_index, DistanceMetric};
use lithos_bench::reference_design;

/// Benchmark: enumerate 8-layer columns over four materials.
fn bench_enumerate_8x4(c: &mut Criterion) {
    c.bench_function("enumerate_8_layers_4_materials", |b| {
        b.iter(|| black_box(compute_allowed_indices(8, &[0, 1, 2, 3], &[0], true).unwrap()));
    });
}

/// Benchmark: nearest column for a 32x32x6 design, both metrics.
fn bench_nearest_columns(c: &mut Criterion) {
    let table = compute_allowed_indices(6, &[0, 1, 2], &[0], true).unwrap();
    let allowed = [1.0, 1.0 / 2.25, 0.25];
    let design = reference_design([32, 32, 6], 3);

    for (label, metric) in [
        ("nearest_32x32x6_euclidean", DistanceMetric::Euclidean),
        ("nearest_32x32x6_differences", DistanceMetric::default()),
    ] {
        c.bench_function(label, |b| {
            b.iter(|| {
                black_box(nearest_index(design.view(), &allowed, 2, &metric, Some(&table)).unwrap())
            });
        });
    }
}

criterion_group!(benches, bench_enumerate_8x4, bench_nearest_columns);
criterion_main!(benches);
