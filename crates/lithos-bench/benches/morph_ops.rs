//! Criterion micro-benchmarks for brush dilation and the brush solver.

use std::hint::black_box;

use criterion::{criterion_group, criterion_main, Criterion};
use lithos::morph::{dilate, Brush, BrushSolver};
use lithos::types::SolverConfig;
use lithos_test_utils::random_field;

/// Benchmark: dilate a 128x128 half-filled mask with a diameter-7 brush.
fn bench_dilate_128(c: &mut Criterion) {
    let brush = Brush::circular(7.0, None).unwrap();
    let field = random_field(128, 128, 0.0, 1.0, 11).mapv(|v| v > 0.5);

    c.bench_function("dilate_128x128_d7", |b| {
        b.iter(|| black_box(dilate(field.view(), &brush)));
    });
}

/// Benchmark: solve a smooth 32x32 slice with a diameter-3 brush.
fn bench_solve_smooth_32(c: &mut Criterion) {
    let solver = BrushSolver::new(Brush::circular(3.0, None).unwrap(), SolverConfig::default());
    let field = ndarray::Array2::from_shape_fn((32, 32), |(i, j)| {
        (i as f32 / 5.0).sin() * (j as f32 / 7.0).cos()
    });

    c.bench_function("solve_smooth_32x32_d3", |b| {
        b.iter(|| black_box(solver.solve(field.view()).unwrap()));
    });
}

/// Benchmark: solve a random 24x24 slice, the worst case for case 2/3
/// rounds.
fn bench_solve_random_24(c: &mut Criterion) {
    let solver = BrushSolver::new(Brush::square(3).unwrap(), SolverConfig::default());
    let field = random_field(24, 24, -1.0, 1.0, 5);

    c.bench_function("solve_random_24x24_sq3", |b| {
        b.iter(|| black_box(solver.solve(field.view()).unwrap()));
    });
}

/// Benchmark: solve eight random 24x24 slices in parallel.
fn bench_solve_many_8(c: &mut Criterion) {
    let solver = BrushSolver::new(Brush::square(3).unwrap(), SolverConfig::default());
    let fields: Vec<_> = (0..8).map(|s| random_field(24, 24, -1.0, 1.0, s)).collect();
    let views: Vec<_> = fields.iter().map(|f| f.view()).collect();

    c.bench_function("solve_many_8x24x24_sq3", |b| {
        b.iter(|| black_box(solver.solve_many(&views)));
    });
}

criterion_group!(
    benches,
    bench_dilate_128,
    bench_solve_smooth_32,
    bench_solve_random_24,
    bench_solve_many_8
);
criterion_main!(benches);
