//! # Pruning Benchmarks
//!
//! Threshold selection sorts all magnitudes, so it is the cost that grows
//! with the matrix. Network views stay fixed-size.
//!
//! Run: `cargo bench --bench prune_bench`

use criterion::{black_box, criterion_group, criterion_main, Criterion, BenchmarkId, Throughput};
use quantlens_core::prelude::*;

/// Benchmark threshold + mask over seeded matrices
fn bench_unstructured(c: &mut Criterion) {
    let mut group = c.benchmark_group("unstructured");

    for len in [100, 10_000, 100_000].iter() {
        let weights = WeightSet::generate(42, *len);
        group.throughput(Throughput::Elements(*len as u64));
        group.bench_with_input(
            BenchmarkId::new("prune_60", len),
            &weights,
            |b, w| {
                b.iter(|| {
                    black_box(w.prune(60.0))
                })
            }
        );
    }

    group.finish();
}

/// Benchmark the demo network views
fn bench_network(c: &mut Criterion) {
    let mut group = c.benchmark_group("network");

    let net = DemoNetwork::default();

    group.bench_function("structured_view", |b| {
        b.iter(|| {
            black_box(net.view(PruningMode::Structured, black_box(50.0)))
        })
    });

    group.bench_function("unstructured_view", |b| {
        b.iter(|| {
            black_box(net.view(PruningMode::Unstructured, black_box(50.0)))
        })
    });

    group.finish();
}

/// Benchmark the trade-off curve sampling
fn bench_tradeoff(c: &mut Criterion) {
    let mut group = c.benchmark_group("tradeoff");

    group.bench_function("structured_accelerator_100", |b| {
        b.iter(|| {
            black_box(sample_curve(PruningMode::Structured, HardwareProfile::Accelerator, 100))
        })
    });

    group.finish();
}

criterion_group!(
    benches,
    bench_unstructured,
    bench_network,
    bench_tradeoff,
);

criterion_main!(benches);
