//! # Distillation Benchmarks
//!
//! Measures temperature softmax and the combined distillation loss.
//!
//! Run: `cargo bench --bench softmax_bench`

use criterion::{black_box, criterion_group, criterion_main, Criterion, BenchmarkId};
use quantlens_core::prelude::*;

/// Benchmark softmax across the temperature slider
fn bench_softmax(c: &mut Criterion) {
    let mut group = c.benchmark_group("softmax");

    let scores = default_scores();

    for t in [1.0, 4.0, 20.0].iter() {
        group.bench_with_input(
            BenchmarkId::new("distribution", t),
            t,
            |b, &t| {
                b.iter(|| {
                    black_box(distribution(&scores, t))
                })
            }
        );
    }

    let wide: Vec<f64> = (0..1000).map(|i| (i as f64).sin() * 10.0).collect();
    group.bench_function("logits_1000", |b| {
        b.iter(|| {
            black_box(softmax_with_temperature(&wide, 4.0))
        })
    });

    group.finish();
}

/// Benchmark distillation loss
fn bench_loss(c: &mut Criterion) {
    let mut group = c.benchmark_group("distillation_loss");

    let teacher: Vec<f64> = default_scores().iter().map(|s| s.logit).collect();
    let student = [4.0, 3.0, 1.0, 0.0];
    let loss = DistillationLoss::new(4.0, 0.7).unwrap();

    group.bench_function("forward", |b| {
        b.iter(|| {
            black_box(loss.forward(&student, &teacher, 0))
        })
    });

    group.finish();
}

criterion_group!(
    benches,
    bench_softmax,
    bench_loss,
);

criterion_main!(benches);
