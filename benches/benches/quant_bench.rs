//! # Quantization Benchmarks
//!
//! Measures parameter derivation, the per-value quantize/dequantize path and
//! the staircase built for the transfer-function plot.
//!
//! Run: `cargo bench --bench quant_bench`

use criterion::{black_box, criterion_group, criterion_main, Criterion, BenchmarkId};
use quantlens_core::prelude::*;

/// Benchmark scale / zero-point derivation
fn bench_compute_params(c: &mut Criterion) {
    let mut group = c.benchmark_group("compute_params");

    let asym = QuantizationConfig::new(QuantMode::Asymmetric, 0.0, 6.0);
    let sym = QuantizationConfig::new(QuantMode::Symmetric, -3.5, 3.5);

    group.bench_function("asymmetric", |b| {
        b.iter(|| {
            black_box(compute_params(black_box(&asym)))
        })
    });

    group.bench_function("symmetric", |b| {
        b.iter(|| {
            black_box(compute_params(black_box(&sym)))
        })
    });

    group.finish();
}

/// Benchmark the quantize / dequantize path
fn bench_sample(c: &mut Criterion) {
    let mut group = c.benchmark_group("quantize_sample");

    let params = QuantPreset::ReluActivations.config();
    let params = compute_params(&params).unwrap();

    group.bench_function("quantize", |b| {
        b.iter(|| {
            black_box(quantize(black_box(3.0), &params))
        })
    });

    group.bench_function("sample", |b| {
        b.iter(|| {
            black_box(sample(black_box(2.71), &params))
        })
    });

    group.bench_function("sweep_256", |b| {
        b.iter(|| {
            let mut acc = 0.0;
            for i in 0..256 {
                acc += error(i as f64 * 6.0 / 255.0, &params);
            }
            black_box(acc)
        })
    });

    group.finish();
}

/// Benchmark staircase construction over growing windows
fn bench_staircase(c: &mut Criterion) {
    let mut group = c.benchmark_group("staircase");

    let params = compute_params(&QuantizationConfig::new(QuantMode::Asymmetric, -3.5, 3.5)).unwrap();

    for span in [0.5, 2.0, 7.0].iter() {
        group.bench_with_input(
            BenchmarkId::new("over_window", span),
            span,
            |b, &s| {
                b.iter(|| {
                    black_box(Staircase::over_window(-s / 2.0, s / 2.0, &params))
                })
            }
        );
    }

    group.finish();
}

criterion_group!(
    benches,
    bench_compute_params,
    bench_sample,
    bench_staircase,
);

criterion_main!(benches);
