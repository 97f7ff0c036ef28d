//! Walkthrough of the three compression explainers
//!
//! Demonstrates:
//! 1. INT8 quantization of a ReLU6 activation
//! 2. Knowledge distillation at rising temperatures
//! 3. Magnitude pruning and its accuracy / speedup cost

use quantlens_core::prelude::*;

fn main() -> LensResult<()> {
    println!("🔬 QuantLens Compression Tour\n");

    let session = VisualizationSession::new(LensConfig::default())?;

    // 1. Quantization
    println!("1️⃣ Quantization (ReLU6 activations):");
    let preset = QuantPreset::ReluActivations;
    let view = session.quantization_view(&preset.config(), preset.input())?;
    println!("   S = {:.5}, Z = {}", view.params.scale, view.params.zero_point);
    println!(
        "   {:.2} -> q = {} -> {:.5} (error {:+.5})",
        view.sample.real, view.sample.quantized, view.sample.dequantized, view.sample.error
    );
    println!();

    // 2. Distillation
    println!("2️⃣ Softmax temperature:");
    let scores = default_scores();
    for t in [1.0, 4.0, 20.0] {
        let d = session.softmax_view(&scores, t)?;
        let cells: Vec<String> = d.percentages.iter().map(|p| format!("{:5.1}", p)).collect();
        println!("   T={:>4.1}  [{}]  H={:.2} bits", t, cells.join(", "), d.entropy_bits());
    }
    println!();

    // 3. Pruning
    println!("3️⃣ Pruning trade-off:");
    for sparsity in [30.0, 60.0, 90.0] {
        let m = session.matrix_view(sparsity)?;
        let u = session.tradeoff_view(PruningMode::Unstructured, HardwareProfile::Standard, sparsity)?;
        let s = session.tradeoff_view(PruningMode::Structured, HardwareProfile::Accelerator, sparsity)?;
        println!(
            "   {:>4.0}%  threshold {:.3}  unstructured {:>5.1}% / {:.2}x  structured {:>5.1}% / {:.2}x",
            sparsity,
            m.threshold,
            u.current.accuracy,
            u.current.speedup,
            s.current.accuracy,
            s.current.speedup
        );
    }

    Ok(())
}
