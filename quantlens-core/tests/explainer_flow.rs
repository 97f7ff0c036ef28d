//! Integration tests driving quantlens-core the way a presentation layer does

use std::collections::BTreeSet;

use quantlens_core::prelude::*;

#[test]
fn test_quantization_page_flow() {
    let session = VisualizationSession::new(LensConfig::default()).unwrap();

    // Initial render: asymmetric [-3.5, 3.5], input 1.2
    let cfg = QuantizationConfig::new(QuantMode::Asymmetric, -3.5, 3.5);
    let view = session.quantization_view(&cfg, 1.2).unwrap();
    assert_eq!(view.params.zero_point, 0);
    assert_eq!(view.sample.quantized, 44);
    assert!(view.sample.error.abs() <= view.params.scale / 2.0);

    // Switching to symmetric keeps the zero point centered
    let sym = QuantizationConfig { mode: QuantMode::Symmetric, ..cfg };
    let view = session.quantization_view(&sym, 1.2).unwrap();
    assert_eq!(view.params.zero_point, 0);
    assert!(view.neighborhood.buckets.iter().any(|b| b.code == view.sample.quantized));
}

#[test]
fn test_uninitialized_params_render_neutral_values() {
    let p = QuantizationParams::default();
    let s = sample(2.0, &p);
    assert_eq!(s.quantized, 0);
    assert_eq!(s.dequantized, 0.0);
    assert_eq!(s.error, 0.0);
}

#[test]
fn test_pruning_page_flow() {
    let session = VisualizationSession::new(LensConfig { seed: 2024, ..Default::default() }).unwrap();
    let weights = session.weights().clone();

    let mut last_threshold = 0.0;
    for sparsity in 0..=99 {
        let view = session.matrix_view(sparsity as f64).unwrap();
        assert_eq!(view.keep_mask.len(), 100);
        assert!(view.threshold >= last_threshold);
        assert!((view.achieved_sparsity - sparsity as f64).abs() <= 1.0);
        last_threshold = view.threshold;
    }
    assert_eq!(session.weights(), &weights);

    let structured = session.network_view(PruningMode::Structured, 60.0).unwrap();
    let unstructured = session.network_view(PruningMode::Unstructured, 60.0).unwrap();
    assert!(structured.active_units() < unstructured.active_units());
}

#[test]
fn test_structured_mask_on_network_units() {
    let net = DemoNetwork::default();
    let protected: BTreeSet<usize> = net.protected_layers();
    let mask = structured_mask(net.units(), 99.0, &protected).unwrap();
    let kept: Vec<_> = net
        .units()
        .iter()
        .zip(&mask)
        .filter(|(_, k)| **k)
        .map(|(u, _)| u.layer)
        .collect();
    assert!(kept.contains(&0) && kept.contains(&3));
}

#[test]
fn test_distillation_page_flow() {
    let session = VisualizationSession::new(LensConfig::default()).unwrap();
    let scores = default_scores();

    let cold = session.softmax_view(&scores, 1.0).unwrap();
    let hot = session.softmax_view(&scores, 20.0).unwrap();
    assert!(hot.entropy_bits() > cold.entropy_bits());
    assert_eq!(cold.argmax(), hot.argmax());

    let logits: Vec<f64> = scores.iter().map(|s| s.logit).collect();
    let student = [4.0, 3.0, 1.0, 0.0];
    let loss = DistillationLoss::new(4.0, 0.7).unwrap();
    assert!(loss.forward(&student, &logits, 0).unwrap() > 0.0);
}

#[test]
fn test_tradeoff_curves() {
    let curve = sample_curve(PruningMode::Unstructured, HardwareProfile::Accelerator, 100).unwrap();
    assert!(curve.iter().all(|p| p.speedup == 1.0));
    assert!(curve.iter().all(|p| (0.0..=100.0).contains(&p.accuracy)));

    let structured = sample_curve(PruningMode::Structured, HardwareProfile::Accelerator, 100).unwrap();
    assert!(structured.iter().all(|p| p.speedup <= 10.0));
    assert_eq!(structured.last().unwrap().accuracy, 0.0);
}
