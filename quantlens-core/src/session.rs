//! # Visualization Session
//!
//! Owns the one piece of retained state (the seeded weight matrix and the
//! demo network) and answers every render request with a fresh value.
//!
//! ```text
//! ┌──────────────────────────────────────────────────────┐
//! │                VisualizationSession                  │
//! │  ┌──────────────┐   ┌──────────────┐                 │
//! │  │  WeightSet   │   │ DemoNetwork  │  built once     │
//! │  └──────┬───────┘   └──────┬───────┘                 │
//! │         ▼                  ▼                         │
//! │   matrix_view(s)     network_view(mode, s)           │
//! │   quantization_view(cfg, x)   softmax_view(T)        │
//! │   tradeoff_view(mode, hw, s)                         │
//! └──────────────────────────────────────────────────────┘
//! ```

use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use crate::config::LensConfig;
use crate::distill::{self, ClassScore, TemperatureDistribution};
use crate::error::LensResult;
use crate::prune::{achieved_sparsity, DemoNetwork, NetworkView, PruningMode, WeightSet};
use crate::quant::{
    self, Neighborhood, QuantizationConfig, QuantizationParams, QuantizedSample, Staircase,
    transfer::NEIGHBORHOOD_RADIUS_STEPS,
};
use crate::tradeoff::{self, CurvePoint, HardwareProfile, DEFAULT_CURVE_SAMPLES};

/// Everything the quantization page renders for one input
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuantizationView {
    pub config: QuantizationConfig,
    pub params: QuantizationParams,
    pub sample: QuantizedSample,
    pub clipped: bool,
    pub significant_error: bool,
    pub neighborhood: Neighborhood,
    pub staircase: Staircase,
}

/// Weight matrix state for one sparsity setting
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatrixView {
    pub sparsity_percent: f64,
    pub threshold: f64,
    pub keep_mask: Vec<bool>,
    /// Share of weights actually pruned (ties can make it differ from the target)
    pub achieved_sparsity: f64,
}

/// Trade-off curves plus the marker for the current sparsity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TradeoffView {
    pub mode: PruningMode,
    pub hardware: HardwareProfile,
    pub current: CurvePoint,
    pub curve: Vec<CurvePoint>,
}

#[derive(Debug, Clone)]
pub struct VisualizationSession {
    config: LensConfig,
    weights: WeightSet,
    network: DemoNetwork,
}

impl VisualizationSession {
    /// Validate `config` and generate the weight matrix
    pub fn new(config: LensConfig) -> LensResult<Self> {
        config.validate()?;
        let weights = WeightSet::generate(config.seed, config.matrix_size);
        debug!(
            seed = config.seed,
            weights = weights.len(),
            "visualization session created"
        );
        Ok(Self {
            config,
            weights,
            network: DemoNetwork::default(),
        })
    }

    pub fn config(&self) -> &LensConfig {
        &self.config
    }

    pub fn weights(&self) -> &WeightSet {
        &self.weights
    }

    pub fn network(&self) -> &DemoNetwork {
        &self.network
    }

    pub fn quantization_view(
        &self,
        config: &QuantizationConfig,
        input: f64,
    ) -> LensResult<QuantizationView> {
        let params = quant::compute_params(config)?;
        let sample = quant::sample(input, &params);
        trace!(
            mode = %config.mode,
            scale = params.scale,
            zero_point = params.zero_point,
            quantized = sample.quantized,
            "quantization view"
        );

        Ok(QuantizationView {
            config: *config,
            params,
            sample,
            clipped: quant::is_clipped(input, &params),
            significant_error: quant::is_significant_error(&sample, &params),
            neighborhood: Neighborhood::around(input, &params, NEIGHBORHOOD_RADIUS_STEPS),
            staircase: Staircase::build(config, &params),
        })
    }

    pub fn softmax_view(
        &self,
        scores: &[ClassScore],
        temperature: f64,
    ) -> LensResult<TemperatureDistribution> {
        let dist = distill::distribution(scores, temperature)?;
        trace!(temperature, top = ?dist.argmax(), "softmax view");
        Ok(dist)
    }

    pub fn matrix_view(&self, sparsity_percent: f64) -> LensResult<MatrixView> {
        let result = self.weights.prune(sparsity_percent)?;
        trace!(
            sparsity_percent,
            threshold = result.threshold,
            kept = result.kept(),
            "matrix view"
        );
        Ok(MatrixView {
            sparsity_percent,
            threshold: result.threshold,
            achieved_sparsity: achieved_sparsity(&result.keep_mask),
            keep_mask: result.keep_mask,
        })
    }

    pub fn network_view(&self, mode: PruningMode, sparsity_percent: f64) -> LensResult<NetworkView> {
        self.network.view(mode, sparsity_percent)
    }

    pub fn tradeoff_view(
        &self,
        mode: PruningMode,
        hardware: HardwareProfile,
        sparsity_percent: f64,
    ) -> LensResult<TradeoffView> {
        crate::prune::check_sparsity(sparsity_percent)?;
        let x = sparsity_percent / 100.0;
        let current = CurvePoint {
            sparsity: x,
            accuracy: tradeoff::accuracy_retention(x, mode)?,
            speedup: tradeoff::speedup(x, mode, hardware)?,
        };
        Ok(TradeoffView {
            mode,
            hardware,
            current,
            curve: tradeoff::sample_curve(mode, hardware, DEFAULT_CURVE_SAMPLES)?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::quant::{QuantMode, QuantPreset};

    fn session() -> VisualizationSession {
        VisualizationSession::new(LensConfig::default()).unwrap()
    }

    #[test]
    fn test_rejects_invalid_config() {
        let cfg = LensConfig { matrix_size: 0, ..Default::default() };
        assert!(VisualizationSession::new(cfg).is_err());
    }

    #[test]
    fn test_quantization_view_preset() {
        let s = session();
        let preset = QuantPreset::ReluActivations;
        let v = s.quantization_view(&preset.config(), preset.input()).unwrap();
        assert_eq!(v.params.zero_point, -128);
        assert_eq!(v.sample.quantized, 0);
        assert!(!v.clipped);
        assert_eq!(v.staircase.len(), 256);
    }

    #[test]
    fn test_quantization_view_invalid_range() {
        let s = session();
        let cfg = QuantizationConfig::new(QuantMode::Symmetric, 0.0, 0.0);
        assert!(s.quantization_view(&cfg, 1.0).is_err());
    }

    #[test]
    fn test_matrix_view_does_not_regenerate_weights() {
        let s = session();
        let before = s.weights().clone();
        let low = s.matrix_view(10.0).unwrap();
        let high = s.matrix_view(90.0).unwrap();
        assert_eq!(s.weights(), &before);
        assert!(high.threshold >= low.threshold);
        assert!((high.achieved_sparsity - 90.0).abs() <= 1.0);
    }

    #[test]
    fn test_tradeoff_view_marker() {
        let s = session();
        let v = s
            .tradeoff_view(PruningMode::Structured, HardwareProfile::Accelerator, 50.0)
            .unwrap();
        assert_eq!(v.curve.len(), 101);
        assert!((v.current.speedup - 1.5 / 0.55).abs() < 1e-9);
        assert!(s
            .tradeoff_view(PruningMode::Structured, HardwareProfile::Standard, 101.0)
            .is_err());
    }
}
