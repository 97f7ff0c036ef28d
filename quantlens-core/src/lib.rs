//! # quantlens-core - Numeric Layer of the Compression Explainers
//!
//! Pure functions behind the quantization, pruning and distillation
//! explainers. The presentation layer owns all UI state, calls in with plain
//! parameters on every change and renders whatever comes back.
//!
//! ## Modules
//!
//! - **quant**: INT8 affine quantization (scale, zero point, error) and the
//!   transfer-function staircase
//! - **distill**: temperature softmax and distillation loss
//! - **prune**: magnitude thresholds, keep masks, seeded weights, demo network
//! - **tradeoff**: accuracy-retention and speedup curves
//! - **session**: the seeded weight matrix plus per-render views
//! - **config**: defaults and slider bounds
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                    Presentation Layer                       │
//! │        (browser via `wasm` feature, or quantlens CLI)       │
//! └──────────────┬───────────────────────────────▲──────────────┘
//!                │ params                        │ plain values
//!                ▼                               │
//! ┌─────────────────────────────────────────────────────────────┐
//! │  quant      distill       prune            tradeoff         │
//! │  (S, Z, q)  (softmax_T)   (threshold,mask)  (acc, speedup)  │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Example
//!
//! ```
//! use quantlens_core::prelude::*;
//!
//! let config = QuantizationConfig::new(QuantMode::Asymmetric, 0.0, 6.0);
//! let params = compute_params(&config).unwrap();
//! assert_eq!(params.zero_point, -128);
//! assert_eq!(quantize(6.0, &params), 127);
//!
//! let weights = [-0.9, -0.1, 0.05, 0.3, 0.95];
//! let result = prune_unstructured(&weights, 40.0).unwrap();
//! assert_eq!(result.keep_mask, vec![true, false, false, true, true]);
//! ```

pub mod error;
pub use error::{LensError, LensResult};

pub mod config;
pub use config::{LensConfig, SliderBounds, SliderRange};

pub mod quant;
pub mod distill;
pub mod prune;
pub mod tradeoff;

pub mod session;
pub use session::{MatrixView, QuantizationView, TradeoffView, VisualizationSession};

#[cfg(feature = "wasm")]
pub mod wasm;

/// Prelude module with common re-exports
pub mod prelude {
    pub use crate::config::{LensConfig, SliderBounds, SliderRange};
    pub use crate::distill::{
        default_scores, distribution, softmax_with_temperature, ClassScore, DistillationLoss,
        TemperatureDistribution,
    };
    pub use crate::error::{LensError, LensResult};
    pub use crate::prune::{
        achieved_sparsity, compute_threshold, prune_unstructured, structured_mask,
        unstructured_mask, DemoNetwork, NetworkView, PruningMode, PruningResult, Unit, WeightSet,
    };
    pub use crate::quant::{
        compute_params, dequantize, error, quantize, sample, Bucket, Neighborhood, QuantMode,
        QuantPreset, QuantizationConfig, QuantizationParams, QuantizedSample, Staircase,
    };
    pub use crate::session::{MatrixView, QuantizationView, TradeoffView, VisualizationSession};
    pub use crate::tradeoff::{accuracy_retention, sample_curve, speedup, CurvePoint, HardwareProfile};
}
