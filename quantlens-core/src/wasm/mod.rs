//! # WebAssembly Bindings (wasm-bindgen)
//!
//! JavaScript interface the browser explainer calls on every slider change.
//!
//! ## Usage (JavaScript/TypeScript)
//!
//! ```typescript
//! import { computeParams, quantizeSample, PruningSession } from 'quantlens-core';
//!
//! const params = computeParams('asymmetric', 0, 6);
//! const sample = quantizeSample('asymmetric', 0, 6, 3.0);
//!
//! const session = new PruningSession(42n, 100);
//! const view = session.matrixView(40);
//! console.log(view.threshold, view.keep_mask);
//! ```

use wasm_bindgen::prelude::*;

use crate::config::LensConfig;
use crate::distill::{self, ClassScore};
use crate::prune::PruningMode;
use crate::quant::{self, QuantMode, QuantizationConfig};
use crate::session::VisualizationSession;
use crate::tradeoff::{self, HardwareProfile, DEFAULT_CURVE_SAMPLES};

// Set panic hook for better error messages in browser
#[wasm_bindgen(start)]
pub fn main() {
    console_error_panic_hook::set_once();
}

// ============================================================================
// Error Handling
// ============================================================================

fn to_js_error<E: std::fmt::Display>(e: E) -> JsValue {
    JsValue::from_str(&e.to_string())
}

fn to_js<T: serde::Serialize>(value: &T) -> Result<JsValue, JsValue> {
    serde_wasm_bindgen::to_value(value).map_err(to_js_error)
}

fn parse_mode(mode: &str) -> Result<QuantMode, JsValue> {
    match mode {
        "symmetric" => Ok(QuantMode::Symmetric),
        "asymmetric" => Ok(QuantMode::Asymmetric),
        other => Err(to_js_error(format!("unknown quantization mode '{}'", other))),
    }
}

fn parse_pruning(mode: &str) -> Result<PruningMode, JsValue> {
    match mode {
        "structured" => Ok(PruningMode::Structured),
        "unstructured" => Ok(PruningMode::Unstructured),
        other => Err(to_js_error(format!("unknown pruning mode '{}'", other))),
    }
}

// ============================================================================
// Quantization
// ============================================================================

/// `{ scale, zero_point }` for a real range
#[wasm_bindgen(js_name = computeParams)]
pub fn compute_params(mode: &str, real_min: f64, real_max: f64) -> Result<JsValue, JsValue> {
    let config = QuantizationConfig::new(parse_mode(mode)?, real_min, real_max);
    let params = quant::compute_params(&config).map_err(to_js_error)?;
    to_js(&params)
}

/// `{ real, quantized, dequantized, error }` for one input
#[wasm_bindgen(js_name = quantizeSample)]
pub fn quantize_sample(mode: &str, real_min: f64, real_max: f64, input: f64) -> Result<JsValue, JsValue> {
    let config = QuantizationConfig::new(parse_mode(mode)?, real_min, real_max);
    let params = quant::compute_params(&config).map_err(to_js_error)?;
    to_js(&quant::sample(input, &params))
}

// ============================================================================
// Distillation
// ============================================================================

/// Percent probabilities for `logits` at `temperature`
#[wasm_bindgen(js_name = softmaxDistribution)]
pub fn softmax_distribution(logits: Vec<f64>, temperature: f64) -> Result<Vec<f64>, JsValue> {
    let scores: Vec<ClassScore> = logits
        .into_iter()
        .enumerate()
        .map(|(i, l)| ClassScore::new(format!("class {}", i), l))
        .collect();
    let dist = distill::distribution(&scores, temperature).map_err(to_js_error)?;
    Ok(dist.percentages)
}

// ============================================================================
// Pruning
// ============================================================================

/// Session holding the seeded weight matrix (JS side keeps one per page)
#[wasm_bindgen]
pub struct PruningSession {
    inner: VisualizationSession,
}

#[wasm_bindgen]
impl PruningSession {
    #[wasm_bindgen(constructor)]
    pub fn new(seed: u64, matrix_size: usize) -> Result<PruningSession, JsValue> {
        let config = LensConfig {
            seed,
            matrix_size,
            ..LensConfig::default()
        };
        let inner = VisualizationSession::new(config).map_err(to_js_error)?;
        Ok(Self { inner })
    }

    /// Raw weights, row-major
    #[wasm_bindgen(getter)]
    pub fn weights(&self) -> Vec<f64> {
        self.inner.weights().as_slice().to_vec()
    }

    #[wasm_bindgen(js_name = matrixView)]
    pub fn matrix_view(&self, sparsity_percent: f64) -> Result<JsValue, JsValue> {
        to_js(&self.inner.matrix_view(sparsity_percent).map_err(to_js_error)?)
    }

    #[wasm_bindgen(js_name = networkView)]
    pub fn network_view(&self, mode: &str, sparsity_percent: f64) -> Result<JsValue, JsValue> {
        let view = self
            .inner
            .network_view(parse_pruning(mode)?, sparsity_percent)
            .map_err(to_js_error)?;
        to_js(&view)
    }
}

// ============================================================================
// Trade-off
// ============================================================================

/// Sampled accuracy / speedup curves
#[wasm_bindgen(js_name = tradeoffCurve)]
pub fn tradeoff_curve(mode: &str, accelerator: bool) -> Result<JsValue, JsValue> {
    let hardware = if accelerator {
        HardwareProfile::Accelerator
    } else {
        HardwareProfile::Standard
    };
    let curve = tradeoff::sample_curve(parse_pruning(mode)?, hardware, DEFAULT_CURVE_SAMPLES)
        .map_err(to_js_error)?;
    to_js(&curve)
}
