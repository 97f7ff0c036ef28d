//! # Affine Quantization (INT8)
//!
//! Maps a real range onto the signed 8-bit grid and back.
//!
//! ## Functions
//!
//! | Function | Description |
//! |----------|-------------|
//! | `compute_params` | Scale / zero point for a real range |
//! | `quantize` | real → int8 code (clamped) |
//! | `dequantize` | int8 code → real |
//! | `error` | Reconstruction error of one value |
//! | `sample` | All of the above in one record |
//!
//! ## Rounding
//!
//! Every rounding step (zero point and code) uses **round half up**:
//! `floor(x + 0.5)`. `-0.5` maps to `0` and `0.5` maps to `1`. This is the
//! rule the browser explainer applies, so both agree on bucket boundaries.
//!
//! ## Degenerate scale
//!
//! A params value whose scale is zero (or not finite) means "not yet
//! initialized". `quantize`, `dequantize` and `error` return zero for it
//! instead of dividing by zero.

pub mod transfer;

pub use transfer::{Bucket, Neighborhood, Staircase};

use serde::{Deserialize, Serialize};

use crate::error::{LensError, LensResult};

/// Smallest signed 8-bit code
pub const Q_MIN: i32 = -128;

/// Largest signed 8-bit code
pub const Q_MAX: i32 = 127;

/// Quantization scheme
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QuantMode {
    /// Integer grid centered on zero (zero point is always 0)
    Symmetric,
    /// Integer grid shifted to cover an arbitrary real range
    Asymmetric,
}

impl std::fmt::Display for QuantMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            QuantMode::Symmetric => write!(f, "symmetric"),
            QuantMode::Asymmetric => write!(f, "asymmetric"),
        }
    }
}

/// Real range to be mapped onto the INT8 grid
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct QuantizationConfig {
    pub mode: QuantMode,
    pub real_min: f64,
    pub real_max: f64,
}

impl QuantizationConfig {
    pub fn new(mode: QuantMode, real_min: f64, real_max: f64) -> Self {
        Self { mode, real_min, real_max }
    }

    /// Checks `real_min < real_max` with both bounds finite
    pub fn validate(&self) -> LensResult<()> {
        if !self.real_min.is_finite() || !self.real_max.is_finite() {
            return Err(LensError::invalid(
                "real range",
                format!("bounds must be finite, got [{}, {}]", self.real_min, self.real_max),
            ));
        }
        if self.real_min >= self.real_max {
            return Err(LensError::invalid(
                "real range",
                format!("real_min ({}) must be < real_max ({})", self.real_min, self.real_max),
            ));
        }
        Ok(())
    }

    /// Width of the real range
    pub fn span(&self) -> f64 {
        self.real_max - self.real_min
    }
}

/// Scale and zero point derived from a [`QuantizationConfig`]
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct QuantizationParams {
    pub scale: f64,
    pub zero_point: i32,
}

impl QuantizationParams {
    /// Sentinel for "no valid range yet"
    pub const UNINITIALIZED: Self = Self { scale: 0.0, zero_point: 0 };

    /// `false` for the degenerate-scale sentinel
    #[inline]
    pub fn is_initialized(&self) -> bool {
        self.scale.is_finite() && self.scale > 0.0
    }
}

impl Default for QuantizationParams {
    fn default() -> Self {
        Self::UNINITIALIZED
    }
}

/// One value pushed through quantize → dequantize
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct QuantizedSample {
    pub real: f64,
    pub quantized: i32,
    pub dequantized: f64,
    /// `dequantized - real`
    pub error: f64,
}

/// Round half up: `floor(x + 0.5)`
#[inline]
pub fn round_half_up(x: f64) -> f64 {
    (x + 0.5).floor()
}

/// Compute scale and zero point for a real range
///
/// - Symmetric: `scale = max(|min|, |max|) / 127`, `zero_point = 0`
/// - Asymmetric: `scale = (max - min) / 255`,
///   `zero_point = round(-128 - min / scale)`
pub fn compute_params(config: &QuantizationConfig) -> LensResult<QuantizationParams> {
    config.validate()?;

    let params = match config.mode {
        QuantMode::Symmetric => {
            let abs_max = config.real_min.abs().max(config.real_max.abs());
            QuantizationParams {
                scale: abs_max / Q_MAX as f64,
                zero_point: 0,
            }
        }
        QuantMode::Asymmetric => {
            let scale = config.span() / (Q_MAX - Q_MIN) as f64;
            let zero_point = if scale > 0.0 {
                let zp = round_half_up(Q_MIN as f64 - config.real_min / scale);
                if !(i32::MIN as f64..=i32::MAX as f64).contains(&zp) {
                    return Err(LensError::invalid(
                        "real range",
                        format!(
                            "range [{}, {}] is too narrow for its offset from zero (zero point {:e})",
                            config.real_min, config.real_max, zp
                        ),
                    ));
                }
                zp as i32
            } else {
                0
            };
            QuantizationParams { scale, zero_point }
        }
    };

    if !params.is_initialized() {
        return Err(LensError::invalid(
            "real range",
            format!("range [{}, {}] collapses to a zero scale", config.real_min, config.real_max),
        ));
    }

    Ok(params)
}

/// Quantize a real value: `clamp(round(real / scale + zero_point), -128, 127)`
///
/// Out-of-range inputs are clipped silently. Returns `0` for
/// uninitialized params.
#[inline]
pub fn quantize(real: f64, params: &QuantizationParams) -> i32 {
    if !params.is_initialized() || !real.is_finite() {
        return 0;
    }
    let code = round_half_up(real / params.scale + params.zero_point as f64);
    code.clamp(Q_MIN as f64, Q_MAX as f64) as i32
}

/// Dequantize an INT8 code: `scale * (q - zero_point)`
#[inline]
pub fn dequantize(q: i32, params: &QuantizationParams) -> f64 {
    if !params.is_initialized() {
        return 0.0;
    }
    params.scale * (q as f64 - params.zero_point as f64)
}

/// Reconstruction error: `dequantize(quantize(real)) - real`
#[inline]
pub fn error(real: f64, params: &QuantizationParams) -> f64 {
    if !params.is_initialized() || !real.is_finite() {
        return 0.0;
    }
    dequantize(quantize(real, params), params) - real
}

/// Push one value through the quantizer
pub fn sample(real: f64, params: &QuantizationParams) -> QuantizedSample {
    if !params.is_initialized() || !real.is_finite() {
        return QuantizedSample {
            real,
            quantized: 0,
            dequantized: 0.0,
            error: 0.0,
        };
    }
    let quantized = quantize(real, params);
    let dequantized = dequantize(quantized, params);
    QuantizedSample {
        real,
        quantized,
        dequantized,
        error: dequantized - real,
    }
}

/// Error large enough to be worth highlighting (> 10% of one step)
pub fn is_significant_error(sample: &QuantizedSample, params: &QuantizationParams) -> bool {
    params.is_initialized() && sample.error.abs() > params.scale * 0.1
}

/// Whether a real value lies outside the representable range and gets clipped
///
/// Non-finite inputs quantize to the neutral `0`, so they are not reported as
/// clipped either.
pub fn is_clipped(real: f64, params: &QuantizationParams) -> bool {
    if !params.is_initialized() || !real.is_finite() {
        return false;
    }
    let code = round_half_up(real / params.scale + params.zero_point as f64);
    code < Q_MIN as f64 || code > Q_MAX as f64
}

/// Canned ranges from the explainer's preset buttons
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QuantPreset {
    /// Layer weights: roughly normal around 0
    Weights,
    /// ReLU6 activations: never negative
    ReluActivations,
}

impl QuantPreset {
    pub fn config(&self) -> QuantizationConfig {
        match self {
            QuantPreset::Weights => QuantizationConfig::new(QuantMode::Symmetric, -3.5, 3.5),
            QuantPreset::ReluActivations => {
                QuantizationConfig::new(QuantMode::Asymmetric, 0.0, 6.0)
            }
        }
    }

    /// Input value the preset selects
    pub fn input(&self) -> f64 {
        match self {
            QuantPreset::Weights => 0.5,
            QuantPreset::ReluActivations => 3.0,
        }
    }
}

impl std::str::FromStr for QuantPreset {
    type Err = LensError;

    fn from_str(s: &str) -> LensResult<Self> {
        match s.to_lowercase().as_str() {
            "weights" => Ok(QuantPreset::Weights),
            "relu" | "relu_activations" | "relu-activations" => Ok(QuantPreset::ReluActivations),
            other => Err(LensError::invalid("preset", format!("unknown preset '{}'", other))),
        }
    }
}
