//! Session configuration
//!
//! Defaults mirror the explainer's initial slider positions and bounds.
//!
//! ## Environment Variables
//! - `QUANTLENS_SEED`: weight-matrix seed (default: 42)
//! - `QUANTLENS_MATRIX_SIZE`: number of weights in the matrix view (default: 100)
//! - `QUANTLENS_TEMPERATURE`: initial softmax temperature (default: 1.0)
//! - `QUANTLENS_SPARSITY`: initial target sparsity in percent (default: 0)
//!
//! Unparsable values fall back to the default; `validate()` then checks the
//! result against the slider bounds.

use serde::{Deserialize, Serialize};

use crate::distill::{TEMPERATURE_MAX, TEMPERATURE_MIN};
use crate::error::{LensError, LensResult};
use crate::quant::QuantPreset;
use crate::tradeoff::HardwareProfile;

/// Closed interval a slider may move in
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SliderRange {
    pub min: f64,
    pub max: f64,
    pub step: f64,
}

impl SliderRange {
    pub const fn new(min: f64, max: f64, step: f64) -> Self {
        Self { min, max, step }
    }

    #[inline]
    pub fn contains(&self, value: f64) -> bool {
        value >= self.min && value <= self.max
    }
}

/// Bounds of every user-facing control
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SliderBounds {
    pub real_min: SliderRange,
    pub real_max: SliderRange,
    pub temperature: SliderRange,
    pub sparsity: SliderRange,
}

impl Default for SliderBounds {
    fn default() -> Self {
        Self {
            real_min: SliderRange::new(-10.0, 0.0, 0.1),
            real_max: SliderRange::new(0.1, 10.0, 0.1),
            temperature: SliderRange::new(TEMPERATURE_MIN, TEMPERATURE_MAX, 0.1),
            sparsity: SliderRange::new(0.0, 99.0, 1.0),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LensConfig {
    /// Seed of the weight matrix
    pub seed: u64,
    /// Weights in the matrix view (10 × 10 by default)
    pub matrix_size: usize,
    pub temperature: f64,
    pub sparsity: f64,
    pub preset: QuantPreset,
    pub hardware: HardwareProfile,
    pub bounds: SliderBounds,
}

impl Default for LensConfig {
    fn default() -> Self {
        Self {
            seed: 42,
            matrix_size: 100,
            temperature: 1.0,
            sparsity: 0.0,
            preset: QuantPreset::Weights,
            hardware: HardwareProfile::Standard,
            bounds: SliderBounds::default(),
        }
    }
}

impl LensConfig {
    /// Defaults overlaid with `QUANTLENS_*` environment variables
    pub fn from_env() -> Self {
        let defaults = Self::default();

        let seed = std::env::var("QUANTLENS_SEED")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(defaults.seed);

        let matrix_size = std::env::var("QUANTLENS_MATRIX_SIZE")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(defaults.matrix_size);

        let temperature = std::env::var("QUANTLENS_TEMPERATURE")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(defaults.temperature);

        let sparsity = std::env::var("QUANTLENS_SPARSITY")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(defaults.sparsity);

        Self {
            seed,
            matrix_size,
            temperature,
            sparsity,
            ..defaults
        }
    }

    /// Check the initial values against the slider bounds
    pub fn validate(&self) -> LensResult<()> {
        if self.matrix_size == 0 {
            return Err(LensError::Config("matrix_size must be > 0".into()));
        }
        if !self.bounds.temperature.contains(self.temperature) {
            return Err(LensError::Config(format!(
                "temperature {} outside [{}, {}]",
                self.temperature, self.bounds.temperature.min, self.bounds.temperature.max
            )));
        }
        if !self.bounds.sparsity.contains(self.sparsity) {
            return Err(LensError::Config(format!(
                "sparsity {} outside [{}, {}]",
                self.sparsity, self.bounds.sparsity.min, self.bounds.sparsity.max
            )));
        }
        let preset = self.preset.config();
        if !self.bounds.real_min.contains(preset.real_min)
            || !self.bounds.real_max.contains(preset.real_max)
        {
            return Err(LensError::Config(format!(
                "preset range [{}, {}] outside slider bounds",
                preset.real_min, preset.real_max
            )));
        }
        Ok(())
    }
}
