//! Transfer-function geometry of the quantizer
//!
//! The explainer draws the quantizer as a staircase (real in → real out) and
//! zooms in on the buckets around the current input. Both views are plain
//! lists of buckets; turning them into paths is the renderer's job.

use serde::{Deserialize, Serialize};

use super::{round_half_up, QuantizationConfig, QuantizationParams, Q_MAX, Q_MIN};

/// Fraction of the real span added on each side of the staircase window
pub const WINDOW_PADDING: f64 = 0.1;

/// Default half-width of the neighborhood view, in quantization steps
pub const NEIGHBORHOOD_RADIUS_STEPS: f64 = 1.5;

/// One integer code and the real interval that rounds onto it
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bucket {
    pub code: i32,
    /// `scale * (code - 0.5 - zero_point)`
    pub lower: f64,
    /// `scale * (code + 0.5 - zero_point)`
    pub upper: f64,
    /// Dequantized value of `code`
    pub level: f64,
}

impl Bucket {
    fn new(code: i32, params: &QuantizationParams) -> Self {
        let zp = params.zero_point as f64;
        let c = code as f64;
        Self {
            code,
            lower: params.scale * (c - 0.5 - zp),
            upper: params.scale * (c + 0.5 - zp),
            level: params.scale * (c - zp),
        }
    }

    #[inline]
    pub fn contains(&self, real: f64) -> bool {
        real >= self.lower && real < self.upper
    }
}

/// Staircase over a padded real window
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Staircase {
    pub window_min: f64,
    pub window_max: f64,
    pub buckets: Vec<Bucket>,
}

impl Staircase {
    /// Build the staircase for `config` padded by [`WINDOW_PADDING`]
    pub fn build(config: &QuantizationConfig, params: &QuantizationParams) -> Self {
        let padding = config.span() * WINDOW_PADDING;
        Self::over_window(config.real_min - padding, config.real_max + padding, params)
    }

    /// Build the staircase over an explicit `[lo, hi]` window
    ///
    /// Codes run from `floor(max(-128, lo/s + z))` to `ceil(min(127, hi/s + z))`.
    pub fn over_window(lo: f64, hi: f64, params: &QuantizationParams) -> Self {
        let mut staircase = Self {
            window_min: lo,
            window_max: hi,
            buckets: Vec::new(),
        };
        if !params.is_initialized() || !(lo < hi) {
            return staircase;
        }

        let zp = params.zero_point as f64;
        let start = (Q_MIN as f64).max(lo / params.scale + zp).floor() as i32;
        let end = (Q_MAX as f64).min(hi / params.scale + zp).ceil() as i32;

        staircase.buckets = (start..=end).map(|q| Bucket::new(q, params)).collect();
        staircase
    }

    /// Number of distinct output levels visible in the window
    pub fn len(&self) -> usize {
        self.buckets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buckets.is_empty()
    }
}

/// Buckets surrounding one input value, with its snap
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Neighborhood {
    pub real: f64,
    pub view_min: f64,
    pub view_max: f64,
    /// Code the input rounds to, without clamping
    pub snapped_code: i32,
    pub snapped_value: f64,
    /// `snapped_value - real`
    pub snap_error: f64,
    pub buckets: Vec<Bucket>,
}

impl Neighborhood {
    /// Buckets within `radius_steps * scale` of `real`, limited to the int8 grid
    pub fn around(real: f64, params: &QuantizationParams, radius_steps: f64) -> Self {
        if !params.is_initialized() || !real.is_finite() {
            return Self {
                real,
                view_min: real,
                view_max: real,
                snapped_code: 0,
                snapped_value: 0.0,
                snap_error: 0.0,
                buckets: Vec::new(),
            };
        }

        let zp = params.zero_point as f64;
        let radius = params.scale * radius_steps.abs();
        let view_min = real - radius;
        let view_max = real + radius;

        // Only codes on the int8 grid can appear
        let min_q = (Q_MIN as f64).max(view_min / params.scale + zp).floor() as i32;
        let max_q = (Q_MAX as f64).min(view_max / params.scale + zp).ceil() as i32;

        let snapped_code = round_half_up(real / params.scale + zp) as i32;
        let snapped_value = params.scale * (snapped_code as f64 - zp);

        Self {
            real,
            view_min,
            view_max,
            snapped_code,
            snapped_value,
            snap_error: snapped_value - real,
            buckets: (min_q..=max_q).map(|q| Bucket::new(q, params)).collect(),
        }
    }
}
