//! # Accuracy / Speed Trade-off
//!
//! Illustrative analytic curves, not measurements. They show that
//! unstructured pruning keeps accuracy longer but buys no speed on dense
//! hardware, while structured pruning shrinks the matrices (and the accuracy)
//! right away.
//!
//! | Mode | Accuracy retention | Speedup |
//! |------|--------------------|---------|
//! | Unstructured | 100 until x = 0.6, then `100·(1 − ((x − 0.6)/0.4)²)` | 1 |
//! | Structured | 100 until x = 0.1, then `100 − (x − 0.1)·120` | `min(10, k / (1 − x + 0.05))` |
//!
//! `k` is 1.5 on an accelerator profile and 1 otherwise.

use serde::{Deserialize, Serialize};

use crate::error::{LensError, LensResult};
use crate::prune::PruningMode;

/// Upper bound of the speedup axis
pub const MAX_SPEEDUP: f64 = 10.0;

/// Sample count the explainer uses for its curves
pub const DEFAULT_CURVE_SAMPLES: usize = 100;

/// Target hardware for the speedup estimate
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HardwareProfile {
    /// General-purpose CPU
    Standard,
    /// NPU / dense accelerator that benefits more from smaller blocks
    Accelerator,
}

impl HardwareProfile {
    fn speedup_factor(&self) -> f64 {
        match self {
            HardwareProfile::Standard => 1.0,
            HardwareProfile::Accelerator => 1.5,
        }
    }
}

impl std::str::FromStr for HardwareProfile {
    type Err = LensError;

    fn from_str(s: &str) -> LensResult<Self> {
        match s.to_lowercase().as_str() {
            "standard" | "cpu" => Ok(HardwareProfile::Standard),
            "accelerator" | "npu" => Ok(HardwareProfile::Accelerator),
            other => Err(LensError::invalid(
                "hardware",
                format!("unknown profile '{}'", other),
            )),
        }
    }
}

fn check_fraction(sparsity_fraction: f64) -> LensResult<()> {
    if !(0.0..=1.0).contains(&sparsity_fraction) {
        return Err(LensError::invalid(
            "sparsity",
            format!("fraction must be within [0, 1], got {}", sparsity_fraction),
        ));
    }
    Ok(())
}

/// Projected accuracy retention in percent
pub fn accuracy_retention(sparsity_fraction: f64, mode: PruningMode) -> LensResult<f64> {
    check_fraction(sparsity_fraction)?;
    let x = sparsity_fraction;

    let acc = match mode {
        PruningMode::Unstructured => {
            if x < 0.6 {
                100.0
            } else {
                100.0 * (1.0 - ((x - 0.6) / 0.4).powi(2))
            }
        }
        PruningMode::Structured => {
            if x < 0.1 {
                100.0
            } else {
                100.0 - (x - 0.1) * 120.0
            }
        }
    };

    Ok(acc.max(0.0))
}

/// Projected inference speedup, capped at [`MAX_SPEEDUP`]
pub fn speedup(sparsity_fraction: f64, mode: PruningMode, hardware: HardwareProfile) -> LensResult<f64> {
    check_fraction(sparsity_fraction)?;

    Ok(match mode {
        // Sparse indexing overhead eats the savings
        PruningMode::Unstructured => 1.0,
        PruningMode::Structured => {
            let base = 1.0 / (1.0 - sparsity_fraction + 0.05);
            (base * hardware.speedup_factor()).min(MAX_SPEEDUP)
        }
    })
}

/// One point of the sampled trade-off curves
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CurvePoint {
    pub sparsity: f64,
    pub accuracy: f64,
    pub speedup: f64,
}

/// Both curves evaluated at `i / samples` for `i = 0..=samples`
pub fn sample_curve(
    mode: PruningMode,
    hardware: HardwareProfile,
    samples: usize,
) -> LensResult<Vec<CurvePoint>> {
    if samples == 0 {
        return Err(LensError::invalid("samples", "at least one interval is required"));
    }

    (0..=samples)
        .map(|i| {
            let x = i as f64 / samples as f64;
            Ok(CurvePoint {
                sparsity: x,
                accuracy: accuracy_retention(x, mode)?,
                speedup: speedup(x, mode, hardware)?,
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f64 = 1e-9;

    #[test]
    fn test_unstructured_accuracy() {
        assert_eq!(accuracy_retention(0.0, PruningMode::Unstructured).unwrap(), 100.0);
        assert_eq!(accuracy_retention(0.59, PruningMode::Unstructured).unwrap(), 100.0);
        let mid = accuracy_retention(0.8, PruningMode::Unstructured).unwrap();
        assert!((mid - 75.0).abs() < EPS);
        assert!(accuracy_retention(1.0, PruningMode::Unstructured).unwrap().abs() < EPS);
    }

    #[test]
    fn test_structured_accuracy() {
        assert_eq!(accuracy_retention(0.05, PruningMode::Structured).unwrap(), 100.0);
        let a = accuracy_retention(0.5, PruningMode::Structured).unwrap();
        assert!((a - 52.0).abs() < EPS);
        // 100 - 0.9 * 120 < 0
        assert_eq!(accuracy_retention(1.0, PruningMode::Structured).unwrap(), 0.0);
    }

    #[test]
    fn test_unstructured_speedup_is_flat() {
        for hw in [HardwareProfile::Standard, HardwareProfile::Accelerator] {
            for x in [0.0, 0.5, 0.99] {
                assert_eq!(speedup(x, PruningMode::Unstructured, hw).unwrap(), 1.0);
            }
        }
    }

    #[test]
    fn test_structured_speedup() {
        let s = speedup(0.5, PruningMode::Structured, HardwareProfile::Standard).unwrap();
        assert!((s - 1.0 / 0.55).abs() < EPS);
        let a = speedup(0.5, PruningMode::Structured, HardwareProfile::Accelerator).unwrap();
        assert!((a - 1.5 / 0.55).abs() < EPS);
        let capped = speedup(1.0, PruningMode::Structured, HardwareProfile::Accelerator).unwrap();
        assert_eq!(capped, MAX_SPEEDUP);
    }

    #[test]
    fn test_out_of_range() {
        assert!(accuracy_retention(1.2, PruningMode::Structured).is_err());
        assert!(speedup(-0.1, PruningMode::Structured, HardwareProfile::Standard).is_err());
        assert!(speedup(f64::NAN, PruningMode::Unstructured, HardwareProfile::Standard).is_err());
    }

    #[test]
    fn test_sample_curve() {
        let pts = sample_curve(PruningMode::Structured, HardwareProfile::Standard, DEFAULT_CURVE_SAMPLES)
            .unwrap();
        assert_eq!(pts.len(), 101);
        assert_eq!(pts[0].sparsity, 0.0);
        assert_eq!(pts[100].sparsity, 1.0);
        assert!(pts.windows(2).all(|w| w[1].speedup >= w[0].speedup));
        assert!(sample_curve(PruningMode::Structured, HardwareProfile::Standard, 0).is_err());
    }

    #[test]
    fn test_profile_parse() {
        assert_eq!("npu".parse::<HardwareProfile>().unwrap(), HardwareProfile::Accelerator);
        assert_eq!("CPU".parse::<HardwareProfile>().unwrap(), HardwareProfile::Standard);
        assert!("tpu-ish".parse::<HardwareProfile>().is_err());
    }
}
