//! # Knowledge Distillation
//!
//! Temperature-scaled softmax ("melting" a teacher's confident answer into
//! soft targets) and the blended distillation loss a student trains on.
//!
//! ```text
//!   logits ──► ÷ T ──► softmax ──► p_i (%)
//!                                   │
//!      T = 1  : [98.2, 1.8, ...]    │  confident
//!      T = 20 : [33.8, 27.6, ...]   ▼  dark knowledge visible
//! ```

pub mod loss;

pub use loss::DistillationLoss;

use serde::{Deserialize, Serialize};

use crate::error::{LensError, LensResult};

/// Lowest temperature the explainer's slider allows
pub const TEMPERATURE_MIN: f64 = 1.0;

/// Highest temperature the explainer's slider allows
pub const TEMPERATURE_MAX: f64 = 20.0;

/// One class and its raw score
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassScore {
    pub label: String,
    pub logit: f64,
}

impl ClassScore {
    pub fn new(label: impl Into<String>, logit: f64) -> Self {
        Self {
            label: label.into(),
            logit,
        }
    }
}

/// The teacher's scores for a photo of a golden retriever
pub fn default_scores() -> Vec<ClassScore> {
    vec![
        ClassScore::new("Golden Retriever", 10.0),
        ClassScore::new("Tennis Ball", 6.0),
        ClassScore::new("Tabby Cat", 2.0),
        ClassScore::new("Sports Car", -5.0),
    ]
}

/// Percent probabilities, index-aligned with the input scores
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TemperatureDistribution {
    pub temperature: f64,
    pub percentages: Vec<f64>,
}

impl TemperatureDistribution {
    pub fn len(&self) -> usize {
        self.percentages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.percentages.is_empty()
    }

    /// Index of the most likely class (first one on ties)
    pub fn argmax(&self) -> Option<usize> {
        let mut best: Option<(usize, f64)> = None;
        for (i, &p) in self.percentages.iter().enumerate() {
            match best {
                Some((_, b)) if p <= b => {}
                _ => best = Some((i, p)),
            }
        }
        best.map(|(i, _)| i)
    }

    /// Shannon entropy in bits; 0 for a one-hot answer, log2(N) for uniform
    pub fn entropy_bits(&self) -> f64 {
        self.percentages
            .iter()
            .map(|&p| p / 100.0)
            .filter(|&p| p > 0.0)
            .map(|p| -p * p.log2())
            .sum()
    }
}

fn check_temperature(temperature: f64) -> LensResult<()> {
    if !temperature.is_finite() || temperature <= 0.0 {
        return Err(LensError::invalid(
            "temperature",
            format!("must be a finite value > 0, got {}", temperature),
        ));
    }
    Ok(())
}

/// Softmax of `logits / temperature` as fractions in [0, 1]
///
/// The max logit is subtracted before exponentiating, so large logits
/// cannot overflow.
pub fn softmax_with_temperature(logits: &[f64], temperature: f64) -> LensResult<Vec<f64>> {
    check_temperature(temperature)?;
    if logits.is_empty() {
        return Err(LensError::invalid("scores", "at least one class is required"));
    }
    if let Some(bad) = logits.iter().find(|l| !l.is_finite()) {
        return Err(LensError::invalid(
            "scores",
            format!("logits must be finite, got {}", bad),
        ));
    }

    // Find max for numerical stability
    let max_logit = logits.iter().copied().fold(f64::NEG_INFINITY, f64::max);

    let exp_vals: Vec<f64> = logits
        .iter()
        .map(|&l| ((l - max_logit) / temperature).exp())
        .collect();
    let sum: f64 = exp_vals.iter().sum();

    Ok(exp_vals.into_iter().map(|e| e / sum).collect())
}

/// Temperature-scaled distribution over `scores`, in percent
///
/// `p_i = 100 * exp(l_i / T) / Σ exp(l_j / T)`
pub fn distribution(scores: &[ClassScore], temperature: f64) -> LensResult<TemperatureDistribution> {
    let logits: Vec<f64> = scores.iter().map(|s| s.logit).collect();
    let fractions = softmax_with_temperature(&logits, temperature)?;

    Ok(TemperatureDistribution {
        temperature,
        percentages: fractions.into_iter().map(|p| p * 100.0).collect(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sum_is_100() {
        for t in [1.0, 1.5, 4.0, 20.0, 1000.0] {
            let d = distribution(&default_scores(), t).unwrap();
            let sum: f64 = d.percentages.iter().sum();
            assert!((sum - 100.0).abs() < 1e-6, "T={} sum={}", t, sum);
        }
    }

    #[test]
    fn test_invalid_temperature() {
        for t in [0.0, -1.0, f64::NAN, f64::INFINITY] {
            assert!(matches!(
                distribution(&default_scores(), t),
                Err(LensError::InvalidParameter { name: "temperature", .. })
            ));
        }
    }

    #[test]
    fn test_empty_scores_rejected() {
        assert!(distribution(&[], 1.0).is_err());
    }

    #[test]
    fn test_large_logits_do_not_overflow() {
        let scores = vec![ClassScore::new("a", 1000.0), ClassScore::new("b", 999.0)];
        let d = distribution(&scores, 1.0).unwrap();
        assert!(d.percentages.iter().all(|p| p.is_finite()));
        assert!(d.percentages[0] > d.percentages[1]);
    }

    #[test]
    fn test_high_temperature_tends_to_uniform() {
        let d = distribution(&default_scores(), 1e6).unwrap();
        for p in &d.percentages {
            assert!((p - 25.0).abs() < 1e-2);
        }
        assert!((d.entropy_bits() - 2.0).abs() < 1e-6);
    }

    #[test]
    fn test_low_temperature_concentrates() {
        let d = distribution(&default_scores(), 1.0).unwrap();
        assert_eq!(d.argmax(), Some(0));
        assert!(d.percentages[0] > 98.0);
    }
}
