//! Distillation loss
//!
//! ```text
//! L = α · T² · KL(softmax(teacher/T) ‖ softmax(student/T))
//!   + (1 − α) · CE(softmax(student), label)
//! ```

use serde::{Deserialize, Serialize};

use super::{check_temperature, softmax_with_temperature};
use crate::error::{LensError, LensResult};

const EPSILON: f64 = 1e-10;

/// Blend of soft-target and hard-label losses
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DistillationLoss {
    pub temperature: f64,
    /// Weight of the soft (teacher) term; the hard term gets `1 - alpha`
    pub alpha: f64,
}

impl DistillationLoss {
    pub fn new(temperature: f64, alpha: f64) -> LensResult<Self> {
        check_temperature(temperature)?;
        if !(0.0..=1.0).contains(&alpha) {
            return Err(LensError::invalid(
                "alpha",
                format!("must be in [0, 1], got {}", alpha),
            ));
        }
        Ok(Self { temperature, alpha })
    }

    /// KL divergence between the softened teacher and student distributions
    pub fn soft_loss(&self, student: &[f64], teacher: &[f64]) -> LensResult<f64> {
        check_lengths(student, teacher)?;
        let p = softmax_with_temperature(teacher, self.temperature)?;
        let q = softmax_with_temperature(student, self.temperature)?;
        Ok(kl_divergence(&p, &q))
    }

    /// Cross-entropy of the student's plain (T = 1) prediction
    pub fn hard_loss(&self, student: &[f64], label: usize) -> LensResult<f64> {
        if label >= student.len() {
            return Err(LensError::invalid(
                "label",
                format!("class {} out of range for {} classes", label, student.len()),
            ));
        }
        let probs = softmax_with_temperature(student, 1.0)?;
        Ok(-probs[label].max(EPSILON).ln())
    }

    /// Combined loss; the soft term is scaled by T² to keep gradient
    /// magnitudes comparable across temperatures
    pub fn forward(&self, student: &[f64], teacher: &[f64], label: usize) -> LensResult<f64> {
        let soft = self.soft_loss(student, teacher)?;
        let hard = self.hard_loss(student, label)?;
        let t2 = self.temperature * self.temperature;
        Ok(self.alpha * t2 * soft + (1.0 - self.alpha) * hard)
    }
}

fn check_lengths(student: &[f64], teacher: &[f64]) -> LensResult<()> {
    if student.len() != teacher.len() {
        return Err(LensError::LengthMismatch {
            expected: teacher.len(),
            actual: student.len(),
        });
    }
    Ok(())
}

/// Kullback-Leibler divergence: Σ P * log(P/Q)
pub fn kl_divergence(p: &[f64], q: &[f64]) -> f64 {
    p.iter()
        .zip(q)
        .map(|(&p_val, &q_val)| {
            let p_val = p_val.max(EPSILON);
            let q_val = q_val.max(EPSILON);
            p_val * (p_val / q_val).ln()
        })
        .sum()
}
