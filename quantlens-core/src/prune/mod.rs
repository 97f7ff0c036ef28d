//! # Pruning Masks
//!
//! Decide which weights (unstructured) or which units (structured) survive a
//! target sparsity.
//!
//! ## Functions
//!
//! | Function | Description |
//! |----------|-------------|
//! | `compute_threshold` | Magnitude cutoff for a sparsity percentage |
//! | `unstructured_mask` | keep_i = \|w_i\| >= threshold |
//! | `prune_unstructured` | Threshold + mask in one call |
//! | `structured_mask` | Unit-level keep mask with protected layers |
//! | `achieved_sparsity` | Percentage of pruned entries in a mask |
//!
//! Mask computation has no randomness; the same inputs always give
//! bit-identical results.

pub mod network;
pub mod weights;

pub use network::{DemoNetwork, Edge, NetworkView, DEMO_LAYERS};
pub use weights::WeightSet;

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::error::{LensError, LensResult};

/// Pruning granularity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PruningMode {
    /// Individual weights are removed
    Unstructured,
    /// Whole neurons / channels are removed
    Structured,
}

impl std::fmt::Display for PruningMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PruningMode::Unstructured => write!(f, "unstructured"),
            PruningMode::Structured => write!(f, "structured"),
        }
    }
}

/// Threshold and the keep mask it produces
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PruningResult {
    pub threshold: f64,
    pub keep_mask: Vec<bool>,
}

impl PruningResult {
    pub fn kept(&self) -> usize {
        self.keep_mask.iter().filter(|&&k| k).count()
    }

    pub fn pruned(&self) -> usize {
        self.keep_mask.len() - self.kept()
    }
}

/// A prunable unit with an importance score in [0, 1]
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Unit {
    pub layer: usize,
    pub index: usize,
    pub importance: f64,
}

pub(crate) fn check_sparsity(sparsity_percent: f64) -> LensResult<()> {
    if !(0.0..=100.0).contains(&sparsity_percent) {
        return Err(LensError::invalid(
            "sparsity",
            format!("must be within [0, 100], got {}", sparsity_percent),
        ));
    }
    Ok(())
}

/// Magnitude threshold that prunes `sparsity_percent` of `weights`
///
/// Sorts `|w|` ascending and takes the element at
/// `floor(sparsity / 100 * n)`, clamped to the last position.
/// Returns `0` at 0% (nothing pruned) and `+∞` at 100% (everything pruned).
pub fn compute_threshold(weights: &[f64], sparsity_percent: f64) -> LensResult<f64> {
    check_sparsity(sparsity_percent)?;

    if sparsity_percent == 0.0 || weights.is_empty() {
        return Ok(0.0);
    }
    if sparsity_percent == 100.0 {
        return Ok(f64::INFINITY);
    }

    let mut sorted_abs: Vec<f64> = weights.iter().map(|w| w.abs()).collect();
    sorted_abs.sort_by(f64::total_cmp);

    let cutoff = ((sparsity_percent / 100.0) * sorted_abs.len() as f64).floor() as usize;
    let index = cutoff.min(sorted_abs.len() - 1);
    Ok(sorted_abs[index])
}

/// `keep_i = |w_i| >= threshold`
pub fn unstructured_mask(weights: &[f64], threshold: f64) -> Vec<bool> {
    weights.iter().map(|w| w.abs() >= threshold).collect()
}

/// Threshold and mask for magnitude pruning at `sparsity_percent`
pub fn prune_unstructured(weights: &[f64], sparsity_percent: f64) -> LensResult<PruningResult> {
    let threshold = compute_threshold(weights, sparsity_percent)?;
    Ok(PruningResult {
        threshold,
        keep_mask: unstructured_mask(weights, threshold),
    })
}

/// Unit-level mask
///
/// Units in `protected_layers` are always kept; the rest survive when
/// `importance > sparsity / 100`.
pub fn structured_mask(
    units: &[Unit],
    sparsity_percent: f64,
    protected_layers: &BTreeSet<usize>,
) -> LensResult<Vec<bool>> {
    check_sparsity(sparsity_percent)?;
    let cut = sparsity_percent / 100.0;

    Ok(units
        .iter()
        .map(|u| protected_layers.contains(&u.layer) || u.importance > cut)
        .collect())
}

/// Percentage of `false` entries in a keep mask
pub fn achieved_sparsity(keep_mask: &[bool]) -> f64 {
    if keep_mask.is_empty() {
        return 0.0;
    }
    let pruned = keep_mask.iter().filter(|&&k| !k).count();
    pruned as f64 / keep_mask.len() as f64 * 100.0
}
