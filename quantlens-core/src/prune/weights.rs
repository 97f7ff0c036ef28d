//! Seeded weight matrix
//!
//! Generated once per session and never touched again: moving the sparsity
//! slider only changes the threshold and mask computed from it.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

use super::{prune_unstructured, PruningResult};
use crate::error::LensResult;

/// Immutable weights in [-1, 1)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeightSet {
    seed: u64,
    weights: Vec<f64>,
}

impl WeightSet {
    /// `len` uniform weights in [-1, 1) drawn from `seed`
    pub fn generate(seed: u64, len: usize) -> Self {
        let mut rng = StdRng::seed_from_u64(seed);
        let weights: Vec<f64> = (0..len).map(|_| rng.gen_range(-1.0..1.0)).collect();
        Self { seed, weights }
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    pub fn as_slice(&self) -> &[f64] {
        &self.weights
    }

    pub fn len(&self) -> usize {
        self.weights.len()
    }

    pub fn is_empty(&self) -> bool {
        self.weights.is_empty()
    }

    /// Magnitude pruning of this set at `sparsity_percent`
    pub fn prune(&self, sparsity_percent: f64) -> LensResult<PruningResult> {
        prune_unstructured(&self.weights, sparsity_percent)
    }

    /// Rows of a `cols`-wide grid; the last row may be short
    pub fn rows(&self, cols: usize) -> impl Iterator<Item = &[f64]> {
        self.weights.chunks(cols.max(1))
    }
}
