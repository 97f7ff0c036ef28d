//! Small fully connected network used by the graph view
//!
//! Layer sizes are fixed at `[3, 4, 4, 2]`. Edge weights and unit
//! importances come from closed-form trig hashes of the indices, so the
//! picture is identical on every render without any stored randomness.
//!
//! - Structured: a unit dies when its importance is not above the cut;
//!   input/output layers are protected; an edge dies with either endpoint.
//! - Unstructured: every unit stays; an edge dies when its weight is not
//!   above the cut.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use super::{check_sparsity, structured_mask, PruningMode, Unit};
use crate::error::LensResult;

/// Units per layer, input first
pub const DEMO_LAYERS: [usize; 4] = [3, 4, 4, 2];

/// Connection between two units of adjacent layers
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Edge {
    /// Position of the source unit in [`DemoNetwork::units`]
    pub source: usize,
    /// Position of the target unit in [`DemoNetwork::units`]
    pub target: usize,
    /// Pseudo-weight in [0, 1]
    pub weight: f64,
}

/// Which parts of the network survive one sparsity setting
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NetworkView {
    pub mode: PruningMode,
    pub sparsity_percent: f64,
    pub unit_active: Vec<bool>,
    pub edge_active: Vec<bool>,
}

impl NetworkView {
    pub fn active_units(&self) -> usize {
        self.unit_active.iter().filter(|&&a| a).count()
    }

    pub fn active_edges(&self) -> usize {
        self.edge_active.iter().filter(|&&a| a).count()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DemoNetwork {
    layers: Vec<usize>,
    units: Vec<Unit>,
    edges: Vec<Edge>,
}

impl Default for DemoNetwork {
    fn default() -> Self {
        Self::new(&DEMO_LAYERS)
    }
}

impl DemoNetwork {
    pub fn new(layers: &[usize]) -> Self {
        let mut units = Vec::new();
        for (layer, &count) in layers.iter().enumerate() {
            for index in 0..count {
                units.push(Unit {
                    layer,
                    index,
                    importance: unit_importance(layer, index),
                });
            }
        }

        let mut edges = Vec::new();
        for (source, s) in units.iter().enumerate() {
            for (target, t) in units.iter().enumerate() {
                if t.layer == s.layer + 1 {
                    edges.push(Edge {
                        source,
                        target,
                        weight: edge_weight(s.index, t.index),
                    });
                }
            }
        }

        Self {
            layers: layers.to_vec(),
            units,
            edges,
        }
    }

    pub fn units(&self) -> &[Unit] {
        &self.units
    }

    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    /// Input and output layers
    pub fn protected_layers(&self) -> BTreeSet<usize> {
        let mut set = BTreeSet::new();
        if !self.layers.is_empty() {
            set.insert(0);
            set.insert(self.layers.len() - 1);
        }
        set
    }

    /// Apply one pruning mode at `sparsity_percent`
    pub fn view(&self, mode: PruningMode, sparsity_percent: f64) -> LensResult<NetworkView> {
        check_sparsity(sparsity_percent)?;
        let cut = sparsity_percent / 100.0;

        let unit_active = match mode {
            PruningMode::Structured => {
                structured_mask(&self.units, sparsity_percent, &self.protected_layers())?
            }
            PruningMode::Unstructured => vec![true; self.units.len()],
        };

        let edge_active = self
            .edges
            .iter()
            .map(|e| {
                let endpoints = unit_active[e.source] && unit_active[e.target];
                match mode {
                    PruningMode::Structured => endpoints,
                    PruningMode::Unstructured => endpoints && e.weight > cut,
                }
            })
            .collect();

        Ok(NetworkView {
            mode,
            sparsity_percent,
            unit_active,
            edge_active,
        })
    }
}

/// `(cos(11 * index + 7 * layer) + 1) / 2`
pub fn unit_importance(layer: usize, index: usize) -> f64 {
    (((index * 11 + layer * 7) as f64).cos() + 1.0) / 2.0
}

/// `(sin(7 * source_index + 13 * target_index) + 1) / 2`
pub fn edge_weight(source_index: usize, target_index: usize) -> f64 {
    (((source_index * 7 + target_index * 13) as f64).sin() + 1.0) / 2.0
}
