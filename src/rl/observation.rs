// src/rl/observation.rs
//
// Flat observation vector over the static catalog.
//
// Layout: three K x N matrices flattened row-major (key slow axis, node
// fast axis) and concatenated in a fixed order:
//   [presence | log1p(readCount) | log1p(writeCount)]
// Catalog slots with no live data stay zero; snapshot names outside the
// catalog are ignored.

use crate::config::CatalogConfig;
use crate::state::ClusterSnapshot;

/// Current observation schema version.
/// Increment when changing the layout or feature transforms.
pub const OBS_VERSION: u32 = 1;

/// Number of stacked K x N feature planes.
const PLANES: usize = 3;

/// Encoder over a fixed, externally known key/node catalog.
///
/// Deterministic and pure: identical snapshots always yield identical
/// vectors, and the output shape never depends on the snapshot.
#[derive(Debug, Clone)]
pub struct VectorEncoder {
    catalog: CatalogConfig,
}

impl VectorEncoder {
    pub fn new(catalog: CatalogConfig) -> Self {
        Self { catalog }
    }

    pub fn catalog(&self) -> &CatalogConfig {
        &self.catalog
    }

    /// Fixed output length: 3 * K * N.
    pub fn obs_dim(&self) -> usize {
        PLANES * self.catalog.num_keys() * self.catalog.num_nodes()
    }

    pub fn encode(&self, snapshot: &ClusterSnapshot) -> Vec<f32> {
        let num_nodes = self.catalog.num_nodes();
        let stride = self.catalog.num_keys() * num_nodes;
        let mut out = vec![0.0_f32; PLANES * stride];

        for report in &snapshot.nodes {
            let Some(node_index) = self.catalog.node_index(&report.node_id) else {
                continue;
            };
            for (key, metric) in &report.key_metrics {
                let Some(key_index) = self.catalog.key_index(key) else {
                    continue;
                };
                let p = key_index * num_nodes + node_index;
                out[p] = 1.0;
                out[stride + p] = log1p_count(metric.read_count);
                out[2 * stride + p] = log1p_count(metric.write_count);
            }
        }

        out
    }
}

pub(crate) fn log1p_count(count: u64) -> f32 {
    (count as f64).ln_1p() as f32
}
