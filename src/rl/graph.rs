// src/rl/graph.rs
//
// Bipartite key/server graph encoding with static capacity padding.
//
// Index spaces are per-tick: keys come from the registry (distinct
// names, lexicographic), servers from node report order. Neither is
// stable across ticks, so the observation carries the names alongside
// the buffers and action slots are resolved against them fresh each
// tick.

use crate::actions::{ActionSlot, ReplicationCommand};
use crate::config::GraphConfig;
use crate::state::ClusterSnapshot;

use super::observation::log1p_count;

/// Features per key row: [log1p(global reads), log1p(global writes), size].
pub const KEY_FEATURES: usize = 3;
/// Features per server row: [storage cost, capacity].
pub const SERVER_FEATURES: usize = 2;
/// Features per edge: [log1p(local reads), presence indicator].
pub const EDGE_FEATURES: usize = 2;

/// Endpoint sentinel for padded edge slots, distinguishing "no edge"
/// from a valid index 0.
pub const EDGE_PAD: i64 = -1;

// Constant feature placeholders carried by every live row.
const KEY_SIZE_FEATURE: f32 = 1.0;
const SERVER_CAPACITY_FEATURE: f32 = 0.5;

/// Padded graph buffers plus the live counts a consumer needs to
/// recover the valid prefix of each buffer.
#[derive(Debug, Clone, PartialEq)]
pub struct GraphObservation {
    /// MAX_KEYS rows of KEY_FEATURES, row-major, zero past live_keys.
    pub key_features: Vec<f32>,
    /// MAX_SERVERS rows of SERVER_FEATURES, zero past live_servers.
    pub server_features: Vec<f32>,
    /// Edge source key indices, EDGE_PAD past live_edges.
    pub edge_sources: Vec<i64>,
    /// Edge target server indices, EDGE_PAD past live_edges.
    pub edge_targets: Vec<i64>,
    /// MAX_EDGES rows of EDGE_FEATURES, zero past live_edges.
    pub edge_features: Vec<f32>,
    pub live_keys: usize,
    pub live_servers: usize,
    pub live_edges: usize,
    /// Kept registry prefix; the key index space for this tick.
    pub key_names: Vec<String>,
    /// Kept node ids in report order; the server index space for this tick.
    pub server_ids: Vec<String>,
}

impl GraphObservation {
    /// Resolve a decoded slot against this tick's index spaces. Slots
    /// pointing past the live entities yield no command.
    pub fn resolve(&self, slot: ActionSlot) -> Option<ReplicationCommand> {
        let key = self.key_names.get(slot.key_index)?;
        let target_node = self.server_ids.get(slot.node_index)?;
        Some(ReplicationCommand {
            action_type: slot.kind,
            key: key.clone(),
            target_node: target_node.clone(),
        })
    }

    pub fn key_row(&self, index: usize) -> &[f32] {
        let start = index * KEY_FEATURES;
        &self.key_features[start..start + KEY_FEATURES]
    }

    pub fn server_row(&self, index: usize) -> &[f32] {
        let start = index * SERVER_FEATURES;
        &self.server_features[start..start + SERVER_FEATURES]
    }

    pub fn edge_row(&self, index: usize) -> &[f32] {
        let start = index * EDGE_FEATURES;
        &self.edge_features[start..start + EDGE_FEATURES]
    }
}

/// Encoder producing fixed-capacity padded graph buffers.
#[derive(Debug, Clone, Copy)]
pub struct GraphEncoder {
    caps: GraphConfig,
}

impl GraphEncoder {
    pub fn new(caps: GraphConfig) -> Self {
        Self { caps }
    }

    pub fn capacities(&self) -> GraphConfig {
        self.caps
    }

    /// Encode one snapshot. Deterministic; the output shape depends only
    /// on the configured capacities.
    ///
    /// Live counts above capacity are truncated deterministically and
    /// lossily: lexicographically-first keys win, earliest node reports
    /// win, and edges are kept in (report order, key order) up to the
    /// edge capacity. The reported live counts are the kept counts.
    pub fn encode(&self, snapshot: &ClusterSnapshot) -> GraphObservation {
        let max_keys = self.caps.max_keys;
        let max_servers = self.caps.max_servers;
        let max_edges = self.caps.max_edges();

        let registry = snapshot.key_registry();
        let live_keys = registry.len().min(max_keys);
        let key_names: Vec<String> = registry.names()[..live_keys].to_vec();

        let live_servers = snapshot.num_nodes().min(max_servers);
        let kept_reports = &snapshot.nodes[..live_servers];
        let server_ids: Vec<String> = kept_reports.iter().map(|n| n.node_id.clone()).collect();

        // Key rows aggregate reads/writes across every node reporting
        // the key, including reports past the server capacity.
        let mut key_features = vec![0.0_f32; max_keys * KEY_FEATURES];
        {
            let mut reads = vec![0_u64; live_keys];
            let mut writes = vec![0_u64; live_keys];
            for report in &snapshot.nodes {
                for (key, metric) in &report.key_metrics {
                    if let Some(key_index) = index_of(&key_names, key) {
                        reads[key_index] += metric.read_count;
                        writes[key_index] += metric.write_count;
                    }
                }
            }
            for key_index in 0..live_keys {
                let row = key_index * KEY_FEATURES;
                key_features[row] = log1p_count(reads[key_index]);
                key_features[row + 1] = log1p_count(writes[key_index]);
                key_features[row + 2] = KEY_SIZE_FEATURE;
            }
        }

        let mut server_features = vec![0.0_f32; max_servers * SERVER_FEATURES];
        for (server_index, report) in kept_reports.iter().enumerate() {
            let row = server_index * SERVER_FEATURES;
            server_features[row] = report.storage_cost as f32;
            server_features[row + 1] = SERVER_CAPACITY_FEATURE;
        }

        // One directed key -> server edge per kept metrics entry.
        let mut edge_sources = vec![EDGE_PAD; max_edges];
        let mut edge_targets = vec![EDGE_PAD; max_edges];
        let mut edge_features = vec![0.0_f32; max_edges * EDGE_FEATURES];
        let mut live_edges = 0;
        'edges: for (server_index, report) in kept_reports.iter().enumerate() {
            for (key, metric) in &report.key_metrics {
                let Some(key_index) = index_of(&key_names, key) else {
                    continue;
                };
                if live_edges == max_edges {
                    break 'edges;
                }
                edge_sources[live_edges] = key_index as i64;
                edge_targets[live_edges] = server_index as i64;
                let row = live_edges * EDGE_FEATURES;
                edge_features[row] = log1p_count(metric.read_count);
                edge_features[row + 1] = 1.0;
                live_edges += 1;
            }
        }

        GraphObservation {
            key_features,
            server_features,
            edge_sources,
            edge_targets,
            edge_features,
            live_keys,
            live_servers,
            live_edges,
            key_names,
            server_ids,
        }
    }
}

fn index_of(sorted_names: &[String], name: &str) -> Option<usize> {
    sorted_names
        .binary_search_by(|n| n.as_str().cmp(name))
        .ok()
}
