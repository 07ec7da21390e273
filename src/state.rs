// src/state.rs
//
// Cluster telemetry snapshot model plus the per-tick entities derived
// from it (key registry, presence map).
//
// A snapshot is one polled view of the replication cluster. It is
// immutable once fetched; every decision/evaluation tick fetches a fresh
// snapshot that fully supersedes the prior one. The derived registry and
// presence map are recomputed from scratch each tick and their indices
// are valid only for the snapshot that produced them.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

/// Read/write counters reported for one key on one node.
///
/// Missing counters on the wire default to zero.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyMetric {
    #[serde(rename = "readCount", default)]
    pub read_count: u64,
    #[serde(rename = "writeCount", default)]
    pub write_count: u64,
}

/// One node's telemetry within a snapshot.
///
/// Presence is operational: a key appears in `key_metrics` iff this node
/// currently holds a replica of it and has accumulated metrics for it
/// (possibly zero counts). There is no separate replication-table field;
/// the encoder, mask, and estimator all derive placement from this map.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NodeReport {
    #[serde(rename = "nodeId", default)]
    pub node_id: String,
    #[serde(rename = "storageCost", default)]
    pub storage_cost: f64,
    /// BTreeMap so iteration order is the key name order, which keeps
    /// every derived structure deterministic for a given snapshot.
    #[serde(rename = "keyMetrics", default)]
    pub key_metrics: BTreeMap<String, KeyMetric>,
}

/// One polled view of cluster/replication state.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ClusterSnapshot {
    pub nodes: Vec<NodeReport>,
}

impl ClusterSnapshot {
    /// The degenerate snapshot used when the controller is unreachable or
    /// returned nothing usable.
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn num_nodes(&self) -> usize {
        self.nodes.len()
    }

    /// Node ids in report order. This is the per-tick server index space
    /// for the graph encoding scheme.
    pub fn node_ids(&self) -> Vec<String> {
        self.nodes.iter().map(|n| n.node_id.clone()).collect()
    }

    /// Derive the per-tick presence map (key name -> reporting node ids).
    pub fn presence_map(&self) -> PresenceMap {
        PresenceMap::from_snapshot(self)
    }

    /// Derive the per-tick key registry (distinct key names, sorted).
    pub fn key_registry(&self) -> KeyRegistry {
        KeyRegistry::from_snapshot(self)
    }
}

/// Per-tick mapping from key name to the set of node ids currently
/// reporting that key.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PresenceMap {
    inner: BTreeMap<String, BTreeSet<String>>,
}

impl PresenceMap {
    pub fn from_snapshot(snapshot: &ClusterSnapshot) -> Self {
        let mut inner: BTreeMap<String, BTreeSet<String>> = BTreeMap::new();
        for report in &snapshot.nodes {
            for key in report.key_metrics.keys() {
                inner
                    .entry(key.clone())
                    .or_default()
                    .insert(report.node_id.clone());
            }
        }
        Self { inner }
    }

    /// True iff `node_id` currently reports a metrics entry for `key`.
    pub fn contains(&self, key: &str, node_id: &str) -> bool {
        self.inner
            .get(key)
            .map(|nodes| nodes.contains(node_id))
            .unwrap_or(false)
    }

    pub fn nodes_for(&self, key: &str) -> Option<&BTreeSet<String>> {
        self.inner.get(key)
    }

    pub fn num_keys(&self) -> usize {
        self.inner.len()
    }
}

/// Per-tick sorted list of distinct key names seen across all node
/// reports. Used as the key index space by the graph encoding scheme.
///
/// The mapping name -> index is reproducible within a tick but is not
/// stable across ticks if the key set changes. Consumers must carry key
/// names across ticks and re-resolve indices against a fresh registry.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct KeyRegistry {
    names: Vec<String>,
}

impl KeyRegistry {
    pub fn from_snapshot(snapshot: &ClusterSnapshot) -> Self {
        let mut set: BTreeSet<&str> = BTreeSet::new();
        for report in &snapshot.nodes {
            for key in report.key_metrics.keys() {
                set.insert(key);
            }
        }
        Self {
            names: set.into_iter().map(String::from).collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// Lexicographically ordered key names.
    pub fn names(&self) -> &[String] {
        &self.names
    }

    pub fn name(&self, index: usize) -> Option<&str> {
        self.names.get(index).map(String::as_str)
    }

    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.names.binary_search_by(|n| n.as_str().cmp(name)).ok()
    }
}
