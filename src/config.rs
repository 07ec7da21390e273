// src/config.rs
//
// Central configuration for the repliq decision layer.
// This is the single source of truth for the static key/node catalog,
// graph capacity bounds, the latency model, and controller endpoint
// settings. Components receive these as explicit values; there is no
// module-level shared ordering state.

use std::env;

use crate::actions::{ActionSlot, ReplicationCommand};

#[derive(Debug, Clone)]
pub struct Config {
    /// Human-readable config / release version.
    pub version: &'static str,
    /// Static key/node name catalog used by the vector encoding scheme.
    pub catalog: CatalogConfig,
    /// Capacity bounds for the padded graph encoding scheme.
    pub graph: GraphConfig,
    /// Latency model constants for the cost/latency estimator.
    pub latency: LatencyConfig,
    /// Controller endpoint and polling cadence.
    pub controller: ControllerConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            version: "repliq-0.1.0",
            catalog: CatalogConfig::default(),
            graph: GraphConfig::default(),
            latency: LatencyConfig::default(),
            controller: ControllerConfig::default(),
        }
    }
}

/// Static, externally fixed key and node name lists.
///
/// The vector encoder and its action codec index into these lists; the
/// ordering here is the canonical ordering for that scheme. Names absent
/// from a snapshot are simply zero-filled slots, and snapshot names
/// absent from the catalog are ignored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogConfig {
    pub keys: Vec<String>,
    pub nodes: Vec<String>,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        // Cluster naming used by the workload deployment: twenty
        // user-profile keys over five regional replication nodes.
        let keys = (0..20).map(|i| format!("user_profile_{i}")).collect();
        let nodes = ["us", "eu", "ap", "sa", "jp"]
            .iter()
            .map(|region| format!("replication-{region}"))
            .collect();
        Self { keys, nodes }
    }
}

impl CatalogConfig {
    pub fn num_keys(&self) -> usize {
        self.keys.len()
    }

    pub fn num_nodes(&self) -> usize {
        self.nodes.len()
    }

    pub fn key_name(&self, index: usize) -> Option<&str> {
        self.keys.get(index).map(String::as_str)
    }

    pub fn node_name(&self, index: usize) -> Option<&str> {
        self.nodes.get(index).map(String::as_str)
    }

    pub fn key_index(&self, name: &str) -> Option<usize> {
        self.keys.iter().position(|k| k == name)
    }

    pub fn node_index(&self, name: &str) -> Option<usize> {
        self.nodes.iter().position(|n| n == name)
    }

    /// Resolve a decoded slot into a concrete command using the static
    /// catalog names. Slots outside the catalog resolve to None.
    pub fn resolve(&self, slot: ActionSlot) -> Option<ReplicationCommand> {
        let key = self.key_name(slot.key_index)?;
        let target_node = self.node_name(slot.node_index)?;
        Some(ReplicationCommand {
            action_type: slot.kind,
            key: key.to_string(),
            target_node: target_node.to_string(),
        })
    }
}

/// Capacity bounds for the padded graph buffers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GraphConfig {
    pub max_keys: usize,
    pub max_servers: usize,
}

impl Default for GraphConfig {
    fn default() -> Self {
        Self {
            max_keys: 25,
            max_servers: 10,
        }
    }
}

impl GraphConfig {
    pub fn max_edges(&self) -> usize {
        self.max_keys * self.max_servers
    }
}

/// Per-read latency constants (milliseconds).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LatencyConfig {
    /// Cost of a read served by a node holding the key locally.
    pub local_ms: f64,
    /// Cost of a read that must fetch the key from a remote replica.
    pub remote_ms: f64,
}

impl Default for LatencyConfig {
    fn default() -> Self {
        Self {
            local_ms: 10.0,
            remote_ms: 150.0,
        }
    }
}

/// Controller endpoint and polling cadence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ControllerConfig {
    pub base_url: String,
    pub request_timeout_ms: u64,
    /// How often telemetry is polled for metrics collection.
    pub polling_interval_ms: u64,
    /// How often a policy decision is taken and dispatched.
    pub decision_interval_ms: u64,
}

impl Default for ControllerConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8080".to_string(),
            request_timeout_ms: 2_000,
            polling_interval_ms: 1_000,
            decision_interval_ms: 1_000,
        }
    }
}

/// Which telemetry projection feeds the policy.
///
/// Both schemes are pure functions over the same snapshot type; the
/// choice is configuration, not subclassing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EncoderKind {
    /// Flat 3*K*N feature vector over the static catalog.
    Vector,
    /// Padded bipartite key/server graph over the per-tick registry.
    Graph,
}

impl EncoderKind {
    /// Stable lowercase name (used in logs/telemetry).
    pub fn as_str(&self) -> &'static str {
        match self {
            EncoderKind::Vector => "vector",
            EncoderKind::Graph => "graph",
        }
    }

    /// Parse an encoder name (case-insensitive). Returns None if
    /// unrecognized.
    pub fn parse(s: &str) -> Option<EncoderKind> {
        match s.trim().to_ascii_lowercase().as_str() {
            "vector" | "vec" | "mlp" | "flat" => Some(EncoderKind::Vector),
            "graph" | "gnn" => Some(EncoderKind::Graph),
            _ => None,
        }
    }
}

/// Source of the effective encoder kind (for logging/debugging
/// precedence).
///
/// Precedence order (highest to lowest):
/// 1. CLI argument (--encoder)
/// 2. Environment variable (REPLIQ_ENCODER)
/// 3. Default (Vector)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EncoderSource {
    Cli,
    Env,
    Default,
}

impl EncoderSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            EncoderSource::Cli => "cli",
            EncoderSource::Env => "env",
            EncoderSource::Default => "default",
        }
    }
}

/// Resolved encoder kind with its source for logging.
#[derive(Debug, Clone, Copy)]
pub struct EffectiveEncoder {
    pub kind: EncoderKind,
    pub source: EncoderSource,
}

impl EffectiveEncoder {
    /// Log the effective encoder at startup (INFO level to stderr).
    pub fn log_startup(&self) {
        eprintln!(
            "effective_encoder={} source={}",
            self.kind.as_str(),
            self.source.as_str()
        );
    }
}

/// Resolve the effective encoder using standard precedence rules.
pub fn resolve_effective_encoder(cli_encoder: Option<EncoderKind>) -> EffectiveEncoder {
    if let Some(kind) = cli_encoder {
        return EffectiveEncoder {
            kind,
            source: EncoderSource::Cli,
        };
    }

    if let Ok(raw) = env::var("REPLIQ_ENCODER") {
        if let Some(kind) = EncoderKind::parse(&raw) {
            return EffectiveEncoder {
                kind,
                source: EncoderSource::Env,
            };
        }
    }

    EffectiveEncoder {
        kind: EncoderKind::Vector,
        source: EncoderSource::Default,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::actions::ActionKind;

    #[test]
    fn default_catalog_dimensions() {
        let catalog = CatalogConfig::default();
        assert_eq!(catalog.num_keys(), 20);
        assert_eq!(catalog.num_nodes(), 5);
        assert_eq!(catalog.key_name(0), Some("user_profile_0"));
        assert_eq!(catalog.node_name(1), Some("replication-eu"));
        assert_eq!(catalog.key_index("user_profile_19"), Some(19));
        assert_eq!(catalog.node_index("replication-jp"), Some(4));
    }

    #[test]
    fn catalog_resolves_slots_to_names() {
        let catalog = CatalogConfig::default();

        let cmd = catalog
            .resolve(ActionSlot {
                kind: ActionKind::Evict,
                key_index: 11,
                node_index: 2,
            })
            .unwrap();
        assert_eq!(cmd.action_type, ActionKind::Evict);
        assert_eq!(cmd.key, "user_profile_11");
        assert_eq!(cmd.target_node, "replication-ap");

        // Slots past the catalog resolve to no command.
        assert!(catalog
            .resolve(ActionSlot {
                kind: ActionKind::Replicate,
                key_index: 20,
                node_index: 0,
            })
            .is_none());
    }

    #[test]
    fn encoder_kind_parse() {
        assert_eq!(EncoderKind::parse("vector"), Some(EncoderKind::Vector));
        assert_eq!(EncoderKind::parse(" GNN "), Some(EncoderKind::Graph));
        assert_eq!(EncoderKind::parse("mlp"), Some(EncoderKind::Vector));
        assert_eq!(EncoderKind::parse("tensor"), None);
    }

    #[test]
    fn cli_encoder_takes_precedence() {
        let effective = resolve_effective_encoder(Some(EncoderKind::Graph));
        assert_eq!(effective.kind, EncoderKind::Graph);
        assert_eq!(effective.source, EncoderSource::Cli);
    }

    #[test]
    fn graph_config_edge_capacity() {
        let graph = GraphConfig::default();
        assert_eq!(graph.max_edges(), 250);
    }
}
