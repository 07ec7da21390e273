//! Repliq core library.
//!
//! A decision-support layer between a distributed replication controller
//! and a learned placement policy. The crate turns polled cluster
//! telemetry into fixed-shape policy input, decodes the policy's
//! discrete choice into a concrete replication command, and scores
//! states with a latency/cost objective used as both training reward
//! and evaluation metric.
//!
//! # Architecture
//!
//! The codebase separates the pure core from I/O:
//!
//! - **Snapshot model** (`state`): immutable per-tick telemetry plus the
//!   derived key registry and presence map.
//!
//! - **Policy-facing core** (`rl`): action codec, validity mask, the two
//!   encoder projections (flat vector over a static catalog, padded
//!   bipartite graph over the per-tick registry), and the cost/latency
//!   estimator. All pure, synchronous, single-threaded; every call is
//!   independent given its snapshot.
//!
//! - **I/O layer** (`client`, `telemetry`): controller HTTP endpoints
//!   and the JSONL metrics sink. Transport failures degrade to the
//!   empty-snapshot case, never into the numeric pipeline.
//!
//! - **Harness** (`runner`, the binary): the polling/decision loop that
//!   wires the above together.
//!
//! Per-tick index spaces are a correctness contract, not an
//! optimization: registry indices are valid only for the snapshot that
//! produced them, so consumers carry key names and re-resolve every
//! tick.

pub mod actions;
pub mod client;
pub mod config;
pub mod metrics;
pub mod rl;
pub mod runner;
pub mod state;
pub mod telemetry;

// --- Re-exports for ergonomic external use ---------------------------------

pub use actions::{ActionKind, ActionSlot, ReplicationCommand};
pub use client::ControllerClient;
pub use config::{
    resolve_effective_encoder, CatalogConfig, Config, ControllerConfig, EffectiveEncoder,
    EncoderKind, GraphConfig, LatencyConfig,
};
pub use metrics::OnlineStats;
pub use rl::{
    score, validity_mask, ActionCodec, FirstValidPolicy, GraphEncoder, GraphObservation,
    MaskedRandomPolicy, Policy, PolicyInput, RewardWeights, ScoreComponents, VectorEncoder,
    EDGE_PAD, OBS_VERSION,
};
pub use runner::{run_eval, Decision, DecisionEngine, EvalSummary};
pub use state::{ClusterSnapshot, KeyMetric, KeyRegistry, NodeReport, PresenceMap};
pub use telemetry::{MetricsRecord, MetricsSink};
