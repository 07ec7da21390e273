// src/runner.rs
//
// Decision/evaluation tick loop around the pure core:
// poll -> encode -> mask -> policy -> decode -> resolve -> dispatch,
// then score the snapshot and append a metrics record.
//
// Each tick is independent given its snapshot. The only suspending
// operations are the controller fetch/dispatch; everything between them
// is synchronous and pure.

use std::time::Instant;

use crate::actions::ReplicationCommand;
use crate::client::ControllerClient;
use crate::config::{Config, EncoderKind};
use crate::metrics::OnlineStats;
use crate::rl::{
    score, validity_mask, ActionCodec, GraphEncoder, Policy, PolicyInput, RewardWeights,
    ScoreComponents, VectorEncoder,
};
use crate::state::ClusterSnapshot;
use crate::telemetry::{MetricsRecord, MetricsSink};

/// Outcome of one pure decision step over a snapshot.
#[derive(Debug, Clone, PartialEq)]
pub struct Decision {
    /// Action id the policy returned, in [0, 2*K*N).
    pub action_id: usize,
    /// Resolved command, or None when the id decoded to a slot with no
    /// live entity this tick.
    pub command: Option<ReplicationCommand>,
}

/// Pure per-tick decision pipeline for one encoding scheme.
///
/// Owns the policy and the scheme's codec. Index spaces are re-derived
/// from the snapshot on every call; nothing is carried across ticks.
pub struct DecisionEngine {
    kind: EncoderKind,
    codec: ActionCodec,
    vector_encoder: VectorEncoder,
    graph_encoder: GraphEncoder,
    policy: Box<dyn Policy>,
}

impl DecisionEngine {
    pub fn new(cfg: &Config, kind: EncoderKind, policy: Box<dyn Policy>) -> Self {
        let codec = match kind {
            EncoderKind::Vector => {
                ActionCodec::new(cfg.catalog.num_keys(), cfg.catalog.num_nodes())
            }
            EncoderKind::Graph => ActionCodec::new(cfg.graph.max_keys, cfg.graph.max_servers),
        };
        Self {
            kind,
            codec,
            vector_encoder: VectorEncoder::new(cfg.catalog.clone()),
            graph_encoder: GraphEncoder::new(cfg.graph),
            policy,
        }
    }

    pub fn encoder_kind(&self) -> EncoderKind {
        self.kind
    }

    pub fn codec(&self) -> &ActionCodec {
        &self.codec
    }

    pub fn policy_version(&self) -> &str {
        self.policy.version()
    }

    /// Run one decision over a snapshot: encode, mask, select, decode,
    /// resolve. No I/O.
    pub fn decide(&mut self, snapshot: &ClusterSnapshot) -> Decision {
        let presence = snapshot.presence_map();

        match self.kind {
            EncoderKind::Vector => {
                let catalog = self.vector_encoder.catalog();
                let mask = validity_mask(&self.codec, &presence, &catalog.keys, &catalog.nodes);
                let input = PolicyInput::Vector(self.vector_encoder.encode(snapshot));
                let action_id = self.policy.select(&input, &mask);
                let command = self
                    .codec
                    .decode(action_id)
                    .and_then(|slot| self.vector_encoder.catalog().resolve(slot));
                Decision { action_id, command }
            }
            EncoderKind::Graph => {
                let obs = self.graph_encoder.encode(snapshot);
                let mask = validity_mask(&self.codec, &presence, &obs.key_names, &obs.server_ids);
                let action_id = {
                    let input = PolicyInput::Graph(obs.clone());
                    self.policy.select(&input, &mask)
                };
                let command = self
                    .codec
                    .decode(action_id)
                    .and_then(|slot| obs.resolve(slot));
                Decision { action_id, command }
            }
        }
    }
}

/// Aggregates over one evaluation run.
#[derive(Debug, Clone, Copy, Default)]
pub struct EvalSummary {
    pub ticks: u64,
    pub decisions: u64,
    pub commands_sent: u64,
    pub unreachable_ticks: u64,
    pub latency: OnlineStats,
    pub cost: OnlineStats,
    pub reward: OnlineStats,
}

impl EvalSummary {
    /// Print a concise run summary to stderr in key=value form.
    pub fn log(&self) {
        eprintln!(
            "eval_summary ticks={} decisions={} commands_sent={} unreachable={} \
             mean_latency_ms={:.2} mean_cost={:.2} mean_reward={:.4}",
            self.ticks,
            self.decisions,
            self.commands_sent,
            self.unreachable_ticks,
            self.latency.mean(),
            self.cost.mean(),
            self.reward.mean(),
        );
    }
}

/// Run the polling/decision loop for `ticks` polls.
///
/// A failed fetch degrades to the empty-snapshot case for scoring and
/// the unreachable sentinel for reward; no decision is taken on such a
/// tick. Decisions fire at the configured decision interval, metrics
/// are collected at the polling interval.
pub async fn run_eval(
    cfg: &Config,
    engine: &mut DecisionEngine,
    client: &ControllerClient,
    sink: &mut MetricsSink,
    weights: &RewardWeights,
    ticks: u64,
    verbose: u8,
) -> EvalSummary {
    let mut summary = EvalSummary::default();
    let start = Instant::now();
    let mut last_decision: Option<Instant> = None;

    let polling = std::time::Duration::from_millis(cfg.controller.polling_interval_ms);
    let decision_every = std::time::Duration::from_millis(cfg.controller.decision_interval_ms);

    for tick in 0..ticks {
        summary.ticks += 1;
        let fetched = client.try_fetch_snapshot().await;

        let (components, reward) = match &fetched {
            Some(snapshot) => {
                let due = last_decision
                    .map(|t| t.elapsed() >= decision_every)
                    .unwrap_or(true);
                if due {
                    last_decision = Some(Instant::now());
                    summary.decisions += 1;
                    let decision = engine.decide(snapshot);
                    if verbose > 1 {
                        eprintln!(
                            "tick={tick} action_id={} command={:?}",
                            decision.action_id, decision.command
                        );
                    }
                    if let Some(command) = &decision.command {
                        if client.try_execute(command).await {
                            summary.commands_sent += 1;
                        }
                    }
                }
                let components = score(snapshot, &cfg.latency);
                (components, weights.reward(&components))
            }
            None => {
                summary.unreachable_ticks += 1;
                (ScoreComponents::zero(), weights.unreachable())
            }
        };

        summary.latency.add(components.avg_latency);
        summary.cost.add(components.total_cost);
        summary.reward.add(reward);

        sink.log(&MetricsRecord {
            time: start.elapsed().as_secs_f64(),
            avg_latency: components.avg_latency,
            total_cost: components.total_cost,
            reward: Some(reward),
        });

        if verbose > 0 {
            eprintln!(
                "tick={tick} avg_latency_ms={:.2} total_cost={:.2} reward={:.4}",
                components.avg_latency, components.total_cost, reward
            );
        }

        if tick + 1 < ticks {
            tokio::time::sleep(polling).await;
        }
    }

    sink.flush();
    summary
}
