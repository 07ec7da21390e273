// src/main.rs
//
// CLI entrypoint for the repliq evaluation harness.
//
// Constraints:
// - Encoder precedence: --encoder overrides REPLIQ_ENCODER (default
//   vector).
// - Deterministic runs via --seed (seeds the reference policy).
// - Tick count, optional verbosity, controller base URL override.
// - Print a concise run header (encoder, ticks, cfg version/hash).

use clap::{ArgAction, Parser, ValueEnum};

use repliq::config::{resolve_effective_encoder, Config, EncoderKind};
use repliq::rl::{MaskedRandomPolicy, RewardWeights};
use repliq::runner::{run_eval, DecisionEngine};
use repliq::telemetry::MetricsSink;
use repliq::ControllerClient;

#[derive(Copy, Clone, Debug, ValueEnum)]
enum EncoderArg {
    Vector,
    Graph,
}

impl From<EncoderArg> for EncoderKind {
    fn from(arg: EncoderArg) -> Self {
        match arg {
            EncoderArg::Vector => EncoderKind::Vector,
            EncoderArg::Graph => EncoderKind::Graph,
        }
    }
}

#[derive(Debug, Parser)]
#[command(
    name = "repliq",
    about = "Adaptive data replication decision harness (telemetry encoding + action codec + cost scoring)",
    version
)]
struct Args {
    /// Number of polling ticks to run.
    #[arg(long, default_value_t = 300)]
    ticks: u64,

    /// Telemetry encoding scheme (optional).
    /// If omitted, uses REPLIQ_ENCODER (default vector).
    #[arg(long, value_enum)]
    encoder: Option<EncoderArg>,

    /// Deterministic seed for the reference policy.
    #[arg(long)]
    seed: Option<u64>,

    /// Controller base URL override.
    #[arg(long)]
    base_url: Option<String>,

    /// Verbosity: -v per-tick metrics, -vv also decisions.
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,
}

fn fnv1a64(s: &str) -> u64 {
    const FNV_OFFSET: u64 = 0xcbf29ce484222325;
    const FNV_PRIME: u64 = 0x100000001b3;
    let mut h = FNV_OFFSET;
    for b in s.as_bytes() {
        h ^= *b as u64;
        h = h.wrapping_mul(FNV_PRIME);
    }
    h
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let mut cfg = Config::default();
    if let Some(base_url) = args.base_url {
        cfg.controller.base_url = base_url;
    }

    let effective = resolve_effective_encoder(args.encoder.map(EncoderKind::from));
    effective.log_startup();

    let seed = args.seed.unwrap_or(0);
    let cfg_hash = fnv1a64(&format!(
        "{}|{:?}|{:?}|{:?}",
        cfg.version, cfg.catalog, cfg.graph, cfg.latency
    ));
    eprintln!(
        "repliq_run encoder={} ticks={} seed={} controller={} cfg={}#{:016x}",
        effective.kind.as_str(),
        args.ticks,
        seed,
        cfg.controller.base_url,
        cfg.version,
        cfg_hash
    );

    let policy = Box::new(MaskedRandomPolicy::seeded(seed));
    let mut engine = DecisionEngine::new(&cfg, effective.kind, policy);
    let client = ControllerClient::new(&cfg.controller)?;
    let mut sink = MetricsSink::from_env();
    let weights = RewardWeights::default();

    let summary = run_eval(
        &cfg,
        &mut engine,
        &client,
        &mut sink,
        &weights,
        args.ticks,
        args.verbose,
    )
    .await;

    summary.log();
    Ok(())
}
