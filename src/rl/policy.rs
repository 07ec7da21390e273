// src/rl/policy.rs
//
// Policy seam between the encoders and the action codec.
//
// The real decision-maker is an external learned policy; these
// implementations are deterministic stand-ins that exercise the same
// contract: encoded observation plus validity mask in, one discrete
// action id out.

use rand::Rng;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use super::graph::GraphObservation;

/// Encoder output consumed by a policy. The shape contract is fixed:
/// the vector variant has length 3*K*N, the graph variant carries the
/// five padded buffers plus live counts.
#[derive(Debug, Clone, PartialEq)]
pub enum PolicyInput {
    Vector(Vec<f32>),
    Graph(GraphObservation),
}

/// Maps an observation and mask to one action id in [0, mask.len()).
///
/// Implementations must respect the mask; the enclosing loop treats the
/// returned id as final for the tick.
pub trait Policy: Send {
    /// Unique version string for this policy implementation.
    fn version(&self) -> &str;

    /// Select one action id. With an all-false mask (never produced by
    /// the mask builder, which keeps id 0 valid in the degenerate case)
    /// implementations fall back to id 0.
    fn select(&mut self, input: &PolicyInput, mask: &[bool]) -> usize;
}

pub const MASKED_RANDOM_POLICY_VERSION: &str = "masked-random-v1";
pub const FIRST_VALID_POLICY_VERSION: &str = "first-valid-v1";

/// Uniform random choice over the valid ids, seeded for reproducible
/// runs.
pub struct MaskedRandomPolicy {
    rng: ChaCha8Rng,
}

impl MaskedRandomPolicy {
    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(seed),
        }
    }
}

impl Policy for MaskedRandomPolicy {
    fn version(&self) -> &str {
        MASKED_RANDOM_POLICY_VERSION
    }

    fn select(&mut self, _input: &PolicyInput, mask: &[bool]) -> usize {
        let valid: Vec<usize> = mask
            .iter()
            .enumerate()
            .filter_map(|(id, &ok)| ok.then_some(id))
            .collect();
        if valid.is_empty() {
            return 0;
        }
        valid[self.rng.gen_range(0..valid.len())]
    }
}

/// Always picks the lowest valid id. Useful as a deterministic baseline
/// and in tests.
#[derive(Debug, Default, Clone, Copy)]
pub struct FirstValidPolicy;

impl Policy for FirstValidPolicy {
    fn version(&self) -> &str {
        FIRST_VALID_POLICY_VERSION
    }

    fn select(&mut self, _input: &PolicyInput, mask: &[bool]) -> usize {
        mask.iter().position(|&ok| ok).unwrap_or(0)
    }
}
