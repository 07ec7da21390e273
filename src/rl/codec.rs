// src/rl/codec.rs
//
// Bijective mapping between discrete action ids and (operation, key
// slot, node slot) triples.
//
// Id layout over [0, 2*K*N):
// - [0, K*N)      REPLICATE
// - [K*N, 2*K*N)  EVICT
// Within a half, the flat placement index decomposes row-major with the
// key as the slow axis: p = key_index * N + node_index.

use serde::{Deserialize, Serialize};

use crate::actions::{ActionKind, ActionSlot};

/// Capacity-parameterized action codec.
///
/// K and N are the scheme's capacity bounds, independent of how many
/// keys/nodes are live this tick. A decoded slot may therefore point
/// past the live registry; callers treat that as "no corresponding live
/// entity", never as an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionCodec {
    num_keys: usize,
    num_nodes: usize,
}

impl ActionCodec {
    pub fn new(num_keys: usize, num_nodes: usize) -> Self {
        Self {
            num_keys,
            num_nodes,
        }
    }

    pub fn num_keys(&self) -> usize {
        self.num_keys
    }

    pub fn num_nodes(&self) -> usize {
        self.num_nodes
    }

    /// K*N placement slots per operation half.
    pub fn placements(&self) -> usize {
        self.num_keys * self.num_nodes
    }

    /// Total id space size: 2*K*N.
    pub fn num_actions(&self) -> usize {
        2 * self.placements()
    }

    /// Encode a slot into its action id. Returns None when the slot's
    /// indices fall outside the codec's capacity bounds.
    pub fn encode(&self, slot: ActionSlot) -> Option<usize> {
        if slot.key_index >= self.num_keys || slot.node_index >= self.num_nodes {
            return None;
        }
        let placement = slot.key_index * self.num_nodes + slot.node_index;
        let id = match slot.kind {
            ActionKind::Replicate => placement,
            ActionKind::Evict => self.placements() + placement,
        };
        Some(id)
    }

    /// Decode an action id. Ids outside [0, 2*K*N) are rejected.
    pub fn decode(&self, id: usize) -> Option<ActionSlot> {
        if id >= self.num_actions() || self.num_nodes == 0 {
            return None;
        }
        let placements = self.placements();
        let (kind, placement) = if id < placements {
            (ActionKind::Replicate, id)
        } else {
            (ActionKind::Evict, id - placements)
        };
        Some(ActionSlot {
            kind,
            key_index: placement / self.num_nodes,
            node_index: placement % self.num_nodes,
        })
    }
}
