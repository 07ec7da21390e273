// src/rl/mask.rs
//
// Validity mask over the discrete action space.
//
// For every live (key, node) pair the presence map decides which single
// operation is legal: a key already on the node can only be evicted, a
// key absent from the node can only be replicated. Slots past the live
// index spaces stay invalid so the policy never selects padding.

use crate::actions::{ActionKind, ActionSlot};
use crate::state::PresenceMap;

use super::codec::ActionCodec;

/// Build the boolean validity vector (length 2*K*N) for one tick.
///
/// `key_names` and `node_ids` are the live per-tick index spaces:
/// catalog order for the vector scheme, registry order plus report order
/// for the graph scheme. Entries beyond the codec's capacity bounds are
/// ignored.
///
/// Degenerate case: with no live keys or no live nodes there is nothing
/// meaningful to select, but a selection must stay well-defined, so id 0
/// is marked valid (and resolves to no live entity downstream).
pub fn validity_mask(
    codec: &ActionCodec,
    presence: &PresenceMap,
    key_names: &[String],
    node_ids: &[String],
) -> Vec<bool> {
    let mut mask = vec![false; codec.num_actions()];

    let live_keys = key_names.len().min(codec.num_keys());
    let live_nodes = node_ids.len().min(codec.num_nodes());

    if live_keys == 0 || live_nodes == 0 {
        if let Some(first) = mask.first_mut() {
            *first = true;
        }
        return mask;
    }

    for (key_index, key) in key_names.iter().take(live_keys).enumerate() {
        for (node_index, node_id) in node_ids.iter().take(live_nodes).enumerate() {
            let kind = if presence.contains(key, node_id) {
                ActionKind::Evict
            } else {
                ActionKind::Replicate
            };
            let slot = ActionSlot {
                kind,
                key_index,
                node_index,
            };
            if let Some(id) = codec.encode(slot) {
                mask[id] = true;
            }
        }
    }

    mask
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::ClusterSnapshot;

    fn names(raw: &[&str]) -> Vec<String> {
        raw.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn live_pairs_have_exactly_one_valid_operation() {
        let snap: ClusterSnapshot = serde_json::from_str(
            r#"[
                {"nodeId": "n0", "keyMetrics": {"a": {"readCount": 1}}},
                {"nodeId": "n1", "keyMetrics": {}}
            ]"#,
        )
        .unwrap();
        let presence = snap.presence_map();

        let codec = ActionCodec::new(2, 2);
        let mask = validity_mask(
            &codec,
            &presence,
            &names(&["a", "b"]),
            &names(&["n0", "n1"]),
        );

        let placements = codec.placements();
        for key_index in 0..2 {
            for node_index in 0..2 {
                let p = key_index * 2 + node_index;
                let replicate = mask[p];
                let evict = mask[placements + p];
                assert!(
                    replicate ^ evict,
                    "pair ({key_index},{node_index}) must have exactly one valid op"
                );
            }
        }

        // "a" lives on n0 only: evict there, replicate everywhere else.
        assert!(mask[placements]);
        assert!(!mask[0]);
        assert!(mask[1]);
        assert!(!mask[placements + 1]);
    }

    #[test]
    fn padding_slots_are_invalid() {
        let snap: ClusterSnapshot =
            serde_json::from_str(r#"[{"nodeId": "n0", "keyMetrics": {"a": {}}}]"#).unwrap();
        let presence = snap.presence_map();

        // Capacity 3 keys x 2 nodes, but only one live key and node.
        let codec = ActionCodec::new(3, 2);
        let mask = validity_mask(&codec, &presence, &names(&["a"]), &names(&["n0"]));

        let valid: Vec<usize> = mask
            .iter()
            .enumerate()
            .filter_map(|(i, &v)| v.then_some(i))
            .collect();
        // Only the (0,0) evict slot is reachable.
        assert_eq!(valid, vec![codec.placements()]);
    }

    #[test]
    fn degenerate_snapshot_keeps_id_zero_valid() {
        let presence = ClusterSnapshot::empty().presence_map();
        let codec = ActionCodec::new(4, 3);

        let mask = validity_mask(&codec, &presence, &[], &[]);
        assert!(mask[0]);
        assert_eq!(mask.iter().filter(|&&v| v).count(), 1);

        // No live nodes behaves the same as no live keys.
        let mask = validity_mask(&codec, &presence, &names(&["a"]), &[]);
        assert!(mask[0]);
        assert_eq!(mask.iter().filter(|&&v| v).count(), 1);
    }

    #[test]
    fn live_names_beyond_capacity_are_clamped() {
        let snap: ClusterSnapshot =
            serde_json::from_str(r#"[{"nodeId": "n0", "keyMetrics": {}}]"#).unwrap();
        let presence = snap.presence_map();

        let codec = ActionCodec::new(1, 1);
        let mask = validity_mask(
            &codec,
            &presence,
            &names(&["a", "b", "c"]),
            &names(&["n0", "n1"]),
        );

        assert_eq!(mask.len(), 2);
        // Only the in-capacity (0,0) pair contributes: "a" absent on n0.
        assert!(mask[0]);
        assert!(!mask[1]);
    }
}
