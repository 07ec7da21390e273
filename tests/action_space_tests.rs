//! Action codec and validity mask contract tests.
//!
//! The policy boundary is fixed: ids in [0, 2*K*N), lower half
//! REPLICATE, upper half EVICT, and for every live (key, node) pair
//! exactly one of the two is valid.

use repliq::{validity_mask, ActionCodec, ActionKind, ActionSlot, ClusterSnapshot};

fn snapshot(json: &str) -> ClusterSnapshot {
    serde_json::from_str(json).unwrap()
}

fn names(raw: &[&str]) -> Vec<String> {
    raw.iter().map(|s| s.to_string()).collect()
}

#[test]
fn codec_bijection_and_worked_examples() {
    let codec = ActionCodec::new(20, 5);
    assert_eq!(codec.num_actions(), 200);

    // id 57 = 11*5 + 2 -> REPLICATE key 11 node 2; 157 is its evict twin.
    assert_eq!(
        codec.decode(57).unwrap(),
        ActionSlot {
            kind: ActionKind::Replicate,
            key_index: 11,
            node_index: 2,
        }
    );
    assert_eq!(
        codec.decode(157).unwrap(),
        ActionSlot {
            kind: ActionKind::Evict,
            key_index: 11,
            node_index: 2,
        }
    );

    for id in 0..codec.num_actions() {
        let slot = codec.decode(id).unwrap();
        assert!(slot.key_index < 20);
        assert!(slot.node_index < 5);
        assert_eq!(codec.encode(slot), Some(id));
    }
    assert!(codec.decode(200).is_none());
}

#[test]
fn mask_is_complementary_over_live_pairs() {
    let snap = snapshot(
        r#"[
            {"nodeId": "n0", "keyMetrics": {"a": {"readCount": 1}, "b": {}}},
            {"nodeId": "n1", "keyMetrics": {"b": {"writeCount": 2}}},
            {"nodeId": "n2", "keyMetrics": {}}
        ]"#,
    );
    let presence = snap.presence_map();
    let registry = snap.key_registry();
    let node_ids = snap.node_ids();

    // Capacity larger than the live sets to exercise padding.
    let codec = ActionCodec::new(4, 5);
    let mask = validity_mask(&codec, &presence, registry.names(), &node_ids);
    assert_eq!(mask.len(), codec.num_actions());

    let placements = codec.placements();
    for key_index in 0..codec.num_keys() {
        for node_index in 0..codec.num_nodes() {
            let p = key_index * codec.num_nodes() + node_index;
            let live = key_index < registry.len() && node_index < node_ids.len();
            if live {
                assert!(
                    mask[p] ^ mask[placements + p],
                    "live pair ({key_index},{node_index}) needs exactly one valid op"
                );
                let present = presence.contains(
                    registry.name(key_index).unwrap(),
                    &node_ids[node_index],
                );
                assert_eq!(mask[placements + p], present);
                assert_eq!(mask[p], !present);
            } else {
                assert!(!mask[p] && !mask[placements + p], "padding must be invalid");
            }
        }
    }
}

#[test]
fn degenerate_mask_still_offers_one_action() {
    let codec = ActionCodec::new(25, 10);
    let presence = ClusterSnapshot::empty().presence_map();

    let mask = validity_mask(&codec, &presence, &[], &[]);
    assert_eq!(mask.iter().filter(|&&v| v).count(), 1);
    assert!(mask[0]);

    // Keys without nodes is just as degenerate.
    let mask = validity_mask(&codec, &presence, &names(&["a", "b"]), &[]);
    assert_eq!(mask.iter().filter(|&&v| v).count(), 1);
    assert!(mask[0]);
}
