//! Encoder shape and determinism tests over the public API.
//!
//! Both projections must produce fully-shaped output for any snapshot
//! they are handed, including empty and over-capacity ones.

use repliq::{
    CatalogConfig, ClusterSnapshot, GraphConfig, GraphEncoder, VectorEncoder, EDGE_PAD,
};

fn snapshot(json: &str) -> ClusterSnapshot {
    serde_json::from_str(json).unwrap()
}

#[test]
fn vector_length_is_three_planes_over_the_catalog() {
    let encoder = VectorEncoder::new(CatalogConfig::default());
    assert_eq!(encoder.obs_dim(), 3 * 20 * 5);

    let obs = encoder.encode(&ClusterSnapshot::empty());
    assert_eq!(obs.len(), 300);
    assert!(obs.iter().all(|&v| v == 0.0));
}

#[test]
fn vector_marks_presence_reads_and_writes() {
    let encoder = VectorEncoder::new(CatalogConfig::default());
    let snap = snapshot(
        r#"[{"nodeId": "replication-ap",
             "keyMetrics": {"user_profile_11": {"readCount": 10, "writeCount": 3}}}]"#,
    );

    let obs = encoder.encode(&snap);
    let stride = 20 * 5;
    // key 11 on node 2 (ap): p = 11*5 + 2 = 57.
    assert_eq!(obs[57], 1.0);
    assert!((obs[stride + 57] - (11.0_f64.ln() as f32)).abs() < 1e-6);
    assert!((obs[2 * stride + 57] - (4.0_f64.ln() as f32)).abs() < 1e-6);
    assert_eq!(obs.iter().filter(|&&v| v != 0.0).count(), 3);
}

#[test]
fn identical_snapshots_encode_identically() {
    let vector = VectorEncoder::new(CatalogConfig::default());
    let graph = GraphEncoder::new(GraphConfig::default());
    let snap = snapshot(
        r#"[{"nodeId": "replication-us",
             "keyMetrics": {"user_profile_0": {"readCount": 5},
                            "user_profile_1": {"writeCount": 2}}},
            {"nodeId": "replication-eu",
             "keyMetrics": {"user_profile_1": {"readCount": 8}}}]"#,
    );

    assert_eq!(vector.encode(&snap), vector.encode(&snap.clone()));
    assert_eq!(graph.encode(&snap), graph.encode(&snap.clone()));
}

#[test]
fn graph_buffers_are_padded_to_capacity() {
    let caps = GraphConfig {
        max_keys: 6,
        max_servers: 4,
    };
    let encoder = GraphEncoder::new(caps);
    let obs = encoder.encode(&snapshot(
        r#"[{"nodeId": "s0", "storageCost": 1.0, "keyMetrics": {"a": {"readCount": 2}}},
            {"nodeId": "s1", "storageCost": 2.0, "keyMetrics": {"a": {}, "b": {}}}]"#,
    ));

    assert_eq!(obs.key_features.len(), 6 * 3);
    assert_eq!(obs.server_features.len(), 4 * 2);
    assert_eq!(obs.edge_sources.len(), 24);
    assert_eq!(obs.edge_targets.len(), 24);
    assert_eq!(obs.edge_features.len(), 24 * 2);

    assert_eq!(obs.live_keys, 2);
    assert_eq!(obs.live_servers, 2);
    assert_eq!(obs.live_edges, 3);

    // Everything past the live prefix is padding.
    assert!(obs.edge_sources[3..].iter().all(|&v| v == EDGE_PAD));
    assert!(obs.edge_targets[3..].iter().all(|&v| v == EDGE_PAD));
    assert!(obs.key_features[2 * 3..].iter().all(|&v| v == 0.0));
    assert!(obs.server_features[2 * 2..].iter().all(|&v| v == 0.0));
    // Live endpoints are valid indices, distinguishable from padding.
    assert!(obs.edge_sources[..3].iter().all(|&v| v >= 0));
}

#[test]
fn graph_truncation_is_lexicographic_and_reported() {
    let caps = GraphConfig {
        max_keys: 2,
        max_servers: 10,
    };
    let encoder = GraphEncoder::new(caps);
    let obs = encoder.encode(&snapshot(
        r#"[{"nodeId": "s0",
             "keyMetrics": {"gamma": {}, "alpha": {}, "beta": {}}}]"#,
    ));

    // Three live keys, capacity two: lexicographically-first win.
    assert_eq!(obs.live_keys, 2);
    assert_eq!(obs.key_names, vec!["alpha".to_string(), "beta".to_string()]);
    assert_eq!(obs.live_edges, 2);
}

#[test]
fn graph_degenerate_snapshot_keeps_shape() {
    let encoder = GraphEncoder::new(GraphConfig::default());
    let obs = encoder.encode(&ClusterSnapshot::empty());

    assert_eq!(obs.live_keys, 0);
    assert_eq!(obs.live_servers, 0);
    assert_eq!(obs.live_edges, 0);
    assert_eq!(obs.key_features.len(), 25 * 3);
    assert_eq!(obs.server_features.len(), 10 * 2);
    assert_eq!(obs.edge_sources.len(), 250);
    assert!(obs.key_features.iter().all(|&v| v == 0.0));
    assert!(obs.server_features.iter().all(|&v| v == 0.0));
}
