//! Integration test: key placement.
//!
//! Lookup behavior through the public API only: empty rings, single nodes,
//! custom hashes, wraparound, balance and determinism across rebuilds.

use hashring::{HashAlgorithm, Ring, RingConfig, RingError};
use hashring_integration_tests::{assignments, byte_sum, load, sample_keys};

#[test]
fn test_empty_ring_has_no_owner() {
    let ring = Ring::new();
    for key in sample_keys(50) {
        assert_eq!(ring.get_node(&key), None);
    }
}

#[test]
fn test_single_node_owns_everything() {
    for hasher in [HashAlgorithm::Md5, HashAlgorithm::Blake3] {
        let ring = Ring::builder().hasher(hasher).nodes(["A"]).build().unwrap();
        for key in sample_keys(500) {
            assert_eq!(ring.get_node(&key), Some("A"));
        }
    }
}

#[test]
fn test_repeated_lookups_are_stable() {
    let ring = Ring::builder()
        .nodes(["node1", "node2", "node3"])
        .build()
        .unwrap();
    for key in sample_keys(100) {
        let first = ring.get_node(&key);
        for _ in 0..10 {
            assert_eq!(ring.get_node(&key), first);
        }
    }
}

#[test]
fn test_rebuild_reproduces_placement() {
    let config = RingConfig {
        nodes: vec!["server1".into(), "server2".into(), "server3".into()],
        ..Default::default()
    };
    let keys = sample_keys(2_000);

    let first = Ring::from_config(&config).unwrap();
    let second = Ring::from_config(&config).unwrap();
    assert_eq!(first.positions(), second.positions());
    assert_eq!(assignments(&first, &keys), assignments(&second, &keys));
}

#[test]
fn test_insertion_order_does_not_change_placement() {
    let keys = sample_keys(2_000);
    let forward = Ring::builder().nodes(["a", "b", "c"]).build().unwrap();
    let backward = Ring::builder().nodes(["c", "b", "a"]).build().unwrap();
    assert_eq!(assignments(&forward, &keys), assignments(&backward, &keys));
}

#[test]
fn test_custom_hash_always_resolves() {
    let ring = Ring::builder()
        .hasher(byte_sum)
        .nodes(["node1", "node2"])
        .build()
        .unwrap();
    for key in sample_keys(200) {
        assert!(ring.get_node(&key).is_some());
    }
    assert!(ring.get_node("test_key").is_some());
}

#[test]
fn test_stub_hash_successor_and_wraparound() {
    // A:0 = 171, A:1 = 172, z:0 = 228, z:1 = 229.
    let ring = Ring::builder()
        .replicas(2)
        .hasher(byte_sum)
        .nodes(["A", "z"])
        .build()
        .unwrap();
    let max = ring.positions().last().unwrap();
    let min = ring.positions().first().unwrap();
    assert_eq!((min.hash(), min.node()), (171, "A"));
    assert_eq!((max.hash(), max.node()), (229, "z"));

    // 200 sits strictly between 172 (A) and 228 (z).
    assert_eq!(ring.position_of("dd"), 200);
    assert_eq!(ring.get_node("dd"), Some("z"));
    // 250 is past the maximum: wrap to the smallest position.
    assert_eq!(ring.position_of("}}"), 250);
    assert_eq!(ring.get_node("}}"), Some("A"));
}

#[test]
fn test_balance_with_default_replicas() {
    let ring = Ring::builder()
        .nodes(["node1", "node2", "node3"])
        .build()
        .unwrap();
    let total = 10_000;
    let counts = load(&assignments(&ring, &sample_keys(total)));

    assert_eq!(counts.len(), 3);
    for (node, count) in &counts {
        let ratio = *count as f64 / total as f64;
        assert!(
            (0.15..=0.55).contains(&ratio),
            "{node} owns {count}/{total} ({ratio:.2})"
        );
    }
}

#[test]
fn test_replica_placement_starts_at_owner() {
    let ring = Ring::builder()
        .hasher(HashAlgorithm::Blake3)
        .nodes(["n1", "n2", "n3", "n4"])
        .build()
        .unwrap();
    for key in sample_keys(300) {
        let owners = ring.get_nodes(&key, 3);
        assert_eq!(owners.len(), 3);
        assert_eq!(owners[0], ring.get_node(&key).unwrap());
        assert_eq!(ring.get_nodes(&key, 1), vec![owners[0]]);
    }
}

#[test]
fn test_zero_replicas_is_a_configuration_error() {
    let config = RingConfig {
        replicas: 0,
        nodes: vec!["a".into()],
        ..Default::default()
    };
    assert_eq!(config.validate(), Err(RingError::ZeroReplicas));
    assert_eq!(Ring::from_config(&config).unwrap_err(), RingError::ZeroReplicas);
}
