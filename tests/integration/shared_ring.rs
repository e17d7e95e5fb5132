//! Integration test: concurrent access through `SharedRing`.
//!
//! Readers route keys while writers change membership; every read must see
//! a complete, sorted ring.

use std::sync::Arc;

use hashring::Ring;
use hashring_cluster::{RingEvent, SharedRing};
use hashring_integration_tests::sample_keys;

/// Four readers route keys while one writer churns a node in and out.
#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
#[ntest::timeout(30000)]
async fn test_readers_see_consistent_ring_during_churn() {
    let ring = SharedRing::new(
        Ring::builder()
            .replicas(50)
            .nodes(["stable-1", "stable-2"])
            .build()
            .unwrap(),
    );

    let writer = {
        let ring = Arc::clone(&ring);
        tokio::spawn(async move {
            for _ in 0..50 {
                ring.add_node("flapping").await;
                tokio::task::yield_now().await;
                ring.remove_node("flapping").await;
            }
        })
    };

    let mut readers = Vec::new();
    for _ in 0..4 {
        let ring = Arc::clone(&ring);
        readers.push(tokio::spawn(async move {
            for key in sample_keys(200) {
                let owner = ring.get_node(&key).await;
                assert!(
                    matches!(
                        owner.as_deref(),
                        Some("stable-1") | Some("stable-2") | Some("flapping")
                    ),
                    "unexpected owner {owner:?} for {key}"
                );

                let snapshot = ring.snapshot().await;
                assert!(
                    snapshot
                        .positions()
                        .windows(2)
                        .all(|w| w[0].hash() <= w[1].hash())
                );
                assert_eq!(snapshot.vnode_count() % 50, 0);
            }
        }));
    }

    writer.await.unwrap();
    for reader in readers {
        reader.await.unwrap();
    }

    assert_eq!(ring.node_ids().await, vec!["stable-1", "stable-2"]);
}

/// Subscribers observe membership changes in order.
#[tokio::test]
#[ntest::timeout(10000)]
async fn test_subscriber_sees_membership_history() {
    let ring = SharedRing::new(Ring::builder().replicas(4).build().unwrap());
    let mut rx = ring.subscribe();

    ring.add_node("a").await;
    ring.add_node("b").await;
    ring.remove_node("a").await;
    ring.remove_node("missing").await;
    ring.set_node("b").await;

    let mut history = Vec::new();
    while let Ok(event) = rx.try_recv() {
        history.push(event);
    }

    assert_eq!(
        history,
        vec![
            RingEvent::NodeAdded {
                node: "a".into(),
                vnodes: 4
            },
            RingEvent::NodeAdded {
                node: "b".into(),
                vnodes: 4
            },
            RingEvent::NodeRemoved {
                node: "a".into(),
                vnodes: 4
            },
            RingEvent::NodeRemoved {
                node: "b".into(),
                vnodes: 4
            },
            RingEvent::NodeAdded {
                node: "b".into(),
                vnodes: 4
            },
        ]
    );
}

/// A shared ring answers exactly like the sequential ring it wraps.
#[tokio::test]
async fn test_shared_lookups_match_sequential_ring() {
    let plain = Ring::builder()
        .nodes(["server1", "server2", "server3", "server4"])
        .build()
        .unwrap();
    let shared = SharedRing::new(plain.clone());

    for key in sample_keys(1_000) {
        assert_eq!(shared.get_node(&key).await.as_deref(), plain.get_node(&key));
    }
    assert_eq!(shared.node_count().await, 4);
    assert_eq!(shared.vnode_count().await, 400);
}
