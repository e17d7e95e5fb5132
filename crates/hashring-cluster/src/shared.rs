//! Shared ring: a placement ring behind a reader-writer lock.
//!
//! [`SharedRing`] is the read-mostly structure that request routers use to
//! find the owner of a key while membership changes arrive from elsewhere.
//! Lookups take the read lock; joins and leaves take the write lock.

use std::sync::Arc;

use hashring::{HashAlgorithm, Ring, RingHasher};
use tokio::sync::{RwLock, broadcast};
use tracing::info;

use crate::RingEvent;

/// Capacity of the membership event channel.
const EVENT_CHANNEL_CAPACITY: usize = 256;

/// A [`Ring`] that can be shared between tasks.
///
/// Every mutation runs under the write lock and is broadcast as a
/// [`RingEvent`] to subscribers (cache invalidators, rebalancers, etc.).
pub struct SharedRing<H = HashAlgorithm> {
    /// Consistent hashing ring for key placement.
    ring: RwLock<Ring<H>>,
    /// Broadcast channel for membership events.
    event_tx: broadcast::Sender<RingEvent>,
}

impl<H> SharedRing<H>
where
    H: RingHasher + Clone + Send + Sync,
{
    /// Wrap an existing ring.
    pub fn new(ring: Ring<H>) -> Arc<Self> {
        let (event_tx, _) = broadcast::channel(EVENT_CHANNEL_CAPACITY);
        Arc::new(Self {
            ring: RwLock::new(ring),
            event_tx,
        })
    }

    /// Subscribe to membership events.
    ///
    /// Events are sent while the write lock is held, so every subscriber
    /// sees them in the order the mutations were applied.
    pub fn subscribe(&self) -> broadcast::Receiver<RingEvent> {
        self.event_tx.subscribe()
    }

    /// Add one replica set for `node` (cumulative) and return its name.
    ///
    /// Broadcasts [`RingEvent::NodeAdded`].
    pub async fn add_node(&self, node: &str) -> String {
        let mut ring = self.ring.write().await;
        ring.add_node(node);
        let vnodes = ring.replicas();

        info!(node, vnodes, "node added to ring");
        let _ = self.event_tx.send(RingEvent::NodeAdded {
            node: node.to_string(),
            vnodes,
        });
        node.to_string()
    }

    /// Remove every replica of `node` and return its name.
    ///
    /// Broadcasts [`RingEvent::NodeRemoved`] only if the node was present.
    pub async fn remove_node(&self, node: &str) -> String {
        let mut ring = self.ring.write().await;
        let vnodes = ring.weight(node);
        ring.remove_node(node);

        if vnodes > 0 {
            info!(node, vnodes, "node removed from ring");
            let _ = self.event_tx.send(RingEvent::NodeRemoved {
                node: node.to_string(),
                vnodes,
            });
        }
        node.to_string()
    }

    /// Idempotently place `node` with exactly one replica set.
    ///
    /// Broadcasts [`RingEvent::NodeRemoved`] for replaced replicas (if any),
    /// then [`RingEvent::NodeAdded`]. Returns the number of replaced replicas.
    pub async fn set_node(&self, node: &str) -> usize {
        let mut ring = self.ring.write().await;
        let removed = ring.set_node(node);
        let vnodes = ring.replicas();

        info!(node, removed, vnodes, "node set on ring");
        if removed > 0 {
            let _ = self.event_tx.send(RingEvent::NodeRemoved {
                node: node.to_string(),
                vnodes: removed,
            });
        }
        let _ = self.event_tx.send(RingEvent::NodeAdded {
            node: node.to_string(),
            vnodes,
        });
        removed
    }

    /// Find the node that owns `key`, or `None` if the ring is empty.
    pub async fn get_node(&self, key: &str) -> Option<String> {
        self.ring.read().await.get_node(key).map(str::to_string)
    }

    /// Find up to `count` distinct nodes for `key`, owner first.
    pub async fn get_nodes(&self, key: &str, count: usize) -> Vec<String> {
        self.ring
            .read()
            .await
            .get_nodes(key, count)
            .into_iter()
            .map(str::to_string)
            .collect()
    }

    /// Return all distinct node names, sorted.
    pub async fn node_ids(&self) -> Vec<String> {
        self.ring
            .read()
            .await
            .node_ids()
            .into_iter()
            .map(str::to_string)
            .collect()
    }

    /// Return the number of distinct nodes in the ring.
    pub async fn node_count(&self) -> usize {
        self.ring.read().await.node_count()
    }

    /// Return the total number of virtual nodes in the ring.
    pub async fn vnode_count(&self) -> usize {
        self.ring.read().await.vnode_count()
    }

    /// Return a clone of the current ring.
    pub async fn snapshot(&self) -> Ring<H> {
        self.ring.read().await.clone()
    }
}
