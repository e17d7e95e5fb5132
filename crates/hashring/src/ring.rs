//! Consistent hashing ring implementation.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use tracing::debug;

use crate::RingError;
use crate::config::{DEFAULT_REPLICAS, RingConfig};
use crate::hash::{HashAlgorithm, RingHasher};

/// One replica of a physical node, placed on the ring.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VirtualNode {
    hash: u128,
    node: Arc<str>,
}

impl VirtualNode {
    /// Position of this replica on the ring.
    pub fn hash(&self) -> u128 {
        self.hash
    }

    /// Physical node this replica belongs to.
    pub fn node(&self) -> &str {
        &self.node
    }
}

/// Consistent hashing ring mapping keys to physical nodes.
///
/// Every physical node is placed `replicas` times on a `u128` ring at
/// `hash("{node}:{i}")`. A key belongs to the first virtual node at or after
/// `hash(key)`, wrapping past the largest position back to the smallest.
///
/// Adding a node is cumulative: adding the same node twice gives it two full
/// replica sets and twice the share of keys. Use [`Ring::set_node`] for an
/// idempotent add. The ring is a plain sequential structure; wrap it in a
/// lock to share it between threads.
#[derive(Debug, Clone)]
pub struct Ring<H = HashAlgorithm> {
    /// Virtual nodes sorted ascending by hash.
    positions: Vec<VirtualNode>,
    /// Positions owned by each physical node.
    weights: HashMap<Arc<str>, usize>,
    /// Virtual nodes created per physical node on each add.
    replicas: usize,
    hasher: H,
}

impl Ring {
    /// Create an empty ring with 100 replicas per node and the MD5 hasher.
    pub fn new() -> Self {
        Self {
            positions: Vec::new(),
            weights: HashMap::new(),
            replicas: DEFAULT_REPLICAS,
            hasher: HashAlgorithm::default(),
        }
    }

    /// Start building a ring with custom nodes, replicas, or hasher.
    pub fn builder() -> RingBuilder {
        RingBuilder::new()
    }

    /// Build a ring from configuration, seeding its nodes in order.
    pub fn from_config(config: &RingConfig) -> Result<Self, RingError> {
        config.validate()?;
        Self::builder()
            .replicas(config.replicas)
            .hasher(config.hasher)
            .nodes(config.nodes.iter().cloned())
            .build()
    }
}

impl Default for Ring {
    fn default() -> Self {
        Self::new()
    }
}

impl<H: RingHasher> Ring<H> {
    /// Create an empty ring with the given replica count and hasher.
    pub fn with_hasher(replicas: usize, hasher: H) -> Result<Self, RingError> {
        if replicas == 0 {
            return Err(RingError::ZeroReplicas);
        }
        Ok(Self {
            positions: Vec::new(),
            weights: HashMap::new(),
            replicas,
            hasher,
        })
    }

    /// Add `replicas` virtual nodes for `node` and return `node`.
    ///
    /// Not idempotent: each call adds another full replica set.
    pub fn add_node<'a>(&mut self, node: &'a str) -> &'a str {
        self.add_node_with_replicas(node, self.replicas)
    }

    /// Add an explicit number of virtual nodes for `node` and return `node`.
    ///
    /// Replica indexes start at 0 every time, so repeated adds stack
    /// positions on the same points. Zero replicas is a no-op.
    pub fn add_node_with_replicas<'a>(&mut self, node: &'a str, replicas: usize) -> &'a str {
        if replicas == 0 {
            return node;
        }

        let owner = match self.weights.get_key_value(node) {
            Some((existing, _)) => Arc::clone(existing),
            None => Arc::from(node),
        };
        self.positions.reserve(replicas);
        for i in 0..replicas {
            let hash = self.hasher.hash(vnode_key(node, i).as_bytes());
            self.positions.push(VirtualNode {
                hash,
                node: Arc::clone(&owner),
            });
        }
        self.positions.sort_by_key(|vnode| vnode.hash);
        *self.weights.entry(owner).or_default() += replicas;

        debug!(node, replicas, vnodes = self.positions.len(), "added node to ring");
        node
    }

    /// Remove every virtual node owned by `node` and return `node`.
    ///
    /// Removes all accumulated replica sets at once. Unknown nodes are a no-op.
    pub fn remove_node<'a>(&mut self, node: &'a str) -> &'a str {
        let removed = self.remove_positions(node);
        if removed > 0 {
            debug!(node, removed, vnodes = self.positions.len(), "removed node from ring");
        }
        node
    }

    /// Idempotent add: replace any existing replicas of `node` with exactly
    /// one fresh replica set.
    ///
    /// Returns the number of virtual nodes that were removed first.
    pub fn set_node(&mut self, node: &str) -> usize {
        let removed = self.remove_positions(node);
        self.add_node(node);
        removed
    }

    /// Find the physical node that owns `key`.
    ///
    /// The key is hashed through its `Display` form, the same string domain
    /// node names live in. Returns `None` only when the ring is empty.
    pub fn get_node<K>(&self, key: &K) -> Option<&str>
    where
        K: fmt::Display + ?Sized,
    {
        let idx = self.successor(self.position_of(key))?;
        Some(self.positions[idx].node())
    }

    /// Find up to `count` distinct physical nodes for `key`.
    ///
    /// Walks clockwise from the key's owner, skipping repeated nodes. The
    /// first entry is always [`Ring::get_node`]'s answer. If fewer distinct
    /// nodes exist than `count`, returns all of them.
    pub fn get_nodes<K>(&self, key: &K, count: usize) -> Vec<&str>
    where
        K: fmt::Display + ?Sized,
    {
        let Some(start) = self.successor(self.position_of(key)) else {
            return Vec::new();
        };

        let max_distinct = count.min(self.node_count());
        let mut owners: Vec<&str> = Vec::with_capacity(max_distinct);
        if max_distinct == 0 {
            return owners;
        }

        let (before, after) = self.positions.split_at(start);
        for vnode in after.iter().chain(before) {
            let node = vnode.node();
            if !owners.contains(&node) {
                owners.push(node);
                if owners.len() == max_distinct {
                    break;
                }
            }
        }

        owners
    }

    /// Hash `key` to its position on the ring.
    pub fn position_of<K>(&self, key: &K) -> u128
    where
        K: fmt::Display + ?Sized,
    {
        self.hasher.hash(key.to_string().as_bytes())
    }

    /// Drop all positions owned by `node`, keeping the rest in order.
    fn remove_positions(&mut self, node: &str) -> usize {
        let Some(removed) = self.weights.remove(node) else {
            return 0;
        };
        self.positions.retain(|vnode| vnode.node() != node);
        removed
    }

    /// Index of the first position at or after `hash`, wrapping to 0.
    fn successor(&self, hash: u128) -> Option<usize> {
        if self.positions.is_empty() {
            return None;
        }
        let idx = self.positions.partition_point(|vnode| vnode.hash < hash);
        Some(if idx == self.positions.len() { 0 } else { idx })
    }
}

impl<H> Ring<H> {
    /// Virtual nodes created per physical node on each add.
    pub fn replicas(&self) -> usize {
        self.replicas
    }

    /// All virtual nodes, sorted ascending by hash.
    pub fn positions(&self) -> &[VirtualNode] {
        &self.positions
    }

    /// Return `true` if no node owns any position.
    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    /// Return the number of distinct physical nodes in the ring.
    pub fn node_count(&self) -> usize {
        self.weights.len()
    }

    /// Return the total number of virtual nodes in the ring.
    pub fn vnode_count(&self) -> usize {
        self.positions.len()
    }

    /// Return all distinct physical node names, sorted.
    pub fn node_ids(&self) -> Vec<&str> {
        let mut ids: Vec<&str> = self.weights.keys().map(|node| &**node).collect();
        ids.sort_unstable();
        ids
    }

    /// Return `true` if `node` owns at least one position.
    pub fn contains_node(&self, node: &str) -> bool {
        self.weights.contains_key(node)
    }

    /// Number of virtual nodes owned by `node`, counting every replica set.
    pub fn weight(&self, node: &str) -> usize {
        self.weights.get(node).copied().unwrap_or(0)
    }
}

/// Builder for rings with non-default settings.
#[derive(Debug, Clone)]
pub struct RingBuilder<H = HashAlgorithm> {
    nodes: Vec<String>,
    replicas: usize,
    hasher: H,
}

impl RingBuilder {
    fn new() -> Self {
        Self {
            nodes: Vec::new(),
            replicas: DEFAULT_REPLICAS,
            hasher: HashAlgorithm::default(),
        }
    }
}

impl<H> RingBuilder<H> {
    /// Nodes to add once the ring is built, in order. Duplicates are kept.
    pub fn nodes<I, S>(mut self, nodes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.nodes.extend(nodes.into_iter().map(Into::into));
        self
    }

    /// Virtual nodes per physical node. Must be at least 1.
    pub fn replicas(mut self, replicas: usize) -> Self {
        self.replicas = replicas;
        self
    }

    /// Hash function for node and key placement.
    pub fn hasher<H2: RingHasher>(self, hasher: H2) -> RingBuilder<H2> {
        RingBuilder {
            nodes: self.nodes,
            replicas: self.replicas,
            hasher,
        }
    }
}

impl<H: RingHasher> RingBuilder<H> {
    /// Validate the settings and build the ring.
    pub fn build(self) -> Result<Ring<H>, RingError> {
        let mut ring = Ring::with_hasher(self.replicas, self.hasher)?;
        for node in &self.nodes {
            ring.add_node(node);
        }
        Ok(ring)
    }
}

/// Key hashed to place replica `index` of `node`: `"{node}:{index}"`.
fn vnode_key(node: &str, index: usize) -> String {
    format!("{node}:{index}")
}
