//! Ring configuration, deserializable from a TOML `[ring]` table.

use serde::Deserialize;

use crate::RingError;
use crate::hash::HashAlgorithm;

/// Default number of virtual nodes per physical node.
pub const DEFAULT_REPLICAS: usize = 100;

/// Settings a [`Ring`](crate::Ring) is built from.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct RingConfig {
    /// Virtual nodes created per physical node on each add.
    pub replicas: usize,
    /// Hash function for node and key placement.
    pub hasher: HashAlgorithm,
    /// Physical nodes to seed the ring with, in insertion order.
    pub nodes: Vec<String>,
}

impl Default for RingConfig {
    fn default() -> Self {
        Self {
            replicas: DEFAULT_REPLICAS,
            hasher: HashAlgorithm::default(),
            nodes: Vec::new(),
        }
    }
}

impl RingConfig {
    /// Reject settings that would produce a ring nodes cannot appear on.
    pub fn validate(&self) -> Result<(), RingError> {
        if self.replicas == 0 {
            return Err(RingError::ZeroReplicas);
        }
        Ok(())
    }
}
