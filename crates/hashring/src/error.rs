//! Error types for the ring crate.

/// Errors produced while constructing a ring.
///
/// Lookups and membership changes never fail: an empty ring yields `None`,
/// removing an unknown node is a no-op, and re-adding a node adds weight.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RingError {
    /// The replication factor was zero, so nodes would own no positions.
    #[error("replication factor must be at least 1")]
    ZeroReplicas,
}
