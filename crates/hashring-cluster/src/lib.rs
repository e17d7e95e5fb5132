//! Concurrent access to a consistent hashing ring.
//!
//! The ring in the `hashring` crate is a sequential data structure. This
//! crate layers synchronization on top without touching the algorithm:
//! [`SharedRing`] guards a ring with a reader-writer lock and publishes a
//! [`RingEvent`] for every membership change.

mod shared;

pub use shared::SharedRing;

/// A membership change applied to a [`SharedRing`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RingEvent {
    /// A node gained `vnodes` positions on the ring.
    NodeAdded {
        /// Physical node name.
        node: String,
        /// Positions added by this change.
        vnodes: usize,
    },
    /// A node lost `vnodes` positions on the ring.
    NodeRemoved {
        /// Physical node name.
        node: String,
        /// Positions removed by this change.
        vnodes: usize,
    },
}
