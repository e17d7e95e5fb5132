//! Consistent hashing ring for routing keys to named nodes.
//!
//! Each physical node is placed on a circular `u128` hash space many times
//! (virtual nodes), at `hash("{node}:{i}")` for `i` in `0..replicas`. A key is
//! owned by the first virtual node at or after `hash(key)`, wrapping around
//! past the largest position. Adding or removing a node only moves the keys
//! that land on that node's positions.
//!
//! The hash function is injected: any `Fn(&[u8]) -> u128` works, and
//! [`HashAlgorithm`] provides MD5 (the default) and BLAKE3.
//!
//! ```
//! use hashring::Ring;
//!
//! let mut ring = Ring::new();
//! ring.add_node("server1");
//! ring.add_node("server2");
//!
//! let owner = ring.get_node("user:42").unwrap();
//! assert!(owner == "server1" || owner == "server2");
//! ```

mod config;
mod error;
mod hash;
mod ring;

pub use config::{DEFAULT_REPLICAS, RingConfig};
pub use error::RingError;
pub use hash::{HashAlgorithm, RingHasher, blake3_hash, md5_hash};
pub use ring::{Ring, RingBuilder, VirtualNode};
