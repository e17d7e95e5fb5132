//! Hash functions that place virtual nodes and lookup keys on the ring.
//!
//! A [`Ring`](crate::Ring) is generic over a [`RingHasher`]. Any closure or
//! function pointer of type `Fn(&[u8]) -> u128` is a hasher, so custom hashes
//! need no wrapper type. [`HashAlgorithm`] covers the built-in choices and is
//! what configuration files select.

use serde::Deserialize;

/// Maps a key's bytes to a position on the ring.
///
/// Implementations must be deterministic for the lifetime of the process.
/// Any total order over the output is enough for lookups to stay correct;
/// a low-entropy hash only hurts balance.
pub trait RingHasher {
    /// Hash `key` to a ring position.
    fn hash(&self, key: &[u8]) -> u128;
}

impl<F> RingHasher for F
where
    F: Fn(&[u8]) -> u128,
{
    fn hash(&self, key: &[u8]) -> u128 {
        self(key)
    }
}

/// Built-in hash functions.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HashAlgorithm {
    /// 128-bit MD5 digest, read as a big-endian integer.
    #[default]
    Md5,
    /// First 16 bytes of the BLAKE3 digest, read as a big-endian integer.
    Blake3,
}

impl RingHasher for HashAlgorithm {
    fn hash(&self, key: &[u8]) -> u128 {
        match self {
            Self::Md5 => md5_hash(key),
            Self::Blake3 => blake3_hash(key),
        }
    }
}

/// MD5 of `key` as an unsigned 128-bit integer.
///
/// Equal to parsing the hex digest as a number, so placements match other
/// rings that use the same MD5 convention.
pub fn md5_hash(key: &[u8]) -> u128 {
    u128::from_be_bytes(md5::compute(key).0)
}

/// BLAKE3 of `key` truncated to 128 bits.
pub fn blake3_hash(key: &[u8]) -> u128 {
    let hash = blake3::hash(key);
    let mut bytes = [0u8; 16];
    bytes.copy_from_slice(&hash.as_bytes()[..16]);
    u128::from_be_bytes(bytes)
}
