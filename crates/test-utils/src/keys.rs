//! Deterministic node identities.

// Test utilities are expected to panic on failure
#![allow(clippy::expect_used)]

use innerring_types::{PUBLIC_KEY_LEN, PublicKey, sha256};

/// Fixed set of well-formed public keys, reproducible across runs.
///
/// Key `i` is `0x02 ++ sha256("node-{i}")`.
#[derive(Debug, Clone)]
pub struct KeyRing {
    keys: Vec<PublicKey>,
}

impl KeyRing {
    /// Creates `size` keys.
    #[must_use]
    pub fn new(size: usize) -> Self {
        Self { keys: (0..size).map(node_key).collect() }
    }

    /// Key `index`.
    ///
    /// # Panics
    ///
    /// Panics if `index` is out of range.
    #[must_use]
    pub fn key(&self, index: usize) -> &PublicKey {
        self.keys.get(index).expect("key index out of range")
    }

    /// All keys in creation order.
    #[must_use]
    pub fn keys(&self) -> &[PublicKey] {
        &self.keys
    }

    /// Copies of the first `count` keys.
    #[must_use]
    pub fn first(&self, count: usize) -> Vec<PublicKey> {
        self.keys.iter().take(count).cloned().collect()
    }

    /// Number of keys.
    #[must_use]
    pub fn len(&self) -> usize {
        self.keys.len()
    }

    /// Whether the ring is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }
}

/// Standalone deterministic key for `seed`, same derivation as [`KeyRing`].
///
/// # Panics
///
/// Never in practice: the derived bytes always form a compressed key.
#[must_use]
pub fn node_key(seed: usize) -> PublicKey {
    let mut bytes = Vec::with_capacity(PUBLIC_KEY_LEN);
    bytes.push(0x02);
    bytes.extend_from_slice(&sha256(format!("node-{seed}").as_bytes()));
    PublicKey::from_bytes(&bytes).expect("derived key is well formed")
}
