//! Hashing helpers for Inner Ring contracts.
//!
//! All content hashing uses SHA-256:
//! - Ballot identifiers (epoch + proposal fingerprint)
//! - Origin identity prefixes inside audit keys
//! - Proposal fingerprints built from candidate lists

use sha2::{Digest, Sha256};
use subtle::ConstantTimeEq;

/// SHA-256 hash output (32 bytes).
pub type Hash = [u8; 32];

/// Compute SHA-256 hash of arbitrary data.
#[inline]
pub fn sha256(data: &[u8]) -> Hash {
    let mut hasher = Sha256::new();
    hasher.update(data);
    hasher.finalize().into()
}

/// Compute SHA-256 over the concatenation of several byte slices.
///
/// Equivalent to `sha256(&[a, b, ...].concat())` without the intermediate buffer.
pub fn sha256_concat<T: AsRef<[u8]>>(parts: &[T]) -> Hash {
    let mut hasher = Sha256::new();
    for part in parts {
        hasher.update(part.as_ref());
    }
    hasher.finalize().into()
}

/// Constant-time comparison of byte strings of possibly different length.
///
/// Used for roster membership checks on public keys.
#[inline]
pub fn bytes_eq(a: &[u8], b: &[u8]) -> bool {
    a.len() == b.len() && bool::from(a.ct_eq(b))
}
