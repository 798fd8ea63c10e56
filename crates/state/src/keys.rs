//! Composite key encoding for contract records.
//!
//! Records are addressed by keys built from coarsest to finest component so
//! that every prefix of a key is itself a valid scan prefix:
//!
//! Key format: {epoch:8}{scope:var}{identity_prefix:24}?
//!
//! - `epoch` is the store's native integer encoding: the two's complement
//!   value with the sign bit flipped, big-endian. Lexicographic byte order of
//!   the encoding equals numeric order of the epoch, including negatives, so
//!   an epoch prefix scan returns exactly that epoch's records.
//! - `scope` is a container or peer identifier, copied verbatim.
//! - `identity_prefix` is the first 24 bytes of SHA-256 of the publisher's
//!   public key. An audit key is then 8 + 32 + 24 = 64 bytes for a 32-byte
//!   container id.
//!
//! Administrative keys (owner, configuration, ballots) share the namespace
//! and are filtered out of listings with a [`KeyFilter`].

use innerring_types::{Epoch, PublicKey, sha256};
use snafu::{Snafu, ensure};

use crate::engine::{KvStore, StoreError};

/// Width of the encoded epoch segment.
pub const EPOCH_LEN: usize = 8;

/// Width of the truncated identity hash segment.
pub const IDENTITY_PREFIX_LEN: usize = 24;

/// Key budget of an audit record key with a 32-byte container id.
pub const MAX_RECORD_KEY_LEN: usize = 64;

const SIGN_BIT: u64 = 1 << 63;

/// Error returned when a stored key does not follow the record layout.
#[derive(Debug, Clone, PartialEq, Eq, Snafu)]
pub enum KeyError {
    /// Key is shorter than the epoch segment.
    #[snafu(display("record key is {len} bytes, shorter than the 8-byte epoch"))]
    TooShort {
        /// Observed key length.
        len: usize,
    },
}

/// Encodes an epoch as the fixed-width, order-preserving key segment.
#[inline]
pub fn encode_epoch(epoch: Epoch) -> [u8; EPOCH_LEN] {
    ((epoch.value() as u64) ^ SIGN_BIT).to_be_bytes()
}

/// Decodes the epoch segment at the start of `bytes`.
///
/// # Errors
///
/// Returns [`KeyError::TooShort`] if fewer than 8 bytes are available.
pub fn decode_epoch(bytes: &[u8]) -> Result<Epoch, KeyError> {
    let segment: [u8; EPOCH_LEN] = bytes
        .get(..EPOCH_LEN)
        .and_then(|s| s.try_into().ok())
        .ok_or(KeyError::TooShort { len: bytes.len() })?;
    Ok(Epoch::new((u64::from_be_bytes(segment) ^ SIGN_BIT) as i64))
}

/// Returns the 24-byte hash prefix that stands for `key` inside record keys.
pub fn identity_prefix(key: &PublicKey) -> [u8; IDENTITY_PREFIX_LEN] {
    let hash = sha256(key.as_bytes());
    let mut prefix = [0u8; IDENTITY_PREFIX_LEN];
    prefix.copy_from_slice(&hash[..IDENTITY_PREFIX_LEN]);
    prefix
}

/// Encodes a record key.
///
/// Format: {epoch:8}{scope:var}{identity_prefix:24}?
pub fn encode_record_key(epoch: Epoch, scope: &[u8], identity: Option<&PublicKey>) -> Vec<u8> {
    let identity_len = if identity.is_some() { IDENTITY_PREFIX_LEN } else { 0 };
    let mut key = Vec::with_capacity(EPOCH_LEN + scope.len() + identity_len);
    key.extend_from_slice(&encode_epoch(epoch));
    key.extend_from_slice(scope);
    if let Some(identity) = identity {
        key.extend_from_slice(&identity_prefix(identity));
    }
    key
}

/// Creates a prefix for scanning all records of an epoch, optionally
/// narrowed to one scope.
pub fn scan_prefix(epoch: Epoch, scope: Option<&[u8]>) -> Vec<u8> {
    encode_record_key(epoch, scope.unwrap_or_default(), None)
}

/// Decoded record key: the epoch plus everything after it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordKey {
    /// Epoch the record belongs to.
    pub epoch: Epoch,
    /// Scope bytes followed by the identity prefix, if any.
    pub remainder: Vec<u8>,
}

/// Splits a record key into its epoch and remainder.
///
/// The scope width is not encoded in the key, so the remainder is returned
/// undivided; callers that know the scope width split it themselves.
///
/// # Errors
///
/// Returns [`KeyError::TooShort`] if the key has no complete epoch segment.
pub fn decode_record_key(key: &[u8]) -> Result<RecordKey, KeyError> {
    ensure!(key.len() >= EPOCH_LEN, TooShortSnafu { len: key.len() });
    let epoch = decode_epoch(key)?;
    Ok(RecordKey { epoch, remainder: key[EPOCH_LEN..].to_vec() })
}

/// Administrative keys that share a contract namespace with its records.
///
/// A key is administrative if it equals one of `exact` or starts with one of
/// `reserved_prefixes`.
#[derive(Debug, Clone, Copy, Default)]
pub struct KeyFilter {
    exact: &'static [&'static [u8]],
    reserved_prefixes: &'static [&'static [u8]],
}

impl KeyFilter {
    /// Creates a filter from exact administrative keys and reserved prefixes.
    pub const fn new(
        exact: &'static [&'static [u8]],
        reserved_prefixes: &'static [&'static [u8]],
    ) -> Self {
        Self { exact, reserved_prefixes }
    }

    /// Whether `key` is administrative and must be hidden from listings.
    pub fn is_admin(&self, key: &[u8]) -> bool {
        self.exact.iter().any(|admin| *admin == key)
            || self.reserved_prefixes.iter().any(|prefix| key.starts_with(prefix))
    }
}

/// Lists record keys under `prefix`, hiding administrative keys.
///
/// Uses the store's keys-only scan; values are never read.
///
/// # Errors
///
/// Returns [`StoreError`] if the scan fails.
pub fn list_keys<S: KvStore + ?Sized>(
    store: &S,
    prefix: &[u8],
    filter: &KeyFilter,
) -> Result<Vec<Vec<u8>>, StoreError> {
    let mut keys = store.scan_keys(prefix)?;
    keys.retain(|key| !filter.is_admin(key));
    Ok(keys)
}
