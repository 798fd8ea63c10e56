//! Core type definitions for Inner Ring contracts.
//!
//! - Identifier types (`Epoch`)
//! - Node identities (`PublicKey`) and account addresses (`ScriptHash`)
//! - Native assets handled by the asset oracle

use std::fmt;

use serde::{Deserialize, Serialize};
use snafu::Snafu;

// ============================================================================
// Identifier Types
// ============================================================================

/// Generates a newtype wrapper around a numeric type for type-safe identifiers.
///
/// Each generated type provides:
/// - Standard derives: Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord
/// - Serde with `#[serde(transparent)]` for wire format compatibility
/// - `From<inner>` and `Into<inner>` conversions
/// - `Display` with a semantic prefix (e.g., `epoch:42`)
/// - `new()` constructor and `value()` accessor
macro_rules! define_id {
    (
        $(#[$meta:meta])*
        $name:ident, $inner:ty, $prefix:expr
    ) => {
        $(#[$meta])*
        #[derive(
            Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord,
            Serialize, Deserialize,
        )]
        #[serde(transparent)]
        pub struct $name($inner);

        impl $name {
            /// Creates a new identifier from a raw value.
            #[inline]
            pub const fn new(value: $inner) -> Self {
                Self(value)
            }

            /// Returns the raw numeric value.
            #[inline]
            pub const fn value(self) -> $inner {
                self.0
            }
        }

        impl From<$inner> for $name {
            #[inline]
            fn from(value: $inner) -> Self {
                Self(value)
            }
        }

        impl From<$name> for $inner {
            #[inline]
            fn from(id: $name) -> Self {
                id.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}:{}", $prefix, self.0)
            }
        }

        impl std::str::FromStr for $name {
            type Err = <$inner as std::str::FromStr>::Err;

            fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
                s.parse::<$inner>().map(Self)
            }
        }
    };
}

define_id!(
    /// Governance period identifier.
    ///
    /// Advanced by the netmap contract; scopes stored records and invalidates
    /// ballots cast for earlier periods.
    ///
    /// # Display
    ///
    /// Formats with `epoch:` prefix: `epoch:42`.
    Epoch, i64, "epoch"
);

// ============================================================================
// Identities
// ============================================================================

/// Length of a compressed public key in bytes.
pub const PUBLIC_KEY_LEN: usize = 33;

/// Length of a script hash (account or contract address) in bytes.
pub const SCRIPT_HASH_LEN: usize = 20;

/// Error returned when raw bytes do not form a valid identity.
#[derive(Debug, Clone, PartialEq, Eq, Snafu)]
pub enum IdentityError {
    /// Public key has the wrong length.
    #[snafu(display("public key must be 33 bytes, got {len}"))]
    KeyLength {
        /// Observed length.
        len: usize,
    },

    /// Public key does not start with a compressed point prefix.
    #[snafu(display("public key prefix must be 0x02 or 0x03, got {prefix:#04x}"))]
    KeyPrefix {
        /// Observed first byte.
        prefix: u8,
    },

    /// Script hash has the wrong length.
    #[snafu(display("script hash must be 20 bytes, got {len}"))]
    ScriptHashLength {
        /// Observed length.
        len: usize,
    },
}

/// Compressed public key of an Inner Ring node.
///
/// Only the shape is validated here. Whether the key belongs to the current
/// roster, and whether the transaction carries its witness, is decided by the
/// host oracles.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "Vec<u8>", into = "Vec<u8>")]
pub struct PublicKey(Vec<u8>);

impl PublicKey {
    /// Validates and wraps a compressed public key.
    ///
    /// # Errors
    ///
    /// Returns [`IdentityError::KeyLength`] or [`IdentityError::KeyPrefix`]
    /// if the bytes are not a 33-byte compressed point encoding.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, IdentityError> {
        if bytes.len() != PUBLIC_KEY_LEN {
            return Err(IdentityError::KeyLength { len: bytes.len() });
        }
        if bytes[0] != 0x02 && bytes[0] != 0x03 {
            return Err(IdentityError::KeyPrefix { prefix: bytes[0] });
        }
        Ok(Self(bytes.to_vec()))
    }

    /// Returns the raw key bytes.
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }
}

impl AsRef<[u8]> for PublicKey {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl TryFrom<Vec<u8>> for PublicKey {
    type Error = IdentityError;

    fn try_from(bytes: Vec<u8>) -> Result<Self, Self::Error> {
        Self::from_bytes(&bytes)
    }
}

impl From<PublicKey> for Vec<u8> {
    fn from(key: PublicKey) -> Self {
        key.0
    }
}

impl fmt::Debug for PublicKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "PublicKey({})", hex::encode(&self.0))
    }
}

impl fmt::Display for PublicKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&hex::encode(&self.0))
    }
}

/// 20-byte account or contract address.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ScriptHash([u8; SCRIPT_HASH_LEN]);

impl ScriptHash {
    /// Wraps a fixed-size address.
    pub const fn new(bytes: [u8; SCRIPT_HASH_LEN]) -> Self {
        Self(bytes)
    }

    /// Parses an address from a byte slice.
    ///
    /// # Errors
    ///
    /// Returns [`IdentityError::ScriptHashLength`] if the slice is not 20 bytes.
    pub fn from_slice(bytes: &[u8]) -> Result<Self, IdentityError> {
        let array: [u8; SCRIPT_HASH_LEN] = bytes
            .try_into()
            .map_err(|_| IdentityError::ScriptHashLength { len: bytes.len() })?;
        Ok(Self(array))
    }

    /// Returns the raw address bytes.
    pub const fn as_bytes(&self) -> &[u8; SCRIPT_HASH_LEN] {
        &self.0
    }
}

impl AsRef<[u8]> for ScriptHash {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl fmt::Debug for ScriptHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ScriptHash({})", hex::encode(self.0))
    }
}

impl fmt::Display for ScriptHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&hex::encode(self.0))
    }
}

// ============================================================================
// Native Assets
// ============================================================================

/// Native assets the asset oracle can move.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Asset {
    /// Utility token used to pay for transactions.
    Gas,
    /// Governance token; holders vote for the committee.
    Neo,
}

impl fmt::Display for Asset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Asset::Gas => f.write_str("GAS"),
            Asset::Neo => f.write_str("NEO"),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::disallowed_methods)]
mod tests {
    use super::*;

    fn key_bytes(prefix: u8, fill: u8) -> Vec<u8> {
        let mut bytes = vec![fill; PUBLIC_KEY_LEN];
        bytes[0] = prefix;
        bytes
    }

    #[test]
    fn test_epoch_display_and_parse() {
        let epoch = Epoch::new(42);
        assert_eq!(epoch.to_string(), "epoch:42");
        assert_eq!("42".parse::<Epoch>().unwrap(), epoch);
        assert_eq!(i64::from(epoch), 42);
    }

    #[test]
    fn test_epoch_ordering() {
        assert!(Epoch::new(-1) < Epoch::new(0));
        assert!(Epoch::new(4) < Epoch::new(5));
    }

    #[test]
    fn test_public_key_validation() {
        assert!(PublicKey::from_bytes(&key_bytes(0x02, 7)).is_ok());
        assert!(PublicKey::from_bytes(&key_bytes(0x03, 7)).is_ok());
        assert_eq!(
            PublicKey::from_bytes(&key_bytes(0x04, 7)),
            Err(IdentityError::KeyPrefix { prefix: 0x04 })
        );
        assert_eq!(PublicKey::from_bytes(&[0x02; 32]), Err(IdentityError::KeyLength { len: 32 }));
    }

    #[test]
    fn test_public_key_serde_rejects_invalid_bytes() {
        let bad = crate::codec::encode(&vec![0x05u8; PUBLIC_KEY_LEN]).unwrap();
        assert!(crate::codec::decode::<PublicKey>(&bad).is_err());

        let key = PublicKey::from_bytes(&key_bytes(0x02, 1)).unwrap();
        let good = crate::codec::encode(&key).unwrap();
        assert_eq!(crate::codec::decode::<PublicKey>(&good).unwrap(), key);
    }

    #[test]
    fn test_script_hash_from_slice() {
        let hash = ScriptHash::from_slice(&[0xAB; SCRIPT_HASH_LEN]).unwrap();
        assert_eq!(hash.to_string(), "ab".repeat(SCRIPT_HASH_LEN));
        assert_eq!(
            ScriptHash::from_slice(&[0u8; 19]),
            Err(IdentityError::ScriptHashLength { len: 19 })
        );
    }
}
