//! Postcard encoding of stored contract values.
//!
//! Contract values that have structure of their own (vote tallies, reputation
//! value lists, deployed configuration) are stored as postcard bytes. Keys are
//! never postcard-encoded; see the key codec in `innerring-state`.
//!
//! Errors name the Rust type involved, so a corrupt tally and a corrupt
//! configuration value are told apart in logs.

use std::any::type_name;

use serde::{Serialize, de::DeserializeOwned};
use snafu::{ResultExt, Snafu};

/// Error from encoding or decoding a stored value.
#[derive(Debug, Snafu)]
pub enum CodecError {
    /// A value could not be serialized.
    #[snafu(display("Cannot encode {value_type}: {source}"))]
    Encode {
        /// Type being written.
        value_type: &'static str,
        /// The underlying postcard error.
        source: postcard::Error,
    },

    /// Stored bytes are not a valid value of the expected type.
    #[snafu(display("Cannot decode {value_type} from {len} stored bytes: {source}"))]
    Decode {
        /// Type being read.
        value_type: &'static str,
        /// Length of the stored bytes.
        len: usize,
        /// The underlying postcard error.
        source: postcard::Error,
    },
}

/// Serializes a contract value for storage.
///
/// # Errors
///
/// Returns [`CodecError::Encode`] if postcard rejects the value.
pub fn encode<T: Serialize>(value: &T) -> Result<Vec<u8>, CodecError> {
    postcard::to_allocvec(value).context(EncodeSnafu { value_type: type_name::<T>() })
}

/// Reads a contract value back from its stored bytes.
///
/// Trailing bytes after a complete value are ignored.
///
/// # Errors
///
/// Returns [`CodecError::Decode`] if the bytes are truncated or do not
/// describe a `T`.
pub fn decode<T: DeserializeOwned>(bytes: &[u8]) -> Result<T, CodecError> {
    postcard::from_bytes(bytes)
        .context(DecodeSnafu { value_type: type_name::<T>(), len: bytes.len() })
}
