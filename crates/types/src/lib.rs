//! Core types, errors, and hashing primitives for Inner Ring contracts.
//!
//! This crate provides the foundational types used by the state and contract
//! crates:
//! - Identifier types (`Epoch`) and identities (`PublicKey`, `ScriptHash`)
//! - SHA-256 helpers and constant-time comparisons
//! - Postcard codec for structured stored values
//! - Stable error codes
//! - Deployment configuration with validating builders

#![deny(unsafe_code)]

pub mod codec;
pub mod config;
pub mod error;
pub mod hash;
pub mod types;

// Re-export commonly used types at crate root
pub use codec::{CodecError, decode, encode};
pub use error::ErrorCode;
pub use hash::{Hash, bytes_eq, sha256, sha256_concat};
pub use types::*;
