//! Proptest strategies for Inner Ring domain types.
//!
//! # Usage
//!
//! ```no_run
//! use innerring_test_utils::strategies;
//! use proptest::prelude::*;
//!
//! proptest! {
//!     #[test]
//!     fn keys_sort_by_epoch(epoch in strategies::arb_epoch()) {
//!         // ...
//!     }
//! }
//! ```

// Test utilities are expected to panic on failure
#![allow(clippy::expect_used)]

use innerring_types::{Epoch, PUBLIC_KEY_LEN, PublicKey};
use proptest::prelude::*;

use crate::TestAuditResult;

/// Any epoch, including negative ones.
pub fn arb_epoch() -> impl Strategy<Value = Epoch> {
    any::<i64>().prop_map(Epoch::new)
}

/// Epochs an audit result can carry (non-negative).
pub fn arb_audit_epoch() -> impl Strategy<Value = Epoch> {
    (0..=i64::MAX).prop_map(Epoch::new)
}

/// Well-formed compressed public key.
pub fn arb_public_key() -> impl Strategy<Value = PublicKey> {
    (prop::bool::ANY, prop::array::uniform32(any::<u8>())).prop_map(|(odd, body)| {
        let mut bytes = Vec::with_capacity(PUBLIC_KEY_LEN);
        bytes.push(if odd { 0x03 } else { 0x02 });
        bytes.extend_from_slice(&body);
        PublicKey::try_from(bytes).expect("33 bytes with a valid prefix")
    })
}

/// 32-byte container identifier.
pub fn arb_container_id() -> impl Strategy<Value = Vec<u8>> {
    prop::collection::vec(any::<u8>(), 32)
}

/// Variable-width scope (peer or container identifier).
pub fn arb_scope() -> impl Strategy<Value = Vec<u8>> {
    prop::collection::vec(any::<u8>(), 0..48)
}

/// Audit result with random header fields and payload.
pub fn arb_audit_result() -> impl Strategy<Value = TestAuditResult> {
    (
        prop::collection::vec(any::<u8>(), 0..16),
        arb_audit_epoch(),
        prop::collection::vec(any::<u8>(), 0..=64),
        arb_public_key(),
        prop::collection::vec(any::<u8>(), 0..64),
    )
        .prop_map(|(version, epoch, container_id, from, payload)| TestAuditResult {
            version,
            epoch,
            container_id,
            from,
            payload,
        })
}
