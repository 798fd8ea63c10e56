//! Serialized audit results for tests.

// Test utilities are expected to panic on failure
#![allow(clippy::expect_used)]

use innerring_state::{AuditHeader, encode_audit_result};
use innerring_types::{Epoch, PublicKey};

/// Audit result fields that the contract reads, plus an opaque payload.
///
/// # Example
///
/// ```
/// use innerring_test_utils::{KeyRing, TestAuditResult};
/// use innerring_types::Epoch;
///
/// let ring = KeyRing::new(1);
/// let raw = TestAuditResult::builder()
///     .epoch(Epoch::new(5))
///     .container_id(vec![0xC1; 32])
///     .from(ring.key(0).clone())
///     .build()
///     .encode();
/// ```
#[derive(Debug, Clone, bon::Builder)]
pub struct TestAuditResult {
    /// Version field, skipped by the reader.
    #[builder(default = vec![0x08, 0x02, 0x10, 0x0B])]
    pub version: Vec<u8>,
    /// Audit epoch.
    pub epoch: Epoch,
    /// Audited container.
    #[builder(default = vec![0xC0; 32])]
    pub container_id: Vec<u8>,
    /// Publishing Inner Ring node.
    pub from: PublicKey,
    /// Remaining message bytes, ignored by the reader.
    #[builder(default = b"pass:ok".to_vec())]
    pub payload: Vec<u8>,
}

impl TestAuditResult {
    /// Header the contract should recover from [`encode`](Self::encode).
    #[must_use]
    pub fn header(&self) -> AuditHeader {
        AuditHeader {
            epoch: self.epoch,
            container_id: self.container_id.clone(),
            from: self.from.clone(),
        }
    }

    /// Serialized result.
    ///
    /// # Panics
    ///
    /// Panics if the version or container id does not fit a one-byte length,
    /// or the epoch is negative.
    #[must_use]
    pub fn encode(&self) -> Vec<u8> {
        encode_audit_result(&self.version, &self.header(), &self.payload)
            .expect("audit result fields fit the header layout")
    }
}
