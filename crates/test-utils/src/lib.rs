//! Shared test utilities for Inner Ring contract crates.
//!
//! - [`TestHost`] - scriptable host ledger implementing every contract oracle
//! - [`KeyRing`] - deterministic node keys
//! - [`TestAuditResult`] - serialized audit results with known header fields
//! - [`TestDir`] - temporary directory for persistent contract stores
//! - [`strategies`] - proptest generators for domain types

#![deny(unsafe_code)]
// Test utilities are allowed to use unwrap for simplicity
#![cfg_attr(test, allow(clippy::disallowed_methods))]

mod audit;
pub use audit::TestAuditResult;

mod host;
pub use host::{GAS_HASH, NEO_HASH, TestHost, Transfer};

mod keys;
pub use keys::{KeyRing, node_key};

pub mod strategies;

mod test_dir;
pub use test_dir::TestDir;

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use innerring_contracts::{AssetLedger, NetworkState, Witness};
    use innerring_state::{KvStore, decode_audit_header};
    use innerring_types::{Asset, Epoch, ScriptHash};
    use proptest::prelude::*;

    use super::*;

    // ============================================
    // TestDir tests
    // ============================================

    #[test]
    fn test_dir_store_persists_between_opens() {
        let dir = TestDir::new();
        {
            let store = dir.open_store("audit");
            store.put(b"key", b"value").unwrap();
        }
        let store = dir.open_store("audit");
        assert_eq!(store.get(b"key").unwrap(), Some(b"value".to_vec()));
        assert!(dir.store_path("audit").exists());
    }

    #[test]
    fn test_dir_cleanup_on_drop() {
        let path = {
            let dir = TestDir::new();
            let _store = dir.open_store("reputation");
            dir.path().to_path_buf()
        };
        assert!(!path.exists(), "temp directory should be cleaned up on drop");
    }

    // ============================================
    // KeyRing tests
    // ============================================

    #[test]
    fn test_key_ring_is_deterministic() {
        let a = KeyRing::new(4);
        let b = KeyRing::new(4);
        assert_eq!(a.keys(), b.keys());
        assert_eq!(a.key(3), &node_key(3));
        assert_ne!(a.key(0), a.key(1));
        assert_eq!(a.first(2).len(), 2);
    }

    // ============================================
    // TestHost tests
    // ============================================

    #[test]
    fn test_host_signers_switch() {
        let ring = KeyRing::new(2);
        let host = TestHost::with_alphabet(ring.first(2));
        host.sign_as(ring.key(0));
        assert!(host.check_witness(ring.key(0)));
        assert!(!host.check_witness(ring.key(1)));

        host.sign_with_account(ScriptHash::new([7; 20]));
        assert!(!host.check_witness(ring.key(0)));
        assert!(host.check_account(&ScriptHash::new([7; 20])));
        assert_eq!(host.inner_ring(), host.alphabet());
    }

    #[test]
    fn test_host_neo_transfer_claims_gas() {
        let host = TestHost::new();
        let account = ScriptHash::new([1; 20]);
        host.mint(Asset::Neo, account, 100);
        host.accrue_gas(account, 40);

        assert!(host.transfer(Asset::Neo, &account, &account, 100));
        assert_eq!(host.balance(Asset::Neo, &account), 100);
        assert_eq!(host.balance(Asset::Gas, &account), 40);
        assert!(!host.transfer(Asset::Gas, &account, &ScriptHash::new([2; 20]), 41));
    }

    #[test]
    fn test_host_refusals() {
        let host = TestHost::new();
        let from = ScriptHash::new([1; 20]);
        let to = ScriptHash::new([2; 20]);
        host.mint(Asset::Gas, from, 10);
        host.refuse_transfers_to(to);
        assert!(!host.transfer(Asset::Gas, &from, &to, 1));
        assert!(host.transfers().is_empty());

        host.refuse_votes();
        assert!(!host.vote(&from, &node_key(0)));
        host.set_epoch(Epoch::new(3));
        assert_eq!(host.current_epoch(), Epoch::new(3));
    }

    // ============================================
    // TestAuditResult tests
    // ============================================

    #[test]
    fn test_audit_result_defaults_decode() {
        let result = TestAuditResult::builder().epoch(Epoch::new(5)).from(node_key(1)).build();
        assert_eq!(decode_audit_header(&result.encode()).unwrap(), result.header());
    }

    proptest! {
        #[test]
        fn prop_generated_audit_results_decode(result in strategies::arb_audit_result()) {
            let decoded = decode_audit_header(&result.encode()).unwrap();
            prop_assert_eq!(decoded, result.header());
        }
    }
}
