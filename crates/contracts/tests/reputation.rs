//! Reputation contract: Alphabet-gated value publication.

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::disallowed_methods)]

use innerring_contracts::{ContractError, Reputation, VoteOutcome, multisig_account};
use innerring_state::{InMemoryStore, KvStore, encode_record_key};
use innerring_test_utils::{KeyRing, TestHost, strategies};
use innerring_types::{Epoch, ErrorCode, ScriptHash, config::ReputationConfig};
use proptest::prelude::*;

const PEER: &[u8] = b"peer-7f3a";

fn deploy(notary_disabled: bool) -> Reputation<InMemoryStore> {
    let config = ReputationConfig::builder()
        .notary_disabled(notary_disabled)
        .owner(ScriptHash::new([0x0A; 20]))
        .build()
        .unwrap();
    Reputation::deploy(InMemoryStore::new(), config).unwrap()
}

fn host(ring: &KeyRing, epoch: i64) -> TestHost {
    let host = TestHost::with_alphabet(ring.keys().to_vec());
    host.set_epoch(Epoch::new(epoch));
    host
}

#[test]
fn test_value_stored_once_alphabet_agrees() {
    let ring = KeyRing::new(4);
    let host = host(&ring, 12);
    let env = host.env();
    let reputation = deploy(true);

    for (node, votes) in [(0, 1), (1, 2)] {
        host.sign_as(ring.key(node));
        assert_eq!(
            reputation.put(&env, Epoch::new(12), PEER, b"0.75").unwrap(),
            VoteOutcome::Pending { votes, required: 3 }
        );
        assert!(reputation.get(Epoch::new(12), PEER).unwrap().is_empty());
    }

    host.sign_as(ring.key(3));
    assert_eq!(reputation.put(&env, Epoch::new(12), PEER, b"0.75").unwrap(), VoteOutcome::Accepted);
    assert_eq!(reputation.get(Epoch::new(12), PEER).unwrap(), vec![b"0.75".to_vec()]);

    // Late vote after settlement opens a new ballot instead of appending again.
    host.sign_as(ring.key(2));
    assert!(!reputation.put(&env, Epoch::new(12), PEER, b"0.75").unwrap().is_accepted());
    assert_eq!(reputation.get(Epoch::new(12), PEER).unwrap().len(), 1);
}

#[test]
fn test_values_append_in_acceptance_order() {
    let ring = KeyRing::new(1);
    let host = host(&ring, 3);
    let env = host.env();
    let reputation = deploy(true);
    host.sign_as(ring.key(0));

    reputation.put(&env, Epoch::new(3), PEER, b"first").unwrap();
    reputation.put(&env, Epoch::new(3), PEER, b"second").unwrap();

    let id = encode_record_key(Epoch::new(3), PEER, None);
    assert_eq!(reputation.get_by_id(&id).unwrap(), vec![b"first".to_vec(), b"second".to_vec()]);
    assert_eq!(reputation.list_by_epoch(Epoch::new(3)).unwrap(), vec![id]);
}

#[test]
fn test_listing_hides_pending_ballots() {
    let ring = KeyRing::new(4);
    let host = host(&ring, 5);
    let env = host.env();
    let reputation = deploy(true);

    host.sign_as(ring.key(0));
    reputation.put(&env, Epoch::new(5), PEER, b"pending").unwrap();
    assert!(!reputation.store().scan_keys(b"ballot:").unwrap().is_empty());

    assert!(reputation.list_by_epoch(Epoch::new(5)).unwrap().is_empty());
}

#[test]
fn test_notary_mode_uses_committee_account() {
    let ring = KeyRing::new(4);
    let host = host(&ring, 8);
    let env = host.env();
    let reputation = deploy(false);

    host.sign_as(ring.key(0));
    let err = reputation.put(&env, Epoch::new(8), PEER, b"1.0").unwrap_err();
    assert!(matches!(err, ContractError::UnauthorizedPublisher));

    host.sign_with_account(multisig_account(ring.keys(), 3));
    assert_eq!(reputation.put(&env, Epoch::new(8), PEER, b"1.0").unwrap(), VoteOutcome::Accepted);
    assert_eq!(reputation.get(Epoch::new(8), PEER).unwrap(), vec![b"1.0".to_vec()]);
}

#[test]
fn test_rejections_leave_namespace_untouched() {
    let ring = KeyRing::new(3);
    let host = host(&ring, 8);
    let env = host.env();
    let reputation = deploy(true);
    let keys_before = reputation.store().len();

    host.sign_as(ring.key(0));
    let err = reputation.put(&env, Epoch::new(7), PEER, b"0.1").unwrap_err();
    assert_eq!(err.code(), ErrorCode::InvalidEpoch);

    host.sign_as(KeyRing::new(5).key(4));
    let err = reputation.put(&env, Epoch::new(8), PEER, b"0.1").unwrap_err();
    assert_eq!(err.code(), ErrorCode::UnauthorizedPublisher);

    assert_eq!(reputation.store().len(), keys_before);
}

proptest! {
    #[test]
    fn prop_put_accepts_only_non_negative_current_epoch(
        epoch in strategies::arb_epoch(),
        peer in strategies::arb_scope(),
    ) {
        let ring = KeyRing::new(1);
        let host = host(&ring, epoch.value());
        let env = host.env();
        let reputation = deploy(true);
        let keys_before = reputation.store().len();
        host.sign_as(ring.key(0));

        let result = reputation.put(&env, epoch, &peer, b"0.5");
        if epoch.value() < 0 {
            prop_assert_eq!(result.unwrap_err().code(), ErrorCode::InvalidEpoch);
            prop_assert_eq!(reputation.store().len(), keys_before);
        } else {
            prop_assert_eq!(result.unwrap(), VoteOutcome::Accepted);
            prop_assert_eq!(reputation.get(epoch, &peer).unwrap(), vec![b"0.5".to_vec()]);
            prop_assert_eq!(
                reputation.list_by_epoch(epoch).unwrap(),
                vec![encode_record_key(epoch, &peer, None)]
            );
        }
    }
}
