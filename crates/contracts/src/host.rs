//! Seams to the host ledger.
//!
//! Contracts never talk to the chain directly. Everything they learn about
//! the current transaction, the network and native assets comes through the
//! three oracle traits bundled in [`Env`]:
//!
//! - [`Witness`] - who signed the current transaction
//! - [`NetworkState`] - current epoch and the Alphabet / Inner Ring rosters
//! - [`AssetLedger`] - GAS and NEO balances, transfers and committee votes
//!
//! All methods take `&self`; implementations use interior mutability where
//! they record effects.

use innerring_types::{Asset, Epoch, PublicKey, SCRIPT_HASH_LEN, ScriptHash, sha256_concat};

/// Witness oracle for the current transaction.
pub trait Witness {
    /// Whether the transaction carries a signature of `key`.
    fn check_witness(&self, key: &PublicKey) -> bool;

    /// Whether the transaction is authorized by `account`, for example a
    /// multisignature committee account.
    fn check_account(&self, account: &ScriptHash) -> bool;
}

/// Network view maintained outside the contracts.
pub trait NetworkState {
    /// Epoch currently published by the netmap contract.
    fn current_epoch(&self) -> Epoch;

    /// Alphabet (governing subset of the Inner Ring), in designation order.
    fn alphabet(&self) -> Vec<PublicKey>;

    /// Full Inner Ring roster.
    fn inner_ring(&self) -> Vec<PublicKey>;
}

/// Native asset oracle.
pub trait AssetLedger {
    /// Balance of `account` in `asset`.
    fn balance_of(&self, asset: Asset, account: &ScriptHash) -> u64;

    /// Moves `amount` of `asset`. Returns `false` if the ledger refused.
    fn transfer(&self, asset: Asset, from: &ScriptHash, to: &ScriptHash, amount: u64) -> bool;

    /// Casts the committee vote of `account` for `candidate`.
    /// Returns `false` if the ledger refused.
    fn vote(&self, account: &ScriptHash, candidate: &PublicKey) -> bool;

    /// Contract address of a native asset.
    fn asset_hash(&self, asset: Asset) -> ScriptHash;
}

/// Oracles available to one contract invocation.
#[derive(Clone, Copy)]
pub struct Env<'a> {
    /// Signatures of the current transaction.
    pub witness: &'a dyn Witness,
    /// Epoch and rosters.
    pub network: &'a dyn NetworkState,
    /// Native assets.
    pub assets: &'a dyn AssetLedger,
}

impl<'a> Env<'a> {
    /// Uses one host value for all three oracles.
    pub fn from_host<H>(host: &'a H) -> Self
    where
        H: Witness + NetworkState + AssetLedger,
    {
        Self { witness: host, network: host, assets: host }
    }
}

const STANDARD_ACCOUNT_TAG: &[u8] = b"standard";
const MULTISIG_ACCOUNT_TAG: &[u8] = b"multisig";

fn account_from(hash: &[u8]) -> ScriptHash {
    let mut bytes = [0u8; SCRIPT_HASH_LEN];
    bytes.copy_from_slice(&hash[..SCRIPT_HASH_LEN]);
    ScriptHash::new(bytes)
}

/// Single-signature account controlled by `key`.
pub fn standard_account(key: &PublicKey) -> ScriptHash {
    account_from(&sha256_concat(&[STANDARD_ACCOUNT_TAG, key.as_bytes()]))
}

/// `threshold`-of-`keys` multisignature account.
///
/// Keys are sorted first, so the account does not depend on roster order.
pub fn multisig_account(keys: &[PublicKey], threshold: usize) -> ScriptHash {
    let mut sorted: Vec<&PublicKey> = keys.iter().collect();
    sorted.sort();

    let threshold = (threshold as u64).to_be_bytes();
    let mut parts: Vec<&[u8]> = Vec::with_capacity(sorted.len() + 2);
    parts.push(MULTISIG_ACCOUNT_TAG);
    parts.push(&threshold);
    parts.extend(sorted.iter().map(|key| key.as_bytes()));
    account_from(&sha256_concat(&parts))
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::disallowed_methods)]
mod tests {
    use super::*;

    fn key(seed: u8) -> PublicKey {
        let mut bytes = [seed; 33];
        bytes[0] = 0x03;
        PublicKey::from_bytes(&bytes).unwrap()
    }

    #[test]
    fn test_multisig_ignores_key_order() {
        let forward = multisig_account(&[key(1), key(2), key(3)], 3);
        let shuffled = multisig_account(&[key(3), key(1), key(2)], 3);
        assert_eq!(forward, shuffled);
    }

    #[test]
    fn test_multisig_depends_on_threshold_and_members() {
        let base = multisig_account(&[key(1), key(2), key(3)], 3);
        assert_ne!(base, multisig_account(&[key(1), key(2), key(3)], 2));
        assert_ne!(base, multisig_account(&[key(1), key(2), key(4)], 3));
    }

    #[test]
    fn test_standard_account_differs_from_single_key_multisig() {
        assert_ne!(standard_account(&key(1)), multisig_account(&[key(1)], 1));
        assert_ne!(standard_account(&key(1)), standard_account(&key(2)));
    }
}
