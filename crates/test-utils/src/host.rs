//! Scriptable host ledger for contract tests.
//!
//! [`TestHost`] implements every oracle in
//! [`innerring_contracts::host`] over shared, lock-protected state, so tests
//! can switch signers between invocations, move the epoch, fund accounts and
//! inspect the transfers and votes a contract performed.

use std::collections::{HashMap, HashSet};

use innerring_contracts::{AssetLedger, Env, NetworkState, Witness};
use innerring_types::{Asset, Epoch, PublicKey, ScriptHash};
use parking_lot::Mutex;

/// Address of the native GAS contract on the test host.
pub const GAS_HASH: ScriptHash = ScriptHash::new([0x6A; 20]);

/// Address of the native NEO contract on the test host.
pub const NEO_HASH: ScriptHash = ScriptHash::new([0x4E; 20]);

/// One recorded asset movement.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transfer {
    /// Asset moved.
    pub asset: Asset,
    /// Sender.
    pub from: ScriptHash,
    /// Recipient.
    pub to: ScriptHash,
    /// Amount moved.
    pub amount: u64,
}

struct HostState {
    epoch: Epoch,
    alphabet: Vec<PublicKey>,
    inner_ring: Vec<PublicKey>,
    witnesses: HashSet<PublicKey>,
    accounts: HashSet<ScriptHash>,
    balances: HashMap<(Asset, ScriptHash), u64>,
    unclaimed_gas: HashMap<ScriptHash, u64>,
    refused: HashSet<ScriptHash>,
    refuse_votes: bool,
    transfers: Vec<Transfer>,
    votes: Vec<(ScriptHash, PublicKey)>,
}

/// In-process host ledger.
pub struct TestHost {
    state: Mutex<HostState>,
}

impl TestHost {
    /// Creates a host at epoch 0 with empty rosters and no signers.
    #[must_use]
    pub fn new() -> Self {
        Self {
            state: Mutex::new(HostState {
                epoch: Epoch::new(0),
                alphabet: Vec::new(),
                inner_ring: Vec::new(),
                witnesses: HashSet::new(),
                accounts: HashSet::new(),
                balances: HashMap::new(),
                unclaimed_gas: HashMap::new(),
                refused: HashSet::new(),
                refuse_votes: false,
                transfers: Vec::new(),
                votes: Vec::new(),
            }),
        }
    }

    /// Creates a host where the Alphabet is also the whole Inner Ring.
    #[must_use]
    pub fn with_alphabet(alphabet: Vec<PublicKey>) -> Self {
        let host = Self::new();
        host.set_inner_ring(alphabet.clone());
        host.set_alphabet(alphabet);
        host
    }

    /// Oracles backed by this host.
    pub fn env(&self) -> Env<'_> {
        Env::from_host(self)
    }

    /// Moves the network to `epoch`.
    pub fn set_epoch(&self, epoch: Epoch) {
        self.state.lock().epoch = epoch;
    }

    /// Replaces the Alphabet roster.
    pub fn set_alphabet(&self, alphabet: Vec<PublicKey>) {
        self.state.lock().alphabet = alphabet;
    }

    /// Replaces the Inner Ring roster.
    pub fn set_inner_ring(&self, inner_ring: Vec<PublicKey>) {
        self.state.lock().inner_ring = inner_ring;
    }

    /// Makes `key` the only signer of the next invocation.
    pub fn sign_as(&self, key: &PublicKey) {
        let mut state = self.state.lock();
        state.accounts.clear();
        state.witnesses.clear();
        state.witnesses.insert(key.clone());
    }

    /// Makes `account` the only authorizing account of the next invocation.
    pub fn sign_with_account(&self, account: ScriptHash) {
        let mut state = self.state.lock();
        state.witnesses.clear();
        state.accounts.clear();
        state.accounts.insert(account);
    }

    /// Removes every signer.
    pub fn clear_signers(&self) {
        let mut state = self.state.lock();
        state.witnesses.clear();
        state.accounts.clear();
    }

    /// Credits `amount` of `asset` to `account`.
    pub fn mint(&self, asset: Asset, account: ScriptHash, amount: u64) {
        *self.state.lock().balances.entry((asset, account)).or_default() += amount;
    }

    /// GAS that `account` receives the next time its NEO moves.
    pub fn accrue_gas(&self, account: ScriptHash, amount: u64) {
        *self.state.lock().unclaimed_gas.entry(account).or_default() += amount;
    }

    /// Current balance.
    #[must_use]
    pub fn balance(&self, asset: Asset, account: &ScriptHash) -> u64 {
        self.state.lock().balances.get(&(asset, *account)).copied().unwrap_or(0)
    }

    /// Refuses every later transfer to `account`.
    pub fn refuse_transfers_to(&self, account: ScriptHash) {
        self.state.lock().refused.insert(account);
    }

    /// Refuses every later committee vote.
    pub fn refuse_votes(&self) {
        self.state.lock().refuse_votes = true;
    }

    /// Successful transfers so far, in order.
    #[must_use]
    pub fn transfers(&self) -> Vec<Transfer> {
        self.state.lock().transfers.clone()
    }

    /// Successful committee votes so far, as `(voting account, candidate)`.
    #[must_use]
    pub fn votes(&self) -> Vec<(ScriptHash, PublicKey)> {
        self.state.lock().votes.clone()
    }
}

impl Default for TestHost {
    fn default() -> Self {
        Self::new()
    }
}

impl Witness for TestHost {
    fn check_witness(&self, key: &PublicKey) -> bool {
        self.state.lock().witnesses.contains(key)
    }

    fn check_account(&self, account: &ScriptHash) -> bool {
        self.state.lock().accounts.contains(account)
    }
}

impl NetworkState for TestHost {
    fn current_epoch(&self) -> Epoch {
        self.state.lock().epoch
    }

    fn alphabet(&self) -> Vec<PublicKey> {
        self.state.lock().alphabet.clone()
    }

    fn inner_ring(&self) -> Vec<PublicKey> {
        self.state.lock().inner_ring.clone()
    }
}

impl AssetLedger for TestHost {
    fn balance_of(&self, asset: Asset, account: &ScriptHash) -> u64 {
        self.balance(asset, account)
    }

    fn transfer(&self, asset: Asset, from: &ScriptHash, to: &ScriptHash, amount: u64) -> bool {
        let mut state = self.state.lock();
        if state.refused.contains(to) {
            return false;
        }

        let available = state.balances.get(&(asset, *from)).copied().unwrap_or(0);
        if available < amount {
            return false;
        }
        state.balances.insert((asset, *from), available - amount);
        *state.balances.entry((asset, *to)).or_default() += amount;

        if asset == Asset::Neo {
            for account in [*from, *to] {
                if let Some(gas) = state.unclaimed_gas.remove(&account) {
                    *state.balances.entry((Asset::Gas, account)).or_default() += gas;
                }
            }
        }

        state.transfers.push(Transfer { asset, from: *from, to: *to, amount });
        true
    }

    fn vote(&self, account: &ScriptHash, candidate: &PublicKey) -> bool {
        let mut state = self.state.lock();
        if state.refuse_votes {
            return false;
        }
        state.votes.push((*account, candidate.clone()));
        true
    }

    fn asset_hash(&self, asset: Asset) -> ScriptHash {
        match asset {
            Asset::Gas => GAS_HASH,
            Asset::Neo => NEO_HASH,
        }
    }
}
