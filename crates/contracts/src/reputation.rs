//! Reputation contract.
//!
//! Stores trust values that peers report about each other, grouped per
//! epoch and peer. Every stored value needs the Alphabet's agreement, either
//! through the committee multisig account or by collecting one vote per
//! Alphabet node.

use innerring_state::{
    BALLOT_PREFIX, BallotId, KeyFilter, KvStore, StoreTransaction, encode_record_key, list_keys,
    scan_prefix,
};
use innerring_types::{Epoch, ScriptHash, config::ReputationConfig, decode, encode, sha256_concat};
use snafu::ResultExt;
use tracing::info;

use crate::{
    VERSION, admin,
    error::{CodecSnafu, CommitSnafu, ConfigSnafu, Result, StoreSnafu},
    governance::{Gate, Role, VoteOutcome, cast_vote, check_epoch},
    host::Env,
};

const OWNER_KEY: &str = "contractOwner";
const NOTARY_DISABLED_KEY: &str = "notary";
const QUORUM_KEY: &str = "quorum";
const VALUES_KEY: &str = "values";

const ADMIN_KEYS: KeyFilter =
    KeyFilter::new(&[b"contractOwner", b"notary", b"quorum"], &[BALLOT_PREFIX]);

/// Deployed Reputation contract bound to its namespace.
pub struct Reputation<S> {
    store: S,
    config: ReputationConfig,
}

impl<S: KvStore> Reputation<S> {
    /// Deploys the contract into an empty namespace.
    ///
    /// # Errors
    ///
    /// Returns [`ContractError::Config`](crate::ContractError::Config) if
    /// `config` is invalid, or a storage error if the deployment keys cannot
    /// be written.
    pub fn deploy(store: S, config: ReputationConfig) -> Result<Self> {
        config.validate().context(ConfigSnafu)?;

        let tx = StoreTransaction::begin(&store);
        admin::put(&tx, OWNER_KEY, &config.owner)?;
        admin::put(&tx, NOTARY_DISABLED_KEY, &config.notary_disabled)?;
        admin::put(&tx, QUORUM_KEY, &config.quorum)?;
        tx.commit().context(CommitSnafu)?;

        info!(owner = %config.owner, notary_disabled = config.notary_disabled, "Reputation contract initialized");
        Ok(Self { store, config })
    }

    /// Opens a previously deployed contract.
    ///
    /// # Errors
    ///
    /// Returns [`ContractError::NotDeployed`](crate::ContractError::NotDeployed)
    /// if a deployment key is missing.
    pub fn load(store: S) -> Result<Self> {
        let config = ReputationConfig {
            notary_disabled: admin::get(&store, NOTARY_DISABLED_KEY)?,
            owner: admin::get::<_, ScriptHash>(&store, OWNER_KEY)?,
            quorum: admin::get(&store, QUORUM_KEY)?,
        };
        Ok(Self { store, config })
    }

    /// Deployment parameters.
    pub fn config(&self) -> &ReputationConfig {
        &self.config
    }

    /// Contract namespace.
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Contract version.
    pub fn version(&self) -> u32 {
        VERSION
    }

    /// Appends a reputation value for `peer_id` in the current epoch.
    ///
    /// The value is stored once the Alphabet agrees on it; until then the
    /// call returns [`VoteOutcome::Pending`] and stores nothing but the vote.
    ///
    /// # Errors
    ///
    /// - [`ContractError::InvalidEpoch`](crate::ContractError::InvalidEpoch) if `epoch` is not current
    ///   or is negative
    /// - [`ContractError::UnauthorizedPublisher`](crate::ContractError::UnauthorizedPublisher)
    ///   if the Alphabet did not authorize the call
    pub fn put(
        &self,
        env: &Env<'_>,
        epoch: Epoch,
        peer_id: &[u8],
        value: &[u8],
    ) -> Result<VoteOutcome> {
        check_epoch(env, epoch)?;

        let alphabet = env.network.alphabet();
        let gate = Gate {
            roster: &alphabet,
            threshold: self.config.quorum,
            notary_disabled: self.config.notary_disabled,
            role: Role::Publisher,
        };
        let peer_len = (peer_id.len() as u32).to_be_bytes();
        let fingerprint = sha256_concat(&[&peer_len[..], peer_id, value]);
        let ballot = BallotId::new(epoch, &fingerprint);

        let tx = StoreTransaction::begin(&self.store);
        let outcome = cast_vote(&tx, env, &gate, &ballot)?;
        if outcome.is_accepted() {
            let id = storage_id(epoch, peer_id);
            let mut values = read_values(&tx, &id)?;
            values.push(value.to_vec());
            let bytes = encode(&values).context(CodecSnafu { key: VALUES_KEY })?;
            tx.put(&id, &bytes).context(StoreSnafu)?;
            info!(epoch = %epoch, values = values.len(), "Reputation value saved");
        }
        tx.commit().context(CommitSnafu)?;
        Ok(outcome)
    }

    /// Values stored for `peer_id` in `epoch`, oldest first.
    ///
    /// # Errors
    ///
    /// Returns a storage or codec error if the list cannot be read.
    pub fn get(&self, epoch: Epoch, peer_id: &[u8]) -> Result<Vec<Vec<u8>>> {
        self.get_by_id(&storage_id(epoch, peer_id))
    }

    /// Values stored under a key returned by [`list_by_epoch`](Self::list_by_epoch).
    /// An unknown key yields an empty list.
    ///
    /// # Errors
    ///
    /// Returns a storage or codec error if the list cannot be read.
    pub fn get_by_id(&self, id: &[u8]) -> Result<Vec<Vec<u8>>> {
        read_values(&self.store, id)
    }

    /// Lists value-list keys of one epoch.
    ///
    /// # Errors
    ///
    /// Returns a storage error if the scan fails.
    pub fn list_by_epoch(&self, epoch: Epoch) -> Result<Vec<Vec<u8>>> {
        list_keys(&self.store, &scan_prefix(epoch, None), &ADMIN_KEYS).context(StoreSnafu)
    }
}

fn storage_id(epoch: Epoch, peer_id: &[u8]) -> Vec<u8> {
    encode_record_key(epoch, peer_id, None)
}

fn read_values<S: KvStore + ?Sized>(store: &S, id: &[u8]) -> Result<Vec<Vec<u8>>> {
    match store.get(id).context(StoreSnafu)? {
        Some(bytes) => decode(&bytes).context(CodecSnafu { key: VALUES_KEY }),
        None => Ok(Vec::new()),
    }
}
