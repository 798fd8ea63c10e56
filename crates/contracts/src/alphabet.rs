//! Alphabet contract.
//!
//! One instance exists per Alphabet node. The contract account holds NEO
//! and votes with it for committee candidates; it also turns the GAS that
//! NEO generates into the utility token budget of the Proxy contract and
//! the Inner Ring nodes.

use innerring_state::{BallotId, KvStore, StoreTransaction};
use innerring_types::{Asset, Epoch, PublicKey, ScriptHash, config::AlphabetConfig};
use snafu::{ResultExt, ensure};
use tracing::{info, warn};

use crate::{
    VERSION, admin,
    error::{
        CommitSnafu, ConfigSnafu, ContractError, EmptyCandidatesSnafu, NothingToEmitSnafu, Result,
    },
    governance::{Gate, Role, VoteOutcome, cast_vote, check_epoch},
    host::{Env, standard_account},
};

const NETMAP_KEY: &str = "netmapScriptHash";
const PROXY_KEY: &str = "proxyScriptHash";
const INDEX_KEY: &str = "index";
const TOTAL_KEY: &str = "threshold";
const NAME_KEY: &str = "name";
const NOTARY_DISABLED_KEY: &str = "notary";
const QUORUM_KEY: &str = "quorum";

/// Result of a GAS emission.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Emission {
    /// GAS sent to the Proxy contract (zero when notary is disabled).
    pub proxy: u64,
    /// GAS sent to each Inner Ring node.
    pub per_node: u64,
    /// Nodes the per-node transfer succeeded for.
    pub recipients: usize,
}

/// Deployed Alphabet contract bound to its namespace.
pub struct Alphabet<S> {
    store: S,
    address: ScriptHash,
    config: AlphabetConfig,
}

impl<S: KvStore> Alphabet<S> {
    /// Deploys the contract into an empty namespace.
    ///
    /// # Errors
    ///
    /// Returns [`ContractError::Config`] if `config` is invalid, or a storage
    /// error if the deployment keys cannot be written.
    pub fn deploy(store: S, address: ScriptHash, config: AlphabetConfig) -> Result<Self> {
        config.validate().context(ConfigSnafu)?;

        let tx = StoreTransaction::begin(&store);
        admin::put(&tx, NETMAP_KEY, &config.netmap)?;
        admin::put(&tx, PROXY_KEY, &config.proxy)?;
        admin::put(&tx, NAME_KEY, &config.name)?;
        admin::put(&tx, INDEX_KEY, &(config.index as u64))?;
        admin::put(&tx, TOTAL_KEY, &(config.total as u64))?;
        admin::put(&tx, NOTARY_DISABLED_KEY, &config.notary_disabled)?;
        admin::put(&tx, QUORUM_KEY, &config.quorum)?;
        tx.commit().context(CommitSnafu)?;

        if config.notary_disabled {
            info!(name = %config.name, "Notary disabled");
        }
        info!(name = %config.name, index = config.index, address = %address, "Alphabet contract initialized");
        Ok(Self { store, address, config })
    }

    /// Opens a previously deployed contract.
    ///
    /// # Errors
    ///
    /// Returns [`ContractError::NotDeployed`] if a deployment key is missing.
    pub fn load(store: S, address: ScriptHash) -> Result<Self> {
        let index: u64 = admin::get(&store, INDEX_KEY)?;
        let total: u64 = admin::get(&store, TOTAL_KEY)?;
        let config = AlphabetConfig {
            notary_disabled: admin::get(&store, NOTARY_DISABLED_KEY)?,
            netmap: admin::get(&store, NETMAP_KEY)?,
            proxy: admin::get(&store, PROXY_KEY)?,
            name: admin::get(&store, NAME_KEY)?,
            index: index as usize,
            total: total as usize,
            quorum: admin::get(&store, QUORUM_KEY)?,
        };
        Ok(Self { store, address, config })
    }

    /// Contract account address.
    pub fn address(&self) -> ScriptHash {
        self.address
    }

    /// Deployment parameters.
    pub fn config(&self) -> &AlphabetConfig {
        &self.config
    }

    /// Contract namespace.
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Name of this instance.
    pub fn name(&self) -> &str {
        &self.config.name
    }

    /// Index of the Alphabet node this instance is bound to.
    pub fn index(&self) -> usize {
        self.config.index
    }

    /// Contract version.
    pub fn version(&self) -> u32 {
        VERSION
    }

    /// GAS balance of the contract account.
    pub fn gas(&self, env: &Env<'_>) -> u64 {
        env.assets.balance_of(Asset::Gas, &self.address)
    }

    /// NEO balance of the contract account.
    pub fn neo(&self, env: &Env<'_>) -> u64 {
        env.assets.balance_of(Asset::Neo, &self.address)
    }

    /// Accepts an incoming payment if it comes from the GAS or NEO contract.
    ///
    /// # Errors
    ///
    /// Returns [`ContractError::UnsupportedAsset`] for any other caller.
    pub fn on_payment(&self, env: &Env<'_>, caller: &ScriptHash) -> Result<()> {
        let accepted =
            [Asset::Gas, Asset::Neo].into_iter().any(|asset| env.assets.asset_hash(asset) == *caller);
        if !accepted {
            warn!(name = %self.config.name, caller = %caller, "Payment rejected");
            return Err(ContractError::UnsupportedAsset { caller: *caller });
        }
        Ok(())
    }

    /// Votes with the contract's NEO for a committee candidate.
    ///
    /// The candidate is `candidates[index % len]`, so each Alphabet contract
    /// backs a different member of the same list. Without a notary, every
    /// Alphabet node sends its own invocation and the vote is cast by the
    /// one that completes the quorum.
    ///
    /// # Errors
    ///
    /// - [`ContractError::EmptyCandidates`] if `candidates` is empty
    /// - [`ContractError::InvalidEpoch`] if `epoch` is not current or is negative
    /// - [`ContractError::UnauthorizedVoter`] if the Alphabet did not authorize the call
    pub fn vote(
        &self,
        env: &Env<'_>,
        epoch: Epoch,
        candidates: &[PublicKey],
    ) -> Result<VoteOutcome> {
        ensure!(!candidates.is_empty(), EmptyCandidatesSnafu);
        check_epoch(env, epoch)?;

        let alphabet = env.network.alphabet();
        let gate = Gate {
            roster: &alphabet,
            threshold: self.config.quorum,
            notary_disabled: self.config.notary_disabled,
            role: Role::Voter,
        };
        let fingerprint: Vec<u8> =
            candidates.iter().flat_map(|key| key.as_bytes().iter().copied()).collect();
        let ballot = BallotId::new(epoch, &fingerprint);

        let tx = StoreTransaction::begin(&self.store);
        let outcome = cast_vote(&tx, env, &gate, &ballot)?;
        tx.commit().context(CommitSnafu)?;

        if outcome.is_accepted() {
            let candidate = &candidates[self.config.index % candidates.len()];
            if env.assets.vote(&self.address, candidate) {
                info!(name = %self.config.name, epoch = %epoch, candidate = %candidate, "Voted for validator");
            } else {
                warn!(name = %self.config.name, epoch = %epoch, candidate = %candidate, "Validator vote failed");
            }
        }
        Ok(outcome)
    }

    /// Distributes the GAS generated by the contract's NEO.
    ///
    /// Only the Alphabet node at this contract's index may call. NEO is
    /// first transferred to the contract itself to claim pending GAS. With
    /// a notary, half of the GAS goes to the Proxy contract. Seven eighths
    /// of what remains is split evenly across the Inner Ring; the rest stays
    /// on the contract.
    ///
    /// # Errors
    ///
    /// - [`ContractError::UnauthorizedCaller`] if the bound node did not sign
    /// - [`ContractError::AssetTransfer`] if the NEO claim transfer is refused
    /// - [`ContractError::NothingToEmit`] if the Proxy share would be zero
    pub fn emit(&self, env: &Env<'_>) -> Result<Emission> {
        let alphabet = env.network.alphabet();
        let authorized =
            alphabet.get(self.config.index).is_some_and(|node| env.witness.check_witness(node));
        if !authorized {
            warn!(name = %self.config.name, index = self.config.index, "Emit rejected: invalid invoker");
            return Err(ContractError::UnauthorizedCaller { entry_point: "emit" });
        }

        let neo = env.assets.balance_of(Asset::Neo, &self.address);
        if !env.assets.transfer(Asset::Neo, &self.address, &self.address, neo) {
            return Err(ContractError::AssetTransfer { asset: Asset::Neo, amount: neo });
        }

        let mut balance = env.assets.balance_of(Asset::Gas, &self.address);
        let mut proxy_share = 0;

        if !self.config.notary_disabled {
            proxy_share = balance / 2;
            ensure!(proxy_share != 0, NothingToEmitSnafu);
            if let Some(proxy) = &self.config.proxy {
                if !env.assets.transfer(Asset::Gas, &self.address, proxy, proxy_share) {
                    warn!(name = %self.config.name, proxy = %proxy, amount = proxy_share, "GAS transfer to proxy failed");
                }
            }
            balance -= proxy_share;
            info!(name = %self.config.name, amount = proxy_share, "Utility token emitted to proxy");
        }

        let inner_ring = env.network.inner_ring();
        let per_node = match inner_ring.len() {
            0 => 0,
            nodes => seven_eighths(balance) / nodes as u64,
        };

        let mut recipients = 0;
        if per_node != 0 {
            for node in &inner_ring {
                let account = standard_account(node);
                if env.assets.transfer(Asset::Gas, &self.address, &account, per_node) {
                    recipients += 1;
                } else {
                    warn!(name = %self.config.name, node = %node, amount = per_node, "GAS transfer to inner ring node failed");
                }
            }
            info!(name = %self.config.name, per_node, recipients, "Utility token emitted to inner ring");
        }

        Ok(Emission { proxy: proxy_share, per_node, recipients })
    }
}

/// `amount * 7 / 8` without overflowing.
fn seven_eighths(amount: u64) -> u64 {
    amount / 8 * 7 + amount % 8 * 7 / 8
}
