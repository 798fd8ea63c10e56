//! Audit contract.
//!
//! Inner Ring nodes audit containers each epoch and publish the serialized
//! result here. Results are stored verbatim under
//! `epoch ++ container_id ++ identity_prefix(publisher)` and later listed by
//! epoch, by container or by publishing node for settlement.

use innerring_state::{
    KeyFilter, KvStore, StoreTransaction, decode_audit_header, encode_record_key, list_keys,
    scan_prefix,
};
use innerring_types::{Epoch, PublicKey, config::AuditConfig};
use snafu::{OptionExt, ResultExt};
use tracing::{info, warn};

use crate::{
    VERSION, admin,
    error::{
        CommitSnafu, ConfigSnafu, ContractError, MalformedRecordSnafu, RecordNotFoundSnafu, Result,
        StoreSnafu,
    },
    governance::is_member,
    host::Env,
};

const NETMAP_KEY: &str = "netmapScriptHash";
const NOTARY_DISABLED_KEY: &str = "notary";

const ADMIN_KEYS: KeyFilter = KeyFilter::new(&[b"netmapScriptHash", b"notary"], &[]);

/// Deployed Audit contract bound to its namespace.
pub struct Audit<S> {
    store: S,
    config: AuditConfig,
}

impl<S: KvStore> Audit<S> {
    /// Deploys the contract into an empty namespace.
    ///
    /// # Errors
    ///
    /// Returns a storage error if the deployment keys cannot be written.
    pub fn deploy(store: S, config: AuditConfig) -> Result<Self> {
        let tx = StoreTransaction::begin(&store);
        admin::put(&tx, NETMAP_KEY, &config.netmap)?;
        admin::put(&tx, NOTARY_DISABLED_KEY, &config.notary_disabled)?;
        tx.commit().context(CommitSnafu)?;

        if config.notary_disabled {
            info!("Audit contract notary disabled");
        }
        info!(netmap = %config.netmap, "Audit contract initialized");
        Ok(Self { store, config })
    }

    /// Opens a previously deployed contract.
    ///
    /// # Errors
    ///
    /// Returns [`ContractError::NotDeployed`] if a deployment key is missing.
    pub fn load(store: S) -> Result<Self> {
        let netmap = admin::get(&store, NETMAP_KEY)?;
        let notary_disabled = admin::get(&store, NOTARY_DISABLED_KEY)?;
        let config = AuditConfig::builder()
            .notary_disabled(notary_disabled)
            .netmap(netmap)
            .build()
            .context(ConfigSnafu)?;
        Ok(Self { store, config })
    }

    /// Deployment parameters.
    pub fn config(&self) -> &AuditConfig {
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

    /// Stores a serialized audit result and returns its record key.
    ///
    /// The publisher named in the result header must be an Inner Ring
    /// member and must have signed the transaction. Publishing the same
    /// (epoch, container, node) again overwrites the earlier result.
    ///
    /// # Errors
    ///
    /// - [`ContractError::MalformedRecord`] if the header cannot be read
    /// - [`ContractError::UnauthorizedPublisher`] if the publisher check fails
    pub fn put(&self, env: &Env<'_>, raw: &[u8]) -> Result<Vec<u8>> {
        let header = decode_audit_header(raw).context(MalformedRecordSnafu)?;

        let inner_ring = env.network.inner_ring();
        if !is_member(&inner_ring, &header.from) || !env.witness.check_witness(&header.from) {
            warn!(publisher = %header.from, epoch = %header.epoch, "Audit result rejected: put access denied");
            return Err(ContractError::UnauthorizedPublisher);
        }

        let id = header.id();
        let tx = StoreTransaction::begin(&self.store);
        tx.put(&id, raw).context(StoreSnafu)?;
        tx.commit().context(CommitSnafu)?;

        info!(epoch = %header.epoch, publisher = %header.from, "Audit result saved");
        Ok(id)
    }

    /// Returns the audit result stored under `id`.
    ///
    /// # Errors
    ///
    /// Returns [`ContractError::RecordNotFound`] if nothing is stored there.
    pub fn get(&self, id: &[u8]) -> Result<Vec<u8>> {
        self.store
            .get(id)
            .context(StoreSnafu)?
            .context(RecordNotFoundSnafu { id: hex::encode(id) })
    }

    /// Lists every stored result key.
    ///
    /// # Errors
    ///
    /// Returns a storage error if the scan fails.
    pub fn list(&self) -> Result<Vec<Vec<u8>>> {
        self.list_prefix(&[])
    }

    /// Lists result keys of one epoch.
    ///
    /// # Errors
    ///
    /// Returns a storage error if the scan fails.
    pub fn list_by_epoch(&self, epoch: Epoch) -> Result<Vec<Vec<u8>>> {
        self.list_prefix(&scan_prefix(epoch, None))
    }

    /// Lists result keys of one container in one epoch.
    ///
    /// # Errors
    ///
    /// Returns a storage error if the scan fails.
    pub fn list_by_cid(&self, epoch: Epoch, container_id: &[u8]) -> Result<Vec<Vec<u8>>> {
        self.list_prefix(&scan_prefix(epoch, Some(container_id)))
    }

    /// Lists result keys published by one node for a container in an epoch.
    ///
    /// # Errors
    ///
    /// Returns a storage error if the scan fails.
    pub fn list_by_node(
        &self,
        epoch: Epoch,
        container_id: &[u8],
        node: &PublicKey,
    ) -> Result<Vec<Vec<u8>>> {
        self.list_prefix(&encode_record_key(epoch, container_id, Some(node)))
    }

    fn list_prefix(&self, prefix: &[u8]) -> Result<Vec<Vec<u8>>> {
        list_keys(&self.store, prefix, &ADMIN_KEYS).context(StoreSnafu)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::disallowed_methods)]
mod tests {
    use innerring_state::InMemoryStore;
    use innerring_types::ScriptHash;

    use super::*;

    fn deployed() -> Audit<InMemoryStore> {
        let config = AuditConfig::builder().netmap(ScriptHash::new([1; 20])).build().unwrap();
        Audit::deploy(InMemoryStore::new(), config).unwrap()
    }

    #[test]
    fn test_deployment_keys_not_listed() {
        let audit = deployed();
        assert_eq!(audit.store().len(), 2);
        assert!(audit.list().unwrap().is_empty());
    }

    #[test]
    fn test_load_roundtrip() {
        let audit = deployed();
        let loaded = Audit::load(audit.store().clone()).unwrap();
        assert_eq!(loaded.config(), audit.config());
    }

    #[test]
    fn test_get_missing_record() {
        let err = deployed().get(&[0xAB, 0x01]).unwrap_err();
        assert!(matches!(err, ContractError::RecordNotFound { ref id } if id == "ab01"));
    }
}
