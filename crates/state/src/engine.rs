//! Contract storage engines.
//!
//! Every contract owns one flat key-value namespace. The host ledger provides
//! it; this module models it as the [`KvStore`] trait so the key codec and
//! quorum voting can run against:
//! - [`InMemoryStore`] - ordered map behind a lock, for tests and simulation
//! - [`RedbStore`] - persistent redb table, with atomic batch commits

use std::{collections::BTreeMap, path::Path, sync::Arc};

use parking_lot::RwLock;
use redb::{Database, ReadableTable, TableDefinition};
use snafu::{ResultExt, Snafu};

/// Single table holding a contract's namespace: raw key → raw value.
const RECORDS: TableDefinition<'static, &'static [u8], &'static [u8]> =
    TableDefinition::new("records");

/// Error context for storage operations.
#[derive(Debug, Snafu)]
#[snafu(visibility(pub(crate)))]
pub enum StoreError {
    /// Database could not be opened or created.
    #[snafu(display("Failed to open database at {path}: {source}"))]
    Open {
        /// Path (or `:memory:`) that failed to open.
        path: String,
        /// The underlying redb error.
        source: redb::DatabaseError,
    },

    /// Transaction could not be started.
    #[snafu(display("Transaction error: {source}"))]
    Transaction {
        /// The underlying redb error.
        source: redb::TransactionError,
    },

    /// Table could not be opened.
    #[snafu(display("Table error: {source}"))]
    Table {
        /// The underlying redb error.
        source: redb::TableError,
    },

    /// Read or write inside a transaction failed.
    #[snafu(display("Storage error: {source}"))]
    Storage {
        /// The underlying redb error.
        source: redb::StorageError,
    },

    /// Write transaction failed to commit.
    #[snafu(display("Commit error: {source}"))]
    Commit {
        /// The underlying redb error.
        source: redb::CommitError,
    },
}

/// Result type for storage operations.
pub type Result<T> = std::result::Result<T, StoreError>;

/// One buffered mutation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WriteOp {
    /// Insert or overwrite `key`.
    Put {
        /// Record key.
        key: Vec<u8>,
        /// Record value.
        value: Vec<u8>,
    },
    /// Remove `key` if present.
    Delete {
        /// Record key.
        key: Vec<u8>,
    },
}

/// Flat key-value namespace of a single contract.
///
/// Implementations must keep keys in lexicographic byte order so that
/// [`scan_keys`](KvStore::scan_keys) returns prefix ranges in key order.
pub trait KvStore: Send + Sync {
    /// Returns the value stored under `key`.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if the backend fails to read.
    fn get(&self, key: &[u8]) -> Result<Option<Vec<u8>>>;

    /// Stores `value` under `key`, overwriting any previous value.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if the backend fails to write.
    fn put(&self, key: &[u8], value: &[u8]) -> Result<()>;

    /// Removes `key`. Removing an absent key is not an error.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if the backend fails to write.
    fn delete(&self, key: &[u8]) -> Result<()>;

    /// Returns every key starting with `prefix`, in ascending order, without
    /// reading values.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if the backend fails to iterate.
    fn scan_keys(&self, prefix: &[u8]) -> Result<Vec<Vec<u8>>>;

    /// Applies a batch of writes.
    ///
    /// The default applies them one by one; backends with real transactions
    /// override it to make the batch atomic.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if any write fails.
    fn apply_batch(&self, batch: Vec<WriteOp>) -> Result<()> {
        for op in batch {
            match op {
                WriteOp::Put { key, value } => self.put(&key, &value)?,
                WriteOp::Delete { key } => self.delete(&key)?,
            }
        }
        Ok(())
    }
}

// ============================================================================
// In-memory engine
// ============================================================================

/// In-memory storage engine for tests and simulations.
///
/// Cloning shares the underlying map.
#[derive(Debug, Clone, Default)]
pub struct InMemoryStore {
    records: Arc<RwLock<BTreeMap<Vec<u8>, Vec<u8>>>>,
}

impl InMemoryStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored keys.
    pub fn len(&self) -> usize {
        self.records.read().len()
    }

    /// Whether the store holds no keys.
    pub fn is_empty(&self) -> bool {
        self.records.read().is_empty()
    }
}

impl KvStore for InMemoryStore {
    fn get(&self, key: &[u8]) -> Result<Option<Vec<u8>>> {
        Ok(self.records.read().get(key).cloned())
    }

    fn put(&self, key: &[u8], value: &[u8]) -> Result<()> {
        self.records.write().insert(key.to_vec(), value.to_vec());
        Ok(())
    }

    fn delete(&self, key: &[u8]) -> Result<()> {
        self.records.write().remove(key);
        Ok(())
    }

    fn scan_keys(&self, prefix: &[u8]) -> Result<Vec<Vec<u8>>> {
        let records = self.records.read();
        Ok(records
            .range(prefix.to_vec()..)
            .take_while(|(key, _)| key.starts_with(prefix))
            .map(|(key, _)| key.clone())
            .collect())
    }

    fn apply_batch(&self, batch: Vec<WriteOp>) -> Result<()> {
        let mut records = self.records.write();
        for op in batch {
            match op {
                WriteOp::Put { key, value } => {
                    records.insert(key, value);
                },
                WriteOp::Delete { key } => {
                    records.remove(&key);
                },
            }
        }
        Ok(())
    }
}

// ============================================================================
// redb engine
// ============================================================================

/// Storage engine backed by redb.
///
/// Each call to a [`KvStore`] method runs in its own redb transaction;
/// [`apply_batch`](KvStore::apply_batch) runs the whole batch in one write
/// transaction, so a committed contract invocation is all-or-nothing on disk.
#[derive(Clone)]
pub struct RedbStore {
    db: Arc<Database>,
}

#[allow(clippy::result_large_err)]
impl RedbStore {
    /// Open or create a database at the given path.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Open`] if the file cannot be opened, or a
    /// transaction error if the records table cannot be initialized.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let db = Database::create(path)
            .context(OpenSnafu { path: path.display().to_string() })?;
        Self::init(db)
    }

    /// Create a database that lives only in memory.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Open`] if redb rejects the backend.
    pub fn open_in_memory() -> Result<Self> {
        let db = Database::builder()
            .create_with_backend(redb::backends::InMemoryBackend::new())
            .context(OpenSnafu { path: ":memory:".to_string() })?;
        Self::init(db)
    }

    /// Ensures the records table exists so read transactions never see a
    /// missing table.
    fn init(db: Database) -> Result<Self> {
        let txn = db.begin_write().context(TransactionSnafu)?;
        {
            let _table = txn.open_table(RECORDS).context(TableSnafu)?;
        }
        txn.commit().context(CommitSnafu)?;
        Ok(Self { db: Arc::new(db) })
    }
}

impl KvStore for RedbStore {
    fn get(&self, key: &[u8]) -> Result<Option<Vec<u8>>> {
        let txn = self.db.begin_read().context(TransactionSnafu)?;
        let table = txn.open_table(RECORDS).context(TableSnafu)?;
        let value = table.get(key).context(StorageSnafu)?;
        Ok(value.map(|guard| guard.value().to_vec()))
    }

    fn put(&self, key: &[u8], value: &[u8]) -> Result<()> {
        self.apply_batch(vec![WriteOp::Put { key: key.to_vec(), value: value.to_vec() }])
    }

    fn delete(&self, key: &[u8]) -> Result<()> {
        self.apply_batch(vec![WriteOp::Delete { key: key.to_vec() }])
    }

    fn scan_keys(&self, prefix: &[u8]) -> Result<Vec<Vec<u8>>> {
        let txn = self.db.begin_read().context(TransactionSnafu)?;
        let table = txn.open_table(RECORDS).context(TableSnafu)?;

        let mut keys = Vec::new();
        for entry in table.range::<&[u8]>(prefix..).context(StorageSnafu)? {
            let (key, _) = entry.context(StorageSnafu)?;
            let key = key.value();
            if !key.starts_with(prefix) {
                break;
            }
            keys.push(key.to_vec());
        }
        Ok(keys)
    }

    fn apply_batch(&self, batch: Vec<WriteOp>) -> Result<()> {
        let txn = self.db.begin_write().context(TransactionSnafu)?;
        {
            let mut table = txn.open_table(RECORDS).context(TableSnafu)?;
            for op in &batch {
                match op {
                    WriteOp::Put { key, value } => {
                        table.insert(key.as_slice(), value.as_slice()).context(StorageSnafu)?;
                    },
                    WriteOp::Delete { key } => {
                        table.remove(key.as_slice()).context(StorageSnafu)?;
                    },
                }
            }
        }
        txn.commit().context(CommitSnafu)?;
        Ok(())
    }
}
