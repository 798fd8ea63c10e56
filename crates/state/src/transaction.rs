//! Write-buffering transaction over a contract store.
//!
//! A contract invocation either commits fully or leaves no trace. The host
//! ledger guarantees this for real deployments; [`StoreTransaction`] gives
//! the same guarantee to any [`KvStore`]: writes are buffered, reads and
//! scans observe the buffer, and nothing reaches the base store until
//! [`commit`](StoreTransaction::commit). Dropping the transaction discards
//! the buffer.

use std::collections::{BTreeMap, BTreeSet};

use parking_lot::Mutex;

use crate::engine::{KvStore, Result, WriteOp};

/// Buffered view over a base store.
///
/// `None` in the buffer marks a pending delete.
pub struct StoreTransaction<'a, S: KvStore + ?Sized> {
    base: &'a S,
    writes: Mutex<BTreeMap<Vec<u8>, Option<Vec<u8>>>>,
}

impl<'a, S: KvStore + ?Sized> StoreTransaction<'a, S> {
    /// Starts a transaction over `base`.
    pub fn begin(base: &'a S) -> Self {
        Self { base, writes: Mutex::new(BTreeMap::new()) }
    }

    /// Number of keys with a pending write or delete.
    pub fn pending(&self) -> usize {
        self.writes.lock().len()
    }

    /// Flushes every buffered write to the base store in one batch.
    ///
    /// Returns the number of keys written or deleted.
    ///
    /// # Errors
    ///
    /// Returns the base store's error if the batch cannot be applied.
    pub fn commit(self) -> Result<usize> {
        let writes = self.writes.into_inner();
        let count = writes.len();
        if count == 0 {
            return Ok(0);
        }

        let batch = writes
            .into_iter()
            .map(|(key, value)| match value {
                Some(value) => WriteOp::Put { key, value },
                None => WriteOp::Delete { key },
            })
            .collect();
        self.base.apply_batch(batch)?;
        Ok(count)
    }
}

impl<S: KvStore + ?Sized> KvStore for StoreTransaction<'_, S> {
    fn get(&self, key: &[u8]) -> Result<Option<Vec<u8>>> {
        if let Some(pending) = self.writes.lock().get(key) {
            return Ok(pending.clone());
        }
        self.base.get(key)
    }

    fn put(&self, key: &[u8], value: &[u8]) -> Result<()> {
        self.writes.lock().insert(key.to_vec(), Some(value.to_vec()));
        Ok(())
    }

    fn delete(&self, key: &[u8]) -> Result<()> {
        self.writes.lock().insert(key.to_vec(), None);
        Ok(())
    }

    fn scan_keys(&self, prefix: &[u8]) -> Result<Vec<Vec<u8>>> {
        let mut keys: BTreeSet<Vec<u8>> = self.base.scan_keys(prefix)?.into_iter().collect();

        let writes = self.writes.lock();
        for (key, value) in writes.range(prefix.to_vec()..) {
            if !key.starts_with(prefix) {
                break;
            }
            match value {
                Some(_) => keys.insert(key.clone()),
                None => keys.remove(key),
            };
        }

        Ok(keys.into_iter().collect())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::disallowed_methods)]
mod tests {
    use super::*;
    use crate::engine::InMemoryStore;

    #[test]
    fn test_reads_see_buffered_writes() {
        let base = InMemoryStore::new();
        base.put(b"k", b"base").unwrap();

        let txn = StoreTransaction::begin(&base);
        txn.put(b"k", b"txn").unwrap();
        assert_eq!(txn.get(b"k").unwrap(), Some(b"txn".to_vec()));
        assert_eq!(base.get(b"k").unwrap(), Some(b"base".to_vec()));

        txn.delete(b"k").unwrap();
        assert_eq!(txn.get(b"k").unwrap(), None);
    }

    #[test]
    fn test_drop_discards_writes() {
        let base = InMemoryStore::new();
        {
            let txn = StoreTransaction::begin(&base);
            txn.put(b"k", b"v").unwrap();
            assert_eq!(txn.pending(), 1);
        }
        assert!(base.is_empty());
    }

    #[test]
    fn test_commit_applies_puts_and_deletes() {
        let base = InMemoryStore::new();
        base.put(b"gone", b"x").unwrap();

        let txn = StoreTransaction::begin(&base);
        txn.put(b"new", b"y").unwrap();
        txn.delete(b"gone").unwrap();
        assert_eq!(txn.commit().unwrap(), 2);

        assert_eq!(base.get(b"gone").unwrap(), None);
        assert_eq!(base.get(b"new").unwrap(), Some(b"y".to_vec()));
    }

    #[test]
    fn test_scan_merges_buffer_with_base() {
        let base = InMemoryStore::new();
        base.put(b"p:1", b"").unwrap();
        base.put(b"p:2", b"").unwrap();
        base.put(b"q:1", b"").unwrap();

        let txn = StoreTransaction::begin(&base);
        txn.put(b"p:3", b"").unwrap();
        txn.delete(b"p:1").unwrap();
        txn.put(b"q:2", b"").unwrap();

        assert_eq!(txn.scan_keys(b"p:").unwrap(), vec![b"p:2".to_vec(), b"p:3".to_vec()]);
    }

    #[test]
    fn test_empty_commit_is_noop() {
        let base = InMemoryStore::new();
        let txn = StoreTransaction::begin(&base);
        assert_eq!(txn.commit().unwrap(), 0);
    }
}
