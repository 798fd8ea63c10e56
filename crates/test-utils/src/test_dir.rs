//! Temporary contract databases.

// Test utilities are expected to panic on failure
#![allow(clippy::expect_used)]

use std::path::{Path, PathBuf};

use innerring_state::RedbStore;
use tempfile::TempDir;

/// Temporary directory holding persistent contract namespaces.
///
/// Removed on drop, together with every database opened in it.
///
/// # Example
///
/// ```
/// use innerring_test_utils::TestDir;
///
/// let dir = TestDir::new();
/// {
///     let _audit = dir.open_store("audit");
/// }
/// // Reopening the same name sees the same records.
/// let _reopened = dir.open_store("audit");
/// ```
pub struct TestDir {
    inner: TempDir,
}

impl TestDir {
    /// Creates a new temporary directory.
    ///
    /// # Panics
    ///
    /// Panics if the directory cannot be created.
    #[must_use]
    pub fn new() -> Self {
        let inner = TempDir::new().expect("failed to create temp directory");
        Self { inner }
    }

    /// Path of the directory.
    #[must_use]
    pub fn path(&self) -> &Path {
        self.inner.path()
    }

    /// Database file used for the namespace `name`.
    #[must_use]
    pub fn store_path(&self, name: &str) -> PathBuf {
        self.inner.path().join(format!("{name}.redb"))
    }

    /// Opens (or creates) the persistent namespace `name`.
    ///
    /// # Panics
    ///
    /// Panics if redb cannot open the file.
    #[must_use]
    pub fn open_store(&self, name: &str) -> RedbStore {
        RedbStore::open(self.store_path(name)).expect("failed to open contract store")
    }
}

impl Default for TestDir {
    fn default() -> Self {
        Self::new()
    }
}
