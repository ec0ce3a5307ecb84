//! In-memory metadata store for testing.

use crate::error::{StorageError, StorageResult};
use crate::store::MetaStore;
use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};

/// An in-memory metadata store.
///
/// Suitable for unit tests and ephemeral registries. It counts successful
/// writes and can be told to reject writes, which lets tests observe when a
/// caller persisted and how it behaves when persistence fails.
///
/// # Example
///
/// ```rust
/// use dynschema_storage::{InMemoryMetaStore, MetaStore};
///
/// let store = InMemoryMetaStore::new();
/// store.set_meta("schema", b"[]").unwrap();
/// assert_eq!(store.get_meta("schema").unwrap(), b"[]");
/// assert_eq!(store.write_count(), 1);
/// ```
#[derive(Debug, Default)]
pub struct InMemoryMetaStore {
    entries: RwLock<HashMap<String, Vec<u8>>>,
    writes: AtomicU64,
    fail_writes: AtomicBool,
}

impl InMemoryMetaStore {
    /// Creates a new empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store holding one pre-existing entry.
    ///
    /// Does not count as a write.
    #[must_use]
    pub fn with_entry(key: impl Into<String>, value: impl Into<Vec<u8>>) -> Self {
        let store = Self::new();
        store.entries.write().insert(key.into(), value.into());
        store
    }

    /// Number of successful `set_meta` calls so far.
    #[must_use]
    pub fn write_count(&self) -> u64 {
        self.writes.load(Ordering::SeqCst)
    }

    /// Makes subsequent writes fail with [`StorageError::WriteRejected`].
    pub fn fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    /// Returns a copy of the raw value under `key`, if any.
    #[must_use]
    pub fn raw(&self, key: &str) -> Option<Vec<u8>> {
        self.entries.read().get(key).cloned()
    }
}

impl MetaStore for InMemoryMetaStore {
    fn get_meta(&self, key: &str) -> StorageResult<Vec<u8>> {
        self.entries
            .read()
            .get(key)
            .cloned()
            .ok_or_else(|| StorageError::not_found(key))
    }

    fn set_meta(&self, key: &str, value: &[u8]) -> StorageResult<()> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(StorageError::WriteRejected {
                key: key.to_string(),
            });
        }
        self.entries.write().insert(key.to_string(), value.to_vec());
        self.writes.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    fn delete_meta(&self, key: &str) -> StorageResult<()> {
        self.entries.write().remove(key);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_key_is_not_found() {
        let store = InMemoryMetaStore::new();
        let err = store.get_meta("schema").unwrap_err();
        assert!(err.is_not_found());
        assert!(!store.contains_meta("schema").unwrap());
    }

    #[test]
    fn set_replaces_value() {
        let store = InMemoryMetaStore::new();
        store.set_meta("k", b"one").unwrap();
        store.set_meta("k", b"two").unwrap();
        assert_eq!(store.get_meta("k").unwrap(), b"two");
        assert_eq!(store.write_count(), 2);
    }

    #[test]
    fn rejected_write_keeps_old_value() {
        let store = InMemoryMetaStore::with_entry("k", b"old".to_vec());
        store.fail_writes(true);
        assert!(matches!(
            store.set_meta("k", b"new"),
            Err(StorageError::WriteRejected { .. })
        ));
        assert_eq!(store.raw("k").unwrap(), b"old");
        assert_eq!(store.write_count(), 0);

        store.fail_writes(false);
        store.set_meta("k", b"new").unwrap();
        assert_eq!(store.raw("k").unwrap(), b"new");
    }

    #[test]
    fn delete_is_idempotent() {
        let store = InMemoryMetaStore::with_entry("k", b"v".to_vec());
        store.delete_meta("k").unwrap();
        store.delete_meta("k").unwrap();
        assert!(!store.contains_meta("k").unwrap());
    }
}
