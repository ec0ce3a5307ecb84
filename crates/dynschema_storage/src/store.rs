//! Metadata store trait definition.

use crate::error::StorageResult;
use std::sync::Arc;

/// A key-value store for small metadata records.
///
/// Stores are **opaque**: they keep whatever bytes they are given and never
/// interpret them. The caller picks the value encoding.
///
/// # Invariants
///
/// - `get_meta` returns exactly the bytes of the last successful `set_meta`
/// - a missing key is reported as [`StorageError::NotFound`](crate::StorageError::NotFound)
/// - a successful `set_meta` is durable for the store's notion of durability
/// - stores must be `Send + Sync`; methods take `&self`
pub trait MetaStore: Send + Sync {
    /// Reads the value stored under `key`.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if the key is absent, or an I/O error.
    fn get_meta(&self, key: &str) -> StorageResult<Vec<u8>>;

    /// Replaces the value stored under `key`.
    ///
    /// # Errors
    ///
    /// Returns an error if the write cannot be completed.
    fn set_meta(&self, key: &str, value: &[u8]) -> StorageResult<()>;

    /// Removes `key`. Removing an absent key is not an error.
    ///
    /// # Errors
    ///
    /// Returns an error if the removal cannot be completed.
    fn delete_meta(&self, key: &str) -> StorageResult<()>;

    /// Whether a value is stored under `key`.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be queried.
    fn contains_meta(&self, key: &str) -> StorageResult<bool> {
        match self.get_meta(key) {
            Ok(_) => Ok(true),
            Err(e) if e.is_not_found() => Ok(false),
            Err(e) => Err(e),
        }
    }
}

impl<T: MetaStore + ?Sized> MetaStore for Arc<T> {
    fn get_meta(&self, key: &str) -> StorageResult<Vec<u8>> {
        (**self).get_meta(key)
    }

    fn set_meta(&self, key: &str, value: &[u8]) -> StorageResult<()> {
        (**self).set_meta(key, value)
    }

    fn delete_meta(&self, key: &str) -> StorageResult<()> {
        (**self).delete_meta(key)
    }

    fn contains_meta(&self, key: &str) -> StorageResult<bool> {
        (**self).contains_meta(key)
    }
}

impl<T: MetaStore + ?Sized> MetaStore for &T {
    fn get_meta(&self, key: &str) -> StorageResult<Vec<u8>> {
        (**self).get_meta(key)
    }

    fn set_meta(&self, key: &str, value: &[u8]) -> StorageResult<()> {
        (**self).set_meta(key, value)
    }

    fn delete_meta(&self, key: &str) -> StorageResult<()> {
        (**self).delete_meta(key)
    }

    fn contains_meta(&self, key: &str) -> StorageResult<bool> {
        (**self).contains_meta(key)
    }
}
