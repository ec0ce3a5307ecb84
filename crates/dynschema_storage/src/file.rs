//! File-based metadata store.

use crate::error::{StorageError, StorageResult};
use crate::store::MetaStore;
use parking_lot::Mutex;
use std::fs::{self, File};
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

/// File extension for stored values.
const META_EXTENSION: &str = "meta";

/// Suffix for in-flight writes.
const TEMP_SUFFIX: &str = ".tmp";

/// A metadata store keeping one file per key in a directory.
///
/// The value for `schema` lives in `<dir>/schema.meta`.
///
/// # Durability
///
/// Writes go through a temporary file:
/// 1. write `<key>.meta.tmp` and `sync_all` it
/// 2. rename it over `<key>.meta`
/// 3. sync the directory so the rename itself is durable
///
/// A crash leaves either the old or the new value, never a torn one.
///
/// # Example
///
/// ```no_run
/// use dynschema_storage::{FileMetaStore, MetaStore};
/// use std::path::Path;
///
/// let store = FileMetaStore::open(Path::new("data")).unwrap();
/// store.set_meta("schema", b"[]").unwrap();
/// ```
#[derive(Debug)]
pub struct FileMetaStore {
    dir: PathBuf,
    write_lock: Mutex<()>,
}

impl FileMetaStore {
    /// Opens a store in `dir`, creating the directory if needed.
    ///
    /// # Errors
    ///
    /// Returns an error if the directory cannot be created.
    pub fn open(dir: &Path) -> StorageResult<Self> {
        fs::create_dir_all(dir)?;
        Ok(Self {
            dir: dir.to_path_buf(),
            write_lock: Mutex::new(()),
        })
    }

    /// Returns the store directory.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.dir
    }

    fn value_path(&self, key: &str) -> StorageResult<PathBuf> {
        validate_key(key)?;
        Ok(self.dir.join(format!("{key}.{META_EXTENSION}")))
    }

    #[cfg(unix)]
    fn sync_directory(&self) -> StorageResult<()> {
        File::open(&self.dir)?.sync_all()?;
        Ok(())
    }

    #[cfg(not(unix))]
    fn sync_directory(&self) -> StorageResult<()> {
        // NTFS journals metadata; directory handles cannot be fsynced.
        Ok(())
    }
}

fn validate_key(key: &str) -> StorageResult<()> {
    let reason = if key.is_empty() {
        Some("key is empty")
    } else if key.starts_with('.') {
        Some("key starts with '.'")
    } else if !key
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '-' | '.'))
    {
        Some("key may only contain [A-Za-z0-9_.-]")
    } else {
        None
    };

    match reason {
        Some(reason) => Err(StorageError::InvalidKey {
            key: key.to_string(),
            reason: reason.to_string(),
        }),
        None => Ok(()),
    }
}

impl MetaStore for FileMetaStore {
    fn get_meta(&self, key: &str) -> StorageResult<Vec<u8>> {
        let path = self.value_path(key)?;
        match fs::read(&path) {
            Ok(data) => Ok(data),
            Err(e) if e.kind() == ErrorKind::NotFound => Err(StorageError::not_found(key)),
            Err(e) => Err(e.into()),
        }
    }

    fn set_meta(&self, key: &str, value: &[u8]) -> StorageResult<()> {
        let path = self.value_path(key)?;
        let temp_path = self.dir.join(format!("{key}.{META_EXTENSION}{TEMP_SUFFIX}"));

        let _guard = self.write_lock.lock();

        let mut file = File::create(&temp_path)?;
        file.write_all(value)?;
        file.sync_all()?;
        drop(file);

        fs::rename(&temp_path, &path)?;
        self.sync_directory()?;

        tracing::trace!(key, bytes = value.len(), "metadata written");
        Ok(())
    }

    fn delete_meta(&self, key: &str) -> StorageResult<()> {
        let path = self.value_path(key)?;
        let _guard = self.write_lock.lock();
        match fs::remove_file(&path) {
            Ok(()) => self.sync_directory(),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn file_missing_key_is_not_found() {
        let dir = tempdir().unwrap();
        let store = FileMetaStore::open(dir.path()).unwrap();
        assert!(store.get_meta("schema").unwrap_err().is_not_found());
    }

    #[test]
    fn file_values_survive_reopen() {
        let dir = tempdir().unwrap();
        {
            let store = FileMetaStore::open(dir.path()).unwrap();
            store.set_meta("schema", br#"[{"name":"a","type":"json"}]"#).unwrap();
        }
        let store = FileMetaStore::open(dir.path()).unwrap();
        assert_eq!(
            store.get_meta("schema").unwrap(),
            br#"[{"name":"a","type":"json"}]"#
        );
        assert!(dir.path().join("schema.meta").exists());
        assert!(!dir.path().join("schema.meta.tmp").exists());
    }

    #[test]
    fn file_overwrite() {
        let dir = tempdir().unwrap();
        let store = FileMetaStore::open(dir.path()).unwrap();
        store.set_meta("k", b"first value").unwrap();
        store.set_meta("k", b"2").unwrap();
        assert_eq!(store.get_meta("k").unwrap(), b"2");
    }

    #[test]
    fn file_delete() {
        let dir = tempdir().unwrap();
        let store = FileMetaStore::open(dir.path()).unwrap();
        store.set_meta("k", b"v").unwrap();
        store.delete_meta("k").unwrap();
        store.delete_meta("k").unwrap();
        assert!(!store.contains_meta("k").unwrap());
    }

    #[test]
    fn file_creates_nested_dirs() {
        let dir = tempdir().unwrap();
        let nested = dir.path().join("a").join("b");
        let store = FileMetaStore::open(&nested).unwrap();
        store.set_meta("k", b"v").unwrap();
        assert_eq!(store.path(), nested.as_path());
    }

    #[test]
    fn file_rejects_path_like_keys() {
        let dir = tempdir().unwrap();
        let store = FileMetaStore::open(dir.path()).unwrap();
        for key in ["", "../escape", ".hidden", "a/b", "sp ace"] {
            assert!(
                matches!(store.set_meta(key, b"v"), Err(StorageError::InvalidKey { .. })),
                "key {key:?} should be rejected"
            );
        }
    }
}
