//! Durable, append-only column list.

use crate::column::Column;
use crate::error::{CoreError, CoreResult};
use dynschema_storage::MetaStore;
use std::collections::HashMap;

/// The ordered column list and its name index, backed by a [`MetaStore`].
///
/// The list is persisted as a JSON array of `{"name", "type"}` objects under
/// one metadata key. Columns are only ever appended; `truncate` exists to
/// undo appends that failed to persist.
#[derive(Debug)]
pub struct ColumnStore<S> {
    store: S,
    meta_key: String,
    columns: Vec<Column>,
    index: HashMap<String, usize>,
}

impl<S: MetaStore> ColumnStore<S> {
    /// Creates an empty column store. Call [`load`](Self::load) to read the
    /// persisted record.
    pub fn new(store: S, meta_key: impl Into<String>) -> Self {
        Self {
            store,
            meta_key: meta_key.into(),
            columns: Vec::new(),
            index: HashMap::new(),
        }
    }

    /// Replaces the in-memory list with the persisted one.
    ///
    /// A missing record loads as an empty list.
    ///
    /// # Errors
    ///
    /// Storage errors other than "not found" propagate. A record that is not
    /// a valid column array, or that repeats a name, is `CorruptSchema`.
    pub fn load(&mut self) -> CoreResult<&[Column]> {
        let columns = match self.store.get_meta(&self.meta_key) {
            Ok(bytes) => decode_record(&bytes)?,
            Err(e) if e.is_not_found() => Vec::new(),
            Err(e) => return Err(e.into()),
        };

        self.index = build_index(&columns)?;
        self.columns = columns;
        tracing::debug!(key = %self.meta_key, columns = self.columns.len(), "schema loaded");
        Ok(&self.columns)
    }

    /// Writes the full in-memory list under the metadata key.
    ///
    /// # Errors
    ///
    /// Returns the store's error if the write fails.
    pub fn save(&self) -> CoreResult<()> {
        let bytes = serde_json::to_vec(&self.columns)?;
        self.store.set_meta(&self.meta_key, &bytes)?;
        Ok(())
    }

    /// Appends a column in memory and returns its position.
    ///
    /// The caller guarantees the name is new; the append is not durable
    /// until [`save`](Self::save) succeeds.
    pub fn append(&mut self, column: Column) -> usize {
        debug_assert!(!self.index.contains_key(&column.name));
        let position = self.columns.len();
        self.index.insert(column.name.clone(), position);
        self.columns.push(column);
        position
    }

    /// Drops columns past `len`. Used to roll back unsaved appends.
    pub fn truncate(&mut self, len: usize) {
        for column in self.columns.drain(len.min(self.columns.len())..) {
            self.index.remove(&column.name);
        }
    }

    /// Position of the column named `name`.
    #[must_use]
    pub fn position(&self, name: &str) -> Option<usize> {
        self.index.get(name).copied()
    }

    /// The column named `name`.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Column> {
        self.position(name).map(|i| &self.columns[i])
    }

    /// The ordered column list.
    #[must_use]
    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    /// Number of columns.
    #[must_use]
    pub fn len(&self) -> usize {
        self.columns.len()
    }

    /// Whether there are no columns.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    /// The metadata key the list is stored under.
    #[must_use]
    pub fn meta_key(&self) -> &str {
        &self.meta_key
    }

    /// The underlying metadata store.
    pub fn store(&self) -> &S {
        &self.store
    }
}

fn decode_record(bytes: &[u8]) -> CoreResult<Vec<Column>> {
    serde_json::from_slice(bytes).map_err(|e| CoreError::corrupt_schema(e.to_string()))
}

fn build_index(columns: &[Column]) -> CoreResult<HashMap<String, usize>> {
    let mut index = HashMap::with_capacity(columns.len());
    for (i, column) in columns.iter().enumerate() {
        if index.insert(column.name.clone(), i).is_some() {
            return Err(CoreError::corrupt_schema(format!(
                "duplicate column '{}' at position {i}",
                column.name
            )));
        }
    }
    Ok(index)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::column::TypeTag;
    use dynschema_storage::{InMemoryMetaStore, StorageError};
    use std::sync::Arc;

    #[test]
    fn missing_record_loads_empty() {
        let mut cs = ColumnStore::new(InMemoryMetaStore::new(), "schema");
        assert!(cs.load().unwrap().is_empty());
        assert!(cs.is_empty());
    }

    #[test]
    fn save_then_load_preserves_order() {
        let store = Arc::new(InMemoryMetaStore::new());
        let mut cs = ColumnStore::new(Arc::clone(&store), "schema");
        cs.append(Column::json("b"));
        cs.append(Column::new("a", TypeTag::String));
        cs.save().unwrap();

        assert_eq!(
            store.raw("schema").unwrap(),
            br#"[{"name":"b","type":"json"},{"name":"a","type":"string"}]"#
        );

        let mut reloaded = ColumnStore::new(store, "schema");
        reloaded.load().unwrap();
        assert_eq!(reloaded.columns(), cs.columns());
        assert_eq!(reloaded.position("a"), Some(1));
    }

    #[test]
    fn corrupt_record_is_rejected() {
        let store = InMemoryMetaStore::with_entry("schema", b"{not json".to_vec());
        let mut cs = ColumnStore::new(store, "schema");
        assert!(matches!(cs.load(), Err(CoreError::CorruptSchema { .. })));
    }

    #[test]
    fn duplicate_names_are_rejected() {
        let record = br#"[{"name":"a","type":"json"},{"name":"a","type":"bool"}]"#;
        let mut cs = ColumnStore::new(InMemoryMetaStore::with_entry("schema", record.to_vec()), "schema");
        assert!(matches!(cs.load(), Err(CoreError::CorruptSchema { .. })));
    }

    #[test]
    fn truncate_drops_index_entries() {
        let mut cs = ColumnStore::new(InMemoryMetaStore::new(), "schema");
        cs.append(Column::json("a"));
        cs.append(Column::json("b"));
        cs.truncate(1);
        assert_eq!(cs.len(), 1);
        assert_eq!(cs.position("b"), None);
        assert_eq!(cs.get("a"), Some(&Column::json("a")));
    }

    #[test]
    fn save_failure_propagates() {
        let store = InMemoryMetaStore::new();
        store.fail_writes(true);
        let mut cs = ColumnStore::new(store, "schema");
        cs.append(Column::json("a"));
        assert!(matches!(
            cs.save(),
            Err(CoreError::Storage(StorageError::WriteRejected { .. }))
        ));
    }

    #[test]
    fn custom_meta_key() {
        let store = Arc::new(InMemoryMetaStore::new());
        let mut cs = ColumnStore::new(Arc::clone(&store), "people.schema");
        cs.append(Column::json("a"));
        cs.save().unwrap();
        assert!(store.raw("people.schema").is_some());
        assert!(store.raw("schema").is_none());
    }
}
