//! The schema registry.

use crate::column::{Column, ColumnSpec};
use crate::column_store::ColumnStore;
use crate::config::{MergeOptions, SchemaConfig};
use crate::envelope::Envelope;
use crate::error::{CoreError, CoreResult};
use crate::key::{DelimitedKeyDecoder, KeyDecoder};
use dynschema_codec::{Document, RecordCodec};
use dynschema_storage::MetaStore;
use serde::{Serialize, Serializer};

/// Columns appended by one merge call.
///
/// Empty when the merge was a no-op, in which case nothing was persisted.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MergeOutcome {
    /// The appended columns, in append order.
    pub appended: Vec<Column>,
}

impl MergeOutcome {
    /// Whether the merge changed the schema.
    #[must_use]
    pub fn changed(&self) -> bool {
        !self.appended.is_empty()
    }
}

/// Dynamic document schema with its compiled codec.
///
/// The registry owns the ordered column list (through a [`ColumnStore`])
/// and a [`RecordCodec`] compiled from it. Merges append columns, recompile
/// the codec and write the list through to the metadata store before they
/// return.
///
/// # Lifecycle
///
/// A registry only exists once [`open`](Self::open) has loaded the
/// persisted schema, so no operation can run against a half-loaded one.
///
/// # Merge atomicity
///
/// A merge validates its whole batch before touching the column list. If
/// any declared column conflicts, nothing is appended. If persisting the
/// appended columns fails, they are removed again. Either way the live
/// column list always equals the last successfully persisted one.
///
/// # Concurrency
///
/// Merges take `&mut self`. Share a registry across threads behind a lock.
/// Registries in different processes over the same store are not
/// coordinated; the last write of the schema record wins.
///
/// # Example
///
/// ```rust
/// use dynschema_core::{Document, SchemaRegistry};
/// use dynschema_storage::InMemoryMetaStore;
///
/// let mut registry = SchemaRegistry::open(InMemoryMetaStore::new()).unwrap();
/// let doc = Document::new().with("title", "hello").with("key", "k1");
///
/// registry.merge_from_object(&doc).unwrap();
/// let payload = registry.encode(&doc).unwrap();
/// let envelope = registry.encode_binary("k1!1", &payload).unwrap();
///
/// let decoded = registry.decode_binary(&envelope).unwrap();
/// let body = registry.decode(&decoded.value).unwrap();
/// assert_eq!(body, Document::new().with("title", "hello"));
/// ```
pub struct SchemaRegistry<S, K = DelimitedKeyDecoder> {
    columns: ColumnStore<S>,
    codec: RecordCodec,
    keys: K,
    config: SchemaConfig,
}

impl<S: MetaStore> SchemaRegistry<S> {
    /// Opens a registry with the default configuration and key layout.
    ///
    /// # Errors
    ///
    /// Returns an error if the persisted schema cannot be read.
    pub fn open(store: S) -> CoreResult<Self> {
        Self::open_with(store, SchemaConfig::default(), DelimitedKeyDecoder::default())
    }
}

impl<S: MetaStore, K: KeyDecoder> SchemaRegistry<S, K> {
    /// Opens a registry with an explicit configuration and key decoder.
    ///
    /// # Errors
    ///
    /// Returns an error if the persisted schema cannot be read. A missing
    /// schema record is not an error: the registry starts empty.
    pub fn open_with(store: S, config: SchemaConfig, keys: K) -> CoreResult<Self> {
        let mut registry = Self {
            columns: ColumnStore::new(store, config.meta_key.clone()),
            codec: RecordCodec::default(),
            keys,
            config,
        };
        registry.reload()?;
        Ok(registry)
    }

    /// Re-reads the schema from storage and recompiles the codec.
    ///
    /// # Errors
    ///
    /// Returns an error if the persisted schema cannot be read; the
    /// in-memory schema is then left as it was.
    pub fn reload(&mut self) -> CoreResult<()> {
        self.columns.load()?;
        self.compile();
        Ok(())
    }

    /// Adds a `json` column for every new, non-null, non-reserved field of
    /// `doc`.
    ///
    /// Field order in the document decides column order.
    ///
    /// # Errors
    ///
    /// Only persistence can fail; the appended columns are then rolled back.
    pub fn merge_from_object(&mut self, doc: &Document) -> CoreResult<MergeOutcome> {
        let mut pending: Vec<Column> = Vec::new();
        for (name, value) in doc.iter() {
            if value.is_null() || self.config.is_reserved(name) {
                continue;
            }
            if self.columns.position(name).is_none() && !pending.iter().any(|c| c.name == name) {
                pending.push(Column::new(name, self.config.default_type));
            }
        }
        self.apply(pending)
    }

    /// Merges caller-declared columns.
    ///
    /// In permissive mode (default) columns are matched by name: new names
    /// are appended and existing names must keep their type. In strict mode
    /// the declaration must be a verbatim prefix or extension of the stored
    /// list: each declared column must equal the stored column at its
    /// position, and columns past the end are appended.
    ///
    /// Undeclared types resolve to the configured default type.
    ///
    /// # Errors
    ///
    /// - `ColumnMismatch` if a declaration conflicts with the stored list;
    ///   nothing is appended
    /// - `ReservedColumn` if a declaration uses a reserved name
    /// - storage errors if persisting fails; appended columns are rolled back
    pub fn merge<I>(&mut self, columns: I, options: MergeOptions) -> CoreResult<MergeOutcome>
    where
        I: IntoIterator,
        I::Item: Into<ColumnSpec>,
    {
        let declared: Vec<Column> = columns
            .into_iter()
            .map(|spec| Into::<ColumnSpec>::into(spec).resolve(self.config.default_type))
            .collect();

        if let Some(col) = declared.iter().find(|c| self.config.is_reserved(&c.name)) {
            return Err(CoreError::ReservedColumn {
                name: col.name.clone(),
            });
        }

        let pending = if options.strict {
            self.plan_strict(declared)?
        } else {
            self.plan_permissive(declared)?
        };
        self.apply(pending)
    }

    fn plan_permissive(&self, declared: Vec<Column>) -> CoreResult<Vec<Column>> {
        let mut pending: Vec<Column> = Vec::new();
        for column in declared {
            let existing = match self.columns.position(&column.name) {
                Some(pos) => Some((pos, self.columns.columns()[pos].clone())),
                None => pending
                    .iter()
                    .position(|c| c.name == column.name)
                    .map(|i| (self.columns.len() + i, pending[i].clone())),
            };
            match existing {
                None => pending.push(column),
                Some((pos, stored)) if stored.ty != column.ty => {
                    return Err(CoreError::column_mismatch(pos, stored, column));
                }
                Some(_) => {}
            }
        }
        Ok(pending)
    }

    fn plan_strict(&self, declared: Vec<Column>) -> CoreResult<Vec<Column>> {
        let stored = self.columns.columns();
        let mut pending: Vec<Column> = Vec::new();
        for (pos, column) in declared.into_iter().enumerate() {
            if let Some(existing) = stored.get(pos) {
                if *existing != column {
                    return Err(CoreError::column_mismatch(pos, existing.clone(), column));
                }
                continue;
            }
            // Past the end: a name already in use would break uniqueness.
            let clash = self
                .columns
                .position(&column.name)
                .map(|p| (p, stored[p].clone()))
                .or_else(|| {
                    pending
                        .iter()
                        .position(|c| c.name == column.name)
                        .map(|i| (stored.len() + i, pending[i].clone()))
                });
            if let Some((p, existing)) = clash {
                return Err(CoreError::column_mismatch(p, existing, column));
            }
            pending.push(column);
        }
        Ok(pending)
    }

    /// Appends validated columns, recompiles and persists.
    fn apply(&mut self, pending: Vec<Column>) -> CoreResult<MergeOutcome> {
        if pending.is_empty() {
            tracing::debug!("merge found no new columns");
            return Ok(MergeOutcome::default());
        }

        let base_len = self.columns.len();
        for column in &pending {
            self.columns.append(column.clone());
        }
        self.compile();

        if let Err(e) = self.columns.save() {
            tracing::warn!(error = %e, columns = pending.len(), "schema save failed, rolling back");
            self.columns.truncate(base_len);
            self.compile();
            return Err(e);
        }

        tracing::info!(
            appended = pending.len(),
            total = self.columns.len(),
            names = ?pending.iter().map(|c| c.name.as_str()).collect::<Vec<_>>(),
            "schema extended"
        );
        Ok(MergeOutcome { appended: pending })
    }

    fn compile(&mut self) {
        self.codec = RecordCodec::compile(
            self.columns
                .columns()
                .iter()
                .map(|c| (c.name.clone(), c.ty)),
        );
    }

    /// Encodes a document's typed fields with the current codec.
    ///
    /// Reserved fields, null fields and fields without a column are left out;
    /// merge first to keep new fields.
    ///
    /// # Errors
    ///
    /// Returns the codec's error if a field's value does not fit its column.
    pub fn encode(&self, doc: &Document) -> CoreResult<Vec<u8>> {
        Ok(self.codec.encode(doc)?)
    }

    /// Decodes a payload produced by [`encode`](Self::encode).
    ///
    /// # Errors
    ///
    /// Returns the codec's error for malformed payloads.
    pub fn decode(&self, bytes: &[u8]) -> CoreResult<Document> {
        Ok(self.codec.decode(bytes)?)
    }

    /// Whether every field with a column holds a value of the column's type.
    #[must_use]
    pub fn validate(&self, doc: &Document) -> bool {
        self.codec.validate(doc)
    }

    /// Wraps an encoded payload in the envelope for `key`.
    ///
    /// # Errors
    ///
    /// Returns `InvalidKey` if the key cannot be parsed.
    pub fn encode_binary(&self, key: &str, value: &[u8]) -> CoreResult<Vec<u8>> {
        Envelope::for_key(key, value.to_vec(), &self.keys)?.encode()
    }

    /// Unwraps an envelope. The payload stays encoded.
    ///
    /// # Errors
    ///
    /// Returns an error if the bytes are not a valid envelope.
    pub fn decode_binary(&self, bytes: &[u8]) -> CoreResult<Envelope> {
        Envelope::decode(bytes)
    }

    /// The live column list.
    #[must_use]
    pub fn to_json(&self) -> &[Column] {
        self.columns.columns()
    }

    /// The live column list.
    #[must_use]
    pub fn columns(&self) -> &[Column] {
        self.columns.columns()
    }

    /// The column named `name`.
    #[must_use]
    pub fn column(&self, name: &str) -> Option<&Column> {
        self.columns.get(name)
    }

    /// Whether `name` can never become a column.
    #[must_use]
    pub fn is_reserved(&self, name: &str) -> bool {
        self.config.is_reserved(name)
    }

    /// The registry's configuration.
    #[must_use]
    pub fn config(&self) -> &SchemaConfig {
        &self.config
    }

    /// The metadata store.
    pub fn store(&self) -> &S {
        self.columns.store()
    }
}

impl<S, K> Serialize for SchemaRegistry<S, K>
where
    S: MetaStore,
    K: KeyDecoder,
{
    fn serialize<Ser: Serializer>(&self, serializer: Ser) -> Result<Ser::Ok, Ser::Error> {
        self.columns.columns().serialize(serializer)
    }
}

impl<S, K> std::fmt::Debug for SchemaRegistry<S, K> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SchemaRegistry")
            .field("meta_key", &self.config.meta_key)
            .field("columns", &self.codec.len())
            .finish_non_exhaustive()
    }
}
