//! Registry configuration.

use crate::column::TypeTag;

/// Metadata key the schema record is stored under by default.
pub const DEFAULT_META_KEY: &str = "schema";

/// Field names that never become columns by default.
///
/// They belong to the envelope or are injected by the store.
pub const DEFAULT_RESERVED: [&str; 4] = ["key", "change", "version", "deleted"];

/// Configuration for opening a schema registry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SchemaConfig {
    /// Metadata key holding the persisted column list.
    pub meta_key: String,

    /// Names that are never eligible to become columns.
    pub reserved: Vec<String>,

    /// Type given to columns declared without one and to fields
    /// discovered by `merge_from_object`.
    pub default_type: TypeTag,
}

impl Default for SchemaConfig {
    fn default() -> Self {
        Self {
            meta_key: DEFAULT_META_KEY.to_string(),
            reserved: DEFAULT_RESERVED.iter().map(|s| (*s).to_string()).collect(),
            default_type: TypeTag::Json,
        }
    }
}

impl SchemaConfig {
    /// Creates a new configuration with default values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the metadata key.
    #[must_use]
    pub fn meta_key(mut self, key: impl Into<String>) -> Self {
        self.meta_key = key.into();
        self
    }

    /// Adds a reserved name.
    #[must_use]
    pub fn reserve(mut self, name: impl Into<String>) -> Self {
        let name = name.into();
        if !self.reserved.contains(&name) {
            self.reserved.push(name);
        }
        self
    }

    /// Sets the default column type.
    #[must_use]
    pub const fn default_type(mut self, ty: TypeTag) -> Self {
        self.default_type = ty;
        self
    }

    /// Whether `name` is reserved.
    #[must_use]
    pub fn is_reserved(&self, name: &str) -> bool {
        self.reserved.iter().any(|r| r == name)
    }
}

/// Options for [`SchemaRegistry::merge`](crate::SchemaRegistry::merge).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MergeOptions {
    /// Match declared columns by position instead of by name.
    pub strict: bool,
}

impl MergeOptions {
    /// Name-keyed merge (the default).
    #[must_use]
    pub const fn permissive() -> Self {
        Self { strict: false }
    }

    /// Positional merge.
    #[must_use]
    pub const fn strict() -> Self {
        Self { strict: true }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config() {
        let config = SchemaConfig::default();
        assert_eq!(config.meta_key, "schema");
        assert_eq!(config.default_type, TypeTag::Json);
        for name in ["key", "change", "version", "deleted"] {
            assert!(config.is_reserved(name));
        }
        assert!(!config.is_reserved("Key"));
    }

    #[test]
    fn builder_pattern() {
        let config = SchemaConfig::new()
            .meta_key("people.schema")
            .reserve("_id")
            .reserve("_id")
            .default_type(TypeTag::String);

        assert_eq!(config.meta_key, "people.schema");
        assert_eq!(config.reserved.len(), 5);
        assert!(config.is_reserved("_id"));
        assert_eq!(config.default_type, TypeTag::String);
    }

    #[test]
    fn merge_options() {
        assert!(!MergeOptions::default().strict);
        assert!(MergeOptions::strict().strict);
        assert_eq!(MergeOptions::permissive(), MergeOptions::default());
    }
}
