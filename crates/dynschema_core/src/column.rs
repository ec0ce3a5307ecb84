//! Columns and column declarations.

use serde::{Deserialize, Serialize};
use std::fmt;

/// The type of a column.
///
/// Persisted as lowercase names (`"string"`, `"bytes"`, `"bool"`,
/// `"integer"`, `"json"`). `json` is the untyped wildcard.
pub use dynschema_codec::FieldType as TypeTag;

/// A named, typed field of the document schema.
///
/// Serializes as `{"name": ..., "type": ...}`, the shape of one entry of
/// the persisted schema record.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Column {
    /// Field name, unique within a schema.
    pub name: String,
    /// Field type.
    #[serde(rename = "type")]
    pub ty: TypeTag,
}

impl Column {
    /// Creates a column.
    pub fn new(name: impl Into<String>, ty: TypeTag) -> Self {
        Self {
            name: name.into(),
            ty,
        }
    }

    /// Creates a `json` column.
    pub fn json(name: impl Into<String>) -> Self {
        Self::new(name, TypeTag::Json)
    }
}

impl fmt::Display for Column {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.name, self.ty)
    }
}

/// A column as declared by a caller of `merge`.
///
/// The type is optional; an undeclared type resolves to the registry's
/// default type (normally `json`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnSpec {
    /// Field name.
    pub name: String,
    /// Declared type, if any.
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub ty: Option<TypeTag>,
}

impl ColumnSpec {
    /// Declares a typed column.
    pub fn typed(name: impl Into<String>, ty: TypeTag) -> Self {
        Self {
            name: name.into(),
            ty: Some(ty),
        }
    }

    /// Declares a column without a type.
    pub fn untyped(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ty: None,
        }
    }

    /// Resolves the declaration into a column.
    #[must_use]
    pub fn resolve(&self, default_type: TypeTag) -> Column {
        Column::new(self.name.clone(), self.ty.unwrap_or(default_type))
    }
}

impl From<&str> for ColumnSpec {
    fn from(name: &str) -> Self {
        Self::untyped(name)
    }
}

impl From<String> for ColumnSpec {
    fn from(name: String) -> Self {
        Self::untyped(name)
    }
}

impl From<Column> for ColumnSpec {
    fn from(column: Column) -> Self {
        Self {
            name: column.name,
            ty: Some(column.ty),
        }
    }
}

impl From<(&str, TypeTag)> for ColumnSpec {
    fn from((name, ty): (&str, TypeTag)) -> Self {
        Self::typed(name, ty)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn column_json_shape() {
        let col = Column::new("title", TypeTag::String);
        assert_eq!(
            serde_json::to_string(&col).unwrap(),
            r#"{"name":"title","type":"string"}"#
        );
        let back: Column = serde_json::from_str(r#"{"name":"n","type":"integer"}"#).unwrap();
        assert_eq!(back, Column::new("n", TypeTag::Integer));
    }

    #[test]
    fn type_names_are_case_sensitive_in_records() {
        assert!(serde_json::from_str::<Column>(r#"{"name":"n","type":"JSON"}"#).is_err());
    }

    #[test]
    fn spec_without_type_uses_default() {
        let spec: ColumnSpec = serde_json::from_str(r#"{"name":"a"}"#).unwrap();
        assert_eq!(spec, ColumnSpec::untyped("a"));
        assert_eq!(spec.resolve(TypeTag::Json), Column::json("a"));
        assert_eq!(
            ColumnSpec::from("b").resolve(TypeTag::String),
            Column::new("b", TypeTag::String)
        );
        assert_eq!(
            ColumnSpec::from(("c", TypeTag::Bool)).resolve(TypeTag::Json),
            Column::new("c", TypeTag::Bool)
        );
    }
}
