//! Field type tags understood by the record codec.

use crate::value::Value;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// The declared type of a record field.
///
/// `Json` is the wildcard: it accepts any encodable [`Value`] and leaves its
/// shape to the caller. Serialized names are lowercase and compared case-sensitively.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldType {
    /// UTF-8 text.
    String,
    /// Raw bytes.
    Bytes,
    /// Boolean.
    Bool,
    /// Signed 64-bit integer.
    Integer,
    /// Opaque value of any shape.
    #[default]
    Json,
}

impl FieldType {
    /// All field types, in declaration order.
    pub const ALL: [FieldType; 5] = [
        FieldType::String,
        FieldType::Bytes,
        FieldType::Bool,
        FieldType::Integer,
        FieldType::Json,
    ];

    /// The persisted name of this type.
    pub fn as_str(&self) -> &'static str {
        match self {
            FieldType::String => "string",
            FieldType::Bytes => "bytes",
            FieldType::Bool => "bool",
            FieldType::Integer => "integer",
            FieldType::Json => "json",
        }
    }

    /// Whether `value` may be stored in a field of this type.
    ///
    /// Null is never stored; callers treat it as an absent field. `Json`
    /// accepts any value the encoder can write (see [`Value::is_encodable`]).
    pub fn accepts(&self, value: &Value) -> bool {
        match (self, value) {
            (_, Value::Null) => false,
            // Record fields sit one level inside the record map.
            (FieldType::Json, v) => v.is_encodable_nested(),
            (FieldType::String, Value::Text(_))
            | (FieldType::Bytes, Value::Bytes(_))
            | (FieldType::Bool, Value::Bool(_))
            | (FieldType::Integer, Value::Integer(_)) => true,
            _ => false,
        }
    }
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FieldType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        FieldType::ALL
            .into_iter()
            .find(|t| t.as_str() == s)
            .ok_or_else(|| format!("unknown field type '{s}'"))
    }
}
