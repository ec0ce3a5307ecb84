//! Dynamic document value type.

use crate::encoder::CanonicalEncoder;

/// Deepest nesting of arrays and maps the codec encodes or decodes. A
/// scalar at top level has depth 1.
pub const MAX_NESTING_DEPTH: usize = 128;

/// A dynamic document value.
///
/// Every field of a document holds one of these. Floats are not
/// representable, matching the canonical CBOR rules the codec enforces.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Value {
    /// Null value. A null field is treated as absent.
    Null,
    /// Boolean value.
    Bool(bool),
    /// Signed integer (full i64 range).
    Integer(i64),
    /// Byte string.
    Bytes(Vec<u8>),
    /// Text string (UTF-8).
    Text(String),
    /// Array of values.
    Array(Vec<Value>),
    /// Map of key-value pairs in the order given.
    ///
    /// The encoder always writes keys in canonical order and the decoder
    /// returns them that way, so a map compares equal to its decoded form
    /// only if it was already in canonical order. Build maps with
    /// [`Value::map`] to get that.
    Map(Vec<(Value, Value)>),
}

impl Value {
    /// Create a map value with keys in canonical order.
    ///
    /// Keys are ordered the way the encoder writes them (encoded length
    /// first, then bytewise), so a map built here compares equal to the
    /// same map after a decode. A repeated key keeps its last value.
    pub fn map(pairs: Vec<(Value, Value)>) -> Self {
        let mut keyed: Vec<(Vec<u8>, (Value, Value))> = pairs
            .into_iter()
            .map(|(k, v)| (canonical_key_bytes(&k), (k, v)))
            .collect();
        // Stable, so equal keys stay in insertion order.
        keyed.sort_by(|a, b| a.0.len().cmp(&b.0.len()).then_with(|| a.0.cmp(&b.0)));

        let mut out: Vec<(Vec<u8>, (Value, Value))> = Vec::with_capacity(keyed.len());
        for entry in keyed {
            match out.last_mut() {
                Some(last) if last.0 == entry.0 => *last = entry,
                _ => out.push(entry),
            }
        }
        Value::Map(out.into_iter().map(|(_, pair)| pair).collect())
    }

    /// Whether the encoder accepts this value: no map repeats a key and
    /// nesting stays within [`MAX_NESTING_DEPTH`].
    pub fn is_encodable(&self) -> bool {
        self.encodable_at(1)
    }

    /// Like [`is_encodable`](Self::is_encodable), for a value held inside a
    /// container.
    pub(crate) fn is_encodable_nested(&self) -> bool {
        self.encodable_at(2)
    }

    fn encodable_at(&self, depth: usize) -> bool {
        if depth > MAX_NESTING_DEPTH {
            return false;
        }
        match self {
            Value::Array(items) => items.iter().all(|v| v.encodable_at(depth + 1)),
            Value::Map(pairs) => {
                let mut keys: Vec<Vec<u8>> = pairs.iter().map(|(k, _)| canonical_key_bytes(k)).collect();
                keys.sort();
                !keys.windows(2).any(|w| w[0] == w[1])
                    && pairs
                        .iter()
                        .all(|(k, v)| k.encodable_at(depth + 1) && v.encodable_at(depth + 1))
            }
            _ => true,
        }
    }

    /// Short name of this value's kind, used in error messages.
    pub fn kind(&self) -> &'static str {
        match self {
            Value::Null => "null",
            Value::Bool(_) => "bool",
            Value::Integer(_) => "integer",
            Value::Bytes(_) => "bytes",
            Value::Text(_) => "string",
            Value::Array(_) => "array",
            Value::Map(_) => "map",
        }
    }

    /// Check if this value is null.
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Get this value as a boolean, if it is one.
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// Get this value as an integer, if it is one.
    pub fn as_integer(&self) -> Option<i64> {
        match self {
            Value::Integer(n) => Some(*n),
            _ => None,
        }
    }

    /// Get this value as bytes, if it is a byte string.
    pub fn as_bytes(&self) -> Option<&[u8]> {
        match self {
            Value::Bytes(b) => Some(b),
            _ => None,
        }
    }

    /// Get this value as a string, if it is a text string.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Value::Text(s) => Some(s),
            _ => None,
        }
    }

    /// Get this value as an array, if it is one.
    pub fn as_array(&self) -> Option<&[Value]> {
        match self {
            Value::Array(a) => Some(a),
            _ => None,
        }
    }

    /// Get this value as a map, if it is one.
    pub fn as_map(&self) -> Option<&[(Value, Value)]> {
        match self {
            Value::Map(m) => Some(m),
            _ => None,
        }
    }

    /// Look up an integer key in this map value.
    pub fn get_index(&self, key: i64) -> Option<&Value> {
        self.as_map()?
            .iter()
            .find(|(k, _)| k.as_integer() == Some(key))
            .map(|(_, v)| v)
    }
}

fn canonical_key_bytes(key: &Value) -> Vec<u8> {
    let mut encoder = CanonicalEncoder::new();
    // Unencodable keys sort first; the encoder reports them.
    if encoder.encode(key).is_err() {
        return Vec::new();
    }
    encoder.into_bytes()
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Value::Integer(n)
    }
}

impl From<i32> for Value {
    fn from(n: i32) -> Self {
        Value::Integer(i64::from(n))
    }
}

impl From<u32> for Value {
    fn from(n: u32) -> Self {
        Value::Integer(i64::from(n))
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Text(s)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Text(s.to_string())
    }
}

impl From<Vec<u8>> for Value {
    fn from(b: Vec<u8>) -> Self {
        Value::Bytes(b)
    }
}

impl From<&[u8]> for Value {
    fn from(b: &[u8]) -> Self {
        Value::Bytes(b.to_vec())
    }
}

impl From<()> for Value {
    fn from((): ()) -> Self {
        Value::Null
    }
}
