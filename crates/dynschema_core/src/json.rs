//! Conversions between documents and `serde_json` values.

use crate::error::{CoreError, CoreResult};
use dynschema_codec::{Document, Value};
use serde_json::{Map, Number, Value as Json};

/// Converts a JSON object into a document, keeping field order as given.
///
/// # Errors
///
/// Returns `InvalidDocument` if `json` is not an object or contains a
/// number that is not an `i64` (floats are not representable).
pub fn document_from_json(json: Json) -> CoreResult<Document> {
    let Json::Object(map) = json else {
        return Err(CoreError::invalid_document("expected a JSON object"));
    };
    map.into_iter()
        .map(|(name, v)| Ok((name, value_from_json(v)?)))
        .collect()
}

/// Converts a JSON value into a document value.
///
/// # Errors
///
/// Returns `InvalidDocument` for numbers outside the `i64` range or with a
/// fractional part.
pub fn value_from_json(json: Json) -> CoreResult<Value> {
    Ok(match json {
        Json::Null => Value::Null,
        Json::Bool(b) => Value::Bool(b),
        Json::Number(n) => Value::Integer(
            n.as_i64()
                .ok_or_else(|| CoreError::invalid_document(format!("unsupported number {n}")))?,
        ),
        Json::String(s) => Value::Text(s),
        Json::Array(items) => Value::Array(
            items
                .into_iter()
                .map(value_from_json)
                .collect::<CoreResult<_>>()?,
        ),
        Json::Object(map) => Value::map(
            map.into_iter()
                .map(|(k, v)| Ok((Value::Text(k), value_from_json(v)?)))
                .collect::<CoreResult<_>>()?,
        ),
    })
}

/// Converts a document into a JSON object.
pub fn document_to_json(doc: &Document) -> Json {
    Json::Object(
        doc.iter()
            .map(|(name, v)| (name.to_string(), value_to_json(v)))
            .collect(),
    )
}

/// Converts a document value into JSON.
///
/// Byte strings become arrays of numbers and non-text map keys are
/// rendered with their JSON text, so this direction is lossy.
pub fn value_to_json(value: &Value) -> Json {
    match value {
        Value::Null => Json::Null,
        Value::Bool(b) => Json::Bool(*b),
        Value::Integer(n) => Json::Number(Number::from(*n)),
        Value::Text(s) => Json::String(s.clone()),
        Value::Bytes(b) => Json::Array(b.iter().map(|byte| Json::from(*byte)).collect()),
        Value::Array(items) => Json::Array(items.iter().map(value_to_json).collect()),
        Value::Map(pairs) => {
            let mut map = Map::with_capacity(pairs.len());
            for (k, v) in pairs {
                let key = match k {
                    Value::Text(s) => s.clone(),
                    other => value_to_json(other).to_string(),
                };
                map.insert(key, value_to_json(v));
            }
            Json::Object(map)
        }
    }
}
