//! Benchmark utilities.

#![deny(unsafe_code)]
#![warn(missing_docs)]

use dynschema_codec::{Document, FieldType, Value};
use rand::Rng;

/// Column name for position `i`.
pub fn column_name(i: usize) -> String {
    format!("field_{i}")
}

/// A `(name, type)` list of `width` columns cycling through every type.
pub fn columns(width: usize) -> Vec<(String, FieldType)> {
    (0..width)
        .map(|i| (column_name(i), FieldType::ALL[i % FieldType::ALL.len()]))
        .collect()
}

/// A random value accepted by `ty`.
pub fn random_value(ty: FieldType, rng: &mut impl Rng) -> Value {
    match ty {
        FieldType::String => Value::Text(random_text(rng, 16)),
        FieldType::Bytes => Value::Bytes((0..32).map(|_| rng.gen()).collect()),
        FieldType::Bool => Value::Bool(rng.gen()),
        FieldType::Integer => Value::Integer(rng.gen()),
        FieldType::Json => Value::Array(vec![
            Value::Text(random_text(rng, 8)),
            Value::Integer(rng.gen_range(0..1000)),
        ]),
    }
}

/// A random document filling every column produced by [`columns`].
pub fn random_document(width: usize) -> Document {
    let mut rng = rand::thread_rng();
    columns(width)
        .into_iter()
        .map(|(name, ty)| {
            let value = random_value(ty, &mut rng);
            (name, value)
        })
        .collect()
}

fn random_text(rng: &mut impl Rng, len: usize) -> String {
    (0..len).map(|_| rng.gen_range(b'a'..=b'z') as char).collect()
}
