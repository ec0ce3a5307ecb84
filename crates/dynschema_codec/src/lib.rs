//! # DynSchema Codec
//!
//! Byte-level packing for DynSchema documents.
//!
//! This crate knows nothing about schemas, storage or keys. It provides:
//!
//! - [`Value`], the dynamic value held by document fields
//! - a deterministic canonical CBOR encoder and a strict decoder
//! - [`RecordCodec`], compiled from an ordered `(name, FieldType)` list,
//!   which packs a [`Document`] positionally
//!
//! ## Canonical CBOR rules
//!
//! - Map keys are sorted by encoded form (length first, then bytewise)
//! - Integers and lengths use the shortest head
//! - No floats, no indefinite-length items
//!
//! ## Usage
//!
//! ```
//! use dynschema_codec::{Document, FieldType, RecordCodec};
//!
//! let codec = RecordCodec::compile([("name", FieldType::String), ("age", FieldType::Integer)]);
//! let doc = Document::new().with("name", "Alice").with("age", 30);
//!
//! let bytes = codec.encode(&doc).unwrap();
//! assert_eq!(codec.decode(&bytes).unwrap(), doc);
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

mod decoder;
mod document;
mod encoder;
mod error;
mod field;
mod record;
mod value;

pub use decoder::{from_cbor, CanonicalDecoder};
pub use document::Document;
pub use encoder::{to_canonical_cbor, CanonicalEncoder};
pub use error::{CodecError, CodecResult};
pub use field::FieldType;
pub use record::RecordCodec;
pub use value::{Value, MAX_NESTING_DEPTH};

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn scalar() -> impl Strategy<Value = Value> {
        prop_oneof![
            Just(Value::Null),
            any::<bool>().prop_map(Value::Bool),
            any::<i64>().prop_map(Value::Integer),
            prop::collection::vec(any::<u8>(), 0..64).prop_map(Value::Bytes),
            "[a-zA-Z0-9 ]{0,32}".prop_map(Value::Text),
        ]
    }

    fn value() -> impl Strategy<Value = Value> {
        scalar().prop_recursive(3, 32, 6, |inner| {
            prop_oneof![
                prop::collection::vec(inner.clone(), 0..6).prop_map(Value::Array),
                prop::collection::vec(("[a-z]{1,6}", inner), 0..6).prop_map(|pairs| {
                    let mut seen = std::collections::HashSet::new();
                    Value::map(
                        pairs
                            .into_iter()
                            .filter(|(k, _)| seen.insert(k.clone()))
                            .map(|(k, v)| (Value::Text(k), v))
                            .collect(),
                    )
                }),
            ]
        })
    }

    proptest! {
        #[test]
        fn canonical_bytes_decode_to_same_value(v in value()) {
            let bytes = to_canonical_cbor(&v).unwrap();
            prop_assert_eq!(from_cbor(&bytes).unwrap(), v);
        }
    }
}
