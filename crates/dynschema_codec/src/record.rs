//! Positional record codec compiled from an ordered field list.

use crate::decoder::from_cbor;
use crate::document::Document;
use crate::encoder::to_canonical_cbor;
use crate::error::{CodecError, CodecResult};
use crate::field::FieldType;
use crate::value::Value;
use std::collections::HashMap;

/// A codec for documents with a fixed, ordered field list.
///
/// A record is a canonical CBOR map from field position to value. Positions
/// are the only thing written to the wire, so a payload encoded with a field
/// list decodes unchanged with any extension of that list.
///
/// Fields of a document that the codec was not compiled with are skipped on
/// encode. Null values are skipped as absent.
#[derive(Debug, Clone, Default)]
pub struct RecordCodec {
    fields: Vec<(String, FieldType)>,
    positions: HashMap<String, usize>,
}

impl RecordCodec {
    /// Compiles a codec for the given ordered fields.
    ///
    /// If a name appears twice, the first position wins.
    pub fn compile<I, S>(fields: I) -> Self
    where
        I: IntoIterator<Item = (S, FieldType)>,
        S: Into<String>,
    {
        let fields: Vec<(String, FieldType)> =
            fields.into_iter().map(|(n, t)| (n.into(), t)).collect();
        let mut positions = HashMap::with_capacity(fields.len());
        for (i, (name, _)) in fields.iter().enumerate() {
            positions.entry(name.clone()).or_insert(i);
        }
        Self { fields, positions }
    }

    /// Number of fields this codec was compiled with.
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Whether the codec has no fields.
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// The ordered field list.
    pub fn fields(&self) -> &[(String, FieldType)] {
        &self.fields
    }

    /// Position of a field, if compiled in.
    pub fn position(&self, name: &str) -> Option<usize> {
        self.positions.get(name).copied()
    }

    /// Encodes a document.
    ///
    /// # Errors
    ///
    /// Returns [`CodecError::TypeMismatch`] if a known field holds a value
    /// its type does not accept.
    pub fn encode(&self, doc: &Document) -> CodecResult<Vec<u8>> {
        let mut pairs = Vec::with_capacity(doc.len());
        for (name, value) in doc.iter() {
            if value.is_null() {
                continue;
            }
            let Some(pos) = self.position(name) else {
                tracing::debug!(field = name, "skipping field without a column");
                continue;
            };
            let ty = self.fields[pos].1;
            if !ty.accepts(value) {
                return Err(CodecError::type_mismatch(name, ty.as_str(), value.kind()));
            }
            pairs.push((Value::Integer(pos as i64), value.clone()));
        }
        to_canonical_cbor(&Value::Map(pairs))
    }

    /// Decodes a record into a document with fields in position order.
    ///
    /// # Errors
    ///
    /// Returns an error if the bytes are not a canonical record map, name a
    /// position this codec does not know, or hold a value of the wrong type.
    pub fn decode(&self, bytes: &[u8]) -> CodecResult<Document> {
        let value = from_cbor(bytes)?;
        let Value::Map(pairs) = value else {
            return Err(CodecError::decoding_failed(format!(
                "expected record map, found {}",
                value.kind()
            )));
        };

        // Canonical integer keys arrive in ascending position order.
        let mut doc = Document::new();
        for (key, value) in pairs {
            let position = key.as_integer().ok_or_else(|| {
                CodecError::decoding_failed(format!("record key must be an integer, found {}", key.kind()))
            })?;
            let (name, ty) = usize::try_from(position)
                .ok()
                .and_then(|p| self.fields.get(p))
                .ok_or(CodecError::UnknownField { position })?;
            if !ty.accepts(&value) {
                return Err(CodecError::type_mismatch(name.as_str(), ty.as_str(), value.kind()));
            }
            doc.insert(name.clone(), value);
        }
        Ok(doc)
    }

    /// Whether every known, non-null field conforms to its type.
    pub fn validate(&self, doc: &Document) -> bool {
        doc.iter().all(|(name, value)| {
            value.is_null()
                || self
                    .position(name)
                    .map_or(true, |pos| self.fields[pos].1.accepts(value))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::MAX_NESTING_DEPTH;

    fn codec() -> RecordCodec {
        RecordCodec::compile([
            ("title", FieldType::String),
            ("count", FieldType::Integer),
            ("extra", FieldType::Json),
        ])
    }

    #[test]
    fn encode_decode_known_fields() {
        let doc = Document::new()
            .with("title", "hello")
            .with("count", 3)
            .with("extra", Value::Array(vec![Value::Bool(true)]));
        let codec = codec();
        let bytes = codec.encode(&doc).unwrap();
        assert_eq!(codec.decode(&bytes).unwrap(), doc);
    }

    #[test]
    fn wire_form_uses_positions() {
        let doc = Document::new().with("count", 1).with("title", "a");
        let bytes = codec().encode(&doc).unwrap();
        assert_eq!(bytes, vec![0xa2, 0x00, 0x61, b'a', 0x01, 0x01]);
    }

    #[test]
    fn unknown_and_null_fields_are_skipped() {
        let doc = Document::new()
            .with("title", "x")
            .with("nope", 1)
            .with("count", Value::Null);
        let codec = codec();
        let decoded = codec.decode(&codec.encode(&doc).unwrap()).unwrap();
        assert_eq!(decoded, Document::new().with("title", "x"));
    }

    #[test]
    fn type_mismatch_fails_encode() {
        let doc = Document::new().with("count", "three");
        let err = codec().encode(&doc).unwrap_err();
        assert_eq!(err, CodecError::type_mismatch("count", "integer", "string"));
        assert!(!codec().validate(&doc));
    }

    #[test]
    fn validate_ignores_unknown_fields() {
        let doc = Document::new().with("other", "x").with("count", 5);
        assert!(codec().validate(&doc));
    }

    #[test]
    fn extended_codec_reads_old_records() {
        let old = RecordCodec::compile([("a", FieldType::Json)]);
        let new = RecordCodec::compile([("a", FieldType::Json), ("b", FieldType::String)]);
        let doc = Document::new().with("a", 1);
        let bytes = old.encode(&doc).unwrap();
        assert_eq!(new.decode(&bytes).unwrap(), doc);
    }

    #[test]
    fn unknown_position_fails_decode() {
        let wide = RecordCodec::compile([("a", FieldType::Json), ("b", FieldType::Json)]);
        let narrow = RecordCodec::compile([("a", FieldType::Json)]);
        let bytes = wide.encode(&Document::new().with("b", 1)).unwrap();
        assert_eq!(
            narrow.decode(&bytes).unwrap_err(),
            CodecError::UnknownField { position: 1 }
        );
    }

    #[test]
    fn json_map_with_repeated_key_is_refused() {
        let codec = RecordCodec::compile([("m", FieldType::Json)]);
        let dup = Value::Map(vec![
            (Value::Text("a".into()), Value::Integer(1)),
            (Value::Text("a".into()), Value::Integer(2)),
        ]);
        let doc = Document::new().with("m", dup);
        assert!(!codec.validate(&doc));
        assert!(matches!(codec.encode(&doc), Err(CodecError::TypeMismatch { .. })));

        let deduped = Document::new().with(
            "m",
            Value::map(vec![
                (Value::Text("a".into()), Value::Integer(1)),
                (Value::Text("a".into()), Value::Integer(2)),
            ]),
        );
        assert!(codec.validate(&deduped));
        assert_eq!(codec.decode(&codec.encode(&deduped).unwrap()).unwrap(), deduped);
    }

    #[test]
    fn json_nesting_budget_matches_decoder() {
        let codec = RecordCodec::compile([("deep", FieldType::Json)]);
        let nest = |levels: usize| {
            let mut v = Value::Integer(0);
            for _ in 1..levels {
                v = Value::Array(vec![v]);
            }
            v
        };

        let fits = Document::new().with("deep", nest(MAX_NESTING_DEPTH - 1));
        assert!(codec.validate(&fits));
        assert_eq!(codec.decode(&codec.encode(&fits).unwrap()).unwrap(), fits);

        let too_deep = Document::new().with("deep", nest(MAX_NESTING_DEPTH));
        assert!(!codec.validate(&too_deep));
        assert!(codec.encode(&too_deep).is_err());
    }

    #[test]
    fn non_map_payload_fails_decode() {
        assert!(matches!(
            codec().decode(&[0x01]),
            Err(CodecError::DecodingFailed { .. })
        ));
    }
}
