//! Fixed four-field envelope around encoded documents.
//!
//! Wire format: a canonical CBOR map with integer tags
//!
//! | tag | field     | type  |
//! |-----|-----------|-------|
//! | 0   | `key`     | text  |
//! | 1   | `version` | text  |
//! | 2   | `value`   | bytes |
//! | 3   | `deleted` | bool  |
//!
//! The layout does not depend on the dynamic schema and never changes.

use crate::error::{CoreError, CoreResult};
use crate::key::KeyDecoder;
use dynschema_codec::{from_cbor, to_canonical_cbor, Value};

const TAG_KEY: i64 = 0;
const TAG_VERSION: i64 = 1;
const TAG_VALUE: i64 = 2;
const TAG_DELETED: i64 = 3;

/// A decoded envelope.
///
/// `value` holds the document payload still encoded; pass it to the
/// registry's `decode` to recover the document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Envelope {
    /// Store key.
    pub key: String,
    /// Document version, always text.
    pub version: String,
    /// Encoded document payload.
    pub value: Vec<u8>,
    /// Deletion marker.
    pub deleted: bool,
}

impl Envelope {
    /// Builds an envelope for `key`, taking version and deleted flag from
    /// the key's structure.
    ///
    /// # Errors
    ///
    /// Returns the decoder's error if the key cannot be parsed.
    pub fn for_key(key: &str, value: Vec<u8>, keys: &dyn KeyDecoder) -> CoreResult<Self> {
        let parts = keys.decode_key(key)?;
        Ok(Self {
            key: key.to_string(),
            version: parts.version.to_string(),
            value,
            deleted: parts.deleted,
        })
    }

    /// Encodes the envelope. The payload is copied unchanged.
    ///
    /// # Errors
    ///
    /// Returns a codec error if encoding fails.
    pub fn encode(&self) -> CoreResult<Vec<u8>> {
        let map = Value::Map(vec![
            (Value::Integer(TAG_KEY), Value::Text(self.key.clone())),
            (Value::Integer(TAG_VERSION), Value::Text(self.version.clone())),
            (Value::Integer(TAG_VALUE), Value::Bytes(self.value.clone())),
            (Value::Integer(TAG_DELETED), Value::Bool(self.deleted)),
        ]);
        Ok(to_canonical_cbor(&map)?)
    }

    /// Decodes an envelope.
    ///
    /// # Errors
    ///
    /// Returns a codec error for malformed CBOR, or `InvalidEnvelope` if a
    /// tag is missing, unknown, or of the wrong type.
    pub fn decode(bytes: &[u8]) -> CoreResult<Self> {
        let Value::Map(pairs) = from_cbor(bytes)? else {
            return Err(CoreError::invalid_envelope("expected a map"));
        };

        let mut key = None;
        let mut version = None;
        let mut value = None;
        let mut deleted = None;

        for (tag, field) in pairs {
            match (tag.as_integer(), field) {
                (Some(TAG_KEY), Value::Text(s)) => key = Some(s),
                (Some(TAG_VERSION), Value::Text(s)) => version = Some(s),
                (Some(TAG_VALUE), Value::Bytes(b)) => value = Some(b),
                (Some(TAG_DELETED), Value::Bool(b)) => deleted = Some(b),
                (Some(t @ TAG_KEY..=TAG_DELETED), other) => {
                    return Err(CoreError::invalid_envelope(format!(
                        "tag {t} has wrong type {}",
                        other.kind()
                    )))
                }
                _ => {
                    return Err(CoreError::invalid_envelope(format!(
                        "unexpected tag {tag:?}"
                    )))
                }
            }
        }

        let missing = |name: &str| CoreError::invalid_envelope(format!("missing {name}"));
        Ok(Self {
            key: key.ok_or_else(|| missing("key"))?,
            version: version.ok_or_else(|| missing("version"))?,
            value: value.ok_or_else(|| missing("value"))?,
            deleted: deleted.ok_or_else(|| missing("deleted"))?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::key::DelimitedKeyDecoder;

    #[test]
    fn version_and_flag_come_from_the_key() {
        let env = Envelope::for_key("doc!4!1", vec![1, 2], &DelimitedKeyDecoder::default()).unwrap();
        assert_eq!(env.version, "4");
        assert!(env.deleted);
        assert_eq!(Envelope::decode(&env.encode().unwrap()).unwrap(), env);
    }

    #[test]
    fn wire_layout() {
        let env = Envelope {
            key: "k".into(),
            version: "1".into(),
            value: vec![0xaa],
            deleted: false,
        };
        assert_eq!(
            env.encode().unwrap(),
            vec![0xa4, 0x00, 0x61, b'k', 0x01, 0x61, b'1', 0x02, 0x41, 0xaa, 0x03, 0xf4]
        );
    }

    #[test]
    fn missing_field_is_rejected() {
        let bytes = to_canonical_cbor(&Value::Map(vec![
            (Value::Integer(0), Value::Text("k".into())),
            (Value::Integer(1), Value::Text("1".into())),
            (Value::Integer(2), Value::Bytes(vec![])),
        ]))
        .unwrap();
        let err = Envelope::decode(&bytes).unwrap_err();
        assert!(matches!(err, CoreError::InvalidEnvelope { .. }));
        assert!(err.to_string().contains("deleted"));
    }

    #[test]
    fn wrong_type_and_unknown_tag_are_rejected() {
        let wrong = to_canonical_cbor(&Value::Map(vec![(
            Value::Integer(2),
            Value::Text("not bytes".into()),
        )]))
        .unwrap();
        assert!(matches!(
            Envelope::decode(&wrong),
            Err(CoreError::InvalidEnvelope { .. })
        ));

        let unknown = to_canonical_cbor(&Value::Map(vec![(Value::Integer(9), Value::Null)])).unwrap();
        assert!(matches!(
            Envelope::decode(&unknown),
            Err(CoreError::InvalidEnvelope { .. })
        ));
    }

    #[test]
    fn garbage_is_a_codec_error() {
        assert!(matches!(Envelope::decode(&[0xff]), Err(CoreError::Codec(_))));
    }

    #[test]
    fn bad_key_fails_before_encoding() {
        let err = Envelope::for_key("no-separator", vec![], &DelimitedKeyDecoder::default()).unwrap_err();
        assert!(matches!(err, CoreError::InvalidKey { .. }));
    }
}
