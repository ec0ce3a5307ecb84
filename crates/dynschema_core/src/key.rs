//! Store key structure.
//!
//! The envelope needs a document's version and deleted flag, which the store
//! encodes in the key itself. Key layouts belong to the store, so parsing is
//! behind the [`KeyDecoder`] trait.

use crate::error::{CoreError, CoreResult};
use std::fmt;

/// A version as found in a store key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KeyVersion {
    /// Numeric version.
    Number(u64),
    /// Opaque textual version.
    Text(String),
}

impl fmt::Display for KeyVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            KeyVersion::Number(n) => write!(f, "{n}"),
            KeyVersion::Text(s) => f.write_str(s),
        }
    }
}

/// The parts of a key the envelope cares about.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyParts {
    /// Document version.
    pub version: KeyVersion,
    /// Whether the key marks a deletion.
    pub deleted: bool,
}

/// Parses store keys.
pub trait KeyDecoder: Send + Sync {
    /// Extracts version and deleted flag from `key`.
    ///
    /// # Errors
    ///
    /// Returns `InvalidKey` if the key does not follow the layout.
    fn decode_key(&self, key: &str) -> CoreResult<KeyParts>;
}

impl<F> KeyDecoder for F
where
    F: Fn(&str) -> CoreResult<KeyParts> + Send + Sync,
{
    fn decode_key(&self, key: &str) -> CoreResult<KeyParts> {
        self(key)
    }
}

/// Default separator between key segments.
pub const DEFAULT_SEPARATOR: char = '!';

/// Decoder for keys of the form `<id>!<version>[!<deleted>]`.
///
/// A version of ASCII digits without leading zeros is a
/// [`KeyVersion::Number`], anything else is [`KeyVersion::Text`], so the
/// version always renders back to the text found in the key. The optional deleted segment is `1`/`true` or
/// `0`/`false`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DelimitedKeyDecoder {
    separator: char,
}

impl Default for DelimitedKeyDecoder {
    fn default() -> Self {
        Self::new(DEFAULT_SEPARATOR)
    }
}

impl DelimitedKeyDecoder {
    /// Creates a decoder splitting on `separator`.
    #[must_use]
    pub const fn new(separator: char) -> Self {
        Self { separator }
    }

    /// Builds a key this decoder accepts.
    #[must_use]
    pub fn make_key(&self, id: &str, version: &KeyVersion, deleted: bool) -> String {
        let sep = self.separator;
        if deleted {
            format!("{id}{sep}{version}{sep}1")
        } else {
            format!("{id}{sep}{version}")
        }
    }
}

impl KeyDecoder for DelimitedKeyDecoder {
    fn decode_key(&self, key: &str) -> CoreResult<KeyParts> {
        let segments: Vec<&str> = key.split(self.separator).collect();
        let (version, deleted) = match segments.as_slice() {
            [id, version] if !id.is_empty() => (*version, None),
            [id, version, flag] if !id.is_empty() => (*version, Some(*flag)),
            _ => {
                return Err(CoreError::invalid_key(
                    key,
                    format!("expected <id>{0}<version>[{0}<deleted>]", self.separator),
                ))
            }
        };

        if version.is_empty() {
            return Err(CoreError::invalid_key(key, "empty version"));
        }

        let deleted = match deleted {
            None | Some("0" | "false") => false,
            Some("1" | "true") => true,
            Some(other) => {
                return Err(CoreError::invalid_key(
                    key,
                    format!("bad deleted flag '{other}'"),
                ))
            }
        };

        let canonical_number = version.bytes().all(|b| b.is_ascii_digit())
            && (version == "0" || !version.starts_with('0'));
        let version = if canonical_number {
            version
                .parse()
                .map(KeyVersion::Number)
                .unwrap_or_else(|_| KeyVersion::Text(version.to_string()))
        } else {
            KeyVersion::Text(version.to_string())
        };

        Ok(KeyParts { version, deleted })
    }
}
