//! Canonical CBOR encoder.

use crate::error::{CodecError, CodecResult};
use crate::value::{Value, MAX_NESTING_DEPTH};

/// Encode a value to canonical CBOR bytes.
///
/// Output is deterministic (RFC 8949 section 4.2.1): map keys are sorted by
/// their encoded form, integers and lengths use the shortest head, and
/// nothing is indefinite-length.
///
/// # Errors
///
/// Returns an error if a map repeats a key or the value nests deeper than
/// [`MAX_NESTING_DEPTH`]; the decoder would reject either.
pub fn to_canonical_cbor(value: &Value) -> CodecResult<Vec<u8>> {
    let mut encoder = CanonicalEncoder::new();
    encoder.encode(value)?;
    Ok(encoder.into_bytes())
}

/// A canonical CBOR encoder writing into an owned buffer.
pub struct CanonicalEncoder {
    buffer: Vec<u8>,
    depth: usize,
}

impl CanonicalEncoder {
    /// Create a new encoder.
    pub fn new() -> Self {
        Self::with_capacity(0)
    }

    /// Create a new encoder with the specified capacity.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            buffer: Vec::with_capacity(capacity),
            depth: 0,
        }
    }

    /// Encode a value.
    ///
    /// # Errors
    ///
    /// Returns [`CodecError::DuplicateKey`] or [`CodecError::NestingTooDeep`]
    /// for values the decoder would not accept back.
    pub fn encode(&mut self, value: &Value) -> CodecResult<()> {
        if self.depth >= MAX_NESTING_DEPTH {
            return Err(CodecError::NestingTooDeep {
                max_depth: MAX_NESTING_DEPTH,
            });
        }
        self.depth += 1;
        let result = self.encode_item(value);
        self.depth -= 1;
        result
    }

    fn encode_item(&mut self, value: &Value) -> CodecResult<()> {
        match value {
            Value::Null => self.buffer.push(0xf6),
            Value::Bool(b) => self.buffer.push(if *b { 0xf5 } else { 0xf4 }),
            Value::Integer(n) => self.write_integer(*n),
            Value::Bytes(b) => self.write_bytes(b),
            Value::Text(s) => self.write_text(s),
            Value::Array(items) => {
                self.write_head(4, items.len() as u64);
                for item in items {
                    self.encode(item)?;
                }
            }
            Value::Map(pairs) => self.write_map(pairs)?,
        }
        Ok(())
    }

    /// Consume this encoder and return the encoded bytes.
    pub fn into_bytes(self) -> Vec<u8> {
        self.buffer
    }

    /// Get a reference to the encoded bytes.
    pub fn as_bytes(&self) -> &[u8] {
        &self.buffer
    }

    #[allow(clippy::cast_sign_loss)]
    fn write_integer(&mut self, n: i64) {
        if n >= 0 {
            self.write_head(0, n as u64);
        } else {
            // Major type 1 carries -(n+1), which is non-negative for every negative i64.
            self.write_head(1, (-(n + 1)) as u64);
        }
    }

    #[allow(clippy::cast_possible_truncation)]
    fn write_head(&mut self, major_type: u8, arg: u64) {
        let mt = major_type << 5;

        if arg < 24 {
            self.buffer.push(mt | (arg as u8));
        } else if arg <= u64::from(u8::MAX) {
            self.buffer.push(mt | 24);
            self.buffer.push(arg as u8);
        } else if arg <= u64::from(u16::MAX) {
            self.buffer.push(mt | 25);
            self.buffer.extend_from_slice(&(arg as u16).to_be_bytes());
        } else if arg <= u64::from(u32::MAX) {
            self.buffer.push(mt | 26);
            self.buffer.extend_from_slice(&(arg as u32).to_be_bytes());
        } else {
            self.buffer.push(mt | 27);
            self.buffer.extend_from_slice(&arg.to_be_bytes());
        }
    }

    fn write_bytes(&mut self, bytes: &[u8]) {
        self.write_head(2, bytes.len() as u64);
        self.buffer.extend_from_slice(bytes);
    }

    fn write_text(&mut self, text: &str) {
        self.write_head(3, text.len() as u64);
        self.buffer.extend_from_slice(text.as_bytes());
    }

    fn write_map(&mut self, pairs: &[(Value, Value)]) -> CodecResult<()> {
        let mut entries: Vec<(Vec<u8>, &Value)> = Vec::with_capacity(pairs.len());
        for (key, value) in pairs {
            let mut key_encoder = CanonicalEncoder {
                buffer: Vec::new(),
                depth: self.depth,
            };
            key_encoder.encode(key)?;
            entries.push((key_encoder.into_bytes(), value));
        }

        // Length-first, then bytewise.
        entries.sort_by(|a, b| a.0.len().cmp(&b.0.len()).then_with(|| a.0.cmp(&b.0)));
        if entries.windows(2).any(|w| w[0].0 == w[1].0) {
            return Err(CodecError::DuplicateKey);
        }

        self.write_head(5, entries.len() as u64);
        for (key_bytes, value) in entries {
            self.buffer.extend_from_slice(&key_bytes);
            self.encode(value)?;
        }
        Ok(())
    }
}

impl Default for CanonicalEncoder {
    fn default() -> Self {
        Self::new()
    }
}
