//! Decode command implementation.

use super::{from_hex, open_registry, CommandResult};
use dynschema_core::document_to_json;
use serde::Serialize;
use std::path::Path;

/// A decoded envelope with its payload expanded.
#[derive(Debug, Serialize)]
pub struct DecodeResult {
    /// Store key.
    pub key: String,
    /// Document version.
    pub version: String,
    /// Deletion marker.
    pub deleted: bool,
    /// Decoded document.
    pub value: serde_json::Value,
}

/// Unwraps a hex envelope and decodes its payload with the stored schema.
pub fn decode(path: &Path, hex: &str) -> CommandResult<DecodeResult> {
    let registry = open_registry(path)?;
    let envelope = registry.decode_binary(&from_hex(hex)?)?;
    let doc = registry.decode(&envelope.value)?;

    Ok(DecodeResult {
        key: envelope.key,
        version: envelope.version,
        deleted: envelope.deleted,
        value: document_to_json(&doc),
    })
}

/// Runs the decode command.
pub fn run(path: &Path, hex: &str) -> CommandResult {
    let result = decode(path, hex)?;
    println!("{}", serde_json::to_string_pretty(&result)?);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::encode::encode;
    use serde_json::json;

    #[test]
    fn encode_then_decode() {
        let dir = tempfile::tempdir().unwrap();
        let hex = encode(
            dir.path(),
            "doc1!3",
            r#"{"title": "hi", "n": 2, "version": 3, "skip": null}"#,
        )
        .unwrap();

        let result = decode(dir.path(), &hex).unwrap();
        assert_eq!(result.key, "doc1!3");
        assert_eq!(result.version, "3");
        assert!(!result.deleted);
        assert_eq!(result.value, json!({"title": "hi", "n": 2}));
    }

    #[test]
    fn bad_key_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        assert!(encode(dir.path(), "no-version", r#"{"a": 1}"#).is_err());
    }

    #[test]
    fn garbage_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        assert!(decode(dir.path(), "ff").is_err());
    }
}
