//! CLI command implementations.

pub mod decode;
pub mod encode;
pub mod inspect;
pub mod merge;

use dynschema_core::SchemaRegistry;
use dynschema_storage::FileMetaStore;
use std::path::Path;

/// Result type shared by all commands.
pub type CommandResult<T = ()> = Result<T, Box<dyn std::error::Error>>;

/// Opens the registry stored in `path`, creating the directory if needed.
pub fn open_registry(path: &Path) -> CommandResult<SchemaRegistry<FileMetaStore>> {
    let store = FileMetaStore::open(path)?;
    Ok(SchemaRegistry::open(store)?)
}

/// Encodes bytes as lowercase hex.
pub fn to_hex(bytes: &[u8]) -> String {
    use std::fmt::Write;
    bytes.iter().fold(String::with_capacity(bytes.len() * 2), |mut out, b| {
        let _ = write!(out, "{b:02x}");
        out
    })
}

/// Decodes hex, ignoring surrounding whitespace.
pub fn from_hex(text: &str) -> CommandResult<Vec<u8>> {
    let text = text.trim();
    if text.len() % 2 != 0 {
        return Err("hex input has odd length".into());
    }
    (0..text.len())
        .step_by(2)
        .map(|i| {
            text.get(i..i + 2)
                .and_then(|pair| u8::from_str_radix(pair, 16).ok())
                .ok_or_else(|| Box::from(format!("invalid hex at offset {i}")))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hex_round_trip() {
        let bytes = vec![0x00, 0xa4, 0xff, 0x10];
        assert_eq!(to_hex(&bytes), "00a4ff10");
        assert_eq!(from_hex(" 00A4ff10\n").unwrap(), bytes);
    }

    #[test]
    fn bad_hex() {
        assert!(from_hex("abc").is_err());
        assert!(from_hex("zz").is_err());
        assert!(from_hex("é0").is_err());
    }

    #[test]
    fn open_creates_empty_registry() {
        let dir = tempfile::tempdir().unwrap();
        let registry = open_registry(&dir.path().join("db")).unwrap();
        assert!(registry.columns().is_empty());
    }
}
