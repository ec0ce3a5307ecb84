//! Encode command implementation.

use super::{open_registry, to_hex, CommandResult};
use dynschema_core::document_from_json;
use std::path::Path;

/// Merges the document into the schema, encodes it, wraps it in the
/// envelope for `key` and returns the envelope as hex.
pub fn encode(path: &Path, key: &str, json: &str) -> CommandResult<String> {
    let mut registry = open_registry(path)?;
    let doc = document_from_json(serde_json::from_str(json)?)?;

    let outcome = registry.merge_from_object(&doc)?;
    if outcome.changed() {
        tracing::info!(appended = outcome.appended.len(), "schema grew while encoding");
    }

    let payload = registry.encode(&doc)?;
    let envelope = registry.encode_binary(key, &payload)?;
    Ok(to_hex(&envelope))
}

/// Runs the encode command.
pub fn run(path: &Path, key: &str, json: &str) -> CommandResult {
    println!("{}", encode(path, key, json)?);
    Ok(())
}
