//! Inspect command implementation.

use super::{open_registry, CommandResult};
use dynschema_core::Column;
use serde::Serialize;
use std::path::Path;

/// Schema inspection result.
#[derive(Debug, Serialize)]
pub struct InspectResult {
    /// Store directory.
    pub path: String,
    /// Metadata key of the schema record.
    pub meta_key: String,
    /// Columns in position order.
    pub columns: Vec<Column>,
}

/// Runs the inspect command.
pub fn run(path: &Path, format: &str) -> CommandResult {
    let registry = open_registry(path)?;
    let result = InspectResult {
        path: path.display().to_string(),
        meta_key: registry.config().meta_key.clone(),
        columns: registry.columns().to_vec(),
    };

    match format {
        "json" => println!("{}", serde_json::to_string_pretty(&result)?),
        _ => print_text_output(&result),
    }
    Ok(())
}

fn print_text_output(result: &InspectResult) {
    println!("DynSchema Inspection");
    println!("====================");
    println!();
    println!("Path:     {}", result.path);
    println!("Meta key: {}", result.meta_key);
    println!();

    if result.columns.is_empty() {
        println!("No columns.");
        return;
    }

    println!("Columns ({}):", result.columns.len());
    for (position, column) in result.columns.iter().enumerate() {
        println!("  [{position:>3}] {:<24} {}", column.name, column.ty);
    }
}
