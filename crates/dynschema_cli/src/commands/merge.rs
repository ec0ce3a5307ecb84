//! Merge commands.

use super::{open_registry, CommandResult};
use dynschema_core::{document_from_json, ColumnSpec, MergeOptions, MergeOutcome, TypeTag};
use std::path::Path;

/// Parses `name` or `name:type`.
pub fn parse_column(arg: &str) -> Result<ColumnSpec, String> {
    match arg.split_once(':') {
        Some((name, _)) if name.is_empty() => Err(format!("empty column name in '{arg}'")),
        Some((name, ty)) => Ok(ColumnSpec::typed(name, ty.parse::<TypeTag>()?)),
        None if arg.is_empty() => Err("empty column name".to_string()),
        None => Ok(ColumnSpec::untyped(arg)),
    }
}

/// Runs `merge`: merges declared columns.
pub fn run(path: &Path, columns: Vec<ColumnSpec>, strict: bool) -> CommandResult {
    let mut registry = open_registry(path)?;
    let options = if strict {
        MergeOptions::strict()
    } else {
        MergeOptions::permissive()
    };
    let outcome = registry.merge(columns, options)?;
    report(&outcome);
    Ok(())
}

/// Runs `merge-doc`: grows the schema from a JSON document.
pub fn run_doc(path: &Path, json: &str) -> CommandResult {
    let mut registry = open_registry(path)?;
    let doc = document_from_json(serde_json::from_str(json)?)?;
    let outcome = registry.merge_from_object(&doc)?;
    report(&outcome);
    Ok(())
}

fn report(outcome: &MergeOutcome) {
    if !outcome.changed() {
        println!("Schema unchanged.");
        return;
    }
    println!("Appended {} column(s):", outcome.appended.len());
    for column in &outcome.appended {
        println!("  {column}");
    }
}
