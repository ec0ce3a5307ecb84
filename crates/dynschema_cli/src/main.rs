//! DynSchema CLI
//!
//! Command-line tools for DynSchema schema stores.
//!
//! # Commands
//!
//! - `inspect` - Display the stored column sequence
//! - `merge` - Merge declared columns
//! - `merge-doc` - Grow the schema from a JSON document
//! - `encode` - Encode a JSON document into an envelope
//! - `decode` - Decode an envelope back into JSON

mod commands;

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// DynSchema command-line schema tools.
#[derive(Parser)]
#[command(name = "dynschema")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Path to the schema store directory
    #[arg(global = true, short, long)]
    path: Option<PathBuf>,

    /// Enable verbose output
    #[arg(global = true, short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Display the stored column sequence
    Inspect {
        /// Output format (text, json)
        #[arg(short, long, default_value = "text")]
        format: String,
    },

    /// Merge declared columns
    Merge {
        /// Columns as `name` or `name:type`
        #[arg(required = true, value_parser = commands::merge::parse_column)]
        columns: Vec<dynschema_core::ColumnSpec>,

        /// Require the columns to match the stored sequence by position
        #[arg(short, long)]
        strict: bool,
    },

    /// Grow the schema from a JSON document
    MergeDoc {
        /// JSON object
        json: String,
    },

    /// Encode a JSON document into a hex envelope
    Encode {
        /// Store key, e.g. `doc1!3`
        #[arg(short, long)]
        key: String,

        /// JSON object
        json: String,
    },

    /// Decode a hex envelope into JSON
    Decode {
        /// Envelope bytes as hex
        hex: String,
    },

    /// Show version information
    Version,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::Inspect { format } => {
            let path = cli.path.ok_or("Store path required for inspect")?;
            commands::inspect::run(&path, &format)?;
        }
        Commands::Merge { columns, strict } => {
            let path = cli.path.ok_or("Store path required for merge")?;
            commands::merge::run(&path, columns, strict)?;
        }
        Commands::MergeDoc { json } => {
            let path = cli.path.ok_or("Store path required for merge-doc")?;
            commands::merge::run_doc(&path, &json)?;
        }
        Commands::Encode { key, json } => {
            let path = cli.path.ok_or("Store path required for encode")?;
            commands::encode::run(&path, &key, &json)?;
        }
        Commands::Decode { hex } => {
            let path = cli.path.ok_or("Store path required for decode")?;
            commands::decode::run(&path, &hex)?;
        }
        Commands::Version => {
            println!("DynSchema CLI v{}", env!("CARGO_PKG_VERSION"));
            println!("DynSchema Core v{}", dynschema_core::VERSION);
        }
    }

    Ok(())
}
