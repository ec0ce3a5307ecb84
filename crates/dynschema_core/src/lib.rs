//! # DynSchema Core
//!
//! Dynamic schema registry for document stores.
//!
//! This crate provides:
//! - An append-only column list persisted through a [`MetaStore`]
//! - Schema growth from observed documents or declared column lists
//! - A typed codec recompiled whenever the schema grows
//! - A fixed four-field envelope carrying key, version, payload and
//!   deletion marker
//!
//! ## Example
//!
//! ```rust
//! use dynschema_core::{ColumnSpec, MergeOptions, SchemaRegistry, TypeTag};
//! use dynschema_storage::InMemoryMetaStore;
//!
//! let mut registry = SchemaRegistry::open(InMemoryMetaStore::new()).unwrap();
//! registry
//!     .merge([ColumnSpec::typed("title", TypeTag::String)], MergeOptions::strict())
//!     .unwrap();
//! assert_eq!(registry.columns().len(), 1);
//! ```
//!
//! [`MetaStore`]: dynschema_storage::MetaStore

#![deny(unsafe_code)]
#![warn(missing_docs)]

mod column;
mod column_store;
mod config;
mod envelope;
mod error;
mod json;
mod key;
mod registry;

pub use column::{Column, ColumnSpec, TypeTag};
pub use column_store::ColumnStore;
pub use config::{MergeOptions, SchemaConfig, DEFAULT_META_KEY, DEFAULT_RESERVED};
pub use envelope::Envelope;
pub use error::{CoreError, CoreResult, ErrorKind};
pub use json::{document_from_json, document_to_json, value_from_json, value_to_json};
pub use key::{DelimitedKeyDecoder, KeyDecoder, KeyParts, KeyVersion, DEFAULT_SEPARATOR};
pub use registry::{MergeOutcome, SchemaRegistry};

pub use dynschema_codec::{Document, Value};

/// Crate version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
