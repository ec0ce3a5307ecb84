//! # DynSchema Storage
//!
//! Metadata store trait and implementations for DynSchema.
//!
//! The schema registry persists its column list through a [`MetaStore`]:
//! a small key-value interface over opaque bytes. The store never interprets
//! what it holds; the registry chooses the value encoding.
//!
//! ## Design Principles
//!
//! - Values are replaced whole; there are no partial updates
//! - A missing key is a distinct, recognizable error
//! - Stores are `Send + Sync` and take `&self`
//!
//! ## Available Stores
//!
//! - [`InMemoryMetaStore`] - For testing and ephemeral registries
//! - [`FileMetaStore`] - One file per key, replaced atomically
//!
//! ## Example
//!
//! ```rust
//! use dynschema_storage::{InMemoryMetaStore, MetaStore};
//!
//! let store = InMemoryMetaStore::new();
//! assert!(store.get_meta("schema").unwrap_err().is_not_found());
//! store.set_meta("schema", b"[]").unwrap();
//! assert!(store.contains_meta("schema").unwrap());
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

mod error;
mod file;
mod memory;
mod store;

pub use error::{StorageError, StorageResult};
pub use file::FileMetaStore;
pub use memory::InMemoryMetaStore;
pub use store::MetaStore;
