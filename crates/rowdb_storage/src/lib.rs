//! # RowDB Storage
//!
//! Persistence adapter for RowDB.
//!
//! The core engine never touches files. This crate stores the two kinds of
//! aggregate it produces: the schema registry (one per database) and the
//! row sequence of each table. Both are read and written whole.
//!
//! ## Design Principles
//!
//! - Loading never fails: a missing or corrupt file reads as empty
//! - Saving replaces the stored value atomically
//! - Table names are validated before they become file names
//!
//! ## Available Stores
//!
//! - [`InMemoryStore`] - For testing and throwaway sessions
//! - [`JsonFileStore`] - JSON files in a directory
//!
//! ## Example
//!
//! ```rust
//! use rowdb_core::{schema, SchemaRegistry};
//! use rowdb_storage::{InMemoryStore, Persistence};
//!
//! let mut store = InMemoryStore::new();
//! let registry = schema::create_table(&SchemaRegistry::new(), "t", &[("a", "int")]).unwrap();
//! store.save_metadata(&registry).unwrap();
//! assert_eq!(store.load_metadata(), registry);
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

mod backend;
mod error;
mod file;
mod json;
mod memory;

pub use backend::Persistence;
pub use error::{StorageError, StorageResult};
pub use file::{JsonFileStore, DATA_DIR, METADATA_FILE};
pub use memory::InMemoryStore;
