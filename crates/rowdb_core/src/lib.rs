//! # RowDB Core
//!
//! Command and query engine for RowDB.
//!
//! This crate provides:
//! - Schema manager: create, drop, list and inspect tables
//! - Record store: typed insert, select, update and delete
//! - Clause parser: `column:type`, `column=value` and value-list grammars
//! - A small explicit memoization cache
//!
//! Nothing here performs I/O. Every operation takes the current schema
//! registry and/or row snapshot and returns a new one, so persistence stays
//! the caller's business.
//!
//! ## Example
//!
//! ```rust
//! use rowdb_core::{clause, records, schema, Clause, SchemaRegistry};
//!
//! let registry = schema::create_table(
//!     &SchemaRegistry::new(),
//!     "users",
//!     &[("name", "str"), ("age", "int")],
//! )
//! .unwrap();
//!
//! let (rows, id) = records::insert(&registry, "users", &["Alice", "30"], Vec::new()).unwrap();
//! assert_eq!(id, 1);
//!
//! let filter = clause::parse_clause("age=30").unwrap();
//! assert_eq!(records::select(&rows, &filter).len(), 1);
//! assert!(records::select(&rows, &Clause::new().with("age", "30")).is_empty());
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

pub mod cache;
pub mod clause;
mod error;
pub mod records;
pub mod schema;
mod types;

pub use cache::QueryCache;
pub use error::{CoreError, CoreResult, ErrorKind};
pub use types::{
    is_identifier, Clause, ColumnType, Literal, Record, SchemaRegistry, TableSchema, ID_COLUMN,
};

/// Version of the RowDB core crate.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
