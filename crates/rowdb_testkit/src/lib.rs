//! # RowDB Testkit
//!
//! Test utilities for RowDB.
//!
//! This crate provides:
//! - Stores backed by temporary directories
//! - Sample schemas and records
//! - Property-based test generators using proptest
//!
//! ## Usage
//!
//! ```rust
//! use rowdb_testkit::prelude::*;
//!
//! with_file_store(|store| {
//!     let registry = users_registry();
//!     store.save_metadata(&registry).unwrap();
//!     assert_eq!(store.load_metadata(), registry);
//! });
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

pub mod fixtures;
pub mod generators;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::fixtures::*;
    pub use crate::generators::*;
    pub use rowdb_storage::Persistence;
}

pub use fixtures::*;
pub use generators::*;
