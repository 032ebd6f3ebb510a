//! Persistence trait definition.

use crate::error::StorageResult;
use rowdb_core::{Record, SchemaRegistry};

/// Where schemas and table rows live between commands.
///
/// There are two independent namespaces: one schema registry for the whole
/// database, and one row sequence per table name. Everything is read and
/// written wholesale.
///
/// # Invariants
///
/// - `load_*` never fails: absent or unparseable data yields an empty default
/// - `save_*` replaces the stored value entirely
/// - after a successful `save_*`, the next `load_*` returns the saved value
///
/// # Implementors
///
/// - [`super::JsonFileStore`] - JSON files on disk
/// - [`super::InMemoryStore`] - For testing and throwaway sessions
pub trait Persistence: Send + Sync {
    /// Loads the schema registry.
    fn load_metadata(&self) -> SchemaRegistry;

    /// Stores the schema registry.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization or the write fails.
    fn save_metadata(&mut self, registry: &SchemaRegistry) -> StorageResult<()>;

    /// Loads the rows of `table`.
    fn load_table(&self, table: &str) -> Vec<Record>;

    /// Stores the rows of `table`.
    ///
    /// # Errors
    ///
    /// Returns an error if the name is unusable, or serialization or the
    /// write fails.
    fn save_table(&mut self, table: &str, rows: &[Record]) -> StorageResult<()>;

    /// Forgets the rows of `table`. Removing an absent table is not an error.
    ///
    /// # Errors
    ///
    /// Returns an error if the name is unusable or the removal fails.
    fn remove_table(&mut self, table: &str) -> StorageResult<()>;
}
