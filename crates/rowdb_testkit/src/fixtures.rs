//! Test fixtures and store helpers.
//!
//! Provides stores in throwaway directories and a few ready-made schemas.

use rowdb_core::{records, schema, Record, SchemaRegistry};
use rowdb_storage::{JsonFileStore, Persistence};
use std::path::Path;
use tempfile::TempDir;

/// A file store with automatic cleanup.
pub struct TestStore {
    /// The store instance.
    pub store: JsonFileStore,
    /// The temporary directory (kept alive to prevent cleanup).
    dir: TempDir,
}

impl TestStore {
    /// Creates a store in a fresh temporary directory.
    pub fn new() -> Self {
        let dir = TempDir::new().expect("Failed to create temp directory");
        let store = JsonFileStore::open(dir.path()).expect("Failed to open store");
        Self { store, dir }
    }

    /// Returns the store's root directory.
    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    /// Opens a second store over the same directory, as a new session would.
    pub fn reopen(&self) -> JsonFileStore {
        JsonFileStore::open(self.dir.path()).expect("Failed to reopen store")
    }
}

impl Default for TestStore {
    fn default() -> Self {
        Self::new()
    }
}

impl std::ops::Deref for TestStore {
    type Target = JsonFileStore;

    fn deref(&self) -> &Self::Target {
        &self.store
    }
}

impl std::ops::DerefMut for TestStore {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.store
    }
}

/// Runs a test against a file store in a temporary directory.
pub fn with_file_store<F, R>(f: F) -> R
where
    F: FnOnce(&mut JsonFileStore) -> R,
{
    let mut test_store = TestStore::new();
    f(&mut test_store.store)
}

/// Registry with `users(name:str, age:int)`.
pub fn users_registry() -> SchemaRegistry {
    schema::create_table(
        &SchemaRegistry::new(),
        "users",
        &[("name", "str"), ("age", "int")],
    )
    .expect("Failed to create users table")
}

/// Registry with `users` plus `flags(label:str, on:bool, weight:int)`.
pub fn mixed_registry() -> SchemaRegistry {
    schema::create_table(
        &users_registry(),
        "flags",
        &[("label", "str"), ("on", "bool"), ("weight", "int")],
    )
    .expect("Failed to create flags table")
}

/// Inserts each value row into `table` in order, starting from `rows`.
pub fn insert_all(
    registry: &SchemaRegistry,
    table: &str,
    values: &[&[&str]],
    mut rows: Vec<Record>,
) -> Vec<Record> {
    for &row in values {
        rows = records::insert(registry, table, row, rows)
            .expect("Failed to insert fixture row")
            .0;
    }
    rows
}

/// Saves `registry` and the given rows of `table` into `store`.
pub fn seed(store: &mut dyn Persistence, registry: &SchemaRegistry, table: &str, rows: &[Record]) {
    store
        .save_metadata(registry)
        .expect("Failed to save fixture metadata");
    store
        .save_table(table, rows)
        .expect("Failed to save fixture rows");
}

/// Test scenario helpers.
pub mod scenarios {
    use super::*;

    /// Three users with IDs 1 to 3.
    pub fn three_users() -> (SchemaRegistry, Vec<Record>) {
        let registry = users_registry();
        let rows = insert_all(
            &registry,
            "users",
            &[&["Alice", "30"], &["Bob", "25"], &["\"Carol Ann\"", "41"]],
            Vec::new(),
        );
        (registry, rows)
    }

    /// A file store already holding [`three_users`].
    pub fn populated_store() -> TestStore {
        let (registry, rows) = three_users();
        let mut test_store = TestStore::new();
        seed(&mut test_store.store, &registry, "users", &rows);
        test_store
    }
}
