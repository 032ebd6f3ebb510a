//! In-memory store for testing.

use crate::backend::Persistence;
use crate::error::StorageResult;
use crate::json;
use parking_lot::RwLock;
use rowdb_core::{Record, SchemaRegistry};
use std::collections::HashMap;

/// An in-memory store.
///
/// Values are kept as serialized JSON text, so loads and saves go through
/// the same encoding as [`super::JsonFileStore`]. Suitable for:
/// - Unit tests
/// - Integration tests
/// - Sessions that don't need to outlive the process
///
/// # Example
///
/// ```rust
/// use rowdb_core::Record;
/// use rowdb_storage::{InMemoryStore, Persistence};
///
/// let mut store = InMemoryStore::new();
/// store.save_table("t", &[Record::with_id(1)]).unwrap();
/// assert_eq!(store.load_table("t").len(), 1);
/// ```
#[derive(Debug, Default)]
pub struct InMemoryStore {
    metadata: RwLock<Option<String>>,
    tables: RwLock<HashMap<String, String>>,
}

impl InMemoryStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the raw metadata text.
    ///
    /// Takes `&self`, so damage can be injected while the store is shared.
    pub fn put_raw_metadata(&self, text: impl Into<String>) {
        *self.metadata.write() = Some(text.into());
    }

    /// Replaces the raw text stored for `table`.
    ///
    /// Useful for testing recovery from damaged data.
    pub fn put_raw_table(&self, table: impl Into<String>, text: impl Into<String>) {
        self.tables.write().insert(table.into(), text.into());
    }

    /// Returns the raw text stored for `table`.
    #[must_use]
    pub fn raw_table(&self, table: &str) -> Option<String> {
        self.tables.read().get(table).cloned()
    }

    /// Names of all tables that currently have stored rows.
    #[must_use]
    pub fn stored_tables(&self) -> Vec<String> {
        let mut names: Vec<String> = self.tables.read().keys().cloned().collect();
        names.sort();
        names
    }
}

impl Persistence for InMemoryStore {
    fn load_metadata(&self) -> SchemaRegistry {
        self.metadata
            .read()
            .as_deref()
            .map(|text| json::decode_metadata(text, "memory:metadata"))
            .unwrap_or_default()
    }

    fn save_metadata(&mut self, registry: &SchemaRegistry) -> StorageResult<()> {
        let text = json::encode_metadata(registry)?;
        *self.metadata.write() = Some(text);
        Ok(())
    }

    fn load_table(&self, table: &str) -> Vec<Record> {
        self.tables
            .read()
            .get(table)
            .map(|text| json::decode_rows(text, table))
            .unwrap_or_default()
    }

    fn save_table(&mut self, table: &str, rows: &[Record]) -> StorageResult<()> {
        let text = json::encode_rows(rows)?;
        self.tables.write().insert(table.to_string(), text);
        Ok(())
    }

    fn remove_table(&mut self, table: &str) -> StorageResult<()> {
        self.tables.write().remove(table);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rowdb_core::schema::create_table;

    #[test]
    fn empty_store_loads_defaults() {
        let store = InMemoryStore::new();
        assert!(store.load_metadata().is_empty());
        assert!(store.load_table("anything").is_empty());
    }

    #[test]
    fn save_and_load() {
        let mut store = InMemoryStore::new();
        let registry =
            create_table(&SchemaRegistry::new(), "t", &[("a", "int"), ("b", "bool")]).unwrap();
        let rows = vec![Record::with_id(1).with("a", 5).with("b", true)];

        store.save_metadata(&registry).unwrap();
        store.save_table("t", &rows).unwrap();

        assert_eq!(store.load_metadata(), registry);
        assert_eq!(store.load_table("t"), rows);
        assert_eq!(store.stored_tables(), vec!["t".to_string()]);
    }

    #[test]
    fn damaged_text_loads_empty() {
        let store = InMemoryStore::new();
        store.put_raw_metadata("oops");
        store.put_raw_table("t", "[{\"ID\": ");
        assert!(store.load_metadata().is_empty());
        assert!(store.load_table("t").is_empty());
    }

    #[test]
    fn rows_without_ids_load_empty() {
        let store = InMemoryStore::new();
        store.put_raw_table("t", r#"[{"a": 1}]"#);
        assert!(store.load_table("t").is_empty());
    }

    #[test]
    fn damage_can_be_injected_through_a_shared_reference() {
        let mut store = InMemoryStore::new();
        store.save_table("t", &[Record::with_id(1)]).unwrap();

        let shared = &store;
        std::thread::scope(|scope| {
            scope.spawn(|| shared.put_raw_table("t", "[]"));
        });
        assert!(store.load_table("t").is_empty());
        assert_eq!(store.raw_table("t").as_deref(), Some("[]"));
    }

    #[test]
    fn remove_table() {
        let mut store = InMemoryStore::new();
        store.save_table("t", &[Record::with_id(1)]).unwrap();
        store.remove_table("t").unwrap();
        store.remove_table("t").unwrap();
        assert!(store.raw_table("t").is_none());
    }
}
