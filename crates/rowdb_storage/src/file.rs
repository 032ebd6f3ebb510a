//! JSON file store for persistent databases.

use crate::backend::Persistence;
use crate::error::{StorageError, StorageResult};
use crate::json;
use rowdb_core::{is_identifier, Record, SchemaRegistry};
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use tracing::{debug, warn};

/// File holding the schema registry, relative to the root.
pub const METADATA_FILE: &str = "db_meta.json";

/// Directory holding one `<table>.json` file per table, relative to the root.
pub const DATA_DIR: &str = "data";

/// A directory of JSON files.
///
/// Layout:
///
/// ```text
/// <root>/db_meta.json        schema registry
/// <root>/data/<table>.json   rows of one table
/// ```
///
/// # Durability
///
/// Every save writes a temporary file next to the target, syncs it, and
/// renames it over the old file. A crash leaves either the old or the new
/// contents, never a mix.
///
/// # Example
///
/// ```no_run
/// use rowdb_storage::{JsonFileStore, Persistence};
/// use std::path::Path;
///
/// let store = JsonFileStore::open(Path::new("./db")).unwrap();
/// let registry = store.load_metadata();
/// println!("{} tables", registry.len());
/// ```
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    root: PathBuf,
}

impl JsonFileStore {
    /// Opens a store rooted at `root`, creating the directories if needed.
    ///
    /// # Errors
    ///
    /// Returns an error if the directories cannot be created.
    pub fn open(root: &Path) -> StorageResult<Self> {
        fs::create_dir_all(root.join(DATA_DIR))?;
        Ok(Self {
            root: root.to_path_buf(),
        })
    }

    /// Returns the root directory.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Returns the path of the metadata file.
    #[must_use]
    pub fn metadata_path(&self) -> PathBuf {
        self.root.join(METADATA_FILE)
    }

    /// Returns the path of `table`'s data file.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::InvalidName`] if `table` is not an identifier,
    /// which keeps every data file inside the data directory.
    pub fn table_path(&self, table: &str) -> StorageResult<PathBuf> {
        if !is_identifier(table) {
            return Err(StorageError::InvalidName(table.to_string()));
        }
        Ok(self.root.join(DATA_DIR).join(format!("{table}.json")))
    }

    fn read(path: &Path) -> Option<String> {
        match fs::read_to_string(path) {
            Ok(text) => Some(text),
            Err(err) if err.kind() == io::ErrorKind::NotFound => {
                debug!(path = %path.display(), "no file yet");
                None
            }
            Err(err) => {
                warn!(path = %path.display(), error = %err, "could not read file, starting empty");
                None
            }
        }
    }

    fn write_atomic(path: &Path, contents: &str) -> StorageResult<()> {
        let dir = path.parent().unwrap_or_else(|| Path::new("."));
        fs::create_dir_all(dir)?;

        let mut tmp = NamedTempFile::new_in(dir)?;
        tmp.write_all(contents.as_bytes())?;
        tmp.as_file().sync_all()?;
        tmp.persist(path).map_err(|err| StorageError::Persist {
            path: path.display().to_string(),
            source: err.error,
        })?;

        debug!(path = %path.display(), bytes = contents.len(), "file written");
        Ok(())
    }
}

impl Persistence for JsonFileStore {
    fn load_metadata(&self) -> SchemaRegistry {
        let path = self.metadata_path();
        Self::read(&path)
            .map(|text| json::decode_metadata(&text, &path.display().to_string()))
            .unwrap_or_default()
    }

    fn save_metadata(&mut self, registry: &SchemaRegistry) -> StorageResult<()> {
        let text = json::encode_metadata(registry)?;
        Self::write_atomic(&self.metadata_path(), &text)
    }

    fn load_table(&self, table: &str) -> Vec<Record> {
        let path = match self.table_path(table) {
            Ok(path) => path,
            Err(err) => {
                warn!(table, error = %err, "cannot load table");
                return Vec::new();
            }
        };
        Self::read(&path)
            .map(|text| json::decode_rows(&text, &path.display().to_string()))
            .unwrap_or_default()
    }

    fn save_table(&mut self, table: &str, rows: &[Record]) -> StorageResult<()> {
        let path = self.table_path(table)?;
        let text = json::encode_rows(rows)?;
        Self::write_atomic(&path, &text)
    }

    fn remove_table(&mut self, table: &str) -> StorageResult<()> {
        let path = self.table_path(table)?;
        match fs::remove_file(&path) {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(err) => Err(err.into()),
        }
    }
}
