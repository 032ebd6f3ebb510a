//! JSON encoding shared by the stores.

use crate::error::StorageResult;
use rowdb_core::{Record, SchemaRegistry};
use tracing::warn;

pub(crate) fn encode_metadata(registry: &SchemaRegistry) -> StorageResult<String> {
    Ok(serde_json::to_string_pretty(registry)?)
}

pub(crate) fn encode_rows(rows: &[Record]) -> StorageResult<String> {
    Ok(serde_json::to_string_pretty(rows)?)
}

/// Parses a stored registry, falling back to empty on any defect.
///
/// A registry is also rejected when one of its tables breaks the
/// `ID`-first invariant.
pub(crate) fn decode_metadata(text: &str, origin: &str) -> SchemaRegistry {
    match serde_json::from_str::<SchemaRegistry>(text) {
        Ok(registry) => {
            let malformed = registry.iter().find(|(_, schema)| !schema.is_well_formed());
            match malformed {
                Some((table, _)) => {
                    warn!(origin, table, "schema without a leading int ID column, ignoring metadata");
                    SchemaRegistry::new()
                }
                None => registry,
            }
        }
        Err(err) => {
            warn!(origin, error = %err, "unreadable metadata, starting empty");
            SchemaRegistry::new()
        }
    }
}

/// Parses stored rows, falling back to empty on any defect.
///
/// Every row must carry a positive integer `ID`.
pub(crate) fn decode_rows(text: &str, origin: &str) -> Vec<Record> {
    match serde_json::from_str::<Vec<Record>>(text) {
        Ok(rows) => match rows.iter().position(|row| !row.id().is_some_and(|id| id > 0)) {
            Some(index) => {
                warn!(origin, index, "row without a positive integer ID, ignoring table data");
                Vec::new()
            }
            None => rows,
        },
        Err(err) => {
            warn!(origin, error = %err, "unreadable table data, starting empty");
            Vec::new()
        }
    }
}
