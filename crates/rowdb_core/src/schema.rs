//! Schema manager: table lifecycle and schema-level validation.
//!
//! Every function takes the registry by reference and returns a new one on
//! success, so a failed call never leaves a half-applied change behind.

use crate::error::{CoreError, CoreResult};
use crate::types::{is_identifier, Clause, ColumnType, SchemaRegistry, TableSchema, ID_COLUMN};
use std::collections::HashSet;
use tracing::debug;

/// Creates a table named `name` with the given `(column, type)` pairs.
///
/// The resulting schema is `ID: int` followed by `columns` in the order given.
///
/// # Errors
///
/// - [`CoreError::TableExists`] if the name is taken
/// - [`CoreError::InvalidName`] if the table or a column name is not an identifier
/// - [`CoreError::ReservedColumn`] if a column is named `id` in any casing
/// - [`CoreError::DuplicateColumn`] if a column appears twice
/// - [`CoreError::InvalidColumnType`] if a type is not `int`, `str` or `bool`
pub fn create_table<N, T>(
    registry: &SchemaRegistry,
    name: &str,
    columns: &[(N, T)],
) -> CoreResult<SchemaRegistry>
where
    N: AsRef<str>,
    T: AsRef<str>,
{
    if registry.contains(name) {
        return Err(CoreError::TableExists {
            name: name.to_string(),
        });
    }
    if !is_identifier(name) {
        return Err(CoreError::InvalidName {
            name: name.to_string(),
        });
    }

    let mut seen = HashSet::new();
    let mut user_columns = Vec::with_capacity(columns.len());
    for (column, type_name) in columns {
        let (column, type_name) = (column.as_ref(), type_name.as_ref());
        if column.eq_ignore_ascii_case(ID_COLUMN) {
            return Err(CoreError::ReservedColumn {
                column: column.to_string(),
            });
        }
        if !is_identifier(column) {
            return Err(CoreError::InvalidName {
                name: column.to_string(),
            });
        }
        if !seen.insert(column) {
            return Err(CoreError::DuplicateColumn {
                column: column.to_string(),
            });
        }
        let ty = ColumnType::from_name(type_name).ok_or_else(|| CoreError::InvalidColumnType {
            column: column.to_string(),
            type_name: type_name.to_string(),
        })?;
        user_columns.push((column.to_string(), ty));
    }

    let mut updated = registry.clone();
    updated.insert(name.to_string(), TableSchema::with_user_columns(user_columns));
    debug!(table = name, columns = columns.len(), "table created");
    Ok(updated)
}

/// Removes the table named `name`.
///
/// # Errors
///
/// Returns [`CoreError::TableNotFound`] if there is no such table.
pub fn drop_table(registry: &SchemaRegistry, name: &str) -> CoreResult<SchemaRegistry> {
    let mut updated = registry.clone();
    updated
        .remove(name)
        .ok_or_else(|| CoreError::table_not_found(name))?;
    debug!(table = name, "table dropped");
    Ok(updated)
}

/// Returns all table names in creation order.
#[must_use]
pub fn list_tables(registry: &SchemaRegistry) -> Vec<&str> {
    registry.iter().map(|(name, _)| name).collect()
}

/// Returns the schema of `name`.
///
/// Row counts are not part of the schema; callers pair this with the
/// table's rows themselves.
///
/// # Errors
///
/// Returns [`CoreError::TableNotFound`] if there is no such table.
pub fn info<'a>(registry: &'a SchemaRegistry, name: &str) -> CoreResult<&'a TableSchema> {
    registry
        .get(name)
        .ok_or_else(|| CoreError::table_not_found(name))
}

/// Checks an update's set clause against the table schema.
///
/// The record store writes whatever it is given, so this must run first.
///
/// # Errors
///
/// - [`CoreError::ReservedColumn`] if the clause assigns `ID`
/// - [`CoreError::UnknownColumn`] if a column is not in the schema
/// - [`CoreError::TypeMismatch`] if a value's type differs from the column type
pub fn check_assignments(table: &str, schema: &TableSchema, set: &Clause) -> CoreResult<()> {
    for (column, value) in set.iter() {
        if column == ID_COLUMN {
            return Err(CoreError::ReservedColumn {
                column: column.to_string(),
            });
        }
        let expected = schema
            .get(column)
            .ok_or_else(|| CoreError::unknown_column(table, column))?;
        let found = value.column_type();
        if found != expected {
            return Err(CoreError::TypeMismatch {
                column: column.to_string(),
                expected,
                found,
            });
        }
    }
    Ok(())
}

/// Checks that every column of a where clause exists, `ID` included.
///
/// # Errors
///
/// Returns [`CoreError::UnknownColumn`] for the first unknown column.
pub fn check_filter(table: &str, schema: &TableSchema, filter: &Clause) -> CoreResult<()> {
    match filter.iter().find(|(column, _)| !schema.contains(column)) {
        Some((column, _)) => Err(CoreError::unknown_column(table, column)),
        None => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use proptest::prelude::*;

    fn users() -> SchemaRegistry {
        create_table(
            &SchemaRegistry::new(),
            "users",
            &[("name", "str"), ("age", "int")],
        )
        .unwrap()
    }

    #[test]
    fn create_prepends_id() {
        let registry = users();
        let schema = registry.get("users").unwrap();
        assert_eq!(schema.column_names(), vec!["ID", "name", "age"]);
        assert_eq!(schema.get("ID"), Some(ColumnType::Int));
        assert_eq!(schema.get("age"), Some(ColumnType::Int));
    }

    #[test]
    fn create_leaves_input_untouched() {
        let original = users();
        let updated = create_table(&original, "posts", &[("title", "str")]).unwrap();
        assert_eq!(original.len(), 1);
        assert_eq!(updated.len(), 2);
    }

    #[test]
    fn create_existing_fails() {
        let err = create_table(&users(), "users", &[("x", "int")]).unwrap_err();
        assert_eq!(
            err,
            CoreError::TableExists {
                name: "users".into()
            }
        );
        assert_eq!(err.kind(), ErrorKind::SchemaConflict);
    }

    #[test]
    fn create_rejects_id_in_any_case() {
        for column in ["ID", "id", "Id", "iD"] {
            let err = create_table(&SchemaRegistry::new(), "t", &[(column, "int")]).unwrap_err();
            assert_eq!(err.kind(), ErrorKind::ReservedColumn);
        }
    }

    #[test]
    fn create_rejects_unknown_type() {
        let err = create_table(&SchemaRegistry::new(), "t", &[("a", "int"), ("b", "float")])
            .unwrap_err();
        assert_eq!(
            err,
            CoreError::InvalidColumnType {
                column: "b".into(),
                type_name: "float".into()
            }
        );
    }

    #[test]
    fn type_names_are_case_sensitive() {
        let err = create_table(&SchemaRegistry::new(), "t", &[("a", "INT")]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidColumnType);
    }

    #[test]
    fn create_rejects_duplicates_and_bad_names() {
        let err = create_table(&SchemaRegistry::new(), "t", &[("a", "int"), ("a", "str")])
            .unwrap_err();
        assert_eq!(err, CoreError::DuplicateColumn { column: "a".into() });

        let err = create_table(&SchemaRegistry::new(), "../t", &[("a", "int")]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::MalformedClause);

        let err = create_table(&SchemaRegistry::new(), "t", &[("a b", "int")]).unwrap_err();
        assert_eq!(err, CoreError::InvalidName { name: "a b".into() });
    }

    #[test]
    fn table_names_are_case_sensitive() {
        let registry = create_table(&users(), "Users", &[("x", "bool")]).unwrap();
        assert_eq!(list_tables(&registry), vec!["users", "Users"]);
    }

    #[test]
    fn drop_round_trip() {
        let original = users();
        let created = create_table(&original, "t", &[("a", "int")]).unwrap();
        let dropped = drop_table(&created, "t").unwrap();
        assert_eq!(dropped, original);
    }

    #[test]
    fn drop_missing_fails() {
        let err = drop_table(&SchemaRegistry::new(), "ghost").unwrap_err();
        assert_eq!(err, CoreError::table_not_found("ghost"));
    }

    #[test]
    fn info_exposes_schema() {
        let registry = users();
        assert_eq!(info(&registry, "users").unwrap().len(), 3);
        assert_eq!(
            info(&registry, "nope").unwrap_err().kind(),
            ErrorKind::SchemaConflict
        );
    }

    #[test]
    fn list_empty() {
        assert!(list_tables(&SchemaRegistry::new()).is_empty());
    }

    #[test]
    fn assignments_checked_against_schema() {
        let registry = users();
        let schema = registry.get("users").unwrap();

        assert!(check_assignments("users", schema, &Clause::new().with("age", 31)).is_ok());

        let err = check_assignments("users", schema, &Clause::new().with("ID", 9)).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::ReservedColumn);

        let err =
            check_assignments("users", schema, &Clause::new().with("email", "x")).unwrap_err();
        assert_eq!(err, CoreError::unknown_column("users", "email"));

        let err = check_assignments("users", schema, &Clause::new().with("age", "31")).unwrap_err();
        assert_eq!(
            err,
            CoreError::TypeMismatch {
                column: "age".into(),
                expected: ColumnType::Int,
                found: ColumnType::Str
            }
        );
    }

    #[test]
    fn filter_allows_id() {
        let registry = users();
        let schema = registry.get("users").unwrap();
        assert!(check_filter("users", schema, &Clause::new().with("ID", 1)).is_ok());
        assert!(check_filter("users", schema, &Clause::new().with("age", "x")).is_ok());
        assert_eq!(
            check_filter("users", schema, &Clause::new().with("nope", 1)).unwrap_err(),
            CoreError::unknown_column("users", "nope")
        );
    }

    fn column_strategy() -> impl Strategy<Value = Vec<(String, String)>> {
        prop::collection::vec(
            (
                "[a-h][a-z0-9_]{0,8}",
                prop::sample::select(vec!["int", "str", "bool"]),
            ),
            0..6,
        )
        .prop_map(|cols| {
            let mut seen = HashSet::new();
            cols.into_iter()
                .filter(|(name, _)| seen.insert(name.clone()))
                .map(|(name, ty)| (name, ty.to_string()))
                .collect()
        })
    }

    proptest! {
        #[test]
        fn created_schema_is_id_then_columns(columns in column_strategy()) {
            let registry = create_table(&SchemaRegistry::new(), "t", &columns).unwrap();
            let schema = registry.get("t").unwrap();
            let names: Vec<&str> = schema.column_names();
            prop_assert_eq!(names[0], "ID");
            let rest: Vec<&str> = columns.iter().map(|(n, _)| n.as_str()).collect();
            prop_assert_eq!(&names[1..], &rest[..]);
            prop_assert!(schema.is_well_formed());
        }

        #[test]
        fn create_then_drop_restores_registry(columns in column_strategy()) {
            let base = users();
            let created = create_table(&base, "t", &columns).unwrap();
            prop_assert_eq!(drop_table(&created, "t").unwrap(), base);
        }
    }
}
