//! Record store: typed insert, select, update and delete over a row snapshot.
//!
//! The caller loads the rows, hands them in, and persists what comes back.
//! Insert coerces raw text using the table schema. Select, update and
//! delete compare already typed clause literals by strict equality.

use crate::clause::unquote;
use crate::error::{CoreError, CoreResult};
use crate::schema;
use crate::types::{Clause, ColumnType, Literal, Record, SchemaRegistry};
use tracing::debug;

/// Returns the identifier the next inserted record receives.
///
/// This is one more than the largest `ID` present, or `1` for an empty
/// table. IDs freed by deletes are never handed out again as long as a
/// larger one survives. The result is never below `1`.
///
/// # Errors
///
/// Returns [`CoreError::IdExhausted`] if the largest `ID` is `i64::MAX`.
pub fn next_id(rows: &[Record]) -> CoreResult<i64> {
    match rows.iter().filter_map(Record::id).max() {
        Some(max) => max
            .checked_add(1)
            .map(|id| id.max(1))
            .ok_or(CoreError::IdExhausted { max }),
        None => Ok(1),
    }
}

/// Inserts one record built from raw textual values.
///
/// Values are matched to the non-`ID` columns in schema order. Returns the
/// updated rows and the new record's `ID`.
///
/// # Errors
///
/// - [`CoreError::TableNotFound`] if the table does not exist
/// - [`CoreError::ArityMismatch`] if the value count is wrong
/// - [`CoreError::TypeCoercion`] if a value does not fit its column
/// - [`CoreError::IdExhausted`] if no larger `ID` can be assigned
pub fn insert<S: AsRef<str>>(
    registry: &SchemaRegistry,
    table: &str,
    raw_values: &[S],
    mut rows: Vec<Record>,
) -> CoreResult<(Vec<Record>, i64)> {
    let schema = schema::info(registry, table)?;

    let expected = schema.user_columns().count();
    if raw_values.len() != expected {
        return Err(CoreError::ArityMismatch {
            expected,
            actual: raw_values.len(),
        });
    }

    let id = next_id(&rows)?;
    let mut record = Record::with_id(id);
    for ((column, ty), raw) in schema.user_columns().zip(raw_values) {
        record.set(column, coerce(column, ty, raw.as_ref())?);
    }

    rows.push(record);
    debug!(table, id, "record inserted");
    Ok((rows, id))
}

/// Returns the rows matching every pair of `filter`.
///
/// An empty filter matches all rows.
#[must_use]
pub fn select(rows: &[Record], filter: &Clause) -> Vec<Record> {
    rows.iter()
        .filter(|record| record.matches(filter))
        .cloned()
        .collect()
}

/// Writes `set` onto every row matching `filter`.
///
/// Columns in `set` are written as given; check them with
/// [`schema::check_assignments`] first. Returns the rows and the IDs of the
/// updated records.
///
/// # Errors
///
/// Returns [`CoreError::EmptyPredicate`] if `set` is empty.
pub fn update(
    mut rows: Vec<Record>,
    set: &Clause,
    filter: &Clause,
) -> CoreResult<(Vec<Record>, Vec<i64>)> {
    if set.is_empty() {
        return Err(CoreError::EmptyPredicate {
            operation: "update",
            clause: "set",
        });
    }

    let mut updated = Vec::new();
    for record in rows.iter_mut().filter(|record| record.matches(filter)) {
        for (column, value) in set.iter() {
            record.set(column, value.clone());
        }
        updated.extend(record.id());
    }

    debug!(count = updated.len(), "records updated");
    Ok((rows, updated))
}

/// Removes every row matching `filter`.
///
/// Returns the remaining rows and the IDs of the removed records.
///
/// # Errors
///
/// Returns [`CoreError::EmptyPredicate`] if `filter` is empty, so a missing
/// where clause can never wipe a table.
pub fn delete(rows: Vec<Record>, filter: &Clause) -> CoreResult<(Vec<Record>, Vec<i64>)> {
    if filter.is_empty() {
        return Err(CoreError::EmptyPredicate {
            operation: "delete",
            clause: "where",
        });
    }

    let (removed, kept): (Vec<Record>, Vec<Record>) =
        rows.into_iter().partition(|record| record.matches(filter));
    let removed: Vec<i64> = removed.iter().filter_map(Record::id).collect();

    debug!(count = removed.len(), "records deleted");
    Ok((kept, removed))
}

fn coerce(column: &str, ty: ColumnType, raw: &str) -> CoreResult<Literal> {
    let invalid = || CoreError::TypeCoercion {
        column: column.to_string(),
        expected: ty,
        value: raw.to_string(),
    };
    match ty {
        ColumnType::Int => raw.parse::<i64>().map(Literal::Int).map_err(|_| invalid()),
        ColumnType::Bool => {
            if raw.eq_ignore_ascii_case("true") {
                Ok(Literal::Bool(true))
            } else if raw.eq_ignore_ascii_case("false") {
                Ok(Literal::Bool(false))
            } else {
                Err(invalid())
            }
        }
        ColumnType::Str => Ok(Literal::Str(unquote(raw).unwrap_or(raw).to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use crate::schema::create_table;
    use proptest::prelude::*;

    fn registry() -> SchemaRegistry {
        create_table(&SchemaRegistry::new(), "t", &[("a", "int"), ("b", "bool")]).unwrap()
    }

    fn users() -> SchemaRegistry {
        create_table(
            &SchemaRegistry::new(),
            "users",
            &[("name", "str"), ("age", "int")],
        )
        .unwrap()
    }

    #[test]
    fn insert_coerces_values() {
        let (rows, id) = insert(&registry(), "t", &["5", "true"], Vec::new()).unwrap();
        assert_eq!(id, 1);
        assert_eq!(rows, vec![Record::with_id(1).with("a", 5).with("b", true)]);
    }

    #[test]
    fn ids_are_not_reused_after_delete() {
        let registry = registry();
        let (rows, _) = insert(&registry, "t", &["5", "true"], Vec::new()).unwrap();
        let (rows, second) = insert(&registry, "t", &["6", "false"], rows).unwrap();
        assert_eq!(second, 2);

        let (rows, removed) = delete(rows, &Clause::new().with("a", 5)).unwrap();
        assert_eq!(removed, vec![1]);

        let (rows, third) = insert(&registry, "t", &["7", "TRUE"], rows).unwrap();
        assert_eq!(third, 3);
        assert_eq!(rows.len(), 2);
    }

    #[test]
    fn next_id_skips_gaps() {
        assert_eq!(next_id(&[]), Ok(1));
        let rows = vec![Record::with_id(3), Record::with_id(10), Record::with_id(4)];
        assert_eq!(next_id(&rows), Ok(11));
    }

    #[test]
    fn next_id_never_goes_below_one() {
        assert_eq!(next_id(&[Record::with_id(-5)]), Ok(1));
        assert_eq!(next_id(&[Record::with_id(0)]), Ok(1));

        let (_, id) = insert(&registry(), "t", &["1", "true"], vec![Record::with_id(-5)]).unwrap();
        assert_eq!(id, 1);
    }

    #[test]
    fn exhausted_ids_are_an_error() {
        let full = vec![Record::with_id(i64::MAX)];
        assert_eq!(
            next_id(&full),
            Err(CoreError::IdExhausted { max: i64::MAX })
        );

        let err = insert(&registry(), "t", &["1", "true"], full).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::SchemaConflict);
    }

    #[test]
    fn insert_unknown_table() {
        let err = insert(&registry(), "nope", &["1"], Vec::new()).unwrap_err();
        assert_eq!(err, CoreError::table_not_found("nope"));
    }

    #[test]
    fn insert_arity_mismatch() {
        let err = insert(&registry(), "t", &["1"], Vec::new()).unwrap_err();
        assert_eq!(
            err,
            CoreError::ArityMismatch {
                expected: 2,
                actual: 1
            }
        );
    }

    #[test]
    fn insert_rejects_bad_values_without_mutation() {
        let rows = vec![Record::with_id(1).with("a", 1).with("b", false)];
        for values in [["x", "true"], ["1", "yes"], ["1.5", "true"], ["\"5\"", "false"]] {
            let err = insert(&registry(), "t", &values, rows.clone()).unwrap_err();
            assert_eq!(err.kind(), ErrorKind::TypeCoercionFailure, "{values:?}");
        }
    }

    #[test]
    fn insert_strips_one_layer_of_quotes() {
        let (rows, _) = insert(&users(), "users", &["\"Alice\"", "30"], Vec::new()).unwrap();
        assert_eq!(rows[0].get("name"), Some(&Literal::Str("Alice".into())));

        let (rows, _) = insert(&users(), "users", &["'\"Bob\"'", "30"], Vec::new()).unwrap();
        assert_eq!(rows[0].get("name"), Some(&Literal::Str("\"Bob\"".into())));

        let (rows, _) = insert(&users(), "users", &["Carol Ann", "30"], Vec::new()).unwrap();
        assert_eq!(rows[0].get("name"), Some(&Literal::Str("Carol Ann".into())));
    }

    #[test]
    fn select_is_type_sensitive() {
        let rows = vec![Record::with_id(1).with("a", 5), Record::with_id(2).with("a", 6)];
        assert_eq!(
            select(&rows, &Clause::new().with("a", 5)),
            vec![rows[0].clone()]
        );
        assert!(select(&rows, &Clause::new().with("a", "5")).is_empty());
        assert!(select(&rows, &Clause::new().with("a", true)).is_empty());
    }

    #[test]
    fn select_empty_filter_matches_all() {
        let rows = vec![Record::with_id(1), Record::with_id(2)];
        assert_eq!(select(&rows, &Clause::new()), rows);
        assert!(select(&[], &Clause::new()).is_empty());
    }

    #[test]
    fn select_requires_every_pair() {
        let rows = vec![
            Record::with_id(1).with("a", 1).with("b", true),
            Record::with_id(2).with("a", 1).with("b", false),
        ];
        let hits = select(&rows, &Clause::new().with("a", 1).with("b", false));
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].id(), Some(2));
    }

    #[test]
    fn update_matching_rows() {
        let rows = vec![
            Record::with_id(1).with("name", "Alice").with("age", 30),
            Record::with_id(2).with("name", "Bob").with("age", 40),
        ];
        let (rows, ids) = update(
            rows,
            &Clause::new().with("age", 31),
            &Clause::new().with("name", "Alice"),
        )
        .unwrap();
        assert_eq!(ids, vec![1]);
        assert_eq!(rows[0].get("age"), Some(&Literal::Int(31)));
        assert_eq!(rows[1].get("age"), Some(&Literal::Int(40)));
        assert_eq!(rows[0].id(), Some(1));
    }

    #[test]
    fn update_empty_filter_touches_all() {
        let rows = vec![Record::with_id(1).with("a", 1), Record::with_id(4).with("a", 2)];
        let (rows, ids) = update(rows, &Clause::new().with("a", 0), &Clause::new()).unwrap();
        assert_eq!(ids, vec![1, 4]);
        assert!(rows.iter().all(|r| r.get("a") == Some(&Literal::Int(0))));
    }

    #[test]
    fn update_requires_set_clause() {
        let rows = vec![Record::with_id(1).with("a", 1)];
        for filter in [Clause::new(), Clause::new().with("a", 1)] {
            let err = update(rows.clone(), &Clause::new(), &filter).unwrap_err();
            assert_eq!(err.kind(), ErrorKind::EmptyPredicateRejected);
        }
    }

    #[test]
    fn update_no_match_is_not_an_error() {
        let rows = vec![Record::with_id(1).with("a", 1)];
        let (after, ids) = update(
            rows.clone(),
            &Clause::new().with("a", 2),
            &Clause::new().with("a", 99),
        )
        .unwrap();
        assert!(ids.is_empty());
        assert_eq!(after, rows);
    }

    #[test]
    fn delete_requires_where_clause() {
        let rows = vec![Record::with_id(1).with("a", 1)];
        let err = delete(rows, &Clause::new()).unwrap_err();
        assert_eq!(
            err,
            CoreError::EmptyPredicate {
                operation: "delete",
                clause: "where"
            }
        );
    }

    #[test]
    fn delete_keeps_order_of_survivors() {
        let rows = vec![
            Record::with_id(1).with("a", 1),
            Record::with_id(2).with("a", 2),
            Record::with_id(3).with("a", 1),
            Record::with_id(4).with("a", 3),
        ];
        let (kept, removed) = delete(rows, &Clause::new().with("a", 1)).unwrap();
        assert_eq!(removed, vec![1, 3]);
        let ids: Vec<i64> = kept.iter().filter_map(Record::id).collect();
        assert_eq!(ids, vec![2, 4]);
    }

    #[test]
    fn users_lifecycle() {
        let registry = users();
        let (rows, id) = insert(&registry, "users", &["Alice", "30"], Vec::new()).unwrap();
        assert_eq!(id, 1);
        assert_eq!(
            select(&rows, &Clause::new()),
            vec![Record::with_id(1).with("name", "Alice").with("age", 30)]
        );

        let (rows, _) = update(
            rows,
            &Clause::new().with("age", 31),
            &Clause::new().with("name", "Alice"),
        )
        .unwrap();
        assert_eq!(
            select(&rows, &Clause::new()),
            vec![Record::with_id(1).with("name", "Alice").with("age", 31)]
        );

        let (rows, _) = delete(rows, &Clause::new().with("name", "Alice")).unwrap();
        assert!(select(&rows, &Clause::new()).is_empty());

        let (_, id) = insert(&registry, "users", &["Bob", "25"], rows).unwrap();
        assert_eq!(id, 2);
    }

    proptest! {
        #[test]
        fn ids_strictly_increase(values in prop::collection::vec(any::<i64>(), 1..20)) {
            let registry = create_table(&SchemaRegistry::new(), "n", &[("v", "int")]).unwrap();
            let mut rows = Vec::new();
            let mut last = 0;
            for v in values {
                let (next, id) = insert(&registry, "n", &[v.to_string()], rows).unwrap();
                prop_assert!(id > last);
                last = id;
                rows = next;
            }
        }

        #[test]
        fn select_then_delete_partition(values in prop::collection::vec(0i64..4, 0..20), probe in 0i64..4) {
            let rows: Vec<Record> = values
                .iter()
                .enumerate()
                .map(|(i, v)| Record::with_id(i as i64 + 1).with("v", Literal::Int(*v)))
                .collect();
            let filter = Clause::new().with("v", Literal::Int(probe));
            let hits = select(&rows, &filter);
            let (kept, removed) = delete(rows.clone(), &filter).unwrap();
            prop_assert_eq!(hits.len(), removed.len());
            prop_assert_eq!(hits.len() + kept.len(), rows.len());
        }
    }
}
