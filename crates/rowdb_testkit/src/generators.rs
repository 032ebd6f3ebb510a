//! Property-based test generators using proptest.
//!
//! Provides strategies for generating schemas, values and clauses that
//! satisfy the engine's naming and typing rules.

use proptest::prelude::*;
use rowdb_core::{Clause, ColumnType, Literal};
use std::collections::HashSet;

/// Strategy for generating valid table names.
pub fn table_name_strategy() -> impl Strategy<Value = String> {
    prop::string::string_regex("[a-zA-Z_][a-zA-Z0-9_]{0,15}")
        .expect("Invalid regex")
        .prop_filter("Table name must not be empty", |s| !s.is_empty())
}

/// Strategy for generating column names that never collide with `ID`.
pub fn column_name_strategy() -> impl Strategy<Value = String> {
    prop::string::string_regex("[a-h][a-z0-9_]{0,8}").expect("Invalid regex")
}

/// Strategy for generating column types.
pub fn column_type_strategy() -> impl Strategy<Value = ColumnType> {
    prop_oneof![
        Just(ColumnType::Int),
        Just(ColumnType::Str),
        Just(ColumnType::Bool),
    ]
}

/// Strategy for generating a list of distinct user columns.
pub fn columns_strategy(max: usize) -> impl Strategy<Value = Vec<(String, ColumnType)>> {
    prop::collection::vec((column_name_strategy(), column_type_strategy()), 1..=max.max(1))
        .prop_map(|mut columns| {
            let mut seen = HashSet::new();
            columns.retain(|(name, _)| seen.insert(name.clone()));
            columns
        })
}

/// Strategy for generating a literal of the given type.
pub fn literal_strategy(ty: ColumnType) -> BoxedStrategy<Literal> {
    match ty {
        ColumnType::Int => any::<i64>().prop_map(Literal::Int).boxed(),
        ColumnType::Bool => any::<bool>().prop_map(Literal::Bool).boxed(),
        ColumnType::Str => prop::string::string_regex("[a-zA-Z0-9 ]{0,12}")
            .expect("Invalid regex")
            .prop_map(Literal::Str)
            .boxed(),
    }
}

/// Strategy for generating the raw text a user would type for a value.
///
/// Strings are always quoted so they round-trip through the clause parser
/// as text even when they look like numbers or booleans.
pub fn raw_value_strategy(ty: ColumnType) -> BoxedStrategy<(String, Literal)> {
    literal_strategy(ty)
        .prop_map(|literal| {
            let raw = match &literal {
                Literal::Str(text) => format!("\"{text}\""),
                other => other.to_string(),
            };
            (raw, literal)
        })
        .boxed()
}

/// Strategy for generating a filter over the given columns.
pub fn clause_strategy(columns: Vec<(String, ColumnType)>) -> impl Strategy<Value = Clause> {
    let per_column: Vec<BoxedStrategy<Option<(String, Literal)>>> = columns
        .into_iter()
        .map(|(name, ty)| {
            prop::option::of(literal_strategy(ty).prop_map(move |value| (name.clone(), value)))
                .boxed()
        })
        .collect();

    per_column.prop_map(|pairs| {
        pairs
            .into_iter()
            .flatten()
            .collect::<Clause>()
    })
}
