//! Core data types: column types, literals, schemas, records and clauses.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Name of the synthetic identifier column every table carries.
pub const ID_COLUMN: &str = "ID";

/// Declared type of a column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColumnType {
    /// Signed 64-bit integer.
    Int,
    /// UTF-8 text.
    Str,
    /// Boolean.
    Bool,
}

impl ColumnType {
    /// Parses a declared type name. Only the exact lowercase names are accepted.
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "int" => Some(Self::Int),
            "str" => Some(Self::Str),
            "bool" => Some(Self::Bool),
            _ => None,
        }
    }

    /// Returns the declared type name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Int => "int",
            Self::Str => "str",
            Self::Bool => "bool",
        }
    }
}

impl fmt::Display for ColumnType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A typed value stored in a record or carried by a clause.
///
/// Equality is type-sensitive: `Int(1)`, `Str("1")` and `Bool(true)` are
/// all different values. The untagged representation maps each variant to
/// the matching JSON scalar.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Literal {
    /// Boolean value.
    Bool(bool),
    /// Integer value.
    Int(i64),
    /// Text value.
    Str(String),
}

impl Literal {
    /// Returns the column type this literal belongs to.
    #[must_use]
    pub const fn column_type(&self) -> ColumnType {
        match self {
            Self::Bool(_) => ColumnType::Bool,
            Self::Int(_) => ColumnType::Int,
            Self::Str(_) => ColumnType::Str,
        }
    }

    /// Returns the integer payload, if this is an `Int`.
    #[must_use]
    pub const fn as_int(&self) -> Option<i64> {
        match self {
            Self::Int(v) => Some(*v),
            _ => None,
        }
    }
}

impl fmt::Display for Literal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bool(v) => write!(f, "{v}"),
            Self::Int(v) => write!(f, "{v}"),
            Self::Str(v) => f.write_str(v),
        }
    }
}

impl From<i64> for Literal {
    fn from(value: i64) -> Self {
        Self::Int(value)
    }
}

impl From<i32> for Literal {
    fn from(value: i32) -> Self {
        Self::Int(i64::from(value))
    }
}

impl From<bool> for Literal {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<&str> for Literal {
    fn from(value: &str) -> Self {
        Self::Str(value.to_string())
    }
}

impl From<String> for Literal {
    fn from(value: String) -> Self {
        Self::Str(value)
    }
}

/// Ordered column definitions of one table. `ID` is always first.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TableSchema {
    columns: IndexMap<String, ColumnType>,
}

impl TableSchema {
    /// Builds a schema from user columns, prepending `ID: int`.
    pub(crate) fn with_user_columns(user: impl IntoIterator<Item = (String, ColumnType)>) -> Self {
        let mut columns = IndexMap::new();
        columns.insert(ID_COLUMN.to_string(), ColumnType::Int);
        columns.extend(user);
        Self { columns }
    }

    /// Returns the type of `column`.
    #[must_use]
    pub fn get(&self, column: &str) -> Option<ColumnType> {
        self.columns.get(column).copied()
    }

    /// Returns true if the schema declares `column`.
    #[must_use]
    pub fn contains(&self, column: &str) -> bool {
        self.columns.contains_key(column)
    }

    /// Iterates over all columns, `ID` first.
    pub fn columns(&self) -> impl Iterator<Item = (&str, ColumnType)> {
        self.columns.iter().map(|(name, ty)| (name.as_str(), *ty))
    }

    /// Iterates over the user-declared columns, skipping `ID`.
    pub fn user_columns(&self) -> impl Iterator<Item = (&str, ColumnType)> {
        self.columns().filter(|(name, _)| *name != ID_COLUMN)
    }

    /// Column names in declaration order, `ID` first.
    #[must_use]
    pub fn column_names(&self) -> Vec<&str> {
        self.columns.keys().map(String::as_str).collect()
    }

    /// Number of columns including `ID`.
    #[must_use]
    pub fn len(&self) -> usize {
        self.columns.len()
    }

    /// Returns true if the schema has no columns at all.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    /// Checks the `ID`-first invariant and that no other column is named `id`.
    ///
    /// Schemas built by [`crate::schema::create_table`] always pass; this is
    /// for schemas that came back from storage.
    #[must_use]
    pub fn is_well_formed(&self) -> bool {
        let mut iter = self.columns.iter();
        matches!(iter.next(), Some((name, ColumnType::Int)) if name == ID_COLUMN)
            && iter.all(|(name, _)| !name.eq_ignore_ascii_case(ID_COLUMN))
    }
}

/// All table schemas, keyed by table name in creation order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SchemaRegistry {
    tables: IndexMap<String, TableSchema>,
}

impl SchemaRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the schema of `table`.
    #[must_use]
    pub fn get(&self, table: &str) -> Option<&TableSchema> {
        self.tables.get(table)
    }

    /// Returns true if `table` exists.
    #[must_use]
    pub fn contains(&self, table: &str) -> bool {
        self.tables.contains_key(table)
    }

    /// Iterates over `(name, schema)` pairs in creation order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &TableSchema)> {
        self.tables.iter().map(|(name, schema)| (name.as_str(), schema))
    }

    /// Number of tables.
    #[must_use]
    pub fn len(&self) -> usize {
        self.tables.len()
    }

    /// Returns true if there are no tables.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tables.is_empty()
    }

    pub(crate) fn insert(&mut self, table: String, schema: TableSchema) {
        self.tables.insert(table, schema);
    }

    pub(crate) fn remove(&mut self, table: &str) -> Option<TableSchema> {
        self.tables.shift_remove(table)
    }
}

/// One row: column name to value, always holding `ID`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Record {
    fields: IndexMap<String, Literal>,
}

impl Record {
    /// Creates a record holding only its identifier.
    #[must_use]
    pub fn with_id(id: i64) -> Self {
        let mut fields = IndexMap::new();
        fields.insert(ID_COLUMN.to_string(), Literal::Int(id));
        Self { fields }
    }

    /// Adds a field, builder style.
    #[must_use]
    pub fn with(mut self, column: impl Into<String>, value: impl Into<Literal>) -> Self {
        self.fields.insert(column.into(), value.into());
        self
    }

    /// Returns the record's `ID`, if present and an integer.
    #[must_use]
    pub fn id(&self) -> Option<i64> {
        self.fields.get(ID_COLUMN).and_then(Literal::as_int)
    }

    /// Returns the value of `column`.
    #[must_use]
    pub fn get(&self, column: &str) -> Option<&Literal> {
        self.fields.get(column)
    }

    /// Overwrites or adds a field.
    pub fn set(&mut self, column: impl Into<String>, value: Literal) {
        self.fields.insert(column.into(), value);
    }

    /// Iterates over fields in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Literal)> {
        self.fields.iter().map(|(name, value)| (name.as_str(), value))
    }

    /// Number of fields, `ID` included.
    #[must_use]
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Returns true if the record has no fields.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Returns true if every pair of `clause` equals the record's value.
    #[must_use]
    pub fn matches(&self, clause: &Clause) -> bool {
        clause
            .iter()
            .all(|(column, value)| self.fields.get(column) == Some(value))
    }
}

impl FromIterator<(String, Literal)> for Record {
    fn from_iter<I: IntoIterator<Item = (String, Literal)>>(iter: I) -> Self {
        Self {
            fields: iter.into_iter().collect(),
        }
    }
}

/// A parsed `column=value` set, used as a filter or an assignment list.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Clause {
    pairs: IndexMap<String, Literal>,
}

impl Clause {
    /// Creates an empty clause, which matches every row.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a pair, builder style. A repeated column replaces the earlier value.
    #[must_use]
    pub fn with(mut self, column: impl Into<String>, value: impl Into<Literal>) -> Self {
        self.insert(column, value.into());
        self
    }

    /// Adds a pair. A repeated column replaces the earlier value.
    pub fn insert(&mut self, column: impl Into<String>, value: Literal) {
        self.pairs.insert(column.into(), value);
    }

    /// Returns the value for `column`.
    #[must_use]
    pub fn get(&self, column: &str) -> Option<&Literal> {
        self.pairs.get(column)
    }

    /// Iterates over pairs in the order they were written.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Literal)> {
        self.pairs.iter().map(|(name, value)| (name.as_str(), value))
    }

    /// Number of pairs.
    #[must_use]
    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    /// Returns true if the clause has no pairs.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }
}

impl FromIterator<(String, Literal)> for Clause {
    fn from_iter<I: IntoIterator<Item = (String, Literal)>>(iter: I) -> Self {
        Self {
            pairs: iter.into_iter().collect(),
        }
    }
}

/// Returns true if `name` is usable as a table or column name.
#[must_use]
pub fn is_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) if first.is_ascii_alphabetic() || first == '_' => {
            chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
        }
        _ => false,
    }
}
