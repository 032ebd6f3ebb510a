//! Error types for RowDB core.

use crate::types::ColumnType;
use thiserror::Error;

/// Result type for core operations.
pub type CoreResult<T> = Result<T, CoreError>;

/// Coarse classification of a [`CoreError`].
///
/// The dispatcher only needs to know which family an error belongs to;
/// the variant carries the details for the message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Table already exists, does not exist, or a column is declared twice.
    SchemaConflict,
    /// A user tried to declare the synthetic `ID` column.
    ReservedColumn,
    /// A declared type is outside `{int, str, bool}`.
    InvalidColumnType,
    /// Insert value count differs from the non-ID column count.
    ArityMismatch,
    /// A value does not fit its column type.
    TypeCoercionFailure,
    /// A `column:type` or `column=value` token is malformed.
    MalformedClause,
    /// Delete without a where clause, or update without a set clause.
    EmptyPredicateRejected,
}

/// Errors that can occur in RowDB core operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CoreError {
    /// Table already exists.
    #[error("table '{name}' already exists")]
    TableExists {
        /// Name of the table.
        name: String,
    },

    /// Table does not exist.
    #[error("table '{name}' does not exist")]
    TableNotFound {
        /// Name of the table.
        name: String,
    },

    /// The same column was declared more than once.
    #[error("column '{column}' is declared more than once")]
    DuplicateColumn {
        /// The repeated column name.
        column: String,
    },

    /// The `ID` column is reserved.
    #[error("column '{column}' is reserved: the ID column is added automatically")]
    ReservedColumn {
        /// The offending column name as the user wrote it.
        column: String,
    },

    /// Unsupported column type.
    #[error("invalid type '{type_name}' for column '{column}': allowed types are int, str, bool")]
    InvalidColumnType {
        /// The column being declared.
        column: String,
        /// The rejected type text.
        type_name: String,
    },

    /// Wrong number of insert values.
    #[error("expected {expected} values, got {actual}")]
    ArityMismatch {
        /// Number of non-ID columns.
        expected: usize,
        /// Number of supplied values.
        actual: usize,
    },

    /// A raw insert value could not be converted to the column type.
    #[error("value '{value}' for column '{column}' is not a valid {expected}")]
    TypeCoercion {
        /// Target column.
        column: String,
        /// Declared column type.
        expected: ColumnType,
        /// The raw text.
        value: String,
    },

    /// An already typed literal does not match the column type.
    #[error("column '{column}' expects {expected}, got {found}")]
    TypeMismatch {
        /// Target column.
        column: String,
        /// Declared column type.
        expected: ColumnType,
        /// Type of the supplied literal.
        found: ColumnType,
    },

    /// A clause token does not follow its grammar.
    #[error("malformed token '{token}': expected '{expected}'")]
    MalformedClause {
        /// The offending token.
        token: String,
        /// Shape the token should have.
        expected: &'static str,
    },

    /// A table or column name is not a valid identifier.
    #[error("invalid name '{name}': use letters, digits and '_', starting with a letter or '_'")]
    InvalidName {
        /// The rejected name.
        name: String,
    },

    /// A clause refers to a column the table does not have.
    #[error("table '{table}' has no column '{column}'")]
    UnknownColumn {
        /// Table being queried.
        table: String,
        /// Missing column.
        column: String,
    },

    /// A required clause was empty.
    #[error("{operation} requires a non-empty {clause} clause")]
    EmptyPredicate {
        /// The operation that was refused.
        operation: &'static str,
        /// Which clause was missing.
        clause: &'static str,
    },

    /// The table already holds the largest representable `ID`.
    #[error("no record IDs left after {max}")]
    IdExhausted {
        /// Largest stored ID.
        max: i64,
    },
}

impl CoreError {
    /// Returns the family this error belongs to.
    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::TableExists { .. }
            | Self::TableNotFound { .. }
            | Self::DuplicateColumn { .. }
            | Self::IdExhausted { .. } => ErrorKind::SchemaConflict,
            Self::ReservedColumn { .. } => ErrorKind::ReservedColumn,
            Self::InvalidColumnType { .. } => ErrorKind::InvalidColumnType,
            Self::ArityMismatch { .. } => ErrorKind::ArityMismatch,
            Self::TypeCoercion { .. } | Self::TypeMismatch { .. } => {
                ErrorKind::TypeCoercionFailure
            }
            Self::MalformedClause { .. } | Self::InvalidName { .. } | Self::UnknownColumn { .. } => {
                ErrorKind::MalformedClause
            }
            Self::EmptyPredicate { .. } => ErrorKind::EmptyPredicateRejected,
        }
    }

    /// Creates a table not found error.
    pub fn table_not_found(name: impl Into<String>) -> Self {
        Self::TableNotFound { name: name.into() }
    }

    /// Creates a malformed clause error.
    pub fn malformed(token: impl Into<String>, expected: &'static str) -> Self {
        Self::MalformedClause {
            token: token.into(),
            expected,
        }
    }

    /// Creates an unknown column error.
    pub fn unknown_column(table: impl Into<String>, column: impl Into<String>) -> Self {
        Self::UnknownColumn {
            table: table.into(),
            column: column.into(),
        }
    }
}
