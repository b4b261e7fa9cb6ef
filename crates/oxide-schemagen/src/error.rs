//! Error types for schema generation.

use crate::datatype::Datatype;

/// Errors that can occur while rendering or resolving a schema.
///
/// Every variant aborts generation for the affected table only. None of them
/// is recoverable: they describe an inconsistent schema.
#[derive(Debug, thiserror::Error)]
pub enum GenError {
    /// The zero datatype was used where a concrete type is required.
    #[error("invalid datatype")]
    InvalidDatatype,

    /// The datatype has no mapping in the selected dialect.
    #[error("unsupported datatype {datatype} for dialect {dialect}")]
    UnsupportedDatatype {
        /// Dialect name.
        dialect: &'static str,
        /// The unmapped datatype.
        datatype: Datatype,
    },

    /// A has-one reference names a table absent from the database.
    #[error("table '{table}' references missing foreign table '{foreign_table}'")]
    MissingForeignTable {
        /// The referencing table.
        table: String,
        /// The table that could not be found.
        foreign_table: String,
    },

    /// An explicit foreign-key column list does not match the target key.
    #[error(
        "table '{table}' declares {found} foreign key column(s) toward '{foreign_table}', \
         whose primary key has {expected} column(s)"
    )]
    ColumnCountMismatch {
        /// The referencing table.
        table: String,
        /// The referenced table.
        foreign_table: String,
        /// Primary-key column count of the referenced table.
        expected: usize,
        /// Number of explicitly declared column names.
        found: usize,
    },

    /// A datatype error raised while rendering a specific column.
    #[error("column '{table}.{column}': {source}")]
    Column {
        /// Table name.
        table: String,
        /// Column name.
        column: String,
        /// The underlying error.
        #[source]
        source: Box<GenError>,
    },

    /// IO error (reading schema files).
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Schema deserialization error.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl GenError {
    /// Attaches table and column identity to a datatype error.
    pub(crate) fn in_column(self, table: &str, column: &str) -> Self {
        Self::Column {
            table: table.to_string(),
            column: column.to_string(),
            source: Box::new(self),
        }
    }
}

/// Result type for generation operations.
pub type Result<T> = std::result::Result<T, GenError>;
