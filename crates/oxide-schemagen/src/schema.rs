//! Schema representation types.
//!
//! The schema is built once (in code or from a declarative JSON file) and is
//! read-only for the rest of a generation run. Declaration order of tables,
//! columns, index columns and references is preserved everywhere.

use std::path::Path;

use convert_case::{Case, Casing};
use serde::{Deserialize, Serialize};

use crate::datatype::Datatype;
use crate::error::{GenError, Result};

/// Prefix of derived foreign-key column names (`fk_<table>_<column>`).
pub const FOREIGN_KEY_PREFIX: &str = "fk_";

/// Schema definition for a column.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Column {
    /// Column name.
    pub name: String,
    /// Name used for generated code instead of `name`.
    pub display_name: Option<String>,
    /// Abstract datatype.
    pub datatype: Datatype,
    /// Whether the column allows NULL values.
    pub nullable: bool,
    /// Whether a numeric column is unsigned.
    pub unsigned: bool,
    /// Whether this column is part of the primary key.
    pub primary_key: bool,
    /// Whether this column auto-increments. Only honored on primary keys.
    pub auto_increment: bool,
    /// Default value literal, unquoted.
    pub default: Option<String>,
    /// Size (or total digits for decimals).
    pub scale: u32,
    /// Digits after the decimal point.
    pub precision: u32,
}

impl Column {
    /// Creates a new NOT NULL column.
    #[must_use]
    pub fn new(name: impl Into<String>, datatype: Datatype) -> Self {
        Self {
            name: name.into(),
            datatype,
            ..Self::default()
        }
    }

    /// Sets the column as nullable.
    #[must_use]
    pub fn nullable(mut self) -> Self {
        self.nullable = true;
        self
    }

    /// Sets the column as unsigned.
    #[must_use]
    pub fn unsigned(mut self) -> Self {
        self.unsigned = true;
        self
    }

    /// Sets the column as (part of) the primary key.
    #[must_use]
    pub fn primary_key(mut self) -> Self {
        self.primary_key = true;
        self
    }

    /// Sets the column to auto-increment.
    #[must_use]
    pub fn auto_increment(mut self) -> Self {
        self.auto_increment = true;
        self
    }

    /// Sets the default value literal.
    #[must_use]
    pub fn default_value(mut self, value: impl Into<String>) -> Self {
        self.default = Some(value.into());
        self
    }

    /// Sets the size.
    #[must_use]
    pub fn scale(mut self, scale: u32) -> Self {
        self.scale = scale;
        self
    }

    /// Sets the decimal digits.
    #[must_use]
    pub fn precision(mut self, precision: u32) -> Self {
        self.precision = precision;
        self
    }

    /// Overrides the name used in generated code.
    #[must_use]
    pub fn display_name(mut self, name: impl Into<String>) -> Self {
        self.display_name = Some(name.into());
        self
    }

    /// Returns true when the column renders `AUTO_INCREMENT`.
    #[must_use]
    pub fn is_auto_increment(&self) -> bool {
        self.primary_key && self.auto_increment
    }

    /// UpperCamelCase name for generated code: the display name if set,
    /// otherwise the column name.
    #[must_use]
    pub fn exported_name(&self) -> String {
        self.display_name
            .as_deref()
            .unwrap_or(&self.name)
            .to_case(Case::Pascal)
    }

    /// Rust type of the generated field, `Option<..>` when nullable.
    #[must_use]
    pub fn rust_type(&self) -> String {
        let base = self.datatype.rust_type(self.unsigned);
        if self.nullable {
            format!("Option<{base}>")
        } else {
            base.to_string()
        }
    }
}

/// Schema definition for an index.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Index {
    /// Index name.
    pub name: String,
    /// Indexed columns, in index order.
    pub columns: Vec<String>,
    /// Whether this is a unique index.
    pub unique: bool,
}

impl Index {
    /// Creates a non-unique index.
    #[must_use]
    pub fn new<I, S>(name: impl Into<String>, columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            name: name.into(),
            columns: columns.into_iter().map(Into::into).collect(),
            unique: false,
        }
    }

    /// Sets the index as unique.
    #[must_use]
    pub fn unique(mut self) -> Self {
        self.unique = true;
        self
    }
}

/// Direction of a declared reference.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReferenceKind {
    /// The declaring table holds a foreign key toward the target.
    HasOne,
    /// The target table is the "many" side of the declaring table.
    HasMany,
}

/// A relationship declared on a table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reference {
    /// Direction.
    pub kind: ReferenceKind,
    /// Target table name.
    pub table: String,
    /// Explicit foreign-key column names, one per target primary-key column.
    #[serde(default)]
    pub column_names: Option<Vec<String>>,
}

impl Reference {
    /// Creates a has-one reference toward `table`.
    #[must_use]
    pub fn has_one(table: impl Into<String>) -> Self {
        Self {
            kind: ReferenceKind::HasOne,
            table: table.into(),
            column_names: None,
        }
    }

    /// Creates a has-many reference toward `table`.
    #[must_use]
    pub fn has_many(table: impl Into<String>) -> Self {
        Self {
            kind: ReferenceKind::HasMany,
            table: table.into(),
            column_names: None,
        }
    }

    /// Sets explicit foreign-key column names.
    #[must_use]
    pub fn columns<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.column_names = Some(names.into_iter().map(Into::into).collect());
        self
    }

    /// Returns true if the declaring table holds the foreign key.
    #[must_use]
    pub fn is_has_one(&self) -> bool {
        self.kind == ReferenceKind::HasOne
    }

    /// Returns the physical foreign-key column names for this reference,
    /// positionally matching `target`'s primary-key columns.
    ///
    /// `owner` is the declaring table, used for error reporting.
    pub fn column_names(&self, owner: &str, target: &Table) -> Result<Vec<String>> {
        let pk = target.primary_key_names();
        match &self.column_names {
            Some(names) if names.len() != pk.len() => Err(GenError::ColumnCountMismatch {
                table: owner.to_string(),
                foreign_table: target.name.clone(),
                expected: pk.len(),
                found: names.len(),
            }),
            Some(names) => Ok(names.clone()),
            None => Ok(pk
                .iter()
                .map(|col| format!("{FOREIGN_KEY_PREFIX}{}_{col}", target.name))
                .collect()),
        }
    }
}

/// How a table's primary key is captured after an insert.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PrimaryKeyShape {
    /// No primary key.
    None,
    /// One key column supplied by the caller.
    Single,
    /// One auto-increment key column, read back from the insert.
    SingleAutoIncrement,
    /// A composite key of the given width.
    Composite(usize),
}

/// Schema definition for a table.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Table {
    /// Table name.
    pub name: String,
    /// Columns, in declaration order.
    pub columns: Vec<Column>,
    /// Index definitions.
    pub indexes: Vec<Index>,
    /// Declared references.
    pub references: Vec<Reference>,
}

impl Table {
    /// Creates a new table schema.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Adds a column to the table.
    #[must_use]
    pub fn column(mut self, column: Column) -> Self {
        self.columns.push(column);
        self
    }

    /// Adds an index.
    #[must_use]
    pub fn index(mut self, index: Index) -> Self {
        self.indexes.push(index);
        self
    }

    /// Adds a reference.
    #[must_use]
    pub fn reference(mut self, reference: Reference) -> Self {
        self.references.push(reference);
        self
    }

    /// Gets a column by name.
    #[must_use]
    pub fn get_column(&self, name: &str) -> Option<&Column> {
        self.columns.iter().find(|c| c.name == name)
    }

    /// Gets an index by name.
    #[must_use]
    pub fn get_index(&self, name: &str) -> Option<&Index> {
        self.indexes.iter().find(|i| i.name == name)
    }

    /// Primary-key columns in declaration order.
    pub fn primary_key_columns(&self) -> impl Iterator<Item = &Column> {
        self.columns.iter().filter(|c| c.primary_key)
    }

    /// Primary-key column names in declaration order.
    #[must_use]
    pub fn primary_key_names(&self) -> Vec<&str> {
        self.primary_key_columns().map(|c| c.name.as_str()).collect()
    }

    /// Reports how the primary key is built, so generated insert code can
    /// pick a key capture strategy.
    #[must_use]
    pub fn primary_key_shape(&self) -> PrimaryKeyShape {
        let pk: Vec<&Column> = self.primary_key_columns().collect();
        match pk.as_slice() {
            [] => PrimaryKeyShape::None,
            [col] if col.auto_increment => PrimaryKeyShape::SingleAutoIncrement,
            [_] => PrimaryKeyShape::Single,
            cols => PrimaryKeyShape::Composite(cols.len()),
        }
    }

    /// Has-one references in declaration order.
    pub fn has_one(&self) -> impl Iterator<Item = &Reference> {
        self.references.iter().filter(|r| r.is_has_one())
    }

    /// UpperCamelCase table name for generated code.
    #[must_use]
    pub fn exported_name(&self) -> String {
        self.name.to_case(Case::Pascal)
    }

    /// Name of the module the table's query builder is generated into.
    #[must_use]
    pub fn query_module_name(&self) -> String {
        self.name.replace('_', "").to_lowercase()
    }
}

/// The complete database schema (all tables).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Database {
    /// All tables, in declaration order.
    pub tables: Vec<Table>,
}

impl Database {
    /// Creates a new empty database schema.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a table to the schema.
    #[must_use]
    pub fn table(mut self, table: Table) -> Self {
        self.tables.push(table);
        self
    }

    /// Gets a table by name.
    #[must_use]
    pub fn get_table(&self, name: &str) -> Option<&Table> {
        self.tables.iter().find(|t| t.name == name)
    }

    /// Returns table names.
    pub fn table_names(&self) -> impl Iterator<Item = &str> {
        self.tables.iter().map(|t| t.name.as_str())
    }

    /// Parses a schema from JSON.
    pub fn from_json_str(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Reads a schema from a JSON file.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json_str(&json)
    }
}
