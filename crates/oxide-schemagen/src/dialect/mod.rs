//! Database dialect implementations.
//!
//! Each dialect supplies its own datatype table; statement shapes are shared
//! through the provided methods of [`DdlDialect`].

mod mariadb;
mod mysql;

pub use mariadb::MariaDbDialect;
pub use mysql::MysqlDialect;

use serde::{Deserialize, Serialize};

use crate::datatype::Datatype;
use crate::error::{GenError, Result};
use crate::schema::{Column, Index, Table};

/// Indentation of column clauses inside `CREATE TABLE`.
pub const INDENT: &str = "    ";

/// Built-in dialect selector.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum Dialect {
    /// MySQL 5.7+.
    #[default]
    #[value(name = "mysql")]
    MySql,
    /// MariaDB 10.2+.
    #[value(name = "mariadb")]
    MariaDb,
}

impl Dialect {
    /// Returns the DDL synthesizer for this dialect.
    #[must_use]
    pub fn ddl(self) -> &'static dyn DdlDialect {
        match self {
            Self::MySql => &MysqlDialect,
            Self::MariaDb => &MariaDbDialect,
        }
    }
}

/// Trait for database-specific DDL generation.
pub trait DdlDialect: Send + Sync {
    /// Returns the dialect name.
    fn name(&self) -> &'static str;

    /// Returns the physical type keyword for `datatype`.
    fn type_string(&self, datatype: Datatype) -> Result<&'static str>;

    /// Quote an identifier (table name, column name, etc.).
    fn quote_identifier(&self, name: &str) -> String {
        format!("`{}`", name.replace('`', "``"))
    }

    /// Generates the clause describing one column.
    ///
    /// Never fails: an unmapped datatype renders without a type keyword.
    fn column_definition(&self, name: &str, column: &Column) -> String {
        let mut parts = vec![self.quote_identifier(name)];

        let type_token = format!(
            "{}{}",
            self.type_string(column.datatype).unwrap_or_default(),
            size_suffix(column)
        );
        if !type_token.is_empty() {
            parts.push(type_token);
        }

        if column.datatype.is_numeric() {
            parts.push(if column.unsigned { "UNSIGNED" } else { "SIGNED" }.to_string());
        }

        match (&column.default, column.nullable) {
            (Some(value), _) => {
                parts.push(format!("DEFAULT {}", render_default(column.datatype, value)));
            }
            (None, true) => parts.push("DEFAULT NULL".to_string()),
            (None, false) => {}
        }

        parts.push(if column.nullable { "NULL" } else { "NOT NULL" }.to_string());

        if column.is_auto_increment() {
            parts.push("AUTO_INCREMENT".to_string());
        }

        parts.join(" ")
    }

    /// Generates SQL for creating a table.
    ///
    /// The primary-key clause follows the last column without a comma.
    fn create_table(&self, name: &str, table: &Table) -> String {
        let col_defs: Vec<String> = table
            .columns
            .iter()
            .map(|c| format!("{INDENT}{}", self.column_definition(&c.name, c)))
            .collect();

        let mut sql = format!("CREATE TABLE {} (\n", self.quote_identifier(name));
        sql.push_str(&col_defs.join(",\n"));

        let pk = table.primary_key_names();
        if !pk.is_empty() {
            sql.push('\n');
            sql.push_str(INDENT);
            sql.push_str("PRIMARY KEY (");
            sql.push_str(&quote_list(self, &pk));
            sql.push(')');
        }

        sql.push_str("\n);");
        sql
    }

    /// Generates SQL for adding a column.
    fn add_column(&self, table: &str, name: &str, column: &Column) -> String {
        format!(
            "ALTER TABLE {} ADD COLUMN {};",
            self.quote_identifier(table),
            self.column_definition(name, column)
        )
    }

    /// Generates SQL for adding an index.
    fn add_index(&self, table: &str, name: &str, index: &Index) -> String {
        format!(
            "ALTER TABLE {} ADD {}INDEX {} ({});",
            self.quote_identifier(table),
            if index.unique { "UNIQUE " } else { "" },
            self.quote_identifier(name),
            quote_list(self, &index.columns)
        )
    }
}

/// Quotes and comma-joins identifiers.
fn quote_list<D: DdlDialect + ?Sized>(dialect: &D, names: &[impl AsRef<str>]) -> String {
    names
        .iter()
        .map(|n| dialect.quote_identifier(n.as_ref()))
        .collect::<Vec<_>>()
        .join(", ")
}

/// Looks `datatype` up in a dialect's static type table.
fn lookup_type(
    dialect: &'static str,
    types: &[(Datatype, &'static str)],
    datatype: Datatype,
) -> Result<&'static str> {
    if datatype.is_invalid() {
        return Err(GenError::InvalidDatatype);
    }
    types
        .iter()
        .find(|(dt, _)| *dt == datatype)
        .map(|(_, token)| *token)
        .ok_or(GenError::UnsupportedDatatype { dialect, datatype })
}

/// `(scale, precision)`, `(scale)` or nothing.
fn size_suffix(column: &Column) -> String {
    match (column.scale, column.precision) {
        (0, 0) => String::new(),
        (scale, 0) => format!("({scale})"),
        (scale, precision) => format!("({scale}, {precision})"),
    }
}

/// Defaults on temporal columns that the server evaluates instead of parsing.
const TEMPORAL_DEFAULT_FUNCTIONS: &[&str] = &[
    "CURRENT_TIMESTAMP",
    "CURRENT_DATE",
    "CURRENT_TIME",
    "LOCALTIME",
    "LOCALTIMESTAMP",
    "NOW",
];

/// Numeric defaults and temporal functions are literal; everything else is
/// a double-quoted string.
fn render_default(datatype: Datatype, value: &str) -> String {
    if datatype.is_numeric() || (datatype.is_time() && is_temporal_function(value)) {
        value.to_string()
    } else {
        format!("\"{}\"", value.replace('"', "\\\""))
    }
}

/// `CURRENT_TIMESTAMP`, `CURRENT_TIMESTAMP(3)`, `now()` and the like.
fn is_temporal_function(value: &str) -> bool {
    let name = value.split('(').next().unwrap_or_default().trim();
    TEMPORAL_DEFAULT_FUNCTIONS
        .iter()
        .any(|f| f.eq_ignore_ascii_case(name))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_type_string_is_total() {
        for dialect in [Dialect::MySql, Dialect::MariaDb] {
            let ddl = dialect.ddl();
            for dt in Datatype::ALL {
                match ddl.type_string(dt) {
                    Ok(token) => assert!(!token.is_empty(), "{} {dt}", ddl.name()),
                    Err(GenError::UnsupportedDatatype { datatype, .. }) => {
                        assert_eq!(datatype, dt);
                    }
                    Err(e) => panic!("unexpected error for {dt}: {e}"),
                }
            }
            assert!(matches!(
                ddl.type_string(Datatype::Invalid),
                Err(GenError::InvalidDatatype)
            ));
        }
    }

    #[test]
    fn test_size_suffix() {
        let col = Column::new("c", Datatype::Decimal);
        assert_eq!(size_suffix(&col), "");
        assert_eq!(size_suffix(&col.clone().scale(64)), "(64)");
        assert_eq!(size_suffix(&col.clone().scale(6).precision(4)), "(6, 4)");
        assert_eq!(size_suffix(&col.precision(2)), "(0, 2)");
    }

    #[test]
    fn test_render_default() {
        assert_eq!(render_default(Datatype::Integer, "1"), "1");
        assert_eq!(render_default(Datatype::Text, "blah"), "\"blah\"");
        assert_eq!(render_default(Datatype::Date, "2020-01-01"), "\"2020-01-01\"");
        assert_eq!(render_default(Datatype::Varchar, "say \"hi\""), "\"say \\\"hi\\\"\"");    }

    #[test]
    fn test_render_temporal_function_default() {
        assert_eq!(
            render_default(Datatype::Timestamp, "CURRENT_TIMESTAMP"),
            "CURRENT_TIMESTAMP"
        );
        assert_eq!(
            render_default(Datatype::DateTime, "current_timestamp(3)"),
            "current_timestamp(3)"
        );
        assert_eq!(render_default(Datatype::Date, "NOW()"), "NOW()");
        assert_eq!(
            render_default(Datatype::Varchar, "CURRENT_TIMESTAMP"),
            "\"CURRENT_TIMESTAMP\""
        );

        let col =
            Column::new("created_at", Datatype::Timestamp).default_value("CURRENT_TIMESTAMP");
        assert_eq!(
            Dialect::MySql.ddl().column_definition("created_at", &col),
            "`created_at` TIMESTAMP DEFAULT CURRENT_TIMESTAMP NOT NULL"
        );
    }

    #[test]
    fn test_dialect_selector() {
        assert_eq!(Dialect::default().ddl().name(), "mysql");
        assert_eq!(Dialect::MariaDb.ddl().name(), "mariadb");
        let d: Dialect = serde_json::from_str("\"mariadb\"").unwrap();
        assert_eq!(d, Dialect::MariaDb);
    }
}
