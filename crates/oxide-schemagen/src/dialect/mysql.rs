//! MySQL dialect.

use super::{DdlDialect, lookup_type};
use crate::datatype::Datatype;
use crate::error::Result;

/// Physical type keywords. `Boolean` has no MySQL mapping.
pub(super) static MYSQL_TYPES: &[(Datatype, &str)] = &[
    (Datatype::TinyInt, "TINYINT"),
    (Datatype::SmallInt, "SMALLINT"),
    (Datatype::MediumInt, "MEDIUMINT"),
    (Datatype::Integer, "INT"),
    (Datatype::BigInt, "BIGINT"),
    (Datatype::Decimal, "DECIMAL"),
    (Datatype::Float, "FLOAT"),
    (Datatype::Double, "DOUBLE"),
    (Datatype::Char, "CHAR"),
    (Datatype::Varchar, "VARCHAR"),
    (Datatype::TinyText, "TINYTEXT"),
    (Datatype::Text, "TEXT"),
    (Datatype::MediumText, "MEDIUMTEXT"),
    (Datatype::LongText, "LONGTEXT"),
    (Datatype::Binary, "BINARY"),
    (Datatype::VarBinary, "VARBINARY"),
    (Datatype::TinyBlob, "TINYBLOB"),
    (Datatype::Blob, "BLOB"),
    (Datatype::MediumBlob, "MEDIUMBLOB"),
    (Datatype::LongBlob, "LONGBLOB"),
    (Datatype::Date, "DATE"),
    (Datatype::Time, "TIME"),
    (Datatype::DateTime, "DATETIME"),
    (Datatype::Timestamp, "TIMESTAMP"),
    (Datatype::Year, "YEAR"),
    (Datatype::Json, "JSON"),
];

/// MySQL DDL dialect.
#[derive(Debug, Clone, Copy, Default)]
pub struct MysqlDialect;

impl MysqlDialect {
    /// Creates a new MySQL dialect.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl DdlDialect for MysqlDialect {
    fn name(&self) -> &'static str {
        "mysql"
    }

    fn type_string(&self, datatype: Datatype) -> Result<&'static str> {
        lookup_type(self.name(), MYSQL_TYPES, datatype)
    }
}
