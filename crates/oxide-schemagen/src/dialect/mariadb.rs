//! MariaDB dialect.
//!
//! Statement syntax is identical to MySQL. The type table extends MySQL's
//! with a native `BOOLEAN`.

use super::mysql::MYSQL_TYPES;
use super::{DdlDialect, lookup_type};
use crate::datatype::Datatype;
use crate::error::{GenError, Result};

static MARIADB_TYPES: &[(Datatype, &str)] = &[(Datatype::Boolean, "BOOLEAN")];

/// MariaDB DDL dialect.
#[derive(Debug, Clone, Copy, Default)]
pub struct MariaDbDialect;

impl MariaDbDialect {
    /// Creates a new MariaDB dialect.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl DdlDialect for MariaDbDialect {
    fn name(&self) -> &'static str {
        "mariadb"
    }

    fn type_string(&self, datatype: Datatype) -> Result<&'static str> {
        match lookup_type(self.name(), MARIADB_TYPES, datatype) {
            Err(GenError::UnsupportedDatatype { .. }) => {
                lookup_type(self.name(), MYSQL_TYPES, datatype)
            }
            other => other,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::Column;

    #[test]
    fn test_type_string() {
        let d = MariaDbDialect::new();
        assert_eq!(d.type_string(Datatype::Boolean).unwrap(), "BOOLEAN");
        assert_eq!(d.type_string(Datatype::Integer).unwrap(), "INT");
        assert!(matches!(
            d.type_string(Datatype::Invalid),
            Err(GenError::InvalidDatatype)
        ));
    }

    #[test]
    fn test_boolean_column() {
        let col = Column::new("active", Datatype::Boolean).default_value("1");
        assert_eq!(
            MariaDbDialect::new().column_definition("active", &col),
            "`active` BOOLEAN DEFAULT \"1\" NOT NULL"
        );
    }
}
