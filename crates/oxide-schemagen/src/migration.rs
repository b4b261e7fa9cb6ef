//! Migration planning.
//!
//! Compares a desired schema against the current one and produces the DDL
//! statements that bring the current schema up to date: `CREATE TABLE` for
//! missing tables, `ADD COLUMN` for missing columns and `ADD INDEX` for
//! missing indexes. Has-one references contribute their foreign-key columns.
//!
//! Nothing is ever dropped or altered. Each table is planned on its own and
//! either yields all of its statements or an error.

use std::collections::HashSet;

use tracing::debug;

use crate::dialect::DdlDialect;
use crate::error::Result;
use crate::resolver::Resolver;
use crate::schema::{Database, Table};

/// Statements planned for one table.
#[derive(Debug)]
pub struct TablePlan {
    /// Table name.
    pub table: String,
    /// The table's statements, or why it could not be planned.
    pub statements: Result<Vec<String>>,
}

/// Plans DDL for a dialect.
pub struct MigrationPlanner<'d> {
    dialect: &'d dyn DdlDialect,
}

impl<'d> MigrationPlanner<'d> {
    /// Creates a planner rendering with `dialect`.
    #[must_use]
    pub fn new(dialect: &'d dyn DdlDialect) -> Self {
        Self { dialect }
    }

    /// Plans every table of `desired`, in declaration order.
    #[must_use]
    pub fn plan(&self, desired: &Database, current: &Database) -> Vec<TablePlan> {
        let resolver = Resolver::new(desired);
        desired
            .tables
            .iter()
            .map(|table| TablePlan {
                table: table.name.clone(),
                statements: self.plan_table(&resolver, table, current.get_table(&table.name)),
            })
            .collect()
    }

    /// Plans a single table against its current definition, if any.
    pub fn plan_table(
        &self,
        resolver: &Resolver<'_>,
        table: &Table,
        current: Option<&Table>,
    ) -> Result<Vec<String>> {
        let physical = resolver.physical_table(table)?;
        for column in &physical.columns {
            self.dialect
                .type_string(column.datatype)
                .map_err(|e| e.in_column(&table.name, &column.name))?;
        }

        let mut statements = Vec::new();
        match current {
            None => {
                statements.push(self.dialect.create_table(&physical.name, &physical));
                for index in &physical.indexes {
                    statements.push(self.dialect.add_index(&physical.name, &index.name, index));
                }
            }
            Some(current) => {
                let existing_cols: HashSet<&str> =
                    current.columns.iter().map(|c| c.name.as_str()).collect();
                let existing_idx: HashSet<&str> =
                    current.indexes.iter().map(|i| i.name.as_str()).collect();

                for column in &physical.columns {
                    if !existing_cols.contains(column.name.as_str()) {
                        statements.push(self.dialect.add_column(
                            &physical.name,
                            &column.name,
                            column,
                        ));
                    }
                }
                for index in &physical.indexes {
                    if !existing_idx.contains(index.name.as_str()) {
                        statements.push(self.dialect.add_index(&physical.name, &index.name, index));
                    }
                }
            }
        }

        debug!(
            table = %table.name,
            dialect = self.dialect.name(),
            statements = statements.len(),
            "planned table"
        );
        Ok(statements)
    }
}
