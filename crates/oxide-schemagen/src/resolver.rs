//! Reference resolution.
//!
//! Expands the references declared in a [`Database`] into flattened field
//! lists: a table's own columns, then one field per primary-key column of
//! every table it has a has-one reference toward, then one field per
//! primary-key column of every table that references it (the has-many side).
//!
//! The inverse side is discovered once, when the [`Resolver`] is built, so
//! resolving a table never rescans the whole database.

use std::collections::HashMap;

use serde::Serialize;
use tracing::{debug, trace};

use crate::datatype::Datatype;
use crate::error::{GenError, Result};
use crate::schema::{Column, Database, Reference, Table};

/// Where a flattened field comes from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum FieldOrigin {
    /// A column declared on the table itself.
    Own,
    /// A primary-key column of the referenced table.
    HasOne {
        /// Referenced table.
        table: String,
    },
    /// A primary-key column of a table referencing this one.
    ///
    /// The field's `column` names that key column on the referencing table.
    /// This table's DDL gains no column for it.
    HasMany {
        /// Referencing table.
        table: String,
    },
}

/// A field of a generated entity or query model.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Field {
    /// Exported field name.
    pub name: String,
    /// Physical column name. For [`FieldOrigin::HasMany`] fields this is a
    /// column of the referencing table.
    pub column: String,
    /// Abstract datatype.
    pub datatype: Datatype,
    /// Whether a numeric value is unsigned.
    pub unsigned: bool,
    /// Whether the value may be NULL.
    pub nullable: bool,
    /// Rust type of the generated field.
    pub rust_type: String,
    /// Origin of the field.
    pub origin: FieldOrigin,
}

impl Field {
    fn new(name: String, physical: String, column: &Column, origin: FieldOrigin) -> Self {
        Self {
            name,
            column: physical,
            datatype: column.datatype,
            unsigned: column.unsigned,
            nullable: column.nullable,
            rust_type: column.rust_type(),
            origin,
        }
    }

    /// Field for a column declared on the table.
    #[must_use]
    pub fn own(column: &Column) -> Self {
        Self::new(
            column.exported_name(),
            column.name.clone(),
            column,
            FieldOrigin::Own,
        )
    }
}

/// Resolves references over an immutable database.
#[derive(Debug)]
pub struct Resolver<'a> {
    db: &'a Database,
    tables: HashMap<&'a str, &'a Table>,
    inverse: HashMap<&'a str, Vec<&'a Table>>,
}

impl<'a> Resolver<'a> {
    /// Indexes `db`: tables by name, and for every table the other tables
    /// that declare a reference toward it.
    #[must_use]
    pub fn new(db: &'a Database) -> Self {
        let mut tables = HashMap::with_capacity(db.tables.len());
        let mut inverse: HashMap<&'a str, Vec<&'a Table>> = HashMap::new();

        for table in &db.tables {
            tables.entry(table.name.as_str()).or_insert(table);

            for reference in &table.references {
                if reference.table == table.name {
                    continue;
                }
                let referencing = inverse.entry(reference.table.as_str()).or_default();
                if !referencing.iter().any(|t| t.name == table.name) {
                    referencing.push(table);
                }
            }
        }

        debug!(
            tables = tables.len(),
            referenced = inverse.len(),
            "indexed schema references"
        );

        Self {
            db,
            tables,
            inverse,
        }
    }

    /// Tables declaring a reference toward `table`, in database order.
    #[must_use]
    pub fn referencing_tables(&self, table: &str) -> &[&'a Table] {
        self.inverse.get(table).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Looks up the target of `reference` declared on `table`.
    pub fn foreign_table(&self, table: &Table, reference: &Reference) -> Result<&'a Table> {
        self.tables
            .get(reference.table.as_str())
            .copied()
            .ok_or_else(|| GenError::MissingForeignTable {
                table: table.name.clone(),
                foreign_table: reference.table.clone(),
            })
    }

    /// Resolves the full flattened field list of `table`.
    ///
    /// Fails as a whole if any has-one reference cannot be resolved.
    pub fn resolve(&self, table: &Table) -> Result<Vec<Field>> {
        let mut fields: Vec<Field> = table.columns.iter().map(Field::own).collect();
        fields.extend(self.has_one_fields(table)?);
        fields.extend(self.has_many_fields(table));

        debug!(table = %table.name, fields = fields.len(), "resolved fields");
        Ok(fields)
    }

    /// Resolves every table independently, in database order.
    #[must_use]
    pub fn resolve_all(&self) -> Vec<(&'a str, Result<Vec<Field>>)> {
        self.db
            .tables
            .iter()
            .map(|t| (t.name.as_str(), self.resolve(t)))
            .collect()
    }

    /// Fields derived from the has-one references of `table`.
    pub fn has_one_fields(&self, table: &Table) -> Result<Vec<Field>> {
        let mut fields = Vec::new();
        for reference in table.has_one() {
            let foreign = self.foreign_table(table, reference)?;
            let names = reference.column_names(&table.name, foreign)?;
            let prefix = foreign.exported_name();

            for (pk, physical) in foreign.primary_key_columns().zip(names) {
                trace!(
                    table = %table.name,
                    foreign = %foreign.name,
                    column = %physical,
                    "has-one field"
                );
                fields.push(Field::new(
                    format!("{prefix}{}", pk.exported_name()),
                    physical,
                    pk,
                    FieldOrigin::HasOne {
                        table: foreign.name.clone(),
                    },
                ));
            }
        }
        Ok(fields)
    }

    /// Fields derived from the tables referencing `table`.
    #[must_use]
    pub fn has_many_fields(&self, table: &Table) -> Vec<Field> {
        let mut fields = Vec::new();
        for referencing in self.referencing_tables(&table.name) {
            let prefix = referencing.exported_name();
            for pk in referencing.primary_key_columns() {
                trace!(
                    table = %table.name,
                    referencing = %referencing.name,
                    column = %pk.name,
                    "has-many field"
                );
                fields.push(Field::new(
                    format!("{prefix}{}", pk.exported_name()),
                    pk.name.clone(),
                    pk,
                    FieldOrigin::HasMany {
                        table: referencing.name.clone(),
                    },
                ));
            }
        }
        fields
    }

    /// Physical foreign-key columns the has-one references of `table` add to
    /// its DDL: copies of the target key columns under their foreign-key names.
    pub fn foreign_key_columns(&self, table: &Table) -> Result<Vec<Column>> {
        let mut columns = Vec::new();
        for reference in table.has_one() {
            let foreign = self.foreign_table(table, reference)?;
            let names = reference.column_names(&table.name, foreign)?;

            for (pk, name) in foreign.primary_key_columns().zip(names) {
                columns.push(Column {
                    name,
                    display_name: None,
                    primary_key: false,
                    auto_increment: false,
                    ..pk.clone()
                });
            }
        }
        Ok(columns)
    }

    /// `table` with its foreign-key columns appended, as it is created in the
    /// database.
    pub fn physical_table(&self, table: &Table) -> Result<Table> {
        let mut physical = table.clone();
        physical.columns.extend(self.foreign_key_columns(table)?);
        Ok(physical)
    }
}
