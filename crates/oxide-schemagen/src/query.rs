//! Query operation catalog.
//!
//! Decides which comparison operations the generated query builder offers for
//! a field, how each one is rendered, and what support code it needs.

use std::fmt;

use serde::Serialize;
use tracing::debug;

use crate::datatype::{Category, Datatype};
use crate::error::Result;
use crate::resolver::{Field, Resolver};
use crate::schema::Table;

/// A comparison operation offered by a generated query builder.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Operation {
    /// `=`
    Equals,
    /// `<>`
    Not,
    /// `LIKE %v%`
    Contains,
    /// `NOT LIKE %v%`
    ContainsNot,
    /// `LIKE v%`
    StartsWith,
    /// `NOT LIKE v%`
    StartsWithNot,
    /// `LIKE %v`
    EndsWith,
    /// `NOT LIKE %v`
    EndsWithNot,
    /// `>`
    GreaterThan,
    /// `>=`
    GreaterOrEqual,
    /// `<`
    LessThan,
    /// `<=`
    LessOrEqual,
    /// Strictly earlier.
    Before,
    /// Earlier or equal.
    BeforeOrEqual,
    /// Strictly later.
    After,
    /// Later or equal.
    AfterOrEqual,
    /// `IS NULL`
    IsNull,
    /// `IS NOT NULL`
    IsNotNull,
}

const TEMPORAL_OPERATIONS: &[Operation] = &[
    Operation::Equals,
    Operation::Not,
    Operation::Before,
    Operation::After,
    Operation::BeforeOrEqual,
    Operation::AfterOrEqual,
];

const NUMERIC_OPERATIONS: &[Operation] = &[
    Operation::Equals,
    Operation::Not,
    Operation::GreaterThan,
    Operation::LessThan,
    Operation::GreaterOrEqual,
    Operation::LessOrEqual,
];

const STRING_OPERATIONS: &[Operation] = &[
    Operation::Equals,
    Operation::Not,
    Operation::Contains,
    Operation::ContainsNot,
    Operation::StartsWith,
    Operation::StartsWithNot,
    Operation::EndsWith,
    Operation::EndsWithNot,
];

const BINARY_OPERATIONS: &[Operation] = &[Operation::Equals, Operation::Not];

const NULL_OPERATIONS: &[Operation] = &[Operation::IsNull, Operation::IsNotNull];

impl Operation {
    /// Returns the operation name.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Equals => "Equals",
            Self::Not => "Not",
            Self::Contains => "Contains",
            Self::ContainsNot => "ContainsNot",
            Self::StartsWith => "StartsWith",
            Self::StartsWithNot => "StartsWithNot",
            Self::EndsWith => "EndsWith",
            Self::EndsWithNot => "EndsWithNot",
            Self::GreaterThan => "GreaterThan",
            Self::GreaterOrEqual => "GreaterOrEqual",
            Self::LessThan => "LessThan",
            Self::LessOrEqual => "LessOrEqual",
            Self::Before => "Before",
            Self::BeforeOrEqual => "BeforeOrEqual",
            Self::After => "After",
            Self::AfterOrEqual => "AfterOrEqual",
            Self::IsNull => "IsNull",
            Self::IsNotNull => "IsNotNull",
        }
    }

    /// Returns the operator token the query builder compares with.
    #[must_use]
    pub const fn operator(self) -> &'static str {
        match self {
            Self::Contains | Self::StartsWith | Self::EndsWith => "Like",
            Self::ContainsNot | Self::StartsWithNot | Self::EndsWithNot => "NotLike",
            Self::Not => "NotEquals",
            other => other.name(),
        }
    }

    /// Returns how the bound value is rendered.
    #[must_use]
    pub const fn value_rule(self) -> ValueRule {
        match self {
            Self::Contains | Self::ContainsNot => ValueRule::Contains,
            Self::StartsWith | Self::StartsWithNot => ValueRule::Prefix,
            Self::EndsWith | Self::EndsWithNot => ValueRule::Suffix,
            Self::IsNull | Self::IsNotNull => ValueRule::Null,
            _ => ValueRule::Raw,
        }
    }

    /// Returns the support the generated code needs for this operation.
    #[must_use]
    pub const fn capability(self) -> Option<Capability> {
        match self {
            Self::Contains
            | Self::ContainsNot
            | Self::StartsWith
            | Self::StartsWithNot
            | Self::EndsWith
            | Self::EndsWithNot => Some(Capability::StringFormatting),
            Self::Before | Self::After | Self::BeforeOrEqual | Self::AfterOrEqual => {
                Some(Capability::TemporalComparison)
            }
            _ => None,
        }
    }

    /// Query-builder method name: `Equals` uses the bare field name.
    #[must_use]
    pub fn method_name(self, field: &str) -> String {
        match self {
            Self::Equals => field.to_string(),
            other => format!("{field}{}", other.name()),
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// How a bound value is turned into the compared value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ValueRule {
    /// The value as bound.
    Raw,
    /// `%value%`
    Contains,
    /// `value%`
    Prefix,
    /// `%value`
    Suffix,
    /// No value; compares against NULL.
    Null,
}

impl ValueRule {
    /// Renders `value`, or `None` when the operation binds no value.
    #[must_use]
    pub fn render(self, value: &str) -> Option<String> {
        match self {
            Self::Raw => Some(value.to_string()),
            Self::Contains => Some(format!("%{value}%")),
            Self::Prefix => Some(format!("{value}%")),
            Self::Suffix => Some(format!("%{value}")),
            Self::Null => None,
        }
    }
}

/// Support code an operation requires in the generated module.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Capability {
    /// Building LIKE patterns.
    StringFormatting,
    /// Comparing temporal values.
    TemporalComparison,
}

impl Capability {
    /// Snake-case name, also the sort key.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::StringFormatting => "string_formatting",
            Self::TemporalComparison => "temporal_comparison",
        }
    }
}

impl fmt::Display for Capability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Legal operations for a value of `datatype`, in catalog order.
#[must_use]
pub fn operations_for(datatype: Datatype, nullable: bool) -> Vec<Operation> {
    let base = match datatype.category() {
        Some(Category::Temporal) => TEMPORAL_OPERATIONS,
        Some(Category::Numeric) => NUMERIC_OPERATIONS,
        Some(Category::String) => STRING_OPERATIONS,
        Some(Category::Binary) => BINARY_OPERATIONS,
        None => &[],
    };

    let mut ops = base.to_vec();
    if nullable {
        ops.extend_from_slice(NULL_OPERATIONS);
    }
    ops
}

/// Capabilities required by `operations`, deduplicated and sorted by name.
pub fn required_capabilities(operations: impl IntoIterator<Item = Operation>) -> Vec<Capability> {
    let mut caps: Vec<Capability> = operations
        .into_iter()
        .filter_map(Operation::capability)
        .collect();
    caps.sort_by_key(|c| c.as_str());
    caps.dedup();
    caps
}

/// One operation with the metadata the emitter renders it from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OperationSpec {
    /// The operation.
    pub operation: Operation,
    /// Generated method name.
    pub method: String,
    /// Operator token.
    pub operator: &'static str,
    /// How the bound value is rendered.
    pub value_rule: ValueRule,
    /// Support code the method needs, if any.
    pub requires: Option<Capability>,
}

impl OperationSpec {
    fn new(operation: Operation, field: &str) -> Self {
        Self {
            operation,
            method: operation.method_name(field),
            operator: operation.operator(),
            value_rule: operation.value_rule(),
            requires: operation.capability(),
        }
    }
}

/// A field and its catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldQuery {
    /// The resolved field.
    pub field: Field,
    /// Operations offered on the field, in catalog order.
    pub operations: Vec<OperationSpec>,
}

impl FieldQuery {
    /// Catalogs the operations legal for `field`.
    #[must_use]
    pub fn new(field: Field) -> Self {
        let operations = operations_for(field.datatype, field.nullable)
            .into_iter()
            .map(|op| OperationSpec::new(op, &field.name))
            .collect();
        Self { field, operations }
    }

    /// Capabilities required by this field's operations.
    #[must_use]
    pub fn capabilities(&self) -> Vec<Capability> {
        required_capabilities(self.operations.iter().map(|o| o.operation))
    }
}

/// The query-builder model of one table.
///
/// Covers the table's physical columns: its own columns and the foreign keys
/// of its has-one references.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TableQuery {
    /// Table name.
    pub table: String,
    /// Module the query builder is generated into.
    pub module: String,
    /// Queryable fields, own columns first.
    pub fields: Vec<FieldQuery>,
    /// Union of the fields' capabilities, sorted by name.
    pub capabilities: Vec<Capability>,
}

impl TableQuery {
    /// Builds the query model for `table`.
    pub fn build(resolver: &Resolver<'_>, table: &Table) -> Result<Self> {
        let mut fields: Vec<FieldQuery> = table
            .columns
            .iter()
            .map(|c| FieldQuery::new(Field::own(c)))
            .collect();
        fields.extend(
            resolver
                .has_one_fields(table)?
                .into_iter()
                .map(FieldQuery::new),
        );

        let mut capabilities: Vec<Capability> =
            fields.iter().flat_map(FieldQuery::capabilities).collect();
        capabilities.sort_by_key(|c| c.as_str());
        capabilities.dedup();

        debug!(table = %table.name, fields = fields.len(), ?capabilities, "built query model");

        Ok(Self {
            table: table.name.clone(),
            module: table.query_module_name(),
            fields,
            capabilities,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::GenError;
    use crate::schema::{Column, Database, Reference};

    #[test]
    fn test_base_operation_counts() {
        for dt in Datatype::ALL {
            let want = match dt.category() {
                Some(Category::Numeric | Category::Temporal) => 6,
                Some(Category::String) => 8,
                Some(Category::Binary) => 2,
                None => 0,
            };
            assert_eq!(operations_for(dt, false).len(), want, "{dt}");
            assert_eq!(operations_for(dt, true).len(), want + 2, "{dt}");
        }
    }

    #[test]
    fn test_operation_order() {
        assert_eq!(
            operations_for(Datatype::DateTime, false),
            vec![
                Operation::Equals,
                Operation::Not,
                Operation::Before,
                Operation::After,
                Operation::BeforeOrEqual,
                Operation::AfterOrEqual,
            ]
        );
        assert_eq!(
            operations_for(Datatype::Boolean, true),
            vec![Operation::IsNull, Operation::IsNotNull]
        );
        let ops = operations_for(Datatype::Integer, true);
        assert_eq!(ops[ops.len() - 2..], [Operation::IsNull, Operation::IsNotNull]);
    }

    #[test]
    fn test_operators() {
        assert_eq!(Operation::Equals.operator(), "Equals");
        assert_eq!(Operation::Not.operator(), "NotEquals");
        assert_eq!(Operation::Contains.operator(), "Like");
        assert_eq!(Operation::StartsWith.operator(), "Like");
        assert_eq!(Operation::EndsWith.operator(), "Like");
        assert_eq!(Operation::ContainsNot.operator(), "NotLike");
        assert_eq!(Operation::StartsWithNot.operator(), "NotLike");
        assert_eq!(Operation::EndsWithNot.operator(), "NotLike");
        assert_eq!(Operation::GreaterOrEqual.operator(), "GreaterOrEqual");
        assert_eq!(Operation::IsNull.operator(), "IsNull");
    }

    #[test]
    fn test_value_rules() {
        assert_eq!(Operation::Equals.value_rule().render("v"), Some("v".to_string()));
        assert_eq!(Operation::LessThan.value_rule().render("v"), Some("v".to_string()));
        assert_eq!(Operation::Contains.value_rule().render("v"), Some("%v%".to_string()));
        assert_eq!(Operation::ContainsNot.value_rule().render("v"), Some("%v%".to_string()));
        assert_eq!(Operation::StartsWith.value_rule().render("v"), Some("v%".to_string()));
        assert_eq!(Operation::EndsWithNot.value_rule().render("v"), Some("%v".to_string()));
        assert_eq!(Operation::IsNotNull.value_rule().render("v"), None);
    }

    #[test]
    fn test_method_name() {
        assert_eq!(Operation::Equals.method_name("Title"), "Title");
        assert_eq!(Operation::StartsWithNot.method_name("Title"), "TitleStartsWithNot");
    }

    #[test]
    fn test_required_capabilities() {
        assert!(required_capabilities(operations_for(Datatype::Integer, true)).is_empty());
        assert_eq!(
            required_capabilities(operations_for(Datatype::Text, false)),
            vec![Capability::StringFormatting]
        );

        let mut ops = operations_for(Datatype::Date, false);
        ops.extend(operations_for(Datatype::Varchar, true));
        assert_eq!(
            required_capabilities(ops),
            vec![Capability::StringFormatting, Capability::TemporalComparison]
        );
    }

    #[test]
    fn test_table_query() {
        let db = Database::new()
            .table(
                Table::new("users")
                    .column(Column::new("id", Datatype::Integer).primary_key())
                    .column(Column::new("created_at", Datatype::Timestamp)),
            )
            .table(
                Table::new("blog_posts")
                    .column(Column::new("id", Datatype::Integer).primary_key())
                    .column(Column::new("title", Datatype::Varchar).nullable())
                    .reference(Reference::has_one("users")),
            );
        let resolver = Resolver::new(&db);

        let query = TableQuery::build(&resolver, db.get_table("blog_posts").unwrap()).unwrap();
        assert_eq!(query.module, "blogposts");
        let names: Vec<_> = query.fields.iter().map(|f| f.field.name.as_str()).collect();
        assert_eq!(names, vec!["Id", "Title", "UsersId"]);
        assert_eq!(query.fields[1].operations.len(), 10);
        assert_eq!(query.fields[1].operations[2].method, "TitleContains");
        assert_eq!(query.fields[2].field.column, "fk_users_id");
        assert_eq!(query.capabilities, vec![Capability::StringFormatting]);

        // The has-many side gets no query fields for its dependents.
        let users = TableQuery::build(&resolver, db.get_table("users").unwrap()).unwrap();
        assert_eq!(users.fields.len(), 2);
        assert_eq!(users.capabilities, vec![Capability::TemporalComparison]);
    }

    #[test]
    fn test_table_capabilities_merge_field_capabilities() {
        let table = Table::new("events")
            .column(Column::new("id", Datatype::Integer).primary_key())
            .column(Column::new("starts_at", Datatype::DateTime))
            .column(Column::new("label", Datatype::Varchar).nullable())
            .column(Column::new("ends_at", Datatype::DateTime).nullable());
        let db = Database::new().table(table);
        let resolver = Resolver::new(&db);
        let query = TableQuery::build(&resolver, &db.tables[0]).unwrap();

        let per_field: Vec<Vec<Capability>> =
            query.fields.iter().map(FieldQuery::capabilities).collect();
        assert_eq!(
            per_field,
            vec![
                vec![],
                vec![Capability::TemporalComparison],
                vec![Capability::StringFormatting],
                vec![Capability::TemporalComparison],
            ]
        );
        assert_eq!(
            query.capabilities,
            vec![Capability::StringFormatting, Capability::TemporalComparison]
        );
    }

    #[test]
    fn test_table_query_missing_foreign_table() {
        let db = Database::new().table(Table::new("posts").reference(Reference::has_one("nope")));
        let resolver = Resolver::new(&db);
        let err = TableQuery::build(&resolver, &db.tables[0]).unwrap_err();
        assert!(matches!(err, GenError::MissingForeignTable { .. }));
    }
}
