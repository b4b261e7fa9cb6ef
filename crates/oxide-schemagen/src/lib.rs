//! Schema-driven DDL and model generation.
//!
//! `oxide-schemagen` takes a declarative description of a relational schema
//! and derives from it everything a code generator needs:
//!
//! - **Dialect** - MySQL/MariaDB DDL for tables, columns and indexes
//! - **Resolver** - flattened field lists with has-one and has-many
//!   relationships expanded into foreign-key fields
//! - **Query** - the filter operations each field supports
//! - **Migration** - the statements that bring an existing schema up to date
//!
//! # Example
//!
//! ```rust
//! use oxide_schemagen::prelude::*;
//!
//! let db = Database::new()
//!     .table(
//!         Table::new("users")
//!             .column(Column::new("id", Datatype::Integer).primary_key().auto_increment())
//!             .column(Column::new("email", Datatype::Varchar).scale(255)),
//!     )
//!     .table(
//!         Table::new("posts")
//!             .column(Column::new("id", Datatype::Integer).primary_key().auto_increment())
//!             .reference(Reference::has_one("users")),
//!     );
//!
//! let resolver = Resolver::new(&db);
//! let fields = resolver.resolve(&db.tables[1]).unwrap();
//! assert_eq!(fields[1].name, "UsersId");
//! assert_eq!(fields[1].column, "fk_users_id");
//!
//! let plans = MigrationPlanner::new(Dialect::MySql.ddl()).plan(&db, &Database::new());
//! assert!(plans[0].statements.as_ref().unwrap()[0].starts_with("CREATE TABLE `users`"));
//! ```
//!
//! # CLI Usage
//!
//! ```bash
//! # Full DDL for a schema
//! oxide-schemagen --schema schema.json ddl
//!
//! # Statements needed to migrate an existing schema
//! oxide-schemagen --schema schema.json --dialect mariadb migrate --current live.json
//!
//! # Flattened fields and query operations as JSON
//! oxide-schemagen --schema schema.json fields
//! oxide-schemagen --schema schema.json queries
//! ```

pub mod datatype;
pub mod dialect;
pub mod error;
pub mod migration;
pub mod query;
pub mod resolver;
pub mod schema;

/// Prelude for convenient imports.
pub mod prelude {
    pub use crate::datatype::{Category, Datatype};
    pub use crate::dialect::{DdlDialect, Dialect, MariaDbDialect, MysqlDialect};
    pub use crate::error::{GenError, Result};
    pub use crate::migration::{MigrationPlanner, TablePlan};
    pub use crate::query::{
        Capability, FieldQuery, Operation, OperationSpec, TableQuery, ValueRule, operations_for,
    };
    pub use crate::resolver::{Field, FieldOrigin, Resolver};
    pub use crate::schema::{
        Column, Database, Index, PrimaryKeyShape, Reference, ReferenceKind, Table,
    };
}
