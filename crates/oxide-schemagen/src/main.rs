//! oxide-schemagen CLI
//!
//! Command-line tool for generating DDL and model descriptions from a schema.

use std::path::PathBuf;

use anyhow::{Context, bail};
use clap::{Parser, Subcommand};
use serde_json::json;
use tracing::{Level, error, info};
use tracing_subscriber::FmtSubscriber;

use oxide_schemagen::prelude::*;

/// Schema-driven DDL and model generation.
#[derive(Parser)]
#[command(name = "oxide-schemagen")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// JSON schema file.
    #[arg(short, long, env = "SCHEMAGEN_SCHEMA")]
    schema: PathBuf,

    /// SQL dialect to generate.
    #[arg(short, long, env = "SCHEMAGEN_DIALECT", value_enum, default_value_t = Dialect::MySql)]
    dialect: Dialect,

    /// Enable verbose output.
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the DDL creating every table.
    Ddl,

    /// Print the statements migrating an existing schema.
    Migrate {
        /// JSON file describing the current schema.
        #[arg(short, long)]
        current: PathBuf,
    },

    /// Print the flattened fields of every table as JSON.
    Fields,

    /// Print the query model of every table as JSON.
    Queries,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let log_level = if cli.verbose {
        Level::DEBUG
    } else {
        Level::INFO
    };
    let subscriber = FmtSubscriber::builder()
        .with_max_level(log_level)
        .with_writer(std::io::stderr)
        .with_target(false)
        .without_time()
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let db = Database::from_json_file(&cli.schema)
        .with_context(|| format!("loading schema {}", cli.schema.display()))?;
    info!(
        "Loaded {} tables from {}",
        db.tables.len(),
        cli.schema.display()
    );

    let failed = match cli.command {
        Commands::Ddl => print_plans(&db, &Database::new(), cli.dialect),

        Commands::Migrate { current } => {
            let current_db = Database::from_json_file(&current)
                .with_context(|| format!("loading current schema {}", current.display()))?;
            print_plans(&db, &current_db, cli.dialect)
        }

        Commands::Fields => {
            let resolver = Resolver::new(&db);
            let mut out = Vec::new();
            let mut failed = 0;
            for (table, fields) in resolver.resolve_all() {
                match fields {
                    Ok(fields) => out.push(json!({ "table": table, "fields": fields })),
                    Err(e) => {
                        error!("Table {}: {}", table, e);
                        failed += 1;
                    }
                }
            }
            println!("{}", serde_json::to_string_pretty(&out)?);
            failed
        }

        Commands::Queries => {
            let resolver = Resolver::new(&db);
            let mut out = Vec::new();
            let mut failed = 0;
            for table in &db.tables {
                match TableQuery::build(&resolver, table) {
                    Ok(query) => out.push(query),
                    Err(e) => {
                        error!("Table {}: {}", table.name, e);
                        failed += 1;
                    }
                }
            }
            println!("{}", serde_json::to_string_pretty(&out)?);
            failed
        }
    };

    if failed > 0 {
        bail!("{failed} table(s) failed");
    }
    Ok(())
}

/// Prints every successfully planned statement and returns the failure count.
fn print_plans(desired: &Database, current: &Database, dialect: Dialect) -> usize {
    let plans = MigrationPlanner::new(dialect.ddl()).plan(desired, current);
    let mut failed = 0;
    for plan in plans {
        match plan.statements {
            Ok(statements) if statements.is_empty() => {
                info!("Table {} is up to date.", plan.table);
            }
            Ok(statements) => {
                for sql in statements {
                    println!("{sql}\n");
                }
            }
            Err(e) => {
                error!("Table {}: {}", plan.table, e);
                failed += 1;
            }
        }
    }
    failed
}
