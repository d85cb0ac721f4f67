// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! # xtask - Project Automation
//!
//! Runs the lint and test steps CI runs with one command, plus a
//! migration check for the scheduler schema.
//!
//! ### Migration Verification
//!
//! `cargo xtask verify-migrations` applies every migration to an in-memory
//! `SQLite` database, reverts them all, and applies them again. The schema
//! is introspected after each forward pass and must be identical both
//! times, must contain every table the persistence layer queries, and must
//! keep the apply ledger's `(account_id, idempotency_key)` uniqueness that
//! makes apply at-most-once.

#![deny(
    clippy::pedantic,
    //clippy::cargo,
    clippy::nursery,
    clippy::style,
    clippy::correctness,
    clippy::all
)]

use std::collections::{BTreeMap, BTreeSet};
use std::{io, process::Output};

use clap::{Parser, Subcommand};
use clap_verbosity_flag::{InfoLevel, Verbosity};
use color_eyre::{
    Result,
    eyre::{Context, eyre},
};
use diesel::sql_types::{Integer, Text};
use diesel::{Connection, QueryableByName, RunQueryDsl, SqliteConnection};
use diesel_migrations::{EmbeddedMigrations, MigrationHarness, embed_migrations};
use duct::cmd;
use tracing::level_filters::LevelFilter;
use tracing_log::AsTrace;

const MIGRATIONS: EmbeddedMigrations = embed_migrations!("../crates/persistence/migrations");

/// Tables the persistence layer reads or writes.
const EXPECTED_TABLES: &[&str] = &[
    "accounts",
    "apply_ledger",
    "field_availability_rules",
    "field_exclusion_dates",
    "fields",
    "game_umpires",
    "games",
    "league_seasons",
    "season_exclusions",
    "season_league_selections",
    "season_scheduler_config",
    "seasons",
    "team_exclusions",
    "teams",
    "umpire_exclusions",
    "umpires",
];

fn main() -> Result<()> {
    color_eyre::install()?;
    let args = Args::parse();
    tracing_subscriber::fmt()
        .with_max_level(args.log_level())
        .without_time()
        .init();

    match args.run() {
        Ok(()) => (),
        Err(err) => {
            tracing::error!("{err}");
            std::process::exit(1);
        }
    }
    Ok(())
}

#[derive(Debug, Parser)]
#[command(bin_name = "cargo xtask", styles = clap_cargo::style::CLAP_STYLING)]
struct Args {
    #[command(subcommand)]
    command: Command,

    #[command(flatten)]
    verbosity: Verbosity<InfoLevel>,
}

impl Args {
    fn run(self) -> Result<()> {
        self.command.run()
    }

    fn log_level(&self) -> LevelFilter {
        self.verbosity.log_level_filter().as_trace()
    }
}

#[derive(Clone, Debug, Subcommand)]
enum Command {
    /// Run CI checks (lint, test, migrations)
    CI,

    /// Run clippy and check formatting
    #[command(visible_alias = "l")]
    Lint,

    /// Run every test target
    #[command(visible_alias = "t")]
    Test,

    /// Verify migrations apply, revert, and re-apply to the same schema
    #[command(visible_alias = "vm")]
    VerifyMigrations,
}

impl Command {
    fn run(self) -> Result<()> {
        match self {
            Self::CI => ci(),
            Self::Lint => lint(),
            Self::Test => test(),
            Self::VerifyMigrations => verify_migrations(),
        }
    }
}

/// Run CI checks (lint, test, migrations)
fn ci() -> Result<()> {
    lint()?;
    test()?;
    verify_migrations()?;
    Ok(())
}

/// Run clippy with warnings denied, then check formatting
fn lint() -> Result<()> {
    cmd("cargo", ["clippy", "--all-targets", "--", "-D", "warnings"]).run_with_trace()?;
    cmd("cargo", ["fmt", "--all", "--check"]).run_with_trace()?;
    Ok(())
}

/// Run every test target in the workspace
fn test() -> Result<()> {
    cmd("cargo", ["test", "--all-targets"]).run_with_trace()?;
    Ok(())
}

/// Verify the migration set round-trips cleanly.
///
/// Runs entirely in memory; no external database is needed.
///
/// ## Checks
///
/// 1. Every migration applies with foreign keys enforced
/// 2. The schema contains every table the persistence layer uses
/// 3. `apply_ledger` is unique on `(account_id, idempotency_key)`
/// 4. Every foreign key points at a table in the schema
/// 5. Reverting every migration leaves no tables behind
/// 6. Re-applying produces exactly the first schema
fn verify_migrations() -> Result<()> {
    tracing::info!("Starting migration verification");

    let mut conn: SqliteConnection = SqliteConnection::establish(":memory:")
        .wrap_err("Failed to create SQLite in-memory database")?;

    diesel::sql_query("PRAGMA foreign_keys = ON")
        .execute(&mut conn)
        .wrap_err("Failed to enable foreign keys on SQLite")?;

    let applied = conn
        .run_pending_migrations(MIGRATIONS)
        .map_err(|e| eyre!("Failed to apply migrations: {e}"))?;
    tracing::info!("Applied {} migration(s)", applied.len());

    let first: Schema = introspect_sqlite_schema(&mut conn)?;
    check_expected_tables(&first)?;
    check_ledger_uniqueness(&first)?;
    check_foreign_key_targets(&first)?;

    let reverted = conn
        .revert_all_migrations(MIGRATIONS)
        .map_err(|e| eyre!("Failed to revert migrations: {e}"))?;
    tracing::info!("Reverted {} migration(s)", reverted.len());

    let empty: Schema = introspect_sqlite_schema(&mut conn)?;
    if !empty.tables.is_empty() {
        let leftover: Vec<&String> = empty.tables.keys().collect();
        return Err(eyre!("Tables left behind after revert: {leftover:?}"));
    }

    conn.run_pending_migrations(MIGRATIONS)
        .map_err(|e| eyre!("Failed to re-apply migrations: {e}"))?;

    let second: Schema = introspect_sqlite_schema(&mut conn)?;
    if first != second {
        for (name, table) in &first.tables {
            if second.tables.get(name) != Some(table) {
                tracing::error!("Table {name} differs after re-apply");
            }
        }
        return Err(eyre!("Schema after re-apply does not match the first pass"));
    }

    tracing::info!("✓ Migration verification passed");
    Ok(())
}

fn check_expected_tables(schema: &Schema) -> Result<()> {
    let missing: Vec<&str> = EXPECTED_TABLES
        .iter()
        .copied()
        .filter(|name| !schema.tables.contains_key(*name))
        .collect();

    if !missing.is_empty() {
        return Err(eyre!("Missing tables: {missing:?}"));
    }

    for name in schema.tables.keys() {
        if !EXPECTED_TABLES.contains(&name.as_str()) {
            tracing::warn!("Table {name} is not used by the persistence layer");
        }
    }

    Ok(())
}

fn check_ledger_uniqueness(schema: &Schema) -> Result<()> {
    let ledger: &Table = schema
        .tables
        .get("apply_ledger")
        .ok_or_else(|| eyre!("apply_ledger table is missing"))?;

    let wanted: UniqueConstraint = UniqueConstraint {
        columns: vec![String::from("account_id"), String::from("idempotency_key")],
    };

    if !ledger.unique_constraints.contains(&wanted) {
        return Err(eyre!(
            "apply_ledger must be unique on (account_id, idempotency_key), found {:?}",
            ledger.unique_constraints
        ));
    }

    Ok(())
}

fn check_foreign_key_targets(schema: &Schema) -> Result<()> {
    for (name, table) in &schema.tables {
        for fk in &table.foreign_keys {
            let Some(target) = schema.tables.get(&fk.to_table) else {
                return Err(eyre!(
                    "{name}.{} references missing table {}",
                    fk.from_column,
                    fk.to_table
                ));
            };
            if !target.columns.contains_key(&fk.to_column) {
                return Err(eyre!(
                    "{name}.{} references missing column {}.{}",
                    fk.from_column,
                    fk.to_table,
                    fk.to_column
                ));
            }
        }
    }

    Ok(())
}

/// Normalized schema representation
#[derive(Debug, Clone, PartialEq, Eq)]
struct Schema {
    tables: BTreeMap<String, Table>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct Table {
    columns: BTreeMap<String, Column>,
    primary_keys: BTreeSet<String>,
    foreign_keys: BTreeSet<ForeignKey>,
    unique_constraints: BTreeSet<UniqueConstraint>,
    indexes: BTreeSet<Index>,
}

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
struct Column {
    normalized_type: String,
    nullable: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
struct ForeignKey {
    from_column: String,
    to_table: String,
    to_column: String,
}

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
struct UniqueConstraint {
    columns: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
struct Index {
    name: String,
    columns: Vec<String>,
}

#[derive(QueryableByName)]
struct TableName {
    #[diesel(sql_type = Text)]
    name: String,
}

#[derive(QueryableByName)]
struct ColumnInfo {
    #[diesel(sql_type = Text)]
    name: String,
    #[diesel(sql_type = Text)]
    r#type: String,
    #[diesel(sql_type = Integer)]
    notnull: i32,
    #[diesel(sql_type = Integer)]
    pk: i32,
}

#[derive(QueryableByName)]
struct ForeignKeyInfo {
    #[diesel(sql_type = Text)]
    table: String,
    #[diesel(sql_type = Text)]
    from: String,
    #[diesel(sql_type = Text)]
    to: String,
}

#[derive(QueryableByName)]
struct IndexInfo {
    #[diesel(sql_type = Text)]
    name: String,
    #[diesel(sql_type = Text)]
    origin: String,
}

#[derive(QueryableByName)]
struct IndexColumnInfo {
    #[diesel(sql_type = Text)]
    name: String,
}

/// Introspect the `SQLite` schema, ignoring diesel's bookkeeping table
fn introspect_sqlite_schema(conn: &mut SqliteConnection) -> Result<Schema> {
    let mut schema: Schema = Schema {
        tables: BTreeMap::new(),
    };

    let tables: Vec<TableName> = diesel::sql_query(
        "SELECT name FROM sqlite_master WHERE type='table' AND name NOT LIKE 'sqlite_%' \
         AND name != '__diesel_schema_migrations' ORDER BY name",
    )
    .load(conn)
    .wrap_err("Failed to query SQLite tables")?;

    for table in tables {
        let table_info: Table = introspect_table(conn, &table.name)?;
        schema.tables.insert(table.name, table_info);
    }

    Ok(schema)
}

fn introspect_table(conn: &mut SqliteConnection, name: &str) -> Result<Table> {
    let mut table_info: Table = Table {
        columns: BTreeMap::new(),
        primary_keys: BTreeSet::new(),
        foreign_keys: BTreeSet::new(),
        unique_constraints: BTreeSet::new(),
        indexes: BTreeSet::new(),
    };

    let columns: Vec<ColumnInfo> = diesel::sql_query(format!("PRAGMA table_info({name})"))
        .load(conn)
        .wrap_err(format!("Failed to get columns for table {name}"))?;

    for col in columns {
        table_info.columns.insert(
            col.name.clone(),
            Column {
                normalized_type: normalize_sqlite_type(&col.r#type),
                nullable: col.notnull == 0,
            },
        );

        if col.pk > 0 {
            table_info.primary_keys.insert(col.name);
        }
    }

    let fks: Vec<ForeignKeyInfo> = diesel::sql_query(format!("PRAGMA foreign_key_list({name})"))
        .load(conn)
        .wrap_err(format!("Failed to get foreign keys for table {name}"))?;

    for fk in fks {
        table_info.foreign_keys.insert(ForeignKey {
            from_column: fk.from,
            to_table: fk.table,
            to_column: fk.to,
        });
    }

    let indexes: Vec<IndexInfo> = diesel::sql_query(format!("PRAGMA index_list({name})"))
        .load(conn)
        .wrap_err(format!("Failed to get indexes for table {name}"))?;

    for idx in indexes {
        let index_columns: Vec<IndexColumnInfo> =
            diesel::sql_query(format!("PRAGMA index_info({})", idx.name))
                .load(conn)
                .wrap_err(format!("Failed to get index columns for {}", idx.name))?;

        let column_names: Vec<String> = index_columns.into_iter().map(|c| c.name).collect();

        // 'u' covers table-level UNIQUE, including sqlite_autoindex_*
        if idx.origin == "u" {
            table_info.unique_constraints.insert(UniqueConstraint {
                columns: column_names,
            });
        } else if idx.origin == "c" {
            table_info.indexes.insert(Index {
                name: idx.name,
                columns: column_names,
            });
        }
    }

    Ok(table_info)
}

/// Normalize `SQLite` declared types by affinity
fn normalize_sqlite_type(sqlite_type: &str) -> String {
    let normalized: String = sqlite_type.to_uppercase();
    let affinity: &str = if normalized.contains("INT") {
        "integer"
    } else if normalized.contains("REAL")
        || normalized.contains("FLOA")
        || normalized.contains("DOUB")
    {
        "real"
    } else if normalized.contains("BLOB") {
        "blob"
    } else if normalized.contains("BOOL") {
        "boolean"
    } else {
        "text"
    };
    affinity.to_string()
}

/// An extension trait for `duct::Expression` that logs the command being run
/// before running it.
trait ExpressionExt {
    /// Run the command and log the command being run
    fn run_with_trace(&self) -> io::Result<Output>;
}

impl ExpressionExt for duct::Expression {
    fn run_with_trace(&self) -> io::Result<Output> {
        tracing::info!("running command: {:?}", self);
        self.run().inspect_err(|_| {
            // The command that was run may have scrolled off the screen, so repeat it here
            tracing::error!("failed to run command: {:?}", self);
        })
    }
}
