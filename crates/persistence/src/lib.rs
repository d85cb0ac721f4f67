// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Persistence layer for the league season scheduler.
//!
//! This crate stores the data the scheduler reads (seasons, leagues, teams,
//! fields, umpires, games, availability rules and exclusions), the
//! scheduler configuration of each season, and the apply ledger. It is
//! built on Diesel over `SQLite`.
//!
//! ## Ports
//!
//! `Persistence` implements the scheduler core's `TransactionalStore`.
//! Each apply runs inside one `BEGIN IMMEDIATE` transaction through a
//! [`SqliteUnit`], which implements the read, ledger and schedule-writer
//! ports over the transaction's connection.
//!
//! ## Databases
//!
//! - In-memory databases are uniquely named per instance, for tests
//! - File databases run in WAL mode
//! - Foreign key enforcement is verified at startup in both cases
//!
//! ## Testing Philosophy
//!
//! - Tests run against fresh in-memory databases
//! - Every test seeds exactly the rows it needs

#![deny(
    clippy::pedantic,
    clippy::cargo,
    clippy::nursery,
    clippy::style,
    clippy::correctness,
    clippy::all,
    clippy::suspicious,
    clippy::complexity,
    clippy::perf,
    clippy::unwrap_used,
    clippy::expect_used
)]
#![allow(clippy::multiple_crate_versions)]

use diesel::SqliteConnection;
use diesel::prelude::*;
use league_scheduler::{
    CoreError, GameRecord, LeagueSeasonRecord, LedgerEntry, SeasonRecord, effective_selections,
};
use league_scheduler_domain::{
    AccountId, Assignment, ExclusionWindow, Field, FieldAvailabilityRule, FieldExclusionDate,
    Game, GameId, IdempotencyKey, LeagueSeasonId, LeagueSelection, ProblemSpec, SeasonConfig,
    SeasonId, SpecFilters, Team, TeamExclusion, Umpire, UmpireExclusion, validate_season_config,
};
use std::path::Path;
use std::sync::atomic::{AtomicU64, Ordering};
use tracing::info;

mod backend;
mod data_models;
mod diesel_schema;
mod error;
mod mutations;
mod queries;
mod unit;

#[cfg(test)]
mod tests;

pub use error::PersistenceError;
pub use unit::SqliteUnit;

/// Atomic counter for generating unique in-memory database names.
///
/// Each call to `new_in_memory()` receives a unique sequential ID.
static DB_COUNTER: AtomicU64 = AtomicU64::new(0);

/// Persistence adapter over one `SQLite` connection.
pub struct Persistence {
    pub(crate) conn: SqliteConnection,
}

impl Persistence {
    /// Creates a new persistence adapter with an in-memory `SQLite` database.
    ///
    /// Each call receives its own shared-cache database, so tests never see
    /// each other's rows.
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be initialized.
    pub fn new_in_memory() -> Result<Self, PersistenceError> {
        let db_id: u64 = DB_COUNTER.fetch_add(1, Ordering::SeqCst);
        let shared_memory_url: String =
            format!("file:memdb_scheduler_{db_id}?mode=memory&cache=shared");

        let mut conn: SqliteConnection =
            backend::sqlite::initialize_database(&shared_memory_url)?;
        backend::sqlite::verify_foreign_key_enforcement(&mut conn)?;

        Ok(Self { conn })
    }

    /// Creates a new persistence adapter with a file-based `SQLite` database.
    ///
    /// # Arguments
    ///
    /// * `path` - The path to the `SQLite` database file
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be opened or initialized.
    pub fn new_with_file<P: AsRef<Path>>(path: P) -> Result<Self, PersistenceError> {
        let path_str: &str = path.as_ref().to_str().ok_or_else(|| {
            PersistenceError::InitializationError("Invalid database path".to_string())
        })?;

        let mut conn: SqliteConnection = backend::sqlite::initialize_database(path_str)?;
        backend::sqlite::enable_wal_mode(&mut conn)?;
        backend::sqlite::verify_foreign_key_enforcement(&mut conn)?;

        info!(path = path_str, "Opened scheduler database");
        Ok(Self { conn })
    }

    /// Verifies that foreign key enforcement is enabled.
    ///
    /// # Errors
    ///
    /// Returns an error if foreign key enforcement is not enabled.
    pub fn verify_foreign_key_enforcement(&mut self) -> Result<(), PersistenceError> {
        backend::sqlite::verify_foreign_key_enforcement(&mut self.conn)
    }

    // ========================================================================
    // Scheduling
    // ========================================================================

    /// Builds the problem spec for a solve.
    ///
    /// All reads happen inside one transaction so the spec reflects a single
    /// state of the database.
    ///
    /// # Errors
    ///
    /// Returns the builder's error (`NotFound`, `Validation`) or
    /// `CoreError::Store` if a read fails.
    pub fn build_problem_spec(
        &mut self,
        account_id: AccountId,
        season_id: SeasonId,
        filters: &SpecFilters,
    ) -> Result<ProblemSpec, CoreError> {
        let outcome: Result<Result<ProblemSpec, CoreError>, diesel::result::Error> =
            self.conn.transaction(|conn| {
                let mut unit: SqliteUnit<'_> = SqliteUnit::new(conn);
                Ok(league_scheduler::build_problem_spec(
                    &mut unit, account_id, season_id, filters,
                ))
            });
        outcome.map_err(|e| CoreError::from(PersistenceError::from(e)))?
    }

    /// Lists every game of a season with its current placement.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub fn list_games(
        &mut self,
        season_id: SeasonId,
    ) -> Result<Vec<GameRecord>, PersistenceError> {
        queries::games::list_games(&mut self.conn, season_id)
    }

    /// Returns the placement of one game, if it has one.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub fn find_assignment(
        &mut self,
        season_id: SeasonId,
        game_id: GameId,
    ) -> Result<Option<Assignment>, PersistenceError> {
        Ok(self
            .list_games(season_id)?
            .into_iter()
            .find(|record| record.game.game_id == game_id)
            .and_then(|record| record.assignment))
    }

    /// Finds the ledger entry recorded under a key.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails or the stored result
    /// does not deserialize.
    pub fn find_ledger_entry(
        &mut self,
        account_id: AccountId,
        key: &IdempotencyKey,
    ) -> Result<Option<LedgerEntry>, PersistenceError> {
        queries::ledger::find_ledger_entry(&mut self.conn, account_id, key)
    }

    // ========================================================================
    // Scheduler configuration & league selection
    // ========================================================================

    /// Returns the scheduler configuration of a season.
    ///
    /// # Errors
    ///
    /// Returns `PersistenceError::NotFound` if the season does not belong to
    /// the account, or a database error.
    pub fn get_scheduler_config(
        &mut self,
        account_id: AccountId,
        season_id: SeasonId,
    ) -> Result<Option<SeasonConfig>, PersistenceError> {
        self.require_season(account_id, season_id)?;
        queries::season::find_scheduler_config(&mut self.conn, season_id)
    }

    /// Validates and stores the scheduler configuration of a season.
    ///
    /// # Errors
    ///
    /// Returns `PersistenceError::InvalidInput` if the configuration is
    /// invalid (bad ranges, unknown timezone), `PersistenceError::NotFound`
    /// if the season does not belong to the account, or a database error.
    pub fn upsert_scheduler_config(
        &mut self,
        account_id: AccountId,
        season_id: SeasonId,
        config: &SeasonConfig,
    ) -> Result<(), PersistenceError> {
        validate_season_config(config).map_err(|e| PersistenceError::InvalidInput {
            field: String::from("season_config"),
            message: e.to_string(),
        })?;
        self.require_season(account_id, season_id)?;
        mutations::config::upsert_scheduler_config(&mut self.conn, season_id, config)
    }

    /// Lists one selection per league of the season.
    ///
    /// When no selection was ever stored every league is enabled; otherwise
    /// leagues without a stored row are disabled.
    ///
    /// # Errors
    ///
    /// Returns `PersistenceError::NotFound` if the season does not belong to
    /// the account, or a database error.
    pub fn list_league_selections(
        &mut self,
        account_id: AccountId,
        season_id: SeasonId,
    ) -> Result<Vec<LeagueSelection>, PersistenceError> {
        self.require_season(account_id, season_id)?;
        let leagues: Vec<LeagueSeasonRecord> =
            queries::season::list_league_seasons(&mut self.conn, season_id)?;
        let stored: Vec<LeagueSelection> =
            queries::season::list_league_selections(&mut self.conn, season_id)?;
        Ok(effective_selections(&leagues, stored))
    }

    /// Replaces the league selections of a season and returns the
    /// resulting selections.
    ///
    /// # Errors
    ///
    /// Returns `PersistenceError::InvalidInput` if a league is listed twice
    /// or is not part of the season, `PersistenceError::NotFound` if the
    /// season does not belong to the account, or a database error.
    pub fn replace_league_selections(
        &mut self,
        account_id: AccountId,
        season_id: SeasonId,
        selections: &[LeagueSelection],
    ) -> Result<Vec<LeagueSelection>, PersistenceError> {
        self.require_season(account_id, season_id)?;
        self.conn.immediate_transaction(|conn| {
            mutations::config::replace_league_selections(conn, season_id, selections)
        })?;
        self.list_league_selections(account_id, season_id)
    }

    fn require_season(
        &mut self,
        account_id: AccountId,
        season_id: SeasonId,
    ) -> Result<SeasonRecord, PersistenceError> {
        queries::season::find_season(&mut self.conn, account_id, season_id)?.ok_or_else(|| {
            PersistenceError::NotFound(format!(
                "season {season_id} does not exist for account {account_id}"
            ))
        })
    }

    // ========================================================================
    // Seeding
    // ========================================================================

    /// Creates an account.
    ///
    /// # Errors
    ///
    /// Returns an error if the insert fails.
    pub fn create_account(
        &mut self,
        account_id: AccountId,
        name: &str,
    ) -> Result<(), PersistenceError> {
        mutations::seed::insert_account(&mut self.conn, account_id, name)
    }

    /// Creates a season owned by an account.
    ///
    /// # Errors
    ///
    /// Returns an error if the insert fails.
    pub fn create_season(
        &mut self,
        account_id: AccountId,
        season_id: SeasonId,
        name: &str,
    ) -> Result<(), PersistenceError> {
        mutations::seed::insert_season(&mut self.conn, account_id, season_id, name)
    }

    /// Adds a league to a season.
    ///
    /// # Errors
    ///
    /// Returns an error if the insert fails.
    pub fn create_league_season(
        &mut self,
        season_id: SeasonId,
        league_season_id: LeagueSeasonId,
        league_name: &str,
    ) -> Result<(), PersistenceError> {
        mutations::seed::insert_league_season(
            &mut self.conn,
            season_id,
            league_season_id,
            league_name,
        )
    }

    /// Creates a team.
    ///
    /// # Errors
    ///
    /// Returns an error if the insert fails.
    pub fn create_team(&mut self, team: &Team) -> Result<(), PersistenceError> {
        mutations::seed::insert_team(&mut self.conn, team)
    }

    /// Creates a field owned by an account.
    ///
    /// # Errors
    ///
    /// Returns an error if the insert fails.
    pub fn create_field(
        &mut self,
        account_id: AccountId,
        field: &Field,
    ) -> Result<(), PersistenceError> {
        mutations::seed::insert_field(&mut self.conn, account_id, field)
    }

    /// Creates an umpire owned by an account.
    ///
    /// # Errors
    ///
    /// Returns an error if the insert fails.
    pub fn create_umpire(
        &mut self,
        account_id: AccountId,
        umpire: &Umpire,
    ) -> Result<(), PersistenceError> {
        mutations::seed::insert_umpire(&mut self.conn, account_id, umpire)
    }

    /// Creates a game without a placement.
    ///
    /// # Errors
    ///
    /// Returns an error if the insert fails.
    pub fn create_game(
        &mut self,
        season_id: SeasonId,
        game: &Game,
    ) -> Result<(), PersistenceError> {
        mutations::seed::insert_game(&mut self.conn, season_id, game)
    }

    /// Adds an availability rule and returns its row id.
    ///
    /// # Errors
    ///
    /// Returns an error if the insert fails.
    pub fn add_field_availability_rule(
        &mut self,
        rule: &FieldAvailabilityRule,
    ) -> Result<i64, PersistenceError> {
        mutations::seed::insert_field_availability_rule(&mut self.conn, rule)
    }

    /// Adds a field closure date and returns its row id.
    ///
    /// # Errors
    ///
    /// Returns an error if the insert fails.
    pub fn add_field_exclusion_date(
        &mut self,
        exclusion: &FieldExclusionDate,
    ) -> Result<i64, PersistenceError> {
        mutations::seed::insert_field_exclusion_date(&mut self.conn, exclusion)
    }

    /// Adds a season-wide exclusion window and returns its row id.
    ///
    /// # Errors
    ///
    /// Returns an error if the insert fails.
    pub fn add_season_exclusion(
        &mut self,
        season_id: SeasonId,
        window: &ExclusionWindow,
    ) -> Result<i64, PersistenceError> {
        mutations::seed::insert_season_exclusion(&mut self.conn, season_id, window)
    }

    /// Adds a team exclusion window and returns its row id.
    ///
    /// # Errors
    ///
    /// Returns an error if the insert fails.
    pub fn add_team_exclusion(
        &mut self,
        exclusion: &TeamExclusion,
    ) -> Result<i64, PersistenceError> {
        mutations::seed::insert_team_exclusion(&mut self.conn, exclusion)
    }

    /// Adds an umpire exclusion window and returns its row id.
    ///
    /// # Errors
    ///
    /// Returns an error if the insert fails.
    pub fn add_umpire_exclusion(
        &mut self,
        exclusion: &UmpireExclusion,
    ) -> Result<i64, PersistenceError> {
        mutations::seed::insert_umpire_exclusion(&mut self.conn, exclusion)
    }

    /// Places a game directly, outside any apply.
    ///
    /// # Errors
    ///
    /// Returns an error if the game is not part of the season or a write
    /// fails.
    pub fn place_game(
        &mut self,
        season_id: SeasonId,
        assignment: &Assignment,
    ) -> Result<(), PersistenceError> {
        self.conn.immediate_transaction(|conn| {
            mutations::schedule::upsert_assignments(
                conn,
                season_id,
                std::slice::from_ref(assignment),
            )
        })
    }
}
