// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Narrow repository interfaces the scheduler core depends on.
//!
//! The core never names a storage technology. Callers hand it something
//! implementing these traits: the SQLite persistence layer in production,
//! an in-memory store in tests.

use crate::apply::ApplyResult;
use crate::error::CoreError;
use league_scheduler_domain::{
    AccountId, Assignment, ExclusionWindow, Field, FieldAvailabilityRule, FieldExclusionDate,
    Game, GameId, IdempotencyKey, LeagueSeasonId, LeagueSelection, RunId, SeasonConfig, SeasonId,
    Team, TeamExclusion, Umpire, UmpireExclusion,
};
use serde::{Deserialize, Serialize};

/// A season as seen by the scheduler.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeasonRecord {
    pub account_id: AccountId,
    pub season_id: SeasonId,
    pub name: String,
}

/// A league taking part in a season.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LeagueSeasonRecord {
    pub league_season_id: LeagueSeasonId,
    pub league_name: String,
}

/// A game together with its current placement, if it has one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameRecord {
    pub game: Game,
    pub assignment: Option<Assignment>,
}

/// A ledger entry about to be recorded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewLedgerEntry {
    pub account_id: AccountId,
    pub season_id: SeasonId,
    pub idempotency_key: IdempotencyKey,
    pub run_id: RunId,
    pub request_fingerprint: String,
    pub result: ApplyResult,
}

/// A recorded apply.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedgerEntry {
    pub account_id: AccountId,
    pub season_id: SeasonId,
    pub idempotency_key: IdempotencyKey,
    pub run_id: RunId,
    pub request_fingerprint: String,
    pub result: ApplyResult,
    /// When the apply was recorded (RFC 3339, UTC).
    pub applied_at: String,
}

/// Read access to everything a problem spec is built from.
pub trait SeasonReader {
    /// Finds a season owned by `account_id`.
    ///
    /// # Errors
    ///
    /// Returns `CoreError::Store` if the store cannot be read.
    fn find_season(
        &mut self,
        account_id: AccountId,
        season_id: SeasonId,
    ) -> Result<Option<SeasonRecord>, CoreError>;

    /// Lists the leagues taking part in a season.
    ///
    /// # Errors
    ///
    /// Returns `CoreError::Store` if the store cannot be read.
    fn list_league_seasons(
        &mut self,
        season_id: SeasonId,
    ) -> Result<Vec<LeagueSeasonRecord>, CoreError>;

    /// Lists the teams of every league in a season.
    ///
    /// # Errors
    ///
    /// Returns `CoreError::Store` if the store cannot be read.
    fn list_teams(&mut self, season_id: SeasonId) -> Result<Vec<Team>, CoreError>;

    /// Lists the account's fields.
    ///
    /// # Errors
    ///
    /// Returns `CoreError::Store` if the store cannot be read.
    fn list_fields(&mut self, account_id: AccountId) -> Result<Vec<Field>, CoreError>;

    /// Lists the account's umpires.
    ///
    /// # Errors
    ///
    /// Returns `CoreError::Store` if the store cannot be read.
    fn list_umpires(&mut self, account_id: AccountId) -> Result<Vec<Umpire>, CoreError>;

    /// Lists every game of a season with its current placement.
    ///
    /// # Errors
    ///
    /// Returns `CoreError::Store` if the store cannot be read.
    fn list_games(&mut self, season_id: SeasonId) -> Result<Vec<GameRecord>, CoreError>;

    /// Lists availability rules of the account's fields.
    ///
    /// # Errors
    ///
    /// Returns `CoreError::Store` if the store cannot be read.
    fn list_field_availability_rules(
        &mut self,
        account_id: AccountId,
    ) -> Result<Vec<FieldAvailabilityRule>, CoreError>;

    /// Lists closure dates of the account's fields.
    ///
    /// # Errors
    ///
    /// Returns `CoreError::Store` if the store cannot be read.
    fn list_field_exclusion_dates(
        &mut self,
        account_id: AccountId,
    ) -> Result<Vec<FieldExclusionDate>, CoreError>;

    /// Lists season-wide exclusion windows.
    ///
    /// # Errors
    ///
    /// Returns `CoreError::Store` if the store cannot be read.
    fn list_season_exclusions(
        &mut self,
        season_id: SeasonId,
    ) -> Result<Vec<ExclusionWindow>, CoreError>;

    /// Lists team exclusion windows for a season.
    ///
    /// # Errors
    ///
    /// Returns `CoreError::Store` if the store cannot be read.
    fn list_team_exclusions(&mut self, season_id: SeasonId)
    -> Result<Vec<TeamExclusion>, CoreError>;

    /// Lists exclusion windows of the account's umpires.
    ///
    /// # Errors
    ///
    /// Returns `CoreError::Store` if the store cannot be read.
    fn list_umpire_exclusions(
        &mut self,
        account_id: AccountId,
    ) -> Result<Vec<UmpireExclusion>, CoreError>;

    /// Finds the season's scheduler configuration.
    ///
    /// # Errors
    ///
    /// Returns `CoreError::Store` if the store cannot be read.
    fn find_scheduler_config(
        &mut self,
        season_id: SeasonId,
    ) -> Result<Option<SeasonConfig>, CoreError>;

    /// Lists the stored league selections of a season.
    ///
    /// # Errors
    ///
    /// Returns `CoreError::Store` if the store cannot be read.
    fn list_league_selections(
        &mut self,
        season_id: SeasonId,
    ) -> Result<Vec<LeagueSelection>, CoreError>;
}

/// The durable record of applied requests.
pub trait ApplyLedger {
    /// Finds the entry recorded under `key` for `account_id`.
    ///
    /// # Errors
    ///
    /// Returns `CoreError::Store` if the store cannot be read.
    fn find_ledger_entry(
        &mut self,
        account_id: AccountId,
        key: &IdempotencyKey,
    ) -> Result<Option<LedgerEntry>, CoreError>;

    /// Records an entry. This is the atomic claim of the key.
    ///
    /// # Errors
    ///
    /// Returns `CoreError::LedgerContention` if the key was recorded first
    /// by someone else, or `CoreError::Store` on any other failure.
    fn record_ledger_entry(&mut self, entry: &NewLedgerEntry) -> Result<(), CoreError>;
}

/// The apply path's only write dependency on the schedule.
pub trait ScheduleWriter {
    /// Sets field, date, start time and umpires of each game and marks it
    /// scheduled.
    ///
    /// # Errors
    ///
    /// Returns `CoreError::Store` if a write fails.
    fn upsert_assignments(
        &mut self,
        season_id: SeasonId,
        assignments: &[Assignment],
    ) -> Result<(), CoreError>;

    /// Removes the placement and umpires of each game.
    ///
    /// # Errors
    ///
    /// Returns `CoreError::Store` if a write fails.
    fn clear_assignments(&mut self, season_id: SeasonId, game_ids: &[GameId])
    -> Result<(), CoreError>;
}

/// Everything one apply needs, available inside a single transaction.
pub trait ApplyUnit: SeasonReader + ApplyLedger + ScheduleWriter {}

impl<T: SeasonReader + ApplyLedger + ScheduleWriter> ApplyUnit for T {}

/// A store that can run work atomically.
pub trait TransactionalStore {
    /// Runs `work` in one transaction. Commits when `work` returns `Ok`,
    /// rolls back otherwise.
    ///
    /// # Errors
    ///
    /// Returns the error from `work`, or `CoreError::Store` if the
    /// transaction itself fails.
    fn atomically<T, F>(&mut self, work: F) -> Result<T, CoreError>
    where
        F: FnOnce(&mut dyn ApplyUnit) -> Result<T, CoreError>;
}
