// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! The scheduler core's repository ports, backed by one SQLite connection.

use diesel::SqliteConnection;
use league_scheduler::{
    ApplyLedger, ApplyUnit, CoreError, GameRecord, LeagueSeasonRecord, LedgerEntry, NewLedgerEntry,
    ScheduleWriter, SeasonReader, SeasonRecord, TransactionalStore,
};
use league_scheduler_domain::{
    AccountId, Assignment, ExclusionWindow, Field, FieldAvailabilityRule, FieldExclusionDate,
    GameId, IdempotencyKey, LeagueSelection, SeasonConfig, SeasonId, Team, TeamExclusion, Umpire,
    UmpireExclusion,
};
use tracing::debug;

use crate::Persistence;
use crate::error::PersistenceError;
use crate::{mutations, queries};

/// Port implementations over a borrowed connection.
///
/// Inside `Persistence::atomically` the connection is in an open
/// transaction, so everything done through one unit commits or rolls back
/// together.
pub struct SqliteUnit<'a> {
    conn: &'a mut SqliteConnection,
}

impl<'a> SqliteUnit<'a> {
    /// Wraps a connection.
    #[must_use]
    pub const fn new(conn: &'a mut SqliteConnection) -> Self {
        Self { conn }
    }
}

impl SeasonReader for SqliteUnit<'_> {
    fn find_season(
        &mut self,
        account_id: AccountId,
        season_id: SeasonId,
    ) -> Result<Option<SeasonRecord>, CoreError> {
        Ok(queries::season::find_season(
            self.conn, account_id, season_id,
        )?)
    }

    fn list_league_seasons(
        &mut self,
        season_id: SeasonId,
    ) -> Result<Vec<LeagueSeasonRecord>, CoreError> {
        Ok(queries::season::list_league_seasons(self.conn, season_id)?)
    }

    fn list_teams(&mut self, season_id: SeasonId) -> Result<Vec<Team>, CoreError> {
        Ok(queries::resources::list_teams(self.conn, season_id)?)
    }

    fn list_fields(&mut self, account_id: AccountId) -> Result<Vec<Field>, CoreError> {
        Ok(queries::resources::list_fields(self.conn, account_id)?)
    }

    fn list_umpires(&mut self, account_id: AccountId) -> Result<Vec<Umpire>, CoreError> {
        Ok(queries::resources::list_umpires(self.conn, account_id)?)
    }

    fn list_games(&mut self, season_id: SeasonId) -> Result<Vec<GameRecord>, CoreError> {
        Ok(queries::games::list_games(self.conn, season_id)?)
    }

    fn list_field_availability_rules(
        &mut self,
        account_id: AccountId,
    ) -> Result<Vec<FieldAvailabilityRule>, CoreError> {
        Ok(queries::resources::list_field_availability_rules(
            self.conn, account_id,
        )?)
    }

    fn list_field_exclusion_dates(
        &mut self,
        account_id: AccountId,
    ) -> Result<Vec<FieldExclusionDate>, CoreError> {
        Ok(queries::resources::list_field_exclusion_dates(
            self.conn, account_id,
        )?)
    }

    fn list_season_exclusions(
        &mut self,
        season_id: SeasonId,
    ) -> Result<Vec<ExclusionWindow>, CoreError> {
        Ok(queries::resources::list_season_exclusions(
            self.conn, season_id,
        )?)
    }

    fn list_team_exclusions(
        &mut self,
        season_id: SeasonId,
    ) -> Result<Vec<TeamExclusion>, CoreError> {
        Ok(queries::resources::list_team_exclusions(self.conn, season_id)?)
    }

    fn list_umpire_exclusions(
        &mut self,
        account_id: AccountId,
    ) -> Result<Vec<UmpireExclusion>, CoreError> {
        Ok(queries::resources::list_umpire_exclusions(
            self.conn, account_id,
        )?)
    }

    fn find_scheduler_config(
        &mut self,
        season_id: SeasonId,
    ) -> Result<Option<SeasonConfig>, CoreError> {
        Ok(queries::season::find_scheduler_config(self.conn, season_id)?)
    }

    fn list_league_selections(
        &mut self,
        season_id: SeasonId,
    ) -> Result<Vec<LeagueSelection>, CoreError> {
        Ok(queries::season::list_league_selections(self.conn, season_id)?)
    }
}

impl ApplyLedger for SqliteUnit<'_> {
    fn find_ledger_entry(
        &mut self,
        account_id: AccountId,
        key: &IdempotencyKey,
    ) -> Result<Option<LedgerEntry>, CoreError> {
        Ok(queries::ledger::find_ledger_entry(
            self.conn, account_id, key,
        )?)
    }

    fn record_ledger_entry(&mut self, entry: &NewLedgerEntry) -> Result<(), CoreError> {
        Ok(mutations::ledger::record_ledger_entry(self.conn, entry)?)
    }
}

impl ScheduleWriter for SqliteUnit<'_> {
    fn upsert_assignments(
        &mut self,
        season_id: SeasonId,
        assignments: &[Assignment],
    ) -> Result<(), CoreError> {
        Ok(mutations::schedule::upsert_assignments(
            self.conn,
            season_id,
            assignments,
        )?)
    }

    fn clear_assignments(
        &mut self,
        season_id: SeasonId,
        game_ids: &[GameId],
    ) -> Result<(), CoreError> {
        Ok(mutations::schedule::clear_assignments(
            self.conn, season_id, game_ids,
        )?)
    }
}

/// Why a transaction ended without committing.
enum TransactionFailure {
    /// The work itself returned an error.
    Work(CoreError),
    /// Beginning, committing or rolling back failed.
    Database(diesel::result::Error),
}

impl From<diesel::result::Error> for TransactionFailure {
    fn from(err: diesel::result::Error) -> Self {
        Self::Database(err)
    }
}

impl From<TransactionFailure> for CoreError {
    fn from(failure: TransactionFailure) -> Self {
        match failure {
            TransactionFailure::Work(err) => err,
            TransactionFailure::Database(err) => Self::from(PersistenceError::from(err)),
        }
    }
}

impl TransactionalStore for Persistence {
    /// Runs `work` inside an immediate transaction.
    ///
    /// `BEGIN IMMEDIATE` takes the write lock up front, so two applies never
    /// interleave their ledger checks and writes.
    fn atomically<T, F>(&mut self, work: F) -> Result<T, CoreError>
    where
        F: FnOnce(&mut dyn ApplyUnit) -> Result<T, CoreError>,
    {
        let outcome: Result<T, TransactionFailure> = self.conn.immediate_transaction(|conn| {
            let mut unit: SqliteUnit<'_> = SqliteUnit::new(conn);
            work(&mut unit).map_err(TransactionFailure::Work)
        });

        if outcome.is_err() {
            debug!("Apply transaction rolled back");
        }
        outcome.map_err(CoreError::from)
    }
}
