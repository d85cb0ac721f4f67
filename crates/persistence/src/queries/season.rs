// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Season, league and scheduler configuration queries.

use diesel::SqliteConnection;
use diesel::prelude::*;
use league_scheduler::{LeagueSeasonRecord, SeasonRecord};
use league_scheduler_domain::{AccountId, LeagueSeasonId, LeagueSelection, SeasonConfig, SeasonId};
use tracing::debug;

use crate::data_models::SchedulerConfigRow;
use crate::diesel_schema::{
    league_seasons, season_league_selections, season_scheduler_config, seasons,
};
use crate::error::PersistenceError;

/// Finds a season owned by an account.
///
/// # Arguments
///
/// * `conn` - The database connection
/// * `account_id` - The owning account
/// * `season_id` - The season to look up
///
/// # Errors
///
/// Returns an error if the database query fails.
/// Returns `Ok(None)` if the season does not exist or belongs to another account.
pub fn find_season(
    conn: &mut SqliteConnection,
    account_id: AccountId,
    season_id: SeasonId,
) -> Result<Option<SeasonRecord>, PersistenceError> {
    let result: Result<(i64, i64, String), diesel::result::Error> = seasons::table
        .filter(seasons::season_id.eq(season_id.value()))
        .filter(seasons::account_id.eq(account_id.value()))
        .select((seasons::account_id, seasons::season_id, seasons::name))
        .first(conn);

    match result {
        Ok((account, season, name)) => Ok(Some(SeasonRecord {
            account_id: AccountId::new(account),
            season_id: SeasonId::new(season),
            name,
        })),
        Err(diesel::result::Error::NotFound) => {
            debug!(
                account_id = account_id.value(),
                season_id = season_id.value(),
                "Season not found"
            );
            Ok(None)
        }
        Err(e) => Err(PersistenceError::from(e)),
    }
}

/// Lists the leagues of a season.
///
/// # Errors
///
/// Returns an error if the database query fails.
pub fn list_league_seasons(
    conn: &mut SqliteConnection,
    season_id: SeasonId,
) -> Result<Vec<LeagueSeasonRecord>, PersistenceError> {
    let rows: Vec<(i64, String)> = league_seasons::table
        .filter(league_seasons::season_id.eq(season_id.value()))
        .select((league_seasons::league_season_id, league_seasons::league_name))
        .order(league_seasons::league_season_id.asc())
        .load(conn)?;

    Ok(rows
        .into_iter()
        .map(|(id, league_name)| LeagueSeasonRecord {
            league_season_id: LeagueSeasonId::new(id),
            league_name,
        })
        .collect())
}

/// Finds the scheduler configuration of a season.
///
/// # Errors
///
/// Returns an error if the database query fails or the stored row does not
/// decode.
pub fn find_scheduler_config(
    conn: &mut SqliteConnection,
    season_id: SeasonId,
) -> Result<Option<SeasonConfig>, PersistenceError> {
    let result: Result<SchedulerConfigRow, diesel::result::Error> = season_scheduler_config::table
        .filter(season_scheduler_config::season_id.eq(season_id.value()))
        .select(SchedulerConfigRow::as_select())
        .first(conn);

    match result {
        Ok(row) => Ok(Some(row.into_domain()?)),
        Err(diesel::result::Error::NotFound) => Ok(None),
        Err(e) => Err(PersistenceError::from(e)),
    }
}

/// Lists the stored league selections of a season.
///
/// Only leagues with a selection row are returned; the caller decides what
/// an absent row means.
///
/// # Errors
///
/// Returns an error if the database query fails.
pub fn list_league_selections(
    conn: &mut SqliteConnection,
    season_id: SeasonId,
) -> Result<Vec<LeagueSelection>, PersistenceError> {
    let rows: Vec<(i64, String, i32)> = season_league_selections::table
        .inner_join(league_seasons::table)
        .filter(season_league_selections::season_id.eq(season_id.value()))
        .select((
            season_league_selections::league_season_id,
            league_seasons::league_name,
            season_league_selections::enabled,
        ))
        .order(season_league_selections::league_season_id.asc())
        .load(conn)?;

    Ok(rows
        .into_iter()
        .map(|(id, league_name, enabled)| LeagueSelection {
            league_season_id: LeagueSeasonId::new(id),
            league_name,
            enabled: enabled != 0,
        })
        .collect())
}
