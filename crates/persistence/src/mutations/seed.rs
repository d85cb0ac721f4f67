// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Inserts for the entities the scheduler reads.
//!
//! These rows are owned by the surrounding league application; the
//! scheduler only needs a way to create them for a fresh database and for
//! tests. Identifiers are supplied by the caller except for rules and
//! exclusions, whose generated row id is returned.

use diesel::SqliteConnection;
use diesel::prelude::*;
use league_scheduler_domain::formats::{format_clock, format_date, format_local_datetime};
use league_scheduler_domain::{
    AccountId, ExclusionWindow, Field, FieldAvailabilityRule, FieldExclusionDate, Game,
    LeagueSeasonId, SeasonId, Team, TeamExclusion, Umpire, UmpireExclusion,
};
use tracing::debug;

use crate::backend::sqlite::get_last_insert_rowid;
use crate::diesel_schema::{
    accounts, field_availability_rules, field_exclusion_dates, fields, games, league_seasons,
    season_exclusions, seasons, team_exclusions, teams, umpire_exclusions, umpires,
};
use crate::error::PersistenceError;

/// Inserts an account.
///
/// # Errors
///
/// Returns an error if the insert fails.
pub fn insert_account(
    conn: &mut SqliteConnection,
    account_id: AccountId,
    name: &str,
) -> Result<(), PersistenceError> {
    diesel::insert_into(accounts::table)
        .values((
            accounts::account_id.eq(account_id.value()),
            accounts::name.eq(name),
        ))
        .execute(conn)?;
    debug!(account_id = account_id.value(), "Inserted account");
    Ok(())
}

/// Inserts a season owned by an account.
///
/// # Errors
///
/// Returns an error if the insert fails.
pub fn insert_season(
    conn: &mut SqliteConnection,
    account_id: AccountId,
    season_id: SeasonId,
    name: &str,
) -> Result<(), PersistenceError> {
    diesel::insert_into(seasons::table)
        .values((
            seasons::season_id.eq(season_id.value()),
            seasons::account_id.eq(account_id.value()),
            seasons::name.eq(name),
        ))
        .execute(conn)?;
    debug!(season_id = season_id.value(), "Inserted season");
    Ok(())
}

/// Inserts a league taking part in a season.
///
/// # Errors
///
/// Returns an error if the insert fails.
pub fn insert_league_season(
    conn: &mut SqliteConnection,
    season_id: SeasonId,
    league_season_id: LeagueSeasonId,
    league_name: &str,
) -> Result<(), PersistenceError> {
    diesel::insert_into(league_seasons::table)
        .values((
            league_seasons::league_season_id.eq(league_season_id.value()),
            league_seasons::season_id.eq(season_id.value()),
            league_seasons::league_name.eq(league_name),
        ))
        .execute(conn)?;
    Ok(())
}

/// Inserts a team.
///
/// # Errors
///
/// Returns an error if the insert fails.
pub fn insert_team(conn: &mut SqliteConnection, team: &Team) -> Result<(), PersistenceError> {
    diesel::insert_into(teams::table)
        .values((
            teams::team_id.eq(team.team_id.value()),
            teams::league_season_id.eq(team.league_season_id.value()),
            teams::name.eq(&team.name),
        ))
        .execute(conn)?;
    Ok(())
}

/// Inserts a field owned by an account.
///
/// # Errors
///
/// Returns an error if the insert fails.
pub fn insert_field(
    conn: &mut SqliteConnection,
    account_id: AccountId,
    field: &Field,
) -> Result<(), PersistenceError> {
    diesel::insert_into(fields::table)
        .values((
            fields::field_id.eq(field.field_id.value()),
            fields::account_id.eq(account_id.value()),
            fields::name.eq(&field.name),
            fields::has_lights.eq(i32::from(field.has_lights)),
            fields::usable_from.eq(field.usable_from.map(format_date)),
            fields::usable_until.eq(field.usable_until.map(format_date)),
        ))
        .execute(conn)?;
    Ok(())
}

/// Inserts an umpire owned by an account.
///
/// # Errors
///
/// Returns an error if the insert fails.
pub fn insert_umpire(
    conn: &mut SqliteConnection,
    account_id: AccountId,
    umpire: &Umpire,
) -> Result<(), PersistenceError> {
    diesel::insert_into(umpires::table)
        .values((
            umpires::umpire_id.eq(umpire.umpire_id.value()),
            umpires::account_id.eq(account_id.value()),
            umpires::name.eq(&umpire.name),
        ))
        .execute(conn)?;
    Ok(())
}

/// Inserts a game without a placement.
///
/// # Errors
///
/// Returns an error if the insert fails.
pub fn insert_game(
    conn: &mut SqliteConnection,
    season_id: SeasonId,
    game: &Game,
) -> Result<(), PersistenceError> {
    diesel::insert_into(games::table)
        .values((
            games::game_id.eq(game.game_id.value()),
            games::season_id.eq(season_id.value()),
            games::league_season_id.eq(game.league_season_id.value()),
            games::home_team_id.eq(game.home_team_id.value()),
            games::visitor_team_id.eq(game.visitor_team_id.value()),
            games::earliest_date.eq(game.earliest_date.map(format_date)),
            games::latest_date.eq(game.latest_date.map(format_date)),
            games::status.eq(game.status.as_str()),
        ))
        .execute(conn)?;
    Ok(())
}

/// Inserts a field availability rule.
///
/// # Errors
///
/// Returns an error if the insert fails.
pub fn insert_field_availability_rule(
    conn: &mut SqliteConnection,
    rule: &FieldAvailabilityRule,
) -> Result<i64, PersistenceError> {
    diesel::insert_into(field_availability_rules::table)
        .values((
            field_availability_rules::field_id.eq(rule.field_id.value()),
            field_availability_rules::days.eq(i32::from(rule.days.bits())),
            field_availability_rules::start_time.eq(format_clock(rule.start_time)),
            field_availability_rules::end_time.eq(format_clock(rule.end_time)),
            field_availability_rules::valid_from.eq(rule.valid_from.map(format_date)),
            field_availability_rules::valid_until.eq(rule.valid_until.map(format_date)),
            field_availability_rules::enabled.eq(i32::from(rule.enabled)),
        ))
        .execute(conn)?;
    get_last_insert_rowid(conn)
}

/// Inserts a field closure date.
///
/// # Errors
///
/// Returns an error if the insert fails.
pub fn insert_field_exclusion_date(
    conn: &mut SqliteConnection,
    exclusion: &FieldExclusionDate,
) -> Result<i64, PersistenceError> {
    diesel::insert_into(field_exclusion_dates::table)
        .values((
            field_exclusion_dates::field_id.eq(exclusion.field_id.value()),
            field_exclusion_dates::exclusion_date.eq(format_date(exclusion.date)),
            field_exclusion_dates::reason.eq(&exclusion.reason),
        ))
        .execute(conn)?;
    get_last_insert_rowid(conn)
}

/// Inserts a season-wide exclusion window.
///
/// # Errors
///
/// Returns an error if the insert fails.
pub fn insert_season_exclusion(
    conn: &mut SqliteConnection,
    season_id: SeasonId,
    window: &ExclusionWindow,
) -> Result<i64, PersistenceError> {
    diesel::insert_into(season_exclusions::table)
        .values((
            season_exclusions::season_id.eq(season_id.value()),
            season_exclusions::starts_at.eq(format_local_datetime(window.starts_at)),
            season_exclusions::ends_at.eq(format_local_datetime(window.ends_at)),
            season_exclusions::note.eq(&window.note),
            season_exclusions::enabled.eq(i32::from(window.enabled)),
        ))
        .execute(conn)?;
    get_last_insert_rowid(conn)
}

/// Inserts a team exclusion window.
///
/// # Errors
///
/// Returns an error if the insert fails.
pub fn insert_team_exclusion(
    conn: &mut SqliteConnection,
    exclusion: &TeamExclusion,
) -> Result<i64, PersistenceError> {
    let window: &ExclusionWindow = &exclusion.window;
    diesel::insert_into(team_exclusions::table)
        .values((
            team_exclusions::team_id.eq(exclusion.team_id.value()),
            team_exclusions::starts_at.eq(format_local_datetime(window.starts_at)),
            team_exclusions::ends_at.eq(format_local_datetime(window.ends_at)),
            team_exclusions::note.eq(&window.note),
            team_exclusions::enabled.eq(i32::from(window.enabled)),
        ))
        .execute(conn)?;
    get_last_insert_rowid(conn)
}

/// Inserts an umpire exclusion window.
///
/// # Errors
///
/// Returns an error if the insert fails.
pub fn insert_umpire_exclusion(
    conn: &mut SqliteConnection,
    exclusion: &UmpireExclusion,
) -> Result<i64, PersistenceError> {
    let window: &ExclusionWindow = &exclusion.window;
    diesel::insert_into(umpire_exclusions::table)
        .values((
            umpire_exclusions::umpire_id.eq(exclusion.umpire_id.value()),
            umpire_exclusions::starts_at.eq(format_local_datetime(window.starts_at)),
            umpire_exclusions::ends_at.eq(format_local_datetime(window.ends_at)),
            umpire_exclusions::note.eq(&window.note),
            umpire_exclusions::enabled.eq(i32::from(window.enabled)),
        ))
        .execute(conn)?;
    get_last_insert_rowid(conn)
}
