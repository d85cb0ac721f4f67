// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Teams, fields, umpires and the rules that restrict them.

use diesel::SqliteConnection;
use diesel::prelude::*;
use league_scheduler_domain::{
    AccountId, ExclusionWindow, Field, FieldAvailabilityRule, FieldExclusionDate, LeagueSeasonId,
    SeasonId, Team, TeamExclusion, TeamId, Umpire, UmpireExclusion, UmpireId,
};

use crate::data_models::{AvailabilityRuleRow, FieldExclusionRow, FieldRow, decode_window};
use crate::diesel_schema::{
    field_availability_rules, field_exclusion_dates, fields, league_seasons, season_exclusions,
    team_exclusions, teams, umpire_exclusions, umpires,
};
use crate::error::PersistenceError;

/// Stored exclusion columns: owner, start, end, note, enabled.
type ExclusionColumns = (i64, String, String, String, i32);

/// Lists the teams of every league in a season.
///
/// # Errors
///
/// Returns an error if the database query fails.
pub fn list_teams(
    conn: &mut SqliteConnection,
    season_id: SeasonId,
) -> Result<Vec<Team>, PersistenceError> {
    let rows: Vec<(i64, i64, String)> = teams::table
        .inner_join(league_seasons::table)
        .filter(league_seasons::season_id.eq(season_id.value()))
        .select((teams::team_id, teams::league_season_id, teams::name))
        .order(teams::team_id.asc())
        .load(conn)?;

    Ok(rows
        .into_iter()
        .map(|(team_id, league_season_id, name)| {
            Team::new(
                TeamId::new(team_id),
                LeagueSeasonId::new(league_season_id),
                &name,
            )
        })
        .collect())
}

/// Lists the fields of an account.
///
/// # Errors
///
/// Returns an error if the database query fails or a row does not decode.
pub fn list_fields(
    conn: &mut SqliteConnection,
    account_id: AccountId,
) -> Result<Vec<Field>, PersistenceError> {
    let rows: Vec<FieldRow> = fields::table
        .filter(fields::account_id.eq(account_id.value()))
        .select(FieldRow::as_select())
        .order(fields::field_id.asc())
        .load(conn)?;

    rows.into_iter().map(FieldRow::into_domain).collect()
}

/// Lists the umpires of an account.
///
/// # Errors
///
/// Returns an error if the database query fails.
pub fn list_umpires(
    conn: &mut SqliteConnection,
    account_id: AccountId,
) -> Result<Vec<Umpire>, PersistenceError> {
    let rows: Vec<(i64, String)> = umpires::table
        .filter(umpires::account_id.eq(account_id.value()))
        .select((umpires::umpire_id, umpires::name))
        .order(umpires::umpire_id.asc())
        .load(conn)?;

    Ok(rows
        .into_iter()
        .map(|(umpire_id, name)| Umpire::new(UmpireId::new(umpire_id), &name))
        .collect())
}

/// Lists the availability rules of an account's fields, disabled ones included.
///
/// # Errors
///
/// Returns an error if the database query fails or a row does not decode.
pub fn list_field_availability_rules(
    conn: &mut SqliteConnection,
    account_id: AccountId,
) -> Result<Vec<FieldAvailabilityRule>, PersistenceError> {
    let rows: Vec<AvailabilityRuleRow> = field_availability_rules::table
        .inner_join(fields::table)
        .filter(fields::account_id.eq(account_id.value()))
        .select(AvailabilityRuleRow::as_select())
        .order(field_availability_rules::rule_id.asc())
        .load(conn)?;

    rows.into_iter().map(AvailabilityRuleRow::into_domain).collect()
}

/// Lists closure dates of an account's fields.
///
/// # Errors
///
/// Returns an error if the database query fails or a row does not decode.
pub fn list_field_exclusion_dates(
    conn: &mut SqliteConnection,
    account_id: AccountId,
) -> Result<Vec<FieldExclusionDate>, PersistenceError> {
    let rows: Vec<FieldExclusionRow> = field_exclusion_dates::table
        .inner_join(fields::table)
        .filter(fields::account_id.eq(account_id.value()))
        .select(FieldExclusionRow::as_select())
        .order(field_exclusion_dates::exclusion_id.asc())
        .load(conn)?;

    rows.into_iter().map(FieldExclusionRow::into_domain).collect()
}

/// Lists season-wide exclusion windows.
///
/// # Errors
///
/// Returns an error if the database query fails or a row does not decode.
pub fn list_season_exclusions(
    conn: &mut SqliteConnection,
    season_id: SeasonId,
) -> Result<Vec<ExclusionWindow>, PersistenceError> {
    let rows: Vec<(String, String, String, i32)> = season_exclusions::table
        .filter(season_exclusions::season_id.eq(season_id.value()))
        .select((
            season_exclusions::starts_at,
            season_exclusions::ends_at,
            season_exclusions::note,
            season_exclusions::enabled,
        ))
        .order(season_exclusions::exclusion_id.asc())
        .load(conn)?;

    rows.into_iter()
        .map(|(starts_at, ends_at, note, enabled)| {
            decode_window("season_exclusions", &starts_at, &ends_at, note, enabled)
        })
        .collect()
}

/// Lists exclusion windows of the teams playing in a season.
///
/// # Errors
///
/// Returns an error if the database query fails or a row does not decode.
pub fn list_team_exclusions(
    conn: &mut SqliteConnection,
    season_id: SeasonId,
) -> Result<Vec<TeamExclusion>, PersistenceError> {
    let rows: Vec<ExclusionColumns> = team_exclusions::table
        .inner_join(teams::table.inner_join(league_seasons::table))
        .filter(league_seasons::season_id.eq(season_id.value()))
        .select((
            team_exclusions::team_id,
            team_exclusions::starts_at,
            team_exclusions::ends_at,
            team_exclusions::note,
            team_exclusions::enabled,
        ))
        .order(team_exclusions::exclusion_id.asc())
        .load(conn)?;

    rows.into_iter()
        .map(|(team_id, starts_at, ends_at, note, enabled)| {
            Ok(TeamExclusion {
                team_id: TeamId::new(team_id),
                window: decode_window("team_exclusions", &starts_at, &ends_at, note, enabled)?,
            })
        })
        .collect()
}

/// Lists exclusion windows of an account's umpires.
///
/// # Errors
///
/// Returns an error if the database query fails or a row does not decode.
pub fn list_umpire_exclusions(
    conn: &mut SqliteConnection,
    account_id: AccountId,
) -> Result<Vec<UmpireExclusion>, PersistenceError> {
    let rows: Vec<ExclusionColumns> = umpire_exclusions::table
        .inner_join(umpires::table)
        .filter(umpires::account_id.eq(account_id.value()))
        .select((
            umpire_exclusions::umpire_id,
            umpire_exclusions::starts_at,
            umpire_exclusions::ends_at,
            umpire_exclusions::note,
            umpire_exclusions::enabled,
        ))
        .order(umpire_exclusions::exclusion_id.asc())
        .load(conn)?;

    rows.into_iter()
        .map(|(umpire_id, starts_at, ends_at, note, enabled)| {
            Ok(UmpireExclusion {
                umpire_id: UmpireId::new(umpire_id),
                window: decode_window("umpire_exclusions", &starts_at, &ends_at, note, enabled)?,
            })
        })
        .collect()
}
