// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Scheduler configuration and league selection writes.

use std::collections::BTreeSet;

use diesel::SqliteConnection;
use diesel::prelude::*;
use diesel::upsert::excluded;
use league_scheduler_domain::formats::{format_clock, format_date};
use league_scheduler_domain::{LeagueSelection, SeasonConfig, SeasonId};
use tracing::info;

use crate::data_models::encode_u32;
use crate::diesel_schema::{league_seasons, season_league_selections, season_scheduler_config};
use crate::error::PersistenceError;

/// Inserts or replaces the scheduler configuration of a season.
///
/// The configuration is expected to be validated by the caller.
///
/// # Errors
///
/// Returns an error if a numeric value does not fit its column or the write
/// fails (including a foreign key violation for an unknown season).
pub fn upsert_scheduler_config(
    conn: &mut SqliteConnection,
    season_id: SeasonId,
    config: &SeasonConfig,
) -> Result<(), PersistenceError> {
    let umpires_per_game: i32 = encode_u32("umpires_per_game", config.umpires_per_game)?;
    let max_per_day: Option<i32> = config
        .max_games_per_umpire_per_day
        .map(|v| encode_u32("max_games_per_umpire_per_day", v))
        .transpose()?;
    let duration: i32 = encode_u32("game_duration_minutes", config.game_duration_minutes)?;
    let interval: i32 = encode_u32("slot_interval_minutes", config.slot_interval_minutes)?;
    let lights: Option<String> = config.lights_required_after.map(format_clock);

    diesel::insert_into(season_scheduler_config::table)
        .values((
            season_scheduler_config::season_id.eq(season_id.value()),
            season_scheduler_config::season_start.eq(format_date(config.season_start)),
            season_scheduler_config::season_end.eq(format_date(config.season_end)),
            season_scheduler_config::umpires_per_game.eq(umpires_per_game),
            season_scheduler_config::max_games_per_umpire_per_day.eq(max_per_day),
            season_scheduler_config::game_duration_minutes.eq(duration),
            season_scheduler_config::slot_interval_minutes.eq(interval),
            season_scheduler_config::lights_required_after.eq(&lights),
            season_scheduler_config::timezone.eq(&config.timezone),
        ))
        .on_conflict(season_scheduler_config::season_id)
        .do_update()
        .set((
            season_scheduler_config::season_start
                .eq(excluded(season_scheduler_config::season_start)),
            season_scheduler_config::season_end.eq(excluded(season_scheduler_config::season_end)),
            season_scheduler_config::umpires_per_game
                .eq(excluded(season_scheduler_config::umpires_per_game)),
            season_scheduler_config::max_games_per_umpire_per_day
                .eq(excluded(season_scheduler_config::max_games_per_umpire_per_day)),
            season_scheduler_config::game_duration_minutes
                .eq(excluded(season_scheduler_config::game_duration_minutes)),
            season_scheduler_config::slot_interval_minutes
                .eq(excluded(season_scheduler_config::slot_interval_minutes)),
            season_scheduler_config::lights_required_after
                .eq(excluded(season_scheduler_config::lights_required_after)),
            season_scheduler_config::timezone.eq(excluded(season_scheduler_config::timezone)),
            season_scheduler_config::updated_at.eq(diesel::dsl::sql::<diesel::sql_types::Text>(
                "CURRENT_TIMESTAMP",
            )),
        ))
        .execute(conn)?;

    info!(
        season_id = season_id.value(),
        timezone = %config.timezone,
        "Saved scheduler configuration"
    );
    Ok(())
}

/// Replaces every league selection of a season.
///
/// # Errors
///
/// Returns `PersistenceError::InvalidInput` if a league is listed twice or
/// does not belong to the season, or a database error if a write fails.
pub fn replace_league_selections(
    conn: &mut SqliteConnection,
    season_id: SeasonId,
    selections: &[LeagueSelection],
) -> Result<(), PersistenceError> {
    let season_leagues: BTreeSet<i64> = league_seasons::table
        .filter(league_seasons::season_id.eq(season_id.value()))
        .select(league_seasons::league_season_id)
        .load::<i64>(conn)?
        .into_iter()
        .collect();

    let mut seen: BTreeSet<i64> = BTreeSet::new();
    for selection in selections {
        let id: i64 = selection.league_season_id.value();
        if !season_leagues.contains(&id) {
            return Err(PersistenceError::InvalidInput {
                field: String::from("league_season_id"),
                message: format!("league season {id} is not part of season {season_id}"),
            });
        }
        if !seen.insert(id) {
            return Err(PersistenceError::InvalidInput {
                field: String::from("league_season_id"),
                message: format!("league season {id} is listed more than once"),
            });
        }
    }

    diesel::delete(
        season_league_selections::table
            .filter(season_league_selections::season_id.eq(season_id.value())),
    )
    .execute(conn)?;

    for selection in selections {
        diesel::insert_into(season_league_selections::table)
            .values((
                season_league_selections::season_id.eq(season_id.value()),
                season_league_selections::league_season_id
                    .eq(selection.league_season_id.value()),
                season_league_selections::enabled.eq(i32::from(selection.enabled)),
            ))
            .execute(conn)?;
    }

    info!(
        season_id = season_id.value(),
        count = selections.len(),
        "Replaced league selections"
    );
    Ok(())
}
