// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Game queries.

use std::collections::BTreeMap;

use diesel::SqliteConnection;
use diesel::prelude::*;
use league_scheduler::GameRecord;
use league_scheduler_domain::{Assignment, Game, GameId, SeasonId, UmpireId};
use tracing::debug;

use crate::data_models::GameRow;
use crate::diesel_schema::{game_umpires, games};
use crate::error::PersistenceError;

/// Lists every game of a season with its current placement.
///
/// Umpires of a placed game are returned in crew position order. A game
/// without placement columns has no assignment even if umpire rows exist.
///
/// # Arguments
///
/// * `conn` - The database connection
/// * `season_id` - The season
///
/// # Errors
///
/// Returns an error if the database query fails or a row does not decode.
pub fn list_games(
    conn: &mut SqliteConnection,
    season_id: SeasonId,
) -> Result<Vec<GameRecord>, PersistenceError> {
    let rows: Vec<GameRow> = games::table
        .filter(games::season_id.eq(season_id.value()))
        .select(GameRow::as_select())
        .order(games::game_id.asc())
        .load(conn)?;

    let crew_rows: Vec<(i64, i64)> = game_umpires::table
        .inner_join(games::table)
        .filter(games::season_id.eq(season_id.value()))
        .select((game_umpires::game_id, game_umpires::umpire_id))
        .order((game_umpires::game_id.asc(), game_umpires::position.asc()))
        .load(conn)?;

    let mut crews: BTreeMap<i64, Vec<UmpireId>> = BTreeMap::new();
    for (game_id, umpire_id) in crew_rows {
        crews
            .entry(game_id)
            .or_default()
            .push(UmpireId::new(umpire_id));
    }

    debug!(
        season_id = season_id.value(),
        games = rows.len(),
        "Loaded season games"
    );

    rows.into_iter()
        .map(|row| {
            let game: Game = row.to_game()?;
            let assignment: Option<Assignment> =
                row.placement()?.map(|(field_id, date, start_time)| {
                    Assignment::new(
                        GameId::new(row.game_id),
                        field_id,
                        date,
                        start_time,
                        crews.remove(&row.game_id).unwrap_or_default(),
                    )
                });
            Ok(GameRecord { game, assignment })
        })
        .collect()
}
