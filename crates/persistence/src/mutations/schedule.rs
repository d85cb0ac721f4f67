// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Schedule writes.

use diesel::SqliteConnection;
use diesel::prelude::*;
use league_scheduler_domain::formats::{format_clock, format_date};
use league_scheduler_domain::{Assignment, GameId, GameStatus, SeasonId, UmpireId};
use num_traits::ToPrimitive;
use tracing::{debug, info};

use crate::diesel_schema::{game_umpires, games};
use crate::error::PersistenceError;

/// Writes the placement and crew of each game and marks it scheduled.
///
/// The previous crew of each game is replaced.
///
/// # Arguments
///
/// * `conn` - The database connection
/// * `season_id` - The season every game must belong to
/// * `assignments` - The placements to write
///
/// # Errors
///
/// Returns `PersistenceError::NotFound` if a game is not part of the season,
/// or a database error if a write fails (including foreign key violations
/// for unknown fields or umpires).
pub fn upsert_assignments(
    conn: &mut SqliteConnection,
    season_id: SeasonId,
    assignments: &[Assignment],
) -> Result<(), PersistenceError> {
    for assignment in assignments {
        let rows_affected: usize = diesel::update(games::table)
            .filter(games::game_id.eq(assignment.game_id.value()))
            .filter(games::season_id.eq(season_id.value()))
            .set((
                games::field_id.eq(Some(assignment.field_id.value())),
                games::game_date.eq(Some(format_date(assignment.date))),
                games::start_time.eq(Some(format_clock(assignment.start_time))),
                games::status.eq(GameStatus::Scheduled.as_str()),
            ))
            .execute(conn)?;

        if rows_affected == 0 {
            return Err(PersistenceError::NotFound(format!(
                "game {} in season {season_id}",
                assignment.game_id
            )));
        }

        replace_crew(conn, assignment.game_id, &assignment.umpire_ids)?;
        debug!(
            game_id = assignment.game_id.value(),
            field_id = assignment.field_id.value(),
            "Wrote game placement"
        );
    }

    info!(
        season_id = season_id.value(),
        count = assignments.len(),
        "Upserted assignments"
    );
    Ok(())
}

/// Removes the placement and crew of each game and marks it unscheduled.
///
/// Games outside the season are ignored.
///
/// # Errors
///
/// Returns an error if a write fails.
pub fn clear_assignments(
    conn: &mut SqliteConnection,
    season_id: SeasonId,
    game_ids: &[GameId],
) -> Result<(), PersistenceError> {
    if game_ids.is_empty() {
        return Ok(());
    }

    let ids: Vec<i64> = game_ids.iter().map(|id| id.value()).collect();

    diesel::delete(
        game_umpires::table.filter(
            game_umpires::game_id.eq_any(
                games::table
                    .filter(games::season_id.eq(season_id.value()))
                    .filter(games::game_id.eq_any(&ids))
                    .select(games::game_id),
            ),
        ),
    )
    .execute(conn)?;

    let rows_affected: usize = diesel::update(games::table)
        .filter(games::season_id.eq(season_id.value()))
        .filter(games::game_id.eq_any(&ids))
        .set((
            games::field_id.eq(None::<i64>),
            games::game_date.eq(None::<String>),
            games::start_time.eq(None::<String>),
            games::status.eq(GameStatus::Unscheduled.as_str()),
        ))
        .execute(conn)?;

    info!(
        season_id = season_id.value(),
        cleared = rows_affected,
        "Cleared assignments"
    );
    Ok(())
}

fn replace_crew(
    conn: &mut SqliteConnection,
    game_id: GameId,
    umpire_ids: &[UmpireId],
) -> Result<(), PersistenceError> {
    diesel::delete(game_umpires::table.filter(game_umpires::game_id.eq(game_id.value())))
        .execute(conn)?;

    for (index, umpire_id) in umpire_ids.iter().enumerate() {
        let position: i32 = index.to_i32().ok_or_else(|| PersistenceError::InvalidInput {
            field: String::from("umpire_ids"),
            message: format!("crew of game {game_id} is too large"),
        })?;
        diesel::insert_into(game_umpires::table)
            .values((
                game_umpires::game_id.eq(game_id.value()),
                game_umpires::umpire_id.eq(umpire_id.value()),
                game_umpires::position.eq(position),
            ))
            .execute(conn)?;
    }
    Ok(())
}
