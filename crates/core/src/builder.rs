// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Assembles a [`ProblemSpec`] from the season's persisted state.
//!
//! ## Invariants
//!
//! - Read-only: nothing is written and nothing is cached between calls.
//! - Participating leagues are the enabled league selections. A season
//!   with no selection rows lets every league take part.
//! - With no explicit game filter, the scope is every pending game of the
//!   participating leagues.
//! - Games outside the scope that hold a placement become committed games,
//!   except cancelled ones, which no longer occupy anything.
//! - The returned spec has passed [`validate_problem_spec`].

use crate::error::CoreError;
use crate::ports::{GameRecord, LeagueSeasonRecord, SeasonReader, SeasonRecord};
use league_scheduler_domain::{
    AccountId, Assignment, CommittedGame, GameId, GameStatus, LeagueSeasonId, LeagueSelection,
    ProblemSpec, SeasonConfig, SeasonId, SpecFilters, validate_problem_spec,
};
use std::collections::{BTreeMap, BTreeSet};

/// Builds the problem spec for one solve or apply.
///
/// # Arguments
///
/// * `reader` - Read access to the season's data
/// * `account_id` - The account the request is made for
/// * `season_id` - The season to schedule
/// * `filters` - Optional game and league restrictions
///
/// # Errors
///
/// Returns an error if:
/// - The season does not exist or belongs to another account (`NotFound`)
/// - The season has no scheduler configuration (`Validation`)
/// - A filter names a game or league outside the season (`Validation`)
/// - An explicitly requested game is completed or cancelled, or belongs
///   to a league that does not take part (`Validation`)
/// - The assembled data violates the spec's closure invariant
///   (`Validation`)
pub fn build_problem_spec<R: SeasonReader + ?Sized>(
    reader: &mut R,
    account_id: AccountId,
    season_id: SeasonId,
    filters: &SpecFilters,
) -> Result<ProblemSpec, CoreError> {
    let _season: SeasonRecord = reader
        .find_season(account_id, season_id)?
        .filter(|season| season.account_id == account_id)
        .ok_or_else(|| {
            CoreError::not_found(
                "Season",
                format!("season {season_id} does not exist for account {account_id}"),
            )
        })?;

    let config: SeasonConfig = reader.find_scheduler_config(season_id)?.ok_or_else(|| {
        CoreError::validation(
            "season_config",
            format!("season {season_id} has no scheduler configuration"),
        )
    })?;

    let league_selections: Vec<LeagueSelection> = effective_selections(
        &reader.list_league_seasons(season_id)?,
        reader.list_league_selections(season_id)?,
    );
    let participating: BTreeSet<LeagueSeasonId> =
        participating_leagues(&league_selections, &filters.league_season_ids)?;

    let records: Vec<GameRecord> = reader.list_games(season_id)?;
    let scope: BTreeSet<GameId> = resolve_scope(&records, &participating, &filters.game_ids)?;

    let mut spec: ProblemSpec = ProblemSpec::new(account_id, season_id, config);
    spec.league_selections = league_selections;

    for record in records {
        if scope.contains(&record.game.game_id) {
            if let Some(assignment) = record.assignment {
                spec.current_assignments.push(assignment);
            }
            spec.games.push(record.game);
        } else if let (Some(assignment), false) = (
            record.assignment,
            record.game.status == GameStatus::Cancelled,
        ) {
            spec.committed.push(CommittedGame {
                game: record.game,
                assignment,
            });
        }
    }

    spec.teams = reader.list_teams(season_id)?;
    spec.fields = reader.list_fields(account_id)?;
    spec.umpires = reader.list_umpires(account_id)?;
    spec.field_availability_rules = reader.list_field_availability_rules(account_id)?;
    spec.field_exclusion_dates = reader.list_field_exclusion_dates(account_id)?;
    spec.season_exclusions = reader.list_season_exclusions(season_id)?;
    spec.team_exclusions = reader.list_team_exclusions(season_id)?;
    spec.umpire_exclusions = reader.list_umpire_exclusions(account_id)?;

    sort_spec(&mut spec);
    validate_problem_spec(&spec)?;

    Ok(spec)
}

/// One selection per league of the season. Leagues without a stored row
/// are enabled only when the season has no rows at all.
#[must_use]
pub fn effective_selections(
    leagues: &[LeagueSeasonRecord],
    stored: Vec<LeagueSelection>,
) -> Vec<LeagueSelection> {
    let explicit: bool = !stored.is_empty();
    let stored: BTreeMap<LeagueSeasonId, bool> = stored
        .into_iter()
        .map(|selection| (selection.league_season_id, selection.enabled))
        .collect();

    let mut selections: Vec<LeagueSelection> = leagues
        .iter()
        .map(|league| LeagueSelection {
            league_season_id: league.league_season_id,
            league_name: league.league_name.clone(),
            enabled: stored
                .get(&league.league_season_id)
                .copied()
                .unwrap_or(!explicit),
        })
        .collect();
    selections.sort_by_key(|selection| selection.league_season_id);
    selections
}

fn participating_leagues(
    selections: &[LeagueSelection],
    requested: &[LeagueSeasonId],
) -> Result<BTreeSet<LeagueSeasonId>, CoreError> {
    let known: BTreeSet<LeagueSeasonId> =
        selections.iter().map(|s| s.league_season_id).collect();
    if let Some(unknown) = requested.iter().find(|id| !known.contains(id)) {
        return Err(CoreError::validation(
            "league_season_ids",
            format!("league season {unknown} does not belong to the season"),
        ));
    }

    let requested: BTreeSet<LeagueSeasonId> = requested.iter().copied().collect();
    Ok(selections
        .iter()
        .filter(|s| s.enabled)
        .map(|s| s.league_season_id)
        .filter(|id| requested.is_empty() || requested.contains(id))
        .collect())
}

fn resolve_scope(
    records: &[GameRecord],
    participating: &BTreeSet<LeagueSeasonId>,
    requested: &[GameId],
) -> Result<BTreeSet<GameId>, CoreError> {
    if requested.is_empty() {
        return Ok(records
            .iter()
            .filter(|r| r.game.status.is_pending())
            .filter(|r| participating.contains(&r.game.league_season_id))
            .map(|r| r.game.game_id)
            .collect());
    }

    let by_id: BTreeMap<GameId, &GameRecord> =
        records.iter().map(|r| (r.game.game_id, r)).collect();
    let mut scope: BTreeSet<GameId> = BTreeSet::new();
    for game_id in requested {
        let record: &GameRecord = by_id.get(game_id).copied().ok_or_else(|| {
            CoreError::validation(
                "game_ids",
                format!("game {game_id} does not belong to the season"),
            )
        })?;
        if record.game.status.is_final() {
            return Err(CoreError::validation(
                "game_ids",
                format!(
                    "game {game_id} is {} and cannot be scheduled",
                    record.game.status
                ),
            ));
        }
        if !participating.contains(&record.game.league_season_id) {
            return Err(CoreError::validation(
                "game_ids",
                format!(
                    "game {game_id} belongs to league season {} which is not selected",
                    record.game.league_season_id
                ),
            ));
        }
        scope.insert(*game_id);
    }
    Ok(scope)
}

fn sort_spec(spec: &mut ProblemSpec) {
    spec.teams.sort_by_key(|t| t.team_id);
    spec.fields.sort_by_key(|f| f.field_id);
    spec.umpires.sort_by_key(|u| u.umpire_id);
    spec.games.sort_by_key(|g| g.game_id);
    spec.committed.sort_by_key(|c| c.game.game_id);
    spec.current_assignments
        .sort_by_key(|a: &Assignment| a.game_id);
}
