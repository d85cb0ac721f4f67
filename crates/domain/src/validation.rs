// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::error::DomainError;
use crate::formats::{format_clock, format_date, format_local_datetime};
use crate::ids::{FieldId, GameId, TeamId, UmpireId};
use crate::localize::parse_timezone;
use crate::problem::{Assignment, ProblemSpec};
use crate::rules::ExclusionWindow;
use crate::types::{Game, SeasonConfig};
use std::collections::BTreeSet;
use time::Date;

const MINUTES_PER_DAY: u32 = 24 * 60;

/// Validates a season scheduler configuration.
///
/// # Arguments
///
/// * `config` - The configuration to validate
///
/// # Errors
///
/// Returns an error if:
/// - The season starts after it ends
/// - The game duration is zero or longer than one day
/// - The slot interval is zero
/// - The daily umpire limit is zero
/// - The timezone is not a known IANA name
pub fn validate_season_config(config: &SeasonConfig) -> Result<(), DomainError> {
    check_date_range("season", Some(config.season_start), Some(config.season_end))?;

    if config.game_duration_minutes == 0 || config.game_duration_minutes > MINUTES_PER_DAY {
        return Err(DomainError::InvalidSeasonConfig {
            reason: format!(
                "game duration must be between 1 and {MINUTES_PER_DAY} minutes, got {}",
                config.game_duration_minutes
            ),
        });
    }

    if config.slot_interval_minutes == 0 {
        return Err(DomainError::InvalidSeasonConfig {
            reason: String::from("slot interval must be at least 1 minute"),
        });
    }

    if config.max_games_per_umpire_per_day == Some(0) {
        return Err(DomainError::InvalidSeasonConfig {
            reason: String::from("max games per umpire per day must be at least 1 when set"),
        });
    }

    parse_timezone(&config.timezone)?;

    Ok(())
}

/// Validates the closure and time sanity of a problem spec.
///
/// # Arguments
///
/// * `spec` - The spec to validate
///
/// # Errors
///
/// Returns an error if:
/// - The season configuration is invalid
/// - An identifier appears twice in one collection
/// - A game, rule, exclusion or placement references a team, field,
///   umpire or game that is not in the spec
/// - A game has the same home and visitor team
/// - Any date or time range is empty or reversed
pub fn validate_problem_spec(spec: &ProblemSpec) -> Result<(), DomainError> {
    validate_season_config(&spec.season_config)?;

    let teams: BTreeSet<TeamId> = unique_ids("team", spec.teams.iter().map(|t| t.team_id))?;
    let fields: BTreeSet<FieldId> = unique_ids("field", spec.fields.iter().map(|f| f.field_id))?;
    let umpires: BTreeSet<UmpireId> =
        unique_ids("umpire", spec.umpires.iter().map(|u| u.umpire_id))?;
    let games: BTreeSet<GameId> = unique_ids(
        "game",
        spec.games
            .iter()
            .chain(spec.committed.iter().map(|c| &c.game))
            .map(|g| g.game_id),
    )?;

    for field in &spec.fields {
        check_date_range(
            &format!("field {}", field.field_id),
            field.usable_from,
            field.usable_until,
        )?;
    }

    for game in spec.games.iter().chain(spec.committed.iter().map(|c| &c.game)) {
        validate_game(game, &teams)?;
    }

    for committed in &spec.committed {
        if committed.assignment.game_id != committed.game.game_id {
            return Err(DomainError::InvalidGame {
                game_id: committed.game.game_id.to_string(),
                reason: format!(
                    "placement belongs to game {}",
                    committed.assignment.game_id
                ),
            });
        }
        check_placement_refs(&committed.assignment, &fields, &umpires)?;
    }

    for assignment in &spec.current_assignments {
        require("game", assignment.game_id, &games, "current assignment")?;
        check_placement_refs(assignment, &fields, &umpires)?;
    }

    for rule in &spec.field_availability_rules {
        let owner: String = format!("availability rule of field {}", rule.field_id);
        require("field", rule.field_id, &fields, &owner)?;
        if rule.start_time >= rule.end_time {
            return Err(DomainError::InvalidTimeRange {
                context: owner,
                start: format_clock(rule.start_time),
                end: format_clock(rule.end_time),
            });
        }
        check_date_range(&owner, rule.valid_from, rule.valid_until)?;
    }

    for exclusion in &spec.field_exclusion_dates {
        require("field", exclusion.field_id, &fields, "field exclusion date")?;
    }

    for window in &spec.season_exclusions {
        check_window("season exclusion", window)?;
    }

    for exclusion in &spec.team_exclusions {
        require("team", exclusion.team_id, &teams, "team exclusion")?;
        check_window(&format!("exclusion of team {}", exclusion.team_id), &exclusion.window)?;
    }

    for exclusion in &spec.umpire_exclusions {
        require("umpire", exclusion.umpire_id, &umpires, "umpire exclusion")?;
        check_window(
            &format!("exclusion of umpire {}", exclusion.umpire_id),
            &exclusion.window,
        )?;
    }

    Ok(())
}

fn validate_game(game: &Game, teams: &BTreeSet<TeamId>) -> Result<(), DomainError> {
    let owner: String = format!("game {}", game.game_id);
    require("team", game.home_team_id, teams, &owner)?;
    require("team", game.visitor_team_id, teams, &owner)?;
    if game.home_team_id == game.visitor_team_id {
        return Err(DomainError::InvalidGame {
            game_id: game.game_id.to_string(),
            reason: String::from("home and visitor team are the same"),
        });
    }
    check_date_range(&owner, game.earliest_date, game.latest_date)
}

fn check_placement_refs(
    assignment: &Assignment,
    fields: &BTreeSet<FieldId>,
    umpires: &BTreeSet<UmpireId>,
) -> Result<(), DomainError> {
    let owner: String = format!("placement of game {}", assignment.game_id);
    require("field", assignment.field_id, fields, &owner)?;
    for umpire_id in &assignment.umpire_ids {
        require("umpire", *umpire_id, umpires, &owner)?;
    }
    Ok(())
}

fn unique_ids<T: Ord + Copy + std::fmt::Display>(
    kind: &'static str,
    ids: impl Iterator<Item = T>,
) -> Result<BTreeSet<T>, DomainError> {
    let mut seen: BTreeSet<T> = BTreeSet::new();
    for id in ids {
        if !seen.insert(id) {
            return Err(DomainError::DuplicateIdentifier {
                kind,
                id: id.to_string(),
            });
        }
    }
    Ok(seen)
}

fn require<T: Ord + std::fmt::Display>(
    kind: &'static str,
    id: T,
    known: &BTreeSet<T>,
    referenced_by: &str,
) -> Result<(), DomainError> {
    if known.contains(&id) {
        Ok(())
    } else {
        Err(DomainError::UnknownReference {
            kind,
            id: id.to_string(),
            referenced_by: referenced_by.to_string(),
        })
    }
}

fn check_date_range(
    context: &str,
    start: Option<Date>,
    end: Option<Date>,
) -> Result<(), DomainError> {
    match (start, end) {
        (Some(start), Some(end)) if start > end => Err(DomainError::InvalidDateRange {
            context: context.to_string(),
            start: format_date(start),
            end: format_date(end),
        }),
        _ => Ok(()),
    }
}

fn check_window(context: &str, window: &ExclusionWindow) -> Result<(), DomainError> {
    if window.starts_at >= window.ends_at {
        return Err(DomainError::InvalidTimeRange {
            context: context.to_string(),
            start: format_local_datetime(window.starts_at),
            end: format_local_datetime(window.ends_at),
        });
    }
    Ok(())
}
