// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Test helper functions and fixtures.

use league_scheduler::{ApplyMode, ApplyRequest};
use league_scheduler_domain::{
    AccountId, Assignment, Field, FieldAvailabilityRule, FieldId, Game, GameId, LeagueSeasonId,
    RunId, SeasonConfig, SeasonId, SpecFilters, Team, TeamId, Umpire, UmpireId, WeekdayMask,
};
use league_scheduler_persistence::Persistence;
use time::macros::{date, time};
use time::{Date, Time, Weekday};

use crate::{AssignmentInfo, SolveRequest};

pub const ACCOUNT: AccountId = AccountId::new(1);
pub const SEASON: SeasonId = SeasonId::new(10);
pub const LEAGUE: LeagueSeasonId = LeagueSeasonId::new(100);
pub const MAIN_FIELD: FieldId = FieldId::new(1);
pub const ANNEX_FIELD: FieldId = FieldId::new(2);
pub const UMP_A: UmpireId = UmpireId::new(1);
pub const UMP_B: UmpireId = UmpireId::new(2);

/// Monday 2026-04-06.
pub const MONDAY: Date = date!(2026 - 04 - 06);

pub fn create_test_config() -> SeasonConfig {
    SeasonConfig::new(date!(2026 - 04 - 01), date!(2026 - 06 - 30), 1)
        .with_timezone("America/New_York")
}

/// Seeds a season from April to June with teams 1-4, a main field open
/// Mon/Wed/Fri 18:00-20:00, an annex open weekdays 17:00-22:00, umpires
/// Alex and Blake, and games 1 (1 v 2), 2 (3 v 4) and 3 (1 v 3).
pub fn create_test_persistence() -> Persistence {
    let mut persistence: Persistence =
        Persistence::new_in_memory().expect("Failed to create in-memory persistence");

    persistence.create_account(ACCOUNT, "Riverside Little League").unwrap();
    persistence.create_season(ACCOUNT, SEASON, "Spring 2026").unwrap();
    persistence.create_league_season(SEASON, LEAGUE, "Majors").unwrap();
    for id in 1..=4 {
        persistence
            .create_team(&Team::new(TeamId::new(id), LEAGUE, &format!("Team {id}")))
            .unwrap();
    }

    persistence
        .create_field(ACCOUNT, &Field::new(MAIN_FIELD, "Main"))
        .unwrap();
    persistence
        .create_field(ACCOUNT, &Field::new(ANNEX_FIELD, "Annex"))
        .unwrap();
    persistence
        .add_field_availability_rule(&FieldAvailabilityRule::new(
            MAIN_FIELD,
            WeekdayMask::from_days(&[Weekday::Monday, Weekday::Wednesday, Weekday::Friday]),
            time!(18:00),
            time!(20:00),
        ))
        .unwrap();
    persistence
        .add_field_availability_rule(&FieldAvailabilityRule::new(
            ANNEX_FIELD,
            WeekdayMask::from_days(&[
                Weekday::Monday,
                Weekday::Tuesday,
                Weekday::Wednesday,
                Weekday::Thursday,
                Weekday::Friday,
            ]),
            time!(17:00),
            time!(22:00),
        ))
        .unwrap();

    persistence
        .create_umpire(ACCOUNT, &Umpire::new(UMP_A, "Alex"))
        .unwrap();
    persistence
        .create_umpire(ACCOUNT, &Umpire::new(UMP_B, "Blake"))
        .unwrap();

    for (id, home, visitor) in [(1, 1, 2), (2, 3, 4), (3, 1, 3)] {
        persistence
            .create_game(
                SEASON,
                &Game::new(
                    GameId::new(id),
                    LEAGUE,
                    TeamId::new(home),
                    TeamId::new(visitor),
                ),
            )
            .unwrap();
    }

    persistence
        .upsert_scheduler_config(ACCOUNT, SEASON, &create_test_config())
        .unwrap();

    persistence
}

pub fn create_solve_request() -> SolveRequest {
    SolveRequest {
        season_id: SEASON,
        constraints: SpecFilters::default(),
        objectives: None,
    }
}

pub fn run_id(value: &str) -> RunId {
    RunId::new(value).unwrap()
}

pub fn assignment(game_id: i64, field_id: FieldId, start: Time, umpire: UmpireId) -> Assignment {
    Assignment::new(GameId::new(game_id), field_id, MONDAY, start, vec![umpire])
}

/// Converts rendered placements back into a proposal.
pub fn to_assignments(infos: &[AssignmentInfo]) -> Vec<Assignment> {
    infos
        .iter()
        .map(|info| {
            Assignment::new(
                info.game_id,
                info.field_id,
                info.date,
                info.start_time,
                info.umpire_ids.clone(),
            )
        })
        .collect()
}

pub fn create_apply_request(
    run: &str,
    mode: ApplyMode,
    assignments: Vec<Assignment>,
) -> ApplyRequest {
    ApplyRequest {
        season_id: SEASON,
        run_id: run_id(run),
        mode,
        assignments,
        game_ids: Vec::new(),
        constraints: SpecFilters::default(),
        idempotency_key: None,
    }
}
