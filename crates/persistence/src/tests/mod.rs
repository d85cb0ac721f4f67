// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

#![allow(clippy::expect_used, clippy::unwrap_used)]

mod apply_tests;
mod config_tests;
mod initialization_tests;
mod reader_tests;

use crate::Persistence;
use league_scheduler_domain::{
    AccountId, Assignment, Field, FieldAvailabilityRule, FieldId, Game, GameId, LeagueSeasonId,
    RunId, SeasonConfig, SeasonId, Team, TeamId, Umpire, UmpireId, WeekdayMask,
};
use time::macros::{date, time};
use time::{Date, Time, Weekday};

pub const ACCOUNT: AccountId = AccountId::new(1);
pub const SEASON: SeasonId = SeasonId::new(10);
pub const LEAGUE: LeagueSeasonId = LeagueSeasonId::new(100);
pub const MAIN_FIELD: FieldId = FieldId::new(1);
pub const ANNEX_FIELD: FieldId = FieldId::new(2);
pub const UMP_A: UmpireId = UmpireId::new(1);
pub const UMP_B: UmpireId = UmpireId::new(2);

/// Monday 2026-04-06.
pub const MONDAY: Date = date!(2026 - 04 - 06);
/// Tuesday 2026-04-07.
pub const TUESDAY: Date = date!(2026 - 04 - 07);

pub fn run_id(value: &str) -> RunId {
    RunId::new(value).unwrap()
}

pub fn assignment(
    game_id: i64,
    field_id: FieldId,
    date: Date,
    start: Time,
    umpires: &[UmpireId],
) -> Assignment {
    Assignment::new(GameId::new(game_id), field_id, date, start, umpires.to_vec())
}

pub fn create_test_config() -> SeasonConfig {
    SeasonConfig::new(date!(2026 - 04 - 01), date!(2026 - 06 - 30), 1)
}

/// Seeds a season from April to June with teams 1-4 in one league, a lit
/// main field open Mon/Wed/Fri 18:00-20:00, an unlit annex open weekdays
/// 17:00-22:00, two umpires with one required per game, and games
/// 1 (1 v 2), 2 (3 v 4) and 3 (1 v 3).
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
        .create_field(ACCOUNT, &Field::new(ANNEX_FIELD, "Annex").with_lights(false))
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
