// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use super::fixtures::{UMP_A, create_test_spec, game, team};
use crate::{
    DomainError, ExclusionWindow, FieldAvailabilityRule, FieldId, ProblemSpec, SeasonConfig,
    UmpireExclusion, UmpireId, WeekdayMask, validate_problem_spec, validate_season_config,
};
use time::macros::{date, datetime, time};

fn create_test_config() -> SeasonConfig {
    SeasonConfig::new(date!(2026 - 04 - 01), date!(2026 - 06 - 30), 1)
}

#[test]
fn test_valid_spec_passes() {
    assert!(validate_problem_spec(&create_test_spec()).is_ok());
}

#[test]
fn test_season_config_accepts_defaults() {
    assert!(validate_season_config(&create_test_config()).is_ok());
}

#[test]
fn test_season_config_rejects_reversed_dates() {
    let config: SeasonConfig = SeasonConfig::new(date!(2026 - 06 - 30), date!(2026 - 04 - 01), 1);

    assert!(matches!(
        validate_season_config(&config),
        Err(DomainError::InvalidDateRange { .. })
    ));
}

#[test]
fn test_season_config_rejects_zero_duration_and_interval() {
    assert!(matches!(
        validate_season_config(&create_test_config().with_game_duration(0)),
        Err(DomainError::InvalidSeasonConfig { .. })
    ));
    assert!(matches!(
        validate_season_config(&create_test_config().with_slot_interval(0)),
        Err(DomainError::InvalidSeasonConfig { .. })
    ));
}

#[test]
fn test_season_config_rejects_zero_daily_limit() {
    let config: SeasonConfig = create_test_config().with_max_games_per_umpire_per_day(Some(0));

    assert!(matches!(
        validate_season_config(&config),
        Err(DomainError::InvalidSeasonConfig { .. })
    ));
}

#[test]
fn test_season_config_rejects_unknown_timezone() {
    let config: SeasonConfig = create_test_config().with_timezone("Mars/Olympus_Mons");

    assert_eq!(
        validate_season_config(&config),
        Err(DomainError::InvalidTimezone(String::from(
            "Mars/Olympus_Mons"
        )))
    );
    assert!(validate_season_config(&create_test_config().with_timezone("America/Chicago")).is_ok());
}

#[test]
fn test_duplicate_team_is_rejected() {
    let mut spec: ProblemSpec = create_test_spec();
    spec.teams.push(team(1));

    assert!(matches!(
        validate_problem_spec(&spec),
        Err(DomainError::DuplicateIdentifier { kind: "team", .. })
    ));
}

#[test]
fn test_game_with_unknown_team_is_rejected() {
    let mut spec: ProblemSpec = create_test_spec();
    spec.games.push(game(4, 1, 77));

    let err: DomainError = validate_problem_spec(&spec).unwrap_err();

    assert_eq!(
        err,
        DomainError::UnknownReference {
            kind: "team",
            id: String::from("77"),
            referenced_by: String::from("game 4"),
        }
    );
}

#[test]
fn test_team_playing_itself_is_rejected() {
    let mut spec: ProblemSpec = create_test_spec();
    spec.games.push(game(4, 2, 2));

    assert!(matches!(
        validate_problem_spec(&spec),
        Err(DomainError::InvalidGame { .. })
    ));
}

#[test]
fn test_rule_for_unknown_field_is_rejected() {
    let mut spec: ProblemSpec = create_test_spec();
    spec.field_availability_rules.push(FieldAvailabilityRule::new(
        FieldId::new(9),
        WeekdayMask::ALL,
        time!(09:00),
        time!(12:00),
    ));

    assert!(matches!(
        validate_problem_spec(&spec),
        Err(DomainError::UnknownReference { kind: "field", .. })
    ));
}

#[test]
fn test_rule_with_empty_time_range_is_rejected() {
    let mut spec: ProblemSpec = create_test_spec();
    spec.field_availability_rules[0].end_time = spec.field_availability_rules[0].start_time;

    assert!(matches!(
        validate_problem_spec(&spec),
        Err(DomainError::InvalidTimeRange { .. })
    ));
}

#[test]
fn test_reversed_exclusion_window_is_rejected() {
    let mut spec: ProblemSpec = create_test_spec();
    spec.umpire_exclusions.push(UmpireExclusion {
        umpire_id: UMP_A,
        window: ExclusionWindow::new(
            datetime!(2026 - 04 - 06 20:00),
            datetime!(2026 - 04 - 06 18:00),
            "backwards",
        ),
    });

    assert!(matches!(
        validate_problem_spec(&spec),
        Err(DomainError::InvalidTimeRange { .. })
    ));
}

#[test]
fn test_exclusion_for_unknown_umpire_is_rejected() {
    let mut spec: ProblemSpec = create_test_spec();
    spec.umpire_exclusions.push(UmpireExclusion {
        umpire_id: UmpireId::new(55),
        window: ExclusionWindow::new(
            datetime!(2026 - 04 - 06 18:00),
            datetime!(2026 - 04 - 06 20:00),
            "away",
        ),
    });

    assert!(matches!(
        validate_problem_spec(&spec),
        Err(DomainError::UnknownReference { kind: "umpire", .. })
    ));
}

#[test]
fn test_game_with_reversed_date_window_is_rejected() {
    let mut spec: ProblemSpec = create_test_spec();
    spec.games[0] = game(1, 1, 2)
        .with_date_window(Some(date!(2026 - 05 - 01)), Some(date!(2026 - 04 - 01)));

    assert!(matches!(
        validate_problem_spec(&spec),
        Err(DomainError::InvalidDateRange { .. })
    ));
}
