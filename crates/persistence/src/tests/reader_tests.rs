// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::tests::{
    ACCOUNT, ANNEX_FIELD, LEAGUE, MAIN_FIELD, MONDAY, SEASON, UMP_A, UMP_B, assignment,
    create_test_persistence,
};
use crate::{Persistence, PersistenceError, SqliteUnit};
use league_scheduler::{CoreError, GameRecord, SeasonReader, SeasonRecord};
use league_scheduler_domain::{
    AccountId, Assignment, ExclusionWindow, FieldAvailabilityRule, FieldExclusionDate, GameId,
    GameStatus, ProblemSpec, SeasonId, SpecFilters, TeamExclusion, TeamId, UmpireExclusion,
    WeekdayMask,
};
use time::Weekday;
use time::macros::{date, datetime, time};

#[test]
fn test_find_season_is_scoped_to_the_account() {
    let mut persistence: Persistence = create_test_persistence();
    let mut unit: SqliteUnit<'_> = SqliteUnit::new(&mut persistence.conn);

    let own: Option<SeasonRecord> = unit.find_season(ACCOUNT, SEASON).unwrap();
    let other: Option<SeasonRecord> = unit.find_season(AccountId::new(2), SEASON).unwrap();

    assert_eq!(own.map(|s| s.name), Some(String::from("Spring 2026")));
    assert!(other.is_none());
}

#[test]
fn test_games_load_with_placement_and_crew_order() {
    let mut persistence: Persistence = create_test_persistence();
    let placed: Assignment = assignment(1, MAIN_FIELD, MONDAY, time!(18:00), &[UMP_B, UMP_A]);
    persistence.place_game(SEASON, &placed).unwrap();

    let records: Vec<GameRecord> = persistence.list_games(SEASON).unwrap();

    assert_eq!(records.len(), 3);
    assert_eq!(records[0].game.status, GameStatus::Scheduled);
    assert_eq!(records[0].assignment.as_ref(), Some(&placed));
    assert_eq!(records[1].assignment, None);
    assert_eq!(records[1].game.status, GameStatus::Unscheduled);
}

#[test]
fn test_placing_a_game_of_another_season_is_not_found() {
    let mut persistence: Persistence = create_test_persistence();
    let placed: Assignment = assignment(1, MAIN_FIELD, MONDAY, time!(18:00), &[UMP_A]);

    let result: Result<(), PersistenceError> = persistence.place_game(SeasonId::new(99), &placed);

    assert!(matches!(result, Err(PersistenceError::NotFound(_))));
}

#[test]
fn test_rules_and_exclusions_round_trip() {
    let mut persistence: Persistence = create_test_persistence();
    let seasonal: FieldAvailabilityRule = FieldAvailabilityRule::new(
        ANNEX_FIELD,
        WeekdayMask::from_days(&[Weekday::Saturday]),
        time!(09:00),
        time!(12:30),
    )
    .with_validity(Some(date!(2026 - 05 - 01)), Some(date!(2026 - 05 - 31)));
    let mut disabled: FieldAvailabilityRule = FieldAvailabilityRule::new(
        MAIN_FIELD,
        WeekdayMask::from_days(&[Weekday::Sunday]),
        time!(10:00),
        time!(14:00),
    );
    disabled.enabled = false;
    let closure: FieldExclusionDate = FieldExclusionDate {
        field_id: MAIN_FIELD,
        date: date!(2026 - 04 - 13),
        reason: Some(String::from("Resodding")),
    };
    let holiday: ExclusionWindow = ExclusionWindow::new(
        datetime!(2026 - 05 - 25 00:00),
        datetime!(2026 - 05 - 26 00:00),
        "Memorial Day",
    );
    let team_out: TeamExclusion = TeamExclusion {
        team_id: TeamId::new(2),
        window: ExclusionWindow::new(
            datetime!(2026 - 04 - 10 17:00),
            datetime!(2026 - 04 - 12 22:00),
            "Tournament",
        )
        .disabled(),
    };
    let umpire_out: UmpireExclusion = UmpireExclusion {
        umpire_id: UMP_B,
        window: ExclusionWindow::new(
            datetime!(2026 - 04 - 06 00:00),
            datetime!(2026 - 04 - 09 00:00),
            "Travel",
        ),
    };

    persistence.add_field_availability_rule(&seasonal).unwrap();
    persistence.add_field_availability_rule(&disabled).unwrap();
    persistence.add_field_exclusion_date(&closure).unwrap();
    persistence.add_season_exclusion(SEASON, &holiday).unwrap();
    persistence.add_team_exclusion(&team_out).unwrap();
    persistence.add_umpire_exclusion(&umpire_out).unwrap();

    let mut unit: SqliteUnit<'_> = SqliteUnit::new(&mut persistence.conn);
    let rules: Vec<FieldAvailabilityRule> = unit.list_field_availability_rules(ACCOUNT).unwrap();
    assert_eq!(rules.len(), 4);
    assert_eq!(rules[2], seasonal);
    assert_eq!(rules[3], disabled);
    assert_eq!(unit.list_field_exclusion_dates(ACCOUNT).unwrap(), vec![closure]);
    assert_eq!(unit.list_season_exclusions(SEASON).unwrap(), vec![holiday]);
    assert_eq!(unit.list_team_exclusions(SEASON).unwrap(), vec![team_out]);
    assert_eq!(unit.list_umpire_exclusions(ACCOUNT).unwrap(), vec![umpire_out]);
}

#[test]
fn test_other_accounts_resources_are_not_listed() {
    let mut persistence: Persistence = create_test_persistence();
    let mut unit: SqliteUnit<'_> = SqliteUnit::new(&mut persistence.conn);

    assert!(unit.list_fields(AccountId::new(2)).unwrap().is_empty());
    assert!(unit.list_umpires(AccountId::new(2)).unwrap().is_empty());
    assert!(
        unit.list_field_availability_rules(AccountId::new(2))
            .unwrap()
            .is_empty()
    );
    assert_eq!(unit.list_fields(ACCOUNT).unwrap().len(), 2);
}

#[test]
fn test_build_problem_spec_reads_the_whole_season() {
    let mut persistence: Persistence = create_test_persistence();
    persistence
        .place_game(
            SEASON,
            &assignment(3, ANNEX_FIELD, MONDAY, time!(17:00), &[UMP_A]),
        )
        .unwrap();

    let spec: ProblemSpec = persistence
        .build_problem_spec(ACCOUNT, SEASON, &SpecFilters::default())
        .unwrap();

    let requested: Vec<GameId> = spec.games.iter().map(|g| g.game_id).collect();
    assert_eq!(requested, vec![GameId::new(1), GameId::new(2)]);
    assert_eq!(spec.committed.len(), 1);
    assert_eq!(spec.committed[0].game.game_id, GameId::new(3));
    assert_eq!(spec.teams.len(), 4);
    assert_eq!(spec.fields.len(), 2);
    assert!(!spec.fields[1].has_lights);
    assert_eq!(spec.umpires.len(), 2);
    assert_eq!(spec.league_selections.len(), 1);
    assert_eq!(spec.league_selections[0].league_season_id, LEAGUE);
    assert!(spec.league_selections[0].enabled);
}

#[test]
fn test_build_problem_spec_for_unknown_season_is_not_found() {
    let mut persistence: Persistence = create_test_persistence();

    let result: Result<ProblemSpec, CoreError> =
        persistence.build_problem_spec(ACCOUNT, SeasonId::new(99), &SpecFilters::default());

    assert!(matches!(result, Err(CoreError::NotFound { .. })));
}
