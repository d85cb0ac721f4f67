// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::tests::helpers::{
    ACCOUNT, ANNEX_FIELD, InMemoryStore, LEAGUE, MAIN_FIELD, MONDAY, SEASON, TUESDAY, UMP_A,
    assignment, create_test_store,
};
use crate::{CoreError, LeagueSeasonRecord, build_problem_spec};
use league_scheduler_domain::{
    AccountId, Game, GameId, GameStatus, LeagueSeasonId, LeagueSelection, ProblemSpec, SeasonId,
    SpecFilters, Team, TeamId,
};
use time::macros::time;

const MINORS: LeagueSeasonId = LeagueSeasonId::new(200);

fn build(store: &mut InMemoryStore, filters: &SpecFilters) -> Result<ProblemSpec, CoreError> {
    build_problem_spec(&mut store.state, ACCOUNT, SEASON, filters)
}

fn game_ids(spec: &ProblemSpec) -> Vec<i64> {
    spec.games.iter().map(|g| g.game_id.value()).collect()
}

/// Adds a second league with teams 5 and 6 and game 4 between them.
fn add_minor_league(store: &mut InMemoryStore) {
    store.state.leagues.push(LeagueSeasonRecord {
        league_season_id: MINORS,
        league_name: String::from("Minors"),
    });
    store.state.teams.push(Team::new(TeamId::new(5), MINORS, "Team 5"));
    store.state.teams.push(Team::new(TeamId::new(6), MINORS, "Team 6"));
    store.add_game(Game::new(
        GameId::new(4),
        MINORS,
        TeamId::new(5),
        TeamId::new(6),
    ));
}

#[test]
fn test_builds_every_pending_game_by_default() {
    let mut store: InMemoryStore = create_test_store();

    let spec: ProblemSpec = build(&mut store, &SpecFilters::default()).unwrap();

    assert_eq!(game_ids(&spec), vec![1, 2, 3]);
    assert!(spec.committed.is_empty());
    assert!(spec.current_assignments.is_empty());
    assert_eq!(spec.teams.len(), 4);
    assert_eq!(spec.fields.len(), 2);
    assert_eq!(spec.umpires.len(), 2);
    assert_eq!(spec.field_availability_rules.len(), 2);
}

#[test]
fn test_unknown_season_is_not_found() {
    let mut store: InMemoryStore = create_test_store();

    let result: Result<ProblemSpec, CoreError> =
        build_problem_spec(&mut store.state, ACCOUNT, SeasonId::new(99), &SpecFilters::default());

    assert!(matches!(result, Err(CoreError::NotFound { .. })));
}

#[test]
fn test_season_of_another_account_is_not_found() {
    let mut store: InMemoryStore = create_test_store();

    let result: Result<ProblemSpec, CoreError> = build_problem_spec(
        &mut store.state,
        AccountId::new(2),
        SEASON,
        &SpecFilters::default(),
    );

    assert!(matches!(result, Err(CoreError::NotFound { .. })));
}

#[test]
fn test_missing_config_is_a_validation_error() {
    let mut store: InMemoryStore = create_test_store();
    store.state.config = None;

    let result: Result<ProblemSpec, CoreError> = build(&mut store, &SpecFilters::default());

    match result {
        Err(CoreError::Validation { field, .. }) => assert_eq!(field, "season_config"),
        other => panic!("expected a validation error, got {other:?}"),
    }
}

#[test]
fn test_scheduled_games_outside_the_scope_are_committed() {
    let mut store: InMemoryStore = create_test_store();
    store.place(assignment(1, MAIN_FIELD, MONDAY, time!(18:00), &[UMP_A]));

    let spec: ProblemSpec = build(&mut store, &SpecFilters::default()).unwrap();

    assert_eq!(game_ids(&spec), vec![2, 3]);
    assert_eq!(spec.committed.len(), 1);
    assert_eq!(spec.committed[0].game.game_id, GameId::new(1));
    assert_eq!(spec.committed[0].assignment.field_id, MAIN_FIELD);
}

#[test]
fn test_explicit_scheduled_game_carries_its_current_assignment() {
    let mut store: InMemoryStore = create_test_store();
    store.place(assignment(1, MAIN_FIELD, MONDAY, time!(18:00), &[UMP_A]));
    store.place(assignment(2, ANNEX_FIELD, TUESDAY, time!(17:00), &[UMP_A]));

    let spec: ProblemSpec =
        build(&mut store, &SpecFilters::for_games(vec![GameId::new(1)])).unwrap();

    assert_eq!(game_ids(&spec), vec![1]);
    assert_eq!(spec.current_assignments.len(), 1);
    assert_eq!(spec.current_assignments[0].game_id, GameId::new(1));
    assert_eq!(spec.committed.len(), 1);
    assert_eq!(spec.committed[0].game.game_id, GameId::new(2));
}

#[test]
fn test_cancelled_games_are_not_committed() {
    let mut store: InMemoryStore = create_test_store();
    store.place(assignment(1, MAIN_FIELD, MONDAY, time!(18:00), &[UMP_A]));
    store
        .state
        .games
        .get_mut(&GameId::new(1))
        .unwrap()
        .game
        .status = GameStatus::Cancelled;

    let spec: ProblemSpec = build(&mut store, &SpecFilters::default()).unwrap();

    assert_eq!(game_ids(&spec), vec![2, 3]);
    assert!(spec.committed.is_empty());
}

#[test]
fn test_postponed_games_are_pending() {
    let mut store: InMemoryStore = create_test_store();
    store
        .state
        .games
        .get_mut(&GameId::new(1))
        .unwrap()
        .game
        .status = GameStatus::Postponed;

    let spec: ProblemSpec = build(&mut store, &SpecFilters::default()).unwrap();

    assert_eq!(game_ids(&spec), vec![1, 2, 3]);
}

#[test]
fn test_unknown_game_filter_is_a_validation_error() {
    let mut store: InMemoryStore = create_test_store();

    let result: Result<ProblemSpec, CoreError> =
        build(&mut store, &SpecFilters::for_games(vec![GameId::new(42)]));

    match result {
        Err(CoreError::Validation { field, .. }) => assert_eq!(field, "game_ids"),
        other => panic!("expected a validation error, got {other:?}"),
    }
}

#[test]
fn test_completed_game_cannot_be_requested() {
    let mut store: InMemoryStore = create_test_store();
    store
        .state
        .games
        .get_mut(&GameId::new(3))
        .unwrap()
        .game
        .status = GameStatus::Completed;

    let result: Result<ProblemSpec, CoreError> =
        build(&mut store, &SpecFilters::for_games(vec![GameId::new(3)]));

    assert!(matches!(result, Err(CoreError::Validation { .. })));
}

#[test]
fn test_without_selection_rows_every_league_takes_part() {
    let mut store: InMemoryStore = create_test_store();
    add_minor_league(&mut store);

    let spec: ProblemSpec = build(&mut store, &SpecFilters::default()).unwrap();

    assert_eq!(game_ids(&spec), vec![1, 2, 3, 4]);
    assert_eq!(spec.league_selections.len(), 2);
    assert!(spec.league_selections.iter().all(|s| s.enabled));
}

#[test]
fn test_leagues_without_a_selection_row_are_left_out() {
    let mut store: InMemoryStore = create_test_store();
    add_minor_league(&mut store);
    store.state.selections = vec![LeagueSelection {
        league_season_id: LEAGUE,
        league_name: String::from("Majors"),
        enabled: true,
    }];

    let spec: ProblemSpec = build(&mut store, &SpecFilters::default()).unwrap();

    assert_eq!(game_ids(&spec), vec![1, 2, 3]);
    let minors: &LeagueSelection = spec
        .league_selections
        .iter()
        .find(|s| s.league_season_id == MINORS)
        .unwrap();
    assert!(!minors.enabled);
}

#[test]
fn test_game_of_a_disabled_league_cannot_be_requested() {
    let mut store: InMemoryStore = create_test_store();
    add_minor_league(&mut store);
    store.state.selections = vec![LeagueSelection {
        league_season_id: MINORS,
        league_name: String::from("Minors"),
        enabled: false,
    }];

    let result: Result<ProblemSpec, CoreError> =
        build(&mut store, &SpecFilters::for_games(vec![GameId::new(4)]));

    assert!(matches!(result, Err(CoreError::Validation { .. })));
}

#[test]
fn test_league_filter_narrows_the_scope() {
    let mut store: InMemoryStore = create_test_store();
    add_minor_league(&mut store);
    let filters: SpecFilters = SpecFilters {
        game_ids: Vec::new(),
        league_season_ids: vec![MINORS],
    };

    let spec: ProblemSpec = build(&mut store, &filters).unwrap();

    assert_eq!(game_ids(&spec), vec![4]);
}

#[test]
fn test_unknown_league_filter_is_a_validation_error() {
    let mut store: InMemoryStore = create_test_store();
    let filters: SpecFilters = SpecFilters {
        game_ids: Vec::new(),
        league_season_ids: vec![LeagueSeasonId::new(999)],
    };

    let result: Result<ProblemSpec, CoreError> = build(&mut store, &filters);

    match result {
        Err(CoreError::Validation { field, .. }) => assert_eq!(field, "league_season_ids"),
        other => panic!("expected a validation error, got {other:?}"),
    }
}

#[test]
fn test_building_does_not_write() {
    let mut store: InMemoryStore = create_test_store();

    let _spec: ProblemSpec = build(&mut store, &SpecFilters::default()).unwrap();

    assert_eq!(store.state.schedule_writes, 0);
    assert!(store.state.ledger.is_empty());
}
