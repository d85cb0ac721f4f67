// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::tests::{ACCOUNT, LEAGUE, SEASON, create_test_config, create_test_persistence};
use crate::{Persistence, PersistenceError};
use league_scheduler::CoreError;
use league_scheduler_domain::{
    AccountId, Game, GameId, LeagueSeasonId, LeagueSelection, ProblemSpec, SeasonConfig, SeasonId,
    SpecFilters, Team, TeamId,
};
use time::macros::{date, time};

const MINORS: LeagueSeasonId = LeagueSeasonId::new(200);

fn selection(id: LeagueSeasonId, enabled: bool) -> LeagueSelection {
    LeagueSelection {
        league_season_id: id,
        league_name: String::new(),
        enabled,
    }
}

/// Adds a second league with teams 5 and 6 and game 4 between them.
fn add_minor_league(persistence: &mut Persistence) {
    persistence.create_league_season(SEASON, MINORS, "Minors").unwrap();
    persistence
        .create_team(&Team::new(TeamId::new(5), MINORS, "Team 5"))
        .unwrap();
    persistence
        .create_team(&Team::new(TeamId::new(6), MINORS, "Team 6"))
        .unwrap();
    persistence
        .create_game(
            SEASON,
            &Game::new(GameId::new(4), MINORS, TeamId::new(5), TeamId::new(6)),
        )
        .unwrap();
}

#[test]
fn test_scheduler_config_round_trips() {
    let mut persistence: Persistence = create_test_persistence();
    let config: SeasonConfig = SeasonConfig::new(date!(2026 - 03 - 01), date!(2026 - 08 - 15), 2)
        .with_max_games_per_umpire_per_day(Some(2))
        .with_game_duration(90)
        .with_slot_interval(15)
        .with_lights_required_after(Some(time!(19:30)))
        .with_timezone("America/Chicago");

    persistence
        .upsert_scheduler_config(ACCOUNT, SEASON, &config)
        .unwrap();

    assert_eq!(
        persistence.get_scheduler_config(ACCOUNT, SEASON).unwrap(),
        Some(config)
    );
}

#[test]
fn test_upsert_replaces_the_previous_config() {
    let mut persistence: Persistence = create_test_persistence();
    let replacement: SeasonConfig = create_test_config().with_game_duration(60);

    persistence
        .upsert_scheduler_config(ACCOUNT, SEASON, &replacement)
        .unwrap();

    let stored: SeasonConfig = persistence
        .get_scheduler_config(ACCOUNT, SEASON)
        .unwrap()
        .unwrap();
    assert_eq!(stored.game_duration_minutes, 60);
}

#[test]
fn test_invalid_config_is_rejected_and_not_stored() {
    let mut persistence: Persistence = create_test_persistence();
    let backwards: SeasonConfig =
        SeasonConfig::new(date!(2026 - 06 - 30), date!(2026 - 04 - 01), 1);
    let unknown_zone: SeasonConfig = create_test_config().with_timezone("Mars/Olympus_Mons");

    let first: Result<(), PersistenceError> =
        persistence.upsert_scheduler_config(ACCOUNT, SEASON, &backwards);
    let second: Result<(), PersistenceError> =
        persistence.upsert_scheduler_config(ACCOUNT, SEASON, &unknown_zone);

    assert!(matches!(first, Err(PersistenceError::InvalidInput { .. })));
    assert!(matches!(second, Err(PersistenceError::InvalidInput { .. })));
    assert_eq!(
        persistence.get_scheduler_config(ACCOUNT, SEASON).unwrap(),
        Some(create_test_config())
    );
}

#[test]
fn test_config_of_another_accounts_season_is_not_found() {
    let mut persistence: Persistence = create_test_persistence();

    let read: Result<Option<SeasonConfig>, PersistenceError> =
        persistence.get_scheduler_config(AccountId::new(2), SEASON);
    let write: Result<(), PersistenceError> =
        persistence.upsert_scheduler_config(AccountId::new(2), SEASON, &create_test_config());

    assert!(matches!(read, Err(PersistenceError::NotFound(_))));
    assert!(matches!(write, Err(PersistenceError::NotFound(_))));
}

#[test]
fn test_missing_config_blocks_building_a_spec() {
    let mut persistence: Persistence = Persistence::new_in_memory().unwrap();
    persistence.create_account(ACCOUNT, "Riverside").unwrap();
    persistence.create_season(ACCOUNT, SEASON, "Spring").unwrap();

    let result: Result<ProblemSpec, CoreError> =
        persistence.build_problem_spec(ACCOUNT, SEASON, &SpecFilters::default());

    assert!(matches!(result, Err(CoreError::Validation { .. })));
}

#[test]
fn test_every_league_is_enabled_without_stored_selections() {
    let mut persistence: Persistence = create_test_persistence();
    add_minor_league(&mut persistence);

    let selections: Vec<LeagueSelection> =
        persistence.list_league_selections(ACCOUNT, SEASON).unwrap();

    assert_eq!(selections.len(), 2);
    assert!(selections.iter().all(|s| s.enabled));
    assert_eq!(selections[0].league_name, "Majors");
    assert_eq!(selections[1].league_name, "Minors");
}

#[test]
fn test_replaced_selections_narrow_the_solve_scope() {
    let mut persistence: Persistence = create_test_persistence();
    add_minor_league(&mut persistence);

    let selections: Vec<LeagueSelection> = persistence
        .replace_league_selections(ACCOUNT, SEASON, &[selection(MINORS, true)])
        .unwrap();

    assert_eq!(selections.len(), 2);
    assert!(!selections[0].enabled);
    assert!(selections[1].enabled);
    let spec: ProblemSpec = persistence
        .build_problem_spec(ACCOUNT, SEASON, &SpecFilters::default())
        .unwrap();
    let requested: Vec<GameId> = spec.games.iter().map(|g| g.game_id).collect();
    assert_eq!(requested, vec![GameId::new(4)]);
}

#[test]
fn test_selection_of_a_foreign_league_is_rejected() {
    let mut persistence: Persistence = create_test_persistence();

    let result: Result<Vec<LeagueSelection>, PersistenceError> = persistence
        .replace_league_selections(
            ACCOUNT,
            SEASON,
            &[selection(LEAGUE, true), selection(LeagueSeasonId::new(999), true)],
        );

    assert!(matches!(result, Err(PersistenceError::InvalidInput { .. })));
    let stored: Vec<LeagueSelection> =
        persistence.list_league_selections(ACCOUNT, SEASON).unwrap();
    assert!(stored.iter().all(|s| s.enabled));
}

#[test]
fn test_duplicate_selection_is_rejected() {
    let mut persistence: Persistence = create_test_persistence();

    let result: Result<Vec<LeagueSelection>, PersistenceError> = persistence
        .replace_league_selections(
            ACCOUNT,
            SEASON,
            &[selection(LEAGUE, true), selection(LEAGUE, false)],
        );

    assert!(matches!(result, Err(PersistenceError::InvalidInput { .. })));
}

#[test]
fn test_selections_of_unknown_season_are_not_found() {
    let mut persistence: Persistence = create_test_persistence();

    let result: Result<Vec<LeagueSelection>, PersistenceError> =
        persistence.list_league_selections(ACCOUNT, SeasonId::new(99));

    assert!(matches!(result, Err(PersistenceError::NotFound(_))));
}
