// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::tests::{ACCOUNT, SEASON, create_test_persistence};
use crate::{Persistence, PersistenceError};
use league_scheduler_domain::{Field, FieldId, Game, GameId, LeagueSeasonId, SeasonId, TeamId};

#[test]
fn test_in_memory_database_enforces_foreign_keys() {
    let mut persistence: Persistence = Persistence::new_in_memory().unwrap();

    assert!(persistence.verify_foreign_key_enforcement().is_ok());
}

#[test]
fn test_in_memory_databases_are_isolated() {
    let mut seeded: Persistence = create_test_persistence();
    let mut fresh: Persistence = Persistence::new_in_memory().unwrap();

    assert_eq!(seeded.list_games(SEASON).unwrap().len(), 3);
    assert!(fresh.list_games(SEASON).unwrap().is_empty());
}

#[test]
fn test_field_for_unknown_account_is_rejected() {
    let mut persistence: Persistence = Persistence::new_in_memory().unwrap();

    let result: Result<(), PersistenceError> =
        persistence.create_field(ACCOUNT, &Field::new(FieldId::new(1), "Main"));

    assert!(matches!(result, Err(PersistenceError::DatabaseError(_))));
}

#[test]
fn test_game_for_unknown_season_is_rejected() {
    let mut persistence: Persistence = create_test_persistence();
    let game: Game = Game::new(
        GameId::new(50),
        LeagueSeasonId::new(100),
        TeamId::new(1),
        TeamId::new(2),
    );

    let result: Result<(), PersistenceError> = persistence.create_game(SeasonId::new(99), &game);

    assert!(result.is_err());
}

#[test]
fn test_duplicate_game_id_is_a_unique_violation() {
    let mut persistence: Persistence = create_test_persistence();
    let game: Game = Game::new(
        GameId::new(1),
        LeagueSeasonId::new(100),
        TeamId::new(1),
        TeamId::new(2),
    );

    let result: Result<(), PersistenceError> = persistence.create_game(SEASON, &game);

    assert!(matches!(result, Err(PersistenceError::UniqueViolation(_))));
}

#[test]
fn test_file_database_survives_reopening() {
    let path: std::path::PathBuf = std::env::temp_dir().join(format!(
        "league_scheduler_reopen_{}.db",
        std::process::id()
    ));
    let _ = std::fs::remove_file(&path);

    {
        let mut persistence: Persistence = Persistence::new_with_file(&path).unwrap();
        persistence.create_account(ACCOUNT, "Riverside").unwrap();
        persistence.create_season(ACCOUNT, SEASON, "Spring").unwrap();
    }

    let mut reopened: Persistence = Persistence::new_with_file(&path).unwrap();
    assert!(reopened.verify_foreign_key_enforcement().is_ok());
    assert!(reopened.get_scheduler_config(ACCOUNT, SEASON).unwrap().is_none());

    drop(reopened);
    let _ = std::fs::remove_file(&path);
    let _ = std::fs::remove_file(path.with_extension("db-wal"));
    let _ = std::fs::remove_file(path.with_extension("db-shm"));
}
