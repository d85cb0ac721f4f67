// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::tests::{
    ACCOUNT, ANNEX_FIELD, MAIN_FIELD, MONDAY, SEASON, TUESDAY, UMP_A, UMP_B, assignment,
    create_test_persistence, run_id,
};
use crate::{Persistence, SqliteUnit};
use league_scheduler::{
    ApplyLedger, ApplyMode, ApplyOutcome, ApplyRequest, ApplyResult, ApplyStatus, ConflictReason,
    CoreError, GameRecord, LedgerEntry, NewLedgerEntry, SolveResult, apply_proposal, solve,
};
use league_scheduler_domain::{
    Assignment, FieldExclusionDate, GameId, GameStatus, IdempotencyKey, ProblemSpec, SpecFilters,
    UmpireId, validate_assignments,
};
use time::macros::time;

fn request(mode: ApplyMode, assignments: Vec<Assignment>, game_ids: &[i64]) -> ApplyRequest {
    ApplyRequest {
        season_id: SEASON,
        run_id: run_id("run-1"),
        mode,
        assignments,
        game_ids: game_ids.iter().copied().map(GameId::new).collect(),
        constraints: SpecFilters::default(),
        idempotency_key: None,
    }
}

fn create_solved_request(persistence: &mut Persistence) -> ApplyRequest {
    let spec: ProblemSpec = persistence
        .build_problem_spec(ACCOUNT, SEASON, &SpecFilters::default())
        .unwrap();
    let solved: SolveResult = solve(&spec, run_id("run-1")).unwrap();
    assert_eq!(solved.assignments.len(), 3);
    assert!(validate_assignments(&spec, &solved.assignments).is_empty());
    request(ApplyMode::FullReplace, solved.assignments, &[])
}

fn key(value: &str) -> IdempotencyKey {
    IdempotencyKey::new(value).unwrap()
}

#[test]
fn test_solved_proposal_applies_and_is_recorded() {
    let mut persistence: Persistence = create_test_persistence();
    let proposal: ApplyRequest = create_solved_request(&mut persistence);

    let outcome: ApplyOutcome = apply_proposal(&mut persistence, ACCOUNT, &proposal).unwrap();

    assert!(!outcome.is_replay());
    let result: ApplyResult = outcome.into_result();
    assert_eq!(result.status, ApplyStatus::Applied);
    assert_eq!(result.created.len(), 3);
    for placed in &proposal.assignments {
        assert_eq!(
            persistence.find_assignment(SEASON, placed.game_id).unwrap().as_ref(),
            Some(placed)
        );
    }
    let entry: LedgerEntry = persistence
        .find_ledger_entry(ACCOUNT, &key("run-1"))
        .unwrap()
        .unwrap();
    assert_eq!(entry.result, result);
    assert_eq!(entry.request_fingerprint, proposal.fingerprint().unwrap());
    assert!(entry.applied_at.ends_with('Z'));
}

#[test]
fn test_second_apply_replays_without_writing_again() {
    let mut persistence: Persistence = create_test_persistence();
    let proposal: ApplyRequest = create_solved_request(&mut persistence);

    let first: ApplyResult = apply_proposal(&mut persistence, ACCOUNT, &proposal)
        .unwrap()
        .into_result();
    // Move game 1 behind the ledger's back; a replay must not put it back.
    persistence
        .place_game(
            SEASON,
            &assignment(1, ANNEX_FIELD, TUESDAY, time!(20:00), &[UMP_B]),
        )
        .unwrap();
    let second: ApplyOutcome = apply_proposal(&mut persistence, ACCOUNT, &proposal).unwrap();

    assert!(second.is_replay());
    assert_eq!(second.into_result(), first);
    let game_1: Assignment = persistence
        .find_assignment(SEASON, GameId::new(1))
        .unwrap()
        .unwrap();
    assert_eq!(game_1.date, TUESDAY);
}

#[test]
fn test_stale_proposal_rolls_back_everything() {
    let mut persistence: Persistence = create_test_persistence();
    let proposal: ApplyRequest = create_solved_request(&mut persistence);
    let closed: Assignment = proposal.assignments[2].clone();
    persistence
        .add_field_exclusion_date(&FieldExclusionDate {
            field_id: closed.field_id,
            date: closed.date,
            reason: None,
        })
        .unwrap();

    let result: Result<ApplyOutcome, CoreError> =
        apply_proposal(&mut persistence, ACCOUNT, &proposal);

    match result {
        Err(CoreError::Conflict { reason, violations }) => {
            assert_eq!(reason, ConflictReason::StaleProposal);
            assert!(violations.iter().any(|v| v.game_id == closed.game_id));
        }
        other => panic!("expected a conflict, got {other:?}"),
    }
    for game_id in 1..=3 {
        assert_eq!(
            persistence.find_assignment(SEASON, GameId::new(game_id)).unwrap(),
            None
        );
    }
    assert!(
        persistence
            .find_ledger_entry(ACCOUNT, &key("run-1"))
            .unwrap()
            .is_none()
    );
}

#[test]
fn test_reused_key_with_a_different_request_is_a_conflict() {
    let mut persistence: Persistence = create_test_persistence();
    let proposal: ApplyRequest = create_solved_request(&mut persistence);
    apply_proposal(&mut persistence, ACCOUNT, &proposal).unwrap();
    let mut different: ApplyRequest = proposal.clone();
    different.assignments.truncate(1);
    different.game_ids = vec![different.assignments[0].game_id];

    let result: Result<ApplyOutcome, CoreError> =
        apply_proposal(&mut persistence, ACCOUNT, &different);

    assert!(matches!(
        result,
        Err(CoreError::Conflict {
            reason: ConflictReason::IdempotencyKeyReused,
            ..
        })
    ));
}

#[test]
fn test_full_replace_updates_creates_and_leaves_other_games_alone() {
    let mut persistence: Persistence = create_test_persistence();
    persistence
        .place_game(
            SEASON,
            &assignment(1, MAIN_FIELD, MONDAY, time!(18:00), &[UMP_A]),
        )
        .unwrap();
    let untouched: Assignment = assignment(3, ANNEX_FIELD, TUESDAY, time!(17:00), &[UMP_B]);
    persistence.place_game(SEASON, &untouched).unwrap();
    let new_g1: Assignment = assignment(1, ANNEX_FIELD, MONDAY, time!(17:00), &[UMP_A]);
    let new_g2: Assignment = assignment(2, MAIN_FIELD, MONDAY, time!(18:00), &[UMP_B]);
    let proposal: ApplyRequest = request(
        ApplyMode::FullReplace,
        vec![new_g1.clone(), new_g2.clone()],
        &[1, 2],
    );

    let result: ApplyResult = apply_proposal(&mut persistence, ACCOUNT, &proposal)
        .unwrap()
        .into_result();

    assert_eq!(result.updated, vec![new_g1.clone()]);
    assert_eq!(result.created, vec![new_g2.clone()]);
    assert!(result.cleared.is_empty());
    let find = |p: &mut Persistence, id: i64| -> Option<Assignment> {
        p.find_assignment(SEASON, GameId::new(id)).unwrap()
    };
    assert_eq!(find(&mut persistence, 1), Some(new_g1));
    assert_eq!(find(&mut persistence, 2), Some(new_g2));
    assert_eq!(find(&mut persistence, 3), Some(untouched));
}

#[test]
fn test_full_replace_clears_scope_games_missing_from_the_proposal() {
    let mut persistence: Persistence = create_test_persistence();
    persistence
        .place_game(
            SEASON,
            &assignment(1, MAIN_FIELD, MONDAY, time!(18:00), &[UMP_A]),
        )
        .unwrap();
    let proposal: ApplyRequest = request(
        ApplyMode::FullReplace,
        vec![assignment(2, ANNEX_FIELD, MONDAY, time!(17:00), &[UMP_B])],
        &[1, 2],
    );

    let result: ApplyResult = apply_proposal(&mut persistence, ACCOUNT, &proposal)
        .unwrap()
        .into_result();

    assert_eq!(result.cleared, vec![GameId::new(1)]);
    let games: Vec<GameRecord> = persistence.list_games(SEASON).unwrap();
    assert_eq!(games[0].assignment, None);
    assert_eq!(games[0].game.status, GameStatus::Unscheduled);
    assert!(games[1].assignment.is_some());
}

#[test]
fn test_recording_a_taken_key_is_ledger_contention() {
    let mut persistence: Persistence = create_test_persistence();
    let proposal: ApplyRequest = create_solved_request(&mut persistence);
    let result: ApplyResult = apply_proposal(&mut persistence, ACCOUNT, &proposal)
        .unwrap()
        .into_result();
    let duplicate: NewLedgerEntry = NewLedgerEntry {
        account_id: ACCOUNT,
        season_id: SEASON,
        idempotency_key: key("run-1"),
        run_id: run_id("run-2"),
        request_fingerprint: String::from("{}"),
        result,
    };

    let mut unit: SqliteUnit<'_> = SqliteUnit::new(&mut persistence.conn);
    let recorded: Result<(), CoreError> = unit.record_ledger_entry(&duplicate);

    assert_eq!(
        recorded,
        Err(CoreError::LedgerContention {
            key: String::from("run-1")
        })
    );
}

#[test]
fn test_unknown_umpire_in_proposal_is_rejected_before_writing() {
    let mut persistence: Persistence = create_test_persistence();
    let proposal: ApplyRequest = request(
        ApplyMode::Incremental,
        vec![assignment(
            1,
            MAIN_FIELD,
            MONDAY,
            time!(18:00),
            &[UmpireId::new(77)],
        )],
        &[],
    );

    let result: Result<ApplyOutcome, CoreError> =
        apply_proposal(&mut persistence, ACCOUNT, &proposal);

    assert!(matches!(result, Err(CoreError::Conflict { .. })));
    assert_eq!(
        persistence.find_assignment(SEASON, GameId::new(1)).unwrap(),
        None
    );
}
