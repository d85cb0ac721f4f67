// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Transactional, at-most-once commit of a proposal.
//!
//! ## Invariants
//!
//! - The ledger lookup, the re-validation reads, the schedule writes and
//!   the ledger record happen in one store transaction.
//! - A key is applied at most once per account. A retry with the same
//!   request gets the recorded result back; a different request under the
//!   same key is a conflict.
//! - A proposal that breaks any hard constraint against current state is
//!   rejected and nothing is written.
//! - Games outside the scope are never touched.

use crate::builder::build_problem_spec;
use crate::error::{ConflictReason, CoreError};
use crate::ports::{ApplyUnit, LedgerEntry, NewLedgerEntry, TransactionalStore};
use league_scheduler_domain::{
    AccountId, Assignment, GameId, IdempotencyKey, LeagueSeasonId, ProblemSpec, RunId, SeasonId,
    SpecFilters, Violation, validate_assignments,
};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// How much of the schedule an apply owns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ApplyMode {
    /// The scope's placements are replaced: scope games missing from the
    /// proposal lose their placement.
    FullReplace,
    /// Only the games in the proposal are written.
    Incremental,
}

impl ApplyMode {
    /// Converts this mode to its wire representation.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::FullReplace => "full_replace",
            Self::Incremental => "incremental",
        }
    }
}

/// Final state of an applied run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ApplyStatus {
    Applied,
}

/// A proposal to commit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApplyRequest {
    pub season_id: SeasonId,
    pub run_id: RunId,
    pub mode: ApplyMode,
    pub assignments: Vec<Assignment>,
    /// Scope of a full replace. Must be empty or match the assignments
    /// for an incremental apply.
    #[serde(default)]
    pub game_ids: Vec<GameId>,
    #[serde(default)]
    pub constraints: SpecFilters,
    /// Defaults to the run id.
    #[serde(default)]
    pub idempotency_key: Option<IdempotencyKey>,
}

impl ApplyRequest {
    /// The key the ledger records this request under.
    #[must_use]
    pub fn effective_key(&self) -> IdempotencyKey {
        self.idempotency_key
            .clone()
            .unwrap_or_else(|| IdempotencyKey::from(&self.run_id))
    }

    /// Canonical JSON of everything that defines the request's effect.
    ///
    /// Assignment order, scope order and umpire order do not change the
    /// fingerprint.
    ///
    /// # Errors
    ///
    /// Returns `CoreError::Store` if serialization fails.
    pub fn fingerprint(&self) -> Result<String, CoreError> {
        let mut assignments: Vec<Assignment> = self.assignments.clone();
        for assignment in &mut assignments {
            assignment.umpire_ids.sort_unstable();
        }
        assignments.sort_by_key(|a| a.game_id);

        let canonical: Fingerprint<'_> = Fingerprint {
            season_id: self.season_id,
            run_id: &self.run_id,
            mode: self.mode,
            assignments,
            game_ids: sorted(&self.game_ids),
            filter_game_ids: sorted(&self.constraints.game_ids),
            filter_league_season_ids: sorted(&self.constraints.league_season_ids),
        };
        Ok(serde_json::to_string(&canonical)?)
    }

    fn assignment_game_ids(&self) -> BTreeSet<GameId> {
        self.assignments.iter().map(|a| a.game_id).collect()
    }

    /// The filters used to rebuild the spec for this request.
    fn scope_filters(&self) -> SpecFilters {
        let game_ids: Vec<GameId> = match self.mode {
            ApplyMode::FullReplace if !self.game_ids.is_empty() => self.game_ids.clone(),
            ApplyMode::FullReplace => self.constraints.game_ids.clone(),
            ApplyMode::Incremental => self.assignment_game_ids().into_iter().collect(),
        };
        SpecFilters {
            game_ids,
            league_season_ids: self.constraints.league_season_ids.clone(),
        }
    }
}

#[derive(Serialize)]
struct Fingerprint<'a> {
    season_id: SeasonId,
    run_id: &'a RunId,
    mode: ApplyMode,
    assignments: Vec<Assignment>,
    game_ids: Vec<GameId>,
    filter_game_ids: Vec<GameId>,
    filter_league_season_ids: Vec<LeagueSeasonId>,
}

fn sorted<T: Ord + Copy>(values: &[T]) -> Vec<T> {
    values
        .iter()
        .copied()
        .collect::<BTreeSet<T>>()
        .into_iter()
        .collect()
}

/// What an apply changed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApplyResult {
    pub run_id: RunId,
    pub idempotency_key: IdempotencyKey,
    pub status: ApplyStatus,
    pub mode: ApplyMode,
    /// Games that had no placement before.
    pub created: Vec<Assignment>,
    /// Games whose placement was replaced.
    pub updated: Vec<Assignment>,
    /// Games whose placement was removed.
    pub cleared: Vec<GameId>,
}

/// Whether an apply ran now or was answered from the ledger.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApplyOutcome {
    Applied(ApplyResult),
    Replayed(ApplyResult),
}

impl ApplyOutcome {
    /// Returns whether the result came from the ledger.
    #[must_use]
    pub const fn is_replay(&self) -> bool {
        matches!(self, Self::Replayed(_))
    }

    /// The result, however it was obtained.
    #[must_use]
    pub fn into_result(self) -> ApplyResult {
        match self {
            Self::Applied(result) | Self::Replayed(result) => result,
        }
    }
}

/// Commits a proposal at most once.
///
/// # Arguments
///
/// * `store` - The store to read from and write to
/// * `account_id` - The account the request is made for
/// * `request` - The proposal and its scope
///
/// # Returns
///
/// * `ApplyOutcome::Applied` when the proposal was written now
/// * `ApplyOutcome::Replayed` when the same request was applied before
///
/// # Errors
///
/// Returns an error if:
/// - The request is malformed (`Validation`)
/// - The season does not exist for the account (`NotFound`)
/// - The key was used for a different request, or the proposal breaks a
///   hard constraint against current state (`Conflict`)
/// - The store fails (`Store`)
pub fn apply_proposal<S: TransactionalStore>(
    store: &mut S,
    account_id: AccountId,
    request: &ApplyRequest,
) -> Result<ApplyOutcome, CoreError> {
    validate_request_shape(request)?;

    let key: IdempotencyKey = request.effective_key();
    let fingerprint: String = request.fingerprint()?;

    match store.atomically(|unit| apply_in_unit(unit, account_id, request, &key, &fingerprint)) {
        Err(CoreError::LedgerContention { .. }) => {
            // Lost the race: the winner's result is committed by now.
            let entry: LedgerEntry = store
                .atomically(|unit| unit.find_ledger_entry(account_id, &key))?
                .ok_or_else(|| {
                    CoreError::Store(format!(
                        "idempotency key '{key}' was contended but no entry was recorded"
                    ))
                })?;
            replay(entry, &fingerprint)
        }
        outcome => outcome,
    }
}

fn apply_in_unit(
    unit: &mut dyn ApplyUnit,
    account_id: AccountId,
    request: &ApplyRequest,
    key: &IdempotencyKey,
    fingerprint: &str,
) -> Result<ApplyOutcome, CoreError> {
    if let Some(entry) = unit.find_ledger_entry(account_id, key)? {
        return replay(entry, fingerprint);
    }

    let spec: ProblemSpec = build_problem_spec(
        unit,
        account_id,
        request.season_id,
        &request.scope_filters(),
    )?;

    let violations: Vec<Violation> = validate_assignments(&spec, &request.assignments);
    if !violations.is_empty() {
        return Err(CoreError::Conflict {
            reason: ConflictReason::StaleProposal,
            violations,
        });
    }

    let mut assignments: Vec<Assignment> = request.assignments.clone();
    assignments.sort_by_key(|a| a.game_id);
    let proposed: BTreeSet<GameId> = request.assignment_game_ids();

    let cleared: Vec<GameId> = match request.mode {
        ApplyMode::FullReplace => spec
            .games
            .iter()
            .map(|game| game.game_id)
            .filter(|game_id| !proposed.contains(game_id))
            .filter(|game_id| spec.current_assignment(*game_id).is_some())
            .collect(),
        ApplyMode::Incremental => Vec::new(),
    };
    let (updated, created): (Vec<Assignment>, Vec<Assignment>) = assignments
        .iter()
        .cloned()
        .partition(|a| spec.current_assignment(a.game_id).is_some());

    unit.clear_assignments(request.season_id, &cleared)?;
    unit.upsert_assignments(request.season_id, &assignments)?;

    let result: ApplyResult = ApplyResult {
        run_id: request.run_id.clone(),
        idempotency_key: key.clone(),
        status: ApplyStatus::Applied,
        mode: request.mode,
        created,
        updated,
        cleared,
    };

    unit.record_ledger_entry(&NewLedgerEntry {
        account_id,
        season_id: request.season_id,
        idempotency_key: key.clone(),
        run_id: request.run_id.clone(),
        request_fingerprint: fingerprint.to_string(),
        result: result.clone(),
    })?;

    Ok(ApplyOutcome::Applied(result))
}

fn replay(entry: LedgerEntry, fingerprint: &str) -> Result<ApplyOutcome, CoreError> {
    if entry.request_fingerprint != fingerprint {
        return Err(CoreError::Conflict {
            reason: ConflictReason::IdempotencyKeyReused,
            violations: Vec::new(),
        });
    }
    Ok(ApplyOutcome::Replayed(entry.result))
}

/// Checks the request on its own, before touching the store.
///
/// # Errors
///
/// Returns `CoreError::Validation` if:
/// - A game appears twice in the assignments
/// - A full replace with an explicit scope proposes a game outside it
/// - An incremental apply has no assignments, or lists `game_ids` that
///   differ from its assignments
pub fn validate_request_shape(request: &ApplyRequest) -> Result<(), CoreError> {
    let mut seen: BTreeSet<GameId> = BTreeSet::new();
    for assignment in &request.assignments {
        if !seen.insert(assignment.game_id) {
            return Err(CoreError::validation(
                "assignments",
                format!("game {} is assigned more than once", assignment.game_id),
            ));
        }
    }

    match request.mode {
        ApplyMode::FullReplace => {
            let scope: BTreeSet<GameId> = request.scope_filters().game_ids.into_iter().collect();
            let outside: Option<&GameId> = if scope.is_empty() {
                None
            } else {
                seen.iter().find(|game_id| !scope.contains(game_id))
            };
            if let Some(outside) = outside {
                return Err(CoreError::validation(
                    "game_ids",
                    format!("game {outside} is assigned but not in the apply scope"),
                ));
            }
        }
        ApplyMode::Incremental => {
            if request.assignments.is_empty() {
                return Err(CoreError::validation(
                    "assignments",
                    "an incremental apply needs at least one assignment",
                ));
            }
            let listed: BTreeSet<GameId> = request.game_ids.iter().copied().collect();
            if !listed.is_empty() && listed != seen {
                return Err(CoreError::validation(
                    "game_ids",
                    "an incremental apply's game_ids must match its assignments",
                ));
            }
        }
    }

    Ok(())
}
