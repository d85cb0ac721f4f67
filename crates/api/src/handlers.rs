// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! API handler functions for scheduling operations.
//!
//! Handlers are synchronous and take the persistence layer by mutable
//! reference; the server decides how long the lock is held. Solving is
//! split in two so the expensive search never runs under the lock:
//! [`prepare_solve`] reads, [`solve_schedule`] computes.

use league_scheduler::{
    ApplyOutcome, ApplyRequest, SolveResult, Solver, SolverOptions, apply_proposal,
};
use league_scheduler_domain::{
    AccountId, Assignment, IdempotencyKey, LeagueSelection, LocalWindow, ProblemSpec, RunId,
    SeasonConfig, SeasonId, UtcWindow, localize_window,
};
use league_scheduler_persistence::Persistence;
use time::OffsetDateTime;
use tracing::{debug, info};

use crate::error::{
    ApiError, translate_core_error, translate_domain_error, translate_persistence_error,
};
use crate::request_response::{
    ApplyResponse, AssignmentInfo, LeagueSelectionsResponse, SchedulerConfigResponse,
    SolveRequest, SolveResponse, UpdateLeagueSelectionsRequest,
};

/// Generates a run id for a solve that did not name one.
///
/// # Errors
///
/// Returns an error if the generated id is not a valid run id.
pub fn generate_run_id() -> Result<RunId, ApiError> {
    let timestamp: i128 = OffsetDateTime::now_utc().unix_timestamp_nanos();
    RunId::new(&format!("run_{timestamp}_{}", rand::random::<u64>()))
        .map_err(translate_domain_error)
}

/// Resolves the run id of a solve from the idempotency header.
///
/// # Arguments
///
/// * `header` - The `Idempotency-Key` header value, if the client sent one
///
/// # Errors
///
/// Returns an error if the header value is not a valid run id.
pub fn resolve_run_id(header: Option<&str>) -> Result<RunId, ApiError> {
    header.map_or_else(generate_run_id, |value| {
        RunId::new(value.trim()).map_err(translate_domain_error)
    })
}

/// Builds the problem for a solve request.
///
/// This is the only part of a solve that reads persistence.
///
/// # Arguments
///
/// * `persistence` - The persistence layer to read from
/// * `account_id` - The account the request is made for
/// * `request` - The solve request
///
/// # Errors
///
/// Returns an error if:
/// - The season does not exist for the account
/// - The season has no scheduler configuration
/// - A filter names a game or league outside the season
pub fn prepare_solve(
    persistence: &mut Persistence,
    account_id: AccountId,
    request: &SolveRequest,
) -> Result<ProblemSpec, ApiError> {
    let spec: ProblemSpec = persistence
        .build_problem_spec(account_id, request.season_id, &request.constraints)
        .map_err(translate_core_error)?;
    debug!(
        account_id = %account_id,
        season_id = %request.season_id,
        games = spec.games.len(),
        committed = spec.committed.len(),
        "Built problem spec"
    );
    Ok(spec)
}

/// Solves a prepared problem and renders the proposal for clients.
///
/// # Arguments
///
/// * `spec` - The problem built by [`prepare_solve`]
/// * `run_id` - The run id to carry into the proposal
/// * `options` - Solver tuning
///
/// # Errors
///
/// Returns an error if the spec is inconsistent or a placement cannot be
/// rendered in the season's timezone.
pub fn solve_schedule(
    spec: &ProblemSpec,
    run_id: RunId,
    options: SolverOptions,
) -> Result<SolveResponse, ApiError> {
    let result: SolveResult = Solver::new(options)
        .solve(spec, run_id)
        .map_err(translate_core_error)?;

    let assignments: Vec<AssignmentInfo> = result
        .assignments
        .iter()
        .map(|assignment| render_assignment(assignment, &spec.season_config))
        .collect::<Result<Vec<AssignmentInfo>, ApiError>>()?;

    info!(
        run_id = %result.run_id,
        season_id = %spec.season_id,
        scheduled = result.metrics.scheduled_games,
        unassigned = result.metrics.unassigned_games,
        "Solve finished"
    );

    Ok(SolveResponse {
        run_id: result.run_id,
        season_id: spec.season_id,
        assignments,
        unassigned_game_ids: result.unassigned_game_ids,
        diagnostics: result.diagnostics,
        metrics: result.metrics,
    })
}

/// Renders one placement with UTC instants.
///
/// # Errors
///
/// Returns an error if the configured duration yields no window, or the
/// start or end does not exist or is ambiguous in the season's timezone.
pub fn render_assignment(
    assignment: &Assignment,
    config: &SeasonConfig,
) -> Result<AssignmentInfo, ApiError> {
    let window: LocalWindow = assignment
        .window(config.game_duration_minutes)
        .ok_or_else(|| ApiError::InvalidInput {
            field: String::from("start_time"),
            message: format!(
                "game {} starting {} {} has no valid window",
                assignment.game_id, assignment.date, assignment.start_time
            ),
        })?;
    let utc: UtcWindow =
        localize_window(&window, &config.timezone).map_err(translate_domain_error)?;

    Ok(AssignmentInfo {
        game_id: assignment.game_id,
        field_id: assignment.field_id,
        date: assignment.date,
        start_time: assignment.start_time,
        umpire_ids: assignment.umpire_ids.clone(),
        start_utc: utc.start_utc,
        end_utc: utc.end_utc,
    })
}

/// Commits a proposal at most once.
///
/// # Arguments
///
/// * `persistence` - The persistence layer to apply against
/// * `account_id` - The account the request is made for
/// * `request` - The proposal
/// * `header_key` - The idempotency key sent as a header, if any
///
/// # Errors
///
/// Returns an error if:
/// - The header key is invalid or disagrees with the body's key
/// - The request is malformed
/// - The season does not exist for the account
/// - The key was used for a different request, or the proposal breaks a
///   hard constraint against current state
pub fn apply_schedule(
    persistence: &mut Persistence,
    account_id: AccountId,
    mut request: ApplyRequest,
    header_key: Option<&str>,
) -> Result<ApplyResponse, ApiError> {
    if let Some(value) = header_key {
        let key: IdempotencyKey =
            IdempotencyKey::new(value.trim()).map_err(translate_domain_error)?;
        if let Some(existing) = request
            .idempotency_key
            .as_ref()
            .filter(|existing| **existing != key)
        {
            return Err(ApiError::InvalidInput {
                field: String::from("idempotency_key"),
                message: format!("header key '{key}' does not match body key '{existing}'"),
            });
        }
        request.idempotency_key = Some(key);
    }

    let outcome: ApplyOutcome =
        apply_proposal(persistence, account_id, &request).map_err(translate_core_error)?;
    let replayed: bool = outcome.is_replay();

    info!(
        account_id = %account_id,
        season_id = %request.season_id,
        run_id = %request.run_id,
        replayed,
        "Apply finished"
    );

    Ok(ApplyResponse {
        result: outcome.into_result(),
        replayed,
    })
}

/// Returns the scheduler configuration of a season.
///
/// # Errors
///
/// Returns an error if the season does not exist for the account or has
/// no configuration yet.
pub fn get_scheduler_config(
    persistence: &mut Persistence,
    account_id: AccountId,
    season_id: SeasonId,
) -> Result<SchedulerConfigResponse, ApiError> {
    let config: SeasonConfig = persistence
        .get_scheduler_config(account_id, season_id)
        .map_err(translate_persistence_error)?
        .ok_or_else(|| ApiError::ResourceNotFound {
            resource_type: String::from("Scheduler config"),
            message: format!("season {season_id} has no scheduler configuration"),
        })?;

    Ok(SchedulerConfigResponse { season_id, config })
}

/// Validates and stores the scheduler configuration of a season.
///
/// # Errors
///
/// Returns an error if the configuration is invalid or the season does
/// not exist for the account.
pub fn update_scheduler_config(
    persistence: &mut Persistence,
    account_id: AccountId,
    season_id: SeasonId,
    config: SeasonConfig,
) -> Result<SchedulerConfigResponse, ApiError> {
    persistence
        .upsert_scheduler_config(account_id, season_id, &config)
        .map_err(translate_persistence_error)?;

    info!(
        account_id = %account_id,
        season_id = %season_id,
        timezone = %config.timezone,
        "Updated scheduler config"
    );

    Ok(SchedulerConfigResponse { season_id, config })
}

/// Lists one selection per league of a season.
///
/// # Errors
///
/// Returns an error if the season does not exist for the account.
pub fn list_league_selections(
    persistence: &mut Persistence,
    account_id: AccountId,
    season_id: SeasonId,
) -> Result<LeagueSelectionsResponse, ApiError> {
    let leagues: Vec<LeagueSelection> = persistence
        .list_league_selections(account_id, season_id)
        .map_err(translate_persistence_error)?;

    Ok(LeagueSelectionsResponse { season_id, leagues })
}

/// Replaces the league selections of a season.
///
/// # Errors
///
/// Returns an error if a league is listed twice or is not part of the
/// season, or the season does not exist for the account.
pub fn update_league_selections(
    persistence: &mut Persistence,
    account_id: AccountId,
    season_id: SeasonId,
    request: &UpdateLeagueSelectionsRequest,
) -> Result<LeagueSelectionsResponse, ApiError> {
    let leagues: Vec<LeagueSelection> = persistence
        .replace_league_selections(account_id, season_id, &request.leagues)
        .map_err(translate_persistence_error)?;

    info!(
        account_id = %account_id,
        season_id = %season_id,
        enabled = leagues.iter().filter(|l| l.enabled).count(),
        "Replaced league selections"
    );

    Ok(LeagueSelectionsResponse { season_id, leagues })
}
