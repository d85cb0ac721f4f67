// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

#![deny(
    clippy::pedantic,
    clippy::cargo,
    clippy::nursery,
    clippy::style,
    clippy::correctness,
    clippy::all
)]
#![allow(clippy::multiple_crate_versions)]

use axum::{
    Json, Router,
    extract::{Path, State as AxumState, rejection::JsonRejection},
    http::{HeaderMap, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
};
use clap::Parser;
use league_scheduler::{ApplyRequest, DEFAULT_MAX_CANDIDATES_PER_GAME, SolverOptions};
use league_scheduler_api::{
    ApiError, ApplyResponse, LeagueSelectionsResponse, SchedulerConfigResponse, SolveRequest,
    SolveResponse, UpdateLeagueSelectionsRequest, apply_schedule, get_scheduler_config,
    list_league_selections, prepare_solve, resolve_run_id, solve_schedule,
    update_league_selections, update_scheduler_config,
};
use league_scheduler_domain::{AccountId, ProblemSpec, RunId, SeasonConfig, SeasonId, Violation};
use league_scheduler_persistence::Persistence;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{error, info, warn};

/// Header carrying the client's idempotency key.
const IDEMPOTENCY_KEY_HEADER: &str = "idempotency-key";
/// Legacy spelling of [`IDEMPOTENCY_KEY_HEADER`].
const X_IDEMPOTENCY_KEY_HEADER: &str = "x-idempotency-key";
/// Set to `true` on apply responses answered from the ledger.
const REPLAYED_HEADER: &str = "idempotent-replayed";

/// League Scheduler Server - HTTP server for season scheduling
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to the `SQLite` database file. If not provided, uses in-memory database.
    #[arg(short, long, env = "LEAGUE_SCHEDULER_DATABASE")]
    database: Option<String>,

    /// Address to bind the server to
    #[arg(short, long, env = "LEAGUE_SCHEDULER_BIND", default_value = "127.0.0.1")]
    bind: String,

    /// Port to bind the server to
    #[arg(short, long, env = "LEAGUE_SCHEDULER_PORT", default_value_t = 3000)]
    port: u16,

    /// Upper bound on candidates the solver examines for one game
    #[arg(
        long,
        env = "LEAGUE_SCHEDULER_MAX_CANDIDATES_PER_GAME",
        default_value_t = DEFAULT_MAX_CANDIDATES_PER_GAME
    )]
    max_candidates_per_game: usize,

    /// Log filter used when `RUST_LOG` is not set
    #[arg(long, env = "LEAGUE_SCHEDULER_LOG_LEVEL", default_value = "info")]
    log_level: String,
}

/// Application state shared across handlers.
///
/// Persistence is behind a Mutex; handlers hold it only while reading or
/// writing, never while the solver runs.
#[derive(Clone)]
struct AppState {
    /// The persistence layer.
    persistence: Arc<Mutex<Persistence>>,
    /// Effort bound passed to every solve.
    max_candidates_per_game: usize,
}

/// Error response type.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct ErrorResponse {
    /// Error indicator.
    error: bool,
    /// Machine-readable error code.
    code: String,
    /// Error message.
    message: String,
    /// Broken hard constraints, for stale proposals.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    violations: Vec<Violation>,
}

/// HTTP error wrapper that implements `IntoResponse`.
struct HttpError {
    /// The HTTP status code.
    status: StatusCode,
    /// Machine-readable error code.
    code: String,
    /// The error message.
    message: String,
    /// Broken hard constraints, if any.
    violations: Vec<Violation>,
}

impl IntoResponse for HttpError {
    fn into_response(self) -> Response {
        let body: Json<ErrorResponse> = Json(ErrorResponse {
            error: true,
            code: self.code,
            message: self.message,
            violations: self.violations,
        });
        (self.status, body).into_response()
    }
}

impl From<ApiError> for HttpError {
    fn from(err: ApiError) -> Self {
        let status: StatusCode = match err {
            ApiError::InvalidInput { .. } => StatusCode::BAD_REQUEST,
            ApiError::ResourceNotFound { .. } => StatusCode::NOT_FOUND,
            ApiError::Conflict { .. } => StatusCode::CONFLICT,
            ApiError::Internal { .. } => {
                error!(error = %err, "Internal error");
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };
        Self {
            status,
            code: err.code().to_string(),
            message: err.to_string(),
            violations: err.violations().to_vec(),
        }
    }
}

/// Returns the idempotency key sent by the client, if any.
///
/// `Idempotency-Key` wins over `X-Idempotency-Key` when both are present.
fn idempotency_key(headers: &HeaderMap) -> Result<Option<String>, HttpError> {
    let value: Option<&HeaderValue> = headers
        .get(IDEMPOTENCY_KEY_HEADER)
        .or_else(|| headers.get(X_IDEMPOTENCY_KEY_HEADER));
    value
        .map(|v| {
            v.to_str().map(str::to_string).map_err(|_| HttpError {
                status: StatusCode::BAD_REQUEST,
                code: String::from("invalid_input"),
                message: String::from("Idempotency key header must be visible ASCII"),
                violations: Vec::new(),
            })
        })
        .transpose()
}

/// Unwraps a JSON body, reporting any decoding failure as bad input.
fn json_body<T>(body: Result<Json<T>, JsonRejection>) -> Result<T, HttpError> {
    body.map(|Json(value)| value).map_err(|rejection| {
        warn!(error = %rejection, "Rejected request body");
        HttpError {
            status: StatusCode::BAD_REQUEST,
            code: String::from("invalid_input"),
            message: rejection.body_text(),
            violations: Vec::new(),
        }
    })
}

/// Converts raw path segments into account and season ids.
const fn scope((account_id, season_id): (i64, i64)) -> (AccountId, SeasonId) {
    (AccountId::new(account_id), SeasonId::new(season_id))
}

/// Handler for POST `/api/accounts/{account_id}/scheduler/solve`.
///
/// Builds the problem under the lock, then solves on a blocking thread.
async fn handle_solve(
    AxumState(app_state): AxumState<AppState>,
    Path(account_id): Path<i64>,
    headers: HeaderMap,
    body: Result<Json<SolveRequest>, JsonRejection>,
) -> Result<Json<SolveResponse>, HttpError> {
    let account_id: AccountId = AccountId::new(account_id);
    let req: SolveRequest = json_body(body)?;
    let run_id: RunId = resolve_run_id(idempotency_key(&headers)?.as_deref())?;
    info!(
        account_id = %account_id,
        season_id = %req.season_id,
        run_id = %run_id,
        "Handling solve request"
    );

    let mut persistence = app_state.persistence.lock().await;
    let spec: ProblemSpec = prepare_solve(&mut persistence, account_id, &req)?;
    drop(persistence);

    let options: SolverOptions = req.solver_options(app_state.max_candidates_per_game);
    let response: SolveResponse =
        tokio::task::spawn_blocking(move || solve_schedule(&spec, run_id, options))
            .await
            .map_err(|e| {
                error!(error = %e, "Solver task failed");
                HttpError::from(ApiError::Internal {
                    message: format!("solver task failed: {e}"),
                })
            })??;

    Ok(Json(response))
}

/// Handler for POST `/api/accounts/{account_id}/scheduler/apply`.
///
/// Holds the lock for the whole apply; the persistence layer runs it in a
/// single immediate transaction.
async fn handle_apply(
    AxumState(app_state): AxumState<AppState>,
    Path(account_id): Path<i64>,
    headers: HeaderMap,
    body: Result<Json<ApplyRequest>, JsonRejection>,
) -> Result<Response, HttpError> {
    let account_id: AccountId = AccountId::new(account_id);
    let req: ApplyRequest = json_body(body)?;
    let header_key: Option<String> = idempotency_key(&headers)?;
    info!(
        account_id = %account_id,
        season_id = %req.season_id,
        run_id = %req.run_id,
        mode = req.mode.as_str(),
        assignments = req.assignments.len(),
        "Handling apply request"
    );

    let mut persistence = app_state.persistence.lock().await;
    let result: Result<ApplyResponse, ApiError> =
        apply_schedule(&mut persistence, account_id, req, header_key.as_deref());
    drop(persistence);

    let response: ApplyResponse = result.inspect_err(|e| {
        if matches!(e, ApiError::Conflict { .. }) {
            warn!(account_id = %account_id, error = %e, "Apply refused");
        }
    })?;

    let mut http: Response = Json(response.result).into_response();
    if response.replayed {
        http.headers_mut()
            .insert(REPLAYED_HEADER, HeaderValue::from_static("true"));
    }
    Ok(http)
}

/// Handler for GET `/api/accounts/{account_id}/seasons/{season_id}/scheduler/config`.
async fn handle_get_config(
    AxumState(app_state): AxumState<AppState>,
    Path(ids): Path<(i64, i64)>,
) -> Result<Json<SchedulerConfigResponse>, HttpError> {
    let (account_id, season_id): (AccountId, SeasonId) = scope(ids);
    let mut persistence = app_state.persistence.lock().await;
    let response: SchedulerConfigResponse =
        get_scheduler_config(&mut persistence, account_id, season_id)?;
    drop(persistence);

    Ok(Json(response))
}

/// Handler for PUT `/api/accounts/{account_id}/seasons/{season_id}/scheduler/config`.
async fn handle_put_config(
    AxumState(app_state): AxumState<AppState>,
    Path(ids): Path<(i64, i64)>,
    body: Result<Json<SeasonConfig>, JsonRejection>,
) -> Result<Json<SchedulerConfigResponse>, HttpError> {
    let (account_id, season_id): (AccountId, SeasonId) = scope(ids);
    let config: SeasonConfig = json_body(body)?;
    info!(
        account_id = %account_id,
        season_id = %season_id,
        "Handling scheduler config update"
    );

    let mut persistence = app_state.persistence.lock().await;
    let response: SchedulerConfigResponse =
        update_scheduler_config(&mut persistence, account_id, season_id, config)?;
    drop(persistence);

    Ok(Json(response))
}

/// Handler for GET `/api/accounts/{account_id}/seasons/{season_id}/scheduler/leagues`.
async fn handle_get_leagues(
    AxumState(app_state): AxumState<AppState>,
    Path(ids): Path<(i64, i64)>,
) -> Result<Json<LeagueSelectionsResponse>, HttpError> {
    let (account_id, season_id): (AccountId, SeasonId) = scope(ids);
    let mut persistence = app_state.persistence.lock().await;
    let response: LeagueSelectionsResponse =
        list_league_selections(&mut persistence, account_id, season_id)?;
    drop(persistence);

    Ok(Json(response))
}

/// Handler for PUT `/api/accounts/{account_id}/seasons/{season_id}/scheduler/leagues`.
async fn handle_put_leagues(
    AxumState(app_state): AxumState<AppState>,
    Path(ids): Path<(i64, i64)>,
    body: Result<Json<UpdateLeagueSelectionsRequest>, JsonRejection>,
) -> Result<Json<LeagueSelectionsResponse>, HttpError> {
    let (account_id, season_id): (AccountId, SeasonId) = scope(ids);
    let req: UpdateLeagueSelectionsRequest = json_body(body)?;
    info!(
        account_id = %account_id,
        season_id = %season_id,
        leagues = req.leagues.len(),
        "Handling league selection update"
    );

    let mut persistence = app_state.persistence.lock().await;
    let response: LeagueSelectionsResponse =
        update_league_selections(&mut persistence, account_id, season_id, &req)?;
    drop(persistence);

    Ok(Json(response))
}

/// Builds the application router with all endpoints.
fn build_router(app_state: AppState) -> Router {
    Router::new()
        .route(
            "/api/accounts/{account_id}/scheduler/solve",
            post(handle_solve),
        )
        .route(
            "/api/accounts/{account_id}/scheduler/apply",
            post(handle_apply),
        )
        .route(
            "/api/accounts/{account_id}/seasons/{season_id}/scheduler/config",
            get(handle_get_config).put(handle_put_config),
        )
        .route(
            "/api/accounts/{account_id}/seasons/{season_id}/scheduler/leagues",
            get(handle_get_leagues).put(handle_put_leagues),
        )
        .with_state(app_state)
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Parse command-line arguments
    let args: Args = Args::parse();

    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&args.log_level)),
        )
        .init();

    info!("Initializing League Scheduler Server");

    // Initialize persistence (in-memory or file-based based on CLI argument)
    let persistence: Persistence = if let Some(db_path) = &args.database {
        info!("Using file-based database at: {}", db_path);
        Persistence::new_with_file(db_path)?
    } else {
        info!("Using in-memory database");
        Persistence::new_in_memory()?
    };

    let app_state: AppState = AppState {
        persistence: Arc::new(Mutex::new(persistence)),
        max_candidates_per_game: args.max_candidates_per_game,
    };

    // Build router
    let app: Router = build_router(app_state);

    // Bind to address
    let addr: std::net::SocketAddr = format!("{}:{}", args.bind, args.port).parse()?;
    info!(
        max_candidates_per_game = args.max_candidates_per_game,
        "Server listening on {}", addr
    );

    // Run server
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
