// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! API boundary for the league season scheduler.
//!
//! Translates transport-neutral requests into core and persistence calls
//! and every lower-layer error into an [`ApiError`]. HTTP concerns (routes,
//! headers, status codes) belong to the server.

#![deny(
    clippy::pedantic,
    clippy::cargo,
    clippy::nursery,
    clippy::style,
    clippy::correctness,
    clippy::all,
    clippy::unwrap_used,
    clippy::expect_used
)]
#![allow(clippy::multiple_crate_versions)]

mod error;
mod handlers;
mod request_response;

#[cfg(test)]
mod tests;

pub use error::{
    ApiError, translate_core_error, translate_domain_error, translate_persistence_error,
};
pub use handlers::{
    apply_schedule, generate_run_id, get_scheduler_config, list_league_selections,
    prepare_solve, render_assignment, resolve_run_id, solve_schedule, update_league_selections,
    update_scheduler_config,
};
pub use request_response::{
    ApplyResponse, AssignmentInfo, LeagueSelectionsResponse, SchedulerConfigResponse,
    SolveObjectives, SolveRequest, SolveResponse, UpdateLeagueSelectionsRequest,
};
