// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! API request and response data transfer objects.

use league_scheduler::{
    ApplyResult, CandidateOrdering, SolveMetrics, SolverOptions, UnassignedDiagnostic,
};
use league_scheduler_domain::formats::{clock_time, iso_date};
use league_scheduler_domain::{
    FieldId, GameId, LeagueSelection, RunId, SeasonConfig, SeasonId, SpecFilters, UmpireId,
};
use serde::{Deserialize, Serialize};
use time::{Date, Time};

/// Soft preferences for one solve.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SolveObjectives {
    /// How candidates for one game are ranked.
    #[serde(default)]
    pub candidate_ordering: CandidateOrdering,
}

/// API request to propose a schedule for a season.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SolveRequest {
    /// The season to schedule.
    pub season_id: SeasonId,
    /// Narrows the games considered. Empty means every unscheduled game.
    #[serde(default)]
    pub constraints: SpecFilters,
    #[serde(default)]
    pub objectives: Option<SolveObjectives>,
}

impl SolveRequest {
    /// The solver options for this request.
    ///
    /// # Arguments
    ///
    /// * `max_candidates_per_game` - The server-wide effort bound
    #[must_use]
    pub fn solver_options(&self, max_candidates_per_game: usize) -> SolverOptions {
        SolverOptions {
            max_candidates_per_game,
            ordering: self.objectives.unwrap_or_default().candidate_ordering,
        }
    }
}

/// One proposed placement, with its instants rendered in UTC.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssignmentInfo {
    pub game_id: GameId,
    pub field_id: FieldId,
    #[serde(with = "iso_date")]
    pub date: Date,
    #[serde(with = "clock_time")]
    pub start_time: Time,
    pub umpire_ids: Vec<UmpireId>,
    /// RFC 3339 instant the game starts.
    pub start_utc: String,
    /// RFC 3339 instant the game ends.
    pub end_utc: String,
}

/// API response for a solve.
///
/// Nothing is persisted by a solve; the response is a proposal to be
/// committed through an apply carrying the same `run_id`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SolveResponse {
    pub run_id: RunId,
    pub season_id: SeasonId,
    pub assignments: Vec<AssignmentInfo>,
    pub unassigned_game_ids: Vec<GameId>,
    pub diagnostics: Vec<UnassignedDiagnostic>,
    pub metrics: SolveMetrics,
}

/// API response for an apply.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApplyResponse {
    /// What the apply changed, now or when it first ran.
    pub result: ApplyResult,
    /// Whether the result was answered from the ledger.
    pub replayed: bool,
}

/// API response carrying the scheduler configuration of a season.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SchedulerConfigResponse {
    pub season_id: SeasonId,
    pub config: SeasonConfig,
}

/// API request to replace the league selections of a season.
///
/// Leagues of the season that are not listed become disabled.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpdateLeagueSelectionsRequest {
    pub leagues: Vec<LeagueSelection>,
}

/// API response listing one selection per league of a season.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeagueSelectionsResponse {
    pub season_id: SeasonId,
    pub leagues: Vec<LeagueSelection>,
}
