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
    clippy::all,
    clippy::suspicious,
    clippy::complexity,
    clippy::perf,
    clippy::unwrap_used,
    clippy::expect_used
)]

mod apply;
mod builder;
mod error;
mod metrics;
mod ports;
mod solver;

#[cfg(test)]
mod tests;

// Re-export public types and functions
pub use apply::{
    ApplyMode, ApplyOutcome, ApplyRequest, ApplyResult, ApplyStatus, apply_proposal,
    validate_request_shape,
};
pub use builder::{build_problem_spec, effective_selections};
pub use error::{ConflictReason, CoreError};
pub use metrics::{SolveMetrics, UmpireLoad};
pub use ports::{
    ApplyLedger, ApplyUnit, GameRecord, LeagueSeasonRecord, LedgerEntry, NewLedgerEntry,
    ScheduleWriter, SeasonReader, SeasonRecord, TransactionalStore,
};
pub use solver::{
    CandidateOrdering, DEFAULT_MAX_CANDIDATES_PER_GAME, RejectionCount, SolveResult, Solver,
    SolverOptions, UnassignedDiagnostic, solve,
};
