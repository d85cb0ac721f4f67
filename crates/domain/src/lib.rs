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

pub mod calendar;
mod constraints;
mod error;
pub mod formats;
mod ids;
mod localize;
mod problem;
mod rules;
mod types;
mod validation;

#[cfg(test)]
mod tests;

pub use calendar::{LocalWindow, WeekdayMask, parse_weekday, weekday_name};
pub use constraints::{ConstraintModel, Occupancy, Violation, ViolationCode, validate_assignments};
pub use error::DomainError;
pub use ids::{
    AccountId, FieldId, GameId, IdRepr, IdempotencyKey, LeagueSeasonId, MAX_TOKEN_LEN, RunId,
    SeasonId, TeamId, UmpireId,
};
pub use localize::{UtcWindow, localize_window};
pub use problem::{Assignment, CommittedGame, ProblemSpec, SpecFilters};
pub use rules::{
    ExclusionWindow, FieldAvailabilityRule, FieldExclusionDate, TeamExclusion, UmpireExclusion,
};
pub use types::{
    DEFAULT_GAME_DURATION_MINUTES, DEFAULT_SLOT_INTERVAL_MINUTES, DEFAULT_TIMEZONE, Field, Game,
    GameStatus, LeagueSelection, SeasonConfig, Team, Umpire,
};
pub use validation::{validate_problem_spec, validate_season_config};
