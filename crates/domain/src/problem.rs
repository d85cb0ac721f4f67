// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! The self-contained input of one solve and the placements it produces.
//!
//! ## Invariants
//!
//! - Every team, field, umpire and game referenced anywhere in a
//!   [`ProblemSpec`] exists in the matching top-level collection
//!   (checked by [`crate::validate_problem_spec`]).
//! - `games` holds the games in scope; `committed` holds placed games
//!   outside the scope, which consume capacity but are never moved.

use crate::calendar::LocalWindow;
use crate::formats::{clock_time, iso_date};
use crate::ids::{AccountId, FieldId, GameId, LeagueSeasonId, SeasonId, UmpireId};
use crate::rules::{
    ExclusionWindow, FieldAvailabilityRule, FieldExclusionDate, TeamExclusion, UmpireExclusion,
};
use crate::types::{Field, Game, LeagueSelection, SeasonConfig, Team, Umpire};
use serde::{Deserialize, Serialize};
use time::{Date, Time};

/// One game bound to a field, a date, a start time and a set of umpires.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Assignment {
    pub game_id: GameId,
    pub field_id: FieldId,
    #[serde(with = "iso_date")]
    pub date: Date,
    #[serde(with = "clock_time")]
    pub start_time: Time,
    #[serde(default)]
    pub umpire_ids: Vec<UmpireId>,
}

impl Assignment {
    /// Creates a new `Assignment`.
    #[must_use]
    pub const fn new(
        game_id: GameId,
        field_id: FieldId,
        date: Date,
        start_time: Time,
        umpire_ids: Vec<UmpireId>,
    ) -> Self {
        Self {
            game_id,
            field_id,
            date,
            start_time,
            umpire_ids,
        }
    }

    /// The window the game occupies for a game of `duration_minutes`.
    #[must_use]
    pub fn window(&self, duration_minutes: u32) -> Option<LocalWindow> {
        LocalWindow::for_game(self.date, self.start_time, duration_minutes)
    }
}

/// A placed game outside the current scope.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommittedGame {
    pub game: Game,
    pub assignment: Assignment,
}

/// Narrows which games a solve or apply considers.
///
/// Empty lists mean "no restriction".
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpecFilters {
    #[serde(default)]
    pub game_ids: Vec<GameId>,
    #[serde(default)]
    pub league_season_ids: Vec<LeagueSeasonId>,
}

impl SpecFilters {
    /// Filters restricted to the given games.
    #[must_use]
    pub const fn for_games(game_ids: Vec<GameId>) -> Self {
        Self {
            game_ids,
            league_season_ids: Vec::new(),
        }
    }
}

/// The complete input to one solve.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProblemSpec {
    pub account_id: AccountId,
    pub season_id: SeasonId,
    pub teams: Vec<Team>,
    pub fields: Vec<Field>,
    pub umpires: Vec<Umpire>,
    pub games: Vec<Game>,
    #[serde(default)]
    pub field_availability_rules: Vec<FieldAvailabilityRule>,
    #[serde(default)]
    pub field_exclusion_dates: Vec<FieldExclusionDate>,
    #[serde(default)]
    pub season_exclusions: Vec<ExclusionWindow>,
    #[serde(default)]
    pub team_exclusions: Vec<TeamExclusion>,
    #[serde(default)]
    pub umpire_exclusions: Vec<UmpireExclusion>,
    pub season_config: SeasonConfig,
    #[serde(default)]
    pub league_selections: Vec<LeagueSelection>,
    #[serde(default)]
    pub committed: Vec<CommittedGame>,
    /// Current placements of in-scope games.
    #[serde(default)]
    pub current_assignments: Vec<Assignment>,
}

impl ProblemSpec {
    /// Creates a spec with no games, rules or exclusions.
    #[must_use]
    pub const fn new(account_id: AccountId, season_id: SeasonId, season_config: SeasonConfig) -> Self {
        Self {
            account_id,
            season_id,
            teams: Vec::new(),
            fields: Vec::new(),
            umpires: Vec::new(),
            games: Vec::new(),
            field_availability_rules: Vec::new(),
            field_exclusion_dates: Vec::new(),
            season_exclusions: Vec::new(),
            team_exclusions: Vec::new(),
            umpire_exclusions: Vec::new(),
            season_config,
            league_selections: Vec::new(),
            committed: Vec::new(),
            current_assignments: Vec::new(),
        }
    }

    /// Finds an in-scope game.
    #[must_use]
    pub fn find_game(&self, game_id: GameId) -> Option<&Game> {
        self.games.iter().find(|game| game.game_id == game_id)
    }

    /// Finds a field.
    #[must_use]
    pub fn find_field(&self, field_id: FieldId) -> Option<&Field> {
        self.fields.iter().find(|field| field.field_id == field_id)
    }

    /// Finds an umpire.
    #[must_use]
    pub fn find_umpire(&self, umpire_id: UmpireId) -> Option<&Umpire> {
        self.umpires
            .iter()
            .find(|umpire| umpire.umpire_id == umpire_id)
    }

    /// Current placement of an in-scope game, if any.
    #[must_use]
    pub fn current_assignment(&self, game_id: GameId) -> Option<&Assignment> {
        self.current_assignments
            .iter()
            .find(|assignment| assignment.game_id == game_id)
    }

    /// Identifiers of the in-scope games, in spec order.
    #[must_use]
    pub fn requested_game_ids(&self) -> Vec<GameId> {
        self.games.iter().map(|game| game.game_id).collect()
    }
}
