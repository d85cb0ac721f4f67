// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::calendar::date_in_range;
use crate::error::DomainError;
use crate::formats::{clock_time, iso_date};
use crate::ids::{FieldId, GameId, LeagueSeasonId, TeamId, UmpireId};
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use time::{Date, Time};

/// Default length of a game, in minutes.
pub const DEFAULT_GAME_DURATION_MINUTES: u32 = 120;
/// Default step between candidate start times, in minutes.
pub const DEFAULT_SLOT_INTERVAL_MINUTES: u32 = 30;
/// Default timezone used to render instants when none is configured.
pub const DEFAULT_TIMEZONE: &str = "UTC";

/// A team taking part in one league season.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Team {
    pub team_id: TeamId,
    pub league_season_id: LeagueSeasonId,
    pub name: String,
}

impl Team {
    /// Creates a new `Team`.
    #[must_use]
    pub fn new(team_id: TeamId, league_season_id: LeagueSeasonId, name: &str) -> Self {
        Self {
            team_id,
            league_season_id,
            name: name.to_string(),
        }
    }
}

/// A playing field owned by the account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Field {
    pub field_id: FieldId,
    pub name: String,
    /// Whether the field can host games after dark.
    #[serde(default)]
    pub has_lights: bool,
    /// First date the field can be used, if restricted.
    #[serde(default, with = "iso_date::option")]
    pub usable_from: Option<Date>,
    /// Last date the field can be used, if restricted.
    #[serde(default, with = "iso_date::option")]
    pub usable_until: Option<Date>,
}

impl Field {
    /// Creates a field with lights and no usable date range.
    #[must_use]
    pub fn new(field_id: FieldId, name: &str) -> Self {
        Self {
            field_id,
            name: name.to_string(),
            has_lights: true,
            usable_from: None,
            usable_until: None,
        }
    }

    /// Sets whether the field has lights.
    #[must_use]
    pub const fn with_lights(mut self, has_lights: bool) -> Self {
        self.has_lights = has_lights;
        self
    }

    /// Restricts the dates the field can be used.
    #[must_use]
    pub const fn with_usable_range(mut self, from: Option<Date>, until: Option<Date>) -> Self {
        self.usable_from = from;
        self.usable_until = until;
        self
    }

    /// Returns whether `date` is inside the usable range.
    #[must_use]
    pub fn is_usable_on(&self, date: Date) -> bool {
        date_in_range(date, self.usable_from, self.usable_until)
    }
}

/// An umpire owned by the account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Umpire {
    pub umpire_id: UmpireId,
    pub name: String,
}

impl Umpire {
    /// Creates a new `Umpire`.
    #[must_use]
    pub fn new(umpire_id: UmpireId, name: &str) -> Self {
        Self {
            umpire_id,
            name: name.to_string(),
        }
    }
}

/// Lifecycle state of a game.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum GameStatus {
    /// Never placed.
    #[default]
    Unscheduled,
    /// Has a placement.
    Scheduled,
    /// Was placed, then called off; needs a new placement.
    Postponed,
    /// Played.
    Completed,
    /// Will not be played.
    Cancelled,
}

impl GameStatus {
    /// Converts this status to its storage representation.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Unscheduled => "unscheduled",
            Self::Scheduled => "scheduled",
            Self::Postponed => "postponed",
            Self::Completed => "completed",
            Self::Cancelled => "cancelled",
        }
    }

    /// Games in a pending state are picked up by a solve with no explicit
    /// game filter.
    #[must_use]
    pub const fn is_pending(&self) -> bool {
        matches!(self, Self::Unscheduled | Self::Postponed)
    }

    /// Final games can never be (re)scheduled.
    #[must_use]
    pub const fn is_final(&self) -> bool {
        matches!(self, Self::Completed | Self::Cancelled)
    }
}

impl FromStr for GameStatus {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "unscheduled" => Ok(Self::Unscheduled),
            "scheduled" => Ok(Self::Scheduled),
            "postponed" => Ok(Self::Postponed),
            "completed" => Ok(Self::Completed),
            "cancelled" => Ok(Self::Cancelled),
            _ => Err(DomainError::InvalidGameStatus(s.to_string())),
        }
    }
}

impl std::fmt::Display for GameStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A game between two teams of the same league season.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Game {
    pub game_id: GameId,
    pub league_season_id: LeagueSeasonId,
    pub home_team_id: TeamId,
    pub visitor_team_id: TeamId,
    /// First date the game may be played on.
    #[serde(default, with = "iso_date::option")]
    pub earliest_date: Option<Date>,
    /// Last date the game may be played on.
    #[serde(default, with = "iso_date::option")]
    pub latest_date: Option<Date>,
    #[serde(default)]
    pub status: GameStatus,
}

impl Game {
    /// Creates an unscheduled game with no date window.
    #[must_use]
    pub const fn new(
        game_id: GameId,
        league_season_id: LeagueSeasonId,
        home_team_id: TeamId,
        visitor_team_id: TeamId,
    ) -> Self {
        Self {
            game_id,
            league_season_id,
            home_team_id,
            visitor_team_id,
            earliest_date: None,
            latest_date: None,
            status: GameStatus::Unscheduled,
        }
    }

    /// Restricts the dates the game may be played on.
    #[must_use]
    pub const fn with_date_window(mut self, earliest: Option<Date>, latest: Option<Date>) -> Self {
        self.earliest_date = earliest;
        self.latest_date = latest;
        self
    }

    /// Sets the game status.
    #[must_use]
    pub const fn with_status(mut self, status: GameStatus) -> Self {
        self.status = status;
        self
    }

    /// Both teams, home first.
    #[must_use]
    pub const fn teams(&self) -> [TeamId; 2] {
        [self.home_team_id, self.visitor_team_id]
    }

    /// Returns whether `date` is inside the game's required window.
    #[must_use]
    pub fn allows_date(&self, date: Date) -> bool {
        date_in_range(date, self.earliest_date, self.latest_date)
    }
}

/// Whether a league season takes part in the season's solves.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeagueSelection {
    pub league_season_id: LeagueSeasonId,
    #[serde(default)]
    pub league_name: String,
    pub enabled: bool,
}

/// Scheduler configuration for one season.
///
/// ## Invariants
///
/// - `season_start <= season_end`
/// - `game_duration_minutes > 0` and at most one day
/// - `slot_interval_minutes > 0`
/// - `max_games_per_umpire_per_day`, when set, is at least 1
/// - `timezone` is an IANA timezone name
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeasonConfig {
    #[serde(with = "iso_date")]
    pub season_start: Date,
    #[serde(with = "iso_date")]
    pub season_end: Date,
    pub umpires_per_game: u32,
    #[serde(default)]
    pub max_games_per_umpire_per_day: Option<u32>,
    #[serde(default = "default_game_duration")]
    pub game_duration_minutes: u32,
    #[serde(default = "default_slot_interval")]
    pub slot_interval_minutes: u32,
    /// Fields without lights may not host a game ending after this time.
    #[serde(default, with = "clock_time::option")]
    pub lights_required_after: Option<Time>,
    #[serde(default = "default_timezone")]
    pub timezone: String,
}

const fn default_game_duration() -> u32 {
    DEFAULT_GAME_DURATION_MINUTES
}

const fn default_slot_interval() -> u32 {
    DEFAULT_SLOT_INTERVAL_MINUTES
}

fn default_timezone() -> String {
    DEFAULT_TIMEZONE.to_string()
}

impl SeasonConfig {
    /// Creates a configuration with default duration, interval and timezone.
    #[must_use]
    pub fn new(season_start: Date, season_end: Date, umpires_per_game: u32) -> Self {
        Self {
            season_start,
            season_end,
            umpires_per_game,
            max_games_per_umpire_per_day: None,
            game_duration_minutes: DEFAULT_GAME_DURATION_MINUTES,
            slot_interval_minutes: DEFAULT_SLOT_INTERVAL_MINUTES,
            lights_required_after: None,
            timezone: default_timezone(),
        }
    }

    /// Caps how many games one umpire may work on one date.
    #[must_use]
    pub const fn with_max_games_per_umpire_per_day(mut self, max: Option<u32>) -> Self {
        self.max_games_per_umpire_per_day = max;
        self
    }

    /// Sets the game length.
    #[must_use]
    pub const fn with_game_duration(mut self, minutes: u32) -> Self {
        self.game_duration_minutes = minutes;
        self
    }

    /// Sets the step between candidate start times.
    #[must_use]
    pub const fn with_slot_interval(mut self, minutes: u32) -> Self {
        self.slot_interval_minutes = minutes;
        self
    }

    /// Sets the time after which unlit fields cannot be used.
    #[must_use]
    pub const fn with_lights_required_after(mut self, time: Option<Time>) -> Self {
        self.lights_required_after = time;
        self
    }

    /// Sets the timezone used to render instants.
    #[must_use]
    pub fn with_timezone(mut self, timezone: &str) -> Self {
        self.timezone = timezone.to_string();
        self
    }

    /// Returns whether `date` falls inside the season bounds.
    #[must_use]
    pub fn contains_date(&self, date: Date) -> bool {
        self.season_start <= date && date <= self.season_end
    }
}
