// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Hard constraints over assignments.
//!
//! Every predicate is pure and returns either `Ok(())` or the first
//! [`Violation`] it finds. The solver uses them to prune candidates; the
//! apply path uses [`validate_assignments`] to re-check a proposal against
//! the current state before anything is written.
//!
//! ## Invariants
//!
//! - A game occupies the half-open window `[date + start, + duration)`.
//! - Two bookings conflict when their windows overlap, even when they
//!   start on different dates.
//! - The daily umpire limit counts games by their start date.
//! - Both ends of a game window map to exactly one instant in the season's
//!   timezone, so no placement falls in a DST gap or overlap.
//! - Disabled exclusion windows and disabled availability rules have no
//!   effect.

use crate::calendar::LocalWindow;
use crate::formats::{format_clock, format_date};
use crate::ids::{FieldId, GameId, TeamId, UmpireId};
use crate::localize::{parse_timezone, resolve_window};
use crate::problem::{Assignment, ProblemSpec};
use crate::rules::{FieldAvailabilityRule, TeamExclusion, UmpireExclusion};
use crate::types::{Field, Game};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use time::Date;

/// Machine-readable reason an assignment breaks a hard constraint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ViolationCode {
    UnknownGame,
    UnknownField,
    UnknownUmpire,
    InvalidTime,
    LocalTimeUnresolvable,
    OutsideSeason,
    OutsideGameWindow,
    FieldOutOfRange,
    FieldExcludedDate,
    FieldUnavailable,
    FieldRequiresLights,
    SeasonExcluded,
    TeamExcluded,
    UmpireExcluded,
    UmpireCountMismatch,
    UmpireDuplicate,
    UmpireDailyLimit,
    UmpireDoubleBooked,
    FieldDoubleBooked,
    TeamDoubleBooked,
}

impl ViolationCode {
    /// Converts this code to its wire representation.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::UnknownGame => "unknown_game",
            Self::UnknownField => "unknown_field",
            Self::UnknownUmpire => "unknown_umpire",
            Self::InvalidTime => "invalid_time",
            Self::LocalTimeUnresolvable => "local_time_unresolvable",
            Self::OutsideSeason => "outside_season",
            Self::OutsideGameWindow => "outside_game_window",
            Self::FieldOutOfRange => "field_out_of_range",
            Self::FieldExcludedDate => "field_excluded_date",
            Self::FieldUnavailable => "field_unavailable",
            Self::FieldRequiresLights => "field_requires_lights",
            Self::SeasonExcluded => "season_excluded",
            Self::TeamExcluded => "team_excluded",
            Self::UmpireExcluded => "umpire_excluded",
            Self::UmpireCountMismatch => "umpire_count_mismatch",
            Self::UmpireDuplicate => "umpire_duplicate",
            Self::UmpireDailyLimit => "umpire_daily_limit",
            Self::UmpireDoubleBooked => "umpire_double_booked",
            Self::FieldDoubleBooked => "field_double_booked",
            Self::TeamDoubleBooked => "team_double_booked",
        }
    }
}

impl std::fmt::Display for ViolationCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// One broken hard constraint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Violation {
    pub game_id: GameId,
    pub code: ViolationCode,
    /// Human-readable explanation.
    pub detail: String,
}

impl Violation {
    /// Creates a new `Violation`.
    #[must_use]
    pub fn new(game_id: GameId, code: ViolationCode, detail: impl Into<String>) -> Self {
        Self {
            game_id,
            code,
            detail: detail.into(),
        }
    }
}

impl std::fmt::Display for Violation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "game {}: {} ({})", self.game_id, self.code, self.detail)
    }
}

#[derive(Debug, Clone, Copy)]
struct Booking {
    game_id: GameId,
    window: LocalWindow,
}

/// Incremental index of what is already booked, keyed by start date.
///
/// Shared by the solver (which books as it places games) and by proposal
/// validation (which books committed games first, then the proposal).
#[derive(Debug, Clone, Default)]
pub struct Occupancy {
    fields: BTreeMap<(FieldId, Date), Vec<Booking>>,
    umpires: BTreeMap<(UmpireId, Date), Vec<Booking>>,
    teams: BTreeMap<(TeamId, Date), Vec<Booking>>,
    umpire_totals: BTreeMap<UmpireId, u32>,
}

fn conflict_in<K: Ord + Copy>(
    index: &BTreeMap<(K, Date), Vec<Booking>>,
    key: K,
    window: &LocalWindow,
) -> Option<GameId> {
    // A booking starting the previous day can still run past midnight.
    let first: Date = window.date().previous_day().unwrap_or_else(|| window.date());
    let last: Date = window.end().date();
    index
        .range((key, first)..=(key, last))
        .flat_map(|(_, bookings)| bookings.iter())
        .find(|booking| booking.window.overlaps(window))
        .map(|booking| booking.game_id)
}

fn load_in<K: Ord + Copy>(index: &BTreeMap<(K, Date), Vec<Booking>>, key: K, date: Date) -> usize {
    index.get(&(key, date)).map_or(0, Vec::len)
}

impl Occupancy {
    /// Creates an empty index.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Records `assignment` of `game` occupying `window`.
    pub fn book(&mut self, game: &Game, assignment: &Assignment, window: LocalWindow) {
        let booking: Booking = Booking {
            game_id: game.game_id,
            window,
        };
        let date: Date = window.date();
        self.fields
            .entry((assignment.field_id, date))
            .or_default()
            .push(booking);
        for team_id in game.teams() {
            self.teams.entry((team_id, date)).or_default().push(booking);
        }
        for umpire_id in &assignment.umpire_ids {
            self.umpires
                .entry((*umpire_id, date))
                .or_default()
                .push(booking);
            *self.umpire_totals.entry(*umpire_id).or_insert(0) += 1;
        }
    }

    /// Games booked on `field_id` starting on `date`.
    #[must_use]
    pub fn field_load(&self, field_id: FieldId, date: Date) -> usize {
        load_in(&self.fields, field_id, date)
    }

    /// Games booked for `umpire_id` starting on `date`.
    #[must_use]
    pub fn umpire_load(&self, umpire_id: UmpireId, date: Date) -> usize {
        load_in(&self.umpires, umpire_id, date)
    }

    /// Games booked for `umpire_id` overall.
    #[must_use]
    pub fn umpire_total(&self, umpire_id: UmpireId) -> u32 {
        self.umpire_totals.get(&umpire_id).copied().unwrap_or(0)
    }

    /// A game already on `field_id` overlapping `window`.
    #[must_use]
    pub fn field_conflict(&self, field_id: FieldId, window: &LocalWindow) -> Option<GameId> {
        conflict_in(&self.fields, field_id, window)
    }

    /// A game already played by `team_id` overlapping `window`.
    #[must_use]
    pub fn team_conflict(&self, team_id: TeamId, window: &LocalWindow) -> Option<GameId> {
        conflict_in(&self.teams, team_id, window)
    }

    /// A game already worked by `umpire_id` overlapping `window`.
    #[must_use]
    pub fn umpire_conflict(&self, umpire_id: UmpireId, window: &LocalWindow) -> Option<GameId> {
        conflict_in(&self.umpires, umpire_id, window)
    }
}

/// Lookup tables over one [`ProblemSpec`], built once and shared by every
/// predicate.
#[derive(Debug)]
pub struct ConstraintModel<'a> {
    spec: &'a ProblemSpec,
    /// `None` when the configured timezone is unknown.
    timezone: Option<Tz>,
    games: BTreeMap<GameId, &'a Game>,
    fields: BTreeMap<FieldId, &'a Field>,
    umpires: BTreeSet<UmpireId>,
    rules: BTreeMap<FieldId, Vec<&'a FieldAvailabilityRule>>,
    excluded_dates: BTreeSet<(FieldId, Date)>,
    team_exclusions: BTreeMap<TeamId, Vec<&'a TeamExclusion>>,
    umpire_exclusions: BTreeMap<UmpireId, Vec<&'a UmpireExclusion>>,
}

impl<'a> ConstraintModel<'a> {
    /// Indexes `spec`.
    #[must_use]
    pub fn new(spec: &'a ProblemSpec) -> Self {
        let mut rules: BTreeMap<FieldId, Vec<&'a FieldAvailabilityRule>> = BTreeMap::new();
        for rule in &spec.field_availability_rules {
            rules.entry(rule.field_id).or_default().push(rule);
        }
        let mut team_exclusions: BTreeMap<TeamId, Vec<&'a TeamExclusion>> = BTreeMap::new();
        for exclusion in &spec.team_exclusions {
            team_exclusions
                .entry(exclusion.team_id)
                .or_default()
                .push(exclusion);
        }
        let mut umpire_exclusions: BTreeMap<UmpireId, Vec<&'a UmpireExclusion>> = BTreeMap::new();
        for exclusion in &spec.umpire_exclusions {
            umpire_exclusions
                .entry(exclusion.umpire_id)
                .or_default()
                .push(exclusion);
        }

        Self {
            spec,
            timezone: parse_timezone(&spec.season_config.timezone).ok(),
            games: spec.games.iter().map(|g| (g.game_id, g)).collect(),
            fields: spec.fields.iter().map(|f| (f.field_id, f)).collect(),
            umpires: spec.umpires.iter().map(|u| u.umpire_id).collect(),
            rules,
            excluded_dates: spec
                .field_exclusion_dates
                .iter()
                .map(|e| (e.field_id, e.date))
                .collect(),
            team_exclusions,
            umpire_exclusions,
        }
    }

    /// The indexed spec.
    #[must_use]
    pub const fn spec(&self) -> &'a ProblemSpec {
        self.spec
    }

    /// Finds an in-scope game.
    #[must_use]
    pub fn game(&self, game_id: GameId) -> Option<&'a Game> {
        self.games.get(&game_id).copied()
    }

    /// Finds a field.
    #[must_use]
    pub fn field(&self, field_id: FieldId) -> Option<&'a Field> {
        self.fields.get(&field_id).copied()
    }

    /// Enabled and disabled rules for a field, in spec order.
    #[must_use]
    pub fn rules_for(&self, field_id: FieldId) -> &[&'a FieldAvailabilityRule] {
        self.rules
            .get(&field_id)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    /// Returns whether `field_id` is closed on `date`.
    #[must_use]
    pub fn is_excluded_date(&self, field_id: FieldId, date: Date) -> bool {
        self.excluded_dates.contains(&(field_id, date))
    }

    /// The window an assignment occupies.
    ///
    /// # Errors
    ///
    /// Returns `invalid_time` when the window cannot be computed.
    pub fn game_window(&self, assignment: &Assignment) -> Result<LocalWindow, Violation> {
        assignment
            .window(self.spec.season_config.game_duration_minutes)
            .ok_or_else(|| {
                Violation::new(
                    assignment.game_id,
                    ViolationCode::InvalidTime,
                    format!(
                        "cannot compute a game window starting {} {}",
                        format_date(assignment.date),
                        format_clock(assignment.start_time)
                    ),
                )
            })
    }

    /// Checks that the assignment names a known game, field and umpires.
    ///
    /// # Errors
    ///
    /// Returns the first unknown reference.
    pub fn check_references(&self, assignment: &Assignment) -> Result<(), Violation> {
        if !self.games.contains_key(&assignment.game_id) {
            return Err(Violation::new(
                assignment.game_id,
                ViolationCode::UnknownGame,
                format!("game {} is not in scope", assignment.game_id),
            ));
        }
        if !self.fields.contains_key(&assignment.field_id) {
            return Err(Violation::new(
                assignment.game_id,
                ViolationCode::UnknownField,
                format!("field {} does not exist", assignment.field_id),
            ));
        }
        if let Some(umpire_id) = assignment
            .umpire_ids
            .iter()
            .find(|umpire_id| !self.umpires.contains(umpire_id))
        {
            return Err(Violation::new(
                assignment.game_id,
                ViolationCode::UnknownUmpire,
                format!("umpire {umpire_id} does not exist"),
            ));
        }
        Ok(())
    }

    /// Checks the season bounds and the game's own date window.
    ///
    /// # Errors
    ///
    /// Returns `outside_season` or `outside_game_window`.
    pub fn check_calendar(&self, game: &Game, window: &LocalWindow) -> Result<(), Violation> {
        let date: Date = window.date();
        let config = &self.spec.season_config;
        if !config.contains_date(date) {
            return Err(Violation::new(
                game.game_id,
                ViolationCode::OutsideSeason,
                format!(
                    "{} is outside the season {}..{}",
                    format_date(date),
                    format_date(config.season_start),
                    format_date(config.season_end)
                ),
            ));
        }
        if !game.allows_date(date) {
            return Err(Violation::new(
                game.game_id,
                ViolationCode::OutsideGameWindow,
                format!("{} is outside the game's required dates", format_date(date)),
            ));
        }
        Ok(())
    }

    /// Checks that the window starts and ends at real, unambiguous instants
    /// in the season's timezone.
    ///
    /// # Errors
    ///
    /// Returns `local_time_unresolvable`.
    pub fn check_local_time(&self, game_id: GameId, window: &LocalWindow) -> Result<(), Violation> {
        let timezone: &str = &self.spec.season_config.timezone;
        let Some(tz) = self.timezone else {
            return Err(Violation::new(
                game_id,
                ViolationCode::LocalTimeUnresolvable,
                format!("unknown timezone '{timezone}'"),
            ));
        };
        resolve_window(window, tz).map(|_| ()).map_err(|_| {
            Violation::new(
                game_id,
                ViolationCode::LocalTimeUnresolvable,
                format!("{window} falls in a DST transition in {timezone}"),
            )
        })
    }

    /// Checks that the field is open for the whole window.
    ///
    /// # Errors
    ///
    /// Returns `field_out_of_range`, `field_excluded_date`,
    /// `field_unavailable` or `field_requires_lights`.
    pub fn check_field_availability(
        &self,
        game_id: GameId,
        field: &Field,
        window: &LocalWindow,
    ) -> Result<(), Violation> {
        let date: Date = window.date();
        if !field.is_usable_on(date) {
            return Err(Violation::new(
                game_id,
                ViolationCode::FieldOutOfRange,
                format!("field {} is not usable on {}", field.name, format_date(date)),
            ));
        }
        if self.is_excluded_date(field.field_id, date) {
            return Err(Violation::new(
                game_id,
                ViolationCode::FieldExcludedDate,
                format!("field {} is closed on {}", field.name, format_date(date)),
            ));
        }
        if !self
            .rules_for(field.field_id)
            .iter()
            .any(|rule| rule.admits(window))
        {
            return Err(Violation::new(
                game_id,
                ViolationCode::FieldUnavailable,
                format!("field {} has no availability covering {window}", field.name),
            ));
        }
        match self.spec.season_config.lights_required_after {
            Some(cutoff)
                if !field.has_lights
                    && (window.end().date() != date || window.end().time() > cutoff) =>
            {
                Err(Violation::new(
                    game_id,
                    ViolationCode::FieldRequiresLights,
                    format!(
                        "field {} has no lights and the game ends after {}",
                        field.name,
                        format_clock(cutoff)
                    ),
                ))
            }
            _ => Ok(()),
        }
    }

    /// Checks season and team exclusion windows.
    ///
    /// # Errors
    ///
    /// Returns `season_excluded` or `team_excluded`.
    pub fn check_game_exclusions(&self, game: &Game, window: &LocalWindow) -> Result<(), Violation> {
        if let Some(exclusion) = self
            .spec
            .season_exclusions
            .iter()
            .find(|exclusion| exclusion.blocks(window))
        {
            return Err(Violation::new(
                game.game_id,
                ViolationCode::SeasonExcluded,
                format!("season is excluded: {}", exclusion.note),
            ));
        }
        for team_id in game.teams() {
            if let Some(exclusion) = self
                .team_exclusions
                .get(&team_id)
                .and_then(|list| list.iter().find(|e| e.window.blocks(window)))
            {
                return Err(Violation::new(
                    game.game_id,
                    ViolationCode::TeamExcluded,
                    format!("team {team_id} is excluded: {}", exclusion.window.note),
                ));
            }
        }
        Ok(())
    }

    /// Returns the exclusion blocking `umpire_id` during `window`, if any.
    #[must_use]
    pub fn umpire_exclusion(
        &self,
        umpire_id: UmpireId,
        window: &LocalWindow,
    ) -> Option<&'a UmpireExclusion> {
        self.umpire_exclusions
            .get(&umpire_id)
            .and_then(|list| list.iter().find(|e| e.window.blocks(window)).copied())
    }

    /// Checks umpire exclusion windows for every assigned umpire.
    ///
    /// # Errors
    ///
    /// Returns `umpire_excluded`.
    pub fn check_umpire_exclusions(
        &self,
        assignment: &Assignment,
        window: &LocalWindow,
    ) -> Result<(), Violation> {
        for umpire_id in &assignment.umpire_ids {
            if let Some(exclusion) = self.umpire_exclusion(*umpire_id, window) {
                return Err(Violation::new(
                    assignment.game_id,
                    ViolationCode::UmpireExcluded,
                    format!("umpire {umpire_id} is excluded: {}", exclusion.window.note),
                ));
            }
        }
        Ok(())
    }

    /// Checks that exactly `umpires_per_game` distinct umpires are assigned.
    ///
    /// # Errors
    ///
    /// Returns `umpire_count_mismatch` or `umpire_duplicate`.
    pub fn check_umpire_count(&self, assignment: &Assignment) -> Result<(), Violation> {
        let required: u32 = self.spec.season_config.umpires_per_game;
        if u32::try_from(assignment.umpire_ids.len()).ok() != Some(required) {
            return Err(Violation::new(
                assignment.game_id,
                ViolationCode::UmpireCountMismatch,
                format!(
                    "{} umpires assigned, {required} required",
                    assignment.umpire_ids.len()
                ),
            ));
        }
        let mut seen: BTreeSet<UmpireId> = BTreeSet::new();
        for umpire_id in &assignment.umpire_ids {
            if !seen.insert(*umpire_id) {
                return Err(Violation::new(
                    assignment.game_id,
                    ViolationCode::UmpireDuplicate,
                    format!("umpire {umpire_id} is assigned twice"),
                ));
            }
        }
        Ok(())
    }

    /// Returns whether `umpire_id` can still take a game on `window`'s
    /// date under the daily limit.
    #[must_use]
    pub fn umpire_has_daily_capacity(
        &self,
        occupancy: &Occupancy,
        umpire_id: UmpireId,
        date: Date,
    ) -> bool {
        self.spec
            .season_config
            .max_games_per_umpire_per_day
            .is_none_or(|max| {
                u32::try_from(occupancy.umpire_load(umpire_id, date)).unwrap_or(u32::MAX) < max
            })
    }

    /// Checks field and team exclusivity against what is already booked.
    ///
    /// # Errors
    ///
    /// Returns `field_double_booked` or `team_double_booked`.
    pub fn check_slot_free(
        &self,
        occupancy: &Occupancy,
        game: &Game,
        field_id: FieldId,
        window: &LocalWindow,
    ) -> Result<(), Violation> {
        if let Some(other) = occupancy.field_conflict(field_id, window) {
            return Err(Violation::new(
                game.game_id,
                ViolationCode::FieldDoubleBooked,
                format!("field {field_id} is already used by game {other} during {window}"),
            ));
        }
        for team_id in game.teams() {
            if let Some(other) = occupancy.team_conflict(team_id, window) {
                return Err(Violation::new(
                    game.game_id,
                    ViolationCode::TeamDoubleBooked,
                    format!("team {team_id} already plays game {other} during {window}"),
                ));
            }
        }
        Ok(())
    }

    /// Checks umpire overlap and the daily limit against what is already
    /// booked.
    ///
    /// # Errors
    ///
    /// Returns `umpire_double_booked` or `umpire_daily_limit`.
    pub fn check_umpire_capacity(
        &self,
        occupancy: &Occupancy,
        assignment: &Assignment,
        window: &LocalWindow,
    ) -> Result<(), Violation> {
        for umpire_id in &assignment.umpire_ids {
            if let Some(other) = occupancy.umpire_conflict(*umpire_id, window) {
                return Err(Violation::new(
                    assignment.game_id,
                    ViolationCode::UmpireDoubleBooked,
                    format!("umpire {umpire_id} already works game {other} during {window}"),
                ));
            }
            if !self.umpire_has_daily_capacity(occupancy, *umpire_id, window.date()) {
                return Err(Violation::new(
                    assignment.game_id,
                    ViolationCode::UmpireDailyLimit,
                    format!(
                        "umpire {umpire_id} already has the maximum games on {}",
                        format_date(window.date())
                    ),
                ));
            }
        }
        Ok(())
    }

    /// Checks every hard constraint that does not involve umpires.
    ///
    /// # Errors
    ///
    /// Returns the first violation found.
    pub fn check_slot(
        &self,
        occupancy: &Occupancy,
        game: &Game,
        field: &Field,
        window: &LocalWindow,
    ) -> Result<(), Violation> {
        self.check_calendar(game, window)?;
        self.check_local_time(game.game_id, window)?;
        self.check_field_availability(game.game_id, field, window)?;
        self.check_game_exclusions(game, window)?;
        self.check_slot_free(occupancy, game, field.field_id, window)
    }

    /// Returns whether `umpire_id` could work a game during `window`.
    #[must_use]
    pub fn umpire_is_eligible(
        &self,
        occupancy: &Occupancy,
        umpire_id: UmpireId,
        window: &LocalWindow,
    ) -> bool {
        self.umpire_exclusion(umpire_id, window).is_none()
            && occupancy.umpire_conflict(umpire_id, window).is_none()
            && self.umpire_has_daily_capacity(occupancy, umpire_id, window.date())
    }

    /// Checks one assignment against every hard constraint and returns all
    /// violations, at most one per predicate.
    ///
    /// Reference and time errors stop the check early since nothing else
    /// can be evaluated without a game, a field and a window.
    #[must_use]
    pub fn check_assignment(&self, occupancy: &Occupancy, assignment: &Assignment) -> Vec<Violation> {
        if let Err(violation) = self.check_references(assignment) {
            return vec![violation];
        }
        let window: LocalWindow = match self.game_window(assignment) {
            Ok(window) => window,
            Err(violation) => return vec![violation],
        };
        let (Some(game), Some(field)) = (self.game(assignment.game_id), self.field(assignment.field_id))
        else {
            return Vec::new();
        };

        [
            self.check_calendar(game, &window),
            self.check_local_time(game.game_id, &window),
            self.check_field_availability(game.game_id, field, &window),
            self.check_game_exclusions(game, &window),
            self.check_umpire_exclusions(assignment, &window),
            self.check_umpire_count(assignment),
            self.check_umpire_capacity(occupancy, assignment, &window),
            self.check_slot_free(occupancy, game, field.field_id, &window),
        ]
        .into_iter()
        .filter_map(Result::err)
        .collect()
    }

    /// Books every committed game not listed in `skip`.
    ///
    /// Committed games whose window cannot be computed are ignored.
    #[must_use]
    pub fn committed_occupancy(&self, skip: &BTreeSet<GameId>) -> Occupancy {
        let mut occupancy: Occupancy = Occupancy::new();
        for committed in &self.spec.committed {
            if skip.contains(&committed.game.game_id) {
                continue;
            }
            if let Ok(window) = self.game_window(&committed.assignment) {
                occupancy.book(&committed.game, &committed.assignment, window);
            }
        }
        occupancy
    }
}

/// Checks a whole proposal against the committed games and against itself.
///
/// Assignments are checked in order; each one is booked after it is
/// checked, so a conflict between two proposed games is reported on the
/// later one.
#[must_use]
pub fn validate_assignments(spec: &ProblemSpec, assignments: &[Assignment]) -> Vec<Violation> {
    let model: ConstraintModel<'_> = ConstraintModel::new(spec);
    let proposed: BTreeSet<GameId> = assignments.iter().map(|a| a.game_id).collect();
    let mut occupancy: Occupancy = model.committed_occupancy(&proposed);
    let mut violations: Vec<Violation> = Vec::new();

    for assignment in assignments {
        violations.extend(model.check_assignment(&occupancy, assignment));
        if let (Some(game), Ok(window)) = (
            model.game(assignment.game_id),
            model.game_window(assignment),
        ) {
            occupancy.book(game, assignment, window);
        }
    }

    violations
}
