// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Deterministic greedy placement of games.
//!
//! ## Algorithm
//!
//! Games are placed one at a time in a fixed order: ascending earliest
//! allowed date (games without one go last), then game id. For each game:
//!
//! 1. Enumerate (field, date, start) candidates from the field's enabled
//!    availability rules, inside the season, the game's date window, the
//!    field's usable range and the rule's validity range, stepping by the
//!    configured slot interval. At most `max_candidates_per_game`
//!    candidates are examined. The budget is split evenly over the fields
//!    in id order; a share a field leaves unused passes to the fields after
//!    it.
//! 2. Drop candidates that break any constraint not involving umpires.
//! 3. Pick umpires for each remaining candidate: eligible umpires ordered
//!    by (games that date, games overall, id), taking as many as needed.
//! 4. Order candidates by the [`CandidateOrdering`] policy and take the
//!    first one that passes every hard constraint.
//!
//! A game with no acceptable candidate is reported as unassigned. Placed
//! games are never revisited.
//!
//! ## Invariants
//!
//! - Same spec and options in, same result out. Only ordered collections
//!   are used on decision paths.
//! - Every returned assignment satisfies every hard constraint against the
//!   committed games and the assignments placed before it.
//! - `assignments.len() + unassigned_game_ids.len() == spec.games.len()`.

use crate::error::CoreError;
use crate::metrics::SolveMetrics;
use league_scheduler_domain::{
    Assignment, ConstraintModel, Field, FieldId, Game, GameId, LocalWindow, Occupancy,
    ProblemSpec, RunId, UmpireId, Violation, ViolationCode, validate_problem_spec,
};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::collections::{BTreeMap, BTreeSet};
use time::{Date, Time};

/// Default cap on candidates examined for one game.
pub const DEFAULT_MAX_CANDIDATES_PER_GAME: usize = 20_000;

/// Order in which feasible candidates of one game are tried.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CandidateOrdering {
    /// Least used field/date first, then least loaded umpires, then
    /// earliest. Spreads games over the season.
    #[default]
    TightestFirst,
    /// Earliest date and start first. Packs games early.
    EarliestFirst,
}

/// Tuning knobs of the solver.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SolverOptions {
    pub max_candidates_per_game: usize,
    #[serde(default)]
    pub ordering: CandidateOrdering,
}

impl Default for SolverOptions {
    fn default() -> Self {
        Self {
            max_candidates_per_game: DEFAULT_MAX_CANDIDATES_PER_GAME,
            ordering: CandidateOrdering::default(),
        }
    }
}

/// How often one constraint rejected candidates of a game.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RejectionCount {
    pub code: ViolationCode,
    pub count: u32,
}

/// Why a game could not be placed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnassignedDiagnostic {
    pub game_id: GameId,
    pub candidates_examined: usize,
    /// Some field ran out of its share of the candidate budget before all
    /// of its candidates were examined.
    #[serde(default)]
    pub effort_exhausted: bool,
    /// Rejections by constraint, most frequent first.
    pub rejections: Vec<RejectionCount>,
}

/// Output of one solve.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SolveResult {
    pub run_id: RunId,
    pub assignments: Vec<Assignment>,
    pub unassigned_game_ids: Vec<GameId>,
    pub diagnostics: Vec<UnassignedDiagnostic>,
    pub metrics: SolveMetrics,
}

struct Candidate {
    field_id: FieldId,
    date: Date,
    start: Time,
    field_load: usize,
    umpire_load: usize,
    umpire_ids: Vec<UmpireId>,
}

impl Candidate {
    fn compare(&self, other: &Self, ordering: CandidateOrdering) -> Ordering {
        match ordering {
            CandidateOrdering::TightestFirst => (
                self.field_load,
                self.umpire_load,
                self.date,
                self.start,
                self.field_id,
            )
                .cmp(&(
                    other.field_load,
                    other.umpire_load,
                    other.date,
                    other.start,
                    other.field_id,
                )),
            CandidateOrdering::EarliestFirst => (
                self.date,
                self.start,
                self.field_load,
                self.umpire_load,
                self.field_id,
            )
                .cmp(&(
                    other.date,
                    other.start,
                    other.field_load,
                    other.umpire_load,
                    other.field_id,
                )),
        }
    }
}

enum Placement {
    Placed(Assignment, LocalWindow),
    Unplaced(UnassignedDiagnostic),
}

#[derive(Default)]
struct Rejections(BTreeMap<ViolationCode, u32>);

impl Rejections {
    fn record(&mut self, code: ViolationCode) {
        *self.0.entry(code).or_insert(0) += 1;
    }

    fn into_counts(self) -> Vec<RejectionCount> {
        let mut counts: Vec<RejectionCount> = self
            .0
            .into_iter()
            .map(|(code, count)| RejectionCount { code, count })
            .collect();
        counts.sort_by(|a, b| b.count.cmp(&a.count).then(a.code.cmp(&b.code)));
        counts
    }
}

/// The greedy solver.
#[derive(Debug, Clone, Copy, Default)]
pub struct Solver {
    options: SolverOptions,
}

impl Solver {
    /// Creates a solver with the given options.
    #[must_use]
    pub const fn new(options: SolverOptions) -> Self {
        Self { options }
    }

    /// The options in effect.
    #[must_use]
    pub const fn options(&self) -> SolverOptions {
        self.options
    }

    /// Places as many of `spec.games` as the hard constraints allow.
    ///
    /// # Arguments
    ///
    /// * `spec` - The problem to solve
    /// * `run_id` - Identifier carried into the result for a later apply
    ///
    /// # Errors
    ///
    /// Returns `CoreError::Validation` if the spec violates its closure
    /// invariant. Games that cannot be placed are not an error.
    pub fn solve(&self, spec: &ProblemSpec, run_id: RunId) -> Result<SolveResult, CoreError> {
        validate_problem_spec(spec)?;

        let model: ConstraintModel<'_> = ConstraintModel::new(spec);
        let mut occupancy: Occupancy = model.committed_occupancy(&BTreeSet::new());
        let mut fields: Vec<&Field> = spec.fields.iter().collect();
        fields.sort_by_key(|field| field.field_id);

        let mut assignments: Vec<Assignment> = Vec::new();
        let mut unassigned_game_ids: Vec<GameId> = Vec::new();
        let mut diagnostics: Vec<UnassignedDiagnostic> = Vec::new();

        for game in game_order(spec) {
            match self.place(&model, &occupancy, &fields, game) {
                Placement::Placed(assignment, window) => {
                    occupancy.book(game, &assignment, window);
                    assignments.push(assignment);
                }
                Placement::Unplaced(diagnostic) => {
                    unassigned_game_ids.push(game.game_id);
                    diagnostics.push(diagnostic);
                }
            }
        }

        let metrics: SolveMetrics = SolveMetrics::compute(spec, &assignments, &unassigned_game_ids);

        Ok(SolveResult {
            run_id,
            assignments,
            unassigned_game_ids,
            diagnostics,
            metrics,
        })
    }

    fn place(
        &self,
        model: &ConstraintModel<'_>,
        occupancy: &Occupancy,
        fields: &[&Field],
        game: &Game,
    ) -> Placement {
        let spec: &ProblemSpec = model.spec();
        let duration: u32 = spec.season_config.game_duration_minutes;
        let interval: u32 = spec.season_config.slot_interval_minutes;
        let umpires_needed: usize =
            usize::try_from(spec.season_config.umpires_per_game).unwrap_or(usize::MAX);

        let mut rejections: Rejections = Rejections::default();
        let mut candidates: Vec<Candidate> = Vec::new();
        let mut examined: usize = 0;
        let mut budget_left: usize = self.options.max_candidates_per_game;
        let mut effort_exhausted: bool = false;

        for (index, field) in fields.iter().enumerate() {
            let share: usize = budget_left.div_ceil(fields.len() - index);
            let mut used: usize = 0;

            'dates: for date in candidate_dates(spec, game, field) {
                let starts: BTreeSet<Time> = model
                    .rules_for(field.field_id)
                    .iter()
                    .flat_map(|rule| rule.candidate_starts(date, duration, interval))
                    .collect();

                for start in starts {
                    if used >= share {
                        effort_exhausted = true;
                        break 'dates;
                    }
                    used += 1;

                    let Some(window) = LocalWindow::for_game(date, start, duration) else {
                        rejections.record(ViolationCode::InvalidTime);
                        continue;
                    };
                    if let Err(violation) = model.check_slot(occupancy, game, field, &window) {
                        rejections.record(violation.code);
                        continue;
                    }
                    let Some((umpire_ids, umpire_load)) =
                        pick_umpires(model, occupancy, &window, umpires_needed)
                    else {
                        rejections.record(ViolationCode::UmpireCountMismatch);
                        continue;
                    };

                    candidates.push(Candidate {
                        field_id: field.field_id,
                        date,
                        start,
                        field_load: occupancy.field_load(field.field_id, date),
                        umpire_load,
                        umpire_ids,
                    });
                }
            }

            budget_left = budget_left.saturating_sub(used);
            examined += used;
        }

        candidates.sort_by(|a, b| a.compare(b, self.options.ordering));

        for candidate in candidates {
            let assignment: Assignment = Assignment::new(
                game.game_id,
                candidate.field_id,
                candidate.date,
                candidate.start,
                candidate.umpire_ids,
            );
            let violations: Vec<Violation> = model.check_assignment(occupancy, &assignment);
            if violations.is_empty() {
                match model.game_window(&assignment) {
                    Ok(window) => return Placement::Placed(assignment, window),
                    Err(violation) => rejections.record(violation.code),
                }
            }
            for violation in violations {
                rejections.record(violation.code);
            }
        }

        Placement::Unplaced(UnassignedDiagnostic {
            game_id: game.game_id,
            candidates_examined: examined,
            effort_exhausted,
            rejections: rejections.into_counts(),
        })
    }
}

/// Solves `spec` with default options.
///
/// # Errors
///
/// Returns `CoreError::Validation` if the spec violates its closure
/// invariant.
pub fn solve(spec: &ProblemSpec, run_id: RunId) -> Result<SolveResult, CoreError> {
    Solver::default().solve(spec, run_id)
}

fn game_order(spec: &ProblemSpec) -> Vec<&Game> {
    let mut games: Vec<&Game> = spec.games.iter().collect();
    games.sort_by(|a, b| match (a.earliest_date, b.earliest_date) {
        (Some(x), Some(y)) => x.cmp(&y).then(a.game_id.cmp(&b.game_id)),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => a.game_id.cmp(&b.game_id),
    });
    games
}

/// Dates inside the season, the game's window and the field's usable range.
fn candidate_dates(spec: &ProblemSpec, game: &Game, field: &Field) -> Vec<Date> {
    let config = &spec.season_config;
    let first: Date = [Some(config.season_start), game.earliest_date, field.usable_from]
        .into_iter()
        .flatten()
        .max()
        .unwrap_or(config.season_start);
    let last: Date = [Some(config.season_end), game.latest_date, field.usable_until]
        .into_iter()
        .flatten()
        .min()
        .unwrap_or(config.season_end);

    let mut dates: Vec<Date> = Vec::new();
    let mut current: Option<Date> = Some(first);
    while let Some(date) = current {
        if date > last {
            break;
        }
        dates.push(date);
        current = date.next_day();
    }
    dates
}

/// Picks the least loaded eligible umpires for `window`. Returns the
/// chosen ids and their summed load on the window's date.
fn pick_umpires(
    model: &ConstraintModel<'_>,
    occupancy: &Occupancy,
    window: &LocalWindow,
    needed: usize,
) -> Option<(Vec<UmpireId>, usize)> {
    let date: Date = window.date();
    let mut eligible: Vec<(usize, u32, UmpireId)> = model
        .spec()
        .umpires
        .iter()
        .map(|umpire| umpire.umpire_id)
        .filter(|umpire_id| model.umpire_is_eligible(occupancy, *umpire_id, window))
        .map(|umpire_id| {
            (
                occupancy.umpire_load(umpire_id, date),
                occupancy.umpire_total(umpire_id),
                umpire_id,
            )
        })
        .collect();
    if eligible.len() < needed {
        return None;
    }
    eligible.sort_unstable();
    eligible.truncate(needed);

    let load: usize = eligible.iter().map(|(day_load, _, _)| day_load).sum();
    Some((eligible.into_iter().map(|(_, _, id)| id).collect(), load))
}
