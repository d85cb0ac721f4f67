// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Observational metrics of a solve.
//!
//! Metrics are computed from the final assignments only and never feed
//! back into placement decisions.

use league_scheduler_domain::{Assignment, FieldId, GameId, LocalWindow, ProblemSpec, UmpireId};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use time::Date;

/// How many games one umpire received.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UmpireLoad {
    pub umpire_id: UmpireId,
    pub games: u32,
}

/// Aggregate figures describing a solve result.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SolveMetrics {
    pub requested_games: usize,
    pub scheduled_games: usize,
    pub unassigned_games: usize,
    /// `scheduled_games / requested_games`, or 0 when nothing was requested.
    pub scheduled_ratio: f64,
    /// One entry per umpire in the spec, including idle ones.
    pub umpire_load: Vec<UmpireLoad>,
    pub average_umpire_load: f64,
    /// Population variance of `umpire_load`.
    pub umpire_load_variance: f64,
    /// Minutes between consecutive games on the same field and date.
    pub idle_minutes_total: i64,
    pub fields_used: usize,
}

impl SolveMetrics {
    /// Computes metrics for a solve result.
    ///
    /// # Arguments
    ///
    /// * `spec` - The spec that was solved
    /// * `assignments` - The placed games
    /// * `unassigned` - The games that could not be placed
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn compute(spec: &ProblemSpec, assignments: &[Assignment], unassigned: &[GameId]) -> Self {
        let requested_games: usize = spec.games.len();
        let scheduled_games: usize = assignments.len();

        let mut loads: BTreeMap<UmpireId, u32> =
            spec.umpires.iter().map(|u| (u.umpire_id, 0)).collect();
        for assignment in assignments {
            for umpire_id in &assignment.umpire_ids {
                *loads.entry(*umpire_id).or_insert(0) += 1;
            }
        }

        let (average_umpire_load, umpire_load_variance): (f64, f64) = if loads.is_empty() {
            (0.0, 0.0)
        } else {
            let count: f64 = loads.len() as f64;
            let mean: f64 = loads.values().map(|v| f64::from(*v)).sum::<f64>() / count;
            let variance: f64 = loads
                .values()
                .map(|v| {
                    let delta: f64 = f64::from(*v) - mean;
                    delta * delta
                })
                .sum::<f64>()
                / count;
            (mean, variance)
        };

        let fields_used: usize = assignments
            .iter()
            .map(|a| a.field_id)
            .collect::<BTreeSet<FieldId>>()
            .len();

        Self {
            requested_games,
            scheduled_games,
            unassigned_games: unassigned.len(),
            scheduled_ratio: if requested_games == 0 {
                0.0
            } else {
                scheduled_games as f64 / requested_games as f64
            },
            umpire_load: loads
                .into_iter()
                .map(|(umpire_id, games)| UmpireLoad { umpire_id, games })
                .collect(),
            average_umpire_load,
            umpire_load_variance,
            idle_minutes_total: idle_minutes(assignments, spec.season_config.game_duration_minutes),
            fields_used,
        }
    }
}

fn idle_minutes(assignments: &[Assignment], duration: u32) -> i64 {
    let mut by_field_day: BTreeMap<(FieldId, Date), Vec<LocalWindow>> = BTreeMap::new();
    for assignment in assignments {
        if let Some(window) = assignment.window(duration) {
            by_field_day
                .entry((assignment.field_id, assignment.date))
                .or_default()
                .push(window);
        }
    }

    by_field_day
        .into_values()
        .map(|mut windows| {
            windows.sort();
            windows
                .windows(2)
                .map(|pair| (pair[1].start() - pair[0].end()).whole_minutes().max(0))
                .sum::<i64>()
        })
        .sum()
}
