// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Availability rules and exclusion windows.

use crate::calendar::{
    LocalWindow, WeekdayMask, date_in_range, minute_of_day, time_from_minute_of_day,
};
use crate::formats::{clock_time, iso_date, local_datetime};
use crate::ids::{FieldId, TeamId, UmpireId};
use serde::{Deserialize, Serialize};
use time::{Date, PrimitiveDateTime, Time};

/// A recurring weekly window during which a field can host games.
///
/// Windows never cross midnight: `start_time < end_time` on the same date.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldAvailabilityRule {
    pub field_id: FieldId,
    pub days: WeekdayMask,
    #[serde(with = "clock_time")]
    pub start_time: Time,
    #[serde(with = "clock_time")]
    pub end_time: Time,
    #[serde(default, with = "iso_date::option")]
    pub valid_from: Option<Date>,
    #[serde(default, with = "iso_date::option")]
    pub valid_until: Option<Date>,
    #[serde(default = "enabled_by_default")]
    pub enabled: bool,
}

const fn enabled_by_default() -> bool {
    true
}

impl FieldAvailabilityRule {
    /// Creates an enabled rule with no validity range.
    #[must_use]
    pub const fn new(field_id: FieldId, days: WeekdayMask, start_time: Time, end_time: Time) -> Self {
        Self {
            field_id,
            days,
            start_time,
            end_time,
            valid_from: None,
            valid_until: None,
            enabled: true,
        }
    }

    /// Limits the dates the rule is valid on.
    #[must_use]
    pub const fn with_validity(mut self, from: Option<Date>, until: Option<Date>) -> Self {
        self.valid_from = from;
        self.valid_until = until;
        self
    }

    /// Returns whether the rule opens the field on `date`.
    #[must_use]
    pub fn applies_on(&self, date: Date) -> bool {
        self.enabled
            && self.days.contains(date.weekday())
            && date_in_range(date, self.valid_from, self.valid_until)
    }

    /// Returns whether a game occupying `window` fits entirely inside this
    /// rule on the window's date.
    #[must_use]
    pub fn admits(&self, window: &LocalWindow) -> bool {
        let date: Date = window.date();
        if !self.applies_on(date) || window.end().date() != date {
            return false;
        }
        self.start_time <= window.start().time() && window.end().time() <= self.end_time
    }

    /// Start times on `date` at which a game of `duration` minutes fits in
    /// this rule, stepping by `interval` minutes from the rule's start.
    #[must_use]
    pub fn candidate_starts(&self, date: Date, duration: u32, interval: u32) -> Vec<Time> {
        if !self.applies_on(date) || duration == 0 || interval == 0 {
            return Vec::new();
        }
        let open: u32 = minute_of_day(self.start_time);
        let close: u32 = minute_of_day(self.end_time);
        let mut starts: Vec<Time> = Vec::new();
        let mut minute: u32 = open;
        while minute + duration <= close {
            if let Some(start) = time_from_minute_of_day(minute) {
                starts.push(start);
            }
            minute += interval;
        }
        starts
    }
}

/// A date on which a field cannot be used at all.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldExclusionDate {
    pub field_id: FieldId,
    #[serde(with = "iso_date")]
    pub date: Date,
    #[serde(default)]
    pub reason: Option<String>,
}

/// A local interval `[starts_at, ends_at)` during which something is
/// unavailable. Disabled windows block nothing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExclusionWindow {
    #[serde(with = "local_datetime")]
    pub starts_at: PrimitiveDateTime,
    #[serde(with = "local_datetime")]
    pub ends_at: PrimitiveDateTime,
    #[serde(default)]
    pub note: String,
    #[serde(default = "enabled_by_default")]
    pub enabled: bool,
}

impl ExclusionWindow {
    /// Creates an enabled window.
    #[must_use]
    pub fn new(starts_at: PrimitiveDateTime, ends_at: PrimitiveDateTime, note: &str) -> Self {
        Self {
            starts_at,
            ends_at,
            note: note.to_string(),
            enabled: true,
        }
    }

    /// Returns a disabled copy of this window.
    #[must_use]
    pub const fn disabled(mut self) -> Self {
        self.enabled = false;
        self
    }

    /// Returns whether this window makes `window` unusable.
    #[must_use]
    pub fn blocks(&self, window: &LocalWindow) -> bool {
        self.enabled && self.starts_at < window.end() && window.start() < self.ends_at
    }
}

/// A window during which a team cannot play.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TeamExclusion {
    pub team_id: TeamId,
    #[serde(flatten)]
    pub window: ExclusionWindow,
}

/// A window during which an umpire cannot work.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UmpireExclusion {
    pub umpire_id: UmpireId,
    #[serde(flatten)]
    pub window: ExclusionWindow,
}
