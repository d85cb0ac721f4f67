// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Row shapes and their conversion to domain values.
//!
//! Dates, clock times and local date-times are stored as text in the same
//! formats used on the wire. A row that no longer parses is reported as
//! `PersistenceError::CorruptRow` rather than skipped.

use diesel::prelude::*;
use league_scheduler_domain::formats::{parse_clock, parse_date, parse_local_datetime};
use league_scheduler_domain::{
    ExclusionWindow, Field, FieldAvailabilityRule, FieldExclusionDate, FieldId, Game, GameId,
    GameStatus, LeagueSeasonId, SeasonConfig, TeamId, WeekdayMask,
};
use num_traits::ToPrimitive;
use time::{Date, PrimitiveDateTime, Time};

use crate::diesel_schema::{
    field_availability_rules, field_exclusion_dates, fields, games, season_scheduler_config,
};
use crate::error::PersistenceError;

pub(crate) fn decode_date(table: &'static str, value: &str) -> Result<Date, PersistenceError> {
    parse_date(value).map_err(|e| PersistenceError::corrupt(table, e))
}

pub(crate) fn decode_optional_date(
    table: &'static str,
    value: Option<&str>,
) -> Result<Option<Date>, PersistenceError> {
    value.map(|v| decode_date(table, v)).transpose()
}

pub(crate) fn decode_clock(table: &'static str, value: &str) -> Result<Time, PersistenceError> {
    parse_clock(value).map_err(|e| PersistenceError::corrupt(table, e))
}

pub(crate) fn decode_window(
    table: &'static str,
    starts_at: &str,
    ends_at: &str,
    note: String,
    enabled: i32,
) -> Result<ExclusionWindow, PersistenceError> {
    let starts_at: PrimitiveDateTime =
        parse_local_datetime(starts_at).map_err(|e| PersistenceError::corrupt(table, e))?;
    let ends_at: PrimitiveDateTime =
        parse_local_datetime(ends_at).map_err(|e| PersistenceError::corrupt(table, e))?;
    Ok(ExclusionWindow {
        starts_at,
        ends_at,
        note,
        enabled: enabled != 0,
    })
}

/// Converts a non-negative integer column to `u32`.
pub(crate) fn decode_u32(
    table: &'static str,
    column: &str,
    value: i32,
) -> Result<u32, PersistenceError> {
    value
        .to_u32()
        .ok_or_else(|| PersistenceError::corrupt(table, format!("{column} is negative: {value}")))
}

/// Converts a `u32` to an integer column value.
pub(crate) fn encode_u32(column: &str, value: u32) -> Result<i32, PersistenceError> {
    value.to_i32().ok_or_else(|| PersistenceError::InvalidInput {
        field: column.to_string(),
        message: format!("{value} is out of range"),
    })
}

#[derive(Queryable, Selectable)]
#[diesel(table_name = fields)]
pub(crate) struct FieldRow {
    pub field_id: i64,
    pub name: String,
    pub has_lights: i32,
    pub usable_from: Option<String>,
    pub usable_until: Option<String>,
}

impl FieldRow {
    pub(crate) fn into_domain(self) -> Result<Field, PersistenceError> {
        let usable_from: Option<Date> =
            decode_optional_date("fields", self.usable_from.as_deref())?;
        let usable_until: Option<Date> =
            decode_optional_date("fields", self.usable_until.as_deref())?;
        Ok(Field::new(FieldId::new(self.field_id), &self.name)
            .with_lights(self.has_lights != 0)
            .with_usable_range(usable_from, usable_until))
    }
}

/// A game row, including its placement columns.
#[derive(Queryable, Selectable)]
#[diesel(table_name = games)]
pub(crate) struct GameRow {
    pub game_id: i64,
    pub league_season_id: i64,
    pub home_team_id: i64,
    pub visitor_team_id: i64,
    pub earliest_date: Option<String>,
    pub latest_date: Option<String>,
    pub status: String,
    pub field_id: Option<i64>,
    pub game_date: Option<String>,
    pub start_time: Option<String>,
}

impl GameRow {
    pub(crate) fn to_game(&self) -> Result<Game, PersistenceError> {
        let status: GameStatus = self
            .status
            .parse()
            .map_err(|e| PersistenceError::corrupt("games", e))?;
        let earliest: Option<Date> = decode_optional_date("games", self.earliest_date.as_deref())?;
        let latest: Option<Date> = decode_optional_date("games", self.latest_date.as_deref())?;
        Ok(Game::new(
            GameId::new(self.game_id),
            LeagueSeasonId::new(self.league_season_id),
            TeamId::new(self.home_team_id),
            TeamId::new(self.visitor_team_id),
        )
        .with_date_window(earliest, latest)
        .with_status(status))
    }

    /// Returns the stored placement, if all of its columns are set.
    pub(crate) fn placement(&self) -> Result<Option<(FieldId, Date, Time)>, PersistenceError> {
        match (self.field_id, &self.game_date, &self.start_time) {
            (Some(field_id), Some(date), Some(start)) => Ok(Some((
                FieldId::new(field_id),
                decode_date("games", date)?,
                decode_clock("games", start)?,
            ))),
            (None, None, None) => Ok(None),
            _ => Err(PersistenceError::corrupt(
                "games",
                format!("game {} has a partial placement", self.game_id),
            )),
        }
    }
}

#[derive(Queryable, Selectable)]
#[diesel(table_name = field_availability_rules)]
pub(crate) struct AvailabilityRuleRow {
    pub field_id: i64,
    pub days: i32,
    pub start_time: String,
    pub end_time: String,
    pub valid_from: Option<String>,
    pub valid_until: Option<String>,
    pub enabled: i32,
}

impl AvailabilityRuleRow {
    pub(crate) fn into_domain(self) -> Result<FieldAvailabilityRule, PersistenceError> {
        const TABLE: &str = "field_availability_rules";
        let bits: u8 = self.days.to_u8().ok_or_else(|| {
            PersistenceError::corrupt(TABLE, format!("days out of range: {}", self.days))
        })?;
        let days: WeekdayMask =
            WeekdayMask::from_bits(bits).map_err(|e| PersistenceError::corrupt(TABLE, e))?;
        let mut rule: FieldAvailabilityRule = FieldAvailabilityRule::new(
            FieldId::new(self.field_id),
            days,
            decode_clock(TABLE, &self.start_time)?,
            decode_clock(TABLE, &self.end_time)?,
        )
        .with_validity(
            decode_optional_date(TABLE, self.valid_from.as_deref())?,
            decode_optional_date(TABLE, self.valid_until.as_deref())?,
        );
        rule.enabled = self.enabled != 0;
        Ok(rule)
    }
}

#[derive(Queryable, Selectable)]
#[diesel(table_name = field_exclusion_dates)]
pub(crate) struct FieldExclusionRow {
    pub field_id: i64,
    pub exclusion_date: String,
    pub reason: Option<String>,
}

impl FieldExclusionRow {
    pub(crate) fn into_domain(self) -> Result<FieldExclusionDate, PersistenceError> {
        Ok(FieldExclusionDate {
            field_id: FieldId::new(self.field_id),
            date: decode_date("field_exclusion_dates", &self.exclusion_date)?,
            reason: self.reason,
        })
    }
}

#[derive(Queryable, Selectable)]
#[diesel(table_name = season_scheduler_config)]
pub(crate) struct SchedulerConfigRow {
    pub season_start: String,
    pub season_end: String,
    pub umpires_per_game: i32,
    pub max_games_per_umpire_per_day: Option<i32>,
    pub game_duration_minutes: i32,
    pub slot_interval_minutes: i32,
    pub lights_required_after: Option<String>,
    pub timezone: String,
}

impl SchedulerConfigRow {
    pub(crate) fn into_domain(self) -> Result<SeasonConfig, PersistenceError> {
        const TABLE: &str = "season_scheduler_config";
        let max_per_day: Option<u32> = self
            .max_games_per_umpire_per_day
            .map(|v| decode_u32(TABLE, "max_games_per_umpire_per_day", v))
            .transpose()?;
        let lights: Option<Time> = self
            .lights_required_after
            .as_deref()
            .map(|v| decode_clock(TABLE, v))
            .transpose()?;
        Ok(SeasonConfig::new(
            decode_date(TABLE, &self.season_start)?,
            decode_date(TABLE, &self.season_end)?,
            decode_u32(TABLE, "umpires_per_game", self.umpires_per_game)?,
        )
        .with_max_games_per_umpire_per_day(max_per_day)
        .with_game_duration(decode_u32(
            TABLE,
            "game_duration_minutes",
            self.game_duration_minutes,
        )?)
        .with_slot_interval(decode_u32(
            TABLE,
            "slot_interval_minutes",
            self.slot_interval_minutes,
        )?)
        .with_lights_required_after(lights)
        .with_timezone(&self.timezone))
    }
}

/// A ledger row as stored.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = crate::diesel_schema::apply_ledger)]
pub(crate) struct LedgerRow {
    pub account_id: i64,
    pub season_id: i64,
    pub idempotency_key: String,
    pub run_id: String,
    pub request_fingerprint: String,
    pub result_json: String,
    pub applied_at: String,
}
