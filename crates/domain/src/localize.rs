// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Converts local wall-clock windows to UTC instants.
//!
//! ## Invariants
//!
//! - A wall-clock time that is skipped or repeated by a DST transition is
//!   rejected rather than guessed.
//! - The constraint model uses [`resolve_window`], so every placement the
//!   solver returns can be rendered by [`localize_window`].

use crate::calendar::LocalWindow;
use crate::error::DomainError;
use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, TimeZone};
use chrono_tz::Tz;
use time::PrimitiveDateTime;

/// A window rendered as RFC 3339 UTC instants.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UtcWindow {
    pub start_utc: String,
    pub end_utc: String,
}

/// Renders `window` in UTC, interpreting it in `timezone`.
///
/// # Arguments
///
/// * `window` - The local window
/// * `timezone` - IANA timezone name of the season
///
/// # Errors
///
/// Returns an error if the timezone is unknown or either end of the window
/// does not map to exactly one instant.
pub fn localize_window(window: &LocalWindow, timezone: &str) -> Result<UtcWindow, DomainError> {
    let tz: Tz = parse_timezone(timezone)?;
    let (start, end): (DateTime<Tz>, DateTime<Tz>) = resolve_window(window, tz)?;

    Ok(UtcWindow {
        start_utc: start.with_timezone(&chrono::Utc).to_rfc3339(),
        end_utc: end.with_timezone(&chrono::Utc).to_rfc3339(),
    })
}

/// Parses an IANA timezone name.
///
/// # Errors
///
/// Returns `DomainError::InvalidTimezone` for an unknown name.
pub fn parse_timezone(timezone: &str) -> Result<Tz, DomainError> {
    timezone
        .parse()
        .map_err(|_| DomainError::InvalidTimezone(timezone.to_string()))
}

/// Resolves both ends of `window` to exactly one instant each in `tz`.
///
/// # Errors
///
/// Returns `DomainError::UnresolvableLocalTime` if either end falls in a
/// DST gap or overlap.
pub fn resolve_window(
    window: &LocalWindow,
    tz: Tz,
) -> Result<(DateTime<Tz>, DateTime<Tz>), DomainError> {
    Ok((resolve(window.start(), tz)?, resolve(window.end(), tz)?))
}

fn resolve(local: PrimitiveDateTime, tz: Tz) -> Result<DateTime<Tz>, DomainError> {
    let date: NaiveDate = NaiveDate::from_ymd_opt(
        local.year(),
        u32::from(u8::from(local.month())),
        u32::from(local.day()),
    )
    .ok_or_else(|| DomainError::UnresolvableLocalTime {
        reason: format!("invalid date {}", local.date()),
    })?;
    let time: NaiveTime = NaiveTime::from_hms_opt(
        u32::from(local.hour()),
        u32::from(local.minute()),
        u32::from(local.second()),
    )
    .ok_or_else(|| DomainError::UnresolvableLocalTime {
        reason: format!("invalid time {}", local.time()),
    })?;
    let naive: NaiveDateTime = date.and_time(time);

    tz.from_local_datetime(&naive)
        .single()
        .ok_or_else(|| DomainError::UnresolvableLocalTime {
            reason: format!(
                "{naive} in {tz} is ambiguous or non-existent due to a DST transition"
            ),
        })
}
