// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Calendar primitives shared by rules, exclusions and assignments.
//!
//! All values are wall-clock values in the season's local timezone. Nothing
//! here knows about UTC; see [`crate::localize`] for that.

use crate::error::DomainError;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use time::{Date, Duration, PrimitiveDateTime, Time, Weekday};

const ALL_WEEKDAYS: [Weekday; 7] = [
    Weekday::Monday,
    Weekday::Tuesday,
    Weekday::Wednesday,
    Weekday::Thursday,
    Weekday::Friday,
    Weekday::Saturday,
    Weekday::Sunday,
];

/// Returns the lowercase English name of a weekday.
#[must_use]
pub const fn weekday_name(day: Weekday) -> &'static str {
    match day {
        Weekday::Monday => "monday",
        Weekday::Tuesday => "tuesday",
        Weekday::Wednesday => "wednesday",
        Weekday::Thursday => "thursday",
        Weekday::Friday => "friday",
        Weekday::Saturday => "saturday",
        Weekday::Sunday => "sunday",
    }
}

/// Parses a weekday name. Accepts full names and three-letter
/// abbreviations in any case.
///
/// # Errors
///
/// Returns an error if the name is not a weekday.
pub fn parse_weekday(name: &str) -> Result<Weekday, DomainError> {
    let lowered: String = name.trim().to_ascii_lowercase();
    ALL_WEEKDAYS
        .iter()
        .copied()
        .find(|day| {
            let full: &str = weekday_name(*day);
            lowered == full || (lowered.len() == 3 && full.starts_with(lowered.as_str()))
        })
        .ok_or_else(|| DomainError::InvalidWeekday(name.to_string()))
}

/// A set of weekdays, stored as a Monday-first bit mask.
///
/// Bit 0 is Monday and bit 6 is Sunday. On the wire the mask is a list of
/// weekday names.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct WeekdayMask(u8);

impl WeekdayMask {
    /// No days.
    pub const EMPTY: Self = Self(0);
    /// Every day of the week.
    pub const ALL: Self = Self(0b0111_1111);

    /// Builds a mask from a list of days. Repeated days are harmless.
    #[must_use]
    pub fn from_days(days: &[Weekday]) -> Self {
        days.iter()
            .fold(Self::EMPTY, |mask: Self, day: &Weekday| mask.with(*day))
    }

    /// Restores a mask from its stored bits.
    ///
    /// # Errors
    ///
    /// Returns an error if bits above Sunday are set.
    pub fn from_bits(bits: u8) -> Result<Self, DomainError> {
        if bits & !Self::ALL.0 != 0 {
            return Err(DomainError::InvalidWeekday(format!("mask bits {bits:#010b}")));
        }
        Ok(Self(bits))
    }

    /// Returns the stored bits.
    #[must_use]
    pub const fn bits(self) -> u8 {
        self.0
    }

    /// Returns a copy of this mask that also contains `day`.
    #[must_use]
    pub const fn with(self, day: Weekday) -> Self {
        Self(self.0 | (1 << day.number_days_from_monday()))
    }

    /// Returns whether `day` is in the mask.
    #[must_use]
    pub const fn contains(self, day: Weekday) -> bool {
        self.0 & (1 << day.number_days_from_monday()) != 0
    }

    /// Returns whether no day is set.
    #[must_use]
    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// Returns the days in the mask, Monday first.
    #[must_use]
    pub fn days(self) -> Vec<Weekday> {
        ALL_WEEKDAYS
            .iter()
            .copied()
            .filter(|day| self.contains(*day))
            .collect()
    }
}

impl Serialize for WeekdayMask {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let names: Vec<&'static str> = self.days().into_iter().map(weekday_name).collect();
        names.serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for WeekdayMask {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let names: Vec<String> = Vec::deserialize(deserializer)?;
        let mut days: Vec<Weekday> = Vec::with_capacity(names.len());
        for name in &names {
            days.push(parse_weekday(name).map_err(serde::de::Error::custom)?);
        }
        Ok(Self::from_days(&days))
    }
}

/// A half-open local interval `[start, end)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct LocalWindow {
    start: PrimitiveDateTime,
    end: PrimitiveDateTime,
}

impl LocalWindow {
    /// Creates a window.
    ///
    /// # Errors
    ///
    /// Returns an error if `start` is not strictly before `end`.
    pub fn new(start: PrimitiveDateTime, end: PrimitiveDateTime) -> Result<Self, DomainError> {
        if start >= end {
            return Err(DomainError::InvalidTimeRange {
                context: String::from("window"),
                start: crate::formats::format_local_datetime(start),
                end: crate::formats::format_local_datetime(end),
            });
        }
        Ok(Self { start, end })
    }

    /// Returns the window a game occupies when it starts at `start` on
    /// `date` and lasts `minutes`.
    ///
    /// Returns `None` for a zero duration or when the end overflows the
    /// calendar.
    #[must_use]
    pub fn for_game(date: Date, start: Time, minutes: u32) -> Option<Self> {
        if minutes == 0 {
            return None;
        }
        let begin: PrimitiveDateTime = date.with_time(start);
        let end: PrimitiveDateTime = begin.checked_add(Duration::minutes(i64::from(minutes)))?;
        Some(Self { start: begin, end })
    }

    /// Window start (inclusive).
    #[must_use]
    pub const fn start(&self) -> PrimitiveDateTime {
        self.start
    }

    /// Window end (exclusive).
    #[must_use]
    pub const fn end(&self) -> PrimitiveDateTime {
        self.end
    }

    /// The date the window starts on.
    #[must_use]
    pub const fn date(&self) -> Date {
        self.start.date()
    }

    /// Returns whether two half-open windows share any instant.
    #[must_use]
    pub fn overlaps(&self, other: &Self) -> bool {
        self.start < other.end && other.start < self.end
    }

    /// Returns whether `other` lies entirely inside this window.
    #[must_use]
    pub fn contains(&self, other: &Self) -> bool {
        self.start <= other.start && other.end <= self.end
    }

    /// Length of the window in whole minutes.
    #[must_use]
    pub fn minutes(&self) -> i64 {
        (self.end - self.start).whole_minutes()
    }
}

impl std::fmt::Display for LocalWindow {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}..{}",
            crate::formats::format_local_datetime(self.start),
            crate::formats::format_local_datetime(self.end)
        )
    }
}

/// Returns whether `date` lies in the optional inclusive range.
#[must_use]
pub fn date_in_range(date: Date, from: Option<Date>, until: Option<Date>) -> bool {
    from.is_none_or(|from| date >= from) && until.is_none_or(|until| date <= until)
}

/// Minutes since midnight.
#[must_use]
pub fn minute_of_day(time: Time) -> u32 {
    u32::from(time.hour()) * 60 + u32::from(time.minute())
}

/// Inverse of [`minute_of_day`]; `None` past the end of the day.
#[must_use]
pub fn time_from_minute_of_day(minutes: u32) -> Option<Time> {
    let hour: u8 = u8::try_from(minutes / 60).ok()?;
    let minute: u8 = u8::try_from(minutes % 60).ok()?;
    Time::from_hms(hour, minute, 0).ok()
}
