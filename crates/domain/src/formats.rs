// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Text formats for dates and times.
//!
//! The same formats are used on the wire and in storage:
//!
//! - dates: `YYYY-MM-DD`
//! - clock times: `HH:MM`
//! - local date-times: `YYYY-MM-DDTHH:MM`
//!
//! The `serde` submodules are meant for `#[serde(with = "...")]`.

use crate::error::DomainError;
use time::format_description::BorrowedFormatItem;
use time::macros::format_description;
use time::{Date, PrimitiveDateTime, Time};

const DATE_FORMAT: &[BorrowedFormatItem<'_>] = format_description!("[year]-[month]-[day]");
const CLOCK_FORMAT: &[BorrowedFormatItem<'_>] = format_description!("[hour]:[minute]");
const LOCAL_DATETIME_FORMAT: &[BorrowedFormatItem<'_>] =
    format_description!("[year]-[month]-[day]T[hour]:[minute]");

/// Parses a `YYYY-MM-DD` date.
///
/// # Errors
///
/// Returns an error if the string is not a valid calendar date.
pub fn parse_date(value: &str) -> Result<Date, DomainError> {
    Date::parse(value.trim(), DATE_FORMAT).map_err(|e| DomainError::DateParseError {
        date_string: value.to_string(),
        error: e.to_string(),
    })
}

/// Parses an `HH:MM` clock time.
///
/// # Errors
///
/// Returns an error if the string is not a valid clock time.
pub fn parse_clock(value: &str) -> Result<Time, DomainError> {
    Time::parse(value.trim(), CLOCK_FORMAT).map_err(|e| DomainError::TimeParseError {
        time_string: value.to_string(),
        error: e.to_string(),
    })
}

/// Parses a `YYYY-MM-DDTHH:MM` local date-time.
///
/// # Errors
///
/// Returns an error if the string is not a valid local date-time.
pub fn parse_local_datetime(value: &str) -> Result<PrimitiveDateTime, DomainError> {
    PrimitiveDateTime::parse(value.trim(), LOCAL_DATETIME_FORMAT).map_err(|e| {
        DomainError::TimeParseError {
            time_string: value.to_string(),
            error: e.to_string(),
        }
    })
}

/// Formats a date as `YYYY-MM-DD`.
#[must_use]
pub fn format_date(date: Date) -> String {
    format!(
        "{:04}-{:02}-{:02}",
        date.year(),
        u8::from(date.month()),
        date.day()
    )
}

/// Formats a clock time as `HH:MM`.
#[must_use]
pub fn format_clock(time: Time) -> String {
    format!("{:02}:{:02}", time.hour(), time.minute())
}

/// Formats a local date-time as `YYYY-MM-DDTHH:MM`.
#[must_use]
pub fn format_local_datetime(value: PrimitiveDateTime) -> String {
    format!(
        "{}T{}",
        format_date(value.date()),
        format_clock(value.time())
    )
}

/// Serde adapter for `YYYY-MM-DD` dates.
pub mod iso_date {
    use serde::{Deserialize, Deserializer, Serializer};
    use time::Date;

    /// Serializes a date.
    ///
    /// # Errors
    ///
    /// Propagates serializer errors.
    pub fn serialize<S: Serializer>(value: &Date, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&super::format_date(*value))
    }

    /// Deserializes a date.
    ///
    /// # Errors
    ///
    /// Returns an error if the value is not a `YYYY-MM-DD` string.
    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Date, D::Error> {
        let raw: String = String::deserialize(deserializer)?;
        super::parse_date(&raw).map_err(serde::de::Error::custom)
    }

    /// Serde adapter for optional dates.
    pub mod option {
        use serde::{Deserialize, Deserializer, Serializer};
        use time::Date;

        /// Serializes an optional date.
        ///
        /// # Errors
        ///
        /// Propagates serializer errors.
        #[allow(clippy::ref_option)]
        pub fn serialize<S: Serializer>(
            value: &Option<Date>,
            serializer: S,
        ) -> Result<S::Ok, S::Error> {
            match value {
                Some(date) => serializer.serialize_some(&super::super::format_date(*date)),
                None => serializer.serialize_none(),
            }
        }

        /// Deserializes an optional date.
        ///
        /// # Errors
        ///
        /// Returns an error if a present value is not a `YYYY-MM-DD` string.
        pub fn deserialize<'de, D: Deserializer<'de>>(
            deserializer: D,
        ) -> Result<Option<Date>, D::Error> {
            let raw: Option<String> = Option::deserialize(deserializer)?;
            raw.map(|value| super::super::parse_date(&value))
                .transpose()
                .map_err(serde::de::Error::custom)
        }
    }
}

/// Serde adapter for `HH:MM` clock times.
pub mod clock_time {
    use serde::{Deserialize, Deserializer, Serializer};
    use time::Time;

    /// Serializes a clock time.
    ///
    /// # Errors
    ///
    /// Propagates serializer errors.
    pub fn serialize<S: Serializer>(value: &Time, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&super::format_clock(*value))
    }

    /// Deserializes a clock time.
    ///
    /// # Errors
    ///
    /// Returns an error if the value is not an `HH:MM` string.
    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Time, D::Error> {
        let raw: String = String::deserialize(deserializer)?;
        super::parse_clock(&raw).map_err(serde::de::Error::custom)
    }

    /// Serde adapter for optional clock times.
    pub mod option {
        use serde::{Deserialize, Deserializer, Serializer};
        use time::Time;

        /// Serializes an optional clock time.
        ///
        /// # Errors
        ///
        /// Propagates serializer errors.
        #[allow(clippy::ref_option)]
        pub fn serialize<S: Serializer>(
            value: &Option<Time>,
            serializer: S,
        ) -> Result<S::Ok, S::Error> {
            match value {
                Some(time) => serializer.serialize_some(&super::super::format_clock(*time)),
                None => serializer.serialize_none(),
            }
        }

        /// Deserializes an optional clock time.
        ///
        /// # Errors
        ///
        /// Returns an error if a present value is not an `HH:MM` string.
        pub fn deserialize<'de, D: Deserializer<'de>>(
            deserializer: D,
        ) -> Result<Option<Time>, D::Error> {
            let raw: Option<String> = Option::deserialize(deserializer)?;
            raw.map(|value| super::super::parse_clock(&value))
                .transpose()
                .map_err(serde::de::Error::custom)
        }
    }
}

/// Serde adapter for `YYYY-MM-DDTHH:MM` local date-times.
pub mod local_datetime {
    use serde::{Deserialize, Deserializer, Serializer};
    use time::PrimitiveDateTime;

    /// Serializes a local date-time.
    ///
    /// # Errors
    ///
    /// Propagates serializer errors.
    pub fn serialize<S: Serializer>(
        value: &PrimitiveDateTime,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&super::format_local_datetime(*value))
    }

    /// Deserializes a local date-time.
    ///
    /// # Errors
    ///
    /// Returns an error if the value is not a `YYYY-MM-DDTHH:MM` string.
    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<PrimitiveDateTime, D::Error> {
        let raw: String = String::deserialize(deserializer)?;
        super::parse_local_datetime(&raw).map_err(serde::de::Error::custom)
    }
}
