// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

/// Errors that can occur during domain validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// An identifier could not be parsed.
    InvalidIdentifier {
        /// The kind of identifier (e.g., "game").
        kind: &'static str,
        /// The rejected raw value.
        value: String,
    },
    /// A run identifier is empty, too long, or contains whitespace.
    InvalidRunId(String),
    /// An idempotency key is empty, too long, or contains whitespace.
    InvalidIdempotencyKey(String),
    /// Failed to parse date from string.
    DateParseError {
        /// The invalid date string.
        date_string: String,
        /// The parsing error message.
        error: String,
    },
    /// Failed to parse a clock time or local date-time from string.
    TimeParseError {
        /// The invalid time string.
        time_string: String,
        /// The parsing error message.
        error: String,
    },
    /// A weekday name was not recognized.
    InvalidWeekday(String),
    /// A game status string was not recognized.
    InvalidGameStatus(String),
    /// A time range has start >= end.
    InvalidTimeRange {
        /// Where the range came from.
        context: String,
        /// The range start.
        start: String,
        /// The range end.
        end: String,
    },
    /// A date range has start > end.
    InvalidDateRange {
        /// Where the range came from.
        context: String,
        /// The range start.
        start: String,
        /// The range end.
        end: String,
    },
    /// The season scheduler configuration is invalid.
    InvalidSeasonConfig {
        /// Description of the problem.
        reason: String,
    },
    /// The declared timezone is not a known IANA name.
    InvalidTimezone(String),
    /// A local wall-clock time does not map to a single instant.
    UnresolvableLocalTime {
        /// Description of the problem.
        reason: String,
    },
    /// A game is malformed (e.g., a team playing itself).
    InvalidGame {
        /// The game identifier.
        game_id: String,
        /// Description of the problem.
        reason: String,
    },
    /// An entity references an identifier that is not in the problem.
    UnknownReference {
        /// The kind of entity referenced.
        kind: &'static str,
        /// The missing identifier.
        id: String,
        /// The entity holding the dangling reference.
        referenced_by: String,
    },
    /// The same identifier appears twice in one collection.
    DuplicateIdentifier {
        /// The kind of entity.
        kind: &'static str,
        /// The duplicated identifier.
        id: String,
    },
    /// Date arithmetic overflow.
    DateArithmeticOverflow {
        /// Description of the operation that failed.
        operation: String,
    },
}

impl std::fmt::Display for DomainError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidIdentifier { kind, value } => {
                write!(f, "Invalid {kind} identifier: '{value}'")
            }
            Self::InvalidRunId(msg) => write!(f, "Invalid run id: {msg}"),
            Self::InvalidIdempotencyKey(msg) => write!(f, "Invalid idempotency key: {msg}"),
            Self::DateParseError { date_string, error } => {
                write!(f, "Failed to parse date '{date_string}': {error}")
            }
            Self::TimeParseError { time_string, error } => {
                write!(f, "Failed to parse time '{time_string}': {error}")
            }
            Self::InvalidWeekday(name) => write!(f, "Invalid weekday: '{name}'"),
            Self::InvalidGameStatus(status) => write!(f, "Invalid game status: '{status}'"),
            Self::InvalidTimeRange {
                context,
                start,
                end,
            } => {
                write!(
                    f,
                    "Invalid time range for {context}: start {start} must be before end {end}"
                )
            }
            Self::InvalidDateRange {
                context,
                start,
                end,
            } => {
                write!(
                    f,
                    "Invalid date range for {context}: start {start} is after end {end}"
                )
            }
            Self::InvalidSeasonConfig { reason } => {
                write!(f, "Invalid season scheduler configuration: {reason}")
            }
            Self::InvalidTimezone(tz) => write!(f, "Invalid timezone: '{tz}'"),
            Self::UnresolvableLocalTime { reason } => {
                write!(f, "Local time cannot be resolved: {reason}")
            }
            Self::InvalidGame { game_id, reason } => {
                write!(f, "Invalid game {game_id}: {reason}")
            }
            Self::UnknownReference {
                kind,
                id,
                referenced_by,
            } => {
                write!(f, "Unknown {kind} {id} referenced by {referenced_by}")
            }
            Self::DuplicateIdentifier { kind, id } => {
                write!(f, "Duplicate {kind} identifier: {id}")
            }
            Self::DateArithmeticOverflow { operation } => {
                write!(f, "Date arithmetic overflow while {operation}")
            }
        }
    }
}

impl std::error::Error for DomainError {}
