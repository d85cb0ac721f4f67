// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use league_scheduler_domain::{DomainError, Violation};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Why an apply was refused with a conflict.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConflictReason {
    /// The proposal no longer satisfies the hard constraints.
    StaleProposal,
    /// The idempotency key was already used for a different request.
    IdempotencyKeyReused,
}

impl ConflictReason {
    /// Converts this reason to its wire representation.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::StaleProposal => "stale_proposal",
            Self::IdempotencyKeyReused => "idempotency_key_reused",
        }
    }
}

impl std::fmt::Display for ConflictReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Errors produced by the scheduler core.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CoreError {
    /// Malformed input. Never retried.
    #[error("Invalid {field}: {message}")]
    Validation { field: String, message: String },

    /// A referenced entity does not exist in the requested scope.
    #[error("{resource} not found: {message}")]
    NotFound { resource: String, message: String },

    /// An apply cannot proceed; the caller must re-solve.
    #[error("Conflict ({reason}): {} violation(s)", .violations.len())]
    Conflict {
        reason: ConflictReason,
        violations: Vec<Violation>,
    },

    /// Another apply recorded the same idempotency key first.
    #[error("Idempotency key '{key}' was recorded by a concurrent apply")]
    LedgerContention { key: String },

    /// The backing store failed.
    #[error("Store failure: {0}")]
    Store(String),
}

impl CoreError {
    /// Shorthand for a validation error.
    #[must_use]
    pub fn validation(field: &str, message: impl Into<String>) -> Self {
        Self::Validation {
            field: field.to_string(),
            message: message.into(),
        }
    }

    /// Shorthand for a not-found error.
    #[must_use]
    pub fn not_found(resource: &str, message: impl Into<String>) -> Self {
        Self::NotFound {
            resource: resource.to_string(),
            message: message.into(),
        }
    }
}

/// Names the input a domain error is about.
const fn domain_error_field(err: &DomainError) -> &'static str {
    match err {
        DomainError::InvalidIdentifier { kind, .. }
        | DomainError::UnknownReference { kind, .. }
        | DomainError::DuplicateIdentifier { kind, .. } => *kind,
        DomainError::InvalidRunId(_) => "run_id",
        DomainError::InvalidIdempotencyKey(_) => "idempotency_key",
        DomainError::DateParseError { .. } => "date",
        DomainError::TimeParseError { .. } => "time",
        DomainError::InvalidWeekday(_) => "days",
        DomainError::InvalidGameStatus(_) => "status",
        DomainError::InvalidTimeRange { .. } | DomainError::InvalidDateRange { .. } => "range",
        DomainError::InvalidSeasonConfig { .. } | DomainError::DateArithmeticOverflow { .. } => {
            "season_config"
        }
        DomainError::InvalidTimezone(_) | DomainError::UnresolvableLocalTime { .. } => "timezone",
        DomainError::InvalidGame { .. } => "game",
    }
}

impl From<DomainError> for CoreError {
    fn from(err: DomainError) -> Self {
        Self::Validation {
            field: domain_error_field(&err).to_string(),
            message: err.to_string(),
        }
    }
}

impl From<serde_json::Error> for CoreError {
    fn from(err: serde_json::Error) -> Self {
        Self::Store(format!("serialization failed: {err}"))
    }
}
