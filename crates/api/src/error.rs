// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Error types for the API layer.

use league_scheduler::CoreError;
use league_scheduler_domain::{DomainError, Violation};
use league_scheduler_persistence::PersistenceError;

/// API-level errors.
///
/// These are distinct from domain/core errors and represent the API contract.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApiError {
    /// Invalid input was provided.
    InvalidInput {
        /// The field that was invalid.
        field: String,
        /// A human-readable description of the error.
        message: String,
    },
    /// A requested resource was not found.
    ResourceNotFound {
        /// The type of resource that was not found.
        resource_type: String,
        /// A human-readable description of what was not found.
        message: String,
    },
    /// The request cannot be carried out against current state.
    Conflict {
        /// Machine-readable reason, e.g. `stale_proposal`.
        reason: String,
        /// A human-readable description of the conflict.
        message: String,
        /// The hard constraints the proposal breaks, if any.
        violations: Vec<Violation>,
    },
    /// An internal error occurred.
    Internal {
        /// A description of the internal error.
        message: String,
    },
}

impl ApiError {
    /// Machine-readable code for the error body.
    #[must_use]
    pub fn code(&self) -> &str {
        match self {
            Self::InvalidInput { .. } => "invalid_input",
            Self::ResourceNotFound { .. } => "not_found",
            Self::Conflict { reason, .. } => reason,
            Self::Internal { .. } => "internal",
        }
    }

    /// The violations carried by a conflict; empty otherwise.
    #[must_use]
    pub fn violations(&self) -> &[Violation] {
        match self {
            Self::Conflict { violations, .. } => violations,
            _ => &[],
        }
    }
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidInput { field, message } => {
                write!(f, "Invalid input for field '{field}': {message}")
            }
            Self::ResourceNotFound {
                resource_type,
                message,
            } => {
                write!(f, "{resource_type} not found: {message}")
            }
            Self::Conflict {
                reason, message, ..
            } => {
                write!(f, "Conflict ({reason}): {message}")
            }
            Self::Internal { message } => {
                write!(f, "Internal error: {message}")
            }
        }
    }
}

impl std::error::Error for ApiError {}

/// Translates a domain error into an API error.
///
/// Domain errors only reach the API from request decoding, so every one of
/// them is an input problem.
#[must_use]
pub fn translate_domain_error(err: DomainError) -> ApiError {
    translate_core_error(CoreError::from(err))
}

/// Translates a core error into an API error.
///
/// This translation is explicit and ensures core errors are not leaked directly.
#[must_use]
pub fn translate_core_error(err: CoreError) -> ApiError {
    match err {
        CoreError::Validation { field, message } => ApiError::InvalidInput { field, message },
        CoreError::NotFound { resource, message } => ApiError::ResourceNotFound {
            resource_type: resource,
            message,
        },
        CoreError::Conflict { reason, violations } => {
            let message: String = match violations.len() {
                0 => format!("the request conflicts with current state ({reason})"),
                1 => String::from("the proposal breaks 1 hard constraint; re-solve and retry"),
                n => format!("the proposal breaks {n} hard constraints; re-solve and retry"),
            };
            ApiError::Conflict {
                reason: reason.as_str().to_string(),
                message,
                violations,
            }
        }
        CoreError::LedgerContention { key } => ApiError::Conflict {
            reason: String::from("ledger_contention"),
            message: format!("idempotency key '{key}' is being applied concurrently; retry"),
            violations: Vec::new(),
        },
        CoreError::Store(msg) => ApiError::Internal {
            message: format!("Store failure: {msg}"),
        },
    }
}

/// Translates a persistence error into an API error.
#[must_use]
pub fn translate_persistence_error(err: PersistenceError) -> ApiError {
    match err {
        PersistenceError::InvalidInput { field, message } => {
            ApiError::InvalidInput { field, message }
        }
        PersistenceError::NotFound(message) => ApiError::ResourceNotFound {
            resource_type: String::from("Resource"),
            message,
        },
        other => translate_core_error(CoreError::from(other)),
    }
}
