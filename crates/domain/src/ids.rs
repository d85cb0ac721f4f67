// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Opaque identifiers.
//!
//! Entity identifiers are assigned by the surrounding application and are
//! only ever compared, ordered, hashed, displayed and parsed here. They are
//! carried as decimal strings on the wire so that clients never round them
//! through a floating point number; plain JSON integers are still accepted
//! on input.

use crate::error::DomainError;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Maximum length of run identifiers and idempotency keys.
pub const MAX_TOKEN_LEN: usize = 128;

/// Wire representation accepted when deserializing an identifier.
#[doc(hidden)]
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum IdRepr {
    Number(i64),
    Text(String),
}

macro_rules! opaque_id {
    ($(#[$meta:meta])* $name:ident, $kind:literal) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(try_from = "IdRepr", into = "String")]
        pub struct $name(i64);

        impl $name {
            /// Wraps a raw identifier value.
            #[must_use]
            pub const fn new(value: i64) -> Self {
                Self(value)
            }

            /// Returns the raw value for storage.
            #[must_use]
            pub const fn value(self) -> i64 {
                self.0
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl FromStr for $name {
            type Err = DomainError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                s.trim()
                    .parse::<i64>()
                    .map(Self)
                    .map_err(|_| DomainError::InvalidIdentifier {
                        kind: $kind,
                        value: s.to_string(),
                    })
            }
        }

        impl From<$name> for String {
            fn from(id: $name) -> Self {
                id.0.to_string()
            }
        }

        impl TryFrom<IdRepr> for $name {
            type Error = DomainError;

            fn try_from(repr: IdRepr) -> Result<Self, Self::Error> {
                match repr {
                    IdRepr::Number(value) => Ok(Self(value)),
                    IdRepr::Text(text) => text.parse(),
                }
            }
        }
    };
}

opaque_id!(
    /// Identifies the account (organization) that owns seasons, fields and umpires.
    AccountId,
    "account"
);
opaque_id!(
    /// Identifies a season within an account.
    SeasonId,
    "season"
);
opaque_id!(
    /// Identifies one league's participation in a season.
    LeagueSeasonId,
    "league season"
);
opaque_id!(
    /// Identifies a team.
    TeamId,
    "team"
);
opaque_id!(
    /// Identifies a playing field.
    FieldId,
    "field"
);
opaque_id!(
    /// Identifies an umpire.
    UmpireId,
    "umpire"
);
opaque_id!(
    /// Identifies a game.
    GameId,
    "game"
);

fn check_token(value: &str) -> Result<(), String> {
    if value.is_empty() {
        return Err(String::from("must not be empty"));
    }
    if value.len() > MAX_TOKEN_LEN {
        return Err(format!("must be at most {MAX_TOKEN_LEN} characters"));
    }
    if value.chars().any(|c| c.is_whitespace() || c.is_control()) {
        return Err(String::from("must not contain whitespace"));
    }
    Ok(())
}

/// Identifies one solve run; a proposal is applied under its run id.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct RunId(String);

impl RunId {
    /// Creates a run id.
    ///
    /// # Errors
    ///
    /// Returns an error if the value is empty, longer than
    /// [`MAX_TOKEN_LEN`], or contains whitespace.
    pub fn new(value: &str) -> Result<Self, DomainError> {
        check_token(value).map_err(DomainError::InvalidRunId)?;
        Ok(Self(value.to_string()))
    }

    /// Returns the run id text.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for RunId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for RunId {
    type Error = DomainError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        check_token(&value).map_err(DomainError::InvalidRunId)?;
        Ok(Self(value))
    }
}

impl From<RunId> for String {
    fn from(id: RunId) -> Self {
        id.0
    }
}

/// Caller-supplied token making an apply at-most-once.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct IdempotencyKey(String);

impl IdempotencyKey {
    /// Creates an idempotency key.
    ///
    /// # Errors
    ///
    /// Returns an error if the value is empty, longer than
    /// [`MAX_TOKEN_LEN`], or contains whitespace.
    pub fn new(value: &str) -> Result<Self, DomainError> {
        check_token(value).map_err(DomainError::InvalidIdempotencyKey)?;
        Ok(Self(value.to_string()))
    }

    /// Returns the key text.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for IdempotencyKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for IdempotencyKey {
    type Error = DomainError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        check_token(&value).map_err(DomainError::InvalidIdempotencyKey)?;
        Ok(Self(value))
    }
}

impl From<IdempotencyKey> for String {
    fn from(key: IdempotencyKey) -> Self {
        key.0
    }
}

impl From<&RunId> for IdempotencyKey {
    fn from(run_id: &RunId) -> Self {
        // Both types share the same token rules.
        Self(run_id.0.clone())
    }
}
