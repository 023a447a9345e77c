//! Validated identifier value object.

use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::DomainError;

/// A validated aggregate identifier.
///
/// Construction is the single validation gate: once a `Uid` exists it is
/// guaranteed well-formed for the remainder of its lifetime, so downstream
/// code never re-validates identifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Uid(Uuid);

impl Uid {
    /// Parses an identifier from untrusted input, naming the offending
    /// field when validation fails.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::FieldRequired` for empty input and
    /// `DomainError::FieldInvalid` when the value is not a well-formed UUID.
    pub fn parse(value: &str, field: &'static str) -> Result<Self, DomainError> {
        if value.trim().is_empty() {
            return Err(DomainError::FieldRequired { field });
        }
        Uuid::parse_str(value)
            .map(Self)
            .map_err(|_| DomainError::FieldInvalid {
                field,
                reason: "not a valid UUID".to_owned(),
            })
    }

    /// Generates a new random, time-ordered (v7) identifier.
    #[must_use]
    pub fn generate() -> Self {
        Self(Uuid::now_v7())
    }

    /// Returns the inner `uuid::Uuid` for database binding.
    #[must_use]
    pub fn as_uuid(&self) -> Uuid {
        self.0
    }
}

impl From<Uuid> for Uid {
    fn from(value: Uuid) -> Self {
        Self(value)
    }
}

impl fmt::Display for Uid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}
