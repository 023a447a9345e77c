//! Domain error types.

use thiserror::Error;

use crate::uid::Uid;

/// Top-level domain error type.
///
/// Variants up to `Forbidden` are user-facing business errors that the web
/// boundary maps to transport status codes via `code()`. `ContractViolation`
/// marks a programmer error (API misuse) and `Infrastructure` a persistence
/// fault; neither is recoverable by the client.
#[derive(Debug, Error)]
pub enum DomainError {
    /// A required field was missing or empty.
    #[error("{field} is required")]
    FieldRequired {
        /// The offending field.
        field: &'static str,
    },

    /// A field failed a format or length rule.
    #[error("{field} is invalid: {reason}")]
    FieldInvalid {
        /// The offending field.
        field: &'static str,
        /// The violated rule.
        reason: String,
    },

    /// A uniqueness rule was violated.
    #[error("{field} '{value}' is already taken")]
    AlreadyTaken {
        /// The unique field.
        field: &'static str,
        /// The conflicting value.
        value: String,
    },

    /// An aggregate was not found.
    #[error("{entity} {id} not found")]
    NotFound {
        /// The entity kind.
        entity: &'static str,
        /// The identifier that missed.
        id: Uid,
    },

    /// Optimistic concurrency conflict: another writer advanced the stored
    /// version since this aggregate was loaded.
    #[error(
        "outdated version on aggregate {aggregate_id}: expected {expected}, found {actual}"
    )]
    OutdatedVersion {
        /// The aggregate that had the conflict.
        aggregate_id: Uid,
        /// The stored version the writer expected to replace.
        expected: i64,
        /// The version actually found in storage.
        actual: i64,
    },

    /// No authenticated actor in the request context.
    #[error("authentication required")]
    Unauthorized,

    /// The acting user lacks the required role or ownership.
    #[error("insufficient privileges")]
    Forbidden,

    /// A caller broke an internal API contract. This is a defect, never a
    /// user-facing error, and must not be swallowed.
    #[error("contract violation: {0}")]
    ContractViolation(String),

    /// A database or driver fault.
    #[error("infrastructure error: {0}")]
    Infrastructure(String),
}

impl DomainError {
    /// Returns the stable machine-readable code for this error.
    #[must_use]
    pub fn code(&self) -> &'static str {
        match self {
            Self::FieldRequired { .. } => "FIELD_IS_REQUIRED",
            Self::FieldInvalid { .. } => "FIELD_IS_INVALID",
            Self::AlreadyTaken { .. } => "ALREADY_TAKEN",
            Self::NotFound { .. } => "NOT_FOUND",
            Self::OutdatedVersion { .. } => "OUTDATED_VERSION",
            Self::Unauthorized => "UNAUTHORIZED",
            Self::Forbidden => "FORBIDDEN",
            Self::ContractViolation(_) => "CONTRACT_VIOLATION",
            Self::Infrastructure(_) => "INFRASTRUCTURE_FAILURE",
        }
    }

    /// True when this error marks a defect rather than a user-facing
    /// condition.
    #[must_use]
    pub fn is_contract_violation(&self) -> bool {
        matches!(self, Self::ContractViolation(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_codes_are_stable() {
        assert_eq!(
            DomainError::FieldRequired { field: "email" }.code(),
            "FIELD_IS_REQUIRED"
        );
        assert_eq!(
            DomainError::OutdatedVersion {
                aggregate_id: Uid::generate(),
                expected: 1,
                actual: 2,
            }
            .code(),
            "OUTDATED_VERSION"
        );
        assert_eq!(DomainError::Unauthorized.code(), "UNAUTHORIZED");
        assert_eq!(DomainError::Forbidden.code(), "FORBIDDEN");
    }

    #[test]
    fn test_contract_violation_is_flagged_as_defect() {
        assert!(DomainError::ContractViolation("misuse".into()).is_contract_violation());
        assert!(!DomainError::Unauthorized.is_contract_violation());
    }
}
