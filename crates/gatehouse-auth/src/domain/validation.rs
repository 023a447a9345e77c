//! Field rules shared by the auth aggregates.
//!
//! Each function normalizes (trims, lowercases where the field is
//! case-insensitive) and validates one field, failing with the offending
//! field name. Aggregates call these at construction and in every setter.

use gatehouse_core::error::DomainError;
use validator::ValidateEmail;

const MAX_EMAIL_LEN: usize = 254;
const MIN_USERNAME_LEN: usize = 3;
const MAX_USERNAME_LEN: usize = 50;
const MAX_DISPLAY_NAME_LEN: usize = 100;
const MAX_GROUP_NAME_LEN: usize = 100;
const MAX_DESCRIPTION_LEN: usize = 500;
const MAX_ROLE_CODE_LEN: usize = 50;
const MAX_ROLE_NAME_LEN: usize = 100;

fn required<'a>(value: &'a str, field: &'static str) -> Result<&'a str, DomainError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(DomainError::FieldRequired { field });
    }
    Ok(trimmed)
}

fn max_len(value: &str, max: usize, field: &'static str) -> Result<(), DomainError> {
    if value.chars().count() > max {
        return Err(DomainError::FieldInvalid {
            field,
            reason: format!("must be at most {max} characters"),
        });
    }
    Ok(())
}

/// Normalized (lowercased) email address.
pub(crate) fn email(value: &str) -> Result<String, DomainError> {
    let trimmed = required(value, "email")?;
    max_len(trimmed, MAX_EMAIL_LEN, "email")?;
    if !trimmed.validate_email() {
        return Err(DomainError::FieldInvalid {
            field: "email",
            reason: "not a valid email address".to_owned(),
        });
    }
    Ok(trimmed.to_lowercase())
}

/// Normalized (lowercased) username: 3-50 chars from `[a-z0-9_.-]`.
pub(crate) fn username(value: &str) -> Result<String, DomainError> {
    let trimmed = required(value, "username")?.to_lowercase();
    if trimmed.chars().count() < MIN_USERNAME_LEN {
        return Err(DomainError::FieldInvalid {
            field: "username",
            reason: format!("must be at least {MIN_USERNAME_LEN} characters"),
        });
    }
    max_len(&trimmed, MAX_USERNAME_LEN, "username")?;
    if !trimmed
        .chars()
        .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || matches!(c, '_' | '.' | '-'))
    {
        return Err(DomainError::FieldInvalid {
            field: "username",
            reason: "may only contain letters, digits, '_', '.' and '-'".to_owned(),
        });
    }
    Ok(trimmed)
}

/// Display name: 1-100 chars.
pub(crate) fn display_name(value: &str) -> Result<String, DomainError> {
    let trimmed = required(value, "display_name")?;
    max_len(trimmed, MAX_DISPLAY_NAME_LEN, "display_name")?;
    Ok(trimmed.to_owned())
}

/// Group name: 1-100 chars.
pub(crate) fn group_name(value: &str) -> Result<String, DomainError> {
    let trimmed = required(value, "name")?;
    max_len(trimmed, MAX_GROUP_NAME_LEN, "name")?;
    Ok(trimmed.to_owned())
}

/// Optional free-text description, max 500 chars; blank collapses to `None`.
pub(crate) fn description(value: Option<&str>) -> Result<Option<String>, DomainError> {
    match value.map(str::trim) {
        None | Some("") => Ok(None),
        Some(trimmed) => {
            max_len(trimmed, MAX_DESCRIPTION_LEN, "description")?;
            Ok(Some(trimmed.to_owned()))
        }
    }
}

/// Role code: `[A-Z][A-Z0-9_]*`, max 50 chars. Immutable after creation.
pub(crate) fn role_code(value: &str) -> Result<String, DomainError> {
    let trimmed = required(value, "code")?;
    max_len(trimmed, MAX_ROLE_CODE_LEN, "code")?;
    let mut chars = trimmed.chars();
    let starts_upper = chars.next().is_some_and(|c| c.is_ascii_uppercase());
    let rest_ok = chars.all(|c| c.is_ascii_uppercase() || c.is_ascii_digit() || c == '_');
    if !starts_upper || !rest_ok {
        return Err(DomainError::FieldInvalid {
            field: "code",
            reason: "must match [A-Z][A-Z0-9_]*".to_owned(),
        });
    }
    Ok(trimmed.to_owned())
}

/// Role name: 1-100 chars.
pub(crate) fn role_name(value: &str) -> Result<String, DomainError> {
    let trimmed = required(value, "name")?;
    max_len(trimmed, MAX_ROLE_NAME_LEN, "name")?;
    Ok(trimmed.to_owned())
}
