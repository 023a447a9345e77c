//! Business-rule checks that require repository reads.
//!
//! Uniqueness and existence rules live here so command handlers stay a
//! plain sequence of steps.

use gatehouse_core::error::DomainError;
use gatehouse_core::uid::Uid;

use crate::domain::aggregates::User;
use crate::domain::repositories::{RoleRepository, UserGroupRepository, UserRepository};

/// Fails with `ALREADY_TAKEN` when the email is in use.
///
/// # Errors
///
/// Returns `DomainError::AlreadyTaken` on conflict, or the repository's
/// error on read failure.
pub async fn ensure_email_available(
    users: &dyn UserRepository,
    email: &str,
) -> Result<(), DomainError> {
    if users.find_by_email(email).await?.is_some() {
        return Err(DomainError::AlreadyTaken {
            field: "email",
            value: email.to_owned(),
        });
    }
    Ok(())
}

/// Fails with `ALREADY_TAKEN` when the username is in use.
///
/// # Errors
///
/// Returns `DomainError::AlreadyTaken` on conflict, or the repository's
/// error on read failure.
pub async fn ensure_username_available(
    users: &dyn UserRepository,
    username: &str,
) -> Result<(), DomainError> {
    if users.find_by_username(username).await?.is_some() {
        return Err(DomainError::AlreadyTaken {
            field: "username",
            value: username.to_owned(),
        });
    }
    Ok(())
}

/// Loads a user or fails with `NOT_FOUND`.
///
/// # Errors
///
/// Returns `DomainError::NotFound` when the user does not exist, or the
/// repository's error on read failure.
pub async fn ensure_user_exists(
    users: &dyn UserRepository,
    user_id: Uid,
) -> Result<User, DomainError> {
    users.find_by_id(user_id).await?.ok_or(DomainError::NotFound {
        entity: "User",
        id: user_id,
    })
}

/// Fails with `ALREADY_TAKEN` when the group name is in use.
///
/// # Errors
///
/// Returns `DomainError::AlreadyTaken` on conflict, or the repository's
/// error on read failure.
pub async fn ensure_group_name_available(
    groups: &dyn UserGroupRepository,
    name: &str,
) -> Result<(), DomainError> {
    if groups.find_by_name(name).await?.is_some() {
        return Err(DomainError::AlreadyTaken {
            field: "name",
            value: name.to_owned(),
        });
    }
    Ok(())
}

/// Fails with `ALREADY_TAKEN` when the role code is in use.
///
/// # Errors
///
/// Returns `DomainError::AlreadyTaken` on conflict, or the repository's
/// error on read failure.
pub async fn ensure_role_code_available(
    roles: &dyn RoleRepository,
    code: &str,
) -> Result<(), DomainError> {
    if roles.find_by_code(code).await?.is_some() {
        return Err(DomainError::AlreadyTaken {
            field: "code",
            value: code.to_owned(),
        });
    }
    Ok(())
}
