//! Query handlers for the auth context.
//!
//! Read-only: no events are registered and no versions advance.

use gatehouse_core::aggregate::Aggregate;
use gatehouse_core::error::DomainError;
use gatehouse_core::uid::Uid;
use serde::Serialize;

use crate::domain::aggregates::UserStatus;
use crate::domain::repositories::{RoleRepository, UserGroupRepository, UserRepository};

/// Read-only view of a user aggregate.
#[derive(Debug, Serialize)]
pub struct UserView {
    /// User identifier.
    pub id: Uid,
    /// Normalized email.
    pub email: String,
    /// Normalized username.
    pub username: String,
    /// Display name.
    pub display_name: String,
    /// Account status.
    pub status: UserStatus,
    /// Stored version.
    pub version: i64,
}

/// Read-only view of a user group aggregate, including its members.
#[derive(Debug, Serialize)]
pub struct UserGroupView {
    /// Group identifier.
    pub id: Uid,
    /// Group name.
    pub name: String,
    /// Optional description.
    pub description: Option<String>,
    /// Member identifiers.
    pub member_ids: Vec<Uid>,
    /// Stored version.
    pub version: i64,
}

/// Read-only view of a role aggregate.
#[derive(Debug, Serialize)]
pub struct RoleView {
    /// Role identifier.
    pub id: Uid,
    /// Role code.
    pub code: String,
    /// Role name.
    pub name: String,
    /// Optional description.
    pub description: Option<String>,
    /// Stored version.
    pub version: i64,
}

/// Retrieves a user by identifier.
///
/// # Errors
///
/// Returns `DomainError::NotFound` when no such user exists.
pub async fn get_user_by_id(
    user_id: Uid,
    users: &dyn UserRepository,
) -> Result<UserView, DomainError> {
    let user = users.find_by_id(user_id).await?.ok_or(DomainError::NotFound {
        entity: "User",
        id: user_id,
    })?;
    Ok(UserView {
        id: user.id(),
        email: user.email().to_owned(),
        username: user.username().to_owned(),
        display_name: user.display_name().to_owned(),
        status: user.status(),
        version: user.version(),
    })
}

/// Retrieves a user group by identifier, including member ids.
///
/// # Errors
///
/// Returns `DomainError::NotFound` when no such group exists.
pub async fn get_user_group_by_id(
    group_id: Uid,
    groups: &dyn UserGroupRepository,
) -> Result<UserGroupView, DomainError> {
    let group = groups
        .find_by_id(group_id)
        .await?
        .ok_or(DomainError::NotFound {
            entity: "UserGroup",
            id: group_id,
        })?;
    let member_ids = groups.member_ids(group_id).await?;
    Ok(UserGroupView {
        id: group.id(),
        name: group.name().to_owned(),
        description: group.description().map(ToOwned::to_owned),
        member_ids,
        version: group.version(),
    })
}

/// Retrieves a role by identifier.
///
/// # Errors
///
/// Returns `DomainError::NotFound` when no such role exists.
pub async fn get_role_by_id(
    role_id: Uid,
    roles: &dyn RoleRepository,
) -> Result<RoleView, DomainError> {
    let role = roles.find_by_id(role_id).await?.ok_or(DomainError::NotFound {
        entity: "Role",
        id: role_id,
    })?;
    Ok(RoleView {
        id: role.id(),
        code: role.code().to_owned(),
        name: role.name().to_owned(),
        description: role.description().map(ToOwned::to_owned),
        version: role.version(),
    })
}

#[cfg(test)]
mod tests {
    use gatehouse_test_support::FixedClock;

    use super::*;
    use crate::domain::aggregates::User;
    use crate::testing::InMemoryUserRepository;

    #[tokio::test]
    async fn test_get_user_by_id_returns_view_without_side_effects() {
        // Arrange
        let users = InMemoryUserRepository::new();
        let clock = FixedClock::default();
        let mut user = User::register("a@b.com", "ada", "Ada", None, &clock).unwrap();
        user.take_events();
        users.save(&user).await.unwrap();

        // Act
        let view = get_user_by_id(user.id(), &users).await.unwrap();

        // Assert
        assert_eq!(view.id, user.id());
        assert_eq!(view.email, "a@b.com");
        assert_eq!(view.version, 0);
    }

    #[tokio::test]
    async fn test_get_user_by_id_unknown_is_not_found() {
        let users = InMemoryUserRepository::new();
        let err = get_user_by_id(Uid::generate(), &users).await.unwrap_err();
        assert_eq!(err.code(), "NOT_FOUND");
    }
}
