//! Domain events emitted by the auth aggregates.

use gatehouse_core::uid::Uid;
use serde::{Deserialize, Serialize};

use super::aggregates::UserStatus;

/// Event type identifier for [`UserRegistered`].
pub const USER_REGISTERED: &str = "USER_REGISTERED";

/// Event type identifier for [`UserProfileUpdated`].
pub const USER_PROFILE_UPDATED: &str = "USER_PROFILE_UPDATED";

/// Event type identifier for [`UserStatusChanged`].
pub const USER_STATUS_CHANGED: &str = "USER_STATUS_CHANGED";

/// Event type identifier for [`UserGroupCreated`].
pub const USER_GROUP_CREATED: &str = "USER_GROUP_CREATED";

/// Event type identifier for [`UserGroupUpdated`].
pub const USER_GROUP_UPDATED: &str = "USER_GROUP_UPDATED";

/// Event type identifier for [`UserAddedToGroup`].
pub const USER_ADDED_TO_GROUP: &str = "USER_ADDED_TO_GROUP";

/// Event type identifier for [`RoleCreated`].
pub const ROLE_CREATED: &str = "ROLE_CREATED";

/// Event type identifier for [`RoleUpdated`].
pub const ROLE_UPDATED: &str = "ROLE_UPDATED";

/// Emitted when a new user registers.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserRegistered {
    /// Normalized email address.
    pub email: String,
    /// Normalized username.
    pub username: String,
    /// Display name.
    pub display_name: String,
}

/// Emitted once per profile field change.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserProfileUpdated {
    /// The changed field.
    pub field: String,
    /// The new value.
    pub value: String,
}

/// Emitted when a user's status transitions.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserStatusChanged {
    /// The previous status.
    pub from: UserStatus,
    /// The new status.
    pub to: UserStatus,
}

/// Emitted when a user group is created.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserGroupCreated {
    /// Group name.
    pub name: String,
    /// Optional description.
    pub description: Option<String>,
}

/// Emitted once per group field change.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserGroupUpdated {
    /// The changed field.
    pub field: String,
    /// The new value.
    pub value: String,
}

/// Emitted when a user is added to a group.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserAddedToGroup {
    /// The added member.
    pub user_id: Uid,
}

/// Emitted when a role is created.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoleCreated {
    /// Role code (immutable).
    pub code: String,
    /// Role name.
    pub name: String,
}

/// Emitted once per role field change.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoleUpdated {
    /// The changed field.
    pub field: String,
    /// The new value.
    pub value: String,
}
