//! Commands for the auth context.
//!
//! Commands carry raw, untrusted input; identifiers arrive as strings and
//! are parsed into [`gatehouse_core::uid::Uid`] by the handlers.

use serde::Deserialize;

/// Command to register a new user. Self-service: no authorization required.
#[derive(Debug, Clone, Deserialize)]
pub struct RegisterUser {
    /// Email address.
    pub email: String,
    /// Username.
    pub username: String,
    /// Display name.
    pub display_name: String,
}

/// Command to update a user's profile fields. Admin or owner only.
#[derive(Debug, Clone, Deserialize)]
pub struct UpdateUserProfile {
    /// Target user identifier.
    pub user_id: String,
    /// New display name, when changing.
    pub display_name: Option<String>,
    /// New email address, when changing.
    pub email: Option<String>,
}

/// Command to change a user's lifecycle status. Admin only.
#[derive(Debug, Clone, Deserialize)]
pub struct ChangeUserStatus {
    /// Target user identifier.
    pub user_id: String,
    /// Target status: `active`, `suspended`, or `deactivated`.
    pub status: String,
}

/// Command to create a user group. Admin only.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateUserGroup {
    /// Group name.
    pub name: String,
    /// Optional description.
    pub description: Option<String>,
}

/// Command to update a user group. Admin only.
#[derive(Debug, Clone, Deserialize)]
pub struct UpdateUserGroup {
    /// Target group identifier.
    pub group_id: String,
    /// New name, when changing.
    pub name: Option<String>,
    /// New description, when changing.
    pub description: Option<String>,
}

/// Command to add a user to a group. Admin only.
#[derive(Debug, Clone, Deserialize)]
pub struct AddGroupMember {
    /// Target group identifier.
    pub group_id: String,
    /// The user to add.
    pub user_id: String,
}

/// Command to create a role. Admin only.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateRole {
    /// Role code, immutable after creation.
    pub code: String,
    /// Role name.
    pub name: String,
    /// Optional description.
    pub description: Option<String>,
}

/// Command to update a role's name or description. Admin only.
#[derive(Debug, Clone, Deserialize)]
pub struct UpdateRole {
    /// Target role identifier.
    pub role_id: String,
    /// New name, when changing.
    pub name: Option<String>,
    /// New description, when changing.
    pub description: Option<String>,
}
