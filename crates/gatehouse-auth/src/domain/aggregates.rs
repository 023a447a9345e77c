//! Aggregate roots for the auth context.
//!
//! Every observable mutation validates its input and registers exactly one
//! domain event before the aggregate is saved. Setters are idempotent: a
//! value equal to the current one changes nothing and emits nothing.

use gatehouse_core::aggregate::{Aggregate, AggregateMeta};
use gatehouse_core::clock::Clock;
use gatehouse_core::error::DomainError;
use gatehouse_core::uid::Uid;
use serde::{Deserialize, Serialize};

use super::events::{
    ROLE_CREATED, ROLE_UPDATED, RoleCreated, RoleUpdated, USER_ADDED_TO_GROUP, USER_GROUP_CREATED,
    USER_GROUP_UPDATED, USER_PROFILE_UPDATED, USER_REGISTERED, USER_STATUS_CHANGED,
    UserAddedToGroup, UserGroupCreated, UserGroupUpdated, UserProfileUpdated, UserRegistered,
    UserStatusChanged,
};
use super::validation;

fn payload<T: Serialize>(value: &T) -> serde_json::Value {
    // Serialization of derived Serialize types to Value is infallible.
    serde_json::to_value(value).expect("event payload serialization is infallible")
}

/// Lifecycle status of a user account.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UserStatus {
    /// Normal, usable account.
    Active,
    /// Temporarily blocked; can be reactivated.
    Suspended,
    /// Permanently retired; terminal state.
    Deactivated,
}

impl UserStatus {
    /// Stable text form stored in the database.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::Suspended => "suspended",
            Self::Deactivated => "deactivated",
        }
    }

    /// Parses the stored text form.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::FieldInvalid` for unknown values.
    pub fn parse(value: &str) -> Result<Self, DomainError> {
        match value {
            "active" => Ok(Self::Active),
            "suspended" => Ok(Self::Suspended),
            "deactivated" => Ok(Self::Deactivated),
            other => Err(DomainError::FieldInvalid {
                field: "status",
                reason: format!("unknown status '{other}'"),
            }),
        }
    }
}

/// The user aggregate.
#[derive(Debug, Clone)]
pub struct User {
    meta: AggregateMeta,
    email: String,
    username: String,
    display_name: String,
    status: UserStatus,
}

impl User {
    /// Registers a new user with a freshly generated identifier.
    ///
    /// Emits `USER_REGISTERED`.
    ///
    /// # Errors
    ///
    /// Returns a validation error when any field violates its rule.
    pub fn register(
        email: &str,
        username: &str,
        display_name: &str,
        created_by: Option<Uid>,
        clock: &dyn Clock,
    ) -> Result<Self, DomainError> {
        let email = validation::email(email)?;
        let username = validation::username(username)?;
        let display_name = validation::display_name(display_name)?;

        let mut user = Self {
            meta: AggregateMeta::new(Uid::generate(), clock.now(), created_by),
            email: email.clone(),
            username: username.clone(),
            display_name: display_name.clone(),
            status: UserStatus::Active,
        };
        user.register_event(
            USER_REGISTERED,
            payload(&UserRegistered {
                email,
                username,
                display_name,
            }),
        );
        Ok(user)
    }

    /// Reconstructs a user from its stored row. No events are registered.
    #[must_use]
    pub fn from_stored(
        meta: AggregateMeta,
        email: String,
        username: String,
        display_name: String,
        status: UserStatus,
    ) -> Self {
        Self {
            meta,
            email,
            username,
            display_name,
            status,
        }
    }

    /// Normalized email address.
    #[must_use]
    pub fn email(&self) -> &str {
        &self.email
    }

    /// Normalized username.
    #[must_use]
    pub fn username(&self) -> &str {
        &self.username
    }

    /// Display name.
    #[must_use]
    pub fn display_name(&self) -> &str {
        &self.display_name
    }

    /// Account status.
    #[must_use]
    pub fn status(&self) -> UserStatus {
        self.status
    }

    /// Changes the display name. Emits `USER_PROFILE_UPDATED` when the value
    /// actually changes.
    ///
    /// # Errors
    ///
    /// Returns a validation error when the new value violates its rule.
    pub fn set_display_name(&mut self, value: &str) -> Result<(), DomainError> {
        let value = validation::display_name(value)?;
        if value == self.display_name {
            return Ok(());
        }
        self.display_name.clone_from(&value);
        self.register_event(
            USER_PROFILE_UPDATED,
            payload(&UserProfileUpdated {
                field: "display_name".to_owned(),
                value,
            }),
        );
        Ok(())
    }

    /// Changes the email address. Emits `USER_PROFILE_UPDATED` when the value
    /// actually changes. Uniqueness is a repository-level rule checked by the
    /// command handler.
    ///
    /// # Errors
    ///
    /// Returns a validation error when the new value violates its rule.
    pub fn set_email(&mut self, value: &str) -> Result<(), DomainError> {
        let value = validation::email(value)?;
        if value == self.email {
            return Ok(());
        }
        self.email.clone_from(&value);
        self.register_event(
            USER_PROFILE_UPDATED,
            payload(&UserProfileUpdated {
                field: "email".to_owned(),
                value,
            }),
        );
        Ok(())
    }

    /// Suspends an active account. Emits `USER_STATUS_CHANGED`.
    ///
    /// # Errors
    ///
    /// Returns a validation error unless the account is active.
    pub fn suspend(&mut self) -> Result<(), DomainError> {
        self.transition(UserStatus::Suspended, &[UserStatus::Active])
    }

    /// Reactivates a suspended account. Emits `USER_STATUS_CHANGED`.
    ///
    /// # Errors
    ///
    /// Returns a validation error unless the account is suspended.
    pub fn reactivate(&mut self) -> Result<(), DomainError> {
        self.transition(UserStatus::Active, &[UserStatus::Suspended])
    }

    /// Deactivates an account. Terminal. Emits `USER_STATUS_CHANGED`.
    ///
    /// # Errors
    ///
    /// Returns a validation error when the account is already deactivated.
    pub fn deactivate(&mut self) -> Result<(), DomainError> {
        self.transition(
            UserStatus::Deactivated,
            &[UserStatus::Active, UserStatus::Suspended],
        )
    }

    fn transition(&mut self, to: UserStatus, allowed_from: &[UserStatus]) -> Result<(), DomainError> {
        if !allowed_from.contains(&self.status) {
            return Err(DomainError::FieldInvalid {
                field: "status",
                reason: format!(
                    "cannot change status from '{}' to '{}'",
                    self.status.as_str(),
                    to.as_str()
                ),
            });
        }
        let from = self.status;
        self.status = to;
        self.register_event(USER_STATUS_CHANGED, payload(&UserStatusChanged { from, to }));
        Ok(())
    }
}

impl Aggregate for User {
    fn aggregate_name(&self) -> &'static str {
        "User"
    }

    fn meta(&self) -> &AggregateMeta {
        &self.meta
    }

    fn meta_mut(&mut self) -> &mut AggregateMeta {
        &mut self.meta
    }

    fn to_json(&self) -> serde_json::Value {
        let mut json = self.meta.base_json();
        json["email"] = self.email.clone().into();
        json["username"] = self.username.clone().into();
        json["display_name"] = self.display_name.clone().into();
        json["status"] = self.status.as_str().into();
        json
    }
}

/// The user group aggregate. Membership rows live in a junction table and
/// are written atomically with the group via the repository's post-save
/// callback; the aggregate records the fact as an event.
#[derive(Debug, Clone)]
pub struct UserGroup {
    meta: AggregateMeta,
    name: String,
    description: Option<String>,
}

impl UserGroup {
    /// Creates a new group. Emits `USER_GROUP_CREATED`.
    ///
    /// # Errors
    ///
    /// Returns a validation error when any field violates its rule.
    pub fn create(
        name: &str,
        description: Option<&str>,
        created_by: Uid,
        clock: &dyn Clock,
    ) -> Result<Self, DomainError> {
        let name = validation::group_name(name)?;
        let description = validation::description(description)?;

        let mut group = Self {
            meta: AggregateMeta::new(Uid::generate(), clock.now(), Some(created_by)),
            name: name.clone(),
            description: description.clone(),
        };
        group.register_event(
            USER_GROUP_CREATED,
            payload(&UserGroupCreated { name, description }),
        );
        Ok(group)
    }

    /// Reconstructs a group from its stored row. No events are registered.
    #[must_use]
    pub fn from_stored(meta: AggregateMeta, name: String, description: Option<String>) -> Self {
        Self {
            meta,
            name,
            description,
        }
    }

    /// Group name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Optional description.
    #[must_use]
    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    /// Renames the group. Emits `USER_GROUP_UPDATED` when the value actually
    /// changes.
    ///
    /// # Errors
    ///
    /// Returns a validation error when the new value violates its rule.
    pub fn set_name(&mut self, value: &str) -> Result<(), DomainError> {
        let value = validation::group_name(value)?;
        if value == self.name {
            return Ok(());
        }
        self.name.clone_from(&value);
        self.register_event(
            USER_GROUP_UPDATED,
            payload(&UserGroupUpdated {
                field: "name".to_owned(),
                value,
            }),
        );
        Ok(())
    }

    /// Changes the description. Emits `USER_GROUP_UPDATED` when the value
    /// actually changes.
    ///
    /// # Errors
    ///
    /// Returns a validation error when the new value violates its rule.
    pub fn set_description(&mut self, value: Option<&str>) -> Result<(), DomainError> {
        let value = validation::description(value)?;
        if value == self.description {
            return Ok(());
        }
        self.description.clone_from(&value);
        self.register_event(
            USER_GROUP_UPDATED,
            payload(&UserGroupUpdated {
                field: "description".to_owned(),
                value: value.unwrap_or_default(),
            }),
        );
        Ok(())
    }

    /// Records a new member. Emits `USER_ADDED_TO_GROUP`; the junction row
    /// itself is written by the repository alongside the aggregate save.
    pub fn record_member_added(&mut self, user_id: Uid) {
        self.register_event(USER_ADDED_TO_GROUP, payload(&UserAddedToGroup { user_id }));
    }
}

impl Aggregate for UserGroup {
    fn aggregate_name(&self) -> &'static str {
        "UserGroup"
    }

    fn meta(&self) -> &AggregateMeta {
        &self.meta
    }

    fn meta_mut(&mut self) -> &mut AggregateMeta {
        &mut self.meta
    }

    fn to_json(&self) -> serde_json::Value {
        let mut json = self.meta.base_json();
        json["name"] = self.name.clone().into();
        json["description"] = self.description.clone().into();
        json
    }
}

/// The role aggregate. The code is the stable machine identifier and is
/// immutable after creation; only name and description may change.
#[derive(Debug, Clone)]
pub struct Role {
    meta: AggregateMeta,
    code: String,
    name: String,
    description: Option<String>,
}

impl Role {
    /// Creates a new role. Emits `ROLE_CREATED`.
    ///
    /// # Errors
    ///
    /// Returns a validation error when any field violates its rule.
    pub fn create(
        code: &str,
        name: &str,
        description: Option<&str>,
        created_by: Uid,
        clock: &dyn Clock,
    ) -> Result<Self, DomainError> {
        let code = validation::role_code(code)?;
        let name = validation::role_name(name)?;
        let description = validation::description(description)?;

        let mut role = Self {
            meta: AggregateMeta::new(Uid::generate(), clock.now(), Some(created_by)),
            code: code.clone(),
            name: name.clone(),
            description,
        };
        role.register_event(ROLE_CREATED, payload(&RoleCreated { code, name }));
        Ok(role)
    }

    /// Reconstructs a role from its stored row. No events are registered.
    #[must_use]
    pub fn from_stored(
        meta: AggregateMeta,
        code: String,
        name: String,
        description: Option<String>,
    ) -> Self {
        Self {
            meta,
            code,
            name,
            description,
        }
    }

    /// Role code.
    #[must_use]
    pub fn code(&self) -> &str {
        &self.code
    }

    /// Role name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Optional description.
    #[must_use]
    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    /// Renames the role. Emits `ROLE_UPDATED` when the value actually
    /// changes.
    ///
    /// # Errors
    ///
    /// Returns a validation error when the new value violates its rule.
    pub fn set_name(&mut self, value: &str) -> Result<(), DomainError> {
        let value = validation::role_name(value)?;
        if value == self.name {
            return Ok(());
        }
        self.name.clone_from(&value);
        self.register_event(
            ROLE_UPDATED,
            payload(&RoleUpdated {
                field: "name".to_owned(),
                value,
            }),
        );
        Ok(())
    }

    /// Changes the description. Emits `ROLE_UPDATED` when the value actually
    /// changes.
    ///
    /// # Errors
    ///
    /// Returns a validation error when the new value violates its rule.
    pub fn set_description(&mut self, value: Option<&str>) -> Result<(), DomainError> {
        let value = validation::description(value)?;
        if value == self.description {
            return Ok(());
        }
        self.description.clone_from(&value);
        self.register_event(
            ROLE_UPDATED,
            payload(&RoleUpdated {
                field: "description".to_owned(),
                value: value.unwrap_or_default(),
            }),
        );
        Ok(())
    }
}

impl Aggregate for Role {
    fn aggregate_name(&self) -> &'static str {
        "Role"
    }

    fn meta(&self) -> &AggregateMeta {
        &self.meta
    }

    fn meta_mut(&mut self) -> &mut AggregateMeta {
        &mut self.meta
    }

    fn to_json(&self) -> serde_json::Value {
        let mut json = self.meta.base_json();
        json["code"] = self.code.clone().into();
        json["name"] = self.name.clone().into();
        json["description"] = self.description.clone().into();
        json
    }
}
