//! Command handlers for the auth context.
//!
//! Every write use case follows the same fixed sequence: authorization,
//! input validation, business-rule reads, aggregate construction or load
//! (with `prepare_update` when updating), domain mutators, save, and only
//! then event dispatch. Events describe committed facts: no handler ever
//! dispatches before its save has returned successfully.

use gatehouse_core::aggregate::Aggregate;
use gatehouse_core::clock::Clock;
use gatehouse_core::context::AppContext;
use gatehouse_core::error::DomainError;
use gatehouse_core::event::EventDispatch;
use gatehouse_core::uid::Uid;
use serde::Serialize;

use crate::ADMIN_ROLE;
use crate::application::validators::{
    ensure_email_available, ensure_group_name_available, ensure_role_code_available,
    ensure_user_exists, ensure_username_available,
};
use crate::domain::aggregates::{Role, User, UserGroup, UserStatus};
use crate::domain::commands::{
    AddGroupMember, ChangeUserStatus, CreateRole, CreateUserGroup, RegisterUser, UpdateRole,
    UpdateUserGroup, UpdateUserProfile,
};
use crate::domain::repositories::{RoleRepository, UserGroupRepository, UserRepository};
use crate::domain::validation;

/// Result of a successfully handled command.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct AuthCommandResult {
    /// The aggregate affected or created by the command.
    pub aggregate_id: Uid,
    /// The stored version after the save.
    pub version: i64,
}

fn result_of(aggregate: &impl Aggregate) -> AuthCommandResult {
    AuthCommandResult {
        aggregate_id: aggregate.id(),
        version: aggregate.version(),
    }
}

/// Requires an admin actor, or the user acting on their own aggregate.
fn require_admin_or_self(ctx: &AppContext, user_id: Uid) -> Result<Uid, DomainError> {
    let actor = ctx.require_actor()?;
    if actor.has_role(ADMIN_ROLE) || actor.user_id == user_id {
        Ok(actor.user_id)
    } else {
        Err(DomainError::Forbidden)
    }
}

/// Handles `RegisterUser`: self-service creation of a user aggregate.
///
/// # Errors
///
/// Returns a validation error on malformed input, `ALREADY_TAKEN` when the
/// email or username is in use, or the repository's error on save failure.
pub async fn handle_register_user(
    ctx: &AppContext,
    command: &RegisterUser,
    clock: &dyn Clock,
    users: &dyn UserRepository,
    dispatcher: &dyn EventDispatch,
) -> Result<AuthCommandResult, DomainError> {
    let email = validation::email(&command.email)?;
    let username = validation::username(&command.username)?;

    ensure_email_available(users, &email).await?;
    ensure_username_available(users, &username).await?;

    let created_by = ctx.actor.as_ref().map(|a| a.user_id);
    let mut user = User::register(
        &email,
        &username,
        &command.display_name,
        created_by,
        clock,
    )?;

    users.save(&user).await?;
    dispatcher.dispatch(user.take_events());

    Ok(result_of(&user))
}

/// Handles `UpdateUserProfile`: admin or the user themself changes profile
/// fields.
///
/// # Errors
///
/// Returns `UNAUTHORIZED`/`FORBIDDEN` on authorization failure, a
/// validation error on malformed input, `NOT_FOUND` for an unknown user,
/// `ALREADY_TAKEN` for an email conflict, or `OUTDATED_VERSION` when a
/// concurrent writer advanced the aggregate.
pub async fn handle_update_user_profile(
    ctx: &AppContext,
    command: &UpdateUserProfile,
    clock: &dyn Clock,
    users: &dyn UserRepository,
    dispatcher: &dyn EventDispatch,
) -> Result<AuthCommandResult, DomainError> {
    let user_id = Uid::parse(&command.user_id, "user_id")?;
    let acting_user = require_admin_or_self(ctx, user_id)?;

    let new_email = command
        .email
        .as_deref()
        .map(validation::email)
        .transpose()?;
    let new_display_name = command
        .display_name
        .as_deref()
        .map(validation::display_name)
        .transpose()?;

    let mut user = ensure_user_exists(users, user_id).await?;

    if let Some(email) = &new_email
        && email != user.email()
    {
        ensure_email_available(users, email).await?;
    }

    user.prepare_update(acting_user, clock)?;
    if let Some(display_name) = &new_display_name {
        user.set_display_name(display_name)?;
    }
    if let Some(email) = &new_email {
        user.set_email(email)?;
    }

    users.save(&user).await?;
    dispatcher.dispatch(user.take_events());

    Ok(result_of(&user))
}

/// Handles `ChangeUserStatus`: admin-only lifecycle transitions.
///
/// # Errors
///
/// Returns `UNAUTHORIZED`/`FORBIDDEN` on authorization failure, a
/// validation error for an unknown status or invalid transition,
/// `NOT_FOUND` for an unknown user, or `OUTDATED_VERSION` on a concurrent
/// write.
pub async fn handle_change_user_status(
    ctx: &AppContext,
    command: &ChangeUserStatus,
    clock: &dyn Clock,
    users: &dyn UserRepository,
    dispatcher: &dyn EventDispatch,
) -> Result<AuthCommandResult, DomainError> {
    let actor = ctx.require_role(ADMIN_ROLE)?;
    let acting_user = actor.user_id;

    let user_id = Uid::parse(&command.user_id, "user_id")?;
    let target = UserStatus::parse(&command.status)?;

    let mut user = ensure_user_exists(users, user_id).await?;

    user.prepare_update(acting_user, clock)?;
    match target {
        UserStatus::Active => user.reactivate()?,
        UserStatus::Suspended => user.suspend()?,
        UserStatus::Deactivated => user.deactivate()?,
    }

    users.save(&user).await?;
    dispatcher.dispatch(user.take_events());

    Ok(result_of(&user))
}

/// Handles `CreateUserGroup`: admin-only group creation.
///
/// # Errors
///
/// Returns `UNAUTHORIZED`/`FORBIDDEN` on authorization failure, a
/// validation error on malformed input, `ALREADY_TAKEN` for a name
/// conflict, or the repository's error on save failure.
pub async fn handle_create_user_group(
    ctx: &AppContext,
    command: &CreateUserGroup,
    clock: &dyn Clock,
    groups: &dyn UserGroupRepository,
    dispatcher: &dyn EventDispatch,
) -> Result<AuthCommandResult, DomainError> {
    let actor = ctx.require_role(ADMIN_ROLE)?;
    let acting_user = actor.user_id;

    let name = validation::group_name(&command.name)?;
    ensure_group_name_available(groups, &name).await?;

    let mut group = UserGroup::create(&name, command.description.as_deref(), acting_user, clock)?;

    groups.save(&group).await?;
    dispatcher.dispatch(group.take_events());

    Ok(result_of(&group))
}

/// Handles `UpdateUserGroup`: admin-only rename or re-description.
///
/// # Errors
///
/// Returns `UNAUTHORIZED`/`FORBIDDEN` on authorization failure, a
/// validation error on malformed input, `NOT_FOUND` for an unknown group,
/// `ALREADY_TAKEN` for a name conflict, or `OUTDATED_VERSION` on a
/// concurrent write.
pub async fn handle_update_user_group(
    ctx: &AppContext,
    command: &UpdateUserGroup,
    clock: &dyn Clock,
    groups: &dyn UserGroupRepository,
    dispatcher: &dyn EventDispatch,
) -> Result<AuthCommandResult, DomainError> {
    let actor = ctx.require_role(ADMIN_ROLE)?;
    let acting_user = actor.user_id;

    let group_id = Uid::parse(&command.group_id, "group_id")?;
    let new_name = command
        .name
        .as_deref()
        .map(validation::group_name)
        .transpose()?;

    let mut group = groups
        .find_by_id(group_id)
        .await?
        .ok_or(DomainError::NotFound {
            entity: "UserGroup",
            id: group_id,
        })?;

    if let Some(name) = &new_name
        && name != group.name()
    {
        ensure_group_name_available(groups, name).await?;
    }

    group.prepare_update(acting_user, clock)?;
    if let Some(name) = &new_name {
        group.set_name(name)?;
    }
    if let Some(description) = &command.description {
        group.set_description(Some(description))?;
    }

    groups.save(&group).await?;
    dispatcher.dispatch(group.take_events());

    Ok(result_of(&group))
}

/// Handles `AddGroupMember`: admin-only membership grant. The junction row
/// is written in the same transaction as the group's version bump.
///
/// # Errors
///
/// Returns `UNAUTHORIZED`/`FORBIDDEN` on authorization failure, `NOT_FOUND`
/// for an unknown group or user, `ALREADY_TAKEN` when the user already
/// belongs to the group, or `OUTDATED_VERSION` on a concurrent write.
pub async fn handle_add_group_member(
    ctx: &AppContext,
    command: &AddGroupMember,
    clock: &dyn Clock,
    groups: &dyn UserGroupRepository,
    users: &dyn UserRepository,
    dispatcher: &dyn EventDispatch,
) -> Result<AuthCommandResult, DomainError> {
    let actor = ctx.require_role(ADMIN_ROLE)?;
    let acting_user = actor.user_id;

    let group_id = Uid::parse(&command.group_id, "group_id")?;
    let user_id = Uid::parse(&command.user_id, "user_id")?;

    let mut group = groups
        .find_by_id(group_id)
        .await?
        .ok_or(DomainError::NotFound {
            entity: "UserGroup",
            id: group_id,
        })?;
    ensure_user_exists(users, user_id).await?;
    if groups.is_member(group_id, user_id).await? {
        return Err(DomainError::AlreadyTaken {
            field: "member",
            value: user_id.to_string(),
        });
    }

    group.prepare_update(acting_user, clock)?;
    group.record_member_added(user_id);

    groups.save_with_member(&group, user_id).await?;
    dispatcher.dispatch(group.take_events());

    Ok(result_of(&group))
}

/// Handles `CreateRole`: admin-only role creation.
///
/// # Errors
///
/// Returns `UNAUTHORIZED`/`FORBIDDEN` on authorization failure, a
/// validation error on malformed input, `ALREADY_TAKEN` for a code
/// conflict, or the repository's error on save failure.
pub async fn handle_create_role(
    ctx: &AppContext,
    command: &CreateRole,
    clock: &dyn Clock,
    roles: &dyn RoleRepository,
    dispatcher: &dyn EventDispatch,
) -> Result<AuthCommandResult, DomainError> {
    let actor = ctx.require_role(ADMIN_ROLE)?;
    let acting_user = actor.user_id;

    let code = validation::role_code(&command.code)?;
    ensure_role_code_available(roles, &code).await?;

    let mut role = Role::create(
        &code,
        &command.name,
        command.description.as_deref(),
        acting_user,
        clock,
    )?;

    roles.save(&role).await?;
    dispatcher.dispatch(role.take_events());

    Ok(result_of(&role))
}

/// Handles `UpdateRole`: admin-only rename or re-description. The role code
/// never changes.
///
/// # Errors
///
/// Returns `UNAUTHORIZED`/`FORBIDDEN` on authorization failure, a
/// validation error on malformed input, `NOT_FOUND` for an unknown role, or
/// `OUTDATED_VERSION` on a concurrent write.
pub async fn handle_update_role(
    ctx: &AppContext,
    command: &UpdateRole,
    clock: &dyn Clock,
    roles: &dyn RoleRepository,
    dispatcher: &dyn EventDispatch,
) -> Result<AuthCommandResult, DomainError> {
    let actor = ctx.require_role(ADMIN_ROLE)?;
    let acting_user = actor.user_id;

    let role_id = Uid::parse(&command.role_id, "role_id")?;

    let mut role = roles
        .find_by_id(role_id)
        .await?
        .ok_or(DomainError::NotFound {
            entity: "Role",
            id: role_id,
        })?;

    role.prepare_update(acting_user, clock)?;
    if let Some(name) = &command.name {
        role.set_name(name)?;
    }
    if let Some(description) = &command.description {
        role.set_description(Some(description))?;
    }

    roles.save(&role).await?;
    dispatcher.dispatch(role.take_events());

    Ok(result_of(&role))
}
