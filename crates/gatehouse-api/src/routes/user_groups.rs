//! Routes for user groups and group membership.

use axum::extract::{Path, State};
use axum::http::{HeaderMap, StatusCode};
use axum::routing::{get, post};
use axum::{Json, Router};
use gatehouse_auth::application::command_handlers::{
    AuthCommandResult, handle_add_group_member, handle_create_user_group,
    handle_update_user_group,
};
use gatehouse_auth::application::query_handlers::{UserGroupView, get_user_group_by_id};
use gatehouse_auth::domain::commands::{AddGroupMember, CreateUserGroup, UpdateUserGroup};
use gatehouse_core::uid::Uid;
use serde::Deserialize;

use crate::context;
use crate::error::ApiError;
use crate::state::AppState;

#[derive(Deserialize)]
struct UpdateUserGroupBody {
    name: Option<String>,
    description: Option<String>,
}

#[derive(Deserialize)]
struct AddGroupMemberBody {
    user_id: String,
}

/// POST /
async fn create_user_group(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(command): Json<CreateUserGroup>,
) -> Result<(StatusCode, Json<AuthCommandResult>), ApiError> {
    let ctx = context::from_headers(&headers);
    let result = handle_create_user_group(
        &ctx,
        &command,
        state.clock.as_ref(),
        state.groups.as_ref(),
        state.dispatcher.as_ref(),
    )
    .await?;
    Ok((StatusCode::CREATED, Json(result)))
}

/// GET /{id}
async fn get_user_group(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<UserGroupView>, ApiError> {
    let group_id = Uid::parse(&id, "group_id")?;
    let view = get_user_group_by_id(group_id, state.groups.as_ref()).await?;
    Ok(Json(view))
}

/// PUT /{id}
async fn update_user_group(
    State(state): State<AppState>,
    Path(id): Path<String>,
    headers: HeaderMap,
    Json(body): Json<UpdateUserGroupBody>,
) -> Result<Json<AuthCommandResult>, ApiError> {
    let ctx = context::from_headers(&headers);
    let command = UpdateUserGroup {
        group_id: id,
        name: body.name,
        description: body.description,
    };
    let result = handle_update_user_group(
        &ctx,
        &command,
        state.clock.as_ref(),
        state.groups.as_ref(),
        state.dispatcher.as_ref(),
    )
    .await?;
    Ok(Json(result))
}

/// POST /{id}/members
async fn add_group_member(
    State(state): State<AppState>,
    Path(id): Path<String>,
    headers: HeaderMap,
    Json(body): Json<AddGroupMemberBody>,
) -> Result<(StatusCode, Json<AuthCommandResult>), ApiError> {
    let ctx = context::from_headers(&headers);
    let command = AddGroupMember {
        group_id: id,
        user_id: body.user_id,
    };
    let result = handle_add_group_member(
        &ctx,
        &command,
        state.clock.as_ref(),
        state.groups.as_ref(),
        state.users.as_ref(),
        state.dispatcher.as_ref(),
    )
    .await?;
    Ok((StatusCode::CREATED, Json(result)))
}

/// Returns the router for user groups.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", post(create_user_group))
        .route("/{id}", get(get_user_group).put(update_user_group))
        .route("/{id}/members", post(add_group_member))
}
