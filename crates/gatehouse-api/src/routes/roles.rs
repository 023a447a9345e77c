//! Routes for roles.

use axum::extract::{Path, State};
use axum::http::{HeaderMap, StatusCode};
use axum::routing::{get, post};
use axum::{Json, Router};
use gatehouse_auth::application::command_handlers::{
    AuthCommandResult, handle_create_role, handle_update_role,
};
use gatehouse_auth::application::query_handlers::{RoleView, get_role_by_id};
use gatehouse_auth::domain::commands::{CreateRole, UpdateRole};
use gatehouse_core::uid::Uid;
use serde::Deserialize;

use crate::context;
use crate::error::ApiError;
use crate::state::AppState;

#[derive(Deserialize)]
struct UpdateRoleBody {
    name: Option<String>,
    description: Option<String>,
}

/// POST /
async fn create_role(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(command): Json<CreateRole>,
) -> Result<(StatusCode, Json<AuthCommandResult>), ApiError> {
    let ctx = context::from_headers(&headers);
    let result = handle_create_role(
        &ctx,
        &command,
        state.clock.as_ref(),
        state.roles.as_ref(),
        state.dispatcher.as_ref(),
    )
    .await?;
    Ok((StatusCode::CREATED, Json(result)))
}

/// GET /{id}
async fn get_role(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<RoleView>, ApiError> {
    let role_id = Uid::parse(&id, "role_id")?;
    let view = get_role_by_id(role_id, state.roles.as_ref()).await?;
    Ok(Json(view))
}

/// PUT /{id}
async fn update_role(
    State(state): State<AppState>,
    Path(id): Path<String>,
    headers: HeaderMap,
    Json(body): Json<UpdateRoleBody>,
) -> Result<Json<AuthCommandResult>, ApiError> {
    let ctx = context::from_headers(&headers);
    let command = UpdateRole {
        role_id: id,
        name: body.name,
        description: body.description,
    };
    let result = handle_update_role(
        &ctx,
        &command,
        state.clock.as_ref(),
        state.roles.as_ref(),
        state.dispatcher.as_ref(),
    )
    .await?;
    Ok(Json(result))
}

/// Returns the router for roles.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", post(create_role))
        .route("/{id}", get(get_role).put(update_role))
}
