//! Routes for user accounts.

use axum::extract::{Path, State};
use axum::http::{HeaderMap, StatusCode};
use axum::routing::{get, post, put};
use axum::{Json, Router};
use gatehouse_auth::application::command_handlers::{
    AuthCommandResult, handle_change_user_status, handle_register_user,
    handle_update_user_profile,
};
use gatehouse_auth::application::query_handlers::{UserView, get_user_by_id};
use gatehouse_auth::domain::commands::{ChangeUserStatus, RegisterUser, UpdateUserProfile};
use gatehouse_core::uid::Uid;
use serde::Deserialize;

use crate::context;
use crate::error::ApiError;
use crate::state::AppState;

#[derive(Deserialize)]
struct UpdateUserProfileBody {
    display_name: Option<String>,
    email: Option<String>,
}

#[derive(Deserialize)]
struct ChangeUserStatusBody {
    status: String,
}

/// POST /
async fn register_user(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(command): Json<RegisterUser>,
) -> Result<(StatusCode, Json<AuthCommandResult>), ApiError> {
    let ctx = context::from_headers(&headers);
    let result = handle_register_user(
        &ctx,
        &command,
        state.clock.as_ref(),
        state.users.as_ref(),
        state.dispatcher.as_ref(),
    )
    .await?;
    Ok((StatusCode::CREATED, Json(result)))
}

/// GET /{id}
async fn get_user(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<UserView>, ApiError> {
    let user_id = Uid::parse(&id, "user_id")?;
    let view = get_user_by_id(user_id, state.users.as_ref()).await?;
    Ok(Json(view))
}

/// PUT /{id}
async fn update_user_profile(
    State(state): State<AppState>,
    Path(id): Path<String>,
    headers: HeaderMap,
    Json(body): Json<UpdateUserProfileBody>,
) -> Result<Json<AuthCommandResult>, ApiError> {
    let ctx = context::from_headers(&headers);
    let command = UpdateUserProfile {
        user_id: id,
        display_name: body.display_name,
        email: body.email,
    };
    let result = handle_update_user_profile(
        &ctx,
        &command,
        state.clock.as_ref(),
        state.users.as_ref(),
        state.dispatcher.as_ref(),
    )
    .await?;
    Ok(Json(result))
}

/// PUT /{id}/status
async fn change_user_status(
    State(state): State<AppState>,
    Path(id): Path<String>,
    headers: HeaderMap,
    Json(body): Json<ChangeUserStatusBody>,
) -> Result<Json<AuthCommandResult>, ApiError> {
    let ctx = context::from_headers(&headers);
    let command = ChangeUserStatus {
        user_id: id,
        status: body.status,
    };
    let result = handle_change_user_status(
        &ctx,
        &command,
        state.clock.as_ref(),
        state.users.as_ref(),
        state.dispatcher.as_ref(),
    )
    .await?;
    Ok(Json(result))
}

/// Returns the router for user accounts.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", post(register_user))
        .route("/{id}", get(get_user).put(update_user_profile))
        .route("/{id}/status", put(change_user_status))
}
