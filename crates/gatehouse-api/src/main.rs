//! Gatehouse API server entry point.

use std::net::SocketAddr;
use std::sync::Arc;

use axum::Router;
use gatehouse_auth::domain::events::{
    ROLE_CREATED, ROLE_UPDATED, USER_ADDED_TO_GROUP, USER_GROUP_CREATED, USER_GROUP_UPDATED,
    USER_PROFILE_UPDATED, USER_REGISTERED, USER_STATUS_CHANGED,
};
use gatehouse_events::{AuditLogHandler, TaskEventDispatcher};
use sqlx::postgres::PgPoolOptions;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing_subscriber::EnvFilter;

mod context;
mod error;
mod routes;
mod state;

use error::AppError;

/// All event types emitted by the auth context, for the audit log.
const AUTH_EVENT_TYPES: &[&str] = &[
    USER_REGISTERED,
    USER_PROFILE_UPDATED,
    USER_STATUS_CHANGED,
    USER_GROUP_CREATED,
    USER_GROUP_UPDATED,
    USER_ADDED_TO_GROUP,
    ROLE_CREATED,
    ROLE_UPDATED,
];

#[tokio::main]
async fn main() -> Result<(), AppError> {
    // Initialize tracing subscriber.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .json()
        .init();

    tracing::info!("Starting Gatehouse API server");

    // Read configuration from environment.
    let database_url = std::env::var("DATABASE_URL")
        .map_err(|_| AppError::Config("DATABASE_URL environment variable must be set".into()))?;
    let host = std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string());
    let port: u16 = std::env::var("PORT")
        .unwrap_or_else(|_| "3000".to_string())
        .parse()
        .map_err(|e| AppError::Config(format!("PORT must be a valid u16: {e}")))?;

    // Create database connection pool.
    let pool = PgPoolOptions::new()
        .max_connections(10)
        .connect(&database_url)
        .await?;

    // Build the dispatcher and register event handlers.
    let mut dispatcher = TaskEventDispatcher::new();
    dispatcher
        .register_handler(Arc::new(AuditLogHandler::new(AUTH_EVENT_TYPES)))
        .map_err(|e| AppError::Config(e.to_string()))?;

    // Build application state.
    let app_state = state::AppState::new(pool, Arc::new(dispatcher));

    // Build router.
    // TODO: Replace CorsLayer::permissive() with restricted origins for production.
    let app = Router::new()
        .merge(routes::health::router())
        .nest("/api/v1/users", routes::users::router())
        .nest("/api/v1/user-groups", routes::user_groups::router())
        .nest("/api/v1/roles", routes::roles::router())
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(app_state);

    // Start server.
    let addr: SocketAddr = format!("{host}:{port}")
        .parse()
        .map_err(|e| AppError::Config(format!("invalid HOST:PORT combination: {e}")))?;
    tracing::info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;

    axum::serve(listener, app).await?;

    Ok(())
}
