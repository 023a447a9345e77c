//! Shared application state.

use std::sync::Arc;

use gatehouse_auth::domain::repositories::{
    RoleRepository, UserGroupRepository, UserRepository,
};
use gatehouse_core::clock::{Clock, SystemClock};
use gatehouse_core::event::EventDispatch;
use gatehouse_store::{PgRoleRepository, PgUserGroupRepository, PgUserRepository};
use sqlx::PgPool;

/// Application state shared across all request handlers.
#[derive(Clone)]
pub struct AppState {
    /// Wall clock used to stamp audit fields.
    pub clock: Arc<dyn Clock>,
    /// Dispatcher that delivers domain events after commit.
    pub dispatcher: Arc<dyn EventDispatch>,
    /// User aggregate repository.
    pub users: Arc<dyn UserRepository>,
    /// User group aggregate repository.
    pub groups: Arc<dyn UserGroupRepository>,
    /// Role aggregate repository.
    pub roles: Arc<dyn RoleRepository>,
}

impl AppState {
    /// Create new application state backed by PostgreSQL repositories.
    #[must_use]
    pub fn new(db_pool: PgPool, dispatcher: Arc<dyn EventDispatch>) -> Self {
        Self {
            clock: Arc::new(SystemClock),
            dispatcher,
            users: Arc::new(PgUserRepository::new(db_pool.clone())),
            groups: Arc::new(PgUserGroupRepository::new(db_pool.clone())),
            roles: Arc::new(PgRoleRepository::new(db_pool)),
        }
    }
}
