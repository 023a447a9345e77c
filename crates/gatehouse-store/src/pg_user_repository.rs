//! PostgreSQL implementation of the `UserRepository` trait.

use async_trait::async_trait;
use gatehouse_auth::domain::aggregates::{User, UserStatus};
use gatehouse_auth::domain::repositories::UserRepository;
use gatehouse_core::aggregate::Aggregate;
use gatehouse_core::error::DomainError;
use gatehouse_core::uid::Uid;
use sqlx::postgres::PgRow;
use sqlx::{PgConnection, PgPool, Row};

use crate::row::meta_from_row;
use crate::save::{AggregateBinding, infra, save_aggregate};

const SELECT_USER: &str = "SELECT id, version, created_at, created_by, last_modified_at, \
     last_modified_by, email, username, display_name, status FROM users";

fn row_to_user(row: &PgRow) -> Result<User, DomainError> {
    let meta = meta_from_row(row)?;
    let status = UserStatus::parse(&row.try_get::<String, _>("status").map_err(infra)?)?;
    Ok(User::from_stored(
        meta,
        row.try_get("email").map_err(infra)?,
        row.try_get("username").map_err(infra)?,
        row.try_get("display_name").map_err(infra)?,
        status,
    ))
}

#[async_trait]
impl AggregateBinding for User {
    async fn insert(&self, conn: &mut PgConnection) -> Result<(), DomainError> {
        let meta = self.meta();
        sqlx::query(
            "INSERT INTO users (id, version, created_at, created_by, last_modified_at, \
             last_modified_by, email, username, display_name, status) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)",
        )
        .bind(meta.id().as_uuid())
        .bind(meta.version())
        .bind(meta.created_at())
        .bind(meta.created_by().map(|u| u.as_uuid()))
        .bind(meta.last_modified_at())
        .bind(meta.last_modified_by().map(|u| u.as_uuid()))
        .bind(self.email())
        .bind(self.username())
        .bind(self.display_name())
        .bind(self.status().as_str())
        .execute(conn)
        .await
        .map_err(infra)?;
        Ok(())
    }

    async fn update(&self, conn: &mut PgConnection) -> Result<u64, DomainError> {
        let meta = self.meta();
        let result = sqlx::query(
            "UPDATE users SET version = $2, last_modified_at = $3, last_modified_by = $4, \
             email = $5, username = $6, display_name = $7, status = $8 \
             WHERE id = $1 AND version = $9",
        )
        .bind(meta.id().as_uuid())
        .bind(meta.version())
        .bind(meta.last_modified_at())
        .bind(meta.last_modified_by().map(|u| u.as_uuid()))
        .bind(self.email())
        .bind(self.username())
        .bind(self.display_name())
        .bind(self.status().as_str())
        .bind(meta.version() - 1)
        .execute(conn)
        .await
        .map_err(infra)?;
        Ok(result.rows_affected())
    }

    async fn stored_version(
        conn: &mut PgConnection,
        id: Uid,
    ) -> Result<Option<i64>, DomainError> {
        let row = sqlx::query("SELECT version FROM users WHERE id = $1")
            .bind(id.as_uuid())
            .fetch_optional(conn)
            .await
            .map_err(infra)?;
        row.map(|r| r.try_get("version").map_err(infra)).transpose()
    }
}

/// PostgreSQL-backed user repository.
#[derive(Debug, Clone)]
pub struct PgUserRepository {
    pool: PgPool,
}

impl PgUserRepository {
    /// Creates a new `PgUserRepository`.
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserRepository for PgUserRepository {
    async fn find_by_id(&self, id: Uid) -> Result<Option<User>, DomainError> {
        let row = sqlx::query(&format!("{SELECT_USER} WHERE id = $1"))
            .bind(id.as_uuid())
            .fetch_optional(&self.pool)
            .await
            .map_err(infra)?;
        row.map(|r| row_to_user(&r)).transpose()
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, DomainError> {
        let row = sqlx::query(&format!("{SELECT_USER} WHERE email = $1"))
            .bind(email)
            .fetch_optional(&self.pool)
            .await
            .map_err(infra)?;
        row.map(|r| row_to_user(&r)).transpose()
    }

    async fn find_by_username(&self, username: &str) -> Result<Option<User>, DomainError> {
        let row = sqlx::query(&format!("{SELECT_USER} WHERE username = $1"))
            .bind(username)
            .fetch_optional(&self.pool)
            .await
            .map_err(infra)?;
        row.map(|r| row_to_user(&r)).transpose()
    }

    async fn save(&self, user: &User) -> Result<(), DomainError> {
        save_aggregate(&self.pool, user, None).await
    }
}
