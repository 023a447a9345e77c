//! PostgreSQL implementation of the `RoleRepository` trait.

use async_trait::async_trait;
use gatehouse_auth::domain::aggregates::Role;
use gatehouse_auth::domain::repositories::RoleRepository;
use gatehouse_core::aggregate::Aggregate;
use gatehouse_core::error::DomainError;
use gatehouse_core::uid::Uid;
use sqlx::postgres::PgRow;
use sqlx::{PgConnection, PgPool, Row};

use crate::row::meta_from_row;
use crate::save::{AggregateBinding, infra, save_aggregate};

const SELECT_ROLE: &str = "SELECT id, version, created_at, created_by, last_modified_at, \
     last_modified_by, code, name, description FROM roles";

fn row_to_role(row: &PgRow) -> Result<Role, DomainError> {
    let meta = meta_from_row(row)?;
    Ok(Role::from_stored(
        meta,
        row.try_get("code").map_err(infra)?,
        row.try_get("name").map_err(infra)?,
        row.try_get("description").map_err(infra)?,
    ))
}

#[async_trait]
impl AggregateBinding for Role {
    async fn insert(&self, conn: &mut PgConnection) -> Result<(), DomainError> {
        let meta = self.meta();
        sqlx::query(
            "INSERT INTO roles (id, version, created_at, created_by, last_modified_at, \
             last_modified_by, code, name, description) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)",
        )
        .bind(meta.id().as_uuid())
        .bind(meta.version())
        .bind(meta.created_at())
        .bind(meta.created_by().map(|u| u.as_uuid()))
        .bind(meta.last_modified_at())
        .bind(meta.last_modified_by().map(|u| u.as_uuid()))
        .bind(self.code())
        .bind(self.name())
        .bind(self.description())
        .execute(conn)
        .await
        .map_err(infra)?;
        Ok(())
    }

    async fn update(&self, conn: &mut PgConnection) -> Result<u64, DomainError> {
        let meta = self.meta();
        let result = sqlx::query(
            "UPDATE roles SET version = $2, last_modified_at = $3, last_modified_by = $4, \
             name = $5, description = $6 \
             WHERE id = $1 AND version = $7",
        )
        .bind(meta.id().as_uuid())
        .bind(meta.version())
        .bind(meta.last_modified_at())
        .bind(meta.last_modified_by().map(|u| u.as_uuid()))
        .bind(self.name())
        .bind(self.description())
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
        let row = sqlx::query("SELECT version FROM roles WHERE id = $1")
            .bind(id.as_uuid())
            .fetch_optional(conn)
            .await
            .map_err(infra)?;
        row.map(|r| r.try_get("version").map_err(infra)).transpose()
    }
}

/// PostgreSQL-backed role repository.
#[derive(Debug, Clone)]
pub struct PgRoleRepository {
    pool: PgPool,
}

impl PgRoleRepository {
    /// Creates a new `PgRoleRepository`.
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl RoleRepository for PgRoleRepository {
    async fn find_by_id(&self, id: Uid) -> Result<Option<Role>, DomainError> {
        let row = sqlx::query(&format!("{SELECT_ROLE} WHERE id = $1"))
            .bind(id.as_uuid())
            .fetch_optional(&self.pool)
            .await
            .map_err(infra)?;
        row.map(|r| row_to_role(&r)).transpose()
    }

    async fn find_by_code(&self, code: &str) -> Result<Option<Role>, DomainError> {
        let row = sqlx::query(&format!("{SELECT_ROLE} WHERE code = $1"))
            .bind(code)
            .fetch_optional(&self.pool)
            .await
            .map_err(infra)?;
        row.map(|r| row_to_role(&r)).transpose()
    }

    async fn save(&self, role: &Role) -> Result<(), DomainError> {
        save_aggregate(&self.pool, role, None).await
    }
}
