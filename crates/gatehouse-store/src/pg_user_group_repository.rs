//! PostgreSQL implementation of the `UserGroupRepository` trait.

use async_trait::async_trait;
use gatehouse_auth::domain::aggregates::UserGroup;
use gatehouse_auth::domain::repositories::UserGroupRepository;
use gatehouse_core::aggregate::Aggregate;
use gatehouse_core::error::DomainError;
use gatehouse_core::uid::Uid;
use sqlx::postgres::PgRow;
use sqlx::{PgConnection, PgPool, Row};
use uuid::Uuid;

use crate::row::meta_from_row;
use crate::save::{AggregateBinding, infra, post_save, save_aggregate};

const SELECT_GROUP: &str = "SELECT id, version, created_at, created_by, last_modified_at, \
     last_modified_by, name, description FROM user_groups";

fn row_to_group(row: &PgRow) -> Result<UserGroup, DomainError> {
    let meta = meta_from_row(row)?;
    Ok(UserGroup::from_stored(
        meta,
        row.try_get("name").map_err(infra)?,
        row.try_get("description").map_err(infra)?,
    ))
}

#[async_trait]
impl AggregateBinding for UserGroup {
    async fn insert(&self, conn: &mut PgConnection) -> Result<(), DomainError> {
        let meta = self.meta();
        sqlx::query(
            "INSERT INTO user_groups (id, version, created_at, created_by, last_modified_at, \
             last_modified_by, name, description) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8)",
        )
        .bind(meta.id().as_uuid())
        .bind(meta.version())
        .bind(meta.created_at())
        .bind(meta.created_by().map(|u| u.as_uuid()))
        .bind(meta.last_modified_at())
        .bind(meta.last_modified_by().map(|u| u.as_uuid()))
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
            "UPDATE user_groups SET version = $2, last_modified_at = $3, \
             last_modified_by = $4, name = $5, description = $6 \
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
        let row = sqlx::query("SELECT version FROM user_groups WHERE id = $1")
            .bind(id.as_uuid())
            .fetch_optional(conn)
            .await
            .map_err(infra)?;
        row.map(|r| r.try_get("version").map_err(infra)).transpose()
    }
}

/// PostgreSQL-backed user group repository.
#[derive(Debug, Clone)]
pub struct PgUserGroupRepository {
    pool: PgPool,
}

impl PgUserGroupRepository {
    /// Creates a new `PgUserGroupRepository`.
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserGroupRepository for PgUserGroupRepository {
    async fn find_by_id(&self, id: Uid) -> Result<Option<UserGroup>, DomainError> {
        let row = sqlx::query(&format!("{SELECT_GROUP} WHERE id = $1"))
            .bind(id.as_uuid())
            .fetch_optional(&self.pool)
            .await
            .map_err(infra)?;
        row.map(|r| row_to_group(&r)).transpose()
    }

    async fn find_by_name(&self, name: &str) -> Result<Option<UserGroup>, DomainError> {
        let row = sqlx::query(&format!("{SELECT_GROUP} WHERE name = $1"))
            .bind(name)
            .fetch_optional(&self.pool)
            .await
            .map_err(infra)?;
        row.map(|r| row_to_group(&r)).transpose()
    }

    async fn save(&self, group: &UserGroup) -> Result<(), DomainError> {
        save_aggregate(&self.pool, group, None).await
    }

    async fn save_with_member(
        &self,
        group: &UserGroup,
        member_id: Uid,
    ) -> Result<(), DomainError> {
        let group_id = group.id().as_uuid();
        let member = member_id.as_uuid();
        let junction_insert = post_save(move |conn| {
            Box::pin(async move {
                sqlx::query(
                    "INSERT INTO user_group_members (group_id, user_id) VALUES ($1, $2)",
                )
                .bind(group_id)
                .bind(member)
                .execute(conn)
                .await
                .map_err(infra)?;
                Ok(())
            })
        });
        save_aggregate(&self.pool, group, Some(junction_insert)).await
    }

    async fn is_member(&self, group_id: Uid, user_id: Uid) -> Result<bool, DomainError> {
        let row = sqlx::query(
            "SELECT 1 AS present FROM user_group_members WHERE group_id = $1 AND user_id = $2",
        )
        .bind(group_id.as_uuid())
        .bind(user_id.as_uuid())
        .fetch_optional(&self.pool)
        .await
        .map_err(infra)?;
        Ok(row.is_some())
    }

    async fn member_ids(&self, group_id: Uid) -> Result<Vec<Uid>, DomainError> {
        let rows = sqlx::query(
            "SELECT user_id FROM user_group_members WHERE group_id = $1 ORDER BY added_at, user_id",
        )
        .bind(group_id.as_uuid())
        .fetch_all(&self.pool)
        .await
        .map_err(infra)?;
        rows.iter()
            .map(|r| {
                r.try_get::<Uuid, _>("user_id")
                    .map(Uid::from)
                    .map_err(infra)
            })
            .collect()
    }
}
