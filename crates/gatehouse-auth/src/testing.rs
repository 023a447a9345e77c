//! In-memory repositories enforcing the optimistic-locking save discipline.
//!
//! These mirror the PostgreSQL repositories closely enough that the
//! command-handler tests exercise the full save/dispatch sequence without a
//! database: version 0 inserts, version >= 1 updates conditionally on the
//! previous stored version, saving without `prepare_update` is a contract
//! violation, and loaded copies come back clean (no pending events, not
//! update-ready), exactly as a row reconstruction would.

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use gatehouse_core::aggregate::{Aggregate, AggregateMeta};
use gatehouse_core::error::DomainError;
use gatehouse_core::uid::Uid;

use crate::domain::aggregates::{Role, User, UserGroup};
use crate::domain::repositories::{RoleRepository, UserGroupRepository, UserRepository};

fn clean_meta(aggregate: &impl Aggregate) -> AggregateMeta {
    let meta = aggregate.meta();
    AggregateMeta::from_stored(
        meta.id(),
        meta.version(),
        meta.created_at(),
        meta.created_by(),
        meta.last_modified_at(),
        meta.last_modified_by(),
    )
}

/// Applies the versioned save discipline to an in-memory row map.
fn checked_save<A: Aggregate>(
    rows: &mut HashMap<Uid, A>,
    aggregate: &A,
    snapshot: A,
) -> Result<(), DomainError> {
    let id = aggregate.id();
    if aggregate.version() == 0 {
        if rows.contains_key(&id) {
            return Err(DomainError::Infrastructure(format!(
                "duplicate key: {} {id} already exists",
                aggregate.aggregate_name()
            )));
        }
        rows.insert(id, snapshot);
        return Ok(());
    }

    if !aggregate.meta().is_update_prepared() {
        return Err(DomainError::ContractViolation(
            "save called on an existing aggregate without prepare_update".to_owned(),
        ));
    }

    let Some(stored) = rows.get(&id) else {
        return Err(DomainError::NotFound {
            entity: aggregate.aggregate_name(),
            id,
        });
    };
    let expected = aggregate.version() - 1;
    if stored.version() != expected {
        return Err(DomainError::OutdatedVersion {
            aggregate_id: id,
            expected,
            actual: stored.version(),
        });
    }
    rows.insert(id, snapshot);
    Ok(())
}

/// HashMap-backed [`UserRepository`].
#[derive(Debug, Default)]
pub struct InMemoryUserRepository {
    rows: Mutex<HashMap<Uid, User>>,
}

impl InMemoryUserRepository {
    /// Creates an empty repository.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn snapshot(user: &User) -> User {
        User::from_stored(
            clean_meta(user),
            user.email().to_owned(),
            user.username().to_owned(),
            user.display_name().to_owned(),
            user.status(),
        )
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn find_by_id(&self, id: Uid) -> Result<Option<User>, DomainError> {
        Ok(self.rows.lock().unwrap().get(&id).map(Self::snapshot))
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, DomainError> {
        Ok(self
            .rows
            .lock()
            .unwrap()
            .values()
            .find(|u| u.email() == email)
            .map(Self::snapshot))
    }

    async fn find_by_username(&self, username: &str) -> Result<Option<User>, DomainError> {
        Ok(self
            .rows
            .lock()
            .unwrap()
            .values()
            .find(|u| u.username() == username)
            .map(Self::snapshot))
    }

    async fn save(&self, user: &User) -> Result<(), DomainError> {
        let mut rows = self.rows.lock().unwrap();
        checked_save(&mut rows, user, Self::snapshot(user))
    }
}

/// HashMap-backed [`UserGroupRepository`] with a membership map standing in
/// for the junction table.
#[derive(Debug, Default)]
pub struct InMemoryUserGroupRepository {
    rows: Mutex<HashMap<Uid, UserGroup>>,
    members: Mutex<HashMap<Uid, Vec<Uid>>>,
}

impl InMemoryUserGroupRepository {
    /// Creates an empty repository.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn snapshot(group: &UserGroup) -> UserGroup {
        UserGroup::from_stored(
            clean_meta(group),
            group.name().to_owned(),
            group.description().map(ToOwned::to_owned),
        )
    }
}

#[async_trait]
impl UserGroupRepository for InMemoryUserGroupRepository {
    async fn find_by_id(&self, id: Uid) -> Result<Option<UserGroup>, DomainError> {
        Ok(self.rows.lock().unwrap().get(&id).map(Self::snapshot))
    }

    async fn find_by_name(&self, name: &str) -> Result<Option<UserGroup>, DomainError> {
        Ok(self
            .rows
            .lock()
            .unwrap()
            .values()
            .find(|g| g.name() == name)
            .map(Self::snapshot))
    }

    async fn save(&self, group: &UserGroup) -> Result<(), DomainError> {
        let mut rows = self.rows.lock().unwrap();
        checked_save(&mut rows, group, Self::snapshot(group))
    }

    async fn save_with_member(
        &self,
        group: &UserGroup,
        member_id: Uid,
    ) -> Result<(), DomainError> {
        // The aggregate save and the junction write succeed or fail as one,
        // like the transactional post-save callback they stand in for.
        let mut rows = self.rows.lock().unwrap();
        checked_save(&mut rows, group, Self::snapshot(group))?;
        self.members
            .lock()
            .unwrap()
            .entry(group.id())
            .or_default()
            .push(member_id);
        Ok(())
    }

    async fn is_member(&self, group_id: Uid, user_id: Uid) -> Result<bool, DomainError> {
        Ok(self
            .members
            .lock()
            .unwrap()
            .get(&group_id)
            .is_some_and(|m| m.contains(&user_id)))
    }

    async fn member_ids(&self, group_id: Uid) -> Result<Vec<Uid>, DomainError> {
        Ok(self
            .members
            .lock()
            .unwrap()
            .get(&group_id)
            .cloned()
            .unwrap_or_default())
    }
}

/// HashMap-backed [`RoleRepository`].
#[derive(Debug, Default)]
pub struct InMemoryRoleRepository {
    rows: Mutex<HashMap<Uid, Role>>,
}

impl InMemoryRoleRepository {
    /// Creates an empty repository.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn snapshot(role: &Role) -> Role {
        Role::from_stored(
            clean_meta(role),
            role.code().to_owned(),
            role.name().to_owned(),
            role.description().map(ToOwned::to_owned),
        )
    }
}

#[async_trait]
impl RoleRepository for InMemoryRoleRepository {
    async fn find_by_id(&self, id: Uid) -> Result<Option<Role>, DomainError> {
        Ok(self.rows.lock().unwrap().get(&id).map(Self::snapshot))
    }

    async fn find_by_code(&self, code: &str) -> Result<Option<Role>, DomainError> {
        Ok(self
            .rows
            .lock()
            .unwrap()
            .values()
            .find(|r| r.code() == code)
            .map(Self::snapshot))
    }

    async fn save(&self, role: &Role) -> Result<(), DomainError> {
        let mut rows = self.rows.lock().unwrap();
        checked_save(&mut rows, role, Self::snapshot(role))
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use gatehouse_test_support::FixedClock;

    use super::*;

    #[tokio::test]
    async fn test_in_memory_repositories_erase_to_domain_trait_objects() {
        // Arrange: the handlers only ever see the repositories behind the
        // domain traits, so the doubles must coerce the same way.
        let users: Arc<dyn UserRepository> = Arc::new(InMemoryUserRepository::new());
        let clock = FixedClock::default();
        let user = User::register("ada@example.com", "ada", "Ada", None, &clock).unwrap();

        // Act
        users.save(&user).await.unwrap();
        let found = users.find_by_username("ada").await.unwrap();

        // Assert
        assert_eq!(found.unwrap().id(), user.id());
    }
}
