//! Typed repository contracts for the auth aggregates.
//!
//! One trait per aggregate, injected explicitly into the handlers. Every
//! `save` follows the optimistic-locking discipline: version 0 inserts,
//! version >= 1 updates conditionally on the previous stored version and
//! fails with `OUTDATED_VERSION` when a concurrent writer got there first.
//! Saving a version >= 1 aggregate without `prepare_update` is a contract
//! violation.

use async_trait::async_trait;
use gatehouse_core::error::DomainError;
use gatehouse_core::uid::Uid;

use super::aggregates::{Role, User, UserGroup};

/// Repository for [`User`] aggregates.
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Point lookup by identifier.
    async fn find_by_id(&self, id: Uid) -> Result<Option<User>, DomainError>;

    /// Lookup by normalized email (uniqueness checks).
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, DomainError>;

    /// Lookup by normalized username (uniqueness checks).
    async fn find_by_username(&self, username: &str) -> Result<Option<User>, DomainError>;

    /// Persists the aggregate with optimistic locking.
    async fn save(&self, user: &User) -> Result<(), DomainError>;
}

/// Repository for [`UserGroup`] aggregates.
#[async_trait]
pub trait UserGroupRepository: Send + Sync {
    /// Point lookup by identifier.
    async fn find_by_id(&self, id: Uid) -> Result<Option<UserGroup>, DomainError>;

    /// Lookup by name (uniqueness checks).
    async fn find_by_name(&self, name: &str) -> Result<Option<UserGroup>, DomainError>;

    /// Persists the aggregate with optimistic locking.
    async fn save(&self, group: &UserGroup) -> Result<(), DomainError>;

    /// Persists the aggregate and inserts a membership junction row in the
    /// same transaction; the two writes commit or roll back together.
    async fn save_with_member(&self, group: &UserGroup, member_id: Uid)
    -> Result<(), DomainError>;

    /// True when the user already belongs to the group.
    async fn is_member(&self, group_id: Uid, user_id: Uid) -> Result<bool, DomainError>;

    /// Member identifiers, in insertion order.
    async fn member_ids(&self, group_id: Uid) -> Result<Vec<Uid>, DomainError>;
}

/// Repository for [`Role`] aggregates.
#[async_trait]
pub trait RoleRepository: Send + Sync {
    /// Point lookup by identifier.
    async fn find_by_id(&self, id: Uid) -> Result<Option<Role>, DomainError>;

    /// Lookup by code (uniqueness checks).
    async fn find_by_code(&self, code: &str) -> Result<Option<Role>, DomainError>;

    /// Persists the aggregate with optimistic locking.
    async fn save(&self, role: &Role) -> Result<(), DomainError>;
}
