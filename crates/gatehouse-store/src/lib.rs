//! Gatehouse Store — PostgreSQL persistence for the auth aggregates.
//!
//! The heart of this crate is [`save::save_aggregate`], the generic
//! optimistic-locking save routine; the per-aggregate repositories are thin
//! typed bindings over it.

mod row;

pub mod pg_role_repository;
pub mod pg_user_group_repository;
pub mod pg_user_repository;
pub mod save;
pub mod schema;

pub use pg_role_repository::PgRoleRepository;
pub use pg_user_group_repository::PgUserGroupRepository;
pub use pg_user_repository::PgUserRepository;
