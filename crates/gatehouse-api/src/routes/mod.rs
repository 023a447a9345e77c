//! Route modules organized by resource.

pub mod health;
pub mod roles;
pub mod user_groups;
pub mod users;
