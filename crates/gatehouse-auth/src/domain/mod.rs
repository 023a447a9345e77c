//! Domain model for the auth context.

pub mod aggregates;
pub mod commands;
pub mod events;
pub mod repositories;
pub(crate) mod validation;
