//! Application layer for the auth context.

pub mod command_handlers;
pub mod query_handlers;
pub mod validators;
