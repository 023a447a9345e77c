//! Gatehouse — Auth bounded context.
//!
//! Users, user groups, and roles as versioned aggregates with
//! event-emitting mutators, plus the command and query handlers that
//! orchestrate authorization, validation, persistence, and event dispatch.

pub mod application;
pub mod domain;
#[cfg(test)]
mod testing;

/// Role name required for administrative commands.
pub const ADMIN_ROLE: &str = "admin";
