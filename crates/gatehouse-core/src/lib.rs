//! Gatehouse Core — shared domain abstractions.
//!
//! This crate defines the fundamental traits and types that the auth
//! bounded context and its infrastructure depend on. It contains no
//! infrastructure code.

pub mod aggregate;
pub mod clock;
pub mod context;
pub mod error;
pub mod event;
pub mod uid;
