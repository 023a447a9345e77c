//! Gatehouse Events — deferred domain event dispatch.
//!
//! Events describe committed facts: command handlers dispatch them only
//! after a successful save, and the dispatcher schedules handler execution
//! onto a background task so the triggering transaction has already
//! committed by the time any handler observes state.

pub mod audit;
pub mod dispatcher;

pub use audit::AuditLogHandler;
pub use dispatcher::TaskEventDispatcher;
