//! Time source injection.
//!
//! Aggregates stamp audit timestamps from a [`Clock`] rather than calling
//! `Utc::now()` directly, so tests can pin time to a fixed instant.

use chrono::{DateTime, Utc};

/// Source of the current instant, in UTC.
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

/// The real wall clock, used everywhere outside tests.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}
