//! Shared test mocks and utilities for the Gatehouse identity backend.

mod clock;
mod dispatcher;

pub use clock::FixedClock;
pub use dispatcher::RecordingDispatcher;
