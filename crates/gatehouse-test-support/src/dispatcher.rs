//! Test dispatcher — records dispatched batches synchronously.

use std::sync::Mutex;

use gatehouse_core::event::{DomainEvent, EventDispatch};

/// An `EventDispatch` double that captures every non-empty batch in order,
/// without any deferred execution. Lets tests assert both what was
/// dispatched and that dispatch happened at all.
#[derive(Debug, Default)]
pub struct RecordingDispatcher {
    batches: Mutex<Vec<Vec<DomainEvent>>>,
}

impl RecordingDispatcher {
    /// Creates an empty recording dispatcher.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a snapshot of all dispatched batches, oldest first.
    ///
    /// # Panics
    ///
    /// Panics if the internal mutex is poisoned.
    #[must_use]
    pub fn batches(&self) -> Vec<Vec<DomainEvent>> {
        self.batches.lock().unwrap().clone()
    }
}

impl EventDispatch for RecordingDispatcher {
    fn dispatch(&self, events: Vec<DomainEvent>) {
        if events.is_empty() {
            return;
        }
        self.batches.lock().unwrap().push(events);
    }
}
