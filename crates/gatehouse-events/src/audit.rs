//! Structured audit logging for committed domain events.

use async_trait::async_trait;
use gatehouse_core::error::DomainError;
use gatehouse_core::event::{DomainEvent, EventHandler};

/// Logs every subscribed event at info level.
///
/// The subscription list is fixed at construction; the binary wires it up
/// with the event types of the contexts it serves.
pub struct AuditLogHandler {
    event_types: &'static [&'static str],
}

impl AuditLogHandler {
    /// Creates a handler subscribed to the given event types.
    #[must_use]
    pub fn new(event_types: &'static [&'static str]) -> Self {
        Self { event_types }
    }
}

#[async_trait]
impl EventHandler for AuditLogHandler {
    fn name(&self) -> &'static str {
        "audit_log"
    }

    fn event_types(&self) -> &[&'static str] {
        self.event_types
    }

    async fn handle(&self, event: &DomainEvent) -> Result<(), DomainError> {
        tracing::info!(
            event_type = %event.event_type,
            aggregate_name = %event.aggregate_name,
            aggregate_id = %event.aggregate_id,
            data = %event.data,
            "domain event"
        );
        Ok(())
    }
}
