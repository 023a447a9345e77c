//! Domain event record and dispatch contracts.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::DomainError;
use crate::uid::Uid;

/// An immutable record of a fact that occurred to an aggregate.
///
/// Created only via `Aggregate::register_event`; never mutated after
/// creation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DomainEvent {
    /// Event type tag, e.g. `USER_REGISTERED`.
    pub event_type: String,
    /// Identifier of the originating aggregate.
    pub aggregate_id: Uid,
    /// Name of the originating aggregate kind, e.g. `"User"`.
    pub aggregate_name: String,
    /// Event-specific payload.
    pub data: serde_json::Value,
}

/// A subscriber to one or more event types.
#[async_trait]
pub trait EventHandler: Send + Sync {
    /// Handler name, used in failure diagnostics.
    fn name(&self) -> &'static str;

    /// The event types this handler subscribes to. Must not be empty.
    fn event_types(&self) -> &[&'static str];

    /// Reacts to a single event. Failures are logged by the dispatcher and
    /// never propagate to the dispatching caller or to sibling handlers.
    async fn handle(&self, event: &DomainEvent) -> Result<(), DomainError>;
}

/// Schedules a batch of committed-fact events for delivery.
///
/// Implementations must only *schedule* handler execution, never run
/// handlers inline: by the time any handler observes state through a read
/// path, the transaction that produced the events has already committed.
pub trait EventDispatch: Send + Sync {
    /// Fire-and-forget dispatch. Returns once the batch is scheduled, not
    /// once handlers have finished. Empty batches schedule nothing.
    fn dispatch(&self, events: Vec<DomainEvent>);
}
