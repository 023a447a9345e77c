//! Aggregate root abstraction.

use chrono::{DateTime, Utc};

use crate::clock::Clock;
use crate::error::DomainError;
use crate::event::DomainEvent;
use crate::uid::Uid;

/// Identity, version, audit fields, and the pending-event buffer shared by
/// every aggregate root.
///
/// `version == 0` means "not yet persisted". The version advances by exactly
/// one per successful update, and only through [`AggregateMeta::prepare_update`];
/// there is no public version setter.
#[derive(Debug, Clone)]
pub struct AggregateMeta {
    id: Uid,
    version: i64,
    created_at: DateTime<Utc>,
    created_by: Option<Uid>,
    last_modified_at: Option<DateTime<Utc>>,
    last_modified_by: Option<Uid>,
    pending_events: Vec<DomainEvent>,
    update_prepared: bool,
}

impl AggregateMeta {
    /// Metadata for a freshly created aggregate (version 0, insert path).
    #[must_use]
    pub fn new(id: Uid, created_at: DateTime<Utc>, created_by: Option<Uid>) -> Self {
        Self {
            id,
            version: 0,
            created_at,
            created_by,
            last_modified_at: None,
            last_modified_by: None,
            pending_events: Vec::new(),
            update_prepared: false,
        }
    }

    /// Metadata reconstructed from a stored row. No events are pending and
    /// the aggregate is not update-ready.
    #[must_use]
    pub fn from_stored(
        id: Uid,
        version: i64,
        created_at: DateTime<Utc>,
        created_by: Option<Uid>,
        last_modified_at: Option<DateTime<Utc>>,
        last_modified_by: Option<Uid>,
    ) -> Self {
        Self {
            id,
            version,
            created_at,
            created_by,
            last_modified_at,
            last_modified_by,
            pending_events: Vec::new(),
            update_prepared: false,
        }
    }

    /// Returns the aggregate identifier.
    #[must_use]
    pub fn id(&self) -> Uid {
        self.id
    }

    /// Returns the current in-memory version.
    #[must_use]
    pub fn version(&self) -> i64 {
        self.version
    }

    /// Returns the creation timestamp.
    #[must_use]
    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Returns the creating user, when known.
    #[must_use]
    pub fn created_by(&self) -> Option<Uid> {
        self.created_by
    }

    /// Returns the last-modification timestamp, if the aggregate was ever
    /// updated.
    #[must_use]
    pub fn last_modified_at(&self) -> Option<DateTime<Utc>> {
        self.last_modified_at
    }

    /// Returns the last modifying user, if the aggregate was ever updated.
    #[must_use]
    pub fn last_modified_by(&self) -> Option<Uid> {
        self.last_modified_by
    }

    /// True once `prepare_update` has been called for the current save cycle.
    #[must_use]
    pub fn is_update_prepared(&self) -> bool {
        self.update_prepared
    }

    /// Marks an already-persisted aggregate update-ready: stamps the audit
    /// fields and advances the in-memory version by exactly one. Must be
    /// called before saving any aggregate with `version >= 1`.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::ContractViolation` when called on an aggregate
    /// that was never persisted (version 0) — fresh aggregates take the
    /// insert path and must not be prepared for update.
    pub fn prepare_update(
        &mut self,
        acting_user: Uid,
        clock: &dyn Clock,
    ) -> Result<(), DomainError> {
        if self.version == 0 {
            return Err(DomainError::ContractViolation(
                "prepare_update called on an unpersisted aggregate (version 0)".to_owned(),
            ));
        }
        self.last_modified_by = Some(acting_user);
        self.last_modified_at = Some(clock.now());
        self.version += 1;
        self.update_prepared = true;
        Ok(())
    }

    /// Serializes the base fields every aggregate row carries.
    #[must_use]
    pub fn base_json(&self) -> serde_json::Value {
        serde_json::json!({
            "id": self.id,
            "version": self.version,
            "created_at": self.created_at,
            "created_by": self.created_by,
            "last_modified_at": self.last_modified_at,
            "last_modified_by": self.last_modified_by,
        })
    }
}

/// Trait for aggregate roots.
///
/// Concrete aggregates embed an [`AggregateMeta`] and expose it through
/// `meta`/`meta_mut`; identity, versioning, and the pending-event buffer are
/// provided on top of it.
pub trait Aggregate: Send + Sync {
    /// The aggregate kind name recorded on every event, e.g. `"User"`.
    fn aggregate_name(&self) -> &'static str;

    /// Returns the shared metadata.
    fn meta(&self) -> &AggregateMeta;

    /// Returns the shared metadata mutably.
    fn meta_mut(&mut self) -> &mut AggregateMeta;

    /// Serializes the full persisted shape: base fields merged with domain
    /// fields.
    fn to_json(&self) -> serde_json::Value;

    /// Returns the aggregate identifier.
    fn id(&self) -> Uid {
        self.meta().id()
    }

    /// Returns the current in-memory version.
    fn version(&self) -> i64 {
        self.meta().version()
    }

    /// Appends a [`DomainEvent`] built from this aggregate's identity to the
    /// pending buffer. Side effect only; no other aggregate state changes.
    fn register_event(&mut self, event_type: &str, data: serde_json::Value) {
        let event = DomainEvent {
            event_type: event_type.to_owned(),
            aggregate_id: self.meta().id(),
            aggregate_name: self.aggregate_name().to_owned(),
            data,
        };
        self.meta_mut().pending_events.push(event);
    }

    /// Drains the pending-event buffer in registration order.
    ///
    /// Clear-on-read: a second call returns an empty batch, so one save
    /// cycle can never double-dispatch.
    fn take_events(&mut self) -> Vec<DomainEvent> {
        std::mem::take(&mut self.meta_mut().pending_events)
    }

    /// See [`AggregateMeta::prepare_update`].
    ///
    /// # Errors
    ///
    /// Returns `DomainError::ContractViolation` when the aggregate was never
    /// persisted.
    fn prepare_update(&mut self, acting_user: Uid, clock: &dyn Clock) -> Result<(), DomainError> {
        self.meta_mut().prepare_update(acting_user, clock)
    }
}
