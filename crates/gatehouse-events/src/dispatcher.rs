//! Task-based event dispatcher.

use std::sync::Arc;

use gatehouse_core::error::DomainError;
use gatehouse_core::event::{DomainEvent, EventDispatch, EventHandler};

/// Dispatches event batches to registered handlers on a spawned task.
///
/// The handler registry is append-only: handlers are registered once at
/// startup, before the dispatcher is shared, and delivery order among the
/// handlers subscribed to one event type follows registration order.
#[derive(Default)]
pub struct TaskEventDispatcher {
    handlers: Vec<Arc<dyn EventHandler>>,
}

impl TaskEventDispatcher {
    /// Creates a dispatcher with an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a handler.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::ContractViolation` when the handler subscribes
    /// to no event types — a misconfigured handler would never run, which is
    /// a defect, not a runtime condition.
    pub fn register_handler(&mut self, handler: Arc<dyn EventHandler>) -> Result<(), DomainError> {
        if handler.event_types().is_empty() {
            return Err(DomainError::ContractViolation(format!(
                "event handler '{}' subscribes to no event types",
                handler.name()
            )));
        }
        self.handlers.push(handler);
        Ok(())
    }

    /// Number of registered handlers.
    #[must_use]
    pub fn handler_count(&self) -> usize {
        self.handlers.len()
    }
}

impl EventDispatch for TaskEventDispatcher {
    fn dispatch(&self, events: Vec<DomainEvent>) {
        if events.is_empty() {
            return;
        }
        let handlers = self.handlers.clone();
        tokio::spawn(async move {
            for event in &events {
                for handler in handlers
                    .iter()
                    .filter(|h| h.event_types().contains(&event.event_type.as_str()))
                {
                    if let Err(err) = handler.handle(event).await {
                        tracing::error!(
                            handler = handler.name(),
                            event_type = %event.event_type,
                            aggregate_name = %event.aggregate_name,
                            aggregate_id = %event.aggregate_id,
                            error = %err,
                            "event handler failed"
                        );
                    }
                }
            }
        });
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use async_trait::async_trait;
    use gatehouse_core::uid::Uid;
    use tokio::sync::mpsc;

    use super::*;

    struct SpyHandler {
        name: &'static str,
        types: Vec<&'static str>,
        tx: mpsc::UnboundedSender<String>,
        fail: bool,
    }

    #[async_trait]
    impl EventHandler for SpyHandler {
        fn name(&self) -> &'static str {
            self.name
        }

        fn event_types(&self) -> &[&'static str] {
            &self.types
        }

        async fn handle(&self, event: &DomainEvent) -> Result<(), DomainError> {
            self.tx
                .send(format!("{}:{}", self.name, event.event_type))
                .unwrap();
            if self.fail {
                return Err(DomainError::Infrastructure("boom".to_owned()));
            }
            Ok(())
        }
    }

    fn event(event_type: &str) -> DomainEvent {
        DomainEvent {
            event_type: event_type.to_owned(),
            aggregate_id: Uid::generate(),
            aggregate_name: "User".to_owned(),
            data: serde_json::json!({}),
        }
    }

    async fn recv_n(rx: &mut mpsc::UnboundedReceiver<String>, n: usize) -> Vec<String> {
        let mut seen = Vec::with_capacity(n);
        for _ in 0..n {
            let next = tokio::time::timeout(Duration::from_secs(1), rx.recv())
                .await
                .expect("timed out waiting for handler invocation")
                .expect("channel closed");
            seen.push(next);
        }
        seen
    }

    #[test]
    fn test_register_handler_rejects_empty_subscription_set() {
        let (tx, _rx) = mpsc::unbounded_channel();
        let mut dispatcher = TaskEventDispatcher::new();

        let err = dispatcher
            .register_handler(Arc::new(SpyHandler {
                name: "empty",
                types: vec![],
                tx,
                fail: false,
            }))
            .unwrap_err();

        assert!(err.is_contract_violation());
        assert_eq!(dispatcher.handler_count(), 0);
    }

    #[tokio::test]
    async fn test_dispatch_delivers_events_in_registration_order() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let mut dispatcher = TaskEventDispatcher::new();
        dispatcher
            .register_handler(Arc::new(SpyHandler {
                name: "first",
                types: vec!["USER_REGISTERED"],
                tx: tx.clone(),
                fail: false,
            }))
            .unwrap();
        dispatcher
            .register_handler(Arc::new(SpyHandler {
                name: "second",
                types: vec!["USER_REGISTERED"],
                tx,
                fail: false,
            }))
            .unwrap();

        dispatcher.dispatch(vec![event("USER_REGISTERED")]);

        let seen = recv_n(&mut rx, 2).await;
        assert_eq!(seen, vec!["first:USER_REGISTERED", "second:USER_REGISTERED"]);
    }

    #[tokio::test]
    async fn test_failing_handler_does_not_block_siblings_or_later_events() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let mut dispatcher = TaskEventDispatcher::new();
        dispatcher
            .register_handler(Arc::new(SpyHandler {
                name: "failing",
                types: vec!["USER_REGISTERED", "USER_PROFILE_UPDATED"],
                tx: tx.clone(),
                fail: true,
            }))
            .unwrap();
        dispatcher
            .register_handler(Arc::new(SpyHandler {
                name: "healthy",
                types: vec!["USER_REGISTERED", "USER_PROFILE_UPDATED"],
                tx,
                fail: false,
            }))
            .unwrap();

        dispatcher.dispatch(vec![event("USER_REGISTERED"), event("USER_PROFILE_UPDATED")]);

        let seen = recv_n(&mut rx, 4).await;
        assert_eq!(
            seen,
            vec![
                "failing:USER_REGISTERED",
                "healthy:USER_REGISTERED",
                "failing:USER_PROFILE_UPDATED",
                "healthy:USER_PROFILE_UPDATED",
            ]
        );
    }

    #[tokio::test]
    async fn test_unsubscribed_event_types_are_skipped() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let mut dispatcher = TaskEventDispatcher::new();
        dispatcher
            .register_handler(Arc::new(SpyHandler {
                name: "roles_only",
                types: vec!["ROLE_CREATED"],
                tx,
                fail: false,
            }))
            .unwrap();

        dispatcher.dispatch(vec![event("USER_REGISTERED"), event("ROLE_CREATED")]);

        let seen = recv_n(&mut rx, 1).await;
        assert_eq!(seen, vec!["roles_only:ROLE_CREATED"]);
        assert!(rx.try_recv().is_err());
    }

    #[tokio::test]
    async fn test_empty_batch_schedules_nothing() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let mut dispatcher = TaskEventDispatcher::new();
        dispatcher
            .register_handler(Arc::new(SpyHandler {
                name: "spy",
                types: vec!["USER_REGISTERED"],
                tx,
                fail: false,
            }))
            .unwrap();

        dispatcher.dispatch(Vec::new());

        tokio::task::yield_now().await;
        assert!(rx.try_recv().is_err());
    }
}
