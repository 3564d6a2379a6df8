//! Event handler registry - event type tag -> subscribers.
//!
//! Built once at startup by explicit `subscribe` calls, then shared read-only
//! with the worker. Handlers for one tag run in registration order.

use async_trait::async_trait;
use std::collections::HashMap;
use std::future::Future;
use std::marker::PhantomData;
use std::sync::Arc;

use crate::domain::foundation::{DomainError, EventEnvelope};
use crate::ports::EventHandler;

/// Directory of subscribers keyed by event type.
///
/// # Example
///
/// ```ignore
/// let mut registry = EventHandlerRegistry::new();
/// registry.subscribe(ITEM_CREATED, Arc::new(StockLevelProjector::new()));
/// registry.subscribe_fn(ITEM_DELETED, "AuditLog", |event| async move {
///     tracing::info!(event_id = %event.event_id, "item deleted");
///     Ok(())
/// });
/// let registry = Arc::new(registry);
/// ```
#[derive(Default, Clone)]
pub struct EventHandlerRegistry {
    handlers: HashMap<String, Vec<Arc<dyn EventHandler>>>,
}

impl EventHandlerRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Subscribe handler to a specific event type.
    pub fn subscribe(
        &mut self,
        event_type: impl Into<String>,
        handler: Arc<dyn EventHandler>,
    ) -> &mut Self {
        self.handlers
            .entry(event_type.into())
            .or_default()
            .push(handler);
        self
    }

    /// Subscribe the same handler instance to several event types.
    pub fn subscribe_all(&mut self, event_types: &[&str], handler: Arc<dyn EventHandler>) -> &mut Self {
        for event_type in event_types {
            self.subscribe(*event_type, Arc::clone(&handler));
        }
        self
    }

    /// Subscribe a closure.
    pub fn subscribe_fn<F, Fut>(
        &mut self,
        event_type: impl Into<String>,
        name: &'static str,
        f: F,
    ) -> &mut Self
    where
        F: Fn(EventEnvelope) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<(), DomainError>> + Send + 'static,
    {
        self.subscribe(event_type, Arc::new(FnEventHandler::new(name, f)))
    }

    /// Handlers for `event_type` in registration order; empty when none.
    pub fn handlers_for(&self, event_type: &str) -> &[Arc<dyn EventHandler>] {
        self.handlers
            .get(event_type)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Number of handlers across all event types.
    pub fn len(&self) -> usize {
        self.handlers.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Adapts an async closure to [`EventHandler`].
pub struct FnEventHandler<F, Fut> {
    name: &'static str,
    f: F,
    _future: PhantomData<fn() -> Fut>,
}

impl<F, Fut> FnEventHandler<F, Fut>
where
    F: Fn(EventEnvelope) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<(), DomainError>> + Send + 'static,
{
    pub fn new(name: &'static str, f: F) -> Self {
        Self {
            name,
            f,
            _future: PhantomData,
        }
    }
}

#[async_trait]
impl<F, Fut> EventHandler for FnEventHandler<F, Fut>
where
    F: Fn(EventEnvelope) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<(), DomainError>> + Send + 'static,
{
    async fn handle(&self, event: &EventEnvelope) -> Result<(), DomainError> {
        (self.f)(event.clone()).await
    }

    fn name(&self) -> &'static str {
        self.name
    }
}
