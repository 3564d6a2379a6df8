//! DomainEventDispatcher - moves events off entities once a write commits.

use crate::domain::foundation::{CommandMetadata, DomainError, EventSource};

use super::DomainEventQueue;

/// Drains the events recorded on tracked entities into the durable queue.
///
/// Command handlers call [`dispatch`](Self::dispatch) only after their storage
/// write succeeded. Forwarded events leave the entity, so a second dispatch
/// of the same entity forwards nothing.
#[derive(Clone)]
pub struct DomainEventDispatcher {
    queue: DomainEventQueue,
}

impl DomainEventDispatcher {
    pub fn new(queue: DomainEventQueue) -> Self {
        Self { queue }
    }

    /// Forward every pending event from `entities`, in entity order and then
    /// raise order, returning how many were enqueued.
    ///
    /// # Errors
    ///
    /// Stops at the first enqueue failure. Events already enqueued stay
    /// pending in the store; the failed event and everything after it remain
    /// on their entities, so the dispatch can be retried.
    pub async fn dispatch(
        &self,
        entities: &mut [&mut dyn EventSource],
    ) -> Result<usize, DomainError> {
        self.forward(None, entities).await
    }

    /// Like [`dispatch`](Self::dispatch), stamping each event with the
    /// caller's correlation id, user and tenant first.
    pub async fn dispatch_for(
        &self,
        metadata: &CommandMetadata,
        entities: &mut [&mut dyn EventSource],
    ) -> Result<usize, DomainError> {
        self.forward(Some(metadata), entities).await
    }

    async fn forward(
        &self,
        metadata: Option<&CommandMetadata>,
        entities: &mut [&mut dyn EventSource],
    ) -> Result<usize, DomainError> {
        let mut forwarded = 0;
        for entity in entities.iter_mut() {
            let mut events = entity.take_events().into_iter();
            while let Some(event) = events.next() {
                let outgoing = match metadata {
                    Some(metadata) => metadata.stamp(event.clone()),
                    None => event.clone(),
                };
                if let Err(err) = self.queue.enqueue(outgoing).await {
                    entity.restore_events(std::iter::once(event).chain(events).collect());
                    return Err(err);
                }
                forwarded += 1;
            }
        }
        Ok(forwarded)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::events::InMemoryEventStore;
    use crate::domain::foundation::{ErrorCode, EventEnvelope, EventId, Timestamp};
    use crate::ports::{EventStatus, EventStore, StoredEvent};
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    #[derive(Default)]
    struct Probe {
        events: Vec<EventEnvelope>,
    }

    impl Probe {
        fn with_events(n: usize) -> Self {
            Self {
                events: (0..n).map(|_| EventEnvelope::test_fixture()).collect(),
            }
        }
    }

    impl EventSource for Probe {
        fn pending_events(&self) -> &[EventEnvelope] {
            &self.events
        }

        fn take_events(&mut self) -> Vec<EventEnvelope> {
            std::mem::take(&mut self.events)
        }

        fn restore_events(&mut self, events: Vec<EventEnvelope>) {
            self.events = events;
        }
    }

    /// Delegates to an in-memory store but rejects the `fail_on`-th insert.
    struct FailingNthInsert {
        inner: InMemoryEventStore,
        fail_on: usize,
        inserts: AtomicUsize,
    }

    impl FailingNthInsert {
        fn new(fail_on: usize) -> Self {
            Self {
                inner: InMemoryEventStore::new(),
                fail_on,
                inserts: AtomicUsize::new(0),
            }
        }
    }

    #[async_trait]
    impl EventStore for FailingNthInsert {
        async fn insert_pending(&self, event: &StoredEvent) -> Result<(), DomainError> {
            if self.inserts.fetch_add(1, Ordering::SeqCst) + 1 == self.fail_on {
                return Err(DomainError::new(ErrorCode::DatabaseError, "insert rejected"));
            }
            self.inner.insert_pending(event).await
        }

        async fn update_status(
            &self,
            id: &EventId,
            status: EventStatus,
            at: Timestamp,
            result: Option<&str>,
        ) -> Result<(), DomainError> {
            self.inner.update_status(id, status, at, result).await
        }

        async fn find_pending(&self) -> Result<Vec<StoredEvent>, DomainError> {
            self.inner.find_pending().await
        }

        async fn find_by_id(&self, id: &EventId) -> Result<Option<StoredEvent>, DomainError> {
            self.inner.find_by_id(id).await
        }

        async fn find_by_status(
            &self,
            status: EventStatus,
            limit: u32,
        ) -> Result<Vec<StoredEvent>, DomainError> {
            self.inner.find_by_status(status, limit).await
        }
    }

    #[tokio::test]
    async fn forwards_in_entity_then_raise_order() {
        let store = Arc::new(InMemoryEventStore::new());
        let (queue, mut receiver) = DomainEventQueue::new(store.clone());
        let dispatcher = DomainEventDispatcher::new(queue);
        let mut first = Probe::with_events(2);
        let mut second = Probe::with_events(1);
        let expected: Vec<_> = first
            .pending_events()
            .iter()
            .chain(second.pending_events())
            .map(|e| e.event_id.clone())
            .collect();

        let forwarded = dispatcher
            .dispatch(&mut [&mut first, &mut second])
            .await
            .unwrap();

        assert_eq!(forwarded, 3);
        let mut received = Vec::new();
        while let Ok(event) = receiver.try_recv() {
            received.push(event.event_id);
        }
        assert_eq!(received, expected);
        assert_eq!(store.len().await, 3);
    }

    #[tokio::test]
    async fn entities_are_cleared_and_second_dispatch_is_empty() {
        let (queue, _receiver) = DomainEventQueue::new(Arc::new(InMemoryEventStore::new()));
        let dispatcher = DomainEventDispatcher::new(queue);
        let mut probe = Probe::with_events(2);

        dispatcher.dispatch(&mut [&mut probe]).await.unwrap();
        assert!(probe.pending_events().is_empty());

        let again = dispatcher.dispatch(&mut [&mut probe]).await.unwrap();
        assert_eq!(again, 0);
    }

    #[tokio::test]
    async fn dispatch_for_stamps_caller_metadata() {
        let (queue, mut receiver) = DomainEventQueue::new(Arc::new(InMemoryEventStore::new()));
        let dispatcher = DomainEventDispatcher::new(queue);
        let mut probe = Probe::with_events(1);

        dispatcher
            .dispatch_for(&CommandMetadata::test_fixture(), &mut [&mut probe])
            .await
            .unwrap();

        let event = receiver.try_recv().unwrap();
        assert_eq!(
            event.metadata.correlation_id.as_deref(),
            Some("test-correlation-id")
        );
        assert_eq!(event.metadata.user_id.as_deref(), Some("test-user-123"));
    }

    #[tokio::test]
    async fn no_entities_is_a_no_op() {
        let (queue, _receiver) = DomainEventQueue::new(Arc::new(InMemoryEventStore::new()));
        let dispatcher = DomainEventDispatcher::new(queue);

        assert_eq!(dispatcher.dispatch(&mut []).await.unwrap(), 0);
        let mut empty = Probe::default();
        assert_eq!(dispatcher.dispatch(&mut [&mut empty]).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn failed_enqueue_keeps_unsent_events_on_entity() {
        let store = Arc::new(FailingNthInsert::new(2));
        let (queue, _receiver) = DomainEventQueue::new(store.clone());
        let dispatcher = DomainEventDispatcher::new(queue);
        let mut probe = Probe::with_events(3);
        let ids: Vec<_> = probe
            .pending_events()
            .iter()
            .map(|e| e.event_id.clone())
            .collect();

        let err = dispatcher.dispatch(&mut [&mut probe]).await.unwrap_err();

        assert_eq!(err.code, ErrorCode::DatabaseError);
        assert!(store.find_by_id(&ids[0]).await.unwrap().is_some());
        let left: Vec<_> = probe
            .pending_events()
            .iter()
            .map(|e| e.event_id.clone())
            .collect();
        assert_eq!(left, ids[1..].to_vec());

        let retried = dispatcher.dispatch(&mut [&mut probe]).await.unwrap();
        assert_eq!(retried, 2);
        assert!(probe.pending_events().is_empty());
    }
}
