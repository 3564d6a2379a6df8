//! Integration tests for durable domain event delivery.
//!
//! Covers the persist-then-signal queue, worker recovery after a crash,
//! failure isolation between events and graceful shutdown. Uses the
//! in-memory event store so no database is needed.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use serde_json::json;
use tokio::sync::Mutex;

use admin_core::adapters::events::{
    DomainEventQueue, DomainEventWorker, EventHandlerRegistry, InMemoryEventStore, WorkerConfig,
};
use admin_core::domain::foundation::{DomainError, ErrorCode, EventEnvelope, EventId};
use admin_core::ports::{EventHandler, EventStatus, EventStore, StoredEvent};

// =============================================================================
// Test Infrastructure
// =============================================================================

/// Records the ids it sees; fails for payloads marked `"fail": true`.
#[derive(Default)]
struct RecordingHandler {
    seen: Mutex<Vec<EventId>>,
}

impl RecordingHandler {
    async fn seen(&self) -> Vec<EventId> {
        self.seen.lock().await.clone()
    }
}

#[async_trait]
impl EventHandler for RecordingHandler {
    async fn handle(&self, event: &EventEnvelope) -> Result<(), DomainError> {
        self.seen.lock().await.push(event.event_id.clone());
        if event.payload["fail"] == json!(true) {
            return Err(DomainError::new(ErrorCode::EventHandlerFailed, "rejected"));
        }
        Ok(())
    }

    fn name(&self) -> &'static str {
        "Recording"
    }
}

fn order_placed(fail: bool) -> EventEnvelope {
    EventEnvelope::new("order.placed", "order-1", "Order", json!({ "fail": fail }))
}

fn registry_with(handler: Arc<RecordingHandler>) -> Arc<EventHandlerRegistry> {
    let mut registry = EventHandlerRegistry::new();
    registry.subscribe("order.placed", handler);
    Arc::new(registry)
}

async fn status_of(store: &InMemoryEventStore, id: &EventId) -> EventStatus {
    store.find_by_id(id).await.unwrap().unwrap().status
}

// =============================================================================
// Delivery
// =============================================================================

#[tokio::test]
async fn enqueued_events_are_delivered_in_order() {
    let store = Arc::new(InMemoryEventStore::new());
    let handler = Arc::new(RecordingHandler::default());
    let (queue, receiver) = DomainEventQueue::new(store.clone());
    let mut worker = DomainEventWorker::new(receiver, store.clone(), registry_with(handler.clone()));

    let first = order_placed(false);
    let second = order_placed(false);
    queue.enqueue(first.clone()).await.unwrap();
    queue.enqueue(second.clone()).await.unwrap();

    let report = worker.drain_once().await;

    assert_eq!(report.processed, 2);
    assert_eq!(handler.seen().await, vec![first.event_id, second.event_id]);
    assert_eq!(store.count_by_status(EventStatus::Processed).await, 2);
}

#[tokio::test]
async fn failing_event_does_not_block_the_next() {
    let store = Arc::new(InMemoryEventStore::new());
    let handler = Arc::new(RecordingHandler::default());
    let (queue, receiver) = DomainEventQueue::new(store.clone());
    let mut worker = DomainEventWorker::new(receiver, store.clone(), registry_with(handler.clone()));

    let bad = order_placed(true);
    let good = order_placed(false);
    queue.enqueue(bad.clone()).await.unwrap();
    queue.enqueue(good.clone()).await.unwrap();

    let report = worker.drain_once().await;

    assert_eq!(report.failed, 1);
    assert_eq!(report.processed, 1);
    assert_eq!(status_of(&store, &bad.event_id).await, EventStatus::Failed);
    assert_eq!(status_of(&store, &good.event_id).await, EventStatus::Processed);

    let failed = store.find_by_id(&bad.event_id).await.unwrap().unwrap();
    assert!(failed.result.unwrap().contains("rejected"));
    assert!(failed.processed_at.is_some());
}

#[tokio::test]
async fn event_without_subscribers_is_processed() {
    let store = Arc::new(InMemoryEventStore::new());
    let (queue, receiver) = DomainEventQueue::new(store.clone());
    let mut worker =
        DomainEventWorker::new(receiver, store.clone(), Arc::new(EventHandlerRegistry::new()));
    let event = EventEnvelope::new("nobody.listens", "x-1", "X", json!({}));

    queue.enqueue(event.clone()).await.unwrap();
    worker.drain_once().await;

    let stored = store.find_by_id(&event.event_id).await.unwrap().unwrap();
    assert_eq!(stored.status, EventStatus::Processed);
    assert!(stored.processed_at.is_some());
    assert!(stored.result.is_none());
}

// =============================================================================
// Recovery
// =============================================================================

#[tokio::test]
async fn pending_events_from_a_previous_run_are_recovered() {
    let store = Arc::new(InMemoryEventStore::new());
    let handler = Arc::new(RecordingHandler::default());
    let orphan = order_placed(false);
    // Persisted before a crash, never signalled.
    store
        .insert_pending(&StoredEvent::pending(orphan.clone()))
        .await
        .unwrap();

    let (_queue, receiver) = DomainEventQueue::new(store.clone());
    let mut worker = DomainEventWorker::new(receiver, store.clone(), registry_with(handler.clone()));

    assert_eq!(worker.recover().await.unwrap(), 1);
    worker.drain_once().await;

    assert_eq!(handler.seen().await, vec![orphan.event_id.clone()]);
    assert_eq!(status_of(&store, &orphan.event_id).await, EventStatus::Processed);
}

#[tokio::test]
async fn recovery_and_channel_copy_deliver_once() {
    let store = Arc::new(InMemoryEventStore::new());
    let handler = Arc::new(RecordingHandler::default());
    let (queue, receiver) = DomainEventQueue::new(store.clone());
    let mut worker = DomainEventWorker::new(receiver, store.clone(), registry_with(handler.clone()));

    let event = order_placed(false);
    queue.enqueue(event.clone()).await.unwrap();

    assert_eq!(worker.recover().await.unwrap(), 1);
    assert_eq!(worker.recover().await.unwrap(), 0);
    let report = worker.drain_once().await;

    assert_eq!(report.total(), 1);
    assert_eq!(handler.seen().await.len(), 1);
}

// =============================================================================
// Background worker
// =============================================================================

#[tokio::test]
async fn spawned_worker_delivers_and_stops_on_shutdown() {
    let store = Arc::new(InMemoryEventStore::new());
    let calls = Arc::new(AtomicUsize::new(0));
    let mut registry = EventHandlerRegistry::new();
    let counter = calls.clone();
    registry.subscribe_fn("order.placed", "Counter", move |_event| {
        let counter = counter.clone();
        async move {
            counter.fetch_add(1, Ordering::SeqCst);
            Ok::<_, DomainError>(())
        }
    });

    let (queue, receiver) = DomainEventQueue::new(store.clone());
    let handle = DomainEventWorker::with_config(
        receiver,
        store.clone(),
        Arc::new(registry),
        WorkerConfig::default().with_poll_interval(Duration::from_millis(5)),
    )
    .spawn();

    for _ in 0..3 {
        queue.enqueue(order_placed(false)).await.unwrap();
    }

    tokio::time::timeout(Duration::from_secs(2), async {
        while store.count_by_status(EventStatus::Processed).await < 3 {
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
    })
    .await
    .expect("worker should deliver all events");

    handle.shutdown().await.unwrap();
    assert_eq!(calls.load(Ordering::SeqCst), 3);
}
