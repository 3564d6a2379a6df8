//! In-memory event store for tests and single-process development.
//!
//! Holds the same bookkeeping as the Postgres table in a `Vec`, so the worker
//! and queue can be exercised end to end without a database.

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::domain::foundation::{DomainError, ErrorCode, EventId, Timestamp};
use crate::ports::{EventStatus, EventStore, StoredEvent};

/// In-memory [`EventStore`].
///
/// # Example
///
/// ```ignore
/// let store = Arc::new(InMemoryEventStore::new());
/// let (queue, receiver) = DomainEventQueue::new(store.clone());
///
/// // ... run commands, drain the worker ...
///
/// assert_eq!(store.count_by_status(EventStatus::Processed).await, 2);
/// ```
#[derive(Default)]
pub struct InMemoryEventStore {
    events: RwLock<Vec<StoredEvent>>,
}

impl InMemoryEventStore {
    pub fn new() -> Self {
        Self::default()
    }

    // === Test Helpers ===

    /// Snapshot of every stored record in insertion order.
    pub async fn all(&self) -> Vec<StoredEvent> {
        self.events.read().await.clone()
    }

    /// Number of records in `status`.
    pub async fn count_by_status(&self, status: EventStatus) -> usize {
        self.events
            .read()
            .await
            .iter()
            .filter(|e| e.status == status)
            .count()
    }

    pub async fn len(&self) -> usize {
        self.events.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.events.read().await.is_empty()
    }
}

#[async_trait]
impl EventStore for InMemoryEventStore {
    async fn insert_pending(&self, event: &StoredEvent) -> Result<(), DomainError> {
        let mut events = self.events.write().await;
        if events.iter().any(|e| e.id() == event.id()) {
            return Err(DomainError::new(
                ErrorCode::DatabaseError,
                format!("Event {} already stored", event.id()),
            ));
        }
        events.push(event.clone());
        Ok(())
    }

    async fn update_status(
        &self,
        id: &EventId,
        status: EventStatus,
        processed_at: Timestamp,
        result: Option<&str>,
    ) -> Result<(), DomainError> {
        let mut events = self.events.write().await;
        let stored = events.iter_mut().find(|e| e.id() == id).ok_or_else(|| {
            DomainError::new(ErrorCode::EventNotFound, format!("Event not found: {}", id))
        })?;
        stored.transition(status, processed_at, result)
    }

    async fn find_pending(&self) -> Result<Vec<StoredEvent>, DomainError> {
        self.find_by_status(EventStatus::Pending, u32::MAX).await
    }

    async fn find_by_id(&self, id: &EventId) -> Result<Option<StoredEvent>, DomainError> {
        Ok(self
            .events
            .read()
            .await
            .iter()
            .find(|e| e.id() == id)
            .cloned())
    }

    async fn find_by_status(
        &self,
        status: EventStatus,
        limit: u32,
    ) -> Result<Vec<StoredEvent>, DomainError> {
        let mut matching: Vec<StoredEvent> = self
            .events
            .read()
            .await
            .iter()
            .filter(|e| e.status == status)
            .cloned()
            .collect();
        // Stable sort keeps insertion order for equal timestamps.
        matching.sort_by_key(|e| e.created_at);
        matching.truncate(limit as usize);
        Ok(matching)
    }
}
