//! EventStore port - durable record of every domain event handed to the queue.
//!
//! The store is the single source of truth for delivery status. An event is
//! inserted as `Pending` before it reaches the in-memory queue, so a crash at
//! any later point leaves it discoverable by the next startup's recovery scan.
//!
//! Records are never deleted here; `Processed` and `Failed` rows stay for
//! audit and manual replay.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::domain::foundation::{DomainError, ErrorCode, EventEnvelope, EventId, Timestamp};

/// Delivery status of a stored event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventStatus {
    /// Persisted, not yet delivered to its handlers
    Pending,
    /// Every handler completed (or none were registered)
    Processed,
    /// A handler failed; terminal, not re-scanned at startup
    Failed,
}

impl EventStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            EventStatus::Pending => "pending",
            EventStatus::Processed => "processed",
            EventStatus::Failed => "failed",
        }
    }

    /// Returns true once the worker has finished with the event.
    pub fn is_terminal(&self) -> bool {
        !matches!(self, EventStatus::Pending)
    }
}

impl fmt::Display for EventStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EventStatus {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(EventStatus::Pending),
            "processed" => Ok(EventStatus::Processed),
            "failed" => Ok(EventStatus::Failed),
            other => Err(DomainError::new(
                ErrorCode::SerializationError,
                format!("Unknown event status: {}", other),
            )),
        }
    }
}

/// A domain event together with its delivery bookkeeping.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoredEvent {
    /// The immutable event
    pub event: EventEnvelope,

    /// Current delivery status
    pub status: EventStatus,

    /// When the event was written to the store
    pub created_at: Timestamp,

    /// When the worker reached a terminal status
    pub processed_at: Option<Timestamp>,

    /// Failure detail for `Failed` events
    pub result: Option<String>,
}

impl StoredEvent {
    /// Creates a new pending record for an event.
    pub fn pending(event: EventEnvelope) -> Self {
        Self {
            event,
            status: EventStatus::Pending,
            created_at: Timestamp::now(),
            processed_at: None,
            result: None,
        }
    }

    pub fn id(&self) -> &EventId {
        &self.event.event_id
    }

    /// Applies a status transition.
    ///
    /// # Errors
    ///
    /// Only `Pending` events may transition; anything else is reported as
    /// `EventNotFound` since no pending event with that id exists.
    pub fn transition(
        &mut self,
        status: EventStatus,
        processed_at: Timestamp,
        result: Option<&str>,
    ) -> Result<(), DomainError> {
        if self.status.is_terminal() {
            return Err(DomainError::new(
                ErrorCode::EventNotFound,
                format!("Event {} is already {}", self.id(), self.status),
            ));
        }
        self.status = status;
        self.processed_at = Some(processed_at);
        self.result = result.map(str::to_string);
        Ok(())
    }
}

/// Port for persisting domain events and their delivery status.
///
/// Implementations must:
/// - Return pending events oldest first (by `created_at`)
/// - Only transition events that are still `Pending`
#[async_trait]
pub trait EventStore: Send + Sync {
    /// Insert a new event with status `Pending`.
    async fn insert_pending(&self, event: &StoredEvent) -> Result<(), DomainError>;

    /// Record the worker's verdict for an event.
    async fn update_status(
        &self,
        id: &EventId,
        status: EventStatus,
        processed_at: Timestamp,
        result: Option<&str>,
    ) -> Result<(), DomainError>;

    /// All events still `Pending`, oldest first.
    async fn find_pending(&self) -> Result<Vec<StoredEvent>, DomainError>;

    /// Fetch a single event for audit.
    async fn find_by_id(&self, id: &EventId) -> Result<Option<StoredEvent>, DomainError>;

    /// Events in a given status, oldest first, at most `limit`.
    async fn find_by_status(
        &self,
        status: EventStatus,
        limit: u32,
    ) -> Result<Vec<StoredEvent>, DomainError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[allow(dead_code)]
    fn assert_object_safe(_: &dyn EventStore) {}

    #[test]
    fn new_record_is_pending() {
        let stored = StoredEvent::pending(EventEnvelope::test_fixture());

        assert_eq!(stored.status, EventStatus::Pending);
        assert!(stored.processed_at.is_none());
        assert!(stored.result.is_none());
    }

    #[test]
    fn transition_to_failed_records_result() {
        let mut stored = StoredEvent::pending(EventEnvelope::test_fixture());

        stored
            .transition(EventStatus::Failed, Timestamp::now(), Some("timeout"))
            .unwrap();

        assert_eq!(stored.status, EventStatus::Failed);
        assert!(stored.processed_at.is_some());
        assert_eq!(stored.result.as_deref(), Some("timeout"));
    }

    #[test]
    fn terminal_status_cannot_transition_again() {
        let mut stored = StoredEvent::pending(EventEnvelope::test_fixture());
        stored
            .transition(EventStatus::Processed, Timestamp::now(), None)
            .unwrap();

        let err = stored
            .transition(EventStatus::Failed, Timestamp::now(), Some("late"))
            .unwrap_err();

        assert_eq!(err.code, ErrorCode::EventNotFound);
        assert_eq!(stored.status, EventStatus::Processed);
    }

    #[test]
    fn status_round_trips_through_str() {
        for status in [EventStatus::Pending, EventStatus::Processed, EventStatus::Failed] {
            assert_eq!(status.as_str().parse::<EventStatus>().unwrap(), status);
        }
        assert!("bogus".parse::<EventStatus>().is_err());
    }
}
