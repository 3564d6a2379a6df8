//! DomainEventQueue - producer side of durable event delivery.
//!
//! Every enqueue writes the event to the store as `Pending` first and only
//! then hands it to the in-process channel. If the process dies between the
//! two steps the worker's recovery scan picks the event up on next start.

use std::sync::Arc;

use tokio::sync::mpsc;
use tracing::{debug, warn};

use crate::domain::foundation::{DomainError, EventEnvelope};
use crate::ports::{EventStore, StoredEvent};

/// Cloneable handle for enqueuing domain events.
///
/// The matching receiver belongs to exactly one [`DomainEventWorker`].
///
/// [`DomainEventWorker`]: super::DomainEventWorker
#[derive(Clone)]
pub struct DomainEventQueue {
    store: Arc<dyn EventStore>,
    sender: mpsc::UnboundedSender<EventEnvelope>,
}

impl DomainEventQueue {
    /// Creates a queue and the receiver the worker consumes.
    pub fn new(store: Arc<dyn EventStore>) -> (Self, mpsc::UnboundedReceiver<EventEnvelope>) {
        let (sender, receiver) = mpsc::unbounded_channel();
        (Self { store, sender }, receiver)
    }

    /// Persist `event` as pending, then signal the worker.
    ///
    /// Once the event is stored the enqueue has succeeded. If the worker's
    /// receiver is gone the event stays pending for the next recovery scan.
    ///
    /// # Errors
    ///
    /// Store errors are returned unchanged and nothing is sent.
    pub async fn enqueue(&self, event: EventEnvelope) -> Result<(), DomainError> {
        self.store.insert_pending(&StoredEvent::pending(event.clone())).await?;

        let event_id = event.event_id.clone();
        let event_type = event.event_type.clone();
        if self.sender.send(event).is_err() {
            warn!(
                event_id = %event_id,
                event_type = %event_type,
                "Event worker not running; event left pending for recovery"
            );
            return Ok(());
        }

        debug!(event_id = %event_id, event_type = %event_type, "Domain event enqueued");
        Ok(())
    }

    /// The store events are persisted to.
    pub fn store(&self) -> &Arc<dyn EventStore> {
        &self.store
    }
}
