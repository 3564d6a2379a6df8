//! DomainEventWorker - background consumer of the durable event queue.
//!
//! ## Lifecycle
//!
//! 1. **Recover** - load every `Pending` event from the store, oldest first.
//!    These are events a previous process persisted but never finished.
//!    A failed scan is logged and retried every `poll_interval`; nothing is
//!    delivered until it succeeds, while the channel keeps accepting events.
//! 2. **Drain** - deliver recovered events, then everything the channel holds.
//! 3. **Idle** - sleep for `poll_interval`, waking early on shutdown.
//!
//! ## Delivery
//!
//! Handlers for an event run one after another in registration order. The
//! first handler error or panic marks the event `Failed` with
//! `"{handler}: {error}"` and skips the remaining handlers. Otherwise the
//! event is marked `Processed`, including when nobody subscribed.
//!
//! A failure to record the verdict is logged and the event stays `Pending`,
//! so the next startup delivers it again. Handlers must be idempotent.
//!
//! ## Graceful Shutdown
//!
//! The shutdown flag is checked between events, never mid-event. Events still
//! in the channel at shutdown are already persisted and get recovered later.

use std::collections::{HashSet, VecDeque};
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use std::time::Duration;

use futures::FutureExt;
use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tracing::{debug, error, info, warn};

use crate::config::EventsConfig;
use crate::domain::foundation::{DomainError, ErrorCode, EventEnvelope, EventId, Timestamp};
use crate::ports::{EventStatus, EventStore};

use super::EventHandlerRegistry;

/// Configuration for the DomainEventWorker.
#[derive(Debug, Clone)]
pub struct WorkerConfig {
    /// How long to sleep when there is nothing to deliver.
    pub poll_interval: Duration,
}

impl Default for WorkerConfig {
    fn default() -> Self {
        Self {
            poll_interval: Duration::from_millis(50),
        }
    }
}

impl WorkerConfig {
    pub fn with_poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = interval;
        self
    }
}

impl From<&EventsConfig> for WorkerConfig {
    fn from(config: &EventsConfig) -> Self {
        Self {
            poll_interval: config.poll_interval(),
        }
    }
}

/// Result of one drain pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DrainReport {
    /// Events marked `Processed`
    pub processed: usize,
    /// Events marked `Failed`
    pub failed: usize,
}

impl DrainReport {
    pub fn total(&self) -> usize {
        self.processed + self.failed
    }
}

/// Single consumer of the domain event queue.
pub struct DomainEventWorker {
    receiver: mpsc::UnboundedReceiver<EventEnvelope>,
    store: Arc<dyn EventStore>,
    registry: Arc<EventHandlerRegistry>,
    config: WorkerConfig,
    backlog: VecDeque<EventEnvelope>,
    recovered: HashSet<EventId>,
    shutdown: Option<watch::Receiver<bool>>,
}

impl DomainEventWorker {
    /// Create a worker with default configuration.
    pub fn new(
        receiver: mpsc::UnboundedReceiver<EventEnvelope>,
        store: Arc<dyn EventStore>,
        registry: Arc<EventHandlerRegistry>,
    ) -> Self {
        Self::with_config(receiver, store, registry, WorkerConfig::default())
    }

    /// Create a worker with custom configuration.
    pub fn with_config(
        receiver: mpsc::UnboundedReceiver<EventEnvelope>,
        store: Arc<dyn EventStore>,
        registry: Arc<EventHandlerRegistry>,
        config: WorkerConfig,
    ) -> Self {
        Self {
            receiver,
            store,
            registry,
            config,
            backlog: VecDeque::new(),
            recovered: HashSet::new(),
            shutdown: None,
        }
    }

    /// Queue every `Pending` event from the store for delivery, oldest first.
    ///
    /// Safe to call repeatedly: an event already recovered by this worker is
    /// not queued twice. Returns the number of newly recovered events.
    pub async fn recover(&mut self) -> Result<usize, DomainError> {
        let pending = self.store.find_pending().await?;
        let mut added = 0;
        for stored in pending {
            if self.recovered.insert(stored.id().clone()) {
                self.backlog.push_back(stored.event);
                added += 1;
            }
        }
        if added > 0 {
            info!(count = added, "Recovered pending domain events");
        }
        Ok(added)
    }

    /// Deliver everything currently available without waiting.
    ///
    /// Stops early once shutdown has been requested.
    pub async fn drain_once(&mut self) -> DrainReport {
        let mut report = DrainReport::default();
        while !self.shutdown_requested() {
            let Some(event) = self.next_event() else {
                break;
            };
            match self.process(&event).await {
                EventStatus::Failed => report.failed += 1,
                _ => report.processed += 1,
            }
        }
        report
    }

    /// Run until `shutdown` flips to `true` or its sender is dropped.
    pub async fn run(mut self, shutdown: watch::Receiver<bool>) {
        self.shutdown = Some(shutdown.clone());
        let mut shutdown = shutdown;
        let mut recovered = false;

        loop {
            if *shutdown.borrow() {
                break;
            }

            if !recovered {
                match self.recover().await {
                    Ok(_) => {
                        recovered = true;
                        info!(
                            poll_interval_ms = self.config.poll_interval.as_millis() as u64,
                            "Domain event worker started"
                        );
                    }
                    Err(e) => error!(error = %e, "Recovery scan failed; retrying"),
                }
            }

            if recovered {
                let report = self.drain_once().await;
                if report.total() > 0 {
                    debug!(
                        processed = report.processed,
                        failed = report.failed,
                        "Drained domain events"
                    );
                    continue;
                }
            }

            tokio::select! {
                changed = shutdown.changed() => {
                    if changed.is_err() {
                        break;
                    }
                }
                _ = tokio::time::sleep(self.config.poll_interval) => {}
            }
        }

        info!("Domain event worker stopped");
    }

    /// Start [`run`](Self::run) on the tokio runtime.
    pub fn spawn(self) -> WorkerHandle {
        let (shutdown_tx, shutdown_rx) = watch::channel(false);
        let join = tokio::spawn(self.run(shutdown_rx));
        WorkerHandle { shutdown_tx, join }
    }

    fn shutdown_requested(&self) -> bool {
        self.shutdown.as_ref().is_some_and(|rx| *rx.borrow())
    }

    fn next_event(&mut self) -> Option<EventEnvelope> {
        if let Some(event) = self.backlog.pop_front() {
            return Some(event);
        }
        loop {
            let event = self.receiver.try_recv().ok()?;
            // The channel may still carry an event that recovery already delivered.
            if !self.recovered.remove(&event.event_id) {
                return Some(event);
            }
        }
    }

    async fn process(&self, event: &EventEnvelope) -> EventStatus {
        let (status, result) = match self.deliver(event).await {
            Ok(()) => (EventStatus::Processed, None),
            Err(reason) => {
                warn!(
                    event_id = %event.event_id,
                    event_type = %event.event_type,
                    reason = %reason,
                    "Domain event failed"
                );
                (EventStatus::Failed, Some(reason))
            }
        };

        if let Err(e) = self
            .store
            .update_status(&event.event_id, status, Timestamp::now(), result.as_deref())
            .await
        {
            error!(
                event_id = %event.event_id,
                status = %status,
                error = %e,
                "Failed to record domain event status"
            );
        }
        status
    }

    async fn deliver(&self, event: &EventEnvelope) -> Result<(), String> {
        let handlers = self.registry.handlers_for(&event.event_type);
        if handlers.is_empty() {
            debug!(event_type = %event.event_type, "No handlers registered");
        }

        for handler in handlers {
            let outcome = AssertUnwindSafe(handler.handle(event))
                .catch_unwind()
                .await
                .unwrap_or_else(|panic| Err(DomainError::from_panic(handler.name(), panic)));

            if let Err(e) = outcome {
                return Err(format!("{}: {}", handler.name(), e));
            }
            debug!(
                event_id = %event.event_id,
                handler = handler.name(),
                "Handler completed"
            );
        }
        Ok(())
    }
}

/// Handle to a spawned worker.
pub struct WorkerHandle {
    shutdown_tx: watch::Sender<bool>,
    join: JoinHandle<()>,
}

impl WorkerHandle {
    /// Signal shutdown and wait for the worker to finish its current event.
    pub async fn shutdown(self) -> Result<(), DomainError> {
        // A send error means the worker already exited.
        let _ = self.shutdown_tx.send(true);
        self.join.await.map_err(|e| {
            DomainError::new(
                ErrorCode::InternalError,
                format!("Domain event worker task failed: {}", e),
            )
        })
    }
}
