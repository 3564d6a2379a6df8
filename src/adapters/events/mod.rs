//! Domain event delivery adapters.
//!
//! - `EventHandlerRegistry` - Event type -> subscribers, fixed at startup
//! - `InMemoryEventStore` - Store for tests and non-durable runs
//! - `DomainEventQueue` - Persist-then-signal producer handle
//! - `DomainEventDispatcher` - Drains entity events into the queue after a write
//! - `DomainEventWorker` - Background consumer with startup recovery

mod dispatcher;
mod in_memory_store;
mod queue;
mod registry;
mod worker;

pub use dispatcher::DomainEventDispatcher;
pub use in_memory_store::InMemoryEventStore;
pub use queue::DomainEventQueue;
pub use registry::{EventHandlerRegistry, FnEventHandler};
pub use worker::{DomainEventWorker, DrainReport, WorkerConfig, WorkerHandle};
