//! Adapters - Implementations of port interfaces.
//!
//! Adapters connect the core to external systems:
//! - `events` - Durable domain event queue, worker and in-memory store
//! - `identity` - Role providers for the authorization behavior
//! - `memory` - In-memory repositories
//! - `postgres` - PostgreSQL event store and repositories

pub mod events;
pub mod identity;
pub mod memory;
pub mod postgres;

pub use events::{
    DomainEventDispatcher, DomainEventQueue, DomainEventWorker, DrainReport,
    EventHandlerRegistry, InMemoryEventStore, WorkerConfig, WorkerHandle,
};
pub use identity::InMemoryRoleProvider;
pub use memory::InMemoryItemRepository;
pub use postgres::{PostgresEventStore, PostgresItemRepository};
