//! Ports - Interfaces for external dependencies.
//!
//! Following hexagonal architecture, ports define the contracts between
//! the core and the outside world. Adapters implement these ports.
//!
//! ## Event Ports
//!
//! - `EventStore` - Durable event records and delivery status
//! - `EventHandler` - Subscriber invoked by the domain event worker
//!
//! ## Collaborator Ports
//!
//! - `RoleProvider` - Caller role lookup for authorization
//! - `ItemRepository` - Item persistence

mod event_handler;
mod event_store;
mod item_repository;
mod role_provider;

pub use event_handler::EventHandler;
pub use event_store::{EventStatus, EventStore, StoredEvent};
pub use item_repository::ItemRepository;
pub use role_provider::RoleProvider;
