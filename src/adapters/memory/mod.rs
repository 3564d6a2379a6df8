//! In-memory storage adapters for tests and non-durable runs.

mod item_repository;

pub use item_repository::InMemoryItemRepository;
