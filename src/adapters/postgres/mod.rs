//! PostgreSQL adapters - Database implementations for storage ports.
//!
//! - `PostgresEventStore` - Durable domain event records and delivery status
//! - `PostgresItemRepository` - Item persistence
//!
//! Schema lives in `migrations/` at the crate root; call [`migrate`] once at
//! startup before handing the pool to any adapter.

mod event_store;
mod item_repository;

pub use event_store::PostgresEventStore;
pub use item_repository::PostgresItemRepository;

use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;

use crate::config::DatabaseConfig;
use crate::domain::foundation::DomainError;

/// Opens a connection pool sized from configuration.
pub async fn connect(config: &DatabaseConfig) -> Result<PgPool, DomainError> {
    PgPoolOptions::new()
        .max_connections(config.max_connections)
        .min_connections(config.min_connections)
        .acquire_timeout(config.acquire_timeout())
        .idle_timeout(config.idle_timeout())
        .max_lifetime(config.max_lifetime())
        .connect(&config.url)
        .await
        .map_err(|e| DomainError::database("Failed to connect to database", e))
}

/// Applies pending schema migrations.
pub async fn migrate(pool: &PgPool) -> Result<(), DomainError> {
    sqlx::migrate!("./migrations")
        .run(pool)
        .await
        .map_err(|e| DomainError::database("Migration failed", e))
}
