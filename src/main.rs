//! admin-core service entry point.
//!
//! Wires the mediator and the domain event worker, then runs until Ctrl-C.

use std::sync::Arc;

use admin_core::adapters::events::{
    DomainEventDispatcher, DomainEventQueue, DomainEventWorker, EventHandlerRegistry,
    FnEventHandler, InMemoryEventStore, WorkerConfig,
};
use admin_core::adapters::identity::InMemoryRoleProvider;
use admin_core::adapters::memory::InMemoryItemRepository;
use admin_core::adapters::postgres::{self, PostgresEventStore, PostgresItemRepository};
use admin_core::application::handlers::item;
use admin_core::application::mediator::{HandlerRegistry, Mediator};
use admin_core::config::AppConfig;
use admin_core::domain::foundation::{DomainError, EventEnvelope};
use admin_core::domain::item::{ITEM_CREATED, ITEM_DELETED, ITEM_UPDATED};
use admin_core::ports::{EventStore, ItemRepository};
use admin_core::telemetry;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = AppConfig::load()?;
    config.validate()?;
    telemetry::init_tracing(&config.logging)?;

    let (store, items): (Arc<dyn EventStore>, Arc<dyn ItemRepository>) = match &config.database {
        Some(database) => {
            let pool = postgres::connect(database).await?;
            if database.run_migrations {
                postgres::migrate(&pool).await?;
            }
            tracing::info!("Using PostgreSQL event store");
            (
                Arc::new(PostgresEventStore::new(pool.clone())),
                Arc::new(PostgresItemRepository::new(pool)),
            )
        }
        None => {
            tracing::warn!("No database configured; events are not durable across restarts");
            (
                Arc::new(InMemoryEventStore::new()),
                Arc::new(InMemoryItemRepository::new()),
            )
        }
    };

    let mut subscribers = EventHandlerRegistry::new();
    subscribers.subscribe_all(
        &[ITEM_CREATED, ITEM_UPDATED, ITEM_DELETED],
        Arc::new(FnEventHandler::new("ItemAuditLog", |event: EventEnvelope| async move {
            tracing::info!(
                event_id = %event.event_id,
                event_type = %event.event_type,
                aggregate_id = %event.aggregate_id,
                "Catalog changed"
            );
            Ok::<_, DomainError>(())
        })),
    );

    let (queue, receiver) = DomainEventQueue::new(store.clone());
    let worker = DomainEventWorker::with_config(
        receiver,
        store,
        Arc::new(subscribers),
        WorkerConfig::from(&config.events),
    )
    .spawn();

    let mut handlers = HandlerRegistry::new();
    item::register(&mut handlers, items, DomainEventDispatcher::new(queue))?;
    // No identity service is wired in yet: every caller holds no roles, so
    // protected requests answer `Unauthorized` until a real RoleProvider
    // replaces this one.
    let mediator = Mediator::new(handlers, Arc::new(InMemoryRoleProvider::new()));
    tracing::info!(handlers = mediator.handler_count(), "admin-core ready");

    tokio::signal::ctrl_c().await?;
    tracing::info!("Shutting down");
    drop(mediator);
    worker.shutdown().await?;
    Ok(())
}
