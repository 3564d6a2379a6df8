//! EventHandler port - subscribers invoked by the domain event worker.

use async_trait::async_trait;

use crate::domain::foundation::{DomainError, EventEnvelope};

/// Handler for processing domain events.
///
/// Delivery is at-least-once: an event whose status update did not commit
/// before a crash is delivered again after restart, so handlers should
/// tolerate duplicates.
///
/// # Example
///
/// ```ignore
/// struct StockLevelProjector { /* ... */ }
///
/// #[async_trait]
/// impl EventHandler for StockLevelProjector {
///     async fn handle(&self, event: &EventEnvelope) -> Result<(), DomainError> {
///         let created: ItemCreated = event.payload_as()?;
///         // Update read model...
///         Ok(())
///     }
///
///     fn name(&self) -> &'static str {
///         "StockLevelProjector"
///     }
/// }
/// ```
#[async_trait]
pub trait EventHandler: Send + Sync {
    /// Process an event. An `Err` marks the event `Failed` and skips the
    /// remaining handlers for it.
    async fn handle(&self, event: &EventEnvelope) -> Result<(), DomainError>;

    /// Handler name for logging.
    fn name(&self) -> &'static str;
}
