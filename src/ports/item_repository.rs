//! ItemRepository port - tenant-scoped persistence for catalog items.

use async_trait::async_trait;

use crate::domain::foundation::{DomainError, ItemId, TenantId};
use crate::domain::item::Item;

/// Repository port for Item aggregate persistence.
///
/// Every lookup is scoped by tenant; an item of another tenant is reported as
/// absent rather than forbidden.
#[async_trait]
pub trait ItemRepository: Send + Sync {
    /// Insert a new item.
    ///
    /// # Errors
    ///
    /// - `DatabaseError` on persistence failure
    async fn save(&self, item: &Item) -> Result<(), DomainError>;

    /// Overwrite an existing item.
    ///
    /// # Errors
    ///
    /// - `ItemNotFound` if the item does not exist
    /// - `DatabaseError` on persistence failure
    async fn update(&self, item: &Item) -> Result<(), DomainError>;

    /// Find an item by id within a tenant.
    async fn find_by_id(
        &self,
        tenant_id: &TenantId,
        id: &ItemId,
    ) -> Result<Option<Item>, DomainError>;

    /// Delete an item.
    ///
    /// # Errors
    ///
    /// - `ItemNotFound` if the item does not exist
    async fn delete(&self, tenant_id: &TenantId, id: &ItemId) -> Result<(), DomainError>;
}
