//! In-memory implementation of ItemRepository.

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::domain::foundation::{DomainError, ErrorCode, ItemId, TenantId};
use crate::domain::item::Item;
use crate::ports::ItemRepository;

/// Items keyed by `(tenant, id)`.
///
/// Stores a copy rebuilt through `Item::reconstitute`, so events still pending
/// on the caller's instance never leak into later reads.
#[derive(Default)]
pub struct InMemoryItemRepository {
    items: RwLock<HashMap<(TenantId, ItemId), Item>>,
}

impl InMemoryItemRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn len(&self) -> usize {
        self.items.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.items.read().await.is_empty()
    }
}

fn stored_copy(item: &Item) -> Item {
    Item::reconstitute(
        *item.id(),
        *item.tenant_id(),
        item.title().to_string(),
        item.sku().to_string(),
        item.description().map(str::to_string),
        item.price_cents(),
        *item.created_at(),
        *item.updated_at(),
    )
}

fn not_found(id: &ItemId) -> DomainError {
    DomainError::new(ErrorCode::ItemNotFound, format!("Item not found: {}", id))
}

#[async_trait]
impl ItemRepository for InMemoryItemRepository {
    async fn save(&self, item: &Item) -> Result<(), DomainError> {
        let mut items = self.items.write().await;
        let key = (*item.tenant_id(), *item.id());
        if items.contains_key(&key) {
            return Err(DomainError::new(
                ErrorCode::DatabaseError,
                format!("Item already exists: {}", item.id()),
            ));
        }
        items.insert(key, stored_copy(item));
        Ok(())
    }

    async fn update(&self, item: &Item) -> Result<(), DomainError> {
        let mut items = self.items.write().await;
        let slot = items
            .get_mut(&(*item.tenant_id(), *item.id()))
            .ok_or_else(|| not_found(item.id()))?;
        *slot = stored_copy(item);
        Ok(())
    }

    async fn find_by_id(
        &self,
        tenant_id: &TenantId,
        id: &ItemId,
    ) -> Result<Option<Item>, DomainError> {
        Ok(self
            .items
            .read()
            .await
            .get(&(*tenant_id, *id))
            .map(stored_copy))
    }

    async fn delete(&self, tenant_id: &TenantId, id: &ItemId) -> Result<(), DomainError> {
        self.items
            .write()
            .await
            .remove(&(*tenant_id, *id))
            .map(|_| ())
            .ok_or_else(|| not_found(id))
    }
}
