use serde::Serialize;

use crate::domain::foundation::{ItemId, TenantId, Timestamp};
use crate::domain::item::Item;

/// Read model returned by item commands and queries.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ItemView {
    pub id: ItemId,
    pub tenant_id: TenantId,
    pub title: String,
    pub sku: String,
    pub description: Option<String>,
    pub price_cents: i64,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl From<&Item> for ItemView {
    fn from(item: &Item) -> Self {
        Self {
            id: *item.id(),
            tenant_id: *item.tenant_id(),
            title: item.title().to_string(),
            sku: item.sku().to_string(),
            description: item.description().map(str::to_string),
            price_cents: item.price_cents(),
            created_at: *item.created_at(),
            updated_at: *item.updated_at(),
        }
    }
}
