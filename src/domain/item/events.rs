//! Item domain events.
//!
//! - `ItemCreated` - New item added to a tenant's catalog
//! - `ItemUpdated` - Title, description or price changed
//! - `ItemDeleted` - Item removed from the catalog

use serde::{Deserialize, Serialize};

use crate::domain::foundation::{domain_event, EventId, ItemId, TenantId, Timestamp};

/// Event type tag for [`ItemCreated`].
pub const ITEM_CREATED: &str = "item.created";
/// Event type tag for [`ItemUpdated`].
pub const ITEM_UPDATED: &str = "item.updated";
/// Event type tag for [`ItemDeleted`].
pub const ITEM_DELETED: &str = "item.deleted";

/// Published when a new item is created.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ItemCreated {
    pub event_id: EventId,
    pub item_id: ItemId,
    pub tenant_id: TenantId,
    pub title: String,
    pub sku: String,
    pub price_cents: i64,
    pub created_at: Timestamp,
}

domain_event!(
    ItemCreated,
    event_type = ITEM_CREATED,
    aggregate_id = item_id,
    aggregate_type = "Item",
    occurred_at = created_at,
    event_id = event_id
);

/// Published when an item's editable fields change.
///
/// Carries the new values only; consumers needing history read the store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ItemUpdated {
    pub event_id: EventId,
    pub item_id: ItemId,
    pub tenant_id: TenantId,
    pub title: String,
    pub description: Option<String>,
    pub price_cents: i64,
    pub updated_at: Timestamp,
}

domain_event!(
    ItemUpdated,
    event_type = ITEM_UPDATED,
    aggregate_id = item_id,
    aggregate_type = "Item",
    occurred_at = updated_at,
    event_id = event_id
);

/// Published when an item is deleted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ItemDeleted {
    pub event_id: EventId,
    pub item_id: ItemId,
    pub tenant_id: TenantId,
    pub deleted_at: Timestamp,
}

domain_event!(
    ItemDeleted,
    event_type = ITEM_DELETED,
    aggregate_id = item_id,
    aggregate_type = "Item",
    occurred_at = deleted_at,
    event_id = event_id
);
