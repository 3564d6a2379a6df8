//! Item aggregate - a catalog entry owned by one tenant.

use serde::Serialize;

use super::events::{ItemCreated, ItemDeleted, ItemUpdated};
use crate::domain::foundation::{
    DomainError, DomainEvent, EventEnvelope, EventId, EventSource, ItemId, TenantId, Timestamp,
    ValidationError,
};

/// Maximum length of an item title.
pub const MAX_TITLE_LEN: usize = 200;

/// A catalog item.
///
/// Mutations record domain events on the aggregate; they leave only when the
/// event dispatcher takes them after the repository write.
#[derive(Debug, Clone)]
pub struct Item {
    id: ItemId,
    tenant_id: TenantId,
    title: String,
    sku: String,
    description: Option<String>,
    price_cents: i64,
    created_at: Timestamp,
    updated_at: Timestamp,
    domain_events: Vec<EventEnvelope>,
}

impl Item {
    /// Creates a new item and records `ItemCreated`.
    ///
    /// # Errors
    ///
    /// Returns a validation error for a blank or oversized title, a blank SKU
    /// or a negative price.
    pub fn create(
        tenant_id: TenantId,
        title: impl Into<String>,
        sku: impl Into<String>,
        description: Option<String>,
        price_cents: i64,
    ) -> Result<Self, DomainError> {
        let title = validate_title(title.into())?;
        let sku = sku.into().trim().to_uppercase();
        if sku.is_empty() {
            return Err(ValidationError::empty_field("sku").into());
        }
        validate_price(price_cents)?;

        let now = Timestamp::now();
        let mut item = Self {
            id: ItemId::new(),
            tenant_id,
            title,
            sku,
            description,
            price_cents,
            created_at: now,
            updated_at: now,
            domain_events: Vec::new(),
        };

        let event = ItemCreated {
            event_id: EventId::new(),
            item_id: item.id,
            tenant_id,
            title: item.title.clone(),
            sku: item.sku.clone(),
            price_cents,
            created_at: now,
        };
        item.record_event(&event)?;

        Ok(item)
    }

    /// Rebuilds an item from storage. Records no events.
    #[allow(clippy::too_many_arguments)]
    pub fn reconstitute(
        id: ItemId,
        tenant_id: TenantId,
        title: String,
        sku: String,
        description: Option<String>,
        price_cents: i64,
        created_at: Timestamp,
        updated_at: Timestamp,
    ) -> Self {
        Self {
            id,
            tenant_id,
            title,
            sku,
            description,
            price_cents,
            created_at,
            updated_at,
            domain_events: Vec::new(),
        }
    }

    /// Changes title, description and price, recording `ItemUpdated`.
    ///
    /// # Errors
    ///
    /// Same validation as [`Item::create`].
    pub fn update(
        &mut self,
        title: impl Into<String>,
        description: Option<String>,
        price_cents: i64,
    ) -> Result<(), DomainError> {
        let title = validate_title(title.into())?;
        validate_price(price_cents)?;

        self.title = title;
        self.description = description;
        self.price_cents = price_cents;
        self.updated_at = Timestamp::now();

        let event = ItemUpdated {
            event_id: EventId::new(),
            item_id: self.id,
            tenant_id: self.tenant_id,
            title: self.title.clone(),
            description: self.description.clone(),
            price_cents,
            updated_at: self.updated_at,
        };
        self.record_event(&event)
    }

    /// Records `ItemDeleted`. Removing the row is the repository's job.
    pub fn mark_deleted(&mut self) -> Result<(), DomainError> {
        let event = ItemDeleted {
            event_id: EventId::new(),
            item_id: self.id,
            tenant_id: self.tenant_id,
            deleted_at: Timestamp::now(),
        };
        self.record_event(&event)
    }

    pub fn id(&self) -> &ItemId {
        &self.id
    }

    pub fn tenant_id(&self) -> &TenantId {
        &self.tenant_id
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn sku(&self) -> &str {
        &self.sku
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    pub fn price_cents(&self) -> i64 {
        self.price_cents
    }

    pub fn created_at(&self) -> &Timestamp {
        &self.created_at
    }

    pub fn updated_at(&self) -> &Timestamp {
        &self.updated_at
    }

    fn record_event<E>(&mut self, event: &E) -> Result<(), DomainError>
    where
        E: DomainEvent + Serialize,
    {
        let envelope = EventEnvelope::from_event(event)?.with_tenant_id(self.tenant_id.to_string());
        self.domain_events.push(envelope);
        Ok(())
    }
}

impl EventSource for Item {
    fn pending_events(&self) -> &[EventEnvelope] {
        &self.domain_events
    }

    fn take_events(&mut self) -> Vec<EventEnvelope> {
        std::mem::take(&mut self.domain_events)
    }

    fn restore_events(&mut self, mut events: Vec<EventEnvelope>) {
        events.append(&mut self.domain_events);
        self.domain_events = events;
    }
}

fn validate_title(title: String) -> Result<String, ValidationError> {
    let title = title.trim().to_string();
    if title.is_empty() {
        return Err(ValidationError::empty_field("title"));
    }
    let len = title.chars().count();
    if len > MAX_TITLE_LEN {
        return Err(ValidationError::too_long("title", MAX_TITLE_LEN, len));
    }
    Ok(title)
}

fn validate_price(price_cents: i64) -> Result<(), ValidationError> {
    if price_cents < 0 {
        return Err(ValidationError::invalid_format(
            "price_cents",
            "price cannot be negative",
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::foundation::ErrorCode;
    use crate::domain::item::{ITEM_CREATED, ITEM_DELETED, ITEM_UPDATED};

    fn widget() -> Item {
        Item::create(TenantId::new(), "Widget", "wid-1", None, 1999).unwrap()
    }

    #[test]
    fn create_records_item_created() {
        let item = widget();

        assert_eq!(item.sku(), "WID-1");
        assert_eq!(item.pending_events().len(), 1);
        let event = &item.pending_events()[0];
        assert_eq!(event.event_type, ITEM_CREATED);
        assert_eq!(event.aggregate_id, item.id().to_string());
        assert_eq!(
            event.metadata.tenant_id,
            Some(item.tenant_id().to_string())
        );
    }

    #[test]
    fn create_rejects_blank_title() {
        let err = Item::create(TenantId::new(), "  ", "SKU", None, 0).unwrap_err();

        assert_eq!(err.code, ErrorCode::ValidationFailed);
        assert_eq!(err.details.get("field"), Some(&"title".to_string()));
    }

    #[test]
    fn create_rejects_negative_price() {
        assert!(Item::create(TenantId::new(), "Widget", "SKU", None, -1).is_err());
    }

    #[test]
    fn update_and_delete_append_events_in_order() {
        let mut item = widget();

        item.update("Widget Pro", Some("shiny".to_string()), 2999).unwrap();
        item.mark_deleted().unwrap();

        let types: Vec<_> = item
            .pending_events()
            .iter()
            .map(|e| e.event_type.as_str())
            .collect();
        assert_eq!(types, vec![ITEM_CREATED, ITEM_UPDATED, ITEM_DELETED]);
        assert_eq!(item.title(), "Widget Pro");
    }

    #[test]
    fn take_events_clears_buffer() {
        let mut item = widget();

        let taken = item.take_events();

        assert_eq!(taken.len(), 1);
        assert!(item.pending_events().is_empty());
        assert!(item.take_events().is_empty());
    }

    #[test]
    fn reconstitute_records_nothing() {
        let now = Timestamp::now();
        let item = Item::reconstitute(
            ItemId::new(),
            TenantId::new(),
            "Stored".to_string(),
            "S-1".to_string(),
            None,
            100,
            now,
            now,
        );

        assert!(item.pending_events().is_empty());
    }

    #[test]
    fn restored_events_come_before_newer_ones() {
        let mut item = widget();
        let taken = item.take_events();
        item.mark_deleted().unwrap();

        item.restore_events(taken);

        let types: Vec<_> = item
            .pending_events()
            .iter()
            .map(|e| e.event_type.as_str())
            .collect();
        assert_eq!(types, vec![ITEM_CREATED, ITEM_DELETED]);
    }
}
