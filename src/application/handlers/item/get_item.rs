//! GetItemHandler - reads a single item.

use std::sync::Arc;

use async_trait::async_trait;
use validator::Validate;

use super::{tenant_of, ItemView, READ_ROLES};
use crate::application::mediator::{DispatchContext, Request, RequestHandler};
use crate::domain::foundation::{DomainError, ItemId, Outcome};
use crate::ports::ItemRepository;

#[derive(Debug, Clone, Validate)]
pub struct GetItemQuery {
    pub item_id: ItemId,
}

impl Request for GetItemQuery {
    type Response = ItemView;

    fn required_roles(&self) -> &'static [&'static str] {
        READ_ROLES
    }
}

pub struct GetItemHandler {
    repository: Arc<dyn ItemRepository>,
}

impl GetItemHandler {
    pub fn new(repository: Arc<dyn ItemRepository>) -> Self {
        Self { repository }
    }
}

#[async_trait]
impl RequestHandler<GetItemQuery> for GetItemHandler {
    async fn handle(
        &self,
        query: GetItemQuery,
        ctx: &DispatchContext,
    ) -> Result<Outcome<ItemView>, DomainError> {
        let tenant_id = match tenant_of(ctx) {
            Ok(tenant_id) => tenant_id,
            Err(outcome) => return Ok(outcome),
        };

        let outcome = match self.repository.find_by_id(&tenant_id, &query.item_id).await? {
            Some(item) => Outcome::success(ItemView::from(&item)),
            None => Outcome::not_found(format!("Item not found: {}", query.item_id)),
        };
        Ok(outcome)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::handlers::item::test_support::Harness;
    use crate::domain::foundation::OutcomeCode;
    use crate::domain::item::Item;

    #[tokio::test]
    async fn returns_view_without_raising_events() {
        let mut harness = Harness::new();
        let item = Item::create(harness.tenant, "Widget", "wid-1", None, 1999).unwrap();
        harness.repository.save(&item).await.unwrap();
        let handler = GetItemHandler::new(harness.repository.clone());

        let outcome = handler
            .handle(GetItemQuery { item_id: *item.id() }, &harness.ctx())
            .await
            .unwrap();

        assert_eq!(outcome.data().map(|v| v.title.as_str()), Some("Widget"));
        assert!(harness.received().is_empty());
    }

    #[tokio::test]
    async fn missing_item_is_not_found() {
        let harness = Harness::new();
        let handler = GetItemHandler::new(harness.repository.clone());

        let outcome = handler
            .handle(GetItemQuery { item_id: ItemId::new() }, &harness.ctx())
            .await
            .unwrap();

        assert_eq!(outcome.code(), OutcomeCode::NotFound);
    }
}
