//! DeleteItemHandler - removes an item and records `ItemDeleted`.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::info;
use validator::Validate;

use super::{tenant_of, WRITE_ROLES};
use crate::adapters::events::DomainEventDispatcher;
use crate::application::mediator::{DispatchContext, Request, RequestHandler};
use crate::domain::foundation::{DomainError, ItemId, Outcome};
use crate::ports::ItemRepository;

#[derive(Debug, Clone, Validate)]
pub struct DeleteItemCommand {
    pub item_id: ItemId,
}

impl Request for DeleteItemCommand {
    type Response = ();

    fn required_roles(&self) -> &'static [&'static str] {
        WRITE_ROLES
    }
}

pub struct DeleteItemHandler {
    repository: Arc<dyn ItemRepository>,
    dispatcher: DomainEventDispatcher,
}

impl DeleteItemHandler {
    pub fn new(repository: Arc<dyn ItemRepository>, dispatcher: DomainEventDispatcher) -> Self {
        Self {
            repository,
            dispatcher,
        }
    }
}

#[async_trait]
impl RequestHandler<DeleteItemCommand> for DeleteItemHandler {
    async fn handle(
        &self,
        cmd: DeleteItemCommand,
        ctx: &DispatchContext,
    ) -> Result<Outcome<()>, DomainError> {
        let tenant_id = match tenant_of(ctx) {
            Ok(tenant_id) => tenant_id,
            Err(outcome) => return Ok(outcome),
        };

        let Some(mut item) = self.repository.find_by_id(&tenant_id, &cmd.item_id).await? else {
            return Ok(Outcome::not_found(format!("Item not found: {}", cmd.item_id)));
        };

        item.mark_deleted()?;
        self.repository.delete(&tenant_id, &cmd.item_id).await?;
        self.dispatcher
            .dispatch_for(ctx.metadata(), &mut [&mut item])
            .await?;

        info!(item_id = %cmd.item_id, "Item deleted");
        Ok(Outcome::success(()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::handlers::item::test_support::Harness;
    use crate::domain::foundation::OutcomeCode;
    use crate::domain::item::{Item, ITEM_DELETED};

    #[tokio::test]
    async fn deletes_item_and_enqueues_event() {
        let mut harness = Harness::new();
        let item = Item::create(harness.tenant, "Widget", "wid-1", None, 1999).unwrap();
        harness.repository.save(&item).await.unwrap();
        let handler =
            DeleteItemHandler::new(harness.repository.clone(), harness.dispatcher.clone());

        let outcome = handler
            .handle(DeleteItemCommand { item_id: *item.id() }, &harness.ctx())
            .await
            .unwrap();

        assert!(outcome.is_success());
        assert!(harness.repository.is_empty().await);
        let events = harness.received();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].event_type, ITEM_DELETED);
    }

    #[tokio::test]
    async fn deleting_twice_is_not_found() {
        let harness = Harness::new();
        let item = Item::create(harness.tenant, "Widget", "wid-1", None, 1999).unwrap();
        harness.repository.save(&item).await.unwrap();
        let handler =
            DeleteItemHandler::new(harness.repository.clone(), harness.dispatcher.clone());
        let cmd = DeleteItemCommand { item_id: *item.id() };

        handler.handle(cmd.clone(), &harness.ctx()).await.unwrap();
        let outcome = handler.handle(cmd, &harness.ctx()).await.unwrap();

        assert_eq!(outcome.code(), OutcomeCode::NotFound);
        assert_eq!(harness.store.len().await, 1);
    }
}
