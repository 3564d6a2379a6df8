//! UpdateItemHandler - edits title, description and price.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::info;
use validator::Validate;

use super::{tenant_of, ItemView, WRITE_ROLES};
use crate::adapters::events::DomainEventDispatcher;
use crate::application::mediator::{DispatchContext, Request, RequestHandler};
use crate::domain::foundation::{DomainError, ItemId, Outcome};
use crate::ports::ItemRepository;

/// Command to update an existing item. The SKU is immutable.
#[derive(Debug, Clone, Validate)]
pub struct UpdateItemCommand {
    pub item_id: ItemId,
    #[validate(length(min = 1, max = 200))]
    pub title: String,
    #[validate(length(max = 2000))]
    pub description: Option<String>,
    #[validate(range(min = 0))]
    pub price_cents: i64,
}

impl Request for UpdateItemCommand {
    type Response = ItemView;

    fn required_roles(&self) -> &'static [&'static str] {
        WRITE_ROLES
    }
}

pub struct UpdateItemHandler {
    repository: Arc<dyn ItemRepository>,
    dispatcher: DomainEventDispatcher,
}

impl UpdateItemHandler {
    pub fn new(repository: Arc<dyn ItemRepository>, dispatcher: DomainEventDispatcher) -> Self {
        Self {
            repository,
            dispatcher,
        }
    }
}

#[async_trait]
impl RequestHandler<UpdateItemCommand> for UpdateItemHandler {
    async fn handle(
        &self,
        cmd: UpdateItemCommand,
        ctx: &DispatchContext,
    ) -> Result<Outcome<ItemView>, DomainError> {
        let tenant_id = match tenant_of(ctx) {
            Ok(tenant_id) => tenant_id,
            Err(outcome) => return Ok(outcome),
        };

        let Some(mut item) = self.repository.find_by_id(&tenant_id, &cmd.item_id).await? else {
            return Ok(Outcome::not_found(format!("Item not found: {}", cmd.item_id)));
        };

        if let Err(err) = item.update(cmd.title, cmd.description, cmd.price_cents) {
            return Ok(err.into());
        }

        self.repository.update(&item).await?;
        let view = ItemView::from(&item);
        self.dispatcher
            .dispatch_for(ctx.metadata(), &mut [&mut item])
            .await?;

        info!(item_id = %view.id, "Item updated");
        Ok(Outcome::success(view))
    }
}
