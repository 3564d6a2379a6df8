//! CreateItemHandler - adds an item to the caller's tenant catalog.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::info;
use validator::Validate;

use super::{tenant_of, ItemView, SKU_PATTERN, WRITE_ROLES};
use crate::adapters::events::DomainEventDispatcher;
use crate::application::mediator::{DispatchContext, Request, RequestHandler};
use crate::domain::foundation::{DomainError, Outcome};
use crate::domain::item::Item;
use crate::ports::ItemRepository;

/// Command to create a catalog item.
#[derive(Debug, Clone, Validate)]
pub struct CreateItemCommand {
    #[validate(length(min = 1, max = 200))]
    pub title: String,
    #[validate(regex(path = *SKU_PATTERN, message = "must be 2-32 letters, digits or dashes"))]
    pub sku: String,
    #[validate(length(max = 2000))]
    pub description: Option<String>,
    #[validate(range(min = 0))]
    pub price_cents: i64,
}

impl Request for CreateItemCommand {
    type Response = ItemView;

    fn required_roles(&self) -> &'static [&'static str] {
        WRITE_ROLES
    }
}

pub struct CreateItemHandler {
    repository: Arc<dyn ItemRepository>,
    dispatcher: DomainEventDispatcher,
}

impl CreateItemHandler {
    pub fn new(repository: Arc<dyn ItemRepository>, dispatcher: DomainEventDispatcher) -> Self {
        Self {
            repository,
            dispatcher,
        }
    }
}

#[async_trait]
impl RequestHandler<CreateItemCommand> for CreateItemHandler {
    async fn handle(
        &self,
        cmd: CreateItemCommand,
        ctx: &DispatchContext,
    ) -> Result<Outcome<ItemView>, DomainError> {
        let tenant_id = match tenant_of(ctx) {
            Ok(tenant_id) => tenant_id,
            Err(outcome) => return Ok(outcome),
        };

        let mut item =
            match Item::create(tenant_id, cmd.title, cmd.sku, cmd.description, cmd.price_cents) {
                Ok(item) => item,
                Err(err) => return Ok(err.into()),
            };

        self.repository.save(&item).await?;
        let view = ItemView::from(&item);
        self.dispatcher
            .dispatch_for(ctx.metadata(), &mut [&mut item])
            .await?;

        info!(item_id = %view.id, tenant_id = %view.tenant_id, "Item created");
        Ok(Outcome::success(view))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::handlers::item::test_support::{tenantless_ctx, Harness};
    use crate::domain::foundation::OutcomeCode;
    use crate::domain::item::ITEM_CREATED;
    use crate::ports::EventStatus;

    fn command() -> CreateItemCommand {
        CreateItemCommand {
            title: "Widget".to_string(),
            sku: "wid-1".to_string(),
            description: Some("Blue".to_string()),
            price_cents: 1999,
        }
    }

    #[test]
    fn validation_rules_cover_every_field() {
        let cmd = CreateItemCommand {
            title: String::new(),
            sku: "-".to_string(),
            description: Some("x".repeat(2001)),
            price_cents: -1,
        };

        let errors = cmd.validate().unwrap_err();
        let fields = errors.field_errors();

        assert!(fields.contains_key("title"));
        assert!(fields.contains_key("sku"));
        assert!(fields.contains_key("description"));
        assert!(fields.contains_key("price_cents"));
    }

    #[tokio::test]
    async fn creates_item_and_enqueues_stamped_event() {
        let mut harness = Harness::new();
        let handler =
            CreateItemHandler::new(harness.repository.clone(), harness.dispatcher.clone());

        let outcome = handler.handle(command(), &harness.ctx()).await.unwrap();

        let view = outcome.into_data().unwrap();
        assert_eq!(view.sku, "WID-1");
        assert_eq!(view.tenant_id, harness.tenant);
        assert_eq!(harness.repository.len().await, 1);

        let events = harness.received();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].event_type, ITEM_CREATED);
        assert_eq!(events[0].metadata.correlation_id.as_deref(), Some("corr-1"));
        assert_eq!(harness.store.count_by_status(EventStatus::Pending).await, 1);
    }

    #[tokio::test]
    async fn missing_tenant_is_forbidden_and_writes_nothing() {
        let harness = Harness::new();
        let handler =
            CreateItemHandler::new(harness.repository.clone(), harness.dispatcher.clone());

        let outcome = handler.handle(command(), &tenantless_ctx()).await.unwrap();

        assert_eq!(outcome.code(), OutcomeCode::Forbidden);
        assert!(harness.repository.is_empty().await);
        assert!(harness.store.is_empty().await);
    }

    #[tokio::test]
    async fn blank_title_after_trim_is_validation() {
        let harness = Harness::new();
        let handler =
            CreateItemHandler::new(harness.repository.clone(), harness.dispatcher.clone());
        let cmd = CreateItemCommand {
            title: "   ".to_string(),
            ..command()
        };

        let outcome = handler.handle(cmd, &harness.ctx()).await.unwrap();

        assert_eq!(outcome.code(), OutcomeCode::Validation);
        assert!(harness.repository.is_empty().await);
    }
}
