//! Item handlers - catalog CRUD through the mediator.
//!
//! Writes require `admin` or `manager`; reads also admit `staff`. Every
//! handler operates on the tenant carried in the caller's metadata.

mod create_item;
mod delete_item;
mod get_item;
mod update_item;
mod view;

use std::sync::Arc;

pub use create_item::{CreateItemCommand, CreateItemHandler};
pub use delete_item::{DeleteItemCommand, DeleteItemHandler};
pub use get_item::{GetItemHandler, GetItemQuery};
pub use update_item::{UpdateItemCommand, UpdateItemHandler};
pub use view::ItemView;

use once_cell::sync::Lazy;
use regex::Regex;

use crate::adapters::events::DomainEventDispatcher;
use crate::application::mediator::{DispatchContext, HandlerRegistry, RegistryError};
use crate::domain::foundation::{Outcome, TenantId, ROLE_ADMIN, ROLE_MANAGER, ROLE_STAFF};
use crate::ports::ItemRepository;

/// Roles allowed to change the catalog.
pub const WRITE_ROLES: &[&str] = &[ROLE_ADMIN, ROLE_MANAGER];

/// Roles allowed to read the catalog.
pub const READ_ROLES: &[&str] = &[ROLE_ADMIN, ROLE_MANAGER, ROLE_STAFF];

/// Letters, digits and dashes; 2 to 32 characters, not starting with a dash.
pub(crate) static SKU_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Za-z0-9][A-Za-z0-9-]{1,31}$").unwrap());

/// Registers all item handlers.
pub fn register(
    registry: &mut HandlerRegistry,
    repository: Arc<dyn ItemRepository>,
    dispatcher: DomainEventDispatcher,
) -> Result<(), RegistryError> {
    registry
        .register::<CreateItemCommand>(Arc::new(CreateItemHandler::new(
            repository.clone(),
            dispatcher.clone(),
        )))?
        .register::<UpdateItemCommand>(Arc::new(UpdateItemHandler::new(
            repository.clone(),
            dispatcher.clone(),
        )))?
        .register::<DeleteItemCommand>(Arc::new(DeleteItemHandler::new(
            repository.clone(),
            dispatcher,
        )))?
        .register::<GetItemQuery>(Arc::new(GetItemHandler::new(repository)))?;
    Ok(())
}

fn tenant_of<T>(ctx: &DispatchContext) -> Result<TenantId, Outcome<T>> {
    ctx.metadata()
        .tenant_id
        .ok_or_else(|| Outcome::forbidden("Tenant context required"))
}
