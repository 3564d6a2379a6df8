//! Item module - catalog entries and their lifecycle events.

mod aggregate;
mod events;

pub use aggregate::{Item, MAX_TITLE_LEN};
pub use events::{ItemCreated, ItemDeleted, ItemUpdated, ITEM_CREATED, ITEM_DELETED, ITEM_UPDATED};
