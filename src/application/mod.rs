//! Application layer - Commands, Queries, and Handlers.
//!
//! Requests travel through the [`mediator`]; feature handlers live in
//! [`handlers`]. Following CQRS, commands change state and raise domain
//! events while queries only read.

pub mod handlers;
pub mod mediator;

pub use handlers::{
    CreateItemCommand, DeleteItemCommand, GetItemQuery, ItemView, UpdateItemCommand,
};
pub use mediator::{Cancellation, HandlerRegistry, Mediator, Request, RequestHandler};
