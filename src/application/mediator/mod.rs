//! Mediator - in-process request dispatch.
//!
//! Commands and queries implement [`Request`]; each has exactly one
//! [`RequestHandler`] in the [`HandlerRegistry`]. The [`Mediator`] runs
//! validation and authorization before the handler and turns every failure
//! into an [`Outcome`](crate::domain::foundation::Outcome).

mod authorization;
mod behavior;
mod context;
mod pipeline;
mod registry;
mod request;
mod validation;

pub use authorization::AuthorizationBehavior;
pub use behavior::Behavior;
pub use context::{Cancellation, DispatchContext};
pub use pipeline::{Mediator, CANCELLED_MESSAGE};
pub use registry::{HandlerRegistry, RegistryError, RequestHandler};
pub use request::{Request, RequestDescriptor};
pub use validation::{field_errors, ValidationBehavior};
