//! Foundation module - Shared domain primitives.
//!
//! Contains value objects, identifiers, the dispatch outcome type, event
//! envelopes and error types shared by every feature module.

mod command;
mod errors;
mod events;
mod ids;
mod outcome;
mod roles;
mod timestamp;

pub use command::CommandMetadata;
pub use errors::{DomainError, ErrorCode, ValidationError};
pub use events::{
    domain_event, DomainEvent, EventEnvelope, EventId, EventMetadata, EventSource,
};
pub use ids::{ItemId, TenantId, UserId};
pub use outcome::{is_success, FieldErrors, Outcome, OutcomeCode, OutcomeMessage, SUCCESS_CODE};
pub use roles::{RoleSet, ROLE_ADMIN, ROLE_MANAGER, ROLE_STAFF};
pub use timestamp::Timestamp;
