//! Domain layer containing business logic and domain types.
//!
//! # Module Organization
//!
//! - `foundation` - Shared primitives (ids, outcome, roles, events, errors)
//! - `item` - Catalog item aggregate and its events

pub mod foundation;
pub mod item;
