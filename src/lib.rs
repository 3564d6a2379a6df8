//! Admin Core - request dispatch and durable domain event delivery.
//!
//! Every command and query of the admin platform goes through the
//! [`application::mediator::Mediator`], which validates, authorizes and then
//! runs exactly one handler. Domain events raised by aggregates are persisted
//! as pending and delivered at least once by a background worker.

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;
pub mod telemetry;
