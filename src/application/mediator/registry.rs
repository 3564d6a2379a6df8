//! HandlerRegistry - exactly one handler per request/response pair.

use std::any::{Any, TypeId};
use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::foundation::{DomainError, Outcome};

use super::request::short_type_name;
use super::{DispatchContext, Request};

/// Executes one request type.
///
/// Expected failures (missing resource, rule violation) are returned as
/// non-success outcomes. An `Err` is for the unexpected and is reported to
/// the caller as `ServerError`.
#[async_trait]
pub trait RequestHandler<R: Request>: Send + Sync {
    async fn handle(
        &self,
        request: R,
        ctx: &DispatchContext,
    ) -> Result<Outcome<R::Response>, DomainError>;
}

/// Registration errors.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum RegistryError {
    #[error("A handler for {request} is already registered")]
    DuplicateHandler { request: &'static str },
}

type HandlerKey = (TypeId, TypeId);

/// Handlers keyed by `(request type, response type)`.
///
/// Filled at startup by each feature module's `register` function, then
/// frozen inside the mediator.
#[derive(Default)]
pub struct HandlerRegistry {
    handlers: HashMap<HandlerKey, Arc<dyn Any + Send + Sync>>,
}

impl HandlerRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers the handler for `R`.
    ///
    /// # Errors
    ///
    /// `DuplicateHandler` if `R` already has one; the first stays in place.
    pub fn register<R: Request>(
        &mut self,
        handler: Arc<dyn RequestHandler<R>>,
    ) -> Result<&mut Self, RegistryError> {
        let key = key_of::<R>();
        if self.handlers.contains_key(&key) {
            return Err(RegistryError::DuplicateHandler {
                request: short_type_name::<R>(),
            });
        }
        self.handlers.insert(key, Arc::new(handler));
        Ok(self)
    }

    /// The handler registered for `R`, if any.
    pub fn resolve<R: Request>(&self) -> Option<Arc<dyn RequestHandler<R>>> {
        self.handlers
            .get(&key_of::<R>())
            .and_then(|entry| entry.downcast_ref::<Arc<dyn RequestHandler<R>>>())
            .cloned()
    }

    pub fn contains<R: Request>(&self) -> bool {
        self.handlers.contains_key(&key_of::<R>())
    }

    pub fn len(&self) -> usize {
        self.handlers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }
}

fn key_of<R: Request>() -> HandlerKey {
    (TypeId::of::<R>(), TypeId::of::<R::Response>())
}
