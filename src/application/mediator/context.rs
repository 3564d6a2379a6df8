//! Per-dispatch context handed to behaviors and handlers.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use crate::domain::foundation::CommandMetadata;

/// Cooperative cancellation flag shared between a caller and its dispatch.
///
/// The mediator checks it before every stage; a stage already running is
/// not interrupted.
#[derive(Debug, Clone, Default)]
pub struct Cancellation(Arc<AtomicBool>);

impl Cancellation {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

/// What a stage knows about the dispatch it is part of.
#[derive(Debug, Clone)]
pub struct DispatchContext {
    request: &'static str,
    metadata: CommandMetadata,
    cancellation: Cancellation,
}

impl DispatchContext {
    pub fn new(
        request: &'static str,
        metadata: CommandMetadata,
        cancellation: Cancellation,
    ) -> Self {
        Self {
            request,
            metadata,
            cancellation,
        }
    }

    /// Short type name of the request being dispatched.
    pub fn request(&self) -> &'static str {
        self.request
    }

    pub fn metadata(&self) -> &CommandMetadata {
        &self.metadata
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancellation.is_cancelled()
    }
}
