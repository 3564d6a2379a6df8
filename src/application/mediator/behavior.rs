//! Behavior - one stage of the dispatch pipeline.

use async_trait::async_trait;

use crate::domain::foundation::Outcome;

use super::{DispatchContext, RequestDescriptor};

/// A pre-handler stage.
///
/// Returning a success lets the dispatch continue; any other outcome
/// short-circuits and becomes the dispatch result.
#[async_trait]
pub trait Behavior: Send + Sync {
    /// Stage name, for logs.
    fn name(&self) -> &'static str;

    async fn process(&self, request: &dyn RequestDescriptor, ctx: &DispatchContext)
        -> Outcome<()>;
}
