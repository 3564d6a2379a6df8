//! Mediator - runs every request through the fixed dispatch pipeline.
//!
//! Stage order, identical for every request:
//!
//! 1. Null check (`send_optional` with `None`)
//! 2. [`ValidationBehavior`]
//! 3. [`AuthorizationBehavior`]
//! 4. The registered [`RequestHandler`]
//!
//! The first non-success outcome is the dispatch result. Errors and panics
//! from any stage are caught and reported as `ServerError`; a dispatch never
//! panics and never returns `Err`.

use std::panic::AssertUnwindSafe;
use std::sync::Arc;

use futures::FutureExt;
use tracing::{debug, error};

use crate::domain::foundation::{CommandMetadata, DomainError, FieldErrors, Outcome};
use crate::ports::RoleProvider;

use super::request::short_type_name;
use super::{
    AuthorizationBehavior, Behavior, Cancellation, DispatchContext, HandlerRegistry, Request,
    ValidationBehavior,
};

/// Message of the outcome returned once cancellation is observed.
pub const CANCELLED_MESSAGE: &str = "request cancelled";

/// In-process request dispatcher.
pub struct Mediator {
    registry: HandlerRegistry,
    behaviors: Vec<Arc<dyn Behavior>>,
}

impl Mediator {
    /// Builds the pipeline around a filled handler registry.
    pub fn new(registry: HandlerRegistry, roles: Arc<dyn RoleProvider>) -> Self {
        Self {
            registry,
            behaviors: vec![
                Arc::new(ValidationBehavior),
                Arc::new(AuthorizationBehavior::new(roles)),
            ],
        }
    }

    /// Number of request types with a registered handler.
    pub fn handler_count(&self) -> usize {
        self.registry.len()
    }

    /// Dispatch `request` on behalf of the caller described by `metadata`.
    pub async fn send<R: Request>(
        &self,
        request: R,
        metadata: CommandMetadata,
    ) -> Outcome<R::Response> {
        self.dispatch(Some(request), metadata, Cancellation::new())
            .await
    }

    /// Dispatch a request that may be absent. `None` is a `Validation` failure.
    pub async fn send_optional<R: Request>(
        &self,
        request: Option<R>,
        metadata: CommandMetadata,
    ) -> Outcome<R::Response> {
        self.dispatch(request, metadata, Cancellation::new()).await
    }

    /// Dispatch with a caller-held cancellation flag, checked before each stage.
    pub async fn send_cancellable<R: Request>(
        &self,
        request: R,
        metadata: CommandMetadata,
        cancellation: Cancellation,
    ) -> Outcome<R::Response> {
        self.dispatch(Some(request), metadata, cancellation).await
    }

    async fn dispatch<R: Request>(
        &self,
        request: Option<R>,
        metadata: CommandMetadata,
        cancellation: Cancellation,
    ) -> Outcome<R::Response> {
        let ctx = DispatchContext::new(short_type_name::<R>(), metadata, cancellation);

        if ctx.is_cancelled() {
            return cancelled(&ctx);
        }
        let Some(request) = request else {
            debug!(request = ctx.request(), "Null request rejected");
            return Outcome::validation("Request must not be null", FieldErrors::new());
        };

        for behavior in &self.behaviors {
            if ctx.is_cancelled() {
                return cancelled(&ctx);
            }
            let outcome = AssertUnwindSafe(behavior.process(&request, &ctx))
                .catch_unwind()
                .await
                .unwrap_or_else(|panic| {
                    let err = DomainError::from_panic(behavior.name(), panic);
                    error!(request = ctx.request(), error = %err, "Behavior panicked");
                    Outcome::server_error(err.message)
                });
            if let Some(failure) = outcome.propagate() {
                debug!(
                    request = ctx.request(),
                    stage = behavior.name(),
                    code = %failure.code(),
                    "Dispatch short-circuited"
                );
                return failure;
            }
        }

        if ctx.is_cancelled() {
            return cancelled(&ctx);
        }
        let Some(handler) = self.registry.resolve::<R>() else {
            debug!(request = ctx.request(), "No handler registered");
            return Outcome::not_found(format!("No handler registered for {}", ctx.request()));
        };

        match AssertUnwindSafe(handler.handle(request, &ctx))
            .catch_unwind()
            .await
        {
            Ok(Ok(outcome)) => outcome,
            Ok(Err(err)) => {
                error!(request = ctx.request(), error = %err, "Handler failed");
                Outcome::server_error(err.message)
            }
            Err(panic) => {
                let err = DomainError::from_panic(ctx.request(), panic);
                error!(request = ctx.request(), error = %err, "Handler panicked");
                Outcome::server_error(err.message)
            }
        }
    }
}

fn cancelled<T>(ctx: &DispatchContext) -> Outcome<T> {
    debug!(request = ctx.request(), "Dispatch cancelled");
    Outcome::server_error(CANCELLED_MESSAGE)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::identity::InMemoryRoleProvider;
    use crate::application::mediator::RequestHandler;
    use crate::domain::foundation::{ErrorCode, OutcomeCode, UserId};
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use validator::Validate;

    #[derive(Debug, Validate)]
    struct Rename {
        #[validate(length(min = 1, max = 20))]
        name: String,
        mode: Mode,
    }

    #[derive(Debug, Clone, Copy)]
    enum Mode {
        Normal,
        Fail,
        Panic,
    }

    impl Request for Rename {
        type Response = String;

        fn required_roles(&self) -> &'static [&'static str] {
            &["editor"]
        }
    }

    struct RenameHandler {
        calls: Arc<AtomicUsize>,
    }

    #[async_trait]
    impl RequestHandler<Rename> for RenameHandler {
        async fn handle(
            &self,
            request: Rename,
            _ctx: &DispatchContext,
        ) -> Result<Outcome<String>, DomainError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            match request.mode {
                Mode::Normal => Ok(Outcome::success(request.name.to_uppercase())),
                Mode::Fail => Err(DomainError::new(ErrorCode::DatabaseError, "db down")),
                Mode::Panic => panic!("handler bug"),
            }
        }
    }

    fn mediator(calls: Arc<AtomicUsize>) -> Mediator {
        let mut registry = HandlerRegistry::new();
        registry
            .register::<Rename>(Arc::new(RenameHandler { calls }))
            .unwrap();
        Mediator::new(
            registry,
            Arc::new(InMemoryRoleProvider::new().with_roles("ed", ["editor"])),
        )
    }

    fn editor() -> CommandMetadata {
        CommandMetadata::new(UserId::new("ed").unwrap())
    }

    fn rename(name: &str, mode: Mode) -> Rename {
        Rename {
            name: name.to_string(),
            mode,
        }
    }

    #[tokio::test]
    async fn success_passes_handler_outcome_through() {
        let calls = Arc::new(AtomicUsize::new(0));
        let outcome = mediator(calls.clone())
            .send(rename("tom", Mode::Normal), editor())
            .await;

        assert!(outcome.is_success());
        assert_eq!(outcome.data().map(String::as_str), Some("TOM"));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn null_request_is_validation_failure() {
        let calls = Arc::new(AtomicUsize::new(0));
        let outcome = mediator(calls.clone())
            .send_optional::<Rename>(None, editor())
            .await;

        assert_eq!(outcome.code(), OutcomeCode::Validation);
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn validation_runs_before_authorization() {
        let calls = Arc::new(AtomicUsize::new(0));
        let outcome = mediator(calls.clone())
            .send(rename("", Mode::Normal), CommandMetadata::anonymous())
            .await;

        assert_eq!(outcome.code(), OutcomeCode::Validation);
        assert!(outcome.details().contains_key("name"));
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn handler_error_becomes_server_error() {
        let outcome = mediator(Arc::new(AtomicUsize::new(0)))
            .send(rename("tom", Mode::Fail), editor())
            .await;

        assert_eq!(outcome.code(), OutcomeCode::ServerError);
        assert_eq!(outcome.message(), Some("db down"));
    }

    #[tokio::test]
    async fn handler_panic_becomes_server_error() {
        let outcome = mediator(Arc::new(AtomicUsize::new(0)))
            .send(rename("tom", Mode::Panic), editor())
            .await;

        assert_eq!(outcome.code(), OutcomeCode::ServerError);
        assert!(outcome.message().unwrap().contains("handler bug"));
    }

    #[tokio::test]
    async fn missing_handler_is_not_found() {
        let mediator = Mediator::new(
            HandlerRegistry::new(),
            Arc::new(InMemoryRoleProvider::new().with_roles("ed", ["editor"])),
        );

        let outcome = mediator.send(rename("tom", Mode::Normal), editor()).await;

        assert_eq!(outcome.code(), OutcomeCode::NotFound);
    }

    #[tokio::test]
    async fn cancelled_dispatch_runs_nothing() {
        let calls = Arc::new(AtomicUsize::new(0));
        let token = Cancellation::new();
        token.cancel();

        let outcome = mediator(calls.clone())
            .send_cancellable(rename("tom", Mode::Normal), editor(), token)
            .await;

        assert_eq!(outcome.code(), OutcomeCode::ServerError);
        assert_eq!(outcome.message(), Some(CANCELLED_MESSAGE));
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }
}
