//! AuthorizationBehavior - role gate in front of every handler.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::{debug, error};

use crate::domain::foundation::Outcome;
use crate::ports::RoleProvider;

use super::{Behavior, DispatchContext, RequestDescriptor};

/// Admits a caller holding at least one of the request's required roles.
///
/// | Caller | Result |
/// |--------|--------|
/// | request requires no roles | pass |
/// | no user id, or user with no roles | `Unauthorized` |
/// | roles disjoint from the requirement | `Forbidden` |
/// | any overlap (case-insensitive) | pass |
/// | role lookup error | `ServerError` |
#[derive(Clone)]
pub struct AuthorizationBehavior {
    roles: Arc<dyn RoleProvider>,
}

impl AuthorizationBehavior {
    pub fn new(roles: Arc<dyn RoleProvider>) -> Self {
        Self { roles }
    }
}

#[async_trait]
impl Behavior for AuthorizationBehavior {
    fn name(&self) -> &'static str {
        "authorization"
    }

    async fn process(
        &self,
        request: &dyn RequestDescriptor,
        ctx: &DispatchContext,
    ) -> Outcome<()> {
        let required = request.required_roles();
        if required.is_empty() {
            return Outcome::success(());
        }

        let Some(user_id) = ctx.metadata().user_id.as_ref() else {
            debug!(request = ctx.request(), "Anonymous caller rejected");
            return Outcome::unauthorized("Authentication required");
        };

        let roles = match self.roles.roles_for(user_id).await {
            Ok(roles) => roles,
            Err(e) => {
                error!(
                    request = ctx.request(),
                    user_id = %user_id,
                    error = %e,
                    "Role lookup failed"
                );
                return Outcome::server_error(format!("Role lookup failed: {}", e.message));
            }
        };

        if roles.is_empty() {
            debug!(request = ctx.request(), user_id = %user_id, "Caller holds no roles");
            return Outcome::unauthorized("Caller holds no roles");
        }

        if roles.satisfies_any(required) {
            Outcome::success(())
        } else {
            debug!(
                request = ctx.request(),
                user_id = %user_id,
                required = ?required,
                "Caller lacks required role"
            );
            Outcome::forbidden(format!("Requires one of: {}", required.join(", ")))
        }
    }
}
