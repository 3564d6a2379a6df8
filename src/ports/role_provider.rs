//! RoleProvider port - the identity collaborator the authorization behavior asks.
//!
//! Sessions, tokens and role assignment live outside the core; the pipeline
//! only needs "which roles does this caller hold".

use async_trait::async_trait;

use crate::domain::foundation::{DomainError, RoleSet, UserId};

/// Port for resolving a caller's role names.
#[async_trait]
pub trait RoleProvider: Send + Sync {
    /// Roles held by `user_id`. Unknown users yield an empty set, not an error.
    async fn roles_for(&self, user_id: &UserId) -> Result<RoleSet, DomainError>;
}
