//! In-memory role provider for testing and local runs.
//!
//! # Example
//!
//! ```ignore
//! use admin_core::adapters::identity::InMemoryRoleProvider;
//!
//! let roles = InMemoryRoleProvider::new()
//!     .with_roles("alice", ["admin"])
//!     .with_roles("bob", ["staff"]);
//! ```

use std::collections::HashMap;

use async_trait::async_trait;

use crate::domain::foundation::{DomainError, ErrorCode, RoleSet, UserId};
use crate::ports::RoleProvider;

/// Role table built up front. Unknown users hold no roles.
#[derive(Debug, Clone, Default)]
pub struct InMemoryRoleProvider {
    roles: HashMap<String, RoleSet>,
    unavailable: bool,
}

impl InMemoryRoleProvider {
    pub fn new() -> Self {
        Self::default()
    }

    /// Grants `roles` to `user_id`, replacing any earlier grant.
    pub fn with_roles<I, S>(mut self, user_id: impl Into<String>, roles: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.roles.insert(user_id.into(), RoleSet::new(roles));
        self
    }

    /// A provider whose every lookup fails, for exercising error paths.
    pub fn unavailable() -> Self {
        Self {
            roles: HashMap::new(),
            unavailable: true,
        }
    }

    pub fn user_count(&self) -> usize {
        self.roles.len()
    }
}

#[async_trait]
impl RoleProvider for InMemoryRoleProvider {
    async fn roles_for(&self, user_id: &UserId) -> Result<RoleSet, DomainError> {
        if self.unavailable {
            return Err(DomainError::new(
                ErrorCode::InternalError,
                "Role directory unavailable",
            ));
        }
        Ok(self
            .roles
            .get(user_id.as_str())
            .cloned()
            .unwrap_or_else(RoleSet::empty))
    }
}
