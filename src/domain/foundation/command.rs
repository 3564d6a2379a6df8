//! Command infrastructure for CQRS handlers.
//!
//! `CommandMetadata` is the caller context that flows through one dispatch:
//! who is calling, for which tenant, and the correlation id stamped onto every
//! event the command raises.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{EventEnvelope, TenantId, UserId};

/// Metadata context for a dispatched request.
///
/// `user_id` is `None` for anonymous callers; the authorization behavior then
/// treats the caller as holding no roles.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommandMetadata {
    /// The user executing this request, if authenticated.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_id: Option<UserId>,

    /// Tenant the request operates on.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tenant_id: Option<TenantId>,

    /// Links related operations across a single caller request.
    correlation_id: String,

    /// Source of this request (e.g., "api", "scheduler").
    #[serde(skip_serializing_if = "Option::is_none")]
    source: Option<String>,
}

impl CommandMetadata {
    /// Metadata for an authenticated user with a fresh correlation id.
    pub fn new(user_id: UserId) -> Self {
        Self {
            user_id: Some(user_id),
            ..Self::anonymous()
        }
    }

    /// Metadata for a caller without identity.
    pub fn anonymous() -> Self {
        Self {
            user_id: None,
            tenant_id: None,
            correlation_id: Uuid::new_v4().to_string(),
            source: None,
        }
    }

    /// Builder: Set the tenant.
    pub fn with_tenant(mut self, tenant_id: TenantId) -> Self {
        self.tenant_id = Some(tenant_id);
        self
    }

    /// Builder: Override the correlation id.
    pub fn with_correlation_id(mut self, id: impl Into<String>) -> Self {
        self.correlation_id = id.into();
        self
    }

    /// Builder: Add source identifier.
    pub fn with_source(mut self, source: impl Into<String>) -> Self {
        self.source = Some(source.into());
        self
    }

    pub fn correlation_id(&self) -> &str {
        &self.correlation_id
    }

    pub fn source(&self) -> Option<&str> {
        self.source.as_deref()
    }

    /// Stamps correlation, tenant and user onto an event envelope.
    ///
    /// A tenant already set by the emitting aggregate is kept.
    pub fn stamp(&self, envelope: EventEnvelope) -> EventEnvelope {
        let mut envelope = envelope.with_correlation_id(self.correlation_id.clone());
        let has_tenant = envelope.metadata.tenant_id.is_some();
        if let Some(tenant_id) = self.tenant_id.filter(|_| !has_tenant) {
            envelope = envelope.with_tenant_id(tenant_id.to_string());
        }
        if let Some(user_id) = &self.user_id {
            envelope = envelope.with_user_id(user_id.to_string());
        }
        envelope
    }
}

#[cfg(test)]
impl CommandMetadata {
    /// Creates a test fixture with a test user ID.
    pub fn test_fixture() -> Self {
        Self::new(UserId::new("test-user-123").unwrap())
            .with_correlation_id("test-correlation-id")
            .with_source("test")
    }
}
