//! Role names and caller role sets.
//!
//! Role names are compared case-insensitively; a request's role requirement is
//! satisfied when the caller holds any one of the listed roles.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Platform-wide administrator.
pub const ROLE_ADMIN: &str = "admin";
/// Tenant manager.
pub const ROLE_MANAGER: &str = "manager";
/// Regular staff member of a tenant.
pub const ROLE_STAFF: &str = "staff";

/// The set of role names held by a caller.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RoleSet(BTreeSet<String>);

impl RoleSet {
    /// Builds a role set, normalizing names to lower case and dropping blanks.
    pub fn new<I, S>(roles: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self(
            roles
                .into_iter()
                .map(|r| r.as_ref().trim().to_lowercase())
                .filter(|r| !r.is_empty())
                .collect(),
        )
    }

    /// An empty role set (anonymous or role-less caller).
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns true if the caller holds `role`.
    pub fn contains(&self, role: &str) -> bool {
        self.0.contains(&role.trim().to_lowercase())
    }

    /// Returns true if the caller holds at least one of `required`.
    pub fn satisfies_any(&self, required: &[&str]) -> bool {
        required.iter().any(|role| self.contains(role))
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }
}

impl<S: AsRef<str>> FromIterator<S> for RoleSet {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self::new(iter)
    }
}
