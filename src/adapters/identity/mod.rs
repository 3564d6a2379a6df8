//! Identity adapters - implementations of the `RoleProvider` port.
//!
//! - `InMemoryRoleProvider` - Fixed user -> roles table for tests and development

mod in_memory;

pub use in_memory::InMemoryRoleProvider;
