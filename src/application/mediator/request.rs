//! Request contract - what the mediator needs to know about a command or query.

use std::any::type_name;

use validator::{Validate, ValidationErrors};

/// A command or query dispatched through the [`Mediator`](super::Mediator).
///
/// Shape rules come from `validator` derive attributes on the implementing
/// struct. Role requirements are declared by overriding `required_roles`;
/// the default requires nothing.
///
/// # Example
///
/// ```ignore
/// #[derive(Debug, Validate)]
/// pub struct ArchiveTenantCommand {
///     #[validate(length(min = 1))]
///     pub reason: String,
/// }
///
/// impl Request for ArchiveTenantCommand {
///     type Response = ();
///
///     fn required_roles(&self) -> &'static [&'static str] {
///         &[ROLE_ADMIN]
///     }
/// }
/// ```
pub trait Request: Validate + Send + Sync + 'static {
    /// Payload of a successful outcome.
    type Response: Send + 'static;

    /// Roles of which the caller must hold at least one. Empty means public.
    fn required_roles(&self) -> &'static [&'static str] {
        &[]
    }
}

/// Object-safe view of a request used by pipeline behaviors.
pub trait RequestDescriptor: Send + Sync {
    /// Short type name, for logs.
    fn request_name(&self) -> &'static str;

    fn validate_shape(&self) -> Result<(), ValidationErrors>;

    fn required_roles(&self) -> &'static [&'static str];
}

impl<R: Request> RequestDescriptor for R {
    fn request_name(&self) -> &'static str {
        short_type_name::<R>()
    }

    fn validate_shape(&self) -> Result<(), ValidationErrors> {
        self.validate()
    }

    fn required_roles(&self) -> &'static [&'static str] {
        Request::required_roles(self)
    }
}

/// `my_crate::module::Thing<..>` -> `Thing<..>`
pub(crate) fn short_type_name<T: ?Sized>() -> &'static str {
    let full = type_name::<T>();
    let base = full.split('<').next().unwrap_or(full);
    match base.rfind("::") {
        Some(idx) => &full[idx + 2..],
        None => full,
    }
}
