//! ValidationBehavior - shape checks declared with `validator` attributes.

use async_trait::async_trait;
use tracing::debug;
use validator::{ValidationError, ValidationErrors, ValidationErrorsKind};

use crate::domain::foundation::{FieldErrors, Outcome};

use super::{Behavior, DispatchContext, RequestDescriptor};

/// Rejects requests whose fields break their declared rules.
#[derive(Debug, Default, Clone, Copy)]
pub struct ValidationBehavior;

#[async_trait]
impl Behavior for ValidationBehavior {
    fn name(&self) -> &'static str {
        "validation"
    }

    async fn process(
        &self,
        request: &dyn RequestDescriptor,
        ctx: &DispatchContext,
    ) -> Outcome<()> {
        match request.validate_shape() {
            Ok(()) => Outcome::success(()),
            Err(errors) => {
                let details = field_errors(&errors);
                debug!(
                    request = ctx.request(),
                    fields = ?details.keys().collect::<Vec<_>>(),
                    "Request failed validation"
                );
                Outcome::validation("One or more validation errors occurred", details)
            }
        }
    }
}

/// Flattens `validator` errors into lower-cased field -> messages.
///
/// Nested structs become `parent.child`, list entries `items[0].child`.
/// Keys differing only in case are merged.
pub fn field_errors(errors: &ValidationErrors) -> FieldErrors {
    let mut details = FieldErrors::new();
    collect(None, errors, &mut details);
    details
}

fn collect(prefix: Option<&str>, errors: &ValidationErrors, details: &mut FieldErrors) {
    for (field, kind) in errors.errors() {
        let path = match prefix {
            Some(prefix) => format!("{}.{}", prefix, field),
            None => field.to_string(),
        };
        match kind {
            ValidationErrorsKind::Field(errors) => {
                let messages = details.entry(path.to_lowercase()).or_default();
                messages.extend(errors.iter().map(message_for));
            }
            ValidationErrorsKind::Struct(inner) => collect(Some(&path), inner, details),
            ValidationErrorsKind::List(items) => {
                for (index, inner) in items {
                    collect(Some(&format!("{}[{}]", path, index)), inner, details);
                }
            }
        }
    }
}

fn message_for(error: &ValidationError) -> String {
    if let Some(message) = &error.message {
        return message.to_string();
    }
    let param = |name: &str| error.params.get(name).map(|v| v.to_string());
    match error.code.as_ref() {
        "length" => match (param("min"), param("max")) {
            (Some(min), Some(max)) => format!("must be between {} and {} characters", min, max),
            (Some(min), None) => format!("must be at least {} characters", min),
            (None, Some(max)) => format!("must be at most {} characters", max),
            (None, None) => "has an invalid length".to_string(),
        },
        "range" => match (param("min"), param("max")) {
            (Some(min), Some(max)) => format!("must be between {} and {}", min, max),
            (Some(min), None) => format!("must be at least {}", min),
            (None, Some(max)) => format!("must be at most {}", max),
            (None, None) => "is out of range".to_string(),
        },
        "required" => "is required".to_string(),
        "regex" => "has an invalid format".to_string(),
        "email" => "must be a valid email address".to_string(),
        "url" => "must be a valid URL".to_string(),
        code => format!("failed the '{}' check", code),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::mediator::{Cancellation, Request};
    use crate::domain::foundation::{CommandMetadata, OutcomeCode};
    use validator::Validate;

    #[derive(Debug, Validate)]
    struct Address {
        #[validate(length(min = 2))]
        city: String,
    }

    #[derive(Debug, Validate)]
    struct Signup {
        #[validate(length(min = 1, max = 10))]
        #[validate(email(message = "must look like an email"))]
        #[allow(non_snake_case)]
        Email: String,
        #[validate(range(min = 18))]
        age: u32,
        #[validate(nested)]
        address: Address,
    }

    impl Request for Signup {
        type Response = ();
    }

    fn ctx() -> DispatchContext {
        DispatchContext::new("Signup", CommandMetadata::anonymous(), Cancellation::new())
    }

    fn valid() -> Signup {
        Signup {
            Email: "a@b.io".to_string(),
            age: 30,
            address: Address {
                city: "Oslo".to_string(),
            },
        }
    }

    #[tokio::test]
    async fn valid_request_passes() {
        let outcome = ValidationBehavior.process(&valid(), &ctx()).await;
        assert!(outcome.is_success());
    }

    #[tokio::test]
    async fn violations_are_keyed_lower_case_with_all_messages() {
        let request = Signup {
            Email: "not-an-email-at-all".to_string(),
            age: 12,
            ..valid()
        };

        let outcome = ValidationBehavior.process(&request, &ctx()).await;

        assert_eq!(outcome.code(), OutcomeCode::Validation);
        let details = outcome.details();
        assert_eq!(details["email"].len(), 2);
        assert!(details["email"].contains(&"must look like an email".to_string()));
        assert!(details["email"].contains(&"must be between 1 and 10 characters".to_string()));
        assert_eq!(details["age"].len(), 1);
        assert!(details["age"][0].starts_with("must be at least 18"));
        assert!(!details.contains_key("Email"));
    }

    #[tokio::test]
    async fn nested_fields_use_dotted_paths() {
        let request = Signup {
            address: Address {
                city: "X".to_string(),
            },
            ..valid()
        };

        let outcome = ValidationBehavior.process(&request, &ctx()).await;

        assert_eq!(
            outcome.details()["address.city"],
            vec!["must be at least 2 characters".to_string()]
        );
    }

    #[test]
    fn unknown_codes_fall_back_to_code_name() {
        let mut errors = ValidationErrors::new();
        errors.add("sku", ValidationError::new("unique_sku"));

        let details = field_errors(&errors);

        assert_eq!(details["sku"], vec!["failed the 'unique_sku' check".to_string()]);
    }
}
