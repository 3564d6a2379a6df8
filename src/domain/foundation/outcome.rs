//! Outcome - the tagged result every dispatch stage returns.
//!
//! Expected failures (bad input, missing role, absent resource) travel as
//! values, never as panics or `Err`. Callers branch with [`is_success`] only,
//! so the success policy lives in one place.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

use super::{DomainError, ErrorCode};

/// Status code carried by every [`Outcome`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OutcomeCode {
    Success,
    Validation,
    Unauthorized,
    Forbidden,
    NotFound,
    ServerError,
}

impl fmt::Display for OutcomeCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            OutcomeCode::Success => "SUCCESS",
            OutcomeCode::Validation => "VALIDATION",
            OutcomeCode::Unauthorized => "UNAUTHORIZED",
            OutcomeCode::Forbidden => "FORBIDDEN",
            OutcomeCode::NotFound => "NOT_FOUND",
            OutcomeCode::ServerError => "SERVER_ERROR",
        };
        write!(f, "{}", s)
    }
}

/// The code treated as success by [`is_success`].
pub const SUCCESS_CODE: OutcomeCode = OutcomeCode::Success;

/// The single success predicate. Compare through this, never against a variant.
pub fn is_success(code: OutcomeCode) -> bool {
    code == SUCCESS_CODE
}

/// Field name -> every message reported for that field.
pub type FieldErrors = BTreeMap<String, Vec<String>>;

/// Optional human-readable message on a failed outcome.
///
/// Lets the failure factories take `"text"`, a `String`, or `None`.
pub trait OutcomeMessage {
    fn into_message(self) -> Option<String>;
}

impl OutcomeMessage for &str {
    fn into_message(self) -> Option<String> {
        Some(self.to_string())
    }
}

impl OutcomeMessage for String {
    fn into_message(self) -> Option<String> {
        Some(self)
    }
}

impl OutcomeMessage for Option<String> {
    fn into_message(self) -> Option<String> {
        self
    }
}

/// Result of a dispatched request or of one pipeline stage.
///
/// `data` is only ever populated when the code is a success code; the
/// constructors are the only way to build an outcome, which keeps that true.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Outcome<T> {
    code: OutcomeCode,
    #[serde(skip_serializing_if = "Option::is_none")]
    data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    message: Option<String>,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    details: FieldErrors,
}

impl<T> Outcome<T> {
    /// Successful outcome carrying `data`.
    pub fn success(data: T) -> Self {
        Self {
            code: SUCCESS_CODE,
            data: Some(data),
            message: None,
            details: FieldErrors::new(),
        }
    }

    /// Caller-correctable input error with per-field messages.
    pub fn validation(message: impl Into<String>, details: FieldErrors) -> Self {
        Self::failure(OutcomeCode::Validation, Some(message.into())).with_details(details)
    }

    /// No caller identity or role evidence.
    pub fn unauthorized(message: impl OutcomeMessage) -> Self {
        Self::failure(OutcomeCode::Unauthorized, message.into_message())
    }

    /// Caller identified but lacks a required role.
    pub fn forbidden(message: impl OutcomeMessage) -> Self {
        Self::failure(OutcomeCode::Forbidden, message.into_message())
    }

    /// Requested resource or handler is absent.
    pub fn not_found(message: impl OutcomeMessage) -> Self {
        Self::failure(OutcomeCode::NotFound, message.into_message())
    }

    /// Unexpected failure caught at a boundary.
    pub fn server_error(message: impl OutcomeMessage) -> Self {
        Self::failure(OutcomeCode::ServerError, message.into_message())
    }

    /// Failure with an optional message.
    ///
    /// A success code passed here is downgraded to `ServerError`: a success
    /// without data cannot exist.
    pub fn failure(code: OutcomeCode, message: Option<String>) -> Self {
        let code = if is_success(code) {
            OutcomeCode::ServerError
        } else {
            code
        };
        Self {
            code,
            data: None,
            message,
            details: FieldErrors::new(),
        }
    }

    fn with_details(mut self, details: FieldErrors) -> Self {
        self.details = details;
        self
    }

    pub fn code(&self) -> OutcomeCode {
        self.code
    }

    pub fn is_success(&self) -> bool {
        is_success(self.code)
    }

    pub fn data(&self) -> Option<&T> {
        self.data.as_ref()
    }

    pub fn into_data(self) -> Option<T> {
        self.data
    }

    pub fn message(&self) -> Option<&str> {
        self.message.as_deref()
    }

    pub fn details(&self) -> &FieldErrors {
        &self.details
    }

    /// Re-types a failed outcome so it can be returned from a dispatch of a
    /// different response type. Returns `None` for a success.
    pub fn propagate<U>(self) -> Option<Outcome<U>> {
        if self.is_success() {
            return None;
        }
        Some(Outcome {
            code: self.code,
            data: None,
            message: self.message,
            details: self.details,
        })
    }

    /// Maps the success payload.
    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Outcome<U> {
        Outcome {
            code: self.code,
            data: self.data.map(f),
            message: self.message,
            details: self.details,
        }
    }

    /// Converts into a `Result` for callers that prefer `?`.
    ///
    /// # Errors
    ///
    /// Every non-success code becomes a `DomainError` with the matching
    /// `ErrorCode`; validation details are flattened into the error details.
    pub fn into_result(self) -> Result<T, DomainError> {
        let message = self
            .message
            .clone()
            .unwrap_or_else(|| self.code.to_string());
        let error_code = match self.code {
            OutcomeCode::Validation => ErrorCode::ValidationFailed,
            OutcomeCode::Unauthorized => ErrorCode::Unauthorized,
            OutcomeCode::Forbidden => ErrorCode::Forbidden,
            OutcomeCode::NotFound => ErrorCode::HandlerNotFound,
            OutcomeCode::Success | OutcomeCode::ServerError => ErrorCode::InternalError,
        };
        match self.data {
            Some(data) if is_success(self.code) => Ok(data),
            _ => {
                let mut err = DomainError::new(error_code, message);
                for (field, messages) in self.details {
                    err = err.with_detail(field, messages.join("; "));
                }
                Err(err)
            }
        }
    }
}

impl<T> From<DomainError> for Outcome<T> {
    fn from(err: DomainError) -> Self {
        let code = if err.code.is_validation() {
            OutcomeCode::Validation
        } else if err.code.is_not_found() {
            OutcomeCode::NotFound
        } else {
            match err.code {
                ErrorCode::Unauthorized => OutcomeCode::Unauthorized,
                ErrorCode::Forbidden => OutcomeCode::Forbidden,
                _ => OutcomeCode::ServerError,
            }
        };

        let mut details = FieldErrors::new();
        if code == OutcomeCode::Validation {
            if let Some(field) = err.details.get("field") {
                details
                    .entry(field.to_lowercase())
                    .or_default()
                    .push(err.message.clone());
            }
        }

        Self::failure(code, Some(err.message)).with_details(details)
    }
}
