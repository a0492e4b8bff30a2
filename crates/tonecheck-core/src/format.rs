//! User-facing error messages.
//!
//! Maps a [`ClientError`] onto one of a fixed set of categories. The first
//! matching rule wins, in this order:
//!
//! 1. connectivity failure
//! 2. timeout
//! 3. service unavailable (HTTP 503)
//! 4. validation failure (HTTP 422, schema rejection, or local request check)
//! 5. generic server failure (any other HTTP 5xx)
//! 6. a message provided by the service
//! 7. fallback
//!
//! Categorization reads structured fields only. None of these functions
//! can fail or panic.

use std::error::Error as StdError;
use std::fmt;

use crate::error::{ApiFailure, ClientError, FailureKind, SchemaViolation};

pub const MSG_CONNECTIVITY: &str =
    "Cannot reach the analysis service. Check your connection and the configured API URL.";
pub const MSG_TIMEOUT: &str = "The request took too long. Please try again.";
pub const MSG_SERVICE_UNAVAILABLE: &str =
    "The AI service is temporarily unavailable. Please try again later.";
pub const MSG_VALIDATION: &str = "Invalid input. Check your text and try again.";
pub const MSG_SERVER_ERROR: &str =
    "A server error occurred. Contact support if the problem persists.";
pub const MSG_UNKNOWN: &str = "An unknown error occurred. Please try again.";

/// The category an error is displayed under.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ErrorCategory {
    Connectivity,
    Timeout,
    ServiceUnavailable,
    Validation,
    ServerError,
    /// Pass-through of a message the service sent back.
    ApiMessage(String),
    Unknown,
}

impl ErrorCategory {
    pub fn message(&self) -> &str {
        match self {
            ErrorCategory::Connectivity => MSG_CONNECTIVITY,
            ErrorCategory::Timeout => MSG_TIMEOUT,
            ErrorCategory::ServiceUnavailable => MSG_SERVICE_UNAVAILABLE,
            ErrorCategory::Validation => MSG_VALIDATION,
            ErrorCategory::ServerError => MSG_SERVER_ERROR,
            ErrorCategory::ApiMessage(msg) => msg,
            ErrorCategory::Unknown => MSG_UNKNOWN,
        }
    }
}

impl fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.message())
    }
}

/// Categorize a client error.
pub fn categorize(err: &ClientError) -> ErrorCategory {
    match err {
        ClientError::InvalidRequest(_) | ClientError::Schema(_) => ErrorCategory::Validation,
        ClientError::Api(failure) => categorize_failure(failure),
    }
}

fn categorize_failure(failure: &ApiFailure) -> ErrorCategory {
    match failure.kind {
        FailureKind::Network => ErrorCategory::Connectivity,
        FailureKind::Timeout => ErrorCategory::Timeout,
        FailureKind::ServiceUnavailable => ErrorCategory::ServiceUnavailable,
        FailureKind::ValidationRejected => ErrorCategory::Validation,
        FailureKind::HttpStatus(code) if (500..600).contains(&code) => ErrorCategory::ServerError,
        FailureKind::HttpStatus(_) => match failure.detail.as_deref().map(str::trim) {
            Some(detail) if !detail.is_empty() => ErrorCategory::ApiMessage(detail.to_string()),
            _ => ErrorCategory::Unknown,
        },
    }
}

/// Format a client error for display.
pub fn format_error(err: &ClientError) -> String {
    categorize(err).message().to_string()
}

/// Categorize any error by searching its source chain for one of this
/// crate's error types. `None` when the chain holds none of them.
pub fn categorize_chain(err: &(dyn StdError + 'static)) -> Option<ErrorCategory> {
    let mut current = Some(err);
    while let Some(e) = current {
        if let Some(client) = e.downcast_ref::<ClientError>() {
            return Some(categorize(client));
        }
        if let Some(failure) = e.downcast_ref::<ApiFailure>() {
            return Some(categorize_failure(failure));
        }
        if e.downcast_ref::<SchemaViolation>().is_some() {
            return Some(ErrorCategory::Validation);
        }
        current = e.source();
    }
    None
}

/// Format any error for display. Errors from elsewhere get the fallback
/// message.
pub fn format_error_chain(err: &(dyn StdError + 'static)) -> String {
    categorize_chain(err)
        .unwrap_or(ErrorCategory::Unknown)
        .message()
        .to_string()
}
