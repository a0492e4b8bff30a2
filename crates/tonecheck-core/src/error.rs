//! Error taxonomy for the analysis workflow.
//!
//! Every failure that reaches the user is one of these structured values.
//! The formatter in [`crate::format`] categorizes on the fields set here
//! (failure kind, status code), never on message text.
//!
//! Storage failures have no variant: the history store catches and logs
//! them at its boundary.

use std::fmt;

/// A decoded value did not match the expected shape.
///
/// `field` is a dotted path into the value (`suggestions`, `suggestions[1]`,
/// or `$` for the value as a whole).
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("schema violation at `{field}`: {reason}")]
pub struct SchemaViolation {
    pub field: String,
    pub reason: String,
}

impl SchemaViolation {
    pub fn new(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            reason: reason.into(),
        }
    }
}

/// What went wrong on the transport side of a remote call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    /// The service could not be reached (connection refused, DNS, reset).
    Network,
    /// The call exceeded the configured timeout.
    Timeout,
    /// Non-2xx status without a more specific category.
    HttpStatus(u16),
    /// HTTP 503.
    ServiceUnavailable,
    /// HTTP 422: the service rejected the request body.
    ValidationRejected,
}

impl FailureKind {
    /// Classify a non-2xx HTTP status.
    pub fn from_status(status: u16) -> Self {
        match status {
            503 => FailureKind::ServiceUnavailable,
            422 => FailureKind::ValidationRejected,
            other => FailureKind::HttpStatus(other),
        }
    }
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FailureKind::Network => f.write_str("network error"),
            FailureKind::Timeout => f.write_str("request timed out"),
            FailureKind::HttpStatus(code) => write!(f, "HTTP {}", code),
            FailureKind::ServiceUnavailable => f.write_str("service unavailable (HTTP 503)"),
            FailureKind::ValidationRejected => f.write_str("request rejected (HTTP 422)"),
        }
    }
}

/// A remote call failed before a usable response body was obtained.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiFailure {
    pub kind: FailureKind,
    /// HTTP status, when a response was received at all.
    pub status: Option<u16>,
    /// Message provided by the service, if any.
    pub detail: Option<String>,
}

impl ApiFailure {
    pub fn network(detail: impl Into<String>) -> Self {
        Self {
            kind: FailureKind::Network,
            status: None,
            detail: Some(detail.into()),
        }
    }

    pub fn timeout() -> Self {
        Self {
            kind: FailureKind::Timeout,
            status: None,
            detail: None,
        }
    }

    pub fn from_status(status: u16, detail: Option<String>) -> Self {
        Self {
            kind: FailureKind::from_status(status),
            status: Some(status),
            detail,
        }
    }
}

impl fmt::Display for ApiFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "API failure: {}", self.kind)?;
        if let Some(detail) = &self.detail {
            write!(f, ": {}", detail)?;
        }
        Ok(())
    }
}

impl std::error::Error for ApiFailure {}

/// Everything the API gateway client can return as an error.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ClientError {
    /// The caller's input broke the request contract; nothing was sent.
    #[error("invalid request: {0}")]
    InvalidRequest(SchemaViolation),
    /// The service answered with a body of the wrong shape.
    #[error("invalid response: {0}")]
    Schema(SchemaViolation),
    #[error(transparent)]
    Api(#[from] ApiFailure),
}
