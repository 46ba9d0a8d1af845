//! Failures surfaced by the domain services.
//!
//! An [`Error`] carries a stable [`ErrorCode`], a message meant for the
//! caller, and optional structured details (for example the row numbers of
//! a rejected roster). Nothing here knows about HTTP; the inbound adapter
//! picks status codes. Per-recipient mail failures are data, not errors, and
//! ride inside [`crate::domain::dispatch::DispatchReport`].

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// Category of a domain failure, serialised in `snake_case`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[non_exhaustive]
#[serde(rename_all = "snake_case")]
pub enum ErrorCode {
    /// Malformed input or a failed validation rule.
    InvalidRequest,
    /// No event or participant with the given id.
    NotFound,
    /// A scanned token matches no participant.
    InvalidCode,
    /// The store or another dependency is unreachable right now.
    ServiceUnavailable,
    /// Anything else; the message is redacted at the edge.
    InternalError,
}

impl ErrorCode {
    /// Message used when an error is raised with a blank one.
    pub const fn fallback_message(self) -> &'static str {
        match self {
            Self::InvalidRequest => "invalid request",
            Self::NotFound => "resource not found",
            Self::InvalidCode => "unrecognised scan code",
            Self::ServiceUnavailable => "service temporarily unavailable",
            Self::InternalError => "internal error",
        }
    }
}

/// A domain failure.
///
/// The message is never blank: constructors substitute
/// [`ErrorCode::fallback_message`] and deserialisation refuses blank input.
///
/// ```
/// use backend::domain::{Error, ErrorCode};
///
/// let err = Error::not_found("event 42 does not exist");
/// assert_eq!(err.code(), ErrorCode::NotFound);
/// assert_eq!(Error::invalid_code("  ").message(), "unrecognised scan code");
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, thiserror::Error)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
#[error("{message}")]
pub struct Error {
    code: ErrorCode,
    #[serde(deserialize_with = "non_blank")]
    message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    details: Option<Value>,
}

fn non_blank<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let message = String::deserialize(deserializer)?;
    if message.trim().is_empty() {
        return Err(serde::de::Error::custom("error message must not be blank"));
    }
    Ok(message)
}

impl Error {
    /// Build an error with the given code.
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        let mut message = message.into();
        if message.trim().is_empty() {
            message = code.fallback_message().to_owned();
        }
        Self {
            code,
            message,
            details: None,
        }
    }

    pub fn invalid_request(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::InvalidRequest, message)
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::NotFound, message)
    }

    pub fn invalid_code(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::InvalidCode, message)
    }

    pub fn service_unavailable(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::ServiceUnavailable, message)
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::InternalError, message)
    }

    /// Attach structured details, replacing any already present.
    ///
    /// ```
    /// use backend::domain::Error;
    /// use serde_json::json;
    ///
    /// let err = Error::invalid_request("bad roster").with_details(json!({ "rows": [3, 7] }));
    /// assert_eq!(err.details(), Some(&json!({ "rows": [3, 7] })));
    /// ```
    #[must_use]
    pub fn with_details(self, details: Value) -> Self {
        Self {
            details: Some(details),
            ..self
        }
    }

    pub fn code(&self) -> ErrorCode {
        self.code
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn details(&self) -> Option<&Value> {
        self.details.as_ref()
    }
}
