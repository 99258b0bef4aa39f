//! Error bodies returned by the backend.

use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter, Result as FmtResult};

/// Error body the chat and settings backend sends with non-2xx responses.
///
/// Both `{"message": ..}` and `FastAPI`-style `{"detail": ..}` bodies decode.
#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq, Eq)]
pub struct ErrorResponse {
    /// Human-readable summary.
    #[serde(alias = "detail")]
    pub message: String,
    /// Optional longer explanation.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl ErrorResponse {
    /// Error body with only a message.
    #[must_use]
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            details: None,
        }
    }

    /// Decodes a response body. Anything that is not a JSON error object is
    /// kept verbatim (trimmed) as the message.
    #[must_use]
    pub fn from_body(body: &str) -> Self {
        serde_json::from_str(body).unwrap_or_else(|_| Self::new(body.trim()))
    }

    /// The message to surface, or `fallback` when the backend sent nothing useful.
    #[must_use]
    pub fn describe_or(&self, fallback: &str) -> String {
        if self.message.trim().is_empty() {
            fallback.to_string()
        } else {
            self.to_string()
        }
    }
}

impl Display for ErrorResponse {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match &self.details {
            Some(details) => write!(f, "{}: {details}", self.message),
            None => f.write_str(&self.message),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fastapi_detail_becomes_message() {
        let error = ErrorResponse::from_body(r#"{"detail":"Invalid API key"}"#);
        assert_eq!(error, ErrorResponse::new("Invalid API key"));
    }

    #[test]
    fn details_are_appended() {
        let error = ErrorResponse::from_body(r#"{"message":"quota","details":"resets at noon"}"#);
        assert_eq!(error.describe_or("Bad Request"), "quota: resets at noon");
    }

    #[test]
    fn plain_text_body_is_kept() {
        let error = ErrorResponse::from_body("  upstream exploded \n");
        assert_eq!(error.message, "upstream exploded");
    }

    #[test]
    fn empty_body_uses_fallback() {
        assert_eq!(ErrorResponse::from_body("").describe_or("Bad Gateway"), "Bad Gateway");
    }
}
