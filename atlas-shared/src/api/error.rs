//! # Backend Error Types

use thiserror::Error;

use crate::models::SettingsError;

/// Result type alias for backend calls
pub type ApiResult<T> = Result<T, ApiError>;

/// Everything that can go wrong talking to the chat or settings backend.
#[derive(Error, Debug)]
pub enum ApiError {
    /// Transport failure, timeout, or an undecodable body
    #[error("request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The backend answered with a non-2xx status
    #[error("backend returned {status}: {message}")]
    Status {
        /// HTTP status code.
        status: u16,
        /// Message decoded from the error body.
        message: String,
    },

    /// The configured base URL cannot address the endpoint
    #[error("invalid endpoint: {0}")]
    Url(#[from] url::ParseError),

    /// Settings were rejected locally; no request was sent
    #[error(transparent)]
    Validation(#[from] SettingsError),
}

impl ApiError {
    /// Create a new status error
    #[must_use]
    pub fn status<T: Into<String>>(status: u16, message: T) -> Self {
        Self::Status {
            status,
            message: message.into(),
        }
    }

    /// Whether the failure happened before any network call.
    #[must_use]
    pub const fn is_validation(&self) -> bool {
        matches!(self, Self::Validation(_))
    }

    /// Whether retrying could plausibly succeed. Nothing retries automatically;
    /// front ends use this to word their notifications.
    #[must_use]
    pub fn is_transient(&self) -> bool {
        match self {
            Self::Request(err) => !(err.is_decode() || err.is_builder()),
            Self::Status { status, .. } => *status >= 500,
            Self::Url(_) | Self::Validation(_) => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_error_display() {
        let error = ApiError::status(502, "bad gateway");
        assert_eq!(error.to_string(), "backend returned 502: bad gateway");
        assert!(error.is_transient());
        assert!(!error.is_validation());
    }

    #[test]
    fn validation_is_transparent() {
        let error = ApiError::from(SettingsError::MaxTokensOutOfRange { value: 50 });
        assert_eq!(error.to_string(), "Max tokens must be between 100 and 4000");
        assert!(error.is_validation());
        assert!(!error.is_transient());
    }

    #[test]
    fn client_errors_are_not_transient() {
        assert!(!ApiError::status(404, "missing").is_transient());
    }
}
