//! Wire bodies of the chat endpoint.

use serde::{Deserialize, Serialize};

/// Body of `POST /api/chat`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ChatRequest {
    /// Text the user typed.
    pub message: String,
}

impl ChatRequest {
    /// Request carrying `message`.
    #[must_use]
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Successful reply from `POST /api/chat`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ChatResponse {
    /// The agent's reply text.
    pub response: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_wire_shape() {
        let json = serde_json::to_string(&ChatRequest::new("Hello")).unwrap();
        assert_eq!(json, r#"{"message":"Hello"}"#);
    }

    #[test]
    fn response_ignores_extra_fields() {
        let body = r#"{"response":"Hi there","status":"success","metadata":{}}"#;
        let parsed: ChatResponse = serde_json::from_str(body).unwrap();
        assert_eq!(parsed.response, "Hi there");
    }
}
