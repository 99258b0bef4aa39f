//! Frontend configuration module
//!
//! Values are baked in at build time from `ATLAS_*` environment variables.

use shared::api::DEFAULT_BASE_URL;
use shared::chat::{DEFAULT_SIMULATED_DELAY, DEFAULT_SIMULATED_REPLY};

const DEFAULT_GREETING: &str = "Hello! How can I assist you today?";

/// Frontend configuration for the backend connection and chat behavior
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrontendConfig {
    /// Base URL of the chat and settings backend
    pub api_base_url: String,
    /// Answer chat messages locally instead of calling the backend
    pub simulate: bool,
    pub simulated_delay_ms: u32,
    pub simulated_reply: String,
    /// First agent message of a new conversation
    pub greeting: String,
}

impl Default for FrontendConfig {
    fn default() -> Self {
        Self {
            api_base_url: option_env!("ATLAS_API_BASE_URL")
                .unwrap_or(DEFAULT_BASE_URL)
                .to_string(),
            simulate: option_env!("ATLAS_RESPONDER").is_none_or(|mode| mode != "backend"),
            simulated_delay_ms: option_env!("ATLAS_SIMULATED_DELAY_MS")
                .and_then(|value| value.parse().ok())
                .unwrap_or_else(|| {
                    u32::try_from(DEFAULT_SIMULATED_DELAY.as_millis()).unwrap_or(2000)
                }),
            simulated_reply: DEFAULT_SIMULATED_REPLY.to_string(),
            greeting: option_env!("ATLAS_GREETING")
                .unwrap_or(DEFAULT_GREETING)
                .to_string(),
        }
    }
}

impl FrontendConfig {
    /// Create a new frontend configuration instance
    pub fn new() -> Self {
        Self::default()
    }

    pub fn api_base_url(&self) -> &str {
        &self.api_base_url
    }
}

#[cfg(all(test, target_arch = "wasm32"))]
mod tests {
    use super::*;
    use wasm_bindgen_test::*;

    wasm_bindgen_test_configure!(run_in_browser);

    #[wasm_bindgen_test]
    fn test_frontend_config_default() {
        let config = FrontendConfig::default();
        assert!(config.api_base_url().starts_with("http"));
        assert!(!config.greeting.is_empty());
        assert_eq!(config.simulated_reply, DEFAULT_SIMULATED_REPLY);
    }

    #[wasm_bindgen_test]
    fn test_frontend_config_clone() {
        let config1 = FrontendConfig::new();
        let config2 = config1.clone();
        assert_eq!(config1, config2);
    }
}
