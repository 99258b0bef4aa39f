//! HTTP client for the external chat and settings backend.
//!
//! Built on `reqwest`, so the same client runs natively (CLI) and in the
//! browser (fetch backend).

mod error;

pub use error::{ApiError, ApiResult};

use once_cell::sync::Lazy;
use reqwest::{Client, Response};
use tracing::{debug, info, warn};
use url::Url;

use crate::models::{ChatRequest, ChatResponse, ErrorResponse, Settings};

/// Backend address used when nothing else is configured.
pub const DEFAULT_BASE_URL: &str = "http://localhost:8000/";

static DEFAULT_URL: Lazy<Url> =
    Lazy::new(|| Url::parse(DEFAULT_BASE_URL).expect("DEFAULT_BASE_URL is an absolute http URL"));

/// [`DEFAULT_BASE_URL`], parsed.
#[must_use]
pub fn default_base_url() -> Url {
    DEFAULT_URL.clone()
}

/// Path of the chat endpoint, relative to the base URL.
pub const CHAT_PATH: &str = "api/chat";
/// Path of the settings endpoint, relative to the base URL.
pub const SETTINGS_PATH: &str = "api/settings";

#[cfg(not(target_arch = "wasm32"))]
const USER_AGENT: &str = concat!("atlas/", env!("CARGO_PKG_VERSION"));

/// Lightweight API client for the Atlas backend.
#[derive(Clone, Debug)]
pub struct AtlasClient {
    base_url: Url,
    client: Client,
}

impl AtlasClient {
    /// Create a new API client with the provided base URL.
    #[must_use]
    pub fn new(base_url: Url) -> Self {
        Self::with_client(base_url, Client::new())
    }

    /// Wrap an existing `reqwest` client.
    #[must_use]
    pub fn with_client(mut base_url: Url, client: Client) -> Self {
        // `Url::join` replaces the last segment unless the base ends with '/'.
        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }
        Self { base_url, client }
    }

    /// Build a client whose requests give up after `timeout`.
    ///
    /// # Errors
    /// Returns an error if the underlying HTTP client cannot be constructed.
    #[cfg(not(target_arch = "wasm32"))]
    pub fn with_timeout(base_url: Url, timeout: std::time::Duration) -> ApiResult<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(USER_AGENT)
            .build()?;
        Ok(Self::with_client(base_url, client))
    }

    /// Base URL every endpoint path is joined onto. Always ends with `/`.
    #[must_use]
    pub const fn base_url(&self) -> &Url {
        &self.base_url
    }

    fn endpoint(&self, path: &str) -> ApiResult<Url> {
        Ok(self.base_url.join(path)?)
    }

    /// Send one chat message and return the backend's reply text.
    ///
    /// # Errors
    /// Returns an error on transport failure, non-2xx status, or a body that is
    /// not `{"response": string}`.
    pub async fn send_message(&self, message: &str) -> ApiResult<String> {
        let url = self.endpoint(CHAT_PATH)?;
        debug!(%url, chars = message.len(), "sending chat message");
        let response = self
            .client
            .post(url)
            .json(&ChatRequest::new(message))
            .send()
            .await?;
        let body: ChatResponse = ensure_success(response).await?.json().await?;
        Ok(body.response)
    }

    /// Retrieve the stored settings.
    ///
    /// # Errors
    /// Returns an error on transport failure, non-2xx status, or a malformed body.
    pub async fn fetch_settings(&self) -> ApiResult<Settings> {
        let url = self.endpoint(SETTINGS_PATH)?;
        let response = self.client.get(url).send().await?;
        Ok(ensure_success(response).await?.json().await?)
    }

    /// Validate and persist settings. Invalid settings never reach the network.
    ///
    /// # Errors
    /// Returns [`ApiError::Validation`] before any request when validation fails,
    /// otherwise transport or status errors.
    pub async fn save_settings(&self, settings: &Settings) -> ApiResult<()> {
        if let Err(err) = settings.validate() {
            warn!(error = %err, "refusing to save invalid settings");
            return Err(err.into());
        }
        let url = self.endpoint(SETTINGS_PATH)?;
        let response = self.client.post(url).json(settings).send().await?;
        ensure_success(response).await?;
        info!("settings saved");
        Ok(())
    }
}

async fn ensure_success(response: Response) -> ApiResult<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.text().await.unwrap_or_default();
    let message = ErrorResponse::from_body(&body)
        .describe_or(status.canonical_reason().unwrap_or("unexpected status"));
    warn!(status = status.as_u16(), %message, "backend rejected request");
    Err(ApiError::status(status.as_u16(), message))
}
