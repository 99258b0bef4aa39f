//! Runtime configuration for the `atlas` CLI.
//!
//! Resolution order: built-in defaults, then a YAML or JSON file, then
//! `ATLAS_*` environment variables for fields the file left at their default,
//! then command-line overrides.

use std::{
    env, fs,
    path::{Path, PathBuf},
    time::Duration,
};

use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumString};
use thiserror::Error;
use tracing::debug;
use url::Url;

use crate::api::default_base_url;
use crate::chat::{DEFAULT_SIMULATED_DELAY, DEFAULT_SIMULATED_REPLY};

/// Overrides [`AppConfig::api_base_url`].
pub const ENV_API_BASE_URL: &str = "ATLAS_API_BASE_URL";
/// Overrides [`AppConfig::log_level`].
pub const ENV_LOG_LEVEL: &str = "ATLAS_LOG_LEVEL";
/// Overrides [`AppConfig::request_timeout_secs`].
pub const ENV_REQUEST_TIMEOUT_SECS: &str = "ATLAS_REQUEST_TIMEOUT_SECS";
/// Overrides [`AppConfig::responder`].
pub const ENV_RESPONDER: &str = "ATLAS_RESPONDER";
/// Overrides [`AppConfig::simulated_delay_ms`].
pub const ENV_SIMULATED_DELAY_MS: &str = "ATLAS_SIMULATED_DELAY_MS";

/// First agent message of a new session.
pub const DEFAULT_GREETING: &str = "Hello! How can I assist you today?";

/// Errors raised while loading or writing configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The configuration file could not be read.
    #[error("failed to read {path}: {source}")]
    Io {
        /// File that was being read.
        path: PathBuf,
        /// Underlying I/O failure.
        #[source]
        source: std::io::Error,
    },

    /// A `.yaml`/`.yml` file did not parse.
    #[error("invalid YAML configuration: {0}")]
    Yaml(#[from] serde_yml::Error),

    /// A `.json` file did not parse.
    #[error("invalid JSON configuration: {0}")]
    Json(#[from] serde_json::Error),

    /// The file extension is neither YAML nor JSON.
    #[error("Unsupported configuration format. Use 'yaml' or 'json'.")]
    UnsupportedFormat,

    /// An `ATLAS_*` variable is set but does not parse.
    #[error("Invalid {var} value: {value}")]
    InvalidEnv {
        /// Variable name.
        var: &'static str,
        /// Raw value found in the environment.
        value: String,
    },

    /// A base URL did not parse.
    #[error("invalid API base URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// Parsed fine, but the value cannot be used.
    #[error("{0}")]
    Invalid(String),
}

/// Where agent replies come from.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, Display, EnumString, AsRefStr,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum ResponderMode {
    /// Canned reply after a fixed delay; no network.
    #[default]
    Simulated,
    /// The chat backend at `api_base_url`.
    Backend,
}

/// Output format for generated configuration files.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Display, EnumString)]
#[strum(serialize_all = "lowercase")]
pub enum ConfigFormat {
    /// YAML, the format of the default config file.
    #[default]
    Yaml,
    /// Pretty-printed JSON.
    Json,
}

/// Settings the CLI needs before it can talk to anything.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Base URL of the chat and settings backend.
    pub api_base_url: Url,
    /// Fallback tracing filter when `RUST_LOG` is unset.
    pub log_level: String,
    /// Per-request timeout for backend calls; must be positive.
    pub request_timeout_secs: u64,
    /// Where agent replies come from.
    pub responder: ResponderMode,
    /// Latency of the simulated responder.
    pub simulated_delay_ms: u64,
    /// Text the simulated responder answers with.
    pub simulated_reply: String,
    /// Agent message seeded into new sessions.
    pub greeting: Option<String>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self::with_defaults()
    }
}

impl AppConfig {
    /// Generates a default configuration.
    #[must_use]
    pub fn with_defaults() -> Self {
        Self {
            api_base_url: default_base_url(),
            log_level: "info".to_string(),
            request_timeout_secs: 30,
            responder: ResponderMode::Simulated,
            simulated_delay_ms: u64::try_from(DEFAULT_SIMULATED_DELAY.as_millis())
                .unwrap_or(2000),
            simulated_reply: DEFAULT_SIMULATED_REPLY.to_string(),
            greeting: Some(DEFAULT_GREETING.to_string()),
        }
    }

    /// Loads the configuration from a file, environment variables, or defaults.
    ///
    /// # Errors
    /// Returns an error when the file cannot be read or parsed, an environment
    /// variable does not parse, or the result fails validation.
    pub fn load_config(
        config_path: Option<&Path>,
        server_override: Option<Url>,
    ) -> Result<Self, ConfigError> {
        let mut config = match config_path {
            Some(path) => Self::from_file(path)?,
            None => Self::with_defaults(),
        };

        config.apply_env_overrides()?;

        if let Some(url) = server_override {
            config.api_base_url = url;
        }

        config.validate()?;
        debug!(
            base_url = %config.api_base_url,
            responder = %config.responder,
            "configuration loaded"
        );
        Ok(config)
    }

    /// Reads a YAML (`.yaml`/`.yml`) or JSON (`.json`) file. Missing fields
    /// take their defaults.
    ///
    /// # Errors
    /// Returns an error for unreadable files, unknown extensions, or malformed content.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        match path.extension().and_then(|ext| ext.to_str()) {
            Some("yaml" | "yml") => Ok(serde_yml::from_str(&content)?),
            Some("json") => Ok(serde_json::from_str(&content)?),
            _ => Err(ConfigError::UnsupportedFormat),
        }
    }

    fn apply_env_overrides(&mut self) -> Result<(), ConfigError> {
        let defaults = Self::with_defaults();

        if self.api_base_url == defaults.api_base_url
            && let Ok(value) = env::var(ENV_API_BASE_URL)
        {
            self.api_base_url = Url::parse(&value).map_err(|_| ConfigError::InvalidEnv {
                var: ENV_API_BASE_URL,
                value,
            })?;
        }
        if self.log_level == defaults.log_level
            && let Ok(value) = env::var(ENV_LOG_LEVEL)
        {
            self.log_level = value;
        }
        if self.request_timeout_secs == defaults.request_timeout_secs
            && let Some(value) = parse_env(ENV_REQUEST_TIMEOUT_SECS)?
        {
            self.request_timeout_secs = value;
        }
        if self.responder == defaults.responder
            && let Some(value) = parse_env(ENV_RESPONDER)?
        {
            self.responder = value;
        }
        if self.simulated_delay_ms == defaults.simulated_delay_ms
            && let Some(value) = parse_env(ENV_SIMULATED_DELAY_MS)?
        {
            self.simulated_delay_ms = value;
        }
        Ok(())
    }

    /// Rejects a zero timeout and base URLs that are not http(s).
    ///
    /// # Errors
    /// Returns [`ConfigError::Invalid`] when a value cannot be used.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.request_timeout_secs == 0 {
            return Err(ConfigError::Invalid(
                "Invalid request timeout. Must be greater than 0.".to_string(),
            ));
        }
        if !matches!(self.api_base_url.scheme(), "http" | "https") {
            return Err(ConfigError::Invalid(format!(
                "API base URL must use http or https: {}",
                self.api_base_url
            )));
        }
        Ok(())
    }

    /// [`Self::request_timeout_secs`] as a [`Duration`].
    #[must_use]
    pub const fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    /// [`Self::simulated_delay_ms`] as a [`Duration`].
    #[must_use]
    pub const fn simulated_delay(&self) -> Duration {
        Duration::from_millis(self.simulated_delay_ms)
    }

    /// Serializes the configuration for writing to disk.
    ///
    /// # Errors
    /// Returns an error if serialization fails.
    pub fn render(&self, format: ConfigFormat) -> Result<String, ConfigError> {
        Ok(match format {
            ConfigFormat::Yaml => serde_yml::to_string(self)?,
            ConfigFormat::Json => serde_json::to_string_pretty(self)?,
        })
    }

    /// `<config dir>/atlas/config.yaml`, when the platform has a config dir.
    #[must_use]
    pub fn default_path() -> Option<PathBuf> {
        ProjectDirs::from("", "", "atlas").map(|dirs| dirs.config_dir().join("config.yaml"))
    }
}

fn parse_env<T: std::str::FromStr>(var: &'static str) -> Result<Option<T>, ConfigError> {
    match env::var(var) {
        Ok(value) => value
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| ConfigError::InvalidEnv { var, value }),
        Err(_) => Ok(None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;
    use tempfile::TempDir;

    fn cleanup_env_vars() {
        unsafe {
            env::remove_var(ENV_API_BASE_URL);
            env::remove_var(ENV_LOG_LEVEL);
            env::remove_var(ENV_REQUEST_TIMEOUT_SECS);
            env::remove_var(ENV_RESPONDER);
            env::remove_var(ENV_SIMULATED_DELAY_MS);
        }
    }

    #[test]
    #[serial]
    fn test_load_config_with_defaults() {
        cleanup_env_vars();
        let config = AppConfig::load_config(None, None).unwrap();

        assert_eq!(config.api_base_url.as_str(), "http://localhost:8000/");
        assert_eq!(config.log_level, "info");
        assert_eq!(config.request_timeout(), Duration::from_secs(30));
        assert_eq!(config.responder, ResponderMode::Simulated);
        assert_eq!(config.simulated_delay(), Duration::from_millis(2000));
        assert_eq!(config.greeting.as_deref(), Some(DEFAULT_GREETING));
    }

    #[test]
    #[serial]
    fn test_load_config_with_environment_variables() {
        cleanup_env_vars();
        unsafe {
            env::set_var(ENV_API_BASE_URL, "http://chat.internal:9000/");
            env::set_var(ENV_LOG_LEVEL, "debug");
            env::set_var(ENV_RESPONDER, "Backend");
            env::set_var(ENV_SIMULATED_DELAY_MS, "10");
        }

        let config = AppConfig::load_config(None, None).unwrap();

        assert_eq!(config.api_base_url.as_str(), "http://chat.internal:9000/");
        assert_eq!(config.log_level, "debug");
        assert_eq!(config.responder, ResponderMode::Backend);
        assert_eq!(config.simulated_delay_ms, 10);
        cleanup_env_vars();
    }

    #[test]
    #[serial]
    fn test_invalid_environment_value() {
        cleanup_env_vars();
        unsafe {
            env::set_var(ENV_REQUEST_TIMEOUT_SECS, "soon");
        }

        let error = AppConfig::load_config(None, None).unwrap_err();
        assert!(
            error
                .to_string()
                .contains("Invalid ATLAS_REQUEST_TIMEOUT_SECS")
        );
        cleanup_env_vars();
    }

    #[test]
    #[serial]
    fn test_server_override_wins() {
        cleanup_env_vars();
        unsafe {
            env::set_var(ENV_API_BASE_URL, "http://env:1/");
        }
        let url = Url::parse("http://cli:2/").unwrap();

        let config = AppConfig::load_config(None, Some(url.clone())).unwrap();
        assert_eq!(config.api_base_url, url);
        cleanup_env_vars();
    }

    #[test]
    #[serial]
    fn test_file_values_beat_environment() {
        cleanup_env_vars();
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("atlas.yaml");
        fs::write(
            &path,
            "log_level: trace\nresponder: backend\ngreeting: null\n",
        )
        .unwrap();
        unsafe {
            env::set_var(ENV_LOG_LEVEL, "warn");
        }

        let config = AppConfig::load_config(Some(&path), None).unwrap();
        assert_eq!(config.log_level, "trace");
        assert_eq!(config.responder, ResponderMode::Backend);
        assert_eq!(config.greeting, None);
        assert_eq!(config.request_timeout_secs, 30);
        cleanup_env_vars();
    }

    #[test]
    #[serial]
    fn test_json_file_and_zero_timeout() {
        cleanup_env_vars();
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("atlas.json");
        fs::write(&path, r#"{"request_timeout_secs": 0}"#).unwrap();

        let error = AppConfig::load_config(Some(&path), None).unwrap_err();
        assert!(error.to_string().contains("Invalid request timeout"));
    }

    #[test]
    fn test_unsupported_extension() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("atlas.toml");
        fs::write(&path, "").unwrap();

        assert!(matches!(
            AppConfig::from_file(&path),
            Err(ConfigError::UnsupportedFormat)
        ));
    }

    #[test]
    fn test_render_round_trips() {
        let config = AppConfig::with_defaults();
        let yaml = config.render(ConfigFormat::Yaml).unwrap();
        let json = config.render(ConfigFormat::Json).unwrap();

        assert_eq!(serde_yml::from_str::<AppConfig>(&yaml).unwrap(), config);
        assert_eq!(serde_json::from_str::<AppConfig>(&json).unwrap(), config);
    }

    #[test]
    fn test_responder_mode_parsing() {
        assert_eq!("simulated".parse(), Ok(ResponderMode::Simulated));
        assert_eq!(ResponderMode::Backend.to_string(), "backend");
        assert!("psychic".parse::<ResponderMode>().is_err());
    }
}
