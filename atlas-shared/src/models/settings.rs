//! Assistant settings as stored by the external settings backend, and the
//! client-side validation that gates every save.

use serde::{Deserialize, Serialize};
use std::ops::RangeInclusive;
use thiserror::Error;
use url::Url;

/// Accepted range for [`Settings::max_tokens`].
pub const MAX_TOKENS_RANGE: RangeInclusive<u32> = 100..=4000;
/// Accepted range for [`Settings::model_temperature`].
pub const TEMPERATURE_RANGE: RangeInclusive<f32> = 0.0..=1.0;
/// Accepted range for [`Settings::memory_retention`], in days.
pub const MEMORY_RETENTION_RANGE: RangeInclusive<u32> = 1..=90;

/// Reasons a settings object is rejected before it is sent anywhere.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum SettingsError {
    /// `max_tokens` is outside [`MAX_TOKENS_RANGE`].
    #[error("Max tokens must be between 100 and 4000")]
    MaxTokensOutOfRange {
        /// The rejected value.
        value: u32,
    },

    /// `model_temperature` is outside [`TEMPERATURE_RANGE`].
    #[error("Temperature must be between 0 and 1")]
    TemperatureOutOfRange {
        /// The rejected value.
        value: f32,
    },

    /// `api_endpoint` is not an absolute URL.
    #[error("API endpoint must be a valid URL")]
    InvalidEndpoint {
        /// The rejected value.
        value: String,
    },

    /// `memory_retention` is outside [`MEMORY_RETENTION_RANGE`].
    #[error("Memory retention must be between 1 and 90 days")]
    MemoryRetentionOutOfRange {
        /// The rejected value.
        value: u32,
    },
}

/// Model and memory configuration for the assistant.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Settings {
    /// Sampling temperature, within [`TEMPERATURE_RANGE`].
    pub model_temperature: f32,
    /// Reply length cap, within [`MAX_TOKENS_RANGE`].
    pub max_tokens: u32,
    /// Whether the assistant remembers past conversations.
    pub enable_memory: bool,
    /// Absolute URL the assistant sends model calls to.
    pub api_endpoint: String,
    /// Days of memory kept, within [`MEMORY_RETENTION_RANGE`].
    pub memory_retention: u32,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            model_temperature: 0.7,
            max_tokens: 2000,
            enable_memory: true,
            api_endpoint: "http://localhost:8000".to_string(),
            memory_retention: 30,
        }
    }
}

impl Settings {
    /// Checks every field, reporting the first violation in form order.
    ///
    /// # Errors
    /// Returns the first [`SettingsError`] encountered.
    pub fn validate(&self) -> Result<(), SettingsError> {
        validate_max_tokens(self.max_tokens)?;
        validate_temperature(self.model_temperature)?;
        validate_endpoint(&self.api_endpoint)?;
        validate_memory_retention(self.memory_retention)
    }
}

/// A partial update, as collected from command-line flags. `None` leaves the
/// matching [`Settings`] field alone.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SettingsPatch {
    /// New [`Settings::model_temperature`].
    pub model_temperature: Option<f32>,
    /// New [`Settings::max_tokens`].
    pub max_tokens: Option<u32>,
    /// New [`Settings::enable_memory`].
    pub enable_memory: Option<bool>,
    /// New [`Settings::api_endpoint`].
    pub api_endpoint: Option<String>,
    /// New [`Settings::memory_retention`].
    pub memory_retention: Option<u32>,
}

impl SettingsPatch {
    /// True when no field is set.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    /// Validates only the fields present in the patch, so an obviously bad
    /// value is rejected before the current settings are even fetched.
    ///
    /// # Errors
    /// Returns the first [`SettingsError`] among the supplied fields.
    pub fn validate(&self) -> Result<(), SettingsError> {
        if let Some(value) = self.max_tokens {
            validate_max_tokens(value)?;
        }
        if let Some(value) = self.model_temperature {
            validate_temperature(value)?;
        }
        if let Some(value) = &self.api_endpoint {
            validate_endpoint(value)?;
        }
        if let Some(value) = self.memory_retention {
            validate_memory_retention(value)?;
        }
        Ok(())
    }

    /// Overwrites the fields of `settings` that the patch sets.
    #[must_use]
    pub fn apply(self, mut settings: Settings) -> Settings {
        if let Some(value) = self.model_temperature {
            settings.model_temperature = value;
        }
        if let Some(value) = self.max_tokens {
            settings.max_tokens = value;
        }
        if let Some(value) = self.enable_memory {
            settings.enable_memory = value;
        }
        if let Some(value) = self.api_endpoint {
            settings.api_endpoint = value;
        }
        if let Some(value) = self.memory_retention {
            settings.memory_retention = value;
        }
        settings
    }
}

fn validate_max_tokens(value: u32) -> Result<(), SettingsError> {
    if MAX_TOKENS_RANGE.contains(&value) {
        Ok(())
    } else {
        Err(SettingsError::MaxTokensOutOfRange { value })
    }
}

fn validate_temperature(value: f32) -> Result<(), SettingsError> {
    // NaN fails `contains`, which is what we want.
    if TEMPERATURE_RANGE.contains(&value) {
        Ok(())
    } else {
        Err(SettingsError::TemperatureOutOfRange { value })
    }
}

fn validate_endpoint(value: &str) -> Result<(), SettingsError> {
    let invalid = || SettingsError::InvalidEndpoint {
        value: value.to_string(),
    };
    let parsed = Url::parse(value.trim()).map_err(|_| invalid())?;
    if matches!(parsed.scheme(), "http" | "https") && parsed.has_host() {
        Ok(())
    } else {
        Err(invalid())
    }
}

fn validate_memory_retention(value: u32) -> Result<(), SettingsError> {
    if MEMORY_RETENTION_RANGE.contains(&value) {
        Ok(())
    } else {
        Err(SettingsError::MemoryRetentionOutOfRange { value })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test]
    fn defaults_are_valid() {
        assert_eq!(Settings::default().validate(), Ok(()));
    }

    #[test]
    fn wire_format_is_camel_case() {
        let json = serde_json::to_value(Settings::default()).unwrap();
        assert_eq!(json["maxTokens"], 2000);
        assert_eq!(json["enableMemory"], true);
        assert_eq!(json["apiEndpoint"], "http://localhost:8000");
        assert_eq!(json["memoryRetention"], 30);
        assert!(json.get("max_tokens").is_none());
    }

    #[test_case(50 => matches Err(SettingsError::MaxTokensOutOfRange { value: 50 }) ; "below minimum")]
    #[test_case(99 => matches Err(SettingsError::MaxTokensOutOfRange { .. }) ; "just below minimum")]
    #[test_case(100 => Ok(()) ; "minimum")]
    #[test_case(4000 => Ok(()) ; "maximum")]
    #[test_case(4001 => matches Err(SettingsError::MaxTokensOutOfRange { .. }) ; "above maximum")]
    fn max_tokens_bounds(max_tokens: u32) -> Result<(), SettingsError> {
        Settings {
            max_tokens,
            ..Settings::default()
        }
        .validate()
    }

    #[test_case(-0.1 ; "negative")]
    #[test_case(1.01 ; "above one")]
    #[test_case(f32::NAN ; "nan")]
    fn temperature_out_of_range(model_temperature: f32) {
        let result = Settings {
            model_temperature,
            ..Settings::default()
        }
        .validate();
        assert!(matches!(
            result,
            Err(SettingsError::TemperatureOutOfRange { .. })
        ));
    }

    #[test_case("localhost:8000" ; "missing scheme")]
    #[test_case("ftp://example.com" ; "wrong scheme")]
    #[test_case("http//broken" ; "malformed")]
    #[test_case("" ; "empty")]
    fn endpoint_must_be_http_url(api_endpoint: &str) {
        let result = Settings {
            api_endpoint: api_endpoint.to_string(),
            ..Settings::default()
        }
        .validate();
        assert!(matches!(result, Err(SettingsError::InvalidEndpoint { .. })));
    }

    #[test]
    fn first_violation_wins() {
        let settings = Settings {
            max_tokens: 10,
            model_temperature: 3.0,
            ..Settings::default()
        };
        assert_eq!(
            settings.validate().unwrap_err().to_string(),
            "Max tokens must be between 100 and 4000"
        );
    }

    #[test]
    fn retention_bounds() {
        let settings = Settings {
            memory_retention: 0,
            ..Settings::default()
        };
        assert!(matches!(
            settings.validate(),
            Err(SettingsError::MemoryRetentionOutOfRange { value: 0 })
        ));
    }

    #[test]
    fn patch_validates_only_present_fields() {
        let patch = SettingsPatch {
            max_tokens: Some(50),
            ..SettingsPatch::default()
        };
        assert!(matches!(
            patch.validate(),
            Err(SettingsError::MaxTokensOutOfRange { value: 50 })
        ));
        assert_eq!(SettingsPatch::default().validate(), Ok(()));
        assert!(SettingsPatch::default().is_empty());
    }

    #[test]
    fn patch_applies_over_current_settings() {
        let patch = SettingsPatch {
            model_temperature: Some(0.2),
            enable_memory: Some(false),
            ..SettingsPatch::default()
        };
        let merged = patch.apply(Settings::default());

        assert!((merged.model_temperature - 0.2).abs() < f32::EPSILON);
        assert!(!merged.enable_memory);
        assert_eq!(merged.max_tokens, 2000);
    }
}
