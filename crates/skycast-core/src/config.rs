use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use url::Url;

use crate::error::ConfigError;

/// Environment variables checked (in order) for the provider API key.
pub const API_KEY_ENV_VARS: [&str; 2] = ["SKYCAST_API_KEY", "OPENWEATHER_API_KEY"];

const CONFIG_DIR_NAME: &str = "skycast";
const CONFIG_FILE_NAME: &str = "config.toml";

/// Configuration validation errors
#[derive(Debug, Clone)]
pub struct ConfigValidationError {
    pub field: String,
    pub message: String,
}

impl std::fmt::Display for ConfigValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// Result of config validation
#[derive(Debug, Clone, Default)]
pub struct ValidationResult {
    pub errors: Vec<ConfigValidationError>,
    pub warnings: Vec<ConfigValidationError>,
}

impl ValidationResult {
    /// Returns true if there are no errors (warnings are OK)
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn add_error(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.errors.push(ConfigValidationError {
            field: field.into(),
            message: message.into(),
        });
    }

    pub fn add_warning(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.warnings.push(ConfigValidationError {
            field: field.into(),
            message: message.into(),
        });
    }

    /// Get a user-friendly message summarizing all errors
    pub fn error_summary(&self) -> String {
        self.errors
            .iter()
            .map(|e| e.to_string())
            .collect::<Vec<_>>()
            .join("; ")
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Directory holding config.toml and the persisted key-value file
    pub config_dir: PathBuf,

    /// Weather provider settings
    #[serde(default)]
    pub provider: ProviderConfig,

    /// Query cache and retry settings
    #[serde(default)]
    pub query: QueryConfig,

    /// Fallback device location for `skycast locate`
    #[serde(default)]
    pub location: LocationConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderConfig {
    /// Base URL of the OpenWeatherMap-compatible REST API
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// API key sent as `appid`; usually supplied through the environment
    #[serde(default)]
    pub api_key: Option<String>,

    /// Provider unit system; conversions assume `metric`
    #[serde(default = "default_units")]
    pub units: String,

    /// Language code for localized descriptions
    #[serde(default = "default_language")]
    pub language: String,

    /// HTTP timeout in seconds (0 = transport default)
    #[serde(default)]
    pub timeout_secs: u64,
}

fn default_base_url() -> String {
    "https://api.openweathermap.org/data/2.5".to_string()
}

fn default_units() -> String {
    "metric".to_string()
}

fn default_language() -> String {
    "vi".to_string()
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            api_key: None,
            units: default_units(),
            language: default_language(),
            timeout_secs: 0,
        }
    }
}

impl ProviderConfig {
    /// Transport timeout, if one is configured.
    pub fn timeout(&self) -> Option<Duration> {
        (self.timeout_secs > 0).then(|| Duration::from_secs(self.timeout_secs))
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QueryConfig {
    /// Minutes a successful response is served without refetching
    #[serde(default = "default_stale_minutes")]
    pub stale_minutes: u32,

    /// First retry delay; doubles per attempt
    #[serde(default = "default_retry_base_delay_ms")]
    pub retry_base_delay_ms: u64,

    /// Upper bound on a single retry delay
    #[serde(default = "default_retry_max_delay_ms")]
    pub retry_max_delay_ms: u64,
}

fn default_stale_minutes() -> u32 {
    5
}

fn default_retry_base_delay_ms() -> u64 {
    1000
}

fn default_retry_max_delay_ms() -> u64 {
    30_000
}

impl Default for QueryConfig {
    fn default() -> Self {
        Self {
            stale_minutes: default_stale_minutes(),
            retry_base_delay_ms: default_retry_base_delay_ms(),
            retry_max_delay_ms: default_retry_max_delay_ms(),
        }
    }
}

impl QueryConfig {
    pub fn stale_after(&self) -> Duration {
        Duration::from_secs(u64::from(self.stale_minutes) * 60)
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LocationConfig {
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
}

impl Default for Config {
    fn default() -> Self {
        let config_dir = dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(CONFIG_DIR_NAME);

        Self {
            config_dir,
            provider: ProviderConfig::default(),
            query: QueryConfig::default(),
            location: LocationConfig::default(),
        }
    }
}

impl Config {
    /// Load configuration from the default path, creating it if missing
    pub fn load() -> Result<Self, ConfigError> {
        let path = Self::config_path()?;
        Self::load_from(&path)
    }

    /// Load configuration from `path`, writing defaults there if it doesn't exist
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let mut config = if path.exists() {
            let contents = std::fs::read_to_string(path)
                .map_err(|e| ConfigError::Io(format!("{}: {}", path.display(), e)))?;
            toml::from_str::<Config>(&contents)
                .map_err(|e| ConfigError::ParseError(e.to_string()))?
        } else {
            let mut config = Self::default();
            if let Some(parent) = path.parent() {
                config.config_dir = parent.to_path_buf();
            }
            config
                .save_to(path)
                .map_err(|e| ConfigError::Io(format!("{:#}", e)))?;
            config
        };

        config.apply_env_overrides();
        Ok(config)
    }

    /// Load configuration and validate it
    ///
    /// Returns an error if validation fails with critical errors; warnings are logged.
    pub fn load_validated() -> Result<(Self, ValidationResult), ConfigError> {
        let path = Self::config_path()?;
        Self::load_validated_from(&path)
    }

    /// Like `load_validated`, for an explicit path
    pub fn load_validated_from(path: &Path) -> Result<(Self, ValidationResult), ConfigError> {
        let config = Self::load_from(path)?;
        let validation = config.validate();

        if !validation.is_valid() {
            return Err(ConfigError::Invalid(validation.error_summary()));
        }

        for warning in &validation.warnings {
            tracing::warn!("Config warning: {}", warning);
        }

        Ok((config, validation))
    }

    /// Pull the API key from the environment when set.
    pub fn apply_env_overrides(&mut self) {
        let from_env = API_KEY_ENV_VARS
            .iter()
            .filter_map(|name| std::env::var(name).ok())
            .find(|value| !value.trim().is_empty());

        if let Some(key) = from_env {
            tracing::debug!("Using provider API key from environment");
            self.provider.api_key = Some(key.trim().to_string());
        }
    }

    /// Validate the configuration
    pub fn validate(&self) -> ValidationResult {
        let mut result = ValidationResult::default();

        Self::validate_url(&self.provider.base_url, "provider.base_url", &mut result);

        match self.provider.api_key.as_deref() {
            Some(key) if !key.trim().is_empty() => {}
            _ => result.add_warning(
                "provider.api_key",
                format!(
                    "No API key configured; set {} or provider.api_key",
                    API_KEY_ENV_VARS[0]
                ),
            ),
        }

        if self.provider.units != "metric" {
            result.add_warning(
                "provider.units",
                "Unit conversions assume metric provider values",
            );
        }

        if self.provider.language.trim().is_empty() {
            result.add_error("provider.language", "Language code must not be empty");
        }

        if self.query.stale_minutes == 0 {
            result.add_warning(
                "query.stale_minutes",
                "Caching disabled (0 minutes); every lookup refetches",
            );
        }

        if self.query.retry_max_delay_ms < self.query.retry_base_delay_ms {
            result.add_warning(
                "query.retry_max_delay_ms",
                "Max retry delay is below the base delay; retries use the max",
            );
        }

        match (self.location.latitude, self.location.longitude) {
            (Some(lat), Some(lon)) => {
                if !(-90.0..=90.0).contains(&lat) {
                    result.add_error("location.latitude", "Latitude must be within -90..=90");
                }
                if !(-180.0..=180.0).contains(&lon) {
                    result.add_error("location.longitude", "Longitude must be within -180..=180");
                }
            }
            (None, None) => {}
            _ => result.add_error(
                "location",
                "Both latitude and longitude must be set together",
            ),
        }

        result
    }

    fn validate_url(url_str: &str, field_name: &str, result: &mut ValidationResult) {
        match Url::parse(url_str) {
            Ok(url) => {
                if url.scheme() != "http" && url.scheme() != "https" {
                    result.add_error(
                        field_name,
                        format!("URL must use http or https scheme, got: {}", url.scheme()),
                    );
                }

                if url.host().is_none() {
                    result.add_error(field_name, "URL must have a host");
                }
            }
            Err(e) => {
                result.add_error(field_name, format!("Invalid URL: {}", e));
            }
        }
    }

    /// Path of the persisted key-value file
    pub fn storage_path(&self) -> PathBuf {
        self.config_dir.join("storage.json")
    }

    /// Save configuration to the default path
    pub fn save(&self) -> Result<()> {
        let path = Self::config_path()?;
        self.save_to(&path)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).context("Failed to create config directory")?;
        }

        // Keys from the environment stay out of the file
        let mut persisted = self.clone();
        if API_KEY_ENV_VARS.iter().any(|name| std::env::var(name).is_ok()) {
            persisted.provider.api_key = None;
        }

        let contents =
            toml::to_string_pretty(&persisted).context("Failed to serialize config")?;
        std::fs::write(path, contents).context("Failed to write config file")?;

        Ok(())
    }

    fn config_path() -> Result<PathBuf, ConfigError> {
        let config_dir = dirs::config_dir()
            .ok_or(ConfigError::NoConfigDir)?
            .join(CONFIG_DIR_NAME);

        Ok(config_dir.join(CONFIG_FILE_NAME))
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
    use super::*;

    #[test]
    fn test_valid_default_config() {
        let config = Config::default();
        let result = config.validate();
        assert!(result.is_valid(), "Default config should be valid: {:?}", result.errors);
    }

    #[test]
    fn test_invalid_base_url() {
        let mut config = Config::default();
        config.provider.base_url = "not-a-url".to_string();
        let result = config.validate();
        assert!(!result.is_valid());
        assert!(result.errors.iter().any(|e| e.field == "provider.base_url"));
    }

    #[test]
    fn test_invalid_url_scheme() {
        let mut config = Config::default();
        config.provider.base_url = "ftp://api.example.com".to_string();
        let result = config.validate();
        assert!(result.errors.iter().any(|e| e.message.contains("http or https")));
    }

    #[test]
    fn test_missing_api_key_is_warning() {
        let mut config = Config::default();
        config.provider.api_key = None;
        let result = config.validate();
        assert!(result.is_valid());
        assert!(result.warnings.iter().any(|w| w.field == "provider.api_key"));
    }

    #[test]
    fn test_half_configured_location_is_error() {
        let mut config = Config::default();
        config.location.latitude = Some(21.0);
        let result = config.validate();
        assert!(!result.is_valid());
        assert!(result.errors.iter().any(|e| e.field == "location"));
    }

    #[test]
    fn test_out_of_range_latitude() {
        let mut config = Config::default();
        config.location = LocationConfig {
            latitude: Some(91.0),
            longitude: Some(105.8),
        };
        let result = config.validate();
        assert!(result.errors.iter().any(|e| e.field == "location.latitude"));
    }

    #[test]
    fn test_load_from_creates_default_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");

        let config = Config::load_from(&path).unwrap();

        assert!(path.exists());
        assert_eq!(config.config_dir, dir.path().join("nested"));
        assert_eq!(config.provider.language, "vi");
        assert_eq!(config.query.stale_minutes, 5);
    }

    #[test]
    fn test_load_from_fills_missing_sections() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(
            &path,
            "config_dir = \"/tmp/skycast\"\n[provider]\nlanguage = \"en\"\n",
        )
        .unwrap();

        let config = Config::load_from(&path).unwrap();

        assert_eq!(config.provider.language, "en");
        assert_eq!(config.provider.units, "metric");
        assert_eq!(config.query.retry_base_delay_ms, 1000);
        assert_eq!(config.storage_path(), PathBuf::from("/tmp/skycast/storage.json"));
    }

    #[test]
    fn test_malformed_file_is_parse_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[provider\nlanguage = ").unwrap();

        let err = Config::load_validated_from(&path).unwrap_err();

        assert!(matches!(err, ConfigError::ParseError(_)));
    }

    #[test]
    fn test_failed_validation_is_invalid_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(
            &path,
            "config_dir = \"/tmp/skycast\"\n[location]\nlatitude = 21.0\n",
        )
        .unwrap();

        let err = Config::load_validated_from(&path).unwrap_err();

        match err {
            ConfigError::Invalid(summary) => assert!(summary.contains("location")),
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn test_validation_result_error_summary() {
        let mut result = ValidationResult::default();
        result.add_error("field1", "error1");
        result.add_error("field2", "error2");
        let summary = result.error_summary();
        assert!(summary.contains("field1"));
        assert!(summary.contains("field2"));
    }

    #[test]
    fn test_zero_timeout_means_transport_default() {
        let provider = ProviderConfig::default();
        assert_eq!(provider.timeout(), None);
        let provider = ProviderConfig {
            timeout_secs: 8,
            ..ProviderConfig::default()
        };
        assert_eq!(provider.timeout(), Some(Duration::from_secs(8)));
    }
}
