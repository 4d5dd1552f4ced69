//! Platform capabilities the UI depends on: geolocation, sharing, clipboard.
//!
//! The front end injects implementations; tests use the mocks in `testing`.

use std::io::Write;
use std::time::Duration;

use async_trait::async_trait;
use skycast_core::LocationConfig;
use skycast_weather::Coordinates;
use thiserror::Error;

use crate::locale::Locale;

/// Geolocation timeout for a one-shot position request.
pub const LOCATE_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PositionOptions {
    pub timeout: Duration,
    pub enable_high_accuracy: bool,
}

impl Default for PositionOptions {
    fn default() -> Self {
        Self {
            timeout: LOCATE_TIMEOUT,
            enable_high_accuracy: true,
        }
    }
}

/// Why a position request failed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LocationError {
    #[error("geolocation is not supported")]
    Unsupported,
    #[error("permission denied")]
    PermissionDenied,
    #[error("position unavailable")]
    PositionUnavailable,
    #[error("timed out")]
    Timeout,
    #[error("{0}")]
    Other(String),
}

impl LocationError {
    /// Localized alert text.
    pub fn message(&self, locale: Locale) -> &'static str {
        match self {
            Self::Unsupported => locale.location_unsupported(),
            Self::PermissionDenied => locale.location_denied(),
            Self::PositionUnavailable => locale.location_unavailable(),
            Self::Timeout => locale.location_timeout(),
            Self::Other(_) => locale.location_failed(),
        }
    }
}

#[async_trait]
pub trait Geolocator: Send + Sync {
    async fn current_position(&self, options: PositionOptions)
        -> Result<Coordinates, LocationError>;
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ShareError {
    /// The user dismissed the share sheet
    #[error("share aborted")]
    Aborted,
    #[error("share unavailable")]
    Unavailable,
    #[error("share failed: {0}")]
    Failed(String),
}

#[async_trait]
pub trait Sharer: Send + Sync {
    async fn share(&self, title: &str, text: &str) -> Result<(), ShareError>;
}

#[async_trait]
pub trait Clipboard: Send + Sync {
    async fn write_text(&self, text: &str) -> anyhow::Result<()>;
}

/// Position from the `[location]` config section.
#[derive(Debug, Clone, Copy, Default)]
pub struct ConfiguredLocation {
    coords: Option<Coordinates>,
}

impl ConfiguredLocation {
    pub fn new(coords: Option<Coordinates>) -> Self {
        Self { coords }
    }

    pub fn from_config(config: &LocationConfig) -> Self {
        let coords = match (config.latitude, config.longitude) {
            (Some(lat), Some(lon)) => Some(Coordinates::new(lat, lon)),
            _ => None,
        };
        Self { coords }
    }
}

#[async_trait]
impl Geolocator for ConfiguredLocation {
    async fn current_position(
        &self,
        _options: PositionOptions,
    ) -> Result<Coordinates, LocationError> {
        match self.coords {
            Some(coords) if coords.is_valid() => Ok(coords),
            Some(coords) => {
                tracing::warn!("Configured location {:?} is out of range", coords);
                Err(LocationError::PositionUnavailable)
            }
            None => Err(LocationError::Unsupported),
        }
    }
}

/// Terminal share target: prints the summary to stdout.
#[derive(Debug, Clone, Copy, Default)]
pub struct StdoutShare;

#[async_trait]
impl Sharer for StdoutShare {
    async fn share(&self, title: &str, text: &str) -> Result<(), ShareError> {
        let mut out = std::io::stdout().lock();
        writeln!(out, "--- {} ---\n{}", title, text).map_err(|e| ShareError::Failed(e.to_string()))
    }
}

#[async_trait]
impl Clipboard for StdoutShare {
    async fn write_text(&self, text: &str) -> anyhow::Result<()> {
        let mut out = std::io::stdout().lock();
        writeln!(out, "{}", text)?;
        Ok(())
    }
}
