//! Display preferences (temperature unit and theme).
//!
//! One `PreferencesStore` is created at startup and shared; readers either
//! call `get()` or hold a `watch::Receiver` from `subscribe()`.

use std::sync::Arc;

use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use tokio::sync::watch;

use crate::storage::KeyValueStore;

pub const DARK_MODE_KEY: &str = "darkMode";
pub const TEMPERATURE_UNIT_KEY: &str = "temperatureUnit";

/// Temperature unit preference
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum TemperatureUnit {
    #[default]
    Celsius,
    Fahrenheit,
}

impl TemperatureUnit {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Celsius => "celsius",
            Self::Fahrenheit => "fahrenheit",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value.trim() {
            "celsius" => Some(Self::Celsius),
            "fahrenheit" => Some(Self::Fahrenheit),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

impl Theme {
    pub fn is_dark(&self) -> bool {
        matches!(self, Self::Dark)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DisplayPreferences {
    pub unit: TemperatureUnit,
    pub theme: Theme,
}

pub struct PreferencesStore {
    store: Arc<dyn KeyValueStore>,
    current: RwLock<DisplayPreferences>,
    tx: watch::Sender<DisplayPreferences>,
}

impl PreferencesStore {
    /// Load persisted preferences; anything missing or unreadable uses the default.
    pub fn load(store: Arc<dyn KeyValueStore>) -> Self {
        let unit = match store.get(TEMPERATURE_UNIT_KEY) {
            Ok(Some(raw)) => TemperatureUnit::parse(&raw).unwrap_or_else(|| {
                tracing::warn!("Ignoring unknown temperature unit {:?}", raw);
                TemperatureUnit::default()
            }),
            Ok(None) => TemperatureUnit::default(),
            Err(e) => {
                tracing::error!("Failed to read temperature unit: {}", e);
                TemperatureUnit::default()
            }
        };

        let theme = match store.get(DARK_MODE_KEY) {
            Ok(Some(raw)) => match serde_json::from_str::<bool>(&raw) {
                Ok(true) => Theme::Dark,
                Ok(false) => Theme::Light,
                Err(e) => {
                    tracing::warn!("Ignoring unreadable dark mode flag: {}", e);
                    Theme::default()
                }
            },
            Ok(None) => Theme::default(),
            Err(e) => {
                tracing::error!("Failed to read dark mode flag: {}", e);
                Theme::default()
            }
        };

        let prefs = DisplayPreferences { unit, theme };
        let (tx, _rx) = watch::channel(prefs);

        Self {
            store,
            current: RwLock::new(prefs),
            tx,
        }
    }

    pub fn get(&self) -> DisplayPreferences {
        *self.current.read()
    }

    /// Receive every future change.
    pub fn subscribe(&self) -> watch::Receiver<DisplayPreferences> {
        self.tx.subscribe()
    }

    pub fn set_unit(&self, unit: TemperatureUnit) {
        if let Err(e) = self.store.set(TEMPERATURE_UNIT_KEY, unit.as_str()) {
            tracing::error!("Failed to save temperature unit: {}", e);
        }
        self.update(|prefs| prefs.unit = unit);
    }

    pub fn set_theme(&self, theme: Theme) {
        let flag = if theme.is_dark() { "true" } else { "false" };
        if let Err(e) = self.store.set(DARK_MODE_KEY, flag) {
            tracing::error!("Failed to save dark mode flag: {}", e);
        }
        self.update(|prefs| prefs.theme = theme);
    }

    pub fn toggle_theme(&self) -> Theme {
        let next = match self.get().theme {
            Theme::Light => Theme::Dark,
            Theme::Dark => Theme::Light,
        };
        self.set_theme(next);
        next
    }

    fn update(&self, f: impl FnOnce(&mut DisplayPreferences)) {
        let updated = {
            let mut current = self.current.write();
            f(&mut current);
            *current
        };
        self.tx.send_replace(updated);
    }
}
