//! Test utilities and mock factories.
//!
//! This module provides common testing utilities including mock object factories
//! and test helpers. Only compiled in test builds.

use chrono::NaiveTime;
use std::collections::BTreeSet;
use std::os::unix::process::ExitStatusExt;
use std::process::ExitStatus;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use crate::config::{AppConfig, GeneralConfig, ThemeSet};
use crate::desktop::settings::SettingsBackend;
use crate::desktop::themes::AvailableThemes;
use crate::error::{LocationError, ProcessError};
use crate::location::{Coordinates, GeoLocation, LocationProvider};

/// Shorthand for a whole-minute wall-clock time.
pub fn t(hour: u32, minute: u32) -> NaiveTime {
    NaiveTime::from_hms_opt(hour, minute, 0).unwrap()
}

/// Create a mock `[general]` table in time mode.
pub fn mock_general(sunrise: &str, sunset: &str) -> GeneralConfig {
    GeneralConfig {
        sunrise: sunrise.to_string(),
        sunset: sunset.to_string(),
        ..GeneralConfig::default()
    }
}

/// Create a mock AppConfig with every theme field filled in.
pub fn mock_config() -> AppConfig {
    AppConfig {
        general: mock_general("07:00", "19:00"),
        light: ThemeSet {
            theme: "Adwaita".to_string(),
            icon: "Papirus".to_string(),
            cursor: "Adwaita".to_string(),
        },
        dark: ThemeSet {
            theme: "Adwaita-dark".to_string(),
            icon: "Papirus-Dark".to_string(),
            cursor: "Bibata-Modern-Classic".to_string(),
        },
    }
}

/// Installed themes matching [`mock_config`].
pub fn mock_available_themes() -> AvailableThemes {
    let set = |names: &[&str]| -> BTreeSet<String> { names.iter().map(|n| n.to_string()).collect() };
    AvailableThemes {
        themes: set(&["Adwaita", "Adwaita-dark", "HighContrast"]),
        icons: set(&["Adwaita", "Papirus", "Papirus-Dark", "Bibata-Modern-Classic"]),
        cursors: set(&["Adwaita", "Bibata-Modern-Classic"]),
    }
}

/// Recorded `(schema, key, value)` settings changes.
pub type RecordedCalls = Arc<Mutex<Vec<(String, String, String)>>>;

/// Settings backend that records every change instead of applying it.
pub struct RecordingBackend {
    calls: RecordedCalls,
    fail_key: Option<&'static str>,
}

impl RecordingBackend {
    pub fn new() -> Self {
        Self {
            calls: Arc::default(),
            fail_key: None,
        }
    }

    /// A backend whose `set` fails for `key`.
    pub fn failing_on(key: &'static str) -> Self {
        Self {
            fail_key: Some(key),
            ..Self::new()
        }
    }

    /// Shared handle to the recorded calls.
    pub fn calls(&self) -> RecordedCalls {
        Arc::clone(&self.calls)
    }
}

impl SettingsBackend for RecordingBackend {
    fn set(&self, schema: &str, key: &str, value: &str) -> Result<(), ProcessError> {
        if self.fail_key == Some(key) {
            return Err(ProcessError::Failed {
                program: "mock".to_string(),
                status: ExitStatus::from_raw(1 << 8),
                stderr: format!("No such key '{key}'"),
            });
        }
        self.calls
            .lock()
            .unwrap()
            .push((schema.to_string(), key.to_string(), value.to_string()));
        Ok(())
    }

    fn get(&self, schema: &str, key: &str) -> Result<String, ProcessError> {
        Ok(self
            .calls
            .lock()
            .unwrap()
            .iter()
            .rev()
            .find(|(s, k, _)| s == schema && k == key)
            .map(|(_, _, v)| v.clone())
            .unwrap_or_default())
    }

    fn name(&self) -> &'static str {
        "recording"
    }
}

/// Location provider returning a fixed answer and counting lookups.
pub struct StaticLocation {
    result: Option<Coordinates>,
    calls: Arc<AtomicUsize>,
}

impl StaticLocation {
    pub fn new(coordinates: Coordinates) -> Self {
        Self {
            result: Some(coordinates),
            calls: Arc::default(),
        }
    }

    /// A provider whose lookups always fail.
    pub fn failing() -> Self {
        Self {
            result: None,
            calls: Arc::default(),
        }
    }

    /// Shared lookup counter.
    pub fn calls(&self) -> Arc<AtomicUsize> {
        Arc::clone(&self.calls)
    }
}

impl LocationProvider for StaticLocation {
    fn locate(&self) -> Result<GeoLocation, LocationError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.result
            .map(|coordinates| GeoLocation {
                coordinates,
                timezone: Some("UTC".to_string()),
                city: None,
            })
            .ok_or_else(|| LocationError::Network("offline".to_string()))
    }

    fn name(&self) -> &'static str {
        "static"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::desktop::settings::INTERFACE_SCHEMA;

    #[test]
    fn test_mock_config() {
        let config = mock_config();
        assert_eq!(config.general.sunrise, "07:00");
        assert_eq!(config.dark.theme(), Some("Adwaita-dark"));
    }

    #[test]
    fn test_recording_backend() {
        let backend = RecordingBackend::new();
        backend.set(INTERFACE_SCHEMA, "gtk-theme", "Adwaita").unwrap();
        backend.set(INTERFACE_SCHEMA, "gtk-theme", "Adwaita-dark").unwrap();
        assert_eq!(backend.calls().lock().unwrap().len(), 2);
        assert_eq!(
            backend.get(INTERFACE_SCHEMA, "gtk-theme").unwrap(),
            "Adwaita-dark"
        );
    }

    #[test]
    fn test_recording_backend_failure() {
        let backend = RecordingBackend::failing_on("color-scheme");
        assert!(backend.set(INTERFACE_SCHEMA, "color-scheme", "prefer-dark").is_err());
        assert!(backend.set(INTERFACE_SCHEMA, "gtk-theme", "Adwaita").is_ok());
    }

    #[test]
    fn test_static_location() {
        let provider = StaticLocation::new(Coordinates::new(1.0, 2.0));
        assert!(provider.locate().is_ok());
        assert!(StaticLocation::failing().locate().is_err());
        assert_eq!(provider.calls().load(Ordering::SeqCst), 1);
    }
}
