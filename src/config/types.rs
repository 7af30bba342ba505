//! Configuration type definitions.

use serde::{Deserialize, Deserializer, Serialize};

use crate::schedule::ThemeMode;

/// Default daemon polling interval in minutes.
pub const DEFAULT_INTERVAL_MINUTES: u64 = 10;

/// Application configuration.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Scheduling and script settings.
    pub general: GeneralConfig,
    /// Themes applied in light mode.
    pub light: ThemeSet,
    /// Themes applied in dark mode.
    pub dark: ThemeSet,
}

impl AppConfig {
    /// The theme set to apply for `mode`.
    pub fn theme_set(&self, mode: ThemeMode) -> &ThemeSet {
        match mode {
            ThemeMode::Light => &self.light,
            ThemeMode::Dark => &self.dark,
        }
    }
}

/// The `[general]` table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct GeneralConfig {
    /// How the light/dark boundaries are determined.
    pub mode: ScheduleMode,
    /// Start of light mode in time mode (`HH:MM`).
    pub sunrise: String,
    /// Start of dark mode in time mode (`HH:MM`).
    pub sunset: String,
    /// Latitude for location mode. Looked up by IP when unset.
    #[serde(
        deserialize_with = "deserialize_coordinate",
        skip_serializing_if = "Option::is_none"
    )]
    pub latitude: Option<f64>,
    /// Longitude for location mode. Looked up by IP when unset.
    #[serde(
        deserialize_with = "deserialize_coordinate",
        skip_serializing_if = "Option::is_none"
    )]
    pub longitude: Option<f64>,
    /// Executable called with `light` or `dark` after every switch.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub custom_script_path: Option<String>,
    /// How often the daemon re-evaluates the schedule.
    pub interval_minutes: u64,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            mode: ScheduleMode::Time,
            sunrise: "07:00".to_string(),
            sunset: "19:00".to_string(),
            latitude: None,
            longitude: None,
            custom_script_path: None,
            interval_minutes: DEFAULT_INTERVAL_MINUTES,
        }
    }
}

impl GeneralConfig {
    /// Configured coordinates, only when both halves are present.
    pub fn coordinates(&self) -> Option<(f64, f64)> {
        self.latitude.zip(self.longitude)
    }

    /// The custom script path, ignoring blank values.
    pub fn custom_script(&self) -> Option<&str> {
        self.custom_script_path
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
    }
}

/// Themes for one mode. Empty names leave the setting untouched.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ThemeSet {
    /// GTK and window manager theme.
    pub theme: String,
    /// Icon theme.
    pub icon: String,
    /// Cursor theme.
    pub cursor: String,
}

impl ThemeSet {
    pub fn theme(&self) -> Option<&str> {
        non_empty(&self.theme)
    }

    pub fn icon(&self) -> Option<&str> {
        non_empty(&self.icon)
    }

    pub fn cursor(&self) -> Option<&str> {
        non_empty(&self.cursor)
    }
}

fn non_empty(s: &str) -> Option<&str> {
    let s = s.trim();
    (!s.is_empty()).then_some(s)
}

/// Source of the daily light/dark boundaries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScheduleMode {
    /// Fixed `sunrise`/`sunset` clock times.
    #[default]
    Time,
    /// Computed sunrise and sunset at a location.
    Location,
}

/// Coordinates may be written as numbers or strings, with `""` meaning unset.
fn deserialize_coordinate<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawCoordinate {
        Number(f64),
        Text(String),
    }

    match RawCoordinate::deserialize(deserializer)? {
        RawCoordinate::Number(value) => Ok(Some(value)),
        RawCoordinate::Text(text) if text.trim().is_empty() => Ok(None),
        RawCoordinate::Text(text) => text
            .trim()
            .parse::<f64>()
            .map(Some)
            .map_err(|_| serde::de::Error::custom(format!("invalid coordinate '{text}'"))),
    }
}
