//! Configuration validation utilities.
//!
//! Provides validation for configuration values, returning warnings for
//! non-fatal issues that should be logged but don't prevent startup.

use super::types::{AppConfig, ScheduleMode, ThemeSet};
use crate::desktop::themes::AvailableThemes;
use crate::location::Coordinates;
use crate::process;
use crate::schedule::parse_clock_time;

/// Non-fatal validation warning.
#[derive(Debug)]
pub struct ValidationWarning {
    /// The field that has an issue.
    pub field: String,
    /// A description of the issue.
    pub message: String,
}

impl ValidationWarning {
    fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

/// Validate the entire config, returning warnings for non-fatal issues.
pub fn validate_config(config: &AppConfig, available: &AvailableThemes) -> Vec<ValidationWarning> {
    let mut warnings = vec![];
    let general = &config.general;

    let sunrise = parse_clock_time("sunrise", &general.sunrise);
    let sunset = parse_clock_time("sunset", &general.sunset);
    for (field, result) in [("general.sunrise", &sunrise), ("general.sunset", &sunset)] {
        if let Err(e) = result {
            let severity = if general.mode == ScheduleMode::Time {
                "Switching will fail in time mode."
            } else {
                "Ignored in location mode."
            };
            warnings.push(ValidationWarning::new(field, format!("{}. {}", e, severity)));
        }
    }
    if let (Ok(sunrise), Ok(sunset)) = (sunrise, sunset)
        && sunrise == sunset
        && general.mode == ScheduleMode::Time
    {
        warnings.push(ValidationWarning::new(
            "general.sunset",
            "Sunrise and sunset are identical, light mode will never be used.",
        ));
    }

    match (general.latitude, general.longitude) {
        (Some(latitude), Some(longitude)) => {
            if !Coordinates::new(latitude, longitude).is_valid() {
                warnings.push(ValidationWarning::new(
                    "general.latitude",
                    format!(
                        "Coordinates {}, {} are out of range (latitude -90..90, longitude -180..180).",
                        latitude, longitude
                    ),
                ));
            }
        }
        (Some(_), None) | (None, Some(_)) => {
            warnings.push(ValidationWarning::new(
                "general.latitude",
                "Only one of latitude/longitude is set. Both are needed, the location will be looked up instead.",
            ));
        }
        (None, None) => {}
    }

    if general.interval_minutes == 0 {
        warnings.push(ValidationWarning::new(
            "general.interval-minutes",
            "Interval of 0 minutes is not allowed, using 1 minute.",
        ));
    }

    if let Some(script) = general.custom_script()
        && let Err(e) = process::check_script(&process::expand_tilde(script))
    {
        warnings.push(ValidationWarning::new(
            "general.custom-script-path",
            e.to_string(),
        ));
    }

    warnings.extend(validate_theme_set("light", &config.light, available));
    warnings.extend(validate_theme_set("dark", &config.dark, available));

    warnings
}

/// Check that the named themes are installed.
fn validate_theme_set(
    table: &str,
    set: &ThemeSet,
    available: &AvailableThemes,
) -> Vec<ValidationWarning> {
    let mut warnings = vec![];

    if let Some(theme) = set.theme()
        && !available.has_theme(theme)
    {
        warnings.push(ValidationWarning::new(
            format!("{table}.theme"),
            format!("Theme '{}' is not installed.", theme),
        ));
    }

    if let Some(icon) = set.icon()
        && !available.has_icon(icon)
    {
        warnings.push(ValidationWarning::new(
            format!("{table}.icon"),
            format!("Icon theme '{}' is not installed.", icon),
        ));
    }

    if let Some(cursor) = set.cursor()
        && !available.has_cursor(cursor)
    {
        warnings.push(ValidationWarning::new(
            format!("{table}.cursor"),
            format!("Cursor theme '{}' is not installed.", cursor),
        ));
    }

    warnings
}

/// Log all validation warnings for `config`.
pub fn log_validation_warnings(config: &AppConfig, available: &AvailableThemes) {
    for warning in validate_config(config, available) {
        tracing::warn!("Config validation: {} - {}", warning.field, warning.message);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{mock_available_themes, mock_config};

    fn warnings_for(config: &AppConfig) -> Vec<ValidationWarning> {
        validate_config(config, &mock_available_themes())
    }

    #[test]
    fn test_validate_valid_config() {
        let warnings = warnings_for(&mock_config());
        assert!(warnings.is_empty(), "Warnings: {:?}", warnings);
    }

    #[test]
    fn test_validate_bad_time() {
        let mut config = mock_config();
        config.general.sunrise = "7am".to_string();
        let warnings = warnings_for(&config);
        assert!(
            warnings
                .iter()
                .any(|w| w.field == "general.sunrise" && w.message.contains("time mode"))
        );
    }

    #[test]
    fn test_validate_bad_time_in_location_mode() {
        let mut config = mock_config();
        config.general.mode = ScheduleMode::Location;
        config.general.sunset = "".to_string();
        let warnings = warnings_for(&config);
        assert!(
            warnings
                .iter()
                .any(|w| w.field == "general.sunset" && w.message.contains("Ignored"))
        );
    }

    #[test]
    fn test_validate_identical_times() {
        let mut config = mock_config();
        config.general.sunrise = "08:00".to_string();
        config.general.sunset = "08:00".to_string();
        let warnings = warnings_for(&config);
        assert!(warnings.iter().any(|w| w.message.contains("identical")));
    }

    #[test]
    fn test_validate_coordinates_out_of_range() {
        let mut config = mock_config();
        config.general.latitude = Some(123.0);
        config.general.longitude = Some(10.0);
        let warnings = warnings_for(&config);
        assert!(warnings.iter().any(|w| w.message.contains("out of range")));
    }

    #[test]
    fn test_validate_single_coordinate() {
        let mut config = mock_config();
        config.general.longitude = Some(10.0);
        let warnings = warnings_for(&config);
        assert!(warnings.iter().any(|w| w.message.contains("Only one")));
    }

    #[test]
    fn test_validate_zero_interval() {
        let mut config = mock_config();
        config.general.interval_minutes = 0;
        let warnings = warnings_for(&config);
        assert!(
            warnings
                .iter()
                .any(|w| w.field == "general.interval-minutes")
        );
    }

    #[test]
    fn test_validate_missing_script() {
        let mut config = mock_config();
        config.general.custom_script_path = Some("/nonexistent/hook.sh".to_string());
        let warnings = warnings_for(&config);
        assert!(
            warnings
                .iter()
                .any(|w| w.field == "general.custom-script-path")
        );
    }

    #[test]
    fn test_validate_uninstalled_themes() {
        let mut config = mock_config();
        config.dark.theme = "Nonexistent-Dark".to_string();
        config.light.cursor = "NoCursor".to_string();
        let warnings = warnings_for(&config);
        assert!(warnings.iter().any(|w| w.field == "dark.theme"));
        assert!(warnings.iter().any(|w| w.field == "light.cursor"));
        assert!(!warnings.iter().any(|w| w.field == "light.theme"));
    }
}
