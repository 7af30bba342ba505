//! Applying a light or dark theme to the desktop.

use std::path::{Path, PathBuf};

use tracing::{info, warn};

use crate::config::AppConfig;
use crate::desktop::settings::{INTERFACE_SCHEMA, SettingsBackend, WM_SCHEMA};
use crate::desktop::themes::AvailableThemes;
use crate::error::ApplyError;
use crate::process;
use crate::schedule::ThemeMode;

const STATE_FILE_NAME: &str = "audamo_current-theme";

/// Default location of the file recording the last applied mode.
pub fn default_state_file() -> PathBuf {
    std::env::temp_dir().join(STATE_FILE_NAME)
}

/// Read the last applied mode from a state file.
pub fn read_state_file(path: &Path) -> Option<ThemeMode> {
    std::fs::read_to_string(path)
        .ok()
        .and_then(|s| ThemeMode::parse_str(&s))
}

/// Applies theme sets through a settings backend.
pub struct ThemeApplier {
    backend: Box<dyn SettingsBackend>,
    state_file: PathBuf,
}

impl ThemeApplier {
    pub fn new(backend: Box<dyn SettingsBackend>, state_file: PathBuf) -> Self {
        Self {
            backend,
            state_file,
        }
    }

    /// The backend used for settings changes.
    pub fn backend(&self) -> &dyn SettingsBackend {
        self.backend.as_ref()
    }

    pub fn state_file(&self) -> &Path {
        &self.state_file
    }

    /// Apply `mode`, scanning installed themes for sanity warnings.
    pub fn apply(&self, mode: ThemeMode, config: &AppConfig) -> Result<(), ApplyError> {
        self.apply_with(mode, config, &AvailableThemes::scan())
    }

    /// Apply `mode` using the given installed theme list.
    ///
    /// Names that are not installed are still applied, with a warning. The
    /// first failing step aborts.
    pub fn apply_with(
        &self,
        mode: ThemeMode,
        config: &AppConfig,
        available: &AvailableThemes,
    ) -> Result<(), ApplyError> {
        info!("Setting theme to {} mode", mode);
        let set = config.theme_set(mode);

        if let Some(theme) = set.theme() {
            if !available.has_theme(theme) {
                warn!(
                    "Theme not found: {}. Must be one of: {:?}",
                    theme, available.themes
                );
            }
            self.set(INTERFACE_SCHEMA, "gtk-theme", theme)?;
            self.set(WM_SCHEMA, "theme", theme)?;
        }

        self.set(INTERFACE_SCHEMA, "color-scheme", mode.color_scheme())?;

        if let Some(icon) = set.icon() {
            if !available.has_icon(icon) {
                warn!(
                    "Icon theme not found: {}. Must be one of: {:?}",
                    icon, available.icons
                );
            }
            self.set(INTERFACE_SCHEMA, "icon-theme", icon)?;
        }

        if let Some(cursor) = set.cursor() {
            if !available.has_cursor(cursor) {
                warn!(
                    "Cursor theme not found: {}. Must be one of: {:?}",
                    cursor, available.cursors
                );
            }
            self.set(INTERFACE_SCHEMA, "cursor-theme", cursor)?;
        }

        if let Some(script) = config.general.custom_script() {
            process::run_custom_script(script, mode).map_err(ApplyError::Script)?;
        }

        self.record(mode)
    }

    fn set(&self, schema: &'static str, key: &'static str, value: &str) -> Result<(), ApplyError> {
        self.backend
            .set(schema, key, value)
            .map_err(|source| ApplyError::Setting {
                schema,
                key,
                source,
            })
    }

    fn record(&self, mode: ThemeMode) -> Result<(), ApplyError> {
        std::fs::write(&self.state_file, mode.as_str()).map_err(|source| ApplyError::StateFile {
            path: self.state_file.clone(),
            source,
        })
    }
}
