//! Desktop settings abstraction.
//!
//! Theme changes go through a [`SettingsBackend`]. The real implementation
//! shells out to `gsettings`; when it is not installed a no-op backend keeps
//! the rest of the program (custom scripts, state file) working.

use std::fmt;

use tracing::{info, warn};

use crate::error::ProcessError;
use crate::process;

/// GNOME interface settings schema.
pub const INTERFACE_SCHEMA: &str = "org.gnome.desktop.interface";
/// GNOME window manager preferences schema.
pub const WM_SCHEMA: &str = "org.gnome.desktop.wm.preferences";

/// Trait for reading and writing desktop settings.
///
/// Implementations must be thread-safe (Send + Sync).
pub trait SettingsBackend: Send + Sync {
    /// Set `key` in `schema` to a string value.
    fn set(&self, schema: &str, key: &str, value: &str) -> Result<(), ProcessError>;

    /// Read `key` from `schema` as a plain string.
    fn get(&self, schema: &str, key: &str) -> Result<String, ProcessError>;

    /// Backend name for logging.
    fn name(&self) -> &'static str;
}

impl fmt::Debug for dyn SettingsBackend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SettingsBackend({})", self.name())
    }
}

/// Settings backend using the `gsettings` command line tool.
pub struct Gsettings;

impl SettingsBackend for Gsettings {
    fn set(&self, schema: &str, key: &str, value: &str) -> Result<(), ProcessError> {
        process::run_checked("gsettings", ["set", schema, key, value])?;
        Ok(())
    }

    fn get(&self, schema: &str, key: &str) -> Result<String, ProcessError> {
        let output = process::run_checked("gsettings", ["get", schema, key])?;
        Ok(unquote_gvariant(&output))
    }

    fn name(&self) -> &'static str {
        "gsettings"
    }
}

/// Backend that only logs what it would have changed.
pub struct NoopBackend;

impl SettingsBackend for NoopBackend {
    fn set(&self, schema: &str, key: &str, value: &str) -> Result<(), ProcessError> {
        info!("Not setting {} {} to '{}' (no settings backend)", schema, key, value);
        Ok(())
    }

    fn get(&self, _schema: &str, _key: &str) -> Result<String, ProcessError> {
        Ok(String::new())
    }

    fn name(&self) -> &'static str {
        "noop"
    }
}

/// Pick the settings backend for this system.
///
/// Uses `gsettings` when it is on `PATH`, otherwise falls back to
/// [`NoopBackend`].
pub fn detect_backend() -> Box<dyn SettingsBackend> {
    if process::command_exists("gsettings") {
        info!("Using gsettings backend");
        return Box::new(Gsettings);
    }

    warn!("gsettings not found, desktop settings will not be changed");
    Box::new(NoopBackend)
}

/// Strip the GVariant string quoting `gsettings get` prints.
fn unquote_gvariant(raw: &str) -> String {
    let trimmed = raw.trim();
    trimmed
        .strip_prefix('\'')
        .and_then(|s| s.strip_suffix('\''))
        .unwrap_or(trimmed)
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unquote_gvariant() {
        assert_eq!(unquote_gvariant("'prefer-dark'\n"), "prefer-dark");
        assert_eq!(unquote_gvariant("'Adwaita'"), "Adwaita");
        assert_eq!(unquote_gvariant("true"), "true");
        assert_eq!(unquote_gvariant("  "), "");
    }

    #[test]
    fn test_noop_backend_accepts_everything() {
        let backend = NoopBackend;
        assert!(backend.set(INTERFACE_SCHEMA, "gtk-theme", "Adwaita").is_ok());
        assert_eq!(backend.get(INTERFACE_SCHEMA, "gtk-theme").unwrap(), "");
        assert_eq!(backend.name(), "noop");
    }
}
