//! Domain-specific error types for audamo.
//!
//! Each layer of the application gets its own error enum so callers can tell
//! a broken config file apart from a failed `gsettings` call or an unreachable
//! geolocation service.

use std::path::PathBuf;
use std::process::ExitStatus;

use thiserror::Error;

/// Configuration errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// The config directory could not be determined.
    #[error("Config directory not found")]
    NoDirFound,

    /// A config path given on the command line does not exist.
    #[error("Config file does not exist: {0}")]
    NotFound(PathBuf),

    /// Failed to read the config file.
    #[error("Failed to read config file {path}: {source}")]
    ReadFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Failed to parse the config file.
    #[error("Failed to parse config {origin}: {source}")]
    ParseFailed {
        origin: String,
        #[source]
        source: toml::de::Error,
    },

    /// Failed to write the config file.
    #[error("Failed to write config file {path}: {source}")]
    WriteFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Refused to overwrite an existing config file.
    #[error("Config file already exists at {0} (use --force to overwrite)")]
    AlreadyExists(PathBuf),

    /// The bundled config template is missing from the binary.
    #[error("Bundled config template is missing")]
    MissingTemplate,
}

/// Process execution errors.
#[derive(Error, Debug)]
pub enum ProcessError {
    /// Failed to spawn the process.
    #[error("Failed to spawn '{program}': {source}")]
    SpawnFailed {
        program: String,
        #[source]
        source: std::io::Error,
    },

    /// The process ran but exited unsuccessfully.
    #[error("'{program}' exited with {status}: {stderr}")]
    Failed {
        program: String,
        status: ExitStatus,
        stderr: String,
    },

    /// The custom script does not exist.
    #[error("Script not found: {0}")]
    ScriptNotFound(PathBuf),

    /// The custom script is not executable by the current user.
    #[error("Script is not executable: {0}")]
    ScriptNotExecutable(PathBuf),
}

/// Location and sun position errors.
#[derive(Error, Debug)]
pub enum LocationError {
    /// The geolocation request failed.
    #[error("Failed to fetch current location: {0}")]
    Network(String),

    /// The geolocation service answered with something unexpected.
    #[error("Invalid geolocation response: {0}")]
    InvalidResponse(String),

    /// Latitude or longitude outside the valid range.
    #[error("Coordinates out of range: {latitude}, {longitude}")]
    InvalidCoordinates { latitude: f64, longitude: f64 },

    /// The sun does not rise or does not set on this day (polar day/night).
    #[error("The sun does not cross the horizon at {latitude}, {longitude} on {date}")]
    NoSunCrossing {
        latitude: f64,
        longitude: f64,
        date: chrono::NaiveDate,
    },
}

/// Errors while working out today's light/dark boundaries.
#[derive(Error, Debug)]
pub enum ScheduleError {
    /// A configured time could not be parsed as `HH:MM`.
    #[error("Invalid {field} time '{value}', expected HH:MM")]
    InvalidTime { field: &'static str, value: String },

    /// Location lookup or sun computation failed.
    #[error(transparent)]
    Location(#[from] LocationError),
}

/// Errors while applying a theme.
#[derive(Error, Debug)]
pub enum ApplyError {
    /// A desktop setting could not be changed.
    #[error("Failed to set {schema} {key}: {source}")]
    Setting {
        schema: &'static str,
        key: &'static str,
        #[source]
        source: ProcessError,
    },

    /// The custom script failed.
    #[error("Custom script failed: {0}")]
    Script(#[source] ProcessError),

    /// The current mode could not be recorded.
    #[error("Failed to write state file {path}: {source}")]
    StateFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}
