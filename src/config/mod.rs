//! Configuration module for audamo.
//!
//! The config lives in `~/.config/audamo/config.toml`, falling back to the
//! system config and finally to the template bundled into the binary.

mod loader;
mod types;
pub mod validation;

pub use loader::{
    ConfigSource, LoadedConfig, SYSTEM_CONFIG_PATH, bundled_template, config_dir, find_config,
    load_config, parse_config, reload, user_config_path, write_default_config,
};
pub use types::{AppConfig, DEFAULT_INTERVAL_MINUTES, GeneralConfig, ScheduleMode, ThemeSet};
pub use validation::{ValidationWarning, log_validation_warnings, validate_config};
