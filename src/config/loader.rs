//! Locating, reading and writing the config file.

use rust_embed::RustEmbed;
use std::fmt;
use std::path::{Path, PathBuf};

use crate::error::ConfigError;

use super::types::AppConfig;

/// Embedded config template.
#[derive(RustEmbed)]
#[folder = "assets"]
#[include = "*.toml"]
struct BundledAssets;

const CONFIG_FILE_NAME: &str = "config.toml";

/// Config shipped by distribution packages.
pub const SYSTEM_CONFIG_PATH: &str = "/usr/share/audamo/config.toml";

/// Where a config was loaded from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigSource {
    /// Given with `--config`.
    Explicit(PathBuf),
    /// `~/.config/audamo/config.toml`.
    User(PathBuf),
    /// `/usr/share/audamo/config.toml`.
    System(PathBuf),
    /// The template compiled into the binary.
    Bundled,
}

impl ConfigSource {
    /// The backing file, if any.
    pub fn path(&self) -> Option<&Path> {
        match self {
            Self::Explicit(p) | Self::User(p) | Self::System(p) => Some(p),
            Self::Bundled => None,
        }
    }
}

impl fmt::Display for ConfigSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.path() {
            Some(path) => write!(f, "{}", path.display()),
            None => write!(f, "<bundled template>"),
        }
    }
}

/// A parsed config together with its origin.
#[derive(Debug, Clone)]
pub struct LoadedConfig {
    pub config: AppConfig,
    pub source: ConfigSource,
}

/// Get the user config directory (`~/.config/audamo`).
pub fn config_dir() -> Option<PathBuf> {
    dirs::config_dir().map(|p| p.join("audamo"))
}

/// Get the user config file path.
pub fn user_config_path() -> Option<PathBuf> {
    config_dir().map(|p| p.join(CONFIG_FILE_NAME))
}

/// Resolve which config to use.
///
/// Order: explicit path, user config, system config, bundled template.
pub fn find_config(explicit: Option<&Path>) -> Result<ConfigSource, ConfigError> {
    find_config_in(
        explicit,
        user_config_path().as_deref(),
        Path::new(SYSTEM_CONFIG_PATH),
    )
}

fn find_config_in(
    explicit: Option<&Path>,
    user: Option<&Path>,
    system: &Path,
) -> Result<ConfigSource, ConfigError> {
    if let Some(path) = explicit {
        if !path.exists() {
            return Err(ConfigError::NotFound(path.to_path_buf()));
        }
        return Ok(ConfigSource::Explicit(path.to_path_buf()));
    }

    if let Some(path) = user {
        if path.exists() {
            return Ok(ConfigSource::User(path.to_path_buf()));
        }
        tracing::warn!(
            "No config file found at {:?}, trying system config at {:?}",
            path,
            system
        );
    }

    if system.exists() {
        return Ok(ConfigSource::System(system.to_path_buf()));
    }

    tracing::warn!("No system config file found at {:?}, using bundled defaults", system);
    Ok(ConfigSource::Bundled)
}

/// Load the config, failing on unreadable or malformed files.
pub fn load_config(explicit: Option<&Path>) -> Result<LoadedConfig, ConfigError> {
    let source = find_config(explicit)?;
    let config = read_source(&source)?;
    tracing::info!("Loaded config from {}", source);
    Ok(LoadedConfig { config, source })
}

/// Re-read a config during daemon operation.
///
/// Logs a warning and returns `None` when the file is broken, so the
/// caller can keep running with the previous config.
pub fn reload(loaded: &LoadedConfig) -> Option<AppConfig> {
    match read_source(&loaded.source) {
        Ok(config) => {
            tracing::info!("Reloaded config from {}", loaded.source);
            Some(config)
        }
        Err(e) => {
            tracing::warn!("{}, keeping previous config", e);
            None
        }
    }
}

fn read_source(source: &ConfigSource) -> Result<AppConfig, ConfigError> {
    match source.path() {
        Some(path) => {
            let content =
                std::fs::read_to_string(path).map_err(|source| ConfigError::ReadFailed {
                    path: path.to_path_buf(),
                    source,
                })?;
            parse_config(&content, &path.display().to_string())
        }
        None => parse_config(&bundled_template()?, "<bundled template>"),
    }
}

/// Parse TOML config content. `origin` is only used in error messages.
pub fn parse_config(content: &str, origin: &str) -> Result<AppConfig, ConfigError> {
    toml::from_str(content).map_err(|source| ConfigError::ParseFailed {
        origin: origin.to_string(),
        source,
    })
}

/// The config template compiled into the binary.
pub fn bundled_template() -> Result<String, ConfigError> {
    let file = BundledAssets::get(CONFIG_FILE_NAME).ok_or(ConfigError::MissingTemplate)?;
    String::from_utf8(file.data.into_owned()).map_err(|_| ConfigError::MissingTemplate)
}

/// Write the bundled template to the user config path.
pub fn write_default_config(force: bool) -> Result<PathBuf, ConfigError> {
    let path = user_config_path().ok_or(ConfigError::NoDirFound)?;
    write_template_to(&path, force)?;
    Ok(path)
}

fn write_template_to(path: &Path, force: bool) -> Result<(), ConfigError> {
    if path.exists() && !force {
        return Err(ConfigError::AlreadyExists(path.to_path_buf()));
    }

    let write_err = |source: std::io::Error| ConfigError::WriteFailed {
        path: path.to_path_buf(),
        source,
    };

    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).map_err(write_err)?;
    }
    std::fs::write(path, bundled_template()?).map_err(write_err)?;

    tracing::info!("Wrote default config to {:?}", path);
    Ok(())
}
