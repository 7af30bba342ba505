pub mod env;
pub mod settings;
pub mod themes;

pub use env::{capture_session_environment, session_environment};
pub use settings::{Gsettings, NoopBackend, SettingsBackend, detect_backend};
pub use themes::AvailableThemes;
