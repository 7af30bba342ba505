//! Discovery of installed GTK, icon and cursor themes.

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

/// Names of installed themes, sorted and de-duplicated.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AvailableThemes {
    pub themes: BTreeSet<String>,
    pub icons: BTreeSet<String>,
    pub cursors: BTreeSet<String>,
}

impl AvailableThemes {
    /// Scan the XDG data directories and the legacy `~/.themes`/`~/.icons`.
    pub fn scan() -> Self {
        let data_dirs = xdg_data_dirs();
        let home = dirs::home_dir();

        let mut theme_dirs: Vec<PathBuf> = data_dirs.iter().map(|d| d.join("themes")).collect();
        let mut icon_dirs: Vec<PathBuf> = data_dirs.iter().map(|d| d.join("icons")).collect();
        if let Some(home) = home {
            theme_dirs.push(home.join(".themes"));
            icon_dirs.push(home.join(".icons"));
        }

        let available = Self::scan_dirs(&theme_dirs, &icon_dirs);
        tracing::debug!(
            themes = available.themes.len(),
            icons = available.icons.len(),
            cursors = available.cursors.len(),
            "Scanned installed themes"
        );
        available
    }

    /// Scan explicit theme and icon directories.
    ///
    /// Every subdirectory of an icon directory is an icon theme; those that
    /// contain a `cursors` directory are cursor themes as well.
    pub fn scan_dirs(theme_dirs: &[PathBuf], icon_dirs: &[PathBuf]) -> Self {
        let mut available = Self::default();

        for dir in theme_dirs {
            for path in subdirectories(dir) {
                if let Some(name) = dir_name(&path) {
                    available.themes.insert(name);
                }
            }
        }

        for dir in icon_dirs {
            for path in subdirectories(dir) {
                let Some(name) = dir_name(&path) else {
                    continue;
                };
                if path.join("cursors").is_dir() {
                    available.cursors.insert(name.clone());
                }
                available.icons.insert(name);
            }
        }

        available
    }

    pub fn has_theme(&self, name: &str) -> bool {
        self.themes.contains(name)
    }

    pub fn has_icon(&self, name: &str) -> bool {
        self.icons.contains(name)
    }

    pub fn has_cursor(&self, name: &str) -> bool {
        self.cursors.contains(name)
    }
}

/// Data directories searched for themes, most specific first.
fn xdg_data_dirs() -> Vec<PathBuf> {
    let mut dirs = Vec::new();

    if let Some(data_home) = dirs::data_dir() {
        dirs.push(data_home);
    }

    match std::env::var("XDG_DATA_DIRS") {
        Ok(xdg_dirs) if !xdg_dirs.is_empty() => {
            dirs.extend(
                xdg_dirs
                    .split(':')
                    .filter(|d| !d.is_empty())
                    .map(PathBuf::from),
            );
        }
        _ => {
            dirs.push(PathBuf::from("/usr/local/share"));
            dirs.push(PathBuf::from("/usr/share"));
        }
    }

    dirs
}

fn subdirectories(dir: &Path) -> impl Iterator<Item = PathBuf> {
    std::fs::read_dir(dir)
        .into_iter()
        .flatten()
        .flatten()
        .map(|entry| entry.path())
        .filter(|path| path.is_dir())
}

fn dir_name(path: &Path) -> Option<String> {
    path.file_name()?.to_str().map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn test_scan_dirs() {
        let root = tempfile::tempdir().unwrap();
        let system = root.path().join("share");
        let home = root.path().join("home");

        fs::create_dir_all(system.join("themes/Adwaita")).unwrap();
        fs::create_dir_all(system.join("themes/Adwaita-dark")).unwrap();
        fs::create_dir_all(system.join("icons/Papirus")).unwrap();
        fs::create_dir_all(system.join("icons/Adwaita/cursors")).unwrap();
        fs::create_dir_all(home.join(".themes/Adwaita")).unwrap();
        fs::create_dir_all(home.join(".icons/Bibata/cursors")).unwrap();
        // Loose files are not themes
        fs::write(system.join("themes/README"), "").unwrap();

        let available = AvailableThemes::scan_dirs(
            &[system.join("themes"), home.join(".themes")],
            &[system.join("icons"), home.join(".icons")],
        );

        assert_eq!(
            available.themes.iter().collect::<Vec<_>>(),
            ["Adwaita", "Adwaita-dark"]
        );
        assert_eq!(
            available.icons.iter().collect::<Vec<_>>(),
            ["Adwaita", "Bibata", "Papirus"]
        );
        assert_eq!(
            available.cursors.iter().collect::<Vec<_>>(),
            ["Adwaita", "Bibata"]
        );
        assert!(available.has_theme("Adwaita-dark"));
        assert!(available.has_icon("Papirus"));
        assert!(!available.has_cursor("Papirus"));
    }

    #[test]
    fn test_scan_missing_dirs() {
        let available =
            AvailableThemes::scan_dirs(&[PathBuf::from("/nonexistent/themes")], &[]);
        assert_eq!(available, AvailableThemes::default());
    }

    #[test]
    fn test_xdg_data_dirs_not_empty() {
        assert!(!xdg_data_dirs().is_empty());
    }
}
