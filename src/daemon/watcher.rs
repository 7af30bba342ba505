//! File watcher for the config file.
//!
//! Watches the directory containing the config file (editors often replace
//! files instead of writing them in place) and forwards events that touch the
//! config file itself.

use flume::{Receiver, TryRecvError};
use notify::{Event, EventKind, RecommendedWatcher, RecursiveMode, Watcher};
use std::path::{Path, PathBuf};
use tracing::{debug, error, info, warn};

/// Watches a single config file for changes.
pub struct ConfigWatcher {
    _watcher: RecommendedWatcher,
    rx: Receiver<PathBuf>,
}

impl ConfigWatcher {
    /// Start watching `config_path`.
    pub fn new(config_path: &Path) -> anyhow::Result<Self> {
        let (tx, rx) = flume::unbounded();
        let target = config_path.to_path_buf();
        let dir = config_path
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .unwrap_or(Path::new("."))
            .to_path_buf();

        let mut watcher = notify::recommended_watcher(move |res: Result<Event, _>| match res {
            Ok(event) => {
                if let Some(path) = Self::relevant_path(&event, &target)
                    && let Err(e) = tx.send(path)
                {
                    error!("Failed to send watcher event: {}", e);
                }
            }
            Err(e) => {
                warn!("File watcher error: {}", e);
            }
        })?;

        watcher.watch(&dir, RecursiveMode::NonRecursive)?;
        info!("Watching config file: {:?}", config_path);

        Ok(Self {
            _watcher: watcher,
            rx,
        })
    }

    /// Async wait for the next change.
    pub async fn recv_async(&self) -> Result<PathBuf, flume::RecvError> {
        self.rx.recv_async().await
    }

    /// Drain pending events (non-blocking), returning how many were queued.
    pub fn drain(&self) -> usize {
        let mut count = 0;
        loop {
            match self.rx.try_recv() {
                Ok(_) => count += 1,
                Err(TryRecvError::Empty) => break,
                Err(TryRecvError::Disconnected) => {
                    error!("Watcher channel disconnected");
                    break;
                }
            }
        }
        count
    }

    /// The config path if `event` modifies it.
    fn relevant_path(event: &Event, target: &Path) -> Option<PathBuf> {
        let interesting = matches!(
            event.kind,
            EventKind::Create(_) | EventKind::Modify(_) | EventKind::Remove(_)
        );
        if !interesting {
            return None;
        }

        // Only the parent directory is watched, so matching the name is enough.
        let path = event
            .paths
            .iter()
            .find(|p| p.file_name() == target.file_name())?;
        debug!("Config file changed: {:?} ({:?})", path, event.kind);
        Some(path.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use notify::event::{CreateKind, ModifyKind};

    fn event(kind: EventKind, path: &str) -> Event {
        Event::new(kind).add_path(PathBuf::from(path))
    }

    #[test]
    fn test_relevant_path_matches_config() {
        let target = Path::new("/home/user/.config/audamo/config.toml");

        let modified = event(
            EventKind::Modify(ModifyKind::Any),
            "/home/user/.config/audamo/config.toml",
        );
        assert_eq!(
            ConfigWatcher::relevant_path(&modified, target),
            Some(target.to_path_buf())
        );

        let created = event(
            EventKind::Create(CreateKind::File),
            "/home/user/.config/audamo/config.toml",
        );
        assert!(ConfigWatcher::relevant_path(&created, target).is_some());
    }

    #[test]
    fn test_relevant_path_ignores_other_files() {
        let target = Path::new("/home/user/.config/audamo/config.toml");

        let swap = event(
            EventKind::Modify(ModifyKind::Any),
            "/home/user/.config/audamo/.config.toml.swp",
        );
        assert!(ConfigWatcher::relevant_path(&swap, target).is_none());

        let access = event(
            EventKind::Access(notify::event::AccessKind::Any),
            "/home/user/.config/audamo/config.toml",
        );
        assert!(ConfigWatcher::relevant_path(&access, target).is_none());
    }

    #[test]
    fn test_drain_without_changes_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "").unwrap();

        let watcher = ConfigWatcher::new(&path).unwrap();
        assert_eq!(watcher.drain(), 0);
    }

    #[tokio::test]
    async fn test_watcher_reports_writes() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "").unwrap();

        let watcher = ConfigWatcher::new(&path).unwrap();
        std::fs::write(&path, "[general]\n").unwrap();

        let changed = tokio::time::timeout(std::time::Duration::from_secs(5), watcher.recv_async())
            .await
            .expect("watcher timed out")
            .unwrap();
        assert_eq!(changed.file_name(), path.file_name());

        // Follow-up writes queue up until drained
        std::fs::write(&path, "[general]\nmode = \"time\"\n").unwrap();
        tokio::time::sleep(std::time::Duration::from_millis(300)).await;
        assert!(watcher.drain() >= 1);
        assert_eq!(watcher.drain(), 0);
    }
}
