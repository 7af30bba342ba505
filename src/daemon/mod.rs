//! Daemon module for audamo.
//!
//! The daemon stays running, re-evaluating the schedule and applying the
//! matching theme whenever the mode changes or the config file is edited.

mod init;
mod watcher;

use anyhow::{Context, Result};
use chrono::{DateTime, Local, TimeZone};
use std::time::Duration;
use tokio::signal::unix::{SignalKind, signal};
use tracing::{debug, error, info, warn};

use crate::apply::ThemeApplier;
use crate::config::{self, LoadedConfig};
use crate::desktop::AvailableThemes;
use crate::error::ScheduleError;
use crate::schedule::{BoundaryResolver, Decision, ThemeMode, decide};

pub use init::{build_runtime, init_logging, log_dir};
pub use watcher::ConfigWatcher;

/// Upper bound on the wait after a failed tick.
const RETRY_DELAY: Duration = Duration::from_secs(60);

/// Quiet period after a config change before reloading.
const RELOAD_DEBOUNCE: Duration = Duration::from_millis(500);

/// Long-running theme switcher state.
pub struct Daemon {
    loaded: LoadedConfig,
    resolver: BoundaryResolver,
    applier: ThemeApplier,
    last_applied: Option<ThemeMode>,
    dry_run: bool,
}

impl Daemon {
    pub fn new(loaded: LoadedConfig, resolver: BoundaryResolver, applier: ThemeApplier) -> Self {
        Self {
            loaded,
            resolver,
            applier,
            last_applied: None,
            dry_run: false,
        }
    }

    /// Only log the modes that would be applied.
    pub fn with_dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    /// The mode applied most recently, if any.
    pub fn last_applied(&self) -> Option<ThemeMode> {
        self.last_applied
    }

    /// Configured polling interval.
    fn interval(&self) -> Duration {
        let minutes = self.loaded.config.general.interval_minutes.max(1);
        Duration::from_secs(minutes * 60)
    }

    /// Evaluate the schedule at `now`.
    pub fn decide_at<Tz: TimeZone>(&mut self, now: &DateTime<Tz>) -> Result<Decision, ScheduleError> {
        let boundaries =
            self.resolver
                .boundaries_in(&self.loaded.config.general, now.date_naive(), &now.timezone())?;
        Ok(decide(now.time(), boundaries))
    }

    /// Run one iteration, returning how long to wait before the next one.
    pub fn tick<Tz: TimeZone>(&mut self, now: DateTime<Tz>) -> Duration {
        let interval = self.interval();

        let decision = match self.decide_at(&now) {
            Ok(decision) => decision,
            Err(e) => {
                warn!("Failed to resolve theme mode: {}", e);
                return interval.min(RETRY_DELAY);
            }
        };

        debug!(
            sunrise = %decision.boundaries.sunrise,
            sunset = %decision.boundaries.sunset,
            next_in_secs = decision.until_next.as_secs(),
            "Resolved {} mode",
            decision.mode
        );

        if self.last_applied != Some(decision.mode) {
            if self.dry_run {
                info!("Dry run, would switch to {} mode", decision.mode);
            } else if let Err(e) = self.applier.apply(decision.mode, &self.loaded.config) {
                error!("Failed to apply {} mode: {}", decision.mode, e);
                return interval.min(RETRY_DELAY);
            }
            self.last_applied = Some(decision.mode);
        }

        interval.min(decision.until_next)
    }

    /// Re-read the config file. The next tick re-applies the current mode.
    pub fn reload_config(&mut self) {
        if let Some(config) = config::reload(&self.loaded) {
            config::log_validation_warnings(&config, &AvailableThemes::scan());
            self.loaded.config = config;
            self.last_applied = None;
        }
    }

    /// Run until Ctrl-C or SIGTERM.
    pub async fn run_loop(mut self) -> Result<()> {
        let watcher = match self.loaded.source.path() {
            Some(path) => ConfigWatcher::new(path)
                .inspect_err(|e| warn!("Config file will not be watched: {}", e))
                .ok(),
            None => None,
        };
        let mut sigterm =
            signal(SignalKind::terminate()).context("Failed to install SIGTERM handler")?;

        loop {
            let wait = self.tick(Local::now());
            debug!("Next check in {}s", wait.as_secs());

            tokio::select! {
                _ = tokio::time::sleep(wait) => {}
                _ = next_change(watcher.as_ref()) => {
                    tokio::time::sleep(RELOAD_DEBOUNCE).await;
                    let coalesced = watcher.as_ref().map_or(0, ConfigWatcher::drain);
                    debug!(coalesced, "Config change settled, reloading");
                    self.reload_config();
                }
                _ = tokio::signal::ctrl_c() => {
                    info!("Interrupted, exiting");
                    break;
                }
                _ = sigterm.recv() => {
                    info!("Received SIGTERM, exiting");
                    break;
                }
            }
        }

        Ok(())
    }
}

/// Wait for the next config change. Never resolves without a watcher.
async fn next_change(watcher: Option<&ConfigWatcher>) {
    match watcher {
        Some(watcher) => {
            if watcher.recv_async().await.is_err() {
                warn!("Config watcher stopped");
                std::future::pending::<()>().await;
            }
        }
        None => std::future::pending::<()>().await,
    }
}

/// Run the daemon.
pub fn run(daemon: Daemon) -> Result<()> {
    info!(
        version = env!("CARGO_PKG_VERSION"),
        "Starting audamo daemon"
    );
    let runtime = build_runtime()?;
    runtime.block_on(daemon.run_loop())
}
