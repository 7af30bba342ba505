use anyhow::{Context, Result};
use chrono::Local;
use clap::Parser;
use std::path::PathBuf;
use tracing::info;

use crate::apply::{ThemeApplier, default_state_file, read_state_file};
use crate::config::{self, LoadedConfig};
use crate::daemon::{self, Daemon};
use crate::desktop::settings::INTERFACE_SCHEMA;
use crate::desktop::{AvailableThemes, capture_session_environment, detect_backend};
use crate::location::IpInfoProvider;
use crate::schedule::{BoundaryResolver, Decision, ThemeMode, decide};

#[derive(Parser, Debug)]
#[command(name = "audamo", version, disable_version_flag = true)]
#[command(about = "Switch between light and dark desktop themes by schedule or sun position")]
pub struct Cli {
    /// Switch to light mode and exit
    #[arg(short, long, conflicts_with = "dark")]
    pub light: bool,

    /// Switch to dark mode and exit
    #[arg(short, long)]
    pub dark: bool,

    /// Keep running and switch automatically
    #[arg(long, conflicts_with_all = ["light", "dark"])]
    pub daemon: bool,

    /// List installed themes, cursors and icons
    #[arg(long)]
    pub list_themes: bool,

    /// Show the resolved mode, today's boundaries and the current setting
    #[arg(long)]
    pub status: bool,

    /// Resolve the mode but do not change anything
    #[arg(long)]
    pub dry_run: bool,

    /// Write the default config to ~/.config/audamo/config.toml
    #[arg(long)]
    pub init_config: bool,

    /// Overwrite an existing config with --init-config
    #[arg(long, requires = "init_config")]
    pub force: bool,

    /// Enable debug logging
    #[arg(long)]
    pub debug: bool,

    /// Use this config file
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Print version
    #[arg(short = 'v', long, action = clap::ArgAction::Version)]
    version: Option<bool>,
}

impl Cli {
    /// Mode forced with `--light` or `--dark`.
    pub fn forced_mode(&self) -> Option<ThemeMode> {
        match (self.light, self.dark) {
            (true, _) => Some(ThemeMode::Light),
            (_, true) => Some(ThemeMode::Dark),
            _ => None,
        }
    }
}

/// Execute the command line.
pub fn run(cli: Cli) -> Result<()> {
    daemon::init_logging(cli.debug);
    capture_session_environment();

    if cli.init_config {
        let path = config::write_default_config(cli.force)
            .context("Failed to write default config")?;
        println!("Wrote config to {}", path.display());
        return Ok(());
    }

    if cli.list_themes {
        print!("{}", format_theme_list(&AvailableThemes::scan()));
        return Ok(());
    }

    let loaded = config::load_config(cli.config.as_deref()).context("Failed to load config")?;
    config::log_validation_warnings(&loaded.config, &AvailableThemes::scan());

    let applier = ThemeApplier::new(detect_backend(), default_state_file());
    let mut resolver = BoundaryResolver::new(Box::new(IpInfoProvider::new()));

    if cli.status {
        return print_status(&loaded, &mut resolver, &applier);
    }

    if cli.daemon {
        let daemon = Daemon::new(loaded, resolver, applier).with_dry_run(cli.dry_run);
        return daemon::run(daemon);
    }

    let mode = match cli.forced_mode() {
        Some(mode) => mode,
        None => resolve_now(&loaded, &mut resolver)?.mode,
    };

    if cli.dry_run {
        info!("Dry run, would switch to {} mode", mode);
        return Ok(());
    }

    applier
        .apply(mode, &loaded.config)
        .with_context(|| format!("Failed to apply {} mode", mode))
}

fn resolve_now(loaded: &LoadedConfig, resolver: &mut BoundaryResolver) -> Result<Decision> {
    let now = Local::now();
    let boundaries = resolver
        .boundaries(&loaded.config.general, now.date_naive())
        .context("Failed to determine sunrise and sunset")?;
    Ok(decide(now.time(), boundaries))
}

fn print_status(
    loaded: &LoadedConfig,
    resolver: &mut BoundaryResolver,
    applier: &ThemeApplier,
) -> Result<()> {
    let decision = resolve_now(loaded, resolver)?;
    let next_in = decision.until_next.as_secs();

    println!("Config:        {}", loaded.source);
    println!("Schedule:      {:?}", loaded.config.general.mode);
    println!("Sunrise:       {}", decision.boundaries.sunrise.format("%H:%M"));
    println!("Sunset:        {}", decision.boundaries.sunset.format("%H:%M"));
    println!("Mode now:      {}", decision.mode);
    println!("Next switch:   in {}h {:02}m", next_in / 3600, next_in % 3600 / 60);

    let current = applier
        .backend()
        .get(INTERFACE_SCHEMA, "color-scheme")
        .unwrap_or_else(|e| format!("unknown ({})", e));
    println!("Color scheme:  {}", current);

    let recorded = read_state_file(applier.state_file())
        .map(|mode| mode.to_string())
        .unwrap_or_else(|| "none".to_string());
    println!("Last applied:  {}", recorded);

    Ok(())
}

fn format_theme_list(available: &AvailableThemes) -> String {
    let mut out = String::new();
    for (title, names) in [
        ("Themes", &available.themes),
        ("Cursors", &available.cursors),
        ("Icons", &available.icons),
    ] {
        out.push_str(title);
        out.push_str(":\n");
        for name in names {
            out.push_str("- ");
            out.push_str(name);
            out.push('\n');
        }
        out.push('\n');
    }
    out
}
