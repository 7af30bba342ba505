//! Light/dark decision logic.
//!
//! All times are compared as minutes since local midnight. Light mode holds
//! on the half-open interval `[sunrise, sunset)`, which may wrap past
//! midnight when `sunset` is earlier in the day than `sunrise`.

mod boundaries;

pub use boundaries::{BoundaryResolver, parse_clock_time};

use chrono::{NaiveTime, Timelike};
use std::fmt;
use std::time::Duration;

const MINUTES_PER_DAY: u32 = 24 * 60;
const SECONDS_PER_DAY: u32 = MINUTES_PER_DAY * 60;

/// Desktop appearance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ThemeMode {
    Light,
    Dark,
}

impl ThemeMode {
    /// Lowercase name, also passed to custom scripts.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Light => "light",
            Self::Dark => "dark",
        }
    }

    /// Value for `org.gnome.desktop.interface color-scheme`.
    pub fn color_scheme(&self) -> &'static str {
        match self {
            Self::Light => "prefer-light",
            Self::Dark => "prefer-dark",
        }
    }

    /// Parse a mode name, case-insensitively.
    pub fn parse_str(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "light" => Some(Self::Light),
            "dark" => Some(Self::Dark),
            _ => None,
        }
    }
}

impl fmt::Display for ThemeMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The two daily switch points in local wall-clock time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DayBoundaries {
    /// Light mode starts here.
    pub sunrise: NaiveTime,
    /// Dark mode starts here.
    pub sunset: NaiveTime,
}

impl DayBoundaries {
    pub fn new(sunrise: NaiveTime, sunset: NaiveTime) -> Self {
        Self { sunrise, sunset }
    }
}

/// Outcome of evaluating the schedule at one instant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Decision {
    pub mode: ThemeMode,
    pub boundaries: DayBoundaries,
    /// Time until the next sunrise or sunset boundary.
    pub until_next: Duration,
}

/// Minutes elapsed since midnight, seconds truncated.
pub fn minutes_since_midnight(time: NaiveTime) -> u32 {
    time.hour() * 60 + time.minute()
}

/// Decide between light and dark for the wall-clock time `now`.
///
/// At exactly `sunrise` the result is light, at exactly `sunset` it is dark.
/// Equal boundaries leave an empty light interval, so the result is dark.
pub fn resolve_mode(now: NaiveTime, boundaries: &DayBoundaries) -> ThemeMode {
    let now = minutes_since_midnight(now);
    let sunrise = minutes_since_midnight(boundaries.sunrise);
    let sunset = minutes_since_midnight(boundaries.sunset);

    let light = if sunrise <= sunset {
        sunrise <= now && now < sunset
    } else {
        // Light interval wraps past midnight
        now >= sunrise || now < sunset
    };

    if light {
        ThemeMode::Light
    } else {
        ThemeMode::Dark
    }
}

/// Time until the next boundary strictly after `now`.
///
/// Boundaries are minute-aligned, so waking up at the returned instant lands
/// on the first second of the new interval.
pub fn until_next_transition(now: NaiveTime, boundaries: &DayBoundaries) -> Duration {
    let now_secs = now.num_seconds_from_midnight();

    [boundaries.sunrise, boundaries.sunset]
        .into_iter()
        .map(|boundary| {
            let target = minutes_since_midnight(boundary) * 60;
            let delta = (target + SECONDS_PER_DAY - now_secs) % SECONDS_PER_DAY;
            if delta == 0 { SECONDS_PER_DAY } else { delta }
        })
        .min()
        .map(|secs| Duration::from_secs(u64::from(secs)))
        .unwrap_or(Duration::from_secs(u64::from(SECONDS_PER_DAY)))
}

/// Evaluate the schedule at `now`.
pub fn decide(now: NaiveTime, boundaries: DayBoundaries) -> Decision {
    Decision {
        mode: resolve_mode(now, &boundaries),
        boundaries,
        until_next: until_next_transition(now, &boundaries),
    }
}
