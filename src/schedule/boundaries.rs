//! Determining today's sunrise and sunset boundaries.

use chrono::{Local, NaiveDate, NaiveTime, TimeZone};
use tracing::{debug, info};

use super::DayBoundaries;
use crate::config::{GeneralConfig, ScheduleMode};
use crate::error::{LocationError, ScheduleError};
use crate::location::{Coordinates, GeoLocation, LocationProvider, SunEvents};

/// Produces the day's boundaries for either schedule mode.
///
/// The first successful location lookup is cached for the lifetime of the
/// resolver. Failed lookups are not cached and are retried on the next call.
pub struct BoundaryResolver {
    provider: Box<dyn LocationProvider>,
    cached: Option<GeoLocation>,
}

impl BoundaryResolver {
    pub fn new(provider: Box<dyn LocationProvider>) -> Self {
        Self {
            provider,
            cached: None,
        }
    }

    /// Boundaries for `date` in the system's local time zone.
    pub fn boundaries(
        &mut self,
        general: &GeneralConfig,
        date: NaiveDate,
    ) -> Result<DayBoundaries, ScheduleError> {
        self.boundaries_in(general, date, &Local)
    }

    /// Boundaries for `date` in the time zone `tz`.
    pub fn boundaries_in<Tz: TimeZone>(
        &mut self,
        general: &GeneralConfig,
        date: NaiveDate,
        tz: &Tz,
    ) -> Result<DayBoundaries, ScheduleError> {
        match general.mode {
            ScheduleMode::Time => Ok(DayBoundaries::new(
                parse_clock_time("sunrise", &general.sunrise)?,
                parse_clock_time("sunset", &general.sunset)?,
            )),
            ScheduleMode::Location => {
                let location = self.location(general)?;
                let events = SunEvents::compute(location.coordinates, date)?;
                Ok(events.boundaries_in(tz))
            }
        }
    }

    /// The location used in location mode.
    ///
    /// Configured coordinates take precedence over the provider.
    pub fn location(&mut self, general: &GeneralConfig) -> Result<GeoLocation, LocationError> {
        if let Some((latitude, longitude)) = general.coordinates() {
            return Ok(Coordinates::new(latitude, longitude).into());
        }

        if let Some(location) = &self.cached {
            debug!("Using cached location: {}", location.coordinates);
            return Ok(location.clone());
        }

        info!(provider = self.provider.name(), "Fetching current location...");
        let location = self.provider.locate()?;
        info!(
            timezone = location.timezone.as_deref().unwrap_or("unknown"),
            city = location.city.as_deref().unwrap_or("unknown"),
            "Location: {}",
            location.coordinates
        );
        self.cached = Some(location.clone());
        Ok(location)
    }
}

/// Parse an `HH:MM` clock time from the config.
pub fn parse_clock_time(field: &'static str, value: &str) -> Result<NaiveTime, ScheduleError> {
    NaiveTime::parse_from_str(value.trim(), "%H:%M").map_err(|_| ScheduleError::InvalidTime {
        field,
        value: value.to_string(),
    })
}
