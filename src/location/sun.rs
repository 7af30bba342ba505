//! Sunrise and sunset computation.

use chrono::{DateTime, NaiveDate, TimeZone, Utc};
use sunrise::{SolarDay, SolarEvent};

use super::Coordinates;
use crate::error::LocationError;
use crate::schedule::DayBoundaries;

/// Sunrise and sunset of one day at one place.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SunEvents {
    pub sunrise: DateTime<Utc>,
    pub sunset: DateTime<Utc>,
}

impl SunEvents {
    /// Compute the sun events at `coordinates` on `date`.
    pub fn compute(coordinates: Coordinates, date: NaiveDate) -> Result<Self, LocationError> {
        let position = sunrise::Coordinates::new(coordinates.latitude, coordinates.longitude)
            .ok_or(LocationError::InvalidCoordinates {
                latitude: coordinates.latitude,
                longitude: coordinates.longitude,
            })?;

        let day = SolarDay::new(position, date);
        Self::from_events(
            coordinates,
            date,
            day.event_time(SolarEvent::Sunrise),
            day.event_time(SolarEvent::Sunset),
        )
    }

    /// Pair up the day's events. Polar day and night have no sunrise or sunset.
    fn from_events(
        coordinates: Coordinates,
        date: NaiveDate,
        sunrise: Option<DateTime<Utc>>,
        sunset: Option<DateTime<Utc>>,
    ) -> Result<Self, LocationError> {
        match (sunrise, sunset) {
            (Some(sunrise), Some(sunset)) if sunrise < sunset => Ok(Self { sunrise, sunset }),
            _ => Err(LocationError::NoSunCrossing {
                latitude: coordinates.latitude,
                longitude: coordinates.longitude,
                date,
            }),
        }
    }

    /// Wall-clock boundaries in the given time zone.
    pub fn boundaries_in<Tz: TimeZone>(&self, tz: &Tz) -> DayBoundaries {
        DayBoundaries::new(
            self.sunrise.with_timezone(tz).time(),
            self.sunset.with_timezone(tz).time(),
        )
    }
}
