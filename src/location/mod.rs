//! Geographic location and sun position.
//!
//! Location mode needs coordinates to compute sunrise and sunset. They come
//! from the config file when set, otherwise from a [`LocationProvider`]
//! (by default an IP geolocation lookup).

mod ipinfo;
mod sun;

pub use ipinfo::IpInfoProvider;
pub use sun::SunEvents;

use std::fmt;

use crate::error::LocationError;

/// A point on earth in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Coordinates {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coordinates {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }

    /// Whether both values are within their valid ranges.
    pub fn is_valid(&self) -> bool {
        (-90.0..=90.0).contains(&self.latitude) && (-180.0..=180.0).contains(&self.longitude)
    }
}

impl fmt::Display for Coordinates {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "latitude={}, longitude={}", self.latitude, self.longitude)
    }
}

/// A resolved location with optional metadata from the lookup.
#[derive(Debug, Clone, PartialEq)]
pub struct GeoLocation {
    pub coordinates: Coordinates,
    /// IANA time zone name, when known.
    pub timezone: Option<String>,
    /// City name, when known.
    pub city: Option<String>,
}

impl From<Coordinates> for GeoLocation {
    fn from(coordinates: Coordinates) -> Self {
        Self {
            coordinates,
            timezone: None,
            city: None,
        }
    }
}

/// Trait for looking up the current location.
///
/// Implementations must be thread-safe (Send + Sync).
pub trait LocationProvider: Send + Sync {
    /// Determine the current location.
    fn locate(&self) -> Result<GeoLocation, LocationError>;

    /// Provider name for logging.
    fn name(&self) -> &'static str;
}

impl fmt::Debug for dyn LocationProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "LocationProvider({})", self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_coordinates_validity() {
        assert!(Coordinates::new(52.52, 13.405).is_valid());
        assert!(Coordinates::new(-90.0, 180.0).is_valid());
        assert!(!Coordinates::new(90.5, 0.0).is_valid());
        assert!(!Coordinates::new(0.0, -181.0).is_valid());
    }

    #[test]
    fn test_geo_location_from_coordinates() {
        let location = GeoLocation::from(Coordinates::new(1.0, 2.0));
        assert_eq!(location.coordinates, Coordinates::new(1.0, 2.0));
        assert!(location.timezone.is_none());
        assert!(location.city.is_none());
    }
}
