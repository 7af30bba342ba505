//! IP based geolocation via ipinfo.io.

use serde::Deserialize;
use std::time::Duration;

use super::{Coordinates, GeoLocation, LocationProvider};
use crate::error::LocationError;

const IPINFO_URL: &str = "https://ipinfo.io/json";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Looks up the approximate location of the machine's public IP address.
pub struct IpInfoProvider {
    url: String,
}

impl IpInfoProvider {
    pub fn new() -> Self {
        Self {
            url: IPINFO_URL.to_string(),
        }
    }
}

impl Default for IpInfoProvider {
    fn default() -> Self {
        Self::new()
    }
}

impl LocationProvider for IpInfoProvider {
    fn locate(&self) -> Result<GeoLocation, LocationError> {
        let agent = ureq::AgentBuilder::new().timeout(REQUEST_TIMEOUT).build();
        let resp = agent
            .get(&self.url)
            .set("Accept", "application/json")
            .set(
                "User-Agent",
                concat!("audamo/", env!("CARGO_PKG_VERSION")),
            )
            .call()
            .map_err(|e| LocationError::Network(e.to_string()))?;

        let body = resp
            .into_string()
            .map_err(|e| LocationError::InvalidResponse(e.to_string()))?;

        parse_response(&body)
    }

    fn name(&self) -> &'static str {
        "ipinfo.io"
    }
}

/// Relevant subset of the ipinfo.io response.
#[derive(Debug, Deserialize)]
struct IpInfoResponse {
    loc: String,
    #[serde(default)]
    timezone: Option<String>,
    #[serde(default)]
    city: Option<String>,
}

fn parse_response(body: &str) -> Result<GeoLocation, LocationError> {
    let info: IpInfoResponse =
        serde_json::from_str(body).map_err(|e| LocationError::InvalidResponse(e.to_string()))?;

    Ok(GeoLocation {
        coordinates: parse_loc(&info.loc)?,
        timezone: info.timezone.filter(|tz| !tz.is_empty()),
        city: info.city.filter(|c| !c.is_empty()),
    })
}

/// Parse a `"latitude,longitude"` pair.
fn parse_loc(loc: &str) -> Result<Coordinates, LocationError> {
    let invalid = || LocationError::InvalidResponse(format!("bad loc field '{loc}'"));

    let (lat, lon) = loc.split_once(',').ok_or_else(invalid)?;
    let latitude = lat.trim().parse::<f64>().map_err(|_| invalid())?;
    let longitude = lon.trim().parse::<f64>().map_err(|_| invalid())?;

    let coordinates = Coordinates::new(latitude, longitude);
    if !coordinates.is_valid() {
        return Err(invalid());
    }
    Ok(coordinates)
}
