use std::{fmt, str::FromStr};

use route_opt_derive::New;

use crate::{Error, Result};

/// Mean Earth radius in kilometers.
pub const EARTH_RADIUS_KM: f64 = 6_371.0;
const NINETY: f64 = 90.0;
const ONE_EIGHTY: f64 = NINETY * 2.0;

/// A point on the Earth's surface in degrees.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Coordinate {
    pub lat: f64,
    pub lng: f64,
}

impl Coordinate {
    pub const fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }

    /// Great-circle distance in kilometers (haversine).
    ///
    /// Inputs are expected to be valid; out-of-range values give meaningless
    /// output rather than an error.
    pub fn haversine_km(&self, other: &Self) -> f64 {
        let (lat1, lat2) = (self.lat.to_radians(), other.lat.to_radians());
        let dlat = (other.lat - self.lat).to_radians();
        let dlng = (other.lng - self.lng).to_radians();
        let s1 = (dlat / 2.0).sin();
        let s2 = (dlng / 2.0).sin();
        let a = s1 * s1 + lat1.cos() * lat2.cos() * s2 * s2;
        2.0 * EARTH_RADIUS_KM * a.sqrt().atan2((1.0 - a).sqrt())
    }

    pub fn is_valid(&self) -> bool {
        self.lat.is_finite()
            && self.lng.is_finite()
            && (-NINETY..=NINETY).contains(&self.lat)
            && (-ONE_EIGHTY..=ONE_EIGHTY).contains(&self.lng)
    }
}

impl fmt::Display for Coordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut b1 = ryu::Buffer::new();
        let mut b2 = ryu::Buffer::new();
        write!(f, "{},{}", b1.format(self.lat), b2.format(self.lng))
    }
}

/// Parses `lat,lng`. Range checks are left to [`Coordinate::is_valid`].
impl FromStr for Coordinate {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let mut it = s.split(',');
        let lat_s = it
            .next()
            .map(str::trim)
            .filter(|v| !v.is_empty())
            .ok_or_else(|| Error::invalid_input(format!("missing latitude in '{s}'")))?;
        let lng_s = it
            .next()
            .map(str::trim)
            .filter(|v| !v.is_empty())
            .ok_or_else(|| Error::invalid_input(format!("missing longitude in '{s}'")))?;

        if it.next().is_some() {
            return Err(Error::invalid_input(format!(
                "expected 'lat,lng' but got extra comma fields: {s}"
            )));
        }

        let lat: f64 = lat_s
            .parse()
            .map_err(|_| Error::invalid_input(format!("invalid latitude: {lat_s}")))?;
        let lng: f64 = lng_s
            .parse()
            .map_err(|_| Error::invalid_input(format!("invalid longitude: {lng_s}")))?;

        Ok(Self::new(lat, lng))
    }
}

/// An address together with the coordinate it geocoded to.
/// Its identity is its position in the caller's sequence; position 0 is the depot.
#[derive(Clone, Debug, PartialEq, New)]
pub struct Location {
    pub address: String,
    pub coordinate: Coordinate,
}
