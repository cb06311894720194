use std::{
    sync::Mutex,
    thread,
    time::{Duration, Instant},
};

use serde::Deserialize;

use super::Geocoder;
use crate::{Coordinate, Error, Result};

pub const DEFAULT_NOMINATIM_URL: &str = "https://nominatim.openstreetmap.org";

const USER_AGENT: &str = concat!("route-opt/", env!("CARGO_PKG_VERSION"));
const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);
/// Public Nominatim allows one request per second.
const MIN_REQUEST_INTERVAL: Duration = Duration::from_secs(1);

/// Fetches the raw JSON body of a Nominatim `/search` for one address.
pub trait SearchTransport {
    fn search(&self, address: &str) -> Result<String>;
}

impl<F> SearchTransport for F
where
    F: Fn(&str) -> Result<String>,
{
    fn search(&self, address: &str) -> Result<String> {
        self(address)
    }
}

/// Blocking HTTP transport with request spacing.
pub struct HttpTransport {
    client: reqwest::blocking::Client,
    search_url: String,
    last_request: Mutex<Option<Instant>>,
}

impl HttpTransport {
    pub fn new(base_url: &str) -> Result<Self> {
        let client = reqwest::blocking::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(REQUEST_TIMEOUT)
            .build()?;
        Ok(Self {
            client,
            search_url: format!("{}/search", base_url.trim_end_matches('/')),
            last_request: Mutex::new(None),
        })
    }

    fn throttle(&self) {
        let mut last = match self.last_request.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        if let Some(previous) = *last {
            let since = previous.elapsed();
            if since < MIN_REQUEST_INTERVAL {
                thread::sleep(MIN_REQUEST_INTERVAL - since);
            }
        }
        *last = Some(Instant::now());
    }
}

impl SearchTransport for HttpTransport {
    fn search(&self, address: &str) -> Result<String> {
        self.throttle();
        log::debug!(
            "geocode.nominatim: request url={} address={address:?}",
            self.search_url
        );

        let response = self
            .client
            .get(&self.search_url)
            .query(&[("q", address), ("format", "jsonv2"), ("limit", "1")])
            .send()?;

        match response.status() {
            reqwest::StatusCode::OK => Ok(response.text()?),
            other => Err(Error::other(format!(
                "nominatim returned {other} for {}",
                self.search_url
            ))),
        }
    }
}

/// Resolves free-text addresses through a Nominatim search endpoint.
///
/// Request failures are logged and reported as a miss, so they surface
/// through the usual unresolved-address error.
pub struct NominatimGeocoder<T = HttpTransport> {
    transport: T,
}

impl NominatimGeocoder<HttpTransport> {
    pub fn connect(base_url: &str) -> Result<Self> {
        log::info!("geocode.nominatim: using url={base_url}");
        Ok(Self::with_transport(HttpTransport::new(base_url)?))
    }
}

impl<T: SearchTransport> NominatimGeocoder<T> {
    pub fn with_transport(transport: T) -> Self {
        Self { transport }
    }

    /// `Ok(None)` when the search ran but found nothing.
    pub fn lookup(&self, address: &str) -> Result<Option<Coordinate>> {
        let address = address.trim();
        if address.is_empty() {
            return Ok(None);
        }
        parse_search_response(&self.transport.search(address)?)
    }
}

impl<T: SearchTransport> Geocoder for NominatimGeocoder<T> {
    fn geocode(&self, address: &str) -> Option<Coordinate> {
        match self.lookup(address) {
            Ok(found) => found,
            Err(e) => {
                log::warn!("geocode.nominatim: lookup failed address={address:?}: {e}");
                None
            }
        }
    }
}

#[derive(Debug, Deserialize)]
struct Place {
    lat: Degrees,
    lon: Degrees,
}

/// Nominatim sends degrees as strings; some compatible servers send numbers.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum Degrees {
    Number(f64),
    Text(String),
}

impl Degrees {
    fn value(&self) -> Result<f64> {
        match self {
            Self::Number(v) => Ok(*v),
            Self::Text(raw) => raw
                .trim()
                .parse()
                .map_err(|_| Error::invalid_input(format!("invalid degrees in response: {raw}"))),
        }
    }
}

/// Decodes a `/search` body (`[{"lat": .., "lon": .., ...}, ...]`) into the
/// first hit's coordinate.
pub fn parse_search_response(body: &str) -> Result<Option<Coordinate>> {
    let places: Vec<Place> = serde_json::from_str(body)?;
    let Some(place) = places.first() else {
        return Ok(None);
    };

    let coordinate = Coordinate::new(place.lat.value()?, place.lon.value()?);
    if !coordinate.is_valid() {
        return Err(Error::invalid_input(format!(
            "coordinate out of range in response: {coordinate}"
        )));
    }
    Ok(Some(coordinate))
}
