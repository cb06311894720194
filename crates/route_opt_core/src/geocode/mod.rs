//! Address to coordinate resolution.
//!
//! Geocoding is a capability handed to the caller's pipeline, not global
//! state: anything implementing [`Geocoder`] works, including plain closures.
//! Caching or rate limiting belongs inside the implementation.

mod nominatim;

use std::{collections::HashMap, fs, path::Path, str::FromStr};

use crate::{Coordinate, Error, Location, Result};

pub use nominatim::{
    DEFAULT_NOMINATIM_URL, HttpTransport, NominatimGeocoder, SearchTransport,
    parse_search_response,
};

pub trait Geocoder {
    /// Resolves `address`, or `None` when it cannot be found.
    fn geocode(&self, address: &str) -> Option<Coordinate>;

    /// Tries `self` first and falls back to `other`.
    fn or<G: Geocoder>(self, other: G) -> Fallback<Self, G>
    where
        Self: Sized,
    {
        Fallback {
            primary: self,
            secondary: other,
        }
    }
}

impl<F> Geocoder for F
where
    F: Fn(&str) -> Option<Coordinate>,
{
    fn geocode(&self, address: &str) -> Option<Coordinate> {
        self(address)
    }
}

/// Resolves addresses that are literal `lat,lng` pairs.
#[derive(Clone, Copy, Debug, Default)]
pub struct InlineGeocoder;

impl Geocoder for InlineGeocoder {
    fn geocode(&self, address: &str) -> Option<Coordinate> {
        address
            .parse::<Coordinate>()
            .ok()
            .filter(Coordinate::is_valid)
    }
}

#[derive(Clone, Debug)]
pub struct Fallback<A, B> {
    primary: A,
    secondary: B,
}

impl<A: Geocoder, B: Geocoder> Geocoder for Fallback<A, B> {
    fn geocode(&self, address: &str) -> Option<Coordinate> {
        self.primary
            .geocode(address)
            .or_else(|| self.secondary.geocode(address))
    }
}

/// A local address table read from `address;lat,lng` lines.
///
/// Lookups ignore case and collapse runs of whitespace.
#[derive(Clone, Debug, Default)]
pub struct Gazetteer {
    entries: HashMap<String, Coordinate>,
}

impl Gazetteer {
    pub fn load(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path).map_err(|e| {
            Error::invalid_input(format!("failed to read gazetteer {}: {e}", path.display()))
        })?;
        let gazetteer: Self = text.parse()?;
        log::info!(
            "geocode.gazetteer: loaded entries={} path={}",
            gazetteer.len(),
            path.display()
        );
        Ok(gazetteer)
    }

    pub fn insert(&mut self, address: &str, coordinate: Coordinate) {
        self.entries.insert(normalize(address), coordinate);
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl FromStr for Gazetteer {
    type Err = Error;

    fn from_str(text: &str) -> Result<Self> {
        let mut gazetteer = Self::default();
        for (line_no, line) in text.lines().enumerate() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }

            let Some((address, coords)) = line.rsplit_once(';') else {
                return Err(Error::invalid_input(format!(
                    "gazetteer line {}: expected 'address;lat,lng'",
                    line_no + 1
                )));
            };
            let coordinate: Coordinate = coords
                .parse()
                .map_err(|e| Error::invalid_input(format!("gazetteer line {}: {e}", line_no + 1)))?;
            if !coordinate.is_valid() {
                return Err(Error::invalid_input(format!(
                    "gazetteer line {}: coordinate out of range: {coordinate}",
                    line_no + 1
                )));
            }
            gazetteer.insert(address, coordinate);
        }
        Ok(gazetteer)
    }
}

impl Geocoder for Gazetteer {
    fn geocode(&self, address: &str) -> Option<Coordinate> {
        self.entries.get(&normalize(address)).copied()
    }
}

fn normalize(address: &str) -> String {
    address
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}

/// Geocodes every address in order.
///
/// Any miss aborts the whole request: each unresolved address is logged and
/// all of them are returned in [`Error::UnresolvedAddresses`]. Stops are never
/// dropped silently.
pub fn resolve_locations<G, S>(addresses: &[S], geocoder: &G) -> Result<Vec<Location>>
where
    G: Geocoder + ?Sized,
    S: AsRef<str>,
{
    let mut locations = Vec::with_capacity(addresses.len());
    let mut unresolved = Vec::new();

    for address in addresses {
        let address = address.as_ref();
        match geocoder.geocode(address) {
            Some(coordinate) => {
                log::debug!("geocode: resolved address={address:?} coord={coordinate}");
                locations.push(Location::new(address.to_string(), coordinate));
            }
            None => {
                log::warn!("geocode: couldn't resolve address={address:?}");
                unresolved.push(address.to_string());
            }
        }
    }

    if !unresolved.is_empty() {
        return Err(Error::UnresolvedAddresses(unresolved));
    }
    Ok(locations)
}
