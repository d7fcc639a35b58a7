//! Nominatim geocoding provider.

use super::types::{Coordinates, GeocodeError, FALLBACK};
use serde::Deserialize;
use std::time::Duration;

const USER_AGENT: &str = "StoreAtlas/0.4 (store-location-dataset)";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// One search hit. Nominatim returns coordinates as strings.
#[derive(Deserialize, Debug)]
pub struct NominatimHit {
    pub lat: String,
    pub lon: String,
}

/// Geocode a full street address. Any failure (network, empty result,
/// unparseable response) yields the fallback coordinates after a note on
/// stderr; the caller never has to handle an error.
pub fn geocode_address(address: &str) -> Coordinates {
    match nominatim_search(address) {
        Ok(coords) => coords,
        Err(e) => {
            eprintln!("Error: {}", e);
            FALLBACK
        }
    }
}

/// Query Nominatim for the single best hit of an address.
pub fn nominatim_search(address: &str) -> Result<Coordinates, GeocodeError> {
    let url = format!(
        "https://nominatim.openstreetmap.org/search?format=json&q={}&limit=1",
        urlencode(address)
    );

    let response = ureq::get(&url)
        .set("User-Agent", USER_AGENT)
        .timeout(REQUEST_TIMEOUT)
        .call()
        .map_err(|e| GeocodeError::Network(e.to_string()))?;

    let hits: Vec<NominatimHit> = response
        .into_json()
        .map_err(|e| GeocodeError::InvalidResponse(e.to_string()))?;

    match hits.first() {
        Some(hit) => parse_hit(hit),
        None => Err(GeocodeError::NotFound(address.to_string())),
    }
}

fn parse_hit(hit: &NominatimHit) -> Result<Coordinates, GeocodeError> {
    let lat: f64 = hit
        .lat
        .parse()
        .map_err(|_| GeocodeError::InvalidResponse(format!("bad latitude '{}'", hit.lat)))?;
    let lng: f64 = hit
        .lon
        .parse()
        .map_err(|_| GeocodeError::InvalidResponse(format!("bad longitude '{}'", hit.lon)))?;
    Ok(Coordinates::new(lat, lng))
}

/// Percent-encode a query component, byte-wise so multi-byte characters in
/// international addresses survive.
pub fn urlencode(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for b in s.bytes() {
        match b {
            b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'-' | b'_' | b'.' | b'~' => {
                out.push(b as char)
            }
            _ => out.push_str(&format!("%{:02X}", b)),
        }
    }
    out
}
