//! Core types for the geocoding subsystem.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::dataset::DatasetError;

/// Continental-US centroid, written for every address the geocoder could
/// not resolve. The repair session later walks entries equal to this pair.
pub const FALLBACK: Coordinates = Coordinates {
    lat: 39.8283,
    lng: -98.5795,
};

/// A latitude/longitude pair as stored in the coordinates file.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub lat: f64,
    pub lng: f64,
}

impl Coordinates {
    pub fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }

    /// Whether this entry still carries the unresolved-address marker.
    pub fn is_fallback(&self) -> bool {
        *self == FALLBACK
    }
}

impl fmt::Display for Coordinates {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}, {}", self.lat, self.lng)
    }
}

/// Geocoding subsystem errors. An address that cannot be resolved is not an
/// error; it gets [`FALLBACK`] coordinates, which is a normal outcome.
#[derive(Debug)]
pub enum GeocodeError {
    Network(String),
    InvalidResponse(String),
    NotFound(String),
    Io(std::io::Error),
    Json(serde_json::Error),
    Dataset(DatasetError),
}

impl fmt::Display for GeocodeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Network(msg) => write!(f, "Network error: {}", msg),
            Self::InvalidResponse(msg) => write!(f, "Invalid API response: {}", msg),
            Self::NotFound(addr) => write!(f, "No geocoding result for '{}'", addr),
            Self::Io(e) => write!(f, "I/O error: {}", e),
            Self::Json(e) => write!(f, "JSON error: {}", e),
            Self::Dataset(e) => write!(f, "{}", e),
        }
    }
}

impl std::error::Error for GeocodeError {}

impl From<std::io::Error> for GeocodeError {
    fn from(e: std::io::Error) -> Self {
        Self::Io(e)
    }
}

impl From<serde_json::Error> for GeocodeError {
    fn from(e: serde_json::Error) -> Self {
        Self::Json(e)
    }
}

impl From<DatasetError> for GeocodeError {
    fn from(e: DatasetError) -> Self {
        Self::Dataset(e)
    }
}
