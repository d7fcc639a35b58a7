//! Geocoding subsystem: the Nominatim provider, the coordinates file, and
//! the batch driver that runs one over the other.

pub mod provider;
pub mod store;
pub mod types;

pub use store::CoordinateStore;
pub use types::{Coordinates, GeocodeError, FALLBACK};

use crate::dataset::{self, RawLocationRecord};
use std::path::Path;
use std::thread;
use std::time::Duration;

/// Compose the full street address a location row geocodes under. This
/// exact string is also the row's key in the coordinates file.
pub fn full_address(record: &RawLocationRecord) -> String {
    format!(
        "{}, {}, {} {}",
        record.address, record.city, record.state, record.zipcode
    )
}

pub struct GeocodeSummary {
    pub total: usize,
    pub resolved: usize,
    pub fallback: usize,
}

/// Geocode every row of a locations CSV into a coordinates file, pausing
/// `delay` between requests (Nominatim's usage policy asks for one request
/// per second).
pub fn geocode_locations<P: AsRef<Path>>(
    input: P,
    output: P,
    delay: Duration,
) -> Result<GeocodeSummary, GeocodeError> {
    let records = dataset::read_raw_location_records(input)?;
    let mut store = CoordinateStore::create(output.as_ref());

    let total = records.len();
    let mut resolved = 0;
    for (i, record) in records.iter().enumerate() {
        if record.address.trim().is_empty() {
            continue;
        }
        let address = full_address(record);
        eprintln!("  {}/{}: {}", i + 1, total, record.store_name);

        let coords = provider::geocode_address(&address);
        if !coords.is_fallback() {
            resolved += 1;
        }
        store.insert(&address, coords);

        if i + 1 < total {
            thread::sleep(delay);
        }
    }

    store.save()?;
    Ok(GeocodeSummary {
        total: store.len(),
        resolved,
        fallback: store.len() - resolved,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_full_address() {
        let record = RawLocationRecord {
            store_name: "Downtown".into(),
            address: "123 Main St".into(),
            city: "Seattle".into(),
            state: "WA".into(),
            zipcode: "98101".into(),
            ..Default::default()
        };
        assert_eq!(full_address(&record), "123 Main St, Seattle, WA 98101");
    }

    #[test]
    fn test_full_address_tolerates_empty_fields() {
        let record = RawLocationRecord {
            address: "9 Pier Rd".into(),
            city: "Tokyo".into(),
            ..Default::default()
        };
        assert_eq!(full_address(&record), "9 Pier Rd, Tokyo,  ");
    }
}
