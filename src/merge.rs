//! Merge the store database export into the locations list.
//!
//! The locations list is the base and keeps its row order; international
//! rows from the store export that are not already present get appended at
//! the end, transformed into the locations shape with a region assigned.

use crate::dataset::{self, is_missing_region, DatasetError, LocationRecord, StoreRecord};
use crate::region::RegionClassifier;
use std::collections::{HashMap, HashSet};
use std::path::Path;

/// Deduplication key: normalized address + city. Addresses match exactly
/// between the two datasets apart from case and spacing.
pub fn location_key(record: &LocationRecord) -> String {
    let address: String = record
        .address
        .trim()
        .to_uppercase()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ");
    let city = record.city.trim().to_uppercase();
    format!("{}|{}", address, city)
}

/// Reshape one store row into the locations-list shape. The `State` column
/// carries the country code for non-US rows; consumers of the merged file
/// expect that.
pub fn transform_store(record: &StoreRecord, classifier: &RegionClassifier) -> LocationRecord {
    let country = record.country.trim().to_string();
    let state = record.state.trim().to_string();
    let city = record.city.trim().to_string();

    let mut region = record.region_code.trim().to_string();
    if is_missing_region(&region) {
        region = classifier.classify(&country, &state, &city);
    }

    let store_name = {
        let name = record.loc_name.trim();
        if name.is_empty() { city.clone() } else { name.to_string() }
    };

    LocationRecord {
        store_name,
        address: record.address_1.trim().to_string(),
        state: if country == "US" { state } else { country.clone() },
        zipcode: record.postal_code.trim().to_string(),
        phone: record.phone.trim().to_string(),
        url: String::new(), // the store export carries no URLs
        city,
        country,
        region,
    }
}

pub struct MergeSummary {
    pub total: usize,
    pub base_count: usize,
    pub store_count: usize,
    pub duplicates: usize,
    pub us_filtered: usize,
    pub added: usize,
}

/// Merge transformed store rows into the base list: drop rows already
/// present, drop US rows, append the remainder at the end.
pub fn merge_records(
    mut base: Vec<LocationRecord>,
    stores: &[StoreRecord],
    classifier: &RegionClassifier,
) -> (Vec<LocationRecord>, MergeSummary) {
    for record in &mut base {
        record.normalize();
    }

    let base_keys: HashSet<String> = base.iter().map(location_key).collect();

    let transformed: Vec<LocationRecord> = stores
        .iter()
        .map(|s| transform_store(s, classifier))
        .collect();

    let mut duplicates = 0;
    let unique: Vec<LocationRecord> = transformed
        .into_iter()
        .filter(|record| {
            if base_keys.contains(&location_key(record)) {
                duplicates += 1;
                false
            } else {
                true
            }
        })
        .collect();

    let unique_count = unique.len();
    let international: Vec<LocationRecord> =
        unique.into_iter().filter(|r| r.country != "US").collect();
    let us_filtered = unique_count - international.len();

    let summary = MergeSummary {
        base_count: base.len(),
        store_count: stores.len(),
        duplicates,
        us_filtered,
        added: international.len(),
        total: base.len() + international.len(),
    };

    base.extend(international);
    (base, summary)
}

/// Merge the two CSV files and write the combined list.
pub fn merge<P: AsRef<Path>>(stores: P, locations: P, output: P) -> Result<MergeSummary, DatasetError> {
    eprintln!("Store location merger");
    eprintln!("=====================");

    eprintln!("Reading {}...", stores.as_ref().display());
    let store_records = dataset::read_store_records(&stores)?;
    eprintln!("Reading {}...", locations.as_ref().display());
    let location_records = dataset::read_location_records(&locations)?;

    eprintln!(
        "Loaded {} store rows and {} location rows",
        store_records.len(),
        location_records.len()
    );

    let classifier = RegionClassifier::new();
    let (combined, summary) = merge_records(location_records, &store_records, &classifier);

    dataset::write_location_records(&output, &combined)?;

    eprintln!();
    eprintln!("Merge summary");
    eprintln!("  Total locations:     {}", summary.total);
    eprintln!("  Original locations:  {}", summary.base_count);
    eprintln!("  Store rows read:     {}", summary.store_count);
    eprintln!("  Duplicates found:    {}", summary.duplicates);
    eprintln!("  US rows filtered:    {}", summary.us_filtered);
    eprintln!("  New rows appended:   {}", summary.added);

    print_statistics(&combined);
    eprintln!();
    eprintln!("Saved merged data to {}", output.as_ref().display());
    Ok(summary)
}

fn print_statistics(records: &[LocationRecord]) {
    let mut by_country: HashMap<&str, usize> = HashMap::new();
    let mut by_region: HashMap<&str, usize> = HashMap::new();
    for record in records {
        *by_country.entry(record.country.as_str()).or_default() += 1;
        *by_region.entry(record.region.as_str()).or_default() += 1;
    }

    let mut countries: Vec<_> = by_country.into_iter().collect();
    countries.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(b.0)));
    eprintln!();
    eprintln!("Locations by country:");
    for (country, count) in countries {
        eprintln!("  {}: {}", country, count);
    }

    let mut regions: Vec<_> = by_region.into_iter().collect();
    regions.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(b.0)));
    eprintln!();
    eprintln!("Locations by region (top 15):");
    for (region, count) in regions.into_iter().take(15) {
        eprintln!("  {}: {}", region, count);
    }
}
