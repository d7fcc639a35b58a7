//! CSV dataset shapes and file I/O.
//!
//! Two shapes exist side by side: the store database export with snake_case
//! headers (`loc_name`, `address_1`, ...) and the locations list with
//! title-case headers (`Store Name`, `Address`, ...). Readers verify that
//! the required headers are present before any row is processed.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs::File;
use std::path::Path;

/// A row of the store database export (snake_case headers).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StoreRecord {
    #[serde(default)]
    pub loc_name: String,
    #[serde(default)]
    pub address_1: String,
    #[serde(default)]
    pub city: String,
    #[serde(default)]
    pub state: String,
    #[serde(default)]
    pub country: String,
    #[serde(default)]
    pub postal_code: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub region_code: String,
}

/// A row of the locations list with country and region assigned
/// (title-case headers).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LocationRecord {
    #[serde(rename = "Store Name", default)]
    pub store_name: String,
    #[serde(rename = "Address", default)]
    pub address: String,
    #[serde(rename = "City", default)]
    pub city: String,
    #[serde(rename = "State", default)]
    pub state: String,
    #[serde(rename = "Zipcode", default)]
    pub zipcode: String,
    #[serde(rename = "Phone", default)]
    pub phone: String,
    #[serde(rename = "URL", default)]
    pub url: String,
    #[serde(rename = "Country", default)]
    pub country: String,
    #[serde(rename = "Region", default)]
    pub region: String,
}

/// A row of the original seven-column locations list, before country and
/// region columns exist.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RawLocationRecord {
    #[serde(rename = "Store Name", default)]
    pub store_name: String,
    #[serde(rename = "Address", default)]
    pub address: String,
    #[serde(rename = "City", default)]
    pub city: String,
    #[serde(rename = "State", default)]
    pub state: String,
    #[serde(rename = "Zipcode", default)]
    pub zipcode: String,
    #[serde(rename = "Phone", default)]
    pub phone: String,
    #[serde(rename = "URL", default)]
    pub url: String,
}

impl LocationRecord {
    /// Trim every field in place, defaulting `Country` to US as the
    /// locations list predates international rows.
    pub fn normalize(&mut self) {
        self.store_name = self.store_name.trim().to_string();
        self.address = self.address.trim().to_string();
        self.city = self.city.trim().to_string();
        self.state = self.state.trim().to_string();
        self.zipcode = self.zipcode.trim().to_string();
        self.phone = self.phone.trim().to_string();
        self.url = self.url.trim().to_string();
        self.country = self.country.trim().to_string();
        if self.country.is_empty() {
            self.country = "US".to_string();
        }
        self.region = self.region.trim().to_string();
    }
}

/// True when a region cell counts as unassigned: empty, blank, or the
/// literal string NULL exported by the database.
pub fn is_missing_region(value: &str) -> bool {
    let v = value.trim();
    v.is_empty() || v == "NULL"
}

// ─── Errors ─────────────────────────────────────────────────────

#[derive(Debug)]
pub enum DatasetError {
    Io(std::io::Error),
    Csv(csv::Error),
    MissingColumns { file: String, columns: Vec<String> },
}

impl fmt::Display for DatasetError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io(e) => write!(f, "I/O error: {}", e),
            Self::Csv(e) => write!(f, "CSV error: {}", e),
            Self::MissingColumns { file, columns } => write!(
                f,
                "Required columns ({}) not found in {}",
                columns.join(", "),
                file
            ),
        }
    }
}

impl std::error::Error for DatasetError {}

impl From<std::io::Error> for DatasetError {
    fn from(e: std::io::Error) -> Self {
        Self::Io(e)
    }
}

impl From<csv::Error> for DatasetError {
    fn from(e: csv::Error) -> Self {
        Self::Csv(e)
    }
}

// ─── Readers / writers ──────────────────────────────────────────

fn check_headers(
    headers: &csv::StringRecord,
    required: &[&str],
    file: &Path,
) -> Result<(), DatasetError> {
    let missing: Vec<String> = required
        .iter()
        .filter(|&&col| !headers.iter().any(|h| h.trim() == col))
        .map(|col| col.to_string())
        .collect();
    if missing.is_empty() {
        Ok(())
    } else {
        Err(DatasetError::MissingColumns {
            file: file.display().to_string(),
            columns: missing,
        })
    }
}

fn read_records<T: for<'de> Deserialize<'de>>(
    path: &Path,
    required: &[&str],
) -> Result<Vec<T>, DatasetError> {
    let file = File::open(path)?;
    let mut rdr = csv::ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(file);
    check_headers(rdr.headers()?, required, path)?;
    let mut records = Vec::new();
    for result in rdr.deserialize() {
        records.push(result?);
    }
    Ok(records)
}

pub fn read_store_records<P: AsRef<Path>>(path: P) -> Result<Vec<StoreRecord>, DatasetError> {
    read_records(path.as_ref(), &["country", "state", "region_code"])
}

pub fn read_location_records<P: AsRef<Path>>(
    path: P,
) -> Result<Vec<LocationRecord>, DatasetError> {
    read_records(path.as_ref(), &["Store Name", "Address", "City", "State"])
}

pub fn read_raw_location_records<P: AsRef<Path>>(
    path: P,
) -> Result<Vec<RawLocationRecord>, DatasetError> {
    read_records(path.as_ref(), &["Store Name", "Address", "City", "State"])
}

fn write_records<T: Serialize, P: AsRef<Path>>(
    path: P,
    records: &[T],
) -> Result<(), DatasetError> {
    let file = File::create(path)?;
    let mut wtr = csv::Writer::from_writer(file);
    for record in records {
        wtr.serialize(record)?;
    }
    wtr.flush()?;
    Ok(())
}

pub fn write_location_records<P: AsRef<Path>>(
    path: P,
    records: &[LocationRecord],
) -> Result<(), DatasetError> {
    write_records(path, records)
}

pub fn write_store_records<P: AsRef<Path>>(
    path: P,
    records: &[StoreRecord],
) -> Result<(), DatasetError> {
    write_records(path, records)
}
