//! The address → coordinates JSON file.
//!
//! One flat map, pretty-printed. Keys are full street addresses exactly as
//! composed from the locations CSV; iteration order is sorted, which keeps
//! repair sessions resumable by index.

use super::types::{Coordinates, GeocodeError};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

pub struct CoordinateStore {
    path: PathBuf,
    entries: BTreeMap<String, Coordinates>,
}

impl CoordinateStore {
    /// An empty store that will persist to `path`.
    pub fn create<P: Into<PathBuf>>(path: P) -> Self {
        Self {
            path: path.into(),
            entries: BTreeMap::new(),
        }
    }

    /// Load an existing coordinates file. Missing or corrupt files are an
    /// error: this file is the dataset itself, not a cache.
    pub fn load<P: Into<PathBuf>>(path: P) -> Result<Self, GeocodeError> {
        let path = path.into();
        let data = fs::read_to_string(&path)?;
        let entries: BTreeMap<String, Coordinates> = serde_json::from_str(&data)?;
        Ok(Self { path, entries })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn insert(&mut self, address: &str, coords: Coordinates) {
        self.entries.insert(address.to_string(), coords);
    }

    pub fn get(&self, address: &str) -> Option<Coordinates> {
        self.entries.get(address).copied()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries that have real coordinates (anything but the fallback pair).
    pub fn fixed_count(&self) -> usize {
        self.entries.values().filter(|c| !c.is_fallback()).count()
    }

    /// Addresses still carrying the fallback pair, in stable order.
    pub fn fallback_addresses(&self) -> Vec<String> {
        self.entries
            .iter()
            .filter(|(_, c)| c.is_fallback())
            .map(|(addr, _)| addr.clone())
            .collect()
    }

    /// Persist to the store's own path.
    pub fn save(&self) -> Result<(), GeocodeError> {
        self.save_to(&self.path)
    }

    /// Persist to an arbitrary path (backups, final session output).
    pub fn save_to<P: AsRef<Path>>(&self, path: P) -> Result<(), GeocodeError> {
        let json = serde_json::to_string_pretty(&self.entries)?;
        fs::write(path, json)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geocode::types::FALLBACK;
    use tempfile::TempDir;

    #[test]
    fn test_roundtrip() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("coords.json");

        let mut store = CoordinateStore::create(&path);
        store.insert("123 Main St, Seattle, WA 98101", Coordinates::new(47.6, -122.3));
        store.insert("456 Oak Ave, Austin, TX 78701", FALLBACK);
        store.save().unwrap();

        let loaded = CoordinateStore::load(&path).unwrap();
        assert_eq!(loaded.len(), 2);
        let coords = loaded.get("123 Main St, Seattle, WA 98101").unwrap();
        assert!((coords.lat - 47.6).abs() < 1e-9);
    }

    #[test]
    fn test_load_missing_file_is_error() {
        let dir = TempDir::new().unwrap();
        assert!(CoordinateStore::load(dir.path().join("absent.json")).is_err());
    }

    #[test]
    fn test_fixed_and_fallback_partition() {
        let mut store = CoordinateStore::create("unused.json");
        store.insert("a", Coordinates::new(1.0, 2.0));
        store.insert("b", FALLBACK);
        store.insert("c", FALLBACK);
        store.insert("d", Coordinates::new(3.0, 4.0));

        assert_eq!(store.fixed_count(), 2);
        assert_eq!(store.fallback_addresses(), vec!["b".to_string(), "c".to_string()]);
    }

    #[test]
    fn test_insert_overwrites() {
        let mut store = CoordinateStore::create("unused.json");
        store.insert("a", FALLBACK);
        store.insert("a", Coordinates::new(9.0, 9.0));
        assert_eq!(store.len(), 1);
        assert!(!store.get("a").unwrap().is_fallback());
    }
}
