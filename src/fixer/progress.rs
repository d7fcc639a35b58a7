//! Repair-session bookkeeping: the progress checkpoint file and the
//! timestamped backup files written alongside the coordinates file.

use crate::geocode::CoordinateStore;
use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

pub const PROGRESS_FILE: &str = "coordinate_fix_progress.json";
pub const BACKUP_PREFIX: &str = "store_coordinates_progress_";
pub const FIXED_PREFIX: &str = "store_coordinates_fixed_";
const JSON_SUFFIX: &str = ".json";

/// Checkpoint state for an interactive repair session. `completed_count`
/// indexes into the stable fallback-address list, so a resumed session
/// picks up exactly where the last one stopped.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FixProgress {
    pub session_start: String,
    pub last_updated: String,
    pub completed_count: usize,
    pub total_count: usize,
    pub last_completed_address: Option<String>,
    #[serde(default)]
    pub loaded_from_backup: bool,
    #[serde(default)]
    pub backup_file_used: Option<String>,
}

impl FixProgress {
    pub fn start(total_count: usize, backup_file_used: Option<String>) -> Self {
        let now = Utc::now().to_rfc3339();
        Self {
            session_start: now.clone(),
            last_updated: now,
            completed_count: 0,
            total_count,
            last_completed_address: None,
            loaded_from_backup: backup_file_used.is_some(),
            backup_file_used,
        }
    }

    /// Record that position `index` was handled (fixed or skipped).
    pub fn record(&mut self, index: usize, address: &str, skipped: bool) {
        self.completed_count = index + 1;
        self.last_updated = Utc::now().to_rfc3339();
        self.last_completed_address = Some(if skipped {
            format!("{} (SKIPPED)", address)
        } else {
            address.to_string()
        });
    }
}

/// Load the checkpoint if one exists. Corrupt or unreadable files are
/// treated as no checkpoint.
pub fn load_progress(dir: &Path) -> Option<FixProgress> {
    let data = fs::read_to_string(dir.join(PROGRESS_FILE)).ok()?;
    serde_json::from_str(&data).ok()
}

/// Best-effort checkpoint save; a failed write warns but never aborts the
/// session.
pub fn save_progress(dir: &Path, progress: &FixProgress) {
    let path = dir.join(PROGRESS_FILE);
    match serde_json::to_string_pretty(progress) {
        Ok(json) => {
            if fs::write(&path, json).is_err() {
                eprintln!("Warning: could not save progress file");
            }
        }
        Err(_) => eprintln!("Warning: could not save progress file"),
    }
}

pub fn clear_progress(dir: &Path) {
    let _ = fs::remove_file(dir.join(PROGRESS_FILE));
}

/// Filesystem-safe UTC timestamp used in backup and output file names.
pub fn timestamp_slug() -> String {
    Utc::now().format("%Y-%m-%dT%H-%M-%S").to_string()
}

pub fn backup_path(dir: &Path) -> PathBuf {
    dir.join(format!("{}{}{}", BACKUP_PREFIX, timestamp_slug(), JSON_SUFFIX))
}

pub fn fixed_output_path(dir: &Path) -> PathBuf {
    dir.join(format!("{}{}{}", FIXED_PREFIX, timestamp_slug(), JSON_SUFFIX))
}

/// A discovered backup file with its repair statistics.
pub struct BackupSummary {
    pub path: PathBuf,
    pub fixed: usize,
    pub total: usize,
}

impl BackupSummary {
    pub fn file_name(&self) -> String {
        self.path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default()
    }

    /// Human-readable creation time, reconstructed from the file name.
    pub fn label(&self) -> String {
        self.file_name()
            .trim_start_matches(BACKUP_PREFIX)
            .trim_end_matches(JSON_SUFFIX)
            .replace('T', " ")
    }

    pub fn percent_fixed(&self) -> f64 {
        if self.total == 0 {
            0.0
        } else {
            self.fixed as f64 / self.total as f64 * 100.0
        }
    }
}

/// Discover backup files from previous sessions, newest first. Files that
/// no longer parse are skipped.
pub fn find_backups(dir: &Path) -> Vec<BackupSummary> {
    let Ok(entries) = fs::read_dir(dir) else {
        return Vec::new();
    };

    let mut names: Vec<PathBuf> = entries
        .flatten()
        .map(|e| e.path())
        .filter(|p| {
            p.file_name()
                .and_then(|n| n.to_str())
                .map(|n| n.starts_with(BACKUP_PREFIX) && n.ends_with(JSON_SUFFIX))
                .unwrap_or(false)
        })
        .collect();
    // The timestamp slug sorts lexicographically, so reverse name order is
    // newest first.
    names.sort();
    names.reverse();

    names
        .into_iter()
        .filter_map(|path| {
            let store = CoordinateStore::load(&path).ok()?;
            Some(BackupSummary {
                fixed: store.fixed_count(),
                total: store.len(),
                path,
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geocode::{Coordinates, FALLBACK};
    use tempfile::TempDir;

    #[test]
    fn test_progress_roundtrip() {
        let dir = TempDir::new().unwrap();
        let mut progress = FixProgress::start(12, None);
        progress.record(0, "123 Main St", false);
        save_progress(dir.path(), &progress);

        let loaded = load_progress(dir.path()).unwrap();
        assert_eq!(loaded.completed_count, 1);
        assert_eq!(loaded.total_count, 12);
        assert_eq!(loaded.last_completed_address.as_deref(), Some("123 Main St"));
        assert!(!loaded.loaded_from_backup);
    }

    #[test]
    fn test_skip_marks_address() {
        let mut progress = FixProgress::start(3, None);
        progress.record(1, "9 Pier Rd", true);
        assert_eq!(progress.completed_count, 2);
        assert_eq!(
            progress.last_completed_address.as_deref(),
            Some("9 Pier Rd (SKIPPED)")
        );
    }

    #[test]
    fn test_corrupt_progress_loads_as_none() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join(PROGRESS_FILE), "{not json").unwrap();
        assert!(load_progress(dir.path()).is_none());
    }

    #[test]
    fn test_clear_progress() {
        let dir = TempDir::new().unwrap();
        save_progress(dir.path(), &FixProgress::start(1, None));
        assert!(load_progress(dir.path()).is_some());
        clear_progress(dir.path());
        assert!(load_progress(dir.path()).is_none());
    }

    #[test]
    fn test_find_backups_newest_first() {
        let dir = TempDir::new().unwrap();

        for (slug, lat) in [
            ("2026-01-02T10-00-00", 1.0),
            ("2026-03-04T10-00-00", 2.0),
        ] {
            let path = dir
                .path()
                .join(format!("{}{}{}", BACKUP_PREFIX, slug, JSON_SUFFIX));
            let mut store = CoordinateStore::create(&path);
            store.insert("a", Coordinates::new(lat, lat));
            store.insert("b", FALLBACK);
            store.save().unwrap();
        }
        // A non-matching file is ignored.
        std::fs::write(dir.path().join("other.json"), "{}").unwrap();

        let backups = find_backups(dir.path());
        assert_eq!(backups.len(), 2);
        assert!(backups[0].file_name().contains("2026-03-04"));
        assert_eq!(backups[0].fixed, 1);
        assert_eq!(backups[0].total, 2);
        assert_eq!(backups[0].label(), "2026-03-04 10-00-00");
    }

    #[test]
    fn test_unreadable_backup_skipped() {
        let dir = TempDir::new().unwrap();
        let name = format!("{}2026-01-01T00-00-00{}", BACKUP_PREFIX, JSON_SUFFIX);
        std::fs::write(dir.path().join(name), "definitely not json").unwrap();
        assert!(find_backups(dir.path()).is_empty());
    }
}
