//! store.rs - Durable progress record, one JSON file
//!
//! Single writer, single run: load once at start, save exactly once at the
//! end. A malformed or missing file falls back to the default zero record
//! rather than failing the run.

use log::{debug, warn};
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::ScrapeError;
use crate::models::ProgressRecord;

pub struct StateStore {
    path: PathBuf,
}

impl StateStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        StateStore { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Prior record, or a fresh zero record when the file is absent or
    /// unreadable. Never fails.
    pub fn load(&self) -> ProgressRecord {
        let raw = match fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(e) => {
                debug!("no prior state at {} ({})", self.path.display(), e);
                return ProgressRecord::default_now();
            }
        };

        match serde_json::from_str(&raw) {
            Ok(record) => record,
            Err(e) => {
                warn!(
                    "malformed state file {}, starting from zero: {}",
                    self.path.display(),
                    e
                );
                ProgressRecord::default_now()
            }
        }
    }

    /// Overwrite the state file with `record`: human-readable, 2-space
    /// indented JSON. Creates the parent directory on first run.
    pub fn save(&self, record: &ProgressRecord) -> Result<(), ScrapeError> {
        if let Some(dir) = self.path.parent() {
            if !dir.as_os_str().is_empty() {
                fs::create_dir_all(dir)?;
            }
        }

        let json = serde_json::to_string_pretty(record)
            .map_err(|e| ScrapeError::Parse(e.to_string()))?;
        fs::write(&self.path, json)?;

        debug!("state written to {}", self.path.display());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Progress;
    use std::env;

    fn temp_store(name: &str) -> StateStore {
        let path = env::temp_dir().join(format!(
            "dronopad-test-{}-{}.json",
            name,
            std::process::id()
        ));
        let _ = fs::remove_file(&path);
        StateStore::new(path)
    }

    #[test]
    fn test_load_missing_file_yields_default() {
        let store = temp_store("missing");
        let record = store.load();

        assert_eq!(record.progress.total, 0);
        assert!(record.source.is_none());
    }

    #[test]
    fn test_load_malformed_file_yields_default() {
        let store = temp_store("malformed");
        fs::write(store.path(), "{ not json").unwrap();

        let record = store.load();
        assert_eq!(record.progress.total, 0);

        fs::remove_file(store.path()).unwrap();
    }

    #[test]
    fn test_save_load_round_trip() {
        let store = temp_store("roundtrip");

        let record = ProgressRecord {
            progress: Progress { total: 7_654_321 },
            timestamp: "2026-08-29T10:00:00.000Z".to_string(),
            source: Some("attr_counter".to_string()),
        };
        store.save(&record).unwrap();

        let loaded = store.load();
        assert_eq!(loaded, record);
        // timestamp preserved exactly as written
        assert_eq!(loaded.timestamp, "2026-08-29T10:00:00.000Z");

        fs::remove_file(store.path()).unwrap();
    }

    #[test]
    fn test_save_writes_two_space_indented_json() {
        let store = temp_store("indent");
        store.save(&ProgressRecord::default_now()).unwrap();

        let raw = fs::read_to_string(store.path()).unwrap();
        assert!(raw.contains("\n  \"progress\""));
        assert!(raw.contains("\n    \"total\": 0"));

        fs::remove_file(store.path()).unwrap();
    }

    #[test]
    fn test_save_creates_parent_directory() {
        let dir = env::temp_dir().join(format!("dronopad-test-dir-{}", std::process::id()));
        let _ = fs::remove_dir_all(&dir);

        let store = StateStore::new(dir.join("okko-data.json"));
        store.save(&ProgressRecord::default_now()).unwrap();
        assert!(store.path().exists());

        fs::remove_dir_all(&dir).unwrap();
    }
}
