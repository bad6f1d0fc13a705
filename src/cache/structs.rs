use chrono::{DateTime, NaiveDateTime, Utc};
use log::{info, warn};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fs;
use std::path::{Path, PathBuf};

use crate::errors::Result;

const MARKER_FORMAT: &str = "%a, %b %d %Y %H:%M:%S";

/// Cached catalog records for one entity kind plus when they were fetched
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Snapshot {
    pub records: Vec<Value>,
    pub fetched_at: Option<DateTime<Utc>>,
}

/// File-based cache for catalog data
pub struct Cache {
    cache_dir: PathBuf,
}

impl Cache {
    /// Create a new cache instance
    pub fn new<P: AsRef<Path>>(cache_dir: P) -> Result<Self> {
        let cache_dir = cache_dir.as_ref().to_path_buf();

        // Create cache directory if it doesn't exist
        fs::create_dir_all(&cache_dir)?;

        Ok(Self { cache_dir })
    }

    /// Save data to cache
    pub fn save<T: Serialize>(&self, key: &str, data: &T) -> Result<()> {
        let file_path = self.build_data_path(key);
        self.write_json(&file_path, data)?;
        info!("Saved data to cache: {}", file_path.display());
        Ok(())
    }

    /// Load data from cache
    pub fn load<T: for<'de> Deserialize<'de>>(&self, key: &str) -> Result<Option<T>> {
        let file_path = self.build_data_path(key);
        let data = self.read_json_opt(&file_path)?;
        if data.is_some() {
            info!("Loaded data from cache: {}", file_path.display());
        }
        Ok(data)
    }

    /// Clear all cached data
    pub fn clear(&self) -> Result<()> {
        fs::remove_dir_all(&self.cache_dir)?;
        fs::create_dir_all(&self.cache_dir)?;

        info!("Cleared cache directory");
        Ok(())
    }

    // --- Incremental Snapshot Methods ---

    /// Read the data file and fetch marker for `kind`; missing files mean an empty snapshot
    pub fn load_snapshot(&self, kind: &str) -> Result<Snapshot> {
        let records = self.load::<Vec<Value>>(kind)?.unwrap_or_default();
        let fetched_at = self.read_marker(kind)?;
        Ok(Snapshot { records, fetched_at })
    }

    /// Rewrite both files for `kind`
    pub fn save_snapshot(&self, kind: &str, snapshot: &Snapshot) -> Result<()> {
        self.save(kind, &snapshot.records)?;
        if let Some(fetched_at) = snapshot.fetched_at {
            self.write_marker(kind, fetched_at)?;
        }
        Ok(())
    }

    // --- Helper Methods ---

    fn build_data_path(&self, key: &str) -> PathBuf {
        self.cache_dir.join(format!("{}_data.json", key))
    }

    fn build_marker_path(&self, key: &str) -> PathBuf {
        self.cache_dir.join(format!("{}_updated_at.txt", key))
    }

    fn read_marker(&self, key: &str) -> Result<Option<DateTime<Utc>>> {
        let path = self.build_marker_path(key);
        if !path.exists() {
            return Ok(None);
        }

        let text = fs::read_to_string(&path)?;
        match NaiveDateTime::parse_from_str(text.trim(), MARKER_FORMAT) {
            Ok(marker) => Ok(Some(marker.and_utc())),
            Err(e) => {
                warn!("Ignoring unreadable marker {}: {}", path.display(), e);
                Ok(None)
            }
        }
    }

    fn write_marker(&self, key: &str, fetched_at: DateTime<Utc>) -> Result<()> {
        let text = fetched_at.format(MARKER_FORMAT).to_string();
        fs::write(self.build_marker_path(key), text)?;
        Ok(())
    }

    fn write_json<T: Serialize>(&self, path: &Path, data: &T) -> Result<()> {
        let json = serde_json::to_string(data)?;
        fs::write(path, json)?;
        Ok(())
    }

    fn read_json_opt<T: for<'de> Deserialize<'de>>(&self, path: &Path) -> Result<Option<T>> {
        if !path.exists() {
            return Ok(None);
        }

        let json = fs::read_to_string(path)?;
        Ok(Some(serde_json::from_str(&json)?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::timestamps::parse_timestamp;
    use serde_json::json;

    #[test]
    fn test_cache_save_and_load() {
        let temp_dir = tempfile::tempdir().unwrap();
        let cache = Cache::new(temp_dir.path()).unwrap();

        cache.save("test_key", &vec!["a", "b"]).unwrap();
        let loaded: Option<Vec<String>> = cache.load("test_key").unwrap();

        assert_eq!(loaded, Some(vec!["a".to_string(), "b".to_string()]));
    }

    #[test]
    fn test_missing_snapshot_is_empty() {
        let temp_dir = tempfile::tempdir().unwrap();
        let cache = Cache::new(temp_dir.path()).unwrap();

        let snapshot = cache.load_snapshot("songs").unwrap();

        assert_eq!(snapshot, Snapshot::default());
    }

    #[test]
    fn test_snapshot_round_trips_through_both_files() {
        let temp_dir = tempfile::tempdir().unwrap();
        let cache = Cache::new(temp_dir.path()).unwrap();
        let snapshot = Snapshot {
            records: vec![json!({"id": 1, "title": "Stars"})],
            fetched_at: parse_timestamp("2025-01-02 03:04:05"),
        };

        cache.save_snapshot("songs", &snapshot).unwrap();

        let marker = fs::read_to_string(temp_dir.path().join("songs_updated_at.txt")).unwrap();
        assert_eq!(marker, "Thu, Jan 02 2025 03:04:05");
        assert!(temp_dir.path().join("songs_data.json").exists());
        assert_eq!(cache.load_snapshot("songs").unwrap(), snapshot);
    }

    #[test]
    fn test_clear_removes_files() {
        let temp_dir = tempfile::tempdir().unwrap();
        let cache = Cache::new(temp_dir.path().join("data")).unwrap();
        cache.save("charts", &vec![1, 2, 3]).unwrap();

        cache.clear().unwrap();

        assert!(cache.load::<Vec<i32>>("charts").unwrap().is_none());
    }
}
