//! Persistent coding-map cache.
//!
//! The cache is a key-value store keyed by coding id. The file-backed
//! implementation reads once at open and writes once at flush; there is no
//! locking, which is accepted for a single-operator batch tool.

use std::collections::BTreeMap;
use std::fs;
use std::path::PathBuf;

use tracing::{debug, warn};

use ukb_model::CodingMap;

use crate::error::CodingError;

/// Key-value store for resolved coding maps.
pub trait CodingCache {
    fn get(&self, coding_id: u32) -> Option<CodingMap>;
    fn put(&mut self, coding_id: u32, map: CodingMap);
    /// Persist pending entries. In-memory implementations are a no-op.
    fn flush(&mut self) -> Result<(), CodingError>;
}

/// JSON-file cache: `{"<coding id>": {"<code>": "<meaning>"}}`.
pub struct JsonFileCache {
    path: PathBuf,
    entries: BTreeMap<String, CodingMap>,
}

impl JsonFileCache {
    /// Open a cache file. A missing file starts empty (first run); a
    /// corrupt one is discarded with a warning rather than failing.
    pub fn open(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let entries = match fs::read_to_string(&path) {
            Ok(raw) => match serde_json::from_str(&raw) {
                Ok(entries) => entries,
                Err(error) => {
                    warn!(path = %path.display(), %error, "coding cache unreadable, starting empty");
                    BTreeMap::new()
                }
            },
            Err(_) => BTreeMap::new(),
        };
        debug!(path = %path.display(), entries = entries.len(), "opened coding cache");
        Self { path, entries }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl CodingCache for JsonFileCache {
    fn get(&self, coding_id: u32) -> Option<CodingMap> {
        self.entries.get(&coding_id.to_string()).cloned()
    }

    fn put(&mut self, coding_id: u32, map: CodingMap) {
        self.entries.insert(coding_id.to_string(), map);
    }

    fn flush(&mut self) -> Result<(), CodingError> {
        let payload =
            serde_json::to_string_pretty(&self.entries).map_err(|error| CodingError::CacheWrite {
                path: self.path.clone(),
                message: error.to_string(),
            })?;
        fs::write(&self.path, payload).map_err(|error| CodingError::CacheWrite {
            path: self.path.clone(),
            message: error.to_string(),
        })
    }
}

/// In-memory cache for tests and cache-less runs.
#[derive(Debug, Default)]
pub struct MemoryCache {
    entries: BTreeMap<u32, CodingMap>,
}

impl CodingCache for MemoryCache {
    fn get(&self, coding_id: u32) -> Option<CodingMap> {
        self.entries.get(&coding_id).cloned()
    }

    fn put(&mut self, coding_id: u32, map: CodingMap) {
        self.entries.insert(coding_id, map);
    }

    fn flush(&mut self) -> Result<(), CodingError> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sex_map() -> CodingMap {
        CodingMap::from([
            ("0".to_string(), "Female".to_string()),
            ("1".to_string(), "Male".to_string()),
        ])
    }

    #[test]
    fn file_cache_round_trips_through_flush() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cache.json");

        let mut cache = JsonFileCache::open(&path);
        assert!(cache.is_empty());
        cache.put(9, sex_map());
        cache.flush().unwrap();

        let reopened = JsonFileCache::open(&path);
        assert_eq!(reopened.len(), 1);
        assert_eq!(reopened.get(9), Some(sex_map()));
        assert_eq!(reopened.get(10), None);
    }

    #[test]
    fn corrupt_cache_degrades_to_empty() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cache.json");
        fs::write(&path, "{not json").unwrap();

        let cache = JsonFileCache::open(&path);
        assert!(cache.is_empty());
    }

    #[test]
    fn flush_to_unwritable_path_is_an_error() {
        let mut cache = JsonFileCache::open("/nonexistent-dir/cache.json");
        cache.put(9, sex_map());
        assert!(matches!(
            cache.flush(),
            Err(CodingError::CacheWrite { .. })
        ));
    }

    #[test]
    fn memory_cache_round_trips() {
        let mut cache = MemoryCache::default();
        cache.put(9, sex_map());
        assert_eq!(cache.get(9), Some(sex_map()));
        cache.flush().unwrap();
    }
}
