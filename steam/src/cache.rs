use crate::Result;
use log::warn;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Last observation of an item
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CacheEntry {
    pub price: f64,
    /// Unix seconds
    #[serde(default)]
    pub last_update: f64,
    #[serde(rename = "avg_3hr", default)]
    pub window_average: Option<f64>,
}

impl CacheEntry {
    pub fn is_fresh(&self, now: f64, interval: Duration) -> bool {
        self.last_update > 0.0 && now - self.last_update < interval.as_secs_f64()
    }
}

/// Last seen price per item, persisted as `prices.json`
#[derive(Debug)]
pub struct PriceCache {
    path: PathBuf,
    entries: BTreeMap<String, CacheEntry>,
}

impl PriceCache {
    /// Loads the cache. A missing or unreadable file starts an empty cache.
    pub fn load(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let entries = match fs::read_to_string(&path) {
            Ok(contents) => serde_json::from_str(&contents).unwrap_or_else(|e| {
                warn!("Ignoring unreadable price cache {}: {e}", path.display());
                BTreeMap::new()
            }),
            Err(e) if e.kind() == ErrorKind::NotFound => BTreeMap::new(),
            Err(e) => {
                warn!("Ignoring unreadable price cache {}: {e}", path.display());
                BTreeMap::new()
            }
        };
        Self { path, entries }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn get(&self, item: &str) -> Option<&CacheEntry> {
        self.entries.get(item)
    }

    pub fn insert(&mut self, item: &str, entry: CacheEntry) {
        self.entries.insert(item.to_string(), entry);
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Writes the cache through a temporary file so a crash never leaves it truncated.
    pub fn save(&self) -> Result<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        let tmp = self.path.with_extension("json.tmp");
        fs::write(&tmp, serde_json::to_string_pretty(&self.entries)?)?;
        fs::rename(&tmp, &self.path)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_freshness() {
        let entry = CacheEntry {
            price: 10.0,
            last_update: 1_000.0,
            window_average: None,
        };
        let hour = Duration::from_secs(3600);

        assert!(entry.is_fresh(1_000.0 + 3599.0, hour));
        assert!(!entry.is_fresh(1_000.0 + 3600.0, hour));

        let never = CacheEntry {
            last_update: 0.0,
            ..entry
        };
        assert!(!never.is_fresh(1.0, hour));
    }

    #[test]
    fn test_reads_existing_layout() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("prices.json");
        fs::write(
            &path,
            r#"{
              "Revolution Case": {"price": 95.5, "last_update": 1714557600.25, "avg_3hr": 94.0},
              "Sticker | Cloud9": {"price": 12.0, "last_update": 1714557600.0}
            }"#,
        )
        .unwrap();

        let cache = PriceCache::load(&path);
        assert_eq!(cache.len(), 2);
        assert_eq!(
            cache.get("Revolution Case"),
            Some(&CacheEntry {
                price: 95.5,
                last_update: 1714557600.25,
                window_average: Some(94.0),
            })
        );
        assert_eq!(cache.get("Sticker | Cloud9").unwrap().window_average, None);
    }

    #[test]
    fn test_corrupt_file_loads_empty() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("prices.json");
        fs::write(&path, "{not json").unwrap();

        assert!(PriceCache::load(&path).is_empty());
    }
}
