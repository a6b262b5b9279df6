use crate::api::{Category, ManifestRecord};
use crate::error::StoreError;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Mutex;

/// One category's cached manifest plus the time of the last server hit.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CachedManifest {
    pub records: Vec<ManifestRecord>,
    /// Unix seconds of the last refresh attempt, successful or not.
    pub fetched_at: u64,
}

/// Host key-value persistence for cache entries. Entries are read and
/// written wholesale; a store never merges. Hosts backing this with their
/// own key-value storage should mark the entries as cache data that is not
/// preloaded on startup.
pub trait CacheStore {
    fn load(&self, category: Category) -> Option<CachedManifest>;
    fn store(&self, category: Category, entry: &CachedManifest);
}

/// Process-local store; the default when the host brings no persistence.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: Mutex<HashMap<Category, CachedManifest>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl CacheStore for MemoryStore {
    fn load(&self, category: Category) -> Option<CachedManifest> {
        self.entries.lock().unwrap().get(&category).cloned()
    }

    fn store(&self, category: Category, entry: &CachedManifest) {
        self.entries.lock().unwrap().insert(category, entry.clone());
    }
}

/// Write-through store backed by a single JSON document, so the CLI keeps
/// its TTL state between runs.
#[derive(Debug)]
pub struct JsonFileStore {
    path: PathBuf,
    entries: Mutex<HashMap<Category, CachedManifest>>,
}

impl JsonFileStore {
    /// Open a store, reading any existing document at `path`.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let path = path.into();

        let entries = match std::fs::read(&path) {
            Ok(data) => serde_json::from_slice(&data)?,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => HashMap::new(),
            Err(err) => return Err(err.into()),
        };

        Ok(Self {
            path,
            entries: Mutex::new(entries),
        })
    }

    fn persist(&self, entries: &HashMap<Category, CachedManifest>) -> Result<(), StoreError> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }

        let file = std::fs::File::create(&self.path)?;
        serde_json::to_writer_pretty(file, entries)?;

        Ok(())
    }
}

impl CacheStore for JsonFileStore {
    fn load(&self, category: Category) -> Option<CachedManifest> {
        self.entries.lock().unwrap().get(&category).cloned()
    }

    fn store(&self, category: Category, entry: &CachedManifest) {
        let mut entries = self.entries.lock().unwrap();
        entries.insert(category, entry.clone());

        // A failed write degrades to in-memory behavior for this run.
        if let Err(err) = self.persist(&entries) {
            tracing::error!(
                "failed to persist manifest cache to {}: {}",
                self.path.display(),
                err
            );
        }
    }
}
