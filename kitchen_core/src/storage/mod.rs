//! Persistence of the catalog, history and ledger in a key-value blob store.
//!
//! Each piece lives under its own key as a JSON array. Loading never fails:
//! a missing or corrupt blob falls back to the default for that key.

use kitchen_rules::{Catalog, Rule};
use serde::de::DeserializeOwned;
use std::collections::HashMap;
use std::path::{Path, PathBuf};

use crate::error::StorageError;
use crate::history::History;

pub const CATALOG_KEY: &str = "discovered_ingredients";
pub const HISTORY_KEY: &str = "discovery_history";
pub const RULES_KEY: &str = "custom_recipes";

/// Opaque string storage addressed by key.
pub trait BlobStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;
    fn put(&mut self, key: &str, value: &str) -> Result<(), StorageError>;
}

/// In-process store, handy for tests and ephemeral sessions.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    blobs: HashMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl BlobStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.blobs.get(key).cloned())
    }

    fn put(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        self.blobs.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

/// One `<key>.json` file per key inside a directory.
#[derive(Debug, Clone)]
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    /// The directory is created on first write.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{}.json", key))
    }
}

impl BlobStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        match std::fs::read_to_string(self.path_for(key)) {
            Ok(contents) => Ok(Some(contents)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn put(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        std::fs::create_dir_all(&self.dir)?;
        std::fs::write(self.path_for(key), value)?;
        Ok(())
    }
}

/// Everything a session restores at start-up.
#[derive(Debug, Clone)]
pub struct SavedState {
    pub catalog: Catalog,
    pub history: History,
    pub rules: Vec<Rule>,
}

impl Default for SavedState {
    fn default() -> Self {
        Self {
            catalog: Catalog::seeded(),
            history: History::new(),
            rules: Vec::new(),
        }
    }
}

/// Load each key independently, substituting defaults where needed.
pub fn load_state<S: BlobStore>(store: &S) -> SavedState {
    SavedState {
        catalog: load_key(store, CATALOG_KEY).unwrap_or_else(Catalog::seeded),
        history: load_key(store, HISTORY_KEY).unwrap_or_default(),
        rules: load_key(store, RULES_KEY).unwrap_or_default(),
    }
}

/// Write all three keys.
pub fn save_state<S: BlobStore>(
    store: &mut S,
    catalog: &Catalog,
    history: &History,
    rules: &[Rule],
) -> Result<(), StorageError> {
    store.put(CATALOG_KEY, &serde_json::to_string(catalog)?)?;
    store.put(HISTORY_KEY, &serde_json::to_string(history)?)?;
    store.put(RULES_KEY, &serde_json::to_string(rules)?)?;
    Ok(())
}

fn load_key<S: BlobStore, T: DeserializeOwned>(store: &S, key: &str) -> Option<T> {
    let blob = match store.get(key) {
        Ok(Some(blob)) => blob,
        Ok(None) => return None,
        Err(e) => {
            tracing::warn!(key, error = %e, "could not read saved state, using defaults");
            return None;
        }
    };

    match serde_json::from_str(&blob) {
        Ok(value) => Some(value),
        Err(e) => {
            tracing::warn!(key, error = %e, "saved state is corrupt, using defaults");
            None
        }
    }
}
