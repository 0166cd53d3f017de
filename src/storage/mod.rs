// zentic-service/src/storage/mod.rs
//
// Durable key-value store contract. Collections map to directories, keys
// to JSON files; `scan` returns entries in key order. The core never
// retries a failed store call; `StoreUnavailable` surfaces to the caller.
use crate::models::ServiceError;
use log::error;
use std::collections::HashMap;
use std::fs;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};

pub const USERS: &str = "users";
pub const TEAMS: &str = "teams";

// Per-team message log collection name.
pub fn message_collection(team_id: &str) -> String {
    format!("messages:{}", team_id)
}

pub trait Store: Send + Sync {
    fn get(&self, collection: &str, key: &str) -> Result<Option<Vec<u8>>, ServiceError>;
    fn put(&self, collection: &str, key: &str, bytes: &[u8]) -> Result<(), ServiceError>;
    fn scan(&self, collection: &str) -> Result<Vec<(String, Vec<u8>)>, ServiceError>;

    // Highest key in a collection, if any. Backends override this when
    // they can answer without loading entry contents.
    fn last_key(&self, collection: &str) -> Result<Option<String>, ServiceError> {
        Ok(self.scan(collection)?.pop().map(|(key, _)| key))
    }
}

// Serializes read-modify-write sequences on the same (collection, key).
// Mutations on different keys proceed in parallel; two concurrent
// mutations of the same team must not lose an update.
pub struct KeyLockRegistry {
    locks: Mutex<HashMap<String, Arc<Mutex<()>>>>,
}

impl KeyLockRegistry {
    pub fn new() -> Self {
        Self {
            locks: Mutex::new(HashMap::new()),
        }
    }

    // Hand out the lock guarding one store key. Callers hold the inner
    // guard for the whole read-modify-write sequence.
    pub fn lock_for(&self, collection: &str, key: &str) -> Result<Arc<Mutex<()>>, ServiceError> {
        let mut locks = self.locks.lock().map_err(|e| {
            error!("Key lock registry poisoned: {:?}", e);
            ServiceError::Internal
        })?;

        let entry = locks
            .entry(format!("{}/{}", collection, key))
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .clone();

        Ok(entry)
    }
}

impl Default for KeyLockRegistry {
    fn default() -> Self {
        Self::new()
    }
}

// File-backed store: <root>/<collection>/<key>.json
pub struct FileStore {
    root: PathBuf,
}

impl FileStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    fn collection_dir(&self, collection: &str) -> PathBuf {
        self.root.join(collection)
    }

    fn entry_path(&self, collection: &str, key: &str) -> PathBuf {
        self.collection_dir(collection).join(format!("{}.json", key))
    }
}

impl Store for FileStore {
    fn get(&self, collection: &str, key: &str) -> Result<Option<Vec<u8>>, ServiceError> {
        let path = self.entry_path(collection, key);

        if !path.exists() {
            return Ok(None);
        }

        fs::read(&path).map(Some).map_err(|e| {
            error!("Failed to read store entry {:?}: {:?}", path, e);
            ServiceError::StoreUnavailable
        })
    }

    fn put(&self, collection: &str, key: &str, bytes: &[u8]) -> Result<(), ServiceError> {
        let dir = self.collection_dir(collection);

        if !dir.exists() {
            fs::create_dir_all(&dir).map_err(|e| {
                error!("Failed to create collection directory {:?}: {:?}", dir, e);
                ServiceError::StoreUnavailable
            })?;
        }

        let path = self.entry_path(collection, key);
        fs::write(&path, bytes).map_err(|e| {
            error!("Failed to write store entry {:?}: {:?}", path, e);
            ServiceError::StoreUnavailable
        })
    }

    fn scan(&self, collection: &str) -> Result<Vec<(String, Vec<u8>)>, ServiceError> {
        let dir = self.collection_dir(collection);

        if !dir.exists() {
            return Ok(Vec::new());
        }

        let mut entries = Vec::new();

        for entry_result in fs::read_dir(&dir).map_err(|e| {
            error!("Failed to read collection directory {:?}: {:?}", dir, e);
            ServiceError::StoreUnavailable
        })? {
            let entry = entry_result.map_err(|e| {
                error!("Failed to read directory entry: {:?}", e);
                ServiceError::StoreUnavailable
            })?;

            let path = entry.path();
            if !path.is_file() || path.extension().map_or(true, |ext| ext != "json") {
                continue;
            }

            let key = match path.file_stem().and_then(|s| s.to_str()) {
                Some(stem) => stem.to_string(),
                None => continue,
            };

            let bytes = fs::read(&path).map_err(|e| {
                error!("Failed to read store entry {:?}: {:?}", path, e);
                ServiceError::StoreUnavailable
            })?;

            entries.push((key, bytes));
        }

        entries.sort_by(|a, b| a.0.cmp(&b.0));

        Ok(entries)
    }

    // Directory listing only; entry contents stay on disk.
    fn last_key(&self, collection: &str) -> Result<Option<String>, ServiceError> {
        let dir = self.collection_dir(collection);

        if !dir.exists() {
            return Ok(None);
        }

        let mut last: Option<String> = None;

        for entry_result in fs::read_dir(&dir).map_err(|e| {
            error!("Failed to read collection directory {:?}: {:?}", dir, e);
            ServiceError::StoreUnavailable
        })? {
            let entry = entry_result.map_err(|e| {
                error!("Failed to read directory entry: {:?}", e);
                ServiceError::StoreUnavailable
            })?;

            let path = entry.path();
            if !path.is_file() || path.extension().map_or(true, |ext| ext != "json") {
                continue;
            }

            if let Some(key) = path.file_stem().and_then(|s| s.to_str()) {
                if last.as_deref().map_or(true, |seen| key > seen) {
                    last = Some(key.to_string());
                }
            }
        }

        Ok(last)
    }
}
