// Shared test fixtures: throwaway file stores rooted under ./storage,
// removed when the fixture drops.
use crate::models::{ServiceError, User};
use crate::services::assistant::UnconfiguredBackend;
use crate::services::identity;
use crate::state::AppState;
use crate::storage::{FileStore, Store, TEAMS};
use actix_web::web;
use std::fs;
use std::path::PathBuf;
use std::sync::Arc;
use uuid::Uuid;

pub struct TestStore {
    pub store: FileStore,
    root: PathBuf,
}

impl TestStore {
    pub fn new() -> Self {
        let root = PathBuf::from(format!("./storage/test_{}", Uuid::new_v4()));
        fs::create_dir_all(&root).unwrap();
        Self {
            store: FileStore::new(root.clone()),
            root,
        }
    }
}

impl Drop for TestStore {
    fn drop(&mut self) {
        let _ = fs::remove_dir_all(&self.root);
    }
}

// Full application state over a throwaway store, for route-level tests.
pub struct TestState {
    pub data: web::Data<AppState>,
    root: PathBuf,
}

impl TestState {
    pub fn new() -> Self {
        let root = PathBuf::from(format!("./storage/test_{}", Uuid::new_v4()));
        fs::create_dir_all(&root).unwrap();
        let data = web::Data::new(AppState::new(
            root.to_str().unwrap(),
            Arc::new(UnconfiguredBackend),
        ));
        Self { data, root }
    }
}

impl Drop for TestState {
    fn drop(&mut self) {
        let _ = fs::remove_dir_all(&self.root);
    }
}

// A store whose team index scan fails, for exercising the paths that
// must surface storage failures instead of swallowing them.
pub struct BrokenTeamScanStore {
    inner: FileStore,
    root: PathBuf,
}

impl BrokenTeamScanStore {
    pub fn new() -> Self {
        let root = PathBuf::from(format!("./storage/test_{}", Uuid::new_v4()));
        fs::create_dir_all(&root).unwrap();
        Self {
            inner: FileStore::new(root.clone()),
            root,
        }
    }

    pub fn inner(&self) -> &FileStore {
        &self.inner
    }
}

impl Store for BrokenTeamScanStore {
    fn get(&self, collection: &str, key: &str) -> Result<Option<Vec<u8>>, ServiceError> {
        self.inner.get(collection, key)
    }

    fn put(&self, collection: &str, key: &str, bytes: &[u8]) -> Result<(), ServiceError> {
        self.inner.put(collection, key, bytes)
    }

    fn scan(&self, collection: &str) -> Result<Vec<(String, Vec<u8>)>, ServiceError> {
        if collection == TEAMS {
            return Err(ServiceError::StoreUnavailable);
        }
        self.inner.scan(collection)
    }
}

impl Drop for BrokenTeamScanStore {
    fn drop(&mut self) {
        let _ = fs::remove_dir_all(&self.root);
    }
}

pub fn register_user(store: &FileStore, name: &str) -> User {
    identity::register(
        store,
        name,
        &format!("{}@example.com", name.to_lowercase()),
        "secret99",
    )
    .unwrap()
}
