// zentic-service/src/state.rs
use crate::services::assistant::CompletionBackend;
use crate::services::messaging::MessageHub;
use crate::storage::{FileStore, KeyLockRegistry, Store};
use std::sync::Arc;

// Shared application state handed to every handler. The store and the
// key-lock registry travel together: every mutation goes through both.
pub struct AppState {
    pub store: Arc<dyn Store>,
    pub locks: Arc<KeyLockRegistry>,
    pub hub: MessageHub,
    pub assistant: Arc<dyn CompletionBackend>,
}

impl AppState {
    pub fn new(storage_root: &str, assistant: Arc<dyn CompletionBackend>) -> Self {
        Self {
            store: Arc::new(FileStore::new(storage_root)),
            locks: Arc::new(KeyLockRegistry::new()),
            hub: MessageHub::new(),
            assistant,
        }
    }
}
