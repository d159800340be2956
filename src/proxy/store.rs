use std::collections::HashMap;

use tokio::sync::RwLock;

/// Asset id → posted payload.
///
/// Process-local and unbounded: entries live until the process exits.
#[derive(Debug, Default)]
pub struct DataStore {
    entries: RwLock<HashMap<String, String>>,
}

impl DataStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the payload previously stored under `handle`, if any.
    pub async fn insert(&self, handle: String, data: String) -> Option<String> {
        self.entries.write().await.insert(handle, data)
    }

    pub async fn get(&self, handle: &str) -> Option<String> {
        self.entries.read().await.get(handle).cloned()
    }

    /// Number of stored payloads.
    pub(crate) async fn len(&self) -> usize {
        self.entries.read().await.len()
    }
}
