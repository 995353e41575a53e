//! Client-Local Snapshot Storage
//!
//! Key-value string storage surviving full page reloads (localStorage on the
//! web, a data-dir file on native hosts). The playback core stores exactly
//! one value under a well-known key, last-write-wins, no versioning.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Mutex;

use crate::error::Result;

/// Persistent string storage keyed by name.
#[async_trait]
pub trait SnapshotStore: Send + Sync {
    /// Retrieve a value. Returns `Ok(None)` when the key is absent.
    async fn get(&self, key: &str) -> Result<Option<String>>;

    /// Store a value, overwriting any previous one.
    async fn set(&self, key: &str, value: &str) -> Result<()>;

    /// Delete a value. Absent keys are not an error.
    async fn remove(&self, key: &str) -> Result<()>;
}

/// In-memory store for tests and short-lived hosts.
#[derive(Debug, Default)]
pub struct MemorySnapshotStore {
    values: Mutex<HashMap<String, String>>,
}

impl MemorySnapshotStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl SnapshotStore for MemorySnapshotStore {
    async fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.values.lock().unwrap().get(key).cloned())
    }

    async fn set(&self, key: &str, value: &str) -> Result<()> {
        self.values
            .lock()
            .unwrap()
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<()> {
        self.values.lock().unwrap().remove(key);
        Ok(())
    }
}
