//! Snapshot Storage as Data-Dir Files

use async_trait::async_trait;
use bridge_traits::{
    error::{BridgeError, Result},
    storage::SnapshotStore,
};
use std::path::PathBuf;
use tracing::debug;

/// File-backed snapshot store
///
/// One file per key under a base directory, mirroring the last-write-wins
/// semantics of web client storage. Keys are sanitized into file names, so
/// any well-known key the core uses maps to a stable path.
pub struct FileSnapshotStore {
    base_dir: PathBuf,
}

impl FileSnapshotStore {
    /// Create a store rooted at the given directory. The directory is
    /// created lazily on first write.
    pub fn new(base_dir: PathBuf) -> Self {
        Self { base_dir }
    }

    /// Create a store under the platform data directory, namespaced by
    /// `app_name`.
    ///
    /// # Errors
    ///
    /// Fails when the platform reports no data directory.
    pub fn in_data_dir(app_name: &str) -> Result<Self> {
        let base = dirs::data_dir()
            .ok_or_else(|| BridgeError::NotAvailable("no platform data directory".to_string()))?;
        Ok(Self::new(base.join(app_name)))
    }

    fn path_for(&self, key: &str) -> PathBuf {
        // Keys may contain dots and separators; keep them readable but safe.
        let sanitized: String = key
            .chars()
            .map(|c| {
                if c.is_ascii_alphanumeric() || c == '.' || c == '-' || c == '_' {
                    c
                } else {
                    '_'
                }
            })
            .collect();
        self.base_dir.join(format!("{sanitized}.json"))
    }
}

#[async_trait]
impl SnapshotStore for FileSnapshotStore {
    async fn get(&self, key: &str) -> Result<Option<String>> {
        match tokio::fs::read_to_string(self.path_for(key)).await {
            Ok(value) => Ok(Some(value)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(BridgeError::Io(e)),
        }
    }

    async fn set(&self, key: &str, value: &str) -> Result<()> {
        tokio::fs::create_dir_all(&self.base_dir)
            .await
            .map_err(BridgeError::Io)?;
        let path = self.path_for(key);
        tokio::fs::write(&path, value).await.map_err(BridgeError::Io)?;
        debug!(?path, bytes = value.len(), "Snapshot written");
        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<()> {
        match tokio::fs::remove_file(self.path_for(key)).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(BridgeError::Io(e)),
        }
    }
}
