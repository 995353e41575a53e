//! # Playback Snapshot Persistence
//!
//! Best-effort persistence of "what was playing and where" across host
//! restarts and page navigations. One JSON value under a well-known key,
//! last write wins. Persistence failures never interrupt playback, and a
//! snapshot that cannot be read is treated the same as no snapshot at all.

use std::sync::Arc;

use bridge_traits::SnapshotStore;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

/// Persisted playback state.
///
/// Every field defaults independently so snapshots written by older builds
/// still deserialize.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct PlaybackSnapshot {
    /// Service-assigned id of the persisted track, empty when unknown.
    #[serde(default)]
    pub track_id: String,
    /// Page URL of the persisted track. A snapshot without one cannot be
    /// restored and is discarded on load.
    #[serde(default)]
    pub track_url: String,
    /// Last observed position in milliseconds.
    #[serde(default)]
    pub position_ms: u64,
    /// Last observed duration in milliseconds, 0 when unknown.
    #[serde(default)]
    pub duration_ms: u64,
    /// Whether playback was running when the snapshot was written.
    #[serde(default)]
    pub is_playing: bool,
    /// `true` when the snapshot was written under widget mode. Restore uses
    /// this to wait for the right host before reloading.
    #[serde(default)]
    pub api_mode: bool,
}

impl PlaybackSnapshot {
    /// Position clamped into the known duration. Positions past the end come
    /// from polls racing a finish event and would otherwise seek past EOF on
    /// restore.
    pub fn clamped_position_ms(&self) -> u64 {
        if self.duration_ms > 0 {
            self.position_ms.min(self.duration_ms)
        } else {
            self.position_ms
        }
    }
}

/// Saves and loads the playback snapshot through a [`SnapshotStore`].
#[derive(Clone)]
pub struct SnapshotPersistence {
    store: Arc<dyn SnapshotStore>,
    key: String,
}

impl SnapshotPersistence {
    pub fn new(store: Arc<dyn SnapshotStore>, key: impl Into<String>) -> Self {
        Self {
            store,
            key: key.into(),
        }
    }

    /// Write the snapshot. Failures are logged and swallowed.
    pub async fn save(&self, snapshot: &PlaybackSnapshot) {
        let json = match serde_json::to_string(snapshot) {
            Ok(json) => json,
            Err(e) => {
                warn!(error = %e, "Failed to serialize playback snapshot");
                return;
            }
        };
        if let Err(e) = self.store.set(&self.key, &json).await {
            warn!(error = %e, "Failed to persist playback snapshot");
        }
    }

    /// Read the snapshot. Returns `None` when the key is absent, the value is
    /// malformed, or the snapshot carries no track URL.
    pub async fn load(&self) -> Option<PlaybackSnapshot> {
        let raw = match self.store.get(&self.key).await {
            Ok(Some(raw)) => raw,
            Ok(None) => return None,
            Err(e) => {
                warn!(error = %e, "Failed to read playback snapshot");
                return None;
            }
        };
        let snapshot: PlaybackSnapshot = match serde_json::from_str(&raw) {
            Ok(snapshot) => snapshot,
            Err(e) => {
                warn!(error = %e, "Discarding malformed playback snapshot");
                return None;
            }
        };
        if snapshot.track_url.is_empty() {
            debug!("Discarding playback snapshot without a track URL");
            return None;
        }
        Some(snapshot)
    }

    /// Delete the snapshot. Failures are logged and swallowed.
    pub async fn clear(&self) {
        if let Err(e) = self.store.remove(&self.key).await {
            warn!(error = %e, "Failed to clear playback snapshot");
        }
    }
}
