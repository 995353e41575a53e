//! # Player Configuration
//!
//! Product/UX timing constants and endpoints for the orchestrator. The
//! numeric defaults reproduce the observed behavior of the existing player
//! exactly; changing them changes user-visible timing, so treat them as
//! behavioral contract values even though they are configurable.

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Playback orchestrator configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlayerConfig {
    /// Resolver endpoint queried with the track's page URL.
    #[serde(default = "default_resolve_endpoint")]
    pub resolve_endpoint: String,

    /// Always select widget mode regardless of platform heuristics.
    #[serde(default)]
    pub force_widget: bool,

    /// Additional attempts for the widget metadata query after the first
    /// empty result.
    ///
    /// Default: 5 (≈1.5 s total with the default interval).
    #[serde(default = "default_metadata_retry_attempts")]
    pub metadata_retry_attempts: u32,

    /// Interval between widget metadata query attempts.
    ///
    /// Default: 250 ms.
    #[serde(default = "default_metadata_retry_interval")]
    pub metadata_retry_interval: Duration,

    /// Backoff before retrying a fresh load after a transient widget
    /// initialization failure.
    ///
    /// Default: 120 ms.
    #[serde(default = "default_fresh_load_backoff")]
    pub fresh_load_backoff: Duration,

    /// Backoff before retrying a restore-path load.
    ///
    /// Default: 150 ms.
    #[serde(default = "default_restore_load_backoff")]
    pub restore_load_backoff: Duration,

    /// Delay between a finish event and loading the next track, giving the
    /// UI time to show the completion state.
    ///
    /// Default: 300 ms.
    #[serde(default = "default_advance_delay")]
    pub advance_delay: Duration,

    /// Poll interval while waiting for the chosen adapter's host to become
    /// available during restore. Unbounded: restoration must eventually
    /// succeed once the host initializes.
    ///
    /// Default: 300 ms.
    #[serde(default = "default_restore_poll_interval")]
    pub restore_poll_interval: Duration,

    /// Interval of the position/duration poll while playing.
    ///
    /// Default: 1 s.
    #[serde(default = "default_progress_poll_interval")]
    pub progress_poll_interval: Duration,

    /// Lower bound (exclusive) of the played-duration window that triggers
    /// the licensing notice on finish.
    ///
    /// Default: 5 s.
    #[serde(default = "default_notice_window_min")]
    pub notice_window_min: Duration,

    /// Upper bound (exclusive) of the licensing-notice window.
    ///
    /// Default: 32 s.
    #[serde(default = "default_notice_window_max")]
    pub notice_window_max: Duration,

    /// Well-known client-storage key for the playback snapshot.
    #[serde(default = "default_snapshot_key")]
    pub snapshot_key: String,

    /// Title shown when the widget never reports metadata.
    #[serde(default = "default_unknown_title")]
    pub unknown_title: String,

    /// Device pixel ratio at and above which the platform counts as
    /// high-density for backend selection.
    #[serde(default = "default_high_density_ratio")]
    pub high_density_ratio: f64,
}

impl Default for PlayerConfig {
    fn default() -> Self {
        Self {
            resolve_endpoint: default_resolve_endpoint(),
            force_widget: false,
            metadata_retry_attempts: default_metadata_retry_attempts(),
            metadata_retry_interval: default_metadata_retry_interval(),
            fresh_load_backoff: default_fresh_load_backoff(),
            restore_load_backoff: default_restore_load_backoff(),
            advance_delay: default_advance_delay(),
            restore_poll_interval: default_restore_poll_interval(),
            progress_poll_interval: default_progress_poll_interval(),
            notice_window_min: default_notice_window_min(),
            notice_window_max: default_notice_window_max(),
            snapshot_key: default_snapshot_key(),
            unknown_title: default_unknown_title(),
            high_density_ratio: default_high_density_ratio(),
        }
    }
}

impl PlayerConfig {
    /// Validate configuration values.
    pub fn validate(&self) -> Result<(), String> {
        if self.resolve_endpoint.is_empty() {
            return Err("resolve_endpoint must not be empty".to_string());
        }
        if self.snapshot_key.is_empty() {
            return Err("snapshot_key must not be empty".to_string());
        }
        if self.notice_window_min >= self.notice_window_max {
            return Err("notice_window_min must be below notice_window_max".to_string());
        }
        if self.progress_poll_interval.is_zero() {
            return Err("progress_poll_interval must be > 0".to_string());
        }
        if self.restore_poll_interval.is_zero() {
            return Err("restore_poll_interval must be > 0".to_string());
        }
        if self.metadata_retry_interval.is_zero() {
            return Err("metadata_retry_interval must be > 0".to_string());
        }
        Ok(())
    }
}

// ============================================================================
// Default Functions (for serde)
// ============================================================================

fn default_resolve_endpoint() -> String {
    "https://api-v2.soundcloud.com/resolve".to_string()
}

fn default_metadata_retry_attempts() -> u32 {
    5
}

fn default_metadata_retry_interval() -> Duration {
    Duration::from_millis(250)
}

fn default_fresh_load_backoff() -> Duration {
    Duration::from_millis(120)
}

fn default_restore_load_backoff() -> Duration {
    Duration::from_millis(150)
}

fn default_advance_delay() -> Duration {
    Duration::from_millis(300)
}

fn default_restore_poll_interval() -> Duration {
    Duration::from_millis(300)
}

fn default_progress_poll_interval() -> Duration {
    Duration::from_secs(1)
}

fn default_notice_window_min() -> Duration {
    Duration::from_secs(5)
}

fn default_notice_window_max() -> Duration {
    Duration::from_secs(32)
}

fn default_snapshot_key() -> String {
    "wavecore.playback.snapshot".to_string()
}

fn default_unknown_title() -> String {
    "Unknown title".to_string()
}

fn default_high_density_ratio() -> f64 {
    1.5
}
