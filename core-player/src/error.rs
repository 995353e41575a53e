//! # Player Error Types
//!
//! Error taxonomy for the playback orchestrator. Nothing here is fatal to the
//! host application: every failure path degrades to a retry, a backend
//! switch, a placeholder value, or a non-blocking notice.

use bridge_traits::BridgeError;
use thiserror::Error;

/// Errors that can occur during playback orchestration.
#[derive(Error, Debug)]
pub enum PlayerError {
    // ========================================================================
    // Stream Resolution
    // ========================================================================
    /// No client credential is configured, so the resolver cannot be called.
    #[error("No client credential configured")]
    CredentialMissing,

    /// A resolver or locator request failed (network error or non-success status).
    #[error("Stream resolution failed: {0}")]
    ResolveFailed(String),

    /// The resolver response listed no transcodings for the track.
    #[error("No transcodings available for track")]
    NoTranscodings,

    // ========================================================================
    // Adapters
    // ========================================================================
    /// The embedded widget library threw during creation. Observed transiently
    /// right after the frame is mounted; always retried with backoff.
    #[error("Widget initialization failed: {0}")]
    WidgetInit(String),

    /// Direct-mode playback cannot proceed; reload under widget mode with the
    /// original page URL. An internal signal, never user-facing.
    #[error("Direct playback requires widget fallback: {0}")]
    FallbackRequired(String),

    /// The widget's metadata query stayed empty past the retry ceiling.
    /// Degrades to a placeholder title, never fails the load.
    #[error("Track metadata unavailable after retries")]
    MetadataUnavailable,

    // ========================================================================
    // Persistence
    // ========================================================================
    /// The persisted snapshot was malformed or unreadable. Treated as "no
    /// saved state"; restore is silently skipped.
    #[error("Persisted snapshot unreadable: {0}")]
    PersistenceCorrupt(String),

    // ========================================================================
    // Generic
    // ========================================================================
    /// Playback could not be started after all fallbacks.
    #[error("Playback could not be started: {0}")]
    PlaybackFailed(String),

    /// Invalid configuration value.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Error surfaced by a host bridge.
    #[error("Bridge error: {0}")]
    Bridge(#[from] BridgeError),
}

impl PlayerError {
    /// Returns `true` if the error is transient and the operation should be
    /// retried with backoff rather than surfaced.
    pub fn is_transient(&self) -> bool {
        matches!(self, PlayerError::WidgetInit(_))
    }

    /// Returns `true` if the error means "destroy the direct adapter and
    /// retry under widget mode with the original page URL".
    pub fn triggers_widget_fallback(&self) -> bool {
        matches!(
            self,
            PlayerError::FallbackRequired(_)
                | PlayerError::ResolveFailed(_)
                | PlayerError::NoTranscodings
                | PlayerError::CredentialMissing
        )
    }

    /// Returns `true` if the error degrades to a placeholder value instead of
    /// failing the operation.
    pub fn degrades_to_placeholder(&self) -> bool {
        matches!(self, PlayerError::MetadataUnavailable)
    }
}

/// Result type for playback operations.
pub type Result<T> = std::result::Result<T, PlayerError>;
