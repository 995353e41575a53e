//! Native Media Element Surface
//!
//! Wraps the host's native media element for direct-mode playback, mirroring
//! the event surface of the embedded widget so the core can drive either
//! backend through one adapter interface.

use async_trait::async_trait;
use tokio::sync::mpsc::UnboundedSender;

use crate::error::Result;

/// Events emitted by the native media element.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MediaEvent {
    /// Enough data is buffered for playback to begin.
    CanPlay,
    Playing,
    Pause,
    /// Playback reached the end of the stream.
    Ended,
    /// The element failed to load or decode the source.
    Error { message: String },
}

/// Host surface for the native media element.
///
/// Event binding is synchronous for the same reason as on
/// [`WidgetHost`](crate::widget::WidgetHost): teardown must be able to
/// unbind and clear the source without an intervening suspension point.
/// Autoplay rejections surface as
/// [`BridgeError::NotPermitted`](crate::error::BridgeError::NotPermitted)
/// from [`MediaElementHost::play`].
#[async_trait]
pub trait MediaElementHost: Send + Sync {
    /// Whether a media element can currently be driven.
    fn is_available(&self) -> bool;

    /// Register the event handler set, replacing any existing one.
    fn bind(&self, tx: UnboundedSender<MediaEvent>) -> Result<()>;

    /// Remove the event handler set. Best-effort.
    fn unbind(&self) -> Result<()>;

    /// Detach the current media source. Best-effort, synchronous so it can
    /// run inside a teardown sequence.
    fn clear_source(&self) -> Result<()>;

    /// Point the element at a resolved media URL and begin buffering.
    async fn set_source(&self, url: &str) -> Result<()>;

    /// Start playback.
    ///
    /// # Errors
    ///
    /// Returns [`BridgeError::NotPermitted`](crate::error::BridgeError::NotPermitted)
    /// when the environment rejects autoplay.
    async fn play(&self) -> Result<()>;

    async fn pause(&self) -> Result<()>;

    async fn set_current_time(&self, position_ms: u64) -> Result<()>;

    /// Set volume as a percentage in `0..=100`.
    async fn set_volume(&self, percent: f32) -> Result<()>;

    async fn position_ms(&self) -> Result<u64>;

    async fn duration_ms(&self) -> Result<u64>;
}
