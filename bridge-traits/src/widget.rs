//! Embedded Widget Surface
//!
//! Wraps the third-party embeddable player bound to a frame-like container.
//! The underlying library is loaded asynchronously by the host page and is
//! known to throw transiently right after the frame is mounted; callers are
//! expected to retry [`WidgetHost::create`] after a short backoff instead of
//! treating the failure as fatal.
//!
//! Commands (`play`, `pause`, `seek_to`, `set_volume`) are advisory: the
//! widget confirms state through its events, not through return values, so
//! the core swallows command failures at the call site.

use async_trait::async_trait;
use tokio::sync::mpsc::UnboundedSender;

use crate::error::Result;

/// Events emitted by the embedded widget.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WidgetEvent {
    /// Widget finished initializing and the track is ready to play.
    Ready,
    Play,
    Pause,
    /// The current track played to its end.
    Finish,
}

impl WidgetEvent {
    /// All event kinds, in the order handlers are (re)bound.
    pub const ALL: [WidgetEvent; 4] = [
        WidgetEvent::Ready,
        WidgetEvent::Play,
        WidgetEvent::Pause,
        WidgetEvent::Finish,
    ];
}

/// Metadata reported by the widget for the currently loaded track.
///
/// The widget's metadata query frequently returns an empty result immediately
/// after load; [`WidgetSound::is_empty`] detects that case so callers can
/// retry.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WidgetSound {
    pub title: Option<String>,
    pub artist: Option<String>,
}

impl WidgetSound {
    pub fn is_empty(&self) -> bool {
        self.title.as_deref().map_or(true, str::is_empty)
    }
}

/// Host surface for the embedded third-party player.
///
/// Mirrors the widget library's own verb set (`bind`/`unbind`, `play`,
/// `pause`, `seekTo`, `setVolume`, `getDuration`, `getPosition`,
/// `getCurrentSound`, `isPaused`) with callback-style queries flattened into
/// async methods.
///
/// # Frame lifecycle
///
/// The underlying widget cannot be safely reused after certain transitions,
/// so the frame element is destroyed and recreated before each load:
/// [`WidgetHost::reset_frame`] replaces the element at the same mount point,
/// appending to the document body as a last resort when no parent element is
/// available. A frame is never silently dropped.
///
/// # Event binding
///
/// `bind` and `unbind` are synchronous so the core can guarantee that no
/// event is delivered after teardown: unbinding happens before the adapter
/// reference is cleared, with no suspension point in between.
#[async_trait]
pub trait WidgetHost: Send + Sync {
    /// Whether the underlying widget library has finished loading.
    fn is_available(&self) -> bool;

    /// Destroy the current frame element and mount a fresh one.
    async fn reset_frame(&self) -> Result<()>;

    /// Instantiate the widget against the current frame and begin loading the
    /// track behind `page_url`.
    ///
    /// # Errors
    ///
    /// Fails transiently right after the frame is mounted; callers retry
    /// after a short delay rather than propagate.
    async fn create(&self, page_url: &str) -> Result<()>;

    /// Register a handler for `event`, replacing any existing one.
    fn bind(&self, event: WidgetEvent, tx: UnboundedSender<WidgetEvent>) -> Result<()>;

    /// Remove the handler for `event`. Best-effort: the widget may already be
    /// torn down.
    fn unbind(&self, event: WidgetEvent) -> Result<()>;

    /// Tear down the current frame element. Best-effort.
    fn destroy_frame(&self) -> Result<()>;

    async fn play(&self) -> Result<()>;

    async fn pause(&self) -> Result<()>;

    async fn seek_to(&self, position_ms: u64) -> Result<()>;

    /// Set volume as a percentage in `0..=100`.
    async fn set_volume(&self, percent: f32) -> Result<()>;

    async fn duration_ms(&self) -> Result<u64>;

    async fn position_ms(&self) -> Result<u64>;

    /// Query metadata for the loaded track. May legitimately return an empty
    /// [`WidgetSound`] shortly after load.
    async fn current_sound(&self) -> Result<WidgetSound>;

    async fn is_paused(&self) -> Result<bool>;
}
