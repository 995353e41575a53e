//! # Playback Adapters
//!
//! One adapter interface over both backends so the state machine can drive
//! either without caring which is live. Exactly one adapter exists at a time;
//! the controller tears the previous one down (synchronously) before creating
//! the next.
//!
//! Commands are advisory: adapters swallow command failures at the call site
//! and the controller confirms state through [`AdapterEvent`]s instead of
//! return values. The one exception is [`PlayerAdapter::load`], whose error
//! drives the retry/fallback policy.

mod direct;
mod widget;

pub use direct::DirectAdapter;
pub use widget::WidgetAdapter;

use async_trait::async_trait;
use tokio::sync::mpsc::UnboundedSender;

use crate::backend::Backend;
use crate::error::Result;
use crate::resolver::ResolvedStream;

/// Backend-agnostic playback events, forwarded to the controller loop.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AdapterEvent {
    /// The adapter finished loading and the track can be played.
    Ready,
    Play,
    Pause,
    /// The current track played to its end.
    Finish,
    /// Direct playback cannot proceed; reload under widget mode with the
    /// original page URL.
    Fallback { reason: String },
}

/// What to load, shared by both adapters. Widget loads go through the page
/// URL; direct loads additionally carry the resolved stream.
#[derive(Debug, Clone)]
pub struct LoadRequest {
    pub page_url: String,
    pub stream: Option<ResolvedStream>,
    pub resume_ms: u64,
    pub autostart: bool,
}

/// Display metadata for the loaded track, as far as the backend knows it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AdapterMetadata {
    pub title: Option<String>,
    pub artist: Option<String>,
}

/// The playback surface the state machine drives.
///
/// `bind_events` must be called before `load` so events fired during loading
/// are not lost. `teardown` is synchronous and infallible so the controller
/// can destroy an adapter without a suspension point between unbinding and
/// dropping the reference.
#[async_trait]
pub trait PlayerAdapter: Send + Sync {
    fn kind(&self) -> Backend;

    /// Route events to `tx`, replacing any previous binding.
    fn bind_events(&self, tx: UnboundedSender<AdapterEvent>) -> Result<()>;

    /// Begin loading the requested track.
    ///
    /// # Errors
    ///
    /// Widget adapters fail with [`crate::PlayerError::WidgetInit`] on the
    /// transient creation failure (retried with backoff by the controller);
    /// direct adapters fail with [`crate::PlayerError::FallbackRequired`]
    /// when the stream cannot be attached.
    async fn load(&self, request: &LoadRequest) -> Result<()>;

    /// Unbind events and release the backend. Best-effort, never fails.
    fn teardown(&self);

    async fn play(&self);

    async fn pause(&self);

    async fn seek_to(&self, position_ms: u64);

    /// Volume as a percentage in `0..=100`.
    async fn set_volume(&self, percent: f32);

    /// Current position, 0 when the backend cannot answer.
    async fn position_ms(&self) -> u64;

    /// Known duration, 0 when the backend cannot answer.
    async fn duration_ms(&self) -> u64;

    /// Display metadata, retried internally where the backend reports it
    /// asynchronously. `None` when nothing usable arrived.
    async fn metadata(&self) -> Option<AdapterMetadata>;
}
