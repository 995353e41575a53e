//! # Direct Adapter
//!
//! Drives a native media element fed a resolved stream URL. Any media error,
//! and any autoplay rejection while the stream is HLS, is reported as a
//! fallback event; the controller responds by destroying this adapter and
//! reloading under widget mode with the original page URL. Playback must
//! never be left silently stuck in direct mode.

use std::sync::{Arc, Mutex};
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use bridge_traits::{BridgeError, MediaElementHost, MediaEvent};
use tokio::sync::mpsc::{self, UnboundedSender};
use tokio::task::JoinHandle;
use tracing::debug;

use crate::adapter::{AdapterEvent, AdapterMetadata, LoadRequest, PlayerAdapter};
use crate::backend::Backend;
use crate::error::{PlayerError, Result};

pub struct DirectAdapter {
    host: Arc<dyn MediaElementHost>,
    /// Display metadata from the resolve step, available without waiting for
    /// playback to start.
    metadata: AdapterMetadata,
    is_hls: AtomicBool,
    events: Mutex<Option<UnboundedSender<AdapterEvent>>>,
    forwarder: Mutex<Option<JoinHandle<()>>>,
}

impl DirectAdapter {
    pub fn new(host: Arc<dyn MediaElementHost>, metadata: AdapterMetadata) -> Self {
        Self {
            host,
            metadata,
            is_hls: AtomicBool::new(false),
            events: Mutex::new(None),
            forwarder: Mutex::new(None),
        }
    }

    fn stop_forwarder(&self) {
        if let Some(handle) = self.forwarder.lock().unwrap().take() {
            handle.abort();
        }
    }

    fn emit(&self, event: AdapterEvent) {
        if let Some(tx) = self.events.lock().unwrap().as_ref() {
            let _ = tx.send(event);
        }
    }
}

#[async_trait]
impl PlayerAdapter for DirectAdapter {
    fn kind(&self) -> Backend {
        Backend::Direct
    }

    fn bind_events(&self, tx: UnboundedSender<AdapterEvent>) -> Result<()> {
        let _ = self.host.unbind();
        self.stop_forwarder();

        let (media_tx, mut media_rx) = mpsc::unbounded_channel();
        self.host.bind(media_tx)?;

        let forward = tx.clone();
        let handle = tokio::spawn(async move {
            while let Some(event) = media_rx.recv().await {
                let mapped = match event {
                    MediaEvent::CanPlay => AdapterEvent::Ready,
                    MediaEvent::Playing => AdapterEvent::Play,
                    MediaEvent::Pause => AdapterEvent::Pause,
                    MediaEvent::Ended => AdapterEvent::Finish,
                    MediaEvent::Error { message } => AdapterEvent::Fallback {
                        reason: format!("media error: {message}"),
                    },
                };
                if forward.send(mapped).is_err() {
                    break;
                }
            }
        });
        *self.forwarder.lock().unwrap() = Some(handle);
        *self.events.lock().unwrap() = Some(tx);
        Ok(())
    }

    async fn load(&self, request: &LoadRequest) -> Result<()> {
        let stream = request.stream.as_ref().ok_or_else(|| {
            PlayerError::FallbackRequired("direct load without a resolved stream".to_string())
        })?;
        self.is_hls.store(stream.is_hls, Ordering::Relaxed);
        self.host
            .set_source(&stream.url)
            .await
            .map_err(|e| PlayerError::FallbackRequired(format!("source attach failed: {e}")))?;
        debug!(is_hls = stream.is_hls, "Direct load started");
        Ok(())
    }

    fn teardown(&self) {
        let _ = self.host.unbind();
        let _ = self.host.clear_source();
        self.stop_forwarder();
        *self.events.lock().unwrap() = None;
    }

    async fn play(&self) {
        match self.host.play().await {
            Ok(()) => {}
            Err(BridgeError::NotPermitted(reason)) => {
                if self.is_hls.load(Ordering::Relaxed) {
                    // HLS streams need autoplay for segment scheduling, so a
                    // rejection here means direct mode cannot proceed at all.
                    self.emit(AdapterEvent::Fallback {
                        reason: format!("autoplay rejected on hls stream: {reason}"),
                    });
                } else {
                    // Progressive streams stay loaded and paused; the user's
                    // next explicit toggle counts as a gesture and succeeds.
                    debug!(%reason, "Autoplay rejected, staying paused");
                    self.emit(AdapterEvent::Pause);
                }
            }
            Err(e) => debug!(error = %e, "Media play command failed"),
        }
    }

    async fn pause(&self) {
        if let Err(e) = self.host.pause().await {
            debug!(error = %e, "Media pause command failed");
        }
    }

    async fn seek_to(&self, position_ms: u64) {
        if let Err(e) = self.host.set_current_time(position_ms).await {
            debug!(error = %e, "Media seek command failed");
        }
    }

    async fn set_volume(&self, percent: f32) {
        if let Err(e) = self.host.set_volume(percent).await {
            debug!(error = %e, "Media volume command failed");
        }
    }

    async fn position_ms(&self) -> u64 {
        self.host.position_ms().await.unwrap_or(0)
    }

    async fn duration_ms(&self) -> u64 {
        self.host.duration_ms().await.unwrap_or(0)
    }

    async fn metadata(&self) -> Option<AdapterMetadata> {
        if self.metadata.title.is_some() || self.metadata.artist.is_some() {
            Some(self.metadata.clone())
        } else {
            None
        }
    }
}
