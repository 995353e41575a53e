//! # Widget Adapter
//!
//! Drives the embedded third-party player through [`WidgetHost`]. The frame
//! is destroyed and recreated on every load because the underlying widget
//! cannot be safely reused after certain transitions.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use bridge_traits::{WidgetEvent, WidgetHost};
use tokio::sync::mpsc::{self, UnboundedSender};
use tokio::task::JoinHandle;
use tracing::debug;

use crate::adapter::{AdapterEvent, AdapterMetadata, LoadRequest, PlayerAdapter};
use crate::backend::Backend;
use crate::error::{PlayerError, Result};
use crate::retry::{poll_until, RetryPlan};

pub struct WidgetAdapter {
    host: Arc<dyn WidgetHost>,
    metadata_plan: RetryPlan,
    forwarder: Mutex<Option<JoinHandle<()>>>,
}

impl WidgetAdapter {
    pub fn new(host: Arc<dyn WidgetHost>, metadata_plan: RetryPlan) -> Self {
        Self {
            host,
            metadata_plan,
            forwarder: Mutex::new(None),
        }
    }

    fn stop_forwarder(&self) {
        if let Some(handle) = self.forwarder.lock().unwrap().take() {
            handle.abort();
        }
    }
}

#[async_trait]
impl PlayerAdapter for WidgetAdapter {
    fn kind(&self) -> Backend {
        Backend::Widget
    }

    fn bind_events(&self, tx: UnboundedSender<AdapterEvent>) -> Result<()> {
        // Unbind-then-bind keeps rebinding idempotent; unbind failures are
        // swallowed since the widget may already be torn down.
        for event in WidgetEvent::ALL {
            let _ = self.host.unbind(event);
        }
        self.stop_forwarder();

        let (widget_tx, mut widget_rx) = mpsc::unbounded_channel();
        for event in WidgetEvent::ALL {
            self.host.bind(event, widget_tx.clone())?;
        }

        let handle = tokio::spawn(async move {
            while let Some(event) = widget_rx.recv().await {
                let mapped = match event {
                    WidgetEvent::Ready => AdapterEvent::Ready,
                    WidgetEvent::Play => AdapterEvent::Play,
                    WidgetEvent::Pause => AdapterEvent::Pause,
                    WidgetEvent::Finish => AdapterEvent::Finish,
                };
                if tx.send(mapped).is_err() {
                    break;
                }
            }
        });
        *self.forwarder.lock().unwrap() = Some(handle);
        Ok(())
    }

    async fn load(&self, request: &LoadRequest) -> Result<()> {
        self.host
            .reset_frame()
            .await
            .map_err(|e| PlayerError::WidgetInit(format!("frame reset failed: {e}")))?;
        self.host
            .create(&request.page_url)
            .await
            .map_err(|e| PlayerError::WidgetInit(e.to_string()))?;
        debug!(page_url = %request.page_url, "Widget load started");
        Ok(())
    }

    fn teardown(&self) {
        for event in WidgetEvent::ALL {
            let _ = self.host.unbind(event);
        }
        let _ = self.host.destroy_frame();
        self.stop_forwarder();
    }

    async fn play(&self) {
        if let Err(e) = self.host.play().await {
            debug!(error = %e, "Widget play command failed");
        }
    }

    async fn pause(&self) {
        if let Err(e) = self.host.pause().await {
            debug!(error = %e, "Widget pause command failed");
        }
    }

    async fn seek_to(&self, position_ms: u64) {
        if let Err(e) = self.host.seek_to(position_ms).await {
            debug!(error = %e, "Widget seek command failed");
        }
    }

    async fn set_volume(&self, percent: f32) {
        if let Err(e) = self.host.set_volume(percent).await {
            debug!(error = %e, "Widget volume command failed");
        }
    }

    async fn position_ms(&self) -> u64 {
        self.host.position_ms().await.unwrap_or(0)
    }

    async fn duration_ms(&self) -> u64 {
        self.host.duration_ms().await.unwrap_or(0)
    }

    async fn metadata(&self) -> Option<AdapterMetadata> {
        // The widget's metadata query frequently returns empty right after
        // load; poll until it fills in or the ceiling is reached.
        let host = &self.host;
        poll_until(self.metadata_plan, |attempt| async move {
            match host.current_sound().await {
                Ok(sound) if !sound.is_empty() => Some(AdapterMetadata {
                    title: sound.title,
                    artist: sound.artist,
                }),
                Ok(_) => {
                    debug!(attempt, "Widget metadata still empty");
                    None
                }
                Err(e) => {
                    debug!(attempt, error = %e, "Widget metadata query failed");
                    None
                }
            }
        })
        .await
    }
}
