//! Shared fakes for controller and resolver tests.
//!
//! The fakes mirror the host bridges closely enough to script every scenario
//! the controller has to survive: transient widget creation failures, empty
//! metadata bursts, autoplay rejections, and hosts that come up late.

#![allow(dead_code)]

use std::sync::atomic::{AtomicBool, AtomicU32, AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use bridge_traits::{
    BridgeError, HttpClient, HttpRequest, HttpResponse, MediaElementHost, MediaEvent,
    MemorySnapshotStore, PlayerSurface, StaticPlatformProbe, WidgetEvent, WidgetHost, WidgetSound,
};
use bytes::Bytes;
use core_player::{PlayerConfig, PlayerController, PlayerHandle, PlayerHosts, TrackRef, ViewSnapshot};
use core_runtime::events::{PlayerEvent, Receiver};
use tokio::sync::mpsc::UnboundedSender;
use tokio::task::JoinHandle;

// ============================================================================
// HTTP
// ============================================================================

/// Scripted HTTP client: responds to the first route whose fragment appears
/// in the request URL, 404 otherwise. Requests are recorded for assertions.
#[derive(Default)]
pub struct FakeHttpClient {
    routes: Mutex<Vec<(String, u16, String)>>,
    pub requests: Mutex<Vec<String>>,
}

impl FakeHttpClient {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn respond(&self, url_fragment: &str, status: u16, body: &str) {
        self.routes
            .lock()
            .unwrap()
            .push((url_fragment.to_string(), status, body.to_string()));
    }

    pub fn request_urls(&self) -> Vec<String> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl HttpClient for FakeHttpClient {
    async fn execute(&self, request: HttpRequest) -> bridge_traits::error::Result<HttpResponse> {
        self.requests.lock().unwrap().push(request.url.clone());
        let routes = self.routes.lock().unwrap();
        for (fragment, status, body) in routes.iter() {
            if request.url.contains(fragment.as_str()) {
                return Ok(HttpResponse {
                    status: *status,
                    body: Bytes::from(body.clone()),
                });
            }
        }
        Ok(HttpResponse {
            status: 404,
            body: Bytes::new(),
        })
    }
}

// ============================================================================
// Widget Host
// ============================================================================

/// Widget host fake. Emits `Ready` as part of a successful `create`, `Play`
/// and `Pause` in response to commands, and `Finish` on demand via
/// [`FakeWidgetHost::finish`].
#[derive(Default)]
pub struct FakeWidgetHost {
    available: AtomicBool,
    bindings: Mutex<Vec<(WidgetEvent, UnboundedSender<WidgetEvent>)>>,
    /// Remaining `create` calls that fail before one succeeds.
    create_failures: AtomicU32,
    /// Remaining metadata queries that report an empty sound.
    empty_metadata: AtomicU32,
    sound: Mutex<WidgetSound>,
    pub created_urls: Mutex<Vec<String>>,
    pub reset_count: AtomicU32,
    pub destroy_count: AtomicU32,
    pub metadata_queries: AtomicU32,
    pub seeks: Mutex<Vec<u64>>,
    position_ms: AtomicU64,
    duration_ms: AtomicU64,
    paused: AtomicBool,
}

impl FakeWidgetHost {
    pub fn new() -> Self {
        let host = Self::default();
        host.available.store(true, Ordering::SeqCst);
        host.paused.store(true, Ordering::SeqCst);
        host
    }

    pub fn set_available(&self, available: bool) {
        self.available.store(available, Ordering::SeqCst);
    }

    pub fn fail_next_creates(&self, count: u32) {
        self.create_failures.store(count, Ordering::SeqCst);
    }

    pub fn set_sound(&self, title: &str, artist: &str) {
        *self.sound.lock().unwrap() = WidgetSound {
            title: Some(title.to_string()),
            artist: Some(artist.to_string()),
        };
    }

    /// Metadata queries report empty this many times before the real sound.
    pub fn report_empty_metadata(&self, count: u32) {
        self.empty_metadata.store(count, Ordering::SeqCst);
    }

    pub fn set_progress(&self, position_ms: u64, duration_ms: u64) {
        self.position_ms.store(position_ms, Ordering::SeqCst);
        self.duration_ms.store(duration_ms, Ordering::SeqCst);
    }

    pub fn create_count(&self) -> usize {
        self.created_urls.lock().unwrap().len()
    }

    pub fn emit(&self, event: WidgetEvent) {
        let bindings = self.bindings.lock().unwrap();
        if let Some((_, tx)) = bindings.iter().find(|(bound, _)| *bound == event) {
            let _ = tx.send(event);
        }
    }

    /// Simulate the current track playing to its end.
    pub fn finish(&self) {
        self.emit(WidgetEvent::Finish);
    }
}

#[async_trait]
impl WidgetHost for FakeWidgetHost {
    fn is_available(&self) -> bool {
        self.available.load(Ordering::SeqCst)
    }

    async fn reset_frame(&self) -> bridge_traits::error::Result<()> {
        self.reset_count.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    async fn create(&self, page_url: &str) -> bridge_traits::error::Result<()> {
        let remaining = self.create_failures.load(Ordering::SeqCst);
        if remaining > 0 {
            self.create_failures.store(remaining - 1, Ordering::SeqCst);
            return Err(BridgeError::NotAvailable(
                "widget library threw during construction".to_string(),
            ));
        }
        self.created_urls.lock().unwrap().push(page_url.to_string());
        self.emit(WidgetEvent::Ready);
        Ok(())
    }

    fn bind(
        &self,
        event: WidgetEvent,
        tx: UnboundedSender<WidgetEvent>,
    ) -> bridge_traits::error::Result<()> {
        let mut bindings = self.bindings.lock().unwrap();
        bindings.retain(|(bound, _)| *bound != event);
        bindings.push((event, tx));
        Ok(())
    }

    fn unbind(&self, event: WidgetEvent) -> bridge_traits::error::Result<()> {
        self.bindings
            .lock()
            .unwrap()
            .retain(|(bound, _)| *bound != event);
        Ok(())
    }

    fn destroy_frame(&self) -> bridge_traits::error::Result<()> {
        self.destroy_count.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    async fn play(&self) -> bridge_traits::error::Result<()> {
        self.paused.store(false, Ordering::SeqCst);
        self.emit(WidgetEvent::Play);
        Ok(())
    }

    async fn pause(&self) -> bridge_traits::error::Result<()> {
        self.paused.store(true, Ordering::SeqCst);
        self.emit(WidgetEvent::Pause);
        Ok(())
    }

    async fn seek_to(&self, position_ms: u64) -> bridge_traits::error::Result<()> {
        self.seeks.lock().unwrap().push(position_ms);
        self.position_ms.store(position_ms, Ordering::SeqCst);
        Ok(())
    }

    async fn set_volume(&self, _percent: f32) -> bridge_traits::error::Result<()> {
        Ok(())
    }

    async fn duration_ms(&self) -> bridge_traits::error::Result<u64> {
        Ok(self.duration_ms.load(Ordering::SeqCst))
    }

    async fn position_ms(&self) -> bridge_traits::error::Result<u64> {
        Ok(self.position_ms.load(Ordering::SeqCst))
    }

    async fn current_sound(&self) -> bridge_traits::error::Result<WidgetSound> {
        self.metadata_queries.fetch_add(1, Ordering::SeqCst);
        let remaining = self.empty_metadata.load(Ordering::SeqCst);
        if remaining > 0 {
            self.empty_metadata.store(remaining - 1, Ordering::SeqCst);
            return Ok(WidgetSound::default());
        }
        Ok(self.sound.lock().unwrap().clone())
    }

    async fn is_paused(&self) -> bridge_traits::error::Result<bool> {
        Ok(self.paused.load(Ordering::SeqCst))
    }
}

// ============================================================================
// Media Element Host
// ============================================================================

/// Media element fake. `set_source` emits `CanPlay`; `play` either emits
/// `Playing` or rejects with `NotPermitted` while scripted autoplay
/// rejections remain.
#[derive(Default)]
pub struct FakeMediaHost {
    available: AtomicBool,
    bound: Mutex<Option<UnboundedSender<MediaEvent>>>,
    autoplay_rejections: AtomicU32,
    pub sources: Mutex<Vec<String>>,
    pub clear_count: AtomicU32,
    pub seeks: Mutex<Vec<u64>>,
    position_ms: AtomicU64,
    duration_ms: AtomicU64,
}

impl FakeMediaHost {
    pub fn new() -> Self {
        let host = Self::default();
        host.available.store(true, Ordering::SeqCst);
        host
    }

    pub fn set_available(&self, available: bool) {
        self.available.store(available, Ordering::SeqCst);
    }

    pub fn reject_next_plays(&self, count: u32) {
        self.autoplay_rejections.store(count, Ordering::SeqCst);
    }

    pub fn set_progress(&self, position_ms: u64, duration_ms: u64) {
        self.position_ms.store(position_ms, Ordering::SeqCst);
        self.duration_ms.store(duration_ms, Ordering::SeqCst);
    }

    pub fn emit(&self, event: MediaEvent) {
        if let Some(tx) = self.bound.lock().unwrap().as_ref() {
            let _ = tx.send(event);
        }
    }

    pub fn finish(&self) {
        self.emit(MediaEvent::Ended);
    }

    pub fn fail(&self, message: &str) {
        self.emit(MediaEvent::Error {
            message: message.to_string(),
        });
    }
}

#[async_trait]
impl MediaElementHost for FakeMediaHost {
    fn is_available(&self) -> bool {
        self.available.load(Ordering::SeqCst)
    }

    fn bind(&self, tx: UnboundedSender<MediaEvent>) -> bridge_traits::error::Result<()> {
        *self.bound.lock().unwrap() = Some(tx);
        Ok(())
    }

    fn unbind(&self) -> bridge_traits::error::Result<()> {
        *self.bound.lock().unwrap() = None;
        Ok(())
    }

    fn clear_source(&self) -> bridge_traits::error::Result<()> {
        self.clear_count.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    async fn set_source(&self, url: &str) -> bridge_traits::error::Result<()> {
        self.sources.lock().unwrap().push(url.to_string());
        self.emit(MediaEvent::CanPlay);
        Ok(())
    }

    async fn play(&self) -> bridge_traits::error::Result<()> {
        let remaining = self.autoplay_rejections.load(Ordering::SeqCst);
        if remaining > 0 {
            self.autoplay_rejections.store(remaining - 1, Ordering::SeqCst);
            return Err(BridgeError::NotPermitted(
                "autoplay requires a user gesture".to_string(),
            ));
        }
        self.emit(MediaEvent::Playing);
        Ok(())
    }

    async fn pause(&self) -> bridge_traits::error::Result<()> {
        self.emit(MediaEvent::Pause);
        Ok(())
    }

    async fn set_current_time(&self, position_ms: u64) -> bridge_traits::error::Result<()> {
        self.seeks.lock().unwrap().push(position_ms);
        self.position_ms.store(position_ms, Ordering::SeqCst);
        Ok(())
    }

    async fn set_volume(&self, _percent: f32) -> bridge_traits::error::Result<()> {
        Ok(())
    }

    async fn position_ms(&self) -> bridge_traits::error::Result<u64> {
        Ok(self.position_ms.load(Ordering::SeqCst))
    }

    async fn duration_ms(&self) -> bridge_traits::error::Result<u64> {
        Ok(self.duration_ms.load(Ordering::SeqCst))
    }
}

// ============================================================================
// Surface
// ============================================================================

/// Records every chrome update the controller drives.
#[derive(Default)]
pub struct RecordingSurface {
    pub play_icons: Mutex<Vec<bool>>,
    pub seek_values: Mutex<Vec<f64>>,
    pub time_texts: Mutex<Vec<(String, String)>>,
    pub highlights: Mutex<Vec<Option<String>>>,
    pub licensing_notices: AtomicU32,
    pub playback_errors: AtomicU32,
    pub hide_count: AtomicU32,
    pub waveform_draws: AtomicU32,
}

impl RecordingSurface {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn notice_count(&self) -> u32 {
        self.licensing_notices.load(Ordering::SeqCst)
    }

    pub fn hidden(&self) -> u32 {
        self.hide_count.load(Ordering::SeqCst)
    }
}

impl PlayerSurface for RecordingSurface {
    fn set_play_icon(&self, playing: bool) {
        self.play_icons.lock().unwrap().push(playing);
    }

    fn set_seek_value(&self, percent: f64) {
        self.seek_values.lock().unwrap().push(percent);
    }

    fn set_time_text(&self, position: &str, duration: &str) {
        self.time_texts
            .lock()
            .unwrap()
            .push((position.to_string(), duration.to_string()));
    }

    fn highlight_track(&self, track_id: Option<&str>) {
        self.highlights
            .lock()
            .unwrap()
            .push(track_id.map(str::to_string));
    }

    fn show_licensing_notice(&self) {
        self.licensing_notices.fetch_add(1, Ordering::SeqCst);
    }

    fn show_playback_error(&self) {
        self.playback_errors.fetch_add(1, Ordering::SeqCst);
    }

    fn hide_player(&self) {
        self.hide_count.fetch_add(1, Ordering::SeqCst);
    }

    fn draw_waveform(&self, _phase: f64) {
        self.waveform_draws.fetch_add(1, Ordering::SeqCst);
    }
}

// ============================================================================
// Harness
// ============================================================================

/// A controller wired to fakes, running on its own task.
pub struct Harness {
    pub handle: PlayerHandle,
    pub events: Receiver<PlayerEvent>,
    pub http: Arc<FakeHttpClient>,
    pub widget: Arc<FakeWidgetHost>,
    pub media: Arc<FakeMediaHost>,
    pub surface: Arc<RecordingSurface>,
    pub store: Arc<MemorySnapshotStore>,
    pub task: JoinHandle<()>,
}

impl Harness {
    /// Widget-only platform: no credential configured.
    pub fn widget_platform() -> StaticPlatformProbe {
        StaticPlatformProbe {
            touch_only: false,
            pixel_ratio: 1.0,
            credential: None,
        }
    }

    /// Direct-capable platform: touch-only, high density, credential set.
    pub fn direct_platform() -> StaticPlatformProbe {
        StaticPlatformProbe {
            touch_only: true,
            pixel_ratio: 3.0,
            credential: Some("client-id".to_string()),
        }
    }

    pub fn start(platform: StaticPlatformProbe) -> Self {
        Self::start_with_config(platform, PlayerConfig::default())
    }

    pub fn start_with_config(platform: StaticPlatformProbe, config: PlayerConfig) -> Self {
        let http = Arc::new(FakeHttpClient::new());
        let widget = Arc::new(FakeWidgetHost::new());
        let media = Arc::new(FakeMediaHost::new());
        let surface = Arc::new(RecordingSurface::new());
        let store = Arc::new(MemorySnapshotStore::new());

        let hosts = PlayerHosts {
            http: http.clone(),
            widget: widget.clone(),
            media: media.clone(),
            platform: Arc::new(platform),
            snapshots: store.clone(),
            surface: surface.clone(),
        };
        let (controller, handle) =
            PlayerController::new(config, hosts).expect("valid default config");
        let events = controller.events().subscribe();
        let task = tokio::spawn(controller.run());

        Self {
            handle,
            events,
            http,
            widget,
            media,
            surface,
            store,
            task,
        }
    }

    /// Collect everything currently queued on the event subscription.
    pub fn drain_events(&mut self) -> Vec<PlayerEvent> {
        use tokio::sync::broadcast::error::TryRecvError;
        let mut events = Vec::new();
        loop {
            match self.events.try_recv() {
                Ok(event) => events.push(event),
                Err(TryRecvError::Lagged(_)) => continue,
                Err(_) => break,
            }
        }
        events
    }
}

pub fn track(id: &str) -> TrackRef {
    TrackRef::new(id, format!("https://service.example/tracks/{id}"))
}

pub fn view_of(ids: &[&str]) -> ViewSnapshot {
    ViewSnapshot {
        rendered: ids.iter().map(|id| track(id)).collect(),
        container_fallback: Vec::new(),
    }
}

/// A resolve-endpoint body offering the given transcodings.
pub fn resolve_body(transcodings: &[(&str, &str)]) -> String {
    let list: Vec<String> = transcodings
        .iter()
        .map(|(url, protocol)| {
            format!(r#"{{"url":"{url}","format":{{"protocol":"{protocol}"}}}}"#)
        })
        .collect();
    format!(
        r#"{{"title":"Resolved Title","user":{{"username":"Resolved Artist"}},"media":{{"transcodings":[{}]}}}}"#,
        list.join(",")
    )
}
