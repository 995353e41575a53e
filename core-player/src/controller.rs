//! # Playback Controller
//!
//! The playback state machine, run as a single actor task. All mutation goes
//! through the command channel; the UI reads back through the event bus and
//! the [`PlayerSurface`] it supplied. Because there is exactly one task, the
//! teardown sequence (unbind adapter events, drop the adapter, drop its event
//! receiver) runs with no suspension point in between, so no event from a
//! torn-down adapter can ever be observed.
//!
//! ## State machine
//!
//! ```text
//! Idle -> Loading -> Ready -> Playing <-> Paused -> Finished -> (Loading | Idle)
//! ```
//!
//! Delayed work (init-retry backoff, the finish-advance delay, restore
//! polling) is posted back to the actor through an internal channel, tagged
//! with the load generation that scheduled it. A new load bumps the
//! generation, so anything scheduled for a previous load is discarded on
//! arrival instead of firing against the wrong track.

use std::sync::Arc;
use std::time::Duration;

use bridge_traits::{
    HttpClient, MediaElementHost, PlatformProbe, PlayerSurface, SnapshotStore, WidgetHost,
};
use core_runtime::events::{EventBus, PlaybackPhase, PlayerEvent};
use tokio::sync::mpsc;
use tokio::time::{interval, sleep, Instant, MissedTickBehavior};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::adapter::{
    AdapterEvent, AdapterMetadata, DirectAdapter, LoadRequest, PlayerAdapter, WidgetAdapter,
};
use crate::backend::{select_backend, Backend};
use crate::config::PlayerConfig;
use crate::error::{PlayerError, Result};
use crate::persist::{PlaybackSnapshot, SnapshotPersistence};
use crate::playlist::{PlaylistOrder, TrackRef, ViewSnapshot};
use crate::progress::{percent_to_position_ms, waveform_phase, ProgressFrame};
use crate::resolver::StreamResolver;
use crate::retry::RetryPlan;

/// Cycle length of the decorative waveform sway.
const WAVEFORM_CYCLE_MS: u64 = 2_000;

// ============================================================================
// Commands
// ============================================================================

/// Inbound control surface, sent through a [`PlayerHandle`].
#[derive(Debug)]
pub enum PlayerCommand {
    /// Load a playlist track.
    Load { track: TrackRef, autostart: bool },
    /// Load an external page URL (e.g. from search), treated identically to
    /// a playlist-item load.
    PlayExternal { page_url: String },
    TogglePlay,
    Next,
    Prev,
    /// Seek to a seek-control value on a 0-100 scale.
    SeekPercent { percent: f64 },
    /// Volume as a percentage in `0..=100`.
    SetVolume { percent: f32 },
    SetShuffle { enabled: bool },
    SetRepeatOne { enabled: bool },
    /// The host view changed; tears down playback, then recomputes the
    /// playlist order from the new view.
    ViewChanged { view: ViewSnapshot },
    /// Manual scrubbing started; suspends the progress poll.
    BeginScrub,
    /// Manual scrubbing ended (anywhere on the document, not just over the
    /// control); resumes the progress poll.
    EndScrub,
    /// Attempt to restore the persisted snapshot. Issued once per host
    /// lifecycle, on initial mount.
    Restore,
    Shutdown,
}

/// Work the actor posts back to itself, tagged with the load generation that
/// scheduled it where it must not outlive that load.
#[derive(Debug)]
enum InternalCommand {
    RetryLoad { generation: u64, pending: PendingLoad },
    AdvanceTo { generation: u64, track: TrackRef },
    /// The off-loop metadata poll finished for the tagged load.
    MetadataReady {
        generation: u64,
        metadata: Option<AdapterMetadata>,
    },
    RestoreTick,
}

/// Everything needed to (re)start one load.
#[derive(Debug, Clone)]
struct PendingLoad {
    track: TrackRef,
    autostart: bool,
    resume_ms: u64,
    /// Restore-path loads use the longer init-retry backoff.
    restore: bool,
    /// Skip platform-based selection (restore matching the snapshot's
    /// backend family, or the direct-to-widget fallback).
    force_backend: Option<Backend>,
}

// ============================================================================
// Host Wiring
// ============================================================================

/// The host-provided bridges the controller drives.
#[derive(Clone)]
pub struct PlayerHosts {
    pub http: Arc<dyn HttpClient>,
    pub widget: Arc<dyn WidgetHost>,
    pub media: Arc<dyn MediaElementHost>,
    pub platform: Arc<dyn PlatformProbe>,
    pub snapshots: Arc<dyn SnapshotStore>,
    pub surface: Arc<dyn PlayerSurface>,
}

/// Cloneable handle for sending commands to a running controller.
#[derive(Clone)]
pub struct PlayerHandle {
    commands: mpsc::UnboundedSender<PlayerCommand>,
    shutdown: CancellationToken,
}

impl PlayerHandle {
    pub fn load(&self, track: TrackRef, autostart: bool) {
        self.send(PlayerCommand::Load { track, autostart });
    }

    pub fn play_external(&self, page_url: impl Into<String>) {
        self.send(PlayerCommand::PlayExternal {
            page_url: page_url.into(),
        });
    }

    pub fn toggle_play(&self) {
        self.send(PlayerCommand::TogglePlay);
    }

    pub fn next(&self) {
        self.send(PlayerCommand::Next);
    }

    pub fn prev(&self) {
        self.send(PlayerCommand::Prev);
    }

    pub fn seek_percent(&self, percent: f64) {
        self.send(PlayerCommand::SeekPercent { percent });
    }

    pub fn set_volume(&self, percent: f32) {
        self.send(PlayerCommand::SetVolume { percent });
    }

    pub fn set_shuffle(&self, enabled: bool) {
        self.send(PlayerCommand::SetShuffle { enabled });
    }

    pub fn set_repeat_one(&self, enabled: bool) {
        self.send(PlayerCommand::SetRepeatOne { enabled });
    }

    pub fn view_changed(&self, view: ViewSnapshot) {
        self.send(PlayerCommand::ViewChanged { view });
    }

    pub fn begin_scrub(&self) {
        self.send(PlayerCommand::BeginScrub);
    }

    pub fn end_scrub(&self) {
        self.send(PlayerCommand::EndScrub);
    }

    pub fn restore(&self) {
        self.send(PlayerCommand::Restore);
    }

    /// Stop the controller task. Idempotent.
    pub fn shutdown(&self) {
        self.shutdown.cancel();
    }

    fn send(&self, command: PlayerCommand) {
        if self.commands.send(command).is_err() {
            debug!("Player controller is no longer running");
        }
    }
}

// ============================================================================
// Controller
// ============================================================================

/// The playback orchestrator actor. Construct with [`PlayerController::new`],
/// subscribe to [`PlayerController::events`], then drive [`run`] on a task.
///
/// [`run`]: PlayerController::run
pub struct PlayerController {
    config: PlayerConfig,
    hosts: PlayerHosts,
    events: EventBus,
    persistence: SnapshotPersistence,

    commands: mpsc::UnboundedReceiver<PlayerCommand>,
    internal_tx: mpsc::UnboundedSender<InternalCommand>,
    internal_rx: mpsc::UnboundedReceiver<InternalCommand>,
    shutdown: CancellationToken,

    phase: PlaybackPhase,
    adapter: Option<Arc<dyn PlayerAdapter>>,
    adapter_rx: Option<mpsc::UnboundedReceiver<AdapterEvent>>,
    pending: Option<PendingLoad>,
    current: Option<TrackRef>,
    /// Bumped on every new load; stale scheduled work checks against it.
    load_generation: u64,
    /// When the current load first entered `Playing`; drives the licensing
    /// notice window on finish.
    playing_since: Option<Instant>,

    view: ViewSnapshot,
    order: PlaylistOrder,
    shuffle: bool,
    repeat_one: bool,
    scrubbing: bool,
    volume: f32,

    last_position_ms: u64,
    last_duration_ms: u64,
    restore_pending: Option<PlaybackSnapshot>,
}

impl PlayerController {
    /// Build a controller and its command handle.
    ///
    /// # Errors
    ///
    /// [`PlayerError::InvalidConfig`] when the configuration fails
    /// validation.
    pub fn new(config: PlayerConfig, hosts: PlayerHosts) -> Result<(Self, PlayerHandle)> {
        config.validate().map_err(PlayerError::InvalidConfig)?;

        let (command_tx, command_rx) = mpsc::unbounded_channel();
        let (internal_tx, internal_rx) = mpsc::unbounded_channel();
        let shutdown = CancellationToken::new();
        let persistence =
            SnapshotPersistence::new(hosts.snapshots.clone(), config.snapshot_key.clone());

        let handle = PlayerHandle {
            commands: command_tx,
            shutdown: shutdown.clone(),
        };
        let controller = Self {
            config,
            hosts,
            events: EventBus::default(),
            persistence,
            commands: command_rx,
            internal_tx,
            internal_rx,
            shutdown,
            phase: PlaybackPhase::Idle,
            adapter: None,
            adapter_rx: None,
            pending: None,
            current: None,
            load_generation: 0,
            playing_since: None,
            view: ViewSnapshot::default(),
            order: PlaylistOrder::default(),
            shuffle: false,
            repeat_one: false,
            scrubbing: false,
            volume: 100.0,
            last_position_ms: 0,
            last_duration_ms: 0,
            restore_pending: None,
        };
        Ok((controller, handle))
    }

    /// The bus the controller publishes on.
    pub fn events(&self) -> EventBus {
        self.events.clone()
    }

    /// Run the actor loop until shutdown.
    pub async fn run(mut self) {
        info!("Playback controller started");
        let mut progress = interval(self.config.progress_poll_interval);
        progress.set_missed_tick_behavior(MissedTickBehavior::Skip);

        loop {
            tokio::select! {
                _ = self.shutdown.cancelled() => break,
                command = self.commands.recv() => match command {
                    Some(PlayerCommand::Shutdown) | None => break,
                    Some(command) => self.handle_command(command).await,
                },
                Some(internal) = self.internal_rx.recv() => {
                    self.handle_internal(internal).await;
                }
                Some(event) = recv_or_pending(&mut self.adapter_rx) => {
                    self.handle_adapter_event(event).await;
                }
                _ = progress.tick(), if self.phase.is_playing() && !self.scrubbing => {
                    self.on_progress_tick().await;
                }
            }
        }

        // Final save runs inline so it completes before the task exits.
        if let Some(snapshot) = self.build_snapshot() {
            self.persistence.save(&snapshot).await;
        }
        self.teardown_adapter();
        info!("Playback controller stopped");
    }

    // ========================================================================
    // Command Handling
    // ========================================================================

    async fn handle_command(&mut self, command: PlayerCommand) {
        match command {
            PlayerCommand::Load { track, autostart } => {
                self.load_track(PendingLoad {
                    track,
                    autostart,
                    resume_ms: 0,
                    restore: false,
                    force_backend: None,
                })
                .await;
            }
            PlayerCommand::PlayExternal { page_url } => {
                self.load_track(PendingLoad {
                    track: TrackRef::new("", page_url),
                    autostart: true,
                    resume_ms: 0,
                    restore: false,
                    force_backend: None,
                })
                .await;
            }
            PlayerCommand::TogglePlay => self.on_toggle_play().await,
            PlayerCommand::Next => {
                let current_id = self.current.as_ref().map(|t| t.track_id.clone());
                if let Some(track) = self.order.next_after(current_id.as_deref()).cloned() {
                    self.load_autostart(track).await;
                }
            }
            PlayerCommand::Prev => {
                let current_id = self.current.as_ref().map(|t| t.track_id.clone());
                if let Some(track) = self.order.prev_before(current_id.as_deref()).cloned() {
                    self.load_autostart(track).await;
                }
            }
            PlayerCommand::SeekPercent { percent } => self.on_seek_percent(percent).await,
            PlayerCommand::SetVolume { percent } => {
                self.volume = percent.clamp(0.0, 100.0);
                if let Some(adapter) = self.adapter.as_ref() {
                    adapter.set_volume(self.volume).await;
                }
            }
            PlayerCommand::SetShuffle { enabled } => {
                self.shuffle = enabled;
                self.order.rebuild(&self.view, enabled);
                debug!(shuffle = enabled, tracks = self.order.len(), "Playlist order recomputed");
            }
            PlayerCommand::SetRepeatOne { enabled } => self.repeat_one = enabled,
            PlayerCommand::ViewChanged { view } => self.on_view_changed(view),
            PlayerCommand::BeginScrub => self.scrubbing = true,
            PlayerCommand::EndScrub => self.scrubbing = false,
            PlayerCommand::Restore => self.on_restore().await,
            PlayerCommand::Shutdown => unreachable!("handled by the run loop"),
        }
    }

    async fn handle_internal(&mut self, internal: InternalCommand) {
        match internal {
            InternalCommand::RetryLoad {
                generation,
                pending,
            } => {
                if generation != self.load_generation {
                    debug!(generation, "Dropping stale load retry");
                    return;
                }
                self.attempt_load(pending).await;
            }
            InternalCommand::AdvanceTo { generation, track } => {
                if generation != self.load_generation {
                    debug!(generation, "Dropping stale advance");
                    return;
                }
                self.load_autostart(track).await;
            }
            InternalCommand::MetadataReady {
                generation,
                metadata,
            } => {
                if generation != self.load_generation {
                    debug!(generation, "Dropping stale metadata");
                    return;
                }
                self.on_metadata_ready(metadata);
            }
            InternalCommand::RestoreTick => self.try_restore().await,
        }
    }

    async fn handle_adapter_event(&mut self, event: AdapterEvent) {
        debug!(?event, phase = ?self.phase, "Adapter event");
        match event {
            AdapterEvent::Ready => self.on_ready().await,
            AdapterEvent::Play => self.on_play_event(),
            AdapterEvent::Pause => self.on_pause_event(),
            AdapterEvent::Finish => self.on_finish().await,
            AdapterEvent::Fallback { reason } => self.on_fallback(reason).await,
        }
    }

    // ========================================================================
    // Loading
    // ========================================================================

    async fn load_autostart(&mut self, track: TrackRef) {
        self.load_track(PendingLoad {
            track,
            autostart: true,
            resume_ms: 0,
            restore: false,
            force_backend: None,
        })
        .await;
    }

    /// Start a new load. Teardown of the previous adapter is complete before
    /// the first await of the new load.
    async fn load_track(&mut self, pending: PendingLoad) {
        if !pending.restore {
            // An explicit load supersedes a restore still waiting on its
            // host; the next poll tick finds nothing to do.
            self.restore_pending = None;
        }
        self.spawn_save();
        self.teardown_adapter();
        self.load_generation += 1;
        self.playing_since = None;
        self.last_position_ms = 0;
        self.last_duration_ms = 0;
        self.current = Some(pending.track.clone());
        self.pending = Some(pending.clone());

        let highlight = (!pending.track.track_id.is_empty())
            .then_some(pending.track.track_id.clone());
        self.hosts.surface.highlight_track(highlight.as_deref());
        self.set_phase(PlaybackPhase::Loading);

        self.attempt_load(pending).await;
    }

    /// One load attempt, including the direct-to-widget fallback and the
    /// transient-init retry scheduling.
    async fn attempt_load(&mut self, mut pending: PendingLoad) {
        let generation = self.load_generation;
        loop {
            let backend = pending.force_backend.unwrap_or_else(|| {
                select_backend(
                    self.hosts.platform.as_ref(),
                    self.config.force_widget,
                    self.config.high_density_ratio,
                )
            });
            debug!(%backend, page_url = %pending.track.page_url, "Attempting load");

            match self.start_backend(backend, &pending).await {
                Ok(()) => return,
                Err(e) if e.is_transient() => {
                    self.teardown_adapter();
                    let delay = if pending.restore {
                        self.config.restore_load_backoff
                    } else {
                        self.config.fresh_load_backoff
                    };
                    warn!(error = %e, ?delay, "Transient init failure, retrying load");
                    self.schedule(delay, InternalCommand::RetryLoad {
                        generation,
                        pending,
                    });
                    return;
                }
                Err(e) if backend == Backend::Direct && e.triggers_widget_fallback() => {
                    warn!(error = %e, "Direct mode unavailable, falling back to widget");
                    self.teardown_adapter();
                    pending.force_backend = Some(Backend::Widget);
                }
                Err(e) => {
                    self.teardown_adapter();
                    self.fail_playback(e);
                    return;
                }
            }
        }
    }

    /// Create, bind, and load the adapter for `backend`.
    async fn start_backend(&mut self, backend: Backend, pending: &PendingLoad) -> Result<()> {
        let adapter: Arc<dyn PlayerAdapter> = match backend {
            Backend::Widget => Arc::new(WidgetAdapter::new(
                self.hosts.widget.clone(),
                RetryPlan::new(
                    self.config.metadata_retry_attempts,
                    self.config.metadata_retry_interval,
                ),
            )),
            Backend::Direct => {
                let credential = self
                    .hosts
                    .platform
                    .client_credential()
                    .ok_or(PlayerError::CredentialMissing)?;
                let resolution = {
                    let resolver =
                        StreamResolver::new(self.hosts.http.as_ref(), &self.config.resolve_endpoint);
                    resolver.resolve(&pending.track.page_url, &credential).await?
                };
                let metadata = AdapterMetadata {
                    title: resolution.title,
                    artist: resolution.artist,
                };
                let adapter = Arc::new(DirectAdapter::new(self.hosts.media.clone(), metadata));
                self.install_adapter(adapter)?;
                let request = LoadRequest {
                    page_url: pending.track.page_url.clone(),
                    stream: Some(resolution.stream),
                    resume_ms: pending.resume_ms,
                    autostart: pending.autostart,
                };
                return self.load_on_adapter(&request).await;
            }
        };

        self.install_adapter(adapter)?;
        let request = LoadRequest {
            page_url: pending.track.page_url.clone(),
            stream: None,
            resume_ms: pending.resume_ms,
            autostart: pending.autostart,
        };
        self.load_on_adapter(&request).await
    }

    async fn load_on_adapter(&mut self, request: &LoadRequest) -> Result<()> {
        match self.adapter.as_ref() {
            Some(adapter) => adapter.load(request).await,
            None => Err(PlayerError::PlaybackFailed(
                "no adapter installed for load".to_string(),
            )),
        }
    }

    /// Bind a fresh event channel and take ownership of the adapter. Events
    /// are only ever observed through `adapter_rx`, which is dropped during
    /// teardown, so nothing from a previous adapter can reach the loop.
    fn install_adapter(&mut self, adapter: Arc<dyn PlayerAdapter>) -> Result<()> {
        let (tx, rx) = mpsc::unbounded_channel();
        adapter.bind_events(tx)?;
        self.adapter = Some(adapter);
        self.adapter_rx = Some(rx);
        Ok(())
    }

    /// Synchronous teardown: unbind, drop the adapter, drop its event
    /// receiver, in one sequence with no suspension point.
    fn teardown_adapter(&mut self) {
        if let Some(adapter) = self.adapter.take() {
            adapter.teardown();
        }
        self.adapter_rx = None;
    }

    fn fail_playback(&mut self, error: PlayerError) {
        warn!(error = %error, "Playback could not be started");
        self.hosts.surface.show_playback_error();
        self.events.emit(PlayerEvent::PlaybackFailed {
            message: error.to_string(),
        });
        self.pending = None;
        self.set_phase(PlaybackPhase::Idle);
    }

    // ========================================================================
    // Adapter Events
    // ========================================================================

    async fn on_ready(&mut self) {
        self.set_phase(PlaybackPhase::Ready);
        let Some(pending) = self.pending.clone() else {
            return;
        };

        {
            let Some(adapter) = self.adapter.as_ref() else {
                return;
            };
            if pending.resume_ms > 0 {
                adapter.seek_to(pending.resume_ms).await;
            }
            adapter.set_volume(self.volume).await;
            if pending.autostart {
                adapter.play().await;
            }
        }

        if !pending.autostart {
            self.set_phase(PlaybackPhase::Paused);
            self.hosts.surface.set_play_icon(false);
        }

        // The metadata poll can take several retry intervals; it runs off
        // the loop and posts its result back as a tagged internal command so
        // queued commands and adapter events are not stalled behind it.
        let Some(adapter) = self.adapter.clone() else {
            return;
        };
        let generation = self.load_generation;
        let tx = self.internal_tx.clone();
        tokio::spawn(async move {
            let metadata = adapter.metadata().await;
            let _ = tx.send(InternalCommand::MetadataReady {
                generation,
                metadata,
            });
        });
    }

    fn on_metadata_ready(&mut self, metadata: Option<AdapterMetadata>) {
        let Some(track) = self.current.clone() else {
            return;
        };
        let title = metadata
            .as_ref()
            .and_then(|m| m.title.clone())
            .unwrap_or_else(|| self.config.unknown_title.clone());
        let artist = metadata
            .as_ref()
            .and_then(|m| m.artist.clone())
            .unwrap_or_default();
        info!(track_id = %track.track_id, %title, "Track loaded");
        self.events.emit(PlayerEvent::TrackLoaded {
            track_id: track.track_id,
            title,
            artist,
        });
    }

    fn on_play_event(&mut self) {
        if self.playing_since.is_none() {
            self.playing_since = Some(Instant::now());
        }
        self.set_phase(PlaybackPhase::Playing);
        self.hosts.surface.set_play_icon(true);
        self.spawn_save();
    }

    fn on_pause_event(&mut self) {
        self.set_phase(PlaybackPhase::Paused);
        self.hosts.surface.set_play_icon(false);
        self.spawn_save();
    }

    async fn on_finish(&mut self) {
        self.set_phase(PlaybackPhase::Finished);

        // Played strictly between the window bounds means a rights-limited
        // short preview; the notice fires at most once per finish event.
        if let Some(started) = self.playing_since.take() {
            let played = started.elapsed();
            if played > self.config.notice_window_min && played < self.config.notice_window_max {
                info!(?played, "Short-preview playback finished, showing licensing notice");
                self.hosts.surface.show_licensing_notice();
                self.events.emit(PlayerEvent::LicensingNotice);
            }
        }

        if self.repeat_one {
            if let Some(track) = self.current.clone() {
                self.load_autostart(track).await;
                return;
            }
        }

        let current_id = self.current.as_ref().map(|t| t.track_id.clone());
        match self.order.next_after(current_id.as_deref()).cloned() {
            Some(track) => {
                self.schedule(self.config.advance_delay, InternalCommand::AdvanceTo {
                    generation: self.load_generation,
                    track,
                });
            }
            None => {
                self.teardown_adapter();
                self.pending = None;
                self.current = None;
                // Nothing is resumable once the playlist runs out.
                let persistence = self.persistence.clone();
                tokio::spawn(async move {
                    persistence.clear().await;
                });
                self.hosts.surface.highlight_track(None);
                self.hosts.surface.hide_player();
                self.events.emit(PlayerEvent::PlayerHidden);
                self.set_phase(PlaybackPhase::Idle);
            }
        }
    }

    async fn on_fallback(&mut self, reason: String) {
        warn!(%reason, "Direct playback failed, reloading under widget mode");
        let Some(mut pending) = self.pending.clone() else {
            return;
        };
        // The widget reload uses the original page URL and starts over.
        pending.force_backend = Some(Backend::Widget);
        pending.resume_ms = 0;
        pending.autostart = true;
        self.load_track(pending).await;
    }

    // ========================================================================
    // Toggle / Seek / View
    // ========================================================================

    async fn on_toggle_play(&mut self) {
        let playing = self.phase.is_playing();
        let Some(adapter) = self.adapter.as_ref() else {
            debug!("Toggle ignored, no adapter live");
            return;
        };
        if playing {
            adapter.pause().await;
        } else {
            adapter.play().await;
        }
    }

    async fn on_seek_percent(&mut self, percent: f64) {
        let Some(adapter) = self.adapter.as_ref() else {
            return;
        };
        let duration = adapter.duration_ms().await;
        let target = percent_to_position_ms(percent, duration);
        adapter.seek_to(target).await;
        self.last_position_ms = target;
        self.last_duration_ms = duration;
    }

    fn on_view_changed(&mut self, view: ViewSnapshot) {
        self.spawn_save();
        self.teardown_adapter();
        self.load_generation += 1;
        self.playing_since = None;
        self.pending = None;
        self.current = None;
        self.restore_pending = None;
        self.set_phase(PlaybackPhase::Idle);
        self.view = view;
        self.order.rebuild(&self.view, self.shuffle);
        debug!(tracks = self.order.len(), "View changed, playlist order recomputed");
    }

    // ========================================================================
    // Restore
    // ========================================================================

    async fn on_restore(&mut self) {
        if self.restore_pending.is_none() {
            self.restore_pending = self.persistence.load().await;
        }
        if self.restore_pending.is_none() {
            debug!("No playback snapshot to restore");
            return;
        }
        self.try_restore().await;
    }

    /// Restore once the snapshot's backend family is available, polling
    /// otherwise. Unbounded: restoration must eventually succeed once the
    /// host initializes.
    async fn try_restore(&mut self) {
        let Some(snapshot) = self.restore_pending.as_ref() else {
            return;
        };
        let backend = if snapshot.api_mode {
            Backend::Widget
        } else {
            Backend::Direct
        };
        let available = match backend {
            Backend::Widget => self.hosts.widget.is_available(),
            Backend::Direct => self.hosts.media.is_available(),
        };
        if !available {
            debug!(%backend, "Restore host not ready, polling");
            self.schedule(self.config.restore_poll_interval, InternalCommand::RestoreTick);
            return;
        }

        let snapshot = self
            .restore_pending
            .take()
            .unwrap_or_default();
        info!(track_id = %snapshot.track_id, position_ms = snapshot.clamped_position_ms(), "Restoring playback");
        let resume_ms = snapshot.clamped_position_ms();
        self.load_track(PendingLoad {
            track: TrackRef::new(snapshot.track_id, snapshot.track_url),
            autostart: snapshot.is_playing,
            resume_ms,
            restore: true,
            force_backend: Some(backend),
        })
        .await;
    }

    // ========================================================================
    // Progress & Persistence
    // ========================================================================

    async fn on_progress_tick(&mut self) {
        let (position, duration) = {
            let Some(adapter) = self.adapter.as_ref() else {
                return;
            };
            (adapter.position_ms().await, adapter.duration_ms().await)
        };
        self.last_position_ms = position;
        self.last_duration_ms = duration;

        let frame = ProgressFrame::new(position, duration);
        self.hosts.surface.set_seek_value(frame.percent);
        self.hosts
            .surface
            .set_time_text(&frame.elapsed_text, &frame.total_text);
        if let Some(started) = self.playing_since {
            let elapsed = started.elapsed().as_millis() as u64;
            self.hosts
                .surface
                .draw_waveform(waveform_phase(elapsed, WAVEFORM_CYCLE_MS));
        }
        self.events.emit(PlayerEvent::Progress {
            position_ms: position,
            duration_ms: duration,
            percent: frame.percent,
        });
        self.spawn_save();
    }

    fn build_snapshot(&self) -> Option<PlaybackSnapshot> {
        let track = self.current.as_ref()?;
        let position_ms = if self.last_duration_ms > 0 {
            self.last_position_ms.min(self.last_duration_ms)
        } else {
            self.last_position_ms
        };
        Some(PlaybackSnapshot {
            track_id: track.track_id.clone(),
            track_url: track.page_url.clone(),
            position_ms,
            duration_ms: self.last_duration_ms,
            is_playing: self.phase.is_playing(),
            api_mode: self
                .adapter
                .as_ref()
                .map_or(true, |a| a.kind() == Backend::Widget),
        })
    }

    /// Fire-and-forget snapshot save so persistence never blocks the loop.
    fn spawn_save(&self) {
        if let Some(snapshot) = self.build_snapshot() {
            let persistence = self.persistence.clone();
            tokio::spawn(async move {
                persistence.save(&snapshot).await;
            });
        }
    }

    // ========================================================================
    // Plumbing
    // ========================================================================

    fn set_phase(&mut self, phase: PlaybackPhase) {
        if self.phase != phase {
            debug!(from = ?self.phase, to = ?phase, "Phase transition");
            self.phase = phase;
            self.events.emit(PlayerEvent::StateChanged { phase });
        }
    }

    fn schedule(&self, delay: Duration, command: InternalCommand) {
        let tx = self.internal_tx.clone();
        tokio::spawn(async move {
            sleep(delay).await;
            let _ = tx.send(command);
        });
    }
}

async fn recv_or_pending<T>(rx: &mut Option<mpsc::UnboundedReceiver<T>>) -> Option<T> {
    match rx {
        Some(rx) => rx.recv().await,
        None => std::future::pending().await,
    }
}
