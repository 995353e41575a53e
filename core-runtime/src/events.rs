//! # Event Bus System
//!
//! Event-driven communication between the playback core and its subscribers,
//! built on `tokio::sync::broadcast`. The UI layer subscribes here for the
//! outbound contract (state changes, progress frames, track metadata, the
//! licensing notice), while the core emits without knowing who is listening.
//!
//! ## Usage
//!
//! ```rust
//! use core_runtime::events::{EventBus, PlayerEvent, PlaybackPhase};
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() {
//! let bus = EventBus::new(100);
//! let mut stream = bus.subscribe();
//!
//! bus.emit(PlayerEvent::StateChanged {
//!     phase: PlaybackPhase::Playing,
//! });
//!
//! let event = stream.recv().await.unwrap();
//! assert_eq!(event.description(), "Playback state changed");
//! # }
//! ```
//!
//! ## Error Handling
//!
//! `broadcast` subscribers that fall behind receive `RecvError::Lagged(n)`;
//! this is non-fatal and the subscriber can continue. `RecvError::Closed`
//! means the core has shut down.

use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;

pub use tokio::sync::broadcast::error::{RecvError, SendError};
pub use tokio::sync::broadcast::Receiver;

/// Default buffer size for the event bus channel.
pub const DEFAULT_EVENT_BUFFER_SIZE: usize = 100;

// ============================================================================
// Event Types
// ============================================================================

/// Playback lifecycle phase, as reported to subscribers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PlaybackPhase {
    Idle,
    Loading,
    Ready,
    Playing,
    Paused,
    Finished,
}

impl PlaybackPhase {
    /// Returns `true` when audio is audibly playing.
    pub fn is_playing(&self) -> bool {
        matches!(self, PlaybackPhase::Playing)
    }
}

/// Events published by the playback core.
///
/// This is the complete outbound contract: everything externally observable
/// that the core drives is either one of these events or a direct
/// `PlayerSurface` call mirroring one.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "event")]
pub enum PlayerEvent {
    /// The state machine moved to a new phase.
    StateChanged { phase: PlaybackPhase },
    /// A track's metadata became available for display.
    TrackLoaded {
        track_id: String,
        title: String,
        artist: String,
    },
    /// Periodic position/duration frame while playing.
    Progress {
        position_ms: u64,
        duration_ms: u64,
        /// Seek-control value on a 0-100 scale.
        percent: f64,
    },
    /// The rights-limitation notice for short-preview playback was shown.
    LicensingNotice,
    /// The player surface was hidden (playlist exhausted).
    PlayerHidden,
    /// Playback could not be started after all fallbacks.
    PlaybackFailed { message: String },
}

impl PlayerEvent {
    /// Returns a human-readable description of the event.
    pub fn description(&self) -> &str {
        match self {
            PlayerEvent::StateChanged { .. } => "Playback state changed",
            PlayerEvent::TrackLoaded { .. } => "Track metadata loaded",
            PlayerEvent::Progress { .. } => "Playback progress",
            PlayerEvent::LicensingNotice => "Licensing notice shown",
            PlayerEvent::PlayerHidden => "Player surface hidden",
            PlayerEvent::PlaybackFailed { .. } => "Playback failed",
        }
    }

    /// Returns the severity level of the event.
    pub fn severity(&self) -> EventSeverity {
        match self {
            PlayerEvent::PlaybackFailed { .. } => EventSeverity::Error,
            PlayerEvent::LicensingNotice => EventSeverity::Warning,
            PlayerEvent::Progress { .. } => EventSeverity::Debug,
            _ => EventSeverity::Info,
        }
    }
}

/// Event severity levels for filtering and logging.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum EventSeverity {
    Debug,
    Info,
    Warning,
    Error,
}

// ============================================================================
// Event Bus
// ============================================================================

/// Central broadcast channel for player events.
///
/// Cloneable and thread-safe; share behind `Arc` across tasks. Emitting with
/// no live subscribers is not an error.
#[derive(Debug, Clone)]
pub struct EventBus {
    sender: broadcast::Sender<PlayerEvent>,
}

impl EventBus {
    /// Create a bus with the given channel capacity.
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self { sender }
    }

    /// Publish an event to all current subscribers.
    pub fn emit(&self, event: PlayerEvent) {
        // A send error only means nobody is listening right now.
        let _ = self.sender.send(event);
    }

    /// Create a new independent subscription.
    pub fn subscribe(&self) -> Receiver<PlayerEvent> {
        self.sender.subscribe()
    }

    /// Number of live subscribers.
    pub fn subscriber_count(&self) -> usize {
        self.sender.receiver_count()
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new(DEFAULT_EVENT_BUFFER_SIZE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn emit_and_receive() {
        let bus = EventBus::new(8);
        let mut rx = bus.subscribe();

        bus.emit(PlayerEvent::StateChanged {
            phase: PlaybackPhase::Loading,
        });

        assert_eq!(
            rx.recv().await.unwrap(),
            PlayerEvent::StateChanged {
                phase: PlaybackPhase::Loading
            }
        );
    }

    #[tokio::test]
    async fn emit_without_subscribers_is_ok() {
        let bus = EventBus::new(8);
        bus.emit(PlayerEvent::PlayerHidden);
        assert_eq!(bus.subscriber_count(), 0);
    }

    #[tokio::test]
    async fn independent_subscriptions() {
        let bus = EventBus::new(8);
        let mut a = bus.subscribe();
        let mut b = bus.subscribe();

        bus.emit(PlayerEvent::LicensingNotice);

        assert_eq!(a.recv().await.unwrap(), PlayerEvent::LicensingNotice);
        assert_eq!(b.recv().await.unwrap(), PlayerEvent::LicensingNotice);
    }

    #[test]
    fn severity_classification() {
        assert_eq!(
            PlayerEvent::PlaybackFailed {
                message: "x".into()
            }
            .severity(),
            EventSeverity::Error
        );
        assert_eq!(
            PlayerEvent::Progress {
                position_ms: 0,
                duration_ms: 0,
                percent: 0.0
            }
            .severity(),
            EventSeverity::Debug
        );
        assert_eq!(PlayerEvent::LicensingNotice.severity(), EventSeverity::Warning);
    }

    #[test]
    fn phase_helpers() {
        assert!(PlaybackPhase::Playing.is_playing());
        assert!(!PlaybackPhase::Paused.is_playing());
        assert!(!PlaybackPhase::Ready.is_playing());
    }

    #[test]
    fn event_serialization_is_tagged() {
        let json = serde_json::to_string(&PlayerEvent::StateChanged {
            phase: PlaybackPhase::Playing,
        })
        .unwrap();
        assert!(json.contains("\"event\":\"StateChanged\""));
        assert!(json.contains("\"playing\""));
    }
}
