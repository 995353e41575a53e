//! # Playback Orchestration Module
//!
//! The single source of truth for "what is loaded, is it playing, at what
//! position" when playing tracks hosted by a third-party audio service.
//!
//! ## Overview
//!
//! This crate handles:
//! - Stream resolution (page URL → time-limited media URL, with format fallback)
//! - Backend selection between a native media element ("direct mode") and an
//!   embedded third-party player widget ("widget mode")
//! - The playback state machine driving whichever adapter is active
//! - Playlist traversal (shuffle/repeat/next/prev with wraparound)
//! - Best-effort persistence of playback state across page navigations
//! - Progress polling and the seek/waveform surface updates
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────┐  commands   ┌───────────────────────────┐
//! │  Host UI     ├────────────>│  PlayerController (actor) │
//! └──────────────┘             │                           │
//!        ▲        events       │  ┌─────────────────────┐  │
//!        └─────────────────────┤  │ Arc<dyn PlayerAdapter>  │
//!          (EventBus broadcast)│  │  Widget | Direct    │  │
//!                              │  └────────┬────────────┘  │
//!                              └───────────┼───────────────┘
//!                                          │ bridge traits
//!                              ┌───────────▼───────────────┐
//!                              │ WidgetHost / MediaElement │
//!                              │ HttpClient / SnapshotStore│
//!                              └───────────────────────────┘
//! ```
//!
//! The controller owns at most one adapter at a time; tearing one down
//! (unbind events, clear the reference) happens synchronously before any
//! asynchronous step of the next load begins.

pub mod adapter;
pub mod backend;
pub mod config;
pub mod controller;
pub mod error;
pub mod persist;
pub mod playlist;
pub mod progress;
pub mod resolver;
pub mod retry;

pub use backend::Backend;
pub use config::PlayerConfig;
pub use controller::{PlayerController, PlayerHandle, PlayerHosts};
pub use error::{PlayerError, Result};
pub use playlist::{TrackRef, ViewSnapshot};
