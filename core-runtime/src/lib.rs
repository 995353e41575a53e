//! # Core Runtime Module
//!
//! Foundational runtime infrastructure for the playback core:
//! - Event bus system (typed broadcast of player events)
//! - Logging and tracing bootstrap
//!
//! This crate contains the runtime utilities the orchestrator depends on. It
//! establishes the event-broadcasting and logging conventions used throughout
//! the workspace.

pub mod error;
pub mod events;
pub mod logging;

pub use error::{Error, Result};
pub use events::{EventBus, PlaybackPhase, PlayerEvent};
