//! Workspace placeholder crate.
//!
//! This crate exists to expose the workspace crates behind one dependency
//! with shared feature flags. Host applications can depend on `wavecore`,
//! enable the `desktop` feature for the bundled desktop bridges, and wire
//! the playback core without naming each member crate individually.

pub use bridge_traits;
pub use core_player;
pub use core_runtime;

#[cfg(feature = "desktop")]
pub use bridge_desktop;
