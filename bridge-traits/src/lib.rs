//! # Host Bridge Traits
//!
//! Platform abstraction traits that must be implemented by each host
//! environment embedding the playback core.
//!
//! ## Overview
//!
//! This crate defines the contract between the playback orchestrator and the
//! environment it runs inside. Each trait represents a capability the core
//! requires but that only the host can provide: network access, the embedded
//! third-party player frame, the native media element, client-local storage,
//! and the visible player chrome.
//!
//! ## Traits
//!
//! ### Networking & Storage
//! - [`HttpClient`](http::HttpClient) - Async HTTP operations for stream resolution
//! - [`SnapshotStore`](storage::SnapshotStore) - Well-known-key client storage
//!
//! ### Playback Surfaces
//! - [`WidgetHost`](widget::WidgetHost) - The embedded third-party player frame
//! - [`MediaElementHost`](media::MediaElementHost) - The native media element
//!
//! ### Environment
//! - [`PlatformProbe`](platform::PlatformProbe) - Device heuristics and client credential
//! - [`PlayerSurface`](surface::PlayerSurface) - Outbound UI effects the core drives
//!
//! ## Error Handling
//!
//! All bridge traits use the [`BridgeError`](error::BridgeError) type.
//! Host implementations should convert platform-specific failures into
//! `BridgeError` with actionable messages. Teardown-path operations are
//! best-effort by contract: the core swallows their errors, so hosts should
//! prefer returning an error over panicking.
//!
//! ## Thread Safety
//!
//! All bridge traits require `Send + Sync` bounds so implementations can be
//! shared across async tasks behind `Arc`.

pub mod error;
pub mod http;
pub mod media;
pub mod platform;
pub mod storage;
pub mod surface;
pub mod widget;

pub use error::BridgeError;

// Re-export commonly used types
pub use http::{HttpClient, HttpRequest, HttpResponse};
pub use media::{MediaElementHost, MediaEvent};
pub use platform::{PlatformProbe, StaticPlatformProbe};
pub use storage::{MemorySnapshotStore, SnapshotStore};
pub use surface::{NullSurface, PlayerSurface};
pub use widget::{WidgetEvent, WidgetHost, WidgetSound};
