//! # Desktop Bridge Implementations
//!
//! Default implementations of bridge traits for desktop platforms
//! (macOS, Windows, Linux).
//!
//! ## Overview
//!
//! This crate provides production-ready implementations of the host bridges
//! the playback core needs on desktop:
//! - `HttpClient` using `reqwest`
//! - `SnapshotStore` as a data-dir file per key using `tokio::fs`
//! - `PlatformProbe` reading the client credential from the environment
//!
//! The widget and media-element hosts are deliberately absent here: they wrap
//! rendering-stack objects, so the embedding application provides them.
//!
//! ## Usage
//!
//! ```ignore
//! use bridge_desktop::{EnvPlatformProbe, FileSnapshotStore, ReqwestHttpClient};
//!
//! #[tokio::main]
//! async fn main() {
//!     let http = ReqwestHttpClient::new();
//!     let snapshots = FileSnapshotStore::in_data_dir("wavecore").unwrap();
//!     let platform = EnvPlatformProbe::new();
//! }
//! ```

mod http;
mod platform;
mod storage;

pub use http::ReqwestHttpClient;
pub use platform::EnvPlatformProbe;
pub use storage::FileSnapshotStore;
