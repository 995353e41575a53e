//! # Playback Backend Selection
//!
//! Chooses between the embedded widget and the native media element on every
//! load request. Widget mode is the safe default: it works without a client
//! credential and survives the third-party API being unreachable. Direct mode
//! is only worth its resolver round-trips on touch-only high-density devices,
//! where the embedded widget is unreliable.
//!
//! The decision is re-evaluated per load, never cached: the client credential
//! may arrive asynchronously after startup, and a restore can happen before
//! it does.

use bridge_traits::PlatformProbe;

/// Which playback adapter drives the current track.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Backend {
    /// Embedded third-party player widget, controlled through [`bridge_traits::WidgetHost`].
    Widget,
    /// Native media element fed a resolved stream URL.
    Direct,
}

impl Backend {
    pub fn as_str(&self) -> &'static str {
        match self {
            Backend::Widget => "widget",
            Backend::Direct => "direct",
        }
    }
}

impl std::fmt::Display for Backend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Select the backend for the next load.
///
/// Direct mode requires all of:
/// - a touch-only device (touch input, no fine pointer)
/// - a device pixel ratio at or above `high_density_ratio`
/// - a configured client credential
/// - the widget override being off
///
/// Anything else selects widget mode.
pub fn select_backend(probe: &dyn PlatformProbe, force_widget: bool, high_density_ratio: f64) -> Backend {
    if force_widget {
        return Backend::Widget;
    }
    let high_density = probe.device_pixel_ratio() >= high_density_ratio;
    if probe.is_touch_only() && high_density && probe.client_credential().is_some() {
        Backend::Direct
    } else {
        Backend::Widget
    }
}
