//! Platform Heuristics & Credential Lookup
//!
//! Backend selection depends on what the host environment can tell us about
//! the device class and whether a client credential for the third-party
//! service is configured. Credentials may load asynchronously after first
//! paint, so the core re-queries this probe on every load request instead of
//! caching the answer.

/// Host-provided platform facts consulted by the backend selector.
pub trait PlatformProbe: Send + Sync {
    /// `true` when the device exposes touch input and no fine pointer.
    fn is_touch_only(&self) -> bool;

    /// The device pixel ratio reported by the environment.
    fn device_pixel_ratio(&self) -> f64;

    /// The configured client credential, read from page metadata or an
    /// environment-exposed global. `None` until the credential has loaded.
    fn client_credential(&self) -> Option<String>;
}

/// Value-backed probe for hosts with static platform facts, and for tests.
#[derive(Debug, Clone, Default)]
pub struct StaticPlatformProbe {
    pub touch_only: bool,
    pub pixel_ratio: f64,
    pub credential: Option<String>,
}

impl PlatformProbe for StaticPlatformProbe {
    fn is_touch_only(&self) -> bool {
        self.touch_only
    }

    fn device_pixel_ratio(&self) -> f64 {
        self.pixel_ratio
    }

    fn client_credential(&self) -> Option<String> {
        self.credential.clone()
    }
}
