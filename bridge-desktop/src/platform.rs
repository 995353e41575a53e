//! Platform Probe from the Process Environment

use bridge_traits::platform::PlatformProbe;

/// Environment variable holding the third-party service client credential.
pub const CREDENTIAL_ENV_VAR: &str = "WAVECORE_CLIENT_ID";

/// Desktop platform probe
///
/// Desktops have a fine pointer and standard density, so backend selection
/// always lands on widget mode here; the probe still reads the client
/// credential from the environment on every call, matching how web hosts
/// pick up credentials that load after first paint.
#[derive(Debug, Clone, Default)]
pub struct EnvPlatformProbe;

impl EnvPlatformProbe {
    pub fn new() -> Self {
        Self
    }
}

impl PlatformProbe for EnvPlatformProbe {
    fn is_touch_only(&self) -> bool {
        false
    }

    fn device_pixel_ratio(&self) -> f64 {
        1.0
    }

    fn client_credential(&self) -> Option<String> {
        std::env::var(CREDENTIAL_ENV_VAR)
            .ok()
            .filter(|v| !v.is_empty())
    }
}
