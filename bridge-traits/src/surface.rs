//! Outbound Player Chrome
//!
//! The only externally observable UI effects the playback core drives:
//! play/pause icon state, current/duration text, seek value, per-track
//! "now playing" highlighting, the licensing notice, and the decorative
//! waveform repaint. Everything else about the player's look is the host's
//! business.
//!
//! All methods are synchronous and infallible from the core's point of view;
//! hosts that need to do async work should queue internally.

/// Host-rendered player chrome driven by the core.
pub trait PlayerSurface: Send + Sync {
    /// Flip the play/pause icon.
    fn set_play_icon(&self, playing: bool);

    /// Move the seek control. `percent` is on a 0-100 scale.
    fn set_seek_value(&self, percent: f64);

    /// Update the two textual timers (`m:ss` each).
    fn set_time_text(&self, position: &str, duration: &str);

    /// Highlight the row for `track_id`, clearing any previous highlight.
    /// `None` clears the highlight entirely.
    fn highlight_track(&self, track_id: Option<&str>);

    /// Surface the rights-limitation notice for short-preview playback.
    /// Hosts with an alert-dialog service show a modal; otherwise a blocking
    /// browser alert.
    fn show_licensing_notice(&self);

    /// Generic "couldn't start playback" notice, shown only when widget
    /// fallback has also failed.
    fn show_playback_error(&self);

    /// Hide the player surface after the playlist is exhausted.
    fn hide_player(&self);

    /// Repaint the decorative waveform. Purely cosmetic; carries no state.
    fn draw_waveform(&self, phase: f64);
}

/// No-op surface for headless hosts and tests.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullSurface;

impl PlayerSurface for NullSurface {
    fn set_play_icon(&self, _playing: bool) {}
    fn set_seek_value(&self, _percent: f64) {}
    fn set_time_text(&self, _position: &str, _duration: &str) {}
    fn highlight_track(&self, _track_id: Option<&str>) {}
    fn show_licensing_notice(&self) {}
    fn show_playback_error(&self) {}
    fn hide_player(&self) {}
    fn draw_waveform(&self, _phase: f64) {}
}
