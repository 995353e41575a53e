//! # Progress Rendering
//!
//! Pure helpers behind the 1-second progress poll: timer text formatting,
//! seek percentage arithmetic, and the decorative waveform's animation phase.
//! The polling itself lives in the controller loop; keeping the arithmetic
//! here keeps it trivially testable.

/// One repaint's worth of progress data, handed to the surface each poll tick.
#[derive(Debug, Clone, PartialEq)]
pub struct ProgressFrame {
    pub position_ms: u64,
    pub duration_ms: u64,
    /// Seek control value on a 0..=100 scale.
    pub percent: f64,
    /// Elapsed timer text, `m:ss`.
    pub elapsed_text: String,
    /// Total-duration timer text, `m:ss`.
    pub total_text: String,
}

impl ProgressFrame {
    pub fn new(position_ms: u64, duration_ms: u64) -> Self {
        Self {
            position_ms,
            duration_ms,
            percent: seek_percent(position_ms, duration_ms),
            elapsed_text: format_time(Some(position_ms as f64)),
            total_text: format_time(Some(duration_ms as f64)),
        }
    }
}

/// Format a millisecond timestamp as `m:ss`, with seconds zero-padded.
/// Absent, non-finite, or negative values render as `0:00`.
pub fn format_time(ms: Option<f64>) -> String {
    let ms = match ms {
        Some(ms) if ms.is_finite() && ms >= 0.0 => ms,
        _ => return "0:00".to_string(),
    };
    let total_seconds = (ms / 1000.0).floor() as u64;
    format!("{}:{:02}", total_seconds / 60, total_seconds % 60)
}

/// Seek control value on a 0..=100 scale. An unknown duration maps to 0 so
/// the control stays parked instead of jumping around.
pub fn seek_percent(position_ms: u64, duration_ms: u64) -> f64 {
    if duration_ms == 0 {
        return 0.0;
    }
    ((position_ms as f64 / duration_ms as f64) * 100.0).clamp(0.0, 100.0)
}

/// Millisecond position targeted by a seek control value on a 0..=100 scale.
pub fn percent_to_position_ms(percent: f64, duration_ms: u64) -> u64 {
    let percent = percent.clamp(0.0, 100.0);
    ((duration_ms as f64) * percent / 100.0).round() as u64
}

/// Animation phase for the decorative waveform, in radians, derived from a
/// wall-clock offset. Purely cosmetic: the bars sway but carry no playback
/// state.
pub fn waveform_phase(elapsed_ms: u64, cycle_ms: u64) -> f64 {
    if cycle_ms == 0 {
        return 0.0;
    }
    let within = (elapsed_ms % cycle_ms) as f64 / cycle_ms as f64;
    within * std::f64::consts::TAU
}
