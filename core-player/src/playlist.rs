//! # Playlist Ordering
//!
//! Derives the traversal order from whatever track list the host view is
//! currently showing. The view is the source of truth for membership; this
//! module only owns ordering (sequential or shuffled) and the next/prev
//! cursor arithmetic.
//!
//! Shuffle reshuffles the full list every time it is switched on, and a view
//! change while shuffled reshuffles again over the new membership. Traversal
//! wraps at both ends.

use rand::seq::SliceRandom;
use serde::{Deserialize, Serialize};

/// A track as listed by the host view.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrackRef {
    /// Service-assigned track identifier.
    pub track_id: String,
    /// Public page URL for the track, the input to stream resolution and to
    /// widget loads.
    pub page_url: String,
}

impl TrackRef {
    pub fn new(track_id: impl Into<String>, page_url: impl Into<String>) -> Self {
        Self {
            track_id: track_id.into(),
            page_url: page_url.into(),
        }
    }
}

/// The track list the host view currently renders.
///
/// Some views render an empty primary list while a surrounding container
/// still knows the full membership; the container list is used as a fallback
/// so traversal keeps working there.
#[derive(Debug, Clone, Default)]
pub struct ViewSnapshot {
    /// Tracks in rendered order.
    pub rendered: Vec<TrackRef>,
    /// Fallback membership when the rendered list is empty.
    pub container_fallback: Vec<TrackRef>,
}

impl ViewSnapshot {
    /// The effective track list: rendered tracks, or the container fallback
    /// when nothing is rendered.
    pub fn effective(&self) -> &[TrackRef] {
        if self.rendered.is_empty() {
            &self.container_fallback
        } else {
            &self.rendered
        }
    }
}

/// Current traversal order over the view's tracks.
#[derive(Debug, Clone, Default)]
pub struct PlaylistOrder {
    tracks: Vec<TrackRef>,
    shuffled: bool,
}

impl PlaylistOrder {
    /// Rebuild the order from the view, deduplicated by track id (first
    /// occurrence wins). Shuffles when shuffle is on.
    pub fn rebuild(&mut self, view: &ViewSnapshot, shuffle: bool) {
        let mut seen = std::collections::HashSet::new();
        self.tracks = view
            .effective()
            .iter()
            .filter(|t| seen.insert(t.track_id.clone()))
            .cloned()
            .collect();
        self.shuffled = shuffle;
        if shuffle {
            self.tracks.shuffle(&mut rand::thread_rng());
        }
    }

    pub fn is_empty(&self) -> bool {
        self.tracks.is_empty()
    }

    pub fn len(&self) -> usize {
        self.tracks.len()
    }

    pub fn is_shuffled(&self) -> bool {
        self.shuffled
    }

    pub fn tracks(&self) -> &[TrackRef] {
        &self.tracks
    }

    fn position_of(&self, track_id: &str) -> Option<usize> {
        self.tracks.iter().position(|t| t.track_id == track_id)
    }

    /// The track after `current_id`, wrapping from the last to the first.
    /// An unknown or absent current id yields the first track, so traversal
    /// recovers after the playing track disappears from the view.
    pub fn next_after(&self, current_id: Option<&str>) -> Option<&TrackRef> {
        if self.tracks.is_empty() {
            return None;
        }
        let index = match current_id.and_then(|id| self.position_of(id)) {
            Some(i) => (i + 1) % self.tracks.len(),
            None => 0,
        };
        self.tracks.get(index)
    }

    /// The track before `current_id`, wrapping from the first to the last.
    /// An unknown or absent current id yields the last track.
    pub fn prev_before(&self, current_id: Option<&str>) -> Option<&TrackRef> {
        if self.tracks.is_empty() {
            return None;
        }
        let index = match current_id.and_then(|id| self.position_of(id)) {
            Some(0) => self.tracks.len() - 1,
            Some(i) => i - 1,
            None => self.tracks.len() - 1,
        };
        self.tracks.get(index)
    }
}
