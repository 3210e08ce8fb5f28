//! Notes placed on a track grid

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::action::NoteAction;
use crate::grid::GridTiming;
use crate::track::TrackId;

/// Shortest window during which an instant note counts as active
pub const INSTANT_NOTE_WINDOW: f64 = 0.1;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct NoteId(pub u64);

/// Composite `track:note` key used by the selection set
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NoteKey {
    pub track_id: TrackId,
    pub note_id: NoteId,
}

impl NoteKey {
    pub fn new(track_id: TrackId, note_id: NoteId) -> Self {
        Self { track_id, note_id }
    }
}

impl fmt::Display for NoteKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.track_id.0, self.note_id.0)
    }
}

/// A timed marker on a track.
///
/// `grid_position`/`grid_width` are authoritative; `start_time`/`duration` are
/// derived from them and refreshed by [`Note::retime`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Note {
    pub id: NoteId,
    pub track_id: TrackId,
    pub track_name: String,
    /// Seconds
    pub start_time: f64,
    /// Seconds, 0 for single-cell notes
    pub duration: f64,
    pub grid_position: u32,
    pub grid_width: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub specific_action: Option<NoteAction>,
}

impl Note {
    pub fn new(
        id: NoteId,
        track_id: TrackId,
        track_name: impl Into<String>,
        grid_position: u32,
        grid_width: u32,
        timing: &GridTiming,
    ) -> Self {
        let mut note = Self {
            id,
            track_id,
            track_name: track_name.into(),
            start_time: 0.0,
            duration: 0.0,
            grid_position,
            grid_width: grid_width.max(1),
            specific_action: None,
        };
        note.retime(timing);
        note
    }

    /// One past the last cell covered by this note
    pub fn grid_end(&self) -> u32 {
        self.grid_position.saturating_add(self.grid_width)
    }

    pub fn key(&self) -> NoteKey {
        NoteKey::new(self.track_id, self.id)
    }

    pub fn is_instant(&self) -> bool {
        self.grid_width == 1
    }

    /// Half-open cell interval intersection
    pub fn overlaps_range(&self, position: u32, width: u32) -> bool {
        ranges_overlap(self.grid_position, self.grid_width, position, width)
    }

    pub fn overlaps(&self, other: &Note) -> bool {
        self.overlaps_range(other.grid_position, other.grid_width)
    }

    /// Recompute times from the grid cells
    pub fn retime(&mut self, timing: &GridTiming) {
        self.grid_width = self.grid_width.max(1);
        self.start_time = timing.note_start_time(self.grid_position);
        self.duration = timing.note_duration(self.grid_width);
    }

    pub fn set_grid(&mut self, grid_position: u32, grid_width: u32, timing: &GridTiming) {
        self.grid_position = grid_position;
        self.grid_width = grid_width.max(1);
        self.retime(timing);
    }

    pub fn end_time(&self) -> f64 {
        self.start_time + self.duration
    }

    /// Whether the playhead at `current_time` falls on this note
    pub fn is_active_at(&self, current_time: f64) -> bool {
        let window = if self.duration == 0.0 { INSTANT_NOTE_WINDOW } else { self.duration };
        current_time >= self.start_time && current_time <= self.start_time + window
    }
}

pub fn ranges_overlap(a_position: u32, a_width: u32, b_position: u32, b_width: u32) -> bool {
    let a_end = a_position as u64 + a_width as u64;
    let b_end = b_position as u64 + b_width as u64;
    (a_position as u64) < b_end && a_end > b_position as u64
}

/// Whether `[position, position + width)` ends inside the `u32` cell range
pub fn fits_grid(position: u32, width: u32) -> bool {
    position.checked_add(width).is_some()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_far_cells_do_not_overflow() {
        assert!(ranges_overlap(u32::MAX, u32::MAX, u32::MAX - 1, 2));
        assert!(!ranges_overlap(u32::MAX - 1, 1, 0, u32::MAX - 1));
        assert!(fits_grid(u32::MAX - 1, 1));
        assert!(!fits_grid(u32::MAX, 1));
    }

    #[test]
    fn test_overlap_is_half_open() {
        assert!(ranges_overlap(0, 2, 1, 1));
        assert!(!ranges_overlap(0, 2, 2, 1)); // touching ends
        assert!(!ranges_overlap(3, 1, 0, 3));
        assert!(ranges_overlap(2, 8, 4, 1));
    }

    #[test]
    fn test_instant_note_active_window() {
        let timing = GridTiming::new(120.0, 4, 0.0);
        let note = Note::new(NoteId(1), TrackId(1), "Kick", 8, 1, &timing);
        assert_eq!(note.start_time, 1.0);
        assert_eq!(note.duration, 0.0);
        assert!(note.is_active_at(1.05));
        assert!(!note.is_active_at(1.2));
        assert!(!note.is_active_at(0.99));
    }

    #[test]
    fn test_width_never_zero() {
        let timing = GridTiming::default();
        let note = Note::new(NoteId(1), TrackId(1), "Snare", 0, 0, &timing);
        assert_eq!(note.grid_width, 1);
        assert_eq!(NoteKey::new(TrackId(3), NoteId(7)).to_string(), "3:7");
    }
}
