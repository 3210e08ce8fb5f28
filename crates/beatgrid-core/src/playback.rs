//! Realtime note entry while the music plays

use std::collections::BTreeMap;

use crate::grid::{time_to_grid_position, time_to_pixel_position, GridTiming, CELL_WIDTH};
use crate::track::{Track, TrackId};

/// Presses shorter than this become instant notes
pub const SHORT_PRESS_SECS: f64 = 0.1;

#[derive(Debug, Clone, Copy, PartialEq)]
struct PressedKey {
    track_id: TrackId,
    start_time: f64,
    start_grid_position: u32,
}

/// Note being held down, drawn growing under the playhead
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PreviewNote {
    pub track_id: TrackId,
    pub grid_position: u32,
    pub grid_width: u32,
}

/// A finished press, ready to be committed as a note
pub type RecordedNote = PreviewNote;

/// Turns key presses on tracks' assigned keys into notes.
///
/// Only listens while active (auto-follow on and music playing).
#[derive(Debug, Default)]
pub struct RealtimeRecorder {
    active: bool,
    pressed: BTreeMap<String, PressedKey>,
}

impl RealtimeRecorder {
    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Switch realtime mode; leaving it flushes every held key as a note ending now
    pub fn set_active(&mut self, active: bool, current_time: f64, timing: &GridTiming) -> Vec<RecordedNote> {
        self.active = active;
        if active {
            return Vec::new();
        }
        let pressed = std::mem::take(&mut self.pressed);
        pressed
            .into_values()
            .map(|key| long_note(&key, current_time, timing))
            .collect()
    }

    /// Returns true when the key belongs to a track and was consumed.
    pub fn key_down(&mut self, key: &str, tracks: &[Track], current_time: f64, timing: &GridTiming) -> bool {
        if !self.active {
            return false;
        }
        let Some(track) = tracks.iter().find(|t| t.matches_key(key)) else {
            return false;
        };

        let key = key.to_lowercase();
        // Held keys repeat; only the first press counts
        self.pressed.entry(key).or_insert_with(|| PressedKey {
            track_id: track.id,
            start_time: current_time,
            start_grid_position: cell_at_time(current_time, timing),
        });
        true
    }

    pub fn key_up(&mut self, key: &str, current_time: f64, timing: &GridTiming) -> Option<RecordedNote> {
        let pressed = self.pressed.remove(&key.to_lowercase())?;
        if current_time - pressed.start_time < SHORT_PRESS_SECS {
            return Some(RecordedNote {
                track_id: pressed.track_id,
                grid_position: pressed.start_grid_position,
                grid_width: 1,
            });
        }
        Some(long_note(&pressed, current_time, timing))
    }

    pub fn previews(&self, current_time: f64, timing: &GridTiming) -> Vec<PreviewNote> {
        if !self.active {
            return Vec::new();
        }
        self.pressed
            .values()
            .map(|key| long_note(key, current_time, timing))
            .collect()
    }

    pub fn has_pressed_keys(&self) -> bool {
        !self.pressed.is_empty()
    }
}

fn cell_at_time(time: f64, timing: &GridTiming) -> u32 {
    time_to_grid_position(time - timing.offset_time(), timing.bpm, timing.sub_rhythm_sync)
}

fn long_note(key: &PressedKey, end_time: f64, timing: &GridTiming) -> RecordedNote {
    let start_px = time_to_pixel_position(key.start_time, timing.bpm, timing.sub_rhythm_sync);
    let end_px = time_to_pixel_position(end_time, timing.bpm, timing.sub_rhythm_sync);
    let width_px = (end_px - start_px).max(CELL_WIDTH);
    RecordedNote {
        track_id: key.track_id,
        grid_position: key.start_grid_position,
        grid_width: ((width_px / CELL_WIDTH).round() as u32).max(1),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tracks() -> Vec<Track> {
        let mut kick = Track::new(TrackId(1), "Kick", "#fff", 0);
        kick.assigned_key = Some("k".into());
        vec![kick]
    }

    #[test]
    fn test_short_press_is_instant() {
        let timing = GridTiming::new(120.0, 4, 0.0);
        let mut recorder = RealtimeRecorder::default();
        recorder.set_active(true, 0.0, &timing);

        assert!(recorder.key_down("K", &tracks(), 1.0, &timing));
        let note = recorder.key_up("k", 1.05, &timing).unwrap();
        assert_eq!(note.grid_position, 8);
        assert_eq!(note.grid_width, 1);
    }

    #[test]
    fn test_long_press_width() {
        let timing = GridTiming::new(120.0, 4, 0.0);
        let mut recorder = RealtimeRecorder::default();
        recorder.set_active(true, 0.0, &timing);

        recorder.key_down("k", &tracks(), 1.0, &timing);
        // Repeat events while held keep the original start
        recorder.key_down("k", &tracks(), 1.2, &timing);
        assert_eq!(recorder.previews(1.25, &timing)[0].grid_width, 2);

        let note = recorder.key_up("k", 1.5, &timing).unwrap();
        assert_eq!(note.grid_position, 8);
        assert_eq!(note.grid_width, 4);
    }

    #[test]
    fn test_inactive_ignores_keys_and_flushes() {
        let timing = GridTiming::new(120.0, 4, 0.0);
        let mut recorder = RealtimeRecorder::default();
        assert!(!recorder.key_down("k", &tracks(), 1.0, &timing));

        recorder.set_active(true, 0.0, &timing);
        assert!(!recorder.key_down("x", &tracks(), 1.0, &timing));
        recorder.key_down("k", &tracks(), 1.0, &timing);
        let flushed = recorder.set_active(false, 2.0, &timing);
        assert_eq!(flushed.len(), 1);
        assert_eq!(flushed[0].grid_width, 8);
        assert!(!recorder.has_pressed_keys());
    }
}
