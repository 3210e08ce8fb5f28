use crate::grid::CELL_WIDTH;
use crate::note::{Note, NoteKey};
use crate::track::TrackId;

use super::types::Bounds;
use super::Editor;

/// Width of the grab zone at a selected note's right edge, in pixels
pub(super) const RESIZE_HANDLE_PX: f64 = 2.0;

impl Editor {
    /// Cell under grid-surface x, clamped to the music length when one is loaded
    pub fn cell_at(&self, x: f64) -> u32 {
        let timing = self.timing();
        let cell = timing.cell_at_pixel(x);
        match timing.total_cells(self.music_duration) {
            0 => cell,
            total => cell.min(total - 1),
        }
    }

    /// Left and right pixel edges of a note on the grid surface
    pub fn note_span_px(&self, note: &Note) -> (f64, f64) {
        let timing = self.timing();
        let left = timing.cell_to_pixel(note.grid_position);
        (left, left + note.grid_width as f64 * CELL_WIDTH)
    }

    /// Bounds of a note drawn in a row spanning `row_top..row_bottom`
    pub fn note_bounds(&self, note: &Note, row_top: f64, row_bottom: f64) -> Bounds {
        let (left, right) = self.note_span_px(note);
        Bounds::new(left, row_top, right, row_bottom)
    }

    /// Note on `track_id` under grid-surface x
    pub(super) fn note_at(&self, track_id: TrackId, x: f64) -> Option<NoteKey> {
        let track = self.state.track(track_id)?;
        track
            .notes
            .iter()
            .find(|n| {
                let (left, right) = self.note_span_px(n);
                x >= left && x < right
            })
            .map(|n| n.key())
    }

    /// Selected note on `track_id` whose resize handle is under x
    pub(super) fn resize_handle_at(&self, track_id: TrackId, x: f64) -> Option<NoteKey> {
        let track = self.state.track(track_id)?;
        track
            .notes
            .iter()
            .filter(|n| self.selection.contains(n.key()))
            .find(|n| {
                let (left, right) = self.note_span_px(n);
                x >= (right - RESIZE_HANDLE_PX).max(left) && x <= right
            })
            .map(|n| n.key())
    }
}

#[cfg(test)]
mod tests {
    use std::time::Instant;

    use super::*;
    use crate::state::EditorState;

    #[test]
    fn test_cell_at_clamps_to_music() {
        let mut editor = Editor::new(EditorState::default(), Instant::now());
        assert_eq!(editor.cell_at(10_000.0), (10_000.0 / CELL_WIDTH) as u32);
        // Two seconds at 120 bpm / 4 is 16 cells
        editor.set_audio(None, "song.wav", 2.0);
        assert_eq!(editor.cell_at(10_000.0), 15);
        assert_eq!(editor.cell_at(-5.0), 0);
    }

    #[test]
    fn test_hit_tests() {
        let mut editor = Editor::new(EditorState::default(), Instant::now());
        let track = editor.add_track("Kick", "#fff");
        let id = editor.create_note(track, 2, 2).unwrap();
        let key = NoteKey::new(track, id);

        assert_eq!(editor.note_at(track, 48.0), Some(key));
        assert_eq!(editor.note_at(track, 95.0), Some(key));
        assert_eq!(editor.note_at(track, 96.0), None);

        // Handle only applies to selected notes
        assert_eq!(editor.resize_handle_at(track, 95.0), None);
        editor.select_only(key);
        assert_eq!(editor.resize_handle_at(track, 95.0), Some(key));
        assert_eq!(editor.resize_handle_at(track, 90.0), None);

        let bounds = editor.note_bounds(editor.state().note(key).unwrap(), 10.0, 30.0);
        assert_eq!(bounds, Bounds::new(48.0, 10.0, 96.0, 30.0));
    }
}
