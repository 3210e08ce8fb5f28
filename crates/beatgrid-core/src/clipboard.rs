//! Editor clipboard for copy/cut/paste of notes

use crate::note::Note;
use crate::track::TrackId;

/// Notes copied from one track
#[derive(Debug, Clone)]
pub struct CopiedTrack {
    pub track_id: TrackId,
    pub notes: Vec<Note>,
}

/// Clipboard that lives on the editor. Pasting needs a target cell reported by the UI.
#[derive(Debug, Default)]
pub struct NoteClipboard {
    content: Vec<CopiedTrack>,
}

impl NoteClipboard {
    pub fn copy(&mut self, content: Vec<CopiedTrack>) {
        self.content = content;
    }

    pub fn content(&self) -> &[CopiedTrack] {
        &self.content
    }

    pub fn clear(&mut self) {
        self.content.clear();
    }

    pub fn has_notes(&self) -> bool {
        self.content.iter().any(|t| !t.notes.is_empty())
    }

    pub fn note_count(&self) -> usize {
        self.content.iter().map(|t| t.notes.len()).sum()
    }

    /// Leftmost cell of the copied block
    pub fn min_position(&self) -> Option<u32> {
        self.content
            .iter()
            .flat_map(|t| t.notes.iter())
            .map(|n| n.grid_position)
            .min()
    }
}
