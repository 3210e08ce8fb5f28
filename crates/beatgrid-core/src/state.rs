//! Snapshot of everything undo/redo restores

use std::collections::HashSet;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::action::SpecificAction;
use crate::error::{BeatgridError, Result};
use crate::grid::GridTiming;
use crate::note::{fits_grid, Note, NoteKey};
use crate::track::{Track, TrackGroup, TrackGroupId, TrackId};

/// Full editable document state. Compared by value to detect real changes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EditorState {
    #[serde(default)]
    pub tracks: Vec<Track>,
    #[serde(default)]
    pub track_groups: Vec<TrackGroup>,
    #[serde(default)]
    pub specific_actions: Vec<SpecificAction>,
    pub bpm: f64,
    /// Beats per measure (display only)
    pub rhythm_sync: u32,
    /// Cells per beat
    pub sub_rhythm_sync: u32,
    /// 0-100
    pub volume: f64,
    /// Playback rate
    pub pitch: f64,
    /// Pixels
    pub start_offset: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub audio_path: Option<PathBuf>,
    #[serde(default)]
    pub audio_file_name: String,
}

impl Default for EditorState {
    fn default() -> Self {
        Self {
            tracks: Vec::new(),
            track_groups: Vec::new(),
            specific_actions: Vec::new(),
            bpm: 120.0,
            rhythm_sync: 4,
            sub_rhythm_sync: 4,
            volume: 70.0,
            pitch: 1.0,
            start_offset: 0.0,
            audio_path: None,
            audio_file_name: String::new(),
        }
    }
}

impl EditorState {
    pub fn timing(&self) -> GridTiming {
        GridTiming::new(self.bpm, self.sub_rhythm_sync, self.start_offset)
    }

    pub fn track(&self, id: TrackId) -> Option<&Track> {
        self.tracks.iter().find(|t| t.id == id)
    }

    pub fn track_mut(&mut self, id: TrackId) -> Option<&mut Track> {
        self.tracks.iter_mut().find(|t| t.id == id)
    }

    pub fn group(&self, id: TrackGroupId) -> Option<&TrackGroup> {
        self.track_groups.iter().find(|g| g.id == id)
    }

    pub fn note(&self, key: NoteKey) -> Option<&Note> {
        self.track(key.track_id)?.note(key.note_id)
    }

    /// Tracks sorted by display order
    pub fn ordered_tracks(&self) -> Vec<&Track> {
        let mut tracks: Vec<&Track> = self.tracks.iter().collect();
        tracks.sort_by_key(|t| t.order);
        tracks
    }

    /// Tracks shown in the grid: visible themselves and not in a hidden group
    pub fn displayed_tracks(&self) -> Vec<&Track> {
        self.ordered_tracks()
            .into_iter()
            .filter(|t| t.visible)
            .filter(|t| {
                t.group_id
                    .and_then(|g| self.group(g))
                    .is_none_or(|g| g.visible)
            })
            .collect()
    }

    /// Refresh every derived note time from its grid cells
    pub fn retime(&mut self) {
        let timing = self.timing();
        for track in &mut self.tracks {
            track.retime(&timing);
        }
    }

    pub fn note_count(&self) -> usize {
        self.tracks.iter().map(|t| t.notes.len()).sum()
    }

    /// Check a state read from outside the editor before it replaces the
    /// current one.
    pub fn validate(&self) -> Result<()> {
        if !self.bpm.is_finite() || self.bpm <= 0.0 {
            return Err(BeatgridError::InvalidTempo(self.bpm));
        }
        if self.sub_rhythm_sync == 0 {
            return Err(BeatgridError::InvalidSubdivision(self.sub_rhythm_sync));
        }
        for track in &self.tracks {
            let mut seen = HashSet::with_capacity(track.notes.len());
            for note in &track.notes {
                if !seen.insert(note.id) {
                    return Err(BeatgridError::DuplicateNoteId { track: track.id.0, note: note.id.0 });
                }
                if !fits_grid(note.grid_position, note.grid_width) {
                    return Err(BeatgridError::NoteOutOfRange { track: track.id.0, note: note.id.0 });
                }
            }
            if !track.is_overlap_free() {
                return Err(BeatgridError::OverlappingNotes { track: track.id.0 });
            }
        }
        Ok(())
    }

    /// Largest id of any entity in the state, used to resume id allocation
    pub fn max_id(&self) -> u64 {
        let tracks = self.tracks.iter().map(|t| t.id.0);
        let notes = self.tracks.iter().flat_map(|t| t.notes.iter().map(|n| n.id.0));
        let groups = self.track_groups.iter().map(|g| g.id.0);
        let actions = self.specific_actions.iter().map(|a| a.id.0);
        tracks.chain(notes).chain(groups).chain(actions).max().unwrap_or(0)
    }
}
