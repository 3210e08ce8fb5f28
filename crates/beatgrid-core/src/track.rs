//! Tracks and track groups

use serde::{Deserialize, Serialize};

use crate::grid::GridTiming;
use crate::note::{Note, NoteId};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TrackId(pub u64);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TrackGroupId(pub u64);

/// A lane of notes. Owns its notes exclusively.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Track {
    pub id: TrackId,
    pub name: String,
    /// Hex color, e.g. `#ff8800`
    pub color: String,
    pub visible: bool,
    pub order: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub group_id: Option<TrackGroupId>,
    /// Keyboard key used for realtime note entry
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub assigned_key: Option<String>,
    #[serde(default)]
    pub notes: Vec<Note>,
}

impl Track {
    pub fn new(id: TrackId, name: impl Into<String>, color: impl Into<String>, order: u32) -> Self {
        Self {
            id,
            name: name.into(),
            color: color.into(),
            visible: true,
            order,
            group_id: None,
            assigned_key: None,
            notes: Vec::new(),
        }
    }

    pub fn note(&self, id: NoteId) -> Option<&Note> {
        self.notes.iter().find(|n| n.id == id)
    }

    pub fn note_mut(&mut self, id: NoteId) -> Option<&mut Note> {
        self.notes.iter_mut().find(|n| n.id == id)
    }

    /// Whether `[position, position + width)` intersects any note on this track
    pub fn has_overlap(&self, position: u32, width: u32) -> bool {
        self.notes.iter().any(|n| n.overlaps_range(position, width))
    }

    /// Note covering `cell`, if any
    pub fn note_at_cell(&self, cell: u32) -> Option<&Note> {
        self.notes.iter().find(|n| n.overlaps_range(cell, 1))
    }

    /// Remove notes by id, returning how many were removed
    pub fn remove_notes(&mut self, ids: &[NoteId]) -> usize {
        let before = self.notes.len();
        self.notes.retain(|n| !ids.contains(&n.id));
        before - self.notes.len()
    }

    pub fn retime(&mut self, timing: &GridTiming) {
        for note in &mut self.notes {
            note.retime(timing);
        }
    }

    /// Whether no two notes on this track share a cell
    pub fn is_overlap_free(&self) -> bool {
        let mut cells: Vec<(u32, u32)> = self.notes.iter().map(|n| (n.grid_position, n.grid_end())).collect();
        cells.sort_unstable();
        cells.windows(2).all(|pair| pair[0].1 <= pair[1].0)
    }

    pub fn matches_key(&self, key: &str) -> bool {
        self.assigned_key
            .as_deref()
            .is_some_and(|k| k.eq_ignore_ascii_case(key))
    }
}

/// Named group of tracks; also the bucket name in exports
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrackGroup {
    pub id: TrackGroupId,
    pub name: String,
    pub visible: bool,
    pub collapsed: bool,
}

impl TrackGroup {
    pub fn new(id: TrackGroupId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            visible: true,
            collapsed: false,
        }
    }
}
