//! Selected notes across tracks

use std::collections::BTreeSet;

use crate::note::{NoteId, NoteKey};
use crate::track::TrackId;

/// Set of selected `track:note` keys
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Selection {
    keys: BTreeSet<NoteKey>,
}

impl Selection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn contains(&self, key: NoteKey) -> bool {
        self.keys.contains(&key)
    }

    pub fn iter(&self) -> impl Iterator<Item = NoteKey> + '_ {
        self.keys.iter().copied()
    }

    pub fn insert(&mut self, key: NoteKey) {
        self.keys.insert(key);
    }

    pub fn remove(&mut self, key: NoteKey) {
        self.keys.remove(&key);
    }

    pub fn clear(&mut self) {
        self.keys.clear();
    }

    /// Replace the selection with a single note
    pub fn select_only(&mut self, key: NoteKey) {
        self.keys.clear();
        self.keys.insert(key);
    }

    /// Ctrl-click behaviour: add if absent, remove if present
    pub fn toggle(&mut self, key: NoteKey) {
        if !self.keys.remove(&key) {
            self.keys.insert(key);
        }
    }

    pub fn replace(&mut self, keys: impl IntoIterator<Item = NoteKey>) {
        self.keys = keys.into_iter().collect();
    }

    pub fn extend(&mut self, keys: impl IntoIterator<Item = NoteKey>) {
        self.keys.extend(keys);
    }

    /// Ids of the selected notes that live on `track_id`
    pub fn in_track(&self, track_id: TrackId) -> Vec<NoteId> {
        self.keys
            .iter()
            .filter(|k| k.track_id == track_id)
            .map(|k| k.note_id)
            .collect()
    }

    pub fn track_ids(&self) -> BTreeSet<TrackId> {
        self.keys.iter().map(|k| k.track_id).collect()
    }

    pub fn to_vec(&self) -> Vec<NoteKey> {
        self.keys.iter().copied().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(track: u64, note: u64) -> NoteKey {
        NoteKey::new(TrackId(track), NoteId(note))
    }

    #[test]
    fn test_toggle_and_select_only() {
        let mut selection = Selection::new();
        selection.select_only(key(1, 1));
        selection.toggle(key(1, 2));
        assert_eq!(selection.len(), 2);
        selection.toggle(key(1, 1));
        assert_eq!(selection.to_vec(), vec![key(1, 2)]);
        selection.select_only(key(2, 9));
        assert_eq!(selection.to_vec(), vec![key(2, 9)]);
    }

    #[test]
    fn test_in_track() {
        let mut selection = Selection::new();
        selection.extend([key(1, 3), key(2, 4), key(1, 5)]);
        assert_eq!(selection.in_track(TrackId(1)), vec![NoteId(3), NoteId(5)]);
        assert_eq!(selection.track_ids().len(), 2);
    }
}
