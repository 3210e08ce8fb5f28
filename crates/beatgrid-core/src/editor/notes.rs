use std::collections::{BTreeMap, BTreeSet};

use crate::action::{ActionId, NoteAction};
use crate::clipboard::CopiedTrack;
use crate::error::{BeatgridError, Result};
use crate::note::{fits_grid, ranges_overlap, Note, NoteId, NoteKey};
use crate::track::TrackId;

use super::Editor;

impl Editor {
    /// Add a note unless it would overlap an existing one on the track or
    /// run past the last addressable cell.
    pub fn create_note(&mut self, track_id: TrackId, grid_position: u32, grid_width: u32) -> Option<NoteId> {
        let grid_width = grid_width.max(1);
        if !fits_grid(grid_position, grid_width) {
            tracing::debug!(track = track_id.0, grid_position, grid_width, "Create rejected, past the grid end");
            return None;
        }
        let track = self.state.track(track_id)?;
        if track.has_overlap(grid_position, grid_width) {
            tracing::debug!(track = track_id.0, grid_position, grid_width, "Create rejected, overlap");
            return None;
        }

        let id = NoteId(self.alloc_id());
        let timing = self.timing();
        let track = self.state.track_mut(track_id)?;
        let note = Note::new(id, track_id, track.name.clone(), grid_position, grid_width, &timing);
        track.notes.push(note);
        self.touch();
        tracing::debug!(track = track_id.0, note = id.0, grid_position, grid_width, "Created note");
        Some(id)
    }

    pub fn has_overlap(&self, track_id: TrackId, grid_position: u32, grid_width: u32) -> bool {
        self.state
            .track(track_id)
            .is_some_and(|t| t.has_overlap(grid_position, grid_width.max(1)))
    }

    /// Change a note's width. Notes under the new range are deleted.
    pub fn resize_note(&mut self, track_id: TrackId, note_id: NoteId, new_width: u32) -> bool {
        let timing = self.timing();
        let Some(track) = self.state.track_mut(track_id) else {
            return false;
        };
        let Some(note) = track.note_mut(note_id) else {
            return false;
        };
        let position = note.grid_position;
        let width = new_width.clamp(1, (u32::MAX - position).max(1));
        note.set_grid(position, width, &timing);

        let eaten: Vec<NoteId> = track
            .notes
            .iter()
            .filter(|n| n.id != note_id && n.overlaps_range(position, width))
            .map(|n| n.id)
            .collect();
        track.remove_notes(&eaten);
        for id in &eaten {
            self.selection.remove(NoteKey::new(track_id, *id));
        }
        self.touch();
        tracing::debug!(track = track_id.0, note = note_id.0, width, removed = eaten.len(), "Resized note");
        true
    }

    /// Move notes to new cells. Overlap is left for [`Editor::clear_selection`] to resolve.
    pub fn move_notes(&mut self, track_id: TrackId, moves: &[(NoteId, u32)]) -> usize {
        let timing = self.timing();
        let Some(track) = self.state.track_mut(track_id) else {
            return 0;
        };
        let mut moved = 0;
        for &(note_id, position) in moves {
            if let Some(note) = track.note_mut(note_id) {
                let width = note.grid_width;
                note.set_grid(position, width, &timing);
                moved += 1;
            }
        }
        if moved > 0 {
            self.touch();
        }
        moved
    }

    /// Shift every selected note by `offset` cells, clamping each at cell 0
    pub fn move_selected_by(&mut self, offset: i64) -> bool {
        if offset == 0 || self.selection.is_empty() {
            return false;
        }
        let mut moved = 0;
        for track_id in self.selection.track_ids() {
            let Some(track) = self.state.track(track_id) else {
                continue;
            };
            let moves: Vec<(NoteId, u32)> = self
                .selection
                .in_track(track_id)
                .into_iter()
                .filter_map(|id| track.note(id))
                .map(|n| (n.id, shift_cell(n.grid_position, n.grid_width, offset)))
                .collect();
            moved += self.move_notes(track_id, &moves);
        }
        tracing::debug!(offset, moved, "Moved selection");
        moved > 0
    }

    /// Replace two or more notes with one note spanning all of them.
    ///
    /// Every note on the track intersecting the span is absorbed. Action and
    /// icon come from the earliest note, lowest id on ties.
    pub fn merge_notes(&mut self, track_id: TrackId, note_ids: &[NoteId]) -> Option<NoteId> {
        let track = self.state.track(track_id)?;
        let ids: BTreeSet<NoteId> = note_ids.iter().copied().collect();
        let notes: Vec<&Note> = ids.iter().filter_map(|id| track.note(*id)).collect();
        if notes.len() < 2 {
            return None;
        }

        let template = notes.iter().min_by_key(|n| (n.grid_position, n.id))?;
        let start = template.grid_position;
        let end = notes.iter().map(|n| n.grid_end()).max()?;
        let action = template.specific_action.clone();
        let track_name = track.name.clone();

        let merged_id = NoteId(self.alloc_id());
        let timing = self.timing();
        let track = self.state.track_mut(track_id)?;
        let absorbed: Vec<NoteId> = track
            .notes
            .iter()
            .filter(|n| n.overlaps_range(start, end - start))
            .map(|n| n.id)
            .collect();
        track.remove_notes(&absorbed);

        let mut merged = Note::new(merged_id, track_id, track_name, start, end - start, &timing);
        merged.specific_action = action;
        track.notes.push(merged);

        for id in &absorbed {
            self.selection.remove(NoteKey::new(track_id, *id));
        }
        self.touch();
        tracing::debug!(track = track_id.0, note = merged_id.0, start, end, absorbed = absorbed.len(), "Merged notes");
        Some(merged_id)
    }

    /// Merge the selected notes of each track separately, then clear the selection.
    pub fn merge_selected(&mut self) -> usize {
        let mut merged = 0;
        for track_id in self.selection.track_ids() {
            let ids = self.selection.in_track(track_id);
            if ids.len() >= 2 && self.merge_notes(track_id, &ids).is_some() {
                merged += 1;
            }
        }
        self.clear_selection();
        merged
    }

    /// Copy notes as one block placed a cell past the block's end. The copies
    /// become the selection.
    pub fn duplicate_notes(&mut self, keys: &[NoteKey]) -> Vec<NoteKey> {
        self.clear_selection();

        let sources: Vec<Note> = keys.iter().filter_map(|k| self.state.note(*k)).cloned().collect();
        let (Some(min_position), Some(max_end)) = (
            sources.iter().map(|n| n.grid_position).min(),
            sources.iter().map(|n| n.grid_end()).max(),
        ) else {
            return Vec::new();
        };
        let Some(anchor) = max_end.checked_add(1) else {
            return Vec::new();
        };

        let placed: Vec<(TrackId, u32, Note)> = sources
            .into_iter()
            .filter_map(|n| Some((n.track_id, anchor.checked_add(n.grid_position - min_position)?, n)))
            .collect();
        let created = self.insert_copies(placed);
        tracing::debug!(count = created.len(), anchor, "Duplicated notes");
        created
    }

    pub fn duplicate_selected(&mut self) -> Vec<NoteKey> {
        let keys = self.selection.to_vec();
        self.duplicate_notes(&keys)
    }

    /// Add copies of `notes` at the given cells with fresh ids and select them.
    /// Copies that would run past the last cell are dropped.
    fn insert_copies(&mut self, notes: Vec<(TrackId, u32, Note)>) -> Vec<NoteKey> {
        let timing = self.timing();
        let mut created = Vec::with_capacity(notes.len());
        for (track_id, position, source) in notes {
            if !fits_grid(position, source.grid_width) {
                continue;
            }
            let id = NoteId(self.alloc_id());
            let Some(track) = self.state.track_mut(track_id) else {
                continue;
            };
            let mut note = Note::new(id, track_id, track.name.clone(), position, source.grid_width, &timing);
            note.specific_action = source.specific_action;
            track.notes.push(note);
            created.push(NoteKey::new(track_id, id));
        }
        if !created.is_empty() {
            self.touch();
        }
        self.selection.replace(created.iter().copied());
        created
    }

    /// Push selected notes off any note they overlap, then clear the selection.
    ///
    /// Returns how many notes were moved.
    pub fn clear_selection(&mut self) -> usize {
        let keys: BTreeSet<NoteKey> = self.selection.iter().collect();
        let moved = self.resolve_overlaps(&keys);
        self.selection.clear();
        moved
    }

    fn resolve_overlaps(&mut self, keys: &BTreeSet<NoteKey>) -> usize {
        let timing = self.timing();
        let mut moved = 0;
        let mut by_track: BTreeMap<TrackId, BTreeSet<NoteId>> = BTreeMap::new();
        for key in keys {
            by_track.entry(key.track_id).or_default().insert(key.note_id);
        }

        for (track_id, ids) in by_track {
            let Some(track) = self.state.track_mut(track_id) else {
                continue;
            };
            let mut obstacles: Vec<(u32, u32)> = track
                .notes
                .iter()
                .filter(|n| !ids.contains(&n.id))
                .map(|n| (n.grid_position, n.grid_width))
                .collect();
            let mut pending: Vec<(u32, NoteId)> = track
                .notes
                .iter()
                .filter(|n| ids.contains(&n.id))
                .map(|n| (n.grid_position, n.id))
                .collect();
            pending.sort_unstable();

            for (_, note_id) in pending {
                let Some(note) = track.note_mut(note_id) else {
                    continue;
                };
                let (position, width) = (note.grid_position, note.grid_width);
                let target = free_position(&obstacles, position, width);
                if target != position {
                    note.set_grid(target, width, &timing);
                    moved += 1;
                    tracing::debug!(track = track_id.0, note = note_id.0, from = position, to = target, "Pushed note");
                }
                obstacles.push((target, width));
            }
        }

        if moved > 0 {
            self.touch();
        }
        moved
    }

    pub fn delete_notes(&mut self, track_id: TrackId, ids: &[NoteId]) -> usize {
        let Some(track) = self.state.track_mut(track_id) else {
            return 0;
        };
        let removed = track.remove_notes(ids);
        for id in ids {
            self.selection.remove(NoteKey::new(track_id, *id));
        }
        if removed > 0 {
            self.touch();
            tracing::debug!(track = track_id.0, removed, "Deleted notes");
        }
        removed
    }

    pub fn delete_selected(&mut self) -> usize {
        let mut removed = 0;
        for track_id in self.selection.track_ids() {
            let ids = self.selection.in_track(track_id);
            removed += self.delete_notes(track_id, &ids);
        }
        self.selection.clear();
        removed
    }

    /// Put the selected notes on the clipboard, grouped by track
    pub fn copy_selected(&mut self) -> usize {
        let mut content = Vec::new();
        for track_id in self.selection.track_ids() {
            let Some(track) = self.state.track(track_id) else {
                continue;
            };
            let mut notes: Vec<Note> = self
                .selection
                .in_track(track_id)
                .into_iter()
                .filter_map(|id| track.note(id))
                .cloned()
                .collect();
            notes.sort_by_key(|n| n.grid_position);
            content.push(CopiedTrack { track_id, notes });
        }
        self.clipboard.copy(content);
        self.clipboard.note_count()
    }

    pub fn cut_selected(&mut self) -> usize {
        let copied = self.copy_selected();
        self.delete_selected();
        copied
    }

    /// Paste the clipboard so its leftmost note lands on `cell`. Notes return
    /// to their source tracks if those still exist.
    pub fn paste_at(&mut self, cell: u32) -> Vec<NoteKey> {
        let Some(min_position) = self.clipboard.min_position() else {
            return Vec::new();
        };
        self.clear_selection();

        let placed: Vec<(TrackId, u32, Note)> = self
            .clipboard
            .content()
            .iter()
            .flat_map(|copied| {
                copied
                    .notes
                    .iter()
                    .filter_map(move |n| {
                        let position = cell.checked_add(n.grid_position - min_position)?;
                        Some((copied.track_id, position, n.clone()))
                    })
            })
            .collect();
        let created = self.insert_copies(placed);
        tracing::debug!(cell, count = created.len(), "Pasted notes");
        created
    }

    /// Set or unlink the specific action on the given notes
    pub fn assign_action(&mut self, keys: &[NoteKey], action: Option<ActionId>) -> Result<usize> {
        let note_action = match action {
            Some(id) => Some(NoteAction::from(
                self.state
                    .specific_actions
                    .iter()
                    .find(|a| a.id == id)
                    .ok_or(BeatgridError::ActionNotFound(id.0))?,
            )),
            None => None,
        };

        let mut changed = 0;
        for key in keys {
            let Some(note) = self.state.track_mut(key.track_id).and_then(|t| t.note_mut(key.note_id)) else {
                continue;
            };
            note.specific_action = note_action.clone();
            changed += 1;
        }
        if changed > 0 {
            self.touch();
        }
        Ok(changed)
    }

    /// Selected notes currently sitting on top of a non-selected note
    pub fn overlapping_selected(&self) -> BTreeSet<NoteKey> {
        self.selection
            .iter()
            .filter(|key| {
                let Some(track) = self.state.track(key.track_id) else {
                    return false;
                };
                let Some(note) = track.note(key.note_id) else {
                    return false;
                };
                track
                    .notes
                    .iter()
                    .filter(|other| !self.selection.contains(other.key()))
                    .any(|other| other.overlaps(note))
            })
            .collect()
    }

    /// Select every note on the displayed tracks
    pub fn select_all(&mut self) {
        self.clear_selection();
        let keys: Vec<NoteKey> = self
            .state
            .displayed_tracks()
            .iter()
            .flat_map(|t| t.notes.iter().map(|n| n.key()))
            .collect();
        self.selection.replace(keys);
    }

    /// Ctrl-click style membership toggle. A note leaving the selection is
    /// resolved against its neighbours first.
    pub fn toggle_selected(&mut self, key: NoteKey) {
        if self.selection.contains(key) {
            self.resolve_overlaps(&BTreeSet::from([key]));
            self.selection.remove(key);
        } else if self.state.note(key).is_some() {
            self.selection.insert(key);
        }
    }

    /// Make `key` the only selected note
    pub fn select_only(&mut self, key: NoteKey) {
        if self.selection.len() == 1 && self.selection.contains(key) {
            return;
        }
        self.clear_selection();
        if self.state.note(key).is_some() {
            self.selection.select_only(key);
        }
    }
}

/// Shift by `offset`, keeping the note between cell 0 and the last cell
fn shift_cell(position: u32, width: u32, offset: i64) -> u32 {
    let last_start = (u32::MAX - width) as i64;
    (position as i64).saturating_add(offset).clamp(0, last_start) as u32
}

fn is_free(obstacles: &[(u32, u32)], position: u32, width: u32) -> bool {
    !obstacles
        .iter()
        .any(|&(p, w)| ranges_overlap(p, w, position, width))
}

/// Nearest position for a note of `width` that overlaps none of `obstacles`.
///
/// Tries just left and just right of each overlapped obstacle first, smallest
/// displacement winning and right winning ties; falls back to scanning outward.
fn free_position(obstacles: &[(u32, u32)], position: u32, width: u32) -> u32 {
    if is_free(obstacles, position, width) {
        return position;
    }

    let mut candidates = Vec::new();
    for &(p, w) in obstacles.iter().filter(|&&(p, w)| ranges_overlap(p, w, position, width)) {
        if p >= width {
            candidates.push(p - width);
        }
        if let Some(right) = p.checked_add(w).filter(|&c| fits_grid(c, width)) {
            candidates.push(right);
        }
    }
    let best = candidates
        .into_iter()
        .filter(|&c| is_free(obstacles, c, width))
        .min_by_key(|&c| (c.abs_diff(position), c < position));
    if let Some(best) = best {
        return best;
    }

    let limit = obstacles
        .iter()
        .map(|&(p, w)| p.saturating_add(w))
        .max()
        .unwrap_or(position)
        .saturating_add(width);
    for distance in 1..=limit {
        if let Some(right) = position.checked_add(distance).filter(|&r| fits_grid(r, width)) {
            if is_free(obstacles, right, width) {
                return right;
            }
        }
        if let Some(left) = position.checked_sub(distance) {
            if is_free(obstacles, left, width) {
                return left;
            }
        }
    }
    limit.max(position)
}

#[cfg(test)]
mod tests {
    use std::time::Instant;

    use super::*;
    use crate::action::ActionIcon;
    use crate::state::EditorState;

    fn editor_with(bpm: f64, sub: u32) -> (Editor, TrackId) {
        let state = EditorState { bpm, sub_rhythm_sync: sub, ..Default::default() };
        let mut editor = Editor::new(state, Instant::now());
        let track = editor.add_track("Kick", "#ff0000");
        (editor, track)
    }

    fn cells(editor: &Editor, track: TrackId) -> Vec<(u32, u32)> {
        let mut cells: Vec<(u32, u32)> = editor
            .track(track)
            .unwrap()
            .notes
            .iter()
            .map(|n| (n.grid_position, n.grid_width))
            .collect();
        cells.sort_unstable();
        cells
    }

    #[test]
    fn test_create_rejects_overlap() {
        let (mut editor, track) = editor_with(100.0, 2);
        let first = editor.create_note(track, 0, 2).unwrap();
        let note = editor.track(track).unwrap().note(first).unwrap();
        assert_eq!(note.start_time, 0.0);
        assert!((note.duration - 0.6).abs() < 1e-12);

        editor.create_note(track, 2, 1).unwrap();
        assert!(editor.create_note(track, 1, 2).is_none());
        assert_eq!(editor.track(track).unwrap().notes.len(), 2);
        assert!(editor.create_note(TrackId(999), 10, 1).is_none());
    }

    #[test]
    fn test_resize_eats_overlapped_notes() {
        let (mut editor, track) = editor_with(120.0, 4);
        let wide = editor.create_note(track, 0, 1).unwrap();
        editor.create_note(track, 2, 1).unwrap();
        editor.create_note(track, 3, 2).unwrap();
        editor.create_note(track, 6, 1).unwrap();

        assert!(editor.resize_note(track, wide, 4));
        assert_eq!(cells(&editor, track), vec![(0, 4), (6, 1)]);
        assert!(!editor.resize_note(track, NoteId(12345), 2));

        // Width never drops below one cell
        editor.resize_note(track, wide, 0);
        let note = editor.track(track).unwrap().note(wide).unwrap();
        assert_eq!(note.grid_width, 1);
        assert_eq!(note.duration, 0.0);
    }

    #[test]
    fn test_merge_absorbs_span() {
        let (mut editor, track) = editor_with(120.0, 4);
        let a = editor.create_note(track, 2, 2).unwrap();
        editor.create_note(track, 5, 1).unwrap();
        let b = editor.create_note(track, 8, 2).unwrap();
        editor.create_note(track, 12, 1).unwrap();

        let merged = editor.merge_notes(track, &[a, b]).unwrap();
        assert_eq!(cells(&editor, track), vec![(2, 8), (12, 1)]);
        let note = editor.track(track).unwrap().note(merged).unwrap();
        assert_eq!(note.start_time, 0.25);
        assert_eq!(note.duration, 1.0);

        assert!(editor.merge_notes(track, &[merged]).is_none());
    }

    #[test]
    fn test_merge_template_is_earliest() {
        let (mut editor, track) = editor_with(120.0, 4);
        let jump = editor.add_action("Jump", ActionIcon::Star).unwrap();
        let a = editor.create_note(track, 4, 1).unwrap();
        let b = editor.create_note(track, 6, 3).unwrap();
        editor.assign_action(&[NoteKey::new(track, a)], Some(jump)).unwrap();

        let merged = editor.merge_notes(track, &[b, a]).unwrap();
        let note = editor.track(track).unwrap().note(merged).unwrap();
        assert_eq!((note.grid_position, note.grid_width), (4, 5));
        assert_eq!(note.specific_action.as_ref().map(|a| a.name.as_str()), Some("Jump"));
    }

    #[test]
    fn test_duplicate_keeps_shape() {
        let (mut editor, track) = editor_with(120.0, 4);
        let keys: Vec<NoteKey> = [(10, 1), (12, 2), (15, 1)]
            .iter()
            .map(|&(p, w)| NoteKey::new(track, editor.create_note(track, p, w).unwrap()))
            .collect();

        let copies = editor.duplicate_notes(&keys);
        assert_eq!(copies.len(), 3);
        assert_eq!(editor.selection().to_vec(), copies);
        // Block ends at 16, copies start at 17
        assert_eq!(cells(&editor, track), vec![(10, 1), (12, 2), (15, 1), (17, 1), (19, 2), (22, 1)]);
    }

    #[test]
    fn test_clear_selection_pushes_right_on_tie() {
        let (mut editor, track) = editor_with(120.0, 4);
        editor.create_note(track, 4, 2).unwrap();
        let moving = editor.create_note(track, 0, 2).unwrap();
        editor.select_only(NoteKey::new(track, moving));
        editor.move_selected_by(4);
        assert_eq!(editor.overlapping_selected().len(), 1);

        // Left of the neighbour (2) and right of it (6) are both two cells away
        assert_eq!(editor.clear_selection(), 1);
        assert_eq!(cells(&editor, track), vec![(4, 2), (6, 2)]);
        assert!(editor.track(track).unwrap().is_overlap_free());
    }

    #[test]
    fn test_clear_selection_prefers_nearest() {
        let (mut editor, track) = editor_with(120.0, 4);
        editor.create_note(track, 4, 4).unwrap();
        let moving = editor.create_note(track, 20, 1).unwrap();
        editor.select_only(NoteKey::new(track, moving));
        editor.move_selected_by(-15);
        editor.clear_selection();
        assert_eq!(cells(&editor, track), vec![(3, 1), (4, 4)]);
    }

    #[test]
    fn test_nudge_clamps_at_zero_and_resolves() {
        let (mut editor, track) = editor_with(120.0, 4);
        let a = editor.create_note(track, 1, 1).unwrap();
        let b = editor.create_note(track, 3, 1).unwrap();
        editor.select_only(NoteKey::new(track, a));
        editor.toggle_selected(NoteKey::new(track, b));
        editor.move_selected_by(-10);
        assert_eq!(cells(&editor, track), vec![(0, 1), (0, 1)]);

        editor.clear_selection();
        assert_eq!(cells(&editor, track), vec![(0, 1), (1, 1)]);
    }

    #[test]
    fn test_copy_paste_at_cell() {
        let (mut editor, track) = editor_with(120.0, 4);
        let a = editor.create_note(track, 4, 1).unwrap();
        let b = editor.create_note(track, 6, 2).unwrap();
        editor.select_only(NoteKey::new(track, a));
        editor.toggle_selected(NoteKey::new(track, b));
        assert_eq!(editor.copy_selected(), 2);

        let pasted = editor.paste_at(20);
        assert_eq!(pasted.len(), 2);
        assert_eq!(editor.selection().len(), 2);
        assert_eq!(cells(&editor, track), vec![(4, 1), (6, 2), (20, 1), (22, 2)]);
    }

    #[test]
    fn test_cut_removes_notes() {
        let (mut editor, track) = editor_with(120.0, 4);
        let a = editor.create_note(track, 4, 1).unwrap();
        editor.select_only(NoteKey::new(track, a));
        assert_eq!(editor.cut_selected(), 1);
        assert!(editor.selection().is_empty());
        assert!(cells(&editor, track).is_empty());
        assert!(editor.clipboard().has_notes());

        editor.paste_at(0);
        assert_eq!(cells(&editor, track), vec![(0, 1)]);
    }

    #[test]
    fn test_assign_unknown_action() {
        let (mut editor, track) = editor_with(120.0, 4);
        let a = editor.create_note(track, 0, 1).unwrap();
        let key = NoteKey::new(track, a);
        assert!(editor.assign_action(&[key], Some(ActionId(777))).is_err());
        let dash = editor.add_action("Dash", ActionIcon::Bolt).unwrap();
        assert_eq!(editor.assign_action(&[key], Some(dash)).unwrap(), 1);
        assert_eq!(editor.assign_action(&[key], None).unwrap(), 1);
        assert!(editor.state().note(key).unwrap().specific_action.is_none());
    }

    #[test]
    fn test_notes_stay_inside_last_cell() {
        let (mut editor, track) = editor_with(120.0, 4);
        assert!(editor.create_note(track, u32::MAX, 1).is_none());
        assert!(editor.create_note(track, u32::MAX - 4, 10).is_none());
        let far = editor.create_note(track, u32::MAX - 2, 1).unwrap();
        editor.create_note(track, 0, 1).unwrap();
        assert!(!editor.has_overlap(track, 1, u32::MAX - 3));

        assert!(editor.resize_note(track, far, u32::MAX));
        assert_eq!(cells(&editor, track), vec![(0, 1), (u32::MAX - 2, 2)]);

        // No room past the block for a copy
        let key = NoteKey::new(track, far);
        assert!(editor.duplicate_notes(&[key]).is_empty());

        editor.select_only(key);
        editor.move_selected_by(i64::MAX);
        assert_eq!(cells(&editor, track), vec![(0, 1), (u32::MAX - 2, 2)]);

        editor.copy_selected();
        editor.clear_selection();
        assert!(editor.paste_at(u32::MAX - 1).is_empty());
        assert_eq!(editor.paste_at(u32::MAX - 5).len(), 1);
        assert_eq!(editor.track(track).unwrap().notes.len(), 3);
    }

    #[test]
    fn test_free_position_scan_fallback() {
        // Both neighbours of the overlapped note are occupied
        let obstacles = [(2, 2), (0, 2), (4, 2)];
        assert_eq!(free_position(&obstacles, 2, 2), 6);
        assert_eq!(free_position(&obstacles, 8, 2), 8);
    }
}
