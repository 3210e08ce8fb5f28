use std::collections::BTreeSet;

use crate::grid::CELL_WIDTH;
use crate::note::NoteKey;

use super::types::{
    Bounds, ContextMenu, EditorAction, EditorMode, Gesture, GhostNote, NoteBounds, PointerButton, PointerEvent,
};
use super::Editor;

/// Lassos smaller than this in both directions count as a click
const LASSO_CLICK_PX: f64 = 5.0;

impl Editor {
    pub fn pointer_down(&mut self, event: &PointerEvent) -> EditorAction {
        self.track_pointer(event);

        // An open menu swallows the press
        if self.context_menu.take().is_some() {
            return EditorAction::Redraw;
        }
        if self.gesture != Gesture::Idle {
            return EditorAction::None;
        }

        match (self.mode, event.button) {
            (EditorMode::Edit, PointerButton::Primary) => self.begin_create(event),
            (EditorMode::Edit, PointerButton::Secondary) => self.begin_right_delete(event),
            (EditorMode::Select, PointerButton::Primary) => self.begin_select_press(event),
            (EditorMode::Select, PointerButton::Secondary) => self.open_context_menu(event),
        }
    }

    fn begin_create(&mut self, event: &PointerEvent) -> EditorAction {
        let Some(track_id) = event.track_id else {
            return EditorAction::None;
        };
        let cell = self.cell_at(event.x);
        if self.has_overlap(track_id, cell, 1) {
            return EditorAction::None;
        }
        self.gesture = Gesture::Creating { track_id, anchor: cell, current: cell };
        EditorAction::Redraw
    }

    fn begin_right_delete(&mut self, event: &PointerEvent) -> EditorAction {
        // A press directly on a note deletes it straight away
        if let Some(key) = event.track_id.and_then(|t| self.note_at(t, event.x)) {
            self.delete_notes(key.track_id, &[key.note_id]);
            self.gesture = Gesture::RightClickDeleting { marked: BTreeSet::new() };
            return EditorAction::Modified;
        }
        self.gesture = Gesture::RightClickDeleting { marked: BTreeSet::new() };
        EditorAction::Redraw
    }

    fn begin_select_press(&mut self, event: &PointerEvent) -> EditorAction {
        let Some(track_id) = event.track_id else {
            return self.begin_lasso(event);
        };

        if let Some(key) = self.resize_handle_at(track_id, event.x) {
            let width_px = self
                .state
                .note(key)
                .map(|n| n.grid_width as f64 * CELL_WIDTH)
                .unwrap_or(CELL_WIDTH);
            self.gesture = Gesture::Resizing { key, width_px };
            return EditorAction::Redraw;
        }

        let Some(key) = self.note_at(track_id, event.x) else {
            return self.begin_lasso(event);
        };
        if event.ctrl {
            self.toggle_selected(key);
        } else if !self.selection.contains(key) {
            self.select_only(key);
        }
        if !self.selection.contains(key) {
            return EditorAction::Redraw;
        }

        let press_cell = self.cell_at(event.x);
        let start_cell = self.state.note(key).map_or(press_cell, |n| n.grid_position);
        let click_offset = press_cell.saturating_sub(start_cell);
        self.gesture = Gesture::DraggingNotes { start_cell, click_offset, offset: 0 };
        EditorAction::Redraw
    }

    fn begin_lasso(&mut self, event: &PointerEvent) -> EditorAction {
        if !event.ctrl {
            self.clear_selection();
        }
        let origin = (event.x, event.y);
        self.gesture = Gesture::LassoSelecting { origin, current: origin, additive: event.ctrl };
        EditorAction::Redraw
    }

    fn open_context_menu(&mut self, event: &PointerEvent) -> EditorAction {
        let note = event.track_id.and_then(|t| self.note_at(t, event.x));
        let menu = match note {
            Some(key) => {
                if !self.selection.contains(key) {
                    self.select_only(key);
                }
                ContextMenu::Note { key, x: event.x, y: event.y }
            }
            None => ContextMenu::Paste { cell: self.cell_at(event.x), x: event.x, y: event.y },
        };
        self.context_menu = Some(menu);
        EditorAction::ContextMenuOpened
    }

    pub fn pointer_move(&mut self, event: &PointerEvent) -> EditorAction {
        self.track_pointer(event);
        let cell = self.cell_at(event.x);
        let hovered = event.track_id.and_then(|t| self.note_at(t, event.x));
        let note_left = match &self.gesture {
            Gesture::Resizing { key, .. } => self.state.note(*key).map(|n| self.note_span_px(n).0),
            _ => None,
        };

        match &mut self.gesture {
            Gesture::Idle => return EditorAction::None,
            Gesture::Creating { anchor, current, .. } => *current = cell.max(*anchor),
            Gesture::RightClickDeleting { marked } => {
                let Some(key) = hovered else {
                    return EditorAction::None;
                };
                if !marked.insert(key) {
                    return EditorAction::None;
                }
            }
            Gesture::DraggingNotes { start_cell, click_offset, offset } => {
                *offset = cell as i64 - *start_cell as i64 - *click_offset as i64;
            }
            Gesture::Resizing { width_px, .. } => {
                let Some(left) = note_left else {
                    return EditorAction::None;
                };
                *width_px = (event.x - left).max(CELL_WIDTH);
            }
            Gesture::LassoSelecting { current, .. } => *current = (event.x, event.y),
        }
        EditorAction::Redraw
    }

    /// Finish the gesture. `rendered` lists where notes were drawn, for the lasso.
    pub fn pointer_up(&mut self, event: &PointerEvent, rendered: &[NoteBounds]) -> EditorAction {
        self.track_pointer(event);
        match std::mem::take(&mut self.gesture) {
            Gesture::Idle => EditorAction::None,
            Gesture::Creating { track_id, anchor, current } => {
                match self.create_note(track_id, anchor, (current - anchor).saturating_add(1)) {
                    Some(_) => EditorAction::Modified,
                    None => EditorAction::Redraw,
                }
            }
            Gesture::RightClickDeleting { marked } => self.delete_marked(marked),
            gesture @ (Gesture::DraggingNotes { .. } | Gesture::Resizing { .. }) => self.commit_edit_gesture(gesture),
            Gesture::LassoSelecting { origin, additive, .. } => {
                self.finish_lasso(Bounds::from_corners(origin, (event.x, event.y)), additive, rendered);
                EditorAction::Redraw
            }
        }
    }

    /// Pointer left the grid surface. Finishes the gesture like a release
    /// at the last known position, except note creation, which is dropped.
    pub fn pointer_leave(&mut self, rendered: &[NoteBounds]) -> EditorAction {
        self.pointer_cell = None;
        match std::mem::take(&mut self.gesture) {
            Gesture::Idle => EditorAction::None,
            Gesture::Creating { .. } => EditorAction::Redraw,
            Gesture::RightClickDeleting { marked } => self.delete_marked(marked),
            gesture @ (Gesture::DraggingNotes { .. } | Gesture::Resizing { .. }) => self.commit_edit_gesture(gesture),
            Gesture::LassoSelecting { origin, current, additive } => {
                self.finish_lasso(Bounds::from_corners(origin, current), additive, rendered);
                EditorAction::Redraw
            }
        }
    }

    /// Cancel the active gesture, or clear the selection when idle
    pub fn escape(&mut self) -> EditorAction {
        if self.context_menu.take().is_some() {
            return EditorAction::Redraw;
        }
        if self.gesture != Gesture::Idle {
            self.gesture = Gesture::Idle;
            return EditorAction::Redraw;
        }
        if self.selection.is_empty() {
            return EditorAction::None;
        }
        if self.clear_selection() > 0 {
            EditorAction::Modified
        } else {
            EditorAction::Redraw
        }
    }

    fn commit_edit_gesture(&mut self, gesture: Gesture) -> EditorAction {
        match gesture {
            Gesture::DraggingNotes { offset, .. } if offset != 0 => {
                if self.move_selected_by(offset) {
                    return EditorAction::Modified;
                }
            }
            Gesture::Resizing { key, width_px } => {
                let width = ((width_px / CELL_WIDTH).round() as u32).max(1);
                let unchanged = self.state.note(key).is_some_and(|n| n.grid_width == width);
                if !unchanged && self.resize_note(key.track_id, key.note_id, width) {
                    return EditorAction::Modified;
                }
            }
            _ => {}
        }
        EditorAction::Redraw
    }

    fn delete_marked(&mut self, marked: BTreeSet<NoteKey>) -> EditorAction {
        let mut removed = 0;
        for track_id in marked.iter().map(|k| k.track_id).collect::<BTreeSet<_>>() {
            let ids: Vec<_> = marked.iter().filter(|k| k.track_id == track_id).map(|k| k.note_id).collect();
            removed += self.delete_notes(track_id, &ids);
        }
        if removed > 0 {
            EditorAction::Modified
        } else {
            EditorAction::Redraw
        }
    }

    fn finish_lasso(&mut self, lasso: Bounds, additive: bool, rendered: &[NoteBounds]) {
        if lasso.width() < LASSO_CLICK_PX && lasso.height() < LASSO_CLICK_PX {
            if !additive {
                self.clear_selection();
            }
            return;
        }

        let hits: Vec<NoteKey> = rendered
            .iter()
            .filter(|nb| nb.bounds.intersects(&lasso))
            .filter(|nb| self.state.note(nb.key).is_some())
            .map(|nb| nb.key)
            .collect();
        if additive {
            self.selection.extend(hits);
        } else {
            self.clear_selection();
            self.selection.replace(hits);
        }
    }

    fn track_pointer(&mut self, event: &PointerEvent) {
        self.pointer_cell = Some(self.cell_at(event.x));
    }

    /// Uncommitted note being drawn
    pub fn ghost_note(&self) -> Option<GhostNote> {
        match self.gesture {
            Gesture::Creating { track_id, anchor, current } => Some(GhostNote {
                track_id,
                grid_position: anchor,
                grid_width: (current - anchor).saturating_add(1),
            }),
            _ => None,
        }
    }

    /// Cell offset applied to selected notes while dragging
    pub fn drag_offset(&self) -> i64 {
        match self.gesture {
            Gesture::DraggingNotes { offset, .. } => offset,
            _ => 0,
        }
    }

    /// Live pixel width of the note being resized
    pub fn resize_preview(&self) -> Option<(NoteKey, f64)> {
        match self.gesture {
            Gesture::Resizing { key, width_px } => Some((key, width_px)),
            _ => None,
        }
    }

    /// Notes dimmed for deletion
    pub fn marked_for_delete(&self) -> Option<&BTreeSet<NoteKey>> {
        match &self.gesture {
            Gesture::RightClickDeleting { marked } => Some(marked),
            _ => None,
        }
    }

    pub fn lasso_bounds(&self) -> Option<Bounds> {
        match self.gesture {
            Gesture::LassoSelecting { origin, current, .. } => Some(Bounds::from_corners(origin, current)),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use std::time::Instant;

    use super::*;
    use crate::state::EditorState;
    use crate::track::TrackId;

    fn setup(mode: EditorMode) -> (crate::editor::Editor, TrackId) {
        let mut editor = Editor::new(EditorState::default(), Instant::now());
        let track = editor.add_track("Kick", "#fff");
        editor.set_mode(mode);
        (editor, track)
    }

    fn x(cell: u32) -> f64 {
        cell as f64 * CELL_WIDTH + 1.0
    }

    #[test]
    fn test_create_gesture_is_one_sided() {
        let (mut editor, track) = setup(EditorMode::Edit);
        editor.pointer_down(&PointerEvent::primary(Some(track), x(4), 0.0));
        editor.pointer_move(&PointerEvent::primary(Some(track), x(7), 0.0));
        assert_eq!(editor.ghost_note().map(|g| g.grid_width), Some(4));
        // Dragging left of the anchor shrinks to one cell
        editor.pointer_move(&PointerEvent::primary(Some(track), x(1), 0.0));
        assert_eq!(editor.ghost_note().map(|g| (g.grid_position, g.grid_width)), Some((4, 1)));

        editor.pointer_move(&PointerEvent::primary(Some(track), x(5), 0.0));
        let action = editor.pointer_up(&PointerEvent::primary(Some(track), x(5), 0.0), &[]);
        assert!(action.is_modified());
        let note = &editor.state().tracks[0].notes[0];
        assert_eq!((note.grid_position, note.grid_width), (4, 2));
    }

    #[test]
    fn test_leave_cancels_create() {
        let (mut editor, track) = setup(EditorMode::Edit);
        editor.pointer_down(&PointerEvent::primary(Some(track), x(4), 0.0));
        editor.pointer_leave(&[]);
        assert!(editor.ghost_note().is_none());
        assert_eq!(editor.state().note_count(), 0);
        assert_eq!(editor.pointer_cell(), None);
    }

    #[test]
    fn test_create_past_last_cell_is_dropped() {
        let (mut editor, track) = setup(EditorMode::Edit);
        let far = 1e15;
        editor.pointer_down(&PointerEvent::primary(Some(track), far, 0.0));
        editor.pointer_move(&PointerEvent::primary(Some(track), far * 2.0, 0.0));
        assert_eq!(editor.ghost_note().map(|g| (g.grid_position, g.grid_width)), Some((u32::MAX, 1)));

        let action = editor.pointer_up(&PointerEvent::primary(Some(track), far * 2.0, 0.0), &[]);
        assert!(!action.is_modified());
        assert_eq!(editor.state().note_count(), 0);

        // The grid still works afterwards
        editor.pointer_down(&PointerEvent::primary(Some(track), x(0), 0.0));
        editor.pointer_up(&PointerEvent::primary(Some(track), x(0), 0.0), &[]);
        assert_eq!(editor.state().note_count(), 1);
    }

    #[test]
    fn test_right_drag_batch_delete() {
        let (mut editor, track) = setup(EditorMode::Edit);
        for cell in [2, 4, 6] {
            editor.create_note(track, cell, 1).unwrap();
        }
        editor.pointer_down(&PointerEvent::secondary(Some(track), x(0), 0.0));
        editor.pointer_move(&PointerEvent::secondary(Some(track), x(2), 0.0));
        editor.pointer_move(&PointerEvent::secondary(Some(track), x(4), 0.0));
        assert_eq!(editor.marked_for_delete().map(|m| m.len()), Some(2));
        assert_eq!(editor.state().note_count(), 3);

        editor.pointer_up(&PointerEvent::secondary(Some(track), x(4), 0.0), &[]);
        assert_eq!(editor.state().note_count(), 1);
    }

    #[test]
    fn test_leave_finishes_right_drag_delete() {
        let (mut editor, track) = setup(EditorMode::Edit);
        for cell in [2, 4, 6] {
            editor.create_note(track, cell, 1).unwrap();
        }
        editor.pointer_down(&PointerEvent::secondary(Some(track), x(0), 0.0));
        editor.pointer_move(&PointerEvent::secondary(Some(track), x(2), 0.0));
        editor.pointer_move(&PointerEvent::secondary(Some(track), x(4), 0.0));

        let action = editor.pointer_leave(&[]);
        assert!(action.is_modified());
        assert_eq!(editor.state().note_count(), 1);
        assert_eq!(editor.state().tracks[0].notes[0].grid_position, 6);
        assert_eq!(*editor.gesture(), Gesture::Idle);
    }

    #[test]
    fn test_right_click_on_note_deletes_now() {
        let (mut editor, track) = setup(EditorMode::Edit);
        editor.create_note(track, 2, 1).unwrap();
        let action = editor.pointer_down(&PointerEvent::secondary(Some(track), x(2), 0.0));
        assert!(action.is_modified());
        assert_eq!(editor.state().note_count(), 0);
    }

    #[test]
    fn test_drag_moves_selection() {
        let (mut editor, track) = setup(EditorMode::Select);
        let id = editor.create_note(track, 2, 3).unwrap();

        // Press on the middle cell of the note
        editor.pointer_down(&PointerEvent::primary(Some(track), x(3), 0.0));
        assert!(editor.selection().contains(NoteKey::new(track, id)));
        editor.pointer_move(&PointerEvent::primary(Some(track), x(8), 0.0));
        assert_eq!(editor.drag_offset(), 5);
        // Not committed until release
        assert_eq!(editor.state().tracks[0].notes[0].grid_position, 2);

        let action = editor.pointer_up(&PointerEvent::primary(Some(track), x(8), 0.0), &[]);
        assert!(action.is_modified());
        assert_eq!(editor.state().tracks[0].notes[0].grid_position, 7);
    }

    #[test]
    fn test_leave_commits_drag() {
        let (mut editor, track) = setup(EditorMode::Select);
        editor.create_note(track, 2, 3).unwrap();

        // Grab the note by its last cell
        editor.pointer_down(&PointerEvent::primary(Some(track), x(4), 0.0));
        editor.pointer_move(&PointerEvent::primary(Some(track), x(6), 0.0));
        assert_eq!(editor.drag_offset(), 2);

        let action = editor.pointer_leave(&[]);
        assert!(action.is_modified());
        assert_eq!(editor.state().tracks[0].notes[0].grid_position, 4);
        assert_eq!(editor.pointer_cell(), None);
    }

    #[test]
    fn test_leave_commits_resize() {
        let (mut editor, track) = setup(EditorMode::Select);
        let id = editor.create_note(track, 0, 2).unwrap();
        editor.select_only(NoteKey::new(track, id));

        editor.pointer_down(&PointerEvent::primary(Some(track), 2.0 * CELL_WIDTH - 1.0, 0.0));
        editor.pointer_move(&PointerEvent::primary(Some(track), 3.2 * CELL_WIDTH, 0.0));
        let action = editor.pointer_leave(&[]);
        assert!(action.is_modified());
        assert_eq!(editor.state().tracks[0].notes[0].grid_width, 3);
        assert!(editor.resize_preview().is_none());
    }

    #[test]
    fn test_leave_finishes_lasso() {
        let (mut editor, track) = setup(EditorMode::Select);
        let a = NoteKey::new(track, editor.create_note(track, 0, 1).unwrap());
        let rendered = vec![NoteBounds {
            key: a,
            bounds: editor.note_bounds(editor.state().note(a).unwrap(), 0.0, 40.0),
        }];

        editor.pointer_down(&PointerEvent::primary(None, 100.0, 60.0));
        editor.pointer_move(&PointerEvent::primary(None, 10.0, 20.0));
        editor.pointer_leave(&rendered);
        assert_eq!(editor.selection().to_vec(), vec![a]);
        assert!(editor.lasso_bounds().is_none());
    }

    #[test]
    fn test_resize_from_handle() {
        let (mut editor, track) = setup(EditorMode::Select);
        let id = editor.create_note(track, 0, 2).unwrap();
        editor.create_note(track, 3, 1).unwrap();
        editor.select_only(NoteKey::new(track, id));

        editor.pointer_down(&PointerEvent::primary(Some(track), 2.0 * CELL_WIDTH - 1.0, 0.0));
        assert!(editor.resize_preview().is_some());
        editor.pointer_move(&PointerEvent::primary(Some(track), 4.4 * CELL_WIDTH, 0.0));
        let action = editor.pointer_up(&PointerEvent::primary(Some(track), 4.4 * CELL_WIDTH, 0.0), &[]);
        assert!(action.is_modified());

        let notes = &editor.state().tracks[0].notes;
        assert_eq!(notes.len(), 1);
        assert_eq!(notes[0].grid_width, 4);
    }

    #[test]
    fn test_lasso_selects_rendered_notes() {
        let (mut editor, track) = setup(EditorMode::Select);
        let a = NoteKey::new(track, editor.create_note(track, 0, 1).unwrap());
        let b = NoteKey::new(track, editor.create_note(track, 10, 1).unwrap());
        let rendered: Vec<NoteBounds> = [a, b]
            .iter()
            .map(|&key| NoteBounds {
                key,
                bounds: editor.note_bounds(editor.state().note(key).unwrap(), 0.0, 40.0),
            })
            .collect();

        editor.pointer_down(&PointerEvent::primary(None, 100.0, 60.0));
        editor.pointer_move(&PointerEvent::primary(None, 10.0, 20.0));
        assert!(editor.lasso_bounds().is_some());
        editor.pointer_up(&PointerEvent::primary(None, 10.0, 20.0), &rendered);
        assert_eq!(editor.selection().to_vec(), vec![a]);

        // Ctrl lasso adds to the selection
        editor.pointer_down(&PointerEvent::primary(None, 230.0, 0.0).with_ctrl());
        editor.pointer_up(&PointerEvent::primary(None, 260.0, 30.0).with_ctrl(), &rendered);
        assert_eq!(editor.selection().len(), 2);

        // A tiny lasso is a click on empty space
        editor.pointer_down(&PointerEvent::primary(None, 600.0, 10.0));
        editor.pointer_up(&PointerEvent::primary(None, 602.0, 12.0), &rendered);
        assert!(editor.selection().is_empty());
    }

    #[test]
    fn test_menu_blocks_gestures() {
        let (mut editor, track) = setup(EditorMode::Select);
        let id = editor.create_note(track, 2, 1).unwrap();
        let action = editor.pointer_down(&PointerEvent::secondary(Some(track), x(2), 0.0));
        assert_eq!(action, EditorAction::ContextMenuOpened);
        assert!(matches!(editor.context_menu(), Some(ContextMenu::Note { .. })));
        assert!(editor.selection().contains(NoteKey::new(track, id)));

        // The next press only closes the menu
        editor.pointer_down(&PointerEvent::primary(None, 300.0, 5.0));
        assert!(editor.context_menu().is_none());
        assert_eq!(*editor.gesture(), Gesture::Idle);

        editor.pointer_down(&PointerEvent::secondary(Some(track), x(9), 0.0));
        assert_eq!(editor.context_menu(), Some(ContextMenu::Paste { cell: 9, x: x(9), y: 0.0 }));
    }

    #[test]
    fn test_escape_cancels_then_clears() {
        let (mut editor, track) = setup(EditorMode::Select);
        let id = editor.create_note(track, 2, 1).unwrap();
        editor.pointer_down(&PointerEvent::primary(Some(track), x(2), 0.0));
        assert_ne!(*editor.gesture(), Gesture::Idle);
        editor.escape();
        assert_eq!(*editor.gesture(), Gesture::Idle);
        assert!(editor.selection().contains(NoteKey::new(track, id)));
        editor.escape();
        assert!(editor.selection().is_empty());
    }
}
