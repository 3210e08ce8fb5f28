use std::time::Instant;

use super::types::{EditorAction, EditorCommand, EditorMode, Gesture};
use super::Editor;

impl Editor {
    /// Switch mode. Entering edit mode resolves and clears the selection.
    pub fn set_mode(&mut self, mode: EditorMode) -> EditorAction {
        if self.mode == mode {
            return EditorAction::None;
        }
        self.gesture = Gesture::Idle;
        self.context_menu = None;
        self.mode = mode;
        tracing::debug!(?mode, "Editor mode");
        if mode == EditorMode::Edit && self.clear_selection() > 0 {
            return EditorAction::Modified;
        }
        EditorAction::Redraw
    }

    /// Apply a keyboard command. Selection commands only act in select mode.
    pub fn apply_command(&mut self, command: EditorCommand, now: Instant) -> EditorAction {
        match command {
            EditorCommand::SetMode(mode) => return self.set_mode(mode),
            EditorCommand::Escape => return self.escape(),
            EditorCommand::Undo => return modified_if(self.undo(now)),
            EditorCommand::Redo => return modified_if(self.redo(now)),
            _ => {}
        }

        if self.mode != EditorMode::Select || self.gesture != Gesture::Idle {
            return EditorAction::None;
        }

        match command {
            EditorCommand::Delete => modified_if(self.delete_selected() > 0),
            EditorCommand::SelectAll => {
                self.select_all();
                EditorAction::Redraw
            }
            EditorCommand::Nudge { cells } => modified_if(self.move_selected_by(cells)),
            EditorCommand::Copy => {
                self.copy_selected();
                EditorAction::None
            }
            EditorCommand::Cut => modified_if(self.cut_selected() > 0),
            EditorCommand::Paste => {
                let Some(cell) = self.pointer_cell.or_else(|| self.clipboard.min_position()) else {
                    return EditorAction::None;
                };
                modified_if(!self.paste_at(cell).is_empty())
            }
            EditorCommand::Duplicate => modified_if(!self.duplicate_selected().is_empty()),
            EditorCommand::Merge if self.selection.len() >= 2 => modified_if(self.merge_selected() > 0),
            _ => EditorAction::None,
        }
    }
}

fn modified_if(changed: bool) -> EditorAction {
    if changed { EditorAction::Modified } else { EditorAction::None }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::note::NoteKey;
    use crate::state::EditorState;

    #[test]
    fn test_selection_commands_need_select_mode() {
        let now = Instant::now();
        let mut editor = Editor::new(EditorState::default(), now);
        let track = editor.add_track("Kick", "#fff");
        editor.create_note(track, 0, 1).unwrap();
        editor.create_note(track, 4, 1).unwrap();

        assert_eq!(editor.apply_command(EditorCommand::SelectAll, now), EditorAction::None);
        assert!(editor.selection().is_empty());

        editor.apply_command(EditorCommand::SetMode(EditorMode::Select), now);
        editor.apply_command(EditorCommand::SelectAll, now);
        assert_eq!(editor.selection().len(), 2);

        let action = editor.apply_command(EditorCommand::Nudge { cells: 4 }, now);
        assert!(action.is_modified());
        let cells: Vec<u32> = editor.state().tracks[0].notes.iter().map(|n| n.grid_position).collect();
        assert_eq!(cells, vec![4, 8]);

        // Back to edit mode drops the selection
        editor.apply_command(EditorCommand::SetMode(EditorMode::Edit), now);
        assert!(editor.selection().is_empty());
    }

    #[test]
    fn test_merge_needs_two_selected() {
        let now = Instant::now();
        let mut editor = Editor::new(EditorState::default(), now);
        let track = editor.add_track("Kick", "#fff");
        let a = editor.create_note(track, 0, 1).unwrap();
        let b = editor.create_note(track, 3, 1).unwrap();
        editor.set_mode(EditorMode::Select);

        editor.select_only(NoteKey::new(track, a));
        assert_eq!(editor.apply_command(EditorCommand::Merge, now), EditorAction::None);

        editor.toggle_selected(NoteKey::new(track, b));
        assert!(editor.apply_command(EditorCommand::Merge, now).is_modified());
        let notes = &editor.state().tracks[0].notes;
        assert_eq!(notes.len(), 1);
        assert_eq!((notes[0].grid_position, notes[0].grid_width), (0, 4));
        assert!(editor.selection().is_empty());
    }

    #[test]
    fn test_paste_without_pointer_goes_back_in_place() {
        let now = Instant::now();
        let mut editor = Editor::new(EditorState::default(), now);
        let track = editor.add_track("Kick", "#fff");
        let a = editor.create_note(track, 6, 2).unwrap();
        editor.set_mode(EditorMode::Select);
        editor.select_only(NoteKey::new(track, a));

        editor.apply_command(EditorCommand::Cut, now);
        assert_eq!(editor.state().note_count(), 0);
        assert!(editor.apply_command(EditorCommand::Paste, now).is_modified());
        assert_eq!(editor.state().tracks[0].notes[0].grid_position, 6);
    }
}
