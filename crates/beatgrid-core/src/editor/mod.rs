//! Editor session: the live document, selection, gestures and history

mod geometry;
mod input;
mod keyboard;
mod notes;
mod tracks;
mod types;

pub use tracks::TrackUpdate;
pub use types::{
    Bounds, ContextMenu, EditorAction, EditorCommand, EditorMode, Gesture, GhostNote, NoteBounds, PointerButton,
    PointerEvent,
};

use std::path::PathBuf;
use std::time::{Duration, Instant};

use crate::clipboard::NoteClipboard;
use crate::error::{BeatgridError, Result};
use crate::grid::GridTiming;
use crate::history::History;
use crate::playback::{PreviewNote, RealtimeRecorder};
use crate::selection::Selection;
use crate::state::EditorState;
use crate::track::Track;

/// Owns the editable document and everything transient around it.
///
/// Mutations bump `revision`; [`Editor::tick`] turns revision changes into
/// debounced history captures.
#[derive(Debug)]
pub struct Editor {
    state: EditorState,
    next_id: u64,
    selection: Selection,
    clipboard: NoteClipboard,
    mode: EditorMode,
    gesture: Gesture,
    context_menu: Option<ContextMenu>,
    history: History,
    revision: u64,
    seen_revision: u64,
    /// Length of the loaded music in seconds
    music_duration: f64,
    /// Last cell reported under the pointer, used as the paste target
    pointer_cell: Option<u32>,
    recorder: RealtimeRecorder,
}

impl Editor {
    pub fn new(state: EditorState, now: Instant) -> Self {
        let mut editor = Self {
            state: EditorState::default(),
            next_id: 1,
            selection: Selection::new(),
            clipboard: NoteClipboard::default(),
            mode: EditorMode::default(),
            gesture: Gesture::Idle,
            context_menu: None,
            history: History::new(),
            revision: 0,
            seen_revision: 0,
            music_duration: 0.0,
            pointer_cell: None,
            recorder: RealtimeRecorder::default(),
        };
        editor.load(state, now);
        editor
    }

    /// Replace the document, e.g. after opening a project
    pub fn load(&mut self, mut state: EditorState, now: Instant) {
        state.retime();
        self.next_id = state.max_id().saturating_add(1);
        self.history.load(state.clone(), now);
        self.state = state;
        self.selection.clear();
        self.gesture = Gesture::Idle;
        self.context_menu = None;
        self.pointer_cell = None;
        self.seen_revision = self.revision;
        tracing::debug!(tracks = self.state.tracks.len(), notes = self.state.note_count(), "Loaded editor state");
    }

    pub fn state(&self) -> &EditorState {
        &self.state
    }

    /// Copy of the document for persistence
    pub fn snapshot(&self) -> EditorState {
        self.state.clone()
    }

    pub fn timing(&self) -> GridTiming {
        self.state.timing()
    }

    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    pub fn clipboard(&self) -> &NoteClipboard {
        &self.clipboard
    }

    pub fn mode(&self) -> EditorMode {
        self.mode
    }

    pub fn gesture(&self) -> &Gesture {
        &self.gesture
    }

    pub fn context_menu(&self) -> Option<ContextMenu> {
        self.context_menu
    }

    pub fn close_context_menu(&mut self) {
        self.context_menu = None;
    }

    pub fn history(&self) -> &History {
        &self.history
    }

    pub fn music_duration(&self) -> f64 {
        self.music_duration
    }

    pub fn pointer_cell(&self) -> Option<u32> {
        self.pointer_cell
    }

    pub fn revision(&self) -> u64 {
        self.revision
    }

    pub fn track(&self, id: crate::track::TrackId) -> Option<&Track> {
        self.state.track(id)
    }

    fn alloc_id(&mut self) -> u64 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    /// Record that the document changed
    fn touch(&mut self) {
        self.revision = self.revision.wrapping_add(1);
    }

    /// Drive the history debounce. Returns true when a snapshot was recorded.
    pub fn tick(&mut self, now: Instant) -> bool {
        if self.revision != self.seen_revision {
            self.seen_revision = self.revision;
            self.history.notify_change(now);
        }
        let recorded = self.history.poll(now, &self.state);
        if recorded {
            tracing::debug!(index = self.history.index(), len = self.history.len(), "History snapshot");
        }
        recorded
    }

    /// How long the host may sleep before the next capture is due
    pub fn time_until_capture(&self, now: Instant) -> Option<Duration> {
        self.history.time_until_capture(now)
    }

    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    pub fn undo(&mut self, now: Instant) -> bool {
        let Some(state) = self.history.undo(now).cloned() else {
            return false;
        };
        self.restore(state);
        true
    }

    pub fn redo(&mut self, now: Instant) -> bool {
        let Some(state) = self.history.redo(now).cloned() else {
            return false;
        };
        self.restore(state);
        true
    }

    fn restore(&mut self, state: EditorState) {
        self.state = state;
        self.selection.clear();
        self.gesture = Gesture::Idle;
        self.context_menu = None;
        // A restore is not an edit
        self.seen_revision = self.revision;
        tracing::debug!(index = self.history.index(), "Restored snapshot");
    }

    pub fn is_dirty(&self) -> bool {
        self.history.is_dirty()
    }

    pub fn mark_saved(&mut self) {
        self.history.mark_saved();
    }

    pub fn set_bpm(&mut self, bpm: f64) -> Result<()> {
        if !bpm.is_finite() || bpm <= 0.0 {
            tracing::warn!(bpm, "Rejected tempo");
            return Err(BeatgridError::InvalidTempo(bpm));
        }
        self.state.bpm = bpm;
        self.retime();
        Ok(())
    }

    pub fn set_sub_rhythm_sync(&mut self, sub_rhythm_sync: u32) -> Result<()> {
        if sub_rhythm_sync == 0 {
            tracing::warn!(sub_rhythm_sync, "Rejected subdivision");
            return Err(BeatgridError::InvalidSubdivision(sub_rhythm_sync));
        }
        self.state.sub_rhythm_sync = sub_rhythm_sync;
        self.retime();
        Ok(())
    }

    pub fn set_rhythm_sync(&mut self, rhythm_sync: u32) -> Result<()> {
        if rhythm_sync == 0 {
            tracing::warn!(rhythm_sync, "Rejected rhythm sync");
            return Err(BeatgridError::InvalidSetting { name: "rhythm_sync", value: 0.0 });
        }
        self.state.rhythm_sync = rhythm_sync;
        self.touch();
        Ok(())
    }

    /// Start offset in pixels
    pub fn set_start_offset(&mut self, start_offset: f64) -> Result<()> {
        if !start_offset.is_finite() || start_offset < 0.0 {
            tracing::warn!(start_offset, "Rejected start offset");
            return Err(BeatgridError::InvalidSetting { name: "start_offset", value: start_offset });
        }
        self.state.start_offset = start_offset;
        self.retime();
        Ok(())
    }

    pub fn set_volume(&mut self, volume: f64) -> Result<()> {
        if !(0.0..=100.0).contains(&volume) {
            tracing::warn!(volume, "Rejected volume");
            return Err(BeatgridError::InvalidSetting { name: "volume", value: volume });
        }
        self.state.volume = volume;
        self.touch();
        Ok(())
    }

    pub fn set_pitch(&mut self, pitch: f64) -> Result<()> {
        if !pitch.is_finite() || pitch <= 0.0 {
            tracing::warn!(pitch, "Rejected playback rate");
            return Err(BeatgridError::InvalidSetting { name: "pitch", value: pitch });
        }
        self.state.pitch = pitch;
        self.touch();
        Ok(())
    }

    /// Attach the music file. `duration` bounds the grid.
    pub fn set_audio(&mut self, path: Option<PathBuf>, file_name: impl Into<String>, duration: f64) {
        self.state.audio_path = path;
        self.state.audio_file_name = file_name.into();
        self.music_duration = if duration.is_finite() { duration.max(0.0) } else { 0.0 };
        self.touch();
    }

    /// Recompute every note time from its cells
    pub fn retime(&mut self) {
        self.state.retime();
        self.touch();
    }

    /// Notes being held down in realtime mode
    pub fn realtime_previews(&self, current_time: f64) -> Vec<PreviewNote> {
        self.recorder.previews(current_time, &self.timing())
    }

    pub fn is_realtime_active(&self) -> bool {
        self.recorder.is_active()
    }

    /// Realtime entry runs while the music plays with auto-follow on.
    /// Turning it off commits every held key.
    pub fn set_realtime_active(&mut self, active: bool, current_time: f64) -> usize {
        if self.recorder.is_active() == active {
            return 0;
        }
        let timing = self.timing();
        let flushed = self.recorder.set_active(active, current_time, &timing);
        flushed
            .into_iter()
            .filter_map(|n| self.create_note(n.track_id, n.grid_position, n.grid_width))
            .count()
    }

    /// Returns true when the key is assigned to a track and was consumed
    pub fn realtime_key_down(&mut self, key: &str, current_time: f64) -> bool {
        let timing = self.timing();
        self.recorder.key_down(key, &self.state.tracks, current_time, &timing)
    }

    pub fn realtime_key_up(&mut self, key: &str, current_time: f64) -> bool {
        let timing = self.timing();
        match self.recorder.key_up(key, current_time, &timing) {
            Some(note) => self.create_note(note.track_id, note.grid_position, note.grid_width).is_some(),
            None => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::track::TrackId;

    fn editor() -> (Editor, Instant) {
        let now = Instant::now();
        (Editor::new(EditorState::default(), now), now)
    }

    #[test]
    fn test_ids_resume_after_load() {
        let (mut editor, now) = editor();
        let mut state = EditorState::default();
        state.tracks.push(Track::new(TrackId(41), "Kick", "#fff", 0));
        editor.load(state, now);
        let id = editor.add_track("Snare", "#0f0");
        assert_eq!(id, TrackId(42));
    }

    #[test]
    fn test_rejected_setting_leaves_state() {
        let (mut editor, _) = editor();
        let revision = editor.revision();
        assert!(editor.set_bpm(0.0).is_err());
        assert!(editor.set_bpm(f64::NAN).is_err());
        assert!(editor.set_sub_rhythm_sync(0).is_err());
        assert!(editor.set_volume(120.0).is_err());
        assert!(editor.set_start_offset(-1.0).is_err());
        assert_eq!(editor.state().bpm, 120.0);
        assert_eq!(editor.revision(), revision);
    }

    #[test]
    fn test_tempo_change_retimes_notes() {
        let (mut editor, _) = editor();
        let track = editor.add_track("Kick", "#fff");
        editor.create_note(track, 8, 4).unwrap();
        editor.set_bpm(60.0).unwrap();
        let note = &editor.state().tracks[0].notes[0];
        assert_eq!(note.start_time, 2.0);
        assert_eq!(note.duration, 1.0);
    }

    #[test]
    fn test_undo_redo_through_tick() {
        let (mut editor, t0) = editor();
        let track = editor.add_track("Kick", "#fff");
        editor.tick(t0 + Duration::from_millis(600));
        // First capture after load folds in the edit without dirtying
        assert!(editor.tick(t0 + Duration::from_millis(1200)));
        assert!(!editor.is_dirty());

        editor.create_note(track, 0, 1);
        assert!(!editor.tick(t0 + Duration::from_millis(1300)));
        assert!(editor.tick(t0 + Duration::from_millis(1900)));
        assert!(editor.is_dirty());

        assert!(editor.undo(t0 + Duration::from_secs(2)));
        assert_eq!(editor.state().note_count(), 0);
        // The restore itself never becomes a snapshot
        assert!(!editor.tick(t0 + Duration::from_secs(3)));
        assert!(editor.redo(t0 + Duration::from_secs(4)));
        assert_eq!(editor.state().note_count(), 1);
    }

    #[test]
    fn test_realtime_commits_through_create() {
        let (mut editor, _) = editor();
        let track = editor.add_track("Kick", "#fff");
        editor
            .update_track(track, TrackUpdate { assigned_key: Some(Some("k".into())), ..Default::default() })
            .unwrap();
        editor.create_note(track, 8, 1).unwrap();

        editor.set_realtime_active(true, 0.0);
        assert!(editor.realtime_key_down("k", 1.0));
        // Lands on the existing note at cell 8 and is rejected
        assert!(!editor.realtime_key_up("k", 1.02));

        editor.realtime_key_down("k", 2.0);
        assert_eq!(editor.realtime_previews(2.5).len(), 1);
        assert_eq!(editor.set_realtime_active(false, 2.5), 1);
        let note = editor.state().tracks[0].notes.last().cloned().unwrap();
        assert_eq!((note.grid_position, note.grid_width), (16, 4));
    }
}
