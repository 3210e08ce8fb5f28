//! beatgrid-core: Grid timing, note editing and history for the beatgrid rhythm editor

pub mod action;
mod clipboard;
pub mod editor;
mod error;
pub mod export;
pub mod grid;
pub mod history;
mod note;
pub mod playback;
mod selection;
mod state;
mod track;
mod transport;

pub use action::{ActionIcon, ActionId, NoteAction, SpecificAction};
pub use clipboard::{CopiedTrack, NoteClipboard};
pub use editor::{
    Bounds, ContextMenu, Editor, EditorAction, EditorCommand, EditorMode, Gesture, GhostNote, NoteBounds,
    PointerButton, PointerEvent, TrackUpdate,
};
pub use error::{BeatgridError, Result};
pub use export::{ExportDocument, ExportNote};
pub use grid::{GridTiming, CELL_WIDTH};
pub use history::{DebounceTimer, History};
pub use note::{Note, NoteId, NoteKey, INSTANT_NOTE_WINDOW};
pub use playback::{PreviewNote, RealtimeRecorder};
pub use selection::Selection;
pub use state::EditorState;
pub use track::{Track, TrackGroup, TrackGroupId, TrackId};
pub use transport::{follow_scroll, Transport, TransportState};
