use std::collections::BTreeSet;

use crate::note::NoteKey;
use crate::track::TrackId;

/// Top-level editing mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EditorMode {
    /// Draw and erase notes
    #[default]
    Edit,
    /// Select, drag, resize and lasso
    Select,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerButton {
    Primary,
    Secondary,
}

/// Pointer event reported by the renderer.
///
/// `x` is measured on the grid surface, where cell 0 starts at the start
/// offset. `y` is only used by the lasso.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointerEvent {
    /// Track row under the pointer
    pub track_id: Option<TrackId>,
    pub x: f64,
    pub y: f64,
    pub button: PointerButton,
    pub ctrl: bool,
}

impl PointerEvent {
    pub fn primary(track_id: Option<TrackId>, x: f64, y: f64) -> Self {
        Self { track_id, x, y, button: PointerButton::Primary, ctrl: false }
    }

    pub fn secondary(track_id: Option<TrackId>, x: f64, y: f64) -> Self {
        Self { track_id, x, y, button: PointerButton::Secondary, ctrl: false }
    }

    pub fn with_ctrl(mut self) -> Self {
        self.ctrl = true;
        self
    }
}

/// Axis-aligned rectangle in surface pixels
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    pub min_x: f64,
    pub min_y: f64,
    pub max_x: f64,
    pub max_y: f64,
}

impl Bounds {
    pub fn new(min_x: f64, min_y: f64, max_x: f64, max_y: f64) -> Self {
        Self { min_x, min_y, max_x, max_y }
    }

    /// Rectangle spanned by two corners in any order
    pub fn from_corners(a: (f64, f64), b: (f64, f64)) -> Self {
        Self {
            min_x: a.0.min(b.0),
            min_y: a.1.min(b.1),
            max_x: a.0.max(b.0),
            max_y: a.1.max(b.1),
        }
    }

    pub fn width(&self) -> f64 {
        self.max_x - self.min_x
    }

    pub fn height(&self) -> f64 {
        self.max_y - self.min_y
    }

    pub fn intersects(&self, other: &Bounds) -> bool {
        self.min_x <= other.max_x && self.max_x >= other.min_x && self.min_y <= other.max_y && self.max_y >= other.min_y
    }
}

/// Where a note was drawn, as reported by the renderer for lasso hit tests
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NoteBounds {
    pub key: NoteKey,
    pub bounds: Bounds,
}

/// Gesture in progress. Nothing here is part of history until it commits.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Gesture {
    #[default]
    Idle,
    /// Edit mode: ghost note growing right from `anchor`
    Creating {
        track_id: TrackId,
        anchor: u32,
        current: u32,
    },
    /// Edit mode: notes crossed with the secondary button held
    RightClickDeleting { marked: BTreeSet<NoteKey> },
    /// Select mode: selection moving as a group
    DraggingNotes {
        /// Grid position of the pressed note
        start_cell: u32,
        /// Pointer position inside the pressed note, in cells
        click_offset: u32,
        offset: i64,
    },
    /// Select mode: right edge of one selected note
    Resizing { key: NoteKey, width_px: f64 },
    LassoSelecting {
        origin: (f64, f64),
        current: (f64, f64),
        additive: bool,
    },
}

/// Modal menu; blocks new gestures while open
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ContextMenu {
    Note { key: NoteKey, x: f64, y: f64 },
    Paste { cell: u32, x: f64, y: f64 },
}

/// Result of routing an input event into the editor
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditorAction {
    None,
    /// Document state changed
    Modified,
    /// Selection or gesture changed; redraw only
    Redraw,
    ContextMenuOpened,
}

impl EditorAction {
    pub fn is_modified(self) -> bool {
        self == EditorAction::Modified
    }
}

/// Keyboard-level editor commands
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditorCommand {
    SetMode(EditorMode),
    Delete,
    Escape,
    SelectAll,
    /// Move the selection; arrow keys send 1, or 4 with shift
    Nudge { cells: i64 },
    Copy,
    Cut,
    Paste,
    Duplicate,
    Merge,
    Undo,
    Redo,
}

/// Uncommitted note shown under the pointer while creating
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GhostNote {
    pub track_id: TrackId,
    pub grid_position: u32,
    pub grid_width: u32,
}
