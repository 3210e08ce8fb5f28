//! Error types for beatgrid

use thiserror::Error;

#[derive(Debug, Error)]
pub enum BeatgridError {
    #[error("Invalid tempo: {0} bpm")]
    InvalidTempo(f64),
    #[error("Invalid subdivision: {0}")]
    InvalidSubdivision(u32),
    #[error("Invalid setting {name}: {value}")]
    InvalidSetting { name: &'static str, value: f64 },
    #[error("Key '{0}' is already assigned to another track")]
    KeyAlreadyAssigned(String),
    #[error("Track not found: {0}")]
    TrackNotFound(u64),
    #[error("Group not found: {0}")]
    GroupNotFound(u64),
    #[error("Action not found: {0}")]
    ActionNotFound(u64),
    #[error("Track {track} has overlapping notes")]
    OverlappingNotes { track: u64 },
    #[error("Track {track} repeats note id {note}")]
    DuplicateNoteId { track: u64, note: u64 },
    #[error("Note {note} on track {track} runs past the last cell")]
    NoteOutOfRange { track: u64, note: u64 },
    #[error("Name must not be empty")]
    EmptyName,
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, BeatgridError>;
