//! Error types for beatgrid services

use beatgrid_core::BeatgridError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("WAV error: {0}")]
    Wav(#[from] hound::Error),
    #[error(transparent)]
    Core(#[from] BeatgridError),
    #[error("Unsupported project version: {0}")]
    UnsupportedVersion(String),
    #[error("Audio file has no samples")]
    EmptyAudio,
}

pub type Result<T> = std::result::Result<T, ServiceError>;
