//! beatgrid-services: Project files, export files and audio metadata

pub mod audio_file;
mod error;
pub mod export_file;
pub mod project_file;

pub use audio_file::{read_audio_info, AudioInfo};
pub use error::{Result, ServiceError};
pub use export_file::export_to_file;
pub use project_file::{load_project, save_project, LoadedProject, MusicStatus, PROJECT_EXTENSION};
