//! Project file persistence (`.bgp`, pretty JSON)

use std::path::{Path, PathBuf};

use beatgrid_core::EditorState;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::{Result, ServiceError};

pub const PROJECT_EXTENSION: &str = "bgp";
pub const PROJECT_VERSION: &str = "1.0.0";

#[derive(Debug, Clone, Serialize, Deserialize)]
struct ProjectFile {
    version: String,
    project: Project,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Project {
    name: String,
    /// File name only when the music sits next to the project
    #[serde(default, skip_serializing_if = "Option::is_none")]
    music_path: Option<PathBuf>,
    state: EditorState,
}

/// Whether the project's music file could be located
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MusicStatus {
    Found(PathBuf),
    /// Referenced but not on disk; the user should pick it again
    Missing(PathBuf),
    None,
}

#[derive(Debug, Clone)]
pub struct LoadedProject {
    pub name: String,
    pub state: EditorState,
    pub music: MusicStatus,
}

/// Write `state` to `path` atomically (temp file, then rename)
pub fn save_project(path: &Path, name: &str, state: &EditorState) -> Result<()> {
    let project_dir = path.parent().unwrap_or(Path::new(""));
    let music_path = state.audio_path.as_deref().map(|music| relativize(music, project_dir));

    let mut state = state.clone();
    state.audio_path = None;
    let file = ProjectFile {
        version: PROJECT_VERSION.to_string(),
        project: Project { name: name.to_string(), music_path, state },
    };
    let json = serde_json::to_string_pretty(&file)?;

    let tmp = path.with_extension(format!("{PROJECT_EXTENSION}.tmp"));
    std::fs::write(&tmp, json)?;
    std::fs::rename(&tmp, path)?;
    info!("Saved project: {}", path.display());
    Ok(())
}

/// Read a project. A corrupt file or an inconsistent state is an error; a
/// missing music file is not.
pub fn load_project(path: &Path) -> Result<LoadedProject> {
    let json = std::fs::read_to_string(path)?;
    let file: ProjectFile = serde_json::from_str(&json)?;
    if !file.version.starts_with("1.") {
        return Err(ServiceError::UnsupportedVersion(file.version));
    }
    if let Err(e) = file.project.state.validate() {
        tracing::warn!("Rejected project {}: {e}", path.display());
        return Err(e.into());
    }

    let project_dir = path.parent().unwrap_or(Path::new(""));
    let mut state = file.project.state;
    let music = match file.project.music_path {
        Some(music) => {
            let resolved = if music.is_absolute() { music } else { project_dir.join(music) };
            state.audio_path = Some(resolved.clone());
            if resolved.is_file() {
                MusicStatus::Found(resolved)
            } else {
                tracing::warn!("Music file not found: {}", resolved.display());
                MusicStatus::Missing(resolved)
            }
        }
        None => MusicStatus::None,
    };

    info!("Loaded project: {} ({} tracks)", path.display(), state.tracks.len());
    Ok(LoadedProject { name: file.project.name, state, music })
}

fn relativize(music: &Path, project_dir: &Path) -> PathBuf {
    match (music.parent(), music.file_name()) {
        (Some(parent), Some(file_name)) if parent == project_dir => PathBuf::from(file_name),
        _ => music.to_path_buf(),
    }
}
