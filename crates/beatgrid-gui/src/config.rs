//! Editor preferences stored as TOML.
//!
//! The file lives at `$BEATGRID_CONFIG` when set, otherwise at
//! `config_dir/beatgrid/config.toml`.

use std::path::{Path, PathBuf};

use beatgrid_services::audio_file::DEFAULT_PEAK_BUCKETS;
use serde::{Deserialize, Serialize};

const CONFIG_ENV: &str = "BEATGRID_CONFIG";
const MAX_RECENT_PROJECTS: usize = 10;
const MIN_WAVEFORM_BUCKETS: usize = 64;
const MAX_WAVEFORM_BUCKETS: usize = 16_384;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub recent_projects: Vec<PathBuf>,
    pub last_export_dir: Option<PathBuf>,
    /// Follow the playhead and accept realtime keys while playing
    pub auto_follow: bool,
    /// Peak buckets read for the waveform strip
    pub waveform_buckets: usize,
    /// Settings applied to new projects
    pub defaults: ProjectDefaults,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProjectDefaults {
    pub bpm: f64,
    pub sub_rhythm_sync: u32,
    pub rhythm_sync: u32,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            recent_projects: Vec::new(),
            last_export_dir: None,
            auto_follow: true,
            waveform_buckets: DEFAULT_PEAK_BUCKETS,
            defaults: ProjectDefaults::default(),
        }
    }
}

impl Default for ProjectDefaults {
    fn default() -> Self {
        Self { bpm: 120.0, sub_rhythm_sync: 4, rhythm_sync: 4 }
    }
}

/// Where preferences are kept, if anywhere
fn config_location() -> Option<PathBuf> {
    if let Some(path) = std::env::var_os(CONFIG_ENV).filter(|p| !p.is_empty()) {
        return Some(PathBuf::from(path));
    }
    dirs::config_dir().map(|dir| dir.join("beatgrid").join("config.toml"))
}

impl AppConfig {
    pub fn load() -> Self {
        match config_location() {
            Some(path) => Self::read(&path),
            None => {
                tracing::info!("No config directory, using default preferences");
                Self::default()
            }
        }
    }

    /// Read preferences from `path`. A missing file gives the defaults; a
    /// file that does not parse is logged and ignored.
    fn read(path: &Path) -> Self {
        let text = match std::fs::read_to_string(path) {
            Ok(text) => text,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Self::default(),
            Err(e) => {
                tracing::warn!("Cannot read config {}: {e}", path.display());
                return Self::default();
            }
        };
        match toml::from_str::<Self>(&text) {
            Ok(config) => config.sanitized(),
            Err(e) => {
                tracing::warn!("Ignoring malformed config {}: {e}", path.display());
                Self::default()
            }
        }
    }

    pub fn save(&self) {
        let Some(path) = config_location() else {
            return;
        };
        if let Err(e) = self.write(&path) {
            tracing::warn!("Failed to write config {}: {e:#}", path.display());
        }
    }

    /// Write through a sibling temp file so a crash never leaves half a config
    fn write(&self, path: &Path) -> anyhow::Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let text = toml::to_string_pretty(self)?;
        let tmp = path.with_extension("toml.tmp");
        std::fs::write(&tmp, text)?;
        std::fs::rename(&tmp, path)?;
        tracing::debug!("Saved config: {}", path.display());
        Ok(())
    }

    /// Clamp hand-edited values into ranges the editor accepts
    fn sanitized(mut self) -> Self {
        self.waveform_buckets = self.waveform_buckets.clamp(MIN_WAVEFORM_BUCKETS, MAX_WAVEFORM_BUCKETS);
        if !self.defaults.bpm.is_finite() || self.defaults.bpm <= 0.0 {
            self.defaults.bpm = ProjectDefaults::default().bpm;
        }
        self.defaults.sub_rhythm_sync = self.defaults.sub_rhythm_sync.max(1);
        self.defaults.rhythm_sync = self.defaults.rhythm_sync.max(1);
        self.recent_projects.truncate(MAX_RECENT_PROJECTS);
        self
    }

    /// Move `path` to the front of the recent list
    pub fn push_recent(&mut self, path: &Path) {
        self.recent_projects.retain(|p| p != path);
        self.recent_projects.insert(0, path.to_path_buf());
        self.recent_projects.truncate(MAX_RECENT_PROJECTS);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_recent_projects_dedupe_and_cap() {
        let mut config = AppConfig::default();
        for i in 0..12 {
            config.push_recent(Path::new(&format!("/songs/{i}.bgp")));
        }
        config.push_recent(Path::new("/songs/5.bgp"));
        assert_eq!(config.recent_projects.len(), MAX_RECENT_PROJECTS);
        assert_eq!(config.recent_projects[0], PathBuf::from("/songs/5.bgp"));
        assert_eq!(config.recent_projects.iter().filter(|p| p.ends_with("5.bgp")).count(), 1);
    }

    #[test]
    fn test_missing_or_corrupt_falls_back() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("beatgrid").join("config.toml");
        assert_eq!(AppConfig::read(&path), AppConfig::default());

        let mut config = AppConfig::default();
        config.defaults.bpm = 95.0;
        config.auto_follow = false;
        config.write(&path).unwrap();
        assert!(!path.with_extension("toml.tmp").exists());
        let loaded = AppConfig::read(&path);
        assert_eq!(loaded.defaults.bpm, 95.0);
        assert!(!loaded.auto_follow);

        std::fs::write(&path, "defaults = [").unwrap();
        assert_eq!(AppConfig::read(&path), AppConfig::default());
    }

    #[test]
    fn test_hand_edited_values_are_clamped() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "waveform_buckets = 3\n\n[defaults]\nbpm = -10.0\nsub_rhythm_sync = 0\n").unwrap();

        let config = AppConfig::read(&path);
        assert_eq!(config.waveform_buckets, MIN_WAVEFORM_BUCKETS);
        assert_eq!(config.defaults.bpm, 120.0);
        assert_eq!(config.defaults.sub_rhythm_sync, 1);
        assert_eq!(config.defaults.rhythm_sync, 4);
    }
}
