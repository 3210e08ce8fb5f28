//! Writes the rhythm game JSON export

use std::path::Path;

use beatgrid_core::{EditorState, ExportDocument};
use tracing::info;

use crate::error::Result;

/// Export every note of `state` to `path`. Returns the number of notes written.
pub fn export_to_file(path: &Path, state: &EditorState, music_duration: f64) -> Result<usize> {
    let document = ExportDocument::build(state.bpm, &state.tracks, &state.track_groups, music_duration);
    let json = document.to_json_pretty()?;
    std::fs::write(path, json)?;

    let count = document.note_count();
    info!("Exported {} notes to {}", count, path.display());
    Ok(count)
}

#[cfg(test)]
mod tests {
    use super::*;
    use beatgrid_core::{Note, NoteId, Track, TrackGroup, TrackGroupId, TrackId};

    #[test]
    fn test_export_writes_grouped_json() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("chart.json");

        let mut state = EditorState { bpm: 100.0, sub_rhythm_sync: 2, ..Default::default() };
        let timing = state.timing();
        let mut kick = Track::new(TrackId(1), "Kick", "#fff", 0);
        kick.notes.push(Note::new(NoteId(10), kick.id, "Kick", 2, 1, &timing));
        kick.notes.push(Note::new(NoteId(11), kick.id, "Kick", 0, 2, &timing));
        let mut hat = Track::new(TrackId(2), "Hat", "#fff", 1);
        hat.group_id = Some(TrackGroupId(3));
        hat.notes.push(Note::new(NoteId(12), hat.id, "Hat", 1, 1, &timing));
        state.tracks = vec![kick, hat];
        state.track_groups = vec![TrackGroup::new(TrackGroupId(3), "Cymbals")];

        assert_eq!(export_to_file(&path, &state, 42.123456).unwrap(), 3);

        let text = std::fs::read_to_string(&path).unwrap();
        let keys: Vec<usize> = ["\"bpm\"", "\"musicDuration\"", "\"Notes\"", "\"Cymbals\""]
            .iter()
            .map(|k| text.find(k).unwrap())
            .collect();
        assert!(keys.windows(2).all(|w| w[0] < w[1]));

        let json: serde_json::Value = serde_json::from_str(&text).unwrap();
        assert_eq!(json["musicDuration"], serde_json::json!(42.123));
        assert_eq!(json["Notes"][0]["duration"], serde_json::json!(0.6));
        assert_eq!(json["Notes"][1]["startTime"], serde_json::json!(0.6));
        assert_eq!(json["Cymbals"][0]["trackName"], "Hat");
    }
}
