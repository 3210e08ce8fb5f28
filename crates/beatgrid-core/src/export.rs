//! JSON export consumed by the rhythm game

use serde::ser::{SerializeMap, Serializer};
use serde::Serialize;

use crate::track::{Track, TrackGroup};

/// Bucket for notes on tracks outside any group
pub const DEFAULT_BUCKET: &str = "Notes";

/// Round to 3 decimal places
pub fn round_time(value: f64) -> f64 {
    (value * 1000.0).round() / 1000.0
}

/// Write whole numbers without a fractional part (`120`, not `120.0`)
fn serialize_number<S: Serializer>(value: &f64, serializer: S) -> Result<S::Ok, S::Error> {
    if value.fract() == 0.0 && value.abs() < i64::MAX as f64 {
        serializer.serialize_i64(*value as i64)
    } else {
        serializer.serialize_f64(*value)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportNote {
    pub track_name: String,
    #[serde(serialize_with = "serialize_number")]
    pub start_time: f64,
    #[serde(serialize_with = "serialize_number")]
    pub duration: f64,
    /// Action name only
    #[serde(skip_serializing_if = "Option::is_none")]
    pub specific_action: Option<String>,
}

/// Export payload: `bpm`, `musicDuration`, then one note list per bucket
#[derive(Debug, Clone, PartialEq)]
pub struct ExportDocument {
    pub bpm: f64,
    pub music_duration: f64,
    /// Buckets in output order, `Notes` first
    pub buckets: Vec<(String, Vec<ExportNote>)>,
}

struct Number(f64);

impl Serialize for Number {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serialize_number(&self.0, serializer)
    }
}

impl Serialize for ExportDocument {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(2 + self.buckets.len()))?;
        map.serialize_entry("bpm", &Number(self.bpm))?;
        map.serialize_entry("musicDuration", &Number(self.music_duration))?;
        for (name, notes) in &self.buckets {
            map.serialize_entry(name, notes)?;
        }
        map.end()
    }
}

impl ExportDocument {
    /// Group every note by its track's group, sorted by start time within each group
    pub fn build(bpm: f64, tracks: &[Track], groups: &[TrackGroup], music_duration: f64) -> Self {
        let mut buckets: Vec<(String, Vec<ExportNote>)> = vec![(DEFAULT_BUCKET.to_string(), Vec::new())];
        for group in groups {
            if !buckets.iter().any(|(name, _)| *name == group.name) {
                buckets.push((group.name.clone(), Vec::new()));
            }
        }

        for track in tracks {
            let bucket_name = track
                .group_id
                .and_then(|id| groups.iter().find(|g| g.id == id))
                .map(|g| g.name.as_str())
                .unwrap_or(DEFAULT_BUCKET);
            let Some((_, bucket)) = buckets.iter_mut().find(|(name, _)| name == bucket_name) else {
                continue;
            };

            bucket.extend(track.notes.iter().map(|note| ExportNote {
                track_name: note.track_name.clone(),
                start_time: round_time(note.start_time),
                duration: round_time(note.duration),
                specific_action: note.specific_action.as_ref().map(|a| a.name.clone()),
            }));
        }

        for (_, notes) in &mut buckets {
            notes.sort_by(|a, b| a.start_time.total_cmp(&b.start_time));
        }

        Self {
            bpm,
            music_duration: round_time(music_duration),
            buckets,
        }
    }

    pub fn note_count(&self) -> usize {
        self.buckets.iter().map(|(_, notes)| notes.len()).sum()
    }

    pub fn to_json_pretty(&self) -> crate::Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}
