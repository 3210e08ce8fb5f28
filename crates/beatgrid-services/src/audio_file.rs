//! WAV metadata and waveform peaks

use std::path::{Path, PathBuf};

use tracing::info;

use crate::error::{Result, ServiceError};

/// Peak buckets computed for the waveform strip
pub const DEFAULT_PEAK_BUCKETS: usize = 2048;

#[derive(Debug, Clone)]
pub struct AudioInfo {
    pub path: PathBuf,
    pub file_name: String,
    pub sample_rate: u32,
    pub channels: u16,
    /// Seconds
    pub duration: f64,
    /// Loudest |sample| of any channel per bucket, 0..=1
    pub peaks: Vec<f32>,
}

/// Read a WAV file's length and a peak summary of `buckets` entries.
///
/// Samples are streamed; channels are not mixed down, so a stereo file whose
/// channels cancel out still draws its full envelope.
pub fn read_audio_info(path: &Path, buckets: usize) -> Result<AudioInfo> {
    let mut reader = hound::WavReader::open(path)?;
    let spec = reader.spec();
    if spec.sample_rate == 0 || spec.channels == 0 {
        return Err(ServiceError::EmptyAudio);
    }

    let frames = reader.duration() as usize;
    let channels = spec.channels as usize;
    let mut envelope = Envelope::new(frames, buckets);
    match spec.sample_format {
        hound::SampleFormat::Float => {
            for (i, sample) in reader.samples::<f32>().enumerate() {
                envelope.add(i / channels, sample?);
            }
        }
        hound::SampleFormat::Int => {
            let full_scale = (1u64 << (spec.bits_per_sample.saturating_sub(1))) as f32;
            for (i, sample) in reader.samples::<i32>().enumerate() {
                envelope.add(i / channels, sample? as f32 / full_scale);
            }
        }
    }

    let duration = frames as f64 / spec.sample_rate as f64;
    let file_name = path
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or("audio")
        .to_string();

    info!("Loaded audio file: {} ({:.2}s, {} ch)", path.display(), duration, spec.channels);
    Ok(AudioInfo {
        path: path.to_path_buf(),
        file_name,
        sample_rate: spec.sample_rate,
        channels: spec.channels,
        duration,
        peaks: envelope.peaks,
    })
}

/// Running per-bucket peak over frame indices
struct Envelope {
    frames_per_bucket: usize,
    peaks: Vec<f32>,
}

impl Envelope {
    fn new(frames: usize, buckets: usize) -> Self {
        if frames == 0 || buckets == 0 {
            return Self { frames_per_bucket: 1, peaks: Vec::new() };
        }
        let frames_per_bucket = frames.div_ceil(buckets);
        Self { frames_per_bucket, peaks: vec![0.0; frames.div_ceil(frames_per_bucket)] }
    }

    fn add(&mut self, frame: usize, sample: f32) {
        if let Some(peak) = self.peaks.get_mut(frame / self.frames_per_bucket) {
            *peak = peak.max(sample.abs().min(1.0));
        }
    }
}
