//! Time ↔ grid conversion
//!
//! Every note time in the editor is derived from an integer cell index through
//! these functions. Nothing accumulates: a note at cell `n` always maps to the
//! same time for a given tempo, however long the track is.

use serde::{Deserialize, Serialize};

/// Width of one grid cell in pixels
pub const CELL_WIDTH: f64 = 24.0;

/// Tolerance (in cells) applied before flooring, so that a time produced by
/// `grid_position_to_time` maps back onto the same cell.
const GRID_EPSILON: f64 = 1e-9;

fn non_negative(value: f64) -> f64 {
    if value.is_finite() && value > 0.0 { value } else { 0.0 }
}

/// Fractional number of cells elapsed at `time` seconds
pub fn time_to_cell_position(time: f64, bpm: f64, sub_rhythm_sync: u32) -> f64 {
    let beats_elapsed = (non_negative(bpm) * non_negative(time)) / 60.0;
    beats_elapsed * sub_rhythm_sync as f64
}

pub fn time_to_pixel_position(time: f64, bpm: f64, sub_rhythm_sync: u32) -> f64 {
    time_to_cell_position(time, bpm, sub_rhythm_sync) * CELL_WIDTH
}

pub fn pixel_position_to_time(pixels: f64, bpm: f64, sub_rhythm_sync: u32) -> f64 {
    cells_to_time(non_negative(pixels) / CELL_WIDTH, bpm, sub_rhythm_sync)
}

/// Cell containing `time`
pub fn time_to_grid_position(time: f64, bpm: f64, sub_rhythm_sync: u32) -> u32 {
    let cells = time_to_cell_position(time, bpm, sub_rhythm_sync);
    (cells + GRID_EPSILON).floor() as u32
}

/// Start time of cell `grid_position`
pub fn grid_position_to_time(grid_position: u32, bpm: f64, sub_rhythm_sync: u32) -> f64 {
    cells_to_time(grid_position as f64, bpm, sub_rhythm_sync)
}

/// Full pixel width of a track lasting `duration` seconds
pub fn calculate_waveform_width(duration: f64, bpm: f64, sub_rhythm_sync: u32) -> f64 {
    time_to_pixel_position(duration, bpm, sub_rhythm_sync)
}

fn cells_to_time(cells: f64, bpm: f64, sub_rhythm_sync: u32) -> f64 {
    let bpm = non_negative(bpm);
    if bpm == 0.0 || sub_rhythm_sync == 0 {
        return 0.0;
    }
    let beats = non_negative(cells) / sub_rhythm_sync as f64;
    (beats * 60.0) / bpm
}

/// Tempo parameters that every derived note time depends on
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GridTiming {
    pub bpm: f64,
    /// Cells per beat
    pub sub_rhythm_sync: u32,
    /// Horizontal offset of cell 0 from the start of the audio, in pixels
    pub start_offset_px: f64,
}

impl Default for GridTiming {
    fn default() -> Self {
        Self {
            bpm: 120.0,
            sub_rhythm_sync: 4,
            start_offset_px: 0.0,
        }
    }
}

impl GridTiming {
    pub fn new(bpm: f64, sub_rhythm_sync: u32, start_offset_px: f64) -> Self {
        Self { bpm, sub_rhythm_sync, start_offset_px }
    }

    /// Audio time at which cell 0 begins
    pub fn offset_time(&self) -> f64 {
        cells_to_time(self.start_offset_px / CELL_WIDTH, self.bpm, self.sub_rhythm_sync)
    }

    pub fn note_start_time(&self, grid_position: u32) -> f64 {
        grid_position_to_time(grid_position, self.bpm, self.sub_rhythm_sync) + self.offset_time()
    }

    /// Duration of a note `grid_width` cells wide; single-cell notes are instant.
    pub fn note_duration(&self, grid_width: u32) -> f64 {
        if grid_width <= 1 {
            return 0.0;
        }
        grid_position_to_time(grid_width, self.bpm, self.sub_rhythm_sync)
    }

    /// Cell under a pixel x coordinate measured from the left edge of the grid surface
    pub fn cell_at_pixel(&self, x: f64) -> u32 {
        let relative = non_negative(x - self.start_offset_px);
        (relative / CELL_WIDTH).floor() as u32
    }

    /// Left edge of `grid_position` on the grid surface
    pub fn cell_to_pixel(&self, grid_position: u32) -> f64 {
        self.start_offset_px + grid_position as f64 * CELL_WIDTH
    }

    /// Number of cells needed to cover `duration` seconds
    pub fn total_cells(&self, duration: f64) -> u32 {
        time_to_cell_position(duration, self.bpm, self.sub_rhythm_sync).ceil() as u32
    }

    pub fn waveform_width(&self, duration: f64) -> f64 {
        calculate_waveform_width(duration, self.bpm, self.sub_rhythm_sync)
    }
}
