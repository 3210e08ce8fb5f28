//! Playback clock

use serde::{Deserialize, Serialize};

use crate::grid::{time_to_pixel_position, GridTiming};

/// Transport playback state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum TransportState {
    #[default]
    Stopped,
    Playing,
    Paused,
}

/// Playback position in seconds, advanced by the host once per frame
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Transport {
    pub state: TransportState,
    /// Current position in seconds
    pub position_secs: f64,
    /// Length of the loaded music; 0 when nothing is loaded
    pub duration_secs: f64,
    /// Keep the playhead in view while playing
    pub auto_follow: bool,
}

impl Transport {
    pub fn new(duration_secs: f64) -> Self {
        Self {
            duration_secs,
            auto_follow: true,
            ..Default::default()
        }
    }

    pub fn play(&mut self) {
        if self.position_secs >= self.duration_secs {
            self.position_secs = 0.0;
        }
        self.state = TransportState::Playing;
    }

    pub fn pause(&mut self) {
        if self.is_playing() {
            self.state = TransportState::Paused;
        }
    }

    pub fn toggle(&mut self) {
        if self.is_playing() {
            self.pause();
        } else {
            self.play();
        }
    }

    pub fn stop(&mut self) {
        self.state = TransportState::Stopped;
        self.position_secs = 0.0;
    }

    pub fn is_playing(&self) -> bool {
        self.state == TransportState::Playing
    }

    pub fn seek(&mut self, secs: f64) {
        self.position_secs = secs.clamp(0.0, self.duration_secs.max(0.0));
    }

    /// Seek relative to the current position
    pub fn seek_by(&mut self, delta_secs: f64) {
        self.seek(self.position_secs + delta_secs);
    }

    /// Advance by `dt` seconds at `rate`; stops at the end of the music
    pub fn advance(&mut self, dt: f64, rate: f64) {
        if !self.is_playing() {
            return;
        }
        self.position_secs += dt.max(0.0) * rate.max(0.0);
        if self.position_secs >= self.duration_secs {
            self.position_secs = self.duration_secs;
            self.state = TransportState::Stopped;
        }
    }

    /// Format position as MM:SS.ss
    pub fn format_time(&self) -> String {
        let secs = self.position_secs;
        let mins = (secs / 60.0) as u32;
        let secs_rem = secs % 60.0;
        format!("{:02}:{:05.2}", mins, secs_rem)
    }
}

/// Horizontal scroll that keeps the playhead a third of the way into the viewport
pub fn follow_scroll(current_time: f64, timing: &GridTiming, viewport_width: f64) -> f64 {
    let playhead_x = timing.start_offset_px + time_to_pixel_position(current_time, timing.bpm, timing.sub_rhythm_sync);
    (playhead_x - viewport_width / 3.0).max(0.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_advance_stops_at_end() {
        let mut transport = Transport::new(2.0);
        transport.play();
        transport.advance(1.5, 1.0);
        assert!(transport.is_playing());
        transport.advance(1.0, 1.0);
        assert_eq!(transport.position_secs, 2.0);
        assert_eq!(transport.state, TransportState::Stopped);

        // Playing again from the end restarts
        transport.play();
        assert_eq!(transport.position_secs, 0.0);
    }

    #[test]
    fn test_format_time() {
        let mut transport = Transport::new(120.0);
        transport.seek(65.5);
        assert_eq!(transport.format_time(), "01:05.50");
        transport.seek(500.0);
        assert_eq!(transport.position_secs, 120.0);
    }

    #[test]
    fn test_follow_scroll() {
        let timing = GridTiming::new(120.0, 4, 0.0);
        assert_eq!(follow_scroll(0.5, &timing, 900.0), 0.0);
        // 10 s = 80 cells = 1920 px
        assert_eq!(follow_scroll(10.0, &timing, 900.0), 1620.0);
    }
}
