//! Frame clock
//!
//! Turns animation-frame timestamps into a number of simulation ticks and
//! keeps an FPS estimate for the HUD.

use serde::{Deserialize, Serialize};

use crate::consts::{MAX_SUBSTEPS, SIM_DT_MS};

/// How frames map to ticks
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum TimestepMode {
    /// Exactly one tick per animation frame
    #[default]
    Lockstep,
    /// Fixed 60 Hz steps from an accumulator, independent of display rate
    Fixed,
}

const FPS_WINDOW: usize = 60;

#[derive(Debug, Clone)]
pub struct FrameClock {
    mode: TimestepMode,
    accumulator: f64,
    last_time: Option<f64>,
    // FPS tracking
    frame_times: [f64; FPS_WINDOW],
    frame_index: usize,
    frames_seen: usize,
    fps: u32,
}

impl FrameClock {
    pub fn new(mode: TimestepMode) -> Self {
        Self {
            mode,
            accumulator: 0.0,
            last_time: None,
            frame_times: [0.0; FPS_WINDOW],
            frame_index: 0,
            frames_seen: 0,
            fps: 0,
        }
    }

    pub fn set_mode(&mut self, mode: TimestepMode) {
        if self.mode != mode {
            self.mode = mode;
            self.accumulator = 0.0;
        }
    }

    /// Forget elapsed time, e.g. after a pause, so the next frame doesn't
    /// try to catch up
    pub fn reset(&mut self) {
        self.accumulator = 0.0;
        self.last_time = None;
    }

    /// Register a frame at `time_ms` and return how many ticks to run
    pub fn frame(&mut self, time_ms: f64) -> u32 {
        self.track_fps(time_ms);

        let last = self.last_time.replace(time_ms);
        match self.mode {
            TimestepMode::Lockstep => 1,
            TimestepMode::Fixed => {
                let Some(last) = last else {
                    return 1;
                };
                // Clamp long gaps (tab in background) to 100 ms
                let dt = (time_ms - last).clamp(0.0, 100.0);
                self.accumulator += dt;

                let mut steps = 0;
                while self.accumulator >= SIM_DT_MS && steps < MAX_SUBSTEPS {
                    self.accumulator -= SIM_DT_MS;
                    steps += 1;
                }
                if steps == MAX_SUBSTEPS {
                    self.accumulator = self.accumulator.min(SIM_DT_MS);
                }
                steps
            }
        }
    }

    /// Frames per second over the last 60 frames
    pub fn fps(&self) -> u32 {
        self.fps
    }

    fn track_fps(&mut self, time_ms: f64) {
        self.frame_times[self.frame_index] = time_ms;
        self.frame_index = (self.frame_index + 1) % FPS_WINDOW;
        self.frames_seen = (self.frames_seen + 1).min(FPS_WINDOW);

        if self.frames_seen == FPS_WINDOW {
            // Slot after the newest is the oldest
            let oldest = self.frame_times[self.frame_index];
            let elapsed = time_ms - oldest;
            if elapsed > 0.0 {
                self.fps = ((FPS_WINDOW - 1) as f64 * 1000.0 / elapsed).round() as u32;
            }
        }
    }
}

impl Default for FrameClock {
    fn default() -> Self {
        Self::new(TimestepMode::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lockstep_is_one_tick_per_frame() {
        let mut clock = FrameClock::new(TimestepMode::Lockstep);
        assert_eq!(clock.frame(0.0), 1);
        assert_eq!(clock.frame(7.0), 1);
        assert_eq!(clock.frame(500.0), 1);
    }

    #[test]
    fn test_fixed_step_on_120hz_display() {
        let mut clock = FrameClock::new(TimestepMode::Fixed);
        let mut ticks = clock.frame(0.0);
        let mut t = 0.0;
        for _ in 0..120 {
            t += 1000.0 / 120.0;
            ticks += clock.frame(t);
        }
        // One second at 120 Hz still runs ~60 ticks
        assert!((60..=62).contains(&ticks), "ticks {ticks}");
    }

    #[test]
    fn test_fixed_step_caps_catch_up() {
        let mut clock = FrameClock::new(TimestepMode::Fixed);
        clock.frame(0.0);
        assert_eq!(clock.frame(5_000.0), MAX_SUBSTEPS);
        // The backlog was dropped, not carried
        assert!(clock.frame(5_001.0) <= 1);
    }

    #[test]
    fn test_reset_skips_elapsed_time() {
        let mut clock = FrameClock::new(TimestepMode::Fixed);
        clock.frame(0.0);
        clock.reset();
        assert_eq!(clock.frame(10_000.0), 1);
        assert_eq!(clock.frame(10_001.0), 0);
    }

    #[test]
    fn test_fps_estimate() {
        let mut clock = FrameClock::default();
        assert_eq!(clock.fps(), 0);
        for i in 0..120 {
            clock.frame(i as f64 * 1000.0 / 60.0);
        }
        assert_eq!(clock.fps(), 60);
    }
}
