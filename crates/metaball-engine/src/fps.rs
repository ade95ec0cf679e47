//! Frame rate measurement

use std::time::{Duration, Instant};

const WINDOW: Duration = Duration::from_secs(1);

/// Counts frames in consecutive one-second windows.
///
/// The reported rate is the frame count of the last completed window, so it
/// reads zero until the first second has elapsed.
#[derive(Debug, Clone)]
pub struct FpsCounter {
    window_start: Instant,
    last_frame: Instant,
    frames_in_window: u32,
    fps: u32,
    frame_time_ms: f32,
}

impl Default for FpsCounter {
    fn default() -> Self {
        Self::new()
    }
}

impl FpsCounter {
    pub fn new() -> Self {
        Self::starting_at(Instant::now())
    }

    pub fn starting_at(now: Instant) -> Self {
        Self {
            window_start: now,
            last_frame: now,
            frames_in_window: 0,
            fps: 0,
            frame_time_ms: 0.0,
        }
    }

    /// Record a new frame now
    pub fn tick(&mut self) {
        self.tick_at(Instant::now());
    }

    /// Record a new frame at `now`
    pub fn tick_at(&mut self, now: Instant) {
        self.frame_time_ms = now.saturating_duration_since(self.last_frame).as_secs_f32() * 1000.0;
        self.last_frame = now;
        self.frames_in_window += 1;

        if now.saturating_duration_since(self.window_start) >= WINDOW {
            self.fps = self.frames_in_window;
            self.frames_in_window = 0;
            self.window_start = now;
        }
    }

    pub fn fps(&self) -> u32 {
        self.fps
    }

    /// Time between the last two ticks in milliseconds
    pub fn frame_time_ms(&self) -> f32 {
        self.frame_time_ms
    }

    pub fn display_string(&self) -> String {
        format!("FPS: {} ({:.1}ms)", self.fps, self.frame_time_ms)
    }
}
