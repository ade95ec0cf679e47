//! Host input, queued until the next frame boundary
//!
//! Any thread may push commands; the frame driver drains the whole queue at
//! once before it touches the scene, so a frame never sees half of a burst.

use metaball_render::Nudge;
use parking_lot::Mutex;
use std::sync::Arc;

/// Speed slider to speed factor
pub const SPEED_PER_SLIDER_STEP: f64 = 0.1;

/// Extra time scale the integrator applies on top of the speed
pub const TIME_SCALE: f64 = 5.0;

/// One host action
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Command {
    Play,
    Pause,
    TogglePlay,
    /// Set the speed slider; the speed becomes `slider * 0.1`
    SetSpeed(f64),
    /// Respawn the blobs from the seed and restore the camera
    Reset,
    /// Move the eye by one step
    Nudge(Nudge),
}

/// Shared handle to the pending commands
#[derive(Debug, Clone, Default)]
pub struct ControlQueue {
    pending: Arc<Mutex<Vec<Command>>>,
}

impl ControlQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&self, command: Command) {
        self.pending.lock().push(command);
    }

    /// Take every pending command in submission order
    pub fn drain(&self) -> Vec<Command> {
        std::mem::take(&mut *self.pending.lock())
    }

    pub fn is_empty(&self) -> bool {
        self.pending.lock().is_empty()
    }
}
