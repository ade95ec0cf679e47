//! The boundary between the frame driver and whatever produces pixels

use crate::Result;
use crate::camera::Camera;
use crate::framebuffer::Framebuffer;
use crate::rays::Viewport;
use crate::upload::SceneUpload;
use metaball_core::{Outcome, Termination};

/// Per-frame counters reported by a backend
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RenderStats {
    pub hits: u64,
    pub escaped: u64,
    pub exhausted: u64,
    /// Hits whose field gradient vanished (shaded with a zero normal)
    pub degenerate_normals: u64,
    /// Pixels whose interpolated direction had no length
    pub degenerate_rays: u64,
}

impl RenderStats {
    pub fn record(&mut self, outcome: &Outcome) {
        match outcome {
            Outcome::Hit(hit) => {
                self.hits += 1;
                if hit.normal == glam::DVec3::ZERO {
                    self.degenerate_normals += 1;
                }
            }
            Outcome::Miss(Termination::Exhausted) => self.exhausted += 1,
            Outcome::Miss(Termination::Escaped | Termination::Converged) => self.escaped += 1,
        }
    }

    pub fn merge(self, other: Self) -> Self {
        Self {
            hits: self.hits + other.hits,
            escaped: self.escaped + other.escaped,
            exhausted: self.exhausted + other.exhausted,
            degenerate_normals: self.degenerate_normals + other.degenerate_normals,
            degenerate_rays: self.degenerate_rays + other.degenerate_rays,
        }
    }

    pub fn total(&self) -> u64 {
        self.hits + self.escaped + self.exhausted + self.degenerate_rays
    }
}

/// Submit a scene, submit a camera, receive a framebuffer.
///
/// Submissions replace the previous state wholesale; nothing persists between
/// frames except what was last submitted.
pub trait RenderBackend: Send {
    fn name(&self) -> &str;

    fn submit_scene(&mut self, scene: &SceneUpload) -> Result<()>;

    fn submit_camera(&mut self, camera: &Camera, viewport: Viewport) -> Result<()>;

    fn render(&mut self) -> Result<&Framebuffer>;

    /// The most recently rendered frame
    fn framebuffer(&self) -> &Framebuffer;

    /// Counters from the most recent [`RenderBackend::render`]
    fn last_stats(&self) -> RenderStats;
}
