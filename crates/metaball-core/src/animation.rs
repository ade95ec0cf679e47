//! Blob motion between frames
//!
//! Blobs move at constant velocity inside an axis-aligned box. The box is the
//! spawn cube grown by a margin on every side. Blobs do not interact.

use crate::scene::{Scene, SpawnConfig};
use glam::DVec3;
use serde::{Deserialize, Serialize};

/// Default distance between the spawn cube and the walls
pub const WALL_MARGIN: f64 = 20.0;

/// The bounding box, identical on every axis
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Walls {
    pub lower: f64,
    pub higher: f64,
}

impl Walls {
    pub fn new(lower: f64, higher: f64) -> Self {
        Self { lower, higher }
    }

    /// Walls `margin` units outside the spawn cube
    pub fn around(config: &SpawnConfig, margin: f64) -> Self {
        Self {
            lower: f64::from(config.low) - margin,
            higher: f64::from(config.high) + margin,
        }
    }
}

impl Default for Walls {
    fn default() -> Self {
        Self::around(&SpawnConfig::default(), WALL_MARGIN)
    }
}

/// How velocity changes when a blob is past a wall
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WallResponse {
    /// Only the crossing axis turns back towards the box, keeping its speed
    #[default]
    Reflect,
    /// Past a high wall every axis becomes `-bounce`; past a low wall the
    /// crossing axis becomes `+bounce`. Blobs drift towards the low corner.
    Coupled,
}

/// Moves the blobs of a scene
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Integrator {
    pub walls: Walls,
    pub response: WallResponse,
    /// Speed assigned by [`WallResponse::Coupled`]
    pub bounce: f64,
}

impl Integrator {
    pub fn new(walls: Walls, response: WallResponse) -> Self {
        Self {
            walls,
            response,
            bounce: 1.0,
        }
    }

    /// Resolve wall contacts, then advance every blob by
    /// `velocity * elapsed * speed`.
    pub fn advance(&self, scene: &mut Scene, elapsed: f64, speed: f64) {
        let dt = elapsed * speed;
        for blob in scene.blobs_mut() {
            for axis in 0..3 {
                let position = blob.center[axis];
                if position > self.walls.higher {
                    match self.response {
                        WallResponse::Reflect => blob.velocity[axis] = -blob.velocity[axis].abs(),
                        WallResponse::Coupled => blob.velocity = DVec3::splat(-self.bounce),
                    }
                } else if position < self.walls.lower {
                    match self.response {
                        WallResponse::Reflect => blob.velocity[axis] = blob.velocity[axis].abs(),
                        WallResponse::Coupled => blob.velocity[axis] = self.bounce,
                    }
                }
            }
            blob.center += blob.velocity * dt;
        }
    }
}

impl Default for Integrator {
    fn default() -> Self {
        Self::new(Walls::default(), WallResponse::default())
    }
}
