//! Camera state for the renderer

use glam::DVec3;
use metaball_core::{Error, Result};
use metaball_math::{MathError, Matrix4, deg_to_rad};
use serde::{Deserialize, Serialize};

/// Distance moved by one nudge when no step is given
pub const NUDGE_STEP: f64 = 0.5;

/// A free camera with a fixed view direction
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Camera {
    /// Eye position in world space
    pub eye: DVec3,
    /// View direction; the look-at target is `eye + direction`
    pub direction: DVec3,
    /// Up vector (usually Y-up)
    pub up: DVec3,
    /// Vertical field of view in degrees
    pub fov_y: f64,
    /// Near clipping plane
    pub near: f64,
    /// Far clipping plane
    pub far: f64,
}

impl Default for Camera {
    fn default() -> Self {
        Self {
            eye: DVec3::new(43.0, 42.0, 110.0),
            direction: DVec3::NEG_Z,
            up: DVec3::Y,
            fov_y: 110.0,
            near: 1e-5,
            far: 1e4,
        }
    }
}

/// One discrete camera move along a world axis
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Nudge {
    Forward,
    Back,
    Left,
    Right,
    Up,
    Down,
}

impl Nudge {
    /// World-space unit offset for this move
    pub fn offset(self) -> DVec3 {
        match self {
            Self::Forward => DVec3::NEG_Z,
            Self::Back => DVec3::Z,
            Self::Left => DVec3::NEG_X,
            Self::Right => DVec3::X,
            Self::Up => DVec3::Y,
            Self::Down => DVec3::NEG_Y,
        }
    }
}

impl Camera {
    /// Create a camera with default settings at `eye`
    pub fn at(eye: DVec3) -> Self {
        Self {
            eye,
            ..Default::default()
        }
    }

    /// Check the parameters before any matrix is built.
    ///
    /// Rejects non-finite vectors, a zero view direction, an up vector
    /// parallel to the view direction, a field of view outside `(0, 180)`
    /// degrees and clip planes that are not `0 < near < far`.
    pub fn validate(&self) -> Result<()> {
        if !(self.eye.is_finite() && self.direction.is_finite() && self.up.is_finite()) {
            return Err(Error::InvalidParameter(
                "camera vectors must be finite".to_string(),
            ));
        }
        if self.direction.length_squared() == 0.0 {
            return Err(Error::InvalidParameter(
                "camera direction must not be zero".to_string(),
            ));
        }
        if self.up.cross(self.direction).length_squared() == 0.0 {
            return Err(Error::InvalidParameter(format!(
                "camera up {} is parallel to direction {}",
                self.up, self.direction
            )));
        }
        if !(self.fov_y > 0.0 && self.fov_y < 180.0) {
            return Err(Error::InvalidParameter(format!(
                "field of view must be in (0, 180) degrees, got {}",
                self.fov_y
            )));
        }
        if !(self.near > 0.0 && self.near < self.far && self.far.is_finite()) {
            return Err(Error::InvalidParameter(format!(
                "clip planes must satisfy 0 < near < far, got near {} far {}",
                self.near, self.far
            )));
        }
        Ok(())
    }

    /// Camera-to-world matrix (the inverse of the view matrix)
    pub fn camera_matrix(&self) -> Matrix4 {
        Matrix4::look_at(self.eye, self.eye + self.direction, self.up)
    }

    /// World-to-camera matrix
    pub fn view(&self) -> std::result::Result<Matrix4, MathError> {
        self.camera_matrix().inverse()
    }

    /// Perspective projection for the given aspect ratio (width / height)
    pub fn projection(&self, aspect: f64) -> Matrix4 {
        Matrix4::perspective(deg_to_rad(self.fov_y), aspect, self.near, self.far)
    }

    /// Move the eye `step` units along the nudge axis
    pub fn nudge(&mut self, nudge: Nudge, step: f64) {
        self.eye += nudge.offset() * step;
    }
}
