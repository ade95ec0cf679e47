//! Where the light sits relative to the camera

use glam::DVec3;
use serde::{Deserialize, Serialize};

/// Rule for deriving the light position from the eye every frame
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LightRig {
    /// `(eye.x, eye.y, -eye.z)`: the eye mirrored through the `z = 0` plane.
    ///
    /// Lights the far side of anything between the eye and `z = 0`.
    MirroredEye,
    /// The light sits at the eye
    #[default]
    Headlight,
}

impl LightRig {
    pub fn position(self, eye: DVec3) -> DVec3 {
        match self {
            Self::MirroredEye => DVec3::new(eye.x, eye.y, -eye.z),
            Self::Headlight => eye,
        }
    }
}
