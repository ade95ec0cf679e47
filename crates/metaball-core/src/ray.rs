//! Primary rays

use crate::{Error, Result};
use glam::DVec3;
use metaball_math::safe_normalize;

/// A ray with a unit-length direction
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ray {
    pub origin: DVec3,
    pub direction: DVec3,
}

impl Ray {
    /// Create a ray, normalizing `direction`.
    ///
    /// Fails with [`Error::DegenerateGeometry`] when the direction has no
    /// usable length.
    pub fn new(origin: DVec3, direction: DVec3) -> Result<Self> {
        let direction = safe_normalize(direction);
        if direction == DVec3::ZERO {
            return Err(Error::DegenerateGeometry(format!(
                "ray from {origin} has a zero-length direction"
            )));
        }
        Ok(Self { origin, direction })
    }

    /// Point at distance `t` along the ray
    pub fn at(&self, t: f64) -> DVec3 {
        self.origin + self.direction * t
    }
}
