//! Sphere tracing
//!
//! Marching starts at `t = 0` with a seed step of `2 * epsilon`. Each
//! iteration first checks for termination, then advances by the current step
//! and resamples the field:
//!
//! ```text
//! MARCHING --step < epsilon--------> HIT
//! MARCHING --t > max_distance------> MISS (escaped)
//! MARCHING --max_steps exhausted---> MISS (exhausted)
//! ```
//!
//! A negative step (the ray overshot into the surface) also counts as
//! converged. The loop is deterministic and always terminates.

use crate::field::{DistanceField, FieldSample};
use crate::ray::Ray;
use serde::{Deserialize, Serialize};

/// Convergence distance
pub const EPSILON: f64 = 1e-7;

/// Iteration budget per ray
pub const MARCHING_STEPS: u32 = 1000;

/// Rays travelling further than this are misses
pub const MAX_DISTANCE: f64 = 1000.0;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MarchSettings {
    pub epsilon: f64,
    pub max_steps: u32,
    pub max_distance: f64,
}

impl Default for MarchSettings {
    fn default() -> Self {
        Self {
            epsilon: EPSILON,
            max_steps: MARCHING_STEPS,
            max_distance: MAX_DISTANCE,
        }
    }
}

/// Why marching stopped
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Termination {
    /// The step fell below epsilon: the ray is on the surface
    Converged,
    /// The ray travelled past the maximum distance
    Escaped,
    /// The iteration budget ran out before either of the above
    Exhausted,
}

/// Result of marching one ray
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct March {
    /// Total distance travelled along the ray
    pub t: f64,
    /// Iterations used
    pub steps: u32,
    pub termination: Termination,
    /// The last field sample taken
    pub sample: FieldSample,
}

impl March {
    pub fn is_hit(&self) -> bool {
        self.termination == Termination::Converged
    }
}

/// March `ray` through `field` until it converges, escapes or runs out of
/// iterations.
pub fn intersect<F: DistanceField + ?Sized>(field: &F, ray: &Ray, settings: &MarchSettings) -> March {
    let mut t = 0.0;
    let mut sample = FieldSample::empty(settings.epsilon * 2.0);

    for steps in 0..settings.max_steps {
        if sample.step < settings.epsilon {
            return March {
                t,
                steps,
                termination: Termination::Converged,
                sample,
            };
        }
        if t > settings.max_distance {
            return March {
                t,
                steps,
                termination: Termination::Escaped,
                sample,
            };
        }

        t += sample.step;
        sample = field.sample(ray.at(t));
    }

    March {
        t,
        steps: settings.max_steps,
        termination: Termination::Exhausted,
        sample,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::field::{BoundPolicy, MetaballField};
    use crate::scene::Blob;
    use approx::assert_relative_eq;
    use glam::DVec3;

    /// Distance from a lone blob's center to its iso-surface, as a fraction of
    /// the radius: the root of `falloff(x) = 0.9`.
    const ISO_FRACTION: f64 = 0.246_637;

    fn single_blob(center: DVec3, radius: f64) -> [Blob; 1] {
        [Blob::new(center, radius, DVec3::X)]
    }

    #[test]
    fn converges_on_single_blob_through_center() {
        let blobs = single_blob(DVec3::new(0.0, 0.0, -10.0), 5.0);
        let field = MetaballField::new(&blobs, BoundPolicy::Nearest);
        let ray = Ray::new(DVec3::ZERO, DVec3::NEG_Z).unwrap();

        let march = intersect(&field, &ray, &MarchSettings::default());

        assert!(march.is_hit());
        assert!(march.t > 5.0 && march.t < 10.0, "hit inside the bounding sphere");
        assert_relative_eq!(march.t, 10.0 - ISO_FRACTION * 5.0, epsilon = 1e-4);
        assert_eq!(march.sample.dominant, Some(0));
        assert!(march.steps < MARCHING_STEPS);
    }

    #[test]
    fn hit_distance_scales_with_radius() {
        let blobs = single_blob(DVec3::ZERO, 4.0);
        let field = MetaballField::new(&blobs, BoundPolicy::Nearest);
        let ray = Ray::new(DVec3::new(0.0, 0.0, 20.0), DVec3::NEG_Z).unwrap();

        let march = intersect(&field, &ray, &MarchSettings::default());

        assert!(march.is_hit());
        assert_relative_eq!(march.t, 20.0 - ISO_FRACTION * 4.0, epsilon = 1e-4);
    }

    #[test]
    fn ray_pointing_away_escapes() {
        let blobs = single_blob(DVec3::ZERO, 4.0);
        let field = MetaballField::new(&blobs, BoundPolicy::Nearest);
        let ray = Ray::new(DVec3::new(0.0, 0.0, 20.0), DVec3::Z).unwrap();

        let march = intersect(&field, &ray, &MarchSettings::default());

        assert_eq!(march.termination, Termination::Escaped);
        assert!(march.t > MAX_DISTANCE);
        assert!(march.steps < 20);
    }

    #[test]
    fn ray_passing_beside_escapes() {
        let blobs = single_blob(DVec3::ZERO, 4.0);
        let field = MetaballField::new(&blobs, BoundPolicy::Nearest);
        let ray = Ray::new(DVec3::new(0.0, 0.0, 20.0), DVec3::Y).unwrap();

        let march = intersect(&field, &ray, &MarchSettings::default());
        assert!(!march.is_hit());
    }

    #[test]
    fn empty_scene_escapes_immediately() {
        let field = MetaballField::new(&[], BoundPolicy::Nearest);
        let ray = Ray::new(DVec3::ZERO, DVec3::X).unwrap();

        let march = intersect(&field, &ray, &MarchSettings::default());
        assert_eq!(march.termination, Termination::Escaped);
        assert_eq!(march.steps, 2);
    }

    #[test]
    fn tiny_budget_is_exhausted() {
        let blobs = single_blob(DVec3::new(0.0, 0.0, -10.0), 5.0);
        let field = MetaballField::new(&blobs, BoundPolicy::Nearest);
        let ray = Ray::new(DVec3::ZERO, DVec3::NEG_Z).unwrap();
        let settings = MarchSettings {
            max_steps: 3,
            ..MarchSettings::default()
        };

        let march = intersect(&field, &ray, &settings);
        assert_eq!(march.termination, Termination::Exhausted);
        assert_eq!(march.steps, 3);
        assert!(!march.is_hit());
    }

    #[test]
    fn origin_inside_surface_hits_at_once() {
        let blobs = single_blob(DVec3::ZERO, 5.0);
        let field = MetaballField::new(&blobs, BoundPolicy::Nearest);
        let ray = Ray::new(DVec3::ZERO, DVec3::X).unwrap();

        let march = intersect(&field, &ray, &MarchSettings::default());
        assert!(march.is_hit());
        assert_eq!(march.steps, 1);
        assert!(march.t < 1e-6);
    }

    #[test]
    fn marching_is_deterministic() {
        let blobs = [
            Blob::new(DVec3::new(1.0, 0.5, -12.0), 6.0, DVec3::X),
            Blob::new(DVec3::new(-2.0, 0.0, -14.0), 4.0, DVec3::Y),
        ];
        let field = MetaballField::new(&blobs, BoundPolicy::Nearest);
        let ray = Ray::new(DVec3::ZERO, DVec3::new(0.02, 0.01, -1.0)).unwrap();

        let a = intersect(&field, &ray, &MarchSettings::default());
        let b = intersect(&field, &ray, &MarchSettings::default());
        assert_eq!(a, b);
        assert_eq!(a.t.to_bits(), b.t.to_bits());
    }
}
