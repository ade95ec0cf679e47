//! Per-pixel tracing: march, then normal and shade on a hit

use crate::field::{BoundPolicy, MetaballField};
use crate::march::{MarchSettings, Termination, intersect};
use crate::normal::estimate_normal;
use crate::ray::Ray;
use crate::scene::Scene;
use crate::shading::shade;
use glam::DVec3;

/// Diffuse color used when a hit has no dominant blob
pub const FALLBACK_COLOR: DVec3 = DVec3::splat(0.2);

/// A converged intersection
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Hit {
    pub position: DVec3,
    /// Unit normal, or zero where the field gradient vanished
    pub normal: DVec3,
    pub t: f64,
    /// Blob that colors this point
    pub dominant: Option<usize>,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Outcome {
    Hit(Hit),
    /// Escaped or exhausted; never `Converged`
    Miss(Termination),
}

impl Outcome {
    pub fn is_hit(&self) -> bool {
        matches!(self, Self::Hit(_))
    }

    pub fn hit(&self) -> Option<&Hit> {
        match self {
            Self::Hit(hit) => Some(hit),
            Self::Miss(_) => None,
        }
    }
}

/// Color for one ray plus how it was produced
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Shaded {
    pub color: DVec3,
    pub outcome: Outcome,
}

/// Traces rays against one scene snapshot
#[derive(Debug, Clone, Copy)]
pub struct Tracer<'a> {
    scene: &'a Scene,
    field: MetaballField<'a>,
    settings: MarchSettings,
}

impl<'a> Tracer<'a> {
    pub fn new(scene: &'a Scene, policy: BoundPolicy, settings: MarchSettings) -> Self {
        Self {
            scene,
            field: MetaballField::new(scene.blobs(), policy),
            settings,
        }
    }

    pub fn field(&self) -> &MetaballField<'a> {
        &self.field
    }

    pub fn trace(&self, ray: &Ray) -> Shaded {
        let march = intersect(&self.field, ray, &self.settings);

        if !march.is_hit() {
            return Shaded {
                color: self.scene.background,
                outcome: Outcome::Miss(march.termination),
            };
        }

        let position = ray.at(march.t);
        let normal = estimate_normal(&self.field, position);
        if normal == DVec3::ZERO {
            tracing::trace!(?position, "field gradient vanished at hit");
        }

        let dominant = march.sample.dominant;
        let diffuse = dominant
            .and_then(|index| self.scene.diffuse(index))
            .unwrap_or(FALLBACK_COLOR);

        Shaded {
            color: shade(ray.direction, position, normal, self.scene.light, diffuse),
            outcome: Outcome::Hit(Hit {
                position,
                normal,
                t: march.t,
                dominant,
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scene::Blob;
    use approx::assert_relative_eq;

    fn red_blob_scene() -> Scene {
        let blob = Blob::new(DVec3::new(0.0, 0.0, -10.0), 5.0, DVec3::X);
        Scene::new(vec![blob], DVec3::ZERO).unwrap()
    }

    #[test]
    fn head_on_hit_is_red_with_white_highlight() {
        let scene = red_blob_scene();
        let tracer = Tracer::new(&scene, BoundPolicy::Nearest, MarchSettings::default());
        let shaded = tracer.trace(&Ray::new(DVec3::ZERO, DVec3::NEG_Z).unwrap());

        let hit = shaded.outcome.hit().copied().unwrap();
        assert!(hit.t > 5.0 && hit.t < 10.0);
        assert_eq!(hit.dominant, Some(0));
        assert_relative_eq!(hit.normal.z, 1.0, epsilon = 1e-6);

        assert!(shaded.color.x > 0.0);
        assert_relative_eq!(shaded.color.y, shaded.color.z);
        assert_relative_eq!(shaded.color.x, 1.0 + shaded.color.y, epsilon = 1e-6);
    }

    #[test]
    fn miss_returns_background() {
        let mut scene = red_blob_scene();
        scene.background = DVec3::new(0.1, 0.2, 0.3);
        let tracer = Tracer::new(&scene, BoundPolicy::Nearest, MarchSettings::default());

        let shaded = tracer.trace(&Ray::new(DVec3::ZERO, DVec3::Z).unwrap());
        assert_eq!(shaded.outcome, Outcome::Miss(Termination::Escaped));
        assert_eq!(shaded.color, scene.background);
    }

    #[test]
    fn exhausted_march_is_a_miss() {
        let scene = red_blob_scene();
        let settings = MarchSettings {
            max_steps: 2,
            ..MarchSettings::default()
        };
        let tracer = Tracer::new(&scene, BoundPolicy::Nearest, settings);

        let shaded = tracer.trace(&Ray::new(DVec3::ZERO, DVec3::NEG_Z).unwrap());
        assert_eq!(shaded.outcome, Outcome::Miss(Termination::Exhausted));
        assert_eq!(shaded.color, DVec3::ZERO);
    }

    #[test]
    fn light_behind_blob_leaves_it_dark() {
        let mut scene = red_blob_scene();
        scene.light = DVec3::new(0.0, 0.0, -100.0);
        let tracer = Tracer::new(&scene, BoundPolicy::Nearest, MarchSettings::default());

        let shaded = tracer.trace(&Ray::new(DVec3::ZERO, DVec3::NEG_Z).unwrap());
        assert!(shaded.outcome.is_hit());
        assert_eq!(shaded.color, DVec3::ZERO);
    }

    #[test]
    fn fused_pair_is_colored_by_nearer_blob() {
        let blobs = vec![
            Blob::new(DVec3::new(-1.5, 0.0, -10.0), 4.0, DVec3::X),
            Blob::new(DVec3::new(1.5, 0.0, -10.0), 4.0, DVec3::Y),
        ];
        let scene = Scene::new(blobs, DVec3::ZERO).unwrap();
        let tracer = Tracer::new(&scene, BoundPolicy::Nearest, MarchSettings::default());

        let left = tracer.trace(&Ray::new(DVec3::new(-1.5, 0.0, 0.0), DVec3::NEG_Z).unwrap());
        let right = tracer.trace(&Ray::new(DVec3::new(1.5, 0.0, 0.0), DVec3::NEG_Z).unwrap());

        assert_eq!(left.outcome.hit().map(|h| h.dominant), Some(Some(0)));
        assert_eq!(right.outcome.hit().map(|h| h.dominant), Some(Some(1)));
    }
}
